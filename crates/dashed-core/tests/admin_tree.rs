//! Admin tree integration tests
//!
//! Exercise an assembled site through the bundled router: node registration,
//! navigation, path security inheritance and module routes.

use dashed_conf::AdminSettings;
use dashed_core::prelude::*;
use dashed_core::{ConfigurationError, MAIN_DASHBOARD, RuleChange};
use http::StatusCode;
use rstest::{fixture, rstest};
use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Clone)]
struct Staff;

struct Report;

impl Routable for Report {
	fn default_rules(self: Arc<Self>) -> Vec<Rule> {
		vec![
			Rule::new("/", "show", show),
			Rule::new("/<year>", "year", show),
		]
	}
}

fn show(module: &AdminModule, request: &mut AdminRequest) -> AdminResult<AdminResponse> {
	Ok(AdminResponse::render(
		"report.html",
		json!({ "module": module.path(), "year": request.param("year") }),
	))
}

#[fixture]
fn site() -> AdminSite {
	let mut site = AdminSite::new(AdminSettings::default()).unwrap();
	let root = site
		.register_node(NodeSpec::new("/root", "first_root_node", "first node"), None)
		.unwrap();
	site.register_node(
		NodeSpec::new("/child", "first_child_node", "child node"),
		Some(&root),
	)
	.unwrap();
	site.register_module(
		Arc::new(Report),
		NodeSpec::new("/reports", "reports", "reports").with_title("Yearly reports"),
		Some(&root),
	)
	.unwrap();
	site
}

#[rstest]
fn test_every_registered_path_resolves(site: AdminSite) {
	// Act
	let paths: Vec<&str> = site.registry().iter().map(|node| node.path()).collect();

	// Assert
	assert_eq!(
		paths,
		vec![
			MAIN_DASHBOARD,
			"first_root_node",
			"first_root_node.first_child_node",
			"first_root_node.reports",
		]
	);
	for path in paths {
		assert_eq!(site.registry().resolve(path).unwrap().path(), path);
	}
}

#[rstest]
fn test_unknown_parent_fails_without_mutation(mut site: AdminSite) {
	// Arrange
	let before = site.registry().len();

	// Act
	let result = site.register_node(NodeSpec::new("/x", "x", "x"), Some("undefined"));
	let module = site.register_module(Arc::new(Report), NodeSpec::new("/y", "y", "y"), Some("undefined"));

	// Assert
	assert!(matches!(
		result,
		Err(AdminError::Configuration(ConfigurationError::UnknownParent(_)))
	));
	assert!(module.is_err());
	assert_eq!(site.registry().len(), before);
}

#[rstest]
fn test_module_routes_use_namespaced_endpoints(site: AdminSite) {
	// Act
	let routes = site.router().routes();

	// Assert
	assert_eq!(
		routes,
		vec![
			("/admin/", "admin.main-dashboard_show"),
			("/admin/root/reports/", "admin.reports_show"),
			("/admin/root/reports/<year>", "admin.reports_year"),
		]
	);
}

#[rstest]
fn test_dispatch_reaches_module_handler(site: AdminSite) {
	// Arrange
	let mut request = AdminRequest::get("/admin/root/reports/2024");

	// Act
	let response = site.dispatch(&mut request).unwrap();

	// Assert
	assert_eq!(response.template(), Some("report.html"));
	assert_eq!(
		response.context(),
		Some(&json!({ "module": "first_root_node.reports", "year": "2024" }))
	);
}

#[rstest]
fn test_security_on_ancestor_protects_module(site: AdminSite) {
	// Arrange
	site.secure_with_code(
		"first_root_node",
		|req: &AdminRequest| req.extensions().get::<Staff>().is_some(),
		StatusCode::UNAUTHORIZED,
	);

	// Act
	let anonymous = site
		.dispatch(&mut AdminRequest::get("/admin/root/reports/"))
		.unwrap();
	let staff = site
		.dispatch(&mut AdminRequest::get("/admin/root/reports/").with_extension(Staff))
		.unwrap();
	let dashboard = site.dispatch(&mut AdminRequest::get("/admin/")).unwrap();

	// Assert
	assert_eq!(anonymous, AdminResponse::Abort(StatusCode::UNAUTHORIZED));
	assert_eq!(staff.status(), StatusCode::OK);
	assert_eq!(dashboard.status(), StatusCode::OK);
}

#[rstest]
fn test_failing_security_check_short_circuits_handler(mut site: AdminSite) {
	// Arrange
	let calls = Arc::new(AtomicUsize::new(0));
	let counter = Arc::clone(&calls);
	site.add_rule(
		"first_root_node.reports",
		Rule::new(
			"/",
			"show",
			move |_: &AdminModule, _: &mut AdminRequest| -> AdminResult<AdminResponse> {
				counter.fetch_add(1, Ordering::SeqCst);
				Ok(AdminResponse::redirect("/"))
			},
		),
	)
	.unwrap();
	site.secure("first_root_node.reports", |_: &AdminRequest| false);

	// Act
	let response = site
		.dispatch(&mut AdminRequest::get("/admin/root/reports/"))
		.unwrap();

	// Assert
	assert_eq!(response.status(), StatusCode::FORBIDDEN);
	assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[rstest]
fn test_add_rule_replaces_handler_without_new_route(mut site: AdminSite) {
	// Arrange
	let routes_before = site.router().len();

	// Act
	let change = site
		.add_rule(
			"first_root_node.reports",
			Rule::new(
				"/",
				"show",
				|_: &AdminModule, _: &mut AdminRequest| -> AdminResult<AdminResponse> {
					Ok(AdminResponse::redirect("/elsewhere"))
				},
			),
		)
		.unwrap();
	let response = site
		.dispatch(&mut AdminRequest::get("/admin/root/reports/"))
		.unwrap();

	// Assert
	assert_eq!(change, RuleChange::Replaced);
	assert_eq!(site.router().len(), routes_before);
	assert_eq!(response.location(), Some("/elsewhere"));
}

#[rstest]
fn test_add_rule_with_new_pattern_is_published(mut site: AdminSite) {
	// Act
	let change = site
		.add_rule("first_root_node.reports", Rule::new("/<year>/<month>", "month", show))
		.unwrap();
	let response = site
		.dispatch(&mut AdminRequest::get("/admin/root/reports/2024/05"))
		.unwrap();

	// Assert
	assert_eq!(change, RuleChange::Added);
	assert_eq!(response.template(), Some("report.html"));
	assert_eq!(
		site.url_for("first_root_node.reports", "month", [("year", "2024"), ("month", "05")])
			.unwrap(),
		"/admin/root/reports/2024/05"
	);
}

#[rstest]
fn test_navigation_tree(site: AdminSite) {
	// Act
	let nav = site.navigation();

	// Assert
	assert_eq!(nav.len(), 2);
	assert_eq!(nav[0].short_title, "dashboard");
	assert_eq!(nav[0].url.as_deref(), Some("/admin/"));
	assert_eq!(nav[1].url, None);
	let children: Vec<&str> = nav[1].children.iter().map(|c| c.path.as_str()).collect();
	assert_eq!(
		children,
		vec!["first_root_node.first_child_node", "first_root_node.reports"]
	);
	assert_eq!(nav[1].children[1].title, "Yearly reports");
	assert_eq!(
		nav[1].children[1].url.as_deref(),
		Some("/admin/root/reports/")
	);
}

#[rstest]
fn test_breadcrumbs(site: AdminSite) {
	// Act
	let crumbs = site.breadcrumbs("first_root_node.reports").unwrap();

	// Assert
	let titles: Vec<&str> = crumbs.iter().map(|c| c.short_title.as_str()).collect();
	assert_eq!(titles, vec!["first node", "reports"]);
}

#[rstest]
fn test_secure_endpoint_guards_single_action(site: AdminSite) {
	// Arrange
	site.secure_endpoint("first_root_node.reports", "year", |_: &AdminRequest| false)
		.unwrap();

	// Act
	let year = site
		.dispatch(&mut AdminRequest::get("/admin/root/reports/2024"))
		.unwrap();
	let show = site
		.dispatch(&mut AdminRequest::get("/admin/root/reports/"))
		.unwrap();

	// Assert
	assert_eq!(year.status(), StatusCode::FORBIDDEN);
	assert_eq!(show.status(), StatusCode::OK);
}

#[rstest]
fn test_dashboard_renders_default_widget(site: AdminSite) {
	// Act
	let response = site.dispatch(&mut AdminRequest::get("/admin/")).unwrap();

	// Assert
	let context = response.context().unwrap();
	assert_eq!(context["widgets"][0]["title"], "my first dashboard widget");
	assert_eq!(context["module"]["path"], MAIN_DASHBOARD);
}

#[rstest]
fn test_custom_prefix_and_failure_code() {
	// Arrange
	let settings = AdminSettings::from_toml_str(
		r#"
url_prefix = "/backoffice"
endpoint = "backoffice"
failure_code = 401
"#,
	)
	.unwrap();
	let site = AdminSite::new(settings).unwrap();
	site.secure(MAIN_DASHBOARD, |_: &AdminRequest| false);

	// Act
	let response = site.dispatch(&mut AdminRequest::get("/backoffice/")).unwrap();

	// Assert
	assert_eq!(response, AdminResponse::Abort(StatusCode::UNAUTHORIZED));
	assert_eq!(
		site.router().routes(),
		vec![("/backoffice/", "backoffice.main-dashboard_show")]
	);
}
