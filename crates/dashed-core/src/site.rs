//! Admin site: the assembly point of nodes, modules, security and routes

use crate::dashboard::Dashboard;
use crate::error::{AdminError, AdminResult, ConfigurationError};
use crate::http::{AdminRequest, AdminResponse};
use crate::module::{AdminModule, Routable};
use crate::node::{Addressable, Node, NodeSpec};
use crate::path::PathRegistry;
use crate::router::{HostRouter, ModuleEndpoint, Router};
use crate::rules::{Rule, RuleChange};
use crate::security::SecurityLayer;
use dashed_conf::AdminSettings;
use http::StatusCode;
use indexmap::IndexMap;
use parking_lot::RwLock;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;

/// Endpoint of the dashboard registered by every site
pub const MAIN_DASHBOARD: &str = "main-dashboard";

/// One entry of the navigation tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavEntry {
	pub path: String,
	pub short_title: String,
	pub title: String,
	/// Primary URL for modules, `None` for plain containers
	pub url: Option<String>,
	pub children: Vec<NavEntry>,
}

/// One breadcrumb
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Crumb {
	pub path: String,
	pub short_title: String,
	pub url: Option<String>,
}

/// An admin site mounted on a host router
///
/// Construction registers the main dashboard as the first root node, at `/`.
///
/// # Examples
///
/// ```
/// use dashed_conf::AdminSettings;
/// use dashed_core::http::AdminRequest;
/// use dashed_core::node::NodeSpec;
/// use dashed_core::site::AdminSite;
///
/// let mut site = AdminSite::new(AdminSettings::default()).unwrap();
/// site.register_node(NodeSpec::new("/library", "library", "library"), None).unwrap();
///
/// let response = site.dispatch(&mut AdminRequest::get("/admin/")).unwrap();
/// assert_eq!(response.template(), Some("dashed/dashboard.html"));
/// ```
pub struct AdminSite<R: HostRouter = Router> {
	settings: AdminSettings,
	registry: PathRegistry,
	modules: IndexMap<String, Arc<AdminModule>>,
	security: Arc<RwLock<SecurityLayer>>,
	router: R,
}

impl AdminSite<Router> {
	/// Site served by the bundled router
	pub fn new(settings: AdminSettings) -> AdminResult<Self> {
		Self::with_router(settings, Router::new())
	}

	/// Dispatch a request through the bundled router
	pub fn dispatch(&self, request: &mut AdminRequest) -> AdminResult<AdminResponse> {
		self.router.dispatch(request)
	}
}

impl<R: HostRouter> AdminSite<R> {
	/// Site publishing its routes to `router`
	pub fn with_router(settings: AdminSettings, router: R) -> AdminResult<Self> {
		Self::with_dashboard(settings, router, Dashboard::default())
	}

	/// Site whose main dashboard is `dashboard`
	pub fn with_dashboard(settings: AdminSettings, router: R, dashboard: Dashboard) -> AdminResult<Self> {
		settings
			.validate()
			.map_err(|e| ConfigurationError::Invalid(e.to_string()))?;
		let failure_code = StatusCode::from_u16(settings.failure_code)
			.map_err(|e| ConfigurationError::Invalid(e.to_string()))?;

		let mut site = Self {
			settings,
			registry: PathRegistry::new(),
			modules: IndexMap::new(),
			security: Arc::new(RwLock::new(SecurityLayer::new(failure_code))),
			router,
		};
		site.register_module(
			Arc::new(dashboard),
			NodeSpec::new("/", MAIN_DASHBOARD, "dashboard"),
			None,
		)?;
		tracing::info!(
			prefix = %site.settings.url_prefix,
			endpoint = %site.settings.endpoint,
			"admin site created"
		);
		Ok(site)
	}

	pub fn settings(&self) -> &AdminSettings {
		&self.settings
	}

	pub fn registry(&self) -> &PathRegistry {
		&self.registry
	}

	pub fn router(&self) -> &R {
		&self.router
	}

	/// Register a plain navigation container
	pub fn register_node(&mut self, spec: NodeSpec, parent: Option<&str>) -> AdminResult<String> {
		self.registry.register(spec, parent)
	}

	/// Register a module and publish its routes
	///
	/// Fails before touching the registry or the host when the parent is
	/// unknown, the path is taken, the module supplies no rules or one of its
	/// routes is already bound.
	pub fn register_module<M: Routable>(
		&mut self,
		kind: Arc<M>,
		spec: NodeSpec,
		parent: Option<&str>,
	) -> AdminResult<Arc<AdminModule>> {
		let path = self.registry.plan(&spec, parent)?;
		let parent_node = match parent {
			Some(parent) => Some(self.registry.resolve(parent)?),
			None => None,
		};
		let node = Node::attach(spec.clone(), parent_node);
		let module = Arc::new(AdminModule::new(
			node,
			self.settings.url_prefix.as_str(),
			self.settings.endpoint.as_str(),
		));
		module.install(kind.default_rules())?;

		let routes = module.routes();
		let mut seen = HashSet::new();
		for (_, pattern) in &routes {
			let full = module.route_pattern(pattern);
			if self.router.has_route(&full) || !seen.insert(full.clone()) {
				return Err(ConfigurationError::Invalid(format!(
					"route '{full}' of '{path}' is already bound"
				))
				.into());
			}
		}

		for (action, pattern) in &routes {
			self.publish(&module, action, pattern)?;
		}
		self.registry.register(spec, parent)?;
		self.modules.insert(path.clone(), Arc::clone(&module));
		tracing::info!(path = %path, actions = ?module.actions(), "registered admin module");
		Ok(module)
	}

	/// Add a rule to a registered module
	///
	/// A new pattern is published to the host; a rule for an existing
	/// action and pattern only replaces the handler.
	pub fn add_rule(&mut self, module_path: &str, rule: Rule) -> AdminResult<RuleChange> {
		let module = self.module(module_path)?;
		let action = rule.action.clone();
		let pattern = rule.pattern.clone();
		let change = module.add_rule(rule);
		if change != RuleChange::Replaced {
			self.publish(&module, &action, &pattern)?;
		}
		Ok(change)
	}

	fn publish(&mut self, module: &Arc<AdminModule>, action: &str, pattern: &str) -> AdminResult<()> {
		let endpoint = ModuleEndpoint::new(Arc::clone(module), action, Arc::clone(&self.security));
		self.router.add_route(
			&module.route_pattern(pattern),
			&module.endpoint_name(action),
			Arc::new(endpoint),
		)
	}

	/// Protect every node under `prefix`, failing with the site failure code
	pub fn secure<F>(&self, prefix: impl Into<String>, check: F)
	where
		F: Fn(&AdminRequest) -> bool + Send + Sync + 'static,
	{
		self.security.write().add_rule(prefix, check);
	}

	/// Protect every node under `prefix`, failing with `failure_code`
	pub fn secure_with_code<F>(&self, prefix: impl Into<String>, check: F, failure_code: StatusCode)
	where
		F: Fn(&AdminRequest) -> bool + Send + Sync + 'static,
	{
		self.security
			.write()
			.add_rule_with_code(prefix, check, failure_code);
	}

	/// Guard a single action of a module
	pub fn secure_endpoint<F>(&self, module_path: &str, action: &str, check: F) -> AdminResult<()>
	where
		F: Fn(&AdminRequest) -> bool + Send + Sync + 'static,
	{
		let code = self.security.read().default_failure_code();
		self.module(module_path)?.secure_endpoint(action, check, code)
	}

	/// Evaluate the path security checks covering `path`
	pub fn authorize(&self, path: &str, request: &AdminRequest) -> Option<StatusCode> {
		self.security.read().authorize(path, request)
	}

	/// Module registered at `path`
	pub fn module(&self, path: &str) -> AdminResult<Arc<AdminModule>> {
		self.registry.resolve(path)?;
		self.modules
			.get(path)
			.cloned()
			.ok_or_else(|| AdminError::NotFound(format!("admin module '{path}'")))
	}

	/// Registered modules, in registration order
	pub fn modules(&self) -> impl Iterator<Item = &Arc<AdminModule>> {
		self.modules.values()
	}

	pub fn main_dashboard(&self) -> AdminResult<Arc<AdminModule>> {
		self.module(MAIN_DASHBOARD)
	}

	/// URL of `action` on the module at `module_path`
	pub fn url_for<I, K, V>(&self, module_path: &str, action: &str, params: I) -> AdminResult<String>
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<String>,
	{
		self.module(module_path)?.url_for(action, params)
	}

	fn node_url(&self, path: &str) -> Option<String> {
		self.modules.get(path).and_then(|module| module.url().ok())
	}

	/// Navigation tree from the root nodes down
	pub fn navigation(&self) -> Vec<NavEntry> {
		self.registry
			.roots()
			.into_iter()
			.map(|node| self.nav_entry(node))
			.collect()
	}

	fn nav_entry(&self, node: &Node) -> NavEntry {
		let children = self
			.registry
			.children(node.path())
			.unwrap_or_default()
			.into_iter()
			.map(|child| self.nav_entry(child))
			.collect();
		NavEntry {
			path: node.path().to_string(),
			short_title: node.short_title().to_string(),
			title: node.title().to_string(),
			url: self.node_url(node.path()),
			children,
		}
	}

	/// Breadcrumbs from the root down to `path`, inclusive
	pub fn breadcrumbs(&self, path: &str) -> AdminResult<Vec<Crumb>> {
		let mut nodes = self.registry.ancestors(path)?;
		nodes.push(self.registry.resolve(path)?);
		Ok(nodes
			.into_iter()
			.map(|node| Crumb {
				path: node.path().to_string(),
				short_title: node.short_title().to_string(),
				url: self.node_url(node.path()),
			})
			.collect())
	}
}
