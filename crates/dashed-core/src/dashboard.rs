//! Dashboard module and widgets

use crate::error::AdminResult;
use crate::http::{AdminRequest, AdminResponse};
use crate::module::{AdminModule, Routable};
use crate::rules::Rule;
use serde_json::{Value, json};
use std::sync::Arc;

/// Template rendered by dashboards
pub const DASHBOARD_TEMPLATE: &str = "dashed/dashboard.html";

/// A block of content shown on a dashboard
pub trait DashboardWidget: Send + Sync {
	fn title(&self) -> &str;

	/// Widget content for the template
	fn content(&self, request: &AdminRequest) -> Value;
}

/// Placeholder widget of the default dashboard
#[derive(Debug, Clone)]
pub struct HelloWorldWidget {
	title: String,
}

impl HelloWorldWidget {
	pub fn new(title: impl Into<String>) -> Self {
		Self {
			title: title.into(),
		}
	}
}

impl DashboardWidget for HelloWorldWidget {
	fn title(&self) -> &str {
		&self.title
	}

	fn content(&self, _request: &AdminRequest) -> Value {
		Value::String("Hello world".to_string())
	}
}

/// Module rendering a list of widgets at its root URL
///
/// # Examples
///
/// ```
/// use dashed_core::dashboard::{Dashboard, HelloWorldWidget};
///
/// let dashboard = Dashboard::new()
///     .with_widget(HelloWorldWidget::new("first"))
///     .with_widget(HelloWorldWidget::new("second"));
/// assert_eq!(dashboard.widgets().len(), 2);
///
/// assert_eq!(Dashboard::default().widgets().len(), 1);
/// ```
pub struct Dashboard {
	widgets: Vec<Arc<dyn DashboardWidget>>,
	template: String,
}

impl Default for Dashboard {
	fn default() -> Self {
		Self::new().with_widget(HelloWorldWidget::new("my first dashboard widget"))
	}
}

impl Dashboard {
	/// Dashboard without widgets
	pub fn new() -> Self {
		Self {
			widgets: Vec::new(),
			template: DASHBOARD_TEMPLATE.to_string(),
		}
	}

	pub fn with_widget(mut self, widget: impl DashboardWidget + 'static) -> Self {
		self.widgets.push(Arc::new(widget));
		self
	}

	pub fn with_template(mut self, template: impl Into<String>) -> Self {
		self.template = template.into();
		self
	}

	pub fn widgets(&self) -> &[Arc<dyn DashboardWidget>] {
		&self.widgets
	}

	fn show(&self, module: &AdminModule, request: &mut AdminRequest) -> AdminResult<AdminResponse> {
		let widgets: Vec<Value> = self
			.widgets
			.iter()
			.map(|widget| {
				json!({
					"title": widget.title(),
					"content": widget.content(request),
				})
			})
			.collect();
		Ok(AdminResponse::render(
			&self.template,
			json!({
				"module": module.context(),
				"widgets": widgets,
			}),
		))
	}
}

impl Routable for Dashboard {
	fn default_rules(self: Arc<Self>) -> Vec<Rule> {
		vec![Rule::new(
			"/",
			"show",
			move |module: &AdminModule, request: &mut AdminRequest| self.show(module, request),
		)]
	}
}
