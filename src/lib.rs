//! # dashed
//!
//! Admin panel builder: a navigable tree of management screens over arbitrary
//! data sources.
//!
//! An [`AdminSite`] owns a tree of nodes addressed by dotted paths. Plain
//! nodes group entries in the navigation; modules own URL rules that map to
//! actions. Path security checks registered on a node guard the whole
//! subtree. The [`admin`] module adds a generic object admin that serves
//! list, create, edit and delete screens over any
//! [`ObjectStore`](admin::ObjectStore).
//!
//! ## Feature Flags
//!
//! - `admin`: object admin CRUD engine (`dashed-admin`)
//! - `adapters`: bundled in-memory store (`dashed-adapters`)
//! - `full` (default): everything above
//!
//! ## Example
//!
//! ```
//! # #[cfg(feature = "full")]
//! # {
//! use dashed::admin::{AdminObject, FieldValue, MemoryRecord, MemoryStore, ObjectAdmin, ObjectAdminConfig};
//! use dashed::prelude::*;
//! use std::sync::Arc;
//!
//! #[derive(Clone, Default)]
//! struct Page { id: Option<u64>, slug: String }
//!
//! impl AdminObject for Page {
//!     fn pk(&self) -> Option<String> { self.id.map(|id| id.to_string()) }
//!     fn field(&self, name: &str) -> Option<FieldValue> {
//!         (name == "slug").then(|| self.slug.clone().into())
//!     }
//! }
//!
//! impl MemoryRecord for Page {
//!     fn assign_pk(&mut self, id: u64) { self.id = Some(id); }
//! }
//!
//! # #[derive(Default)]
//! # struct NoForm(dashed::admin::FieldErrors);
//! # impl dashed::admin::ObjectForm<Page> for NoForm {
//! #     fn bind(&mut self, _: &dashed::Params) {}
//! #     fn validate(&mut self) -> bool { true }
//! #     fn errors(&self) -> &dashed::admin::FieldErrors { &self.0 }
//! #     fn populate(&self, _: &mut Page) {}
//! #     fn context(&self) -> serde_json::Value { serde_json::Value::Null }
//! # }
//! let config = ObjectAdminConfig::from_columns(["slug"]).build().unwrap();
//! let pages = ObjectAdmin::new(config, MemoryStore::<Page>::new(), |_: &Page| NoForm::default());
//!
//! let mut site = AdminSite::new(dashed::conf::AdminSettings::default()).unwrap();
//! let module = site
//!     .register_module(Arc::new(pages), NodeSpec::new("/pages", "pages", "pages"), None)
//!     .unwrap();
//!
//! assert_eq!(module.url().unwrap(), "/admin/pages/");
//! assert_eq!(module.url_for("edit", [("pk", "3")]).unwrap(), "/admin/pages/3/edit");
//! # }
//! ```

#[cfg(feature = "admin")]
pub mod admin;

/// Layered settings
pub use dashed_conf as conf;

pub use dashed_core::{
	Addressable, AdminError, AdminModule, AdminRequest, AdminResponse, AdminResult, AdminSite,
	ConfigurationError, Crumb, Dashboard, DashboardWidget, Handler, HelloWorldWidget, HostRouter,
	Level, MAIN_DASHBOARD, Message, Messages, ModuleState, NEXT_PARAM, NavEntry, Node, NodeSpec,
	Notice, Params, PathRegistry, RouteHandler, Router, Routable, Rule, RuleChange, RuleSet,
	SecurityLayer, SecurityRule,
};

/// Commonly used types
pub mod prelude {
	pub use dashed_conf::AdminSettings;
	pub use dashed_core::prelude::*;

	#[cfg(feature = "admin")]
	pub use dashed_admin::{AdminObject, FieldValue, ObjectAdmin, ObjectAdminConfig, ObjectStore};
}
