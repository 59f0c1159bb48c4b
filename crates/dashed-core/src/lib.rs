//! # dashed-core
//!
//! The admin tree of the dashed admin panel.
//!
//! ## Overview
//!
//! An admin site is a tree of addressable nodes. Plain nodes group entries in
//! the navigation; modules additionally own URL rules mapped to actions.
//! Every node is known by a dotted path (`library.books`) which is also what
//! path security rules are registered against: a check on `library` runs
//! before any handler of `library.books`.
//!
//! - [`PathRegistry`]: owns the nodes and resolves paths
//! - [`SecurityLayer`]: ordered path-prefix checks
//! - [`AdminModule`]: action table and URL helpers of a registered module
//! - [`Router`]: bundled [`HostRouter`] implementation
//! - [`AdminSite`]: assembles all of the above and serves the main dashboard
//!
//! ## Example
//!
//! ```
//! use dashed_conf::AdminSettings;
//! use dashed_core::prelude::*;
//! use http::StatusCode;
//!
//! let mut site = AdminSite::new(AdminSettings::default()).unwrap();
//! let library = site
//!     .register_node(NodeSpec::new("/library", "library", "library"), None)
//!     .unwrap();
//! site.secure(library, |_: &AdminRequest| false);
//!
//! let nav = site.navigation();
//! assert_eq!(nav[0].path, "main-dashboard");
//! assert_eq!(nav[1].path, "library");
//!
//! let denied = site.authorize("library.books", &AdminRequest::get("/admin/library/books/"));
//! assert_eq!(denied, Some(StatusCode::FORBIDDEN));
//! ```

pub mod dashboard;
pub mod error;
pub mod http;
pub mod messages;
pub mod module;
pub mod node;
pub mod path;
pub mod router;
pub mod rules;
pub mod security;
pub mod site;

pub use dashboard::{Dashboard, DashboardWidget, HelloWorldWidget};
pub use error::{AdminError, AdminResult, ConfigurationError};
pub use crate::http::{AdminRequest, AdminResponse, NEXT_PARAM, Params};
pub use messages::{Level, Message, Messages, Notice};
pub use module::{AdminModule, ModuleState, Routable};
pub use node::{Addressable, Node, NodeSpec};
pub use path::PathRegistry;
pub use router::{HostRouter, RouteHandler, Router};
pub use rules::{Handler, Rule, RuleChange, RuleSet};
pub use security::{SecurityLayer, SecurityRule};
pub use site::{AdminSite, Crumb, MAIN_DASHBOARD, NavEntry};

/// Commonly used types
pub mod prelude {
	pub use crate::error::{AdminError, AdminResult};
	pub use crate::http::{AdminRequest, AdminResponse};
	pub use crate::module::{AdminModule, Routable};
	pub use crate::node::{Addressable, NodeSpec};
	pub use crate::rules::Rule;
	pub use crate::site::AdminSite;
}
