//! Host router boundary and the bundled path router
//!
//! The site publishes each module route to a [`HostRouter`] under its
//! endpoint name. [`Router`] is a small implementation matching `<name>`
//! placeholders, enough to serve the admin or to test it without a framework.

use crate::error::{AdminError, AdminResult, ConfigurationError};
use crate::http::{AdminRequest, AdminResponse, Params};
use crate::module::AdminModule;
use crate::node::Addressable;
use crate::security::SecurityLayer;
use http::StatusCode;
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

/// Callable published to the host for one route
pub trait RouteHandler: Send + Sync {
	fn call(&self, request: &mut AdminRequest) -> AdminResult<AdminResponse>;
}

/// Routing table of the host framework
pub trait HostRouter: Send + Sync {
	/// Register `handler` for `pattern` under endpoint `name`
	fn add_route(
		&mut self,
		pattern: &str,
		name: &str,
		handler: Arc<dyn RouteHandler>,
	) -> AdminResult<()>;

	/// Whether `pattern` is already bound
	///
	/// Checked for every route of a module before any of them is added, so a
	/// conflicting module leaves the host untouched.
	fn has_route(&self, _pattern: &str) -> bool {
		false
	}
}

/// Route handler of a module action
///
/// Runs the path security checks covering the module, then the action handler
/// currently registered. Replacing an action handler later takes effect
/// without touching the host routes.
pub struct ModuleEndpoint {
	module: Arc<AdminModule>,
	action: String,
	security: Arc<RwLock<SecurityLayer>>,
}

impl ModuleEndpoint {
	pub fn new(
		module: Arc<AdminModule>,
		action: impl Into<String>,
		security: Arc<RwLock<SecurityLayer>>,
	) -> Self {
		Self {
			module,
			action: action.into(),
			security,
		}
	}
}

impl RouteHandler for ModuleEndpoint {
	fn call(&self, request: &mut AdminRequest) -> AdminResult<AdminResponse> {
		let denied = self.security.read().authorize(self.module.path(), request);
		if let Some(status) = denied {
			return Err(AdminError::Forbidden(status));
		}
		self.module.invoke(&self.action, request)
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
	Literal(String),
	Param(String),
}

/// Parsed `/literal/<param>` route pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePattern {
	raw: String,
	segments: Vec<Segment>,
}

impl RoutePattern {
	pub fn parse(raw: &str) -> Self {
		let segments = raw
			.split('/')
			.map(|segment| match segment.strip_prefix('<').and_then(|s| s.strip_suffix('>')) {
				Some(name) => Segment::Param(name.to_string()),
				None => Segment::Literal(segment.to_string()),
			})
			.collect();
		Self {
			raw: raw.to_string(),
			segments,
		}
	}

	pub fn as_str(&self) -> &str {
		&self.raw
	}

	/// Captured parameters when `path` matches
	///
	/// # Examples
	///
	/// ```
	/// use dashed_core::router::RoutePattern;
	///
	/// let pattern = RoutePattern::parse("/admin/books/<pk>/edit");
	/// let params = pattern.matches("/admin/books/42/edit").unwrap();
	/// assert_eq!(params["pk"], "42");
	/// assert!(pattern.matches("/admin/books/42").is_none());
	/// assert!(pattern.matches("/admin/books//edit").is_none());
	///
	/// let params = pattern.matches("/admin/books/isbn%2F978%202/edit").unwrap();
	/// assert_eq!(params["pk"], "isbn/978 2");
	/// ```
	pub fn matches(&self, path: &str) -> Option<Params> {
		let parts: Vec<&str> = path.split('/').collect();
		if parts.len() != self.segments.len() {
			return None;
		}
		let mut params = Params::new();
		for (segment, part) in self.segments.iter().zip(parts) {
			match segment {
				Segment::Literal(literal) if literal == part => {}
				Segment::Param(name) if !part.is_empty() => {
					let value = urlencoding::decode(part).ok()?;
					params.insert(name.clone(), value.into_owned());
				}
				_ => return None,
			}
		}
		Some(params)
	}

	/// Build a path from `params`, percent-encoding each value; `Err` carries
	/// the first missing name
	pub fn reverse(&self, params: &Params) -> Result<String, String> {
		let mut parts = Vec::with_capacity(self.segments.len());
		for segment in &self.segments {
			match segment {
				Segment::Literal(literal) => parts.push(literal.clone()),
				Segment::Param(name) => match params.get(name) {
					Some(value) => parts.push(urlencoding::encode(value).into_owned()),
					None => return Err(name.clone()),
				},
			}
		}
		Ok(parts.join("/"))
	}
}

struct Route {
	pattern: RoutePattern,
	name: String,
	handler: Arc<dyn RouteHandler>,
}

/// Bundled host router
///
/// Routes are tried in registration order; the first match wins.
#[derive(Default)]
pub struct Router {
	routes: Vec<Route>,
}

impl Router {
	pub fn new() -> Self {
		Self::default()
	}

	/// Dispatch a request to the first matching route
	///
	/// Request outcomes (not found, forbidden, bad request, store failures)
	/// become [`AdminResponse::Abort`]. Configuration errors are returned so
	/// the host can surface them.
	pub fn dispatch(&self, request: &mut AdminRequest) -> AdminResult<AdminResponse> {
		let matched = self.routes.iter().find_map(|route| {
			route
				.pattern
				.matches(&request.path)
				.map(|params| (route, params))
		});
		let Some((route, params)) = matched else {
			tracing::warn!(path = %request.path, "no admin route matched");
			return Ok(AdminResponse::abort(StatusCode::NOT_FOUND));
		};

		request.path_params = params;
		match route.handler.call(request) {
			Ok(response) => Ok(response),
			Err(error) if error.is_configuration() => {
				tracing::error!(endpoint = %route.name, error = %error, "admin misconfiguration");
				Err(error)
			}
			Err(error) => {
				match &error {
					AdminError::Backend(_) => {
						tracing::error!(endpoint = %route.name, error = %error, "admin backend failure");
					}
					_ => {
						tracing::debug!(endpoint = %route.name, error = %error, "admin request rejected");
					}
				}
				Ok(AdminResponse::from(error))
			}
		}
	}

	/// Reverse the first route named `name` that `params` can fill
	///
	/// # Examples
	///
	/// ```
	/// use dashed_core::http::{AdminRequest, AdminResponse, Params};
	/// use dashed_core::router::{HostRouter, RouteHandler, Router};
	/// use dashed_core::AdminResult;
	/// use std::sync::Arc;
	///
	/// struct Home;
	/// impl RouteHandler for Home {
	///     fn call(&self, _: &mut AdminRequest) -> AdminResult<AdminResponse> {
	///         Ok(AdminResponse::redirect("/"))
	///     }
	/// }
	///
	/// let mut router = Router::new();
	/// router.add_route("/admin/books/<pk>/edit", "admin.books_edit", Arc::new(Home)).unwrap();
	///
	/// let mut params = Params::new();
	/// params.insert("pk".into(), "3".into());
	/// assert_eq!(router.url_for("admin.books_edit", &params).unwrap(), "/admin/books/3/edit");
	/// ```
	pub fn url_for(&self, name: &str, params: &Params) -> AdminResult<String> {
		let mut missing = None;
		for route in self.routes.iter().filter(|route| route.name == name) {
			match route.pattern.reverse(params) {
				Ok(path) => return Ok(path),
				Err(param) => {
					missing.get_or_insert(param);
				}
			}
		}
		match missing {
			Some(param) => Err(ConfigurationError::MissingRouteParam {
				endpoint: name.to_string(),
				param,
			}
			.into()),
			None => Err(AdminError::NotFound(format!("route '{name}'"))),
		}
	}

	/// `(pattern, name)` pairs in registration order
	pub fn routes(&self) -> Vec<(&str, &str)> {
		self.routes
			.iter()
			.map(|route| (route.pattern.as_str(), route.name.as_str()))
			.collect()
	}

	pub fn len(&self) -> usize {
		self.routes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.routes.is_empty()
	}
}

impl HostRouter for Router {
	fn add_route(
		&mut self,
		pattern: &str,
		name: &str,
		handler: Arc<dyn RouteHandler>,
	) -> AdminResult<()> {
		if let Some(existing) = self.routes.iter().find(|route| route.pattern.as_str() == pattern) {
			return Err(ConfigurationError::Invalid(format!(
				"route '{pattern}' is already bound to '{}'",
				existing.name
			))
			.into());
		}
		tracing::debug!(pattern = %pattern, name = %name, "added admin route");
		self.routes.push(Route {
			pattern: RoutePattern::parse(pattern),
			name: name.to_string(),
			handler,
		});
		Ok(())
	}

	fn has_route(&self, pattern: &str) -> bool {
		self.routes.iter().any(|route| route.pattern.as_str() == pattern)
	}
}

impl fmt::Debug for Router {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_list().entries(self.routes()).finish()
	}
}
