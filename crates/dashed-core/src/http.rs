//! Request and response primitives exchanged with the host framework
//!
//! The host translates its own request type into an [`AdminRequest`] and turns
//! the returned [`AdminResponse`] into a rendered page, a redirect or an error
//! page. Nothing here performs I/O.

use crate::error::AdminError;
use crate::messages::Messages;
use http::{Extensions, Method, StatusCode};
use indexmap::IndexMap;
use serde_json::Value;

/// Ordered string parameters (path, query or submitted form data)
pub type Params = IndexMap<String, String>;

/// Query parameter holding an explicit redirect target
pub const NEXT_PARAM: &str = "next";

/// Incoming admin request
#[derive(Debug, Clone)]
pub struct AdminRequest {
	pub method: Method,
	/// Request path without the query string
	pub path: String,
	/// Parameters captured from the route pattern
	pub path_params: Params,
	/// Query string parameters
	pub query: Params,
	/// Submitted form data
	pub form: Params,
	/// One-shot notifications produced while handling the request
	pub messages: Messages,
	extensions: Extensions,
}

impl AdminRequest {
	/// Create a request from a method and a URI (path plus optional query)
	///
	/// # Examples
	///
	/// ```
	/// use dashed_core::http::AdminRequest;
	/// use http::Method;
	///
	/// let request = AdminRequest::new(Method::GET, "/admin/books/?search=lettres&orderby=title");
	/// assert_eq!(request.path, "/admin/books/");
	/// assert_eq!(request.query_param("search"), Some("lettres"));
	/// assert_eq!(request.query_param("orderby"), Some("title"));
	/// ```
	pub fn new(method: Method, uri: &str) -> Self {
		let (path, query) = match uri.split_once('?') {
			Some((path, query)) => (path, parse_urlencoded(query)),
			None => (uri, Params::new()),
		};
		Self {
			method,
			path: path.to_string(),
			path_params: Params::new(),
			query,
			form: Params::new(),
			messages: Messages::new(),
			extensions: Extensions::new(),
		}
	}

	/// GET request shortcut
	pub fn get(uri: &str) -> Self {
		Self::new(Method::GET, uri)
	}

	/// POST request shortcut
	pub fn post(uri: &str) -> Self {
		Self::new(Method::POST, uri)
	}

	/// Add a query parameter
	pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.query.insert(key.into(), value.into());
		self
	}

	/// Add a submitted form field
	pub fn with_form(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.form.insert(key.into(), value.into());
		self
	}

	/// Replace the submitted form data with a urlencoded body
	///
	/// # Examples
	///
	/// ```
	/// use dashed_core::http::AdminRequest;
	///
	/// let request = AdminRequest::post("/admin/books/new").with_form_body("title=Noces&year=1939");
	/// assert_eq!(request.form_value("title"), Some("Noces"));
	/// assert_eq!(request.form_value("year"), Some("1939"));
	/// ```
	pub fn with_form_body(mut self, body: &str) -> Self {
		self.form = parse_urlencoded(body);
		self
	}

	/// Attach typed request state (authenticated user, session, ...)
	pub fn with_extension<T: Clone + Send + Sync + 'static>(mut self, value: T) -> Self {
		self.extensions.insert(value);
		self
	}

	pub fn extensions(&self) -> &Extensions {
		&self.extensions
	}

	pub fn extensions_mut(&mut self) -> &mut Extensions {
		&mut self.extensions
	}

	/// Route parameter captured by the router
	pub fn param(&self, name: &str) -> Option<&str> {
		self.path_params.get(name).map(String::as_str)
	}

	/// Query string parameter; empty values count as absent
	pub fn query_param(&self, name: &str) -> Option<&str> {
		self.query
			.get(name)
			.map(String::as_str)
			.filter(|value| !value.is_empty())
	}

	/// Submitted form value
	pub fn form_value(&self, name: &str) -> Option<&str> {
		self.form.get(name).map(String::as_str)
	}

	pub fn is_post(&self) -> bool {
		self.method == Method::POST
	}

	/// The `next` query parameter, or `fallback` when absent
	pub fn next_or(&self, fallback: impl Into<String>) -> String {
		self.query_param(NEXT_PARAM)
			.map(str::to_string)
			.unwrap_or_else(|| fallback.into())
	}

	/// Route parameters merged with query parameters, then `overrides`
	///
	/// Used to build pager and sort links that keep the current search.
	///
	/// # Examples
	///
	/// ```
	/// use dashed_core::http::AdminRequest;
	///
	/// let mut request = AdminRequest::get("/admin/books/page/2?search=camus&page=9");
	/// request.path_params.insert("page".into(), "2".into());
	///
	/// let args = request.compute_args([("orderby", "year")]);
	/// assert_eq!(args["search"], "camus");
	/// assert_eq!(args["page"], "2");
	/// assert_eq!(args["orderby"], "year");
	/// ```
	pub fn compute_args<'a>(&self, overrides: impl IntoIterator<Item = (&'a str, &'a str)>) -> Params {
		let mut args = self.query.clone();
		for (key, value) in &self.path_params {
			args.insert(key.clone(), value.clone());
		}
		for (key, value) in overrides {
			args.insert(key.to_string(), value.to_string());
		}
		args
	}
}

fn parse_urlencoded(input: &str) -> Params {
	serde_urlencoded::from_str::<Vec<(String, String)>>(input)
		.map(|pairs| pairs.into_iter().collect())
		.unwrap_or_default()
}

/// Outcome of an admin handler, interpreted by the host
#[derive(Debug, Clone, PartialEq)]
pub enum AdminResponse {
	/// Render `template` with `context`
	Render { template: String, context: Value },
	/// Redirect to `location`
	Redirect { location: String },
	/// Stop with an error status
	Abort(StatusCode),
}

impl AdminResponse {
	pub fn render(template: impl Into<String>, context: Value) -> Self {
		AdminResponse::Render {
			template: template.into(),
			context,
		}
	}

	pub fn redirect(location: impl Into<String>) -> Self {
		AdminResponse::Redirect {
			location: location.into(),
		}
	}

	pub fn abort(status: StatusCode) -> Self {
		AdminResponse::Abort(status)
	}

	/// Status code the host should answer with
	///
	/// # Examples
	///
	/// ```
	/// use dashed_core::http::AdminResponse;
	/// use http::StatusCode;
	///
	/// assert_eq!(AdminResponse::redirect("/admin/").status(), StatusCode::FOUND);
	/// assert_eq!(AdminResponse::abort(StatusCode::FORBIDDEN).status(), StatusCode::FORBIDDEN);
	/// ```
	pub fn status(&self) -> StatusCode {
		match self {
			AdminResponse::Render { .. } => StatusCode::OK,
			AdminResponse::Redirect { .. } => StatusCode::FOUND,
			AdminResponse::Abort(status) => *status,
		}
	}

	pub fn is_redirect(&self) -> bool {
		matches!(self, AdminResponse::Redirect { .. })
	}

	/// Redirect target, if this is a redirect
	pub fn location(&self) -> Option<&str> {
		match self {
			AdminResponse::Redirect { location } => Some(location),
			_ => None,
		}
	}

	/// Template name, if this is a render
	pub fn template(&self) -> Option<&str> {
		match self {
			AdminResponse::Render { template, .. } => Some(template),
			_ => None,
		}
	}

	/// Render context, if this is a render
	pub fn context(&self) -> Option<&Value> {
		match self {
			AdminResponse::Render { context, .. } => Some(context),
			_ => None,
		}
	}
}

impl From<AdminError> for AdminResponse {
	fn from(error: AdminError) -> Self {
		AdminResponse::Abort(error.status_code())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_next_param_wins_over_fallback() {
		// Arrange
		let request = AdminRequest::get("/admin/books/1/delete?next=/admin/");

		// Act
		let target = request.next_or("/admin/books/");

		// Assert
		assert_eq!(target, "/admin/");
	}

	#[rstest]
	fn test_empty_next_param_is_ignored() {
		// Arrange
		let request = AdminRequest::get("/admin/books/1/delete?next=");

		// Act
		let target = request.next_or("/admin/books/");

		// Assert
		assert_eq!(target, "/admin/books/");
	}

	#[rstest]
	fn test_percent_encoded_query_is_decoded() {
		// Arrange & Act
		let request = AdminRequest::get("/admin/books/?search=Lettres%20%C3%A0");

		// Assert
		assert_eq!(request.query_param("search"), Some("Lettres à"));
	}

	#[rstest]
	fn test_error_converts_to_abort() {
		// Arrange
		let error = AdminError::NotFound("books".into());

		// Act
		let response = AdminResponse::from(error);

		// Assert
		assert_eq!(response, AdminResponse::Abort(StatusCode::NOT_FOUND));
	}

	#[rstest]
	fn test_extensions_carry_request_state() {
		// Arrange
		#[derive(Clone)]
		struct Staff(bool);
		let request = AdminRequest::get("/admin/").with_extension(Staff(true));

		// Act
		let staff = request.extensions().get::<Staff>().map(|s| s.0);

		// Assert
		assert_eq!(staff, Some(true));
	}
}
