//! Path-prefix security layer
//!
//! Checks are registered against a node path prefix and evaluated before any
//! handler below that prefix runs. A rule on `library` protects `library`,
//! `library.books` and every deeper node, but not `library_archive`.

use crate::error::{AdminError, AdminResult};
use crate::http::{AdminRequest, AdminResponse};
use crate::module::AdminModule;
use crate::node::PATH_SEPARATOR;
use crate::rules::Handler;
use http::StatusCode;
use std::fmt;
use std::sync::Arc;

/// Predicate deciding whether a request may proceed
pub type Check = Arc<dyn Fn(&AdminRequest) -> bool + Send + Sync>;

/// A check protecting every path under `prefix`
#[derive(Clone)]
pub struct SecurityRule {
	prefix: String,
	check: Check,
	failure_code: StatusCode,
}

impl SecurityRule {
	pub fn prefix(&self) -> &str {
		&self.prefix
	}

	pub fn failure_code(&self) -> StatusCode {
		self.failure_code
	}

	/// Whether this rule applies to `path`
	pub fn covers(&self, path: &str) -> bool {
		prefix_matches(&self.prefix, path)
	}
}

impl fmt::Debug for SecurityRule {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("SecurityRule")
			.field("prefix", &self.prefix)
			.field("failure_code", &self.failure_code)
			.finish_non_exhaustive()
	}
}

/// Whether `prefix` covers `path` at a segment boundary
///
/// # Examples
///
/// ```
/// use dashed_core::security::prefix_matches;
///
/// assert!(prefix_matches("library", "library"));
/// assert!(prefix_matches("library", "library.books"));
/// assert!(!prefix_matches("library", "library_archive"));
/// assert!(prefix_matches("/admin", "/admin/books/"));
/// assert!(prefix_matches("", "anything"));
/// ```
pub fn prefix_matches(prefix: &str, path: &str) -> bool {
	if prefix.is_empty() {
		return true;
	}
	match path.strip_prefix(prefix) {
		Some(rest) => {
			rest.is_empty()
				|| rest.starts_with(PATH_SEPARATOR)
				|| rest.starts_with('/')
				|| prefix.ends_with(PATH_SEPARATOR)
				|| prefix.ends_with('/')
		}
		None => false,
	}
}

/// Ordered path-prefix checks shared by every endpoint of a site
#[derive(Debug, Clone)]
pub struct SecurityLayer {
	rules: Vec<SecurityRule>,
	default_failure_code: StatusCode,
}

impl Default for SecurityLayer {
	fn default() -> Self {
		Self::new(StatusCode::FORBIDDEN)
	}
}

impl SecurityLayer {
	/// Layer whose rules fail with `default_failure_code` unless told otherwise
	pub fn new(default_failure_code: StatusCode) -> Self {
		Self {
			rules: Vec::new(),
			default_failure_code,
		}
	}

	/// Protect `prefix` with `check`, failing with the default code
	pub fn add_rule<F>(&mut self, prefix: impl Into<String>, check: F)
	where
		F: Fn(&AdminRequest) -> bool + Send + Sync + 'static,
	{
		let code = self.default_failure_code;
		self.add_rule_with_code(prefix, check, code);
	}

	/// Protect `prefix` with `check`, failing with `failure_code`
	pub fn add_rule_with_code<F>(
		&mut self,
		prefix: impl Into<String>,
		check: F,
		failure_code: StatusCode,
	) where
		F: Fn(&AdminRequest) -> bool + Send + Sync + 'static,
	{
		let prefix = prefix.into();
		tracing::debug!(prefix = %prefix, code = failure_code.as_u16(), "added security rule");
		self.rules.push(SecurityRule {
			prefix,
			check: Arc::new(check),
			failure_code,
		});
	}

	/// Evaluate every rule covering `path`, in registration order
	///
	/// Returns the failure code of the first failing check, or `None` when
	/// the request may proceed.
	///
	/// # Examples
	///
	/// ```
	/// use dashed_core::http::AdminRequest;
	/// use dashed_core::security::SecurityLayer;
	/// use http::StatusCode;
	///
	/// let mut layer = SecurityLayer::default();
	/// layer.add_rule("library", |_: &AdminRequest| false);
	///
	/// let request = AdminRequest::get("/admin/library/books/");
	/// assert_eq!(layer.authorize("library.books", &request), Some(StatusCode::FORBIDDEN));
	/// assert_eq!(layer.authorize("main-dashboard", &request), None);
	/// ```
	pub fn authorize(&self, path: &str, request: &AdminRequest) -> Option<StatusCode> {
		for rule in self.rules.iter().filter(|rule| rule.covers(path)) {
			if !(rule.check)(request) {
				tracing::warn!(
					path = %path,
					prefix = %rule.prefix,
					code = rule.failure_code.as_u16(),
					"security check failed"
				);
				return Some(rule.failure_code);
			}
		}
		None
	}

	/// Rules covering `path`
	pub fn rules_for<'a>(&'a self, path: &'a str) -> impl Iterator<Item = &'a SecurityRule> {
		self.rules.iter().filter(move |rule| rule.covers(path))
	}

	pub fn default_failure_code(&self) -> StatusCode {
		self.default_failure_code
	}

	pub fn len(&self) -> usize {
		self.rules.len()
	}

	pub fn is_empty(&self) -> bool {
		self.rules.is_empty()
	}
}

/// Handler guarded by a single check
///
/// Produced by [`AdminModule::secure_endpoint`].
pub struct SecuredHandler {
	inner: Arc<dyn Handler>,
	check: Check,
	failure_code: StatusCode,
}

impl SecuredHandler {
	pub fn new(inner: Arc<dyn Handler>, check: Check, failure_code: StatusCode) -> Self {
		Self {
			inner,
			check,
			failure_code,
		}
	}
}

impl Handler for SecuredHandler {
	fn handle(
		&self,
		module: &AdminModule,
		request: &mut AdminRequest,
	) -> AdminResult<AdminResponse> {
		if !(self.check)(request) {
			tracing::warn!(
				path = %request.path,
				code = self.failure_code.as_u16(),
				"endpoint security check failed"
			);
			return Err(AdminError::Forbidden(self.failure_code));
		}
		self.inner.handle(module, request)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use std::sync::atomic::{AtomicUsize, Ordering};

	#[rstest]
	#[case("library", "library", true)]
	#[case("library", "library.books", true)]
	#[case("library", "library.books.reviews", true)]
	#[case("library", "library_archive", false)]
	#[case("library.books", "library", false)]
	#[case("/admin/", "/admin/books", true)]
	fn test_prefix_boundaries(#[case] prefix: &str, #[case] path: &str, #[case] expected: bool) {
		assert_eq!(prefix_matches(prefix, path), expected);
	}

	#[rstest]
	fn test_first_failing_rule_wins() {
		// Arrange
		let mut layer = SecurityLayer::default();
		layer.add_rule("library", |_: &AdminRequest| true);
		layer.add_rule_with_code("library.books", |_: &AdminRequest| false, StatusCode::UNAUTHORIZED);
		layer.add_rule("library.books", |_: &AdminRequest| false);
		let request = AdminRequest::get("/admin/library/books/");

		// Act
		let outcome = layer.authorize("library.books", &request);

		// Assert
		assert_eq!(outcome, Some(StatusCode::UNAUTHORIZED));
	}

	#[rstest]
	fn test_failing_ancestor_governs_grandchild_despite_passing_child() {
		// Arrange
		let mut layer = SecurityLayer::default();
		layer.add_rule_with_code("library", |_: &AdminRequest| false, StatusCode::UNAUTHORIZED);
		layer.add_rule("library.books", |_: &AdminRequest| true);
		let request = AdminRequest::get("/admin/library/books/reviews/");

		// Act
		let grandchild = layer.authorize("library.books.reviews", &request);
		let child = layer.authorize("library.books", &request);

		// Assert
		assert_eq!(grandchild, Some(StatusCode::UNAUTHORIZED));
		assert_eq!(child, Some(StatusCode::UNAUTHORIZED));
	}

	#[rstest]
	fn test_rules_outside_prefix_are_not_evaluated() {
		// Arrange
		let calls = Arc::new(AtomicUsize::new(0));
		let counter = Arc::clone(&calls);
		let mut layer = SecurityLayer::new(StatusCode::FORBIDDEN);
		layer.add_rule("library", move |_: &AdminRequest| {
			counter.fetch_add(1, Ordering::SeqCst);
			false
		});
		let request = AdminRequest::get("/admin/");

		// Act
		let outcome = layer.authorize("main-dashboard", &request);

		// Assert
		assert_eq!(outcome, None);
		assert_eq!(calls.load(Ordering::SeqCst), 0);
	}

	#[rstest]
	fn test_check_reads_request_state() {
		// Arrange
		#[derive(Clone)]
		struct Staff;
		let mut layer = SecurityLayer::default();
		layer.add_rule("library", |req: &AdminRequest| req.extensions().get::<Staff>().is_some());

		// Act
		let anonymous = layer.authorize("library", &AdminRequest::get("/admin/library/"));
		let staff = layer.authorize(
			"library",
			&AdminRequest::get("/admin/library/").with_extension(Staff),
		);

		// Assert
		assert_eq!(anonymous, Some(StatusCode::FORBIDDEN));
		assert_eq!(staff, None);
	}
}
