//! URL rules bound to module actions

use crate::error::AdminResult;
use crate::http::{AdminRequest, AdminResponse};
use crate::module::AdminModule;
use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;

/// Request handler bound to a module action
///
/// Closures with the matching signature implement it, so simple actions can
/// be registered without a dedicated type.
pub trait Handler: Send + Sync {
	fn handle(&self, module: &AdminModule, request: &mut AdminRequest)
	-> AdminResult<AdminResponse>;
}

impl<F> Handler for F
where
	F: Fn(&AdminModule, &mut AdminRequest) -> AdminResult<AdminResponse> + Send + Sync,
{
	fn handle(
		&self,
		module: &AdminModule,
		request: &mut AdminRequest,
	) -> AdminResult<AdminResponse> {
		self(module, request)
	}
}

/// One URL pattern mapped to a named action
///
/// Patterns are relative to the module URL and may contain `<name>`
/// placeholders.
#[derive(Clone)]
pub struct Rule {
	pub pattern: String,
	pub action: String,
	pub handler: Arc<dyn Handler>,
}

impl Rule {
	/// # Examples
	///
	/// ```
	/// use dashed_core::AdminResult;
	/// use dashed_core::http::{AdminRequest, AdminResponse};
	/// use dashed_core::module::AdminModule;
	/// use dashed_core::rules::Rule;
	///
	/// let rule = Rule::new(
	///     "/<pk>/preview",
	///     "preview",
	///     |_: &AdminModule, req: &mut AdminRequest| -> AdminResult<AdminResponse> {
	///         Ok(AdminResponse::render("preview.html", serde_json::json!({ "pk": req.param("pk") })))
	///     },
	/// );
	/// assert_eq!(rule.action, "preview");
	/// assert_eq!(rule.params(), vec!["pk"]);
	/// ```
	pub fn new(
		pattern: impl Into<String>,
		action: impl Into<String>,
		handler: impl Handler + 'static,
	) -> Self {
		Self::from_arc(pattern, action, Arc::new(handler))
	}

	pub fn from_arc(
		pattern: impl Into<String>,
		action: impl Into<String>,
		handler: Arc<dyn Handler>,
	) -> Self {
		Self {
			pattern: pattern.into(),
			action: action.into(),
			handler,
		}
	}

	/// Placeholder names in the pattern, in order
	pub fn params(&self) -> Vec<&str> {
		pattern_params(&self.pattern)
	}
}

impl fmt::Debug for Rule {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Rule")
			.field("pattern", &self.pattern)
			.field("action", &self.action)
			.finish_non_exhaustive()
	}
}

/// Placeholder names of a `<name>` pattern
pub fn pattern_params(pattern: &str) -> Vec<&str> {
	pattern
		.split('/')
		.filter_map(|segment| segment.strip_prefix('<')?.strip_suffix('>'))
		.collect()
}

/// What adding a rule did to a [`RuleSet`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleChange {
	/// First rule for the action
	Added,
	/// Action existed; handler replaced and a new pattern recorded
	PatternAdded,
	/// Action and pattern existed; handler replaced
	Replaced,
}

/// Patterns and handler of one action
#[derive(Clone)]
pub struct ActionEntry {
	patterns: Vec<String>,
	handler: Arc<dyn Handler>,
}

impl ActionEntry {
	pub fn patterns(&self) -> &[String] {
		&self.patterns
	}

	pub fn handler(&self) -> Arc<dyn Handler> {
		Arc::clone(&self.handler)
	}
}

/// Ordered action table of a module
///
/// Each action appears once; adding a rule for a known action replaces its
/// handler and records the pattern if it is new.
#[derive(Clone, Default)]
pub struct RuleSet {
	actions: IndexMap<String, ActionEntry>,
}

impl RuleSet {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn add(&mut self, rule: Rule) -> RuleChange {
		match self.actions.get_mut(&rule.action) {
			Some(entry) => {
				entry.handler = rule.handler;
				if entry.patterns.contains(&rule.pattern) {
					RuleChange::Replaced
				} else {
					entry.patterns.push(rule.pattern);
					RuleChange::PatternAdded
				}
			}
			None => {
				self.actions.insert(
					rule.action,
					ActionEntry {
						patterns: vec![rule.pattern],
						handler: rule.handler,
					},
				);
				RuleChange::Added
			}
		}
	}

	/// Replace the handler of `action` with `wrap(current)`
	///
	/// Returns `false` when the action is unknown.
	pub fn wrap<F>(&mut self, action: &str, wrap: F) -> bool
	where
		F: FnOnce(Arc<dyn Handler>) -> Arc<dyn Handler>,
	{
		match self.actions.get_mut(action) {
			Some(entry) => {
				entry.handler = wrap(Arc::clone(&entry.handler));
				true
			}
			None => false,
		}
	}

	pub fn get(&self, action: &str) -> Option<&ActionEntry> {
		self.actions.get(action)
	}

	/// First registered action
	pub fn first(&self) -> Option<(&str, &ActionEntry)> {
		self.actions
			.get_index(0)
			.map(|(action, entry)| (action.as_str(), entry))
	}

	/// Action names in registration order
	pub fn actions(&self) -> impl Iterator<Item = &str> {
		self.actions.keys().map(String::as_str)
	}

	/// `(action, pattern)` pairs in registration order
	pub fn routes(&self) -> Vec<(String, String)> {
		self.actions
			.iter()
			.flat_map(|(action, entry)| {
				entry
					.patterns
					.iter()
					.map(move |pattern| (action.clone(), pattern.clone()))
			})
			.collect()
	}

	pub fn len(&self) -> usize {
		self.actions.len()
	}

	pub fn is_empty(&self) -> bool {
		self.actions.is_empty()
	}
}

impl fmt::Debug for RuleSet {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_map()
			.entries(self.actions.iter().map(|(a, e)| (a, &e.patterns)))
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	fn ok_handler(_: &AdminModule, _: &mut AdminRequest) -> AdminResult<AdminResponse> {
		Ok(AdminResponse::redirect("/"))
	}

	#[rstest]
	fn test_same_action_never_duplicates() {
		// Arrange
		let mut rules = RuleSet::new();

		// Act
		let first = rules.add(Rule::new("/", "list", ok_handler));
		let second = rules.add(Rule::new("/page/<page>", "list", ok_handler));
		let third = rules.add(Rule::new("/", "list", ok_handler));

		// Assert
		assert_eq!(first, RuleChange::Added);
		assert_eq!(second, RuleChange::PatternAdded);
		assert_eq!(third, RuleChange::Replaced);
		assert_eq!(rules.len(), 1);
		assert_eq!(rules.get("list").unwrap().patterns(), ["/", "/page/<page>"]);
	}

	#[rstest]
	fn test_routes_follow_registration_order() {
		// Arrange
		let mut rules = RuleSet::new();
		rules.add(Rule::new("/", "list", ok_handler));
		rules.add(Rule::new("/new", "new", ok_handler));
		rules.add(Rule::new("/page/<page>", "list", ok_handler));

		// Act
		let routes = rules.routes();

		// Assert
		assert_eq!(
			routes,
			vec![
				("list".to_string(), "/".to_string()),
				("list".to_string(), "/page/<page>".to_string()),
				("new".to_string(), "/new".to_string()),
			]
		);
		assert_eq!(rules.first().map(|(a, _)| a), Some("list"));
	}

	#[rstest]
	#[case("/", vec![])]
	#[case("/<pk>/edit", vec!["pk"])]
	#[case("/<section>/<pk>", vec!["section", "pk"])]
	fn test_pattern_params(#[case] pattern: &str, #[case] expected: Vec<&str>) {
		assert_eq!(pattern_params(pattern), expected);
	}

	#[rstest]
	fn test_wrap_unknown_action() {
		// Arrange
		let mut rules = RuleSet::new();

		// Act
		let wrapped = rules.wrap("missing", |h| h);

		// Assert
		assert!(!wrapped);
	}
}
