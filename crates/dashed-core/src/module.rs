//! Admin modules: nodes that own URL rules
//!
//! A module kind implements [`Routable`] to supply its default rules. When the
//! site registers it, the kind is wrapped in an [`AdminModule`] which keeps the
//! node identity, the action table and the URL helpers.

use crate::error::{AdminResult, ConfigurationError};
use crate::http::{AdminRequest, AdminResponse, Params};
use crate::node::{Addressable, Node, join_url};
use crate::rules::{Handler, Rule, RuleChange, RuleSet, pattern_params};
use crate::security::{Check, SecuredHandler};
use http::StatusCode;
use parking_lot::RwLock;
use serde_json::{Value, json};
use std::fmt;
use std::sync::Arc;

/// A module kind that contributes URL rules
///
/// # Examples
///
/// ```
/// use dashed_core::AdminResult;
/// use dashed_core::http::{AdminRequest, AdminResponse};
/// use dashed_core::module::{AdminModule, Routable};
/// use dashed_core::rules::Rule;
/// use std::sync::Arc;
///
/// struct Stats;
///
/// impl Routable for Stats {
///     fn default_rules(self: Arc<Self>) -> Vec<Rule> {
///         vec![Rule::new(
///             "/",
///             "show",
///             |module: &AdminModule, _: &mut AdminRequest| -> AdminResult<AdminResponse> {
///                 Ok(AdminResponse::render("stats.html", module.context()))
///             },
///         )]
///     }
/// }
/// ```
pub trait Routable: Send + Sync + 'static {
	/// Rules installed when the module is registered
	///
	/// Must not be empty.
	fn default_rules(self: Arc<Self>) -> Vec<Rule>;
}

/// Lifecycle of a module
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleState {
	Constructed,
	RegisteringRules,
	/// Rules installed and routes published; only the action table may still grow
	Ready,
}

/// A registered module
pub struct AdminModule {
	node: Node,
	mount: String,
	namespace: String,
	rules: RwLock<RuleSet>,
	state: RwLock<ModuleState>,
}

impl AdminModule {
	/// Wrap `node`, served below `mount` and named within `namespace`
	pub(crate) fn new(node: Node, mount: impl Into<String>, namespace: impl Into<String>) -> Self {
		Self {
			node,
			mount: mount.into(),
			namespace: namespace.into(),
			rules: RwLock::new(RuleSet::new()),
			state: RwLock::new(ModuleState::Constructed),
		}
	}

	pub fn node(&self) -> &Node {
		&self.node
	}

	pub fn state(&self) -> ModuleState {
		*self.state.read()
	}

	/// Install the initial rules
	pub(crate) fn install(&self, rules: Vec<Rule>) -> AdminResult<()> {
		if rules.is_empty() {
			return Err(ConfigurationError::NoRules(self.node.path().to_string()).into());
		}
		*self.state.write() = ModuleState::RegisteringRules;
		{
			let mut table = self.rules.write();
			for rule in rules {
				table.add(rule);
			}
		}
		*self.state.write() = ModuleState::Ready;
		Ok(())
	}

	/// Add a rule after installation
	pub(crate) fn add_rule(&self, rule: Rule) -> RuleChange {
		self.rules.write().add(rule)
	}

	/// Router endpoint name of `action`
	///
	/// Formatted as `{admin endpoint}.{module endpoint}_{action}`.
	pub fn endpoint_name(&self, action: &str) -> String {
		format!("{}.{}_{}", self.namespace, self.node.endpoint(), action)
	}

	/// Absolute URL of the module root, before any rule pattern
	pub fn base_url(&self) -> String {
		join_url(&[&self.mount, self.node.url_path()])
	}

	/// Absolute route pattern of a rule pattern
	pub fn route_pattern(&self, pattern: &str) -> String {
		join_url(&[&self.mount, self.node.url_path(), pattern])
	}

	/// Primary URL: the first registered action, without parameters
	pub fn url(&self) -> AdminResult<String> {
		let first = self
			.rules
			.read()
			.first()
			.map(|(action, _)| action.to_string())
			.ok_or_else(|| ConfigurationError::NoPrimaryUrl(self.node.path().to_string()))?;
		self.action_url(&first)
	}

	/// URL of a parameterless action
	pub fn action_url(&self, action: &str) -> AdminResult<String> {
		self.url_for(action, Params::new())
	}

	/// URL of `action` built from `params`
	///
	/// Among the patterns whose placeholders are all provided, the one using
	/// the most parameters wins, earliest first on ties. Extra parameters are
	/// appended as a query string.
	pub fn url_for<I, K, V>(&self, action: &str, params: I) -> AdminResult<String>
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<String>,
	{
		let mut params: Params = params
			.into_iter()
			.map(|(k, v)| (k.into(), v.into()))
			.collect();

		let patterns = {
			let rules = self.rules.read();
			rules
				.get(action)
				.map(|entry| entry.patterns().to_vec())
				.ok_or_else(|| self.unknown_action(action))?
		};

		let pattern = patterns
			.iter()
			.filter(|pattern| {
				pattern_params(pattern)
					.iter()
					.all(|name| params.contains_key(*name))
			})
			.rev()
			.max_by_key(|pattern| pattern_params(pattern).len())
			.ok_or_else(|| {
				let missing = patterns
					.first()
					.and_then(|pattern| {
						pattern_params(pattern)
							.into_iter()
							.find(|name| !params.contains_key(*name))
							.map(str::to_string)
					})
					.unwrap_or_default();
				ConfigurationError::MissingRouteParam {
					endpoint: self.endpoint_name(action),
					param: missing,
				}
			})?;

		let mut url = self.route_pattern(&substitute(pattern, &mut params));
		if !params.is_empty() {
			let pairs: Vec<(String, String)> = params.into_iter().collect();
			let query = serde_urlencoded::to_string(pairs)
				.map_err(|e| ConfigurationError::Invalid(e.to_string()))?;
			url.push('?');
			url.push_str(&query);
		}
		Ok(url)
	}

	/// Guard one action with its own check
	pub fn secure_endpoint<F>(&self, action: &str, check: F, failure_code: StatusCode) -> AdminResult<()>
	where
		F: Fn(&AdminRequest) -> bool + Send + Sync + 'static,
	{
		let check: Check = Arc::new(check);
		let wrapped = self.rules.write().wrap(action, |inner| {
			Arc::new(SecuredHandler::new(inner, check, failure_code)) as Arc<dyn Handler>
		});
		if !wrapped {
			return Err(self.unknown_action(action).into());
		}
		tracing::debug!(module = %self.node.path(), action = %action, "secured endpoint");
		Ok(())
	}

	/// Run the handler of `action`
	pub fn invoke(&self, action: &str, request: &mut AdminRequest) -> AdminResult<AdminResponse> {
		let handler = {
			let rules = self.rules.read();
			rules
				.get(action)
				.map(|entry| entry.handler())
				.ok_or_else(|| self.unknown_action(action))?
		};
		handler.handle(self, request)
	}

	/// Action names in registration order
	pub fn actions(&self) -> Vec<String> {
		self.rules.read().actions().map(str::to_string).collect()
	}

	/// `(action, pattern)` pairs in registration order
	pub fn routes(&self) -> Vec<(String, String)> {
		self.rules.read().routes()
	}

	pub fn has_action(&self, action: &str) -> bool {
		self.rules.read().get(action).is_some()
	}

	/// Template context describing this module
	pub fn context(&self) -> Value {
		json!({
			"path": self.node.path(),
			"endpoint": self.node.endpoint(),
			"short_title": self.node.short_title(),
			"title": self.node.title(),
			"url": self.url().ok(),
		})
	}

	fn unknown_action(&self, action: &str) -> ConfigurationError {
		ConfigurationError::UnknownAction {
			module: self.node.path().to_string(),
			action: action.to_string(),
		}
	}
}

fn substitute(pattern: &str, params: &mut Params) -> String {
	pattern
		.split('/')
		.map(|segment| {
			match segment.strip_prefix('<').and_then(|s| s.strip_suffix('>')) {
				Some(name) => params
					.shift_remove(name)
					.map(|value| urlencoding::encode(&value).into_owned())
					.unwrap_or_default(),
				None => segment.to_string(),
			}
		})
		.collect::<Vec<_>>()
		.join("/")
}

impl Addressable for AdminModule {
	fn path(&self) -> &str {
		self.node.path()
	}

	fn endpoint(&self) -> &str {
		self.node.endpoint()
	}

	fn short_title(&self) -> &str {
		self.node.short_title()
	}

	fn title(&self) -> &str {
		self.node.title()
	}

	fn url_path(&self) -> &str {
		self.node.url_path()
	}

	fn parent_path(&self) -> Option<&str> {
		self.node.parent_path()
	}
}

impl fmt::Debug for AdminModule {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("AdminModule")
			.field("path", &self.node.path())
			.field("state", &self.state())
			.field("rules", &*self.rules.read())
			.finish()
	}
}
