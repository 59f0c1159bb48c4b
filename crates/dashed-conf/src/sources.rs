//! Configuration sources for layered admin settings
//!
//! Sources are merged in priority order (environment variables > TOML
//! files/strings > defaults). Every source yields a flat map of top-level keys;
//! nested tables (such as `pagination`) are carried as JSON objects and merged
//! key by key.

use indexmap::IndexMap;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;

/// Trait for configuration sources
pub trait ConfigSource: Send + Sync {
	/// Load configuration from this source
	fn load(&self) -> Result<IndexMap<String, Value>, SourceError>;

	/// Get the priority of this source (higher = more important)
	fn priority(&self) -> u8;

	/// Get a description of this source
	fn description(&self) -> String;
}

/// Error type for configuration sources
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	#[error("Parse error: {0}")]
	Parse(String),

	#[error("TOML error: {0}")]
	Toml(#[from] toml::de::Error),

	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),
}

/// Separator used in environment variable names for nested keys.
///
/// `DASHED_PAGINATION__LEFT_EDGE=3` sets `pagination.left_edge`.
pub const NESTED_SEPARATOR: &str = "__";

/// Environment variable configuration source
pub struct EnvSource {
	prefix: String,
	vars: Option<Vec<(String, String)>>,
}

impl EnvSource {
	/// Create a source reading process environment variables starting with `prefix`
	///
	/// # Examples
	///
	/// ```
	/// use dashed_conf::sources::EnvSource;
	///
	/// let source = EnvSource::new("DASHED_");
	/// ```
	pub fn new(prefix: impl Into<String>) -> Self {
		Self {
			prefix: prefix.into(),
			vars: None,
		}
	}

	/// Use an explicit set of variables instead of the process environment
	///
	/// # Examples
	///
	/// ```
	/// use dashed_conf::sources::{ConfigSource, EnvSource};
	///
	/// let source = EnvSource::new("DASHED_")
	///     .with_vars(vec![("DASHED_PER_PAGE".to_string(), "25".to_string())]);
	/// let values = source.load().unwrap();
	/// assert_eq!(values["per_page"], 25);
	/// ```
	pub fn with_vars(mut self, vars: impl IntoIterator<Item = (String, String)>) -> Self {
		self.vars = Some(vars.into_iter().collect());
		self
	}

	fn parse_value(raw: &str) -> Value {
		let trimmed = raw.trim();
		if let Ok(num) = trimmed.parse::<i64>() {
			Value::Number(num.into())
		} else {
			match trimmed.to_lowercase().as_str() {
				"true" | "yes" | "on" => Value::Bool(true),
				"false" | "no" | "off" => Value::Bool(false),
				_ => Value::String(raw.to_string()),
			}
		}
	}
}

impl ConfigSource for EnvSource {
	fn load(&self) -> Result<IndexMap<String, Value>, SourceError> {
		let vars: Vec<(String, String)> = match &self.vars {
			Some(vars) => vars.clone(),
			None => std::env::vars().collect(),
		};

		let mut config: IndexMap<String, Value> = IndexMap::new();
		for (key, value) in vars {
			let Some(clean_key) = key.strip_prefix(&self.prefix) else {
				continue;
			};
			let lower_key = clean_key.to_lowercase();
			let parsed_value = Self::parse_value(&value);

			match lower_key.split_once(NESTED_SEPARATOR) {
				Some((table, field)) => {
					let entry = config
						.entry(table.to_string())
						.or_insert_with(|| Value::Object(Default::default()));
					if let Value::Object(map) = entry {
						map.insert(field.to_string(), parsed_value);
					}
				}
				None => {
					config.insert(lower_key, parsed_value);
				}
			}
		}

		Ok(config)
	}

	fn priority(&self) -> u8 {
		100 // Highest priority
	}

	fn description(&self) -> String {
		format!("Environment variables (prefix: {})", self.prefix)
	}
}

/// TOML file configuration source
///
/// A missing file yields no values, so an optional `dashed.toml` can be listed
/// unconditionally.
pub struct TomlFileSource {
	path: PathBuf,
}

impl TomlFileSource {
	/// Create a new TOML file configuration source
	///
	/// # Examples
	///
	/// ```
	/// use dashed_conf::sources::TomlFileSource;
	///
	/// let source = TomlFileSource::new("dashed.toml");
	/// ```
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}
}

impl ConfigSource for TomlFileSource {
	fn load(&self) -> Result<IndexMap<String, Value>, SourceError> {
		if !self.path.exists() {
			tracing::debug!(path = %self.path.display(), "settings file not found, skipping");
			return Ok(IndexMap::new());
		}

		let content = fs::read_to_string(&self.path)?;
		toml_to_map(&content)
	}

	fn priority(&self) -> u8 {
		50 // Medium priority
	}

	fn description(&self) -> String {
		format!("TOML file: {}", self.path.display())
	}
}

/// Inline TOML configuration source
pub struct TomlStrSource {
	content: String,
}

impl TomlStrSource {
	/// Create a source from TOML text
	///
	/// # Examples
	///
	/// ```
	/// use dashed_conf::sources::{ConfigSource, TomlStrSource};
	///
	/// let source = TomlStrSource::new("title = \"Library\"");
	/// assert_eq!(source.load().unwrap()["title"], "Library");
	/// ```
	pub fn new(content: impl Into<String>) -> Self {
		Self {
			content: content.into(),
		}
	}
}

impl ConfigSource for TomlStrSource {
	fn load(&self) -> Result<IndexMap<String, Value>, SourceError> {
		toml_to_map(&self.content)
	}

	fn priority(&self) -> u8 {
		50
	}

	fn description(&self) -> String {
		"TOML string".to_string()
	}
}

/// Default values configuration source
pub struct DefaultSource {
	values: IndexMap<String, Value>,
}

impl DefaultSource {
	/// Create an empty default values source
	pub fn new() -> Self {
		Self {
			values: IndexMap::new(),
		}
	}

	/// Add a default value
	///
	/// # Examples
	///
	/// ```
	/// use dashed_conf::sources::DefaultSource;
	/// use serde_json::Value;
	///
	/// let source = DefaultSource::new().with_value("per_page", Value::from(20));
	/// ```
	pub fn with_value(mut self, key: impl Into<String>, value: Value) -> Self {
		self.values.insert(key.into(), value);
		self
	}
}

impl Default for DefaultSource {
	fn default() -> Self {
		Self::new()
	}
}

impl ConfigSource for DefaultSource {
	fn load(&self) -> Result<IndexMap<String, Value>, SourceError> {
		Ok(self.values.clone())
	}

	fn priority(&self) -> u8 {
		0 // Lowest priority
	}

	fn description(&self) -> String {
		"Default values".to_string()
	}
}

fn toml_to_map(content: &str) -> Result<IndexMap<String, Value>, SourceError> {
	let toml_value: toml::Value = toml::from_str(content)?;
	let json_value = serde_json::to_value(toml_value)?;

	let map = json_value
		.as_object()
		.ok_or_else(|| SourceError::Parse("Expected table at root".to_string()))?;

	Ok(map.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
}

/// Merge `overlay` into `base`, descending into nested objects.
pub(crate) fn merge_into(base: &mut serde_json::Map<String, Value>, overlay: IndexMap<String, Value>) {
	for (key, value) in overlay {
		if let Value::Object(incoming) = &value
			&& let Some(Value::Object(existing)) = base.get_mut(&key)
		{
			for (nested_key, nested_value) in incoming {
				existing.insert(nested_key.clone(), nested_value.clone());
			}
			continue;
		}
		base.insert(key, value);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("10", Value::from(10))]
	#[case("true", Value::Bool(true))]
	#[case("off", Value::Bool(false))]
	#[case("/backoffice", Value::from("/backoffice"))]
	fn test_env_value_parsing(#[case] raw: &str, #[case] expected: Value) {
		// Act
		let parsed = EnvSource::parse_value(raw);

		// Assert
		assert_eq!(parsed, expected);
	}

	#[rstest]
	fn test_env_source_nests_double_underscore_keys() {
		// Arrange
		let source = EnvSource::new("DASHED_").with_vars(vec![
			("DASHED_PAGINATION__LEFT_EDGE".to_string(), "3".to_string()),
			("DASHED_PAGINATION__RIGHT_EDGE".to_string(), "1".to_string()),
			("OTHER_PER_PAGE".to_string(), "99".to_string()),
		]);

		// Act
		let values = source.load().unwrap();

		// Assert
		assert_eq!(values.len(), 1);
		assert_eq!(values["pagination"]["left_edge"], 3);
		assert_eq!(values["pagination"]["right_edge"], 1);
	}

	#[rstest]
	fn test_missing_toml_file_yields_nothing() {
		// Arrange
		let source = TomlFileSource::new("/nonexistent/dashed.toml");

		// Act
		let values = source.load().unwrap();

		// Assert
		assert!(values.is_empty());
	}

	#[rstest]
	fn test_toml_source_rejects_invalid_syntax() {
		// Arrange
		let source = TomlStrSource::new("per_page = ");

		// Act
		let result = source.load();

		// Assert
		assert!(matches!(result, Err(SourceError::Toml(_))));
	}

	#[rstest]
	fn test_merge_descends_into_tables() {
		// Arrange
		let mut base = serde_json::json!({
			"per_page": 10,
			"pagination": { "left_edge": 2, "right_edge": 2 }
		})
		.as_object()
		.cloned()
		.unwrap();
		let mut overlay = IndexMap::new();
		overlay.insert(
			"pagination".to_string(),
			serde_json::json!({ "left_edge": 4 }),
		);

		// Act
		merge_into(&mut base, overlay);

		// Assert
		assert_eq!(base["per_page"], 10);
		assert_eq!(base["pagination"]["left_edge"], 4);
		assert_eq!(base["pagination"]["right_edge"], 2);
	}
}
