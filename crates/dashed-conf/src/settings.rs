//! Admin settings and the layered builder that produces them

use crate::sources::{ConfigSource, EnvSource, SourceError, TomlFileSource, TomlStrSource, merge_into};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default prefix for environment overrides.
pub const ENV_PREFIX: &str = "DASHED_";

/// Errors raised while building settings
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
	#[error("Failed to load {source_name}: {error}")]
	Source {
		source_name: String,
		#[source]
		error: SourceError,
	},

	#[error("Invalid settings value: {0}")]
	Deserialize(#[from] serde_json::Error),

	#[error("Invalid setting `{key}`: {message}")]
	Invalid { key: &'static str, message: String },
}

/// Window sizes of the compact pager shown under object lists.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageWindowSettings {
	/// Pages always shown at the start
	pub left_edge: u64,
	/// Pages shown before the current page
	pub left_current: u64,
	/// Pages shown after the current page
	pub right_current: u64,
	/// Pages always shown at the end
	pub right_edge: u64,
}

impl Default for PageWindowSettings {
	fn default() -> Self {
		Self {
			left_edge: 2,
			left_current: 2,
			right_current: 5,
			right_edge: 2,
		}
	}
}

/// Settings of one admin site
///
/// # Examples
///
/// ```
/// use dashed_conf::AdminSettings;
///
/// let settings = AdminSettings::default();
/// assert_eq!(settings.url_prefix, "/admin");
/// assert_eq!(settings.endpoint, "admin");
/// assert_eq!(settings.per_page, 10);
/// assert_eq!(settings.failure_code, 403);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminSettings {
	/// URL prefix the admin is mounted under
	pub url_prefix: String,
	/// Endpoint namespace used for route names
	pub endpoint: String,
	/// Site title
	pub title: String,
	/// Default rows per list page for object admins that do not set one
	pub per_page: usize,
	/// Compact pager window
	pub pagination: PageWindowSettings,
	/// Status returned when a security check fails and the rule sets no code
	pub failure_code: u16,
}

impl Default for AdminSettings {
	fn default() -> Self {
		Self {
			url_prefix: "/admin".to_string(),
			endpoint: "admin".to_string(),
			title: "dashed".to_string(),
			per_page: 10,
			pagination: PageWindowSettings::default(),
			failure_code: 403,
		}
	}
}

impl AdminSettings {
	/// Start a layered settings builder
	pub fn builder() -> SettingsBuilder {
		SettingsBuilder::new()
	}

	/// Parse settings from TOML text on top of the defaults
	///
	/// # Examples
	///
	/// ```
	/// use dashed_conf::AdminSettings;
	///
	/// let settings = AdminSettings::from_toml_str(r#"
	/// url_prefix = "/backoffice"
	/// per_page = 25
	///
	/// [pagination]
	/// right_current = 3
	/// "#).unwrap();
	///
	/// assert_eq!(settings.url_prefix, "/backoffice");
	/// assert_eq!(settings.per_page, 25);
	/// assert_eq!(settings.pagination.right_current, 3);
	/// assert_eq!(settings.pagination.left_edge, 2);
	/// ```
	pub fn from_toml_str(content: &str) -> Result<Self, SettingsError> {
		SettingsBuilder::new().add_source(TomlStrSource::new(content)).build()
	}

	/// Reject values the admin cannot work with
	pub fn validate(&self) -> Result<(), SettingsError> {
		if !self.url_prefix.starts_with('/') {
			return Err(SettingsError::Invalid {
				key: "url_prefix",
				message: format!("must start with '/', got {:?}", self.url_prefix),
			});
		}
		if self.endpoint.is_empty() || self.endpoint.contains('.') {
			return Err(SettingsError::Invalid {
				key: "endpoint",
				message: format!("must be a non-empty name without dots, got {:?}", self.endpoint),
			});
		}
		if self.per_page == 0 {
			return Err(SettingsError::Invalid {
				key: "per_page",
				message: "must be positive".to_string(),
			});
		}
		if !(400..=599).contains(&self.failure_code) {
			return Err(SettingsError::Invalid {
				key: "failure_code",
				message: format!("must be an HTTP error status, got {}", self.failure_code),
			});
		}
		Ok(())
	}
}

/// Builder merging configuration sources by priority
///
/// # Examples
///
/// ```
/// use dashed_conf::{AdminSettings, SettingsBuilder};
/// use dashed_conf::sources::{EnvSource, TomlStrSource};
///
/// let settings = SettingsBuilder::new()
///     .add_source(TomlStrSource::new("per_page = 25"))
///     .add_source(EnvSource::new("DASHED_").with_vars(vec![
///         ("DASHED_PER_PAGE".to_string(), "50".to_string()),
///     ]))
///     .build()
///     .unwrap();
///
/// assert_eq!(settings.per_page, 50);
/// ```
#[derive(Default)]
pub struct SettingsBuilder {
	sources: Vec<Box<dyn ConfigSource>>,
}

impl SettingsBuilder {
	/// Create a builder that starts from [`AdminSettings::default`]
	pub fn new() -> Self {
		Self::default()
	}

	/// Add a configuration source
	pub fn add_source(mut self, source: impl ConfigSource + 'static) -> Self {
		self.sources.push(Box::new(source));
		self
	}

	/// Add an optional TOML settings file
	pub fn add_toml_file(self, path: impl Into<PathBuf>) -> Self {
		self.add_source(TomlFileSource::new(path))
	}

	/// Add process environment overrides with the default `DASHED_` prefix
	pub fn add_env(self) -> Self {
		self.add_source(EnvSource::new(ENV_PREFIX))
	}

	/// Merge every source and validate the result
	pub fn build(mut self) -> Result<AdminSettings, SettingsError> {
		// Stable sort keeps registration order among equal priorities.
		self.sources.sort_by_key(|source| source.priority());

		let mut merged = match serde_json::to_value(AdminSettings::default())? {
			serde_json::Value::Object(map) => map,
			_ => serde_json::Map::new(),
		};

		for source in &self.sources {
			let values = source.load().map_err(|error| SettingsError::Source {
				source_name: source.description(),
				error,
			})?;
			tracing::debug!(
				source = %source.description(),
				keys = values.len(),
				"merging settings source"
			);
			merge_into(&mut merged, values);
		}

		let settings: AdminSettings = serde_json::from_value(serde_json::Value::Object(merged))?;
		settings.validate()?;
		Ok(settings)
	}
}
