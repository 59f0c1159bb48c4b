//! Object admin configuration
//!
//! Built once per admin instance and validated eagerly: an inconsistent
//! configuration never reaches a request.

use crate::field::FieldPath;
use dashed_conf::AdminSettings;
use dashed_core::ConfigurationError;
use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Default template of the list screen
pub const LIST_TEMPLATE: &str = "dashed/list.html";
/// Default template of the create and edit screens
pub const EDIT_TEMPLATE: &str = "dashed/edit.html";

/// A column of the list screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListField {
	pub label: String,
	/// Projection used for display, search and ordering
	pub column: FieldPath,
}

impl ListField {
	pub fn new(label: impl Into<String>, column: impl Into<FieldPath>) -> Self {
		Self {
			label: label.into(),
			column: column.into(),
		}
	}
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderDirection {
	#[default]
	Asc,
	Desc,
}

impl OrderDirection {
	pub fn as_str(self) -> &'static str {
		match self {
			OrderDirection::Asc => "asc",
			OrderDirection::Desc => "desc",
		}
	}

	pub fn reversed(self) -> Self {
		match self {
			OrderDirection::Asc => OrderDirection::Desc,
			OrderDirection::Desc => OrderDirection::Asc,
		}
	}
}

impl fmt::Display for OrderDirection {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for OrderDirection {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_ascii_lowercase().as_str() {
			"asc" => Ok(OrderDirection::Asc),
			"desc" => Ok(OrderDirection::Desc),
			other => Err(format!("unknown order direction '{other}'")),
		}
	}
}

/// Default ordering of a list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
	pub field: String,
	pub direction: OrderDirection,
}

/// Configuration of one object admin
///
/// # Examples
///
/// ```
/// use dashed_admin::{ObjectAdminConfig, OrderDirection};
///
/// let config = ObjectAdminConfig::builder()
///     .list_field("title", "Title", "title")
///     .list_field("author.name", "Author", "author.name")
///     .searchable_fields(vec!["title", "author.name"])
///     .order_by("title", OrderDirection::Asc)
///     .per_page(25)
///     .build()
///     .unwrap();
///
/// assert_eq!(config.per_page(), 25);
/// assert_eq!(config.list_fields().keys().collect::<Vec<_>>(), vec!["title", "author.name"]);
/// ```
#[derive(Debug, Clone)]
pub struct ObjectAdminConfig {
	list_fields: IndexMap<String, ListField>,
	searchable_fields: Vec<String>,
	order_by: Option<OrderBy>,
	per_page: usize,
	list_title: String,
	new_title: String,
	edit_title: String,
	list_template: String,
	edit_template: String,
}

impl ObjectAdminConfig {
	pub fn builder() -> ObjectAdminConfigBuilder {
		ObjectAdminConfigBuilder::default()
	}

	/// Builder with one list field per column, labelled by the column name
	///
	/// # Examples
	///
	/// ```
	/// use dashed_admin::ObjectAdminConfig;
	///
	/// let config = ObjectAdminConfig::from_columns(["id", "title", "year"]).build().unwrap();
	/// assert_eq!(config.list_fields()["year"].label, "year");
	/// ```
	pub fn from_columns<I, C>(columns: I) -> ObjectAdminConfigBuilder
	where
		I: IntoIterator<Item = C>,
		C: AsRef<str>,
	{
		columns
			.into_iter()
			.fold(ObjectAdminConfigBuilder::default(), |builder, column| {
				let column = column.as_ref();
				builder.list_field(column, column, column)
			})
	}

	/// Columns in display order
	pub fn list_fields(&self) -> &IndexMap<String, ListField> {
		&self.list_fields
	}

	pub fn list_field(&self, name: &str) -> Option<&ListField> {
		self.list_fields.get(name)
	}

	pub fn searchable_fields(&self) -> &[String] {
		&self.searchable_fields
	}

	pub fn order_by(&self) -> Option<&OrderBy> {
		self.order_by.as_ref()
	}

	pub fn per_page(&self) -> usize {
		self.per_page
	}

	pub fn list_title(&self) -> &str {
		&self.list_title
	}

	pub fn new_title(&self) -> &str {
		&self.new_title
	}

	pub fn edit_title(&self) -> &str {
		&self.edit_title
	}

	pub fn list_template(&self) -> &str {
		&self.list_template
	}

	pub fn edit_template(&self) -> &str {
		&self.edit_template
	}
}

/// Builder for [`ObjectAdminConfig`]
#[derive(Debug, Default)]
pub struct ObjectAdminConfigBuilder {
	list_fields: IndexMap<String, ListField>,
	searchable_fields: Vec<String>,
	order_by: Option<OrderBy>,
	per_page: Option<usize>,
	list_title: Option<String>,
	new_title: Option<String>,
	edit_title: Option<String>,
	list_template: Option<String>,
	edit_template: Option<String>,
}

impl ObjectAdminConfigBuilder {
	/// Append a list field; the name is the key used by search and ordering
	pub fn list_field(
		mut self,
		name: impl Into<String>,
		label: impl Into<String>,
		column: impl Into<FieldPath>,
	) -> Self {
		self.list_fields
			.insert(name.into(), ListField::new(label, column));
		self
	}

	pub fn searchable_fields(mut self, fields: Vec<impl Into<String>>) -> Self {
		self.searchable_fields = fields.into_iter().map(Into::into).collect();
		self
	}

	pub fn order_by(mut self, field: impl Into<String>, direction: OrderDirection) -> Self {
		self.order_by = Some(OrderBy {
			field: field.into(),
			direction,
		});
		self
	}

	/// Rows per page; defaults to 10
	pub fn per_page(mut self, per_page: usize) -> Self {
		self.per_page = Some(per_page);
		self
	}

	/// Take the site-wide page size unless one was set explicitly
	pub fn site_defaults(mut self, settings: &AdminSettings) -> Self {
		self.per_page.get_or_insert(settings.per_page);
		self
	}

	pub fn list_title(mut self, title: impl Into<String>) -> Self {
		self.list_title = Some(title.into());
		self
	}

	pub fn new_title(mut self, title: impl Into<String>) -> Self {
		self.new_title = Some(title.into());
		self
	}

	pub fn edit_title(mut self, title: impl Into<String>) -> Self {
		self.edit_title = Some(title.into());
		self
	}

	pub fn list_template(mut self, template: impl Into<String>) -> Self {
		self.list_template = Some(template.into());
		self
	}

	pub fn edit_template(mut self, template: impl Into<String>) -> Self {
		self.edit_template = Some(template.into());
		self
	}

	/// Validate and build
	///
	/// Fails when no list field is declared, `per_page` is zero, or a
	/// searchable or order field is not a list field.
	pub fn build(self) -> Result<ObjectAdminConfig, ConfigurationError> {
		if self.list_fields.is_empty() {
			return Err(ConfigurationError::NoListFields);
		}
		let per_page = self.per_page.unwrap_or(10);
		if per_page == 0 {
			return Err(ConfigurationError::InvalidPerPage);
		}
		if let Some(field) = self
			.searchable_fields
			.iter()
			.find(|field| !self.list_fields.contains_key(*field))
		{
			return Err(ConfigurationError::UnknownSearchField(field.clone()));
		}
		if let Some(order_by) = &self.order_by
			&& !self.list_fields.contains_key(&order_by.field)
		{
			return Err(ConfigurationError::UnknownOrderField(order_by.field.clone()));
		}

		Ok(ObjectAdminConfig {
			list_fields: self.list_fields,
			searchable_fields: self.searchable_fields,
			order_by: self.order_by,
			per_page,
			list_title: self.list_title.unwrap_or_else(|| "list".to_string()),
			new_title: self.new_title.unwrap_or_else(|| "new object".to_string()),
			edit_title: self.edit_title.unwrap_or_else(|| "edit object".to_string()),
			list_template: self
				.list_template
				.unwrap_or_else(|| LIST_TEMPLATE.to_string()),
			edit_template: self
				.edit_template
				.unwrap_or_else(|| EDIT_TEMPLATE.to_string()),
		})
	}
}
