//! Object admin: the CRUD engine bound to a store and a form factory

use crate::config::{ObjectAdminConfig, OrderDirection};
use crate::crud::{CrudBackable, ObjectAction};
use crate::field::AdminObject;
use crate::form::{FormFactory, ObjectForm};
use crate::pagination::PageWindow;
use crate::query::{ListQuery, QueryOrder, SearchFilter};
use crate::store::ObjectStore;
use crate::views::{DeleteView, FormView, ListView};
use dashed_conf::AdminSettings;
use dashed_core::{AdminModule, AdminResult, ConfigurationError, Routable, Rule};
use std::sync::Arc;

/// Generic object admin module
///
/// Serves the list, new, edit and delete screens of one collection. Register
/// it with [`AdminSite::register_module`](dashed_core::AdminSite::register_module).
pub struct ObjectAdmin<S: ObjectStore> {
	config: ObjectAdminConfig,
	store: S,
	forms: Arc<dyn FormFactory<S::Object>>,
	window: PageWindow,
}

impl<S: ObjectStore> ObjectAdmin<S> {
	pub fn new(
		config: ObjectAdminConfig,
		store: S,
		forms: impl FormFactory<S::Object> + 'static,
	) -> Self {
		Self {
			config,
			store,
			forms: Arc::new(forms),
			window: PageWindow::default(),
		}
	}

	/// Take the pager window from site settings
	pub fn with_settings(mut self, settings: &AdminSettings) -> Self {
		self.window = settings.pagination.into();
		self
	}

	pub fn with_page_window(mut self, window: PageWindow) -> Self {
		self.window = window;
		self
	}

	pub fn config(&self) -> &ObjectAdminConfig {
		&self.config
	}

	pub fn store(&self) -> &S {
		&self.store
	}

	pub fn page_window(&self) -> PageWindow {
		self.window
	}

	/// Form bound to `object`
	pub fn form_for(&self, object: &S::Object) -> Box<dyn ObjectForm<S::Object>> {
		self.forms.form_for(object)
	}

	/// OR filter over the searchable fields, `None` for an empty search
	pub fn search_filter(&self, search: Option<&str>) -> Option<SearchFilter> {
		let needle = search.filter(|s| !s.is_empty())?;
		if self.config.searchable_fields().is_empty() {
			return None;
		}
		let fields = self
			.config
			.searchable_fields()
			.iter()
			.filter_map(|name| self.config.list_field(name))
			.map(|field| field.column.clone())
			.collect();
		Some(SearchFilter {
			needle: needle.to_string(),
			fields,
		})
	}

	/// Ordering to apply, falling back to the configured default
	pub fn resolve_order(
		&self,
		field: Option<&str>,
		direction: Option<OrderDirection>,
	) -> AdminResult<Option<QueryOrder>> {
		let (field, direction) = match (field, direction) {
			(Some(field), Some(direction)) => (field.to_string(), direction),
			_ => match self.config.order_by() {
				Some(order_by) => (order_by.field.clone(), order_by.direction),
				None => return Ok(None),
			},
		};
		let list_field = self
			.config
			.list_field(&field)
			.ok_or_else(|| ConfigurationError::UnknownOrderField(field.clone()))?;
		Ok(Some(QueryOrder {
			path: list_field.column.clone(),
			field,
			direction,
		}))
	}
}

impl<S: ObjectStore> CrudBackable for ObjectAdmin<S> {
	type Object = S::Object;

	fn list(
		&self,
		search: Option<&str>,
		order_field: Option<&str>,
		order_direction: Option<OrderDirection>,
		offset: usize,
		limit: Option<usize>,
	) -> AdminResult<Vec<S::Object>> {
		let query = ListQuery {
			filter: self.search_filter(search),
			order: self.resolve_order(order_field, order_direction)?,
			offset,
			limit: Some(limit.unwrap_or(self.config.per_page())),
		};
		tracing::debug!(?query, "listing objects");
		self.store.list(&query)
	}

	fn count(&self, search: Option<&str>) -> AdminResult<u64> {
		self.store.count(self.search_filter(search).as_ref())
	}

	fn get(&self, pk: &str) -> AdminResult<Option<S::Object>> {
		self.store.get(pk)
	}

	fn create(&self) -> S::Object {
		self.store.create()
	}

	fn save(&self, object: &mut S::Object) -> AdminResult<()> {
		self.store.save(object)?;
		tracing::info!(pk = ?object.pk(), "saved object");
		Ok(())
	}

	fn delete(&self, object: &S::Object) -> AdminResult<()> {
		self.store.delete(object)?;
		tracing::info!(pk = ?object.pk(), "deleted object");
		Ok(())
	}

	fn actions_for(&self, module: &AdminModule, object: &S::Object) -> AdminResult<Vec<ObjectAction>> {
		let Some(pk) = object.pk() else {
			return Ok(Vec::new());
		};
		let params = [("pk", pk.as_str())];
		Ok(vec![
			ObjectAction::new("edit", "edit", "Edit object", module.url_for("edit", params)?),
			ObjectAction::new("delete", "delete", "Delete object", module.url_for("delete", params)?),
		])
	}
}

impl<S: ObjectStore> Routable for ObjectAdmin<S> {
	fn default_rules(self: Arc<Self>) -> Vec<Rule> {
		vec![
			Rule::new("/", "list", ListView::new(Arc::clone(&self))),
			Rule::new("/page/<page>", "list", ListView::new(Arc::clone(&self))),
			Rule::new("/new", "new", FormView::new(Arc::clone(&self))),
			Rule::new("/<pk>/edit", "edit", FormView::new(Arc::clone(&self))),
			Rule::new("/<pk>/delete", "delete", DeleteView::new(self)),
		]
	}
}
