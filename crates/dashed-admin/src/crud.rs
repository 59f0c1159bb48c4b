//! CRUD capability of object admins

use crate::config::OrderDirection;
use dashed_core::{AdminModule, AdminResult};
use serde::Serialize;

/// An operation offered on one object of a list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObjectAction {
	pub name: String,
	pub label: String,
	pub description: String,
	/// Where the operation is performed
	pub url: String,
}

impl ObjectAction {
	pub fn new(
		name: impl Into<String>,
		label: impl Into<String>,
		description: impl Into<String>,
		url: impl Into<String>,
	) -> Self {
		Self {
			name: name.into(),
			label: label.into(),
			description: description.into(),
			url: url.into(),
		}
	}
}

/// List, fetch, create, save and delete over a backing collection
pub trait CrudBackable: Send + Sync {
	type Object;

	/// Filtered, ordered page of objects
	///
	/// Ordering falls back to the configured default unless both
	/// `order_field` and `order_direction` are given; `limit` defaults to the
	/// configured page size.
	fn list(
		&self,
		search: Option<&str>,
		order_field: Option<&str>,
		order_direction: Option<OrderDirection>,
		offset: usize,
		limit: Option<usize>,
	) -> AdminResult<Vec<Self::Object>>;

	/// Number of objects matching `search`
	fn count(&self, search: Option<&str>) -> AdminResult<u64>;

	/// Object stored under `pk`; `None` when absent
	fn get(&self, pk: &str) -> AdminResult<Option<Self::Object>>;

	/// New unsaved object
	fn create(&self) -> Self::Object;

	/// Persist a new or existing object
	fn save(&self, object: &mut Self::Object) -> AdminResult<()>;

	/// Remove an object permanently
	fn delete(&self, object: &Self::Object) -> AdminResult<()>;

	/// Operations offered on `object`, edit and delete by default
	fn actions_for(&self, module: &AdminModule, object: &Self::Object) -> AdminResult<Vec<ObjectAction>>;
}
