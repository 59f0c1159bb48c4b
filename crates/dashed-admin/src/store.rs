//! Backing store contract

use crate::field::AdminObject;
use crate::query::{ListQuery, SearchFilter};
use dashed_core::AdminResult;

/// Data access an object admin depends on
///
/// The admin never talks to a storage engine directly. Stores report their
/// own failures as [`AdminError::Backend`](dashed_core::AdminError::Backend);
/// the admin does not retry.
pub trait ObjectStore: Send + Sync + 'static {
	type Object: AdminObject + Clone;

	/// Objects matching `query.filter`, ordered, then windowed
	fn list(&self, query: &ListQuery) -> AdminResult<Vec<Self::Object>>;

	/// Number of objects matching `filter`, ignoring any window
	fn count(&self, filter: Option<&SearchFilter>) -> AdminResult<u64>;

	/// Object stored under `pk`
	fn get(&self, pk: &str) -> AdminResult<Option<Self::Object>>;

	/// New unsaved object with defaults
	fn create(&self) -> Self::Object;

	/// Insert or update `object`; assigns its primary key when new
	fn save(&self, object: &mut Self::Object) -> AdminResult<()>;

	/// Remove `object` permanently
	fn delete(&self, object: &Self::Object) -> AdminResult<()>;
}
