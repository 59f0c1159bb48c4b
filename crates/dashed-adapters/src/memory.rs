//! In-memory object store
//!
//! Records live in an insertion-ordered map keyed by primary key. Clones of a
//! store share the same records, so a test or a demo can keep a handle while
//! the admin owns another.
//!
//! ## Example
//!
//! ```
//! use dashed_adapters::{MemoryRecord, MemoryStore};
//! use dashed_admin::{AdminObject, FieldValue, ListQuery, ObjectStore};
//!
//! #[derive(Clone, Default)]
//! struct Tag { id: Option<u64>, name: String }
//!
//! impl AdminObject for Tag {
//!     fn pk(&self) -> Option<String> { self.id.map(|id| id.to_string()) }
//!     fn field(&self, name: &str) -> Option<FieldValue> {
//!         (name == "name").then(|| self.name.clone().into())
//!     }
//! }
//!
//! impl MemoryRecord for Tag {
//!     fn assign_pk(&mut self, id: u64) { self.id = Some(id); }
//! }
//!
//! let store = MemoryStore::<Tag>::new();
//! let mut tag = Tag { id: None, name: "rust".into() };
//! store.save(&mut tag).unwrap();
//!
//! assert_eq!(tag.id, Some(1));
//! assert_eq!(store.list(&ListQuery::default()).unwrap().len(), 1);
//! ```

use dashed_admin::{AdminObject, FieldValue, ListQuery, ObjectStore, OrderDirection, SearchFilter};
use dashed_core::{AdminError, AdminResult};
use indexmap::IndexMap;
use parking_lot::RwLock;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// A record the memory store can assign keys to
pub trait MemoryRecord: AdminObject + Clone {
	/// Give a new record its generated primary key
	fn assign_pk(&mut self, id: u64);
}

type Factory<T> = Arc<dyn Fn() -> T + Send + Sync>;

/// Thread-safe in-memory [`ObjectStore`]
pub struct MemoryStore<T: MemoryRecord> {
	records: Arc<RwLock<IndexMap<String, T>>>,
	next_id: Arc<AtomicU64>,
	factory: Factory<T>,
}

impl<T: MemoryRecord + Default> MemoryStore<T> {
	/// Empty store creating new records with `T::default()`
	pub fn new() -> Self {
		Self::with_factory(T::default)
	}
}

impl<T: MemoryRecord + Default> Default for MemoryStore<T> {
	fn default() -> Self {
		Self::new()
	}
}

impl<T: MemoryRecord> MemoryStore<T> {
	/// Empty store creating new records with `factory`
	pub fn with_factory<F>(factory: F) -> Self
	where
		F: Fn() -> T + Send + Sync + 'static,
	{
		Self {
			records: Arc::new(RwLock::new(IndexMap::new())),
			next_id: Arc::new(AtomicU64::new(0)),
			factory: Arc::new(factory),
		}
	}

	/// Store seeded with `records`, keys assigned to those without one
	pub fn from_records<I>(records: I) -> AdminResult<Self>
	where
		I: IntoIterator<Item = T>,
		T: Default,
	{
		let store = Self::new();
		for mut record in records {
			store.insert(&mut record)?;
		}
		Ok(store)
	}

	pub fn len(&self) -> usize {
		self.records.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.records.read().is_empty()
	}

	/// Snapshot of every record in insertion order
	pub fn records(&self) -> Vec<T> {
		self.records.read().values().cloned().collect()
	}

	fn insert(&self, record: &mut T) -> AdminResult<()> {
		let mut records = self.records.write();
		let pk = match record.pk() {
			Some(pk) => pk,
			None => {
				let pk = loop {
					let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
					if !records.contains_key(&id.to_string()) {
						break id;
					}
				};
				record.assign_pk(pk);
				record
					.pk()
					.ok_or_else(|| AdminError::Backend("record ignored its generated key".to_string()))?
			}
		};
		if let Ok(id) = pk.parse::<u64>() {
			self.next_id.fetch_max(id, Ordering::SeqCst);
		}
		records.insert(pk, record.clone());
		Ok(())
	}

	fn matching(&self, filter: Option<&SearchFilter>) -> Vec<T> {
		self.records
			.read()
			.values()
			.filter(|record| filter.is_none_or(|filter| filter.matches(*record)))
			.cloned()
			.collect()
	}
}

impl<T: MemoryRecord> Clone for MemoryStore<T> {
	fn clone(&self) -> Self {
		Self {
			records: Arc::clone(&self.records),
			next_id: Arc::clone(&self.next_id),
			factory: Arc::clone(&self.factory),
		}
	}
}

impl<T: MemoryRecord> ObjectStore for MemoryStore<T> {
	type Object = T;

	fn list(&self, query: &ListQuery) -> AdminResult<Vec<T>> {
		let mut records = self.matching(query.filter.as_ref());
		if let Some(order) = &query.order {
			let mut keyed: Vec<(FieldValue, T)> = records
				.into_iter()
				.map(|record| (order.path.resolve(&record).unwrap_or(FieldValue::Null), record))
				.collect();
			keyed.sort_by(|(a, _), (b, _)| match order.direction {
				OrderDirection::Asc => a.sort_cmp(b),
				OrderDirection::Desc => b.sort_cmp(a),
			});
			records = keyed.into_iter().map(|(_, record)| record).collect();
		}
		Ok(query.window(records))
	}

	fn count(&self, filter: Option<&SearchFilter>) -> AdminResult<u64> {
		if filter.is_none() {
			return Ok(self.len() as u64);
		}
		Ok(self.matching(filter).len() as u64)
	}

	fn get(&self, pk: &str) -> AdminResult<Option<T>> {
		Ok(self.records.read().get(pk).cloned())
	}

	fn create(&self) -> T {
		(self.factory)()
	}

	fn save(&self, object: &mut T) -> AdminResult<()> {
		self.insert(object)?;
		tracing::trace!(pk = ?object.pk(), "stored record in memory");
		Ok(())
	}

	fn delete(&self, object: &T) -> AdminResult<()> {
		let pk = object
			.pk()
			.ok_or_else(|| AdminError::Backend("cannot delete an unsaved record".to_string()))?;
		if self.records.write().shift_remove(&pk).is_none() {
			return Err(AdminError::Backend(format!("record '{pk}' is not stored")));
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use dashed_admin::{FieldPath, QueryOrder};
	use proptest::prelude::*;
	use rstest::{fixture, rstest};

	#[derive(Debug, Clone, Default, PartialEq)]
	struct Note {
		id: Option<u64>,
		body: String,
		rank: i64,
	}

	impl AdminObject for Note {
		fn pk(&self) -> Option<String> {
			self.id.map(|id| id.to_string())
		}

		fn field(&self, name: &str) -> Option<FieldValue> {
			match name {
				"body" => Some(self.body.clone().into()),
				"rank" => Some(self.rank.into()),
				_ => None,
			}
		}
	}

	impl MemoryRecord for Note {
		fn assign_pk(&mut self, id: u64) {
			self.id = Some(id);
		}
	}

	fn note(body: &str, rank: i64) -> Note {
		Note {
			id: None,
			body: body.to_string(),
			rank,
		}
	}

	#[fixture]
	fn store() -> MemoryStore<Note> {
		MemoryStore::from_records([note("alpha", 3), note("beta", 1), note("gamma", 2)]).unwrap()
	}

	fn bodies(notes: &[Note]) -> Vec<&str> {
		notes.iter().map(|n| n.body.as_str()).collect()
	}

	#[rstest]
	fn test_save_assigns_sequential_keys(store: MemoryStore<Note>) {
		// Arrange
		let mut fresh = note("delta", 0);

		// Act
		store.save(&mut fresh).unwrap();

		// Assert
		assert_eq!(fresh.id, Some(4));
		assert_eq!(store.len(), 4);
	}

	#[rstest]
	fn test_explicit_keys_are_skipped_by_generator() {
		// Arrange
		let store = MemoryStore::<Note>::new();
		let mut pinned = Note {
			id: Some(7),
			..note("pinned", 0)
		};
		store.save(&mut pinned).unwrap();

		// Act
		let mut next = note("next", 0);
		store.save(&mut next).unwrap();

		// Assert
		assert_eq!(next.id, Some(8));
	}

	#[rstest]
	fn test_save_updates_in_place(store: MemoryStore<Note>) {
		// Arrange
		let mut beta = store.get("2").unwrap().unwrap();
		beta.body = "BETA".into();

		// Act
		store.save(&mut beta).unwrap();

		// Assert
		assert_eq!(bodies(&store.records()), vec!["alpha", "BETA", "gamma"]);
	}

	#[rstest]
	#[case(OrderDirection::Asc, vec!["beta", "gamma", "alpha"])]
	#[case(OrderDirection::Desc, vec!["alpha", "gamma", "beta"])]
	fn test_list_orders_by_field(
		store: MemoryStore<Note>,
		#[case] direction: OrderDirection,
		#[case] expected: Vec<&str>,
	) {
		// Arrange
		let query = ListQuery {
			order: Some(QueryOrder {
				field: "rank".into(),
				path: FieldPath::new("rank"),
				direction,
			}),
			..ListQuery::default()
		};

		// Act
		let notes = store.list(&query).unwrap();

		// Assert
		assert_eq!(bodies(&notes), expected);
	}

	#[rstest]
	fn test_filter_and_window(store: MemoryStore<Note>) {
		// Arrange
		let filter = SearchFilter {
			needle: "A".into(),
			fields: vec![FieldPath::new("body")],
		};
		let query = ListQuery {
			filter: Some(filter.clone()),
			order: None,
			offset: 1,
			limit: Some(1),
		};

		// Act
		let notes = store.list(&query).unwrap();

		// Assert
		assert_eq!(store.count(Some(&filter)).unwrap(), 3);
		assert_eq!(bodies(&notes), vec!["beta"]);
	}

	#[rstest]
	fn test_delete(store: MemoryStore<Note>) {
		// Arrange
		let gamma = store.get("3").unwrap().unwrap();

		// Act
		store.delete(&gamma).unwrap();
		let again = store.delete(&gamma);

		// Assert
		assert!(store.get("3").unwrap().is_none());
		assert!(matches!(again, Err(AdminError::Backend(_))));
		assert!(store.delete(&note("unsaved", 0)).is_err());
	}

	#[rstest]
	fn test_clones_share_records(store: MemoryStore<Note>) {
		// Arrange
		let handle = store.clone();

		// Act
		handle.save(&mut note("shared", 9)).unwrap();

		// Assert
		assert_eq!(store.len(), 4);
	}

	#[rstest]
	fn test_custom_factory() {
		// Arrange
		let store = MemoryStore::with_factory(|| note("draft", 5));

		// Act
		let created = store.create();

		// Assert
		assert_eq!(created.body, "draft");
		assert!(store.is_empty());
	}

	proptest! {
		#[test]
		fn prop_window_matches_slice(ranks in proptest::collection::vec(-50i64..50, 0..40), offset in 0usize..45, limit in 0usize..15) {
			let store = MemoryStore::from_records(ranks.iter().map(|r| note("n", *r))).unwrap();
			let all = store.list(&ListQuery::default()).unwrap();
			let page = store
				.list(&ListQuery { offset, limit: Some(limit), ..ListQuery::default() })
				.unwrap();

			let expected: Vec<Note> = all.iter().skip(offset).take(limit).cloned().collect();
			prop_assert_eq!(page, expected);
			prop_assert_eq!(store.count(None).unwrap(), ranks.len() as u64);
		}
	}
}
