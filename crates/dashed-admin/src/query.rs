//! Store-agnostic list queries

use crate::config::OrderDirection;
use crate::field::{AdminObject, FieldPath};

/// Logical OR of "field contains text" conditions
///
/// Stores translate it to their own query language; [`matches`](Self::matches)
/// evaluates it in memory with case-insensitive containment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchFilter {
	pub needle: String,
	pub fields: Vec<FieldPath>,
}

impl SearchFilter {
	pub fn matches(&self, object: &dyn AdminObject) -> bool {
		self.fields.iter().any(|path| {
			path.resolve(object)
				.is_some_and(|value| value.contains(&self.needle))
		})
	}
}

/// Ordering of a list query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryOrder {
	/// List field name the ordering came from
	pub field: String,
	pub path: FieldPath,
	pub direction: OrderDirection,
}

/// A filtered, ordered, windowed list request to a store
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
	pub filter: Option<SearchFilter>,
	pub order: Option<QueryOrder>,
	pub offset: usize,
	pub limit: Option<usize>,
}

impl ListQuery {
	/// Apply offset then limit to an already filtered and ordered iterator
	pub fn window<T>(&self, items: impl IntoIterator<Item = T>) -> Vec<T> {
		let skipped = items.into_iter().skip(self.offset);
		match self.limit {
			Some(limit) => skipped.take(limit).collect(),
			None => skipped.collect(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::field::FieldValue;
	use rstest::rstest;

	struct Row(&'static str, &'static str);

	impl AdminObject for Row {
		fn pk(&self) -> Option<String> {
			None
		}

		fn field(&self, name: &str) -> Option<FieldValue> {
			match name {
				"a" => Some(self.0.into()),
				"b" => Some(self.1.into()),
				_ => None,
			}
		}
	}

	#[rstest]
	#[case(Row("Lettres", "x"), true)]
	#[case(Row("x", "LETTRES de mon moulin"), true)]
	#[case(Row("x", "y"), false)]
	fn test_filter_is_an_or(#[case] row: Row, #[case] expected: bool) {
		// Arrange
		let filter = SearchFilter {
			needle: "lettres".into(),
			fields: vec![FieldPath::new("a"), FieldPath::new("b")],
		};

		// Act & Assert
		assert_eq!(filter.matches(&row), expected);
	}

	#[rstest]
	fn test_window() {
		// Arrange
		let query = ListQuery {
			offset: 2,
			limit: Some(2),
			..ListQuery::default()
		};

		// Act
		let items = query.window(1..=10);

		// Assert
		assert_eq!(items, vec![3, 4]);
	}
}
