//! Field values and dotted field paths over admin objects

use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;

/// A displayable, sortable and searchable field value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
	Null,
	Bool(bool),
	Int(i64),
	Float(f64),
	Text(String),
}

impl FieldValue {
	pub fn is_null(&self) -> bool {
		matches!(self, FieldValue::Null)
	}

	/// Case-insensitive substring test on the displayed value
	///
	/// # Examples
	///
	/// ```
	/// use dashed_admin::FieldValue;
	///
	/// assert!(FieldValue::from("Lettres de mon moulin").contains("lettres"));
	/// assert!(FieldValue::Int(1939).contains("93"));
	/// assert!(!FieldValue::Null.contains(""));
	/// ```
	pub fn contains(&self, needle: &str) -> bool {
		if self.is_null() {
			return false;
		}
		self.to_string()
			.to_lowercase()
			.contains(&needle.to_lowercase())
	}

	fn rank(&self) -> u8 {
		match self {
			FieldValue::Null => 0,
			FieldValue::Bool(_) => 1,
			FieldValue::Int(_) | FieldValue::Float(_) => 2,
			FieldValue::Text(_) => 3,
		}
	}

	/// Total order used for sorting: null, booleans, numbers, then text
	pub fn sort_cmp(&self, other: &Self) -> Ordering {
		match (self, other) {
			(FieldValue::Bool(a), FieldValue::Bool(b)) => a.cmp(b),
			(FieldValue::Int(a), FieldValue::Int(b)) => a.cmp(b),
			(FieldValue::Int(a), FieldValue::Float(b)) => (*a as f64).total_cmp(b),
			(FieldValue::Float(a), FieldValue::Int(b)) => a.total_cmp(&(*b as f64)),
			(FieldValue::Float(a), FieldValue::Float(b)) => a.total_cmp(b),
			(FieldValue::Text(a), FieldValue::Text(b)) => a.cmp(b),
			_ => self.rank().cmp(&other.rank()),
		}
	}
}

impl fmt::Display for FieldValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			FieldValue::Null => Ok(()),
			FieldValue::Bool(value) => write!(f, "{value}"),
			FieldValue::Int(value) => write!(f, "{value}"),
			FieldValue::Float(value) => write!(f, "{value}"),
			FieldValue::Text(value) => f.write_str(value),
		}
	}
}

impl From<&str> for FieldValue {
	fn from(value: &str) -> Self {
		FieldValue::Text(value.to_string())
	}
}

impl From<String> for FieldValue {
	fn from(value: String) -> Self {
		FieldValue::Text(value)
	}
}

impl From<i64> for FieldValue {
	fn from(value: i64) -> Self {
		FieldValue::Int(value)
	}
}

impl From<u32> for FieldValue {
	fn from(value: u32) -> Self {
		FieldValue::Int(i64::from(value))
	}
}

impl From<i32> for FieldValue {
	fn from(value: i32) -> Self {
		FieldValue::Int(i64::from(value))
	}
}

impl From<f64> for FieldValue {
	fn from(value: f64) -> Self {
		FieldValue::Float(value)
	}
}

impl From<bool> for FieldValue {
	fn from(value: bool) -> Self {
		FieldValue::Bool(value)
	}
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
	fn from(value: Option<T>) -> Self {
		value.map(Into::into).unwrap_or(FieldValue::Null)
	}
}

/// A record the admin can list, edit and delete
///
/// Relations are exposed as borrowed objects so dotted paths such as
/// `author.name` can be followed without reflection.
pub trait AdminObject: Send + Sync + 'static {
	/// Primary key, `None` until the object is first saved
	fn pk(&self) -> Option<String>;

	/// Value of a direct field
	fn field(&self, name: &str) -> Option<FieldValue>;

	/// Related object reachable through `name`
	fn relation(&self, _name: &str) -> Option<&dyn AdminObject> {
		None
	}
}

/// Dotted path from an object to one of its (possibly related) fields
///
/// # Examples
///
/// ```
/// use dashed_admin::{AdminObject, FieldPath, FieldValue};
///
/// struct Author { name: String }
/// struct Book { title: String, author: Option<Author> }
///
/// impl AdminObject for Author {
///     fn pk(&self) -> Option<String> { None }
///     fn field(&self, name: &str) -> Option<FieldValue> {
///         (name == "name").then(|| self.name.clone().into())
///     }
/// }
///
/// impl AdminObject for Book {
///     fn pk(&self) -> Option<String> { None }
///     fn field(&self, name: &str) -> Option<FieldValue> {
///         (name == "title").then(|| self.title.clone().into())
///     }
///     fn relation(&self, name: &str) -> Option<&dyn AdminObject> {
///         match name {
///             "author" => self.author.as_ref().map(|a| a as &dyn AdminObject),
///             _ => None,
///         }
///     }
/// }
///
/// let book = Book { title: "Noces".into(), author: Some(Author { name: "Camus".into() }) };
/// assert_eq!(FieldPath::new("author.name").resolve(&book), Some(FieldValue::from("Camus")));
///
/// let orphan = Book { title: "Anonymous".into(), author: None };
/// assert_eq!(FieldPath::new("author.name").resolve(&orphan), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldPath {
	segments: Vec<String>,
}

impl FieldPath {
	pub fn new(path: &str) -> Self {
		Self {
			segments: path
				.split('.')
				.filter(|segment| !segment.is_empty())
				.map(str::to_string)
				.collect(),
		}
	}

	pub fn segments(&self) -> &[String] {
		&self.segments
	}

	/// Follow relations then read the last segment; `None` when any step is absent
	pub fn resolve(&self, object: &dyn AdminObject) -> Option<FieldValue> {
		let (field, relations) = self.segments.split_last()?;
		let mut current = object;
		for relation in relations {
			current = current.relation(relation)?;
		}
		current.field(field)
	}
}

impl fmt::Display for FieldPath {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.segments.join("."))
	}
}

impl From<&str> for FieldPath {
	fn from(path: &str) -> Self {
		FieldPath::new(path)
	}
}
