//! Addressable admin nodes
//!
//! A node is a navigation container: it has an identity (its dotted path),
//! titles for menus and breadcrumbs, and a URL path built from its ancestors.
//! Nodes never own their parent; the [`PathRegistry`](crate::path::PathRegistry)
//! owns every node and links them by path.

use crate::error::ConfigurationError;
use serde::Serialize;

/// Separator between path segments.
pub const PATH_SEPARATOR: char = '.';

/// Capability of anything that sits at a position in the admin tree
pub trait Addressable {
	/// Dotted hierarchical path, unique in the site
	fn path(&self) -> &str;

	/// Last path segment
	fn endpoint(&self) -> &str;

	/// Title used in navigation and breadcrumbs
	fn short_title(&self) -> &str;

	/// Long title used in page headers
	fn title(&self) -> &str;

	/// URL path relative to the admin mount point
	fn url_path(&self) -> &str;

	/// Path of the parent node, `None` for roots
	fn parent_path(&self) -> Option<&str>;

	/// Number of ancestors
	fn depth(&self) -> usize {
		self.path().matches(PATH_SEPARATOR).count()
	}
}

/// What a caller provides to register a node
///
/// # Examples
///
/// ```
/// use dashed_core::node::NodeSpec;
///
/// let spec = NodeSpec::new("/library", "library", "library").with_title("Library management");
/// assert_eq!(spec.title(), "Library management");
///
/// let untitled = NodeSpec::new("/books", "books", "books");
/// assert_eq!(untitled.title(), "books");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeSpec {
	/// URL fragment appended to the parent's URL path
	pub url_prefix: String,
	/// Path segment
	pub endpoint: String,
	pub short_title: String,
	/// Long title; defaults to the short title
	pub long_title: Option<String>,
}

impl NodeSpec {
	pub fn new(
		url_prefix: impl Into<String>,
		endpoint: impl Into<String>,
		short_title: impl Into<String>,
	) -> Self {
		Self {
			url_prefix: url_prefix.into(),
			endpoint: endpoint.into(),
			short_title: short_title.into(),
			long_title: None,
		}
	}

	pub fn with_title(mut self, title: impl Into<String>) -> Self {
		self.long_title = Some(title.into());
		self
	}

	/// Effective long title
	pub fn title(&self) -> &str {
		self.long_title.as_deref().unwrap_or(&self.short_title)
	}

	pub(crate) fn validate(&self) -> Result<(), ConfigurationError> {
		if self.endpoint.is_empty() || self.endpoint.contains(PATH_SEPARATOR) {
			return Err(ConfigurationError::InvalidEndpoint(self.endpoint.clone()));
		}
		Ok(())
	}
}

/// A registered node
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Node {
	path: String,
	endpoint: String,
	short_title: String,
	title: String,
	url_prefix: String,
	url_path: String,
	parent: Option<String>,
}

impl Node {
	/// Build a node below `parent`, computing its path and URL path
	pub(crate) fn attach(spec: NodeSpec, parent: Option<&Node>) -> Self {
		let title = spec.title().to_string();
		let (path, url_path, parent_path) = match parent {
			Some(parent) => (
				format!("{}{}{}", parent.path, PATH_SEPARATOR, spec.endpoint),
				format!("{}{}", parent.url_path, spec.url_prefix),
				Some(parent.path.clone()),
			),
			None => (spec.endpoint.clone(), spec.url_prefix.clone(), None),
		};
		Self {
			path,
			endpoint: spec.endpoint,
			short_title: spec.short_title,
			title,
			url_prefix: spec.url_prefix,
			url_path,
			parent: parent_path,
		}
	}

	/// URL fragment this node adds to its parent's
	pub fn url_prefix(&self) -> &str {
		&self.url_prefix
	}

	pub fn is_root(&self) -> bool {
		self.parent.is_none()
	}
}

impl Addressable for Node {
	fn path(&self) -> &str {
		&self.path
	}

	fn endpoint(&self) -> &str {
		&self.endpoint
	}

	fn short_title(&self) -> &str {
		&self.short_title
	}

	fn title(&self) -> &str {
		&self.title
	}

	fn url_path(&self) -> &str {
		&self.url_path
	}

	fn parent_path(&self) -> Option<&str> {
		self.parent.as_deref()
	}
}

/// Join URL fragments, collapsing the duplicate slashes fragments produce
///
/// # Examples
///
/// ```
/// use dashed_core::node::join_url;
///
/// assert_eq!(join_url(&["/admin", "/", "/"]), "/admin/");
/// assert_eq!(join_url(&["/admin", "/books", "/<pk>/edit"]), "/admin/books/<pk>/edit");
/// ```
pub fn join_url(parts: &[&str]) -> String {
	let mut url = String::new();
	for part in parts {
		for ch in part.chars() {
			if ch == '/' && url.ends_with('/') {
				continue;
			}
			url.push(ch);
		}
	}
	if url.is_empty() {
		url.push('/');
	}
	url
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_child_path_and_url_are_concatenated() {
		// Arrange
		let parent = Node::attach(NodeSpec::new("/parent", "first_node", "first node"), None);

		// Act
		let child = Node::attach(
			NodeSpec::new("/child", "child_node", "child node"),
			Some(&parent),
		);

		// Assert
		assert_eq!(child.path(), "first_node.child_node");
		assert_eq!(child.url_path(), "/parent/child");
		assert_eq!(child.parent_path(), Some("first_node"));
		assert_eq!(child.depth(), 1);
		assert!(parent.is_root());
	}

	#[rstest]
	#[case("")]
	#[case("books.reviews")]
	fn test_invalid_endpoints(#[case] endpoint: &str) {
		// Arrange
		let spec = NodeSpec::new("/x", endpoint, "x");

		// Act
		let result = spec.validate();

		// Assert
		assert_eq!(
			result,
			Err(ConfigurationError::InvalidEndpoint(endpoint.to_string()))
		);
	}
}
