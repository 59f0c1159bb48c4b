//! Registry mapping dotted paths to nodes

use crate::error::{AdminError, AdminResult, ConfigurationError};
use crate::node::{Addressable, Node, NodeSpec, PATH_SEPARATOR};
use indexmap::IndexMap;

#[derive(Debug, Clone)]
struct Entry {
	node: Node,
	children: Vec<String>,
}

/// Owner of every node of an admin site
///
/// Nodes are kept in registration order. Children are owned by their entry as
/// an ordered list of paths; parents are referenced by path only.
///
/// # Examples
///
/// ```
/// use dashed_core::node::{Addressable, NodeSpec};
/// use dashed_core::path::PathRegistry;
///
/// let mut registry = PathRegistry::new();
/// let library = registry.register(NodeSpec::new("/library", "library", "library"), None).unwrap();
/// let books = registry
///     .register(NodeSpec::new("/books", "books", "books"), Some(&library))
///     .unwrap();
///
/// assert_eq!(books, "library.books");
/// assert_eq!(registry.resolve(&books).unwrap().url_path(), "/library/books");
/// ```
#[derive(Debug, Clone, Default)]
pub struct PathRegistry {
	entries: IndexMap<String, Entry>,
}

impl PathRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Path a node built from `spec` would get under `parent`
	///
	/// Fails exactly when [`register`](Self::register) would, without mutating.
	pub fn plan(&self, spec: &NodeSpec, parent: Option<&str>) -> AdminResult<String> {
		spec.validate()?;
		let path = match parent {
			Some(parent_path) => {
				if !self.entries.contains_key(parent_path) {
					return Err(ConfigurationError::UnknownParent(parent_path.to_string()).into());
				}
				format!("{}{}{}", parent_path, PATH_SEPARATOR, spec.endpoint)
			}
			None => spec.endpoint.clone(),
		};
		if self.entries.contains_key(&path) {
			return Err(ConfigurationError::DuplicatePath(path).into());
		}
		Ok(path)
	}

	/// Register a node and return its path
	///
	/// The path is `parent + "." + endpoint`, or the endpoint for roots.
	pub fn register(&mut self, spec: NodeSpec, parent: Option<&str>) -> AdminResult<String> {
		let path = self.plan(&spec, parent)?;
		let node = Node::attach(spec, parent.and_then(|p| self.entries.get(p)).map(|e| &e.node));
		debug_assert_eq!(node.path(), path);

		if let Some(parent_path) = parent
			&& let Some(parent_entry) = self.entries.get_mut(parent_path)
		{
			parent_entry.children.push(path.clone());
		}
		self.entries.insert(
			path.clone(),
			Entry {
				node,
				children: Vec::new(),
			},
		);

		tracing::info!(path = %path, "registered admin node");
		Ok(path)
	}

	/// Node registered at `path`
	pub fn resolve(&self, path: &str) -> AdminResult<&Node> {
		self.get(path)
			.ok_or_else(|| AdminError::NotFound(format!("admin node '{path}'")))
	}

	pub fn get(&self, path: &str) -> Option<&Node> {
		self.entries.get(path).map(|entry| &entry.node)
	}

	pub fn contains(&self, path: &str) -> bool {
		self.entries.contains_key(path)
	}

	/// Ancestors of `path`, root first, excluding the node itself
	///
	/// # Examples
	///
	/// ```
	/// use dashed_core::node::{Addressable, NodeSpec};
	/// use dashed_core::path::PathRegistry;
	///
	/// let mut registry = PathRegistry::new();
	/// let root = registry.register(NodeSpec::new("/root", "root", "root"), None).unwrap();
	/// let child = registry.register(NodeSpec::new("/child", "child", "child"), Some(&root)).unwrap();
	/// let leaf = registry.register(NodeSpec::new("/leaf", "leaf", "leaf"), Some(&child)).unwrap();
	///
	/// let paths: Vec<_> = registry.ancestors(&leaf).unwrap().iter().map(|n| n.path()).collect();
	/// assert_eq!(paths, vec!["root", "root.child"]);
	/// ```
	pub fn ancestors(&self, path: &str) -> AdminResult<Vec<&Node>> {
		self.resolve(path)?;

		let mut ancestors = Vec::new();
		let mut end = 0;
		while let Some(offset) = path[end..].find(PATH_SEPARATOR) {
			end += offset;
			ancestors.push(self.resolve(&path[..end])?);
			end += PATH_SEPARATOR.len_utf8();
		}
		Ok(ancestors)
	}

	/// Direct children of `path`, in registration order
	pub fn children(&self, path: &str) -> AdminResult<Vec<&Node>> {
		let entry = self
			.entries
			.get(path)
			.ok_or_else(|| AdminError::NotFound(format!("admin node '{path}'")))?;
		Ok(entry
			.children
			.iter()
			.filter_map(|child| self.get(child))
			.collect())
	}

	/// Parent of `path`, `None` for roots
	pub fn parent(&self, path: &str) -> AdminResult<Option<&Node>> {
		let node = self.resolve(path)?;
		Ok(node.parent_path().and_then(|parent| self.get(parent)))
	}

	/// Root nodes, in registration order
	pub fn roots(&self) -> Vec<&Node> {
		self.iter().filter(|node| node.is_root()).collect()
	}

	/// Every node, in registration order
	pub fn iter(&self) -> impl Iterator<Item = &Node> {
		self.entries.values().map(|entry| &entry.node)
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::{fixture, rstest};

	#[fixture]
	fn registry() -> PathRegistry {
		let mut registry = PathRegistry::new();
		let root = registry
			.register(NodeSpec::new("/root", "first_root_node", "first node"), None)
			.unwrap();
		let child = registry
			.register(
				NodeSpec::new("/child", "first_child_node", "child node"),
				Some(&root),
			)
			.unwrap();
		registry
			.register(
				NodeSpec::new("/child", "second_child_node", "child node"),
				Some(&child),
			)
			.unwrap();
		registry
	}

	#[rstest]
	fn test_resolve_round_trips_every_path(registry: PathRegistry) {
		// Arrange
		let paths: Vec<String> = registry.iter().map(|n| n.path().to_string()).collect();

		// Act & Assert
		for path in paths {
			assert_eq!(registry.resolve(&path).unwrap().path(), path);
		}
	}

	#[rstest]
	fn test_children_two_levels(registry: PathRegistry) {
		// Act
		let root_children = registry.children("first_root_node").unwrap();
		let child_children = registry.children("first_root_node.first_child_node").unwrap();

		// Assert
		assert_eq!(root_children.len(), 1);
		assert_eq!(root_children[0].path(), "first_root_node.first_child_node");
		assert_eq!(child_children.len(), 1);
		assert_eq!(
			child_children[0].path(),
			"first_root_node.first_child_node.second_child_node"
		);
		assert_eq!(child_children[0].url_path(), "/root/child/child");
	}

	#[rstest]
	fn test_unknown_parent_leaves_registry_untouched(mut registry: PathRegistry) {
		// Arrange
		let before = registry.len();

		// Act
		let result = registry.register(NodeSpec::new("/x", "orphan", "orphan"), Some("undefined"));

		// Assert
		assert!(matches!(
			result,
			Err(AdminError::Configuration(ConfigurationError::UnknownParent(ref p))) if p == "undefined"
		));
		assert_eq!(registry.len(), before);
		assert!(!registry.contains("undefined.orphan"));
	}

	#[rstest]
	fn test_duplicate_path_is_rejected(mut registry: PathRegistry) {
		// Act
		let result = registry.register(NodeSpec::new("/again", "first_root_node", "again"), None);

		// Assert
		assert!(matches!(
			result,
			Err(AdminError::Configuration(ConfigurationError::DuplicatePath(_)))
		));
		assert_eq!(registry.roots().len(), 1);
	}

	#[rstest]
	fn test_resolve_missing_path_is_not_found(registry: PathRegistry) {
		// Act
		let result = registry.resolve("nope");

		// Assert
		assert!(matches!(result, Err(AdminError::NotFound(_))));
	}

	#[rstest]
	fn test_ancestors_of_root_is_empty(registry: PathRegistry) {
		// Act
		let ancestors = registry.ancestors("first_root_node").unwrap();

		// Assert
		assert!(ancestors.is_empty());
	}

	#[rstest]
	fn test_parent_lookup(registry: PathRegistry) {
		// Act
		let parent = registry
			.parent("first_root_node.first_child_node")
			.unwrap()
			.map(|n| n.path().to_string());

		// Assert
		assert_eq!(parent.as_deref(), Some("first_root_node"));
	}
}
