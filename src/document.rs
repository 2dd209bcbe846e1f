//! The document adapter contract.

use crate::error::DocumentError;
use core::{fmt::Debug, hash::Hash};

/// A tree of elements that data can be bound onto.
///
/// Implemented by [`VirtualDocument`](`crate::tree::VirtualDocument`) and, on `wasm32`, by `web::WebDocument`.
/// Any backend that can query, read and write elements like a browser DOM is substitutable.
///
/// Methods take `&self`. Backends that own their nodes need interior mutability,
/// and must not be re-entered from within their own methods.
///
/// Nodes that are removed, or replaced by new content, may be released by the backend right away.
/// Handles into them shouldn't be used afterwards.
pub trait Document {
	/// An element handle. Equal handles must refer to the same element.
	type Element: Clone + PartialEq + Debug;

	/// A hashable stand-in for an element, used to remember which elements a merge touched.
	///
	/// Two handles must have equal identities iff they refer to the same element.
	type Identity: Eq + Hash;

	fn identity(&self, element: &Self::Element) -> Self::Identity;

	/// Whether `node` refers to an element that can serve as a binding root.
	fn is_element(&self, node: &Self::Element) -> bool;

	/// The first descendant of `scope` (in document order) that matches `selector`.
	///
	/// # Errors
	///
	/// Iff `selector` can't be evaluated.
	fn query_first(&self, scope: &Self::Element, selector: &str) -> Result<Option<Self::Element>, DocumentError>;

	/// All descendants of `scope` that match `selector`, in document order.
	///
	/// # Errors
	///
	/// Iff `selector` can't be evaluated.
	fn query_all(&self, scope: &Self::Element, selector: &str) -> Result<Vec<Self::Element>, DocumentError>;

	fn attribute(&self, element: &Self::Element, name: &str) -> Option<String>;

	fn has_attribute(&self, element: &Self::Element, name: &str) -> bool {
		self.attribute(element, name).is_some()
	}

	/// # Errors
	///
	/// Iff `name` isn't a valid attribute name or `element` is invalid.
	fn set_attribute(&self, element: &Self::Element, name: &str, value: &str) -> Result<(), DocumentError>;

	/// Removing a missing attribute is a no-op.
	///
	/// # Errors
	///
	/// Iff `element` is invalid.
	fn remove_attribute(&self, element: &Self::Element, name: &str) -> Result<(), DocumentError>;

	/// The concatenated text of all descendant text nodes.
	fn text_content(&self, element: &Self::Element) -> String;

	/// Replaces all children with a single text node (or none, if `text` is empty).
	///
	/// # Errors
	///
	/// Iff `element` is invalid.
	fn set_text_content(&self, element: &Self::Element, text: &str) -> Result<(), DocumentError>;

	/// The serialized children of `element`.
	fn inner_markup(&self, element: &Self::Element) -> String;

	/// Replaces all children with the nodes parsed from `markup`.
	///
	/// # Errors
	///
	/// Iff `markup` can't be parsed or `element` is invalid.
	fn set_inner_markup(&self, element: &Self::Element, markup: &str) -> Result<(), DocumentError>;

	/// Parses `markup` into the children of a new, detached container element.
	///
	/// # Errors
	///
	/// Iff `markup` can't be parsed.
	fn parse_fragment(&self, markup: &str) -> Result<Self::Element, DocumentError>;

	/// Serializes a container's content, the inverse of [`parse_fragment`](`Document::parse_fragment`).
	fn serialize(&self, container: &Self::Element) -> String {
		self.inner_markup(container)
	}

	/// Whether `element` is a descendant of `ancestor` (or `ancestor` itself).
	fn contains(&self, ancestor: &Self::Element, element: &Self::Element) -> bool;

	/// Detaches `element` from its parent. Detached elements are left alone.
	fn remove(&self, element: &Self::Element);

	/// Releases a detached fragment that's no longer needed.
	fn discard(&self, _container: Self::Element) {}
}
