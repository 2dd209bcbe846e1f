//! An in-memory element tree, for binding data without a browser.
//!
//! Markup is parsed leniently enough for typical HTML fragments (void elements, valueless attributes, stray end tags),
//! and queried with a subset of CSS selectors. See [`query`] for what's supported.

use crate::{document::Document, error::DocumentError};
use core::cell::RefCell;
use tracing::trace;

mod parse;
pub mod query;
mod serialize;

/// Refers to a node in a [`VirtualDocument`].
///
/// Ids are never reused, so a stale id can't alias a newer node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum NodeKind {
	Element { name: String, attributes: Vec<(String, String)>, children: Vec<NodeId> },
	Text(String),
	Comment(String),
}

#[derive(Debug, Clone)]
pub(crate) struct NodeData {
	parent: Option<NodeId>,
	kind: NodeKind,
}

/// Node storage. Discarded nodes leave an empty slot behind.
#[derive(Debug, Default)]
pub(crate) struct Arena {
	nodes: Vec<Option<NodeData>>,
}

impl Arena {
	fn push(&mut self, kind: NodeKind) -> NodeId {
		self.nodes.push(Some(NodeData { parent: None, kind }));
		NodeId(self.nodes.len() - 1)
	}

	pub(crate) fn create_element(&mut self, name: String, attributes: Vec<(String, String)>) -> NodeId {
		self.push(NodeKind::Element { name, attributes, children: Vec::new() })
	}

	pub(crate) fn create_text(&mut self, text: String) -> NodeId {
		self.push(NodeKind::Text(text))
	}

	pub(crate) fn create_comment(&mut self, comment: String) -> NodeId {
		self.push(NodeKind::Comment(comment))
	}

	pub(crate) fn get(&self, id: NodeId) -> Option<&NodeData> {
		self.nodes.get(id.0).and_then(Option::as_ref)
	}

	fn get_mut(&mut self, id: NodeId) -> Option<&mut NodeData> {
		self.nodes.get_mut(id.0).and_then(Option::as_mut)
	}

	pub(crate) fn kind(&self, id: NodeId) -> Option<&NodeKind> {
		self.get(id).map(|node| &node.kind)
	}

	pub(crate) fn parent(&self, id: NodeId) -> Option<NodeId> {
		self.get(id).and_then(|node| node.parent)
	}

	pub(crate) fn name(&self, id: NodeId) -> Option<&str> {
		match self.kind(id)? {
			NodeKind::Element { name, .. } => Some(name),
			NodeKind::Text(_) | NodeKind::Comment(_) => None,
		}
	}

	pub(crate) fn children(&self, id: NodeId) -> &[NodeId] {
		match self.kind(id) {
			Some(NodeKind::Element { children, .. }) => children,
			_ => &[],
		}
	}

	pub(crate) fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
		match self.kind(id)? {
			NodeKind::Element { attributes, .. } => attributes.iter().find(|(n, _)| n.eq_ignore_ascii_case(name)).map(|(_, value)| value.as_str()),
			NodeKind::Text(_) | NodeKind::Comment(_) => None,
		}
	}

	fn element_mut(&mut self, id: NodeId) -> Result<(&mut Vec<(String, String)>, &mut Vec<NodeId>), DocumentError> {
		match self.get_mut(id).map(|node| &mut node.kind) {
			Some(NodeKind::Element { attributes, children, .. }) => Ok((attributes, children)),
			Some(_) => Err(DocumentError::InvalidNode(format!("{:?} is not an element", id))),
			None => Err(DocumentError::InvalidNode(format!("{:?} was discarded", id))),
		}
	}

	/// Appends a parentless `child` to `parent`.
	pub(crate) fn append(&mut self, parent: NodeId, child: NodeId) -> Result<(), DocumentError> {
		self.element_mut(parent)?.1.push(child);
		if let Some(child) = self.get_mut(child) {
			child.parent = Some(parent);
		}
		Ok(())
	}

	pub(crate) fn detach(&mut self, id: NodeId) {
		let parent = match self.get_mut(id) {
			Some(node) => node.parent.take(),
			None => return,
		};
		if let Some(parent) = parent {
			if let Ok((_, siblings)) = self.element_mut(parent) {
				siblings.retain(|&sibling| sibling != id);
			}
		}
	}

	/// Frees all children of `id`.
	fn clear_children(&mut self, id: NodeId) -> Result<(), DocumentError> {
		for child in self.take_children(id)? {
			self.free(child);
		}
		Ok(())
	}

	/// Detaches all children of `id` and returns them.
	fn take_children(&mut self, id: NodeId) -> Result<Vec<NodeId>, DocumentError> {
		let children = core::mem::take(self.element_mut(id)?.1);
		for &child in &children {
			if let Some(child) = self.get_mut(child) {
				child.parent = None;
			}
		}
		Ok(children)
	}

	/// Moves all children of `from` to the end of `to`.
	fn adopt_children(&mut self, from: NodeId, to: NodeId) -> Result<(), DocumentError> {
		for child in self.take_children(from)? {
			self.append(to, child)?;
		}
		Ok(())
	}

	/// Frees `id` and its descendants.
	fn free(&mut self, id: NodeId) {
		let mut pending = vec![id];
		while let Some(id) = pending.pop() {
			if let Some(node) = self.nodes.get_mut(id.0).and_then(Option::take) {
				if let NodeKind::Element { children, .. } = node.kind {
					pending.extend(children);
				}
			}
		}
	}

	/// `id`'s descendants in document order, excluding `id`.
	pub(crate) fn descendants(&self, id: NodeId) -> Vec<NodeId> {
		let mut descendants = Vec::new();
		let mut pending: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
		while let Some(next) = pending.pop() {
			descendants.push(next);
			pending.extend(self.children(next).iter().rev().copied());
		}
		descendants
	}

	pub(crate) fn text_content(&self, id: NodeId) -> String {
		match self.kind(id) {
			Some(NodeKind::Text(text)) => text.clone(),
			Some(NodeKind::Element { .. }) => self
				.descendants(id)
				.into_iter()
				.filter_map(|descendant| match self.kind(descendant) {
					Some(NodeKind::Text(text)) => Some(text.as_str()),
					_ => None,
				})
				.collect(),
			Some(NodeKind::Comment(_)) | None => String::new(),
		}
	}
}

/// A [`Document`] that keeps all nodes in memory.
///
/// Element handles are [`NodeId`]s.
/// Removed and replaced nodes are freed immediately. Since ids aren't reused, a stale handle reads as empty
/// and writes through it fail with [`DocumentError::InvalidNode`].
#[derive(Debug, Default)]
pub struct VirtualDocument {
	arena: RefCell<Arena>,
}

impl VirtualDocument {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// The element's tag name as written in the markup.
	#[must_use]
	pub fn tag_name(&self, element: NodeId) -> Option<String> {
		self.arena.borrow().name(element).map(ToOwned::to_owned)
	}

	#[must_use]
	pub fn parent(&self, node: NodeId) -> Option<NodeId> {
		self.arena.borrow().parent(node)
	}

	#[must_use]
	pub fn children(&self, node: NodeId) -> Vec<NodeId> {
		self.arena.borrow().children(node).to_vec()
	}

	/// The element including its own tag.
	#[must_use]
	pub fn outer_markup(&self, node: NodeId) -> String {
		let mut markup = String::new();
		serialize::write_node(&self.arena.borrow(), node, &mut markup);
		markup
	}

	/// How many nodes are currently alive, attached or not.
	#[must_use]
	pub fn node_count(&self) -> usize {
		self.arena.borrow().nodes.iter().filter(|node| node.is_some()).count()
	}

	fn parse_detached(&self, markup: &str) -> Result<NodeId, DocumentError> {
		let mut arena = self.arena.borrow_mut();
		let container = arena.create_element("div".to_owned(), Vec::new());
		if let Err(error) = parse::parse_into(&mut arena, container, markup) {
			arena.free(container);
			return Err(error);
		}
		Ok(container)
	}
}

impl Document for VirtualDocument {
	type Element = NodeId;
	type Identity = NodeId;

	fn identity(&self, element: &NodeId) -> NodeId {
		*element
	}

	fn is_element(&self, node: &NodeId) -> bool {
		self.arena.borrow().name(*node).is_some()
	}

	fn query_first(&self, scope: &NodeId, selector: &str) -> Result<Option<NodeId>, DocumentError> {
		let selector = query::SelectorList::parse(selector)?;
		let arena = self.arena.borrow();
		Ok(arena.descendants(*scope).into_iter().find(|&candidate| selector.matches(&arena, candidate)))
	}

	fn query_all(&self, scope: &NodeId, selector: &str) -> Result<Vec<NodeId>, DocumentError> {
		let selector = query::SelectorList::parse(selector)?;
		let arena = self.arena.borrow();
		Ok(arena.descendants(*scope).into_iter().filter(|&candidate| selector.matches(&arena, candidate)).collect())
	}

	fn attribute(&self, element: &NodeId, name: &str) -> Option<String> {
		self.arena.borrow().attribute(*element, name).map(ToOwned::to_owned)
	}

	fn set_attribute(&self, element: &NodeId, name: &str, value: &str) -> Result<(), DocumentError> {
		if name.is_empty() || name.contains(|c: char| c.is_whitespace() || "\"'>/=".contains(c)) {
			return Err(DocumentError::InvalidNode(format!("{:?} is not a valid attribute name", name)));
		}

		let mut arena = self.arena.borrow_mut();
		let (attributes, _) = arena.element_mut(*element)?;
		match attributes.iter_mut().find(|(n, _)| n.eq_ignore_ascii_case(name)) {
			Some((_, existing)) => value.clone_into(existing),
			None => attributes.push((name.to_owned(), value.to_owned())),
		}
		Ok(())
	}

	fn remove_attribute(&self, element: &NodeId, name: &str) -> Result<(), DocumentError> {
		let mut arena = self.arena.borrow_mut();
		let (attributes, _) = arena.element_mut(*element)?;
		attributes.retain(|(n, _)| !n.eq_ignore_ascii_case(name));
		Ok(())
	}

	fn text_content(&self, element: &NodeId) -> String {
		self.arena.borrow().text_content(*element)
	}

	fn set_text_content(&self, element: &NodeId, text: &str) -> Result<(), DocumentError> {
		let mut arena = self.arena.borrow_mut();
		arena.clear_children(*element)?;
		if !text.is_empty() {
			let text = arena.create_text(text.to_owned());
			arena.append(*element, text)?;
		}
		Ok(())
	}

	fn inner_markup(&self, element: &NodeId) -> String {
		let arena = self.arena.borrow();
		let mut markup = String::new();
		for &child in arena.children(*element) {
			serialize::write_node(&arena, child, &mut markup);
		}
		markup
	}

	fn set_inner_markup(&self, element: &NodeId, markup: &str) -> Result<(), DocumentError> {
		if !self.is_element(element) {
			return Err(DocumentError::InvalidNode(format!("{:?} is not an element", element)));
		}
		let parsed = self.parse_detached(markup)?;
		let mut arena = self.arena.borrow_mut();
		arena.clear_children(*element)?;
		arena.adopt_children(parsed, *element)?;
		arena.free(parsed);
		Ok(())
	}

	fn parse_fragment(&self, markup: &str) -> Result<NodeId, DocumentError> {
		let container = self.parse_detached(markup)?;
		trace!("Parsed fragment into {:?}.", container);
		Ok(container)
	}

	fn contains(&self, ancestor: &NodeId, element: &NodeId) -> bool {
		let arena = self.arena.borrow();
		let mut current = Some(*element);
		while let Some(node) = current {
			if node == *ancestor {
				return true;
			}
			current = arena.parent(node);
		}
		false
	}

	fn remove(&self, element: &NodeId) {
		let mut arena = self.arena.borrow_mut();
		if arena.parent(*element).is_some() {
			arena.detach(*element);
			arena.free(*element);
		}
	}

	/// Frees the fragment's remaining nodes, unless it has been attached somewhere in the meantime.
	fn discard(&self, container: NodeId) {
		let mut arena = self.arena.borrow_mut();
		if arena.parent(container).is_none() {
			arena.free(container);
		}
	}
}
