//! Live views: handles bound to a persistent root element.

use crate::{
	binder::Binder,
	config::Config,
	data::DataTree,
	document::Document,
	error::{GlueError, Result},
};
use std::rc::Rc;
use tracing::{debug, instrument};

/// A handle bound to one root element, through which data can be applied repeatedly.
///
/// Once [destroyed](`View::destroy`), every method fails with [`GlueError::HandleDestroyed`].
#[derive(Debug)]
pub struct View<D: Document> {
	document: Rc<D>,
	config: Rc<Config>,
	root: Option<D::Element>,
}

impl<D: Document> View<D> {
	pub(crate) fn new(document: Rc<D>, config: Rc<Config>, root: D::Element) -> Self {
		Self { document, config, root: Some(root) }
	}

	fn root(&self) -> Result<&D::Element> {
		self.root.as_ref().ok_or(GlueError::HandleDestroyed)
	}

	fn binder(&self) -> Binder<'_, D> {
		Binder::new(&self.document, &self.config)
	}

	/// The root element.
	///
	/// # Errors
	///
	/// [`GlueError::HandleDestroyed`].
	pub fn element(&self) -> Result<D::Element> {
		self.root().map(Clone::clone)
	}

	#[must_use]
	pub fn is_destroyed(&self) -> bool {
		self.root.is_none()
	}

	/// Applies `data` without removing anything.
	///
	/// # Errors
	///
	/// [`GlueError::HandleDestroyed`], or see [`Binder::merge`].
	#[instrument(skip(self, data))]
	pub fn update(&self, data: &DataTree, raw: bool) -> Result<()> {
		self.binder().merge(self.root()?, data, raw).map(drop)
	}

	/// Applies `data`, then removes every keyed descendant that `data` didn't reach.
	///
	/// # Errors
	///
	/// [`GlueError::HandleDestroyed`], or see [`Binder::merge`].
	#[instrument(skip(self, data))]
	pub fn render(&self, data: &DataTree, raw: bool) -> Result<()> {
		self.binder().render(self.root()?, data, raw).map(drop)
	}

	/// The text content of the first element with `key`, or its `attribute` if one is given.
	///
	/// [`None`] if there's no such element or attribute.
	///
	/// # Errors
	///
	/// [`GlueError::HandleDestroyed`], or if the key's selector can't be evaluated.
	pub fn get(&self, key: &str, attribute: Option<&str>) -> Result<Option<String>> {
		Ok(self.find(key)?.and_then(|element| self.read(&element, attribute)))
	}

	/// Like [`get`](`View::get`), but for each element with `key`, in document order.
	///
	/// # Errors
	///
	/// [`GlueError::HandleDestroyed`], or if the key's selector can't be evaluated.
	pub fn get_all(&self, key: &str, attribute: Option<&str>) -> Result<Vec<Option<String>>> {
		Ok(self.find_all(Some(key))?.iter().map(|element| self.read(element, attribute)).collect())
	}

	fn read(&self, element: &D::Element, attribute: Option<&str>) -> Option<String> {
		match attribute {
			Some(attribute) => self.document.attribute(element, attribute),
			None => Some(self.document.text_content(element)),
		}
	}

	/// The first element with `key`.
	///
	/// # Errors
	///
	/// [`GlueError::HandleDestroyed`], or if the key's selector can't be evaluated.
	pub fn find(&self, key: &str) -> Result<Option<D::Element>> {
		let root = self.root()?;
		Ok(self.document.query_first(root, &self.config.selector_for_key(key))?)
	}

	/// All elements with `key`, or all keyed elements if `key` is [`None`].
	///
	/// # Errors
	///
	/// [`GlueError::HandleDestroyed`], or if the selector can't be evaluated.
	pub fn find_all(&self, key: Option<&str>) -> Result<Vec<D::Element>> {
		let root = self.root()?;
		let selector = match key {
			Some(key) => self.config.selector_for_key(key),
			None => self.config.keyed_selector(),
		};
		Ok(self.document.query_all(root, &selector)?)
	}

	/// Releases the root element. The element itself is left as it is.
	///
	/// # Errors
	///
	/// [`GlueError::HandleDestroyed`] if this view was destroyed already.
	pub fn destroy(&mut self) -> Result<D::Element> {
		let root = self.root.take().ok_or(GlueError::HandleDestroyed)?;
		debug!("Destroyed view of {:?}.", root);
		Ok(root)
	}
}
