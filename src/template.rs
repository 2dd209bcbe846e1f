//! Reusable markup blueprints, filled into standalone markup strings.

use crate::{
	config::Config,
	data::DataTree,
	document::Document,
	error::Result,
	view::View,
};
use std::rc::Rc;
use tracing::{instrument, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
	Fill,
	Render,
}

/// A markup blueprint. Each instantiation parses it into a fresh detached fragment, binds data and serializes the result.
///
/// Instantiations don't share any state.
#[derive(Debug)]
pub struct Template<D: Document> {
	document: Rc<D>,
	config: Rc<Config>,
	blueprint: String,
}

impl<D: Document> Clone for Template<D> {
	fn clone(&self) -> Self {
		Self {
			document: Rc::clone(&self.document),
			config: Rc::clone(&self.config),
			blueprint: self.blueprint.clone(),
		}
	}
}

impl<D: Document> Template<D> {
	pub(crate) fn new(document: Rc<D>, config: Rc<Config>, blueprint: String) -> Self {
		Self { document, config, blueprint }
	}

	#[must_use]
	pub fn blueprint(&self) -> &str {
		&self.blueprint
	}

	/// The blueprint with `data` applied as by [`View::update`].
	///
	/// # Errors
	///
	/// If the blueprint can't be parsed, or see [`View::update`].
	pub fn fill(&self, data: &DataTree, raw: bool) -> Result<String> {
		self.instantiate(Mode::Fill, data, raw)
	}

	/// The blueprint with `data` applied as by [`View::render`], so untouched keyed elements are left out.
	///
	/// # Errors
	///
	/// If the blueprint can't be parsed, or see [`View::render`].
	pub fn render(&self, data: &DataTree, raw: bool) -> Result<String> {
		self.instantiate(Mode::Render, data, raw)
	}

	/// [`fill`](`Template::fill`)s one instance per item and concatenates them, with `separator` between instances.
	///
	/// # Errors
	///
	/// The first error of any instance.
	pub fn fill_many<'d>(&self, items: impl IntoIterator<Item = &'d DataTree>, raw: bool, separator: Option<&str>) -> Result<String> {
		self.instantiate_many(Mode::Fill, items, raw, separator)
	}

	/// [`render`](`Template::render`)s one instance per item and concatenates them, with `separator` between instances.
	///
	/// # Errors
	///
	/// The first error of any instance.
	pub fn render_many<'d>(&self, items: impl IntoIterator<Item = &'d DataTree>, raw: bool, separator: Option<&str>) -> Result<String> {
		self.instantiate_many(Mode::Render, items, raw, separator)
	}

	fn instantiate_many<'d>(&self, mode: Mode, items: impl IntoIterator<Item = &'d DataTree>, raw: bool, separator: Option<&str>) -> Result<String> {
		let separator = separator.unwrap_or_default();
		let mut markup = String::new();
		for (i, item) in items.into_iter().enumerate() {
			if i > 0 {
				markup.push_str(separator);
			}
			markup.push_str(&self.instantiate(mode, item, raw)?);
		}
		Ok(markup)
	}

	#[instrument(skip(self, data))]
	fn instantiate(&self, mode: Mode, data: &DataTree, raw: bool) -> Result<String> {
		let container = self.document.parse_fragment(&self.blueprint)?;
		let mut view = View::new(Rc::clone(&self.document), Rc::clone(&self.config), container.clone());

		let bound = match mode {
			Mode::Fill => view.update(data, raw),
			Mode::Render => view.render(data, raw),
		};
		let markup = bound.map(|()| self.document.serialize(&container));

		view.destroy()?;
		self.document.discard(container);
		trace!("Discarded instance fragment.");
		markup
	}
}
