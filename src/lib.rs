#![doc(html_root_url = "https://docs.rs/dom-glue/0.1.0")]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! Binds nested data onto a tree of keyed elements, in place.
//!
//! Each key of a [`DataTree`] is a selector:
//!
//! - `name` (no marker) addresses all descendants whose key attribute (`data-key` by default) is `name`.
//!   Nested data recurses into each of them, text replaces their content.
//! - `@attr` sets an attribute of the element in scope. Empty and [`Value::Clear`] values remove it.
//! - `*` replaces the content of the element in scope.
//!
//! An operator token in front of the marker combines the new value with the current one instead:
//! `+` appends, `^` prepends, `+.` adds class tokens and `-.` removes them.
//! Unknown operators assign directly.
//!
//! [`View::render`] additionally removes every keyed element that the data didn't reach, while [`View::update`] only adds.

#[cfg(doctest)]
pub mod readme {
	doc_comment::doctest!("../README.md");
}

pub mod binder;
pub mod config;
pub mod data;
pub mod document;
pub mod error;
pub mod operators;
pub mod selector;
pub mod template;
pub mod touched;
pub mod tree;
pub mod view;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use crate::{
	config::{Config, Markers, Options},
	data::{DataTree, Value},
	document::Document,
	error::{DocumentError, GlueError, Result},
	operators::{OperatorContext, Operators},
	template::Template,
	tree::{NodeId, VirtualDocument},
	view::View,
};

use std::rc::Rc;
use tracing::{debug, instrument};

/// Creates [`View`]s and [`Template`]s that share one [`Document`] and one resolved [`Config`].
#[derive(Debug)]
pub struct Glue<D: Document> {
	document: Rc<D>,
	config: Rc<Config>,
}

impl<D: Document> Clone for Glue<D> {
	fn clone(&self) -> Self {
		Self {
			document: Rc::clone(&self.document),
			config: Rc::clone(&self.config),
		}
	}
}

/// Resolves `options` against the defaults and binds them to `document`.
#[must_use]
pub fn create<D: Document>(options: Options, document: D) -> Glue<D> {
	Glue::new(Config::from(options), document)
}

impl<D: Document> Glue<D> {
	#[must_use]
	pub fn new(config: Config, document: D) -> Self {
		debug!(?config, "Created glue.");
		Self {
			document: Rc::new(document),
			config: Rc::new(config),
		}
	}

	#[must_use]
	pub fn document(&self) -> &D {
		&self.document
	}

	#[must_use]
	pub fn config(&self) -> &Config {
		&self.config
	}

	/// A live view of `root`.
	///
	/// # Errors
	///
	/// [`GlueError::InvalidRoot`] iff `root` isn't an element of the document.
	#[instrument(skip(self))]
	pub fn live(&self, root: D::Element) -> Result<View<D>> {
		if !self.document.is_element(&root) {
			return Err(GlueError::InvalidRoot(format!("{:?} is not an element", root)));
		}
		Ok(View::new(Rc::clone(&self.document), Rc::clone(&self.config), root))
	}

	/// A template for `blueprint`. The markup is only parsed when the template is instantiated.
	#[must_use]
	pub fn template(&self, blueprint: impl Into<String>) -> Template<D> {
		Template::new(Rc::clone(&self.document), Rc::clone(&self.config), blueprint.into())
	}
}
