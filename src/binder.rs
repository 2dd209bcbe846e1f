//! The recursive merge of a [`DataTree`] onto an element tree, and pruning of untouched keyed elements.

use crate::{
	config::Config,
	data::{DataTree, Value},
	document::Document,
	error::{GlueError, Result},
	operators::OperatorContext,
	selector::{classify, SelectorForm},
	touched::TouchedSet,
};
use tracing::{debug, instrument, trace, trace_span};

/// Applies data to elements of one [`Document`] under one [`Config`].
#[derive(Debug)]
pub struct Binder<'a, D: Document> {
	document: &'a D,
	config: &'a Config,
}

impl<'a, D: Document> Binder<'a, D> {
	#[must_use]
	pub fn new(document: &'a D, config: &'a Config) -> Self {
		Self { document, config }
	}

	/// Applies `data` to `scope` and its keyed descendants, depth-first in the data's insertion order.
	///
	/// Content is written as markup if `raw` and as text otherwise.
	///
	/// Returns every element that was touched, which never includes elements whose keys don't appear in `data`.
	/// Keys without matching elements are skipped.
	///
	/// # Errors
	///
	/// - [`GlueError::CyclicData`] if `data` is nested deeper than [`Config::depth_limit`],
	/// - [`GlueError::UnsupportedValueType`] if an attribute or content selector is given nested data,
	/// - [`GlueError::Document`] if the document rejects a query or write.
	///
	/// Changes made before an error are kept.
	#[instrument(skip(self, data), fields(keys = data.len()))]
	pub fn merge(&self, scope: &D::Element, data: &DataTree, raw: bool) -> Result<TouchedSet<D::Identity>> {
		let touched = self.merge_at(scope, data, raw, 1)?;
		debug!("Touched {} element(s).", touched.len());
		Ok(touched)
	}

	fn merge_at(&self, scope: &D::Element, data: &DataTree, raw: bool, depth: usize) -> Result<TouchedSet<D::Identity>> {
		if depth > self.config.depth_limit {
			return Err(GlueError::CyclicData { depth_limit: self.config.depth_limit });
		}

		let mut touched = TouchedSet::new();
		for (key, value) in data.iter() {
			let span = trace_span!("Binding", key, depth);
			let _enter = span.enter();
			if cfg!(feature = "dangerous-logging") {
				trace!(?value);
			}

			match classify(key, &self.config.markers) {
				SelectorForm::Attribute { operator, name } => {
					touched.insert(self.document.identity(scope));
					self.apply_attribute(scope, key, operator, name, value)?;
				}

				SelectorForm::Content { operator } => {
					let incoming = scalar(key, value)?;
					self.apply_content(scope, operator, incoming, raw)?;
				}

				SelectorForm::Element(element_key) => {
					let targets = self.document.query_all(scope, &self.config.selector_for_key(element_key))?;
					if targets.is_empty() {
						trace!("No element matches this key.");
						continue;
					}

					trace!("{} element(s) match this key.", targets.len());
					for target in targets {
						// A match nested in an earlier match is gone once that one's content was replaced.
						if !self.document.contains(scope, &target) {
							trace!("Skipping a match that was replaced along with an ancestor.");
							continue;
						}

						touched.insert(self.document.identity(&target));
						match value {
							Value::Tree(nested) => touched.union(self.merge_at(&target, nested, raw, depth + 1)?),
							Value::Text(text) => self.set_content(&target, text, raw)?,
							Value::Clear => self.set_content(&target, "", raw)?,
						}
					}
				}
			}
		}
		Ok(touched)
	}

	fn apply_attribute(&self, element: &D::Element, key: &str, operator: &str, name: &str, value: &Value) -> Result<()> {
		let incoming = scalar(key, value)?;
		if value.is_falsy() {
			if self.document.has_attribute(element, name) {
				trace!("Removing attribute {:?}.", name);
				self.document.remove_attribute(element, name)?;
			}
			return Ok(());
		}

		let combined = match self.operator(operator) {
			Some(combine) => {
				let current = self.document.attribute(element, name).unwrap_or_default();
				combine(&current, incoming, &OperatorContext::Attribute(name))
			}
			None => incoming.to_owned(),
		};
		self.document.set_attribute(element, name, &combined)?;
		Ok(())
	}

	fn apply_content(&self, element: &D::Element, operator: &str, incoming: &str, raw: bool) -> Result<()> {
		match self.operator(operator) {
			Some(combine) => {
				let current = self.content(element, raw);
				let combined = combine(&current, incoming, &OperatorContext::Content { raw });
				self.set_content(element, &combined, raw)
			}
			None => self.set_content(element, incoming, raw),
		}
	}

	/// The registered combinator for a non-empty `operator`.
	///
	/// Unregistered operators fall back to plain assignment, which is logged but not an error.
	fn operator(&self, operator: &str) -> Option<&crate::operators::Operator> {
		if operator.is_empty() {
			return None;
		}
		let combine = self.config.operators.get(operator);
		if combine.is_none() {
			debug!("Unregistered operator {:?}; assigning directly.", operator);
		}
		combine
	}

	fn content(&self, element: &D::Element, raw: bool) -> String {
		if raw {
			self.document.inner_markup(element)
		} else {
			self.document.text_content(element)
		}
	}

	fn set_content(&self, element: &D::Element, content: &str, raw: bool) -> Result<()> {
		if raw {
			self.document.set_inner_markup(element, content)?;
		} else {
			self.document.set_text_content(element, content)?;
		}
		Ok(())
	}

	/// Detaches every keyed descendant of `root` that isn't in `touched`. `root` itself always stays.
	///
	/// Returns how many elements were detached. Descendants of detached elements aren't counted separately.
	///
	/// # Errors
	///
	/// Iff the document can't evaluate the keyed element selector.
	#[instrument(skip(self, touched), fields(touched = touched.len()))]
	pub fn prune(&self, root: &D::Element, touched: &TouchedSet<D::Identity>) -> Result<usize> {
		let mut removed = 0;
		for candidate in self.document.query_all(root, &self.config.keyed_selector())? {
			if candidate == *root || touched.contains(&self.document.identity(&candidate)) {
				continue;
			}
			if !self.document.contains(root, &candidate) {
				trace!("Already detached along with an ancestor.");
				continue;
			}
			self.document.remove(&candidate);
			removed += 1;
		}
		debug!("Removed {} untouched keyed element(s).", removed);
		Ok(removed)
	}

	/// [`merge`](`Binder::merge`), then [`prune`](`Binder::prune`) with the touched elements.
	///
	/// # Errors
	///
	/// See [`merge`](`Binder::merge`). Nothing is pruned if merging fails.
	pub fn render(&self, root: &D::Element, data: &DataTree, raw: bool) -> Result<TouchedSet<D::Identity>> {
		let touched = self.merge(root, data, raw)?;
		self.prune(root, &touched)?;
		Ok(touched)
	}
}

fn scalar<'v>(key: &str, value: &'v Value) -> Result<&'v str> {
	value.as_text().ok_or_else(|| GlueError::UnsupportedValueType {
		key: key.to_owned(),
		found: "nested data under an attribute or content selector",
	})
}
