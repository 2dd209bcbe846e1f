//! The browser DOM as a [`Document`], through [`web_sys`].

use crate::{document::Document, error::DocumentError};
use core::cell::Cell;
use js_sys::{Array, Object, WeakMap};
use std::rc::Rc;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Element, Node, NodeList};

/// The elements of a [`web_sys::Document`].
///
/// Fragments are parsed by setting the [***innerHTML***](https://developer.mozilla.org/en-US/docs/Web/API/Element/innerHTML)
/// of a detached `div`, so they follow the usual HTML parsing rules.
#[derive(Debug, Clone)]
pub struct WebDocument {
	document: web_sys::Document,
	/// Element → numeric identity, without keeping elements alive.
	identities: WeakMap,
	next_identity: Rc<Cell<u32>>,
}

impl WebDocument {
	#[must_use]
	pub fn new(document: web_sys::Document) -> Self {
		Self {
			document,
			identities: WeakMap::new(),
			next_identity: Rc::new(Cell::new(0)),
		}
	}

	/// The current window's document, if there is one.
	#[must_use]
	pub fn from_window() -> Option<Self> {
		web_sys::window().and_then(|window| window.document()).map(Self::new)
	}

	/// Casts `node` into an element handle, for use as a view root.
	///
	/// # Errors
	///
	/// [`DocumentError::InvalidNode`] iff `node` isn't an [***Element***](https://developer.mozilla.org/en-US/docs/Web/API/element).
	pub fn element(node: Node) -> Result<Element, DocumentError> {
		node.dyn_into::<Element>().map_err(|node| DocumentError::InvalidNode(format!("{:?} is not an element", node)))
	}

	#[must_use]
	pub fn inner(&self) -> &web_sys::Document {
		&self.document
	}
}

fn js_error(error: JsValue) -> DocumentError {
	DocumentError::Js(format!("{:?}", error))
}

fn query_error(selector: &str, error: JsValue) -> DocumentError {
	DocumentError::UnsupportedSelector {
		selector: selector.to_owned(),
		reason: format!("{:?}", error),
	}
}

fn elements(node_list: &NodeList) -> Vec<Element> {
	Array::from(node_list).iter().filter_map(|node| node.dyn_into::<Element>().ok()).collect()
}

impl Document for WebDocument {
	type Element = Element;
	type Identity = u32;

	#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
	fn identity(&self, element: &Element) -> u32 {
		let key: &Object = element.as_ref();
		if let Some(identity) = self.identities.get(key).as_f64() {
			return identity as u32;
		}
		let identity = self.next_identity.get();
		self.next_identity.set(identity.wrapping_add(1));
		self.identities.set(key, &JsValue::from(identity));
		identity
	}

	fn is_element(&self, node: &Element) -> bool {
		// Catches values that were forced into the type through unchecked casts.
		node.is_instance_of::<Element>()
	}

	fn query_first(&self, scope: &Element, selector: &str) -> Result<Option<Element>, DocumentError> {
		scope.query_selector(selector).map_err(|error| query_error(selector, error))
	}

	fn query_all(&self, scope: &Element, selector: &str) -> Result<Vec<Element>, DocumentError> {
		scope.query_selector_all(selector).map(|node_list| elements(&node_list)).map_err(|error| query_error(selector, error))
	}

	fn attribute(&self, element: &Element, name: &str) -> Option<String> {
		element.get_attribute(name)
	}

	fn has_attribute(&self, element: &Element, name: &str) -> bool {
		element.has_attribute(name)
	}

	fn set_attribute(&self, element: &Element, name: &str, value: &str) -> Result<(), DocumentError> {
		element.set_attribute(name, value).map_err(js_error)
	}

	fn remove_attribute(&self, element: &Element, name: &str) -> Result<(), DocumentError> {
		element.remove_attribute(name).map_err(js_error)
	}

	fn text_content(&self, element: &Element) -> String {
		element.text_content().unwrap_or_default()
	}

	fn set_text_content(&self, element: &Element, text: &str) -> Result<(), DocumentError> {
		element.set_text_content(Some(text));
		Ok(())
	}

	fn inner_markup(&self, element: &Element) -> String {
		element.inner_html()
	}

	fn set_inner_markup(&self, element: &Element, markup: &str) -> Result<(), DocumentError> {
		element.set_inner_html(markup);
		Ok(())
	}

	fn parse_fragment(&self, markup: &str) -> Result<Element, DocumentError> {
		let container = self.document.create_element("div").map_err(js_error)?;
		container.set_inner_html(markup);
		Ok(container)
	}

	fn contains(&self, ancestor: &Element, element: &Element) -> bool {
		let ancestor: &Node = ancestor.as_ref();
		ancestor.contains(Some(element.as_ref()))
	}

	fn remove(&self, element: &Element) {
		element.remove();
	}
}
