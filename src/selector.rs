//! Classification of data keys into selector forms.

use crate::config::Markers;

/// What a single data key addresses, relative to the element currently in scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorForm<'a> {
	/// `op` + attribute marker + name, for example `+@class`.
	Attribute { operator: &'a str, name: &'a str },
	/// `op` + content marker, for example `^*`.
	///
	/// Anything after the marker is ignored.
	Content { operator: &'a str },
	/// A bare key, matched against descendants through the configured key selector.
	Element(&'a str),
}

/// Classifies `key`.
///
/// The attribute marker always wins, even if the content marker appears too.
#[must_use]
pub fn classify<'a>(key: &'a str, markers: &Markers) -> SelectorForm<'a> {
	if key.contains(markers.attribute) {
		let mut parts = key.split(markers.attribute);
		let operator = parts.next().unwrap_or_default();
		let name = parts.next().unwrap_or_default();
		SelectorForm::Attribute { operator, name }
	} else if key.contains(markers.element_content) {
		let operator = key.split(markers.element_content).next().unwrap_or_default();
		SelectorForm::Content { operator }
	} else {
		SelectorForm::Element(key)
	}
}
