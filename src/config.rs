//! Option resolution.
//!
//! [`Options`] is what callers hand in, with every field optional.
//! [`Options::resolve`] fills the gaps from a default [`Config`] without sharing mutable state with it.

use crate::operators::Operators;
use core::fmt::{self, Debug, Formatter};
use serde::{de, Deserialize, Deserializer};
use std::rc::Rc;

pub const DEFAULT_KEY_ATTRIBUTE: &str = "data-key";
pub const DEFAULT_ATTRIBUTE_MARKER: char = '@';
pub const DEFAULT_ELEMENT_CONTENT_MARKER: char = '*';
pub const DEFAULT_DEPTH_LIMIT: usize = 512;

/// Turns a data key into a selector string that the [`Document`](`crate::Document`) understands.
pub type KeyToSelector = Rc<dyn Fn(&str) -> String>;

/// Characters that turn a data key into an attribute or content selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Markers {
	pub attribute: char,
	pub element_content: char,
}

impl Default for Markers {
	fn default() -> Self {
		Self {
			attribute: DEFAULT_ATTRIBUTE_MARKER,
			element_content: DEFAULT_ELEMENT_CONTENT_MARKER,
		}
	}
}

/// Partial [`Markers`]. Each missing marker falls back on its own.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct MarkerOptions {
	#[serde(deserialize_with = "marker")]
	pub attribute: Option<char>,
	#[serde(deserialize_with = "marker")]
	pub element_content: Option<char>,
}

/// A single character, with `null` and `""` meaning "use the default".
fn marker<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<char>, D::Error> {
	let marker = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
	let mut chars = marker.chars();
	match (chars.next(), chars.next()) {
		(None, _) => Ok(None),
		(Some(c), None) => Ok(Some(c)),
		(Some(_), Some(_)) => Err(de::Error::invalid_value(de::Unexpected::Str(&marker), &"a single character or an empty string")),
	}
}

/// User options. Anything left at [`None`] (or set to an empty string) is taken from the defaults.
///
/// The plain fields can be deserialized, for example from JSON with camelCase keys:
///
/// ```json
/// { "keyAttribute": "data-id", "markers": { "attribute": "!" }, "depthLimit": 64 }
/// ```
///
/// Callbacks can only be set from code.
#[derive(Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct Options {
	pub key_attribute: Option<String>,
	#[serde(skip)]
	pub key_to_selector: Option<KeyToSelector>,
	/// Merged over the default operators. Tokens present in both use these.
	#[serde(skip)]
	pub operators: Option<Operators>,
	pub markers: Option<MarkerOptions>,
	pub depth_limit: Option<usize>,
}

impl Debug for Options {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("Options")
			.field("key_attribute", &self.key_attribute)
			.field("key_to_selector", &self.key_to_selector.as_ref().map(|_| "Fn(&str) -> String"))
			.field("operators", &self.operators)
			.field("markers", &self.markers)
			.field("depth_limit", &self.depth_limit)
			.finish()
	}
}

impl Options {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	#[must_use]
	pub fn key_attribute(mut self, key_attribute: impl Into<String>) -> Self {
		self.key_attribute = Some(key_attribute.into());
		self
	}

	#[must_use]
	pub fn key_to_selector(mut self, key_to_selector: impl Fn(&str) -> String + 'static) -> Self {
		self.key_to_selector = Some(Rc::new(key_to_selector));
		self
	}

	#[must_use]
	pub fn operators(mut self, operators: Operators) -> Self {
		self.operators = Some(operators);
		self
	}

	#[must_use]
	pub fn attribute_marker(mut self, marker: char) -> Self {
		self.markers.get_or_insert_with(MarkerOptions::default).attribute = Some(marker);
		self
	}

	#[must_use]
	pub fn element_content_marker(mut self, marker: char) -> Self {
		self.markers.get_or_insert_with(MarkerOptions::default).element_content = Some(marker);
		self
	}

	#[must_use]
	pub fn depth_limit(mut self, depth_limit: usize) -> Self {
		self.depth_limit = Some(depth_limit);
		self
	}

	/// Parses the serializable subset of the options from JSON.
	///
	/// # Errors
	///
	/// Iff `json` isn't a valid options object.
	pub fn from_json(json: &str) -> serde_json::Result<Self> {
		serde_json::from_str(json)
	}

	/// Fills every missing or empty field from `defaults`.
	///
	/// A custom key attribute without a custom `key_to_selector` gets a default selector function for that attribute,
	/// rather than the one for the default attribute.
	#[must_use]
	pub fn resolve(self, defaults: &Config) -> Config {
		let key_attribute = self.key_attribute.filter(|key_attribute| !key_attribute.is_empty());
		let key_to_selector = match (self.key_to_selector, &key_attribute) {
			(Some(key_to_selector), _) => key_to_selector,
			(None, Some(key_attribute)) => attribute_key_to_selector(key_attribute.clone()),
			(None, None) => Rc::clone(&defaults.key_to_selector),
		};

		let mut operators = defaults.operators.clone();
		if let Some(user_operators) = &self.operators {
			operators.extend(user_operators);
		}

		let markers = self.markers.unwrap_or_default();
		Config {
			key_attribute: key_attribute.unwrap_or_else(|| defaults.key_attribute.clone()),
			key_to_selector,
			operators,
			markers: Markers {
				attribute: markers.attribute.filter(|&c| c != '\0').unwrap_or(defaults.markers.attribute),
				element_content: markers.element_content.filter(|&c| c != '\0').unwrap_or(defaults.markers.element_content),
			},
			depth_limit: self.depth_limit.filter(|&depth_limit| depth_limit > 0).unwrap_or(defaults.depth_limit),
		}
	}
}

/// Fully resolved configuration, shared read-only by all views and templates of one [`Glue`](`crate::Glue`).
#[derive(Clone)]
pub struct Config {
	pub key_attribute: String,
	pub key_to_selector: KeyToSelector,
	pub operators: Operators,
	pub markers: Markers,
	/// Maximum data nesting depth before [`GlueError::CyclicData`](`crate::GlueError::CyclicData`).
	pub depth_limit: usize,
}

impl Default for Config {
	fn default() -> Self {
		Self {
			key_attribute: DEFAULT_KEY_ATTRIBUTE.to_owned(),
			key_to_selector: attribute_key_to_selector(DEFAULT_KEY_ATTRIBUTE.to_owned()),
			operators: Operators::default(),
			markers: Markers::default(),
			depth_limit: DEFAULT_DEPTH_LIMIT,
		}
	}
}

impl From<Options> for Config {
	fn from(options: Options) -> Self {
		options.resolve(&Self::default())
	}
}

impl Debug for Config {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("Config")
			.field("key_attribute", &self.key_attribute)
			.field("operators", &self.operators)
			.field("markers", &self.markers)
			.field("depth_limit", &self.depth_limit)
			.finish_non_exhaustive()
	}
}

impl Config {
	#[must_use]
	pub fn selector_for_key(&self, key: &str) -> String {
		(self.key_to_selector)(key)
	}

	/// Matches every element that carries the key attribute, whatever its value.
	#[must_use]
	pub fn keyed_selector(&self) -> String {
		format!("[{}]", self.key_attribute)
	}
}

fn attribute_key_to_selector(key_attribute: String) -> KeyToSelector {
	Rc::new(move |key: &str| format!("[{}='{}']", key_attribute, escape_quoted(key)))
}

fn escape_quoted(value: &str) -> String {
	let mut escaped = String::with_capacity(value.len());
	for c in value.chars() {
		if c == '\'' || c == '\\' {
			escaped.push('\\');
		}
		escaped.push(c);
	}
	escaped
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::operators::OperatorContext;

	#[test]
	fn defaults() {
		let config = Config::from(Options::default());
		assert_eq!(config.key_attribute, "data-key");
		assert_eq!(config.markers, Markers { attribute: '@', element_content: '*' });
		assert_eq!(config.selector_for_key("apples"), "[data-key='apples']");
		assert_eq!(config.keyed_selector(), "[data-key]");
		assert_eq!(config.depth_limit, DEFAULT_DEPTH_LIMIT);
	}

	#[test]
	fn partial_markers_keep_their_sibling() {
		let config = Config::from(Options::new().attribute_marker('!'));
		assert_eq!(config.markers, Markers { attribute: '!', element_content: '*' });

		let config = Config::from(Options::new().element_content_marker('$'));
		assert_eq!(config.markers, Markers { attribute: '@', element_content: '$' });
	}

	#[test]
	fn empty_values_fall_back() {
		let config = Config::from(Options::new().key_attribute("").depth_limit(0));
		assert_eq!(config.key_attribute, "data-key");
		assert_eq!(config.depth_limit, DEFAULT_DEPTH_LIMIT);
	}

	#[test]
	fn custom_key_attribute_drives_the_default_selector() {
		let config = Config::from(Options::new().key_attribute("data-id"));
		assert_eq!(config.selector_for_key("it's"), r"[data-id='it\'s']");
		assert_eq!(config.keyed_selector(), "[data-id]");
	}

	#[test]
	fn user_operators_extend_the_defaults() {
		let mut operators = Operators::empty();
		operators.register("~", |_: &str, incoming: &str, _: &OperatorContext<'_>| incoming.chars().rev().collect());
		let config = Config::from(Options::new().operators(operators));
		assert!(config.operators.contains("~"));
		assert!(config.operators.contains("+."));
	}

	#[test]
	fn resolving_does_not_alias_defaults() {
		let defaults = Config::default();
		let mut operators = Operators::empty();
		operators.register("~", |current: &str, _: &str, _: &OperatorContext<'_>| current.to_owned());
		let config = Options::new().operators(operators).resolve(&defaults);
		assert!(config.operators.contains("~"));
		assert!(!defaults.operators.contains("~"));
	}

	#[test]
	fn deserializes_from_json() {
		let options = Options::from_json(r#"{ "keyAttribute": "data-id", "markers": { "elementContent": "$" } }"#).unwrap();
		let config = Config::from(options);
		assert_eq!(config.key_attribute, "data-id");
		assert_eq!(config.markers, Markers { attribute: '@', element_content: '$' });
		assert!(Options::from_json(r#"{ "keyAttr": "x" }"#).is_err());
	}

	#[test]
	fn empty_json_markers_fall_back() {
		let options = Options::from_json(r#"{ "markers": { "attribute": "", "elementContent": "$" } }"#).unwrap();
		assert_eq!(Config::from(options).markers, Markers { attribute: '@', element_content: '$' });

		let options = Options::from_json(r#"{ "markers": { "attribute": "!", "elementContent": null } }"#).unwrap();
		assert_eq!(Config::from(options).markers, Markers { attribute: '!', element_content: '*' });

		assert!(Options::from_json(r#"{ "markers": { "attribute": "@@" } }"#).is_err());
	}
}
