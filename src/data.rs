//! Data Trees: ordered nested mappings from selector keys to values.

use crate::error::{GlueError, Result};
use core::convert::TryFrom;
use indexmap::IndexMap;
use serde::Deserialize;

/// A value bound to a selector key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
	Text(String),
	/// Removes an attribute, or empties content.
	Clear,
	Tree(DataTree),
}

impl Value {
	/// Whether this value clears rather than sets. Empty text counts.
	#[must_use]
	pub fn is_falsy(&self) -> bool {
		match self {
			Self::Clear => true,
			Self::Text(text) => text.is_empty(),
			Self::Tree(_) => false,
		}
	}

	/// The scalar as text. [`Value::Clear`] reads as empty, nested trees have no text.
	#[must_use]
	pub fn as_text(&self) -> Option<&str> {
		match self {
			Self::Text(text) => Some(text),
			Self::Clear => Some(""),
			Self::Tree(_) => None,
		}
	}
}

impl From<&str> for Value {
	fn from(text: &str) -> Self {
		Self::Text(text.to_owned())
	}
}

impl From<String> for Value {
	fn from(text: String) -> Self {
		Self::Text(text)
	}
}

impl From<DataTree> for Value {
	fn from(tree: DataTree) -> Self {
		Self::Tree(tree)
	}
}

impl<T: Into<Value>> From<Option<T>> for Value {
	fn from(value: Option<T>) -> Self {
		value.map_or(Self::Clear, Into::into)
	}
}

/// Selector keys and their values, iterated in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "serde_json::Value")]
pub struct DataTree(IndexMap<String, Value>);

impl DataTree {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Builder-style [`insert`](`DataTree::insert`).
	#[must_use]
	pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
		self.insert(key, value);
		self
	}

	/// Inserts or replaces the value for `key`. A replaced key keeps its original position.
	pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
		self.0.insert(key.into(), value.into())
	}

	#[must_use]
	pub fn get(&self, key: &str) -> Option<&Value> {
		self.0.get(key)
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
		self.0.iter().map(|(key, value)| (key.as_str(), value))
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.0.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Nesting depth. An empty tree has depth 1.
	#[must_use]
	pub fn depth(&self) -> usize {
		1 + self
			.0
			.values()
			.map(|value| match value {
				Value::Tree(tree) => tree.depth(),
				Value::Text(_) | Value::Clear => 0,
			})
			.max()
			.unwrap_or(0)
	}

	/// Parses a JSON object.
	///
	/// # Errors
	///
	/// [`GlueError::Json`] if `json` isn't valid JSON,
	/// [`GlueError::UnsupportedValueType`] if it isn't an object or contains arrays or `true`.
	pub fn from_json(json: &str) -> Result<Self> {
		let value: serde_json::Value = serde_json::from_str(json).map_err(|error| GlueError::Json(error.to_string()))?;
		Self::try_from(value)
	}

	fn from_json_object(object: serde_json::Map<String, serde_json::Value>, path: &str) -> Result<Self> {
		let mut tree = Self::new();
		for (key, value) in object {
			let key_path = if path.is_empty() { key.clone() } else { format!("{}/{}", path, key) };
			let value = match value {
				serde_json::Value::String(text) => Value::Text(text),
				serde_json::Value::Number(number) => Value::Text(number.to_string()),
				serde_json::Value::Null | serde_json::Value::Bool(false) => Value::Clear,
				serde_json::Value::Object(object) => Value::Tree(Self::from_json_object(object, &key_path)?),
				serde_json::Value::Bool(true) => return Err(GlueError::UnsupportedValueType { key: key_path, found: "boolean true" }),
				serde_json::Value::Array(_) => return Err(GlueError::UnsupportedValueType { key: key_path, found: "array" }),
			};
			tree.0.insert(key, value);
		}
		Ok(tree)
	}
}

impl TryFrom<serde_json::Value> for DataTree {
	type Error = GlueError;

	fn try_from(value: serde_json::Value) -> Result<Self> {
		match value {
			serde_json::Value::Object(object) => Self::from_json_object(object, ""),
			other => Err(GlueError::UnsupportedValueType {
				key: String::new(),
				found: match other {
					serde_json::Value::Null => "null",
					serde_json::Value::Bool(_) => "boolean",
					serde_json::Value::Number(_) => "number",
					serde_json::Value::String(_) => "string",
					serde_json::Value::Array(_) => "array",
					serde_json::Value::Object(_) => "object",
				},
			}),
		}
	}
}

impl<K: Into<String>, V: Into<Value>> core::iter::FromIterator<(K, V)> for DataTree {
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		Self(iter.into_iter().map(|(key, value)| (key.into(), value.into())).collect())
	}
}

impl<'a> IntoIterator for &'a DataTree {
	type Item = (&'a String, &'a Value);
	type IntoIter = indexmap::map::Iter<'a, String, Value>;

	fn into_iter(self) -> Self::IntoIter {
		self.0.iter()
	}
}
