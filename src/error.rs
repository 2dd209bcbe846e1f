//! Error types.
//!
//! Missing keys, missing attributes and unregistered operator prefixes are **not** errors.
//! They resolve to a no-op or to a direct overwrite. Everything in here points at misuse.

/// Failures reported by a [`Document`](`crate::Document`) backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DocumentError {
	/// Markup could not be parsed into nodes.
	#[error("malformed markup: {message}")]
	Markup { message: String },

	/// The backend can't evaluate this selector.
	#[error("unsupported selector {selector:?}: {reason}")]
	UnsupportedSelector { selector: String, reason: String },

	/// A handle that doesn't (or no longer) refer to an element was passed in.
	#[error("invalid node: {0}")]
	InvalidNode(String),

	/// An exception thrown by the browser DOM, formatted with [`Debug`](`core::fmt::Debug`).
	#[error("DOM exception: {0}")]
	Js(String),
}

/// Everything that can go wrong while binding data.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GlueError {
	/// A [`View`](`crate::View`) was used after [`View::destroy`](`crate::View::destroy`).
	#[error("handle destroyed")]
	HandleDestroyed,

	/// A data value was neither text, a clearing value nor a nested mapping.
	#[error("unsupported value type at {key:?}: {found}")]
	UnsupportedValueType { key: String, found: &'static str },

	#[error("invalid JSON data: {0}")]
	Json(String),

	/// Data nesting exceeded the configured depth limit.
	#[error("data nested deeper than {depth_limit} levels (cyclic data?)")]
	CyclicData { depth_limit: usize },

	/// [`Glue::live`](`crate::Glue::live`) was called with something that isn't an element.
	#[error("invalid root: {0}")]
	InvalidRoot(String),

	#[error(transparent)]
	Document(#[from] DocumentError),
}

pub type Result<T, E = GlueError> = core::result::Result<T, E>;
