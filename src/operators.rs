//! Pluggable combinators for merging an existing value with an incoming one.

use core::fmt::{self, Debug, Formatter};
use hashbrown::{HashMap, HashSet};
use std::rc::Rc;

/// Where an operator is being applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorContext<'a> {
	/// The value of the named attribute is being combined.
	Attribute(&'a str),
	/// Element content is being combined, as inner markup if `raw` and as plain text otherwise.
	Content { raw: bool },
}

/// `(current, incoming, context) -> combined`
pub type Operator = Rc<dyn Fn(&str, &str, &OperatorContext<'_>) -> String>;

/// Operator tokens and their combinators.
#[derive(Clone)]
pub struct Operators {
	table: HashMap<String, Operator>,
}

impl Default for Operators {
	/// The built-in `+`, `^`, `+.` and `-.` operators.
	fn default() -> Self {
		let mut operators = Self::empty();
		operators
			.register("+", append)
			.register("^", prepend)
			.register("+.", class_union)
			.register("-.", class_difference);
		operators
	}
}

impl Debug for Operators {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		let mut tokens: Vec<_> = self.table.keys().collect();
		tokens.sort();
		f.debug_set().entries(tokens).finish()
	}
}

impl Operators {
	/// A registry without any operators, not even the built-in ones.
	#[must_use]
	pub fn empty() -> Self {
		Self { table: HashMap::new() }
	}

	/// Registers `operator` under `token`, replacing any previous one.
	pub fn register(&mut self, token: impl Into<String>, operator: impl Fn(&str, &str, &OperatorContext<'_>) -> String + 'static) -> &mut Self {
		self.table.insert(token.into(), Rc::new(operator));
		self
	}

	pub fn remove(&mut self, token: &str) -> Option<Operator> {
		self.table.remove(token)
	}

	#[must_use]
	pub fn get(&self, token: &str) -> Option<&Operator> {
		self.table.get(token)
	}

	#[must_use]
	pub fn contains(&self, token: &str) -> bool {
		self.table.contains_key(token)
	}

	pub fn tokens(&self) -> impl Iterator<Item = &str> {
		self.table.keys().map(String::as_str)
	}

	/// Copies all of `other`'s operators into `self`, overriding tokens registered in both.
	pub fn extend(&mut self, other: &Self) {
		self.table.extend(other.table.iter().map(|(token, operator)| (token.clone(), Rc::clone(operator))));
	}
}

/// `+`
#[must_use]
pub fn append(current: &str, incoming: &str, _: &OperatorContext<'_>) -> String {
	let mut combined = String::with_capacity(current.len() + incoming.len());
	combined.push_str(current);
	combined.push_str(incoming);
	combined
}

/// `^`
#[must_use]
pub fn prepend(current: &str, incoming: &str, context: &OperatorContext<'_>) -> String {
	append(incoming, current, context)
}

/// `+.`: Whitespace-separated tokens of `current`, followed by those of `incoming` that aren't present yet.
#[must_use]
pub fn class_union(current: &str, incoming: &str, _: &OperatorContext<'_>) -> String {
	let mut tokens: Vec<_> = current.split_whitespace().collect();
	let mut present: HashSet<_> = tokens.iter().copied().collect();
	tokens.extend(incoming.split_whitespace().filter(|token| present.insert(*token)));
	tokens.join(" ")
}

/// `-.`: Whitespace-separated tokens of `current` that don't appear in `incoming`.
#[must_use]
pub fn class_difference(current: &str, incoming: &str, _: &OperatorContext<'_>) -> String {
	let removed: HashSet<_> = incoming.split_whitespace().collect();
	current.split_whitespace().filter(|token| !removed.contains(token)).collect::<Vec<_>>().join(" ")
}
