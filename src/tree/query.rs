//! The CSS selector subset understood by [`VirtualDocument`](`super::VirtualDocument`).
//!
//! Supported:
//!
//! - type selectors (`li`) and `*`,
//! - `#id` and `.class`,
//! - `[attr]` and `[attr=value]`, with the value bare, `'single'` or `"double"` quoted (backslash escapes allowed),
//! - the descendant (whitespace) and child (`>`) combinators,
//! - comma-separated selector lists.
//!
//! Type and attribute names match ASCII case-insensitively, attribute values and classes exactly.

use super::{Arena, NodeId};
use crate::error::DocumentError;
use core::{iter::Peekable, str::Chars};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorList(Vec<Complex>);

#[derive(Debug, Clone, PartialEq, Eq)]
struct Complex(Vec<(Combinator, Compound)>);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combinator {
	Descendant,
	Child,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Compound {
	tag: Option<String>,
	id: Option<String>,
	classes: Vec<String>,
	attributes: Vec<(String, Option<String>)>,
}

impl SelectorList {
	/// # Errors
	///
	/// [`DocumentError::UnsupportedSelector`] for empty selectors and anything outside the supported subset.
	pub fn parse(selector: &str) -> Result<Self, DocumentError> {
		Parser { selector, chars: selector.chars().peekable() }.selector_list()
	}

	pub(crate) fn matches(&self, arena: &Arena, element: NodeId) -> bool {
		arena.name(element).is_some() && self.0.iter().any(|complex| complex.matches(arena, element, complex.0.len() - 1))
	}
}

impl Complex {
	fn matches(&self, arena: &Arena, element: NodeId, index: usize) -> bool {
		let (combinator, compound) = &self.0[index];
		if !compound.matches(arena, element) {
			return false;
		}
		if index == 0 {
			return true;
		}
		match combinator {
			Combinator::Child => arena.parent(element).map_or(false, |parent| self.matches(arena, parent, index - 1)),
			Combinator::Descendant => {
				let mut ancestor = arena.parent(element);
				while let Some(candidate) = ancestor {
					if self.matches(arena, candidate, index - 1) {
						return true;
					}
					ancestor = arena.parent(candidate);
				}
				false
			}
		}
	}
}

impl Compound {
	fn is_empty(&self) -> bool {
		self.tag.is_none() && self.id.is_none() && self.classes.is_empty() && self.attributes.is_empty()
	}

	fn matches(&self, arena: &Arena, element: NodeId) -> bool {
		let name = match arena.name(element) {
			Some(name) => name,
			None => return false,
		};
		if let Some(tag) = &self.tag {
			if tag != "*" && !tag.eq_ignore_ascii_case(name) {
				return false;
			}
		}
		if let Some(id) = &self.id {
			if arena.attribute(element, "id") != Some(id.as_str()) {
				return false;
			}
		}
		if !self.classes.is_empty() {
			let class = arena.attribute(element, "class").unwrap_or_default();
			if !self.classes.iter().all(|wanted| class.split_whitespace().any(|token| token == wanted)) {
				return false;
			}
		}
		self.attributes.iter().all(|(name, value)| match (arena.attribute(element, name), value) {
			(Some(actual), Some(expected)) => actual == expected,
			(Some(_), None) => true,
			(None, _) => false,
		})
	}
}

struct Parser<'a> {
	selector: &'a str,
	chars: Peekable<Chars<'a>>,
}

impl Parser<'_> {
	fn unsupported(&self, reason: impl Into<String>) -> DocumentError {
		DocumentError::UnsupportedSelector {
			selector: self.selector.to_owned(),
			reason: reason.into(),
		}
	}

	fn skip_whitespace(&mut self) -> bool {
		let mut skipped = false;
		while self.chars.peek().map_or(false, |c| c.is_whitespace()) {
			self.chars.next();
			skipped = true;
		}
		skipped
	}

	fn selector_list(mut self) -> Result<SelectorList, DocumentError> {
		let mut list = Vec::new();
		loop {
			list.push(self.complex()?);
			match self.chars.next() {
				Some(',') => continue,
				None => return Ok(SelectorList(list)),
				Some(c) => return Err(self.unsupported(format!("unexpected {:?}", c))),
			}
		}
	}

	fn complex(&mut self) -> Result<Complex, DocumentError> {
		let mut parts = Vec::new();
		let mut combinator = Combinator::Descendant;
		self.skip_whitespace();
		loop {
			let compound = self.compound()?;
			if compound.is_empty() {
				return Err(self.unsupported(if parts.is_empty() { "expected a selector" } else { "dangling combinator" }));
			}
			parts.push((combinator, compound));

			let had_whitespace = self.skip_whitespace();
			combinator = match self.chars.peek() {
				None | Some(',') => return Ok(Complex(parts)),
				Some('>') => {
					self.chars.next();
					self.skip_whitespace();
					Combinator::Child
				}
				Some(_) if had_whitespace => Combinator::Descendant,
				Some(&c) => return Err(self.unsupported(format!("unsupported {:?}", c))),
			};
		}
	}

	fn compound(&mut self) -> Result<Compound, DocumentError> {
		let mut compound = Compound::default();
		if self.chars.peek() == Some(&'*') {
			self.chars.next();
			compound.tag = Some("*".to_owned());
		} else if self.chars.peek().map_or(false, |&c| is_name_char(c)) {
			compound.tag = Some(self.name());
		}

		loop {
			match self.chars.peek() {
				Some('#') => {
					self.chars.next();
					let id = self.name();
					if id.is_empty() {
						return Err(self.unsupported("empty id"));
					}
					compound.id = Some(id);
				}
				Some('.') => {
					self.chars.next();
					let class = self.name();
					if class.is_empty() {
						return Err(self.unsupported("empty class"));
					}
					compound.classes.push(class);
				}
				Some('[') => {
					self.chars.next();
					compound.attributes.push(self.attribute()?);
				}
				_ => return Ok(compound),
			}
		}
	}

	fn attribute(&mut self) -> Result<(String, Option<String>), DocumentError> {
		self.skip_whitespace();
		let name = self.name();
		if name.is_empty() {
			return Err(self.unsupported("empty attribute name"));
		}
		self.skip_whitespace();
		match self.chars.next() {
			Some(']') => Ok((name, None)),
			Some('=') => {
				self.skip_whitespace();
				let value = match self.chars.peek() {
					Some(&quote) if quote == '\'' || quote == '"' => {
						self.chars.next();
						self.quoted(quote)?
					}
					_ => self.name(),
				};
				self.skip_whitespace();
				match self.chars.next() {
					Some(']') => Ok((name, Some(value))),
					_ => Err(self.unsupported("expected `]`")),
				}
			}
			Some(c) => Err(self.unsupported(format!("unsupported attribute operator starting with {:?}", c))),
			None => Err(self.unsupported("unterminated attribute selector")),
		}
	}

	fn quoted(&mut self, quote: char) -> Result<String, DocumentError> {
		let mut value = String::new();
		loop {
			match self.chars.next() {
				Some('\\') => match self.chars.next() {
					Some(escaped) => value.push(escaped),
					None => return Err(self.unsupported("dangling escape")),
				},
				Some(c) if c == quote => return Ok(value),
				Some(c) => value.push(c),
				None => return Err(self.unsupported("unterminated string")),
			}
		}
	}

	fn name(&mut self) -> String {
		let mut name = String::new();
		while let Some(&c) = self.chars.peek() {
			if c == '\\' {
				self.chars.next();
				if let Some(escaped) = self.chars.next() {
					name.push(escaped);
				}
			} else if is_name_char(c) {
				name.push(c);
				self.chars.next();
			} else {
				break;
			}
		}
		name
	}
}

fn is_name_char(c: char) -> bool {
	c.is_alphanumeric() || c == '-' || c == '_' || !c.is_ascii()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_the_supported_subset() {
		for selector in &["[data-key='apples']", "[data-key]", "li", "*", "#container .small", "ul > li[title=\"b1\"]", "forename, surename", "[data-key=a\\'b]"] {
			assert!(SelectorList::parse(selector).is_ok(), "{}", selector);
		}
	}

	#[test]
	fn rejects_everything_else() {
		for selector in &["", "  ", "li:first-child", "a + b", "a ~ b", "[data-key^='x']", "[data-key='x'", "a >", ","] {
			assert!(
				matches!(SelectorList::parse(selector), Err(DocumentError::UnsupportedSelector { .. })),
				"{:?}",
				selector
			);
		}
	}

	#[test]
	fn quoted_values_unescape() {
		let parsed = SelectorList::parse(r"[data-key='it\'s']").unwrap();
		assert_eq!(parsed.0[0].0[0].1.attributes, vec![("data-key".to_owned(), Some("it's".to_owned()))]);
	}
}
