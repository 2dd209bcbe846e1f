use super::{Arena, NodeId};
use crate::error::DocumentError;
use quick_xml::{
	escape::resolve_html5_entity,
	events::{BytesStart, Event},
	Reader,
};
use std::borrow::Cow;
use tracing::trace;

/// Elements that never have content, and so are never closed in HTML.
pub(super) const VOID_ELEMENTS: &[&str] = &[
	"area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source", "track", "wbr",
];

pub(super) fn is_void(name: &str) -> bool {
	VOID_ELEMENTS.iter().any(|void| void.eq_ignore_ascii_case(name))
}

/// Parses `markup` and appends the resulting nodes to `parent`.
///
/// End tags close the innermost open element with the same name. End tags that don't match any open element are ignored,
/// and elements still open at the end of input are closed implicitly.
pub(super) fn parse_into(arena: &mut Arena, parent: NodeId, markup: &str) -> Result<(), DocumentError> {
	let mut reader = Reader::from_str(markup);
	{
		let config = reader.config_mut();
		config.trim_text(false);
		config.check_end_names = false;
		config.allow_unmatched_ends = true;
	}

	let mut open = vec![parent];
	loop {
		let current = *open.last().unwrap_or(&parent);
		let event = reader.read_event().map_err(|error| DocumentError::Markup {
			message: format!("{} (at byte {})", error, reader.buffer_position()),
		})?;
		match event {
			Event::Start(start) => {
				let (element, name) = create_element(arena, &start)?;
				arena.append(current, element)?;
				if !is_void(&name) {
					open.push(element);
				}
			}

			Event::Empty(start) => {
				let (element, _) = create_element(arena, &start)?;
				arena.append(current, element)?;
			}

			Event::End(end) => {
				let name = String::from_utf8_lossy(end.name().as_ref()).into_owned();
				match open.iter().skip(1).rposition(|&element| arena.name(element).map_or(false, |open_name| open_name.eq_ignore_ascii_case(&name))) {
					Some(index) => open.truncate(index + 1),
					None => trace!("Ignoring stray end tag </{}>.", name),
				}
			}

			Event::Text(text) => {
				let text = unescape_html(&String::from_utf8_lossy(&text)).into_owned();
				append_text(arena, current, text)?;
			}

			Event::CData(data) => append_text(arena, current, String::from_utf8_lossy(&data).into_owned())?,

			Event::Comment(comment) => {
				let comment = arena.create_comment(String::from_utf8_lossy(&comment).into_owned());
				arena.append(current, comment)?;
			}

			Event::Decl(_) | Event::PI(_) | Event::DocType(_) => (),

			Event::Eof => return Ok(()),
		}
	}
}

fn create_element(arena: &mut Arena, start: &BytesStart<'_>) -> Result<(NodeId, String), DocumentError> {
	let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
	let mut attributes: Vec<(String, String)> = Vec::new();
	for attribute in start.html_attributes() {
		let attribute = attribute.map_err(|error| DocumentError::Markup {
			message: format!("invalid attribute in <{}>: {}", name, error),
		})?;
		let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
		let value = unescape_html(&String::from_utf8_lossy(&attribute.value)).into_owned();
		// The first occurrence wins, as in HTML.
		if !attributes.iter().any(|(existing, _)| existing.eq_ignore_ascii_case(&key)) {
			attributes.push((key, value));
		}
	}
	Ok((arena.create_element(name.clone(), attributes), name))
}

/// Resolves character references and HTML5 named entities.
/// Anything that doesn't resolve, including a lone `&`, is kept as written.
pub(super) fn unescape_html(raw: &str) -> Cow<'_, str> {
	if !raw.contains('&') {
		return Cow::Borrowed(raw);
	}

	let mut unescaped = String::with_capacity(raw.len());
	let mut rest = raw;
	while let Some(start) = rest.find('&') {
		unescaped.push_str(&rest[..start]);
		rest = &rest[start + 1..];
		let reference = rest
			.find(';')
			.map(|end| &rest[..end])
			.filter(|reference| !reference.is_empty() && reference.chars().all(|c| c.is_ascii_alphanumeric() || c == '#'));
		match reference.and_then(|reference| resolve_reference(reference).map(|resolved| (reference, resolved))) {
			Some((reference, resolved)) => {
				unescaped.push_str(&resolved);
				rest = &rest[reference.len() + 1..];
			}
			None => unescaped.push('&'),
		}
	}
	unescaped.push_str(rest);
	Cow::Owned(unescaped)
}

/// `reference` is the part between `&` and `;`.
fn resolve_reference(reference: &str) -> Option<Cow<'static, str>> {
	match reference.strip_prefix('#') {
		Some(number) => {
			let code = match number.strip_prefix(&['x', 'X'][..]) {
				Some(hex) => u32::from_str_radix(hex, 16).ok()?,
				None => number.parse().ok()?,
			};
			char::from_u32(code).filter(|&c| c != '\0').map(|c| Cow::Owned(c.to_string()))
		}
		None => resolve_html5_entity(reference).map(Cow::Borrowed),
	}
}

/// Appends `text`, merging it into a directly preceding text node.
fn append_text(arena: &mut Arena, parent: NodeId, text: String) -> Result<(), DocumentError> {
	if text.is_empty() {
		return Ok(());
	}
	if let Some(&last) = arena.children(parent).last() {
		if let Some(super::NodeData { kind: super::NodeKind::Text(existing), .. }) = arena.nodes.get_mut(last.0).and_then(Option::as_mut) {
			existing.push_str(&text);
			return Ok(());
		}
	}
	let text = arena.create_text(text);
	arena.append(parent, text)
}
