use super::{parse::is_void, Arena, NodeId, NodeKind};
use quick_xml::escape::{escape, partial_escape};

pub(super) fn write_node(arena: &Arena, node: NodeId, out: &mut String) {
	match arena.kind(node) {
		Some(NodeKind::Element { name, attributes, children }) => {
			out.push('<');
			out.push_str(name);
			for (key, value) in attributes {
				out.push(' ');
				out.push_str(key);
				out.push_str("=\"");
				out.push_str(&escape(value.as_str()));
				out.push('"');
			}

			if children.is_empty() && is_void(name) {
				out.push_str(" />");
				return;
			}

			out.push('>');
			for &child in children {
				write_node(arena, child, out);
			}
			out.push_str("</");
			out.push_str(name);
			out.push('>');
		}
		Some(NodeKind::Text(text)) => out.push_str(&partial_escape(text.as_str())),
		Some(NodeKind::Comment(comment)) => {
			out.push_str("<!--");
			out.push_str(comment);
			out.push_str("-->");
		}
		None => (),
	}
}
