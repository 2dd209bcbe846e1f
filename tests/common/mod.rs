#![allow(dead_code)]

use core::convert::TryFrom;
use dom_glue::{create, DataTree, Document, Glue, NodeId, Options, VirtualDocument};

pub const PAGE: &str = include_str!("../fixtures/page.html");

pub fn init_tracing() {
	let _ = tracing_subscriber::fmt()
		.with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
		.with_test_writer()
		.try_init();
}

pub struct Page {
	pub glue: Glue<VirtualDocument>,
	pub fragment: NodeId,
	pub container: NodeId,
	pub simple: NodeId,
}

impl Page {
	pub fn new() -> Self {
		Self::with_options(Options::default())
	}

	pub fn with_options(options: Options) -> Self {
		init_tracing();
		let glue = create(options, VirtualDocument::new());
		let fragment = glue.document().parse_fragment(PAGE).unwrap();
		let container = glue.document().query_first(&fragment, "#container").unwrap().unwrap();
		let simple = glue.document().query_first(&fragment, "#simple").unwrap().unwrap();
		Self { glue, fragment, container, simple }
	}

	pub fn doc(&self) -> &VirtualDocument {
		self.glue.document()
	}

	pub fn query(&self, selector: &str) -> Option<NodeId> {
		self.doc().query_first(&self.fragment, selector).unwrap()
	}

	pub fn text(&self, selector: &str) -> String {
		let element = self.query(selector).unwrap_or_else(|| panic!("nothing matches {:?}", selector));
		self.doc().text_content(&element)
	}

	pub fn attribute(&self, selector: &str, name: &str) -> Option<String> {
		let element = self.query(selector).unwrap_or_else(|| panic!("nothing matches {:?}", selector));
		self.doc().attribute(&element, name)
	}

	pub fn markup(&self) -> String {
		self.doc().serialize(&self.fragment)
	}
}

pub fn data(json: serde_json::Value) -> DataTree {
	DataTree::try_from(json).unwrap()
}
