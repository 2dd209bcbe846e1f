#![cfg(target_arch = "wasm32")]

use dom_glue::{create, web::WebDocument, DataTree, Document as _, GlueError, Options};
use std::sync::Once;
use wasm_bindgen::JsCast;
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};
use web_sys::{window, HtmlBodyElement};

wasm_bindgen_test_configure!(run_in_browser);

static LOG: Once = Once::new();

fn body() -> HtmlBodyElement {
	LOG.call_once(tracing_wasm::set_as_global_default);
	window().unwrap().document().unwrap().body().unwrap().dyn_into::<HtmlBodyElement>().unwrap()
}

#[wasm_bindgen_test]
fn render_in_browser() {
	let body = body();
	body.set_inner_html(r#"<div id="fruit"><span data-key="apples" class="a">3</span><ul data-key="bananas"><li data-key="name">x</li></ul><p data-key="gone"></p></div>"#);

	let glue = create(Options::default(), WebDocument::from_window().unwrap());
	let root = glue.document().query_first(&body.clone().into(), "#fruit").unwrap().unwrap();
	let mut view = glue.live(root).unwrap();

	view.render(
		&DataTree::new()
			.with("apples", DataTree::new().with("+.@class", "b").with("+*", "0"))
			.with("bananas", DataTree::new().with("name", "<b>yay</b>")),
		false,
	)
	.unwrap();

	assert_eq!(view.get("apples", None).unwrap().as_deref(), Some("30"));
	assert_eq!(view.get("apples", Some("class")).unwrap().as_deref(), Some("a b"));
	assert_eq!(view.get("name", None).unwrap().as_deref(), Some("<b>yay</b>"));
	assert!(view.find("gone").unwrap().is_none());

	let apples = view.find("apples").unwrap().unwrap();
	assert_eq!(glue.document().identity(&apples), glue.document().identity(&view.find("apples").unwrap().unwrap()));
	assert_ne!(glue.document().identity(&apples), glue.document().identity(&view.element().unwrap()));

	let root = view.destroy().unwrap();
	assert!(matches!(view.update(&DataTree::new(), false), Err(GlueError::HandleDestroyed)));
	assert!(glue.document().contains(&body.into(), &root));
}

#[wasm_bindgen_test]
fn template_in_browser() {
	body();
	let glue = create(Options::default(), WebDocument::from_window().unwrap());
	let template = glue.template(r#"<li data-key="name"></li>"#);
	let items = [DataTree::new().with("name", "a"), DataTree::new().with("name", "<b>")];

	assert_eq!(template.fill_many(&items, false, None).unwrap(), r#"<li data-key="name">a</li><li data-key="name">&lt;b&gt;</li>"#);
	assert_eq!(template.fill_many(&items, true, Some("|")).unwrap(), r#"<li data-key="name">a</li>|<li data-key="name"><b></b></li>"#);
}
