use dom_glue::{create, DataTree, Document, DocumentError, GlueError, Options, VirtualDocument};
use serde_json::json;

mod common;
use common::{data, init_tracing, Page};

fn fruit() -> DataTree {
	data(json!({ "data": { "apples": "yuck?", "bananas": { "*": "yay" } } }))
}

#[test]
fn fill_matches_live_update() {
	let page = Page::new();
	let template = page.glue.template(page.doc().inner_markup(&page.container));
	let view = page.glue.live(page.container).unwrap();

	let filled = template.fill(&fruit(), false).unwrap();
	view.update(&fruit(), false).unwrap();

	assert!(filled.contains("yuck?"));
	assert_eq!(filled, page.doc().inner_markup(&page.container));
}

#[test]
fn render_matches_live_render() {
	let page = Page::new();
	let template = page.glue.template(page.doc().inner_markup(&page.container));
	let view = page.glue.live(page.container).unwrap();

	let rendered = template.render(&fruit(), false).unwrap();
	view.render(&fruit(), false).unwrap();

	assert!(!rendered.contains("oranges"));
	assert_eq!(rendered, page.doc().inner_markup(&page.container));
}

#[test]
fn fill_many_concatenates_instances() {
	init_tracing();
	let glue = create(Options::default(), VirtualDocument::new());
	let template = glue.template(r#"<i data-key="value"></i>"#);
	let items = [data(json!({ "value": "a" })), data(json!({ "value": "b" }))];

	assert_eq!(template.fill_many(&items, false, None).unwrap(), r#"<i data-key="value">a</i><i data-key="value">b</i>"#);
	assert_eq!(
		template.fill_many(&items, false, Some("<br />")).unwrap(),
		r#"<i data-key="value">a</i><br /><i data-key="value">b</i>"#
	);
	assert_eq!(template.fill_many(&items[..1], false, Some("<br />")).unwrap(), r#"<i data-key="value">a</i>"#);
	assert_eq!(template.fill_many(Vec::<DataTree>::new().iter(), false, Some("<br />")).unwrap(), "");
}

#[test]
fn render_many_prunes_each_instance_independently() {
	init_tracing();
	let glue = create(Options::default(), VirtualDocument::new());
	let template = glue.template(r#"<b data-key="a"></b><i data-key="b"></i>"#);
	let items = vec![data(json!({ "a": "1" })), data(json!({ "b": "2" })), DataTree::new()];

	assert_eq!(template.render_many(&items, false, Some("|")).unwrap(), r#"<b data-key="a">1</b>|<i data-key="b">2</i>|"#);
	assert_eq!(
		template.fill_many(&items, false, Some("|")).unwrap(),
		r#"<b data-key="a">1</b><i data-key="b"></i>|<b data-key="a"></b><i data-key="b">2</i>|<b data-key="a"></b><i data-key="b"></i>"#
	);
}

#[test]
fn raw_content_is_parsed_into_the_instance() {
	init_tracing();
	let glue = create(Options::default(), VirtualDocument::new());
	let template = glue.template(r#"<i data-key="value"></i>"#);
	let item = data(json!({ "value": "<em>x</em> &amp; y" }));

	assert_eq!(template.fill(&item, true).unwrap(), r#"<i data-key="value"><em>x</em> &amp; y</i>"#);
	assert_eq!(template.fill(&item, false).unwrap(), r#"<i data-key="value">&lt;em&gt;x&lt;/em&gt; &amp;amp; y</i>"#);
}

#[test]
fn operators_work_in_templates() {
	init_tracing();
	let glue = create(Options::default(), VirtualDocument::new());
	let template = glue.template(r#"<a data-key="link" class="link" href="/">home</a>"#);
	let item = data(json!({ "link": { "+.@class": "active", "+@href": "about", "^*": "go " } }));

	assert_eq!(template.fill(&item, false).unwrap(), r#"<a data-key="link" class="link active" href="/about">go home</a>"#);
	// Templates are reparsed per instance, so operators never accumulate.
	assert_eq!(template.fill(&item, false).unwrap(), template.fill(&item, false).unwrap());
}

#[test]
fn instances_are_discarded() {
	init_tracing();
	let glue = create(Options::default(), VirtualDocument::new());
	let template = glue.template(r#"<ul><li data-key="name">x</li><!-- item --></ul>"#);
	let before = glue.document().node_count();

	let markup = template.fill(&DataTree::new(), false).unwrap();
	assert_eq!(markup, r#"<ul><li data-key="name">x</li><!-- item --></ul>"#);
	assert_eq!(glue.document().node_count(), before);

	let item = data(json!({ "name": "new" }));
	for _ in 0..100 {
		assert_eq!(template.fill(&item, false).unwrap(), r#"<ul><li data-key="name">new</li><!-- item --></ul>"#);
		template.fill(&data(json!({ "name": "<b>new</b>" })), true).unwrap();
		template.render(&DataTree::new(), false).unwrap();
	}
	assert_eq!(glue.document().node_count(), before);
}

#[test]
fn entities_survive_a_round_trip() {
	init_tracing();
	let glue = create(Options::default(), VirtualDocument::new());
	let template = glue.template(r#"<p data-key="x" title="&copy; &amp; &bogus;">a &amp; b&nbsp;c &lt;3 &bogus; fish & chips</p>"#);

	assert_eq!(
		template.fill(&DataTree::new(), false).unwrap(),
		"<p data-key=\"x\" title=\"\u{a9} &amp; &amp;bogus;\">a &amp; b\u{a0}c &lt;3 &amp;bogus; fish &amp; chips</p>"
	);

	let raw = data(json!({ "x": "&copy;&#32;<i>&nbsp;</i>" }));
	assert_eq!(template.fill(&raw, true).unwrap(), "<p data-key=\"x\" title=\"\u{a9} &amp; &amp;bogus;\">\u{a9} <i>\u{a0}</i></p>");
}

#[test]
fn void_elements_and_stray_end_tags() {
	init_tracing();
	let glue = create(Options::default(), VirtualDocument::new());
	let template = glue.template(r#"<p data-key="line">a<br>b</p><img data-key="picture" alt></span>"#);
	let item = data(json!({ "picture": { "@src": "x.png", "@alt": "X" } }));

	assert_eq!(
		template.fill(&item, false).unwrap(),
		r#"<p data-key="line">a<br />b</p><img data-key="picture" alt="X" src="x.png" />"#
	);
}

#[test]
fn malformed_blueprints_fail() {
	init_tracing();
	let glue = create(Options::default(), VirtualDocument::new());
	let template = glue.template(r#"<i data-key="value""#);
	assert!(matches!(template.fill(&DataTree::new(), false), Err(GlueError::Document(DocumentError::Markup { .. }))));
	assert!(matches!(template.fill_many(&[DataTree::new()], false, None), Err(GlueError::Document(DocumentError::Markup { .. }))));
}
