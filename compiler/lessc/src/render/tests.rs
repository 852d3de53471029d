use less_eval::Options;
use less_ir::{Node, StringInterner, TreeBuilder};
use pretty_assertions::assert_eq;

use super::CssRenderer;

fn render(interner: &StringInterner, options: &Options, rules: Vec<Node>) -> String {
    let b = TreeBuilder::new(interner);
    CssRenderer::new(interner, options).render(&b.stylesheet(rules))
}

#[test]
fn test_nested_rulesets_are_flattened() {
    let interner = StringInterner::new();
    let b = TreeBuilder::new(&interner);
    let css = render(
        &interner,
        &Options::default(),
        vec![b.ruleset(
            ".a",
            vec![
                b.rule("color", b.kwd("red")),
                b.ruleset(".b", vec![b.rule("width", b.px(1.0))]),
                b.ruleset("&:hover", vec![b.rule("color", b.kwd("blue"))]),
                b.ruleset("> li", vec![b.rule("margin", b.num(0.0))]),
            ],
        )],
    );
    assert_eq!(
        css,
        ".a {\n  color: red;\n}\n\
         .a .b {\n  width: 1px;\n}\n\
         .a:hover {\n  color: blue;\n}\n\
         .a > li {\n  margin: 0;\n}\n"
    );
}

#[test]
fn test_selector_lists_multiply() {
    let interner = StringInterner::new();
    let b = TreeBuilder::new(&interner);
    let css = render(
        &interner,
        &Options::default(),
        vec![b.ruleset(
            ".a, .b",
            vec![b.ruleset(".c, & + &", vec![b.rule("k", b.kwd("v"))])],
        )],
    );
    assert_eq!(css, ".a .c, .a + .a, .b .c, .b + .b {\n  k: v;\n}\n");
}

#[test]
fn test_media_bubbles_out_of_rulesets() {
    let interner = StringInterner::new();
    let b = TreeBuilder::new(&interner);
    let css = render(
        &interner,
        &Options::default(),
        vec![b.ruleset(
            ".a",
            vec![
                b.rule("width", b.px(10.0)),
                b.media(vec![b.kwd("print")], vec![b.rule("width", b.px(5.0))]),
            ],
        )],
    );
    assert_eq!(
        css,
        ".a {\n  width: 10px;\n}\n@media print {\n  .a {\n    width: 5px;\n  }\n}\n"
    );
}

#[test]
fn test_non_output_nodes_are_skipped() {
    let interner = StringInterner::new();
    let b = TreeBuilder::new(&interner);
    let css = render(
        &interner,
        &Options::default(),
        vec![
            b.import("reset.css"),
            b.def("@w", b.px(1.0)),
            b.mixin(".m", vec![], None, vec![b.rule("k", b.kwd("v"))]),
            b.comment(" kept "),
            b.ruleset(".empty", vec![b.def("@x", b.num(1.0))]),
        ],
    );
    assert_eq!(css, "@import \"reset.css\";\n/* kept */\n");
}

#[test]
fn test_charset_comes_first() {
    let interner = StringInterner::new();
    let b = TreeBuilder::new(&interner);
    let mut sheet = b.stylesheet(vec![
        b.ruleset(".a", vec![b.rule("k", b.kwd("v"))]),
        b.directive("@charset", Some(b.quoted("utf-8"))),
    ]);
    if let Some(Node::Directive(charset)) = sheet.block.get(1).cloned() {
        sheet.block.set_charset(charset);
    }
    let css = CssRenderer::new(&interner, &Options::default()).render(&sheet);
    assert_eq!(css, "@charset \"utf-8\";\n.a {\n  k: v;\n}\n");
}

#[test]
fn test_block_directives_hold_bare_declarations() {
    let interner = StringInterner::new();
    let b = TreeBuilder::new(&interner);
    let css = render(
        &interner,
        &Options::default().with_indent(4),
        vec![b.block_directive(
            "@font-face",
            vec![b.rule("font-family", b.quoted("Mono"))],
        )],
    );
    assert_eq!(css, "@font-face {\n    font-family: \"Mono\";\n}\n");
}

#[test]
fn test_compressed_output() {
    let interner = StringInterner::new();
    let b = TreeBuilder::new(&interner);
    let css = render(
        &interner,
        &Options::default().with_compress(true),
        vec![
            b.comment(" dropped "),
            b.ruleset(
                ".a",
                vec![
                    b.rule("color", b.color(0xff, 0x00, 0x00)),
                    b.important("margin", b.expn(vec![b.num(0.0), b.kwd("auto")])),
                    b.ruleset("> .b", vec![b.rule("font", b.list(vec![b.kwd("x"), b.kwd("y")]))]),
                ],
            ),
        ],
    );
    assert_eq!(css, ".a{color:#f00;margin:0 auto!important}.a>.b{font:x,y}");
}
