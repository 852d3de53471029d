// Test code uses unwrap/expect for clarity - panics provide good test failure messages
#![allow(clippy::unwrap_used, clippy::expect_used)]

//! End-to-end tests: trees built with `TreeBuilder`, expanded and rendered
//! through the public `lessc` entry points.

use std::fs;

use less_eval::{
    Context, ContextBuilder, LessErrorKind, MemoryLoader, Options, PrebuiltParser,
};
use less_ir::{CondOp, MixinArgs, Node, SharedInterner, Stylesheet, TreeBuilder};
use lessc::{init_tracing, render, FilesystemLoader};
use pretty_assertions::assert_eq;

fn context(interner: &SharedInterner) -> Context {
    ContextBuilder::new().interner(interner.clone()).build()
}

fn guarded_width(b: &TreeBuilder<'_>, width: f64) -> Stylesheet {
    let guard = b.guard(vec![b.cond(CondOp::Gt, b.var("@w"), b.px(5.0))]);
    b.stylesheet(vec![
        b.def("@w", b.px(width)),
        b.mixin(".x", vec![], Some(guard), vec![b.rule("width", b.var("@w"))]),
        b.ruleset(".page", vec![b.call_with(".x", None, false)]),
    ])
}

#[test]
fn guard_true_branch_emits_declaration() {
    init_tracing();
    let interner = SharedInterner::new();
    let b = TreeBuilder::new(&interner);
    let mut ctx = context(&interner);
    let css = render(&guarded_width(&b, 10.0), &mut ctx).unwrap();
    assert_eq!(css, ".page {\n  width: 10px;\n}\n");
}

#[test]
fn guard_false_branch_emits_nothing() {
    let interner = SharedInterner::new();
    let b = TreeBuilder::new(&interner);
    let mut ctx = context(&interner);
    let css = render(&guarded_width(&b, 3.0), &mut ctx).unwrap();
    assert_eq!(css, "");
}

#[test]
fn expand_is_reexported_and_leaves_input_intact() {
    let interner = SharedInterner::new();
    let b = TreeBuilder::new(&interner);
    let mut ctx = context(&interner);
    let sheet = guarded_width(&b, 10.0);
    let expanded = lessc::expand(&sheet, &mut ctx).unwrap();
    assert!(matches!(
        expanded.block.get(2).and_then(Node::block).and_then(|blk| blk.get(0)),
        Some(Node::Rule(_))
    ));
    assert!(matches!(
        sheet.block.get(2).and_then(Node::block).and_then(|blk| blk.get(0)),
        Some(Node::MixinCall(_))
    ));
}

#[test]
fn nested_media_are_combined_and_hoisted() {
    let interner = SharedInterner::new();
    let b = TreeBuilder::new(&interner);
    let mut ctx = context(&interner);
    let sheet = b.stylesheet(vec![b.media(
        vec![b.kwd("screen")],
        vec![b.ruleset(
            ".a",
            vec![
                b.rule("x", b.kwd("y")),
                b.media(
                    vec![b.feature("min-width", b.px(10.0))],
                    vec![b.rule("x", b.kwd("z"))],
                ),
            ],
        )],
    )]);
    let css = render(&sheet, &mut ctx).unwrap();
    assert_eq!(
        css,
        "@media screen {\n  .a {\n    x: y;\n  }\n}\n\
         @media screen and (min-width: 10px) {\n  .a {\n    x: z;\n  }\n}\n"
    );
}

#[test]
fn important_namespaced_mixin() {
    let interner = SharedInterner::new();
    let b = TreeBuilder::new(&interner);
    let mut ctx = context(&interner);
    let sheet = b.stylesheet(vec![
        b.ruleset(
            "#theme",
            vec![b.mixin(
                ".button",
                vec![b.param_default("@bg", b.color(0x33, 0x66, 0x99))],
                None,
                vec![
                    b.rule("background", b.var("@bg")),
                    b.ruleset("&:hover", vec![b.rule("background", b.kwd("black"))]),
                ],
            )],
        ),
        b.ruleset(
            "a.btn",
            vec![b.call_with("#theme > .button", Some(MixinArgs::default()), true)],
        ),
    ]);
    let css = render(&sheet, &mut ctx).unwrap();
    assert_eq!(
        css,
        "a.btn {\n  background: #336699 !important;\n}\n\
         a.btn:hover {\n  background: black !important;\n}\n"
    );
}

#[test]
fn compressed_output_with_once_imports() {
    let interner = SharedInterner::new();
    let b = TreeBuilder::new(&interner);
    let lib = b.stylesheet(vec![
        b.def("@gap", b.px(4.0)),
        b.mixin(".pad", vec![], None, vec![b.rule("padding", b.mul(b.var("@gap"), b.num(2.0)))]),
    ]);
    let mut ctx = ContextBuilder::new()
        .interner(interner.clone())
        .options(Options::default().with_compress(true))
        .loader(MemoryLoader::new().with_file("lib.less", ""))
        .parser(PrebuiltParser::new().with_tree("lib.less", lib))
        .build();
    let sheet = b.stylesheet(vec![
        b.import_once("lib"),
        b.ruleset(".a", vec![b.import_once("lib"), b.call(".pad", vec![])]),
    ]);
    let css = render(&sheet, &mut ctx).unwrap();
    assert_eq!(css, ".a{padding:8px}");
    assert_eq!(ctx.parse_count(), 1);
}

#[test]
fn filesystem_imports_resolve_against_root() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("colors.less"), "@brand: teal;").unwrap();

    let interner = SharedInterner::new();
    let b = TreeBuilder::new(&interner);
    let colors = b.stylesheet(vec![b.def("@brand", b.kwd("teal"))]);
    let mut ctx = ContextBuilder::new()
        .interner(interner.clone())
        .loader(FilesystemLoader)
        .parser(PrebuiltParser::new().with_tree(dir.path().join("colors.less"), colors))
        .root(dir.path().join("main.less"))
        .build();
    let sheet = b.stylesheet(vec![
        b.import("colors"),
        b.ruleset(".logo", vec![b.rule("color", b.var("@brand"))]),
    ]);
    let css = render(&sheet, &mut ctx).unwrap();
    assert_eq!(css, ".logo {\n  color: teal;\n}\n");
}

#[test]
fn filesystem_errors_are_import_failures() {
    let dir = tempfile::tempdir().unwrap();
    let interner = SharedInterner::new();
    let b = TreeBuilder::new(&interner);
    let mut ctx = ContextBuilder::new()
        .interner(interner.clone())
        .loader(FilesystemLoader)
        .parser(PrebuiltParser::new())
        .root(dir.path().join("main.less"))
        .build();
    let err = render(&b.stylesheet(vec![b.import("missing")]), &mut ctx).unwrap_err();
    match &err.kind {
        LessErrorKind::ImportFailed { path, .. } => assert!(path.ends_with("missing.less")),
        other => panic!("expected an import failure, got {other:?}"),
    }
    assert_eq!(err.trail()[0].repr, "@import \"missing\"");
}

#[test]
fn evaluation_errors_are_reported_with_their_trail() {
    let interner = SharedInterner::new();
    let b = TreeBuilder::new(&interner);
    let mut ctx = context(&interner);
    let sheet = b.stylesheet(vec![
        b.mixin(".m", vec![b.param("@a")], None, vec![b.rule("w", b.var("@b"))]),
        b.ruleset(".x", vec![b.call(".m", vec![b.px(1.0)])]),
    ]);
    let err = render(&sheet, &mut ctx).unwrap_err();
    assert_eq!(
        err.report(),
        "undefined variable @b\n  in w: @b;\n  in .m(1px);\n  in .x { }"
    );
}
