use pretty_assertions::assert_eq;

use super::*;
use crate::ast::{Argument, CondOp, Element, Parameter};

#[test]
fn test_format_number() {
    assert_eq!(format_number(10.0), "10");
    assert_eq!(format_number(-3.0), "-3");
    assert_eq!(format_number(0.5), "0.5");
    assert_eq!(format_number(1.0 / 3.0), "0.33333333");
    assert_eq!(format_number(-0.0), "0");
}

#[test]
fn test_dimension_and_expression() {
    let interner = StringInterner::new();
    let printer = Printer::new(&interner);
    let expr = Expr::Expression(vec![
        Expr::dimension(1.0, Some("px")),
        Expr::keyword("solid"),
        Expr::Color(Color::rgb(255, 0, 0)),
    ]);
    assert_eq!(printer.expr(&expr), "1px solid #ff0000");
}

#[test]
fn test_color_compress_shortens_hex() {
    let interner = StringInterner::new();
    let printer = Printer::new(&interner).compress(true);
    assert_eq!(printer.expr(&Expr::Color(Color::rgb(255, 0, 0))), "#f00");
    assert_eq!(printer.expr(&Expr::Color(Color::rgb(18, 52, 86))), "#123456");
}

#[test]
fn test_translucent_color() {
    let interner = StringInterner::new();
    let printer = Printer::new(&interner);
    let color = Color {
        r: 1,
        g: 2,
        b: 3,
        a: 0.5,
    };
    assert_eq!(printer.expr(&Expr::Color(color)), "rgba(1, 2, 3, 0.5)");
}

#[test]
fn test_quoted_and_escaped() {
    let interner = StringInterner::new();
    let printer = Printer::new(&interner);
    let name = interner.intern("@name");
    let quoted = Quoted {
        delim: '"',
        escaped: false,
        parts: vec![
            Expr::anonymous("hello "),
            Expr::Variable(Variable {
                name,
                indirect: false,
                curly: true,
            }),
        ],
    };
    assert_eq!(printer.expr(&Expr::Quoted(quoted.clone())), "\"hello @{name}\"");
    let escaped = Quoted {
        escaped: true,
        ..quoted
    };
    assert_eq!(printer.expr(&Expr::Quoted(escaped)), "hello @{name}");
}

#[test]
fn test_selector_combinators() {
    let interner = StringInterner::new();
    let selector = Selector::new(vec![
        Element::text(None, "ul"),
        Element::text(Some(Combinator::Child), "li"),
        Element::text(None, ":hover"),
        Element::text(Some(Combinator::Descendant), "a"),
    ]);
    assert_eq!(Printer::new(&interner).selector(&selector), "ul > li:hover a");
    assert_eq!(
        Printer::new(&interner).compress(true).selector(&selector),
        "ul>li:hover a"
    );
}

#[test]
fn test_feature_list() {
    let interner = StringInterner::new();
    let features = Features::new(vec![
        Expr::keyword("screen"),
        Expr::Expression(vec![
            Expr::keyword("print"),
            Expr::keyword("and"),
            Expr::Feature {
                property: Box::new(Expr::keyword("min-width")),
                value: Box::new(Expr::dimension(100.0, Some("px"))),
            },
        ]),
    ]);
    assert_eq!(
        Printer::new(&interner).features(&features),
        "screen, print and (min-width: 100px)"
    );
}

#[test]
fn test_mixin_call_node() {
    let interner = StringInterner::new();
    let call = Node::MixinCall(crate::ast::MixinCall {
        selector: Selector::new(vec![Element::text(None, ".m")]),
        args: Some(MixinArgs::new(vec![
            Argument {
                name: None,
                value: Expr::dimension(1.0, Some("px")),
            },
            Argument {
                name: Some(interner.intern("@color")),
                value: Expr::keyword("red"),
            },
        ])),
        important: true,
        span: crate::Span::DUMMY,
    });
    assert_eq!(
        Printer::new(&interner).node(&call),
        ".m(1px, @color: red) !important;"
    );
}

#[test]
fn test_mixin_definition_node() {
    let interner = StringInterner::new();
    let a = interner.intern("@a");
    let mixin = Node::Mixin(crate::ast::Mixin {
        id: crate::ast::DefId::fresh(),
        selector: Selector::new(vec![Element::text(None, ".m")]),
        params: MixinParams::new(vec![
            Parameter {
                name: Some(a),
                default: Some(Expr::dimension(2.0, None)),
                variadic: false,
            },
            Parameter {
                name: None,
                default: None,
                variadic: true,
            },
        ]),
        guard: Some(Guard {
            conditions: vec![Expr::Condition(Box::new(Condition {
                op: CondOp::Gt,
                left: Expr::variable(a),
                right: Expr::dimension(0.0, None),
                negate: false,
            }))],
        }),
        block: crate::ast::Block::new(),
        span: crate::Span::DUMMY,
    });
    assert_eq!(
        Printer::new(&interner).node(&mixin),
        ".m(@a: 2, ...) when (@a > 0) { }"
    );
}
