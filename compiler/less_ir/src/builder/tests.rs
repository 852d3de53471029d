use pretty_assertions::assert_eq;

use super::*;
use crate::repr::Printer;

#[test]
fn test_selector_parsing_round_trips_through_printer() {
    let interner = StringInterner::new();
    let b = TreeBuilder::new(&interner);
    let printer = Printer::new(&interner);
    for text in [
        ".a",
        "ul > li:hover a",
        "&.active",
        "& + &",
        "#ns .m",
        "a[href] ~ b::before",
        "li:not(.x)",
    ] {
        assert_eq!(printer.selector(&b.selector(text)), text);
    }
}

#[test]
fn test_compound_selector_has_no_combinators() {
    let interner = StringInterner::new();
    let b = TreeBuilder::new(&interner);
    let selector = b.selector("#ns.m");
    assert_eq!(selector.elements.len(), 2);
    assert!(selector.elements.iter().all(|e| e.combinator.is_none()));
    assert_eq!(selector.match_path(), vec!["#ns", ".m"]);
}

#[test]
fn test_leading_combinator() {
    let interner = StringInterner::new();
    let b = TreeBuilder::new(&interner);
    let selector = b.selector("> .child");
    assert_eq!(selector.elements[0].combinator, Some(Combinator::Child));
}

#[test]
fn test_selector_group() {
    let interner = StringInterner::new();
    let b = TreeBuilder::new(&interner);
    assert_eq!(b.selectors(".a, .b").selectors.len(), 2);
}

#[test]
fn test_quoted_interpolation_parts() {
    let interner = StringInterner::new();
    let b = TreeBuilder::new(&interner);
    let Expr::Quoted(quoted) = b.quoted("img/@{name}.png") else {
        panic!("expected a quoted string");
    };
    assert_eq!(quoted.parts.len(), 3);
    assert_eq!(
        quoted.parts[1],
        Expr::Variable(Variable {
            name: interner.intern("@name"),
            indirect: false,
            curly: true,
        })
    );
}

#[test]
fn test_not_flips_negation() {
    let interner = StringInterner::new();
    let b = TreeBuilder::new(&interner);
    let cond = b.not(b.cond(CondOp::Gt, b.var("@a"), b.num(1.0)));
    let Expr::Condition(cond) = cond else {
        panic!("expected a condition");
    };
    assert!(cond.negate);
}
