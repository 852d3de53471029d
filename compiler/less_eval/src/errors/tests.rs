use std::path::PathBuf;

use pretty_assertions::assert_eq;

use super::*;

#[test]
fn test_categories() {
    assert_eq!(
        syntax_error("unexpected '}'", Span::new(1, 2)).category(),
        ErrorCategory::Syntax
    );
    assert_eq!(mixin_undefined(".m").category(), ErrorCategory::Execution);
    assert_eq!(
        unexpanded_mixin_call(".m;").category(),
        ErrorCategory::Internal
    );
}

#[test]
fn test_import_cycle_message_lists_chain() {
    let a = PathBuf::from("a.less");
    let b = PathBuf::from("b.less");
    let err = import_cycle(&a, &[a.as_path(), b.as_path()]);
    assert_eq!(
        err.to_string(),
        "import cycle detected: a.less -> b.less -> a.less"
    );
}

#[test]
fn test_import_failed_message() {
    let err = import_failed(&PathBuf::from("x.less"), "file not found");
    assert_eq!(
        err.to_string(),
        "an error occurred importing 'x.less': file not found"
    );
}

#[test]
fn test_report_includes_trail_innermost_first() {
    let err = undefined_variable("@w")
        .context("width: @w;", Span::new(10, 20))
        .context(".x { }", Span::DUMMY);
    assert_eq!(err.trail().len(), 2);
    assert_eq!(
        err.report(),
        "undefined variable @w\n  in width: @w; at 10..20\n  in .x { }"
    );
}

#[test]
fn test_wrong_arg_count_pluralizes() {
    assert_eq!(
        wrong_arg_count("iscolor", 1, 2).to_string(),
        "invalid operation: iscolor expects 1 argument, got 2"
    );
    assert_eq!(
        wrong_arg_count("isunit", 2, 1).to_string(),
        "invalid operation: isunit expects 2 arguments, got 1"
    );
}
