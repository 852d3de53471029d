use std::path::PathBuf;

use less_ir::{StringInterner, TreeBuilder};
use pretty_assertions::assert_eq;

use super::*;
use crate::errors::LessErrorKind;

fn context_with(files: &[(&str, Stylesheet)]) -> Context {
    let mut loader = MemoryLoader::new();
    let mut parser = PrebuiltParser::new();
    for (path, tree) in files {
        loader.insert(path, "");
        parser = parser.with_tree(path, tree.clone());
    }
    ContextBuilder::new().loader(loader).parser(parser).build()
}

#[test]
fn test_options_defaults() {
    let options = Options::default();
    assert_eq!(options.recursion_limit, 64);
    assert_eq!(options.import_extension, ".less");
    assert!(!options.compress);
    assert_eq!(options.indent, 2);
}

#[test]
fn test_options_builder_methods() {
    let options = Options::default()
        .with_recursion_limit(3)
        .with_import_extension(".lss")
        .with_compress(true)
        .with_indent(4);
    assert_eq!(options.recursion_limit, 3);
    assert_eq!(options.import_extension, ".lss");
    assert!(options.compress);
    assert_eq!(options.indent, 4);
}

#[test]
fn test_normalize_path() {
    assert_eq!(
        normalize_path(Path::new("a/./b/../c.less")),
        PathBuf::from("a/c.less")
    );
    assert_eq!(
        normalize_path(Path::new("../x.less")),
        PathBuf::from("../x.less")
    );
}

#[test]
fn test_resolve_path_uses_base_dir_then_root() {
    let ctx = ContextBuilder::new().root("styles/main.less").build();
    assert_eq!(
        ctx.resolve_path("mixins.less", None),
        PathBuf::from("styles/mixins.less")
    );
    assert_eq!(
        ctx.resolve_path("../b.less", Some(Path::new("styles/lib"))),
        PathBuf::from("styles/b.less")
    );
}

#[test]
fn test_root_is_part_of_import_chain() {
    let mut ctx = ContextBuilder::new().root("main.less").build();
    let err = ctx.start_import(Path::new("main.less"));
    assert!(matches!(
        err.map_err(|e| e.kind),
        Err(LessErrorKind::ImportCycle { .. })
    ));
}

#[test]
fn test_import_chain_cycle_detection() {
    let mut ctx = Context::new(SharedInterner::new());
    let a = Path::new("a.less");
    let b = Path::new("b.less");
    assert!(ctx.start_import(a).is_ok());
    assert!(ctx.start_import(b).is_ok());
    let err = ctx.start_import(a).err();
    assert_eq!(
        err.map(|e| e.to_string()),
        Some("import cycle detected: a.less -> b.less -> a.less".to_owned())
    );
    ctx.finish_import();
    ctx.finish_import();
    assert!(ctx.import_chain().is_empty());
    assert!(ctx.start_import(a).is_ok());
}

#[test]
fn test_once_loads_parse_a_single_time() {
    let interner = StringInterner::new();
    let b = TreeBuilder::new(&interner);
    let mut ctx = context_with(&[("lib.less", b.stylesheet(vec![b.rule("a", b.kwd("b"))]))]);
    let first = ctx.load_stylesheet(Path::new("lib.less"), true);
    let second = ctx.load_stylesheet(Path::new("lib.less"), true);
    assert!(first.is_ok());
    assert_eq!(first, second);
    assert_eq!(ctx.parse_count(), 1);

    // Plain loads always reparse.
    assert!(ctx.load_stylesheet(Path::new("lib.less"), false).is_ok());
    assert_eq!(ctx.parse_count(), 2);
}

#[test]
fn test_loaded_imports_are_stamped_with_base_dir() {
    let interner = StringInterner::new();
    let b = TreeBuilder::new(&interner);
    let tree = b.stylesheet(vec![b.ruleset(".a", vec![b.import("nested")])]);
    let mut ctx = context_with(&[("lib/theme.less", tree)]);
    let sheet = match ctx.load_stylesheet(Path::new("lib/theme.less"), false) {
        Ok(sheet) => sheet,
        Err(err) => panic!("load failed: {}", err.report()),
    };
    let Some(Node::Ruleset(ruleset)) = sheet.block.get(0) else {
        panic!("expected a ruleset");
    };
    let Some(Node::Import(import)) = ruleset.block.get(0) else {
        panic!("expected an import");
    };
    assert_eq!(import.base_dir, Some(PathBuf::from("lib")));
}

#[test]
fn test_missing_file_is_import_failure() {
    let mut ctx = context_with(&[]);
    let err = ctx.load_stylesheet(Path::new("missing.less"), false).err();
    assert_eq!(
        err.map(|e| e.kind),
        Some(LessErrorKind::ImportFailed {
            path: "missing.less".to_owned(),
            reason: "file not found".to_owned(),
        })
    );
}

#[test]
fn test_missing_parser_is_import_failure() {
    let mut ctx = ContextBuilder::new()
        .loader(MemoryLoader::new().with_file("a.less", ".a { }"))
        .build();
    let err = ctx.load_stylesheet(Path::new("a.less"), false).err();
    assert!(matches!(
        err.map(|e| e.kind),
        Some(LessErrorKind::ImportFailed { .. })
    ));
}
