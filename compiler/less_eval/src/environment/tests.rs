use less_ir::{StringInterner, TreeBuilder};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

use super::*;

fn frame(b: &TreeBuilder<'_>, defs: &[(&str, &str)]) -> Frame {
    Frame::new(b.block(
        defs.iter()
            .map(|(name, value)| b.def(name, b.kwd(value)))
            .collect(),
    ))
}

#[test]
fn test_lookup_prefers_innermost_frame() {
    let interner = StringInterner::new();
    let b = TreeBuilder::new(&interner);
    let mut env = Environment::new();
    env.push(frame(&b, &[("@a", "outer"), ("@b", "only")]));
    env.push(frame(&b, &[("@a", "inner")]));
    assert_eq!(
        env.lookup_variable(interner.intern("@a")),
        Some(b.kwd("inner"))
    );
    assert_eq!(
        env.lookup_variable(interner.intern("@b")),
        Some(b.kwd("only"))
    );
    assert_eq!(env.lookup_variable(interner.intern("@c")), None);
}

#[test]
fn test_scoped_pops_on_drop() {
    let interner = StringInterner::new();
    let b = TreeBuilder::new(&interner);
    let mut env = Environment::new();
    env.push(frame(&b, &[]));
    {
        let scoped = env.scoped(frame(&b, &[("@x", "1")]));
        assert_eq!(scoped.depth(), 2);
        assert!(scoped.lookup_variable(interner.intern("@x")).is_some());
    }
    assert_eq!(env.depth(), 1);
    assert!(env.lookup_variable(interner.intern("@x")).is_none());
}

#[test]
fn test_scoped_pops_on_early_return() {
    fn fails(env: &mut Environment, frame: Frame) -> Result<(), ()> {
        let _scoped = env.scoped(frame);
        Err(())
    }

    let interner = StringInterner::new();
    let b = TreeBuilder::new(&interner);
    let mut env = Environment::new();
    assert!(fails(&mut env, frame(&b, &[])).is_err());
    assert_eq!(env.depth(), 0);
}

#[test]
fn test_copy_shares_frames_but_not_list() {
    let interner = StringInterner::new();
    let b = TreeBuilder::new(&interner);
    let mut env = Environment::new();
    let base = frame(&b, &[]);
    env.push(base.clone());
    let mut copy = env.copy();
    copy.push(frame(&b, &[]));
    assert_eq!(env.depth(), 1);
    assert_eq!(copy.depth(), 2);
    assert!(copy.frames()[0].ptr_eq(&base));

    // Rules added to a shared frame are visible through every copy.
    base.borrow_mut().push(b.def("@late", b.kwd("v")));
    assert!(copy.lookup_variable(interner.intern("@late")).is_some());
}

#[test]
fn test_append_places_closure_frames_innermost() {
    let interner = StringInterner::new();
    let b = TreeBuilder::new(&interner);
    let mut caller = Environment::new();
    caller.push(frame(&b, &[("@a", "caller")]));
    let mut closure = Environment::new();
    closure.push(frame(&b, &[("@a", "closure")]));

    let mut env = caller.copy();
    env.append(closure.frames());
    env.push(frame(&b, &[("@arg", "bound")]));
    assert_eq!(
        env.lookup_variable(interner.intern("@a")),
        Some(b.kwd("closure"))
    );
    assert_eq!(
        env.lookup_variable(interner.intern("@arg")),
        Some(b.kwd("bound"))
    );
}

proptest! {
    /// A name bound in several frames resolves to the innermost binding.
    #[test]
    fn prop_lookup_returns_innermost_binding(
        bound in proptest::collection::vec(any::<bool>(), 1..12),
    ) {
        let interner = StringInterner::new();
        let b = TreeBuilder::new(&interner);
        let mut env = Environment::new();
        for (i, has) in bound.iter().enumerate() {
            let value = format!("v{i}");
            let defs: Vec<(&str, &str)> = if *has { vec![("@n", value.as_str())] } else { vec![] };
            env.push(frame(&b, &defs));
        }
        let expected = bound
            .iter()
            .rposition(|has| *has)
            .map(|i| b.kwd(&format!("v{i}")));
        prop_assert_eq!(env.lookup_variable(interner.intern("@n")), expected);
    }
}
