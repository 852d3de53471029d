//! Stylesheet AST.
//!
//! # Module Structure
//!
//! - `node`: rule-level nodes and containers (`Node`, `Ruleset`, `Mixin`, ...)
//! - `block`: ordered rule lists with a lazily built structural index
//! - `expr`: value expressions
//! - `selector`: selectors and combinators
//!
//! Trees are plain owned data. The evaluator never mutates a parsed tree; it
//! works on copies, so a tree can be evaluated any number of times.

mod block;
mod expr;
mod node;
mod selector;

pub use block::Block;
pub use expr::{CondOp, Condition, Color, Expr, Operator, Quoted, Variable};
pub use node::{
    Argument, BlockDirective, Comment, DefId, Definition, Directive, Features, Guard, Import,
    ImportMarker, Media, Mixin, MixinArgs, MixinCall, MixinParams, Node, Parameter, Rule,
    Ruleset, Stylesheet,
};
pub use selector::{Combinator, Element, ElementKind, Selector, Selectors};
