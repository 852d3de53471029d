//! LESS IR - stylesheet tree types.
//!
//! This crate contains the data structures shared by the evaluation engine
//! and the driver:
//! - `Name` and the string interner for variable names
//! - `Span` for source locations
//! - the AST (`Node`, `Block`, `Expr`, selectors, features)
//! - `Printer` for textual representation of tree fragments
//! - `TreeBuilder` for constructing trees without a parser
//!
//! Trees are plain owned data (`Send + Sync`). Evaluation state that belongs
//! to a definition (closures, recursion counters) is kept by the evaluator,
//! keyed by `DefId`, never on the tree itself.

pub mod ast;
pub mod builder;
mod interner;
mod name;
pub mod repr;
mod span;

pub use ast::{
    Argument, Block, BlockDirective, Color, Combinator, Comment, CondOp, Condition, DefId,
    Definition, Directive, Element, ElementKind, Expr, Features, Guard, Import, ImportMarker,
    Media, Mixin, MixinArgs, MixinCall, MixinParams, Node, Operator, Parameter, Quoted, Rule,
    Ruleset, Selector, Selectors, Stylesheet, Variable,
};
pub use builder::TreeBuilder;
pub use interner::{InternError, SharedInterner, StringInterner, ARGUMENTS};
pub use name::Name;
pub use repr::{format_number, Printer};
pub use span::Span;
