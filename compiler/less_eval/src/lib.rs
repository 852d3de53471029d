//! LESS evaluation engine.
//!
//! Expands a parsed stylesheet into a tree ready for output:
//! - `@import` rules are loaded through the context and spliced in place
//! - mixin calls are resolved against the scope chain and replaced by the
//!   evaluated bodies of every matching definition
//! - variables, operations, guards and media features are evaluated
//!
//! Parsing and CSS output live outside this crate. The context carries the
//! source loader and parser used for imports; `lessc` renders the result.

mod context;
mod definitions;
mod environment;
mod errors;
mod eval;
pub mod features;
mod stack;

pub use context::{
    normalize_path, Context, ContextBuilder, MemoryLoader, Options, PrebuiltParser, SourceLoader,
    StylesheetParser,
};
pub use definitions::{DefinitionTable, EntryGuard};
pub use environment::{Environment, Frame, LocalScope, ScopedEnv};
pub use errors::{
    import_failed, syntax_error, ErrorCategory, ErrorContext, LessError, LessErrorKind, LessResult,
};
pub use eval::Evaluator;
pub use features::combine;
pub use stack::ensure_sufficient_stack;

use less_ir::Stylesheet;

/// Evaluate `sheet` in a fresh environment, returning the expanded copy.
///
/// The input tree is left untouched and may be expanded again.
#[tracing::instrument(level = "debug", skip_all)]
pub fn expand(sheet: &Stylesheet, ctx: &mut Context) -> LessResult<Stylesheet> {
    let mut env = Environment::new();
    Evaluator::new(ctx).evaluate_stylesheet(&mut env, sheet)
}
