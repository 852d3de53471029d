//! Statement and container nodes.

use std::path::PathBuf;
use std::sync::atomic::{AtomicU32, Ordering};

use super::{Block, Expr, Selector, Selectors};
use crate::{Name, Span};

/// Stable identity of a definition (mixin or ruleset).
///
/// Copies of a node share its id, so state keyed by `DefId` follows the
/// definition through every copy the evaluator makes.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct DefId(u32);

static NEXT_DEF_ID: AtomicU32 = AtomicU32::new(1);

impl DefId {
    /// Allocate a process-unique id.
    pub fn fresh() -> Self {
        DefId(NEXT_DEF_ID.fetch_add(1, Ordering::Relaxed))
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

#[derive(Clone, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Stylesheet {
    pub block: Block,
    pub span: Span,
}

impl Stylesheet {
    pub fn new(block: Block) -> Self {
        Stylesheet {
            block,
            span: Span::DUMMY,
        }
    }
}

/// Nested rule: `selectors { ... }`. Also callable as a parameterless mixin.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ruleset {
    pub id: DefId,
    pub selectors: Selectors,
    pub block: Block,
    pub span: Span,
}

/// Media feature list: an OR of alternatives. Each alternative is a single
/// term or an `Expression` of terms joined by the `and` keyword.
#[derive(Clone, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Features {
    pub features: Vec<Expr>,
}

impl Features {
    pub fn new(features: Vec<Expr>) -> Self {
        Features { features }
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

/// `@media features { ... }`.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Media {
    /// Features as written on this block.
    pub features: Features,
    /// Features in effect once combined with the enclosing media blocks.
    /// Set by evaluation; recomputed from `features` every time.
    pub effective: Option<Features>,
    pub block: Block,
    pub span: Span,
}

impl Media {
    pub fn new(features: Features, block: Block, span: Span) -> Self {
        Media {
            features,
            effective: None,
            block,
            span,
        }
    }

    /// Effective features, falling back to the written ones.
    pub fn effective_features(&self) -> &Features {
        self.effective.as_ref().unwrap_or(&self.features)
    }
}

/// Other block at-rules: `@font-face { ... }`, `@page { ... }`.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BlockDirective {
    /// Directive name including the `@`.
    pub name: String,
    pub block: Block,
    pub span: Span,
}

/// Declaration: `property: value [!important]`.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rule {
    pub property: String,
    pub value: Expr,
    pub important: bool,
    pub span: Span,
}

/// Variable definition: `@name: value`.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Definition {
    pub name: Name,
    pub value: Expr,
    pub span: Span,
}

/// Statement at-rule: `@charset "utf-8";`, `@namespace svg url(...);`.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Directive {
    pub name: String,
    pub value: Option<Expr>,
    pub span: Span,
}

impl Directive {
    pub fn is_charset(&self) -> bool {
        self.name.eq_ignore_ascii_case("@charset")
    }
}

#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Comment {
    pub text: String,
    /// `/* */` comment; line comments are never rendered.
    pub block: bool,
    pub span: Span,
}

/// `@import [(once)] path [features];`.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Import {
    pub path: Expr,
    pub once: bool,
    pub features: Option<Features>,
    /// Directory of the file this import was parsed from.
    pub base_dir: Option<PathBuf>,
    pub span: Span,
}

/// Brackets the rules spliced in for an import.
///
/// Markers carry the import so errors raised inside the range can name it;
/// they are never rendered.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImportMarker {
    pub import: Box<Import>,
    pub begin: bool,
}

/// Mixin parameter.
///
/// - `@name` / `@name: default`: named parameter
/// - literal value: pattern parameter (`name` is `None`, `default` is the
///   pattern the argument must equal)
/// - `@rest...` / `...`: variadic
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Parameter {
    pub name: Option<Name>,
    pub default: Option<Expr>,
    pub variadic: bool,
}

impl Parameter {
    pub fn is_pattern(&self) -> bool {
        self.name.is_none() && !self.variadic
    }
}

#[derive(Clone, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MixinParams {
    pub params: Vec<Parameter>,
}

impl MixinParams {
    pub fn new(params: Vec<Parameter>) -> Self {
        MixinParams { params }
    }

    pub fn is_variadic(&self) -> bool {
        self.params.last().is_some_and(|p| p.variadic)
    }

    /// Number of parameters that must be supplied by the caller.
    pub fn required(&self) -> usize {
        self.params
            .iter()
            .filter(|p| p.is_pattern() || (!p.variadic && p.default.is_none()))
            .count()
    }
}

/// Mixin call argument, optionally named.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Argument {
    pub name: Option<Name>,
    pub value: Expr,
}

#[derive(Clone, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MixinArgs {
    pub args: Vec<Argument>,
}

impl MixinArgs {
    pub fn new(args: Vec<Argument>) -> Self {
        MixinArgs { args }
    }
}

/// `when` clause: true if any condition is true.
#[derive(Clone, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Guard {
    pub conditions: Vec<Expr>,
}

/// Mixin definition: `.name(params) when (guard) { ... }`.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Mixin {
    pub id: DefId,
    pub selector: Selector,
    pub params: MixinParams,
    pub guard: Option<Guard>,
    pub block: Block,
    pub span: Span,
}

/// Mixin call: `.name(args) [!important];`.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MixinCall {
    pub selector: Selector,
    pub args: Option<MixinArgs>,
    pub important: bool,
    pub span: Span,
}

/// Rule-level node.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Node {
    Stylesheet(Stylesheet),
    Ruleset(Ruleset),
    Media(Media),
    BlockDirective(BlockDirective),
    Rule(Rule),
    Definition(Definition),
    Directive(Directive),
    Comment(Comment),
    Import(Import),
    ImportMarker(ImportMarker),
    Mixin(Mixin),
    MixinCall(MixinCall),
}

impl Node {
    pub fn span(&self) -> Span {
        match self {
            Node::Stylesheet(n) => n.span,
            Node::Ruleset(n) => n.span,
            Node::Media(n) => n.span,
            Node::BlockDirective(n) => n.span,
            Node::Rule(n) => n.span,
            Node::Definition(n) => n.span,
            Node::Directive(n) => n.span,
            Node::Comment(n) => n.span,
            Node::Import(n) => n.span,
            Node::ImportMarker(n) => n.import.span,
            Node::Mixin(n) => n.span,
            Node::MixinCall(n) => n.span,
        }
    }

    /// Whether rule evaluation has any work to do for this node.
    pub fn needs_eval(&self) -> bool {
        match self {
            Node::Stylesheet(_)
            | Node::Ruleset(_)
            | Node::Media(_)
            | Node::BlockDirective(_)
            | Node::Definition(_)
            | Node::Import(_)
            | Node::MixinCall(_) => true,
            Node::Rule(rule) => rule.value.needs_eval(),
            Node::Directive(directive) => directive.value.as_ref().is_some_and(Expr::needs_eval),
            Node::Comment(_) | Node::ImportMarker(_) | Node::Mixin(_) => false,
        }
    }

    /// Block owned by a container node.
    pub fn block(&self) -> Option<&Block> {
        match self {
            Node::Stylesheet(n) => Some(&n.block),
            Node::Ruleset(n) => Some(&n.block),
            Node::Media(n) => Some(&n.block),
            Node::BlockDirective(n) => Some(&n.block),
            Node::Mixin(n) => Some(&n.block),
            Node::Rule(_)
            | Node::Definition(_)
            | Node::Directive(_)
            | Node::Comment(_)
            | Node::Import(_)
            | Node::ImportMarker(_)
            | Node::MixinCall(_) => None,
        }
    }
}
