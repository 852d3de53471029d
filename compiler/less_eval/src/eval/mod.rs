//! Tree-walking evaluator.
//!
//! Every scoped container (stylesheet, ruleset, media block, block directive,
//! mixin body) is evaluated the same way: its block is copied into a fresh
//! frame, the frame is pushed, and three phases run over the frame's rules:
//!
//! 1. import expansion (`imports`)
//! 2. mixin expansion (`mixins`)
//! 3. rule evaluation (this module)
//!
//! Mixin bodies re-enter the same sequence through [`Evaluator::evaluate_block`].

mod bind;
mod expr;
mod functions;
mod imports;
mod mixins;

use less_ir::{
    Block, BlockDirective, Definition, Directive, Expr, Features, Import, Media, Name, Node,
    Printer, Rule, Ruleset, SharedInterner, Stylesheet,
};

use crate::context::Context;
use crate::definitions::DefinitionTable;
use crate::environment::{Environment, Frame};
use crate::errors::{unexpanded_mixin_call, variable_cycle, LessError, LessResult};
use crate::features::combine;
use crate::stack::ensure_sufficient_stack;

/// Evaluates stylesheet trees against a [`Context`].
///
/// One evaluator serves one top-level evaluation: its definition table holds
/// the closures and entry counts of every definition it has seen.
pub struct Evaluator<'ctx> {
    ctx: &'ctx mut Context,
    interner: SharedInterner,
    definitions: DefinitionTable,
    /// Effective features of the enclosing media blocks, innermost last.
    media: Vec<Features>,
    /// Variables whose values are being evaluated, innermost last.
    derefs: Vec<Name>,
}

impl<'ctx> Evaluator<'ctx> {
    pub fn new(ctx: &'ctx mut Context) -> Self {
        let interner = ctx.interner().clone();
        Evaluator {
            ctx,
            interner,
            definitions: DefinitionTable::new(),
            media: Vec::new(),
            derefs: Vec::new(),
        }
    }

    pub fn definitions(&self) -> &DefinitionTable {
        &self.definitions
    }

    fn printer(&self) -> Printer<'_> {
        Printer::new(&self.interner)
    }

    /// Evaluate a stylesheet, returning the evaluated copy.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn evaluate_stylesheet(
        &mut self,
        env: &mut Environment,
        sheet: &Stylesheet,
    ) -> LessResult<Stylesheet> {
        let block = self.evaluate_block(env, sheet.block.clone(), false)?;
        Ok(Stylesheet {
            block,
            span: sheet.span,
        })
    }

    /// Run the phase sequence over a copy of a container's block.
    ///
    /// The frame outlives this call when a closure captured it, so closures
    /// keep seeing the block as it was left after evaluation.
    pub(crate) fn evaluate_block(
        &mut self,
        env: &mut Environment,
        block: Block,
        important: bool,
    ) -> LessResult<Block> {
        ensure_sufficient_stack(|| {
            let frame = Frame::new(block);
            {
                let mut scoped = env.scoped(frame.clone());
                self.expand_imports(&scoped, &frame)?;
                self.expand_mixins(&mut scoped, &frame)?;
                self.evaluate_rules(&mut scoped, &frame, important)?;
            }
            let block = frame.borrow().clone();
            Ok(block)
        })
    }

    /// Evaluate a ruleset, counting the entry on its definition so a call
    /// made from inside its own body does not match it.
    pub(crate) fn evaluate_ruleset(
        &mut self,
        env: &mut Environment,
        ruleset: Ruleset,
        important: bool,
    ) -> LessResult<Ruleset> {
        let _entry = self.definitions.enter(ruleset.id);
        let block = self.evaluate_block(env, ruleset.block, important)?;
        Ok(Ruleset {
            id: ruleset.id,
            selectors: ruleset.selectors,
            block,
            span: ruleset.span,
        })
    }

    /// Evaluate a media block. Its effective features are always derived
    /// from its own features, so evaluating an already evaluated block again
    /// (as happens to spliced mixin output) combines them only once.
    fn evaluate_media(&mut self, env: &mut Environment, media: Media) -> LessResult<Media> {
        let features = self.eval_features(env, &media.features)?;
        let effective = match self.media.last() {
            Some(ancestors) => combine(ancestors, &features),
            None => features.clone(),
        };
        self.media.push(effective.clone());
        let block = self.evaluate_block(env, media.block, false);
        self.media.pop();
        Ok(Media {
            features,
            effective: Some(effective),
            block: block?,
            span: media.span,
        })
    }

    /// Evaluate every rule of the frame in place.
    ///
    /// The block length is stable in this phase; nodes are only replaced.
    fn evaluate_rules(
        &mut self,
        env: &mut Environment,
        frame: &Frame,
        important: bool,
    ) -> LessResult<()> {
        let mut trail = ImportTrail::default();
        let len = frame.borrow().len();
        for i in 0..len {
            let Some(node) = frame.borrow().get(i).cloned() else {
                break;
            };
            trail.visit(&node);
            match self.evaluate_rule(env, frame, node, important) {
                Ok(Some(result)) => frame.borrow_mut().replace(i, result),
                Ok(None) => {}
                Err(err) => {
                    let err = match frame.borrow().get(i) {
                        Some(node) => err.context(self.printer().node(node), node.span()),
                        None => err,
                    };
                    return Err(trail.annotate(err, self.printer()));
                }
            }
        }
        Ok(())
    }

    /// Evaluate one rule. `None` leaves the node unchanged.
    fn evaluate_rule(
        &mut self,
        env: &mut Environment,
        frame: &Frame,
        node: Node,
        important: bool,
    ) -> LessResult<Option<Node>> {
        let result = match node {
            Node::Stylesheet(sheet) => {
                let block = self.evaluate_block(env, sheet.block, false)?;
                Node::Stylesheet(Stylesheet {
                    block,
                    span: sheet.span,
                })
            }
            Node::Ruleset(ruleset) => Node::Ruleset(self.evaluate_ruleset(env, ruleset, important)?),
            Node::Media(media) => Node::Media(self.evaluate_media(env, media)?),
            Node::BlockDirective(directive) => {
                let block = self.evaluate_block(env, directive.block, false)?;
                Node::BlockDirective(BlockDirective {
                    name: directive.name,
                    block,
                    span: directive.span,
                })
            }
            Node::Definition(def) => {
                let value = self.evaluate_definition(env, def.name, &def.value)?;
                Node::Definition(Definition { value, ..def })
            }
            Node::Directive(directive) => {
                let value = match &directive.value {
                    Some(value) => Some(self.eval_expr(env, value)?),
                    None => None,
                };
                let directive = Directive { value, ..directive };
                if directive.is_charset() {
                    frame.borrow_mut().set_charset(directive.clone());
                }
                Node::Directive(directive)
            }
            Node::Mixin(mixin) => {
                if self.definitions.bind_closure(mixin.id, env) {
                    tracing::trace!(
                        mixin = %self.printer().selector(&mixin.selector),
                        depth = env.depth(),
                        "bound mixin closure"
                    );
                }
                return Ok(None);
            }
            Node::MixinCall(call) => {
                return Err(unexpanded_mixin_call(
                    &self.printer().node(&Node::MixinCall(call)),
                ));
            }
            Node::Rule(rule) => {
                if important && !rule.important {
                    Node::Rule(Rule {
                        value: self.eval_expr(env, &rule.value)?,
                        important: true,
                        ..rule
                    })
                } else if rule.value.needs_eval() {
                    Node::Rule(Rule {
                        value: self.eval_expr(env, &rule.value)?,
                        ..rule
                    })
                } else {
                    return Ok(None);
                }
            }
            // Imports still present here are plain CSS imports.
            Node::Import(import) => {
                let path = self.eval_expr(env, &import.path)?;
                let features = match &import.features {
                    Some(features) => Some(self.eval_features(env, features)?),
                    None => None,
                };
                Node::Import(Import {
                    path,
                    features,
                    ..import
                })
            }
            Node::Comment(_) | Node::ImportMarker(_) => return Ok(None),
        };
        Ok(Some(result))
    }

    /// Evaluate a variable definition's value, detecting self reference.
    fn evaluate_definition(
        &mut self,
        env: &Environment,
        name: Name,
        value: &Expr,
    ) -> LessResult<Expr> {
        if self.derefs.contains(&name) {
            return Err(variable_cycle(self.interner.lookup(name)));
        }
        self.derefs.push(name);
        let result = self.eval_expr(env, value);
        self.derefs.pop();
        result
    }
}

/// Imports whose spliced rules enclose the current position, tracked from
/// import markers so errors can name the import they came from.
#[derive(Default)]
struct ImportTrail {
    open: Vec<Import>,
}

impl ImportTrail {
    fn visit(&mut self, node: &Node) {
        if let Node::ImportMarker(marker) = node {
            if marker.begin {
                self.open.push((*marker.import).clone());
            } else {
                self.open.pop();
            }
        }
    }

    fn annotate(&self, err: LessError, printer: Printer<'_>) -> LessError {
        match self.open.last() {
            Some(import) => err.context(printer.import(import), import.span),
            None => err,
        }
    }
}
