//! Mixin expansion: resolving calls against the scope chain and splicing the
//! evaluated bodies of the matching definitions in place of each call.

use rustc_hash::FxHashSet;

use less_ir::{Block, DefId, Mixin, MixinArgs, MixinCall, Node, Ruleset};

use super::bind::bind;
use super::Evaluator;
use super::ImportTrail;
use crate::environment::{Environment, Frame};
use crate::errors::{mixin_recursion, mixin_undefined, LessResult};

/// A definition a call resolved to.
enum Candidate {
    Mixin(Mixin),
    /// A plain ruleset used as a parameterless mixin.
    Ruleset(Ruleset),
}

impl Evaluator<'_> {
    /// Replace every mixin call in the frame with the rules it expands to.
    pub(super) fn expand_mixins(&mut self, env: &mut Environment, frame: &Frame) -> LessResult<()> {
        let mut trail = ImportTrail::default();
        let mut i = 0;
        loop {
            let call = {
                let block = frame.borrow();
                let Some(node) = block.get(i) else {
                    break;
                };
                trail.visit(node);
                match node {
                    Node::MixinCall(call) => Some(call.clone()),
                    _ => None,
                }
            };
            let Some(call) = call else {
                i += 1;
                continue;
            };
            let rules = match self.execute_mixin_call(env, &call) {
                Ok(rules) => rules,
                Err(err) => return Err(trail.annotate(err, self.printer())),
            };
            i += frame.borrow_mut().splice(i, 1, rules);
        }
        Ok(())
    }

    /// Expand one call: every candidate whose arguments bind and whose guard
    /// passes contributes its evaluated body, in resolution order.
    fn execute_mixin_call(
        &mut self,
        env: &mut Environment,
        call: &MixinCall,
    ) -> LessResult<Vec<Node>> {
        let selector = self.printer().selector(&call.selector);
        let args = match &call.args {
            Some(args) => self.eval_args(env, args)?,
            None => MixinArgs::default(),
        };
        let path = call.selector.match_path();
        let candidates = self.resolve(env, &path);
        tracing::debug!(call = %selector, candidates = candidates.len(), "expanding mixin call");
        if candidates.is_empty() {
            return Err(mixin_undefined(&selector).with_span(call.span));
        }

        let mut rules = Vec::new();
        let mut calls = 0usize;
        for candidate in candidates {
            let called = match candidate {
                Candidate::Ruleset(ruleset) => {
                    let ruleset = self.evaluate_ruleset(env, ruleset, call.important)?;
                    rules.extend(ruleset.block.into_rules());
                    true
                }
                Candidate::Mixin(mixin) => {
                    self.execute_mixin(env, call, &selector, &args, mixin, &mut rules)?
                }
            };
            if called {
                calls += 1;
            }
        }
        if calls == 0 {
            tracing::debug!(call = %selector, "no candidate accepted the arguments");
            return Err(mixin_undefined(&selector).with_span(call.span));
        }
        Ok(rules)
    }

    /// Run one mixin definition. Returns `false` when the arguments did not
    /// bind, `true` when the definition was called (even if its guard failed).
    fn execute_mixin(
        &mut self,
        env: &Environment,
        call: &MixinCall,
        selector: &str,
        args: &MixinArgs,
        mixin: Mixin,
        rules: &mut Vec<Node>,
    ) -> LessResult<bool> {
        let params = self.eval_params(env, &mixin.params)?;
        let Some(bindings) = bind(&params, &args.args, &self.printer(), &self.interner) else {
            tracing::trace!(
                mixin = %selector,
                params = %self.printer().params(&mixin.params),
                "arguments do not bind"
            );
            return Ok(false);
        };

        let mut call_env = env.copy();
        if let Some(closure) = self.definitions.closure(mixin.id) {
            call_env.append(closure.frames());
        }
        call_env.push(Frame::new(bindings));

        if let Some(guard) = &mixin.guard {
            if !self.eval_guard(&call_env, guard)? {
                tracing::trace!(mixin = %selector, "guard rejected call");
                return Ok(true);
            }
        }

        let limit = self.ctx.options().recursion_limit;
        let depth = self.definitions.entries(mixin.id);
        if depth >= limit {
            return Err(mixin_recursion(selector, limit).with_span(call.span));
        }

        tracing::trace!(mixin = %selector, depth, "entering mixin");
        let _entry = self.definitions.enter(mixin.id);
        match self.evaluate_block(&mut call_env, mixin.block, call.important) {
            Ok(block) => {
                rules.extend(block.into_rules());
                Ok(true)
            }
            Err(err) => {
                let actual = MixinCall {
                    args: Some(args.clone()),
                    ..call.clone()
                };
                Err(err.context(self.printer().node(&Node::MixinCall(actual)), call.span))
            }
        }
    }

    /// Collect the definitions matching `path`, innermost frame first.
    fn resolve(&self, env: &Environment, path: &[&str]) -> Vec<Candidate> {
        let mut found = Vec::new();
        let mut seen = FxHashSet::default();
        let mut visited: Vec<&Frame> = Vec::new();
        for frame in env.frames().iter().rev() {
            if visited.iter().any(|v| v.ptr_eq(frame)) {
                continue;
            }
            visited.push(frame);
            self.collect(&frame.borrow(), path, &mut seen, &mut found);
        }
        found
    }

    fn collect(
        &self,
        block: &Block,
        path: &[&str],
        seen: &mut FxHashSet<DefId>,
        found: &mut Vec<Candidate>,
    ) {
        for node in block.mixin_candidates() {
            match node {
                Node::Mixin(mixin) => {
                    if mixin.selector.match_path() == path && seen.insert(mixin.id) {
                        found.push(Candidate::Mixin(mixin.clone()));
                    }
                }
                Node::Ruleset(ruleset) => {
                    for selector in &ruleset.selectors.selectors {
                        let own = selector.match_path();
                        if own.is_empty() || own.len() > path.len() || own[..] != path[..own.len()]
                        {
                            continue;
                        }
                        if own.len() == path.len() {
                            // A ruleset is not a candidate inside its own body.
                            if self.definitions.entries(ruleset.id) == 0 && seen.insert(ruleset.id)
                            {
                                found.push(Candidate::Ruleset(ruleset.clone()));
                            }
                        } else {
                            self.collect(&ruleset.block, &path[own.len()..], seen, found);
                        }
                        break;
                    }
                }
                _ => {}
            }
        }
    }
}
