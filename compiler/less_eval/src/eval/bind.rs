//! Argument binding.

use less_ir::{Argument, Block, Definition, Expr, MixinParams, Name, Node, Printer, Span};
use less_ir::{StringInterner, ARGUMENTS};

/// Bind evaluated call arguments to evaluated parameters.
///
/// Named arguments are matched first; positional arguments then fill the
/// remaining parameters in order. Returns the frame of variable definitions
/// for the body, or `None` when the arguments do not fit the parameters.
/// `@arguments` holds every bound value in parameter order.
pub(super) fn bind(
    params: &MixinParams,
    args: &[Argument],
    printer: &Printer<'_>,
    interner: &StringInterner,
) -> Option<Block> {
    let mut slots: Vec<Option<Expr>> = vec![None; params.params.len()];
    let mut positional = Vec::new();
    for arg in args {
        match arg.name {
            Some(name) => {
                let index = params
                    .params
                    .iter()
                    .position(|p| p.name == Some(name) && !p.variadic)?;
                if slots[index].replace(arg.value.clone()).is_some() {
                    return None;
                }
            }
            None => positional.push(arg.value.clone()),
        }
    }

    let mut positional = positional.into_iter();
    let mut rest = Vec::new();
    for (slot, param) in slots.iter_mut().zip(&params.params) {
        if param.variadic {
            rest.extend(positional.by_ref());
            break;
        }
        if slot.is_some() {
            continue;
        }
        let Some(value) = positional.next() else {
            break;
        };
        if param.is_pattern() {
            let pattern = param.default.as_ref()?;
            if printer.expr(pattern) != printer.expr(&value) {
                return None;
            }
        }
        *slot = Some(value);
    }
    if positional.next().is_some() {
        return None;
    }

    let mut rules = Vec::with_capacity(params.params.len() + 1);
    let mut all = Vec::with_capacity(params.params.len());
    for (slot, param) in slots.into_iter().zip(&params.params) {
        if param.variadic {
            if let Some(name) = param.name {
                rules.push(define(name, Expr::Expression(rest.clone())));
            }
            all.extend(rest.iter().cloned());
            continue;
        }
        let value = match slot {
            Some(value) => value,
            None if param.is_pattern() => return None,
            None => param.default.clone()?,
        };
        if let Some(name) = param.name {
            rules.push(define(name, value.clone()));
        }
        all.push(value);
    }
    rules.push(define(interner.intern(ARGUMENTS), Expr::Expression(all)));
    Some(Block::with_rules(rules))
}

fn define(name: Name, value: Expr) -> Node {
    Node::Definition(Definition {
        name,
        value,
        span: Span::DUMMY,
    })
}
