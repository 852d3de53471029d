//! Media feature combination.
//!
//! A feature list is an OR of alternatives; an alternative is a single term
//! or a space-separated expression of terms joined by `and`. A conditional
//! block nested in another applies both conditions, so its effective
//! features are the cross product of the ancestor and current alternatives.

use less_ir::{Expr, Features};

/// Combine the (already evaluated) features of an enclosing block with
/// those of a nested block.
///
/// `combine([], current) == current` and `combine(ancestors, []) ==
/// ancestors`. Otherwise every current alternative is joined to every
/// ancestor alternative with `and`, iterating current alternatives in the
/// outer loop: `a, b` combined with `c, d` gives
/// `a and c, b and c, a and d, b and d`.
pub fn combine(ancestors: &Features, current: &Features) -> Features {
    if ancestors.is_empty() {
        return current.clone();
    }
    if current.is_empty() {
        return ancestors.clone();
    }

    let mut features = Vec::with_capacity(ancestors.features.len() * current.features.len());
    for cur in &current.features {
        for anc in &ancestors.features {
            let mut terms = terms_of(anc);
            terms.push(Expr::keyword("and"));
            terms.extend(terms_of(cur));
            features.push(Expr::Expression(terms));
        }
    }
    Features::new(features)
}

fn terms_of(alternative: &Expr) -> Vec<Expr> {
    match alternative {
        Expr::Expression(terms) => terms.clone(),
        other => vec![other.clone()],
    }
}
