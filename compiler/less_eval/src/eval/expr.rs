//! Expression evaluation.

use less_ir::{Color, CondOp, Condition, Expr, Features, Guard, MixinArgs, MixinParams, Name};
use less_ir::{Argument, Operator, Parameter, Quoted, Variable};

use super::functions;
use super::Evaluator;
use crate::environment::Environment;
use crate::errors::{
    division_by_zero, invalid_operation, undefined_variable, variable_cycle, LessResult,
};
use crate::stack::ensure_sufficient_stack;

impl Evaluator<'_> {
    /// Evaluate an expression against `env`.
    pub(crate) fn eval_expr(&mut self, env: &Environment, expr: &Expr) -> LessResult<Expr> {
        match expr {
            Expr::Anonymous(_)
            | Expr::Keyword(_)
            | Expr::Dimension { .. }
            | Expr::Color(_)
            | Expr::Boolean(_) => Ok(expr.clone()),
            Expr::Quoted(quoted) => self.eval_quoted(env, quoted),
            Expr::Url(inner) => Ok(Expr::Url(Box::new(self.eval_expr(env, inner)?))),
            Expr::Variable(var) => self.eval_variable(env, *var),
            Expr::Expression(terms) => {
                let mut terms = self.eval_all(env, terms)?;
                if terms.len() == 1 {
                    if let Some(term) = terms.pop() {
                        return Ok(term);
                    }
                }
                Ok(Expr::Expression(terms))
            }
            Expr::ExpressionList(values) => Ok(Expr::ExpressionList(self.eval_all(env, values)?)),
            Expr::Operation { op, left, right } => {
                let left = self.eval_expr(env, left)?;
                let right = self.eval_expr(env, right)?;
                self.operate(*op, left, right)
            }
            Expr::Paren(inner) => match self.eval_expr(env, inner)? {
                value @ (Expr::Dimension { .. } | Expr::Color(_) | Expr::Boolean(_)) => Ok(value),
                value => Ok(Expr::Paren(Box::new(value))),
            },
            Expr::FunctionCall { name, args } => {
                let args = self.eval_all(env, args)?;
                match functions::call_builtin(name, &args, &self.printer())? {
                    Some(value) => Ok(value),
                    None => Ok(Expr::FunctionCall {
                        name: name.clone(),
                        args,
                    }),
                }
            }
            Expr::Condition(cond) => Ok(Expr::Boolean(self.eval_condition(env, cond)?)),
            Expr::Feature { property, value } => Ok(Expr::Feature {
                property: Box::new(self.eval_expr(env, property)?),
                value: Box::new(self.eval_expr(env, value)?),
            }),
        }
    }

    fn eval_all(&mut self, env: &Environment, exprs: &[Expr]) -> LessResult<Vec<Expr>> {
        exprs.iter().map(|e| self.eval_expr(env, e)).collect()
    }

    /// Interpolate `@{name}` parts; the result holds a single literal part.
    fn eval_quoted(&mut self, env: &Environment, quoted: &Quoted) -> LessResult<Expr> {
        let mut text = String::new();
        for part in &quoted.parts {
            match part {
                Expr::Anonymous(literal) => text.push_str(literal),
                Expr::Variable(var) => {
                    let value = self.eval_variable(env, Variable { curly: false, ..*var })?;
                    text.push_str(&self.text_of(&value));
                }
                other => {
                    let value = self.eval_expr(env, other)?;
                    text.push_str(&self.text_of(&value));
                }
            }
        }
        let parts = if text.is_empty() {
            Vec::new()
        } else {
            vec![Expr::Anonymous(text)]
        };
        Ok(Expr::Quoted(Quoted {
            delim: quoted.delim,
            escaped: quoted.escaped,
            parts,
        }))
    }

    fn eval_variable(&mut self, env: &Environment, var: Variable) -> LessResult<Expr> {
        let name = if var.indirect {
            let target = self.deref(env, var.name)?;
            let text = self.text_of(&target);
            self.interner
                .intern(&format!("@{}", text.trim_start_matches('@')))
        } else {
            var.name
        };
        self.deref(env, name)
    }

    /// Look a variable up and evaluate its value in the current environment.
    fn deref(&mut self, env: &Environment, name: Name) -> LessResult<Expr> {
        if self.derefs.contains(&name) {
            return Err(variable_cycle(self.interner.lookup(name)));
        }
        let Some(value) = env.lookup_variable(name) else {
            return Err(undefined_variable(self.interner.lookup(name)));
        };
        self.derefs.push(name);
        let result = ensure_sufficient_stack(|| self.eval_expr(env, &value));
        self.derefs.pop();
        result
    }

    /// Text of a value as it appears inside strings and comparisons.
    pub(super) fn text_of(&self, value: &Expr) -> String {
        match value {
            Expr::Quoted(quoted) => self.printer().quoted_content(quoted),
            Expr::Url(inner) => self.text_of(inner),
            other => self.printer().expr(other),
        }
    }

    fn operate(&self, op: Operator, left: Expr, right: Expr) -> LessResult<Expr> {
        match (left, right) {
            (Expr::Dimension { value: l, unit: lu }, Expr::Dimension { value: r, unit: ru }) => {
                Ok(Expr::Dimension {
                    value: arith(op, l, r)?,
                    unit: lu.or(ru),
                })
            }
            (Expr::Color(c), Expr::Color(d)) => {
                color_op(op, c, [f64::from(d.r), f64::from(d.g), f64::from(d.b)])
            }
            (Expr::Color(c), Expr::Dimension { value, .. }) => color_op(op, c, [value; 3]),
            (Expr::Dimension { value, .. }, Expr::Color(c))
                if matches!(op, Operator::Add | Operator::Mul) =>
            {
                color_op(op, c, [value; 3])
            }
            (left, right) => Err(invalid_operation(format!(
                "cannot apply '{}' to {} and {}",
                op.as_symbol(),
                self.printer().expr(&left),
                self.printer().expr(&right)
            ))),
        }
    }

    /// Evaluate a condition to a boolean. `and`/`or` short-circuit.
    pub(super) fn eval_condition(
        &mut self,
        env: &Environment,
        cond: &Condition,
    ) -> LessResult<bool> {
        let result = match cond.op {
            CondOp::And => {
                truthy(&self.eval_expr(env, &cond.left)?)
                    && truthy(&self.eval_expr(env, &cond.right)?)
            }
            CondOp::Or => {
                truthy(&self.eval_expr(env, &cond.left)?)
                    || truthy(&self.eval_expr(env, &cond.right)?)
            }
            op => {
                let left = self.eval_expr(env, &cond.left)?;
                let right = self.eval_expr(env, &cond.right)?;
                self.compare(op, &left, &right)
            }
        };
        Ok(result != cond.negate)
    }

    fn compare(&self, op: CondOp, left: &Expr, right: &Expr) -> bool {
        if let (
            Expr::Dimension { value: a, unit: ua },
            Expr::Dimension { value: b, unit: ub },
        ) = (left, right)
        {
            if ua.is_some() && ub.is_some() && ua != ub {
                return false;
            }
            return match op {
                CondOp::Eq => a == b,
                CondOp::Lt => a < b,
                CondOp::LtEq => a <= b,
                CondOp::Gt => a > b,
                CondOp::GtEq => a >= b,
                CondOp::And | CondOp::Or => false,
            };
        }
        matches!(op, CondOp::Eq | CondOp::LtEq | CondOp::GtEq)
            && self.text_of(left) == self.text_of(right)
    }

    /// A guard passes when any of its conditions is true.
    pub(super) fn eval_guard(&mut self, env: &Environment, guard: &Guard) -> LessResult<bool> {
        if guard.conditions.is_empty() {
            return Ok(true);
        }
        for condition in &guard.conditions {
            if truthy(&self.eval_expr(env, condition)?) {
                return Ok(true);
            }
        }
        Ok(false)
    }

    pub(super) fn eval_features(
        &mut self,
        env: &Environment,
        features: &Features,
    ) -> LessResult<Features> {
        Ok(Features::new(self.eval_all(env, &features.features)?))
    }

    pub(super) fn eval_args(
        &mut self,
        env: &Environment,
        args: &MixinArgs,
    ) -> LessResult<MixinArgs> {
        let mut evaluated = Vec::with_capacity(args.args.len());
        for arg in &args.args {
            evaluated.push(Argument {
                name: arg.name,
                value: self.eval_expr(env, &arg.value)?,
            });
        }
        Ok(MixinArgs::new(evaluated))
    }

    /// Evaluate parameter defaults and patterns against the caller's scope.
    pub(super) fn eval_params(
        &mut self,
        env: &Environment,
        params: &MixinParams,
    ) -> LessResult<MixinParams> {
        let mut evaluated = Vec::with_capacity(params.params.len());
        for param in &params.params {
            let default = match &param.default {
                Some(default) => Some(self.eval_expr(env, default)?),
                None => None,
            };
            evaluated.push(Parameter { default, ..param.clone() });
        }
        Ok(MixinParams::new(evaluated))
    }
}

fn truthy(value: &Expr) -> bool {
    match value {
        Expr::Boolean(b) => *b,
        Expr::Paren(inner) => truthy(inner),
        other => other.is_keyword("true"),
    }
}

fn arith(op: Operator, left: f64, right: f64) -> LessResult<f64> {
    Ok(match op {
        Operator::Add => left + right,
        Operator::Sub => left - right,
        Operator::Mul => left * right,
        Operator::Div => {
            if right == 0.0 {
                return Err(division_by_zero());
            }
            left / right
        }
    })
}

fn color_op(op: Operator, color: Color, rhs: [f64; 3]) -> LessResult<Expr> {
    let r = arith(op, f64::from(color.r), rhs[0])?;
    let g = arith(op, f64::from(color.g), rhs[1])?;
    let b = arith(op, f64::from(color.b), rhs[2])?;
    Ok(Expr::Color(Color::clamped(r, g, b, color.a)))
}
