//! Textual representation of AST fragments.
//!
//! Used by the evaluator to render import paths and interpolated strings, by
//! the CSS renderer for values and selectors, and by error reporting to
//! describe the node an error was raised under.

use std::fmt::Write;

use crate::ast::{
    Color, Combinator, Condition, ElementKind, Expr, Features, Guard, Import, MixinArgs,
    MixinParams, Node, Quoted, Selector, Selectors, Variable,
};
use crate::StringInterner;

/// Format a number the way stylesheets write them: integers without a
/// fractional part, other values with at most eight decimals and no trailing
/// zeros.
#[allow(clippy::cast_possible_truncation)]
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    if value.fract() == 0.0 && value.abs() < 1e15 {
        let int = value as i64;
        return int.to_string();
    }
    let mut text = format!("{value:.8}");
    while text.ends_with('0') {
        text.pop();
    }
    if text.ends_with('.') {
        text.pop();
    }
    if text == "-0" {
        text.remove(0);
    }
    text
}

/// Renders AST fragments to text.
#[derive(Clone, Copy)]
pub struct Printer<'a> {
    interner: &'a StringInterner,
    compress: bool,
}

impl<'a> Printer<'a> {
    pub fn new(interner: &'a StringInterner) -> Self {
        Printer {
            interner,
            compress: false,
        }
    }

    /// Drop optional whitespace from the output.
    #[must_use]
    pub fn compress(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    pub fn expr(&self, expr: &Expr) -> String {
        let mut buf = String::new();
        self.write_expr(&mut buf, expr);
        buf
    }

    pub fn write_expr(&self, buf: &mut String, expr: &Expr) {
        match expr {
            Expr::Anonymous(text) | Expr::Keyword(text) => buf.push_str(text),
            Expr::Dimension { value, unit } => {
                buf.push_str(&format_number(*value));
                if let Some(unit) = unit {
                    buf.push_str(unit);
                }
            }
            Expr::Color(color) => self.write_color(buf, *color),
            Expr::Quoted(quoted) => self.write_quoted(buf, quoted),
            Expr::Url(inner) => {
                buf.push_str("url(");
                self.write_expr(buf, inner);
                buf.push(')');
            }
            Expr::Variable(var) => self.write_variable(buf, *var),
            Expr::Expression(terms) => self.write_list(buf, terms, " "),
            Expr::ExpressionList(values) => {
                self.write_list(buf, values, if self.compress { "," } else { ", " });
            }
            Expr::Operation { op, left, right } => {
                self.write_expr(buf, left);
                buf.push(' ');
                buf.push_str(op.as_symbol());
                buf.push(' ');
                self.write_expr(buf, right);
            }
            Expr::Paren(inner) => {
                buf.push('(');
                self.write_expr(buf, inner);
                buf.push(')');
            }
            Expr::FunctionCall { name, args } => {
                buf.push_str(name);
                buf.push('(');
                self.write_list(buf, args, if self.compress { "," } else { ", " });
                buf.push(')');
            }
            Expr::Condition(cond) => self.write_condition(buf, cond),
            Expr::Feature { property, value } => {
                buf.push('(');
                self.write_expr(buf, property);
                buf.push_str(if self.compress { ":" } else { ": " });
                self.write_expr(buf, value);
                buf.push(')');
            }
            Expr::Boolean(value) => buf.push_str(if *value { "true" } else { "false" }),
        }
    }

    fn write_list(&self, buf: &mut String, items: &[Expr], sep: &str) {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                buf.push_str(sep);
            }
            self.write_expr(buf, item);
        }
    }

    fn write_variable(&self, buf: &mut String, var: Variable) {
        let name = self.interner.lookup(var.name);
        if var.curly {
            buf.push_str("@{");
            buf.push_str(name.trim_start_matches('@'));
            buf.push('}');
        } else {
            if var.indirect {
                buf.push('@');
            }
            buf.push_str(name);
        }
    }

    fn write_color(&self, buf: &mut String, color: Color) {
        if color.a < 1.0 {
            let sep = if self.compress { "," } else { ", " };
            let _ = write!(
                buf,
                "rgba({}{sep}{}{sep}{}{sep}{})",
                color.r,
                color.g,
                color.b,
                format_number(color.a)
            );
            return;
        }
        let hex = format!("{:02x}{:02x}{:02x}", color.r, color.g, color.b);
        let bytes = hex.as_bytes();
        if self.compress && bytes[0] == bytes[1] && bytes[2] == bytes[3] && bytes[4] == bytes[5] {
            let _ = write!(
                buf,
                "#{}{}{}",
                char::from(bytes[0]),
                char::from(bytes[2]),
                char::from(bytes[4])
            );
        } else {
            buf.push('#');
            buf.push_str(&hex);
        }
    }

    fn write_quoted(&self, buf: &mut String, quoted: &Quoted) {
        if !quoted.escaped {
            buf.push(quoted.delim);
        }
        buf.push_str(&self.quoted_content(quoted));
        if !quoted.escaped {
            buf.push(quoted.delim);
        }
    }

    /// Text of a quoted string without its delimiters.
    pub fn quoted_content(&self, quoted: &Quoted) -> String {
        let mut buf = String::new();
        for part in &quoted.parts {
            match part {
                Expr::Quoted(inner) => buf.push_str(&self.quoted_content(inner)),
                other => self.write_expr(&mut buf, other),
            }
        }
        buf
    }

    fn write_condition(&self, buf: &mut String, cond: &Condition) {
        if cond.negate {
            buf.push_str("not ");
        }
        buf.push('(');
        self.write_expr(buf, &cond.left);
        buf.push(' ');
        buf.push_str(cond.op.as_symbol());
        buf.push(' ');
        self.write_expr(buf, &cond.right);
        buf.push(')');
    }

    pub fn selector(&self, selector: &Selector) -> String {
        let mut buf = String::new();
        for (i, element) in selector.elements.iter().enumerate() {
            match element.combinator {
                Some(Combinator::Descendant) if i > 0 => buf.push(' '),
                Some(Combinator::Descendant) | None => {}
                Some(comb) => {
                    if i > 0 && !self.compress {
                        buf.push(' ');
                    }
                    buf.push_str(comb.as_symbol());
                    if !self.compress {
                        buf.push(' ');
                    }
                }
            }
            match &element.kind {
                ElementKind::Text(text) => buf.push_str(text),
                ElementKind::Attribute(text) => {
                    buf.push('[');
                    buf.push_str(text);
                    buf.push(']');
                }
                ElementKind::Wildcard => buf.push('&'),
            }
        }
        buf
    }

    pub fn selectors(&self, selectors: &Selectors) -> String {
        let sep = if self.compress { "," } else { ", " };
        selectors
            .selectors
            .iter()
            .map(|s| self.selector(s))
            .collect::<Vec<_>>()
            .join(sep)
    }

    pub fn features(&self, features: &Features) -> String {
        let mut buf = String::new();
        self.write_list(&mut buf, &features.features, if self.compress { "," } else { ", " });
        buf
    }

    pub fn guard(&self, guard: &Guard) -> String {
        let mut buf = String::new();
        self.write_list(&mut buf, &guard.conditions, ", ");
        buf
    }

    pub fn params(&self, params: &MixinParams) -> String {
        let mut parts = Vec::with_capacity(params.params.len());
        for param in &params.params {
            let mut buf = String::new();
            if let Some(name) = param.name {
                buf.push_str(self.interner.lookup(name));
                if let Some(default) = &param.default {
                    buf.push_str(": ");
                    self.write_expr(&mut buf, default);
                }
            } else if let Some(pattern) = &param.default {
                self.write_expr(&mut buf, pattern);
            }
            if param.variadic {
                buf.push_str("...");
            }
            parts.push(buf);
        }
        parts.join(", ")
    }

    pub fn args(&self, args: &MixinArgs) -> String {
        let mut parts = Vec::with_capacity(args.args.len());
        for arg in &args.args {
            let mut buf = String::new();
            if let Some(name) = arg.name {
                buf.push_str(self.interner.lookup(name));
                buf.push_str(": ");
            }
            self.write_expr(&mut buf, &arg.value);
            parts.push(buf);
        }
        parts.join(", ")
    }

    pub fn import(&self, import: &Import) -> String {
        let mut buf = String::from("@import ");
        if import.once {
            buf.push_str("(once) ");
        }
        self.write_expr(&mut buf, &import.path);
        if let Some(features) = &import.features {
            if !features.is_empty() {
                buf.push(' ');
                buf.push_str(&self.features(features));
            }
        }
        buf
    }

    /// One-line description of a node, used in error trails.
    pub fn node(&self, node: &Node) -> String {
        match node {
            Node::Stylesheet(_) => "<stylesheet>".to_owned(),
            Node::Ruleset(ruleset) => format!("{} {{ }}", self.selectors(&ruleset.selectors)),
            Node::Media(media) => format!("@media {} {{ }}", self.features(&media.features)),
            Node::BlockDirective(directive) => format!("{} {{ }}", directive.name),
            Node::Rule(rule) => {
                let important = if rule.important { " !important" } else { "" };
                format!("{}: {}{important};", rule.property, self.expr(&rule.value))
            }
            Node::Definition(def) => format!(
                "{}: {};",
                self.interner.lookup(def.name),
                self.expr(&def.value)
            ),
            Node::Directive(directive) => match &directive.value {
                Some(value) => format!("{} {};", directive.name, self.expr(value)),
                None => format!("{};", directive.name),
            },
            Node::Comment(comment) => {
                if comment.block {
                    format!("/*{}*/", comment.text)
                } else {
                    format!("//{}", comment.text)
                }
            }
            Node::Import(import) => format!("{};", self.import(import)),
            Node::ImportMarker(marker) => format!("{};", self.import(&marker.import)),
            Node::Mixin(mixin) => {
                let mut buf = format!(
                    "{}({})",
                    self.selector(&mixin.selector),
                    self.params(&mixin.params)
                );
                if let Some(guard) = &mixin.guard {
                    buf.push_str(" when ");
                    buf.push_str(&self.guard(guard));
                }
                buf.push_str(" { }");
                buf
            }
            Node::MixinCall(call) => {
                let mut buf = self.selector(&call.selector);
                if let Some(args) = &call.args {
                    buf.push('(');
                    buf.push_str(&self.args(args));
                    buf.push(')');
                }
                if call.important {
                    buf.push_str(" !important");
                }
                buf.push(';');
                buf
            }
        }
    }
}

#[cfg(test)]
mod tests;
