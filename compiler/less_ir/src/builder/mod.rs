//! Programmatic tree construction.
//!
//! The parser lives outside this workspace; tooling and tests build trees with
//! [`TreeBuilder`] instead. Names are interned through the builder's interner
//! so the resulting tree can be evaluated against the same interner.

use std::path::PathBuf;

use crate::ast::{
    Argument, Block, BlockDirective, Color, Combinator, Comment, CondOp, Condition, DefId,
    Definition, Directive, Element, ElementKind, Expr, Features, Guard, Import, Media, Mixin,
    MixinArgs, MixinCall, MixinParams, Node, Operator, Parameter, Quoted, Rule, Ruleset, Selector,
    Selectors, Stylesheet, Variable,
};
use crate::{Span, StringInterner};

/// Builds AST nodes against an interner.
#[derive(Clone, Copy)]
pub struct TreeBuilder<'a> {
    interner: &'a StringInterner,
}

impl<'a> TreeBuilder<'a> {
    pub fn new(interner: &'a StringInterner) -> Self {
        TreeBuilder { interner }
    }

    pub fn interner(&self) -> &'a StringInterner {
        self.interner
    }

    // Values

    pub fn kwd(&self, text: &str) -> Expr {
        Expr::keyword(text)
    }

    pub fn anon(&self, text: &str) -> Expr {
        Expr::anonymous(text)
    }

    /// Dimension; an empty unit means a plain number.
    pub fn dim(&self, value: f64, unit: &str) -> Expr {
        Expr::dimension(value, (!unit.is_empty()).then_some(unit))
    }

    pub fn num(&self, value: f64) -> Expr {
        self.dim(value, "")
    }

    pub fn px(&self, value: f64) -> Expr {
        self.dim(value, "px")
    }

    pub fn color(&self, r: u8, g: u8, b: u8) -> Expr {
        Expr::Color(Color::rgb(r, g, b))
    }

    pub fn boolean(&self, value: bool) -> Expr {
        Expr::Boolean(value)
    }

    /// Double-quoted string. `@{name}` sequences become interpolated variables.
    pub fn quoted(&self, text: &str) -> Expr {
        Expr::Quoted(Quoted {
            delim: '"',
            escaped: false,
            parts: self.interpolated_parts(text),
        })
    }

    /// `~"..."` string, rendered without quotes.
    pub fn escaped(&self, text: &str) -> Expr {
        Expr::Quoted(Quoted {
            delim: '"',
            escaped: true,
            parts: self.interpolated_parts(text),
        })
    }

    fn interpolated_parts(&self, text: &str) -> Vec<Expr> {
        let mut parts = Vec::new();
        let mut rest = text;
        while let Some(start) = rest.find("@{") {
            let Some(len) = rest[start..].find('}') else {
                break;
            };
            if start > 0 {
                parts.push(Expr::anonymous(&rest[..start]));
            }
            let name = format!("@{}", &rest[start + 2..start + len]);
            parts.push(Expr::Variable(Variable {
                name: self.interner.intern(&name),
                indirect: false,
                curly: true,
            }));
            rest = &rest[start + len + 1..];
        }
        if !rest.is_empty() {
            parts.push(Expr::anonymous(rest));
        }
        parts
    }

    pub fn url(&self, inner: Expr) -> Expr {
        Expr::Url(Box::new(inner))
    }

    /// Variable reference; `name` includes the `@`.
    pub fn var(&self, name: &str) -> Expr {
        Expr::variable(self.interner.intern(name))
    }

    /// `@@name`: `name` is the variable holding the target's name.
    pub fn indirect(&self, name: &str) -> Expr {
        Expr::Variable(Variable {
            name: self.interner.intern(name),
            indirect: true,
            curly: false,
        })
    }

    pub fn expn(&self, terms: Vec<Expr>) -> Expr {
        Expr::Expression(terms)
    }

    pub fn list(&self, values: Vec<Expr>) -> Expr {
        Expr::ExpressionList(values)
    }

    pub fn op(&self, op: Operator, left: Expr, right: Expr) -> Expr {
        Expr::Operation {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn add(&self, left: Expr, right: Expr) -> Expr {
        self.op(Operator::Add, left, right)
    }

    pub fn sub(&self, left: Expr, right: Expr) -> Expr {
        self.op(Operator::Sub, left, right)
    }

    pub fn mul(&self, left: Expr, right: Expr) -> Expr {
        self.op(Operator::Mul, left, right)
    }

    pub fn div(&self, left: Expr, right: Expr) -> Expr {
        self.op(Operator::Div, left, right)
    }

    pub fn paren(&self, inner: Expr) -> Expr {
        Expr::Paren(Box::new(inner))
    }

    pub fn func(&self, name: &str, args: Vec<Expr>) -> Expr {
        Expr::FunctionCall {
            name: name.to_owned(),
            args,
        }
    }

    pub fn cond(&self, op: CondOp, left: Expr, right: Expr) -> Expr {
        Expr::Condition(Box::new(Condition {
            op,
            left,
            right,
            negate: false,
        }))
    }

    /// Negate a condition built with [`TreeBuilder::cond`].
    pub fn not(&self, condition: Expr) -> Expr {
        match condition {
            Expr::Condition(mut cond) => {
                cond.negate = !cond.negate;
                Expr::Condition(cond)
            }
            other => Expr::Condition(Box::new(Condition {
                op: CondOp::Eq,
                left: other,
                right: Expr::Boolean(true),
                negate: true,
            })),
        }
    }

    /// `(property: value)` media feature.
    pub fn feature(&self, property: &str, value: Expr) -> Expr {
        Expr::Feature {
            property: Box::new(Expr::keyword(property)),
            value: Box::new(value),
        }
    }

    pub fn features(&self, alternatives: Vec<Expr>) -> Features {
        Features::new(alternatives)
    }

    pub fn guard(&self, conditions: Vec<Expr>) -> Guard {
        Guard { conditions }
    }

    // Selectors

    /// Parse a single selector such as `ul > li:hover`, `&.active` or
    /// `#ns .m`.
    pub fn selector(&self, text: &str) -> Selector {
        let chars: Vec<char> = text.trim().chars().collect();
        let mut elements: Vec<Element> = Vec::new();
        let mut pending: Option<Combinator> = None;
        let mut saw_space = false;
        let mut i = 0;

        while i < chars.len() {
            let c = chars[i];
            match c {
                c if c.is_whitespace() => {
                    saw_space = true;
                    i += 1;
                }
                '>' | '+' | '~' => {
                    pending = Some(match c {
                        '>' => Combinator::Child,
                        '+' => Combinator::Sibling,
                        _ => Combinator::General,
                    });
                    saw_space = false;
                    i += 1;
                }
                '&' => {
                    push_element(&mut elements, ElementKind::Wildcard, &mut pending, &mut saw_space);
                    i += 1;
                }
                '[' => {
                    let start = i + 1;
                    while i < chars.len() && chars[i] != ']' {
                        i += 1;
                    }
                    let text: String = chars[start..i.min(chars.len())].iter().collect();
                    push_element(&mut elements, ElementKind::Attribute(text), &mut pending, &mut saw_space);
                    i += 1;
                }
                _ => {
                    let start = i;
                    while i < chars.len() && chars[i] == ':' {
                        i += 1;
                    }
                    if i == start {
                        i += 1;
                    }
                    let mut depth = 0usize;
                    while i < chars.len() {
                        let ch = chars[i];
                        if ch == '(' {
                            depth += 1;
                        } else if ch == ')' {
                            depth = depth.saturating_sub(1);
                        } else if depth == 0
                            && (ch.is_whitespace()
                                || matches!(ch, '.' | '#' | ':' | '[' | '&' | '>' | '+' | '~'))
                        {
                            break;
                        }
                        i += 1;
                    }
                    let text: String = chars[start..i].iter().collect();
                    push_element(&mut elements, ElementKind::Text(text), &mut pending, &mut saw_space);
                }
            }
        }
        Selector::new(elements)
    }

    /// Parse a comma-separated selector group.
    pub fn selectors(&self, text: &str) -> Selectors {
        Selectors::new(text.split(',').map(|s| self.selector(s)).collect())
    }

    // Statements

    pub fn rule(&self, property: &str, value: Expr) -> Node {
        Node::Rule(Rule {
            property: property.to_owned(),
            value,
            important: false,
            span: Span::DUMMY,
        })
    }

    pub fn important(&self, property: &str, value: Expr) -> Node {
        Node::Rule(Rule {
            property: property.to_owned(),
            value,
            important: true,
            span: Span::DUMMY,
        })
    }

    pub fn def(&self, name: &str, value: Expr) -> Node {
        Node::Definition(Definition {
            name: self.interner.intern(name),
            value,
            span: Span::DUMMY,
        })
    }

    pub fn directive(&self, name: &str, value: Option<Expr>) -> Node {
        Node::Directive(Directive {
            name: name.to_owned(),
            value,
            span: Span::DUMMY,
        })
    }

    pub fn comment(&self, text: &str) -> Node {
        Node::Comment(Comment {
            text: text.to_owned(),
            block: true,
            span: Span::DUMMY,
        })
    }

    // Containers

    pub fn block(&self, rules: Vec<Node>) -> Block {
        Block::with_rules(rules)
    }

    pub fn stylesheet(&self, rules: Vec<Node>) -> Stylesheet {
        Stylesheet::new(Block::with_rules(rules))
    }

    pub fn ruleset(&self, selectors: &str, rules: Vec<Node>) -> Node {
        Node::Ruleset(Ruleset {
            id: DefId::fresh(),
            selectors: self.selectors(selectors),
            block: Block::with_rules(rules),
            span: Span::DUMMY,
        })
    }

    pub fn media(&self, features: Vec<Expr>, rules: Vec<Node>) -> Node {
        Node::Media(Media::new(
            Features::new(features),
            Block::with_rules(rules),
            Span::DUMMY,
        ))
    }

    pub fn block_directive(&self, name: &str, rules: Vec<Node>) -> Node {
        Node::BlockDirective(BlockDirective {
            name: name.to_owned(),
            block: Block::with_rules(rules),
            span: Span::DUMMY,
        })
    }

    // Imports

    pub fn import(&self, path: &str) -> Node {
        self.import_with(self.quoted(path), false, None)
    }

    pub fn import_once(&self, path: &str) -> Node {
        self.import_with(self.quoted(path), true, None)
    }

    pub fn import_with(&self, path: Expr, once: bool, features: Option<Features>) -> Node {
        Node::Import(Import {
            path,
            once,
            features,
            base_dir: None::<PathBuf>,
            span: Span::DUMMY,
        })
    }

    // Mixins

    /// Mixin definition. `name` is the selector text, e.g. `.m` or `#ns`.
    pub fn mixin(
        &self,
        name: &str,
        params: Vec<Parameter>,
        guard: Option<Guard>,
        rules: Vec<Node>,
    ) -> Node {
        Node::Mixin(Mixin {
            id: DefId::fresh(),
            selector: self.selector(name),
            params: MixinParams::new(params),
            guard,
            block: Block::with_rules(rules),
            span: Span::DUMMY,
        })
    }

    /// Required parameter `@name`.
    pub fn param(&self, name: &str) -> Parameter {
        Parameter {
            name: Some(self.interner.intern(name)),
            default: None,
            variadic: false,
        }
    }

    pub fn param_default(&self, name: &str, default: Expr) -> Parameter {
        Parameter {
            name: Some(self.interner.intern(name)),
            default: Some(default),
            variadic: false,
        }
    }

    /// Literal parameter the argument must equal.
    pub fn pattern(&self, value: Expr) -> Parameter {
        Parameter {
            name: None,
            default: Some(value),
            variadic: false,
        }
    }

    /// Named rest parameter `@name...`.
    pub fn rest(&self, name: &str) -> Parameter {
        Parameter {
            name: Some(self.interner.intern(name)),
            default: None,
            variadic: true,
        }
    }

    /// Anonymous variadic parameter `...`.
    pub fn variadic(&self) -> Parameter {
        Parameter {
            name: None,
            default: None,
            variadic: true,
        }
    }

    pub fn arg(&self, value: Expr) -> Argument {
        Argument { name: None, value }
    }

    pub fn named_arg(&self, name: &str, value: Expr) -> Argument {
        Argument {
            name: Some(self.interner.intern(name)),
            value,
        }
    }

    /// Mixin call with positional arguments; `.m()` and `.m` are the same
    /// call when `args` is empty.
    pub fn call(&self, selector: &str, args: Vec<Expr>) -> Node {
        self.call_with(
            selector,
            Some(MixinArgs::new(args.into_iter().map(|v| self.arg(v)).collect())),
            false,
        )
    }

    pub fn call_with(&self, selector: &str, args: Option<MixinArgs>, important: bool) -> Node {
        Node::MixinCall(MixinCall {
            selector: self.selector(selector),
            args,
            important,
            span: Span::DUMMY,
        })
    }
}

fn push_element(
    elements: &mut Vec<Element>,
    kind: ElementKind,
    pending: &mut Option<Combinator>,
    saw_space: &mut bool,
) {
    let combinator = pending
        .take()
        .or_else(|| (*saw_space && !elements.is_empty()).then_some(Combinator::Descendant));
    *saw_space = false;
    elements.push(Element { combinator, kind });
}

#[cfg(test)]
mod tests;
