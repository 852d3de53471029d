//! Value expressions.
//!
//! Everything that can appear on the right-hand side of a declaration, inside
//! a mixin argument list, a guard or a media feature list.

use crate::Name;

/// Arithmetic operators.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
}

impl Operator {
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
        }
    }
}

/// Condition operators used by guards.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CondOp {
    And,
    Or,
    Eq,
    Lt,
    LtEq,
    Gt,
    GtEq,
}

impl CondOp {
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::And => "and",
            Self::Or => "or",
            Self::Eq => "=",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
        }
    }
}

/// RGBA color. Channels are clamped to `0..=255`, alpha to `0.0..=1.0`.
#[derive(Copy, Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b, a: 1.0 }
    }

    /// Build a color from unclamped channel values.
    pub fn clamped(r: f64, g: f64, b: f64, a: f64) -> Self {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let channel = |v: f64| v.round().clamp(0.0, 255.0) as u8;
        Color {
            r: channel(r),
            g: channel(g),
            b: channel(b),
            a: a.clamp(0.0, 1.0),
        }
    }
}

/// Reference to a variable: `@name`, `@@name` or `@{name}` inside a string.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Variable {
    /// Interned name including the leading `@`.
    pub name: Name,
    /// `@@name`: the value of `@name` names the variable to read.
    pub indirect: bool,
    /// `@{name}` interpolation form.
    pub curly: bool,
}

impl Variable {
    pub const fn new(name: Name) -> Self {
        Variable {
            name,
            indirect: false,
            curly: false,
        }
    }
}

/// A quoted string. Literal text is held in `Anonymous` parts, interpolated
/// variables in curly `Variable` parts.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Quoted {
    pub delim: char,
    /// `~"..."`: rendered without delimiters.
    pub escaped: bool,
    pub parts: Vec<Expr>,
}

/// A guard or feature condition.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Condition {
    pub op: CondOp,
    pub left: Expr,
    pub right: Expr,
    pub negate: bool,
}

/// Value expression.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Expr {
    /// Opaque text emitted verbatim.
    Anonymous(String),
    Keyword(String),
    Dimension {
        value: f64,
        unit: Option<String>,
    },
    Color(Color),
    Quoted(Quoted),
    Url(Box<Expr>),
    Variable(Variable),
    /// Space-separated terms.
    Expression(Vec<Expr>),
    /// Comma-separated values.
    ExpressionList(Vec<Expr>),
    Operation {
        op: Operator,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Paren(Box<Expr>),
    FunctionCall {
        name: String,
        args: Vec<Expr>,
    },
    Condition(Box<Condition>),
    /// Parenthesized media feature, `(property: value)`.
    Feature {
        property: Box<Expr>,
        value: Box<Expr>,
    },
    Boolean(bool),
}

impl Expr {
    pub fn keyword(text: impl Into<String>) -> Self {
        Expr::Keyword(text.into())
    }

    pub fn anonymous(text: impl Into<String>) -> Self {
        Expr::Anonymous(text.into())
    }

    pub fn dimension(value: f64, unit: Option<&str>) -> Self {
        Expr::Dimension {
            value,
            unit: unit.map(str::to_owned),
        }
    }

    pub fn variable(name: Name) -> Self {
        Expr::Variable(Variable::new(name))
    }

    /// Whether evaluating this expression can produce a different value.
    pub fn needs_eval(&self) -> bool {
        match self {
            Expr::Anonymous(_)
            | Expr::Keyword(_)
            | Expr::Dimension { .. }
            | Expr::Color(_)
            | Expr::Boolean(_) => false,
            Expr::Variable(_)
            | Expr::Operation { .. }
            | Expr::FunctionCall { .. }
            | Expr::Condition(_) => true,
            Expr::Quoted(quoted) => quoted.parts.iter().any(Expr::needs_eval),
            Expr::Url(inner) | Expr::Paren(inner) => inner.needs_eval(),
            Expr::Expression(terms) | Expr::ExpressionList(terms) => {
                terms.iter().any(Expr::needs_eval)
            }
            Expr::Feature { property, value } => property.needs_eval() || value.needs_eval(),
        }
    }

    /// Whether this is the given keyword.
    pub fn is_keyword(&self, text: &str) -> bool {
        matches!(self, Expr::Keyword(k) if k == text)
    }
}
