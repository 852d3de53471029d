//! Selectors.
//!
//! A selector is a flat list of elements, each optionally preceded by a
//! combinator. Compound selectors (`.a.b`, `a:hover`) are consecutive elements
//! without a combinator.

/// Selector combinators.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Combinator {
    Descendant,
    Child,
    Sibling,
    General,
}

impl Combinator {
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Descendant => " ",
            Self::Child => ">",
            Self::Sibling => "+",
            Self::General => "~",
        }
    }
}

/// Selector element kinds.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ElementKind {
    /// Tag, class, id or pseudo-class text.
    Text(String),
    /// `[attr=value]`, stored without brackets.
    Attribute(String),
    /// `&`, the parent selector.
    Wildcard,
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Element {
    pub combinator: Option<Combinator>,
    pub kind: ElementKind,
}

impl Element {
    pub fn text(combinator: Option<Combinator>, text: impl Into<String>) -> Self {
        Element {
            combinator,
            kind: ElementKind::Text(text.into()),
        }
    }

    pub const fn wildcard(combinator: Option<Combinator>) -> Self {
        Element {
            combinator,
            kind: ElementKind::Wildcard,
        }
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self.kind, ElementKind::Wildcard)
    }
}

#[derive(Clone, Eq, PartialEq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Selector {
    pub elements: Vec<Element>,
}

impl Selector {
    pub fn new(elements: Vec<Element>) -> Self {
        Selector { elements }
    }

    /// Element texts used when matching mixin calls.
    ///
    /// Combinators and `&` are ignored, so `#ns > .m`, `#ns.m` and `#ns .m`
    /// all yield `["#ns", ".m"]`.
    pub fn match_path(&self) -> Vec<&str> {
        self.elements
            .iter()
            .filter_map(|element| match &element.kind {
                ElementKind::Text(text) | ElementKind::Attribute(text) => Some(text.as_str()),
                ElementKind::Wildcard => None,
            })
            .collect()
    }

    pub fn has_wildcard(&self) -> bool {
        self.elements.iter().any(Element::is_wildcard)
    }
}

/// Comma-separated selector group of a ruleset.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Selectors {
    pub selectors: Vec<Selector>,
}

impl Selectors {
    pub fn new(selectors: Vec<Selector>) -> Self {
        Selectors { selectors }
    }
}
