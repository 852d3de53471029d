//! Ordered rule lists.

use std::fmt;
use std::sync::OnceLock;

use rustc_hash::FxHashMap;

use super::{Directive, Node};
use crate::Name;

/// Structural index over a block's rules.
///
/// Built on first use and discarded by every splice.
#[derive(Clone, Debug, Default)]
struct BlockIndex {
    /// Variable name to index of its last definition.
    variables: FxHashMap<Name, usize>,
    /// Indices of mixin definitions and rulesets, in source order.
    mixins: Vec<usize>,
}

impl BlockIndex {
    fn build(rules: &[Node]) -> Self {
        let mut index = BlockIndex::default();
        for (i, node) in rules.iter().enumerate() {
            match node {
                Node::Definition(def) => {
                    index.variables.insert(def.name, i);
                }
                Node::Mixin(_) | Node::Ruleset(_) => index.mixins.push(i),
                _ => {}
            }
        }
        index
    }
}

/// Ordered sequence of rule nodes.
///
/// Length only changes through [`Block::splice`] (and the `push`/`prepend`
/// builders); rule evaluation replaces nodes in place with [`Block::replace`].
#[derive(Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Block {
    rules: Vec<Node>,
    /// First `@charset` directive evaluated in this block.
    charset: Option<Directive>,
    #[cfg_attr(feature = "serde", serde(skip))]
    index: OnceLock<BlockIndex>,
}

impl Block {
    pub fn new() -> Self {
        Block::default()
    }

    pub fn with_rules(rules: Vec<Node>) -> Self {
        Block {
            rules,
            charset: None,
            index: OnceLock::new(),
        }
    }

    pub fn rules(&self) -> &[Node] {
        &self.rules
    }

    pub fn into_rules(self) -> Vec<Node> {
        self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Node> {
        self.rules.get(index)
    }

    pub fn push(&mut self, node: Node) {
        self.rules.push(node);
        self.reset_index();
    }

    pub fn prepend(&mut self, node: Node) {
        self.rules.insert(0, node);
        self.reset_index();
    }

    /// Append every rule of `other`.
    pub fn append_block(&mut self, other: Block) {
        self.rules.extend(other.rules);
        self.reset_index();
    }

    /// Replace `remove` rules starting at `index` with `insert`.
    ///
    /// Returns the number of inserted rules so iteration can resume after
    /// them. Out-of-range bounds are clamped to the end of the block.
    pub fn splice(&mut self, index: usize, remove: usize, insert: Vec<Node>) -> usize {
        let start = index.min(self.rules.len());
        let end = start.saturating_add(remove).min(self.rules.len());
        let inserted = insert.len();
        self.rules.splice(start..end, insert);
        self.reset_index();
        inserted
    }

    /// Replace the rule at `index` in place. Out-of-range indices are ignored.
    pub fn replace(&mut self, index: usize, node: Node) {
        let Some(slot) = self.rules.get_mut(index) else {
            return;
        };
        let reindex = binding_key(slot) != binding_key(&node);
        *slot = node;
        if reindex {
            self.reset_index();
        }
    }

    pub fn charset(&self) -> Option<&Directive> {
        self.charset.as_ref()
    }

    /// Record the block's charset. Only the first one is kept; returns
    /// whether this call set it.
    pub fn set_charset(&mut self, directive: Directive) -> bool {
        if self.charset.is_some() {
            return false;
        }
        self.charset = Some(directive);
        true
    }

    /// Last definition of `name` in this block.
    pub fn variable(&self, name: Name) -> Option<&Node> {
        let i = *self.index().variables.get(&name)?;
        self.rules.get(i)
    }

    /// Mixin definitions and rulesets, in source order.
    pub fn mixin_candidates(&self) -> impl Iterator<Item = &Node> + '_ {
        self.index()
            .mixins
            .iter()
            .filter_map(|&i| self.rules.get(i))
    }

    fn index(&self) -> &BlockIndex {
        self.index.get_or_init(|| BlockIndex::build(&self.rules))
    }

    fn reset_index(&mut self) {
        self.index = OnceLock::new();
    }
}

/// What a node contributes to the block index.
#[derive(PartialEq)]
enum BindingKey {
    Variable(Name),
    Candidate,
    Other,
}

fn binding_key(node: &Node) -> BindingKey {
    match node {
        Node::Definition(def) => BindingKey::Variable(def.name),
        Node::Mixin(_) | Node::Ruleset(_) => BindingKey::Candidate,
        _ => BindingKey::Other,
    }
}

impl PartialEq for Block {
    fn eq(&self, other: &Self) -> bool {
        self.rules == other.rules && self.charset == other.charset
    }
}

impl fmt::Debug for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Block")
            .field("rules", &self.rules)
            .field("charset", &self.charset)
            .finish()
    }
}

impl From<Vec<Node>> for Block {
    fn from(rules: Vec<Node>) -> Self {
        Block::with_rules(rules)
    }
}
