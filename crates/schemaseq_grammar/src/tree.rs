//! Arena-allocated parse trees.

use std::fmt::Write as _;

use schemaseq_foundation::Span;

use crate::grammar::Grammar;
use crate::rule::RuleId;

/// Index of a node inside its [`ParseTree`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Returns the raw index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// A matched rule occurrence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node {
    /// Rule that produced this node.
    pub rule: RuleId,
    /// Byte offset where the match starts.
    pub start: usize,
    /// Byte offset where the match ends (exclusive).
    pub end: usize,
    /// Child nodes in source order.
    pub children: Vec<NodeId>,
}

/// The result of one successful match.
///
/// Nodes are stored in an arena; children always precede their parent.
/// The tree borrows the grammar (for rule names) and the matched text.
#[derive(Clone, Debug)]
pub struct ParseTree<'a> {
    grammar: &'a Grammar,
    source: &'a str,
    nodes: Vec<Node>,
    roots: Vec<NodeId>,
}

impl<'a> ParseTree<'a> {
    pub(crate) fn new(
        grammar: &'a Grammar,
        source: &'a str,
        nodes: Vec<Node>,
        roots: Vec<NodeId>,
    ) -> Self {
        Self {
            grammar,
            source,
            nodes,
            roots,
        }
    }

    /// Returns the grammar that produced this tree.
    #[must_use]
    pub fn grammar(&self) -> &'a Grammar {
        self.grammar
    }

    /// Returns the full source text the tree indexes into.
    #[must_use]
    pub fn source(&self) -> &'a str {
        self.source
    }

    /// Returns the top-level nodes.
    ///
    /// A normal start rule yields exactly one root; a transparent start rule
    /// yields its children and a silent one yields none.
    #[must_use]
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Returns the first top-level node, if any.
    #[must_use]
    pub fn root(&self) -> Option<NodeId> {
        self.roots.first().copied()
    }

    /// Returns the number of nodes in the arena.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the tree has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns a node by id.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    /// Returns the children of a node.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    /// Returns the source text a node covers.
    #[must_use]
    pub fn text(&self, id: NodeId) -> &'a str {
        let node = self.node(id);
        self.source.get(node.start..node.end).unwrap_or_default()
    }

    /// Returns the span a node covers, with line and column filled in.
    #[must_use]
    pub fn span(&self, id: NodeId) -> Span {
        let node = self.node(id);
        Span::locate(self.source, node.start, node.end)
    }

    /// Returns the rule name of a node.
    #[must_use]
    pub fn rule_name(&self, id: NodeId) -> &'a str {
        self.grammar.rule_name(self.node(id).rule)
    }

    /// Returns true if the node was produced by the named rule.
    #[must_use]
    pub fn is(&self, id: NodeId, rule: &str) -> bool {
        self.rule_name(id) == rule
    }

    /// Returns the first direct child matching a predicate.
    pub fn find_child(&self, id: NodeId, mut predicate: impl FnMut(NodeId) -> bool) -> Option<NodeId> {
        self.children(id).iter().copied().find(|&child| predicate(child))
    }

    /// Returns the first direct child produced by the named rule.
    #[must_use]
    pub fn child_by_rule(&self, id: NodeId, rule: &str) -> Option<NodeId> {
        self.find_child(id, |child| self.is(child, rule))
    }

    /// Returns every direct child produced by the named rule.
    #[must_use]
    pub fn children_by_rule(&self, id: NodeId, rule: &str) -> Vec<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .filter(|&child| self.is(child, rule))
            .collect()
    }

    /// Returns all descendants of a node in pre-order, excluding the node.
    #[must_use]
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).iter().rev().copied());
        }
        out
    }

    /// Returns the first descendant (pre-order) produced by the named rule.
    #[must_use]
    pub fn find_descendant(&self, id: NodeId, rule: &str) -> Option<NodeId> {
        self.descendants(id).into_iter().find(|&d| self.is(d, rule))
    }

    /// Renders the tree as indented text, one node per line.
    ///
    /// Leaf nodes show their matched text.
    #[must_use]
    pub fn dump(&self) -> String {
        let mut out = String::new();
        for &root in &self.roots {
            self.dump_node(root, 0, &mut out);
        }
        out
    }

    fn dump_node(&self, id: NodeId, depth: usize, out: &mut String) {
        let node = self.node(id);
        let _ = write!(
            out,
            "{:indent$}{} {}..{}",
            "",
            self.rule_name(id),
            node.start,
            node.end,
            indent = depth * 2
        );
        if node.children.is_empty() {
            let _ = write!(out, " {:?}", self.text(id));
        }
        out.push('\n');
        for &child in &node.children {
            self.dump_node(child, depth + 1, out);
        }
    }
}
