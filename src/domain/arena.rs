use generational_arena::{Arena, Index};
use std::collections::HashSet;
use std::fmt;
use termtree::Tree;
use tracing::instrument;

use crate::domain::entities::{Answer, Diagnosis};

/// Handle of a node inside a [`DecisionTree`].
pub type NodeId = Index;

/// Decision tree node: either a yes/no question or a terminal result.
#[derive(Debug)]
pub enum Node {
    Question {
        text: String,
        /// Branch followed on "yes"; `None` marks a structural gap
        yes: Option<NodeId>,
        /// Branch followed on "no"; `None` marks a structural gap
        no: Option<NodeId>,
    },
    Leaf {
        /// Template result, copied on every retrieval
        result: Diagnosis,
    },
}

impl Node {
    /// Branch for the given answer, if this is a question node.
    pub fn branch(&self, answer: Answer) -> Option<NodeId> {
        match (self, answer) {
            (Node::Question { yes, .. }, Answer::Yes) => *yes,
            (Node::Question { no, .. }, Answer::No) => *no,
            (Node::Leaf { .. }, _) => None,
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Question { text, .. } => write!(f, "{}", text),
            Node::Leaf { result } => write!(f, "[{}] {}", result.severity, result.message),
        }
    }
}

/// Arena-backed binary decision tree.
///
/// Leaves may be shared by several parents: two questions simply hold the
/// same [`NodeId`]. The tree is read-only once built; construction goes
/// through [`crate::domain::TreeBuilder`].
#[derive(Debug)]
pub struct DecisionTree {
    arena: Arena<Node>,
    root: NodeId,
}

impl DecisionTree {
    pub(crate) fn from_parts(arena: Arena<Node>, root: NodeId) -> Self {
        Self { arena, root }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    #[instrument(level = "trace", skip(self))]
    pub fn node(&self, idx: NodeId) -> Option<&Node> {
        self.arena.get(idx)
    }

    /// Number of nodes owned by the tree, reachable or not.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Nodes reachable from the root, each listed once, in pre-order.
    #[instrument(level = "trace", skip(self))]
    pub fn iter(&self) -> ReachableIter<'_> {
        ReachableIter::new(self)
    }

    /// Longest root-to-leaf path, counted in nodes.
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        let mut on_path = HashSet::new();
        self.calculate_depth(self.root, &mut on_path)
    }

    fn calculate_depth(&self, idx: NodeId, on_path: &mut HashSet<NodeId>) -> usize {
        // a node already on the current path closes a cycle
        if !on_path.insert(idx) {
            return 0;
        }
        let depth = match self.node(idx) {
            Some(Node::Question { yes, no, .. }) => {
                1 + [*yes, *no]
                    .into_iter()
                    .flatten()
                    .map(|child| self.calculate_depth(child, on_path))
                    .max()
                    .unwrap_or(0)
            }
            Some(Node::Leaf { .. }) => 1,
            None => 0,
        };
        on_path.remove(&idx);
        depth
    }

    /// Distinct leaves reachable from the root.
    #[instrument(level = "debug", skip(self))]
    pub fn leaves(&self) -> Vec<(NodeId, &Diagnosis)> {
        self.iter()
            .filter_map(|(idx, node)| match node {
                Node::Leaf { result } => Some((idx, result)),
                Node::Question { .. } => None,
            })
            .collect()
    }

    /// Reachable question nodes with at least one missing or dangling branch.
    pub fn gaps(&self) -> Vec<NodeId> {
        self.iter()
            .filter(|(_, node)| match node {
                Node::Question { yes, no, .. } => [*yes, *no]
                    .into_iter()
                    .any(|b| b.map_or(true, |idx| self.node(idx).is_none())),
                Node::Leaf { .. } => false,
            })
            .map(|(idx, _)| idx)
            .collect()
    }

    /// Nodes owned by the arena that cannot be reached from the root.
    pub fn unreachable(&self) -> Vec<NodeId> {
        let reachable: HashSet<NodeId> = self.iter().map(|(idx, _)| idx).collect();
        self.arena
            .iter()
            .map(|(idx, _)| idx)
            .filter(|idx| !reachable.contains(idx))
            .collect()
    }

    /// Render the tree below `idx` for terminal display.
    ///
    /// Shared leaves are rendered under every parent; a node that would
    /// repeat one of its ancestors is shown as a cycle marker.
    pub fn to_termtree(&self, idx: NodeId) -> Tree<String> {
        let mut ancestors = HashSet::new();
        self.termtree_at(idx, "", &mut ancestors)
    }

    fn termtree_at(&self, idx: NodeId, edge: &str, ancestors: &mut HashSet<NodeId>) -> Tree<String> {
        let Some(node) = self.node(idx) else {
            return Tree::new(format!("{edge}<missing node>"));
        };
        if !ancestors.insert(idx) {
            return Tree::new(format!("{edge}<cycle: {node}>"));
        }
        let tree = match node {
            Node::Question { yes, no, .. } => {
                let leaves: Vec<_> = [("yes: ", *yes), ("no: ", *no)]
                    .into_iter()
                    .map(|(label, branch)| match branch {
                        Some(child) => self.termtree_at(child, label, ancestors),
                        None => Tree::new(format!("{label}<missing branch>")),
                    })
                    .collect();
                Tree::new(format!("{edge}{node}")).with_leaves(leaves)
            }
            Node::Leaf { .. } => Tree::new(format!("{edge}{node}")),
        };
        ancestors.remove(&idx);
        tree
    }
}

/// Pre-order walk over reachable nodes; shared nodes are yielded once.
pub struct ReachableIter<'a> {
    tree: &'a DecisionTree,
    stack: Vec<NodeId>,
    seen: HashSet<NodeId>,
}

impl<'a> ReachableIter<'a> {
    fn new(tree: &'a DecisionTree) -> Self {
        Self {
            tree,
            stack: vec![tree.root()],
            seen: HashSet::new(),
        }
    }
}

impl<'a> Iterator for ReachableIter<'a> {
    type Item = (NodeId, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if !self.seen.insert(current_idx) {
                continue;
            }
            if let Some(node) = self.tree.node(current_idx) {
                if let Node::Question { yes, no, .. } = node {
                    // push "no" first so "yes" is visited first
                    self.stack.extend([*no, *yes].into_iter().flatten());
                }
                return Some((current_idx, node));
            }
        }
        None
    }
}
