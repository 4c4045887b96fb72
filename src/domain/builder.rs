//! Tree builder for assembling decision trees node by node.

use generational_arena::Arena;
use tracing::debug;

use crate::domain::arena::{DecisionTree, Node, NodeId};
use crate::domain::entities::{Answer, Diagnosis};
use crate::domain::error::DomainError;

/// Result type for tree operations.
pub type TreeResult<T> = Result<T, DomainError>;

/// Constructs a [`DecisionTree`].
///
/// Nodes are usually added bottom-up: leaves first, then the questions that
/// point at them. [`TreeBuilder::set_branch`] allows forward links while the
/// tree is still under construction.
#[derive(Debug, Default)]
pub struct TreeBuilder {
    arena: Arena<Node>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a terminal node holding a template result.
    pub fn leaf(&mut self, result: Diagnosis) -> NodeId {
        self.arena.insert(Node::Leaf { result })
    }

    /// Add a question with both branches set.
    pub fn question(&mut self, text: impl Into<String>, yes: NodeId, no: NodeId) -> NodeId {
        self.partial_question(text, Some(yes), Some(no))
    }

    /// Add a question whose branches may be missing.
    pub fn partial_question(
        &mut self,
        text: impl Into<String>,
        yes: Option<NodeId>,
        no: Option<NodeId>,
    ) -> NodeId {
        self.arena.insert(Node::Question {
            text: text.into(),
            yes,
            no,
        })
    }

    /// Point one branch of an existing question at `target`.
    pub fn set_branch(&mut self, question: NodeId, answer: Answer, target: NodeId) -> TreeResult<()> {
        if !self.arena.contains(target) {
            return Err(DomainError::UnknownNode(format!("{target:?}")));
        }
        match self.arena.get_mut(question) {
            Some(Node::Question { yes, no, .. }) => {
                match answer {
                    Answer::Yes => *yes = Some(target),
                    Answer::No => *no = Some(target),
                }
                Ok(())
            }
            Some(Node::Leaf { .. }) => Err(DomainError::NotAQuestion(format!("{question:?}"))),
            None => Err(DomainError::UnknownNode(format!("{question:?}"))),
        }
    }

    /// Freeze the arena into a tree rooted at `root`.
    ///
    /// Every branch must refer to a node of this builder. Missing branches
    /// (`None`) are allowed and handled at traversal time.
    pub fn build(self, root: NodeId) -> TreeResult<DecisionTree> {
        if !self.arena.contains(root) {
            return Err(DomainError::UnknownNode(format!("root {root:?}")));
        }
        for (idx, node) in self.arena.iter() {
            if let Node::Question { yes, no, .. } = node {
                for branch in [yes, no].into_iter().flatten() {
                    if !self.arena.contains(*branch) {
                        return Err(DomainError::UnknownNode(format!(
                            "{branch:?} (branch of {idx:?})"
                        )));
                    }
                }
            }
        }
        debug!("build: {} nodes", self.arena.len());
        Ok(DecisionTree::from_parts(self.arena, root))
    }
}
