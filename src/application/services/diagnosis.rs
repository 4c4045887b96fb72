//! Decision tree traversal service
//!
//! Walks the tree from a start node to a leaf, asking one question per step.

use std::sync::Arc;

use tracing::{debug, instrument, warn};

use crate::application::{ApplicationResult, IoResultExt};
use crate::domain::{DecisionTree, Diagnosis, Node, NodeId, PathStep, Severity};
use crate::infrastructure::traits::AnswerSource;

pub const FALLBACK_MESSAGE: &str =
    "Insufficient data to decide. Please consult a healthcare professional.";

/// How a traversal ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Reached this leaf
    Leaf(NodeId),
    /// The chosen branch of this node is missing or dangling
    MissingBranch { at: NodeId },
    /// More questions than the step budget; the tree likely contains a cycle
    StepBudgetExhausted,
}

impl Outcome {
    pub fn is_degraded(&self) -> bool {
        !matches!(self, Outcome::Leaf(_))
    }
}

/// Result of one walk through the tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Traversal {
    /// Independent copy of the leaf result (or the fallback)
    pub diagnosis: Diagnosis,
    /// Questions asked and answers given, in order
    pub path: Vec<PathStep>,
    pub outcome: Outcome,
}

/// Result returned when the tree cannot lead to a leaf.
pub fn fallback_diagnosis() -> Diagnosis {
    Diagnosis::new(FALLBACK_MESSAGE).with_severity(Severity::Medium)
}

/// Service for diagnosing a patient by walking the decision tree.
pub struct DiagnosisService {
    tree: Arc<DecisionTree>,
    max_steps: usize,
}

impl DiagnosisService {
    /// Create a new diagnosis service.
    pub fn new(tree: Arc<DecisionTree>, max_steps: usize) -> Self {
        Self { tree, max_steps }
    }

    pub fn tree(&self) -> &DecisionTree {
        &self.tree
    }

    /// Walk from the root of the tree.
    pub fn diagnose<A>(&self, answers: &A) -> ApplicationResult<Traversal>
    where
        A: AnswerSource + ?Sized,
    {
        self.diagnose_from(self.tree.root(), answers)
    }

    /// Walk from `start` until a leaf is reached.
    ///
    /// Structural problems in the tree never fail the call: a missing branch
    /// or an exhausted step budget ends the walk with [`fallback_diagnosis`].
    /// Only failure to obtain an answer is an error.
    #[instrument(level = "debug", skip(self, answers))]
    pub fn diagnose_from<A>(&self, start: NodeId, answers: &A) -> ApplicationResult<Traversal>
    where
        A: AnswerSource + ?Sized,
    {
        let mut path = Vec::new();
        let mut cursor = start;

        loop {
            let Some(node) = self.tree.node(cursor) else {
                warn!("diagnose: node {:?} not in tree", cursor);
                return Ok(Self::degraded(path, Outcome::MissingBranch { at: cursor }));
            };

            let text = match node {
                Node::Leaf { result } => {
                    debug!("diagnose: reached leaf after {} questions", path.len());
                    return Ok(Traversal {
                        diagnosis: result.duplicate(),
                        path,
                        outcome: Outcome::Leaf(cursor),
                    });
                }
                Node::Question { text, .. } => text,
            };

            if path.len() >= self.max_steps {
                warn!("diagnose: step budget of {} exhausted", self.max_steps);
                return Ok(Self::degraded(path, Outcome::StepBudgetExhausted));
            }

            let answer = answers
                .ask_yes_no(text)
                .input_context(&format!("answer to {text:?}"))?;
            path.push(PathStep::new(text.as_str(), answer));

            match node.branch(answer) {
                Some(next) => cursor = next,
                None => {
                    warn!("diagnose: no '{}' branch after {:?}", answer, text);
                    return Ok(Self::degraded(path, Outcome::MissingBranch { at: cursor }));
                }
            }
        }
    }

    fn degraded(path: Vec<PathStep>, outcome: Outcome) -> Traversal {
        Traversal {
            diagnosis: fallback_diagnosis(),
            path,
            outcome,
        }
    }
}
