//! Domain layer: entities and business logic
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod builder;
pub mod entities;
pub mod error;
pub mod knowledge;
pub mod record;
pub mod summary;
pub mod triage;

pub use arena::{DecisionTree, Node, NodeId};
pub use builder::TreeBuilder;
pub use entities::*;
pub use error::DomainError;
pub use knowledge::clinical_tree;
pub use record::{decode_blocks, PatientRecord, RecordBlock};
pub use summary::{summarize, summarize_records, SummaryScope, SummaryStats};
pub use triage::adjust_for_age;
