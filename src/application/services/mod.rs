//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (FileSystem, LineReader, Clock)
//! but are themselves concrete structs, not traits.

mod diagnosis;
mod records;
mod session;

pub use diagnosis::{fallback_diagnosis, DiagnosisService, Outcome, Traversal, FALLBACK_MESSAGE};
pub use records::RecordStore;
pub use session::SessionService;
