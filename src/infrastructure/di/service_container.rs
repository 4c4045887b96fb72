//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use crate::application::services::{DiagnosisService, RecordStore, SessionService};
use crate::application::ApplicationResult;
use crate::config::Settings;
use crate::domain::{clinical_tree, DecisionTree};
use crate::infrastructure::traits::{
    Clock, ConsoleReader, FileSystem, LineReader, RealFileSystem, SystemClock,
};

/// Container holding all application services.
///
/// The decision tree is built once here and shared read-only by every service.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    /// Console abstraction for intake prompts and questions
    pub reader: Arc<dyn LineReader>,

    /// Wall clock used for record timestamps
    pub clock: Arc<dyn Clock>,

    pub tree: Arc<DecisionTree>,

    pub diagnosis: Arc<DiagnosisService>,
    pub records: Arc<RecordStore>,
    pub session: SessionService,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> ApplicationResult<Self> {
        Self::with_deps(
            settings,
            Arc::new(RealFileSystem),
            Arc::new(ConsoleReader),
            Arc::new(SystemClock),
        )
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(
        settings: Settings,
        fs: Arc<dyn FileSystem>,
        reader: Arc<dyn LineReader>,
        clock: Arc<dyn Clock>,
    ) -> ApplicationResult<Self> {
        let settings = Arc::new(settings);
        let tree = Arc::new(clinical_tree()?);
        let offset = settings.clock.offset()?;

        let diagnosis = Arc::new(DiagnosisService::new(
            Arc::clone(&tree),
            settings.traversal.max_steps,
        ));
        let records = Arc::new(RecordStore::new(
            Arc::clone(&fs),
            settings.records_file.clone(),
            offset,
        ));
        let session = SessionService::new(
            Arc::clone(&diagnosis),
            Arc::clone(&records),
            Arc::clone(&clock),
            settings.clock.clone(),
        );

        Ok(Self {
            settings,
            fs,
            reader,
            clock,
            tree,
            diagnosis,
            records,
            session,
        })
    }
}
