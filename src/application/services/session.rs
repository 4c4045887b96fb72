//! Patient session service
//!
//! One session: traverse the tree, adjust for age, then persist the record
//! once feedback (if any) is known.

use std::sync::Arc;

use tracing::{debug, info};

use crate::application::intake::Intake;
use crate::application::services::{DiagnosisService, RecordStore, Traversal};
use crate::application::ApplicationResult;
use crate::config::ClockConfig;
use crate::domain::{adjust_for_age, PatientRecord};
use crate::infrastructure::traits::{AnswerSource, Clock};

/// Service running complete patient sessions.
pub struct SessionService {
    diagnosis: Arc<DiagnosisService>,
    store: Arc<RecordStore>,
    clock: Arc<dyn Clock>,
    clock_config: ClockConfig,
}

impl SessionService {
    pub fn new(
        diagnosis: Arc<DiagnosisService>,
        store: Arc<RecordStore>,
        clock: Arc<dyn Clock>,
        clock_config: ClockConfig,
    ) -> Self {
        Self {
            diagnosis,
            store,
            clock,
            clock_config,
        }
    }

    /// Diagnose the patient and apply age routing.
    ///
    /// The returned traversal carries the adjusted diagnosis.
    pub fn assess<A>(&self, intake: &Intake, answers: &A) -> ApplicationResult<Traversal>
    where
        A: AnswerSource + ?Sized,
    {
        let mut traversal = self.diagnosis.diagnose(answers)?;
        traversal.diagnosis = adjust_for_age(traversal.diagnosis, intake.age);
        debug!(
            "assess: {} ({}, {})",
            traversal.diagnosis.message, traversal.diagnosis.severity, traversal.diagnosis.specialty
        );
        Ok(traversal)
    }

    /// Build the record for an assessed session and append it to the store.
    pub fn record(
        &self,
        intake: &Intake,
        traversal: &Traversal,
        feedback: Option<String>,
    ) -> ApplicationResult<PatientRecord> {
        let timestamp = self
            .clock
            .now_utc()
            .with_timezone(&self.clock_config.offset()?);
        let record = PatientRecord {
            timestamp,
            zone_label: self.clock_config.zone_label.clone(),
            name: intake.name.clone(),
            age: intake.age,
            gender: intake.gender,
            answers: traversal.path.clone(),
            diagnosis: traversal.diagnosis.clone(),
            feedback: feedback.filter(|f| !f.is_empty()),
        };
        self.store.append(&record)?;
        info!("record: saved to {}", self.store.path().display());
        Ok(record)
    }
}
