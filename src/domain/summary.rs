//! Aggregate statistics over stored patient records.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, FixedOffset};

use crate::domain::entities::is_affirmative;
use crate::domain::record::{PatientRecord, RecordBlock};

/// Which records a summary covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SummaryScope {
    /// Every record in the store, regardless of date
    #[default]
    AllTime,
    /// Records whose timestamp falls in the given ISO week
    IsoWeek { year: i32, week: u32 },
}

impl SummaryScope {
    /// ISO week containing `now`.
    pub fn week_of(now: &DateTime<FixedOffset>) -> Self {
        let iso = now.iso_week();
        SummaryScope::IsoWeek {
            year: iso.year(),
            week: iso.week(),
        }
    }

    fn includes(&self, timestamp: Option<DateTime<FixedOffset>>) -> bool {
        match self {
            SummaryScope::AllTime => true,
            SummaryScope::IsoWeek { year, week } => timestamp.is_some_and(|ts| {
                let iso = ts.iso_week();
                iso.year() == *year && iso.week() == *week
            }),
        }
    }
}

/// Counts reconstructed from stored records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SummaryStats {
    pub total_cases: usize,
    /// Keyed by the severity label exactly as stored
    pub by_severity: BTreeMap<String, usize>,
    /// Keyed by the specialty label exactly as stored
    pub by_specialty: BTreeMap<String, usize>,
    pub helpful_count: usize,
    pub feedback_total: usize,
}

impl SummaryStats {
    pub fn is_empty(&self) -> bool {
        self.total_cases == 0 && self.by_severity.is_empty() && self.feedback_total == 0
    }

    /// Share of feedback entries marked helpful, `None` without feedback.
    pub fn helpful_ratio(&self) -> Option<f64> {
        (self.feedback_total > 0).then(|| self.helpful_count as f64 / self.feedback_total as f64)
    }

    fn count<'a>(
        &mut self,
        has_timestamp: bool,
        severities: impl IntoIterator<Item = &'a str>,
        specialties: impl IntoIterator<Item = &'a str>,
        feedback: impl IntoIterator<Item = &'a str>,
    ) {
        if has_timestamp {
            self.total_cases += 1;
        }
        for severity in severities {
            *self.by_severity.entry(severity.to_string()).or_default() += 1;
        }
        for specialty in specialties {
            *self.by_specialty.entry(specialty.to_string()).or_default() += 1;
        }
        for entry in feedback {
            self.feedback_total += 1;
            if is_affirmative(entry) {
                self.helpful_count += 1;
            }
        }
    }
}

/// Summarize decoded record blocks.
///
/// Every labelled line is counted, so a partial block still contributes
/// what it has and a repeated label is counted each time. Under
/// [`SummaryScope::IsoWeek`] blocks without a parseable timestamp are excluded.
pub fn summarize(blocks: &[RecordBlock], scope: SummaryScope, offset: FixedOffset) -> SummaryStats {
    let mut stats = SummaryStats::default();
    for block in blocks {
        if !scope.includes(block.timestamp_in(offset)) {
            continue;
        }
        stats.count(
            block.timestamp.is_some(),
            block.severity.iter().map(String::as_str),
            block.specialty.iter().map(String::as_str),
            block.feedback.iter().map(String::as_str),
        );
    }
    stats
}

/// Summarize fully parsed records.
pub fn summarize_records(records: &[PatientRecord], scope: SummaryScope) -> SummaryStats {
    let mut stats = SummaryStats::default();
    for record in records.iter().filter(|r| scope.includes(Some(r.timestamp))) {
        stats.count(
            true,
            Some(record.diagnosis.severity.label()),
            Some(record.diagnosis.specialty.as_str()),
            record.feedback.as_deref().filter(|f| !f.is_empty()),
        );
    }
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::record::decode_blocks;
    use chrono::TimeZone;

    fn pst() -> FixedOffset {
        FixedOffset::east_opt(5 * 3600).unwrap()
    }

    fn block(timestamp: &str, severity: &str, specialty: &str, feedback: Option<&str>) -> String {
        let mut text = format!(
            "=== Patient Record ===\nTimestamp: {timestamp}\nName: X\nAge: 30\nGender: Other\n\
             Symptoms and Answers:\n\n--- Diagnosis Result ---\nRecommendation: R\n\
             Severity: {severity}\nSpecialty: {specialty}\n"
        );
        if let Some(fb) = feedback {
            text.push_str(&format!("Feedback: {fb}\n"));
        }
        text.push_str("=========================\n\n");
        text
    }

    #[test]
    fn given_three_records_when_summarizing_then_counts_by_severity() {
        let text = [
            block("12-10-2026 09:00:00 AM PST", "Medium", "General Practitioner", None),
            block("13-10-2026 09:00:00 AM PST", "High", "Cardiology", None),
            block("14-10-2026 09:00:00 AM PST", "Medium", "Neurology", None),
        ]
        .concat();

        let stats = summarize(&decode_blocks(&text), SummaryScope::AllTime, pst());

        assert_eq!(stats.total_cases, 3);
        assert_eq!(
            stats.by_severity,
            BTreeMap::from([("Medium".to_string(), 2), ("High".to_string(), 1)])
        );
        assert_eq!(stats.by_specialty.len(), 3);
        assert_eq!(stats.helpful_ratio(), None);
    }

    #[test]
    fn given_feedback_entries_when_summarizing_then_counts_helpful() {
        let ts = "12-10-2026 09:00:00 AM PST";
        let text = [
            block(ts, "Low", "Allergy", Some("yes")),
            block(ts, "Low", "Allergy", Some("no")),
            block(ts, "Low", "Allergy", Some("Yes")),
        ]
        .concat();

        let stats = summarize(&decode_blocks(&text), SummaryScope::AllTime, pst());

        assert_eq!(stats.helpful_count, 2);
        assert_eq!(stats.feedback_total, 3);
    }

    #[test]
    fn given_records_across_weeks_when_scoped_to_week_then_filters() {
        let text = [
            // ISO week 42 of 2026 runs Mon 12-10 .. Sun 18-10
            block("12-10-2026 12:30:00 AM PST", "Low", "Allergy", None),
            block("18-10-2026 11:59:59 PM PST", "High", "Cardiology", None),
            block("19-10-2026 09:00:00 AM PST", "Medium", "Neurology", None),
            block("garbage", "Medium", "Neurology", None),
        ]
        .concat();
        let now = pst().with_ymd_and_hms(2026, 10, 16, 10, 0, 0).unwrap();

        let scope = SummaryScope::week_of(&now);
        assert_eq!(scope, SummaryScope::IsoWeek { year: 2026, week: 42 });

        let stats = summarize(&decode_blocks(&text), scope, pst());
        assert_eq!(stats.total_cases, 2);
        assert_eq!(stats.by_severity.get("Medium"), None);

        let all = summarize(&decode_blocks(&text), SummaryScope::AllTime, pst());
        assert_eq!(all.total_cases, 4);
    }

    #[test]
    fn given_second_record_without_start_marker_when_summarizing_then_both_counted() {
        let ts = "13-10-2026 09:00:00 AM PST";
        let text = block(ts, "Medium", "Neurology", Some("yes"))
            + &block(ts, "High", "Cardiology", Some("no")).replacen("=== Patient Record ===\n", "", 1);

        let stats = summarize(&decode_blocks(&text), SummaryScope::AllTime, pst());

        assert_eq!(stats.total_cases, 2);
        assert_eq!(
            stats.by_severity,
            BTreeMap::from([("Medium".to_string(), 1), ("High".to_string(), 1)])
        );
        assert_eq!((stats.helpful_count, stats.feedback_total), (1, 2));
    }

    #[test]
    fn given_repeated_labels_in_one_block_when_summarizing_then_each_line_counts() {
        let text = "=== Patient Record ===\nSeverity: Low\nSeverity: Low\nFeedback: y\nFeedback: 1\n";

        let stats = summarize(&decode_blocks(text), SummaryScope::AllTime, pst());

        assert_eq!(stats.total_cases, 0);
        assert_eq!(stats.by_severity.get("Low"), Some(&2));
        assert_eq!((stats.helpful_count, stats.feedback_total), (2, 2));
    }

    #[test]
    fn given_unknown_severity_label_when_summarizing_then_counted_verbatim() {
        let text = block("12-10-2026 09:00:00 AM PST", "Critical", "X", None);
        let stats = summarize(&decode_blocks(&text), SummaryScope::AllTime, pst());
        assert_eq!(stats.by_severity.get("Critical"), Some(&1));
    }

    #[test]
    fn given_no_blocks_when_summarizing_then_empty() {
        let stats = summarize(&[], SummaryScope::AllTime, pst());
        assert!(stats.is_empty());
        assert_eq!(stats, SummaryStats::default());
    }
}
