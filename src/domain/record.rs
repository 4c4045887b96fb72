//! Patient record text format.
//!
//! Records are appended to a plain text store as blocks:
//!
//! ```text
//! === Patient Record ===
//! Timestamp: 16-10-2026 03:04:05 PM PST
//! Name: Ayesha
//! Age: 29
//! Gender: Female
//! Symptoms and Answers:
//!   - Do you have a fever? -> no
//!
//! --- Diagnosis Result ---
//! Recommendation: ...
//! Severity: Medium
//! Specialty: Neurology
//! Notes: ...
//! Feedback: yes
//! =========================
//! ```
//!
//! `Notes:` and `Feedback:` are omitted when empty. Encoding and decoding
//! both live here so the two stay symmetric.

use std::fmt::Write as _;

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone};

use crate::domain::entities::{Diagnosis, Gender, PathStep};
use crate::domain::error::DomainError;

pub const RECORD_START: &str = "=== Patient Record ===";
pub const RESULT_SECTION: &str = "--- Diagnosis Result ---";
pub const RECORD_END: &str = "=========================";
pub const ANSWERS_HEADER: &str = "Symptoms and Answers:";

/// chrono format of the timestamp, without the zone label.
pub const TIMESTAMP_FORMAT: &str = "%d-%m-%Y %I:%M:%S %p";

const TIMESTAMP: &str = "Timestamp:";
const NAME: &str = "Name:";
const AGE: &str = "Age:";
const GENDER: &str = "Gender:";
const RECOMMENDATION: &str = "Recommendation:";
const SEVERITY: &str = "Severity:";
const SPECIALTY: &str = "Specialty:";
const NOTES: &str = "Notes:";
const FEEDBACK: &str = "Feedback:";
const ANSWER_BULLET: &str = "- ";

/// One completed patient session.
#[derive(Debug, Clone, PartialEq)]
pub struct PatientRecord {
    pub timestamp: DateTime<FixedOffset>,
    /// Zone suffix written after the timestamp, e.g. `PST`
    pub zone_label: String,
    pub name: String,
    pub age: f64,
    pub gender: Gender,
    pub answers: Vec<PathStep>,
    pub diagnosis: Diagnosis,
    /// Raw feedback text as typed by the user
    pub feedback: Option<String>,
}

impl PatientRecord {
    pub fn formatted_timestamp(&self) -> String {
        format_timestamp(&self.timestamp, &self.zone_label)
    }

    /// Render this record as a text block, trailing blank line included.
    pub fn encode(&self) -> String {
        let mut out = String::new();
        // writing to a String cannot fail
        let _ = self.write_block(&mut out);
        out
    }

    fn write_block(&self, out: &mut String) -> std::fmt::Result {
        writeln!(out, "{RECORD_START}")?;
        writeln!(out, "{TIMESTAMP} {}", self.formatted_timestamp())?;
        writeln!(out, "{NAME} {}", single_line(&self.name))?;
        writeln!(out, "{AGE} {}", self.age)?;
        writeln!(out, "{GENDER} {}", self.gender)?;
        writeln!(out, "{ANSWERS_HEADER}")?;
        for step in &self.answers {
            writeln!(out, "  {ANSWER_BULLET}{}", single_line(&step.to_string()))?;
        }
        writeln!(out)?;
        writeln!(out, "{RESULT_SECTION}")?;
        writeln!(out, "{RECOMMENDATION} {}", single_line(&self.diagnosis.message))?;
        writeln!(out, "{SEVERITY} {}", self.diagnosis.severity)?;
        writeln!(out, "{SPECIALTY} {}", single_line(&self.diagnosis.specialty))?;
        if !self.diagnosis.notes.is_empty() {
            writeln!(out, "{NOTES} {}", single_line(&self.diagnosis.notes))?;
        }
        if let Some(feedback) = self.feedback.as_deref().filter(|f| !f.is_empty()) {
            writeln!(out, "{FEEDBACK} {}", single_line(feedback))?;
        }
        writeln!(out, "{RECORD_END}")?;
        writeln!(out)
    }
}

/// `DD-MM-YYYY hh:mm:ss AM/PM <label>`
pub fn format_timestamp(timestamp: &DateTime<FixedOffset>, zone_label: &str) -> String {
    format!("{} {}", timestamp.format(TIMESTAMP_FORMAT), zone_label)
}

/// Parse a timestamp written by [`format_timestamp`], interpreting it in `offset`.
///
/// The zone label is informational only and is returned as written.
pub fn parse_timestamp(
    text: &str,
    offset: FixedOffset,
) -> Result<(DateTime<FixedOffset>, String), DomainError> {
    let malformed = || DomainError::MalformedRecord {
        message: format!("bad timestamp: {text:?}"),
    };
    let text = text.trim();
    // "16-10-2026 03:04:05 PM PST": three fields of date/time, then the label
    let (datetime, label) = match text.splitn(4, ' ').collect::<Vec<_>>().as_slice() {
        [date, time, meridiem, label] => (format!("{date} {time} {meridiem}"), label.to_string()),
        [date, time, meridiem] => (format!("{date} {time} {meridiem}"), String::new()),
        _ => return Err(malformed()),
    };
    let naive = NaiveDateTime::parse_from_str(&datetime, TIMESTAMP_FORMAT).map_err(|_| malformed())?;
    let timestamp = offset
        .from_local_datetime(&naive)
        .single()
        .ok_or_else(malformed)?;
    Ok((timestamp, label))
}

fn single_line(text: &str) -> String {
    text.replace(['\r', '\n'], " ")
}

/// Loosely decoded record block.
///
/// Every field is optional: blocks are read from a hand-editable text file
/// and aggregation must keep working on partial records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordBlock {
    pub timestamp: Option<String>,
    pub name: Option<String>,
    pub age: Option<String>,
    pub gender: Option<String>,
    /// Raw `<question> -> <answer>` lines
    pub answers: Vec<String>,
    pub recommendation: Option<String>,
    /// Counted labels keep every occurrence; a well-formed block has one each
    pub severity: Vec<String>,
    pub specialty: Vec<String>,
    pub notes: Option<String>,
    pub feedback: Vec<String>,
}

impl RecordBlock {
    /// Store one line; returns whether it carried a known label.
    fn apply_line(&mut self, line: &str) -> bool {
        let single: [(&str, &mut Option<String>); 6] = [
            (TIMESTAMP, &mut self.timestamp),
            (NAME, &mut self.name),
            (AGE, &mut self.age),
            (GENDER, &mut self.gender),
            (RECOMMENDATION, &mut self.recommendation),
            (NOTES, &mut self.notes),
        ];
        for (label, slot) in single {
            if let Some(value) = line.strip_prefix(label) {
                *slot = Some(value.trim().to_string());
                return true;
            }
        }
        let counted: [(&str, &mut Vec<String>); 3] = [
            (SEVERITY, &mut self.severity),
            (SPECIALTY, &mut self.specialty),
            (FEEDBACK, &mut self.feedback),
        ];
        for (label, values) in counted {
            if let Some(value) = line.strip_prefix(label) {
                values.push(value.trim().to_string());
                return true;
            }
        }
        if let Some(step) = line.strip_prefix(ANSWER_BULLET) {
            self.answers.push(step.trim().to_string());
            return true;
        }
        false
    }

    /// Timestamp of this block interpreted in `offset`, if present and well-formed.
    pub fn timestamp_in(&self, offset: FixedOffset) -> Option<DateTime<FixedOffset>> {
        let text = self.timestamp.as_deref()?;
        parse_timestamp(text, offset).ok().map(|(ts, _)| ts)
    }

    /// Strict conversion into a [`PatientRecord`].
    pub fn to_record(&self, offset: FixedOffset) -> Result<PatientRecord, DomainError> {
        fn required<'a>(field: &'a Option<String>, label: &str) -> Result<&'a str, DomainError> {
            field.as_deref().ok_or_else(|| DomainError::MalformedRecord {
                message: format!("missing {label}"),
            })
        }
        fn at_most_one<'a>(values: &'a [String], label: &str) -> Result<Option<&'a str>, DomainError> {
            match values {
                [] => Ok(None),
                [value] => Ok(Some(value.as_str())),
                _ => Err(DomainError::MalformedRecord {
                    message: format!("repeated {label}"),
                }),
            }
        }
        fn exactly_one<'a>(values: &'a [String], label: &str) -> Result<&'a str, DomainError> {
            at_most_one(values, label)?.ok_or_else(|| DomainError::MalformedRecord {
                message: format!("missing {label}"),
            })
        }

        let (timestamp, zone_label) = parse_timestamp(required(&self.timestamp, TIMESTAMP)?, offset)?;
        let age_text = required(&self.age, AGE)?;
        let age = age_text.parse().map_err(|_| DomainError::MalformedRecord {
            message: format!("bad age: {age_text:?}"),
        })?;
        let answers = self
            .answers
            .iter()
            .map(|line| {
                PathStep::parse(line).ok_or_else(|| DomainError::MalformedRecord {
                    message: format!("bad answer line: {line:?}"),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(PatientRecord {
            timestamp,
            zone_label,
            name: required(&self.name, NAME)?.to_string(),
            age,
            gender: required(&self.gender, GENDER)?.parse()?,
            answers,
            diagnosis: Diagnosis {
                message: required(&self.recommendation, RECOMMENDATION)?.to_string(),
                severity: exactly_one(&self.severity, SEVERITY)?.parse()?,
                specialty: exactly_one(&self.specialty, SPECIALTY)?.to_string(),
                notes: self.notes.clone().unwrap_or_default(),
            },
            feedback: at_most_one(&self.feedback, FEEDBACK)?
                .filter(|f| !f.is_empty())
                .map(String::from),
        })
    }
}

/// Split store contents into record blocks.
///
/// A block starts at [`RECORD_START`], or at a `Timestamp:` line when the
/// current block already has one, so a record whose start marker was lost
/// is still read as its own block. Labelled lines before the first block
/// open an implicit one; unlabelled lines there are ignored.
pub fn decode_blocks(content: &str) -> Vec<RecordBlock> {
    let mut blocks: Vec<RecordBlock> = Vec::new();
    for line in content.lines() {
        let line = line.trim();
        if line == RECORD_START {
            blocks.push(RecordBlock::default());
            continue;
        }
        let timestamp_taken = blocks.last().is_some_and(|b| b.timestamp.is_some());
        if line.starts_with(TIMESTAMP) && timestamp_taken {
            blocks.push(RecordBlock::default());
        }
        match blocks.last_mut() {
            Some(current) => {
                current.apply_line(line);
            }
            None => {
                let mut implicit = RecordBlock::default();
                if implicit.apply_line(line) {
                    blocks.push(implicit);
                }
            }
        }
    }
    blocks
}
