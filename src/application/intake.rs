//! Patient intake prompts
//!
//! Invalid input is never an error here: every prompt repeats until it gets
//! a usable value. Only a closed input stream aborts the intake.

use crate::application::{ApplicationResult, IoResultExt};
use crate::domain::{parse_age, DomainError, Gender};
use crate::infrastructure::traits::{AnswerSource, LineReader};

pub const UNKNOWN_NAME: &str = "Unknown";
pub const AGE_NOT_NUMERIC: &str = "Please enter a numeric age (e.g., 29 or 0.5).";
pub const AGE_NOT_POSITIVE: &str = "please enter correct age";
pub const GENDER_INVALID: &str = "Invalid choice. Please enter a number between 1 and 4.";

/// Who the diagnosis is for.
#[derive(Debug, Clone, PartialEq)]
pub struct Intake {
    pub name: String,
    pub age: f64,
    pub gender: Gender,
}

/// Patient name; empty input becomes "Unknown".
pub fn prompt_name<R: LineReader + ?Sized>(reader: &R) -> ApplicationResult<String> {
    let name = reader
        .read_line("Enter patient's name: ")
        .input_context("patient name")?;
    Ok(normalize_name(&name))
}

pub fn normalize_name(name: &str) -> String {
    let name = name.trim();
    if name.is_empty() {
        UNKNOWN_NAME.to_string()
    } else {
        name.to_string()
    }
}

/// Age in years, re-prompting on non-numeric or non-positive input.
pub fn prompt_age<R: LineReader + ?Sized>(reader: &R) -> ApplicationResult<f64> {
    loop {
        let line = reader
            .read_line("Enter patient's age in years (e.g., 29 or 0.5): ")
            .input_context("patient age")?;
        match parse_age(&line) {
            Ok(age) => return Ok(age),
            Err(DomainError::NonPositiveAge(_)) => reader.notice(AGE_NOT_POSITIVE),
            Err(_) => reader.notice(AGE_NOT_NUMERIC),
        }
    }
}

/// Gender from the numbered menu; empty input means "Prefer not to say".
pub fn prompt_gender<R: LineReader + ?Sized>(reader: &R) -> ApplicationResult<Gender> {
    reader.notice("\nSelect Gender:");
    for (i, gender) in Gender::MENU.iter().enumerate() {
        reader.notice(&format!("{}. {}", i + 1, gender));
    }
    loop {
        let line = reader
            .read_line("Enter choice (1-4): ")
            .input_context("gender choice")?;
        match Gender::from_menu_choice(&line) {
            Ok(gender) => return Ok(gender),
            Err(_) => reader.notice(GENDER_INVALID),
        }
    }
}

/// Optional feedback, lower-cased; empty input means no feedback.
pub fn prompt_feedback<R: LineReader + ?Sized>(reader: &R) -> ApplicationResult<Option<String>> {
    let line = reader
        .read_line("\nWas this advice helpful? (yes/no) [optional]: ")
        .input_context("feedback")?;
    Ok(normalize_feedback(&line))
}

pub fn normalize_feedback(feedback: &str) -> Option<String> {
    let feedback = feedback.trim().to_lowercase();
    (!feedback.is_empty()).then_some(feedback)
}

/// Ask whether to show the summary after the session.
pub fn prompt_show_summary<R: LineReader + ?Sized>(reader: &R) -> ApplicationResult<bool> {
    let answer = reader
        .ask_yes_no("Would you like to view the weekly summary?")
        .input_context("summary choice")?;
    Ok(answer == crate::domain::Answer::Yes)
}
