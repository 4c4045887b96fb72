//! Domain entities: core data structures

use std::fmt;
use std::str::FromStr;

use crate::domain::error::DomainError;

/// Specialty used when a leaf does not name one.
pub const DEFAULT_SPECIALTY: &str = "General Practitioner";

/// How urgently the patient needs care.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Severity {
    #[default]
    Low,
    Medium,
    High,
    Emergency,
}

impl Severity {
    pub const ALL: [Severity; 4] = [
        Severity::Low,
        Severity::Medium,
        Severity::High,
        Severity::Emergency,
    ];

    /// Label as written to patient records.
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Low => "Low",
            Severity::Medium => "Medium",
            Severity::High => "High",
            Severity::Emergency => "Emergency",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Severity {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Severity::ALL
            .into_iter()
            .find(|sev| sev.label() == s)
            .ok_or_else(|| DomainError::UnknownSeverity(s.to_string()))
    }
}

/// Outcome of a diagnosis: what to tell the patient and where to send them.
///
/// Leaves of the decision tree hold template instances. Callers only ever
/// receive copies made through [`Diagnosis::duplicate`].
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnosis {
    pub message: String,
    pub severity: Severity,
    pub specialty: String,
    /// Free text, empty when there is nothing to add
    pub notes: String,
}

impl Diagnosis {
    /// Low severity, general practitioner, no notes.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::default(),
            specialty: DEFAULT_SPECIALTY.to_string(),
            notes: String::new(),
        }
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn with_specialty(mut self, specialty: impl Into<String>) -> Self {
        self.specialty = specialty.into();
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    /// Independent copy of this diagnosis.
    ///
    /// The traversal engine calls this at the leaf boundary so that
    /// post-processing never reaches a tree template.
    pub fn duplicate(&self) -> Self {
        Self {
            message: self.message.clone(),
            severity: self.severity,
            specialty: self.specialty.clone(),
            notes: self.notes.clone(),
        }
    }

    /// Append a sentence to the notes, separated by `" | "` if notes exist.
    pub fn append_note(&mut self, note: &str) {
        if self.notes.is_empty() {
            self.notes = note.to_string();
        } else {
            self.notes.push_str(" | ");
            self.notes.push_str(note);
        }
    }

    pub fn is_emergency(&self) -> bool {
        self.severity == Severity::Emergency
    }
}

/// A yes/no reply to a tree question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Answer {
    Yes,
    No,
}

impl Answer {
    /// Normalize free-form input: `yes`, `y`, `no`, `n` in any case.
    pub fn parse(input: &str) -> Option<Answer> {
        match input.trim().to_lowercase().as_str() {
            "yes" | "y" => Some(Answer::Yes),
            "no" | "n" => Some(Answer::No),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Answer::Yes => "yes",
            Answer::No => "no",
        }
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Answer {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Answer::parse(s).ok_or_else(|| DomainError::InvalidAnswer(s.to_string()))
    }
}

/// One question asked during a traversal and the answer given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathStep {
    pub question: String,
    pub answer: Answer,
}

impl PathStep {
    pub fn new(question: impl Into<String>, answer: Answer) -> Self {
        Self {
            question: question.into(),
            answer,
        }
    }

    /// Parse the `"<question> -> <answer>"` form. Splits on the last arrow.
    pub fn parse(line: &str) -> Option<PathStep> {
        let (question, answer) = line.rsplit_once(" -> ")?;
        Some(PathStep::new(question.trim(), Answer::parse(answer)?))
    }
}

impl fmt::Display for PathStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.question, self.answer)
    }
}

/// Patient gender as chosen from the intake menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Gender {
    Male,
    Female,
    Other,
    #[default]
    PreferNotToSay,
}

impl Gender {
    /// Menu entries in display order; position + 1 is the menu number.
    pub const MENU: [Gender; 4] = [
        Gender::Male,
        Gender::Female,
        Gender::Other,
        Gender::PreferNotToSay,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
            Gender::PreferNotToSay => "Prefer not to say",
        }
    }

    /// Map a menu choice to a gender.
    ///
    /// Empty input selects "Prefer not to say"; any other input outside
    /// `1..=4` is rejected so the caller can re-prompt.
    pub fn from_menu_choice(input: &str) -> Result<Gender, DomainError> {
        match input.trim() {
            "" | "4" => Ok(Gender::PreferNotToSay),
            "1" => Ok(Gender::Male),
            "2" => Ok(Gender::Female),
            "3" => Ok(Gender::Other),
            other => Err(DomainError::InvalidGenderChoice(other.to_string())),
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Gender {
    type Err = DomainError;

    /// Accepts either a record label (`Female`) or a menu number (`2`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Gender::MENU
            .into_iter()
            .find(|g| g.label().eq_ignore_ascii_case(s))
            .map(Ok)
            .unwrap_or_else(|| Gender::from_menu_choice(s))
    }
}

/// Parse a patient age in years. Fractions are allowed (`0.5` for six months).
pub fn parse_age(input: &str) -> Result<f64, DomainError> {
    let trimmed = input.trim();
    let age: f64 = trimmed
        .parse()
        .map_err(|_| DomainError::InvalidAge(trimmed.to_string()))?;
    if !age.is_finite() {
        return Err(DomainError::InvalidAge(trimmed.to_string()));
    }
    if age <= 0.0 {
        return Err(DomainError::NonPositiveAge(age));
    }
    Ok(age)
}

/// Feedback tokens that count as "the advice was helpful".
pub const AFFIRMATIVE_FEEDBACK: [&str; 4] = ["yes", "y", "true", "1"];

/// Whether raw feedback text marks the advice as helpful.
pub fn is_affirmative(feedback: &str) -> bool {
    let normalized = feedback.trim().to_lowercase();
    AFFIRMATIVE_FEEDBACK.contains(&normalized.as_str())
}
