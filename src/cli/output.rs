//! Terminal output formatting with colors
//!
//! Respects NO_COLOR, CLICOLOR, CLICOLOR_FORCE automatically.

use std::collections::BTreeMap;

use colored::{ColoredString, Colorize};
use itertools::Itertools;

use crate::domain::{Diagnosis, Severity, SummaryStats};

/// Print error (red bold "error:" prefix) to stderr
pub fn error(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

/// Print warning (yellow "Warning:" prefix) to stderr
pub fn warning(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "Warning".yellow(), msg);
}

/// Print success status (green checkmark)
pub fn success(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{} {}", "✓".green(), msg);
}

/// Print completed action (green label)
pub fn action(label: &str, msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}: {}", label.green(), msg);
}

/// Print section header (cyan bold)
pub fn header(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg.to_string().cyan().bold());
}

/// Print plain output (no color, for data)
pub fn info(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg);
}

fn severity_colored(severity: Severity) -> ColoredString {
    let label = severity.label();
    match severity {
        Severity::Low => label.green(),
        Severity::Medium => label.yellow(),
        Severity::High => label.red(),
        Severity::Emergency => label.red().bold().reversed(),
    }
}

/// Print the diagnosis block shown at the end of a session.
pub fn diagnosis(result: &Diagnosis) {
    header("\n--- Diagnosis Result ---");
    println!("Severity: {}", severity_colored(result.severity));
    println!("Recommendation: {}", result.message);
    println!("Specialty: {}", result.specialty);
    if !result.notes.is_empty() {
        println!("Notes: {}", result.notes);
    }
}

/// `label=count` pairs, most frequent first, ties by label.
pub fn format_counts(counts: &BTreeMap<String, usize>) -> String {
    if counts.is_empty() {
        return "none".to_string();
    }
    counts
        .iter()
        .sorted_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)))
        .map(|(label, n)| format!("{label}={n}"))
        .join(", ")
}

/// Feedback line of the summary.
pub fn format_feedback(stats: &SummaryStats) -> String {
    if stats.feedback_total == 0 {
        "Feedback: No feedback entries this week.".to_string()
    } else {
        format!(
            "Feedback: {}/{} marked helpful.",
            stats.helpful_count, stats.feedback_total
        )
    }
}

/// Print a record summary under the weekly header.
pub fn summary(year: i32, week: u32, stats: &SummaryStats) {
    header(&format!("\n--- Weekly Summary (Week {week}, {year}) ---"));
    println!("Total Cases Logged: {}", stats.total_cases);
    println!("By Severity: {}", format_counts(&stats.by_severity));
    println!("By Specialty: {}", format_counts(&stats.by_specialty));
    println!("{}", format_feedback(stats));
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_counts_when_formatting_then_most_frequent_first() {
        let counts = BTreeMap::from([
            ("High".to_string(), 1),
            ("Medium".to_string(), 2),
            ("Emergency".to_string(), 1),
        ]);
        assert_eq!(format_counts(&counts), "Medium=2, Emergency=1, High=1");
        assert_eq!(format_counts(&BTreeMap::new()), "none");
    }

    #[test]
    fn test_format_feedback() {
        let mut stats = SummaryStats::default();
        assert_eq!(format_feedback(&stats), "Feedback: No feedback entries this week.");

        stats.helpful_count = 2;
        stats.feedback_total = 3;
        assert_eq!(format_feedback(&stats), "Feedback: 2/3 marked helpful.");
    }
}
