//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueHint};

use crate::domain::Answer;

/// Rule-based clinical triage: yes/no symptom questions, a recommendation, and a patient log
#[derive(Parser, Debug)]
#[command(name = "mediassist")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Patient record store (overrides config)
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    pub records: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a diagnosis session (default)
    Diagnose(DiagnoseArgs),

    /// Summarize the record store
    Summary {
        /// Only the current ISO week
        #[arg(short, long)]
        week: bool,
    },

    /// Show the decision tree
    Tree,

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Diagnosis session inputs; anything not given is prompted for.
#[derive(Args, Debug, Default, Clone)]
pub struct DiagnoseArgs {
    /// Patient name
    #[arg(long)]
    pub name: Option<String>,

    /// Age in years (e.g. 29 or 0.5)
    #[arg(long)]
    pub age: Option<String>,

    /// Gender: label or menu number 1-4
    #[arg(long)]
    pub gender: Option<String>,

    /// Answers to the questions in order, e.g. yes,no,y
    #[arg(long, value_delimiter = ',', value_parser = parse_answer)]
    pub answers: Option<Vec<Answer>>,

    /// Feedback to store with the record
    #[arg(long)]
    pub feedback: Option<String>,

    /// Print the summary after the session
    #[arg(long, conflicts_with = "no_summary")]
    pub summary: bool,

    /// Skip the summary prompt
    #[arg(long = "no-summary")]
    pub no_summary: bool,
}

impl DiagnoseArgs {
    /// `Some` when the summary question is answered by a flag.
    pub fn show_summary(&self) -> Option<bool> {
        match (self.summary, self.no_summary) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}

fn parse_answer(s: &str) -> Result<Answer, String> {
    Answer::parse(s).ok_or_else(|| format!("expected yes/no/y/n, got '{s}'"))
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Create config template
    Init {
        /// Create global config
        #[arg(short, long)]
        global: bool,
    },

    /// Show config paths
    Path,

    /// Print config template
    Template,
}
