//! mediassist: rule-based clinical triage advisor
//!
//! Layers, innermost first: `domain` (decision tree, record codec, summary),
//! `application` (services), `infrastructure` (I/O and wiring), `cli`.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
