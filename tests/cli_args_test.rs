//! Integration tests for command line parsing.

use clap::Parser;
use rstest::rstest;

use mediassist::cli::args::{Cli, Commands, ConfigCommands};
use mediassist::domain::Answer;

#[test]
fn given_no_arguments_when_parsing_then_default_session() {
    let cli = Cli::try_parse_from(["mediassist"]).unwrap();

    assert!(cli.command.is_none());
    assert_eq!(cli.verbose, 0);
    assert!(cli.records.is_none());
}

#[test]
fn given_answers_list_when_parsing_then_split_on_commas() {
    let cli = Cli::try_parse_from([
        "mediassist",
        "diagnose",
        "--age",
        "29",
        "--answers",
        "yes,Y,no,n",
        "--no-summary",
    ])
    .unwrap();

    let Some(Commands::Diagnose(args)) = cli.command else {
        panic!("expected diagnose");
    };
    assert_eq!(
        args.answers,
        Some(vec![Answer::Yes, Answer::Yes, Answer::No, Answer::No])
    );
    assert_eq!(args.show_summary(), Some(false));
}

#[test]
fn given_unknown_answer_when_parsing_then_rejected() {
    let result = Cli::try_parse_from(["mediassist", "diagnose", "--answers", "yes,maybe"]);
    assert!(result.is_err());
}

#[test]
fn given_summary_and_no_summary_when_parsing_then_conflict() {
    let result = Cli::try_parse_from(["mediassist", "diagnose", "--summary", "--no-summary"]);
    assert!(result.is_err());
}

#[rstest]
#[case(&["mediassist", "-vv", "summary", "--week"], 2)]
#[case(&["mediassist", "summary", "-vvv"], 3)]
fn given_verbosity_flags_when_parsing_then_counted(#[case] argv: &[&str], #[case] level: u8) {
    let cli = Cli::try_parse_from(argv).unwrap();
    assert_eq!(cli.verbose, level);
    assert!(matches!(cli.command, Some(Commands::Summary { .. })));
}

#[test]
fn given_records_override_after_subcommand_when_parsing_then_global() {
    let cli = Cli::try_parse_from(["mediassist", "tree", "--records", "/tmp/r.txt"]).unwrap();
    assert_eq!(cli.records.unwrap().to_string_lossy(), "/tmp/r.txt");
}

#[test]
fn given_config_init_global_when_parsing_then_flag_set() {
    let cli = Cli::try_parse_from(["mediassist", "config", "init", "--global"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Config {
            command: ConfigCommands::Init { global: true }
        })
    ));
}
