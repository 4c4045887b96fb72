//! Command dispatch: one function per subcommand

use std::io;
use std::path::PathBuf;

use chrono::{DateTime, Datelike, FixedOffset};
use clap::CommandFactory;
use tracing::{debug, instrument};

use crate::application::intake::{
    normalize_feedback, normalize_name, prompt_age, prompt_feedback, prompt_gender, prompt_name,
    prompt_show_summary,
};
use crate::application::Intake;
use crate::cli::args::{Cli, Commands, ConfigCommands, DiagnoseArgs};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_dir, global_config_path, local_config_path, Settings};
use crate::domain::{parse_age, Gender, SummaryScope};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::traits::ScriptedReader;
use crate::infrastructure::InfraError;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        None => _diagnose(cli, &DiagnoseArgs::default()),
        Some(Commands::Diagnose(args)) => _diagnose(cli, args),
        Some(Commands::Summary { week }) => _summary(cli, *week),
        Some(Commands::Tree) => _tree(cli),
        Some(Commands::Config { command }) => _config(cli, command),
        Some(Commands::Completion { shell }) => _completion(*shell),
    }
}

fn current_dir() -> CliResult<PathBuf> {
    std::env::current_dir().map_err(|e| InfraError::io("get current directory", e).into())
}

/// Settings from config files and env, with `--records` applied last.
fn load_settings(cli: &Cli) -> CliResult<Settings> {
    let mut settings = Settings::load(Some(&current_dir()?))?;
    if let Some(records) = &cli.records {
        settings.records_file = records.clone();
    }
    debug!("settings: {:?}", settings);
    Ok(settings)
}

fn container(cli: &Cli) -> CliResult<ServiceContainer> {
    Ok(ServiceContainer::new(load_settings(cli)?)?)
}

fn now_in_zone(container: &ServiceContainer) -> CliResult<DateTime<FixedOffset>> {
    let offset = container.settings.clock.offset()?;
    Ok(container.clock.now_utc().with_timezone(&offset))
}

#[instrument(skip_all)]
fn _diagnose(cli: &Cli, args: &DiagnoseArgs) -> CliResult<()> {
    let container = container(cli)?;
    run_session(&container, args)
}

/// Run one patient session against the container's services.
///
/// With `--answers` the session is non-interactive: nothing is read from
/// the console, so `--age` becomes mandatory and the other inputs fall back
/// to their defaults.
pub fn run_session(container: &ServiceContainer, args: &DiagnoseArgs) -> CliResult<()> {
    let reader = container.reader.as_ref();
    let scripted = args.answers.as_ref().map(|answers| {
        ScriptedReader::new(answers.iter().map(|a| a.as_str()))
    });
    let interactive = scripted.is_none();

    output::header("\n--- MediAssist: Clinical Expert System ---");

    let name = match &args.name {
        Some(name) => normalize_name(name),
        None if interactive => prompt_name(reader)?,
        None => normalize_name(""),
    };
    let age = match &args.age {
        Some(age) => parse_age(age).map_err(|e| CliError::InvalidArgs(e.to_string()))?,
        None if interactive => prompt_age(reader)?,
        None => {
            return Err(CliError::Usage(
                "--age is required when --answers is given".into(),
            ))
        }
    };
    let gender = match &args.gender {
        Some(gender) => gender
            .parse::<Gender>()
            .map_err(|e| CliError::InvalidArgs(e.to_string()))?,
        None if interactive => prompt_gender(reader)?,
        None => Gender::default(),
    };
    let intake = Intake { name, age, gender };

    reader.notice("\nPlease answer the following yes/no questions carefully.\n");
    let traversal = match &scripted {
        Some(answers) => {
            let traversal = container.session.assess(&intake, answers)?;
            for step in &traversal.path {
                output::info(step);
            }
            if answers.remaining() > 0 {
                output::warning(&format!("{} answer(s) not used", answers.remaining()));
            }
            traversal
        }
        None => container.session.assess(&intake, reader)?,
    };
    if traversal.outcome.is_degraded() {
        output::warning(&format!("traversal ended early: {:?}", traversal.outcome));
    }

    output::diagnosis(&traversal.diagnosis);

    let feedback = match &args.feedback {
        Some(feedback) => normalize_feedback(feedback),
        None if interactive => prompt_feedback(reader)?,
        None => None,
    };
    container.session.record(&intake, &traversal, feedback)?;
    output::success(&format!(
        "Patient record saved to '{}'.",
        container.settings.records_file.display()
    ));

    let show_summary = match args.show_summary() {
        Some(show) => show,
        None if interactive => prompt_show_summary(reader)?,
        None => false,
    };
    if show_summary {
        let now = now_in_zone(container)?;
        print_summary(container, container.settings.summary_scope(&now), &now)?;
    }

    output::info("\n--- End of Diagnosis ---\n");
    Ok(())
}

fn print_summary(
    container: &ServiceContainer,
    scope: SummaryScope,
    now: &DateTime<FixedOffset>,
) -> CliResult<()> {
    match container.records.summary(scope)? {
        None => output::info("\nNo patient records found for this week yet."),
        Some(stats) => {
            let (year, week) = match scope {
                SummaryScope::IsoWeek { year, week } => (year, week),
                SummaryScope::AllTime => (now.iso_week().year(), now.iso_week().week()),
            };
            output::summary(year, week, &stats);
        }
    }
    Ok(())
}

#[instrument(skip(cli))]
fn _summary(cli: &Cli, week: bool) -> CliResult<()> {
    let container = container(cli)?;
    let now = now_in_zone(&container)?;
    let scope = if week {
        SummaryScope::week_of(&now)
    } else {
        container.settings.summary_scope(&now)
    };
    debug!("summary scope: {:?}", scope);
    print_summary(&container, scope, &now)
}

#[instrument(skip_all)]
fn _tree(cli: &Cli) -> CliResult<()> {
    let container = container(cli)?;
    let tree = container.diagnosis.tree();

    output::info(&tree.to_termtree(tree.root()));
    output::info(&format!(
        "{} reachable nodes, {} outcomes, depth {}",
        tree.iter().count(),
        tree.leaves().len(),
        tree.depth()
    ));

    let gaps = tree.gaps();
    if !gaps.is_empty() {
        output::warning(&format!("{} question(s) with a missing branch", gaps.len()));
    }
    let unreachable = tree.unreachable();
    if !unreachable.is_empty() {
        debug!("{} node(s) not reachable from the root", unreachable.len());
    }
    Ok(())
}

#[instrument(skip(cli))]
fn _config(cli: &Cli, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = load_settings(cli)?;
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Path => {
            let local = local_config_path(&current_dir()?);
            match global_config_path() {
                Some(global) => output::info(&format!(
                    "global: {}{}",
                    global.display(),
                    exists_marker(&global)
                )),
                None => output::info("global: <no config directory>"),
            }
            output::info(&format!("local:  {}{}", local.display(), exists_marker(&local)));
        }
        ConfigCommands::Init { global } => {
            let path = if *global {
                let dir = global_config_dir()
                    .ok_or_else(|| CliError::Usage("cannot determine config directory".into()))?;
                std::fs::create_dir_all(&dir).map_err(|e| {
                    InfraError::io(format!("create {}", dir.display()), e)
                })?;
                dir.join("mediassist.toml")
            } else {
                local_config_path(&current_dir()?)
            };
            if path.exists() {
                return Err(CliError::Usage(format!(
                    "config already exists: {}",
                    path.display()
                )));
            }
            std::fs::write(&path, Settings::template())
                .map_err(|e| InfraError::io(format!("write {}", path.display()), e))?;
            output::action("Created", &path.display());
        }
        ConfigCommands::Template => output::info(&Settings::template()),
    }
    Ok(())
}

fn exists_marker(path: &std::path::Path) -> &'static str {
    if path.exists() {
        ""
    } else {
        " (not found)"
    }
}

fn _completion(shell: clap_complete::Shell) -> CliResult<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    clap_complete::generate(shell, &mut cmd, name, &mut io::stdout());
    Ok(())
}
