//! Command dispatch

use std::io::{self, BufRead, Write};
use std::path::Path;

use clap::CommandFactory;
use tracing::{debug, instrument};

use crate::application::services::{BudgetService, EditOutcome};
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::output;
use crate::cli::render::{format_amount, render_table, render_tree, RenderOptions};
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::EditMode;
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::{InfraError, InfraResult};

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let cwd = std::env::current_dir().ok();
    let settings = Settings::load(cwd.as_deref())?;
    if !settings.color {
        colored::control::set_override(false);
    }
    let container = ServiceContainer::new(settings);
    let file = cli.file.as_deref();

    match &cli.command {
        None | Some(Commands::Show) => cmd_show(&container, file),
        Some(Commands::Tree) => cmd_tree(&container, file),
        Some(Commands::Pct { id, input }) => cmd_edit(&container, file, id, EditMode::Percent, input),
        Some(Commands::Val { id, input }) => cmd_edit(&container, file, id, EditMode::Value, input),
        Some(Commands::Session) => cmd_session(&container, file),
        Some(Commands::Config { command }) => cmd_config(&container, command, cwd.as_deref()),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            clap_complete::generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
    }
}

#[instrument(skip(container))]
fn cmd_show(container: &ServiceContainer, file: Option<&Path>) -> CliResult<()> {
    let service = container.budget_service(file)?;
    let opts = RenderOptions::from(container.settings.as_ref());
    output::info(&render_table(&service.view(), &opts));
    Ok(())
}

#[instrument(skip(container))]
fn cmd_tree(container: &ServiceContainer, file: Option<&Path>) -> CliResult<()> {
    let service = container.budget_service(file)?;
    output::info(&render_tree(&service.view(), container.settings.precision));
    Ok(())
}

#[instrument(skip(container))]
fn cmd_edit(
    container: &ServiceContainer,
    file: Option<&Path>,
    id: &str,
    mode: EditMode,
    input: &str,
) -> CliResult<()> {
    let mut service = container.budget_service(file)?;
    let opts = RenderOptions::from(container.settings.as_ref());
    run_edit(&mut service, &opts, id, mode, input, io::stdout().lock())?;
    Ok(())
}

/// Apply one edit and write the resulting table to `out`.
///
/// Neither an unknown id nor unparsable input is an error: both leave the
/// tree unchanged and only warn.
pub fn run_edit<W: Write>(
    service: &mut BudgetService,
    opts: &RenderOptions,
    id: &str,
    mode: EditMode,
    input: &str,
    mut out: W,
) -> InfraResult<EditOutcome> {
    let known = service.snapshot().find(id).is_some();
    let outcome = service.apply_raw(id, mode, input);
    match outcome {
        EditOutcome::Applied if known => debug!("{mode} {id} applied"),
        EditOutcome::Applied => output::warning(&format!("no line item with id '{id}', nothing changed")),
        EditOutcome::InvalidInput => {
            output::warning(&format!("'{input}' is not a number, nothing changed"))
        }
    }
    writeln!(out, "{}", render_table(&service.view(), opts))
        .map_err(|e| InfraError::io("write edit output", e))?;
    Ok(outcome)
}

fn cmd_session(container: &ServiceContainer, file: Option<&Path>) -> CliResult<()> {
    let mut service = container.budget_service(file)?;
    let opts = RenderOptions::from(container.settings.as_ref());
    let stdin = io::stdin();
    let stdout = io::stdout();
    run_session(&mut service, &opts, stdin.lock(), stdout.lock())?;
    Ok(())
}

fn cmd_config(
    container: &ServiceContainer,
    command: &ConfigCommands,
    cwd: Option<&Path>,
) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            output::info(&container.settings.to_toml()?);
        }
        ConfigCommands::Path => {
            match global_config_path() {
                Some(path) => output::info(&format!("global: {}", path.display())),
                None => output::info("global: <unavailable>"),
            }
            if let Some(dir) = cwd {
                output::info(&format!("local:  {}", local_config_path(dir).display()));
            }
        }
        ConfigCommands::Init { global, force } => {
            let path = if *global {
                global_config_path().ok_or_else(|| {
                    CliError::Usage("cannot determine global config directory".to_string())
                })?
            } else {
                let dir = cwd.ok_or_else(|| {
                    CliError::Usage("cannot determine working directory".to_string())
                })?;
                local_config_path(dir)
            };
            if container.fs.exists(&path) && !force {
                return Err(CliError::Usage(format!(
                    "{} already exists (use --force to overwrite)",
                    path.display()
                )));
            }
            container
                .fs
                .ensure_parent(&path)
                .map_err(|e| InfraError::io(format!("create {}", path.display()), e))?;
            container
                .fs
                .write(&path, &Settings::template())
                .map_err(|e| InfraError::io(format!("write {}", path.display()), e))?;
            output::success(&format!("created {}", path.display()));
        }
    }
    Ok(())
}

const SESSION_HELP: &str = "\
commands:
  set <id> <text>   type <text> into the input of <id>
  pct <id> [text]   apply the input of <id> as a percentage
  val <id> [text]   apply the input of <id> as an absolute value
  show              show the table
  tree              show the tree
  total             show the grand total
  help              show this help
  quit              leave the session";

/// Line-oriented editor loop over `input`, writing views to `out`.
///
/// Runs until `quit` or end of input.
pub fn run_session<R: BufRead, W: Write>(
    service: &mut BudgetService,
    opts: &RenderOptions,
    input: R,
    mut out: W,
) -> InfraResult<()> {
    let io_err = |e: io::Error| InfraError::io("write session output", e);

    writeln!(out, "{}", render_table(&service.view(), opts)).map_err(io_err)?;
    for line in input.lines() {
        let line = line.map_err(|e| InfraError::io("read session input", e))?;
        let mut parts = line.trim().splitn(3, char::is_whitespace);
        let command = parts.next().unwrap_or_default();
        let id = parts.next().map(str::trim);
        let text = parts.next().map(str::trim);
        debug!("session: {command} {id:?} {text:?}");

        match (command, id) {
            ("", _) => continue,
            ("quit" | "exit", _) => break,
            ("help", _) => writeln!(out, "{SESSION_HELP}").map_err(io_err)?,
            ("show", _) => writeln!(out, "{}", render_table(&service.view(), opts)).map_err(io_err)?,
            ("tree", _) => writeln!(out, "{}", render_tree(&service.view(), opts.precision)).map_err(io_err)?,
            ("total", _) => writeln!(
                out,
                "Grand Total: {}",
                format_amount(service.grand_total(), opts.precision)
            )
            .map_err(io_err)?,
            ("set" | "pct" | "val", Some(id)) if service.snapshot().find(id).is_none() => {
                writeln!(out, "unknown line item: {id}").map_err(io_err)?
            }
            ("set", Some(id)) => {
                service.set_input(id, text.unwrap_or_default());
            }
            (mode @ ("pct" | "val"), Some(id)) => {
                let mode = match mode {
                    "pct" => EditMode::Percent,
                    _ => EditMode::Value,
                };
                if let Some(text) = text {
                    service.set_input(id, text);
                }
                match service.apply(id, mode) {
                    EditOutcome::Applied => {
                        writeln!(out, "{}", render_table(&service.view(), opts)).map_err(io_err)?
                    }
                    EditOutcome::InvalidInput => writeln!(
                        out,
                        "invalid input for {id}: {:?}",
                        service.pending_input(id).unwrap_or_default()
                    )
                    .map_err(io_err)?,
                }
            }
            ("set" | "pct" | "val", None) => {
                writeln!(out, "usage: {command} <id> [text]").map_err(io_err)?
            }
            (other, _) => writeln!(out, "unknown command: {other} (try 'help')").map_err(io_err)?,
        }
    }
    Ok(())
}
