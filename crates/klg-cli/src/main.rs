use std::io::{IsTerminal, Read};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use klg_cli::bookmarks::BookmarksCollection;
use klg_cli::commands::{bookmarks, open_range, report, total, util};
use klg_cli::{AppError, BookmarksAction, Cli, Commands, Config, InputArgs};
use klg_core::Record;

/// Reads stdin unless it is a terminal.
fn piped_stdin() -> Result<Option<String>> {
    let mut stdin = std::io::stdin();
    if stdin.is_terminal() {
        return Ok(None);
    }
    let mut text = String::new();
    stdin
        .read_to_string(&mut text)
        .context("failed to read stdin")?;
    Ok(Some(text))
}

/// Resolves the input sources and loads their records, sorted by date.
fn load_input(input: &InputArgs, config: &Config) -> Result<Vec<Record>> {
    let bookmarks = BookmarksCollection::load_from(&config.bookmarks_path())?;
    let stdin = if input.files.is_empty() {
        piped_stdin()?
    } else {
        None
    };
    let input = util::resolve_input(&input.files, stdin, &bookmarks)?;
    tracing::debug!(?input, "resolved input");
    util::load_records(&input)
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::from(AppError::exit_code_of(&err))
        }
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // try_init: tests may run the binary with tracing already set up
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let config = Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    let mut stdout = std::io::stdout().lock();

    match &cli.command {
        Some(Commands::Total { input, diff }) => {
            let records = load_input(input, &config)?;
            total::run(&mut stdout, &records, *diff)?;
        }
        Some(Commands::Report {
            input,
            aggregate,
            diff,
            json,
        }) => {
            let records = load_input(input, &config)?;
            let kind = aggregate.unwrap_or(config.default_aggregate);
            report::run(&mut stdout, &records, kind, *diff, *json)?;
        }
        Some(Commands::Start {
            file,
            time,
            summary,
            date,
        }) => {
            let bookmarks = BookmarksCollection::load_from(&config.bookmarks_path())?;
            let path = util::resolve_target(file.as_deref(), &bookmarks)?;
            let (today, now) = util::now();
            open_range::start(
                &mut stdout,
                &path,
                date.unwrap_or(today),
                time.unwrap_or(now),
                summary.as_deref().unwrap_or_default(),
            )?;
        }
        Some(Commands::Stop { file, time, date }) => {
            let bookmarks = BookmarksCollection::load_from(&config.bookmarks_path())?;
            let path = util::resolve_target(file.as_deref(), &bookmarks)?;
            let (today, now) = util::now();
            open_range::stop(&mut stdout, &path, date.unwrap_or(today), time.unwrap_or(now))?;
        }
        Some(Commands::Bookmarks(action)) => match action {
            BookmarksAction::List => bookmarks::list(&mut stdout, &config)?,
            BookmarksAction::Set { file, alias } => {
                bookmarks::set(&mut stdout, &config, file, alias.as_deref())?;
            }
            BookmarksAction::Unset { alias } => {
                bookmarks::unset(&mut stdout, &config, alias.as_deref())?;
            }
            BookmarksAction::Rename { old, new } => {
                bookmarks::rename(&mut stdout, &config, old, new)?;
            }
        },
        None => {
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}
