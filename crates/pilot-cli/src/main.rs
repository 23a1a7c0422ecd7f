//! `pilot`: guide the rocket to the star from the terminal.
//!
//! - `pilot run level1.pilot` animates a program on the board
//! - `pilot check level1.pilot` reports problems without running
//! - `pilot render` prints the starting board of a level

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pilot_cli::report::{format_diagnostic, format_outcome, format_step, summarize};
use pilot_cli::{load_config, logging};
use pilot_session::{install_panic_hook, render_grid, RunStatus, Session};
use pilot_types::{ParseMode, SourceFile};
use std::fs;
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Exit code for a run that finished without reaching the star.
const EXIT_NOT_WON: u8 = 2;

#[derive(Parser)]
#[command(
    name = "pilot",
    version,
    about = "Guide the rocket to the star with a tiny command language"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a program and animate it on the board.
    Run {
        /// Program source file.
        file: PathBuf,
        /// Level configuration (JSON). Defaults to the reference level.
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Pause between steps, overriding the level's setting.
        #[arg(long)]
        delay_ms: Option<u64>,
        /// Reject the program if any line is not understood.
        #[arg(long)]
        strict: bool,
        /// Print the outcome as JSON instead of animating.
        #[arg(long)]
        json: bool,
    },
    /// Report problems in a program without running it.
    Check {
        file: PathBuf,
        /// Report findings as errors.
        #[arg(long)]
        strict: bool,
    },
    /// Print the starting board of a level.
    Render {
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    logging::init();
    install_panic_hook();
    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    match cli.command {
        Command::Run {
            file,
            config,
            delay_ms,
            strict,
            json,
        } => cmd_run(&file, config.as_deref(), delay_ms, strict, json),
        Command::Check { file, strict } => cmd_check(&file, strict),
        Command::Render { config } => cmd_render(config.as_deref()),
    }
}

fn read_source(file: &Path) -> Result<String> {
    fs::read_to_string(file).with_context(|| format!("read {}", file.display()))
}

fn cmd_run(
    file: &Path,
    config: Option<&Path>,
    delay_ms: Option<u64>,
    strict: bool,
    json: bool,
) -> Result<ExitCode> {
    let mut config = load_config(config)?;
    if strict {
        config.parse_mode = ParseMode::Strict;
    }
    if let Some(ms) = delay_ms {
        config.step_delay_ms = ms;
    }
    let source = read_source(file)?;
    let session = Session::new(config).context("invalid level")?;

    if json {
        let outcome = session
            .run_program(&source)
            .context("a run is already in progress")?;
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(exit_code(outcome.won));
    }

    let mut handle = session
        .start(&source)
        .context("a run is already in progress")?;
    for d in handle.diagnostics().iter_sorted() {
        eprint!("{}", format_diagnostic(d));
    }
    println!("{}", render_grid(session.world(), &handle.agent()));
    handle.play(|step| {
        println!("{}", format_step(step));
        println!("{}", render_grid(session.world(), &step.snapshot));
        ControlFlow::Continue(())
    });

    let outcome = handle.finish();
    if matches!(outcome.status, RunStatus::SyntaxErrors | RunStatus::Fault) {
        for entry in &outcome.log {
            println!("{entry}");
        }
    }
    println!("{}", format_outcome(&outcome));
    Ok(exit_code(outcome.won))
}

fn cmd_check(file: &Path, strict: bool) -> Result<ExitCode> {
    let source = read_source(file)?;
    let mode = if strict {
        ParseMode::Strict
    } else {
        ParseMode::Permissive
    };
    let source_file = SourceFile::new(file.display().to_string(), source);
    let result = pilot_parser::parse(&source_file, mode);
    for d in result.diagnostics.iter_sorted() {
        eprint!("{}", format_diagnostic(d));
    }
    let commands = result.program.as_ref().map_or(0, |p| p.len());
    println!(
        "{}: {} command(s), {}",
        file.display(),
        commands,
        summarize(&result.diagnostics)
    );
    Ok(if result.diagnostics.has_errors() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

fn cmd_render(config: Option<&Path>) -> Result<ExitCode> {
    let config = load_config(config)?;
    let world = config.validate().context("invalid level")?;
    print!("{}", render_grid(&world, &world.start));
    Ok(ExitCode::SUCCESS)
}

fn exit_code(won: bool) -> ExitCode {
    if won {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(EXIT_NOT_WON)
    }
}
