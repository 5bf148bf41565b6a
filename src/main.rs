use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{ArgAction, Parser};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::{config::Config, shell::Session, storage::memory::MemoryStorage};

mod config;
mod models;
mod services;
mod shell;
mod storage;
mod ui;
mod views;

#[derive(Parser)]
#[command(
    name = "tasknote",
    about = "Tasks by project with priorities, due dates and sub-tasks, plus notes, in one session"
)]
struct Cli {
    /// Config file with startup preferences and projects
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// More log output on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Less log output on stderr
    #[arg(short, long, action = ArgAction::Count, conflicts_with = "verbose")]
    quiet: u8,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,
}

fn init_tracing(verbose: u8, quiet: u8) {
    let default_level = if quiet >= 1 {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("tasknote={}", default_level)));

    let init_result = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .try_init();

    if let Err(err) = init_result {
        debug!(error = %err, "tracing subscriber already set, continuing");
    }
}

fn main() {
    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.quiet);

    if cli.no_color || !std::io::stdout().is_terminal() {
        colored::control::set_override(false);
    }

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let storage = MemoryStorage::new(config.initial_store());

    let mut session = match Session::start(storage) {
        Ok(session) => session,
        Err(e) => {
            eprintln!("Error: Failed to start session: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = session.run(std::io::stdin().lock()) {
        eprintln!("Error: Failed to read input: {}", e);
        std::process::exit(1);
    }
}
