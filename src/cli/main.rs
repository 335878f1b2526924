//! Command-line interface entry point for `CityAid`

mod args;
mod commands;

use args::{Cli, Command};
use chrono::{Local, NaiveDateTime};
use clap::Parser;
use cityaid::config::Config;
use cityaid::core::store::Store;
use cityaid::core::tracker::Tracker;
use commands::contributions::{EditArgs, LogArgs};
use commands::CommandResult;
use logger::{
    enable_debug, enable_verbose, error, info, init_file_logging, set_level, warn, Level,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() {
    let args = Cli::parse();

    // Load configuration once at startup and apply CLI overrides to it
    let mut config = Config::load();
    let defaults = Config::from_defaults();
    config.apply_overrides(&args.to_config_overrides());

    let verbose = init_logging(&args, &config);

    let command = match args.command {
        Command::Config { subcommand } => {
            commands::config::run(subcommand, &mut config, &defaults);
            return;
        }
        other => other,
    };

    let now = Local::now().naive_local();
    if let Err(e) = run(command, &config, verbose, now) {
        error!("Command failed: {e}");
        eprintln!("✗ {e}");
        std::process::exit(1);
    }
}

/// Configure the logger from CLI flags and config; returns the effective verbose flag
fn init_logging(args: &Cli, config: &Config) -> bool {
    // CLI flag overrides config; otherwise use config logging.level; fallback warn
    let mut level = args
        .log_level
        .map(Into::into)
        .or_else(|| config.logging.level.parse::<Level>().ok())
        .unwrap_or(Level::Warn);

    if args.debug_flag || level == Level::Debug {
        level = Level::Debug;
        enable_debug();
    }

    let verbose = args.verbose || config.logging.verbose;
    if verbose {
        enable_verbose();
    }
    set_level(level);

    // CLI flag wins, otherwise use config logging.file if set
    let config_log_path: Option<std::path::PathBuf> = if config.logging.file.is_empty() {
        None
    } else {
        Some(std::path::PathBuf::from(&config.logging.file))
    };

    if let Some(log_path) = args.log_file.as_ref().or(config_log_path.as_ref()) {
        let display_path = log_path.to_string_lossy();
        if init_file_logging(log_path) {
            if verbose {
                eprintln!("✓ File logging initialized at: {display_path}");
            } else {
                info!("File logging initialized at: {display_path}");
            }
        } else {
            eprintln!("✗ Failed to initialize file logging at: {display_path}");
        }
    }
    verbose
}

/// Open the store, settle due resets, then dispatch a tracker command
fn run(command: Command, config: &Config, verbose: bool, now: NaiveDateTime) -> CommandResult {
    let store = Store::open(config.store_path())?;
    let mut tracker = Tracker::new(store, config.challenge_kinds(), StdRng::from_entropy());

    let reset = tracker.run_resets(now)?;
    if let Some(lost) = reset.streak_lost {
        warn!("Streak of {lost} day(s) lost");
        println!("💔 Your {lost}-day streak ended. Log a contribution today to start a new one.");
    }
    if verbose && reset.daily {
        println!("New daily challenge is ready");
    }
    if verbose && reset.weekly {
        println!("New weekly challenges are ready");
    }
    commands::contributions::print_rewards(&reset.rewards);

    match command {
        Command::Log {
            kind,
            title,
            date,
            notes,
            media,
        } => commands::contributions::log(
            &mut tracker,
            LogArgs {
                kind,
                title,
                date,
                notes,
                media,
            },
            now,
        ),
        Command::Quick { kind, title } => {
            commands::contributions::quick(&mut tracker, kind, title.as_deref(), now)
        }
        Command::List { kind, limit } => commands::contributions::list(&tracker, kind, limit),
        Command::Show { id } => commands::contributions::show(&tracker, &id),
        Command::Edit {
            id,
            title,
            kind,
            date,
            notes,
            media,
            clear_media,
        } => commands::contributions::edit(
            &mut tracker,
            &id,
            EditArgs {
                title,
                kind,
                date,
                notes,
                media,
                clear_media,
            },
            now,
        ),
        Command::Delete { id, yes } => commands::contributions::delete(&mut tracker, &id, yes),
        Command::Challenges { subcommand } => {
            commands::challenges::run(&mut tracker, subcommand, now)
        }
        Command::Milestones => commands::challenges::show_milestones(&tracker),
        Command::Profile { subcommand } => commands::profile::run(&mut tracker, subcommand),
        Command::Report { output, format } => {
            commands::report::run(&tracker, output.as_deref(), format, config, now)
        }
        // Handled before the store is opened
        Command::Config { .. } => Ok(()),
    }
}
