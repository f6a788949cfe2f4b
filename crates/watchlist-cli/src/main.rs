use clap::{ArgAction, Args, Parser, Subcommand};
use color_eyre::eyre::eyre;
use commands::{clear, config, entries, list, Session};
use std::path::PathBuf;
use watchlist_config::{Config, PathManager};
use watchlist_models::Category;

mod commands;
mod logging;
mod output;

#[derive(Parser)]
#[command(name = "watchlist")]
#[command(about = "Keep a personal watchlist of movies and TV shows")]
#[command(version)]
struct Cli {
    /// Enable verbose output (-v for debug, -vv for trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    /// Path to config.toml (defaults to the platform config directory)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Title details supplied by whatever page shows the title
#[derive(Args)]
pub struct TitleArgs {
    /// Title identifier (unique together with --category)
    pub id: u64,

    /// movie or tv
    #[arg(long, short = 'c')]
    pub category: Category,

    /// Display name
    #[arg(long, short = 't')]
    pub title: String,

    /// Poster path used to build the image URL
    #[arg(long, default_value = "")]
    pub poster: String,

    /// Rating shown on the card
    #[arg(long, default_value_t = 0.0, value_parser = parse_vote)]
    pub vote: f64,
}

fn parse_vote(s: &str) -> Result<f64, String> {
    let vote: f64 = s.parse().map_err(|e| format!("{}", e))?;
    if !vote.is_finite() {
        return Err(format!("'{}' is not a finite number", s));
    }
    Ok(vote)
}

#[derive(Subcommand)]
enum Commands {
    /// Add a title to the watchlist (no-op if already present)
    Add(TitleArgs),
    /// Remove a title from the watchlist
    #[command(long_about = "Remove a title from the watchlist.\n\n\
        The title can be given as an id with --category, or as category/id \
        (e.g. movie/603). Removing a title that is not on the watchlist does nothing.")]
    Remove {
        /// Title id, or category/id
        target: String,

        /// movie or tv (required when TARGET is a bare id)
        #[arg(long, short = 'c')]
        category: Option<Category>,
    },
    /// Add the title if absent, remove it if present
    Toggle(TitleArgs),
    /// Show the watchlist grouped by category
    List {
        /// Only show one category
        #[arg(long, short = 'c')]
        category: Option<Category>,
    },
    /// Check whether a title is on the watchlist (exit status 1 if not)
    Check {
        /// Title id, or category/id
        target: String,

        #[arg(long, short = 'c')]
        category: Option<Category>,
    },
    /// Print the number of entries
    Count,
    /// Delete every entry
    Clear {
        /// Skip the confirmation prompt
        #[arg(long, short = 'y', action = ArgAction::SetTrue)]
        yes: bool,
    },
    /// Show or create the configuration
    Config {
        #[command(subcommand)]
        cmd: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the effective configuration and paths
    Show,
    /// Write a config file with default settings
    Init {
        /// Overwrite an existing config file
        #[arg(long, action = ArgAction::SetTrue)]
        force: bool,
    },
    /// Print the config file path
    Path,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    let paths = PathManager::default();
    let config_file = cli.config.clone().unwrap_or_else(|| paths.config_file());
    let app_config = Config::load_or_default(&config_file)
        .map_err(|e| eyre!("Failed to load config from {}: {}", config_file.display(), e))?;

    logging::init_logging(cli.verbose, cli.quiet, &app_config.logging)
        .map_err(|e| eyre!("{}", e))?;

    let output = output::Output::new(cli.output, cli.quiet);

    // Config commands must work even when the config on disk is invalid
    let command = match cli.command {
        Commands::Config { cmd } => {
            return config::run_config(cmd, &app_config, &config_file, &paths, &output);
        }
        other => other,
    };

    app_config
        .validate()
        .map_err(|e| eyre!("Invalid config {}: {}", config_file.display(), e))?;

    // The one store instance for this run; handlers borrow it
    let mut session = Session::open(&app_config, &paths)?;

    match command {
        Commands::Add(args) => entries::run_add(&mut session, args, &output),
        Commands::Remove { target, category } => {
            entries::run_remove(&mut session, &target, category, &output)
        }
        Commands::Toggle(args) => entries::run_toggle(&mut session, args, &output),
        Commands::List { category } => list::run_list(&session, category, &output),
        Commands::Check { target, category } => {
            let present = entries::run_check(&session, &target, category, &output)?;
            if !present {
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Count => entries::run_count(&session, &output),
        Commands::Clear { yes } => clear::run_clear(&mut session, yes, &output),
        Commands::Config { .. } => Ok(()),
    }
}
