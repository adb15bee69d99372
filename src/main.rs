// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! Dexplorer CLI - browse creatures, their evolutions and items from PokeAPI

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use dexplorer::app::{App, Output};
use dexplorer::config;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::filter::Count;

#[derive(Parser)]
#[command(name = "dexplorer")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long)]
    quiet: bool,

    /// Configuration file path
    #[arg(short, long, env = "DEXPLORER_CONFIG")]
    config: Option<std::path::PathBuf>,

    /// Data directory override
    #[arg(long, env = "DEXPLORER_DATA_DIR")]
    data_dir: Option<std::path::PathBuf>,

    /// Disable colored output
    #[arg(long, env = "NO_COLOR")]
    no_color: bool,

    /// Output in JSON format
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse one page of creatures
    Browse {
        /// Zero-based page number
        #[arg(default_value_t = 0)]
        page: u32,
    },

    /// Look up a single creature by name or id
    Search {
        /// Name or id
        term: String,

        /// Only match creatures of this type
        #[arg(long = "type")]
        kind: Option<String>,

        /// Only match creatures from this generation
        #[arg(long = "gen")]
        generation: Option<String>,
    },

    /// List creatures by type and/or generation
    Filter {
        /// Type name (e.g. fire)
        #[arg(long = "type")]
        kind: Option<String>,

        /// Generation name (e.g. generation-i)
        #[arg(long = "gen")]
        generation: Option<String>,

        /// How many to show: a number or "all"
        #[arg(long, default_value = "24")]
        count: Count,
    },

    /// Show a creature with its stats and evolutions
    Show {
        /// Name, id or detail URL
        reference: String,
    },

    /// Evolution paths of one creature, or of every chain in a listing
    Evolutions {
        /// Name, id or detail URL (omit for the chain catalog)
        reference: Option<String>,

        /// Catalog: only chains of creatures of this type
        #[arg(long = "type")]
        kind: Option<String>,

        /// Catalog: only chains of creatures from this generation
        #[arg(long = "gen")]
        generation: Option<String>,

        /// Catalog: how many creatures to look at
        #[arg(long)]
        count: Option<u32>,
    },

    /// Browse one page of items
    Items {
        /// Zero-based page number
        #[arg(default_value_t = 0)]
        page: u32,
    },

    /// Show a single item
    Item {
        /// Name or id
        term: String,
    },

    /// Manage favorite creatures
    Favorites {
        /// Action: list, add, remove, toggle
        #[arg(default_value = "list")]
        action: String,

        /// Creature ids
        ids: Vec<u32>,
    },

    /// Compare up to six creatures side by side
    Compare {
        /// Creature ids
        ids: Vec<u32>,
    },

    /// Format a raw evolution condition (JSON object)
    Condition {
        /// Condition JSON, e.g. '{"min_level":16}'
        json: String,
    },

    /// List available types and generations
    Filters,

    /// Restore a location such as '?type=fire&tab=evolutions#/pokemon/4'
    Open {
        /// Location string
        location: String,
    },

    /// Inspect or clear the persisted record cache
    Cache {
        /// Action: stats, clear, path
        #[arg(default_value = "stats")]
        action: String,
    },

    /// Get or set configuration
    Config {
        /// Configuration key (dotted, e.g. concurrency.page)
        key: String,

        /// Value to set (omit to get)
        value: Option<String>,
    },

    /// Generate shell completions
    Completions {
        /// Shell type (bash, zsh, fish, powershell)
        shell: clap_complete::Shell,
    },
}

fn init_logging(verbose: u8, quiet: bool, configured: tracing::Level) {
    let log_level = match verbose {
        0 if quiet => tracing::Level::ERROR,
        0 => configured,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    let builder = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false);

    match EnvFilter::try_from_default_env() {
        Ok(filter) => builder.with_env_filter(filter).init(),
        Err(_) => builder.with_max_level(log_level).init(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = config::load(cli.config.as_deref())?;
    let configured = config.level();
    init_logging(cli.verbose, cli.quiet, configured.as_ref().map_or(tracing::Level::INFO, |l| *l));
    if let Err(e) = configured {
        tracing::warn!("{e:#}, using info");
    }

    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }
    let output = Output { color: !cli.no_color && !cli.json, json: cli.json };

    // Commands that never touch the network
    match &cli.command {
        Commands::Condition { json } => return commands::condition::run(json),
        Commands::Cache { action } => return commands::cache::run(&config, action),
        Commands::Config { key, value } => {
            return commands::config::run(&config, cli.config.as_deref(), key, value.clone())
        }
        Commands::Completions { shell } => return commands::completions::run(*shell, Cli::command()),
        _ => {}
    }

    let mut app = App::from_config(config, output)?;

    match cli.command {
        Commands::Browse { page } => commands::browse::run(&app, page).await,
        Commands::Search { term, kind, generation } => {
            commands::search::run(&app, &term, kind.as_deref(), generation.as_deref()).await
        }
        Commands::Filter { kind, generation, count } => {
            commands::filter::run(&app, kind.as_deref(), generation.as_deref(), count).await
        }
        Commands::Show { reference } => commands::show::run(&app, &reference).await,
        Commands::Evolutions { reference, kind, generation, count } => {
            commands::evolutions::run(&app, reference.as_deref(), kind.as_deref(), generation.as_deref(), count)
                .await
        }
        Commands::Items { page } => commands::items::run(&app, page).await,
        Commands::Item { term } => commands::item::run(&app, &term).await,
        Commands::Favorites { action, ids } => commands::favorites::run(&app, &action, &ids).await,
        Commands::Compare { ids } => commands::compare::run(&mut app, &ids).await,
        Commands::Filters => commands::filters::run(&app, cli.json).await,
        Commands::Open { location } => commands::open::run(&mut app, &location).await,
        Commands::Condition { .. } | Commands::Cache { .. } | Commands::Config { .. } | Commands::Completions { .. } => {
            Ok(())
        }
    }
}
