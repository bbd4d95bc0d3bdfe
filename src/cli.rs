// CLI module - command-line argument parsing and handlers
//
// Without a subcommand roster runs the TUI. Subcommands:
// - list: print the filtered, sorted table once and exit
// - config --show/--path/--reset: configuration helpers

use crate::config::{Config, VERSION};
use crate::headless::ListOptions;
use crate::users::{SortKey, SortOrder, SortState};
use clap::{Parser, Subcommand};
use std::io::Write;

/// roster - searchable, sortable user table in the terminal
#[derive(Parser, Debug)]
#[command(name = "roster")]
#[command(version = VERSION)]
#[command(about = "Searchable, sortable user table in the terminal", long_about = None)]
pub struct Cli {
    /// Override the endpoint returning the user list
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the user table once and exit
    List {
        /// Case-insensitive substring to filter on (any field)
        #[arg(short, long, default_value = "")]
        query: String,

        /// Column to sort by: name, email, phone
        #[arg(short, long, default_value = "name", value_parser = parse_sort_key)]
        sort: SortKey,

        /// Sort descending
        #[arg(long)]
        desc: bool,
    },

    /// Manage configuration
    Config {
        /// Show effective configuration
        #[arg(long)]
        show: bool,

        /// Reset config file to defaults
        #[arg(long)]
        reset: bool,

        /// Show config file path
        #[arg(long)]
        path: bool,
    },
}

fn parse_sort_key(s: &str) -> Result<SortKey, String> {
    SortKey::parse(s).ok_or_else(|| format!("unknown column '{s}' (expected name, email or phone)"))
}

impl Commands {
    /// Listing options for `roster list`, if that is the command
    pub fn list_options(&self) -> Option<ListOptions> {
        match self {
            Commands::List { query, sort, desc } => {
                let order = if *desc {
                    SortOrder::Descending
                } else {
                    SortOrder::Ascending
                };
                Some(ListOptions {
                    query: query.clone(),
                    sort: SortState::new(*sort, order),
                })
            }
            Commands::Config { .. } => None,
        }
    }
}

/// Handle `roster config`. Returns true if the command was handled.
pub fn handle_config_command(command: &Commands) -> bool {
    let Commands::Config { show, reset, path } = command else {
        return false;
    };

    if *path {
        handle_config_path();
    } else if *show {
        handle_config_show();
    } else if *reset {
        handle_config_reset();
    } else {
        println!("Usage: roster config [--show|--reset|--path]");
        println!();
        println!("Options:");
        println!("  --show    Display effective configuration");
        println!("  --reset   Reset config file to defaults");
        println!("  --path    Show config file path");
    }
    true
}

fn handle_config_path() {
    match Config::config_path() {
        Some(path) => println!("{}", path.display()),
        None => {
            eprintln!("Error: Could not determine config path");
            std::process::exit(1);
        }
    }
}

fn handle_config_show() {
    let config = Config::from_env();

    println!("# Effective configuration (env > file > defaults)");
    println!();
    print!("{}", config.to_toml());

    println!();
    if let Some(path) = Config::config_path() {
        if path.exists() {
            println!("# Source: {}", path.display());
        } else {
            println!("# Source: defaults (no config file)");
        }
    }
}

fn handle_config_reset() {
    let Some(path) = Config::config_path() else {
        eprintln!("Error: Could not determine config path");
        std::process::exit(1);
    };

    if path.exists() {
        eprint!(
            "Config file exists at {}. Overwrite? [y/N] ",
            path.display()
        );
        let _ = std::io::stderr().flush();

        let mut input = String::new();
        if std::io::stdin().read_line(&mut input).is_err()
            || !input.trim().eq_ignore_ascii_case("y")
        {
            println!("Aborted.");
            return;
        }
    }

    match Config::write_template(&path) {
        Ok(()) => println!("Config reset to defaults: {}", path.display()),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}
