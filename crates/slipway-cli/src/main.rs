#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::uninlined_format_args)]

mod commands;
mod logging;

use clap::Parser;
use miette::Result;
use slipway_core::server::config::Overrides;
use slipway_core::Config;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "slipway")]
#[command(author, version, about = "A dev-server configuration front-end", long_about = None)]
struct Cli {
    /// Increase logging verbosity (-v for DEBUG, -vv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit JSON formatted output (stable, machine-readable)
    #[arg(long, global = true)]
    json: bool,

    /// Override the working directory
    #[arg(long, global = true, value_name = "PATH")]
    cwd: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Server-related flags shared by `config` and `check`.
#[derive(clap::Args, Debug, Clone)]
struct ServerArgs {
    /// Path to config file (overrides auto-discovery)
    #[arg(long, short = 'c', value_name = "FILE")]
    config: Option<PathBuf>,

    /// Port to listen on (overrides the config file)
    #[arg(long, short = 'p')]
    port: Option<u16>,

    /// Fail startup instead of falling back when the port is taken
    #[arg(long)]
    strict_port: bool,

    /// Allow falling back to the next free port
    #[arg(long, conflicts_with = "strict_port")]
    no_strict_port: bool,

    /// Host to bind to (overrides the config file)
    #[arg(long)]
    host: Option<String>,
}

impl ServerArgs {
    fn overrides(&self) -> Overrides {
        let strict_port = if self.strict_port {
            Some(true)
        } else if self.no_strict_port {
            Some(false)
        } else {
            None
        };
        Overrides {
            port: self.port,
            strict_port,
            host: self.host.clone(),
        }
    }
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Print version information
    Version,

    /// Resolve and print the effective server configuration
    Config {
        #[command(flatten)]
        server: ServerArgs,
    },

    /// Validate startup: config file, exclusion globs, port availability
    Check {
        #[command(flatten)]
        server: ServerArgs,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Determine working directory
    let cwd = cli
        .cwd
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."));

    // Build config
    let config = Config::new(cwd.clone())
        .with_verbosity(cli.verbose)
        .with_json_logs(cli.json);

    // With --json, stdout carries exactly one JSON object and stderr stays
    // log-free; skip subscriber setup entirely in that mode.
    if !cli.json {
        logging::init(config.verbosity, config.json_logs);
    }

    match cli.command {
        Some(Commands::Version) | None => commands::version::run(),
        Some(Commands::Config { server }) => {
            let action = commands::config::ConfigAction {
                cwd,
                config: server.config.clone(),
                overrides: server.overrides(),
            };
            commands::config::run(&action, cli.json)
        }
        Some(Commands::Check { server }) => {
            let action = commands::check::CheckAction {
                cwd,
                config: server.config.clone(),
                overrides: server.overrides(),
            };
            commands::check::run(&action, cli.json)
        }
    }
}
