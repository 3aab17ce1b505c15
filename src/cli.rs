// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines the subcommands and the flags layered over file and env config.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use stitch_remote::config::{Config, parse_port};
use stitch_remote::error::Result;
use stitch_remote::output::OutputMode;

#[derive(Parser)]
#[command(name = "stitch-remote")]
#[command(about = "Open an SSH session to the stitch server with the right key and port forwards")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print errors and requested data
    #[arg(short, long, global = true, conflicts_with = "json")]
    pub quiet: bool,

    /// Emit machine-readable JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Configuration file (defaults to the per-user config.yml)
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    pub fn output_mode(&self) -> OutputMode {
        if self.json {
            OutputMode::Json
        } else if self.quiet {
            OutputMode::Quiet
        } else {
            OutputMode::Normal
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Connect to the server (the default)
    Connect {
        #[command(flatten)]
        target: TargetArgs,

        /// Print the ssh command instead of running it
        #[arg(long)]
        dry_run: bool,
    },

    /// Show the resolved key, target, and command line
    Show {
        #[command(flatten)]
        target: TargetArgs,
    },

    /// Write a configuration template
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

impl Default for Commands {
    fn default() -> Self {
        Commands::Connect {
            target: TargetArgs::default(),
            dry_run: false,
        }
    }
}

/// Overrides that take precedence over file and environment settings.
#[derive(Args, Default)]
pub struct TargetArgs {
    /// Server hostname
    #[arg(long)]
    pub host: Option<String>,

    /// Server SSH port
    #[arg(short, long)]
    pub port: Option<String>,

    /// Remote user name
    #[arg(short, long)]
    pub user: Option<String>,
}

impl TargetArgs {
    pub fn apply(&self, config: &mut Config) -> Result<()> {
        if let Some(host) = &self.host {
            config.host = host.clone();
        }
        if let Some(port) = &self.port {
            config.port = parse_port(port, "--port")?;
        }
        if let Some(user) = &self.user {
            config.user = user.clone();
        }
        config.validate()
    }
}
