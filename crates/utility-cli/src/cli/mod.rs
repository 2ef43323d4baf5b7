//! CLI host adapter for the `utility_file_downloader` resource.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use utility_core::config::{self, ProviderConfig};

use commands::{run_checksum, run_invoke, run_schema};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "utility-provider", version)]
#[command(about = "Managed file-download resource: create/read/update/delete via JSON requests", long_about = None)]
pub struct Cli {
    /// Config file to use instead of ~/.config/utility-provider/config.toml.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Print the resource schema as JSON.
    Schema,

    /// Run one lifecycle request (JSON) and print the JSON response.
    Invoke {
        /// Read the request from this file instead of stdin.
        #[arg(long, value_name = "PATH")]
        request: Option<String>,
    },

    /// Print SHA-1 and SHA-256 of a file.
    Checksum {
        /// Path to the file.
        path: String,
    },
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        match cli.command {
            CliCommand::Schema => run_schema()?,
            CliCommand::Invoke { request } => {
                let cfg = load_config(cli.config.as_deref())?;
                tracing::debug!("loaded config: {:?}", cfg);
                run_invoke(cfg, request.as_deref().map(Path::new))?;
            }
            CliCommand::Checksum { path } => run_checksum(Path::new(&path))?,
        }

        Ok(())
    }
}

fn load_config(path: Option<&Path>) -> Result<ProviderConfig> {
    match path {
        Some(p) => config::load_from(p),
        None => config::load_or_init(),
    }
}
