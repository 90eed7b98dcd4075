//! CLI for rescheck.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use rescheck_core::{config, ByteUnit};
use std::path::PathBuf;

use commands::{run_check, run_download, run_size, CheckOptions};

/// Top-level CLI for rescheck.
#[derive(Debug, Parser)]
#[command(name = "rescheck")]
#[command(about = "rescheck: verify that external data resources are reachable and intact", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Check every resource of a catalog and write the reports as JSON.
    Check {
        /// Catalog file (.csv with a header row, or .json array).
        catalog: PathBuf,
        /// Check up to N resources concurrently.
        #[arg(long, default_value = "1", value_name = "N")]
        jobs: usize,
        /// Write the JSON reports to this file instead of stdout.
        #[arg(long, short, value_name = "PATH")]
        output: Option<PathBuf>,
        /// Exit with an error if any resource fails its checks.
        #[arg(long)]
        strict: bool,
    },

    /// Download a file resource from a catalog.
    Download {
        /// Catalog file containing the resource.
        catalog: PathBuf,
        /// Name of the resource (the "Resource" column).
        resource: String,
        /// Destination path; an existing file is replaced.
        dest: PathBuf,
    },

    /// Print a byte count in human readable form.
    Size {
        /// Number of bytes.
        #[arg(allow_negative_numbers = true)]
        bytes: i64,
        /// Fixed unit (B, KB, MB, GB) instead of the largest fitting one.
        #[arg(long)]
        unit: Option<ByteUnit>,
    },
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Check {
                catalog,
                jobs,
                output,
                strict,
            } => {
                let opts = CheckOptions {
                    jobs,
                    output,
                    strict,
                };
                run_check(&cfg, &catalog, &opts)?;
            }
            CliCommand::Download {
                catalog,
                resource,
                dest,
            } => run_download(&cfg, &catalog, &resource, &dest)?,
            CliCommand::Size { bytes, unit } => run_size(bytes, unit)?,
        }

        Ok(())
    }
}
