#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::doc_markdown)]

mod commands;
mod logging;

use assetline_core::pipeline::{Mode, DEFAULT_HASH_LEN};
use assetline_core::Config;
use clap::Parser;
use miette::Result;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "assetline")]
#[command(author, version, about = "Assemble and validate asset build pipelines", long_about = None)]
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

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Print version information
    Version,

    /// Assemble the pipeline for a build mode and print it
    Assemble {
        /// Build mode (development or production)
        #[arg(long, value_name = "MODE")]
        mode: Mode,

        /// Config file (default: discovered in the working directory)
        #[arg(long, value_name = "PATH")]
        config: Option<PathBuf>,

        /// Write the pipeline JSON to this file
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,
    },

    /// Check a pipeline for violations without building anything
    Validate {
        /// Serialized pipeline to check (default: assemble the config)
        #[arg(long, value_name = "FILE", conflicts_with = "config")]
        pipeline: Option<PathBuf>,

        /// Build mode used when assembling the config
        #[arg(long, value_name = "MODE", default_value = "development")]
        mode: Mode,

        /// Config file (default: discovered in the working directory)
        #[arg(long, value_name = "PATH")]
        config: Option<PathBuf>,
    },

    /// Show which rule handles each file and where its output lands
    Dispatch {
        /// Build mode (development or production)
        #[arg(long, value_name = "MODE", default_value = "development")]
        mode: Mode,

        /// Config file (default: discovered in the working directory)
        #[arg(long, value_name = "PATH")]
        config: Option<PathBuf>,

        /// Length for [hash] placeholders without an explicit length
        #[arg(long, default_value_t = DEFAULT_HASH_LEN)]
        hash_length: usize,

        /// Input files, relative to the working directory
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Determine working directory
    let cwd = cli
        .cwd
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."));

    let config = Config::new(cwd)
        .with_verbosity(cli.verbose)
        .with_json(cli.json);

    logging::init(config.verbosity, config.json);

    match cli.command {
        Some(Commands::Version) | None => commands::version::run(),
        Some(Commands::Assemble { mode, config: path, out }) => {
            let span = tracing::info_span!("assemble", cmd = "assemble", %mode);
            let _guard = span.enter();
            commands::assemble::run(
                commands::assemble::AssembleAction {
                    cwd: config.cwd.clone(),
                    mode,
                    config: path,
                    out,
                },
                config.json,
            )
        }
        Some(Commands::Validate {
            pipeline,
            mode,
            config: path,
        }) => {
            let span = tracing::info_span!("validate", cmd = "validate", %mode);
            let _guard = span.enter();
            commands::validate::run(
                commands::validate::ValidateAction {
                    cwd: config.cwd.clone(),
                    pipeline,
                    mode,
                    config: path,
                },
                config.json,
            )
        }
        Some(Commands::Dispatch {
            mode,
            config: path,
            hash_length,
            files,
        }) => {
            let span = tracing::info_span!("dispatch", cmd = "dispatch", %mode);
            let _guard = span.enter();
            commands::dispatch::run(
                commands::dispatch::DispatchAction {
                    cwd: config.cwd.clone(),
                    mode,
                    config: path,
                    hash_length,
                    files,
                },
                config.json,
            )
        }
    }
}
