#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::too_many_lines)]

//! Core of assetline: the pipeline model, the assembler, and dry-run
//! validation.
//!
//! ```ignore
//! use assetline_core::pipeline::{assemble, validate, Mode};
//!
//! let (_, config) = assetline_core::load_config(&cwd, None)?;
//! let pipeline = assemble(&config, Mode::Production)?;
//! assert!(validate(&pipeline).is_empty());
//! ```

pub mod config;
pub mod error;
pub mod loader;
pub mod pipeline;
pub mod version;

pub use config::Config;
pub use error::{ConfigError, Error};
pub use loader::{find_config_file, load_config};
pub use pipeline::{
    assemble, validate, Mode, OutputCategory, OutputTemplate, Pipeline, PipelineConfig,
    PluginSpec, Rule, RuleBinding, Transform, Violation, PIPELINE_SCHEMA_VERSION,
};
pub use version::VERSION;
