//! `assetline validate` command implementation.
//!
//! Dry run: checks a serialized Pipeline file, or assembles the config and
//! checks the result. Exits 1 when any violation is found.

use super::{fail, load_and_assemble};
use assetline_core::pipeline::{validate, Mode, Pipeline, Violation, PIPELINE_SCHEMA_VERSION};
use assetline_core::Error;
use assetline_util::fs::read_lossy;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Validate command action.
#[derive(Debug, Clone)]
pub struct ValidateAction {
    pub cwd: PathBuf,
    /// Serialized pipeline to check. When absent, the config is assembled.
    pub pipeline: Option<PathBuf>,
    pub mode: Mode,
    pub config: Option<PathBuf>,
}

#[derive(Serialize)]
struct ValidateResultJson<'a> {
    ok: bool,
    schema_version: u32,
    source: String,
    bindings: usize,
    violations: Vec<&'a Violation>,
}

/// Run the validate command.
pub fn run(action: ValidateAction, json: bool) -> Result<()> {
    let loaded = match &action.pipeline {
        Some(path) => read_pipeline(&resolve(&action.cwd, path)),
        None => load_and_assemble(&action.cwd, action.config.as_deref(), action.mode),
    };
    let (source, pipeline) = match loaded {
        Ok(ok) => ok,
        Err(e) => fail(json, e.code(), &e.to_string()),
    };

    let violations = validate(&pipeline);
    tracing::debug!(
        source = %source.display(),
        violations = violations.len(),
        "validated pipeline"
    );

    if json {
        let result = ValidateResultJson {
            ok: violations.is_empty(),
            schema_version: PIPELINE_SCHEMA_VERSION,
            source: source.display().to_string(),
            bindings: pipeline.bindings.len(),
            violations: violations.iter().collect(),
        };
        println!("{}", serde_json::to_string(&result).into_diagnostic()?);
    } else if violations.is_empty() {
        println!(
            "{}: valid {} pipeline ({} rules, {} plugins)",
            source.display(),
            pipeline.mode,
            pipeline.bindings.len(),
            pipeline.plugins.len()
        );
    } else {
        for v in &violations {
            eprintln!("error[{}]: {}: {}", v.code, v.subject, v.message);
        }
        eprintln!(
            "{}: {} violation(s)",
            source.display(),
            violations.len()
        );
    }

    if !violations.is_empty() {
        std::process::exit(1);
    }
    Ok(())
}

fn resolve(cwd: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}

fn read_pipeline(path: &Path) -> std::result::Result<(PathBuf, Pipeline), Error> {
    let text = read_lossy(path).map_err(|source| Error::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;
    let pipeline = serde_json::from_str(&text).map_err(|e| Error::ConfigParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    Ok((path.to_path_buf(), pipeline))
}
