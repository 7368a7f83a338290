//! `assetline assemble` command implementation.
//!
//! Resolves the pipeline config for one mode and prints the Pipeline.

use super::{fail, load_and_assemble};
use assetline_core::pipeline::{codes, Mode, Pipeline, PIPELINE_SCHEMA_VERSION};
use assetline_util::fs::write_atomic;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use std::path::PathBuf;

/// Assemble command action.
#[derive(Debug, Clone)]
pub struct AssembleAction {
    pub cwd: PathBuf,
    pub mode: Mode,
    /// Explicit config file (otherwise discovered in `cwd`).
    pub config: Option<PathBuf>,
    /// Write the pipeline here instead of stdout.
    pub out: Option<PathBuf>,
}

#[derive(Serialize)]
struct AssembleResultJson<'a> {
    ok: bool,
    schema_version: u32,
    config: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    out: Option<String>,
    pipeline: &'a Pipeline,
}

/// Run the assemble command.
pub fn run(action: AssembleAction, json: bool) -> Result<()> {
    let (config_path, pipeline) =
        match load_and_assemble(&action.cwd, action.config.as_deref(), action.mode) {
            Ok(ok) => ok,
            Err(e) => fail(json, e.code(), &e.to_string()),
        };

    tracing::info!(
        mode = %action.mode,
        bindings = pipeline.bindings.len(),
        plugins = pipeline.plugins.len(),
        "assembled pipeline"
    );

    let out_path = action.out.as_ref().map(|p| {
        if p.is_absolute() {
            p.clone()
        } else {
            action.cwd.join(p)
        }
    });

    if let Some(ref out) = out_path {
        let pretty = serde_json::to_string_pretty(&pipeline).into_diagnostic()?;
        if let Err(e) = write_atomic(out, format!("{pretty}\n").as_bytes()) {
            fail(
                json,
                codes::IO_ERROR,
                &format!("failed to write {}: {e}", out.display()),
            );
        }
    }

    if json {
        let result = AssembleResultJson {
            ok: true,
            schema_version: PIPELINE_SCHEMA_VERSION,
            config: config_path.display().to_string(),
            out: out_path.as_ref().map(|p| p.display().to_string()),
            pipeline: &pipeline,
        };
        println!("{}", serde_json::to_string(&result).into_diagnostic()?);
    } else if let Some(out) = out_path {
        println!(
            "Wrote {} pipeline ({} rules, {} plugins) to {}",
            pipeline.mode,
            pipeline.bindings.len(),
            pipeline.plugins.len(),
            out.display()
        );
    } else {
        println!(
            "{}",
            serde_json::to_string_pretty(&pipeline).into_diagnostic()?
        );
    }

    Ok(())
}
