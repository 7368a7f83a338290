//! `assetline dispatch` command implementation.
//!
//! Routes input files through an assembled pipeline: the first matching
//! rule, its transform chain, and the rendered output path.

use super::{fail, load_and_assemble};
use assetline_core::pipeline::{codes, Mode, RuleBinding};
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Dispatch command action.
#[derive(Debug, Clone)]
pub struct DispatchAction {
    pub cwd: PathBuf,
    pub mode: Mode,
    pub config: Option<PathBuf>,
    /// Length for `[hash]` placeholders without an explicit `:N`.
    pub hash_length: usize,
    pub files: Vec<PathBuf>,
}

#[derive(Serialize)]
struct DispatchResultJson {
    ok: bool,
    files: Vec<FileJson>,
}

#[derive(Serialize)]
struct FileJson {
    path: String,
    matched: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    rule: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    category: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    transforms: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    output: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl FileJson {
    fn unmatched(path: String) -> Self {
        Self {
            path,
            matched: false,
            rule: None,
            category: None,
            transforms: Vec::new(),
            output: None,
            error: None,
        }
    }

    fn matched(path: String, binding: &RuleBinding) -> Self {
        Self {
            path,
            matched: true,
            rule: Some(binding.label()),
            category: Some(binding.output.category.to_string()),
            transforms: binding
                .rule
                .transforms
                .iter()
                .map(|t| t.name.clone())
                .collect(),
            output: None,
            error: None,
        }
    }
}

/// Run the dispatch command.
pub fn run(action: DispatchAction, json: bool) -> Result<()> {
    let (_, pipeline) =
        match load_and_assemble(&action.cwd, action.config.as_deref(), action.mode) {
            Ok(ok) => ok,
            Err(e) => fail(json, e.code(), &e.to_string()),
        };
    let dispatcher = match pipeline.dispatcher() {
        Ok(d) => d,
        Err(e) => fail(json, e.code(), &e.to_string()),
    };

    let output_dir = Path::new(&pipeline.output_dir);
    let mut results = Vec::with_capacity(action.files.len());
    let mut failed = false;

    for file in &action.files {
        let display_path = file.to_string_lossy().replace('\\', "/");
        let Some(binding) = dispatcher.dispatch(file) else {
            tracing::debug!(file = %display_path, "no rule matched");
            results.push(FileJson::unmatched(display_path));
            continue;
        };

        let mut entry = FileJson::matched(display_path, binding);
        let absolute = if file.is_absolute() {
            file.clone()
        } else {
            action.cwd.join(file)
        };
        let rendered = std::fs::read(&absolute)
            .map_err(|e| format!("{}: {e}", codes::IO_ERROR))
            .and_then(|content| {
                binding
                    .output
                    .render(file, &content, action.hash_length)
                    .map_err(|e| format!("{}: {e}", e.code()))
            });
        match rendered {
            Ok(rel) => {
                let out = output_dir.join(rel);
                entry.output = Some(out.to_string_lossy().replace('\\', "/"));
            }
            Err(message) => {
                tracing::debug!(file = %entry.path, "{message}");
                entry.error = Some(message);
                failed = true;
            }
        }
        results.push(entry);
    }

    if json {
        let result = DispatchResultJson {
            ok: !failed,
            files: results,
        };
        println!("{}", serde_json::to_string(&result).into_diagnostic()?);
    } else {
        for entry in &results {
            if !entry.matched {
                println!("{} -> unmatched", entry.path);
                continue;
            }
            let rule = entry.rule.as_deref().unwrap_or_default();
            let chain = entry.transforms.join(", ");
            match (&entry.output, &entry.error) {
                (Some(out), _) => println!("{} -> {rule} [{chain}] -> {out}", entry.path),
                (None, Some(err)) => eprintln!("error: {}: {err}", entry.path),
                (None, None) => println!("{} -> {rule} [{chain}]", entry.path),
            }
        }
    }

    if failed {
        std::process::exit(1);
    }
    Ok(())
}
