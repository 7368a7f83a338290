pub mod assemble;
pub mod dispatch;
pub mod validate;
pub mod version;

use assetline_core::pipeline::{assemble, Mode, Pipeline};
use assetline_core::{load_config, Error};
use serde::Serialize;
use std::path::Path;

/// Error payload shared by every `--json` failure envelope.
#[derive(Serialize)]
pub struct ErrorJson {
    pub code: String,
    pub message: String,
}

#[derive(Serialize)]
struct FailureJson<'a> {
    ok: bool,
    error: &'a ErrorJson,
}

/// Report a failure and exit with status 1.
///
/// JSON mode prints one envelope to stdout; human mode prints
/// `error[CODE]: message` to stderr.
pub fn fail(json: bool, code: &str, message: &str) -> ! {
    let error = ErrorJson {
        code: code.to_string(),
        message: message.to_string(),
    };
    if json {
        let envelope = FailureJson {
            ok: false,
            error: &error,
        };
        match serde_json::to_string(&envelope) {
            Ok(line) => println!("{line}"),
            Err(_) => println!(r#"{{"ok":false,"error":{{"code":"{code}"}}}}"#),
        }
    } else {
        eprintln!("error[{}]: {}", error.code, error.message);
    }
    std::process::exit(1);
}

/// Load the config (explicit or discovered) and assemble it for `mode`.
pub fn load_and_assemble(
    cwd: &Path,
    config: Option<&Path>,
    mode: Mode,
) -> Result<(std::path::PathBuf, Pipeline), Error> {
    let (path, pipeline_config) = load_config(cwd, config)?;
    tracing::debug!(
        config = %path.display(),
        rules = pipeline_config.rules.len(),
        templates = pipeline_config.output_templates.len(),
        plugins = pipeline_config.plugins.len(),
        "loaded pipeline config"
    );

    let pipeline = assemble(&pipeline_config, mode)?;
    for note in &pipeline.notes {
        tracing::warn!(config = %path.display(), "{note}");
    }
    Ok((path, pipeline))
}
