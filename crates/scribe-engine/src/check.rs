//! Validation of a step script against a registry file.
//!
//! A replay engine looks every referenced name up in the registry before
//! executing a step; this runs the same lookup ahead of time.

use indexmap::IndexMap;
use scribe_common::script::{ScriptError, parse_script};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CheckError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid registry: {0}")]
    Registry(#[from] serde_json::Error),
    #[error(transparent)]
    Script(#[from] ScriptError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingName {
    pub line: usize,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckReport {
    pub steps: usize,
    pub missing: Vec<MissingName>,
}

impl CheckReport {
    pub fn is_ok(&self) -> bool {
        self.missing.is_empty()
    }
}

pub fn check_script(registry_json: &str, script: &str) -> Result<CheckReport, CheckError> {
    let registry: IndexMap<String, String> = serde_json::from_str(registry_json)?;
    let steps = parse_script(script)?;

    let missing = steps
        .iter()
        .filter_map(|parsed| {
            let name = parsed.step.element_name()?;
            (!registry.contains_key(name)).then(|| MissingName {
                line: parsed.line,
                name: name.to_string(),
            })
        })
        .collect();

    Ok(CheckReport {
        steps: steps.len(),
        missing,
    })
}

pub async fn check_files(registry_path: &Path, steps_path: &Path) -> Result<CheckReport, CheckError> {
    let registry = read(registry_path).await?;
    let script = read(steps_path).await?;
    check_script(&registry, &script)
}

async fn read(path: &Path) -> Result<String, CheckError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| CheckError::Io {
            path: path.to_path_buf(),
            source,
        })
}
