use crate::error::ScribeError;
use async_trait::async_trait;
use indexmap::IndexMap;
use scribe_common::ActionRecord;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tokio::fs::{self, File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::info;

/// Durable destination for recorder output.
#[async_trait]
pub trait ArtifactSink: Send {
    /// Replace the persisted registry with `snapshot`.
    async fn write_registry(
        &mut self,
        snapshot: &IndexMap<String, String>,
    ) -> Result<(), ScribeError>;

    /// Append one action's two lines.
    async fn append_action(&mut self, record: &ActionRecord) -> Result<(), ScribeError>;

    async fn flush(&mut self) -> Result<(), ScribeError> {
        Ok(())
    }
}

/// Registry JSON plus append-only steps file.
pub struct FileArtifacts {
    registry_path: PathBuf,
    steps_path: PathBuf,
    steps: File,
}

impl FileArtifacts {
    /// Open both sinks, resetting the registry to `{}` and the steps file to
    /// empty.
    pub async fn create(registry_path: &Path, steps_path: &Path) -> Result<Self, ScribeError> {
        for path in [registry_path, steps_path] {
            if let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
            {
                fs::create_dir_all(parent)
                    .await
                    .map_err(|e| ScribeError::persistence(path, e))?;
            }
        }

        fs::write(registry_path, "{}")
            .await
            .map_err(|e| ScribeError::persistence(registry_path, e))?;

        let steps = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(steps_path)
            .await
            .map_err(|e| ScribeError::persistence(steps_path, e))?;

        Ok(Self {
            registry_path: registry_path.to_path_buf(),
            steps_path: steps_path.to_path_buf(),
            steps,
        })
    }

    pub fn registry_path(&self) -> &Path {
        &self.registry_path
    }

    pub fn steps_path(&self) -> &Path {
        &self.steps_path
    }

    fn temp_registry_path(&self) -> PathBuf {
        let mut name = self
            .registry_path
            .file_name()
            .map(OsString::from)
            .unwrap_or_else(|| OsString::from("registry"));
        name.push(".tmp");
        self.registry_path.with_file_name(name)
    }
}

#[async_trait]
impl ArtifactSink for FileArtifacts {
    async fn write_registry(
        &mut self,
        snapshot: &IndexMap<String, String>,
    ) -> Result<(), ScribeError> {
        let json = serde_json::to_string_pretty(snapshot)?;
        let temp = self.temp_registry_path();

        let mut file = File::create(&temp)
            .await
            .map_err(|e| ScribeError::persistence(&temp, e))?;
        file.write_all(json.as_bytes())
            .await
            .map_err(|e| ScribeError::persistence(&temp, e))?;
        file.sync_all()
            .await
            .map_err(|e| ScribeError::persistence(&temp, e))?;
        drop(file);

        fs::rename(&temp, &self.registry_path)
            .await
            .map_err(|e| ScribeError::persistence(&self.registry_path, e))
    }

    async fn append_action(&mut self, record: &ActionRecord) -> Result<(), ScribeError> {
        let [instruction, wait] = record.lines();
        let chunk = format!("{}\n{}\n", instruction, wait);

        self.steps
            .write_all(chunk.as_bytes())
            .await
            .map_err(|e| ScribeError::persistence(&self.steps_path, e))?;
        self.steps
            .flush()
            .await
            .map_err(|e| ScribeError::persistence(&self.steps_path, e))?;
        self.steps
            .sync_data()
            .await
            .map_err(|e| ScribeError::persistence(&self.steps_path, e))?;

        info!("Recorded: {} / {}", instruction, wait);
        Ok(())
    }

    async fn flush(&mut self) -> Result<(), ScribeError> {
        self.steps
            .flush()
            .await
            .map_err(|e| ScribeError::persistence(&self.steps_path, e))?;
        self.steps
            .sync_all()
            .await
            .map_err(|e| ScribeError::persistence(&self.steps_path, e))
    }
}
