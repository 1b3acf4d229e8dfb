//! Downloadable step assets
//!
//! Configuration files referenced by tutorial steps. They are compiled into
//! the binary and can be overridden by pointing the store at a directory.

use crate::TutorialError;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::info;

const EMBEDDED: &[(&str, &str)] = &[
    ("quickstart.yaml", include_str!("../assets/quickstart.yaml")),
    (
        "agent_tool_calling.yaml",
        include_str!("../assets/agent_tool_calling.yaml"),
    ),
];

#[derive(Debug, Clone, Default)]
pub struct AssetStore {
    dir: Option<PathBuf>,
}

impl AssetStore {
    /// Serve the compiled-in assets
    pub fn embedded() -> Self {
        Self { dir: None }
    }

    /// Serve assets from a directory instead
    pub fn from_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: Some(dir.into()),
        }
    }

    /// Asset names must be bare file names
    fn check_name(name: &str) -> Result<(), TutorialError> {
        let bare = Path::new(name).file_name().and_then(|n| n.to_str()) == Some(name);
        if name.is_empty() || !bare {
            return Err(TutorialError::AssetNotFound(name.to_string()));
        }
        Ok(())
    }

    pub async fn fetch(&self, name: &str) -> Result<Vec<u8>, TutorialError> {
        Self::check_name(name)?;

        match &self.dir {
            Some(dir) => match tokio::fs::read(dir.join(name)).await {
                Ok(bytes) => Ok(bytes),
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    Err(TutorialError::AssetNotFound(name.to_string()))
                }
                Err(source) => Err(TutorialError::Download {
                    name: name.to_string(),
                    source,
                }),
            },
            None => EMBEDDED
                .iter()
                .find(|(n, _)| *n == name)
                .map(|(_, content)| content.as_bytes().to_vec())
                .ok_or_else(|| TutorialError::AssetNotFound(name.to_string())),
        }
    }

    /// Fetch `name` and write it into `dest_dir` under the same file name
    pub async fn save(&self, name: &str, dest_dir: &Path) -> Result<PathBuf, TutorialError> {
        let bytes = self.fetch(name).await?;
        let dest = dest_dir.join(name);
        tokio::fs::write(&dest, bytes)
            .await
            .map_err(|source| TutorialError::Download {
                name: name.to_string(),
                source,
            })?;
        info!(path = %dest.display(), "Saved tutorial asset");
        Ok(dest)
    }

    /// Whether `name` is compiled into the binary
    pub fn has_embedded(name: &str) -> bool {
        EMBEDDED.iter().any(|(n, _)| *n == name)
    }
}
