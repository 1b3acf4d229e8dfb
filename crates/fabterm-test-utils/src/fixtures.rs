use anyhow::Result;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub struct TestFixtures {
    temp_dir: TempDir,
}

impl TestFixtures {
    pub fn new() -> Result<Self> {
        Ok(Self {
            temp_dir: TempDir::new()?,
        })
    }

    pub fn create_test_file(&self, name: &str, content: &[u8]) -> Result<PathBuf> {
        let file_path = self.temp_dir.path().join(name);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&file_path, content)?;
        Ok(file_path)
    }

    pub fn read_to_string(&self, name: &str) -> Result<String> {
        Ok(std::fs::read_to_string(self.temp_dir.path().join(name))?)
    }

    /// A path inside the fixture directory that does not exist yet
    pub fn missing_dir(&self, name: &str) -> PathBuf {
        self.temp_dir.path().join(name)
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }
}
