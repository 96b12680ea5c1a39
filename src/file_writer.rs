use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Trait for placing files under a catalog root
pub trait CatalogWriter {
    fn create_directory(&self, path: &Path) -> Result<()>;
    /// Copies `source` to `path`, replacing whatever is already there.
    fn copy_file(&self, source: &Path, path: &Path) -> Result<u64>;
    fn get_full_path(&self, path: &Path) -> PathBuf;
}

/// Concrete implementation that writes to the actual filesystem
pub struct RealCatalogWriter {
    root: PathBuf,
}

impl RealCatalogWriter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl CatalogWriter for RealCatalogWriter {
    fn create_directory(&self, path: &Path) -> Result<()> {
        let full_path = self.get_full_path(path);

        fs::create_dir_all(&full_path)
            .with_context(|| format!("Failed to create directory: {}", full_path.display()))?;

        Ok(())
    }

    fn copy_file(&self, source: &Path, path: &Path) -> Result<u64> {
        let full_path = self.get_full_path(path);

        fs::copy(source, &full_path).with_context(|| {
            format!(
                "Failed to copy {} to {}",
                source.display(),
                full_path.display()
            )
        })
    }

    fn get_full_path(&self, path: &Path) -> PathBuf {
        self.root.join(path)
    }
}
