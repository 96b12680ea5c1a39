use crate::errors::CatalogError;
use anyhow::{Context, Result};
use std::fs::File;
use std::path::{Path, PathBuf};

/// Zero-byte sentinel whose presence marks a directory as a catalog root
pub const MARKER_FILE: &str = ".yapc";

/// A directory tree rooted at a marker-bearing directory, organized by date
#[derive(Debug, Clone)]
pub struct Catalog {
    root: PathBuf,
}

impl Catalog {
    /// Opens an existing catalog, failing if `root` carries no marker file.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, CatalogError> {
        let root = root.into();
        if !is_catalog(&root) {
            return Err(CatalogError::NotCatalog(root));
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// True iff `path` is a directory with the marker file directly inside it.
pub fn is_catalog(path: &Path) -> bool {
    path.is_dir() && path.join(MARKER_FILE).is_file()
}

/// Initializes `path` as a catalog by writing the marker file.
pub fn create_catalog(path: &Path) -> Result<Catalog> {
    if is_catalog(path) {
        return Err(CatalogError::AlreadyCatalog(path.to_path_buf()).into());
    }
    if !path.is_dir() {
        return Err(CatalogError::NotFound(path.to_path_buf()).into());
    }

    let marker = path.join(MARKER_FILE);
    File::create(&marker)
        .with_context(|| format!("Failed to create marker file: {}", marker.display()))?;
    log::debug!("wrote marker {}", marker.display());

    Ok(Catalog {
        root: path.to_path_buf(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_plain_directory_is_not_catalog() {
        // Arrange
        let dir = tempdir().unwrap();

        // Act / Assert
        assert!(!is_catalog(dir.path()));
    }

    #[test]
    fn test_missing_path_is_not_catalog() {
        let dir = tempdir().unwrap();
        assert!(!is_catalog(&dir.path().join("nowhere")));
    }

    #[test]
    fn test_file_is_not_catalog() {
        // Arrange
        let dir = tempdir().unwrap();
        let file = dir.path().join("photo.jpg");
        fs::write(&file, b"data").unwrap();

        // Act / Assert
        assert!(!is_catalog(&file));
    }

    #[test]
    fn test_marker_directory_does_not_count() {
        // Arrange: marker name exists but is a directory, not a file
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join(MARKER_FILE)).unwrap();

        // Act / Assert
        assert!(!is_catalog(dir.path()));
    }

    #[test]
    fn test_create_catalog_in_existing_directory() {
        // Arrange
        let dir = tempdir().unwrap();

        // Act
        let result = create_catalog(dir.path());

        // Assert
        assert!(result.is_ok());
        assert!(is_catalog(dir.path()));
        let marker = fs::metadata(dir.path().join(MARKER_FILE)).unwrap();
        assert_eq!(marker.len(), 0);
    }

    #[test]
    fn test_create_catalog_twice_fails_and_keeps_marker() {
        // Arrange
        let dir = tempdir().unwrap();
        create_catalog(dir.path()).unwrap();
        let marker = dir.path().join(MARKER_FILE);
        fs::write(&marker, b"keep").unwrap();

        // Act
        let err = create_catalog(dir.path()).unwrap_err();

        // Assert
        assert_eq!(
            err.downcast_ref::<CatalogError>(),
            Some(&CatalogError::AlreadyCatalog(dir.path().to_path_buf()))
        );
        assert_eq!(fs::read(&marker).unwrap(), b"keep");
    }

    #[test]
    fn test_create_catalog_missing_path_fails() {
        // Arrange
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing");

        // Act
        let err = create_catalog(&missing).unwrap_err();

        // Assert
        assert_eq!(
            err.downcast_ref::<CatalogError>(),
            Some(&CatalogError::NotFound(missing.clone()))
        );
        assert!(!missing.exists());
    }

    #[test]
    fn test_open_requires_marker() {
        // Arrange
        let dir = tempdir().unwrap();

        // Act
        let before = Catalog::open(dir.path());
        create_catalog(dir.path()).unwrap();
        let after = Catalog::open(dir.path());

        // Assert
        assert_eq!(
            before.unwrap_err(),
            CatalogError::NotCatalog(dir.path().to_path_buf())
        );
        assert_eq!(after.unwrap().root(), dir.path());
    }
}
