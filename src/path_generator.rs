use crate::exif::CaptureDate;
use std::path::{Path, PathBuf};

/// Generates catalog-relative paths based on capture dates
/// Single Responsibility: Only concerned with path generation logic
pub struct PathGenerator;

impl PathGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Generates directory in format: year/month/day, parts as given
    pub fn generate_dir(&self, date: &CaptureDate) -> PathBuf {
        PathBuf::from(date.year()).join(date.month()).join(date.day())
    }

    /// Generates path in format: year/month/day/filename
    pub fn generate_path(&self, date: &CaptureDate, filename: impl AsRef<Path>) -> PathBuf {
        self.generate_dir(date).join(filename)
    }
}
