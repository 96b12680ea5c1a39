use anyhow::{Context, Result};
use crate::catalog::{is_catalog, Catalog};
use crate::errors::CatalogError;
use crate::exif::CaptureDateResolver;
use crate::file_writer::CatalogWriter;
use crate::path_generator::PathGenerator;
use std::fs;
use std::path::{Path, PathBuf};

/// What a source path turned out to be
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceItem {
    File(PathBuf),
    Directory(PathBuf),
    /// Sockets, devices, fifos
    Unsupported(PathBuf),
}

impl SourceItem {
    /// Symlinks are followed, like the metadata checks of `Path::is_file`.
    pub fn classify(path: &Path) -> Result<Self> {
        let metadata = fs::metadata(path)
            .with_context(|| format!("Failed to stat: {}", path.display()))?;

        let path = path.to_path_buf();
        Ok(if metadata.is_dir() {
            SourceItem::Directory(path)
        } else if metadata.is_file() {
            SourceItem::File(path)
        } else {
            SourceItem::Unsupported(path)
        })
    }
}

/// Places files and directory trees into a catalog by capture date
pub struct CatalogIngester<'a> {
    catalog: &'a Catalog,
    date_resolver: &'a CaptureDateResolver<'a>,
    path_generator: &'a PathGenerator,
    writer: &'a dyn CatalogWriter,
}

impl<'a> CatalogIngester<'a> {
    pub fn new(
        catalog: &'a Catalog,
        date_resolver: &'a CaptureDateResolver<'a>,
        path_generator: &'a PathGenerator,
        writer: &'a dyn CatalogWriter,
    ) -> Self {
        Self {
            catalog,
            date_resolver,
            path_generator,
            writer,
        }
    }

    /// Ingest a single file, or every entry of a directory recursively.
    /// Per-file failures are collected in the result, not returned.
    pub fn ingest(&self, source: &Path) -> Result<IngestResult> {
        let root = self.catalog.root();
        if !is_catalog(root) {
            return Err(CatalogError::NotCatalog(root.to_path_buf()).into());
        }

        let mut result = IngestResult::default();
        self.ingest_item(source, &mut result);
        Ok(result)
    }

    fn ingest_item(&self, path: &Path, result: &mut IngestResult) {
        match SourceItem::classify(path) {
            Ok(SourceItem::File(file)) => {
                result.total_files += 1;
                match self.ingest_file(&file) {
                    Ok(_) => result.ingested_files += 1,
                    Err(e) => result.record_failure(&file, e),
                }
            }
            Ok(SourceItem::Directory(dir)) => self.ingest_directory(&dir, result),
            Ok(SourceItem::Unsupported(other)) => {
                result.total_files += 1;
                result.record_failure(&other, anyhow::anyhow!("not a regular file or directory"));
            }
            Err(e) => {
                result.total_files += 1;
                result.record_failure(path, e);
            }
        }
    }

    // One level per call; depth comes from ingest_item recursing.
    // Entries are visited in directory listing order.
    fn ingest_directory(&self, dir: &Path, result: &mut IngestResult) {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                let e = anyhow::Error::new(e).context("Failed to read directory");
                result.record_failure(dir, e);
                return;
            }
        };

        for entry in entries {
            match entry {
                Ok(entry) => {
                    let path = entry.path();
                    if is_directory_link(&entry) {
                        log::warn!("not following directory symlink {}", path.display());
                        continue;
                    }
                    self.ingest_item(&path, result)
                }
                Err(e) => {
                    let e = anyhow::Error::new(e).context("Failed to read directory entry");
                    result.record_failure(dir, e);
                }
            }
        }
    }

    /// Returns the absolute destination the file was placed at.
    fn ingest_file(&self, source: &Path) -> Result<PathBuf> {
        let file_name = source
            .file_name()
            .context("Source has no file name")?;

        let (date, date_source) = self.date_resolver.resolve(source)?;
        log::info!("{}: capture date {} ({:?})", source.display(), date, date_source);

        let target_dir = self.path_generator.generate_dir(&date);
        self.writer
            .create_directory(&target_dir)
            .context("Failed to create directory")?;

        let target_path = self.path_generator.generate_path(&date, file_name);
        let full_path = self.writer.get_full_path(&target_path);

        // Copying a file onto itself would truncate it
        if same_file(source, &full_path) {
            log::info!("{} already in place", full_path.display());
            return Ok(full_path);
        }

        if full_path.exists() {
            log::warn!("overwriting {}", full_path.display());
        }
        self.writer
            .copy_file(source, &target_path)
            .context("Failed to copy file")?;
        log::info!("{} -> {}", source.display(), full_path.display());

        Ok(full_path)
    }
}

// Only links met while walking; a linked source given directly is followed.
fn is_directory_link(entry: &fs::DirEntry) -> bool {
    let is_link = entry.file_type().map(|t| t.is_symlink()).unwrap_or(false);
    is_link && entry.path().is_dir()
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Result of an ingest operation
#[derive(Debug, Default, PartialEq)]
pub struct IngestResult {
    pub total_files: usize,
    pub ingested_files: usize,
    pub skipped_files: usize,
    pub errors: Vec<String>,
}

impl IngestResult {
    fn record_failure(&mut self, path: &Path, error: anyhow::Error) {
        log::warn!("skipping {}: {:#}", path.display(), error);
        self.skipped_files += 1;
        self.errors.push(format!("{}: {:#}", path.display(), error));
    }
}
