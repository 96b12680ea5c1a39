use std::path::PathBuf;
use thiserror::Error;

/// Precondition failures for catalog operations.
/// The Display text is what the user sees.
#[derive(Debug, Error, PartialEq)]
pub enum CatalogError {
    #[error("Path {} already yet another photo catalog!", .0.display())]
    AlreadyCatalog(PathBuf),

    #[error("Path {} not found!", .0.display())]
    NotFound(PathBuf),

    #[error("{} not yet another photo catalog", .0.display())]
    NotCatalog(PathBuf),
}
