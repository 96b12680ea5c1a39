use std::path::Path;

use clap::error::ErrorKind;
use clap::CommandFactory;
use yapc::args::{Action, Cli, Config};
use yapc::catalog::{create_catalog, Catalog};
use yapc::exif::{CaptureDateResolver, ChangeTimeExtractor, ExifDateExtractor};
use yapc::file_writer::RealCatalogWriter;
use yapc::ingester::CatalogIngester;
use yapc::path_generator::PathGenerator;

// Every outcome is reported as text; the exit status is always 0.
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match Config::try_parse_from(std::env::args_os()) {
        Ok(config) => config,
        Err(e) if e.kind() == ErrorKind::DisplayVersion => {
            e.print().ok();
            return;
        }
        // --help counts as a parse failure too: help, then the usual notice
        Err(e) => {
            if e.kind() == ErrorKind::DisplayHelp {
                e.print().ok();
            } else {
                log::debug!("{}", e);
            }
            println!("Missing args, please read help first.");
            Cli::command().print_help().ok();
            return;
        }
    };

    if config.delete_source || config.assume_yes {
        log::debug!("--del and --yes have no effect yet");
    }

    match &config.action {
        Action::None => {}
        Action::Create => match create_catalog(&config.catalog) {
            Ok(_) => println!("Catalog successfully created!"),
            Err(e) => println!("{:#}", e),
        },
        Action::Add(source) | Action::Import(source) => ingest(&config.catalog, source),
    }
}

fn ingest(catalog_path: &Path, source: &Path) {
    let catalog = match Catalog::open(catalog_path) {
        Ok(catalog) => catalog,
        Err(e) => {
            println!("{}", e);
            return;
        }
    };

    println!("Importing from: {}", source.display());
    println!("Catalog: {}", catalog.root().display());
    println!();

    // Create components
    let metadata_extractor = ExifDateExtractor::new();
    let fallback_extractor = ChangeTimeExtractor::new();
    let date_resolver = CaptureDateResolver::new(&metadata_extractor, &fallback_extractor);
    let path_generator = PathGenerator::new();
    let writer = RealCatalogWriter::new(catalog.root());

    let ingester = CatalogIngester::new(&catalog, &date_resolver, &path_generator, &writer);

    match ingester.ingest(source) {
        Ok(result) => {
            println!("✓ Import complete!");
            println!("  Total files: {}", result.total_files);
            println!("  Added: {}", result.ingested_files);
            println!("  Skipped: {}", result.skipped_files);

            if !result.errors.is_empty() {
                println!("\nErrors:");
                for error in &result.errors {
                    println!("  - {}", error);
                }
            }
        }
        Err(e) => println!("✗ Failed to import photos: {:#}", e),
    }
}
