// Library exports for integration tests and external use

pub mod args;
pub mod catalog;
pub mod errors;
pub mod exif;
pub mod file_writer;
pub mod ingester;
pub mod path_generator;
