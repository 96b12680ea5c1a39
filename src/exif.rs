use anyhow::{bail, Context, Result};
use chrono::{DateTime, Local, NaiveDate};
use exif::{In, Tag, Value};
use std::fmt;
use std::fs::{self, File, Metadata};
use std::io::BufReader;
use std::path::{is_separator, Path};

/// Year, month and day as written in the metadata, used verbatim as
/// directory names. "2020:5:7" stays "2020/5/7".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureDate {
    year: String,
    month: String,
    day: String,
}

impl CaptureDate {
    /// Parses the date portion of an EXIF timestamp: "YYYY:MM:DD HH:MM:SS".
    /// Everything before the first space is split on ':' into exactly three
    /// parts; no calendar validation and no timezone handling.
    pub fn parse(value: &str) -> Result<Self> {
        let date_part = value.split(' ').next().unwrap_or_default();
        if date_part.trim().is_empty() {
            bail!("Blank EXIF date");
        }

        let parts: Vec<&str> = date_part.split(':').collect();
        let [year, month, day] = parts.as_slice() else {
            bail!("Invalid EXIF date format: {}", date_part);
        };

        for part in [year, month, day] {
            // Each part becomes a directory name under the catalog root
            if part.trim().is_empty()
                || *part == "."
                || *part == ".."
                || part.contains(is_separator)
            {
                bail!("Invalid EXIF date format: {}", date_part);
            }
        }

        Ok(Self {
            year: year.to_string(),
            month: month.to_string(),
            day: day.to_string(),
        })
    }

    pub fn year(&self) -> &str {
        &self.year
    }

    pub fn month(&self) -> &str {
        &self.month
    }

    pub fn day(&self) -> &str {
        &self.day
    }
}

impl From<NaiveDate> for CaptureDate {
    fn from(date: NaiveDate) -> Self {
        Self {
            year: date.format("%Y").to_string(),
            month: date.format("%m").to_string(),
            day: date.format("%d").to_string(),
        }
    }
}

impl fmt::Display for CaptureDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.year, self.month, self.day)
    }
}

/// Trait for extracting a capture date from a file on disk
/// Following Dependency Inversion Principle - depend on abstraction
#[cfg_attr(test, mockall::automock)]
pub trait DateExtractor {
    fn extract_date(&self, path: &Path) -> Result<CaptureDate>;
}

/// Reads the EXIF DateTimeOriginal tag
pub struct ExifDateExtractor;

impl ExifDateExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl DateExtractor for ExifDateExtractor {
    fn extract_date(&self, path: &Path) -> Result<CaptureDate> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open file: {}", path.display()))?;
        let mut reader = BufReader::new(file);

        let exif_data = exif::Reader::new()
            .read_from_container(&mut reader)
            .context("Failed to read EXIF data from image")?;

        let date_field = exif_data
            .get_field(Tag::DateTimeOriginal, In::PRIMARY)
            .context("No DateTimeOriginal field found in EXIF data")?;

        // Use the raw ASCII value; display_value() reformats dates
        let raw = match date_field.value {
            Value::Ascii(ref strings) => match strings.first() {
                Some(bytes) => String::from_utf8_lossy(bytes).into_owned(),
                None => bail!("Empty DateTimeOriginal value"),
            },
            _ => bail!("DateTimeOriginal is not an ASCII value"),
        };

        CaptureDate::parse(&raw)
    }
}

/// Falls back to the filesystem status-change time, in local time
pub struct ChangeTimeExtractor;

impl ChangeTimeExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl DateExtractor for ChangeTimeExtractor {
    fn extract_date(&self, path: &Path) -> Result<CaptureDate> {
        let metadata = fs::metadata(path)
            .with_context(|| format!("Failed to stat file: {}", path.display()))?;

        Ok(change_time(&metadata)?.date_naive().into())
    }
}

#[cfg(unix)]
fn change_time(metadata: &Metadata) -> Result<DateTime<Local>> {
    use std::os::unix::fs::MetadataExt;

    let utc = DateTime::from_timestamp(metadata.ctime(), metadata.ctime_nsec() as u32)
        .context("Change time out of range")?;
    Ok(utc.with_timezone(&Local))
}

#[cfg(not(unix))]
fn change_time(metadata: &Metadata) -> Result<DateTime<Local>> {
    let time = metadata
        .created()
        .or_else(|_| metadata.modified())
        .context("No filesystem timestamp available")?;
    Ok(DateTime::<Local>::from(time))
}

/// Where a resolved capture date came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateSource {
    Metadata,
    ChangeTime,
}

/// Metadata first, change time when no usable tag exists
pub struct CaptureDateResolver<'a> {
    metadata: &'a dyn DateExtractor,
    fallback: &'a dyn DateExtractor,
}

impl<'a> CaptureDateResolver<'a> {
    pub fn new(metadata: &'a dyn DateExtractor, fallback: &'a dyn DateExtractor) -> Self {
        Self { metadata, fallback }
    }

    pub fn resolve(&self, path: &Path) -> Result<(CaptureDate, DateSource)> {
        match self.metadata.extract_date(path) {
            Ok(date) => Ok((date, DateSource::Metadata)),
            Err(e) => {
                log::debug!("{}: no usable capture tag ({:#})", path.display(), e);
                let date = self
                    .fallback
                    .extract_date(path)
                    .context("unresolvable capture date")?;
                Ok((date, DateSource::ChangeTime))
            }
        }
    }
}

/// Minimal JPEG: SOI followed by an APP1 segment whose Exif IFD holds
/// a single DateTimeOriginal entry.
#[cfg(test)]
pub(crate) fn jpeg_with_capture_date(date_time: &str) -> Vec<u8> {
    let mut value = date_time.as_bytes().to_vec();
    value.push(0);
    assert!(value.len() > 4, "value must not fit inline");

    let mut tiff = Vec::new();
    tiff.extend_from_slice(b"MM\0\x2a");
    tiff.extend_from_slice(&8u32.to_be_bytes());
    // IFD0 at 8: ExifIFDPointer -> 26
    tiff.extend_from_slice(&1u16.to_be_bytes());
    tiff.extend_from_slice(&0x8769u16.to_be_bytes());
    tiff.extend_from_slice(&4u16.to_be_bytes());
    tiff.extend_from_slice(&1u32.to_be_bytes());
    tiff.extend_from_slice(&26u32.to_be_bytes());
    tiff.extend_from_slice(&0u32.to_be_bytes());
    // Exif IFD at 26: DateTimeOriginal -> 44
    tiff.extend_from_slice(&1u16.to_be_bytes());
    tiff.extend_from_slice(&0x9003u16.to_be_bytes());
    tiff.extend_from_slice(&2u16.to_be_bytes());
    tiff.extend_from_slice(&(value.len() as u32).to_be_bytes());
    tiff.extend_from_slice(&44u32.to_be_bytes());
    tiff.extend_from_slice(&0u32.to_be_bytes());
    tiff.extend_from_slice(&value);

    let mut jpeg = vec![0xFF, 0xD8, 0xFF, 0xE1];
    jpeg.extend_from_slice(&((2 + 6 + tiff.len()) as u16).to_be_bytes());
    jpeg.extend_from_slice(b"Exif\0\0");
    jpeg.extend_from_slice(&tiff);
    jpeg.extend_from_slice(&[0xFF, 0xD9]);
    jpeg
}
