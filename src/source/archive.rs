use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use tracing::{debug, info};

use super::chunks::Batches;
use crate::error::SourceError;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

enum Container {
    Zip {
        archive: zip::ZipArchive<BufReader<File>>,
        entry: usize,
    },
    /// Taken by the first call to [`FlightArchive::batches`].
    Gzip(Option<BufReader<File>>),
}

/// An opened `.zip` or `.gz` archive holding a single flights CSV.
///
/// The file handle lives as long as this value; dropping it closes the file.
pub struct FlightArchive {
    path: PathBuf,
    entry_name: String,
    container: Container,
    consumed: bool,
}

impl FlightArchive {
    /// Opens the archive and locates its CSV entry.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Archive`] if the file is missing, is not a
    /// readable zip/gzip archive, or contains no CSV file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| SourceError::archive(path, e.to_string()))?;
        let mut reader = BufReader::new(file);

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        let (entry_name, container) = match extension.as_str() {
            "zip" => {
                let mut archive = zip::ZipArchive::new(reader)
                    .map_err(|e| SourceError::archive(path, e.to_string()))?;
                let (entry, name) = find_csv_entry(&mut archive)
                    .ok_or_else(|| SourceError::archive(path, "no CSV file inside archive"))?;
                (name, Container::Zip { archive, entry })
            }
            "gz" => {
                let head = reader.fill_buf()?;
                if !head.starts_with(&GZIP_MAGIC) {
                    return Err(SourceError::archive(path, "not a gzip stream"));
                }
                let name = path
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_default();
                (name, Container::Gzip(Some(reader)))
            }
            other => {
                return Err(SourceError::archive(
                    path,
                    format!("unsupported archive type `{other}` (expected zip or gz)"),
                ));
            }
        };

        info!(path = %path.display(), entry = %entry_name, "Opened flights archive");

        Ok(FlightArchive {
            path: path.to_path_buf(),
            entry_name,
            container,
            consumed: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Name of the CSV inside the archive.
    pub fn entry_name(&self) -> &str {
        &self.entry_name
    }

    /// Starts the single pass over the CSV, validating its header row.
    ///
    /// The archive can only be streamed once.
    ///
    /// # Errors
    ///
    /// [`SourceError::Format`] if a required column is absent,
    /// [`SourceError::Archive`] if the entry cannot be read or was already
    /// streamed.
    pub fn batches(
        &mut self,
        batch_size: NonZeroUsize,
        delimiter: u8,
    ) -> Result<Batches<'_>, SourceError> {
        if self.consumed {
            return Err(SourceError::archive(&self.path, "archive already streamed"));
        }
        self.consumed = true;

        let reader: Box<dyn Read + '_> = match &mut self.container {
            Container::Zip { archive, entry } => {
                let file = archive
                    .by_index(*entry)
                    .map_err(|e| SourceError::archive(&self.path, e.to_string()))?;
                Box::new(file)
            }
            Container::Gzip(reader) => {
                let reader = reader
                    .take()
                    .ok_or_else(|| SourceError::archive(&self.path, "archive already streamed"))?;
                Box::new(GzDecoder::new(reader))
            }
        };

        debug!(entry = %self.entry_name, batch_size = batch_size.get(), "Streaming CSV entry");
        Batches::from_reader(reader, batch_size, delimiter)
    }
}

/// First regular `.csv` entry, skipping directories and macOS resource forks.
fn find_csv_entry(archive: &mut zip::ZipArchive<BufReader<File>>) -> Option<(usize, String)> {
    (0..archive.len()).find_map(|i| {
        let entry = archive.by_index_raw(i).ok()?;
        let name = entry.name().to_string();
        let is_csv = name.to_ascii_lowercase().ends_with(".csv");
        if entry.is_dir() || name.starts_with("__MACOSX/") || !is_csv {
            return None;
        }
        Some((i, name))
    })
}
