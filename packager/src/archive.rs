//! Deterministic zip archive writing.
//!
//! The archive is assembled in a temporary file inside the output directory
//! and renamed over `<name>.zip` only once it is complete, so the final path
//! never holds a partial archive. The temporary file is deleted when any
//! step fails.

use crate::scanner::SkillPackage;
use camino::{Utf8Path, Utf8PathBuf};
use log::{info, trace};
use sha2::{Digest, Sha256};
use std::fmt;
use std::fs;
use std::io::{self, Read};
use tempfile::NamedTempFile;
use thiserror::Error;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

/// Extension appended to the skill name to form the archive file name.
pub const ARCHIVE_EXTENSION: &str = "zip";

/// Errors raised while writing or hashing an archive.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// The output directory could not be created.
    #[error("failed to create output directory {path}: {source}")]
    CreateOutputDir {
        /// The output directory.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// A file could not be read or written.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// Path being read or written.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The zip encoder failed.
    #[error("failed to encode {path}: {source}")]
    Zip {
        /// Archive entry or file being encoded.
        path: String,
        /// Underlying zip error.
        source: zip::result::ZipError,
    },

    /// The finished archive could not be moved into place.
    #[error("failed to move archive into place at {path}: {source}")]
    Persist {
        /// The final archive path.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
}

/// Result type alias using [`ArchiveError`].
pub type Result<T> = std::result::Result<T, ArchiveError>;

/// Lowercase hex SHA-256 digest of a file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Sha256Digest(String);

impl fmt::Display for Sha256Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Return the path `write_archive` would produce for `name` in `output_dir`.
#[must_use]
pub fn archive_path(output_dir: &Utf8Path, name: &str) -> Utf8PathBuf {
    output_dir.join(format!("{name}.{ARCHIVE_EXTENSION}"))
}

/// Write every file in `package` to `<output_dir>/<name>.zip`.
///
/// Entries are stored in the package's sorted order, deflate-compressed,
/// and stamped with the zip epoch (1980-01-01 00:00), so packaging the same
/// tree twice yields identical bytes. The output directory is created when
/// missing. An existing archive at the final path is replaced.
///
/// # Errors
///
/// Returns [`ArchiveError`] when the output directory cannot be created, a
/// source file cannot be read, encoding fails, or the finished archive
/// cannot be renamed into place. No file is left at the final path in any
/// of these cases.
pub fn write_archive(package: &SkillPackage, output_dir: &Utf8Path) -> Result<Utf8PathBuf> {
    fs::create_dir_all(output_dir).map_err(|source| ArchiveError::CreateOutputDir {
        path: output_dir.to_owned(),
        source,
    })?;

    let final_path = archive_path(output_dir, package.name());
    let temp_file = NamedTempFile::new_in(output_dir).map_err(|source| ArchiveError::Io {
        path: output_dir.to_owned(),
        source,
    })?;

    let mut writer = ZipWriter::new(temp_file);
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(DateTime::default());

    for file in package.files() {
        let entry_name = package.entry_name(file);
        trace!("adding {entry_name}");
        writer
            .start_file(entry_name.as_str(), options)
            .map_err(|source| ArchiveError::Zip {
                path: entry_name.clone(),
                source,
            })?;
        let mut source_file = fs::File::open(&file.source).map_err(|source| ArchiveError::Io {
            path: file.source.clone(),
            source,
        })?;
        io::copy(&mut source_file, &mut writer).map_err(|source| ArchiveError::Io {
            path: file.source.clone(),
            source,
        })?;
    }

    let temp_file = writer.finish().map_err(|source| ArchiveError::Zip {
        path: final_path.to_string(),
        source,
    })?;
    temp_file
        .as_file()
        .sync_all()
        .map_err(|source| ArchiveError::Io {
            path: final_path.clone(),
            source,
        })?;
    temp_file
        .persist(&final_path)
        .map_err(|error| ArchiveError::Persist {
            path: final_path.clone(),
            source: error.error,
        })?;

    info!(
        "wrote {} with {} file(s)",
        final_path,
        package.files().len()
    );
    Ok(final_path)
}

/// Compute the SHA-256 digest of the file at `path`.
///
/// # Errors
///
/// Returns [`ArchiveError::Io`] if the file cannot be read.
pub fn compute_sha256(path: &Utf8Path) -> Result<Sha256Digest> {
    let read_error = |source: io::Error| ArchiveError::Io {
        path: path.to_owned(),
        source,
    };
    let mut file = fs::File::open(path).map_err(read_error)?;
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 8192];
    loop {
        let bytes_read = file.read(&mut buffer).map_err(read_error)?;
        let Some(chunk) = buffer.get(..bytes_read).filter(|chunk| !chunk.is_empty()) else {
            break;
        };
        hasher.update(chunk);
    }
    Ok(Sha256Digest(format!("{:x}", hasher.finalize())))
}

#[cfg(test)]
#[path = "archive_tests.rs"]
mod tests;
