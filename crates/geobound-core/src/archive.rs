//! Zip archive extraction.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use thiserror::Error;

/// Errors raised while extracting an archive.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// The archive could not be opened or is not a zip file.
    #[error("failed to open archive {path:?}: {message}")]
    Open {
        /// Archive path.
        path: PathBuf,
        /// Description of the failure.
        message: String,
    },
    /// An entry could not be read from the archive.
    #[error("failed to read entry {index} of {path:?}: {message}")]
    Entry {
        /// Archive path.
        path: PathBuf,
        /// Zero-based entry index.
        index: usize,
        /// Description of the failure.
        message: String,
    },
    /// An extracted file or directory could not be written.
    #[error("failed to write {path:?}: {source}")]
    Write {
        /// Destination path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
}

/// Extracts every file of `archive` into `dest` and returns the written paths.
///
/// `dest` and any intermediate directories are created as needed and existing
/// files are overwritten. Entries whose names would escape `dest` are skipped.
/// A failure part-way through leaves the files extracted so far in place.
///
/// # Errors
///
/// Returns [`ArchiveError::Open`] if the archive cannot be read,
/// [`ArchiveError::Entry`] for a corrupt entry and [`ArchiveError::Write`]
/// if a file cannot be written.
pub fn extract_archive(archive: &Path, dest: &Path) -> Result<Vec<PathBuf>, ArchiveError> {
    let open_error = |message: String| ArchiveError::Open {
        path: archive.to_path_buf(),
        message,
    };
    let file = File::open(archive).map_err(|e| open_error(e.to_string()))?;
    let mut zip = zip::ZipArchive::new(file).map_err(|e| open_error(e.to_string()))?;

    create_dir(dest)?;
    debug!(
        "Extracting {} entries from {} into {}",
        zip.len(),
        archive.display(),
        dest.display()
    );

    let mut extracted = Vec::new();
    for index in 0..zip.len() {
        let mut entry = zip.by_index(index).map_err(|e| ArchiveError::Entry {
            path: archive.to_path_buf(),
            index,
            message: e.to_string(),
        })?;

        let Some(relative) = entry.enclosed_name().map(Path::to_path_buf) else {
            warn!("Skipping entry with unsafe path: {}", entry.name());
            continue;
        };
        let target = dest.join(relative);

        if entry.is_dir() {
            create_dir(&target)?;
            continue;
        }
        if let Some(parent) = target.parent() {
            create_dir(parent)?;
        }

        let mut out = File::create(&target).map_err(|source| ArchiveError::Write {
            path: target.clone(),
            source,
        })?;
        io::copy(&mut entry, &mut out).map_err(|source| ArchiveError::Write {
            path: target.clone(),
            source,
        })?;
        extracted.push(target);
    }

    Ok(extracted)
}

/// Deletes the archive once its contents are extracted.
///
/// # Errors
///
/// Returns [`ArchiveError::Write`] if the file cannot be removed.
pub fn remove_archive(archive: &Path) -> Result<(), ArchiveError> {
    fs::remove_file(archive).map_err(|source| ArchiveError::Write {
        path: archive.to_path_buf(),
        source,
    })
}

fn create_dir(path: &Path) -> Result<(), ArchiveError> {
    fs::create_dir_all(path).map_err(|source| ArchiveError::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;
    use zip::write::FileOptions;

    fn write_zip(path: &Path, entries: &[(&str, &[u8])]) {
        let mut zip = zip::ZipWriter::new(File::create(path).unwrap());
        for (name, data) in entries {
            if name.ends_with('/') {
                zip.add_directory(*name, FileOptions::default()).unwrap();
            } else {
                zip.start_file(*name, FileOptions::default()).unwrap();
                zip.write_all(data).unwrap();
            }
        }
        zip.finish().unwrap();
    }

    #[test]
    fn test_extract_files_and_directories() {
        let temp_dir = TempDir::new().unwrap();
        let archive = temp_dir.path().join("PAK.zip");
        write_zip(
            &archive,
            &[
                ("PAK_adm0.shp", b"shp"),
                ("PAK_adm0.dbf", b"dbf"),
                ("docs/", b""),
                ("docs/license.txt", b"license"),
            ],
        );

        let dest = temp_dir.path().join("PAK-SHP");
        let extracted = extract_archive(&archive, &dest).unwrap();

        assert_eq!(extracted.len(), 3);
        assert_eq!(fs::read(dest.join("PAK_adm0.shp")).unwrap(), b"shp");
        assert_eq!(fs::read(dest.join("docs/license.txt")).unwrap(), b"license");
    }

    #[test]
    fn test_extract_skips_unsafe_entries() {
        let temp_dir = TempDir::new().unwrap();
        let archive = temp_dir.path().join("evil.zip");
        write_zip(&archive, &[("../escape.txt", b"x"), ("ok.txt", b"y")]);

        let dest = temp_dir.path().join("out");
        let extracted = extract_archive(&archive, &dest).unwrap();

        assert_eq!(extracted, vec![dest.join("ok.txt")]);
        assert!(!temp_dir.path().join("escape.txt").exists());
    }

    #[test]
    fn test_extract_overwrites_existing_files() {
        let temp_dir = TempDir::new().unwrap();
        let archive = temp_dir.path().join("PAK.zip");
        write_zip(&archive, &[("PAK_adm0.shp", b"fresh")]);

        let dest = temp_dir.path().join("PAK-SHP");
        fs::create_dir_all(&dest).unwrap();
        fs::write(dest.join("PAK_adm0.shp"), b"stale contents").unwrap();

        extract_archive(&archive, &dest).unwrap();
        assert_eq!(fs::read(dest.join("PAK_adm0.shp")).unwrap(), b"fresh");
    }

    #[test]
    fn test_extract_rejects_non_zip() {
        let temp_dir = TempDir::new().unwrap();
        let archive = temp_dir.path().join("PAK.zip");
        fs::write(&archive, b"<html>not found</html>").unwrap();

        let err = extract_archive(&archive, &temp_dir.path().join("out")).unwrap_err();
        assert!(matches!(err, ArchiveError::Open { .. }));
    }

    #[test]
    fn test_remove_archive() {
        let temp_dir = TempDir::new().unwrap();
        let archive = temp_dir.path().join("PAK.zip");
        fs::write(&archive, b"zip").unwrap();

        remove_archive(&archive).unwrap();
        assert!(!archive.exists());
        assert!(matches!(
            remove_archive(&archive).unwrap_err(),
            ArchiveError::Write { .. }
        ));
    }
}
