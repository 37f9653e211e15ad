//! # Placement Module
//!
//! Questo modulo sposta il file ottimizzato scaricato sulla destinazione finale.
//!
//! ## Responsabilità:
//! - Calcola il path finale: l'originale stesso, oppure il sibling
//!   `<stem>-optimised.<ext>`
//! - Rimuove un eventuale file preesistente sulla destinazione (overwrite,
//!   non merge)
//! - Sposta il temporaneo con semantica all-or-nothing: o la destinazione
//!   contiene i nuovi byte, o nulla è cambiato e il fallimento riporta la causa
//!
//! ## Note:
//! Il rename fallisce tra filesystem diversi; il fetcher crea il temporaneo
//! nella directory di destinazione proprio per evitarlo. Se succede comunque
//! (permessi, temp sparito), la causa arriva intatta al coordinatore.

use crate::error::OptimizeError;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

/// Suffix appended to the file stem when not replacing the original
const OPTIMISED_SUFFIX: &str = "-optimised";

/// Moves downloaded results to their final destination
pub struct Placer;

impl Placer {
    /// Compute the final destination for an optimized file.
    ///
    /// `place(temp, "/a/b/photo.png", false)` targets `/a/b/photo-optimised.png`.
    pub fn destination_for(source: &Path, replace_original: bool) -> PathBuf {
        if replace_original {
            return source.to_path_buf();
        }

        let stem = source
            .file_stem()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        let extension = source
            .extension()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();

        source.with_file_name(format!("{}{}.{}", stem, OPTIMISED_SUFFIX, extension))
    }

    /// Move the downloaded temp file into place, overwriting any existing
    /// destination. Returns the final path on success.
    pub async fn place(
        temp: NamedTempFile,
        source: &Path,
        replace_original: bool,
    ) -> Result<PathBuf, OptimizeError> {
        let destination = Self::destination_for(source, replace_original);

        // Overwrite semantics: rimuovi prima la destinazione esistente
        match tokio::fs::remove_file(&destination).await {
            Ok(()) => debug!("Removed pre-existing file at {}", destination.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(OptimizeError::Filesystem(format!(
                    "could not remove existing file {}: {}",
                    destination.display(),
                    e
                )));
            }
        }

        temp.persist(&destination).map_err(|e| {
            OptimizeError::Filesystem(format!(
                "could not move optimized file to {}: {}",
                destination.display(),
                e.error
            ))
        })?;

        debug!("Placed optimized file at {}", destination.display());
        Ok(destination)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn temp_with_content(dir: &TempDir, content: &[u8]) -> NamedTempFile {
        let temp = NamedTempFile::new_in(dir.path()).unwrap();
        std::fs::write(temp.path(), content).unwrap();
        temp
    }

    #[test]
    fn test_destination_naming() {
        assert_eq!(
            Placer::destination_for(Path::new("/a/b/photo.png"), false),
            PathBuf::from("/a/b/photo-optimised.png")
        );
        assert_eq!(
            Placer::destination_for(Path::new("/a/b/photo.png"), true),
            PathBuf::from("/a/b/photo.png")
        );
    }

    #[tokio::test]
    async fn test_place_creates_sibling() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("cat.png");
        std::fs::write(&source, b"original").unwrap();

        let temp = temp_with_content(&dir, b"optimized");
        let placed = Placer::place(temp, &source, false).await.unwrap();

        assert_eq!(placed, dir.path().join("cat-optimised.png"));
        assert_eq!(std::fs::read(&placed).unwrap(), b"optimized");
        // Original untouched
        assert_eq!(std::fs::read(&source).unwrap(), b"original");
    }

    #[tokio::test]
    async fn test_place_replaces_original() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("cat.png");
        std::fs::write(&source, b"original").unwrap();

        let temp = temp_with_content(&dir, b"optimized");
        let placed = Placer::place(temp, &source, true).await.unwrap();

        assert_eq!(placed, source);
        assert_eq!(std::fs::read(&source).unwrap(), b"optimized");
    }

    #[tokio::test]
    async fn test_place_twice_is_idempotent() {
        // Second placement overwrites, never duplicates
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("cat.png");
        std::fs::write(&source, b"original").unwrap();

        let first = temp_with_content(&dir, b"first pass");
        Placer::place(first, &source, true).await.unwrap();

        let second = temp_with_content(&dir, b"second pass");
        Placer::place(second, &source, true).await.unwrap();

        assert_eq!(std::fs::read(&source).unwrap(), b"second pass");
        let entries = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(entries, 1);
    }

    #[tokio::test]
    async fn test_place_overwrites_existing_sibling() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("cat.png");
        std::fs::write(&source, b"original").unwrap();
        std::fs::write(dir.path().join("cat-optimised.png"), b"stale").unwrap();

        let temp = temp_with_content(&dir, b"fresh");
        let placed = Placer::place(temp, &source, false).await.unwrap();

        assert_eq!(std::fs::read(&placed).unwrap(), b"fresh");
    }
}
