//! # File Validation Module
//!
//! Questo modulo decide se un file droppato può diventare un job.
//!
//! ## Responsabilità:
//! - Controlla l'estensione contro il set supportato dal servizio
//! - Controlla la dimensione contro il limite di upload (5 MB)
//! - Produce reason string leggibili per la UI
//!
//! ## Formati supportati:
//! - **Immagini**: JPG, JPEG, PNG, GIF (case-insensitive)
//!
//! ## Policy sulla dimensione:
//! Se lo stat del file fallisce (file sparito tra drop e validazione), la
//! dimensione viene trattata come 0 e il file passa il controllo. È la
//! policy permissiva dell'app originale, mantenuta deliberatamente.
//!
//! ## Esempio:
//! ```rust
//! # use resmush_drop::{FileValidator, Validity};
//! # async fn example(path: std::path::PathBuf) {
//! match FileValidator::validate(&path).await {
//!     Validity::Valid { size } => { /* admit */ }
//!     Validity::Invalid { reason } => { /* surface reason */ }
//! }
//! # }
//! ```

use std::path::Path;
use tracing::debug;

/// Extensions accepted by the optimization service
pub const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif"];

/// Upload size ceiling in bytes
pub const MAX_FILE_SIZE: u64 = 5_000_000;

/// Outcome of admission checking
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validity {
    Valid { size: u64 },
    Invalid { reason: String },
}

impl Validity {
    pub fn is_valid(&self) -> bool {
        matches!(self, Validity::Valid { .. })
    }
}

/// Pure admission check, no side effects beyond a metadata read
pub struct FileValidator;

impl FileValidator {
    /// Check whether a dropped file is eligible for optimization.
    ///
    /// A missing or unreadable size is treated as 0 and passes the ceiling
    /// check; only the extension can reject such a file.
    pub async fn validate(path: &Path) -> Validity {
        let name = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();

        let extension = path
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
            return Validity::Invalid {
                reason: format!(
                    "Invalid file: {}. Only JPEG, PNG, GIF are allowed.",
                    name
                ),
            };
        }

        // Stat fallito => dimensione 0 (policy permissiva)
        let size = match tokio::fs::metadata(path).await {
            Ok(metadata) => metadata.len(),
            Err(e) => {
                debug!("Could not stat {}: {} (treating size as 0)", path.display(), e);
                0
            }
        };

        if size > MAX_FILE_SIZE {
            return Validity::Invalid {
                reason: format!(
                    "Invalid file: {}. Size {} bytes exceeds the 5 MB limit.",
                    name, size
                ),
            };
        }

        Validity::Valid { size }
    }
}
