//! # Result Fetcher Module
//!
//! Scarica l'asset ottimizzato dall'URL di risultato in un file temporaneo.
//!
//! ## Responsabilità:
//! - Download in streaming verso un `NamedTempFile`
//! - Il file temporaneo vive nella directory di destinazione, così il rename
//!   finale resta sullo stesso filesystem
//! - Un download parziale non tocca mai il path finale
//!
//! ## Fallimenti:
//! Qualsiasi errore di trasporto produce `OptimizeError::Network` con la
//! causa preservata; il temporaneo viene eliminato automaticamente al drop.

use crate::error::OptimizeError;
use futures::StreamExt;
use reqwest::Url;
use std::path::Path;
use tempfile::NamedTempFile;
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// Downloads optimized assets to temporary files
#[derive(Clone)]
pub struct ResultFetcher {
    http: reqwest::Client,
}

impl ResultFetcher {
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }

    /// Download `url` into a temp file created inside `dest_dir`.
    ///
    /// The temp file is deleted on drop unless the caller persists it.
    pub async fn fetch(&self, url: &Url, dest_dir: &Path) -> Result<NamedTempFile, OptimizeError> {
        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|e| OptimizeError::Network(format!("download failed: {}", e)))?
            .error_for_status()
            .map_err(|e| OptimizeError::Network(format!("download failed: {}", e)))?;

        let temp = NamedTempFile::new_in(dest_dir)
            .map_err(|e| OptimizeError::Filesystem(format!("could not create temp file: {}", e)))?;

        let mut file = tokio::fs::File::create(temp.path()).await?;
        let mut stream = response.bytes_stream();
        let mut written: u64 = 0;

        while let Some(chunk) = stream.next().await {
            let chunk =
                chunk.map_err(|e| OptimizeError::Network(format!("download interrupted: {}", e)))?;
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;

        debug!("Downloaded {} bytes to {}", written, temp.path().display());
        Ok(temp)
    }
}
