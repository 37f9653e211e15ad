//! # Optimization Client Module
//!
//! Questo modulo parla con l'endpoint HTTP del servizio di ottimizzazione.
//!
//! ## Responsabilità:
//! - Costruisce la richiesta multipart verso l'endpoint remoto
//! - Aggiunge il parametro query `qlty` (0-100)
//! - Parsa la risposta JSON ed estrae l'URL del risultato (`dest`)
//!
//! ## Wire format:
//! - `POST <endpoint>?qlty=<q>`, `Content-Type: multipart/form-data`
//! - Una sola part `files`, filename originale, bytes raw come
//!   `application/octet-stream`
//! - Il boundary multipart è un token random generato da reqwest per ogni
//!   form, unico per richiesta
//!
//! ## Policy:
//! - Un tentativo per chiamata, nessun retry automatico: la decisione spetta
//!   al coordinatore
//! - Qualsiasi forma diversa da `{"dest": "<url>"}` è un fallimento, con il
//!   testo dell'errore sottostante preservato

use crate::error::OptimizeError;
use reqwest::Url;
use std::path::Path;
use tracing::debug;

/// Client for the remote optimization endpoint
#[derive(Clone)]
pub struct OptimizationClient {
    http: reqwest::Client,
    endpoint: String,
}

impl OptimizationClient {
    /// Create a client for the given endpoint
    pub fn new(http: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
        }
    }

    /// Upload a file for optimization and return the URL of the result.
    ///
    /// One attempt, no retries; network and response failures carry the
    /// underlying error text.
    pub async fn optimize(&self, path: &Path, quality: u8) -> Result<Url, OptimizeError> {
        let file_name = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();

        let bytes = tokio::fs::read(path).await?;
        debug!(
            "Uploading {} ({} bytes) with quality {}",
            file_name,
            bytes.len(),
            quality
        );

        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name)
            .mime_str("application/octet-stream")
            .map_err(|e| OptimizeError::Network(format!("invalid upload part: {}", e)))?;
        let form = reqwest::multipart::Form::new().part("files", part);

        let response = self
            .http
            .post(&self.endpoint)
            .query(&[("qlty", quality)])
            .multipart(form)
            .send()
            .await
            .map_err(|e| OptimizeError::Network(format!("upload failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| OptimizeError::Network(format!("could not read response: {}", e)))?;
        debug!("Service answered {} with {} bytes", status, body.len());

        parse_dest(&body)
    }
}

/// Estrae e valida il campo `dest` dal body JSON della risposta.
pub(crate) fn parse_dest(body: &str) -> Result<Url, OptimizeError> {
    let value: serde_json::Value = serde_json::from_str(body)
        .map_err(|e| OptimizeError::Response(format!("response is not JSON: {}", e)))?;

    let dest = value
        .get("dest")
        .and_then(|d| d.as_str())
        .ok_or_else(|| OptimizeError::Response("missing 'dest' field in response".to_string()))?;

    if dest.is_empty() {
        return Err(OptimizeError::Response("empty 'dest' field".to_string()));
    }

    Url::parse(dest)
        .map_err(|e| OptimizeError::Response(format!("'dest' is not a valid URL: {}", e)))
}
