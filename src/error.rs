//! # Error Types Module
//!
//! Questo modulo definisce tutti i tipi di errore custom dell'applicazione.
//!
//! ## Responsabilità:
//! - Definisce `OptimizeError` enum per categorizzare tutti gli errori possibili
//! - Fornisce messaggi di errore descrittivi e strutturati
//! - Integra con `thiserror` per automatic error conversion
//! - Ogni fallimento mantiene il testo dell'errore sottostante per diagnostica
//!
//! ## Categorie di errori:
//! - `Io`: Errori di I/O (file non trovati, permessi, etc.)
//! - `Validation`: File rifiutato prima dell'ammissione (estensione, dimensione)
//! - `Network`: Errori di trasporto durante upload o download
//! - `Response`: Risposta del servizio malformata (JSON non valido, campo mancante)
//! - `Filesystem`: Errori durante lo spostamento del file ottimizzato
//!
//! ## Policy di propagazione:
//! Ogni fallimento viene catturato al confine dello stage e convertito in uno
//! stato terminale `Failed` con reason string; niente attraversa il processo
//! come fault non gestito.
//!
//! ## Esempio:
//! ```rust
//! # use resmush_drop::OptimizeError;
//! # fn check(dest: &str) -> Result<(), OptimizeError> {
//! if dest.is_empty() {
//!     return Err(OptimizeError::Response("empty 'dest' field".to_string()));
//! }
//! # Ok(())
//! # }
//! ```

/// Custom error types for the optimization pipeline
#[derive(thiserror::Error, Debug)]
pub enum OptimizeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File validation error: {0}")]
    Validation(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid service response: {0}")]
    Response(String),

    #[error("Filesystem error: {0}")]
    Filesystem(String),
}
