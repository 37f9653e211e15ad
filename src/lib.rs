//! # reSmush Drop Library
//!
//! Questo è il modulo principale della libreria che espone tutte le API pubbliche.
//!
//! ## Responsabilità:
//! - Definisce la struttura modulare dell'applicazione
//! - Espone i tipi e le funzioni principali tramite re-exports
//! - Fornisce un'interfaccia pulita per il main.rs e per il layer di rendering
//!
//! ## Architettura dei moduli:
//! - `config`: Gestione configurazione, persistence e valori live della UI
//! - `error`: Tipi di errore custom per le diverse fasi della pipeline
//! - `validator`: Ammissione dei file droppati (estensione, dimensione)
//! - `client`: Upload multipart verso il servizio di ottimizzazione remoto
//! - `fetcher`: Download dell'asset ottimizzato su file temporaneo
//! - `placer`: Spostamento atomico sulla destinazione finale
//! - `pipeline`: Coordinatore, job, worker e stato condiviso
//! - `progress`: Snapshot per il rendering e progress bar
//!
//! ## Utilizzo:
//! ```rust,no_run
//! use resmush_drop::{Config, PipelineCoordinator};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let coordinator = PipelineCoordinator::new(Config::default())?;
//! let mut updates = coordinator.subscribe();
//! coordinator.drop_files(&[ "photo.png".into() ]).await;
//! coordinator.wait_idle().await;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod pipeline;
pub mod placer;
pub mod progress;
pub mod validator;

pub use client::OptimizationClient;
pub use config::{Config, LiveSettings, DEFAULT_ENDPOINT};
pub use error::OptimizeError;
pub use fetcher::ResultFetcher;
pub use pipeline::{JobId, JobState, OptimizationJob, PipelineCoordinator};
pub use placer::Placer;
pub use progress::{PipelineSnapshot, ProgressRenderer, RejectedFile};
pub use validator::{FileValidator, Validity, ALLOWED_EXTENSIONS, MAX_FILE_SIZE};
