//! # Pipeline Module
//!
//! Modulo che separa le responsabilità della pipeline in sottomoduli:
//! - `coordinator`: Orchestratore e ammissione dei batch
//! - `job`: Record e macchina a stati per-job
//! - `job_runner`: Worker per la catena di un singolo job
//! - `tracker`: Punto unico di serializzazione dello stato condiviso

pub mod coordinator;
pub mod job;
pub(crate) mod job_runner;
pub mod tracker;

// Re-export delle struct principali
pub use coordinator::PipelineCoordinator;
pub use job::{JobId, JobState, OptimizationJob};
pub use tracker::StatusBoard;
