//! # Job Model Module
//!
//! Record e macchina a stati di un singolo job di ottimizzazione.
//! Un job nasce all'ammissione, attraversa gli stage della pipeline e
//! raggiunge esattamente uno stato terminale, esattamente una volta.

use serde::Serialize;
use std::path::PathBuf;

/// Identità stabile di un job, assegnata all'ammissione.
///
/// La UI renderizza per id, mai per ordine di completamento.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct JobId(pub usize);

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Stati della pipeline per un job.
///
/// `Pending → Uploading → AwaitingDownload → Placing → Done`, con `Failed`
/// raggiungibile da ogni stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    Pending,
    Uploading,
    AwaitingDownload,
    Placing,
    Done,
    Failed,
}

impl JobState {
    /// Terminale: nessuna ulteriore transizione.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Done | JobState::Failed)
    }

    /// Etichetta per la UI.
    pub fn describe(&self) -> &'static str {
        match self {
            JobState::Pending => "pending",
            JobState::Uploading => "uploading",
            JobState::AwaitingDownload => "awaiting download",
            JobState::Placing => "placing",
            JobState::Done => "done",
            JobState::Failed => "failed",
        }
    }
}

/// Unità di lavoro che traccia un file droppato lungo la pipeline.
///
/// `quality` e `replace_original` sono copie catturate all'ammissione:
/// cambi di configurazione successivi non toccano i job in volo.
#[derive(Debug, Clone, Serialize)]
pub struct OptimizationJob {
    pub id: JobId,
    pub source_path: PathBuf,
    pub quality: u8,
    pub replace_original: bool,
    pub state: JobState,
    pub result_path: Option<PathBuf>,
    pub error_reason: Option<String>,
}

impl OptimizationJob {
    pub fn new(id: JobId, source_path: PathBuf, quality: u8, replace_original: bool) -> Self {
        Self {
            id,
            source_path,
            quality,
            replace_original,
            state: JobState::Pending,
            result_path: None,
            error_reason: None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }
}
