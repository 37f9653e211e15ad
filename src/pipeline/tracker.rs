//! # Status Board Module
//!
//! Unico punto di serializzazione per job table e contatori aggregati.
//! Ogni mutazione avviene sotto un solo lock e pubblica subito uno snapshot
//! sul canale `watch`, così il renderer non vede mai stati intermedi.

use crate::error::OptimizeError;
use crate::progress::{PipelineSnapshot, RejectedFile};
use std::path::PathBuf;
use tokio::sync::{watch, Mutex};
use tracing::{debug, warn};

use super::job::{JobId, JobState, OptimizationJob};

/// Owns the job table; sole mutator of shared progress state.
pub struct StatusBoard {
    inner: Mutex<BoardInner>,
    updates: watch::Sender<PipelineSnapshot>,
}

#[derive(Default)]
struct BoardInner {
    jobs: Vec<OptimizationJob>,
    rejected: Vec<RejectedFile>,
    processed: usize,
}

impl BoardInner {
    fn snapshot(&self) -> PipelineSnapshot {
        PipelineSnapshot {
            jobs: self.jobs.clone(),
            rejected: self.rejected.clone(),
            processed: self.processed,
            total: self.jobs.len(),
        }
    }
}

impl StatusBoard {
    pub fn new() -> Self {
        let (updates, _) = watch::channel(PipelineSnapshot::default());
        Self {
            inner: Mutex::new(BoardInner::default()),
            updates,
        }
    }

    /// Canale di notifica per il layer di rendering.
    pub fn subscribe(&self) -> watch::Receiver<PipelineSnapshot> {
        self.updates.subscribe()
    }

    /// Fotografia corrente.
    pub async fn snapshot(&self) -> PipelineSnapshot {
        self.inner.lock().await.snapshot()
    }

    /// Ammette un file validato: crea il job in stato `Pending` e ne
    /// restituisce il record. Il totale cresce di uno.
    pub async fn admit(
        &self,
        source_path: PathBuf,
        quality: u8,
        replace_original: bool,
    ) -> OptimizationJob {
        let mut inner = self.inner.lock().await;
        let id = JobId(inner.jobs.len());
        let job = OptimizationJob::new(id, source_path, quality, replace_original);
        debug!("Admitted job {} for {}", id, job.source_path.display());
        inner.jobs.push(job.clone());
        self.publish(&inner);
        job
    }

    /// Registra un file rifiutato prima dell'ammissione: nessun job,
    /// il totale non cambia.
    pub async fn reject(&self, path: PathBuf, reason: String) {
        warn!("Rejected {}: {}", path.display(), reason);
        let mut inner = self.inner.lock().await;
        inner.rejected.push(RejectedFile { path, reason });
        self.publish(&inner);
    }

    /// Transizione non terminale di stage. Ignorata se il job è già
    /// terminale (terminale è definitivo).
    pub async fn set_state(&self, id: JobId, state: JobState) {
        let mut inner = self.inner.lock().await;
        if let Some(job) = inner.jobs.get_mut(id.0) {
            if job.state.is_terminal() {
                return;
            }
            debug!("Job {} -> {}", id, state.describe());
            job.state = state;
        }
        self.publish(&inner);
    }

    /// Chiude il job su `Done` o `Failed` e incrementa `processed`
    /// esattamente una volta. Chiamate duplicate vengono ignorate.
    pub async fn complete(&self, id: JobId, outcome: Result<PathBuf, OptimizeError>) {
        let mut inner = self.inner.lock().await;
        let Some(job) = inner.jobs.get_mut(id.0) else {
            return;
        };
        if job.state.is_terminal() {
            debug!("Ignoring duplicate completion for job {}", id);
            return;
        }

        match outcome {
            Ok(final_path) => {
                job.state = JobState::Done;
                job.result_path = Some(final_path);
            }
            Err(e) => {
                job.state = JobState::Failed;
                job.error_reason = Some(e.to_string());
            }
        }

        inner.processed += 1;
        self.publish(&inner);
    }

    fn publish(&self, inner: &BoardInner) {
        // send fallisce solo senza receiver; lo snapshot resta comunque
        // disponibile via snapshot()
        let _ = self.updates.send(inner.snapshot());
    }
}

impl Default for StatusBoard {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_admit_grows_total_only() {
        let board = StatusBoard::new();
        board.admit(PathBuf::from("/a/cat.png"), 80, false).await;

        let snapshot = board.snapshot().await;
        assert_eq!(snapshot.total, 1);
        assert_eq!(snapshot.processed, 0);
    }

    #[tokio::test]
    async fn test_reject_never_counts_toward_total() {
        let board = StatusBoard::new();
        board
            .reject(PathBuf::from("/a/huge.png"), "too big".to_string())
            .await;

        let snapshot = board.snapshot().await;
        assert_eq!(snapshot.total, 0);
        assert_eq!(snapshot.processed, 0);
        assert_eq!(snapshot.rejected.len(), 1);
    }

    #[tokio::test]
    async fn test_complete_increments_processed_once() {
        let board = StatusBoard::new();
        let job = board.admit(PathBuf::from("/a/cat.png"), 80, false).await;

        board.complete(job.id, Ok(PathBuf::from("/a/cat-optimised.png"))).await;
        // Chiamata duplicata: deve essere ignorata
        board.complete(job.id, Ok(PathBuf::from("/a/other.png"))).await;

        let snapshot = board.snapshot().await;
        assert_eq!(snapshot.processed, 1);
        assert_eq!(snapshot.jobs[0].state, JobState::Done);
        assert_eq!(
            snapshot.jobs[0].result_path.as_deref(),
            Some(std::path::Path::new("/a/cat-optimised.png"))
        );
    }

    #[tokio::test]
    async fn test_failure_still_counts_as_processed() {
        let board = StatusBoard::new();
        let job = board.admit(PathBuf::from("/a/cat.png"), 80, false).await;

        board
            .complete(job.id, Err(OptimizeError::Network("upload failed".to_string())))
            .await;

        let snapshot = board.snapshot().await;
        assert_eq!(snapshot.processed, 1);
        assert_eq!(snapshot.jobs[0].state, JobState::Failed);
        assert!(snapshot.jobs[0]
            .error_reason
            .as_deref()
            .unwrap()
            .contains("upload failed"));
    }

    #[tokio::test]
    async fn test_terminal_state_is_final() {
        let board = StatusBoard::new();
        let job = board.admit(PathBuf::from("/a/cat.png"), 80, false).await;

        board.complete(job.id, Ok(PathBuf::from("/a/out.png"))).await;
        board.set_state(job.id, JobState::Uploading).await;

        let snapshot = board.snapshot().await;
        assert_eq!(snapshot.jobs[0].state, JobState::Done);
    }

    #[tokio::test]
    async fn test_completion_order_does_not_matter() {
        let board = StatusBoard::new();
        let first = board.admit(PathBuf::from("/a/one.png"), 80, false).await;
        let second = board.admit(PathBuf::from("/a/two.png"), 80, false).await;

        // Il secondo finisce prima del primo
        board.complete(second.id, Ok(PathBuf::from("/a/two-optimised.png"))).await;
        board
            .complete(first.id, Err(OptimizeError::Network("timeout".to_string())))
            .await;

        let snapshot = board.snapshot().await;
        assert_eq!(snapshot.processed, 2);
        assert_eq!(snapshot.total, 2);
        // L'ordine di rendering resta quello di ammissione
        assert_eq!(snapshot.jobs[0].id, first.id);
        assert_eq!(snapshot.jobs[1].id, second.id);
    }

    #[tokio::test]
    async fn test_watch_channel_sees_updates() {
        let board = StatusBoard::new();
        let mut updates = board.subscribe();

        board.admit(PathBuf::from("/a/cat.png"), 80, false).await;

        updates.changed().await.unwrap();
        let snapshot = updates.borrow_and_update().clone();
        assert_eq!(snapshot.total, 1);
    }
}
