//! # Job Runner Module
//!
//! Worker per la catena asincrona di un singolo job.
//! Separato dal coordinatore per maggiore modularità: upload → download →
//! placement in sequenza, con ogni transizione riportata allo StatusBoard.

use crate::{client::OptimizationClient, error::OptimizeError, fetcher::ResultFetcher, placer::Placer};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info};

use super::job::{JobState, OptimizationJob};
use super::tracker::StatusBoard;

/// Runs one job's chain to a terminal state.
pub(crate) struct JobRunner {
    client: OptimizationClient,
    fetcher: ResultFetcher,
    board: Arc<StatusBoard>,
}

impl JobRunner {
    pub(crate) fn new(
        client: OptimizationClient,
        fetcher: ResultFetcher,
        board: Arc<StatusBoard>,
    ) -> Self {
        Self {
            client,
            fetcher,
            board,
        }
    }

    /// Esegue la catena e chiude il job. Ogni fallimento viene catturato al
    /// confine dello stage; niente esce da qui come panic.
    pub(crate) async fn run(self, job: OptimizationJob) {
        let outcome = self.process(&job).await;

        match &outcome {
            Ok(final_path) => info!(
                "[OK] {} -> {}",
                job.source_path.display(),
                final_path.display()
            ),
            Err(e) => error!("[FAIL] {}: {}", job.source_path.display(), e),
        }

        self.board.complete(job.id, outcome).await;
    }

    async fn process(&self, job: &OptimizationJob) -> Result<PathBuf, OptimizeError> {
        self.board.set_state(job.id, JobState::Uploading).await;
        let result_url = self.client.optimize(&job.source_path, job.quality).await?;

        self.board.set_state(job.id, JobState::AwaitingDownload).await;
        // Temp accanto alla destinazione: il rename finale resta sullo
        // stesso filesystem
        let dest_dir = job.source_path.parent().unwrap_or_else(|| Path::new("."));
        let temp = self.fetcher.fetch(&result_url, dest_dir).await?;

        self.board.set_state(job.id, JobState::Placing).await;
        Placer::place(temp, &job.source_path, job.replace_original).await
    }
}
