//! # Pipeline Coordinator Module
//!
//! Orchestratore principale: ammissione dei file droppati, scheduling delle
//! catene per-job e stato condiviso verso il layer di rendering.
//!
//! ## Responsabilità:
//! - Valida ogni file droppato prima dell'ammissione
//! - Cattura `quality` e `replace_original` al momento della creazione del job
//! - Lancia una task tokio indipendente per ogni job ammesso (concorrenza
//!   illimitata per batch, semplificazione deliberata)
//! - Espone subscribe/snapshot per il collaboratore UI
//!
//! ## Garanzie:
//! - Ogni job ammesso raggiunge esattamente uno stato terminale una volta sola
//! - `processed` cresce di 1 ad ogni transizione terminale, anche sui
//!   fallimenti: il progresso aggregato raggiunge sempre `total`
//! - Nessun ordine tra job: completano come rete e filesystem decidono

use crate::{
    client::OptimizationClient,
    config::{Config, LiveSettings},
    fetcher::ResultFetcher,
    progress::PipelineSnapshot,
    validator::{FileValidator, Validity},
};
use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use tracing::{debug, error, info};

use super::job_runner::JobRunner;
use super::tracker::StatusBoard;

/// Orchestrates per-file optimization chains and owns all shared state.
pub struct PipelineCoordinator {
    settings: Arc<LiveSettings>,
    client: OptimizationClient,
    fetcher: ResultFetcher,
    board: Arc<StatusBoard>,
    tasks: Mutex<Vec<tokio::task::JoinHandle<()>>>,
}

impl PipelineCoordinator {
    /// Crea il coordinatore a partire dalla configurazione validata.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        let http = reqwest::Client::new();
        let client = OptimizationClient::new(http.clone(), config.api_endpoint.clone());
        let fetcher = ResultFetcher::new(http);

        Ok(Self {
            settings: Arc::new(LiveSettings::from(&config)),
            client,
            fetcher,
            board: Arc::new(StatusBoard::new()),
            tasks: Mutex::new(Vec::new()),
        })
    }

    /// Valori live regolabili dalla UI; i job li catturano all'ammissione.
    pub fn settings(&self) -> &LiveSettings {
        &self.settings
    }

    /// Canale di notifica snapshot per il layer di rendering.
    pub fn subscribe(&self) -> watch::Receiver<PipelineSnapshot> {
        self.board.subscribe()
    }

    /// Fotografia corrente della pipeline.
    pub async fn snapshot(&self) -> PipelineSnapshot {
        self.board.snapshot().await
    }

    /// Accetta un batch di file droppati.
    ///
    /// I file non validi vengono registrati con la loro reason e non
    /// diventano mai job; per ogni job ammesso parte subito una catena
    /// asincrona indipendente.
    pub async fn drop_files(&self, paths: &[PathBuf]) {
        for path in paths {
            match FileValidator::validate(path).await {
                Validity::Valid { size } => {
                    debug!("Validated {} ({} bytes)", path.display(), size);

                    // Copia dei valori live al momento della creazione
                    let quality = self.settings.quality();
                    let replace_original = self.settings.replace_original();

                    let job = self
                        .board
                        .admit(path.clone(), quality, replace_original)
                        .await;

                    let runner = JobRunner::new(
                        self.client.clone(),
                        self.fetcher.clone(),
                        self.board.clone(),
                    );
                    let handle = tokio::spawn(async move {
                        runner.run(job).await;
                    });
                    self.tasks.lock().await.push(handle);
                }
                Validity::Invalid { reason } => {
                    self.board.reject(path.clone(), reason).await;
                }
            }
        }

        let snapshot = self.board.snapshot().await;
        info!(
            "Batch accepted: {} admitted, {} rejected",
            snapshot.total,
            snapshot.rejected.len()
        );
    }

    /// Attende che tutte le catene in volo raggiungano uno stato terminale.
    pub async fn wait_idle(&self) {
        let handles: Vec<_> = {
            let mut tasks = self.tasks.lock().await;
            tasks.drain(..).collect()
        };

        for handle in handles {
            if let Err(e) = handle.await {
                // complete() è già stato chiamato o il job resta non
                // terminale solo in caso di panic del runtime
                error!("Job task panicked: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::JobState;
    use tempfile::TempDir;

    /// Config che punta a un endpoint irraggiungibile: l'upload fallisce
    /// subito con connection refused, senza toccare la rete vera.
    fn unreachable_config() -> Config {
        Config {
            quality: 80,
            replace_original: false,
            api_endpoint: "http://127.0.0.1:9/ws.php".to_string(),
        }
    }

    fn write_png(dir: &TempDir, name: &str, len: u64) -> PathBuf {
        let path = dir.path().join(name);
        let file = std::fs::File::create(&path).unwrap();
        file.set_len(len).unwrap();
        path
    }

    #[tokio::test]
    async fn test_oversized_file_rejected_small_file_admitted() {
        let dir = TempDir::new().unwrap();
        let cat = write_png(&dir, "cat.png", 3_000_000);
        let huge = write_png(&dir, "huge.png", 6_000_000);

        let coordinator = PipelineCoordinator::new(unreachable_config()).unwrap();
        coordinator.drop_files(&[cat, huge]).await;
        coordinator.wait_idle().await;

        let snapshot = coordinator.snapshot().await;
        assert_eq!(snapshot.total, 1);
        assert_eq!(snapshot.processed, 1);
        assert_eq!(snapshot.rejected.len(), 1);
        assert!(snapshot.rejected[0].reason.contains("5 MB"));
        // Il job ammesso è terminale (qui Failed: endpoint irraggiungibile)
        assert!(snapshot.jobs[0].is_terminal());
    }

    #[tokio::test]
    async fn test_two_jobs_both_reach_terminal_state() {
        let dir = TempDir::new().unwrap();
        let one = write_png(&dir, "one.jpg", 1_000);
        let two = write_png(&dir, "two.gif", 2_000);

        let coordinator = PipelineCoordinator::new(unreachable_config()).unwrap();
        coordinator.drop_files(&[one, two]).await;
        coordinator.wait_idle().await;

        let snapshot = coordinator.snapshot().await;
        assert_eq!(snapshot.processed, 2);
        assert_eq!(snapshot.total, 2);
        assert!(snapshot.is_idle());
        for job in &snapshot.jobs {
            assert_eq!(job.state, JobState::Failed);
            assert!(job.error_reason.is_some());
        }
    }

    #[tokio::test]
    async fn test_jobs_capture_settings_at_admission() {
        let dir = TempDir::new().unwrap();
        let cat = write_png(&dir, "cat.png", 1_000);

        let coordinator = PipelineCoordinator::new(unreachable_config()).unwrap();
        coordinator.settings().set_quality(42);
        coordinator.settings().set_replace_original(true);
        coordinator.drop_files(std::slice::from_ref(&cat)).await;

        // Cambi successivi non toccano il job già creato
        coordinator.settings().set_quality(99);
        coordinator.settings().set_replace_original(false);
        coordinator.wait_idle().await;

        let snapshot = coordinator.snapshot().await;
        assert_eq!(snapshot.jobs[0].quality, 42);
        assert!(snapshot.jobs[0].replace_original);
    }

    #[tokio::test]
    async fn test_failed_job_does_not_abort_batch() {
        let dir = TempDir::new().unwrap();
        let bad = dir.path().join("missing.png"); // passa la validazione (size 0)
        let good = write_png(&dir, "real.png", 500);

        let coordinator = PipelineCoordinator::new(unreachable_config()).unwrap();
        coordinator.drop_files(&[bad, good]).await;
        coordinator.wait_idle().await;

        let snapshot = coordinator.snapshot().await;
        // Entrambi ammessi, entrambi terminali, nessun job perso
        assert_eq!(snapshot.processed, 2);
        assert_eq!(snapshot.total, 2);
    }

    #[tokio::test]
    async fn test_empty_batch_is_idle() {
        let coordinator = PipelineCoordinator::new(unreachable_config()).unwrap();
        coordinator.drop_files(&[]).await;
        coordinator.wait_idle().await;

        let snapshot = coordinator.snapshot().await;
        assert!(snapshot.is_idle());
        assert_eq!(snapshot.total, 0);
    }
}
