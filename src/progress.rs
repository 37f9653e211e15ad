//! # Progress Tracking and Statistics Module
//!
//! Questo modulo definisce la vista che il layer di rendering riceve.
//!
//! ## Responsabilità:
//! - `PipelineSnapshot`: fotografia consistente di job, rifiutati e contatori,
//!   pubblicata dal coordinatore ad ogni mutazione (nessuna torn read)
//! - `RejectedFile`: file scartato prima dell'ammissione, con reason
//! - Contatori aggregati derivati: `processed` = job in stato terminale,
//!   `total` = job ammessi; vale sempre `0 <= processed <= total`
//! - Progress bar visual con `indicatif` per il collaboratore CLI
//!
//! ## Visual feedback:
//! ```text
//! ⠋ [00:00:02] [==================>---------------------] 3/7 (42%) cat.png: done
//! ```

use crate::pipeline::{JobState, OptimizationJob};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;

/// A dropped file that never became a job
#[derive(Debug, Clone, Serialize)]
pub struct RejectedFile {
    pub path: PathBuf,
    pub reason: String,
}

/// Consistent view of the whole pipeline for a rendering consumer
#[derive(Debug, Clone, Default, Serialize)]
pub struct PipelineSnapshot {
    /// Admitted jobs, in admission order, keyed by stable id
    pub jobs: Vec<OptimizationJob>,
    /// Files rejected before admission (not counted in `total`)
    pub rejected: Vec<RejectedFile>,
    /// Jobs that reached a terminal state
    pub processed: usize,
    /// Admitted jobs
    pub total: usize,
}

impl PipelineSnapshot {
    /// True once every admitted job reached a terminal state
    pub fn is_idle(&self) -> bool {
        self.processed == self.total
    }

    pub fn done_count(&self) -> usize {
        self.jobs.iter().filter(|j| j.state == JobState::Done).count()
    }

    pub fn failed_count(&self) -> usize {
        self.jobs.iter().filter(|j| j.state == JobState::Failed).count()
    }

    pub fn format_summary(&self) -> String {
        format!(
            "Processed: {}/{} files | Optimized: {} | Failed: {} | Rejected: {}",
            self.processed,
            self.total,
            self.done_count(),
            self.failed_count(),
            self.rejected.len()
        )
    }
}

/// Renders snapshots on a terminal progress bar
#[derive(Clone)]
pub struct ProgressRenderer {
    bar: ProgressBar,
}

impl ProgressRenderer {
    pub fn new() -> Self {
        let bar = ProgressBar::new(0);

        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
                .unwrap()
                .progress_chars("=>-"),
        );

        bar.enable_steady_tick(Duration::from_millis(100));

        Self { bar }
    }

    /// Apply a snapshot to the bar
    pub fn render(&self, snapshot: &PipelineSnapshot) {
        self.bar.set_length(snapshot.total as u64);
        self.bar.set_position(snapshot.processed as u64);

        // Mostra l'ultimo job che ha cambiato stato fuori da Pending
        if let Some(job) = snapshot
            .jobs
            .iter()
            .rev()
            .find(|j| j.state != JobState::Pending)
        {
            let name = job
                .source_path
                .file_name()
                .unwrap_or_default()
                .to_string_lossy();
            self.bar.set_message(format!("{}: {}", name, job.state.describe()));
        }
    }

    /// Finish with a final message
    pub fn finish(&self, message: &str) {
        self.bar.finish_with_message(message.to_string());
    }
}

impl Default for ProgressRenderer {
    fn default() -> Self {
        Self::new()
    }
}
