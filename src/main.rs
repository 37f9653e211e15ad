//! # reSmush Drop - Main Entry Point
//!
//! Questo è il punto di ingresso del collaboratore CLI: accetta il batch di
//! file "droppati" come argomenti e renderizza lo stato della pipeline.
//!
//! ## Responsabilità:
//! - Parsing degli argomenti della command line con `clap`
//! - Inizializzazione del sistema di logging con `tracing`
//! - Caricamento/persistenza dei valori di configurazione (come le
//!   UserDefaults dell'app originale)
//! - Creazione del coordinatore e rendering degli snapshot
//!
//! ## Flusso di esecuzione:
//! 1. Parsa gli argomenti CLI (file, quality, replace, endpoint, verbose)
//! 2. Configura il logging (INFO o DEBUG a seconda del flag verbose)
//! 3. Carica la configurazione persistita e applica gli override CLI
//! 4. Droppa il batch sul coordinatore e attende che tutti i job terminino
//! 5. Stampa il riepilogo e i motivi di rifiuto/fallimento
//!
//! ## Esempio di utilizzo:
//! ```bash
//! resmush-drop photo.jpg logo.png --quality 85 --replace
//! ```

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info, warn};

use resmush_drop::{Config, JobState, PipelineCoordinator, ProgressRenderer};

#[derive(Parser)]
#[command(name = "resmush-drop")]
#[command(about = "Optimize images through the reSmush.it web service")]
struct Args {
    /// Image files to optimize (JPEG, PNG or GIF, max 5 MB each)
    files: Vec<PathBuf>,

    /// Compression quality (0-100)
    #[arg(short, long)]
    quality: Option<u8>,

    /// Replace original files instead of writing "-optimised" copies
    #[arg(short, long)]
    replace: bool,

    /// Optimization service endpoint
    #[arg(long)]
    endpoint: Option<String>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(if args.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    // Carica la configurazione persistita e applica gli override CLI
    let config_path = Config::default_path()?;
    let mut config = Config::from_file(&config_path).await?;
    if let Some(quality) = args.quality {
        config.quality = quality;
    }
    if args.replace {
        config.replace_original = true;
    }
    if let Some(endpoint) = args.endpoint {
        config.api_endpoint = endpoint;
    }
    config.validate()?;

    // Persisti i due valori live per i prossimi avvii
    if let Err(e) = config.save_to_file(&config_path).await {
        warn!("Could not persist configuration: {}", e);
    }

    if args.files.is_empty() {
        info!("No files dropped, nothing to do");
        return Ok(());
    }

    info!(
        "Optimizing {} file(s) with quality {} ({})",
        args.files.len(),
        config.quality,
        if config.replace_original {
            "replacing originals"
        } else {
            "writing -optimised copies"
        }
    );

    let coordinator = PipelineCoordinator::new(config)?;

    // Rendering: consuma gli snapshot dal canale watch
    let renderer = ProgressRenderer::new();
    let mut updates = coordinator.subscribe();
    let render_handle = tokio::spawn({
        let renderer = renderer.clone();
        async move {
            while updates.changed().await.is_ok() {
                let snapshot = updates.borrow_and_update().clone();
                renderer.render(&snapshot);
            }
        }
    });

    coordinator.drop_files(&args.files).await;
    coordinator.wait_idle().await;

    let snapshot = coordinator.snapshot().await;
    drop(coordinator); // chiude il canale watch e ferma il render task
    let _ = render_handle.await;

    renderer.finish(&snapshot.format_summary());

    for rejected in &snapshot.rejected {
        warn!("{}", rejected.reason);
    }
    for job in &snapshot.jobs {
        match job.state {
            JobState::Done => {
                if let Some(ref placed) = job.result_path {
                    info!(
                        "{}: {}",
                        if job.replace_original { "Replaced" } else { "Downloaded" },
                        placed.display()
                    );
                }
            }
            JobState::Failed => {
                error!(
                    "{}: {}",
                    job.source_path.display(),
                    job.error_reason.as_deref().unwrap_or("unknown error")
                );
            }
            _ => {}
        }
    }

    if snapshot.total > 0 && snapshot.done_count() == 0 {
        return Err(anyhow::anyhow!("No files were optimized"));
    }

    Ok(())
}
