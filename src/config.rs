//! # Configuration Management Module
//!
//! Questo modulo gestisce tutta la configurazione dell'applicazione.
//!
//! ## Responsabilità:
//! - Definisce la struct `Config` con tutti i parametri di ottimizzazione
//! - Fornisce validazione robusta dei parametri di input
//! - Supporta caricamento/salvataggio configurazione da/verso file JSON
//! - Espone `LiveSettings` per i due valori modificabili dalla UI a runtime
//!
//! ## Parametri di configurazione:
//! - `quality`: Qualità di compressione richiesta al servizio (0-100, default: 75)
//! - `replace_original`: Sovrascrive l'originale invece di creare la copia
//!   `-optimised` (default: false)
//! - `api_endpoint`: Endpoint del servizio di ottimizzazione remoto
//!
//! ## Persistence:
//! - Salvataggio in `~/.resmush-drop/config.json`
//! - I due valori live sopravvivono ai riavvii, come le UserDefaults
//!   dell'app originale
//!
//! ## Semantica dei valori live:
//! `quality` e `replace_original` possono cambiare in qualsiasi momento; ogni
//! job cattura la propria copia al momento dell'ammissione, quindi un cambio
//! di configurazione non tocca mai i job in volo.
//!
//! ## Esempio:
//! ```rust
//! # use resmush_drop::Config;
//! # fn main() -> anyhow::Result<()> {
//! let config = Config {
//!     quality: 85,
//!     ..Default::default()
//! };
//! config.validate()?;
//! # Ok(())
//! # }
//! ```

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

/// Default endpoint of the remote optimization service
pub const DEFAULT_ENDPOINT: &str = "https://api.resmush.it/ws.php";

/// Configuration for the optimization pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Compression quality requested from the service (0-100)
    pub quality: u8,
    /// Replace original files instead of writing a `-optimised` sibling
    pub replace_original: bool,
    /// Remote optimization endpoint
    pub api_endpoint: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            quality: 75,
            replace_original: false,
            api_endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }
}

impl Config {
    /// Validate configuration parameters
    pub fn validate(&self) -> Result<()> {
        if self.quality > 100 {
            return Err(anyhow::anyhow!("Quality must be between 0 and 100"));
        }

        if self.api_endpoint.is_empty() {
            return Err(anyhow::anyhow!("API endpoint must not be empty"));
        }

        if reqwest::Url::parse(&self.api_endpoint).is_err() {
            return Err(anyhow::anyhow!(
                "API endpoint is not a valid URL: {}",
                self.api_endpoint
            ));
        }

        Ok(())
    }

    /// Default location of the persisted configuration
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::home_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find home directory"))?
            .join(".resmush-drop");
        Ok(config_dir.join("config.json"))
    }

    /// Load configuration from file
    pub async fn from_file(path: &PathBuf) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = tokio::fs::read_to_string(path).await?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub async fn save_to_file(&self, path: &PathBuf) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let content = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, content).await?;
        Ok(())
    }
}

/// I due valori regolabili dalla UI mentre la pipeline gira.
///
/// Un job legge entrambi una sola volta, all'ammissione; i job in volo non
/// vedono mai cambi successivi.
#[derive(Debug)]
pub struct LiveSettings {
    quality: AtomicU8,
    replace_original: AtomicBool,
}

impl LiveSettings {
    pub fn new(quality: u8, replace_original: bool) -> Self {
        Self {
            quality: AtomicU8::new(quality),
            replace_original: AtomicBool::new(replace_original),
        }
    }

    pub fn quality(&self) -> u8 {
        self.quality.load(Ordering::Relaxed)
    }

    pub fn set_quality(&self, quality: u8) {
        self.quality.store(quality.min(100), Ordering::Relaxed);
    }

    pub fn replace_original(&self) -> bool {
        self.replace_original.load(Ordering::Relaxed)
    }

    pub fn set_replace_original(&self, replace: bool) {
        self.replace_original.store(replace, Ordering::Relaxed);
    }
}

impl From<&Config> for LiveSettings {
    fn from(config: &Config) -> Self {
        Self::new(config.quality, config.replace_original)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.quality = 101;
        assert!(config.validate().is_err());

        config.quality = 75;
        config.api_endpoint = String::new();
        assert!(config.validate().is_err());

        config.api_endpoint = "not a url".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.quality, 75);
        assert!(!config.replace_original);
        assert_eq!(config.api_endpoint, DEFAULT_ENDPOINT);
    }

    #[tokio::test]
    async fn test_config_save_load() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");

        let original_config = Config {
            quality: 85,
            replace_original: true,
            api_endpoint: "https://example.com/ws.php".to_string(),
        };

        // Save config
        original_config.save_to_file(&config_path).await.unwrap();

        // Load config
        let loaded_config = Config::from_file(&config_path).await.unwrap();

        assert_eq!(loaded_config.quality, 85);
        assert!(loaded_config.replace_original);
        assert_eq!(loaded_config.api_endpoint, "https://example.com/ws.php");
    }

    #[tokio::test]
    async fn test_config_missing_file_gives_default() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("missing.json");

        let loaded = Config::from_file(&config_path).await.unwrap();
        assert_eq!(loaded.quality, 75);
    }

    #[test]
    fn test_live_settings_capture() {
        let settings = LiveSettings::new(75, false);
        assert_eq!(settings.quality(), 75);
        assert!(!settings.replace_original());

        settings.set_quality(90);
        settings.set_replace_original(true);
        assert_eq!(settings.quality(), 90);
        assert!(settings.replace_original());

        // Clamped at 100
        settings.set_quality(255);
        assert_eq!(settings.quality(), 100);
    }
}
