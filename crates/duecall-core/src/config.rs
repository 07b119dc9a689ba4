use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::Result;

/// Top-level configuration for the Duecall application.
///
/// Loaded from a TOML file. Each section corresponds to one concern:
/// general process settings, call-time reference data, and the offline
/// knowledge-base pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DuecallConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub call: CallConfig,
    #[serde(default)]
    pub knowledge: KnowledgeConfig,
}

impl DuecallConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: DuecallConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Call-time reference data locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CallConfig {
    /// Path to the customer policy store (JSON array).
    pub customers_path: String,
    /// Path to the call script (plain text, one line per step).
    pub script_path: String,
}

impl Default for CallConfig {
    fn default() -> Self {
        Self {
            customers_path: "customer_policies.json".to_string(),
            script_path: "calling_script.txt".to_string(),
        }
    }
}

/// Offline knowledge-base pipeline settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KnowledgeConfig {
    /// Directory of plain-text knowledge documents.
    pub kb_dir: String,
    /// Directory where index artifacts are written.
    pub index_dir: String,
    /// Maximum words per knowledge chunk.
    pub max_chunk_words: usize,
    /// Number of nearest chunks to retrieve per query.
    pub top_k: usize,
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            kb_dir: "kb".to_string(),
            index_dir: "kb".to_string(),
            max_chunk_words: 500,
            top_k: 3,
        }
    }
}
