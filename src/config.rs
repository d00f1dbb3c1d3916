use crate::defaults;
use crate::error::{CaptionError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub fetch: FetchConfig,
    pub transcription: TranscriptionConfig,
    pub render: RenderConfig,
    pub storage: StorageConfig,
}

/// HTTP surface configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub listen: String,
}

/// Resource fetch configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FetchConfig {
    pub timeout_secs: u64,
}

/// Transcription service configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TranscriptionConfig {
    pub endpoint: String,
    pub api_key: String,
    pub model: String,
    pub timeout_secs: u64,
}

/// Render tool configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RenderConfig {
    pub program: String,
    pub timeout_secs: u64,
}

/// Temporary file storage configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StorageConfig {
    pub workdir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: defaults::DEFAULT_LISTEN.to_string(),
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: defaults::DEFAULT_FETCH_TIMEOUT_SECS,
        }
    }
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            endpoint: defaults::DEFAULT_TRANSCRIPTION_ENDPOINT.to_string(),
            api_key: String::new(),
            model: defaults::DEFAULT_TRANSCRIPTION_MODEL.to_string(),
            timeout_secs: defaults::DEFAULT_TRANSCRIPTION_TIMEOUT_SECS,
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            program: defaults::DEFAULT_RENDER_PROGRAM.to_string(),
            timeout_secs: defaults::DEFAULT_RENDER_TIMEOUT_SECS,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            workdir: defaults::default_workdir(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Returns an error if the file is missing or contains invalid TOML.
    /// Missing fields will use default values.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                CaptionError::ConfigFileNotFound {
                    path: path.display().to_string(),
                }
            } else {
                CaptionError::Io(e)
            }
        })?;
        toml::from_str(&contents).map_err(|e| CaptionError::ConfigParse {
            message: e.to_string(),
        })
    }

    /// Load configuration from a file or return defaults if the file doesn't exist
    ///
    /// Only returns defaults when the file is missing.
    /// Invalid TOML is still an error.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        match Self::load(path) {
            Err(CaptionError::ConfigFileNotFound { .. }) => Ok(Self::default()),
            other => other,
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supported environment variables:
    /// - CAPTIOND_LISTEN → server.listen
    /// - CAPTIOND_WORKDIR → storage.workdir
    /// - CAPTIOND_ENDPOINT → transcription.endpoint
    /// - CAPTIOND_MODEL → transcription.model
    /// - CAPTIOND_API_KEY (fallback OPENAI_API_KEY) → transcription.api_key
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|name| std::env::var(name).ok())
    }

    /// Apply overrides from an arbitrary variable lookup.
    ///
    /// Separated from [`Config::with_env_overrides`] so tests can supply a
    /// deterministic lookup without mutating the process environment.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.is_empty());

        if let Some(listen) = non_empty("CAPTIOND_LISTEN") {
            self.server.listen = listen;
        }
        if let Some(workdir) = non_empty("CAPTIOND_WORKDIR") {
            self.storage.workdir = PathBuf::from(workdir);
        }
        if let Some(endpoint) = non_empty("CAPTIOND_ENDPOINT") {
            self.transcription.endpoint = endpoint;
        }
        if let Some(model) = non_empty("CAPTIOND_MODEL") {
            self.transcription.model = model;
        }
        // The original deployment configured credentials via OPENAI_API_KEY;
        // honor it as a fallback.
        if let Some(key) = non_empty("CAPTIOND_API_KEY").or_else(|| non_empty("OPENAI_API_KEY")) {
            self.transcription.api_key = key;
        }

        self
    }

    /// Validate values that must parse before the server starts.
    pub fn validate(&self) -> Result<()> {
        self.server
            .listen
            .parse::<std::net::SocketAddr>()
            .map_err(|e| CaptionError::ConfigInvalidValue {
                key: "server.listen".to_string(),
                message: e.to_string(),
            })?;
        Ok(())
    }
}
