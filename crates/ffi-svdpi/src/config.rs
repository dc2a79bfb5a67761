//! Marshaller configuration loaded from TOML.
//!
//! ```toml
//! log_payload = true
//! payload_preview_bytes = 32
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{MarshalError, MarshalResult};

/// Upper bound for `payload_preview_bytes`.
pub const MAX_PREVIEW_BYTES: usize = 4096;

/// Options for the default sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarshalConfig {
    /// Log a hex preview of each payload at info level
    #[serde(default)]
    pub log_payload: bool,

    /// Number of payload bytes shown in the preview
    #[serde(default = "default_payload_preview_bytes")]
    pub payload_preview_bytes: usize,
}

fn default_payload_preview_bytes() -> usize {
    16
}

impl Default for MarshalConfig {
    fn default() -> Self {
        Self {
            log_payload: false,
            payload_preview_bytes: default_payload_preview_bytes(),
        }
    }
}

impl MarshalConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(content: &str) -> MarshalResult<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a file.
    pub fn from_file(path: impl AsRef<Path>) -> MarshalResult<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Loads configuration from a file, falling back to defaults if the file
    /// does not exist.
    pub fn load_or_default(path: impl AsRef<Path>) -> MarshalResult<Self> {
        let path = path.as_ref();
        match Self::from_file(path) {
            Err(MarshalError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("Config file {} not found, using defaults", path.display());
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// Saves configuration to a file.
    pub fn save(&self, path: impl AsRef<Path>) -> MarshalResult<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| MarshalError::invalid_config("*", e.to_string()))?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> MarshalResult<()> {
        if self.payload_preview_bytes > MAX_PREVIEW_BYTES {
            return Err(MarshalError::invalid_config(
                "payload_preview_bytes",
                format!("must be <= {}", MAX_PREVIEW_BYTES),
            ));
        }
        Ok(())
    }
}
