//! Configuration system
//!
//! File-backed configuration for display-list behavior. Supports TOML and RON
//! formats selected by file extension.

pub use serde::{Deserialize, Serialize};

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::Io)?;

        // Try different formats
        if path.ends_with(".toml") {
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else if path.ends_with(".ron") {
            ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, Default::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Display-list tuning parameters
///
/// Controls arena block sizing and whether lists may be recycled across
/// frames instead of destroyed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListConfig {
    /// Number of drawables per arena block
    pub arena_block_capacity: usize,
    /// Whether `attempt_reuse` may accept a list for recycling
    pub enable_reuse: bool,
}

impl ListConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self {
            arena_block_capacity: 64,
            enable_reuse: true,
        }
    }

    /// Set the arena block capacity
    pub fn with_arena_block_capacity(mut self, capacity: usize) -> Self {
        self.arena_block_capacity = capacity;
        self
    }

    /// Enable or disable list recycling
    pub fn with_reuse(mut self, enabled: bool) -> Self {
        self.enable_reuse = enabled;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.arena_block_capacity == 0 {
            return Err("Arena block capacity must be at least 1".to_string());
        }
        Ok(())
    }
}

impl Default for ListConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl Config for ListConfig {}
