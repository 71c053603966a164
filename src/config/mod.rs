//! Engine source configuration
//!
//! The engine's runtime assets come from one of two origins: a remote
//! content-delivery base URL or a local path. The choice is persisted as a
//! small TOML document so it survives reloads. Switching the persisted
//! value never reconfigures a live engine; it takes effect the next time
//! an engine is constructed and loaded, which is what guarantees a clean
//! re-initialization.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ClipdeckError, ClipdeckResult};

/// Default content-delivery origin for the engine runtime
pub const DEFAULT_REMOTE_BASE_URL: &str =
    "https://cdn.jsdelivr.net/npm/@ffmpeg/core@0.12.6/dist/esm";

/// Origin of the engine's runtime assets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "origin", rename_all = "lowercase")]
pub enum EngineSource {
    /// Fetch the runtime from a content-delivery origin
    Remote { base_url: String },
    /// Use a runtime installed at a local path
    Local { path: String },
}

impl Default for EngineSource {
    fn default() -> Self {
        EngineSource::Remote {
            base_url: DEFAULT_REMOTE_BASE_URL.to_string(),
        }
    }
}

#[derive(Serialize, Deserialize)]
struct ConfigDocument {
    engine: EngineSource,
}

/// On-disk store for the engine source flag
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    /// Store rooted at an explicit config directory
    pub fn at_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join("engine.toml"),
        }
    }

    /// Resolve the config location from the environment:
    /// `CLIPDECK_CONFIG_DIR`, then `$HOME/.config/clipdeck`, then the
    /// current directory.
    pub fn from_env() -> Self {
        if let Some(dir) = std::env::var_os("CLIPDECK_CONFIG_DIR") {
            return Self::at_dir(PathBuf::from(dir));
        }
        if let Some(home) = std::env::var_os("HOME") {
            return Self::at_dir(PathBuf::from(home).join(".config").join("clipdeck"));
        }
        Self::at_dir(".")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the persisted source, falling back to the default remote origin
    /// when nothing has been saved yet.
    pub fn load(&self) -> ClipdeckResult<EngineSource> {
        if !self.path.exists() {
            return Ok(EngineSource::default());
        }
        let content = std::fs::read_to_string(&self.path)?;
        let document: ConfigDocument =
            toml::from_str(&content).map_err(|e| ClipdeckError::ConfigError {
                message: format!("Failed to parse {}: {}", self.path.display(), e),
            })?;
        Ok(document.engine)
    }

    /// Persist the source choice. Takes effect on the next engine load.
    pub fn save(&self, source: &EngineSource) -> ClipdeckResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let document = ConfigDocument {
            engine: source.clone(),
        };
        let content = toml::to_string_pretty(&document).map_err(|e| ClipdeckError::ConfigError {
            message: format!("Failed to serialize engine config: {}", e),
        })?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_loads_the_default_remote_origin() {
        let dir = TempDir::new().unwrap();
        let store = ConfigStore::at_dir(dir.path());
        assert_eq!(store.load().unwrap(), EngineSource::default());
    }

    #[test]
    fn save_and_load_round_trip_both_origins() {
        let dir = TempDir::new().unwrap();
        let store = ConfigStore::at_dir(dir.path());

        let local = EngineSource::Local {
            path: "/opt/engine/ffmpeg".to_string(),
        };
        store.save(&local).unwrap();
        assert_eq!(store.load().unwrap(), local);

        let remote = EngineSource::Remote {
            base_url: "https://mirror.example/core".to_string(),
        };
        store.save(&remote).unwrap();
        assert_eq!(store.load().unwrap(), remote);
    }

    #[test]
    fn save_creates_missing_parent_directories() {
        let dir = TempDir::new().unwrap();
        let store = ConfigStore::at_dir(dir.path().join("nested").join("config"));
        store.save(&EngineSource::default()).unwrap();
        assert!(store.path().exists());
    }

    #[test]
    fn corrupt_config_is_a_config_error() {
        let dir = TempDir::new().unwrap();
        let store = ConfigStore::at_dir(dir.path());
        std::fs::write(store.path(), "not = [valid").unwrap();
        assert!(matches!(
            store.load(),
            Err(ClipdeckError::ConfigError { .. })
        ));
    }
}
