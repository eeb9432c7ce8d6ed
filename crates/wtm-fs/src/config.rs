//! Configuration loading and saving

use serde::{Serialize, de::DeserializeOwned};

use crate::{Error, NormalizedPath, Result, io};

/// TOML configuration store.
///
/// Settings files are optional: [`ConfigStore::load_or_default`] treats a
/// missing file as "all defaults".
#[derive(Debug, Default)]
pub struct ConfigStore;

impl ConfigStore {
    pub fn new() -> Self {
        Self
    }

    /// Load configuration from a `.toml` file.
    pub fn load<T: DeserializeOwned>(&self, path: &NormalizedPath) -> Result<T> {
        ensure_toml(path)?;
        let content = io::read_text(path)?;
        toml::from_str(&content).map_err(|e| Error::ConfigParse {
            path: path.to_native(),
            format: "TOML".into(),
            message: e.to_string(),
        })
    }

    /// Load configuration, falling back to `T::default()` when the file
    /// does not exist. Parse errors are still reported.
    pub fn load_or_default<T: DeserializeOwned + Default>(&self, path: &NormalizedPath) -> Result<T> {
        if !path.exists() {
            tracing::debug!(path = %path, "No config file, using defaults");
            return Ok(T::default());
        }
        self.load(path)
    }

    /// Save configuration atomically.
    pub fn save<T: Serialize>(&self, path: &NormalizedPath, value: &T) -> Result<()> {
        ensure_toml(path)?;
        let content = toml::to_string_pretty(value).map_err(|e| Error::ConfigSerialize {
            path: path.to_native(),
            format: "TOML".into(),
            message: e.to_string(),
        })?;
        io::write_atomic(path, content.as_bytes())
    }
}

fn ensure_toml(path: &NormalizedPath) -> Result<()> {
    let extension = path.extension().unwrap_or("");
    if extension.eq_ignore_ascii_case("toml") {
        Ok(())
    } else {
        Err(Error::UnsupportedFormat {
            extension: extension.to_string(),
        })
    }
}
