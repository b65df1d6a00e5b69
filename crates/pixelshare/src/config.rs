//! sharing configuration
//!
//! loaded from TOML; every field is optional and falls back to the defaults:
//!
//! ```toml
//! threshold = 3
//! shares = 5
//! chunk_size = 65536
//! output_dir = "./outputs"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::scheme::Scheme;
use crate::{Error, Result};

/// Input bytes per worker task.
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

pub const DEFAULT_THRESHOLD: u16 = 3;
pub const DEFAULT_SHARES: u16 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SharingConfig {
    /// Shares needed to reconstruct (k)
    pub threshold: u16,
    /// Shares produced by a split (n)
    pub shares: u16,
    pub chunk_size: usize,
    /// Where split share directories are created
    pub output_dir: PathBuf,
}

impl Default for SharingConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            shares: DEFAULT_SHARES,
            chunk_size: DEFAULT_CHUNK_SIZE,
            output_dir: PathBuf::from("./outputs"),
        }
    }
}

impl SharingConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn scheme(&self) -> Result<Scheme> {
        Scheme::new(self.threshold, self.shares)
    }

    pub fn validate(&self) -> Result<()> {
        self.scheme()?;
        if self.chunk_size == 0 {
            return Err(Error::Config("chunk_size must be positive".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SharingConfig::default();
        assert_eq!(config.threshold, 3);
        assert_eq!(config.shares, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = SharingConfig::from_toml_str("threshold = 2\nshares = 3\n").unwrap();
        assert_eq!(config.scheme().unwrap(), Scheme::new(2, 3).unwrap());
        assert_eq!(config.chunk_size, DEFAULT_CHUNK_SIZE);
        assert_eq!(config.output_dir, PathBuf::from("./outputs"));
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            SharingConfig::from_toml_str("threshold = 6"),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            SharingConfig::from_toml_str("chunk_size = 0"),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            SharingConfig::from_toml_str("thresold = 2"),
            Err(Error::ConfigFile(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pixelshare.toml");
        fs::write(&path, "shares = 7\noutput_dir = \"/tmp/shares\"\n").unwrap();

        let config = SharingConfig::load(&path).unwrap();
        assert_eq!(config.shares, 7);
        assert_eq!(config.output_dir, PathBuf::from("/tmp/shares"));
    }
}
