//! `claims.toml` configuration.
//!
//! Every key is optional; missing keys keep their defaults.
//!
//! ```toml
//! data_dir = ".claims"
//! page_size = 25
//! expanded_groups = ["patient_info", "claim_status"]
//!
//! [import]
//! max_file_bytes = 10485760
//! suggest_min_confidence = 0.8
//! email = "operator@example.com"
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::debug;

use claims_import::{ImportOptions, RequiredFieldPolicy};
use claims_ingest::{DEFAULT_MAX_FILE_BYTES, ReadOptions};
use claims_map::DEFAULT_MIN_CONFIDENCE;
use claims_standards::DEFAULT_EXPANDED_GROUPS;
use claims_table::DEFAULT_PAGE_SIZE;

/// Looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "claims.toml";

/// Directory holding imported claims and history when nothing else is set.
pub const DEFAULT_DATA_DIR: &str = ".claims";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub page_size: usize,
    pub expanded_groups: Vec<String>,
    pub import: ImportConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            page_size: DEFAULT_PAGE_SIZE,
            expanded_groups: DEFAULT_EXPANDED_GROUPS
                .iter()
                .map(|id| (*id).to_string())
                .collect(),
            import: ImportConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImportConfig {
    pub max_file_bytes: u64,
    pub suggest_min_confidence: f32,
    /// Operator email written to the import history.
    pub email: Option<String>,
    /// Require every required field on each row, mapped or not.
    pub strict: bool,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
            suggest_min_confidence: DEFAULT_MIN_CONFIDENCE,
            email: None,
            strict: false,
        }
    }
}

impl AppConfig {
    /// Parse configuration text.
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(text).context("parse configuration")?;
        Ok(config)
    }

    /// Load `path`, or `claims.toml` from the working directory when no path
    /// is given. A missing default file yields the defaults; a missing
    /// explicit file is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("read config {}", path.display()))?;
                Self::from_toml(&text).with_context(|| format!("load config {}", path.display()))
            }
            None => Self::load_default(Path::new(DEFAULT_CONFIG_FILE)),
        }
    }

    fn load_default(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(text) => {
                debug!(path = %path.display(), "loaded configuration");
                Self::from_toml(&text).with_context(|| format!("load config {}", path.display()))
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => {
                Err(err).with_context(|| format!("read config {}", path.display()))
            }
        }
    }

    /// Import pipeline options derived from the `[import]` table.
    pub fn import_options(&self) -> ImportOptions {
        ImportOptions {
            read: ReadOptions {
                max_file_bytes: self.import.max_file_bytes,
            },
            suggest_min_confidence: self.import.suggest_min_confidence,
            required: if self.import.strict {
                RequiredFieldPolicy::All
            } else {
                RequiredFieldPolicy::Mapped
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_is_default() {
        let config = AppConfig::from_toml("").expect("parse");
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.import_options(), ImportOptions::default());
    }

    #[test]
    fn partial_import_table_keeps_other_defaults() {
        let config = AppConfig::from_toml(
            r#"
page_size = 25

[import]
email = "ops@example.com"
strict = true
"#,
        )
        .expect("parse");
        assert_eq!(config.page_size, 25);
        assert_eq!(config.data_dir, PathBuf::from(DEFAULT_DATA_DIR));
        assert_eq!(config.import.email.as_deref(), Some("ops@example.com"));
        assert_eq!(config.import.max_file_bytes, DEFAULT_MAX_FILE_BYTES);
        assert_eq!(config.import_options().required, RequiredFieldPolicy::All);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(AppConfig::from_toml("pagesize = 25").is_err());
    }
}
