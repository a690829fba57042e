// src/config.rs
use std::path::PathBuf;

use crate::utils::AppError;

pub const DOCS_DIR_VAR: &str = "QA_DOCS_DIR";
pub const NUM_RESULTS_VAR: &str = "QA_NUM_RESULTS";

const DEFAULT_DOCS_DIR: &str = "./pdfs";
const DEFAULT_NUM_RESULTS: usize = 1;

/// Runtime settings. Environment first, then CLI flags on top.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub docs_dir: PathBuf,
    pub num_results: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            docs_dir: PathBuf::from(DEFAULT_DOCS_DIR),
            num_results: DEFAULT_NUM_RESULTS,
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds settings from any key/value source; unset or blank keys keep
    /// their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut settings = Self::default();

        if let Some(dir) = get(DOCS_DIR_VAR) {
            settings.docs_dir = PathBuf::from(dir);
        }
        if let Some(raw) = get(NUM_RESULTS_VAR) {
            let n = raw.parse::<usize>().map_err(|e| {
                AppError::Config(format!("{} must be a positive integer, got '{}': {}", NUM_RESULTS_VAR, raw, e))
            })?;
            settings.set_num_results(n)?;
        }

        tracing::debug!("Settings from environment: {:?}", settings);
        Ok(settings)
    }

    pub fn set_num_results(&mut self, n: usize) -> Result<(), AppError> {
        if n == 0 {
            return Err(AppError::Config("number of results must be at least 1".to_string()));
        }
        self.num_results = n;
        Ok(())
    }
}
