//! Analyzer configuration loaded from `.pg_analyze.toml`.
//!
//! Every field has a default, so a partial file is valid. Command-line flags
//! override whatever is loaded here.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use crate::errors::{Error, Result, ResultExt};

pub const CONFIG_FILE_NAME: &str = ".pg_analyze.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Capacity of the needs-review sample.
    pub needs_review_limit: usize,
    /// Records below this confidence are flagged `low_confidence`.
    pub review_threshold: f64,
    /// Maximum number of markup blocks in the PGML sample.
    pub pgml_sample_limit: usize,
    /// File extension of problem files, without the dot.
    pub extension: String,
    /// Directory names skipped while walking.
    pub exclude_dirs: Vec<String>,
    /// Roots scanned when none are given and they exist.
    pub default_roots: Vec<PathBuf>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            needs_review_limit: 200,
            review_threshold: 0.55,
            pgml_sample_limit: 200,
            extension: "pg".to_string(),
            exclude_dirs: vec![".git".to_string()],
            default_roots: ["OpenProblemLibrary", "Contrib", "Pending"]
                .into_iter()
                .map(PathBuf::from)
                .collect(),
        }
    }
}

impl AnalyzerConfig {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.review_threshold) {
            return Err(Error::Configuration(format!(
                "review_threshold must be within [0, 1], got {}",
                self.review_threshold
            )));
        }
        if self.extension.trim_start_matches('.').is_empty() {
            return Err(Error::Configuration("extension must not be empty".into()));
        }
        Ok(())
    }

    /// Default roots that exist on disk, else the current directory.
    pub fn existing_default_roots(&self) -> Vec<PathBuf> {
        let existing: Vec<PathBuf> = self
            .default_roots
            .iter()
            .filter(|root| root.exists())
            .cloned()
            .collect();
        if existing.is_empty() {
            vec![PathBuf::from(".")]
        } else {
            existing
        }
    }
}

pub(crate) fn read_config_file(path: &Path) -> std::result::Result<String, std::io::Error> {
    let file = fs::File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut contents = String::new();
    reader.read_to_string(&mut contents)?;
    Ok(contents)
}

pub fn parse_and_validate_config(contents: &str) -> Result<AnalyzerConfig> {
    let config = toml::from_str::<AnalyzerConfig>(contents)?;
    config.validate()?;
    Ok(config)
}

/// Load an explicitly requested config file. Any failure is an error.
pub fn load_config_from(path: &Path) -> Result<AnalyzerConfig> {
    let contents = read_config_file(path)
        .map_err(|e| Error::io_at("cannot read config file", path, e))?;
    let config = parse_and_validate_config(&contents)
        .context(format!("invalid config {}", path.display()))?;
    log::debug!("Loaded config from {}", path.display());
    Ok(config)
}

/// Load `.pg_analyze.toml` from `dir` if present. Problems are logged and
/// defaults are used.
pub fn load_config_in(dir: &Path) -> AnalyzerConfig {
    let path = dir.join(CONFIG_FILE_NAME);
    let contents = match read_config_file(&path) {
        Ok(contents) => contents,
        Err(e) => {
            handle_read_error(&path, &e);
            return AnalyzerConfig::default();
        }
    };

    match parse_and_validate_config(&contents) {
        Ok(config) => {
            log::debug!("Loaded config from {}", path.display());
            config
        }
        Err(e) => {
            log::warn!("{}: {}. Using defaults.", path.display(), e);
            AnalyzerConfig::default()
        }
    }
}

/// `--config` when given, else the file in the working directory, else defaults.
pub fn load_config(explicit: Option<&Path>) -> Result<AnalyzerConfig> {
    if let Some(path) = explicit {
        return load_config_from(path);
    }
    match std::env::current_dir() {
        Ok(dir) => Ok(load_config_in(&dir)),
        Err(e) => {
            log::warn!("Failed to get current directory: {}. Using default config.", e);
            Ok(AnalyzerConfig::default())
        }
    }
}

fn handle_read_error(config_path: &Path, error: &std::io::Error) {
    if error.kind() != std::io::ErrorKind::NotFound {
        log::warn!(
            "Failed to read config file {}: {}",
            config_path.display(),
            error
        );
    }
}
