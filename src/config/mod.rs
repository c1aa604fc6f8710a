//! Configuration module for Ferret-RS
//!
//! Handles loading settings from templated YAML files and environment
//! variables.

mod settings;

pub use settings::*;

use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::info;

/// Load settings from an explicit path, `FERRET_CONFIG`, a default location,
/// or fall back to environment-only defaults
pub fn load(explicit: Option<&Path>) -> Result<Settings> {
    if let Some(path) = explicit {
        return load_file(path);
    }

    if let Ok(path) = std::env::var("FERRET_CONFIG") {
        if !path.is_empty() {
            return load_file(Path::new(&path));
        }
    }

    for path in default_paths() {
        if path.exists() {
            return load_file(&path);
        }
    }

    info!("No config file found, configuring providers from the environment");
    let mut settings = Settings::default();
    settings.merge_env();
    Ok(settings)
}

fn load_file(path: &Path) -> Result<Settings> {
    info!("Loading settings from: {}", path.display());
    let mut settings = Settings::from_file(path)?;
    settings.merge_env();
    Ok(settings)
}

fn default_paths() -> Vec<PathBuf> {
    let mut paths = vec![
        PathBuf::from("ferret.yml"),
        PathBuf::from("config/ferret.yml"),
    ];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("ferret-rs/ferret.yml"));
    }
    paths
}
