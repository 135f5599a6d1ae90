//! Persistent CLI configuration.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use halo_core::Catalog;
use halo_http::{HttpConfig, HttpTransport};

use crate::cli::ConnectionArgs;

/// Stored configuration, `config.json` in the platform config directory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Service root URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Request defaults for the HTTP transport.
    pub http: HttpConfig,
}

impl Settings {
    /// Layer command-line overrides on top of the stored values.
    pub fn with_overrides(mut self, args: &ConnectionArgs) -> Self {
        if let Some(url) = &args.url {
            self.url = Some(url.clone());
        }
        for (name, value) in &args.headers {
            self.http.headers.insert(name.clone(), value.clone());
        }
        if args.cache {
            self.http.cache = true;
        }
        if let Some(secs) = args.timeout {
            self.http = self.http.timeout(Duration::from_secs(secs));
        }
        self
    }

    /// Discover the configured service.
    pub fn connect(self) -> Result<Catalog> {
        let url = self.url.context(
            "No service URL. Pass --url, set HALO_URL, or run 'halo config set-url'.",
        )?;
        let transport =
            HttpTransport::with_config(self.http).context("Invalid HTTP configuration")?;

        tracing::debug!(%url, "Discovering service");
        Catalog::discover(&url, Arc::new(transport))
            .with_context(|| format!("Failed to discover resources at {url}"))
    }
}

/// Get the config file path.
fn settings_path() -> Result<PathBuf> {
    let dirs = ProjectDirs::from("", "", "halo").context("Could not determine config directory")?;
    Ok(dirs.config_dir().join("config.json"))
}

/// Load the stored configuration, or defaults when none was saved yet.
pub fn load() -> Result<Settings> {
    let path = settings_path()?;

    if !path.exists() {
        return Ok(Settings::default());
    }

    let json = fs::read_to_string(&path).context("Failed to read config file")?;
    serde_json::from_str(&json).with_context(|| format!("Invalid config file {}", path.display()))
}

/// Save the configuration to disk.
pub fn save(settings: &Settings) -> Result<PathBuf> {
    let path = settings_path()?;
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).context("Failed to create config directory")?;
    }

    let json = serde_json::to_string_pretty(settings)?;
    fs::write(&path, json).context("Failed to write config file")?;

    Ok(path)
}

/// Load the stored configuration and apply command-line overrides.
pub fn effective(args: &ConnectionArgs) -> Result<Settings> {
    Ok(load()?.with_overrides(args))
}
