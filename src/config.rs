//! Configuration management for the exporter
//!
//! This module defines the main `Config` struct and its sub-structs. It uses
//! the `figment` crate to layer built-in defaults, an optional TOML file,
//! `FILEFD_EXPORTER_` environment variables and command-line arguments.

use crate::cli::Cli;
use anyhow::Result;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;

/// The main configuration struct for the application.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    /// The logging level for the application.
    pub log_level: String,
    /// Mount point of the proc filesystem.
    pub procfs_path: PathBuf,
    /// Namespace prefixed to every exported metric name.
    pub namespace: String,
    /// Which collectors to run.
    pub collectors: CollectorsConfig,
    /// Configuration for the metrics endpoint.
    pub metrics: MetricsConfig,
}

/// Which collectors to run.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct CollectorsConfig {
    /// Subsystem keys of the enabled collectors, e.g. `["filefd"]`.
    pub enabled: Vec<String>,
}

/// Configuration for the metrics endpoint.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct MetricsConfig {
    /// The address the HTTP server binds to.
    pub listen_address: SocketAddr,
    /// The path metrics are served under.
    pub telemetry_path: String,
}

impl Config {
    /// Loads the application configuration.
    ///
    /// Sources are merged in increasing priority: defaults, the TOML file
    /// given by `--config` (if any), environment variables, then CLI flags.
    pub fn load(cli: &Cli) -> Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));
        if let Some(path) = &cli.config {
            figment = figment.merge(Toml::file(path));
        }
        let config: Config = figment
            // e.g. FILEFD_EXPORTER_METRICS__LISTEN_ADDRESS=127.0.0.1:9100
            .merge(Env::prefixed("FILEFD_EXPORTER_").split("__"))
            .merge(cli.clone())
            .extract()?;
        Ok(config)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            procfs_path: PathBuf::from("/proc"),
            namespace: "node".to_string(),
            collectors: CollectorsConfig {
                enabled: vec!["filefd".to_string()],
            },
            metrics: MetricsConfig {
                listen_address: SocketAddr::from(([0, 0, 0, 0], 9100)),
                telemetry_path: "/metrics".to_string(),
            },
        }
    }
}
