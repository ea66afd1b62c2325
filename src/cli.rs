//! Command-Line Interface (CLI) argument parsing.
//!
//! This module defines the command-line arguments for the application using the
//! `clap` crate. Arguments that mirror configuration keys are fed into
//! `figment` as the highest-priority provider.

use clap::Parser;
use figment::{
    value::{Dict, Map, Value},
    Error, Metadata, Profile, Provider,
};
use std::net::SocketAddr;
use std::path::PathBuf;

/// Exports kernel file descriptor statistics as Prometheus metrics.
#[derive(Parser, Debug, Clone, Default)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Mount point of the proc filesystem.
    #[arg(long, value_name = "DIR")]
    pub procfs_path: Option<PathBuf>,

    /// Address to serve metrics on.
    #[arg(long, value_name = "ADDR")]
    pub listen_address: Option<SocketAddr>,

    /// Namespace prefixed to every metric name.
    #[arg(long, value_name = "NS")]
    pub namespace: Option<String>,

    /// Log level filter (e.g. `info`, `debug`).
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Collect once, print the metrics as JSON lines and exit.
    #[arg(long)]
    pub once: bool,
}

impl Provider for Cli {
    fn metadata(&self) -> Metadata {
        Metadata::named("Command-Line Arguments")
    }

    fn data(&self) -> Result<Map<Profile, Dict>, Error> {
        let mut dict = Dict::new();

        if let Some(path) = &self.procfs_path {
            dict.insert(
                "procfs_path".into(),
                Value::from(path.display().to_string()),
            );
        }

        if let Some(namespace) = &self.namespace {
            dict.insert("namespace".into(), Value::from(namespace.clone()));
        }

        if let Some(level) = &self.log_level {
            dict.insert("log_level".into(), Value::from(level.clone()));
        }

        if let Some(addr) = self.listen_address {
            let mut metrics = Dict::new();
            metrics.insert("listen_address".into(), Value::from(addr.to_string()));
            dict.insert("metrics".into(), Value::from(metrics));
        }

        let mut map = Map::new();
        map.insert(Profile::Default, dict);
        Ok(map)
    }
}
