//! Collector registration and the per-cycle driver.
//!
//! Collectors are composed explicitly: `factories()` lists every collector
//! this crate ships, keyed by subsystem, and the host builds a
//! `CollectorRegistry` from the names enabled in its configuration.

pub mod filefd;

use crate::config::Config;
use crate::core::{build_fq_name, Collector, MetricSink};
use crate::error::CollectorError;
use crate::fs::FileSystem;
use anyhow::{bail, Result};
use log::{debug, error};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

pub use filefd::FileFdCollector;

/// Everything a collector constructor may need from the host.
#[derive(Clone)]
pub struct CollectorContext {
    pub fs: Arc<dyn FileSystem>,
    pub procfs_path: PathBuf,
    pub namespace: String,
}

/// Constructor for a registered collector. Constructors never fail; fallible
/// work is deferred to `Collector::update`.
pub type CollectorFactory = fn(&CollectorContext) -> Box<dyn Collector>;

fn new_filefd(ctx: &CollectorContext) -> Box<dyn Collector> {
    Box::new(FileFdCollector::new(
        ctx.fs.clone(),
        &ctx.procfs_path,
        ctx.namespace.clone(),
    ))
}

const FACTORIES: &[(&str, CollectorFactory)] = &[(filefd::SUBSYSTEM, new_filefd as CollectorFactory)];

/// All collectors available to the host, keyed by subsystem.
pub fn factories() -> &'static [(&'static str, CollectorFactory)] {
    FACTORIES
}

/// Looks up the constructor registered under `name`.
pub fn factory(name: &str) -> Option<CollectorFactory> {
    factories()
        .iter()
        .find(|(key, _)| *key == name)
        .map(|(_, factory)| *factory)
}

/// Result of running one collector during a cycle.
#[derive(Debug)]
pub struct ScrapeOutcome {
    pub collector: &'static str,
    pub duration: Duration,
    pub result: Result<(), CollectorError>,
}

impl ScrapeOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// The set of collectors a host runs on every cycle.
pub struct CollectorRegistry {
    namespace: String,
    collectors: Vec<Box<dyn Collector>>,
}

impl CollectorRegistry {
    /// Creates an empty registry whose own telemetry uses `namespace`.
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            collectors: Vec::new(),
        }
    }

    /// Builds the collectors named in `config.collectors.enabled`.
    pub fn from_config(config: &Config, fs: Arc<dyn FileSystem>) -> Result<Self> {
        let ctx = CollectorContext {
            fs,
            procfs_path: config.procfs_path.clone(),
            namespace: config.namespace.clone(),
        };
        let mut registry = Self::new(config.namespace.clone());
        for name in &config.collectors.enabled {
            if registry.contains(name) {
                continue;
            }
            match factory(name) {
                Some(factory) => registry.register(factory(&ctx)),
                None => {
                    let known: Vec<&str> = factories().iter().map(|(key, _)| *key).collect();
                    bail!(
                        "unknown collector '{}' (available: {})",
                        name,
                        known.join(", ")
                    );
                }
            }
        }
        Ok(registry)
    }

    pub fn register(&mut self, collector: Box<dyn Collector>) {
        debug!("Registered collector '{}'", collector.name());
        self.collectors.push(collector);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.collectors.iter().any(|c| c.name() == name)
    }

    /// Names of the registered collectors, in registration order.
    pub fn names(&self) -> Vec<&'static str> {
        self.collectors.iter().map(|c| c.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.collectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collectors.is_empty()
    }

    /// Runs one collection cycle over every collector.
    ///
    /// A failing collector is logged and reported in the returned outcomes;
    /// the remaining collectors still run.
    pub fn collect_all(&self, sink: &mut dyn MetricSink) -> Vec<ScrapeOutcome> {
        let success_name = build_fq_name(&self.namespace, "scrape", "collector_success");
        let duration_name = build_fq_name(&self.namespace, "scrape", "collector_duration_seconds");

        self.collectors
            .iter()
            .map(|collector| {
                let start = Instant::now();
                let result = collector.update(sink);
                let duration = start.elapsed();
                let name = collector.name();

                match &result {
                    Ok(()) => debug!(
                        "Collector '{}' succeeded in {:.3}s",
                        name,
                        duration.as_secs_f64()
                    ),
                    Err(e) => error!(
                        "Collector '{}' failed after {:.3}s: {}",
                        name,
                        duration.as_secs_f64(),
                        e
                    ),
                }
                metrics::gauge!(duration_name.clone(), "collector" => name)
                    .set(duration.as_secs_f64());
                metrics::gauge!(success_name.clone(), "collector" => name)
                    .set(if result.is_ok() { 1.0 } else { 0.0 });

                ScrapeOutcome {
                    collector: name,
                    duration,
                    result,
                }
            })
            .collect()
    }
}
