//! # Internal Metrics Module
//!
//! Bridges collectors to the `metrics` facade and exposes the result over
//! HTTP in the Prometheus exposition format.
//!
//! ## Components:
//!
//! - **`RecorderSink`**: A `MetricSink` that forwards every emitted gauge to
//!   whichever `metrics` recorder is installed.
//!
//! - **`MetricsBuilder`**: Installs the Prometheus recorder globally, binds
//!   the listener and constructs the `MetricsServer`.
//!
//! - **`MetricsServer`**: (Defined in `server.rs`) An `axum`-based web server
//!   that runs a collection cycle on every scrape and renders the result.

use crate::collector::CollectorRegistry;
use crate::config::MetricsConfig;
use crate::core::{Metric, MetricSink};
use crate::internal_metrics::server::MetricsServer;
use anyhow::{anyhow, Context, Result};
use log::info;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::watch;

pub mod server;

/// Forwards emitted gauges to the installed `metrics` recorder.
#[derive(Debug, Default, Clone, Copy)]
pub struct RecorderSink;

impl RecorderSink {
    pub fn new() -> Self {
        Self
    }
}

impl MetricSink for RecorderSink {
    fn emit(&mut self, metric: Metric) {
        let name = metric.desc.fq_name();
        let value = metric.value;
        metrics::describe_gauge!(name.clone(), metric.desc.help.clone());
        metrics::gauge!(name).set(value);
    }
}

/// Builder for the metrics system.
pub struct MetricsBuilder {
    config: MetricsConfig,
}

impl MetricsBuilder {
    /// Creates a new `MetricsBuilder` with the given configuration.
    pub fn new(config: MetricsConfig) -> Self {
        Self { config }
    }

    /// Installs the Prometheus recorder and returns a server ready to run,
    /// together with the address it is bound to.
    ///
    /// # Arguments
    ///
    /// * `registry` - The collectors to run on every scrape.
    /// * `shutdown_rx` - A watch channel receiver for graceful shutdown.
    pub async fn build(
        self,
        registry: Arc<CollectorRegistry>,
        shutdown_rx: watch::Receiver<()>,
    ) -> Result<(MetricsServer, SocketAddr)> {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();

        // Bind before installing the recorder so a bad address leaves the
        // process without a half-initialised global recorder.
        let listener = TcpListener::bind(self.config.listen_address)
            .await
            .with_context(|| {
                format!(
                    "failed to bind metrics server to {}",
                    self.config.listen_address
                )
            })?;
        let addr = listener
            .local_addr()
            .context("failed to get local address for metrics server")?;

        metrics::set_global_recorder(recorder)
            .map_err(|_| anyhow!("a global metrics recorder is already installed"))?;

        info!(
            "Serving metrics on http://{}{}",
            addr, self.config.telemetry_path
        );
        let server = MetricsServer::new(
            listener,
            handle,
            registry,
            self.config.telemetry_path,
            shutdown_rx,
        );
        Ok((server, addr))
    }
}
