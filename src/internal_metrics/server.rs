//! # Metrics Server
//!
//! This module defines the `MetricsServer`, an `axum`-based web server that
//! exposes collected metrics to a Prometheus scraper.
//!
//! Every request to the telemetry path runs one collection cycle across the
//! registry before rendering, so scrape cadence is owned by the scraper.
//! Collector failures are logged by the registry; the affected metrics are
//! simply stale or absent in that response.
//!
//! The server listens for a signal from the main application to stop serving
//! requests and terminate cleanly.

use crate::collector::CollectorRegistry;
use crate::internal_metrics::RecorderSink;
use axum::{extract::State, routing::get, Router};
use log::error;
use metrics_exporter_prometheus::PrometheusHandle;
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::trace;

#[derive(Clone)]
struct ScrapeState {
    prom_handle: PrometheusHandle,
    registry: Arc<CollectorRegistry>,
}

/// A server that exposes metrics to a Prometheus scraper.
pub struct MetricsServer {
    listener: TcpListener,
    state: ScrapeState,
    telemetry_path: String,
    shutdown_rx: watch::Receiver<()>,
}

impl MetricsServer {
    /// Creates a new `MetricsServer` but does not spawn it.
    ///
    /// # Arguments
    ///
    /// * `listener` - A `TcpListener` that has already been bound to an address.
    /// * `prom_handle` - A `PrometheusHandle` used to render the metrics.
    /// * `registry` - The collectors run before each render.
    /// * `telemetry_path` - The route metrics are served under.
    /// * `shutdown_rx` - A watch channel receiver for graceful shutdown.
    pub fn new(
        listener: TcpListener,
        prom_handle: PrometheusHandle,
        registry: Arc<CollectorRegistry>,
        telemetry_path: String,
        shutdown_rx: watch::Receiver<()>,
    ) -> Self {
        Self {
            listener,
            state: ScrapeState {
                prom_handle,
                registry,
            },
            telemetry_path,
            shutdown_rx,
        }
    }

    /// Returns a future that runs the server until a shutdown signal is received.
    pub fn run(self) -> impl Future<Output = ()> {
        let Self {
            listener,
            state,
            telemetry_path,
            mut shutdown_rx,
        } = self;
        let app = Router::new()
            .route(&telemetry_path, get(scrape))
            .with_state(state);

        async move {
            tokio::select! {
                biased;
                _ = shutdown_rx.changed() => {
                    trace!("Metrics server received shutdown signal via select.");
                }
                result = axum::serve(listener, app.into_make_service()) => {
                    if let Err(e) = result {
                        error!("Metrics server error: {}", e);
                    }
                }
            }
            trace!("Metrics server task finished.");
        }
    }
}

async fn scrape(State(state): State<ScrapeState>) -> String {
    let registry = state.registry.clone();
    // Collectors read procfs synchronously.
    let collected = tokio::task::spawn_blocking(move || {
        registry.collect_all(&mut RecorderSink::new());
    })
    .await;
    if let Err(e) = collected {
        error!("Collection task failed: {}", e);
    }
    state.prom_handle.render()
}
