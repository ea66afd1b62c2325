//! filefd-exporter - kernel file descriptor statistics for Prometheus

use anyhow::{bail, Result};
use clap::Parser;
use filefd_exporter::{
    cli::Cli,
    collector::CollectorRegistry,
    config::Config,
    fs::RealFs,
    internal_metrics::MetricsBuilder,
    outputs::JsonLinesSink,
};
use log::{error, info};
use std::io::BufWriter;
use std::sync::Arc;
use tokio::sync::watch;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration by layering sources: defaults, file, environment, and CLI args.
    let config = Config::load(&cli).unwrap_or_else(|err| {
        // Manually initialize logger for this specific error
        env_logger::init();
        error!("Failed to load configuration: {}", err);
        std::process::exit(1);
    });

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    info!("-------------------- Configuration --------------------");
    info!("Log Level: {}", config.log_level);
    info!("Procfs Path: {}", config.procfs_path.display());
    info!("Namespace: {}", config.namespace);
    info!("Collectors: {}", config.collectors.enabled.join(", "));
    info!("Listen Address: {}", config.metrics.listen_address);
    info!("Telemetry Path: {}", config.metrics.telemetry_path);
    info!("-------------------------------------------------------");

    let registry = Arc::new(CollectorRegistry::from_config(&config, Arc::new(RealFs::new()))?);

    if cli.once {
        let stdout = std::io::stdout();
        let mut sink = JsonLinesSink::new(BufWriter::new(stdout.lock()));
        let failed = registry
            .collect_all(&mut sink)
            .iter()
            .filter(|outcome| !outcome.is_success())
            .count();
        drop(sink);
        if failed > 0 {
            bail!("{} collector(s) failed", failed);
        }
        return Ok(());
    }

    let (shutdown_tx, shutdown_rx) = watch::channel(());
    let (server, _addr) = MetricsBuilder::new(config.metrics.clone())
        .build(registry, shutdown_rx)
        .await?;
    let server_task = tokio::spawn(server.run());

    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received, stopping metrics server...");
    let _ = shutdown_tx.send(());
    if let Err(e) = server_task.await {
        error!("Metrics server task panicked: {}", e);
    }
    info!("Shutdown complete.");
    Ok(())
}
