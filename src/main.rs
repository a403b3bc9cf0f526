//! Meshwatch daemon entry point.

use std::sync::Arc;
use std::time::Duration;

use log::{error, info, warn};
use tokio::signal;
use tokio::time::interval;

use meshwatch::bridge::UdpBridge;
use meshwatch::config::Config;
use meshwatch::service::NetworkService;
use meshwatch::views;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    env_logger::init();

    // Load configuration
    let cfg = Config::load()?;
    info!("Starting meshwatch daemon with config: {:?}", cfg);

    // Aggregator over the local node API
    let bridge = Arc::new(UdpBridge::from_config(&cfg));
    let service = NetworkService::new(bridge, Duration::from_millis(cfg.poll_interval_ms));
    service.start().await;

    // Periodic status report
    let reporter = {
        let service = service.clone();
        let period = Duration::from_secs(cfg.status_interval_secs);
        tokio::spawn(async move {
            let mut ticker = interval(period);
            loop {
                ticker.tick().await;
                let state = service.state().await;
                if let Some(err) = &state.error {
                    warn!("Topology state degraded: {}", err);
                }
                if state.interfaces.is_empty() {
                    info!("No interfaces reported");
                    continue;
                }
                for group in views::group_by(&state.interfaces) {
                    info!("Group {}: {}/{} online", group.name, group.active, group.total);
                }
            }
        })
    };

    // Graceful Shutdown
    match signal::ctrl_c().await {
        Ok(()) => {
            info!("Received Ctrl+C, shutting down...");
        }
        Err(err) => {
            error!("Unable to listen for shutdown signal: {}", err);
        }
    }

    reporter.abort();
    service.stop().await;

    info!("Shutdown complete.");
    Ok(())
}
