use std::sync::Arc;
use std::time::Duration;

use tracing::info;
use tracing_subscriber::EnvFilter;

use common::Config;
use feedback::FeedbackStore;
use market::{AssetCatalog, MarketStore, SyntheticFeed};
use strategy::ThreadRngJitter;

#[tokio::main]
async fn main() {
    // ── Logging ──────────────────────────────────────────────────────────────
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse().unwrap()))
        .init();

    // ── Config ────────────────────────────────────────────────────────────────
    let cfg = Config::from_env();
    info!(port = cfg.listen_port, "PulseBot starting");

    // ── Instrument catalog & market data ──────────────────────────────────────
    let catalog = AssetCatalog::load(&cfg.assets_path);
    info!(assets = catalog.assets.len(), path = %cfg.assets_path, "Asset catalog loaded");

    let market = MarketStore::new(&catalog);
    let mut feed = SyntheticFeed::new(
        market.clone(),
        &catalog,
        Duration::from_millis(cfg.tick_interval_ms),
    );
    feed.seed_history().await;

    // ── Feedback history ──────────────────────────────────────────────────────
    let feedback = Arc::new(FeedbackStore::open(&cfg.feedback_path));
    info!(records = feedback.len().await, path = %cfg.feedback_path, "Feedback store ready");

    // ── Scan API ──────────────────────────────────────────────────────────────
    let state = api::AppState {
        market,
        feedback,
        jitter: Arc::new(ThreadRngJitter),
        api_token: cfg.api_token.clone(),
    };

    // ── Spawn all tasks ───────────────────────────────────────────────────────
    tokio::spawn(feed.run());
    tokio::spawn(api::serve(state, cfg.listen_port));

    // Keep main alive
    info!("All subsystems started. Waiting for shutdown signal.");
    tokio::signal::ctrl_c().await.unwrap();
    info!("Shutdown signal received. Exiting.");
}
