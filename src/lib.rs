use anyhow::Context as _;
use dotenvy::dotenv;
use tracing::info;

pub mod config;
pub mod engine;
pub mod host;

use crate::{config::HostConfig, engine::repo::MemoryInventoryRepo};

// ----------------------------
// Entrypoint
// ----------------------------

pub fn init_tracing() {
    // nie wywali się, jeśli już zainicjalizowane
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

pub async fn run() -> anyhow::Result<()> {
    init_tracing();
    dotenv().ok();

    let cfg = HostConfig::from_env().context("loading host config")?;
    info!(
        tick_ms = cfg.tick_ms,
        minigame = ?cfg.minigame,
        difficulty = ?cfg.session.difficulty,
        duration = ?cfg.session.duration,
        "starting mini challenge host"
    );

    let repo = MemoryInventoryRepo::new();
    let outcome = host::run_once(&cfg, &repo).await?;

    println!(
        "{}: damage dealt {}",
        if outcome.won { "won" } else { "lost" },
        outcome.damage
    );
    Ok(())
}
