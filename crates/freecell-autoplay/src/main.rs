//! FreeCell autoplay: deals a game and plays it by following hints.

use freecell_core::Session;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod play;

use config::AutoplayConfig;

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AutoplayConfig::from_env()?;
    info!(game = %config.game, max_moves = config.max_moves, "Starting autoplay...");

    let mut session = Session::new(config.game.get())?;
    let report = play::autoplay(&mut session, config.max_moves)?;

    if config.dump_state {
        println!("{}", serde_json::to_string_pretty(&report.final_state)?);
    }

    Ok(())
}
