//! Input Replay - Main Entry Point
//!
//! Usage: `input-replay [settings.toml] [events.jsonl]`

use replay::{init_logging, run, Settings};
use std::path::PathBuf;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    info!("=== Input Replay v{} ===", env!("CARGO_PKG_VERSION"));

    let mut args = std::env::args().skip(1);
    let settings_path = args.next().map(PathBuf::from);
    let mut settings = Settings::load(settings_path.as_deref())?;
    if let Some(input) = args.next() {
        settings.input = Some(PathBuf::from(input));
    }

    let summary = run(settings).await?;
    info!(
        "Replayed {} ticks ({} rejected) into {}",
        summary.ticks,
        summary.rejected,
        summary.session_dir.display()
    );

    Ok(())
}
