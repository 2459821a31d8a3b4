// common/src/utils.rs
use std::str::FromStr;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Parse a configured level name, falling back to INFO on anything unknown
pub fn parse_level(level: &str) -> Level {
    Level::from_str(level.trim()).unwrap_or(Level::INFO)
}

/// Setup tracing for consistent logging across the client.
///
/// Returns `false` when a global subscriber was already installed; the
/// existing one is kept.
pub fn setup_tracing(level: &str) -> bool {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(parse_level(level))
        .finish();

    match tracing::subscriber::set_global_default(subscriber) {
        Ok(()) => true,
        Err(_) => {
            tracing::debug!("Tracing subscriber already installed, keeping it");
            false
        }
    }
}
