// Logging setup - tracing subscriber writing to stderr
//
// Filter precedence: POST_DOWNLOADER_LOG, then RUST_LOG, then the built-in
// default for the requested verbosity.

use std::io;
use std::sync::OnceLock;

use tracing::Level;
use tracing_subscriber::EnvFilter;

static INIT_GUARD: OnceLock<()> = OnceLock::new();

const ENV_FILTER_VAR: &str = "POST_DOWNLOADER_LOG";

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("failed to parse log filter: {0}")]
    FilterParse(#[from] tracing_subscriber::filter::ParseError),
    #[error("logging already initialized")]
    AlreadyInitialized,
    #[error("failed to install subscriber: {0}")]
    Install(String),
}

/// `-v` count to the default level for this crate's targets
pub fn level_for(verbosity: u8) -> Level {
    match verbosity {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

fn default_filter(level: Level) -> String {
    let level = level.as_str().to_lowercase();
    format!("warn,post_downloader={level},post_downloader_lib={level}")
}

fn build_env_filter(level: Level) -> Result<EnvFilter, LoggingError> {
    for var in [ENV_FILTER_VAR, "RUST_LOG"] {
        if let Ok(filter) = std::env::var(var) {
            return Ok(EnvFilter::try_new(filter)?);
        }
    }
    Ok(EnvFilter::try_new(default_filter(level))?)
}

/// Install the global subscriber. Call once at startup.
pub fn init(verbosity: u8) -> Result<(), LoggingError> {
    if INIT_GUARD.set(()).is_err() {
        return Err(LoggingError::AlreadyInitialized);
    }

    let filter = build_env_filter(level_for(verbosity))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(verbosity > 0)
        .try_init()
        .map_err(|e| LoggingError::Install(e.to_string()))
}
