use crate::cli::{
    actions::Action,
    commands::{self, logging::ARG_LOG_JSON, logging::ARG_VERBOSITY},
    dispatch::handler,
    telemetry,
};
use anyhow::Result;
use tracing::Level;

/// Maps the `-v` count to a log level; no flag leaves the default.
#[must_use]
pub const fn get_verbosity_level(verbosity_level: u8) -> Option<Level> {
    match verbosity_level {
        0 => None,
        1 => Some(Level::WARN),
        2 => Some(Level::INFO),
        3 => Some(Level::DEBUG),
        _ => Some(Level::TRACE),
    }
}

/// Start the CLI
///
/// # Errors
///
/// Returns an error if logging cannot be initialized or the arguments do not
/// map to an action
pub fn start() -> Result<Action> {
    let matches = commands::new().get_matches();

    let verbosity_level = get_verbosity_level(
        matches
            .get_one::<u8>(ARG_VERBOSITY)
            .copied()
            .unwrap_or(0),
    );

    telemetry::init(verbosity_level, matches.get_flag(ARG_LOG_JSON))?;

    handler(&matches)
}
