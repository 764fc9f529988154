//! Log output setup.

use log::LevelFilter;

/// Parse a level name, falling back to `Info` for anything unrecognised.
pub fn level_filter(level: &str) -> LevelFilter {
    level.trim().parse().unwrap_or(LevelFilter::Info)
}

/// Install a stdout logger printing `[target LEVEL] message`.
///
/// Fails if a logger is already installed.
pub fn setup_logging(level: &str) -> Result<(), log::SetLoggerError> {
    fern::Dispatch::new()
        .format(|out, msg, record| {
            out.finish(format_args!("[{} {}] {}", record.target(), record.level(), msg))
        })
        .level(level_filter(level))
        .chain(std::io::stdout())
        .apply()
}
