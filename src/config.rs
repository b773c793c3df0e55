use bank::Result;

use log::LevelFilter;
use simple_logger::SimpleLogger;

/// Logs to stderr at `Warn` unless overridden by `RUST_LOG`
pub fn configure_app() -> Result {
    SimpleLogger::new()
        .with_level(LevelFilter::Warn)
        .env()
        .init()?;

    return Ok(());
}
