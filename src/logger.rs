use std::io::Write;

use log::LevelFilter;

/// Level used when neither the CLI nor `RUST_LOG` set one.
const DEFAULT_LEVEL: LevelFilter = LevelFilter::Warn;

/// Pick the log level: explicit argument first, then `RUST_LOG`, then the default.
pub fn log_level(level: Option<&str>) -> LevelFilter {
    level.and_then(|l| l.parse::<LevelFilter>().ok())
        .or_else(|| std::env::var("RUST_LOG").ok().and_then(|v| v.parse().ok()))
        .unwrap_or(DEFAULT_LEVEL)
}

/// Initialize `env_logger` on stderr. Calling it again is a no-op.
pub fn init_logging(level: Option<&str>) {
    let level = log_level(level);
    let result = env_logger::Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(buf, "[{} {:5}] {}", buf.timestamp_seconds(), record.level(), record.args())
        })
        .try_init();
    if result.is_ok() {
        log::debug!("Logger initialized (level: {})", level);
    }
}
