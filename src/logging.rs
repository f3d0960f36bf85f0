//! Terminal logger setup.
//!
//! The level defaults to `Info` and can be overridden through
//! `VIDEO_DOWNLOADER_LOG` (`off`, `error`, `warn`, `info`, `debug`, `trace`).

use log::LevelFilter;
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};

const LEVEL_ENV: &str = "VIDEO_DOWNLOADER_LOG";

pub fn initialize() {
    let level = level_from(std::env::var(LEVEL_ENV).ok().as_deref());

    let config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .build();

    if let Err(err) = TermLogger::init(level, config, TerminalMode::Mixed, ColorChoice::Auto) {
        eprintln!("Warning: could not initialize logging: {}", err);
    }
}

fn level_from(value: Option<&str>) -> LevelFilter {
    value
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(LevelFilter::Info)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_from() {
        assert_eq!(level_from(None), LevelFilter::Info);
        assert_eq!(level_from(Some("debug")), LevelFilter::Debug);
        assert_eq!(level_from(Some(" TRACE ")), LevelFilter::Trace);
        assert_eq!(level_from(Some("loud")), LevelFilter::Info);
    }
}
