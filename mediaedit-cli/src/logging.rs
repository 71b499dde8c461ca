// ============================================================================
// mediaedit-cli/src/logging.rs
// ============================================================================
//
// LOGGING: env_logger setup for the CLI
//
// The bridge logs through the `log` facade; this module installs env_logger
// as the backend. Log lines go to stderr so stdout carries only payloads.
//
// USAGE:
// - default: info
// - --verbose: debug (ffmpeg command lines, probe results)
// - RUST_LOG overrides both, e.g. RUST_LOG=mediaedit_core=trace

use log::LevelFilter;
use owo_colors::OwoColorize;
use std::io::Write;

/// Returns the current local timestamp formatted as "YYYY-MM-DD HH:MM:SS".
pub fn get_timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Initializes the logger at info, or debug when `verbose` is set.
pub fn init(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    init_with_level(level);
}

/// Initializes the logger with a specific default level.
///
/// Colors are only emitted when stderr is a terminal.
pub fn init_with_level(level: LevelFilter) {
    let colored = console::Term::stderr().features().colors_supported();

    let result = env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format(move |buf, record| {
            let level_str = match record.level() {
                log::Level::Error => "ERROR",
                log::Level::Warn => "WARN ",
                log::Level::Info => "INFO ",
                log::Level::Debug => "DEBUG",
                log::Level::Trace => "TRACE",
            };

            if !colored {
                return writeln!(buf, "{} {} {}", get_timestamp(), level_str, record.args());
            }

            let level_colored = match record.level() {
                log::Level::Error => level_str.bright_red().to_string(),
                log::Level::Warn => level_str.yellow().to_string(),
                log::Level::Info => level_str.green().to_string(),
                log::Level::Debug => level_str.blue().to_string(),
                log::Level::Trace => level_str.magenta().to_string(),
            };

            writeln!(
                buf,
                "{} {} {}",
                get_timestamp().dimmed(),
                level_colored,
                record.args()
            )
        })
        .try_init();

    if result.is_ok() {
        log::debug!("Logger initialized with level: {}", level);
    }
}
