use std::io::IsTerminal;

use tracing::level_filters::LevelFilter;
use tracing::Dispatch;

/// Map `-v`/`-q` counts onto a level. INFO when neither is given.
pub fn level_for(verbose: u8, quiet: u8) -> LevelFilter {
    match i16::from(verbose) - i16::from(quiet) {
        i16::MIN..=-3 => LevelFilter::OFF,
        -2 => LevelFilter::ERROR,
        -1 => LevelFilter::WARN,
        0 => LevelFilter::INFO,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Build a stderr subscriber for one batch run.
///
/// The caller installs it with `tracing::dispatcher::with_default`, which
/// keeps it scoped to that call instead of the whole process.
pub fn dispatch(level: LevelFilter) -> Dispatch {
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(std::io::stderr().is_terminal())
        .finish();
    Dispatch::new(subscriber)
}
