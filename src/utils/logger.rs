use colored::{ColoredString, Colorize};
use env_logger::Builder;
use log::{Level, LevelFilter};
use std::io::Write;

fn level_tag(level: Level) -> Option<ColoredString> {
    match level {
        Level::Error => Some("ERROR".red()),
        Level::Warn => Some("WARN".yellow()),
        Level::Debug | Level::Trace => Some("debug".dimmed()),
        Level::Info => None,
    }
}

/// Install the process-wide logger. Later calls are ignored (tests call this repeatedly).
///
/// Debug lines carry the emitting thread's name (`discoverer`, `fetcher-3`, `reporter`) since
/// that is the only way to tell pipeline stages apart in the log.
pub fn setup_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let _ = Builder::from_default_env()
        .filter_level(LevelFilter::Warn) // dependencies (ureq etc.): warnings only
        .filter_module(env!("CARGO_PKG_NAME"), level)
        .format(|buf, record| {
            let name = env!("CARGO_PKG_NAME").cyan();
            let line = match (record.level(), level_tag(record.level())) {
                (Level::Error | Level::Warn, Some(tag)) => {
                    let target = record.target().to_string().white();
                    format!("[{} {} {}] {}", name, tag, target, record.args())
                }
                (_, Some(tag)) => {
                    let current = std::thread::current();
                    let thread = current.name().unwrap_or("main");
                    format!("[{} {} {}] {}", name, tag, thread, record.args())
                }
                (_, None) => format!("[{}] {}", name, record.args()),
            };
            writeln!(buf, "{}", line)
        })
        .try_init();
}
