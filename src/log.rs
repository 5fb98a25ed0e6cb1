use std::fs::{self, File};
use std::path::Path;
use std::sync::Mutex;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter, filter::Targets, fmt, prelude::__tracing_subscriber_SubscriberExt,
    util::SubscriberInitExt,
};

/// Sends logs to `path`, since the terminal UI owns stdout. RUST_LOG, when
/// set, replaces the `--verbose` based level entirely.
pub fn init_logging(path: &Path, verbose: bool) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = File::options().create(true).append(true).open(path)?;

    let env_filter = EnvFilter::try_from_default_env().ok();
    let app_filter = app_level(verbose, env_filter.is_some())
        .map(|level| Targets::new().with_target("fintrack", level));
    let env_filter = env_filter.unwrap_or_else(|| EnvFilter::new(default_directive(verbose)));

    tracing_subscriber::registry()
        .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        .with(app_filter)
        .with(env_filter)
        .init();
    Ok(())
}

/// Level cap for the crate's own target, or None when RUST_LOG decides.
fn app_level(verbose: bool, env_set: bool) -> Option<LevelFilter> {
    match (env_set, verbose) {
        (true, _) => None,
        (false, true) => Some(LevelFilter::DEBUG),
        (false, false) => Some(LevelFilter::INFO),
    }
}

fn default_directive(verbose: bool) -> &'static str {
    if verbose { "debug" } else { "info" }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_level_follows_verbose_flag() {
        assert_eq!(app_level(false, false), Some(LevelFilter::INFO));
        assert_eq!(app_level(true, false), Some(LevelFilter::DEBUG));
        assert_eq!(default_directive(true), "debug");
    }

    #[test]
    fn test_rust_log_lifts_crate_cap() {
        assert_eq!(app_level(false, true), None);
        assert_eq!(app_level(true, true), None);
    }
}
