use std::{path::Path, sync::LazyLock};

use anyhow::Result;
use tracing::level_filters::LevelFilter;
use tracing_appender::rolling::Rotation;
use tracing_subscriber::{
    fmt::{format::FmtSpan, writer::MakeWriterExt},
    EnvFilter,
};

pub const CLI_PREFIX: &str = "cli";

const LOGS_DIR: &str = "logs";
const KEPT_LOG_FILES: usize = 5;
const FALLBACK_LEVEL: &str = "debug";

/// Filter directive limited to this crate. An explicit level wins over `RUST_LOG`.
fn crate_directive(level: Option<LevelFilter>, rust_log: Option<String>) -> String {
    let level = match (level, rust_log) {
        (Some(level), _) => level.to_string().to_lowercase(),
        (None, Some(env)) if !env.trim().is_empty() => env.trim().to_string(),
        _ => FALLBACK_LEVEL.to_string(),
    };
    format!("{}={level}", env!("CARGO_PKG_NAME").replace('-', "_"))
}

/// Sets up logging for one run of the command line.
///
/// Everything is written to a daily file under `<application_path>/logs`. With `console` the same
/// events also go to stderr, stdout stays reserved for reports and JSON.
pub fn enable_logging(
    prefix: &str,
    application_path: &Path,
    level: Option<LevelFilter>,
    console: bool,
) -> Result<()> {
    let journal_logs = tracing_appender::rolling::Builder::new()
        .rotation(Rotation::DAILY)
        .max_log_files(KEPT_LOG_FILES)
        .filename_prefix(prefix)
        .build(application_path.join(LOGS_DIR))?;
    let console_logs = std::io::stderr.with_filter(move |_| console);

    let directive = crate_directive(level, std::env::var("RUST_LOG").ok());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(directive))
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(console_logs.and(journal_logs))
        .pretty()
        .init();
    Ok(())
}

pub static TEST_LOGGING: LazyLock<()> = LazyLock::new(|| {
    let _ = tracing_subscriber::fmt()
        .with_max_level(LevelFilter::TRACE)
        .with_test_writer()
        .pretty()
        .try_init();
});
