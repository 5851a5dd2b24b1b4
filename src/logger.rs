use std::env;
use std::fmt;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use chrono::Local;
use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILE: &str = "output.log";

pub fn init_logging() -> Result<()> {
    let level = env::var("LOG_LEVEL").unwrap_or_else(|_| "DEBUG".to_string());
    let level = level.to_lowercase();

    let filter = match env::var("RUST_LOG") {
        Ok(rust_log) => EnvFilter::new(rust_log),
        Err(_) => EnvFilter::new(level),
    };

    let path = log_file_path();
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .event_format(LineFormat)
                .with_writer(std::io::stdout),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .event_format(LineFormat)
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .init();

    Ok(())
}

/// `LOG_FILE` if set, otherwise `output.log` beside the executable.
fn log_file_path() -> PathBuf {
    if let Ok(path) = env::var("LOG_FILE") {
        return PathBuf::from(path);
    }
    env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(DEFAULT_LOG_FILE)))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE))
}

/// Renders `<time>, [LEVEL] -(<file>).<function>:<line> - <message>`.
///
/// The function is the innermost span's name; outside any span the event's
/// target stands in for it.
pub struct LineFormat;

impl<S, N> FormatEvent<S, N> for LineFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let meta = event.metadata();
        let function = ctx
            .lookup_current()
            .map(|span| span.name())
            .unwrap_or_else(|| meta.target());
        let file = meta.file().map(file_name).unwrap_or("unknown");

        write!(
            writer,
            "{}, [{}] -({}).{}:{} - ",
            Local::now().format("%Y-%m-%d %H:%M:%S,%3f"),
            meta.level(),
            file,
            function,
            meta.line().unwrap_or_default()
        )?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

fn file_name(path: &str) -> &str {
    Path::new(path)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(path)
}
