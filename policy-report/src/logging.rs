//! Logging for the `policy-report` run: one stderr layer plus an optional
//! append-only log file, both behind a single `EnvFilter`, set up once at
//! start-up with [`init_logging`].

use std::fs::File;
use std::io::{self, IsTerminal};
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use chrono::Local;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::{
    EnvFilter,
    fmt::{
        FmtContext,
        format::{FormatEvent, FormatFields, Writer},
    },
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
};

// --- Formatter ---

/// Local-time timestamp, coloured level, source location, then fields.
struct LocalFmt;

impl<S, N> FormatEvent<S, N> for LocalFmt
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let meta = event.metadata();
        let ansi = writer.has_ansi_escapes();

        if ansi {
            write!(writer, "\x1b[2m")?
        }
        write!(
            writer,
            "{} ",
            Local::now().format("%Y-%m-%dT%H:%M:%S%.6f%:z")
        )?;
        if ansi {
            write!(writer, "\x1b[0m")?
        }

        let (pre, post) = if ansi {
            level_colour(*meta.level())
        } else {
            ("", "")
        };
        write!(writer, "{}{:>5}{} ", pre, meta.level(), post)?;

        let file = meta.file().map(|f| {
            f.strip_prefix("src/")
                .or_else(|| f.strip_prefix("src\\"))
                .unwrap_or(f)
        });
        if let (Some(file), Some(line)) = (file, meta.line()) {
            if ansi {
                write!(writer, "\x1b[36m{file}:{line}\x1b[0m ")?;
            } else {
                write!(writer, "{file}:{line} ")?;
            }
        }

        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

fn level_colour(level: Level) -> (&'static str, &'static str) {
    match level {
        Level::ERROR => ("\x1b[1;31m", "\x1b[0m"),
        Level::WARN => ("\x1b[1;33m", "\x1b[0m"),
        Level::INFO => ("\x1b[1;32m", "\x1b[0m"),
        Level::DEBUG => ("\x1b[1;34m", "\x1b[0m"),
        Level::TRACE => ("\x1b[1;35m", "\x1b[0m"),
    }
}

// --- Public API ---

/// Filter directive used when `RUST_LOG` is not set.
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose { "info" } else { "warn" }
}

fn make_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)))
}

/// Initializes logging. Call once at startup.
///
/// - Stderr: coloured when attached to a terminal, plain when piped.
/// - File: appended to `log_file` when given, never coloured.
/// - Level: `warn`, or `info` with `verbose`; `RUST_LOG` overrides both.
pub fn init_logging(
    verbose: bool,
    log_file: Option<&Path>,
) -> Result<()> {
    let file_layer = match log_file {
        Some(path) => {
            let file = File::options()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("cannot open log file '{}'", path.display()))?;
            Some(
                tracing_subscriber::fmt::layer()
                    .event_format(LocalFmt)
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };

    let stderr_layer = tracing_subscriber::fmt::layer()
        .event_format(LocalFmt)
        .with_ansi(io::stderr().is_terminal())
        .with_writer(io::stderr);

    tracing_subscriber::registry()
        .with(make_filter(verbose))
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .context("logging already initialized")?;

    Ok(())
}
