use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::fmt::time::{ChronoLocal, ChronoUtc};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

/// Timestamp format: 2026-02-14 19:44:09.123 -08:00
const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f %:z";

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

#[derive(Clone, Copy, clap::ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Filter directive, suppressing noisy HTML-parsing crates at debug/trace.
    fn directive(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn  => "warn",
            LogLevel::Info  => "info",
            LogLevel::Debug => "debug,selectors=warn,html5ever=warn,hyper_util=info,rustls=info",
            LogLevel::Trace => "trace,selectors=warn,html5ever=warn",
        }
    }
}

/// Install the global subscriber: console output plus, when `log_file` can
/// be opened, an ANSI-free copy of every event in the run log.
///
/// Returns the error from opening the log file, if any, after logging is up
/// so the caller can report it through tracing.
pub fn init(level: LogLevel, utc: bool, log_file: Option<&Path>) -> Option<io::Error> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.directive()));

    let mut layers: Vec<BoxedLayer> = vec![console_layer(utc)];

    let mut open_error = None;
    if let Some(path) = log_file {
        match open_append(path) {
            Ok(file) => layers.push(file_layer(file, utc)),
            Err(e) => open_error = Some(e),
        }
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(env_filter)
        .init();

    open_error
}

fn console_layer(utc: bool) -> BoxedLayer {
    let layer = tracing_subscriber::fmt::layer();
    if utc {
        layer.with_timer(ChronoUtc::new(TIME_FORMAT.to_string())).boxed()
    } else {
        layer.with_timer(ChronoLocal::new(TIME_FORMAT.to_string())).boxed()
    }
}

fn file_layer(file: File, utc: bool) -> BoxedLayer {
    let layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_writer(Mutex::new(file));
    if utc {
        layer.with_timer(ChronoUtc::new(TIME_FORMAT.to_string())).boxed()
    } else {
        layer.with_timer(ChronoLocal::new(TIME_FORMAT.to_string())).boxed()
    }
}

fn open_append(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}
