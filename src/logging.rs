//! Structured logging to `<data-dir>/logs/inventory.log`.
//!
//! On each startup the previous logs are rotated (`inventory.log` →
//! `inventory.log.1` → … → `.3`) and a fresh file is opened through a writer
//! that flushes after every event, so a crash loses nothing.

use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use anyhow::Context;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

pub const LOG_FILE_NAME: &str = "inventory.log";

/// Rotated logs kept besides the current one.
const KEEP_ROTATED: u32 = 3;

/// Install the global subscriber writing to `log_dir`.
///
/// `RUST_LOG` wins over `default_filter`. Returns the log file path.
pub fn init(log_dir: &Path, default_filter: &str) -> anyhow::Result<PathBuf> {
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("creating log directory {}", log_dir.display()))?;

    let log_path = log_dir.join(LOG_FILE_NAME);
    rotate(&log_path, KEEP_ROTATED);

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("opening {}", log_path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter(default_filter))
        .with_writer(LogFile::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|e| anyhow::anyhow!("installing tracing subscriber: {e}"))?;

    Ok(log_path)
}

/// Fallback when the log file cannot be opened: log to stderr.
pub fn init_stderr(default_filter: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(default_filter))
        .with_writer(io::stderr)
        .try_init();
}

fn env_filter(default_filter: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter))
}

/// Shift `base` → `base.1` → … → `base.{keep}`, dropping the oldest.
pub fn rotate(base: &Path, keep: u32) {
    if keep == 0 {
        let _ = std::fs::remove_file(base);
        return;
    }

    let numbered = |n: u32| -> PathBuf {
        let mut name = base.as_os_str().to_owned();
        name.push(format!(".{n}"));
        PathBuf::from(name)
    };

    let _ = std::fs::remove_file(numbered(keep));
    for n in (1..keep).rev() {
        let _ = std::fs::rename(numbered(n), numbered(n + 1));
    }
    if base.exists() {
        let _ = std::fs::rename(base, numbered(1));
    }
}

/// The open log file, shared by every tracing event.
///
/// Each event gets its own `LogLine`, which holds the lock while the event
/// is formatted and flushes the buffer when dropped. Lines from concurrent
/// requests never interleave, and each line is on disk before the next
/// event starts.
struct LogFile {
    inner: Mutex<BufWriter<File>>,
}

impl LogFile {
    fn new(file: File) -> Self {
        Self {
            inner: Mutex::new(BufWriter::new(file)),
        }
    }
}

/// Write handle for a single event.
struct LogLine<'a> {
    out: MutexGuard<'a, BufWriter<File>>,
}

impl Write for LogLine<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.out.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

impl Drop for LogLine<'_> {
    fn drop(&mut self) {
        let _ = self.out.flush();
    }
}

impl<'a> MakeWriter<'a> for LogFile {
    type Writer = LogLine<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        // A panic mid-event leaves at worst a partial line; keep logging.
        LogLine {
            out: self.inner.lock().unwrap_or_else(PoisonError::into_inner),
        }
    }
}
