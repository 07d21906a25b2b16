//! Logging setup for the CLI and MCP modes

use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::Level;

/// Directory under the home directory that holds MCP logs
pub const LOG_DIR_NAME: &str = ".oden-sync";
/// Environment variable naming the MCP log file
pub const LOG_FILE_ENV: &str = "ODEN_SYNC_LOG_FILE";
const DEFAULT_LOG_FILE: &str = "mcp.log";

/// Pick the log level from the global flags
///
/// MCP mode always logs at debug since the log file is the only place a
/// server's behavior can be inspected.
pub fn log_level(is_mcp_mode: bool, quiet: bool, debug: bool, verbose: bool) -> Level {
    if is_mcp_mode {
        Level::DEBUG
    } else if quiet {
        Level::ERROR
    } else if debug {
        Level::DEBUG
    } else if verbose {
        Level::TRACE
    } else {
        Level::INFO
    }
}

/// Where MCP mode writes its log
pub fn mcp_log_path() -> PathBuf {
    let log_dir = match dirs::home_dir() {
        Some(home) => home.join(LOG_DIR_NAME),
        None => PathBuf::from(LOG_DIR_NAME),
    };

    let log_filename =
        std::env::var(LOG_FILE_ENV).unwrap_or_else(|_| DEFAULT_LOG_FILE.to_string());
    log_dir.join(log_filename)
}

/// A thread-safe writer that flushes and syncs every write to disk.
///
/// In MCP mode stdout carries the protocol, so logs go to a file that must
/// be readable while the server is still running.
///
/// ```no_run
/// use std::fs::File;
/// use std::io::Write;
/// use std::sync::{Arc, Mutex};
/// use oden_sync_cli::logging::FileWriterGuard;
///
/// let file = File::create("mcp.log").unwrap();
/// let mut guard = FileWriterGuard::new(Arc::new(Mutex::new(file)));
/// guard.write_all(b"Log message\n").unwrap();
/// ```
pub struct FileWriterGuard {
    file: Arc<Mutex<File>>,
}

impl FileWriterGuard {
    pub fn new(file: Arc<Mutex<File>>) -> Self {
        Self { file }
    }

    // A panic while logging must not silence every later log line.
    fn lock(&self) -> MutexGuard<'_, File> {
        self.file
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Write for FileWriterGuard {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut file = self.lock();
        let written = file.write(buf)?;
        file.flush()?;
        file.sync_all()?;
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut file = self.lock();
        file.flush()?;
        file.sync_all()
    }
}
