//! Side-channel debug log so menu sessions can be traced without touching stdout.
//!
//! The menu owns the terminal while it runs; any diagnostic output on stdout
//! would corrupt the frame. Everything goes to a rotating temp file instead.

use std::{
    env, fs,
    io::Write,
    panic,
    path::PathBuf,
    sync::{
        atomic::{AtomicBool, Ordering},
        Mutex, OnceLock,
    },
    time::{SystemTime, UNIX_EPOCH},
};

const LOG_MAX_BYTES: u64 = 2 * 1024 * 1024;

static LOG_ENABLED: AtomicBool = AtomicBool::new(false);
static LOG_FILE: OnceLock<Mutex<Option<LogFile>>> = OnceLock::new();

/// Path of the rotating debug log.
pub fn log_file_path() -> PathBuf {
    env::var("SHELLMATE_LOG_FILE")
        .map(PathBuf::from)
        .unwrap_or_else(|_| env::temp_dir().join("shellmate_menu.log"))
}

struct LogFile {
    path: PathBuf,
    file: fs::File,
    bytes_written: u64,
}

impl LogFile {
    fn open(path: PathBuf) -> Option<Self> {
        let mut bytes_written = fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
        if bytes_written > LOG_MAX_BYTES {
            let _ = fs::remove_file(&path);
            bytes_written = 0;
        }
        let file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .ok()?;
        Some(Self {
            path,
            file,
            bytes_written,
        })
    }

    fn write_line(&mut self, line: &str) {
        if self.bytes_written.saturating_add(line.len() as u64) > LOG_MAX_BYTES {
            if let Ok(file) = fs::OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(&self.path)
            {
                self.file = file;
                self.bytes_written = 0;
            }
        }
        if self.file.write_all(line.as_bytes()).is_ok() {
            self.bytes_written = self.bytes_written.saturating_add(line.len() as u64);
        }
    }
}

fn log_file() -> &'static Mutex<Option<LogFile>> {
    LOG_FILE.get_or_init(|| Mutex::new(None))
}

/// Enable or disable the side-channel log for this process.
pub fn init_logging(enabled: bool) {
    LOG_ENABLED.store(enabled, Ordering::Relaxed);
    let mut slot = log_file()
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    *slot = if enabled {
        LogFile::open(log_file_path())
    } else {
        None
    };
}

pub fn logging_enabled() -> bool {
    LOG_ENABLED.load(Ordering::Relaxed)
}

/// Append one timestamped line to the debug log. No-op unless enabled.
pub fn log_debug(msg: &str) {
    if !LOG_ENABLED.load(Ordering::Relaxed) {
        return;
    }
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    let line = format!("[{timestamp}] {msg}\n");
    let mut slot = log_file()
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    if let Some(file) = slot.as_mut() {
        file.write_line(&line);
    }
}

/// Record a panic location in the debug log before the terminal is restored.
pub fn log_panic(info: &panic::PanicHookInfo<'_>) {
    let location = info
        .location()
        .map(|loc| format!("{}:{}", loc.file(), loc.line()))
        .unwrap_or_else(|| "unknown".to_string());
    log_debug(&format!(
        "panic at {location} (v{})",
        env!("CARGO_PKG_VERSION")
    ));
}

#[cfg(test)]
mod tests {
    use super::*;

    // One test owns the global logging state; splitting it would race under
    // the parallel test runner.
    #[test]
    fn log_debug_respects_enable_state() {
        let path = std::env::temp_dir().join("shellmate_logging_test.log");
        let _ = fs::remove_file(&path);
        std::env::set_var("SHELLMATE_LOG_FILE", &path);

        init_logging(false);
        log_debug("disabled message");
        assert!(!logging_enabled());
        assert!(fs::read_to_string(&path)
            .unwrap_or_default()
            .is_empty());

        init_logging(true);
        log_debug("enabled message");
        let contents = fs::read_to_string(&path).unwrap_or_default();
        assert!(contents.contains("enabled message"));
        assert!(!contents.contains("disabled message"));

        init_logging(false);
        let _ = fs::remove_file(&path);
        std::env::remove_var("SHELLMATE_LOG_FILE");
    }
}
