//! Per-run log file for the dispatcher.
//!
//! Traffic in both directions is recorded: `<--` for lines read from the event
//! source, `-->` for commands written to the sink, `[EVENT]` for each dispatch
//! decision. Source lines come from an arbitrary external process and are
//! clipped to `MAX_INCOMING` bytes.

use std::borrow::Cow;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Local};
use once_cell::sync::Lazy;

const MAX_INCOMING: usize = 200;

static LOG_FILE: Lazy<Mutex<Option<File>>> = Lazy::new(|| Mutex::new(None));

fn log_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".gesture-dispatch")
        .join("logs")
}

fn log_file_name(dir: &Path, started: DateTime<Local>) -> PathBuf {
    dir.join(format!("gesture-dispatch_{}.log", started.format("%Y%m%d_%H%M%S")))
}

/// Open a fresh log file for this run and return its path
pub fn init() -> std::io::Result<PathBuf> {
    let dir = log_dir();
    std::fs::create_dir_all(&dir)?;

    let path = log_file_name(&dir, Local::now());
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&path)?;

    if let Ok(mut guard) = LOG_FILE.lock() {
        *guard = Some(file);
    }
    log(&format!("gesture-dispatch {} started", env!("CARGO_PKG_VERSION")));

    Ok(path)
}

/// Append a timestamped line. No-op until `init` succeeds.
pub fn log(msg: &str) {
    let Ok(mut guard) = LOG_FILE.lock() else {
        return;
    };
    if let Some(file) = guard.as_mut() {
        let stamp = Local::now().format("%H:%M:%S%.3f");
        let _ = writeln!(file, "[{}] {}", stamp, msg);
        let _ = file.flush();
    }
}

/// Raw line from the event source
pub fn log_incoming(line: &str) {
    log(&format!("<-- {}", clip(line.trim_end(), MAX_INCOMING)));
}

/// Command line written to the sink
pub fn log_outgoing(line: &str) {
    log(&format!("--> {}", line.trim_end()));
}

/// Outcome of dispatching one event
pub fn log_dispatch(event: &str, outcome: &str) {
    log(&dispatch_line(event, outcome));
}

fn dispatch_line(event: &str, outcome: &str) -> String {
    format!("[EVENT] {} -> {}", clip(event, MAX_INCOMING), outcome)
}

/// Cut `line` to at most `max` bytes on a char boundary.
fn clip(line: &str, max: usize) -> Cow<'_, str> {
    if line.len() <= max {
        return Cow::Borrowed(line);
    }
    let mut end = max;
    while !line.is_char_boundary(end) {
        end -= 1;
    }
    Cow::Owned(format!("{}... ({} bytes)", &line[..end], line.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_clip_short_line_untouched() {
        assert_eq!(clip("event:SWIPE_GESTURE_UP_INCOMPLETE", 200), "event:SWIPE_GESTURE_UP_INCOMPLETE");
    }

    #[test]
    fn test_clip_long_line() {
        let line = "x".repeat(300);
        assert_eq!(clip(&line, 10), "xxxxxxxxxx... (300 bytes)");
    }

    #[test]
    fn test_clip_respects_char_boundary() {
        // 'é' is two bytes; a cut at 3 would split the second one
        assert_eq!(clip("éé", 3), "é... (4 bytes)");
    }

    #[test]
    fn test_dispatch_line() {
        assert_eq!(
            dispatch_line("MOUSE_GESTURE_UP_INCOMPLETE", "key super+Down"),
            "[EVENT] MOUSE_GESTURE_UP_INCOMPLETE -> key super+Down"
        );
    }

    #[test]
    fn test_log_file_name() {
        let started = Local.with_ymd_and_hms(2026, 3, 4, 5, 6, 7).unwrap();
        assert_eq!(
            log_file_name(Path::new("/tmp/logs"), started),
            PathBuf::from("/tmp/logs/gesture-dispatch_20260304_050607.log")
        );
    }

    #[test]
    fn test_log_before_init_is_noop() {
        log_incoming("event:X\n");
        log_dispatch("X", "unhandled");
    }
}
