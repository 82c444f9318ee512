//=========================================================================
// Log Capture (tests only)
//=========================================================================
//
// Installs a process-wide `log` backend that records every line with the
// emitting thread. Tests run on separate threads, so `lines()` filtered by
// the current thread only sees the calling test's output.
//
//=========================================================================

use std::sync::{Mutex, Once};
use std::thread::{self, ThreadId};

use log::{Level, LevelFilter, Log, Metadata, Record};

struct CaptureLogger;

static LOGGER: CaptureLogger = CaptureLogger;
static INSTALL: Once = Once::new();
static RECORDS: Mutex<Vec<(ThreadId, Level, String)>> = Mutex::new(Vec::new());

impl Log for CaptureLogger {
    fn enabled(&self, _metadata: &Metadata<'_>) -> bool {
        true
    }

    fn log(&self, record: &Record<'_>) {
        if let Ok(mut records) = RECORDS.lock() {
            records.push((thread::current().id(), record.level(), record.args().to_string()));
        }
    }

    fn flush(&self) {}
}

/// Routes `log` output into the capture buffer. Safe to call repeatedly.
pub(crate) fn install() {
    INSTALL.call_once(|| {
        let _ = log::set_logger(&LOGGER);
        log::set_max_level(LevelFilter::Trace);
    });
}

/// Lines the current thread logged at `level`, oldest first.
pub(crate) fn lines(level: Level) -> Vec<String> {
    let current = thread::current().id();
    RECORDS
        .lock()
        .map(|records| {
            records
                .iter()
                .filter(|(id, l, _)| *id == current && *l == level)
                .map(|(_, _, line)| line.clone())
                .collect()
        })
        .unwrap_or_default()
}
