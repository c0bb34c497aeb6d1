#![allow(dead_code)]
use std::sync::{Mutex, Once};

use log::{Level, LevelFilter, Log, Metadata, Record};

/// Logger that keeps every record so tests can assert on warnings.
struct CaptureLogger {
    records: Mutex<Vec<(Level, String)>>,
}

impl Log for CaptureLogger {
    fn enabled(&self, _metadata: &Metadata<'_>) -> bool {
        true
    }

    fn log(&self, record: &Record<'_>) {
        if let Ok(mut records) = self.records.lock() {
            records.push((record.level(), record.args().to_string()));
        }
    }

    fn flush(&self) {}
}

static LOGGER: CaptureLogger = CaptureLogger {
    records: Mutex::new(Vec::new()),
};
static INIT: Once = Once::new();

/// Install the capturing logger (once per test binary) and clear old records.
pub fn capture_logs() {
    INIT.call_once(|| {
        log::set_logger(&LOGGER).expect("no other logger installed");
        log::set_max_level(LevelFilter::Trace);
    });
    LOGGER.records.lock().unwrap().clear();
}

/// Drain the warnings captured since the last call.
pub fn take_warnings() -> Vec<String> {
    let mut records = LOGGER.records.lock().unwrap();
    records
        .drain(..)
        .filter_map(|(level, msg)| (level == Level::Warn).then_some(msg))
        .collect()
}
