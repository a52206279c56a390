//! Registration when the process already has a `log` logger
//!
//! Global state, so this file holds a single test.

mod common;

use common::pipeline;
use orbit_log::{EncoderConfig, EncoderKind, Level};
use std::sync::atomic::{AtomicUsize, Ordering};

struct CountingLogger(AtomicUsize);

impl log::Log for CountingLogger {
    fn enabled(&self, _: &log::Metadata<'_>) -> bool {
        true
    }

    fn log(&self, _: &log::Record<'_>) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }

    fn flush(&self) {}
}

static EXISTING: CountingLogger = CountingLogger(AtomicUsize::new(0));

#[test]
fn test_register_with_existing_log_logger() {
    log::set_logger(&EXISTING).unwrap();
    log::set_max_level(log::LevelFilter::Info);

    let config = EncoderConfig {
        time_format: "rfc3339".into(),
        level_format: "lower".into(),
        ..Default::default()
    };
    let (pipeline, buffer) = pipeline(EncoderKind::Json, config, Level::Info);
    orbit_log::register(&pipeline).unwrap();
    assert!(orbit_log::is_registered());

    tracing::info!(shard = 2, "from tracing");
    log::info!("from log");
    orbit_log::sync();

    let records = buffer.json_lines();
    let messages: Vec<&str> = records
        .iter()
        .map(|record| record["msg"].as_str().unwrap())
        .collect();
    assert_eq!(messages, ["log: log records not redirected", "from tracing"]);
    assert_eq!(records[0]["level"], "warn");
    assert!(records[0]["reason"].is_string());
    assert_eq!(records[1]["shard"], 2);

    // The logger that was already there keeps its records
    assert_eq!(EXISTING.0.load(Ordering::SeqCst), 1);
}
