//! Shared test helpers
#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use orbit_log::logger::{Clock, TerminationHook};
use orbit_log::{EncoderConfig, EncoderKind, Entry, Level, Output, Pipeline, PipelineConfig};
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

/// In-memory sink whose clones share one buffer
#[derive(Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }

    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }

    pub fn json_lines(&self) -> Vec<serde_json::Value> {
        self.lines()
            .iter()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    pub fn output(&self) -> Output {
        Output::new(self.clone())
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    pub fn jan_15() -> Self {
        Self(Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Termination hook that records levels instead of panicking or exiting
#[derive(Default)]
pub struct RecordingHook(Mutex<Vec<(Level, String)>>);

impl RecordingHook {
    pub fn calls(&self) -> Vec<(Level, String)> {
        self.0.lock().unwrap().clone()
    }
}

impl TerminationHook for RecordingHook {
    fn terminate(&self, entry: &Entry) {
        self.0
            .lock()
            .unwrap()
            .push((entry.level, entry.message.clone()));
    }
}

/// A provisioned pipeline writing to a fresh buffer
pub fn pipeline(kind: EncoderKind, config: EncoderConfig, level: Level) -> (Pipeline, SharedBuffer) {
    let mut encoder = kind.encoder(config);
    encoder.provision().unwrap();
    let buffer = SharedBuffer::default();
    let pipeline = Pipeline::new(PipelineConfig {
        encoder: Some(encoder),
        level,
        output: Some(buffer.output()),
    })
    .unwrap();
    (pipeline, buffer)
}
