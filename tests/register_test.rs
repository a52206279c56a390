//! Global registration and facade
//!
//! Registration is process-wide, so the whole lifecycle runs in one test.

mod common;

use common::pipeline;
use orbit_log::{
    BuildError, EncoderConfig, EncoderKind, Error, Field, Level, Output, Pipeline, PipelineConfig,
};
use std::panic::{self, AssertUnwindSafe};

fn json_config() -> EncoderConfig {
    EncoderConfig {
        time_format: "rfc3339".into(),
        level_format: "lower".into(),
        ..Default::default()
    }
}

#[test]
fn test_register_lifecycle() {
    // Facade before registration panics with the precondition
    assert!(!orbit_log::is_registered());
    assert!(orbit_log::try_logger().is_none());
    let result = panic::catch_unwind(AssertUnwindSafe(|| orbit_log::info("too early", &[])));
    let payload = result.unwrap_err();
    let message = payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap();
    assert!(message.contains("no logger registered"));

    // A failed build leaves nothing installed
    let unprovisioned = Pipeline::new(PipelineConfig {
        encoder: Some(EncoderKind::Json.encoder(json_config())),
        level: Level::Debug,
        output: Some(Output::new(std::io::sink())),
    })
    .unwrap();
    let err = orbit_log::register(&unprovisioned).unwrap_err();
    assert_eq!(err.to_string(), "log: failed to register logger");
    assert!(matches!(
        err,
        Error::Registration(BuildError::EncoderNotProvisioned(EncoderKind::Json))
    ));
    assert!(!orbit_log::is_registered());

    // First successful registration wins
    let (first, first_buffer) = pipeline(EncoderKind::Json, json_config(), Level::Debug);
    orbit_log::register(&first).unwrap();
    assert!(orbit_log::is_registered());
    assert_eq!(orbit_log::logger().level(), Level::Debug);
    assert_eq!(orbit_log::core().encoder().kind(), EncoderKind::Json);

    // Later registrations are silent no-ops
    let (second, second_buffer) = pipeline(EncoderKind::Console, json_config(), Level::Error);
    orbit_log::register(&second).unwrap();
    let guard = orbit_log::cli::register_encoder(
        EncoderKind::Logfmt,
        EncoderConfig::default(),
        Level::Warn,
        second_buffer.output(),
    )
    .unwrap();
    drop(guard);
    assert_eq!(orbit_log::logger().level(), Level::Debug);

    // Facade writes through the first pipeline with the application's call site
    let line = line!() + 1;
    orbit_log::info("hello", &[Field::string("user", "ada")]);
    orbit_log::with(&[Field::int("conn", 4)]).warn("slow peer", &[]);
    orbit_log::named("sched").debug("tick", &[]);
    if let Some(entry) = orbit_log::check(Level::Error, "checked") {
        entry.write(&[Field::bool("retry", true)]);
    }

    // tracing events and log records are redirected
    tracing::info!(shard = 9, "from tracing");
    log::warn!("from log {}", 5);

    orbit_log::sync();

    assert!(second_buffer.contents().is_empty());

    let records = first_buffer.json_lines();
    let messages: Vec<&str> = records
        .iter()
        .map(|record| record["msg"].as_str().unwrap())
        .collect();
    assert_eq!(
        messages,
        ["hello", "slow peer", "tick", "checked", "from tracing", "from log 5"]
    );

    assert_eq!(records[0]["level"], "info");
    assert_eq!(records[0]["user"], "ada");
    assert_eq!(records[0]["caller"], format!("{}:{}", file!(), line));

    assert_eq!(records[1]["conn"], 4);
    assert_eq!(records[1]["caller"], format!("{}:{}", file!(), line + 1));
    assert_eq!(records[2]["logger"], "sched");
    assert_eq!(records[2]["caller"], format!("{}:{}", file!(), line + 2));
    assert_eq!(records[2]["level"], "debug");
    assert_eq!(records[3]["retry"], true);

    assert_eq!(records[4]["level"], "info");
    assert_eq!(records[4]["shard"], 9);
    assert_eq!(records[4]["target"], "register_test");
    assert!(records[4]["caller"]
        .as_str()
        .unwrap()
        .starts_with("tests/register_test.rs:"));

    assert_eq!(records[5]["level"], "warn");
    assert_eq!(records[5]["target"], "register_test");
    assert!(records[5]["caller"]
        .as_str()
        .unwrap()
        .starts_with("tests/register_test.rs:"));
}
