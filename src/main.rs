use clap::Parser;
use orbit_log::cli::{self, Cli};
use orbit_log::config::Settings;
use orbit_log::{Field, Level, Output};
use std::time::Duration;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let _guard = match &cli.config {
        Some(path) => Settings::load(path)?.register(Output::stderr())?,
        None => cli::register_from_flags(&cli.log)?,
    };

    orbit_log::info(
        "orbit-log demo started",
        &[
            Field::string("version", env!("CARGO_PKG_VERSION")),
            Field::uint("requests", u64::from(cli.count)),
        ],
    );

    let http = orbit_log::named("http").with(&[Field::string("listener", "0.0.0.0:8080")]);
    for id in 0..cli.count {
        let elapsed = Duration::from_millis(12 + u64::from(id) * 7);
        http.debug("request received", &[Field::uint("id", u64::from(id))]);
        http.info(
            "request served",
            &[
                Field::uint("id", u64::from(id)),
                Field::int("status", 200),
                Field::duration("elapsed", elapsed),
            ],
        );
    }

    if let Some(entry) = orbit_log::check(Level::Warn, "cache nearly full") {
        entry.write(&[Field::float("used_ratio", 0.93)]);
    }

    let err = std::io::Error::new(std::io::ErrorKind::TimedOut, "upstream timed out");
    orbit_log::error("request failed", &[Field::error(&err)]);

    tracing::info!(subsystem = "tracing", "event routed through the registered logger");

    orbit_log::sync();
    Ok(())
}
