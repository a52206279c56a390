//! Format selectors for time, duration, level and caller rendering
//!
//! Every selector is a closed set of named styles. Parsing a selector string
//! never fails: empty or unrecognized input lands on the documented default.

use crate::entry::Caller;
use crate::level::Level;
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local, SecondsFormat, TimeZone, Utc};
use std::borrow::Cow;
use std::fmt::{self, Write as _};
use std::time::Duration;

const ANSI_RESET: &str = "\x1b[0m";
const ANSI_RED: &str = "\x1b[31m";
const ANSI_YELLOW: &str = "\x1b[33m";
const ANSI_BLUE: &str = "\x1b[34m";
const ANSI_MAGENTA: &str = "\x1b[35m";

/// A rendered primitive, before an encoder decides how to quote it
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar<'a> {
    /// Text, quoted by encoders that quote strings
    Text(Cow<'a, str>),
    Int(i64),
    Uint(u64),
    /// Non-finite values are written as strings by the JSON encoder
    Float(f64),
    Bool(bool),
}

impl fmt::Display for Scalar<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Text(s) => f.write_str(s),
            Scalar::Int(v) => write!(f, "{v}"),
            Scalar::Uint(v) => write!(f, "{v}"),
            Scalar::Float(v) => write!(f, "{v}"),
            Scalar::Bool(v) => write!(f, "{v}"),
        }
    }
}

fn text<'a>(s: impl Into<Cow<'a, str>>) -> Scalar<'a> {
    Scalar::Text(s.into())
}

/// How entry timestamps (and time fields) are rendered
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TimeFormat {
    /// `15:04:05` in local time
    #[default]
    Clock,
    /// Float seconds since the Unix epoch
    UnixSecondsFloat,
    /// Float milliseconds since the Unix epoch
    UnixMilliFloat,
    /// Integer nanoseconds since the Unix epoch
    UnixNano,
    /// `2006-01-02T15:04:05.000Z` in UTC
    Iso8601,
    /// RFC 3339 to the second
    Rfc3339,
    /// RFC 3339 with trailing zeros trimmed from the fraction
    Rfc3339Nano,
    /// `2006/01/02 15:04:05`
    Wall,
    /// [`TimeFormat::Wall`] with milliseconds
    WallMilli,
    /// [`TimeFormat::Wall`] with nanoseconds
    WallNano,
    /// Apache common log format timestamp
    CommonLog,
    /// strftime layout, checked at resolution by formatting a sample instant
    Custom(String),
}

impl From<&str> for TimeFormat {
    fn from(selector: &str) -> Self {
        match selector {
            "" => TimeFormat::Clock,
            "unix_seconds_float" => TimeFormat::UnixSecondsFloat,
            "unix_milli_float" => TimeFormat::UnixMilliFloat,
            "unix_nano" => TimeFormat::UnixNano,
            "iso8601" => TimeFormat::Iso8601,
            "rfc3339" => TimeFormat::Rfc3339,
            "rfc3339_nano" => TimeFormat::Rfc3339Nano,
            "wall" => TimeFormat::Wall,
            "wall_milli" => TimeFormat::WallMilli,
            "wall_nano" => TimeFormat::WallNano,
            "common_log" => TimeFormat::CommonLog,
            layout if is_valid_layout(layout) => TimeFormat::Custom(layout.to_string()),
            _ => TimeFormat::Clock,
        }
    }
}

fn is_valid_layout(layout: &str) -> bool {
    if StrftimeItems::new(layout).any(|item| matches!(item, Item::Error)) {
        return false;
    }
    // Some specifiers parse but refuse to format, e.g. `%#z`.
    match Utc.with_ymd_and_hms(2006, 1, 2, 15, 4, 5).single() {
        Some(sample) => format_layout(sample, layout).is_some(),
        None => false,
    }
}

fn format_layout(ts: DateTime<Utc>, layout: &str) -> Option<String> {
    let mut out = String::new();
    write!(out, "{}", ts.format(layout)).ok()?;
    Some(out)
}

impl TimeFormat {
    /// Render `ts`; a custom layout that fails to format renders as
    /// [`TimeFormat::Clock`]
    pub fn render(&self, ts: DateTime<Utc>) -> Scalar<'static> {
        match self {
            TimeFormat::Clock => text(ts.with_timezone(&Local).format("%H:%M:%S").to_string()),
            TimeFormat::UnixSecondsFloat => Scalar::Float(
                ts.timestamp() as f64 + f64::from(ts.timestamp_subsec_nanos()) / 1e9,
            ),
            TimeFormat::UnixMilliFloat => Scalar::Float(
                ts.timestamp_millis() as f64
                    + f64::from(ts.timestamp_subsec_nanos() % 1_000_000) / 1e6,
            ),
            TimeFormat::UnixNano => Scalar::Int(ts.timestamp_nanos_opt().unwrap_or(
                if ts.timestamp() < 0 {
                    i64::MIN
                } else {
                    i64::MAX
                },
            )),
            TimeFormat::Iso8601 => text(ts.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()),
            TimeFormat::Rfc3339 => text(ts.to_rfc3339_opts(SecondsFormat::Secs, true)),
            TimeFormat::Rfc3339Nano => text(rfc3339_nano(ts)),
            TimeFormat::Wall => text(ts.format("%Y/%m/%d %H:%M:%S").to_string()),
            TimeFormat::WallMilli => text(ts.format("%Y/%m/%d %H:%M:%S%.3f").to_string()),
            TimeFormat::WallNano => text(ts.format("%Y/%m/%d %H:%M:%S%.9f").to_string()),
            TimeFormat::CommonLog => text(ts.format("%d/%b/%Y:%H:%M:%S %z").to_string()),
            TimeFormat::Custom(layout) => match format_layout(ts, layout) {
                Some(rendered) => text(rendered),
                None => TimeFormat::Clock.render(ts),
            },
        }
    }
}

fn rfc3339_nano(ts: DateTime<Utc>) -> String {
    let mut out = ts.format("%Y-%m-%dT%H:%M:%S").to_string();
    let nanos = ts.timestamp_subsec_nanos();
    if nanos > 0 {
        let fraction = format!("{nanos:09}");
        out.push('.');
        out.push_str(fraction.trim_end_matches('0'));
    }
    out.push('Z');
    out
}

/// How duration fields are rendered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DurationFormat {
    /// Human readable with unit suffixes, e.g. `1.5s`, `1m30s`, `250µs`
    #[default]
    String,
    /// Float seconds
    Seconds,
    /// Integer nanoseconds
    Nanos,
}

impl From<&str> for DurationFormat {
    fn from(selector: &str) -> Self {
        match selector {
            "seconds" => DurationFormat::Seconds,
            "nano" => DurationFormat::Nanos,
            _ => DurationFormat::String,
        }
    }
}

impl DurationFormat {
    pub fn render(self, d: Duration) -> Scalar<'static> {
        match self {
            DurationFormat::String => text(human_duration(d)),
            DurationFormat::Seconds => Scalar::Float(d.as_secs_f64()),
            DurationFormat::Nanos => Scalar::Int(i64::try_from(d.as_nanos()).unwrap_or(i64::MAX)),
        }
    }
}

/// `72h3m0.5s` style: hours and minutes only when non-zero leading units,
/// sub-second durations in the largest of ms, µs or ns that fits
fn human_duration(d: Duration) -> String {
    let nanos = d.as_nanos();
    if nanos == 0 {
        return "0s".to_string();
    }
    if nanos < 1_000 {
        return format!("{nanos}ns");
    }
    if nanos < 1_000_000 {
        return format!("{}µs", decimal(nanos, 1_000, 3));
    }
    if nanos < 1_000_000_000 {
        return format!("{}ms", decimal(nanos, 1_000_000, 6));
    }

    let secs = d.as_secs();
    let (hours, minutes) = (secs / 3600, secs / 60 % 60);
    let seconds = u128::from(secs % 60) * 1_000_000_000 + u128::from(d.subsec_nanos());

    let mut out = String::new();
    if hours > 0 {
        let _ = write!(out, "{hours}h");
    }
    if hours > 0 || minutes > 0 {
        let _ = write!(out, "{minutes}m");
    }
    out.push_str(&decimal(seconds, 1_000_000_000, 9));
    out.push('s');
    out
}

/// `value / scale` with the fraction's trailing zeros trimmed
fn decimal(value: u128, scale: u128, digits: usize) -> String {
    let (whole, fraction) = (value / scale, value % scale);
    if fraction == 0 {
        return whole.to_string();
    }
    let fraction = format!("{fraction:0digits$}");
    format!("{whole}.{}", fraction.trim_end_matches('0'))
}

/// How the entry level is rendered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LevelFormat {
    /// Uppercase wrapped in an ANSI color
    #[default]
    Color,
    /// `info`
    Lower,
    /// `INFO`
    Upper,
}

impl From<&str> for LevelFormat {
    fn from(selector: &str) -> Self {
        match selector {
            "lower" => LevelFormat::Lower,
            "upper" => LevelFormat::Upper,
            _ => LevelFormat::Color,
        }
    }
}

impl LevelFormat {
    /// Render `level`; colors follow severity (debug magenta, info blue,
    /// warn yellow, error and above red)
    pub fn render(self, level: Level) -> Scalar<'static> {
        match self {
            LevelFormat::Lower => text(level.as_str()),
            LevelFormat::Upper => text(level.as_upper_str()),
            LevelFormat::Color => {
                let color = match level {
                    Level::Debug => ANSI_MAGENTA,
                    Level::Info => ANSI_BLUE,
                    Level::Warn => ANSI_YELLOW,
                    Level::Error | Level::Panic | Level::Fatal => ANSI_RED,
                };
                text(format!("{color}{}{ANSI_RESET}", level.as_upper_str()))
            }
        }
    }
}

/// How the call site is rendered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CallerFormat {
    /// Full path and line
    #[default]
    Full,
    /// Last two path segments and line
    Short,
}

impl From<&str> for CallerFormat {
    fn from(selector: &str) -> Self {
        match selector {
            "short" => CallerFormat::Short,
            _ => CallerFormat::Full,
        }
    }
}

impl CallerFormat {
    /// The selector string that parses back to this format
    pub fn selector(self) -> &'static str {
        match self {
            CallerFormat::Full => "full",
            CallerFormat::Short => "short",
        }
    }

    pub fn render(self, caller: &Caller) -> String {
        match self {
            CallerFormat::Full => caller.full(),
            CallerFormat::Short => caller.short(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instant() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap()
    }

    fn render_text(format: &TimeFormat, ts: DateTime<Utc>) -> String {
        format.render(ts).to_string()
    }

    #[test]
    fn test_time_iso8601() {
        assert_eq!(
            render_text(&TimeFormat::from("iso8601"), instant()),
            "2024-01-15T10:30:00.000Z"
        );
    }

    #[test]
    fn test_time_default_is_local_clock() {
        let format = TimeFormat::from("");
        assert_eq!(format, TimeFormat::Clock);
        let expected = instant().with_timezone(&Local).format("%H:%M:%S").to_string();
        assert_eq!(render_text(&format, instant()), expected);
        assert_eq!(expected.len(), 8);
    }

    #[test]
    fn test_time_unix_nano() {
        assert_eq!(
            TimeFormat::from("unix_nano").render(instant()),
            Scalar::Int(1_705_314_600_000_000_000)
        );
    }

    #[test]
    fn test_time_unix_floats() {
        let ts = instant() + chrono::Duration::milliseconds(500);
        assert_eq!(
            TimeFormat::from("unix_seconds_float").render(ts),
            Scalar::Float(1_705_314_600.5)
        );
        assert_eq!(
            TimeFormat::from("unix_milli_float").render(ts),
            Scalar::Float(1_705_314_600_500.0)
        );
    }

    #[test]
    fn test_time_rfc3339() {
        assert_eq!(
            render_text(&TimeFormat::from("rfc3339"), instant()),
            "2024-01-15T10:30:00Z"
        );
    }

    #[test]
    fn test_time_rfc3339_nano_trims_zeros() {
        let format = TimeFormat::from("rfc3339_nano");
        assert_eq!(render_text(&format, instant()), "2024-01-15T10:30:00Z");
        let ts = instant() + chrono::Duration::milliseconds(120);
        assert_eq!(render_text(&format, ts), "2024-01-15T10:30:00.12Z");
    }

    #[test]
    fn test_time_wall_variants() {
        let ts = instant() + chrono::Duration::milliseconds(7);
        assert_eq!(
            render_text(&TimeFormat::from("wall"), ts),
            "2024/01/15 10:30:00"
        );
        assert_eq!(
            render_text(&TimeFormat::from("wall_milli"), ts),
            "2024/01/15 10:30:00.007"
        );
        assert_eq!(
            render_text(&TimeFormat::from("wall_nano"), ts),
            "2024/01/15 10:30:00.007000000"
        );
    }

    #[test]
    fn test_time_common_log() {
        assert_eq!(
            render_text(&TimeFormat::from("common_log"), instant()),
            "15/Jan/2024:10:30:00 +0000"
        );
    }

    #[test]
    fn test_time_custom_layout() {
        let format = TimeFormat::from("%Y%m%d");
        assert_eq!(format, TimeFormat::Custom("%Y%m%d".into()));
        assert_eq!(render_text(&format, instant()), "20240115");
    }

    #[test]
    fn test_time_invalid_layout_falls_back() {
        assert_eq!(TimeFormat::from("%Q oops"), TimeFormat::Clock);
    }

    #[test]
    fn test_time_parse_only_layout_falls_back() {
        assert_eq!(TimeFormat::from("%#z"), TimeFormat::Clock);
        assert_eq!(TimeFormat::from("at %#z"), TimeFormat::Clock);
    }

    #[test]
    fn test_time_unformattable_custom_renders_clock() {
        let format = TimeFormat::Custom("%#z".into());
        assert_eq!(
            render_text(&format, instant()),
            render_text(&TimeFormat::Clock, instant())
        );
    }

    #[test]
    fn test_duration_formats() {
        let d = Duration::from_millis(1500);
        assert_eq!(DurationFormat::from("").render(d), text("1.5s"));
        assert_eq!(DurationFormat::from("string").render(d), text("1.5s"));
        assert_eq!(DurationFormat::from("seconds").render(d), Scalar::Float(1.5));
        assert_eq!(
            DurationFormat::from("nano").render(d),
            Scalar::Int(1_500_000_000)
        );
        assert_eq!(DurationFormat::from("hours"), DurationFormat::String);
    }

    #[test]
    fn test_duration_string_units() {
        let format = DurationFormat::String;
        let cases = [
            (Duration::ZERO, "0s"),
            (Duration::from_nanos(15), "15ns"),
            (Duration::from_micros(250), "250µs"),
            (Duration::from_nanos(1_500), "1.5µs"),
            (Duration::from_micros(1_500), "1.5ms"),
            (Duration::from_secs(90), "1m30s"),
            (Duration::from_secs(3600), "1h0m0s"),
            (Duration::from_millis(3_723_500), "1h2m3.5s"),
            (Duration::from_secs(72 * 3600 + 180), "72h3m0s"),
        ];
        for (d, expected) in cases {
            assert_eq!(format.render(d), text(expected), "{d:?}");
        }
    }

    #[test]
    fn test_level_formats() {
        assert_eq!(LevelFormat::from("lower").render(Level::Warn), text("warn"));
        assert_eq!(LevelFormat::from("upper").render(Level::Warn), text("WARN"));
        assert_eq!(
            LevelFormat::from("").render(Level::Info),
            text("\x1b[34mINFO\x1b[0m")
        );
        assert_eq!(
            LevelFormat::from("color").render(Level::Fatal),
            text("\x1b[31mFATAL\x1b[0m")
        );
        assert_eq!(LevelFormat::from("shout"), LevelFormat::Color);
    }

    #[test]
    fn test_caller_formats() {
        let caller = Caller::new("/srv/app/src/api/handler.rs", 10);
        assert_eq!(CallerFormat::from("short").render(&caller), "api/handler.rs:10");
        assert_eq!(
            CallerFormat::from("full").render(&caller),
            "/srv/app/src/api/handler.rs:10"
        );
        assert_eq!(CallerFormat::from(""), CallerFormat::Full);
        assert_eq!(CallerFormat::from(CallerFormat::Short.selector()), CallerFormat::Short);
    }
}
