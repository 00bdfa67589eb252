//! Per-type JSON serialization of activity records.
//!
//! Rendering of temporal fields is driven by a small table,
//! [`formats_for`], mapping each activity type to the format
//! descriptions used for calendar dates, wall-clock date-times, and
//! times of day. Types without an entry use the ISO local defaults.
//! Absolute instants always render as RFC 3339 and are not part of
//! the table because no type customizes them.

use serde_json::{Value, json};
use time::OffsetDateTime;
use time::format_description::BorrowedFormatItem;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;

use fitband_types::{
    ActivityData, ActivityType, CaloriesSample, HrSample, PpiDay, PpiSample,
    SkinTemperatureMeasurement, StepsSample,
};

use crate::error::Result;

/// ISO local date, `2024-01-01`.
const DATE: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// ISO local date-time with whole seconds, `2024-01-01T07:02:30`.
const DATE_TIME: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");

/// Date-time with millisecond precision, `2024-01-01T07:02:30.250`.
const DATE_TIME_MILLIS: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]");

/// Date-time with a space separator, `2024-01-01 07:02:30`.
const DATE_TIME_SPACE: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

/// ISO local time, `07:02:30`.
const TIME: &[BorrowedFormatItem<'static>] = format_description!("[hour]:[minute]:[second]");

/// Field-level temporal formatting rules for one activity type.
#[derive(Debug, Clone, Copy)]
pub struct TemporalFormats {
    /// Rendering for calendar dates.
    pub date: &'static [BorrowedFormatItem<'static>],
    /// Rendering for wall-clock date-times.
    pub date_time: &'static [BorrowedFormatItem<'static>],
    /// Rendering for times of day.
    pub time: &'static [BorrowedFormatItem<'static>],
}

/// The defaults applied when a type registers no custom rule.
pub const DEFAULT_FORMATS: TemporalFormats = TemporalFormats {
    date: DATE,
    date_time: DATE_TIME,
    time: TIME,
};

/// The per-type temporal formatting table.
///
/// Pure and total: every activity type resolves to a complete rule
/// set. Only the fields listed here deviate from [`DEFAULT_FORMATS`]:
///
/// | Type | date | date_time | time |
/// |------|------|-----------|------|
/// | `SLEEP` | — | millisecond precision | — |
/// | `NIGHTLY_RECHARGE` | — | space separator | — |
#[must_use]
pub fn formats_for(ty: ActivityType) -> TemporalFormats {
    match ty {
        ActivityType::Sleep => TemporalFormats {
            date_time: DATE_TIME_MILLIS,
            ..DEFAULT_FORMATS
        },
        ActivityType::NightlyRecharge => TemporalFormats {
            date_time: DATE_TIME_SPACE,
            ..DEFAULT_FORMATS
        },
        _ => DEFAULT_FORMATS,
    }
}

/// Serialize a domain record to JSON bytes using the formatting rules
/// registered for `ty`.
///
/// Deterministic: serializing the same value twice produces
/// byte-identical output.
pub fn serialize(ty: ActivityType, data: &ActivityData) -> Result<Vec<u8>> {
    let formats = formats_for(ty);
    let value = encode(data, &formats)?;
    Ok(serde_json::to_vec(&value)?)
}

/// Derive the logical export path for a recording.
///
/// The template is `/{TYPE_UPPER}/{start}-{slug}.json` with `start`
/// rendered in the calendar date's default form. The path is a pure
/// function of the type and start date; the end date never appears.
#[must_use]
pub fn recording_path(ty: ActivityType, start: time::Date) -> String {
    format!("/{}/{}-{}.json", ty.as_token(), start, ty.slug())
}

fn encode(data: &ActivityData, f: &TemporalFormats) -> Result<Value> {
    let value = match data {
        ActivityData::Sleep(s) => json!({
            "date": s.date.format(f.date)?,
            "sleep_start": s.sleep_start.format(f.date_time)?,
            "sleep_end": s.sleep_end.format(f.date_time)?,
            "sleep_cycles": s.sleep_cycles,
            "light_sleep_minutes": s.light_sleep_minutes,
            "deep_sleep_minutes": s.deep_sleep_minutes,
            "rem_sleep_minutes": s.rem_sleep_minutes,
            "continuity": s.continuity,
        }),
        ActivityData::Steps(r) => json!({
            "samples": collect(&r.samples, steps_sample)?,
        }),
        ActivityData::Calories(r) => json!({
            "kind": r.kind.as_token(),
            "samples": collect(&r.samples, calories_sample)?,
        }),
        ActivityData::HrSamples(r) => json!({
            "samples": collect(&r.samples, hr_sample)?,
        }),
        ActivityData::NightlyRecharge(n) => json!({
            "measured_at": n.measured_at.format(f.date_time)?,
            "ans_charge": n.ans_charge,
            "ans_charge_status": n.ans_charge_status,
            "mean_rri_ms": n.mean_rri_ms,
            "mean_rmssd_ms": n.mean_rmssd_ms,
        }),
        ActivityData::PpiSamples(r) => {
            let days = r
                .days
                .iter()
                .map(|day| ppi_day(day, f))
                .collect::<Result<Vec<_>>>()?;
            json!({ "days": days })
        }
        ActivityData::SkinTemperature(r) => {
            let measurements = r
                .measurements
                .iter()
                .map(|m| skin_temperature_measurement(m, f))
                .collect::<Result<Vec<_>>>()?;
            json!({ "measurements": measurements })
        }
    };
    Ok(value)
}

fn collect<T>(items: &[T], f: impl Fn(&T) -> Result<Value>) -> Result<Vec<Value>> {
    items.iter().map(f).collect()
}

fn instant(t: OffsetDateTime) -> Result<String> {
    Ok(t.format(&Rfc3339)?)
}

fn steps_sample(s: &StepsSample) -> Result<Value> {
    Ok(json!({ "recorded_at": instant(s.recorded_at)?, "steps": s.steps }))
}

fn calories_sample(s: &CaloriesSample) -> Result<Value> {
    Ok(json!({ "recorded_at": instant(s.recorded_at)?, "calories": s.calories }))
}

fn hr_sample(s: &HrSample) -> Result<Value> {
    Ok(json!({ "recorded_at": instant(s.recorded_at)?, "heart_rate": s.heart_rate }))
}

fn ppi_day(day: &PpiDay, f: &TemporalFormats) -> Result<Value> {
    let samples = day
        .samples
        .iter()
        .map(|s| ppi_sample(s, f))
        .collect::<Result<Vec<_>>>()?;
    Ok(json!({ "date": day.date.format(f.date)?, "samples": samples }))
}

fn ppi_sample(s: &PpiSample, f: &TemporalFormats) -> Result<Value> {
    Ok(json!({
        "time": s.time.format(f.time)?,
        "ppi_ms": s.ppi_ms,
        "error_estimate_ms": s.error_estimate_ms,
    }))
}

fn skin_temperature_measurement(m: &SkinTemperatureMeasurement, f: &TemporalFormats) -> Result<Value> {
    Ok(json!({ "date": m.date.format(f.date)?, "celsius": m.celsius }))
}
