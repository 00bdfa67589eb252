//! Domain records returned by activity fetch operations.
//!
//! Each struct here is the payload of exactly one [`ActivityType`]
//! fetch. Temporal fields use `time` types directly; how they are
//! rendered into JSON is decided per type by the export serializer,
//! not by these structs.

use time::{Date, OffsetDateTime, PrimitiveDateTime, Time};

use crate::types::{ActivityType, CaloriesKind};

/// Nightly sleep analysis for a single night.
#[derive(Debug, Clone, PartialEq)]
pub struct SleepAnalysis {
    /// Calendar date the night is attributed to.
    pub date: Date,
    /// When the device detected sleep onset (device-local wall clock).
    pub sleep_start: PrimitiveDateTime,
    /// When the device detected wake-up (device-local wall clock).
    pub sleep_end: PrimitiveDateTime,
    /// Number of completed sleep cycles.
    pub sleep_cycles: u32,
    /// Minutes of light sleep.
    pub light_sleep_minutes: u32,
    /// Minutes of deep sleep.
    pub deep_sleep_minutes: u32,
    /// Minutes of REM sleep.
    pub rem_sleep_minutes: u32,
    /// Sleep continuity index, 1.0 to 5.0.
    pub continuity: f32,
}

/// One step-count sample.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepsSample {
    /// Instant the sample was recorded.
    pub recorded_at: OffsetDateTime,
    /// Steps accumulated in the sample window.
    pub steps: u32,
}

/// Step counts for the requested range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepsRecord {
    pub samples: Vec<StepsSample>,
}

/// One calories sample.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaloriesSample {
    /// Instant the sample was recorded.
    pub recorded_at: OffsetDateTime,
    /// Kilocalories accumulated in the sample window.
    pub calories: u32,
}

/// Calories for the requested range and kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaloriesRecord {
    /// Which calorie figure these samples carry.
    pub kind: CaloriesKind,
    pub samples: Vec<CaloriesSample>,
}

/// One 24/7 heart rate sample.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HrSample {
    /// Instant the sample was recorded.
    pub recorded_at: OffsetDateTime,
    /// Heart rate in beats per minute.
    pub heart_rate: u8,
}

/// Continuous heart rate samples for the requested range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HrSamplesRecord {
    pub samples: Vec<HrSample>,
}

/// Nightly Recharge recovery measurement.
#[derive(Debug, Clone, PartialEq)]
pub struct NightlyRecharge {
    /// When the measurement was taken (device-local wall clock).
    pub measured_at: PrimitiveDateTime,
    /// Autonomic nervous system charge, -10.0 to 10.0.
    pub ans_charge: f32,
    /// ANS charge status class, 1 (much below usual) to 6 (much above).
    pub ans_charge_status: u8,
    /// Mean beat-to-beat interval during the night, milliseconds.
    pub mean_rri_ms: u16,
    /// Mean heart rate variability (RMSSD) during the night, milliseconds.
    pub mean_rmssd_ms: u16,
}

/// One peak-to-peak interval sample.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PpiSample {
    /// Wall-clock time of day the sample was recorded.
    pub time: Time,
    /// Peak-to-peak interval in milliseconds.
    pub ppi_ms: u16,
    /// Estimated measurement error in milliseconds.
    pub error_estimate_ms: u16,
}

/// Peak-to-peak interval samples for one calendar day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PpiDay {
    pub date: Date,
    pub samples: Vec<PpiSample>,
}

/// 24/7 peak-to-peak interval samples for the requested range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PpiSamplesRecord {
    pub days: Vec<PpiDay>,
}

/// One nightly skin temperature measurement.
#[derive(Debug, Clone, PartialEq)]
pub struct SkinTemperatureMeasurement {
    pub date: Date,
    /// Deviation-adjusted skin temperature in degrees Celsius.
    pub celsius: f32,
}

/// Skin temperature measurements for the requested range.
#[derive(Debug, Clone, PartialEq)]
pub struct SkinTemperatureRecord {
    pub measurements: Vec<SkinTemperatureMeasurement>,
}

/// Any domain record a fetch operation can return.
#[derive(Debug, Clone, PartialEq)]
pub enum ActivityData {
    Sleep(SleepAnalysis),
    Steps(StepsRecord),
    Calories(CaloriesRecord),
    HrSamples(HrSamplesRecord),
    NightlyRecharge(NightlyRecharge),
    PpiSamples(PpiSamplesRecord),
    SkinTemperature(SkinTemperatureRecord),
}

impl ActivityData {
    /// The activity type this record belongs to.
    #[must_use]
    pub fn activity_type(&self) -> ActivityType {
        match self {
            ActivityData::Sleep(_) => ActivityType::Sleep,
            ActivityData::Steps(_) => ActivityType::Steps,
            ActivityData::Calories(_) => ActivityType::Calories,
            ActivityData::HrSamples(_) => ActivityType::HrSamples,
            ActivityData::NightlyRecharge(_) => ActivityType::NightlyRecharge,
            ActivityData::PpiSamples(_) => ActivityType::PpiSamples,
            ActivityData::SkinTemperature(_) => ActivityType::SkinTemperature,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime, time};

    #[test]
    fn test_activity_data_type_mapping() {
        let sleep = ActivityData::Sleep(SleepAnalysis {
            date: date!(2024 - 01 - 01),
            sleep_start: datetime!(2023 - 12 - 31 23:12:00),
            sleep_end: datetime!(2024 - 01 - 01 07:02:30),
            sleep_cycles: 4,
            light_sleep_minutes: 210,
            deep_sleep_minutes: 95,
            rem_sleep_minutes: 80,
            continuity: 3.5,
        });
        assert_eq!(sleep.activity_type(), ActivityType::Sleep);

        let ppi = ActivityData::PpiSamples(PpiSamplesRecord {
            days: vec![PpiDay {
                date: date!(2024 - 01 - 01),
                samples: vec![PpiSample {
                    time: time!(08:15:00),
                    ppi_ms: 820,
                    error_estimate_ms: 12,
                }],
            }],
        });
        assert_eq!(ppi.activity_type(), ActivityType::PpiSamples);
    }
}
