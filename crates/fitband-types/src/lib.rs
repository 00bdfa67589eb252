//! Platform-agnostic types for fitness wearable activity recordings.
//!
//! This crate provides the shared vocabulary used by the fetch
//! orchestration in `fitband-core`:
//!
//! - Activity record tokens ([`ActivityType`], [`CaloriesKind`])
//! - Raw device connection states ([`ConnectionState`])
//! - Domain record structs for each activity type ([`records`])
//! - The two-variant fetch outcome ([`FetchResult`])
//!
//! # Example
//!
//! ```
//! use fitband_types::{ActivityType, CaloriesKind};
//!
//! let ty: ActivityType = "SLEEP".parse().unwrap();
//! assert_eq!(ty.slug(), "sleep");
//! assert_eq!(CaloriesKind::default(), CaloriesKind::Activity);
//! ```

pub mod error;
pub mod records;
pub mod types;

pub use error::{ParseError, ParseResult};
pub use records::{
    ActivityData, CaloriesRecord, CaloriesSample, HrSample, HrSamplesRecord, NightlyRecharge,
    PpiDay, PpiSample, PpiSamplesRecord, SkinTemperatureMeasurement, SkinTemperatureRecord,
    SleepAnalysis, StepsRecord, StepsSample,
};
pub use types::{ActivityType, CaloriesKind, ConnectionState, FetchCause, FetchResult, ResourceRef};
