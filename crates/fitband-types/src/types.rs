//! Core tokens and outcome types for activity recording requests.

use core::fmt;
use std::str::FromStr;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// Type of activity recording stored on a wearable device.
///
/// Each variant maps to exactly one fetch operation on the device
/// repository. [`ActivityType::ActiveTime`] is recognized as a valid
/// token but has no fetch operation yet; dispatching it is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ActivityType {
    /// Nightly sleep analysis.
    Sleep,
    /// Step counts over time.
    Steps,
    /// Burned calories over time.
    Calories,
    /// Continuous 24/7 heart rate samples.
    HrSamples,
    /// Nightly Recharge recovery measurement.
    NightlyRecharge,
    /// 24/7 peak-to-peak interval samples.
    PpiSamples,
    /// Nightly skin temperature measurements.
    SkinTemperature,
    /// Active time; recognized but not yet fetchable.
    ActiveTime,
}

impl ActivityType {
    /// All variants with a fetch operation.
    pub const FETCHABLE: [ActivityType; 7] = [
        ActivityType::Sleep,
        ActivityType::Steps,
        ActivityType::Calories,
        ActivityType::HrSamples,
        ActivityType::NightlyRecharge,
        ActivityType::PpiSamples,
        ActivityType::SkinTemperature,
    ];

    /// Upper-snake token, also used as the export directory name.
    #[must_use]
    pub fn as_token(&self) -> &'static str {
        match self {
            ActivityType::Sleep => "SLEEP",
            ActivityType::Steps => "STEPS",
            ActivityType::Calories => "CALORIES",
            ActivityType::HrSamples => "HR_SAMPLES",
            ActivityType::NightlyRecharge => "NIGHTLY_RECHARGE",
            ActivityType::PpiSamples => "PPI_SAMPLES",
            ActivityType::SkinTemperature => "SKIN_TEMPERATURE",
            ActivityType::ActiveTime => "ACTIVE_TIME",
        }
    }

    /// Lowercase hyphenated token used in export file names.
    #[must_use]
    pub fn slug(&self) -> &'static str {
        match self {
            ActivityType::Sleep => "sleep",
            ActivityType::Steps => "steps",
            ActivityType::Calories => "calories",
            ActivityType::HrSamples => "hr-samples",
            ActivityType::NightlyRecharge => "nightly-recharge",
            ActivityType::PpiSamples => "ppi-samples",
            ActivityType::SkinTemperature => "skin-temperature",
            ActivityType::ActiveTime => "active-time",
        }
    }

    /// Whether the repository expects start-of-day instants rather
    /// than calendar dates for this type.
    #[must_use]
    pub fn wants_instants(&self) -> bool {
        !matches!(self, ActivityType::Sleep | ActivityType::SkinTemperature)
    }
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_token())
    }
}

impl FromStr for ActivityType {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SLEEP" => Ok(ActivityType::Sleep),
            "STEPS" => Ok(ActivityType::Steps),
            "CALORIES" => Ok(ActivityType::Calories),
            "HR_SAMPLES" => Ok(ActivityType::HrSamples),
            "NIGHTLY_RECHARGE" => Ok(ActivityType::NightlyRecharge),
            "PPI_SAMPLES" => Ok(ActivityType::PpiSamples),
            "SKIN_TEMPERATURE" => Ok(ActivityType::SkinTemperature),
            "ACTIVE_TIME" => Ok(ActivityType::ActiveTime),
            other => Err(ParseError::UnknownActivityType(other.to_string())),
        }
    }
}

/// Which calorie figure a calories fetch should return.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum CaloriesKind {
    /// Calories burned through daily activity. The default.
    #[default]
    Activity,
    /// Calories burned during training sessions.
    Training,
    /// Basal metabolic rate calories.
    Bmr,
}

impl CaloriesKind {
    /// Upper-snake token as supplied by callers.
    #[must_use]
    pub fn as_token(&self) -> &'static str {
        match self {
            CaloriesKind::Activity => "ACTIVITY",
            CaloriesKind::Training => "TRAINING",
            CaloriesKind::Bmr => "BMR",
        }
    }
}

impl fmt::Display for CaloriesKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_token())
    }
}

impl FromStr for CaloriesKind {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ACTIVITY" => Ok(CaloriesKind::Activity),
            "TRAINING" => Ok(CaloriesKind::Training),
            "BMR" => Ok(CaloriesKind::Bmr),
            other => Err(ParseError::UnknownCaloriesKind(other.to_string())),
        }
    }
}

/// Raw connection phase reported by the device link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ConnectionState {
    /// Link is established.
    Connected,
    /// Link establishment in progress.
    Connecting,
    /// Link teardown in progress.
    Disconnecting,
    /// No link.
    NotConnected,
}

impl ConnectionState {
    /// Collapse the four raw phases into the UI-facing boolean.
    ///
    /// Only [`ConnectionState::Connected`] counts as connected.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionState::Connected)
    }
}

/// Underlying error attached to a fetch failure, if any.
pub type FetchCause = Arc<dyn std::error::Error + Send + Sync>;

/// Outcome of a single fetch operation against the device repository.
///
/// `Success(None)` is a distinct, valid outcome: the device answered
/// without error but had no data for the requested range.
#[derive(Debug, Clone)]
pub enum FetchResult<T> {
    /// The fetch completed; the payload may be absent.
    Success(Option<T>),
    /// The fetch failed with a human-readable message and an optional
    /// underlying cause.
    Failure {
        message: String,
        cause: Option<FetchCause>,
    },
}

impl<T> FetchResult<T> {
    /// Successful fetch with a payload.
    pub fn success(value: T) -> Self {
        FetchResult::Success(Some(value))
    }

    /// Successful fetch without data.
    pub fn empty() -> Self {
        FetchResult::Success(None)
    }

    /// Failed fetch without an underlying cause.
    pub fn failure(message: impl Into<String>) -> Self {
        FetchResult::Failure {
            message: message.into(),
            cause: None,
        }
    }

    /// Failed fetch with an underlying cause.
    pub fn failure_with(message: impl Into<String>, cause: FetchCause) -> Self {
        FetchResult::Failure {
            message: message.into(),
            cause: Some(cause),
        }
    }

    /// Map the payload, preserving emptiness and failures.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> FetchResult<U> {
        match self {
            FetchResult::Success(value) => FetchResult::Success(value.map(f)),
            FetchResult::Failure { message, cause } => FetchResult::Failure { message, cause },
        }
    }

    /// Whether this outcome is a success (with or without data).
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, FetchResult::Success(_))
    }
}

/// Opaque reference to a persisted recording, as returned by the
/// file-write collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ResourceRef(pub String);

impl fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activity_type_tokens_round_trip() {
        for ty in ActivityType::FETCHABLE {
            let parsed: ActivityType = ty.as_token().parse().unwrap();
            assert_eq!(parsed, ty);
        }
        let parsed: ActivityType = "ACTIVE_TIME".parse().unwrap();
        assert_eq!(parsed, ActivityType::ActiveTime);
    }

    #[test]
    fn test_activity_type_unknown_token() {
        let err = "HEART_RATE".parse::<ActivityType>().unwrap_err();
        assert_eq!(err, ParseError::UnknownActivityType("HEART_RATE".into()));
        assert!(err.to_string().contains("HEART_RATE"));
    }

    #[test]
    fn test_activity_type_slugs() {
        assert_eq!(ActivityType::Sleep.slug(), "sleep");
        assert_eq!(ActivityType::HrSamples.slug(), "hr-samples");
        assert_eq!(ActivityType::NightlyRecharge.slug(), "nightly-recharge");
        assert_eq!(ActivityType::PpiSamples.slug(), "ppi-samples");
        assert_eq!(ActivityType::SkinTemperature.slug(), "skin-temperature");
    }

    #[test]
    fn test_date_argument_shape() {
        // Only sleep and skin temperature take calendar dates directly.
        assert!(!ActivityType::Sleep.wants_instants());
        assert!(!ActivityType::SkinTemperature.wants_instants());
        assert!(ActivityType::Steps.wants_instants());
        assert!(ActivityType::Calories.wants_instants());
        assert!(ActivityType::HrSamples.wants_instants());
        assert!(ActivityType::NightlyRecharge.wants_instants());
        assert!(ActivityType::PpiSamples.wants_instants());
    }

    #[test]
    fn test_calories_kind_default_and_parse() {
        assert_eq!(CaloriesKind::default(), CaloriesKind::Activity);
        assert_eq!("TRAINING".parse::<CaloriesKind>().unwrap(), CaloriesKind::Training);
        assert_eq!("BMR".parse::<CaloriesKind>().unwrap(), CaloriesKind::Bmr);
        assert!("SWIMMING".parse::<CaloriesKind>().is_err());
    }

    #[test]
    fn test_connection_state_projection() {
        assert!(ConnectionState::Connected.is_connected());
        assert!(!ConnectionState::Connecting.is_connected());
        assert!(!ConnectionState::Disconnecting.is_connected());
        assert!(!ConnectionState::NotConnected.is_connected());
    }

    #[test]
    fn test_fetch_result_map_preserves_variants() {
        let ok = FetchResult::success(3u32).map(|v| v * 2);
        assert!(matches!(ok, FetchResult::Success(Some(6))));

        let empty = FetchResult::<u32>::empty().map(|v| v * 2);
        assert!(matches!(empty, FetchResult::Success(None)));

        let failed = FetchResult::<u32>::failure("device busy").map(|v| v * 2);
        match failed {
            FetchResult::Failure { message, cause } => {
                assert_eq!(message, "device busy");
                assert!(cause.is_none());
            }
            FetchResult::Success(_) => panic!("map must preserve failure"),
        }
    }

    #[test]
    fn test_resource_ref_display() {
        let r = ResourceRef("file:///tmp/x.json".to_string());
        assert_eq!(r.to_string(), "file:///tmp/x.json");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_token_serialization() {
        assert_eq!(
            serde_json::to_string(&CaloriesKind::Activity).unwrap(),
            "\"ACTIVITY\""
        );
        assert_eq!(
            serde_json::to_string(&ConnectionState::NotConnected).unwrap(),
            "\"not_connected\""
        );
        let r = ResourceRef("mock://abc".to_string());
        assert_eq!(serde_json::to_string(&r).unwrap(), "\"mock://abc\"");
    }
}
