//! Dispatch from activity type to the single matching fetch operation.

use std::sync::Arc;

use time::{Date, OffsetDateTime, UtcOffset};
use tracing::debug;

use fitband_types::{ActivityData, ActivityType, CaloriesKind, FetchResult};

use crate::repository::ActivityRepository;

/// Routes a fetch request to exactly one repository operation.
///
/// Calendar dates are converted to start-of-day instants in the local
/// time zone for every type except `SLEEP` and `SKIN_TEMPERATURE`,
/// which the repository addresses by calendar date directly.
pub struct ActivityTypeDispatcher {
    repository: Arc<dyn ActivityRepository>,
}

impl ActivityTypeDispatcher {
    /// Create a dispatcher over the given repository.
    pub fn new(repository: Arc<dyn ActivityRepository>) -> Self {
        Self { repository }
    }

    /// Invoke the fetch operation matching `ty`.
    ///
    /// Returns `None` for types with no fetch operation; those emit a
    /// diagnostic only and must not affect any published state.
    pub async fn dispatch(
        &self,
        device_id: &str,
        ty: ActivityType,
        start: Date,
        end: Date,
        calories_kind: CaloriesKind,
    ) -> Option<FetchResult<ActivityData>> {
        debug!(device_id, %ty, "dispatching activity fetch");
        let repo = &self.repository;

        let result = match ty {
            ActivityType::Sleep => repo
                .fetch_sleep(device_id, start, end)
                .await
                .map(ActivityData::Sleep),
            ActivityType::Steps => repo
                .fetch_steps(device_id, start_of_day(start), start_of_day(end))
                .await
                .map(ActivityData::Steps),
            ActivityType::Calories => repo
                .fetch_calories(
                    device_id,
                    start_of_day(start),
                    start_of_day(end),
                    calories_kind,
                )
                .await
                .map(ActivityData::Calories),
            ActivityType::HrSamples => repo
                .fetch_hr_samples(device_id, start_of_day(start), start_of_day(end))
                .await
                .map(ActivityData::HrSamples),
            ActivityType::NightlyRecharge => repo
                .fetch_nightly_recharge(device_id, start_of_day(start), start_of_day(end))
                .await
                .map(ActivityData::NightlyRecharge),
            ActivityType::PpiSamples => repo
                .fetch_ppi_samples(device_id, start_of_day(start), start_of_day(end))
                .await
                .map(ActivityData::PpiSamples),
            ActivityType::SkinTemperature => repo
                .fetch_skin_temperature(device_id, start, end)
                .await
                .map(ActivityData::SkinTemperature),
            ActivityType::ActiveTime => {
                debug!(%ty, "fetch not implemented for activity type");
                return None;
            }
        };

        Some(result)
    }
}

/// Midnight at the start of `date` in the local time zone.
///
/// Falls back to UTC when the local offset cannot be determined
/// (e.g. in multi-threaded test environments).
fn start_of_day(date: Date) -> OffsetDateTime {
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    date.midnight().assume_offset(offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockRepository;
    use fitband_types::SleepAnalysis;
    use time::macros::{date, datetime};

    fn sleep_data() -> ActivityData {
        ActivityData::Sleep(SleepAnalysis {
            date: date!(2024 - 01 - 01),
            sleep_start: datetime!(2023 - 12 - 31 23:12:00),
            sleep_end: datetime!(2024 - 01 - 01 07:02:30),
            sleep_cycles: 4,
            light_sleep_minutes: 210,
            deep_sleep_minutes: 95,
            rem_sleep_minutes: 80,
            continuity: 3.5,
        })
    }

    #[tokio::test]
    async fn test_each_type_invokes_exactly_one_operation() {
        for ty in ActivityType::FETCHABLE {
            let repo = Arc::new(MockRepository::new());
            let dispatcher = ActivityTypeDispatcher::new(repo.clone());

            let result = dispatcher
                .dispatch(
                    "1C709B20",
                    ty,
                    date!(2024 - 01 - 01),
                    date!(2024 - 01 - 05),
                    CaloriesKind::default(),
                )
                .await;

            assert!(result.is_some(), "{ty} must dispatch");
            let calls = repo.recorded_calls();
            assert_eq!(calls.len(), 1, "{ty} must invoke exactly one operation");
            assert_eq!(calls[0].ty, ty);
            assert_eq!(calls[0].device_id, "1C709B20");
        }
    }

    #[tokio::test]
    async fn test_instant_types_receive_start_of_day() {
        let repo = Arc::new(MockRepository::new());
        let dispatcher = ActivityTypeDispatcher::new(repo.clone());

        dispatcher
            .dispatch(
                "1C709B20",
                ActivityType::Steps,
                date!(2024 - 01 - 01),
                date!(2024 - 01 - 05),
                CaloriesKind::default(),
            )
            .await;

        let calls = repo.recorded_calls();
        let from = calls[0].from_instant.expect("steps fetch takes instants");
        let to = calls[0].to_instant.expect("steps fetch takes instants");
        assert_eq!(from.date(), date!(2024 - 01 - 01));
        assert_eq!(from.time(), time::Time::MIDNIGHT);
        assert_eq!(to.date(), date!(2024 - 01 - 05));
        assert_eq!(to.time(), time::Time::MIDNIGHT);
    }

    #[tokio::test]
    async fn test_date_types_receive_calendar_dates() {
        let repo = Arc::new(MockRepository::new());
        let dispatcher = ActivityTypeDispatcher::new(repo.clone());

        dispatcher
            .dispatch(
                "1C709B20",
                ActivityType::Sleep,
                date!(2024 - 01 - 01),
                date!(2024 - 01 - 05),
                CaloriesKind::default(),
            )
            .await;

        let calls = repo.recorded_calls();
        assert_eq!(calls[0].from_date, Some(date!(2024 - 01 - 01)));
        assert_eq!(calls[0].to_date, Some(date!(2024 - 01 - 05)));
        assert!(calls[0].from_instant.is_none());
    }

    #[tokio::test]
    async fn test_calories_kind_is_forwarded() {
        let repo = Arc::new(MockRepository::new());
        let dispatcher = ActivityTypeDispatcher::new(repo.clone());

        dispatcher
            .dispatch(
                "1C709B20",
                ActivityType::Calories,
                date!(2024 - 01 - 01),
                date!(2024 - 01 - 02),
                CaloriesKind::Bmr,
            )
            .await;

        let calls = repo.recorded_calls();
        assert_eq!(calls[0].calories_kind, Some(CaloriesKind::Bmr));
    }

    #[tokio::test]
    async fn test_unhandled_type_performs_no_call() {
        let repo = Arc::new(MockRepository::new());
        let dispatcher = ActivityTypeDispatcher::new(repo.clone());

        let result = dispatcher
            .dispatch(
                "1C709B20",
                ActivityType::ActiveTime,
                date!(2024 - 01 - 01),
                date!(2024 - 01 - 02),
                CaloriesKind::default(),
            )
            .await;

        assert!(result.is_none());
        assert!(repo.recorded_calls().is_empty());
    }

    #[tokio::test]
    async fn test_scripted_payload_flows_through() {
        let repo = Arc::new(MockRepository::new());
        repo.script(ActivityType::Sleep, FetchResult::success(sleep_data()));
        let dispatcher = ActivityTypeDispatcher::new(repo);

        let result = dispatcher
            .dispatch(
                "1C709B20",
                ActivityType::Sleep,
                date!(2024 - 01 - 01),
                date!(2024 - 01 - 05),
                CaloriesKind::default(),
            )
            .await
            .unwrap();

        match result {
            FetchResult::Success(Some(ActivityData::Sleep(s))) => {
                assert_eq!(s.sleep_cycles, 4);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }
}
