//! Mock collaborators for testing without device hardware.
//!
//! [`MockRepository`] scripts one fetch outcome per activity type,
//! records every call with its arguments, and can delay answers to
//! simulate a slow device link; [`MockSink`] captures persisted bytes
//! and supports failure injection.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use time::{Date, OffsetDateTime};
use tokio::sync::broadcast;
use uuid::Uuid;

use fitband_types::{
    ActivityData, ActivityType, CaloriesKind, CaloriesRecord, ConnectionState, FetchResult,
    HrSamplesRecord, NightlyRecharge, PpiSamplesRecord, ResourceRef, SkinTemperatureRecord,
    SleepAnalysis, StepsRecord,
};

use crate::error::{Error, Result};
use crate::persist::RecordingSink;
use crate::repository::ActivityRepository;

/// Arguments captured for one repository call.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    /// Which fetch operation was invoked.
    pub ty: ActivityType,
    /// The device identifier passed in.
    pub device_id: String,
    /// Calendar-date range, for date-addressed operations.
    pub from_date: Option<Date>,
    pub to_date: Option<Date>,
    /// Instant range, for instant-addressed operations.
    pub from_instant: Option<OffsetDateTime>,
    pub to_instant: Option<OffsetDateTime>,
    /// Calories kind, for the calories operation only.
    pub calories_kind: Option<CaloriesKind>,
}

impl RecordedCall {
    fn dates(ty: ActivityType, device_id: &str, from: Date, to: Date) -> Self {
        Self {
            ty,
            device_id: device_id.to_string(),
            from_date: Some(from),
            to_date: Some(to),
            from_instant: None,
            to_instant: None,
            calories_kind: None,
        }
    }

    fn instants(
        ty: ActivityType,
        device_id: &str,
        from: OffsetDateTime,
        to: OffsetDateTime,
    ) -> Self {
        Self {
            ty,
            device_id: device_id.to_string(),
            from_date: None,
            to_date: None,
            from_instant: Some(from),
            to_instant: Some(to),
            calories_kind: None,
        }
    }
}

/// A scriptable in-memory [`ActivityRepository`].
///
/// Unscripted operations answer `Success(None)`. Scripted payloads
/// must match the operation's record type; a mismatch is reported as
/// a `Failure` so tests fail loudly instead of panicking inside a
/// spawned task.
pub struct MockRepository {
    scripts: Mutex<HashMap<ActivityType, FetchResult<ActivityData>>>,
    calls: Mutex<Vec<RecordedCall>>,
    latency: Mutex<Option<Duration>>,
    connection_tx: broadcast::Sender<ConnectionState>,
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl MockRepository {
    /// Create a repository with no scripted outcomes.
    pub fn new() -> Self {
        let (connection_tx, _) = broadcast::channel(32);
        Self {
            scripts: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
            latency: Mutex::new(None),
            connection_tx,
        }
    }

    /// Delay every fetch operation by `latency` before it answers,
    /// keeping the fetch in flight long enough to race against it.
    pub fn set_latency(&self, latency: Duration) {
        *self
            .latency
            .lock()
            .expect("mock repository lock poisoned") = Some(latency);
    }

    /// Script the outcome returned by the operation for `ty`.
    pub fn script(&self, ty: ActivityType, result: FetchResult<ActivityData>) {
        self.scripts
            .lock()
            .expect("mock repository lock poisoned")
            .insert(ty, result);
    }

    /// All calls recorded so far, in order.
    pub fn recorded_calls(&self) -> Vec<RecordedCall> {
        self.calls
            .lock()
            .expect("mock repository lock poisoned")
            .clone()
    }

    /// Emit a raw connection-state event to all subscribers.
    pub fn push_connection(&self, state: ConnectionState) {
        let _ = self.connection_tx.send(state);
    }

    fn record(&self, call: RecordedCall) {
        self.calls
            .lock()
            .expect("mock repository lock poisoned")
            .push(call);
    }

    async fn simulate_latency(&self) {
        let latency = *self.latency.lock().expect("mock repository lock poisoned");
        if let Some(delay) = latency {
            tokio::time::sleep(delay).await;
        }
    }

    fn scripted<T>(
        &self,
        ty: ActivityType,
        extract: fn(ActivityData) -> Option<T>,
    ) -> FetchResult<T> {
        let scripted = self
            .scripts
            .lock()
            .expect("mock repository lock poisoned")
            .get(&ty)
            .cloned();

        match scripted {
            None | Some(FetchResult::Success(None)) => FetchResult::Success(None),
            Some(FetchResult::Success(Some(data))) => match extract(data) {
                Some(value) => FetchResult::success(value),
                None => FetchResult::failure(format!(
                    "mock: scripted value does not match record type for {ty}"
                )),
            },
            Some(FetchResult::Failure { message, cause }) => {
                FetchResult::Failure { message, cause }
            }
        }
    }
}

#[async_trait]
impl ActivityRepository for MockRepository {
    async fn fetch_sleep(
        &self,
        device_id: &str,
        from: Date,
        to: Date,
    ) -> FetchResult<SleepAnalysis> {
        self.record(RecordedCall::dates(ActivityType::Sleep, device_id, from, to));
        self.simulate_latency().await;
        self.scripted(ActivityType::Sleep, |d| match d {
            ActivityData::Sleep(v) => Some(v),
            _ => None,
        })
    }

    async fn fetch_steps(
        &self,
        device_id: &str,
        from: OffsetDateTime,
        to: OffsetDateTime,
    ) -> FetchResult<StepsRecord> {
        self.record(RecordedCall::instants(
            ActivityType::Steps,
            device_id,
            from,
            to,
        ));
        self.simulate_latency().await;
        self.scripted(ActivityType::Steps, |d| match d {
            ActivityData::Steps(v) => Some(v),
            _ => None,
        })
    }

    async fn fetch_calories(
        &self,
        device_id: &str,
        from: OffsetDateTime,
        to: OffsetDateTime,
        kind: CaloriesKind,
    ) -> FetchResult<CaloriesRecord> {
        let mut call = RecordedCall::instants(ActivityType::Calories, device_id, from, to);
        call.calories_kind = Some(kind);
        self.record(call);
        self.simulate_latency().await;
        self.scripted(ActivityType::Calories, |d| match d {
            ActivityData::Calories(v) => Some(v),
            _ => None,
        })
    }

    async fn fetch_hr_samples(
        &self,
        device_id: &str,
        from: OffsetDateTime,
        to: OffsetDateTime,
    ) -> FetchResult<HrSamplesRecord> {
        self.record(RecordedCall::instants(
            ActivityType::HrSamples,
            device_id,
            from,
            to,
        ));
        self.simulate_latency().await;
        self.scripted(ActivityType::HrSamples, |d| match d {
            ActivityData::HrSamples(v) => Some(v),
            _ => None,
        })
    }

    async fn fetch_nightly_recharge(
        &self,
        device_id: &str,
        from: OffsetDateTime,
        to: OffsetDateTime,
    ) -> FetchResult<NightlyRecharge> {
        self.record(RecordedCall::instants(
            ActivityType::NightlyRecharge,
            device_id,
            from,
            to,
        ));
        self.simulate_latency().await;
        self.scripted(ActivityType::NightlyRecharge, |d| match d {
            ActivityData::NightlyRecharge(v) => Some(v),
            _ => None,
        })
    }

    async fn fetch_ppi_samples(
        &self,
        device_id: &str,
        from: OffsetDateTime,
        to: OffsetDateTime,
    ) -> FetchResult<PpiSamplesRecord> {
        self.record(RecordedCall::instants(
            ActivityType::PpiSamples,
            device_id,
            from,
            to,
        ));
        self.simulate_latency().await;
        self.scripted(ActivityType::PpiSamples, |d| match d {
            ActivityData::PpiSamples(v) => Some(v),
            _ => None,
        })
    }

    async fn fetch_skin_temperature(
        &self,
        device_id: &str,
        from: Date,
        to: Date,
    ) -> FetchResult<SkinTemperatureRecord> {
        self.record(RecordedCall::dates(
            ActivityType::SkinTemperature,
            device_id,
            from,
            to,
        ));
        self.simulate_latency().await;
        self.scripted(ActivityType::SkinTemperature, |d| match d {
            ActivityData::SkinTemperature(v) => Some(v),
            _ => None,
        })
    }

    fn connection_events(&self) -> broadcast::Receiver<ConnectionState> {
        self.connection_tx.subscribe()
    }
}

/// An in-memory [`RecordingSink`] that captures writes.
#[derive(Default)]
pub struct MockSink {
    saved: Mutex<Vec<(String, Vec<u8>)>>,
    should_fail: AtomicBool,
}

impl MockSink {
    /// Create a sink that accepts all writes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent saves fail with an I/O error.
    pub fn set_fail(&self, fail: bool) {
        self.should_fail.store(fail, Ordering::Relaxed);
    }

    /// All `(path, bytes)` pairs saved so far.
    pub fn saved(&self) -> Vec<(String, Vec<u8>)> {
        self.saved.lock().expect("mock sink lock poisoned").clone()
    }

    /// Logical paths saved so far.
    pub fn saved_paths(&self) -> Vec<String> {
        self.saved()
            .into_iter()
            .map(|(path, _)| path)
            .collect()
    }
}

#[async_trait]
impl RecordingSink for MockSink {
    async fn save(&self, bytes: &[u8], path: &str) -> Result<ResourceRef> {
        if self.should_fail.load(Ordering::Relaxed) {
            return Err(Error::persist(
                path,
                std::io::Error::other("mock sink failure"),
            ));
        }
        self.saved
            .lock()
            .expect("mock sink lock poisoned")
            .push((path.to_string(), bytes.to_vec()));
        Ok(ResourceRef(format!("mock://{}", Uuid::new_v4())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unscripted_operations_answer_empty() {
        let repo = MockRepository::new();
        let result = repo
            .fetch_steps(
                "dev",
                OffsetDateTime::UNIX_EPOCH,
                OffsetDateTime::UNIX_EPOCH,
            )
            .await;
        assert!(matches!(result, FetchResult::Success(None)));
    }

    #[tokio::test]
    async fn test_type_mismatch_is_reported_as_failure() {
        let repo = MockRepository::new();
        repo.script(
            ActivityType::Steps,
            FetchResult::success(ActivityData::HrSamples(HrSamplesRecord { samples: vec![] })),
        );
        let result = repo
            .fetch_steps(
                "dev",
                OffsetDateTime::UNIX_EPOCH,
                OffsetDateTime::UNIX_EPOCH,
            )
            .await;
        match result {
            FetchResult::Failure { message, .. } => assert!(message.contains("mock")),
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_latency_delays_the_answer() {
        let repo = MockRepository::new();
        repo.set_latency(Duration::from_millis(100));

        let started = tokio::time::Instant::now();
        repo.fetch_steps(
            "dev",
            OffsetDateTime::UNIX_EPOCH,
            OffsetDateTime::UNIX_EPOCH,
        )
        .await;
        assert!(started.elapsed() >= Duration::from_millis(100));
    }

    #[tokio::test]
    async fn test_mock_sink_captures_and_fails_on_demand() {
        let sink = MockSink::new();
        sink.save(b"abc", "/STEPS/2024-01-01-steps.json")
            .await
            .unwrap();
        assert_eq!(sink.saved_paths(), vec!["/STEPS/2024-01-01-steps.json"]);

        sink.set_fail(true);
        assert!(sink.save(b"abc", "/STEPS/x.json").await.is_err());
        assert_eq!(sink.saved().len(), 1);
    }
}
