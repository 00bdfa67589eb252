//! Trait abstraction over the device activity repository.
//!
//! The sensor communication layer is consumed strictly through
//! [`ActivityRepository`]; no transport type appears in the core's
//! contract. [`crate::MockRepository`] implements the trait for tests.

use async_trait::async_trait;
use time::{Date, OffsetDateTime};
use tokio::sync::broadcast;

use fitband_types::{
    CaloriesKind, CaloriesRecord, ConnectionState, FetchResult, HrSamplesRecord, NightlyRecharge,
    PpiSamplesRecord, SkinTemperatureRecord, SleepAnalysis, StepsRecord,
};

/// Device repository exposing one fetch operation per activity type
/// plus the raw connection-state stream.
///
/// Fetch operations report through [`FetchResult`], never through
/// `Err`: a failed call is data, not a propagated error. Sleep and
/// skin temperature are addressed by calendar date; every other
/// operation takes start-of-day instants.
#[async_trait]
pub trait ActivityRepository: Send + Sync {
    /// Fetch nightly sleep analysis for the date range.
    async fn fetch_sleep(&self, device_id: &str, from: Date, to: Date)
    -> FetchResult<SleepAnalysis>;

    /// Fetch step counts for the instant range.
    async fn fetch_steps(
        &self,
        device_id: &str,
        from: OffsetDateTime,
        to: OffsetDateTime,
    ) -> FetchResult<StepsRecord>;

    /// Fetch burned calories of the given kind for the instant range.
    async fn fetch_calories(
        &self,
        device_id: &str,
        from: OffsetDateTime,
        to: OffsetDateTime,
        kind: CaloriesKind,
    ) -> FetchResult<CaloriesRecord>;

    /// Fetch 24/7 heart rate samples for the instant range.
    async fn fetch_hr_samples(
        &self,
        device_id: &str,
        from: OffsetDateTime,
        to: OffsetDateTime,
    ) -> FetchResult<HrSamplesRecord>;

    /// Fetch the Nightly Recharge measurement for the instant range.
    async fn fetch_nightly_recharge(
        &self,
        device_id: &str,
        from: OffsetDateTime,
        to: OffsetDateTime,
    ) -> FetchResult<NightlyRecharge>;

    /// Fetch 24/7 peak-to-peak interval samples for the instant range.
    async fn fetch_ppi_samples(
        &self,
        device_id: &str,
        from: OffsetDateTime,
        to: OffsetDateTime,
    ) -> FetchResult<PpiSamplesRecord>;

    /// Fetch nightly skin temperature measurements for the date range.
    async fn fetch_skin_temperature(
        &self,
        device_id: &str,
        from: Date,
        to: Date,
    ) -> FetchResult<SkinTemperatureRecord>;

    /// Subscribe to the raw device connection-state stream.
    ///
    /// The stream reports every phase transition, including repeats of
    /// the same phase, for as long as the repository lives.
    fn connection_events(&self) -> broadcast::Receiver<ConnectionState>;
}
