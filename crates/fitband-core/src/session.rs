//! One-shot fetch session: the orchestrating state machine.

use std::sync::Arc;

use time::Date;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use fitband_types::{ActivityData, ActivityType, CaloriesKind, FetchResult};

use crate::dispatch::ActivityTypeDispatcher;
use crate::error::{Error, Result};
use crate::monitor::ConnectionStatusMonitor;
use crate::persist::RecordingSink;
use crate::repository::ActivityRepository;
use crate::serialize::{recording_path, serialize};
use crate::state::{ActivityDataUiState, ActivityRecordingData};

/// Compact calendar date form accepted at construction, `20240101`.
const COMPACT_DATE: &[BorrowedFormatItem<'static>] = format_description!("[year][month][day]");

/// Raw construction arguments, as extracted by the caller from its
/// navigation or request layer.
#[derive(Debug, Clone)]
pub struct FetchParams {
    /// Target device identifier. Required.
    pub device_id: String,
    /// Activity type token, e.g. `SLEEP`. Required.
    pub activity_type: String,
    /// Compact start date, `yyyyMMdd`. Required.
    pub start_date: String,
    /// Compact end date, `yyyyMMdd`. Required.
    pub end_date: String,
    /// Calories kind token; `ACTIVITY` when absent.
    pub calories_kind: Option<String>,
}

/// Validated request derived from [`FetchParams`].
#[derive(Debug, Clone)]
struct FetchRequest {
    device_id: String,
    ty: ActivityType,
    start: Date,
    end: Date,
    calories_kind: CaloriesKind,
}

impl FetchRequest {
    fn validate(params: FetchParams) -> Result<Self> {
        if params.device_id.is_empty() {
            return Err(Error::MissingArgument("a device id"));
        }
        if params.activity_type.is_empty() {
            return Err(Error::MissingArgument("an activity type"));
        }
        if params.start_date.is_empty() {
            return Err(Error::MissingArgument("a start date"));
        }
        if params.end_date.is_empty() {
            return Err(Error::MissingArgument("an end date"));
        }

        let ty: ActivityType = params.activity_type.parse()?;
        let calories_kind = match params.calories_kind.as_deref() {
            Some(token) => token.parse()?,
            None => CaloriesKind::default(),
        };
        let start = parse_compact_date(&params.start_date)?;
        let end = parse_compact_date(&params.end_date)?;

        Ok(Self {
            device_id: params.device_id,
            ty,
            start,
            end,
            calories_kind,
        })
    }
}

fn parse_compact_date(input: &str) -> Result<Date> {
    Date::parse(input, COMPACT_DATE).map_err(|e| Error::invalid_date(input, e))
}

/// A single activity-recording fetch and export.
///
/// Construction validates every argument (missing fields, unknown
/// tokens, and malformed dates are fatal) and then spawns exactly two
/// background tasks for the session's lifetime:
///
/// - a one-shot fetch that dispatches to the repository, serializes
///   and persists the result, and publishes the terminal UI state;
/// - a connection monitor collapsing the repository's raw
///   connection-state stream into the published boolean.
///
/// Both published values are `watch` channels and can be read or
/// awaited from any task. Dropping the session (or calling
/// [`ActivityFetchSession::cancel`]) cancels both tasks; a cancelled
/// fetch never publishes a late transition. The fetch runs exactly
/// once; there is no retry or re-fetch.
#[derive(Debug)]
pub struct ActivityFetchSession {
    token: CancellationToken,
    data_rx: watch::Receiver<ActivityDataUiState>,
    connected_rx: watch::Receiver<bool>,
}

impl ActivityFetchSession {
    /// Validate `params` and start the fetch.
    ///
    /// Must be called within a tokio runtime; the fetch itself runs on
    /// a spawned background task, never on the caller's context.
    pub fn start(
        repository: Arc<dyn ActivityRepository>,
        sink: Arc<dyn RecordingSink>,
        params: FetchParams,
    ) -> Result<Self> {
        let request = FetchRequest::validate(params)?;

        let (data_tx, data_rx) = watch::channel(ActivityDataUiState::Fetching);
        let (connected_tx, connected_rx) = watch::channel(true);
        let token = CancellationToken::new();

        let events = repository.connection_events();
        let monitor_token = token.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = monitor_token.cancelled() => {}
                _ = ConnectionStatusMonitor::run(events, connected_tx) => {}
            }
        });

        let dispatcher = ActivityTypeDispatcher::new(repository);
        let fetch_token = token.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = fetch_token.cancelled() => {}
                _ = run_fetch(dispatcher, sink, request, data_tx) => {}
            }
        });

        Ok(Self {
            token,
            data_rx,
            connected_rx,
        })
    }

    /// Observe the three-state fetch result.
    pub fn ui_state(&self) -> watch::Receiver<ActivityDataUiState> {
        self.data_rx.clone()
    }

    /// Observe the collapsed device-connection boolean.
    pub fn connection(&self) -> watch::Receiver<bool> {
        self.connected_rx.clone()
    }

    /// Cancel the in-flight fetch (if any) and the connection monitor.
    pub fn cancel(&self) {
        self.token.cancel();
    }
}

impl Drop for ActivityFetchSession {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

async fn run_fetch(
    dispatcher: ActivityTypeDispatcher,
    sink: Arc<dyn RecordingSink>,
    request: FetchRequest,
    ui: watch::Sender<ActivityDataUiState>,
) {
    let Some(result) = dispatcher
        .dispatch(
            &request.device_id,
            request.ty,
            request.start,
            request.end,
            request.calories_kind,
        )
        .await
    else {
        // Unhandled type: diagnostic only, published state untouched.
        return;
    };

    let next = match result {
        FetchResult::Failure { message, cause } => {
            warn!(ty = %request.ty, %message, "activity fetch failed");
            ActivityDataUiState::Failed { message, cause }
        }
        FetchResult::Success(None) => ActivityDataUiState::Failed {
            message: empty_data_message(request.ty).to_string(),
            cause: None,
        },
        FetchResult::Success(Some(data)) => {
            match export(sink.as_ref(), request.ty, &data, request.start, request.end).await {
                Ok(recording) => ActivityDataUiState::Fetched(recording),
                Err(e) => {
                    warn!(ty = %request.ty, error = %e, "activity export failed");
                    let message = e.to_string();
                    ActivityDataUiState::Failed {
                        message,
                        cause: Some(Arc::new(e)),
                    }
                }
            }
        }
    };
    let _ = ui.send(next);
}

async fn export(
    sink: &dyn RecordingSink,
    ty: ActivityType,
    data: &ActivityData,
    start: Date,
    end: Date,
) -> Result<ActivityRecordingData> {
    let bytes = serialize(ty, data)?;
    let path = recording_path(ty, start);
    let resource_ref = sink.save(&bytes, &path).await?;
    debug!(%path, %resource_ref, "activity recording exported");
    Ok(ActivityRecordingData {
        start_date: start.to_string(),
        end_date: end.to_string(),
        resource_ref,
    })
}

fn empty_data_message(ty: ActivityType) -> &'static str {
    match ty {
        ActivityType::Sleep => "fetch sleep recording responded with empty data",
        ActivityType::PpiSamples => "fetch PPi data from a device responded with empty data",
        ActivityType::SkinTemperature => {
            "fetch skin temperature recording responded with empty data"
        }
        _ => "fetch recording responded with empty data",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockRepository, MockSink};
    use time::macros::date;

    fn params() -> FetchParams {
        FetchParams {
            device_id: "1C709B20".to_string(),
            activity_type: "SLEEP".to_string(),
            start_date: "20240101".to_string(),
            end_date: "20240105".to_string(),
            calories_kind: None,
        }
    }

    #[test]
    fn test_parse_compact_date() {
        assert_eq!(parse_compact_date("20240101").unwrap(), date!(2024 - 01 - 01));
        assert!(matches!(
            parse_compact_date("2024-01-01"),
            Err(Error::InvalidDate { .. })
        ));
        assert!(parse_compact_date("20241341").is_err());
    }

    #[tokio::test]
    async fn test_missing_arguments_fail_construction() {
        for field in ["device_id", "activity_type", "start_date", "end_date"] {
            let mut p = params();
            match field {
                "device_id" => p.device_id.clear(),
                "activity_type" => p.activity_type.clear(),
                "start_date" => p.start_date.clear(),
                _ => p.end_date.clear(),
            }
            let err = ActivityFetchSession::start(
                Arc::new(MockRepository::new()),
                Arc::new(MockSink::new()),
                p,
            )
            .unwrap_err();
            assert!(matches!(err, Error::MissingArgument(_)), "{field}");
        }
    }

    #[tokio::test]
    async fn test_unknown_activity_token_never_reaches_dispatch() {
        let repo = Arc::new(MockRepository::new());
        let mut p = params();
        p.activity_type = "WINGSPAN".to_string();

        let err =
            ActivityFetchSession::start(repo.clone(), Arc::new(MockSink::new()), p).unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
        assert!(repo.recorded_calls().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_calories_kind_fails_construction() {
        let mut p = params();
        p.calories_kind = Some("SWIMMING".to_string());
        let err = ActivityFetchSession::start(
            Arc::new(MockRepository::new()),
            Arc::new(MockSink::new()),
            p,
        )
        .unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[test]
    fn test_empty_data_messages() {
        assert_eq!(
            empty_data_message(ActivityType::Sleep),
            "fetch sleep recording responded with empty data"
        );
        assert_eq!(
            empty_data_message(ActivityType::Steps),
            "fetch recording responded with empty data"
        );
        assert_eq!(
            empty_data_message(ActivityType::PpiSamples),
            "fetch PPi data from a device responded with empty data"
        );
        assert_eq!(
            empty_data_message(ActivityType::SkinTemperature),
            "fetch skin temperature recording responded with empty data"
        );
    }
}
