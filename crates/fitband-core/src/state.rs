//! UI-facing result state for one fetch session.

use serde::Serialize;

use fitband_types::{FetchCause, ResourceRef};

/// Immutable payload published once a fetch succeeds and the
/// recording is persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityRecordingData {
    /// Requested start date in its default calendar form.
    pub start_date: String,
    /// Requested end date in its default calendar form.
    pub end_date: String,
    /// Where the serialized recording was persisted.
    pub resource_ref: ResourceRef,
}

/// The three result states a fetch session can publish.
///
/// A session starts in `Fetching` and transitions at most once, to
/// either `Fetched` or `Failed`; neither terminal state ever reverts.
#[derive(Debug, Clone, Default)]
pub enum ActivityDataUiState {
    /// The one-shot fetch has not completed yet.
    #[default]
    Fetching,
    /// The recording was fetched, serialized, and persisted.
    Fetched(ActivityRecordingData),
    /// The fetch failed or returned no data.
    Failed {
        message: String,
        cause: Option<FetchCause>,
    },
}

impl ActivityDataUiState {
    /// Whether this state ends the session's state machine.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ActivityDataUiState::Fetching)
    }
}
