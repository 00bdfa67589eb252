//! Fetch-and-export orchestration for wearable activity recordings.
//!
//! The entry point is [`ActivityFetchSession`]: given a device id, an
//! activity type token, and a compact date range, it dispatches to the
//! single matching fetch operation on the injected
//! [`ActivityRepository`], serializes the returned record to per-type
//! JSON, persists it through the injected [`RecordingSink`], and
//! publishes a three-state result plus a device-connection boolean as
//! `tokio::sync::watch` values.
//!
//! # Quick start
//!
//! ```no_run
//! use std::sync::Arc;
//! use fitband_core::{ActivityFetchSession, FetchParams, FsRecordingSink, MockRepository};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let repository = Arc::new(MockRepository::new());
//!     let sink = Arc::new(FsRecordingSink::new("/tmp/exports"));
//!
//!     let session = ActivityFetchSession::start(repository, sink, FetchParams {
//!         device_id: "1C709B20".into(),
//!         activity_type: "SLEEP".into(),
//!         start_date: "20240101".into(),
//!         end_date: "20240105".into(),
//!         calories_kind: None,
//!     })?;
//!
//!     let mut state = session.ui_state();
//!     state.changed().await?;
//!     println!("{:?}", *state.borrow());
//!     Ok(())
//! }
//! ```

pub mod dispatch;
pub mod error;
pub mod mock;
pub mod monitor;
pub mod persist;
pub mod repository;
pub mod serialize;
pub mod session;
pub mod state;

pub use dispatch::ActivityTypeDispatcher;
pub use error::{Error, Result};
pub use mock::{MockRepository, MockSink, RecordedCall};
pub use monitor::ConnectionStatusMonitor;
pub use persist::{FsRecordingSink, RecordingSink};
pub use repository::ActivityRepository;
pub use serialize::{TemporalFormats, formats_for, recording_path, serialize};
pub use session::{ActivityFetchSession, FetchParams};
pub use state::{ActivityDataUiState, ActivityRecordingData};

// Re-export the shared types for downstream convenience.
pub use fitband_types::{
    ActivityData, ActivityType, CaloriesKind, ConnectionState, FetchCause, FetchResult,
    ResourceRef,
};
