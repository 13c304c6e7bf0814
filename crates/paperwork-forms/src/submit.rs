//! The submit boundary.
//!
//! Submission is the only place the runtime hands data to the outside world,
//! so it is the only asynchronous operation. A [`SubmitHandler`] receives the
//! form name and the JSON snapshot of its values.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use paperwork_core::PaperworkResult;
use serde::Serialize;

/// Receives validated form snapshots.
#[async_trait]
pub trait SubmitHandler: Send + Sync {
    /// Accepts one submission. An error leaves the form unsubmitted.
    async fn submit(&self, form_name: &str, snapshot: serde_json::Value) -> PaperworkResult<()>;
}

/// A handler that only logs the submission.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingSubmitHandler;

#[async_trait]
impl SubmitHandler for LoggingSubmitHandler {
    async fn submit(&self, form_name: &str, snapshot: serde_json::Value) -> PaperworkResult<()> {
        let payload = serde_json::to_string(&snapshot)?;
        tracing::info!(form = form_name, bytes = payload.len(), %payload, "form submitted");
        Ok(())
    }
}

/// Proof of a successful submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitReceipt {
    /// The form key.
    pub form: String,
    /// When the handler accepted the snapshot.
    pub submitted_at: DateTime<Utc>,
    /// Number of top-level keys in the snapshot.
    pub field_count: usize,
}

impl SubmitReceipt {
    pub(crate) fn new(form: &str, snapshot: &serde_json::Value) -> Self {
        Self {
            form: form.to_string(),
            submitted_at: Utc::now(),
            field_count: snapshot.as_object().map_or(0, serde_json::Map::len),
        }
    }
}
