//! Where completed applications go.

use std::{path::PathBuf, thread, time::Duration};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    answers::FormAnswers,
    config::SubmissionSettings,
    errors::Result,
    utils::persistence::append_line,
};

/// Acknowledgement handed back by a sink once it accepted the answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub id: Uuid,
    pub submitted_at: DateTime<Utc>,
}

impl Receipt {
    pub fn issue() -> Self {
        Self {
            id: Uuid::new_v4(),
            submitted_at: Utc::now(),
        }
    }
}

/// Accepts a complete set of answers. Implementations block until the
/// submission has either gone through or failed.
pub trait SubmissionSink: Send + Sync {
    fn submit(&self, answers: &FormAnswers) -> Result<Receipt>;

    fn describe(&self) -> String {
        "submission sink".into()
    }
}

/// Waits for a fixed delay and then always succeeds.
#[derive(Debug, Clone)]
pub struct SimulatedSubmission {
    delay: Duration,
}

impl SimulatedSubmission {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn from_settings(settings: &SubmissionSettings) -> Self {
        Self::new(settings.delay())
    }
}

impl SubmissionSink for SimulatedSubmission {
    fn submit(&self, answers: &FormAnswers) -> Result<Receipt> {
        debug!(delay_ms = self.delay.as_millis() as u64, "simulating submission");
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
        let receipt = Receipt::issue();
        info!(id = %receipt.id, email = %answers.email, "application submitted");
        Ok(receipt)
    }

    fn describe(&self) -> String {
        format!("simulated ({} ms)", self.delay.as_millis())
    }
}

#[derive(Serialize)]
struct LoggedSubmission<'a> {
    receipt: &'a Receipt,
    answers: &'a FormAnswers,
}

/// Forwards to another sink and appends every accepted submission to a
/// JSON-lines file.
pub struct JsonlSubmissionLog {
    path: PathBuf,
    inner: Box<dyn SubmissionSink>,
}

impl JsonlSubmissionLog {
    pub fn new(path: PathBuf, inner: Box<dyn SubmissionSink>) -> Self {
        Self { path, inner }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl SubmissionSink for JsonlSubmissionLog {
    fn submit(&self, answers: &FormAnswers) -> Result<Receipt> {
        let receipt = self.inner.submit(answers)?;
        let line = serde_json::to_string(&LoggedSubmission {
            receipt: &receipt,
            answers,
        })?;
        // The inner sink has accepted the answers; a failure to record them
        // must not turn into a resubmission.
        if let Err(err) = append_line(&self.path, &line) {
            warn!(
                id = %receipt.id,
                path = %self.path.display(),
                error = %err,
                "could not record accepted submission"
            );
        }
        Ok(receipt)
    }

    fn describe(&self) -> String {
        format!("{} -> {}", self.inner.describe(), self.path.display())
    }
}
