//! The form controller: one editable record, one submit action, and the
//! notices a failed submit leaves behind.

use std::collections::VecDeque;

use shared::{
    domain::{FieldEdit, PlaySituation},
    protocol::{PredictRequest, PredictResponse},
};
use tracing::{debug, info, warn};

use crate::{render::PredictionOutcome, PredictionError, PredictionService};

/// A blocking, user-facing message. Surfaces show it modally until acknowledged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    UnreachableBackend { detail: String },
}

impl Notice {
    pub fn title(&self) -> &'static str {
        match self {
            Notice::UnreachableBackend { .. } => "Cannot reach backend",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Notice::UnreachableBackend { .. } => {
                "Cannot reach backend. Is the prediction service running?"
            }
        }
    }

    pub fn detail(&self) -> &str {
        match self {
            Notice::UnreachableBackend { detail } => detail,
        }
    }
}

impl From<&PredictionError> for Notice {
    fn from(err: &PredictionError) -> Self {
        Notice::UnreachableBackend {
            detail: err.to_string(),
        }
    }
}

#[derive(Debug, Default)]
pub struct FormController {
    record: PlaySituation,
    result: Option<PredictionOutcome>,
    notices: VecDeque<Notice>,
    submitting: bool,
}

impl FormController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(record: PlaySituation) -> Self {
        Self {
            record,
            ..Self::default()
        }
    }

    pub fn record(&self) -> &PlaySituation {
        &self.record
    }

    pub fn edit(&mut self, edit: FieldEdit) {
        debug!(field = edit.field_name(), ?edit, "form field edited");
        self.record.apply(edit);
    }

    pub fn result(&self) -> Option<&PredictionOutcome> {
        self.result.as_ref()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Snapshot of the record to send. Pair with [`Self::complete_submission`].
    pub fn begin_submission(&mut self) -> PredictRequest {
        self.submitting = true;
        self.record.clone()
    }

    /// Records the outcome of a submission. On failure the record and any
    /// earlier result stay as they were, and one notice is queued.
    pub fn complete_submission(
        &mut self,
        response: Result<PredictResponse, PredictionError>,
    ) -> Result<PredictionOutcome, Notice> {
        self.submitting = false;
        match response {
            Ok(response) => {
                let outcome = PredictionOutcome::new(response);
                info!(
                    proba = outcome.proba,
                    verdict = outcome.verdict.label(),
                    "prediction rendered"
                );
                self.result = Some(outcome.clone());
                Ok(outcome)
            }
            Err(err) => {
                warn!(kind = err.kind(), error = %err, "prediction request failed");
                let notice = Notice::from(&err);
                self.notices.push_back(notice.clone());
                Err(notice)
            }
        }
    }

    pub async fn submit(
        &mut self,
        service: &dyn PredictionService,
    ) -> Result<PredictionOutcome, Notice> {
        let request = self.begin_submission();
        let response = service.predict(&request).await;
        self.complete_submission(response)
    }

    pub fn pending_notice(&self) -> Option<&Notice> {
        self.notices.front()
    }

    pub fn notice_count(&self) -> usize {
        self.notices.len()
    }

    pub fn acknowledge_notice(&mut self) -> Option<Notice> {
        self.notices.pop_front()
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
