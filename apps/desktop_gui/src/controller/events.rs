//! Events the backend worker sends back to the UI thread.

use client_core::PredictionError;
use shared::protocol::{InsightKind, PredictResponse};

use crate::ui::images::PreviewImage;

pub enum UiEvent {
    Info(String),
    PredictionFinished(Result<PredictResponse, PredictionError>),
    InsightLoaded {
        kind: InsightKind,
        image: PreviewImage,
    },
    InsightFailed {
        kind: InsightKind,
        reason: String,
    },
    WorkerFailed(String),
}
