use std::sync::Mutex;

use async_trait::async_trait;
use shared::{
    domain::{FieldEdit, NumericField, PassLocation, PlaySituation},
    protocol::{InsightKind, PredictResponse},
};

use super::*;
use crate::render::BlitzVerdict;

/// Answers every prediction with a fixed result and remembers what it was sent.
struct ScriptedService {
    answer: Option<f64>,
    seen: Mutex<Vec<PlaySituation>>,
}

impl ScriptedService {
    fn answering(proba: f64) -> Self {
        Self {
            answer: Some(proba),
            seen: Mutex::new(Vec::new()),
        }
    }

    fn down() -> Self {
        Self {
            answer: None,
            seen: Mutex::new(Vec::new()),
        }
    }

    fn seen(&self) -> Vec<PlaySituation> {
        self.seen.lock().expect("seen lock").clone()
    }
}

#[async_trait]
impl PredictionService for ScriptedService {
    async fn predict(&self, situation: &PlaySituation) -> Result<PredictResponse, PredictionError> {
        self.seen
            .lock()
            .expect("seen lock")
            .push(situation.clone());
        match self.answer {
            Some(proba) => Ok(PredictResponse { proba }),
            None => Err(PredictionError::Unavailable("connection refused".into())),
        }
    }

    async fn fetch_insight(&self, _kind: InsightKind) -> Result<Vec<u8>, PredictionError> {
        Err(PredictionError::Unavailable("no insights".into()))
    }
}

#[test]
fn starts_with_default_record_and_no_result() {
    let controller = FormController::new();
    assert_eq!(controller.record(), &PlaySituation::default());
    assert!(controller.result().is_none());
    assert!(controller.pending_notice().is_none());
    assert!(!controller.is_submitting());
}

#[test]
fn edit_is_visible_immediately() {
    let mut controller = FormController::new();
    controller.edit(FieldEdit::Numeric(NumericField::Down, 3));
    assert_eq!(controller.record().down, 3);

    controller.edit(FieldEdit::PassLocation(PassLocation::Left));
    assert_eq!(controller.record().pass_location, PassLocation::Left);
    assert_eq!(controller.record().down, 3);
}

#[tokio::test]
async fn submit_sends_current_record_and_stores_result() {
    let service = ScriptedService::answering(0.73);
    let mut controller = FormController::new();
    controller.edit(FieldEdit::Numeric(NumericField::YardsToGo, 7));

    let outcome = controller.submit(&service).await.expect("prediction");

    assert_eq!(outcome.percent(), "73.00%");
    assert_eq!(outcome.verdict, BlitzVerdict::BlitzLikely);
    assert_eq!(controller.result().map(|r| r.proba), Some(0.73));
    assert!(!controller.is_submitting());

    let seen = service.seen();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].ydstogo, 7);
}

#[tokio::test]
async fn failed_submit_queues_one_notice_and_keeps_state() {
    let mut controller = FormController::new();
    controller.edit(FieldEdit::Numeric(NumericField::Quarter, 4));
    controller
        .submit(&ScriptedService::answering(0.2))
        .await
        .expect("first prediction");
    let record_before = controller.record().clone();

    let notice = controller
        .submit(&ScriptedService::down())
        .await
        .expect_err("backend is down");

    assert!(matches!(notice, Notice::UnreachableBackend { .. }));
    assert_eq!(controller.notice_count(), 1);
    assert_eq!(controller.record(), &record_before);
    let kept = controller.result().expect("previous result kept");
    assert_eq!(kept.verdict, BlitzVerdict::NoBlitz);
    assert_eq!(kept.percent(), "20.00%");
}

#[tokio::test]
async fn acknowledging_clears_the_notice() {
    let mut controller = FormController::new();
    let _ = controller.submit(&ScriptedService::down()).await;
    let notice = controller.pending_notice().cloned().expect("notice");
    assert_eq!(notice.title(), "Cannot reach backend");
    assert!(notice.detail().contains("connection refused"));

    assert_eq!(controller.acknowledge_notice(), Some(notice));
    assert!(controller.pending_notice().is_none());
    assert_eq!(controller.notice_count(), 0);
}

#[test]
fn split_submission_tracks_in_flight_state() {
    let mut controller = FormController::new();
    let request = controller.begin_submission();
    assert_eq!(request, PlaySituation::default());
    assert!(controller.is_submitting());

    let outcome = controller
        .complete_submission(Ok(PredictResponse { proba: 0.51 }))
        .expect("outcome");
    assert_eq!(outcome.verdict, BlitzVerdict::BlitzLikely);
    assert!(!controller.is_submitting());
}

#[test]
fn status_and_decode_failures_surface_as_the_same_notice() {
    let mut controller = FormController::new();
    controller.begin_submission();
    let notice = controller
        .complete_submission(Err(PredictionError::Status {
            endpoint: "http://localhost:5000/predict".into(),
            status: 500,
        }))
        .expect_err("status failure");
    assert_eq!(notice.message(), Notice::UnreachableBackend { detail: String::new() }.message());
    assert!(notice.detail().contains("HTTP 500"));
    assert!(!controller.is_submitting());
}
