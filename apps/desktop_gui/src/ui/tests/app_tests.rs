use crossbeam_channel::bounded;
use shared::{domain::PlaySituation, protocol::PredictResponse};

use super::*;

fn app_with_channels() -> (BlitzWatchApp, Receiver<BackendCommand>, Sender<UiEvent>) {
    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(8);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(8);
    let app = BlitzWatchApp::new(cmd_tx, ui_rx, StartupConfig::default());
    (app, cmd_rx, ui_tx)
}

#[test]
fn requests_insights_on_startup() {
    let (app, cmd_rx, _ui_tx) = app_with_channels();
    assert!(matches!(cmd_rx.try_recv(), Ok(BackendCommand::FetchInsights)));
    assert!(app
        .insights
        .values()
        .all(|tile| matches!(tile, InsightTile::Loading)));
}

#[test]
fn submit_queues_current_record() {
    let (mut app, cmd_rx, _ui_tx) = app_with_channels();
    let _ = cmd_rx.try_recv();
    app.form.edit(FieldEdit::Numeric(NumericField::Down, 3));

    app.submit();

    assert!(app.form.is_submitting());
    match cmd_rx.try_recv() {
        Ok(BackendCommand::Predict { request }) => {
            assert_eq!(
                request,
                PlaySituation {
                    down: 3,
                    ..PlaySituation::default()
                }
            );
        }
        _ => panic!("expected a predict command"),
    }
}

#[test]
fn prediction_event_renders_result() {
    let (mut app, _cmd_rx, ui_tx) = app_with_channels();
    app.submit();
    ui_tx
        .send(UiEvent::PredictionFinished(Ok(PredictResponse { proba: 0.73 })))
        .expect("send");

    app.process_ui_events();

    let outcome = app.form.result().expect("result");
    assert_eq!(outcome.percent(), "73.00%");
    assert_eq!(outcome.verdict, BlitzVerdict::BlitzLikely);
    assert!(!app.form.is_submitting());
}

#[test]
fn failed_prediction_blocks_with_one_notice() {
    let (mut app, _cmd_rx, ui_tx) = app_with_channels();
    app.form.edit(FieldEdit::Flag(FormationFlag::Shotgun, true));
    let before = app.form.record().clone();
    app.submit();
    ui_tx
        .send(UiEvent::PredictionFinished(Err(PredictionError::Unavailable(
            "connection refused".into(),
        ))))
        .expect("send");

    app.process_ui_events();

    assert_eq!(app.form.notice_count(), 1);
    assert_eq!(app.form.record(), &before);
    assert!(app.form.result().is_none());
}

#[test]
fn disconnected_worker_raises_notice_on_submit() {
    let (mut app, cmd_rx, _ui_tx) = app_with_channels();
    drop(cmd_rx);

    app.submit();

    assert_eq!(app.form.notice_count(), 1);
    assert!(!app.form.is_submitting());
    assert!(app.status.contains("disconnected"));
}

#[test]
fn insight_events_update_tiles() {
    let (mut app, _cmd_rx, ui_tx) = app_with_channels();
    ui_tx
        .send(UiEvent::InsightLoaded {
            kind: InsightKind::ShapSummary,
            image: PreviewImage {
                width: 1,
                height: 1,
                rgba: vec![0, 0, 0, 255],
            },
        })
        .expect("send");
    ui_tx
        .send(UiEvent::InsightFailed {
            kind: InsightKind::ConfusionMatrix,
            reason: "HTTP 500".into(),
        })
        .expect("send");

    app.process_ui_events();

    assert!(matches!(
        app.insights.get(&InsightKind::ShapSummary),
        Some(InsightTile::Ready { texture: None, .. })
    ));
    assert!(matches!(
        app.insights.get(&InsightKind::ConfusionMatrix),
        Some(InsightTile::Unavailable(reason)) if reason == "HTTP 500"
    ));
    assert!(matches!(
        app.insights.get(&InsightKind::FeatureImportance),
        Some(InsightTile::Loading)
    ));
}

#[test]
fn worker_failure_clears_pending_state() {
    let (mut app, _cmd_rx, ui_tx) = app_with_channels();
    app.submit();
    ui_tx
        .send(UiEvent::WorkerFailed("runtime died".into()))
        .expect("send");

    app.process_ui_events();

    assert!(!app.form.is_submitting());
    assert_eq!(app.form.notice_count(), 1);
    assert!(app
        .insights
        .values()
        .all(|tile| matches!(tile, InsightTile::Unavailable(_))));
}

#[test]
fn invalid_backend_flag_falls_back_with_warning() {
    let startup = StartupConfig::resolve(None, Some("ftp://nowhere"));
    assert!(startup
        .warning
        .as_deref()
        .is_some_and(|w| w.contains("--backend-url")));
    assert!(matches!(startup.settings.backend_url.scheme(), "http" | "https"));
}
