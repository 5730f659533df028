//! Runtime bridge between UI command queue and backend event intake.

use std::{sync::Arc, thread};

use client_core::{
    fetch_insights, HttpPredictionService, PredictionService, Settings,
    UnavailablePredictionService,
};
use crossbeam_channel::{Receiver, Sender};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;
use crate::ui::images::decode_insight_image;

pub fn launch(settings: Settings, cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>) {
    let service: Arc<dyn PredictionService> = match HttpPredictionService::from_settings(&settings)
    {
        Ok(service) => Arc::new(service),
        Err(err) => {
            tracing::error!("failed to build prediction client: {err}");
            Arc::new(UnavailablePredictionService::new(err.to_string()))
        }
    };
    let _ = ui_tx.try_send(UiEvent::Info(format!(
        "Prediction service: {}",
        settings.backend_url
    )));
    launch_with_service(service, cmd_rx, ui_tx);
}

/// Runs every command on its own task so a slow insight download never
/// holds up a prediction.
pub fn launch_with_service(
    service: Arc<dyn PredictionService>,
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
) {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::WorkerFailed(format!(
                    "backend worker startup failure: failed to build runtime: {err}"
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        while let Ok(cmd) = cmd_rx.recv() {
            let service = Arc::clone(&service);
            let ui_tx = ui_tx.clone();
            runtime.spawn(async move {
                for event in handle_command(service.as_ref(), cmd).await {
                    if ui_tx.send(event).is_err() {
                        tracing::debug!("ui event receiver dropped; discarding backend events");
                        return;
                    }
                }
            });
        }
        tracing::debug!("command channel closed; stopping backend worker");
    });
}

async fn handle_command(service: &dyn PredictionService, cmd: BackendCommand) -> Vec<UiEvent> {
    tracing::debug!(command = cmd.name(), "backend command received");
    match cmd {
        BackendCommand::Predict { request } => {
            vec![UiEvent::PredictionFinished(service.predict(&request).await)]
        }
        BackendCommand::FetchInsights => fetch_insights(service)
            .await
            .into_iter()
            .map(|(kind, result)| {
                match result
                    .map_err(|err| err.to_string())
                    .and_then(|bytes| decode_insight_image(&bytes))
                {
                    Ok(image) => UiEvent::InsightLoaded { kind, image },
                    Err(reason) => UiEvent::InsightFailed { kind, reason },
                }
            })
            .collect(),
    }
}
