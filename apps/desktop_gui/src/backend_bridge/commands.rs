//! Backend commands queued from UI to backend worker.

use shared::protocol::PredictRequest;

pub enum BackendCommand {
    Predict { request: PredictRequest },
    FetchInsights,
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::Predict { .. } => "predict",
            BackendCommand::FetchInsights => "fetch_insights",
        }
    }
}
