use serde::{Deserialize, Serialize};

use crate::domain::PlaySituation;

/// Path of the prediction endpoint, relative to the backend base URL.
pub const PREDICT_PATH: &str = "predict";

/// Body of `POST /predict`: the record itself, serialized field by field.
pub type PredictRequest = PlaySituation;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictResponse {
    pub proba: f64,
}

/// Pre-rendered diagnostic images served under `/insights/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InsightKind {
    FeatureImportance,
    ShapSummary,
    ConfusionMatrix,
}

impl InsightKind {
    pub const ALL: [InsightKind; 3] = [
        InsightKind::FeatureImportance,
        InsightKind::ShapSummary,
        InsightKind::ConfusionMatrix,
    ];

    pub fn slug(self) -> &'static str {
        match self {
            InsightKind::FeatureImportance => "feature_importance",
            InsightKind::ShapSummary => "shap_summary",
            InsightKind::ConfusionMatrix => "confusion_matrix",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            InsightKind::FeatureImportance => "Feature Importance",
            InsightKind::ShapSummary => "SHAP Summary",
            InsightKind::ConfusionMatrix => "Confusion Matrix",
        }
    }

    pub fn path(self) -> String {
        format!("insights/{}", self.slug())
    }
}
