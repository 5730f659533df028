use async_trait::async_trait;
use futures::future::join_all;
use reqwest::{Client, Response};
use shared::{
    domain::PlaySituation,
    protocol::{InsightKind, PredictResponse, PREDICT_PATH},
};
use tracing::{debug, info, warn};
use url::Url;

pub mod controller;
pub mod error;
pub mod render;
pub mod settings;

pub use controller::{FormController, Notice};
pub use error::PredictionError;
pub use render::{format_probability, BlitzVerdict, PredictionOutcome};
pub use settings::{load_settings, Settings, SettingsError};

/// The external prediction backend, as seen from the client.
#[async_trait]
pub trait PredictionService: Send + Sync {
    async fn predict(&self, situation: &PlaySituation) -> Result<PredictResponse, PredictionError>;
    async fn fetch_insight(&self, kind: InsightKind) -> Result<Vec<u8>, PredictionError>;
}

/// Stand-in used when no usable backend could be configured.
pub struct UnavailablePredictionService {
    reason: String,
}

impl UnavailablePredictionService {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl PredictionService for UnavailablePredictionService {
    async fn predict(&self, _situation: &PlaySituation) -> Result<PredictResponse, PredictionError> {
        Err(PredictionError::Unavailable(self.reason.clone()))
    }

    async fn fetch_insight(&self, _kind: InsightKind) -> Result<Vec<u8>, PredictionError> {
        Err(PredictionError::Unavailable(self.reason.clone()))
    }
}

pub struct HttpPredictionService {
    http: Client,
    base_url: Url,
}

impl HttpPredictionService {
    /// Client with reqwest defaults and no request timeout. The apps go
    /// through [`HttpPredictionService::from_settings`] instead.
    pub fn new(base_url: Url) -> Self {
        Self {
            http: Client::new(),
            base_url: settings::normalize_base_url(base_url),
        }
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, PredictionError> {
        let mut builder = Client::builder();
        if let Some(timeout) = settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|source| PredictionError::Transport {
                endpoint: settings.backend_url.to_string(),
                source,
            })?;
        Ok(Self {
            http,
            base_url: settings::normalize_base_url(settings.backend_url.clone()),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, PredictionError> {
        self.base_url
            .join(path)
            .map_err(|source| PredictionError::InvalidEndpoint {
                path: path.to_string(),
                source,
            })
    }
}

async fn read_success_body(res: Response, endpoint: &Url) -> Result<Vec<u8>, PredictionError> {
    let status = res.status();
    if !status.is_success() {
        return Err(PredictionError::Status {
            endpoint: endpoint.to_string(),
            status: status.as_u16(),
        });
    }
    let body = res
        .bytes()
        .await
        .map_err(|source| PredictionError::Transport {
            endpoint: endpoint.to_string(),
            source,
        })?;
    Ok(body.to_vec())
}

#[async_trait]
impl PredictionService for HttpPredictionService {
    async fn predict(&self, situation: &PlaySituation) -> Result<PredictResponse, PredictionError> {
        let endpoint = self.endpoint(PREDICT_PATH)?;
        debug!(%endpoint, "sending prediction request");
        let res = self
            .http
            .post(endpoint.clone())
            .json(situation)
            .send()
            .await
            .map_err(|source| PredictionError::Transport {
                endpoint: endpoint.to_string(),
                source,
            })?;
        let body = read_success_body(res, &endpoint).await?;
        let parsed: PredictResponse =
            serde_json::from_slice(&body).map_err(|source| PredictionError::Decode {
                endpoint: endpoint.to_string(),
                source,
            })?;
        info!(%endpoint, proba = parsed.proba, "prediction received");
        Ok(parsed)
    }

    async fn fetch_insight(&self, kind: InsightKind) -> Result<Vec<u8>, PredictionError> {
        let endpoint = self.endpoint(&kind.path())?;
        let res = self
            .http
            .get(endpoint.clone())
            .send()
            .await
            .map_err(|source| PredictionError::Transport {
                endpoint: endpoint.to_string(),
                source,
            })?;
        let bytes = read_success_body(res, &endpoint).await?;
        debug!(%endpoint, bytes = bytes.len(), "insight image fetched");
        Ok(bytes)
    }
}

/// Fetches every insight image concurrently. One failure does not affect the others.
pub async fn fetch_insights(
    service: &dyn PredictionService,
) -> Vec<(InsightKind, Result<Vec<u8>, PredictionError>)> {
    let fetches = InsightKind::ALL.into_iter().map(|kind| async move {
        let result = service.fetch_insight(kind).await;
        if let Err(err) = &result {
            warn!(insight = kind.slug(), error = %err, "insight image unavailable");
        }
        (kind, result)
    });
    join_all(fetches).await
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
