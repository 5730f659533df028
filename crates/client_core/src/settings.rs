use std::{
    fs, io,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::Deserialize;
use thiserror::Error;
use url::Url;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:5000";
pub const DEFAULT_SETTINGS_PATH: &str = "blitzwatch.toml";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub backend_url: Url,
    pub request_timeout: Option<Duration>,
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file '{}': {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("invalid settings file '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid backend url '{value}': {source}")]
    InvalidUrl {
        value: String,
        source: url::ParseError,
    },
    #[error("backend url '{0}' must use http or https")]
    UnsupportedScheme(String),
    #[error("invalid {name} value '{value}'")]
    InvalidEnv { name: &'static str, value: String },
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    backend_url: Option<String>,
    request_timeout_secs: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            backend_url: Url::parse(DEFAULT_BACKEND_URL).expect("default backend url is valid"),
            request_timeout: Some(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS)),
        }
    }
}

impl Settings {
    pub fn with_backend_url(mut self, raw: &str) -> Result<Self, SettingsError> {
        self.backend_url = parse_backend_url(raw)?;
        Ok(self)
    }
}

/// Defaults, then the TOML file, then environment overrides.
///
/// With `path == None` the default `blitzwatch.toml` is read if it exists. An
/// explicit path must exist.
pub fn load_settings(path: Option<&Path>) -> Result<Settings, SettingsError> {
    load_settings_from(path, |name| std::env::var(name).ok())
}

fn load_settings_from(
    path: Option<&Path>,
    env: impl Fn(&str) -> Option<String>,
) -> Result<Settings, SettingsError> {
    let mut settings = Settings::default();

    let file_cfg = match path {
        Some(path) => Some(read_settings_file(path)?),
        None => {
            let default_path = Path::new(DEFAULT_SETTINGS_PATH);
            if default_path.exists() {
                Some(read_settings_file(default_path)?)
            } else {
                None
            }
        }
    };

    if let Some(file_cfg) = file_cfg {
        if let Some(v) = file_cfg.backend_url {
            settings.backend_url = parse_backend_url(&v)?;
        }
        if let Some(v) = file_cfg.request_timeout_secs {
            settings.request_timeout = timeout_from_secs(v);
        }
    }

    let non_empty = |name: &str| env(name).filter(|v| !v.trim().is_empty());

    if let Some(v) = non_empty("BLITZWATCH_BACKEND_URL") {
        settings.backend_url = parse_backend_url(&v)?;
    }
    if let Some(v) = non_empty("APP__BACKEND_URL") {
        settings.backend_url = parse_backend_url(&v)?;
    }

    if let Some(v) = non_empty("BLITZWATCH_REQUEST_TIMEOUT_SECS") {
        let secs = v
            .trim()
            .parse::<u64>()
            .map_err(|_| SettingsError::InvalidEnv {
                name: "BLITZWATCH_REQUEST_TIMEOUT_SECS",
                value: v.clone(),
            })?;
        settings.request_timeout = timeout_from_secs(secs);
    }

    Ok(settings)
}

fn read_settings_file(path: &Path) -> Result<FileSettings, SettingsError> {
    let raw = fs::read_to_string(path).map_err(|source| SettingsError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&raw).map_err(|source| SettingsError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn timeout_from_secs(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}

/// Parses a base URL and makes sure relative endpoint paths join beneath it.
pub fn parse_backend_url(raw: &str) -> Result<Url, SettingsError> {
    let raw = raw.trim();
    let url = Url::parse(raw).map_err(|source| SettingsError::InvalidUrl {
        value: raw.to_string(),
        source,
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(SettingsError::UnsupportedScheme(raw.to_string()));
    }
    Ok(normalize_base_url(url))
}

pub fn normalize_base_url(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url.set_query(None);
    url.set_fragment(None);
    url
}
