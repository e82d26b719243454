//! Access to the configuration store that owns the templates document.

use crate::stats::StatsReport;
use crate::{BackendError, codec, statics};
use log::{debug, error, info};
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, time::Duration};

/// Where the console loads templates from and deploys them to.
///
/// Implementations are called from worker threads, never from the UI thread.
pub trait TemplateBackend: Send + Sync {
    fn fetch_raw(&self) -> Result<String, BackendError>;

    fn save_raw(&self, raw: &str) -> Result<(), BackendError>;

    fn fetch_stats(&self) -> Result<StatsReport, BackendError>;

    /// Human readable location, shown in the status bar.
    fn describe(&self) -> String;
}

/// Body of `templates/raw` in both directions.
#[derive(Debug, Serialize, Deserialize)]
struct RawTemplates {
    raw: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

pub struct HttpBackend {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl HttpBackend {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, BackendError> {
        let mut builder = reqwest::blocking::Client::builder().user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| BackendError::Transport {
            url: base_url.to_string(),
            message: e.to_string(),
        })?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{endpoint}", self.base_url)
    }

    fn send(
        &self,
        url: &str,
        request: reqwest::blocking::RequestBuilder,
    ) -> Result<reqwest::blocking::Response, BackendError> {
        let response = request.send().map_err(|e| {
            error!("request to {url} failed: {e}");
            BackendError::Transport {
                url: url.to_string(),
                message: e.to_string(),
            }
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        // Prefer the server's own `{ error }` message over the bare status line.
        let body = response.text().unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .map(|b| b.error)
            .unwrap_or_else(|_| {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            });
        Err(BackendError::Rejected {
            status: status.as_u16(),
            message,
        })
    }

    fn decode<T: serde::de::DeserializeOwned>(
        url: &str,
        response: reqwest::blocking::Response,
    ) -> Result<T, BackendError> {
        response.json::<T>().map_err(|e| BackendError::Decode {
            url: url.to_string(),
            message: e.to_string(),
        })
    }
}

impl TemplateBackend for HttpBackend {
    fn fetch_raw(&self) -> Result<String, BackendError> {
        let url = self.url(statics::API_TEMPLATES_RAW);
        debug!("GET {url}");
        let response = self.send(&url, self.client.get(&url))?;
        let body: RawTemplates = Self::decode(&url, response)?;
        info!("loaded templates from {url} ({} bytes)", body.raw.len());
        Ok(body.raw)
    }

    fn save_raw(&self, raw: &str) -> Result<(), BackendError> {
        let url = self.url(statics::API_TEMPLATES_RAW);
        debug!("POST {url}");
        let body = RawTemplates {
            raw: raw.to_string(),
        };
        self.send(&url, self.client.post(&url).json(&body))?;
        Ok(())
    }

    fn fetch_stats(&self) -> Result<StatsReport, BackendError> {
        let url = self.url(statics::API_TEMPLATES_STATS);
        debug!("GET {url}");
        let response = self.send(&url, self.client.get(&url))?;
        Self::decode(&url, response)
    }

    fn describe(&self) -> String {
        self.base_url.clone()
    }
}

/// Templates kept in a local JSON file, for working without a running server.
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn io_error(&self, e: std::io::Error) -> BackendError {
        BackendError::Io {
            path: self.path.display().to_string(),
            message: e.to_string(),
        }
    }
}

impl TemplateBackend for FileBackend {
    fn fetch_raw(&self) -> Result<String, BackendError> {
        let raw = fs::read_to_string(&self.path).map_err(|e| self.io_error(e))?;
        info!("loaded templates from {}", self.path.display());
        Ok(raw)
    }

    fn save_raw(&self, raw: &str) -> Result<(), BackendError> {
        // Same gate as the server: malformed documents never reach storage.
        codec::parse(raw).map_err(|e| BackendError::Rejected {
            status: 400,
            message: e.to_string(),
        })?;
        fs::write(&self.path, raw).map_err(|e| self.io_error(e))?;
        info!("saved templates to {}", self.path.display());
        Ok(())
    }

    fn fetch_stats(&self) -> Result<StatsReport, BackendError> {
        let raw = self.fetch_raw()?;
        let doc = codec::parse(&raw).map_err(|e| BackendError::Decode {
            url: self.path.display().to_string(),
            message: e.to_string(),
        })?;
        Ok(StatsReport::of(&doc))
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
