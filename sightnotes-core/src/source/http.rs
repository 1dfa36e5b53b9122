use std::time::Duration;

use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;

use super::NoteSource;
use crate::error::SourceError;
use crate::types::{LatestResponse, NotesResponse, SessionSummary};

/// Where the capture process's API server listens by default.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5001/api";

/// Upper bound on a single request so a hung server cannot pile up poll tasks.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// [`NoteSource`] backed by the capture process's JSON API.
///
/// Endpoints are resolved relative to the injected base URL:
/// `{base}/latest`, `{base}/sessions`, `{base}/notes/{filename}`.
#[derive(Debug, Clone)]
pub struct HttpSource {
    base: Url,
    client: reqwest::Client,
}

impl HttpSource {
    /// Builds a source for `base_url`.
    ///
    /// # Errors
    ///
    /// `InvalidBaseUrl` if the URL does not parse or cannot carry a path;
    /// `Transport` if the HTTP client cannot be constructed.
    pub fn new(base_url: &str) -> Result<Self, SourceError> {
        let base = Url::parse(base_url).map_err(|e| SourceError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;
        if base.cannot_be_a_base() {
            return Err(SourceError::InvalidBaseUrl {
                url: base_url.to_owned(),
                reason: "url cannot carry a path".to_owned(),
            });
        }
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { base, client })
    }

    /// Appends `segments` to the base path, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, SourceError> {
        tracing::trace!(%url, "GET");
        let resp = self.client.get(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(SourceError::Status(status.as_u16()));
        }
        resp.json::<T>().await.map_err(|e| {
            if e.is_decode() {
                SourceError::Decode(e.to_string())
            } else {
                SourceError::Transport(e)
            }
        })
    }
}

#[async_trait]
impl NoteSource for HttpSource {
    async fn latest(&self) -> Result<LatestResponse, SourceError> {
        match self.get_json(self.endpoint(&["latest"])).await {
            Err(SourceError::Status(code)) if code == StatusCode::NOT_FOUND.as_u16() => {
                Err(SourceError::NotReady)
            }
            other => other,
        }
    }

    async fn sessions(&self) -> Result<Vec<SessionSummary>, SourceError> {
        self.get_json(self.endpoint(&["sessions"])).await
    }

    async fn session(&self, filename: &str) -> Result<NotesResponse, SourceError> {
        self.get_json(self.endpoint(&["notes", filename])).await
    }
}
