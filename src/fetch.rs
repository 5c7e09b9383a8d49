use std::time::Duration;

use thiserror::Error;

use crate::schedule::model::parse_schedule_text;
use crate::schedule::{ScheduleError, ScheduleSnapshot};

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to build HTTP client: {0}")]
    Client(reqwest::Error),
    #[error("schedule request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("schedule endpoint returned HTTP {0}")]
    Status(reqwest::StatusCode),
    #[error(transparent)]
    Schedule(#[from] ScheduleError),
}

/// Blocking client for the schedule endpoint. Cheap to clone; clones share
/// the underlying connection pool.
#[derive(Debug, Clone)]
pub struct ScheduleClient {
    url: String,
    client: reqwest::blocking::Client,
}

impl ScheduleClient {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(FetchError::Client)?;
        Ok(Self {
            url: url.into(),
            client,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// One GET against the schedule endpoint. Any non-success status counts
    /// as a failed cycle; the caller keeps its previous snapshot.
    pub fn fetch(&self) -> Result<ScheduleSnapshot, FetchError> {
        let response = self.client.get(&self.url).send()?;
        if !response.status().is_success() {
            return Err(FetchError::Status(response.status()));
        }
        let body = response.text()?;
        Ok(parse_schedule_text(&body)?)
    }
}
