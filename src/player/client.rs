//! Status document retrieval

use crate::error::PollError;
use anyhow::{Context, Result};
use reqwest::blocking::Client;
use reqwest::StatusCode;

/// Text VLC's web interface puts in the body when the password is wrong
pub const AUTH_FAILURE_MARKER: &str = "401 Client error";

/// Source of raw status documents - allows swapping the HTTP client for canned responses
pub trait StatusSource {
    /// Fetch the current status document body
    fn fetch(&self) -> Result<String, PollError>;
}

/// Fetches status.xml from the VLC web interface with HTTP basic auth
pub struct HttpStatusSource {
    client: Client,
    endpoint: String,
    password: String,
}

impl HttpStatusSource {
    /// Create a source for the given endpoint; the user name is always empty
    pub fn new(endpoint: impl Into<String>, password: impl Into<String>) -> Result<Self> {
        // The player sits on this machine or the LAN; never route it through a proxy
        let client = Client::builder()
            .no_proxy()
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            password: password.into(),
        })
    }

    fn connection_error(&self, err: reqwest::Error) -> PollError {
        PollError::Connection {
            url: self.endpoint.clone(),
            reason: err.to_string(),
        }
    }
}

impl StatusSource for HttpStatusSource {
    fn fetch(&self) -> Result<String, PollError> {
        let response = self
            .client
            .get(&self.endpoint)
            .basic_auth("", Some(&self.password))
            .send()
            .map_err(|e| self.connection_error(e))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(PollError::Auth);
        }

        let bytes = response.bytes().map_err(|e| self.connection_error(e))?;
        let body = String::from_utf8_lossy(&bytes).into_owned();

        if body.contains(AUTH_FAILURE_MARKER) {
            return Err(PollError::Auth);
        }
        if !status.is_success() {
            return Err(PollError::Status(status.as_u16()));
        }

        log::debug!("Fetched {} bytes from {}", body.len(), self.endpoint);
        Ok(body)
    }
}
