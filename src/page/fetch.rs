// src/page/fetch.rs
// =============================================================================
// This module downloads one page and parses it into an HTML document.
//
// How it works:
// 1. Send a plain GET request (no custom headers, no auth, no cookies)
// 2. Anything other than exactly 200 OK is an error
// 3. Read the body and hand it to scraper's HTML parser
//
// Every failure is reported as a FetchError. The crawler logs it and moves
// on; a single bad page never stops the wave.
//
// The reqwest::Response is owned by this function, so the connection is
// released when it goes out of scope on every return path (including `?`).
// =============================================================================

use reqwest::{Client, StatusCode};
use scraper::Html;
use std::time::Duration;
use thiserror::Error;

use super::NormalizedUrl;

/// Why a single page could not be crawled.
#[derive(Debug, Error)]
pub enum FetchError {
    /// DNS failure, refused connection, TLS failure, ...
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),
    /// The request or the body download ran past the configured deadline
    #[error("request timed out")]
    Timeout,
    /// The server answered, but not with 200 OK
    #[error("unexpected HTTP status {0}")]
    Status(StatusCode),
    /// The body could not be read into a document
    #[error("failed to read response body: {0}")]
    Body(#[source] reqwest::Error),
}

impl FetchError {
    fn from_transport(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            FetchError::Timeout
        } else {
            FetchError::Transport(error)
        }
    }

    fn from_body(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            FetchError::Timeout
        } else {
            FetchError::Body(error)
        }
    }
}

// Wraps a reqwest Client. Cloning is cheap (the client is reference counted
// internally), so every crawl task gets its own handle to the same pool.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    // timeout: per-request deadline covering connect, headers and body.
    // None means a slow server can hold its task (and the wave) forever.
    pub fn new(timeout: Option<Duration>) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
        })
    }

    pub async fn fetch(&self, url: &NormalizedUrl) -> Result<Html, FetchError> {
        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .map_err(FetchError::from_transport)?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchError::Status(status));
        }

        let body = response.text().await.map_err(FetchError::from_body)?;
        Ok(Html::parse_document(&body))
    }
}
