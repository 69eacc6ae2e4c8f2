//! # API Client
//!
//! A small blocking HTTP client for the grading service. Lesson endpoints live here and
//! are exposed through the [`LessonApi`] trait so the submission workflow can be driven
//! by a fake in tests; lab endpoints live in [`lab`].

pub mod lab;

use crate::constants::{EXIT_PROTOCOL, EXIT_UNAVAILABLE};
use crate::models::{Lesson, SubmissionBatch};
use lazy_static::lazy_static;
use regex::Regex;
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use thiserror::Error;

lazy_static! {
    // Lesson and lab tokens are CUIDs: a leading 'c' and at least six more ASCII
    // alphanumerics. Tokens end up in URL paths, so nothing else is accepted.
    static ref TOKEN_RE: Regex = Regex::new(r"^c[0-9A-Za-z]{6,}$").expect("valid token regex");
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Transport(#[source] reqwest::Error),
    /// Non-2xx answer. Displays the server's body verbatim.
    #[error("{}", api_message(.status, .body))]
    Api { status: u16, body: String },
    #[error("Unexpected response from '{url}': {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

fn api_message(status: &u16, body: &str) -> String {
    if body.trim().is_empty() {
        format!("HTTP status {}", status)
    } else {
        body.to_string()
    }
}

impl ApiError {
    /// Process exit code for this failure class.
    pub fn exit_code(&self) -> i32 {
        match self {
            ApiError::Transport(_) | ApiError::Client(_) => EXIT_UNAVAILABLE,
            ApiError::Api { .. } | ApiError::Decode { .. } => EXIT_PROTOCOL,
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// The lesson endpoints the submission workflow depends on.
pub trait LessonApi {
    fn get_lesson(&self, token: &str) -> ApiResult<Lesson>;
    fn reset_lesson(&self, token: &str) -> ApiResult<Lesson>;
    fn submit_lesson(&self, token: &str, batch: &SubmissionBatch) -> ApiResult<Lesson>;
}

/// Blocking client bound to one API base URL.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> ApiResult<Self> {
        let client = Client::builder()
            .user_agent(concat!("mtc/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ApiError::Client)?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Joins an endpoint path (starting with `/`) onto the base URL.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Sends a request and decodes a 2xx JSON body into `T`.
    fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder, url: &str) -> ApiResult<T> {
        let response = self.send(request, url)?;
        let body = response.text().map_err(ApiError::Transport)?;
        serde_json::from_str(&body).map_err(|e| ApiError::Decode {
            url: url.to_string(),
            source: e,
        })
    }

    /// Sends a request and turns non-2xx answers into `ApiError::Api`.
    fn send(&self, request: RequestBuilder, url: &str) -> ApiResult<Response> {
        log::debug!("HTTP request to '{}'.", url);
        let response = request.send().map_err(ApiError::Transport)?;
        let status = response.status();
        log::debug!("HTTP {} from '{}'.", status, url);
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ApiError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

impl LessonApi for ApiClient {
    fn get_lesson(&self, token: &str) -> ApiResult<Lesson> {
        let url = self.url(&format!("/lessons/{}", token));
        self.send_json(self.client.get(&url), &url)
    }

    fn reset_lesson(&self, token: &str) -> ApiResult<Lesson> {
        let url = self.url(&format!("/lessons/{}/reset", token));
        self.send_json(self.client.post(&url), &url)
    }

    fn submit_lesson(&self, token: &str, batch: &SubmissionBatch) -> ApiResult<Lesson> {
        let url = self.url(&format!("/lessons/{}/submit", token));
        log::debug!("Submitting {} command result(s).", batch.results().len());
        self.send_json(self.client.post(&url).json(batch), &url)
    }
}

/// Whether `token` looks like a lesson/lab token (CUID).
pub fn is_valid_token(token: &str) -> bool {
    TOKEN_RE.is_match(token)
}
