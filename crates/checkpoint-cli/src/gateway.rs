//! Typed wrapper over the registry's HTTP surface.
//!
//! Every call is one request: no retries, no caching, no client timeout.

use crate::types::{CreatePromoteRequest, CreateReview, Model, ModelVersion, PromoteRequest, RequestDetails, UserInfo};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

pub const API_PREFIX: &str = "/checkpoint/api";
pub const USER_INFO_PATH: &str = "/oauth2/userinfo";

#[derive(thiserror::Error, Debug)]
pub enum GatewayError {
    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("status {status}: {body}")]
    Status { status: u16, status_text: String, body: String },
    #[error("invalid response body: {0}")]
    Decode(#[source] reqwest::Error),
    #[error("unauthorized")]
    Unauthorized,
}

impl GatewayError {
    /// Alert text shown when the registry rejects a write.
    pub fn submit_message(&self) -> Option<String> {
        match self {
            Self::Status { status, status_text, body } => Some(format!("Error submitting request ({status}: {status_text}): {body}")),
            _ => None,
        }
    }
}

pub type GatewayResult<T> = Result<T, GatewayError>;

#[derive(Debug, Clone)]
pub struct Gateway { client: Client, base: String }

impl Gateway {
    pub fn new(base: impl Into<String>) -> Self { Self::with_client(Client::new(), base) }

    pub fn with_client(client: Client, base: impl Into<String>) -> Self {
        let base = base.into().trim_end_matches('/').to_string();
        Self { client, base }
    }

    pub fn base(&self) -> &str { &self.base }

    fn api_url(&self, path: &str) -> String { format!("{}{API_PREFIX}{path}", self.base) }

    pub async fn list_models(&self) -> GatewayResult<Vec<Model>> { self.get_json(self.api_url("/models")).await }

    pub async fn list_versions(&self, model: &str) -> GatewayResult<Vec<ModelVersion>> {
        self.get_json(self.api_url(&format!("/models/{}/versions", urlencoding::encode(model)))).await
    }

    pub async fn list_stages(&self) -> GatewayResult<Vec<String>> { self.get_json(self.api_url("/stages")).await }

    pub async fn list_requests(&self) -> GatewayResult<Vec<PromoteRequest>> { self.get_json(self.api_url("/requests")).await }

    pub async fn request_details(&self, id: i64) -> GatewayResult<RequestDetails> {
        self.get_json(self.api_url(&format!("/requests/{id}/details"))).await
    }

    pub async fn create_request(&self, request: &CreatePromoteRequest) -> GatewayResult<PromoteRequest> {
        let url = self.api_url("/requests");
        debug!(event = "gateway.request", method = "POST", %url);
        let resp = self.client.post(&url).json(request).send().await.map_err(GatewayError::Transport)?;
        let resp = check_status(resp).await?;
        resp.json().await.map_err(GatewayError::Decode)
    }

    pub async fn submit_review(&self, id: i64, review: &CreateReview) -> GatewayResult<()> {
        let url = self.api_url(&format!("/requests/{id}"));
        debug!(event = "gateway.request", method = "PUT", %url);
        let resp = self.client.put(&url).json(review).send().await.map_err(GatewayError::Transport)?;
        check_status(resp).await.map(|_| ())
    }

    pub async fn user_info(&self) -> GatewayResult<UserInfo> {
        let url = format!("{}{USER_INFO_PATH}", self.base);
        debug!(event = "gateway.request", method = "GET", %url);
        let resp = self.client.get(&url).send().await.map_err(GatewayError::Transport)?;
        if resp.status() == StatusCode::UNAUTHORIZED { return Err(GatewayError::Unauthorized); }
        check_status(resp).await?.json().await.map_err(GatewayError::Decode)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: String) -> GatewayResult<T> {
        debug!(event = "gateway.request", method = "GET", %url);
        let resp = self.client.get(&url).send().await.map_err(GatewayError::Transport)?;
        check_status(resp).await?.json().await.map_err(GatewayError::Decode)
    }
}

async fn check_status(resp: Response) -> GatewayResult<Response> {
    let status = resp.status();
    debug!(event = "gateway.response", status = status.as_u16());
    if status.is_success() { return Ok(resp); }
    let status_text = status.canonical_reason().unwrap_or("").to_string();
    let body = resp.text().await.unwrap_or_default();
    Err(GatewayError::Status { status: status.as_u16(), status_text, body })
}
