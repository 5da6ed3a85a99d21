use async_trait::async_trait;
use regulus_core::QueryParams;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::Url;
use secrecy::{ExposeSecret, SecretString};

use crate::error::ClientError;

pub const API_KEY_HEADER: &str = "X-Api-Key";
pub const JSON_API_CONTENT_TYPE: &str = "application/vnd.api+json";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiRequest {
    pub url: Url,
    pub query: QueryParams,
}

/// Status and body of a completed exchange, before classification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, request: &ApiRequest) -> Result<RawResponse, ClientError>;
}

/// Production transport. Every request carries the API key and JSON:API content type.
#[derive(Clone, Debug)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(api_key: &SecretString) -> Result<Self, ClientError> {
        let mut key = HeaderValue::from_str(api_key.expose_secret().trim())
            .map_err(|_| ClientError::Transport("api key is not a valid header value".to_string()))?;
        key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(API_KEY_HEADER, key);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_API_CONTENT_TYPE));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|error| ClientError::Transport(error.to_string()))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get(&self, request: &ApiRequest) -> Result<RawResponse, ClientError> {
        let response = self
            .client
            .get(request.url.clone())
            .query(request.query.pairs())
            .send()
            .await
            .map_err(|error| ClientError::Transport(error.to_string()))?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|error| ClientError::Transport(error.to_string()))?;

        Ok(RawResponse { status, body })
    }
}
