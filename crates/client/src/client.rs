use regulus_core::config::ApiConfig;
use regulus_core::{PageNumberPolicy, QueryParams};
use reqwest::Url;
use serde_json::Value;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::error::ClientError;
use crate::outcome::ApiOutcome;
use crate::transport::{ApiRequest, RawResponse, ReqwestTransport, Transport};

/// Client for the Regulations.gov v4 API.
///
/// Stateless apart from its configuration: every call issues exactly one GET,
/// nothing is cached or retried.
#[derive(Clone, Debug)]
pub struct RegulationsClient<T = ReqwestTransport> {
    transport: T,
    base_url: Url,
    page_number_policy: PageNumberPolicy,
}

impl RegulationsClient<ReqwestTransport> {
    pub fn from_config(config: &ApiConfig) -> Result<Self, ClientError> {
        let transport = ReqwestTransport::new(&config.api_key)?;
        Ok(Self::new(transport, &config.base_url)?
            .with_page_number_policy(config.page_number_policy))
    }
}

impl<T: Transport> RegulationsClient<T> {
    pub fn new(transport: T, base_url: &str) -> Result<Self, ClientError> {
        let base_url = Url::parse(base_url.trim())
            .map_err(|error| ClientError::Url(format!("`{base_url}`: {error}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::Url(format!("`{base_url}` cannot be used as a base url")));
        }

        Ok(Self { transport, base_url, page_number_policy: PageNumberPolicy::default() })
    }

    pub fn with_page_number_policy(mut self, policy: PageNumberPolicy) -> Self {
        self.page_number_policy = policy;
        self
    }

    pub fn page_number_policy(&self) -> PageNumberPolicy {
        self.page_number_policy
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Base URL with `segments` appended, each one percent-encoded.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ClientError::Url(format!("`{}` cannot be a base", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Issues one GET and classifies the response.
    pub async fn get(
        &self,
        segments: &[&str],
        query: QueryParams,
    ) -> Result<ApiOutcome, ClientError> {
        let correlation_id = Uuid::new_v4();
        let request = ApiRequest { url: self.endpoint(segments)?, query };

        info!(
            event_name = "api.request.sent",
            correlation_id = %correlation_id,
            method = "GET",
            url = %request.url,
            params = %request.query,
            "calling regulations.gov"
        );

        let response = match self.transport.get(&request).await {
            Ok(response) => response,
            Err(failure) => {
                error!(
                    event_name = "api.request.failed",
                    correlation_id = %correlation_id,
                    url = %request.url,
                    error = %failure,
                    "request did not complete"
                );
                return Err(failure);
            }
        };

        classify(response, &request, correlation_id)
    }
}

fn classify(
    response: RawResponse,
    request: &ApiRequest,
    correlation_id: Uuid,
) -> Result<ApiOutcome, ClientError> {
    let RawResponse { status, body } = response;

    match status {
        200..=299 => {
            debug!(
                event_name = "api.response.ok",
                correlation_id = %correlation_id,
                status,
                bytes = body.len(),
                "regulations.gov responded"
            );
            serde_json::from_str::<Value>(&body)
                .map(ApiOutcome::Ok)
                .map_err(|error| ClientError::Decode(error.to_string()))
        }
        404 => {
            warn!(
                event_name = "api.response.not_found",
                correlation_id = %correlation_id,
                url = %request.url,
                "resource not found"
            );
            Ok(ApiOutcome::NotFound)
        }
        500 => {
            error!(
                event_name = "api.response.server_error",
                correlation_id = %correlation_id,
                url = %request.url,
                body = %body,
                "regulations.gov server error"
            );
            Ok(ApiOutcome::UpstreamError { status, body })
        }
        _ => {
            error!(
                event_name = "api.response.http_error",
                correlation_id = %correlation_id,
                url = %request.url,
                status,
                body = %body,
                "regulations.gov rejected the request"
            );
            Err(ClientError::Http { status, body })
        }
    }
}
