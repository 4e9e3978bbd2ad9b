use crate::config::{ClientConfig, RequestControl};
use crate::traits::MatchingService;
use crate::{
    ClientError, Locations, Profile, RecommendationResult, SectorsResponse, SkillsResponse, Stats,
};
use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::future::Future;
use std::time::Duration;
use tracing::debug;
use url::Url;

pub const SECTORS_ENDPOINT: &str = "/api/sectors";
pub const SKILLS_ENDPOINT: &str = "/api/skills";
pub const LOCATIONS_ENDPOINT: &str = "/api/locations";
pub const STATS_ENDPOINT: &str = "/api/stats";
pub const RECOMMEND_ENDPOINT: &str = "/api/recommend";
pub const HEALTH_ENDPOINT: &str = "/health";
pub const ROOT_ENDPOINT: &str = "/";

/// HTTP client for the matching service. Every call is a single attempt;
/// callers decide whether a failure is surfaced or replaced by a default.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    request_timeout: Option<Duration>,
}

impl ApiClient {
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        Url::parse(&config.base_url)?;

        let mut builder = Client::builder().connect_timeout(config.connect_timeout);
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|error| ClientError::Network(error.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            request_timeout: config.request_timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint_url(&self, endpoint: &str) -> Result<Url, ClientError> {
        Ok(Url::parse(&format!("{}{}", self.base_url, endpoint))?)
    }

    pub async fn fetch_json<T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<Value>,
    ) -> Result<T, ClientError> {
        let url = self.endpoint_url(endpoint)?;
        let mut request = self.client.request(method.clone(), url.clone());
        if let Some(body) = body {
            request = request.json(&body);
        }

        let outcome = async {
            let response = request.send().await.map_err(|error| self.transport_error(error))?;
            let status = response.status();
            let bytes = response
                .bytes()
                .await
                .map_err(|error| self.transport_error(error))?;

            if !status.is_success() {
                return Err(http_error(status, &bytes));
            }

            Ok::<T, ClientError>(serde_json::from_slice::<T>(&bytes)?)
        }
        .await;

        if let Err(error) = &outcome {
            debug!(%method, url = %url, %error, "api request failed");
        }
        outcome
    }

    pub async fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ClientError> {
        self.fetch_json(Method::GET, endpoint, None).await
    }

    pub async fn health(&self) -> Result<Value, ClientError> {
        self.get_json(HEALTH_ENDPOINT).await
    }

    pub async fn test_connection(&self) -> Result<Value, ClientError> {
        self.get_json(ROOT_ENDPOINT).await
    }

    /// Only the configured request deadline counts as an abandoned search;
    /// connect timeouts are network failures.
    fn transport_error(&self, error: reqwest::Error) -> ClientError {
        match self.request_timeout {
            Some(limit) if error.is_timeout() => ClientError::Timeout(limit),
            _ => ClientError::from(error),
        }
    }
}

#[async_trait]
impl MatchingService for ApiClient {
    async fn sectors(&self) -> Result<SectorsResponse, ClientError> {
        self.get_json(SECTORS_ENDPOINT).await
    }

    async fn skills(&self) -> Result<SkillsResponse, ClientError> {
        self.get_json(SKILLS_ENDPOINT).await
    }

    async fn locations(&self) -> Result<Locations, ClientError> {
        self.get_json(LOCATIONS_ENDPOINT).await
    }

    async fn stats(&self) -> Result<Stats, ClientError> {
        self.get_json(STATS_ENDPOINT).await
    }

    async fn recommend(
        &self,
        profile: &Profile,
    ) -> Result<Vec<RecommendationResult>, ClientError> {
        let body = serde_json::to_value(profile)?;
        self.fetch_json(Method::POST, RECOMMEND_ENDPOINT, Some(body))
            .await
    }
}

/// Builds the error for a non-success response, preferring the `detail`
/// string of a JSON error body.
pub fn http_error(status: StatusCode, body: &[u8]) -> ClientError {
    let detail = serde_json::from_slice::<Value>(body)
        .ok()
        .and_then(|parsed| {
            parsed
                .get("detail")
                .and_then(Value::as_str)
                .map(ToOwned::to_owned)
        })
        .filter(|detail| !detail.trim().is_empty())
        .unwrap_or_else(|| format!("HTTP error! status: {}", status.as_u16()));

    ClientError::Http {
        status: status.as_u16(),
        detail,
    }
}

/// Runs `future` under the limits in `control`. Cancellation wins over a
/// result that becomes ready in the same poll.
pub async fn bounded<F, T>(future: F, control: &RequestControl) -> Result<T, ClientError>
where
    F: Future<Output = Result<T, ClientError>>,
{
    let cancel = control.cancel.clone().unwrap_or_default();

    match control.timeout {
        Some(limit) => tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(ClientError::Cancelled),
            result = tokio::time::timeout(limit, future) => {
                result.unwrap_or(Err(ClientError::Timeout(limit)))
            }
        },
        None => tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(ClientError::Cancelled),
            result = future => result,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_util::sync::CancellationToken;

    #[test]
    fn http_error_prefers_detail_field() {
        let error = http_error(StatusCode::INTERNAL_SERVER_ERROR, br#"{"detail":"db down"}"#);
        assert_eq!(error.to_string(), "db down");
        assert_eq!(error.status(), Some(500));
    }

    #[test]
    fn http_error_falls_back_to_status_message() {
        let error = http_error(StatusCode::BAD_GATEWAY, b"<html>bad gateway</html>");
        assert_eq!(error.to_string(), "HTTP error! status: 502");

        let structured = http_error(
            StatusCode::UNPROCESSABLE_ENTITY,
            br#"{"detail":[{"msg":"field required"}]}"#,
        );
        assert_eq!(structured.to_string(), "HTTP error! status: 422");
    }

    #[test]
    fn rejects_malformed_base_url() {
        let result = ApiClient::new(&ClientConfig::with_base_url("not a url"));
        assert!(matches!(result, Err(ClientError::Url(_))));
    }

    #[test]
    fn trailing_slash_is_trimmed_from_base_url() -> Result<(), Box<dyn std::error::Error>> {
        let client = ApiClient::new(&ClientConfig::with_base_url("http://localhost:8000/"))?;
        assert_eq!(
            client.endpoint_url(SKILLS_ENDPOINT)?.as_str(),
            "http://localhost:8000/api/skills"
        );
        Ok(())
    }

    #[tokio::test]
    async fn transport_timeout_without_request_deadline_is_network_error(
    ) -> Result<(), Box<dyn std::error::Error>> {
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(HEALTH_ENDPOINT))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(300)))
            .mount(&server)
            .await;
        let client = ApiClient::new(&ClientConfig::with_base_url(server.uri()))?;

        let error = client
            .client
            .get(client.endpoint_url(HEALTH_ENDPOINT)?)
            .timeout(Duration::from_millis(20))
            .send()
            .await
            .expect_err("transport timeout");
        assert!(error.is_timeout());

        let classified = client.transport_error(error);
        assert!(matches!(classified, ClientError::Network(_)));
        assert!(!classified.is_abandoned());
        Ok(())
    }

    #[tokio::test]
    async fn bounded_passes_through_ready_result() {
        let result = bounded(async { Ok::<_, ClientError>(3) }, &RequestControl::default()).await;
        assert_eq!(result.ok(), Some(3));
    }

    #[tokio::test]
    async fn bounded_reports_timeout() {
        let control = RequestControl::with_timeout(Duration::from_millis(10));
        let result = bounded(
            async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok::<_, ClientError>(())
            },
            &control,
        )
        .await;
        assert!(matches!(result, Err(ClientError::Timeout(limit)) if limit == Duration::from_millis(10)));
    }

    #[tokio::test]
    async fn bounded_reports_cancellation() {
        let token = CancellationToken::new();
        token.cancel();
        let control = RequestControl {
            timeout: None,
            cancel: Some(token),
        };
        let result = bounded(async { Ok::<_, ClientError>(1) }, &control).await;
        assert!(matches!(result, Err(ClientError::Cancelled)));
    }
}
