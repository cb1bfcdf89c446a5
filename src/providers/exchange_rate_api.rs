use crate::core::currency::RateProvider;
use crate::core::error::RefreshError;
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, instrument};

/// Client for the exchangerate-api.com v6 "latest" endpoint.
pub struct ExchangeRateApiProvider {
    base_url: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl ExchangeRateApiProvider {
    pub fn new(
        base_url: &str,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, RefreshError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("kyat/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| RefreshError::TransportFailure(e.to_string()))?;

        Ok(ExchangeRateApiProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            client,
        })
    }
}

#[derive(Debug, Deserialize)]
struct LatestRatesResponse {
    result: String,
    conversion_rates: Option<HashMap<String, f64>>,
    #[serde(rename = "error-type")]
    error_type: Option<String>,
    error: Option<String>,
}

impl LatestRatesResponse {
    fn into_rates(self) -> Result<HashMap<String, f64>, RefreshError> {
        match self.result.as_str() {
            "success" => self.conversion_rates.ok_or_else(|| {
                RefreshError::MalformedResponse("missing conversion_rates".to_string())
            }),
            "error" => Err(RefreshError::ProviderError(
                self.error_type
                    .or(self.error)
                    .unwrap_or_else(|| "unknown error".to_string()),
            )),
            other => Err(RefreshError::MalformedResponse(format!(
                "unexpected result: {other}"
            ))),
        }
    }
}

#[async_trait]
impl RateProvider for ExchangeRateApiProvider {
    #[instrument(
        name = "ExchangeRateApiFetch",
        skip(self),
        fields(base = %base, has_api_key = self.api_key.is_some())
    )]
    async fn fetch_rates(&self, base: &str) -> Result<HashMap<String, f64>, RefreshError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(RefreshError::MissingCredential)?;

        let url = format!("{}/v6/{}/latest/{}", self.base_url, api_key, base);
        debug!("Requesting latest rates from {}/v6/***/latest/{}", self.base_url, base);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| RefreshError::TransportFailure(e.without_url().to_string()))?;

        let status = response.status();
        debug!(%status, "Received rate provider response");

        let text = response
            .text()
            .await
            .map_err(|e| RefreshError::TransportFailure(e.without_url().to_string()))?;

        match serde_json::from_str::<LatestRatesResponse>(&text) {
            Ok(data) => data.into_rates(),
            Err(_) if !status.is_success() => {
                Err(RefreshError::ProviderError(format!("HTTP {status}")))
            }
            Err(e) => Err(RefreshError::MalformedResponse(format!(
                "failed to parse JSON response: {e}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const API_KEY: &str = "test-key";
    const LATEST_PATH: &str = "/v6/test-key/latest/MMK";

    async fn create_mock_server(status: u16, mock_response: &str) -> MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(LATEST_PATH))
            .respond_with(ResponseTemplate::new(status).set_body_string(mock_response))
            .mount(&mock_server)
            .await;

        mock_server
    }

    fn provider(base_url: &str, api_key: Option<&str>) -> ExchangeRateApiProvider {
        ExchangeRateApiProvider::new(
            base_url,
            api_key.map(str::to_string),
            Duration::from_secs(5),
        )
        .expect("Failed to build provider")
    }

    #[tokio::test]
    async fn test_successful_rates_fetch() {
        let mock_response = r#"{
            "result": "success",
            "base_code": "MMK",
            "conversion_rates": {
                "MMK": 1,
                "CNY": 0.0034,
                "USD": 0.00048
            }
        }"#;
        let mock_server = create_mock_server(200, mock_response).await;

        let rates = provider(&mock_server.uri(), Some(API_KEY))
            .fetch_rates("MMK")
            .await
            .expect("Failed to fetch rates");

        assert_eq!(rates.len(), 3);
        assert_eq!(rates["CNY"], 0.0034);
        assert_eq!(rates["USD"], 0.00048);
    }

    #[tokio::test]
    async fn test_trailing_slash_in_base_url() {
        let mock_response = r#"{"result": "success", "conversion_rates": {"USD": 0.00048}}"#;
        let mock_server = create_mock_server(200, mock_response).await;

        let base_url = format!("{}/", mock_server.uri());
        let rates = provider(&base_url, Some(API_KEY))
            .fetch_rates("MMK")
            .await
            .unwrap();
        assert_eq!(rates["USD"], 0.00048);
    }

    #[tokio::test]
    async fn test_missing_credential_makes_no_request() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock_server)
            .await;

        for key in [None, Some(""), Some("   ")] {
            let result = provider(&mock_server.uri(), key).fetch_rates("MMK").await;
            assert_eq!(result, Err(RefreshError::MissingCredential));
        }
    }

    #[tokio::test]
    async fn test_provider_reported_error() {
        let mock_response = r#"{"result": "error", "error-type": "invalid-key"}"#;
        let mock_server = create_mock_server(403, mock_response).await;

        let result = provider(&mock_server.uri(), Some(API_KEY))
            .fetch_rates("MMK")
            .await;
        assert_eq!(
            result,
            Err(RefreshError::ProviderError("invalid-key".to_string()))
        );
    }

    #[tokio::test]
    async fn test_provider_error_fallback_and_default() {
        let mock_server = create_mock_server(200, r#"{"result": "error", "error": "quota-reached"}"#).await;
        let result = provider(&mock_server.uri(), Some(API_KEY))
            .fetch_rates("MMK")
            .await;
        assert_eq!(
            result,
            Err(RefreshError::ProviderError("quota-reached".to_string()))
        );

        let mock_server = create_mock_server(200, r#"{"result": "error"}"#).await;
        let result = provider(&mock_server.uri(), Some(API_KEY))
            .fetch_rates("MMK")
            .await;
        assert_eq!(
            result,
            Err(RefreshError::ProviderError("unknown error".to_string()))
        );
    }

    #[tokio::test]
    async fn test_error_type_wins_when_both_error_keys_present() {
        let mock_response = r#"{"result": "error", "error": "x", "error-type": "invalid-key"}"#;
        let mock_server = create_mock_server(403, mock_response).await;

        let result = provider(&mock_server.uri(), Some(API_KEY))
            .fetch_rates("MMK")
            .await;
        assert_eq!(
            result,
            Err(RefreshError::ProviderError("invalid-key".to_string()))
        );
    }

    #[tokio::test]
    async fn test_http_error_without_json_body() {
        let mock_server = create_mock_server(500, "Internal Server Error").await;

        let result = provider(&mock_server.uri(), Some(API_KEY))
            .fetch_rates("MMK")
            .await;
        assert_eq!(
            result,
            Err(RefreshError::ProviderError(
                "HTTP 500 Internal Server Error".to_string()
            ))
        );
    }

    #[tokio::test]
    async fn test_malformed_responses() {
        let cases = [
            "not json at all",
            r#"{"conversion_rates": {"USD": 0.00048}}"#,
            r#"{"result": "success"}"#,
            r#"{"result": "pending", "conversion_rates": {}}"#,
            r#"{"result": "success", "conversion_rates": {"USD": "cheap"}}"#,
        ];

        for body in cases {
            let mock_server = create_mock_server(200, body).await;
            let result = provider(&mock_server.uri(), Some(API_KEY))
                .fetch_rates("MMK")
                .await;
            assert!(
                matches!(result, Err(RefreshError::MalformedResponse(_))),
                "expected malformed response for {body}, got {result:?}"
            );
        }
    }

    #[tokio::test]
    async fn test_unreachable_provider_is_transport_failure() {
        // Nothing listens on the discard port.
        let result = provider("http://127.0.0.1:9", Some(API_KEY))
            .fetch_rates("MMK")
            .await;
        assert!(matches!(result, Err(RefreshError::TransportFailure(_))));
    }

    #[tokio::test]
    async fn test_error_messages_do_not_leak_the_key() {
        let result = provider("http://127.0.0.1:9", Some("secret-key"))
            .fetch_rates("MMK")
            .await;
        let message = result.unwrap_err().to_string();
        assert!(!message.contains("secret-key"), "{message}");
    }
}
