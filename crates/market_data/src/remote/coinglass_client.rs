use std::time::Duration;

use common::config::Config;
use serde_json::Value;
use thiserror::Error;
use tokio::time::{Instant, sleep, sleep_until};
use tracing::{debug, error, warn};

use crate::endpoints::EndpointRequest;
use crate::remote::envelope::{Envelope, EnvelopeOutcome};
use crate::remote::transport::{HttpTransport, RawResponse, ReqwestTransport, TransportError};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(#[from] TransportError),

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("invalid JSON response: {0}")]
    InvalidJson(#[source] serde_json::Error),

    #[error("unexpected payload: {0}")]
    UnexpectedPayload(String),

    #[error("API error: {message} (code {code})")]
    Api { code: String, message: String },
}

/// A failure worth another attempt.
#[derive(Debug, Clone)]
pub enum RetryableFailure {
    Network(TransportError),
    Status { status: u16, body: String },
}

impl From<RetryableFailure> for ApiError {
    fn from(failure: RetryableFailure) -> Self {
        match failure {
            RetryableFailure::Network(err) => ApiError::Network(err),
            RetryableFailure::Status { status, body } => ApiError::Http { status, body },
        }
    }
}

#[derive(Debug)]
enum AttemptOutcome {
    Success(Vec<Value>),
    Retryable(RetryableFailure),
    Fatal(ApiError),
}

/// Bounded retry with fixed per-kind backoff.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub network_backoff: Duration,
    pub status_backoff: Duration,
}

impl RetryPolicy {
    /// Wait before the next attempt, or `None` once `attempt` was the last.
    pub fn backoff(&self, attempt: u32, failure: &RetryableFailure) -> Option<Duration> {
        if attempt >= self.max_attempts {
            return None;
        }
        Some(match failure {
            RetryableFailure::Network(_) => self.network_backoff,
            RetryableFailure::Status { .. } => self.status_backoff,
        })
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            network_backoff: Duration::from_secs(2),
            status_backoff: Duration::from_secs(1),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClientSettings {
    pub retry: RetryPolicy,
    /// Minimum gap between consecutive outbound requests. The hobbyist tier
    /// caps requests per minute.
    pub min_spacing: Duration,
    pub request_timeout: Duration,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            retry: RetryPolicy::default(),
            min_spacing: Duration::from_secs(2),
            request_timeout: Duration::from_secs(10),
        }
    }
}

pub struct CoinglassClient<T = ReqwestTransport> {
    transport: T,
    base_url: String,
    settings: ClientSettings,
    last_request: Option<Instant>,
}

impl CoinglassClient<ReqwestTransport> {
    pub fn from_config(config: &Config) -> Result<Self, ApiError> {
        let settings = ClientSettings::default();
        let transport = ReqwestTransport::new(&config.api_key, settings.request_timeout)?;
        Ok(Self::new(transport, &config.base_url).with_settings(settings))
    }
}

impl<T: HttpTransport> CoinglassClient<T> {
    pub fn new(transport: T, base_url: impl Into<String>) -> Self {
        Self {
            transport,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            settings: ClientSettings::default(),
            last_request: None,
        }
    }

    pub fn with_settings(mut self, settings: ClientSettings) -> Self {
        self.settings = settings;
        self
    }

    pub async fn fetch(&mut self, request: &EndpointRequest) -> Result<Vec<Value>, ApiError> {
        self.execute(request.path, &request.params).await
    }

    /// Any endpoint, no typed handling of the records.
    pub async fn fetch_generic(
        &mut self,
        path: &str,
        params: Option<&[(String, String)]>,
    ) -> Result<Vec<Value>, ApiError> {
        self.execute(path, params.unwrap_or_default()).await
    }

    /// GETs `base_url + path` and returns the envelope's `data` records.
    ///
    /// Network failures and non-200 statuses are retried up to the policy's
    /// attempt ceiling. A body that is not JSON, or an envelope whose code is
    /// not `"0"`, fails at once.
    pub async fn execute(
        &mut self,
        path: &str,
        params: &[(String, String)],
    ) -> Result<Vec<Value>, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        let max_attempts = self.settings.retry.max_attempts;
        let mut attempt = 0;

        loop {
            attempt += 1;
            self.pace().await;
            debug!("Requesting {} (attempt {}/{})", url, attempt, max_attempts);

            match self.attempt(&url, params).await {
                AttemptOutcome::Success(records) => return Ok(records),
                AttemptOutcome::Fatal(err) => {
                    error!("Request to {} failed: {}", path, err);
                    return Err(err);
                }
                AttemptOutcome::Retryable(failure) => {
                    match self.settings.retry.backoff(attempt, &failure) {
                        Some(delay) => {
                            warn!(
                                "{} on {}, retrying in {:?} (attempt {}/{})",
                                describe(&failure),
                                path,
                                delay,
                                attempt,
                                max_attempts
                            );
                            sleep(delay).await;
                        }
                        None => {
                            let err = ApiError::from(failure);
                            error!("Giving up on {} after {} attempts: {}", path, attempt, err);
                            return Err(err);
                        }
                    }
                }
            }
        }
    }

    async fn attempt(&self, url: &str, params: &[(String, String)]) -> AttemptOutcome {
        let RawResponse { status, body } = match self.transport.get(url, params).await {
            Ok(response) => response,
            Err(err) => return AttemptOutcome::Retryable(RetryableFailure::Network(err)),
        };

        if status != 200 {
            return AttemptOutcome::Retryable(RetryableFailure::Status { status, body });
        }

        let envelope = match Envelope::parse(&body) {
            Ok(envelope) => envelope,
            Err(err) => return AttemptOutcome::Fatal(ApiError::InvalidJson(err)),
        };

        match envelope.into_outcome() {
            EnvelopeOutcome::Success(records) => AttemptOutcome::Success(records),
            EnvelopeOutcome::Rejected { code, message } => {
                AttemptOutcome::Fatal(ApiError::Api { code, message })
            }
            EnvelopeOutcome::UnexpectedPayload(reason) => {
                AttemptOutcome::Fatal(ApiError::UnexpectedPayload(reason))
            }
        }
    }

    /// Blocks until `min_spacing` has passed since the previous request.
    async fn pace(&mut self) {
        if let Some(last) = self.last_request {
            let ready_at = last + self.settings.min_spacing;
            if ready_at > Instant::now() {
                debug!("Pacing: waiting {:?}", ready_at - Instant::now());
                sleep_until(ready_at).await;
            }
        }
        self.last_request = Some(Instant::now());
    }
}

fn describe(failure: &RetryableFailure) -> String {
    match failure {
        RetryableFailure::Network(err) => format!("Network error ({})", err),
        RetryableFailure::Status { status, body } => {
            let snippet: String = body.chars().take(200).collect();
            format!("HTTP {}: {}", status, snippet)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::transport::MockHttpTransport;
    use serde_json::json;

    const BASE: &str = "https://open-api-v4.coinglass.com/api";

    fn no_spacing() -> ClientSettings {
        ClientSettings {
            min_spacing: Duration::ZERO,
            ..ClientSettings::default()
        }
    }

    fn client(mock: MockHttpTransport) -> CoinglassClient<MockHttpTransport> {
        CoinglassClient::new(mock, BASE).with_settings(no_spacing())
    }

    fn ok_body(data: Value) -> Result<RawResponse, TransportError> {
        Ok(RawResponse::new(
            200,
            json!({"code": "0", "msg": "success", "data": data}).to_string(),
        ))
    }

    #[test]
    fn policy_stops_at_the_ceiling() {
        let policy = RetryPolicy::default();
        let network = RetryableFailure::Network(TransportError::Timeout("t".into()));
        let status = RetryableFailure::Status {
            status: 503,
            body: String::new(),
        };

        assert_eq!(policy.backoff(1, &network), Some(Duration::from_secs(2)));
        assert_eq!(policy.backoff(2, &status), Some(Duration::from_secs(1)));
        assert_eq!(policy.backoff(3, &network), None);
        assert_eq!(policy.backoff(3, &status), None);
    }

    #[tokio::test(start_paused = true)]
    async fn network_failure_is_retried_three_times_then_raised() {
        let mut mock = MockHttpTransport::new();
        mock.expect_get()
            .times(3)
            .returning(|_, _| Err(TransportError::Connect("refused".into())));

        let start = Instant::now();
        let err = client(mock).execute("/futures/x", &[]).await.unwrap_err();

        assert!(matches!(err, ApiError::Network(TransportError::Connect(_))));
        assert_eq!(start.elapsed(), Duration::from_secs(4));
    }

    #[tokio::test(start_paused = true)]
    async fn two_failures_then_success_returns_data_after_two_waits() {
        let mut mock = MockHttpTransport::new();
        let mut calls = 0;
        mock.expect_get().times(3).returning(move |_, _| {
            calls += 1;
            if calls < 3 {
                Err(TransportError::Timeout("slow".into()))
            } else {
                ok_body(json!([{"time": 1000}]))
            }
        });

        let start = Instant::now();
        let records = client(mock).execute("/futures/x", &[]).await.unwrap();

        assert_eq!(records, vec![json!({"time": 1000})]);
        assert_eq!(start.elapsed(), 2 * Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn non_200_is_retried_then_raised_with_status() {
        let mut mock = MockHttpTransport::new();
        mock.expect_get()
            .times(3)
            .returning(|_, _| Ok(RawResponse::new(401, "Unauthorized")));

        let start = Instant::now();
        let err = client(mock).execute("/futures/x", &[]).await.unwrap_err();

        match err {
            ApiError::Http { status, body } => {
                assert_eq!(status, 401);
                assert_eq!(body, "Unauthorized");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(start.elapsed(), Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn application_error_is_not_retried() {
        let mut mock = MockHttpTransport::new();
        mock.expect_get().times(1).returning(|_, _| {
            Ok(RawResponse::new(200, r#"{"code":"1","msg":"bad symbol"}"#))
        });

        let start = Instant::now();
        let err = client(mock).execute("/futures/x", &[]).await.unwrap_err();

        match err {
            ApiError::Api { code, message } => {
                assert_eq!(code, "1");
                assert_eq!(message, "bad symbol");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn invalid_json_is_fatal() {
        let mut mock = MockHttpTransport::new();
        mock.expect_get()
            .times(1)
            .returning(|_, _| Ok(RawResponse::new(200, "<html>oops</html>")));

        let err = client(mock).execute("/futures/x", &[]).await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidJson(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn status_failure_recovers_on_next_attempt() {
        let mut mock = MockHttpTransport::new();
        let mut calls = 0;
        mock.expect_get().times(2).returning(move |_, _| {
            calls += 1;
            if calls == 1 {
                Ok(RawResponse::new(502, "Bad Gateway"))
            } else {
                ok_body(json!([]))
            }
        });

        let records = client(mock).execute("/futures/x", &[]).await.unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn requests_are_spaced_at_least_two_seconds_apart() {
        let mut mock = MockHttpTransport::new();
        mock.expect_get()
            .times(3)
            .returning(|_, _| ok_body(json!([])));
        let mut client = CoinglassClient::new(mock, BASE);

        let start = Instant::now();
        client.execute("/a", &[]).await.unwrap();
        assert_eq!(start.elapsed(), Duration::ZERO);
        client.execute("/b", &[]).await.unwrap();
        assert_eq!(start.elapsed(), Duration::from_secs(2));

        tokio::time::advance(Duration::from_secs(5)).await;
        let before_third = Instant::now();
        client.execute("/c", &[]).await.unwrap();
        assert_eq!(before_third.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn url_and_params_reach_the_transport() {
        let mut mock = MockHttpTransport::new();
        mock.expect_get()
            .withf(|url, params| {
                url.to_string()
                    == "https://open-api-v4.coinglass.com/api/futures/open-interest/aggregated-history"
                    && params.to_vec()
                        == vec![
                            ("symbol".to_string(), "BTC".to_string()),
                            ("interval".to_string(), "4h".to_string()),
                        ]
            })
            .times(1)
            .returning(|_, _| ok_body(json!([])));

        let mut client = CoinglassClient::new(mock, format!("{BASE}/")).with_settings(no_spacing());
        let request = EndpointRequest {
            path: "/futures/open-interest/aggregated-history",
            params: vec![
                ("symbol".into(), "BTC".into()),
                ("interval".into(), "4h".into()),
            ],
        };
        client.fetch(&request).await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn generic_fetch_without_params() {
        let mut mock = MockHttpTransport::new();
        mock.expect_get()
            .withf(|url, params| url.ends_with("/futures/supported-coins") && params.is_empty())
            .times(1)
            .returning(|_, _| ok_body(json!(["BTC", "ETH"])));

        let records = client(mock)
            .fetch_generic("/futures/supported-coins", None)
            .await
            .unwrap();
        assert_eq!(records, vec![json!("BTC"), json!("ETH")]);
    }
}
