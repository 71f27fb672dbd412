//! Federation `getSigninToken` exchange: trades a scoped credential for a sign-in token.

// self
use crate::{
	_prelude::*,
	auth::{ScopedCredential, SigninToken},
	config::SigninConfig,
	error::{MalformedResponseError, TransportError},
	http::{self, ResponseBody, SigninHttpClient},
	obs::{StageKind, StageSpan},
};

#[derive(Deserialize)]
struct SigninTokenResponse {
	#[serde(rename = "SigninToken")]
	signin_token: String,
}

/// Exchanges scoped credentials for single-use sign-in tokens.
///
/// Every call performs exactly one GET against the configured federation endpoint. The response
/// body is read once and released on every exit path, including parse failures. Nothing is
/// cached or retried, so independent exchanges may run concurrently on a shared exchanger.
#[derive(Debug)]
pub struct TokenExchanger<C>
where
	C: SigninHttpClient,
{
	http_client: Arc<C>,
	config: SigninConfig,
}
impl<C> TokenExchanger<C>
where
	C: SigninHttpClient,
{
	/// Creates an exchanger that talks to the federation endpoint of `config`.
	pub fn new(http_client: impl Into<Arc<C>>, config: SigninConfig) -> Self {
		Self { http_client: http_client.into(), config }
	}

	/// Configuration shared with every token this exchanger produces.
	pub fn config(&self) -> &SigninConfig {
		&self.config
	}

	/// Trades `credential` for a sign-in token.
	///
	/// The credential is consumed; exchanging the same triple again requires requesting it again.
	/// The token is stamped with the instant the response was parsed and expires after the
	/// configured validity window.
	pub async fn exchange(&self, credential: ScopedCredential) -> Result<SigninToken> {
		let stage = StageSpan::begin(StageKind::TokenExchange);
		let result = stage.instrument(self.exchange_inner(credential)).await;

		stage.finish(&result);

		result
	}

	async fn exchange_inner(&self, credential: ScopedCredential) -> Result<SigninToken> {
		let url = self.token_request_url(&credential)?;

		drop(credential);

		let response = self.http_client.get(&url).await?;
		let (status, success) = (response.status, response.is_success());
		let bytes = response
			.body
			.read_to_end()
			.await
			.map_err(|source| MalformedResponseError::Unreadable { source })?;

		if !success {
			return Err(MalformedResponseError::UnexpectedStatus { status }.into());
		}

		let issued_at = OffsetDateTime::now_utc();
		let mut deserializer = serde_json::Deserializer::from_slice(&bytes);
		let response: SigninTokenResponse = serde_path_to_error::deserialize(&mut deserializer)
			.map_err(|source| MalformedResponseError::Parse { source })?;

		if response.signin_token.is_empty() {
			return Err(MalformedResponseError::EmptyToken.into());
		}

		Ok(SigninToken::issued(&self.config, response.signin_token, issued_at)?)
	}

	fn token_request_url(&self, credential: &ScopedCredential) -> Result<Url> {
		let session = serde_json::to_string(&credential.session_payload())
			.map_err(|source| Error::Serialization { source })?;
		let raw = format!(
			"{}?Action=getSigninToken&Session={}",
			self.config.federation_endpoint(),
			http::query_escape(&session),
		);

		Ok(Url::parse(&raw).map_err(TransportError::invalid_request)?)
	}
}
impl<C> Clone for TokenExchanger<C>
where
	C: SigninHttpClient,
{
	fn clone(&self) -> Self {
		Self { http_client: self.http_client.clone(), config: self.config.clone() }
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::_preludet::StaticHttpClient;

	fn credential() -> ScopedCredential {
		ScopedCredential::new("foo", "bar", "foobar")
			.expect("Complete credential triple should be accepted.")
	}

	#[tokio::test]
	async fn exchange_returns_valid_token() {
		let client = StaticHttpClient::ok(r#"{"SigninToken":"very secret token"}"#);
		let ledger = client.ledger();
		let exchanger = TokenExchanger::<StaticHttpClient>::new(client, SigninConfig::default());
		let before = OffsetDateTime::now_utc();
		let token = exchanger.exchange(credential()).await.expect("Exchange should succeed.");

		assert_eq!(token.value().expose(), "very secret token");
		assert!(token.is_valid());

		let issued_at = token.issued_at().expect("Exchanged tokens carry an issue time.");

		assert!(issued_at >= before);
		assert_eq!(token.expires_at(), Some(issued_at + Duration::minutes(15)));
		assert_eq!(ledger.requests(), 1);
		assert_eq!(ledger.reads(), 1);
		assert_eq!(ledger.releases(), 1);
	}

	#[test]
	fn request_url_carries_encoded_session() {
		let exchanger =
			TokenExchanger::<StaticHttpClient>::new(StaticHttpClient::ok(""), SigninConfig::default());
		let url = exchanger.token_request_url(&credential()).expect("Request URL should build.");

		assert_eq!(
			url.as_str(),
			"https://signin.aws.amazon.com/federation?Action=getSigninToken&Session=\
			 %7B%22sessionId%22%3A%22foo%22%2C%22sessionKey%22%3A%22bar%22%2C\
			 %22sessionToken%22%3A%22foobar%22%7D"
		);
	}

	#[tokio::test]
	async fn malformed_body_is_released_once() {
		let client = StaticHttpClient::ok("<html>throttled</html>");
		let ledger = client.ledger();
		let exchanger = TokenExchanger::<StaticHttpClient>::new(client, SigninConfig::default());
		let err = exchanger.exchange(credential()).await.expect_err("Non-JSON bodies must fail.");

		assert!(matches!(err, Error::MalformedResponse(MalformedResponseError::Parse { .. })));
		assert_eq!(ledger.reads(), 1);
		assert_eq!(ledger.releases(), 1);
	}

	#[tokio::test]
	async fn missing_field_is_named() {
		let exchanger = TokenExchanger::<StaticHttpClient>::new(
			StaticHttpClient::ok(r#"{"Token":"very secret token"}"#),
			SigninConfig::default(),
		);
		let err = exchanger.exchange(credential()).await.expect_err("Missing field must fail.");
		let Error::MalformedResponse(MalformedResponseError::Parse { source }) = &err else {
			panic!("Unexpected error: {err:?}.");
		};

		assert!(source.inner().to_string().contains("SigninToken"));
	}

	#[tokio::test]
	async fn transport_failure_never_touches_a_body() {
		let client = StaticHttpClient::unreachable("connection refused");
		let ledger = client.ledger();
		let exchanger = TokenExchanger::<StaticHttpClient>::new(client, SigninConfig::default());
		let err = exchanger.exchange(credential()).await.expect_err("Unreachable hosts must fail.");

		assert!(matches!(err, Error::Transport(TransportError::Network { .. })));
		assert_eq!(ledger.requests(), 1);
		assert_eq!(ledger.reads(), 0);
		assert_eq!(ledger.releases(), 0);
	}

	#[tokio::test]
	async fn error_status_is_reported_after_release() {
		let client = StaticHttpClient::with_status(400, "Bad Request");
		let ledger = client.ledger();
		let exchanger = TokenExchanger::<StaticHttpClient>::new(client, SigninConfig::default());
		let err = exchanger.exchange(credential()).await.expect_err("HTTP 400 must fail.");

		assert!(matches!(
			err,
			Error::MalformedResponse(MalformedResponseError::UnexpectedStatus { status: 400 })
		));
		assert_eq!(ledger.releases(), 1);
	}

	#[tokio::test]
	async fn empty_token_is_rejected() {
		let exchanger = TokenExchanger::<StaticHttpClient>::new(
			StaticHttpClient::ok(r#"{"SigninToken":""}"#),
			SigninConfig::default(),
		);
		let err = exchanger.exchange(credential()).await.expect_err("Empty tokens must fail.");

		assert!(matches!(err, Error::MalformedResponse(MalformedResponseError::EmptyToken)));
	}

	#[tokio::test]
	async fn configured_validity_is_applied() {
		let config = SigninConfig::builder()
			.token_validity(Duration::minutes(5))
			.build()
			.expect("Config should build.");
		let exchanger = TokenExchanger::<StaticHttpClient>::new(
			StaticHttpClient::ok(r#"{"SigninToken":"token"}"#),
			config,
		);
		let token = exchanger.exchange(credential()).await.expect("Exchange should succeed.");
		let issued_at = token.issued_at().expect("Exchanged tokens carry an issue time.");

		assert_eq!(token.expires_at(), Some(issued_at + Duration::minutes(5)));
	}

	#[tokio::test]
	async fn longest_accepted_window_does_not_overflow() {
		let config = SigninConfig::builder()
			.token_validity(crate::config::MAX_TOKEN_VALIDITY)
			.build()
			.expect("The maximum validity window should be accepted.");
		let exchanger = TokenExchanger::<StaticHttpClient>::new(
			StaticHttpClient::ok(r#"{"SigninToken":"token"}"#),
			config,
		);
		let token = exchanger.exchange(credential()).await.expect("Exchange should succeed.");
		let issued_at = token.issued_at().expect("Exchanged tokens carry an issue time.");

		assert!(token.is_valid());
		assert_eq!(token.expires_at(), Some(issued_at + Duration::hours(36)));
	}
}
