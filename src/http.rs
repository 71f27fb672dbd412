//! Transport primitives for the federation token exchange.
//!
//! The module exposes [`SigninHttpClient`], the exchanger's only dependency on an HTTP stack,
//! together with [`ResponseBody`]. A body is an owned value: reading it consumes it, so it can be
//! read at most once, and dropping it releases the underlying connection on every exit path.

// self
use crate::{_prelude::*, error::TransportError};

/// Boxed future returned by transport operations.
pub type HttpFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, TransportError>> + 'a + Send>>;

/// Minimal HTTP capability required by the token exchange: perform one GET.
///
/// Implementations must be `Send + Sync + 'static` so one client can be shared by independent
/// exchanges. A failed request must resolve to a [`TransportError`] without producing a
/// response, so callers never touch a body that does not exist.
pub trait SigninHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Response body handed back on success.
	type Body: ResponseBody;

	/// Issues a GET request for `url`.
	fn get<'a>(&'a self, url: &'a Url) -> HttpFuture<'a, HttpResponse<Self::Body>>;
}

/// Owned response body. Dropping it releases the underlying resource.
pub trait ResponseBody
where
	Self: 'static + Send + Sized,
{
	/// Consumes the body and returns its full contents.
	fn read_to_end(self) -> HttpFuture<'static, Vec<u8>>;
}

/// Status and body of a completed GET request.
#[derive(Debug)]
pub struct HttpResponse<B> {
	/// HTTP status code.
	pub status: u16,
	/// Unread response body.
	pub body: B,
}
impl<B> HttpResponse<B> {
	/// Returns `true` for 2xx statuses.
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}
}

/// Thin wrapper around [`reqwest::Client`] so shared HTTP behavior lives in one place.
///
/// The client performs no retries. Callers that need bounded latency should build it with
/// [`ReqwestHttpClient::with_timeout`] or pass a preconfigured client.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestHttpClient(pub reqwest::Client);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`reqwest::Client`].
	pub fn with_client(client: reqwest::Client) -> Self {
		Self(client)
	}

	/// Builds a client whose requests fail once `timeout` elapses.
	pub fn with_timeout(timeout: std::time::Duration) -> Result<Self> {
		let client = reqwest::Client::builder()
			.timeout(timeout)
			.build()
			.map_err(crate::error::ConfigError::from)?;

		Ok(Self(client))
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<reqwest::Client> for ReqwestHttpClient {
	fn as_ref(&self) -> &reqwest::Client {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl SigninHttpClient for ReqwestHttpClient {
	type Body = ReqwestBody;

	fn get<'a>(&'a self, url: &'a Url) -> HttpFuture<'a, HttpResponse<Self::Body>> {
		Box::pin(async move {
			let response = self.0.get(url.clone()).send().await?;

			Ok(HttpResponse { status: response.status().as_u16(), body: ReqwestBody(response) })
		})
	}
}

/// Response body backed by a [`reqwest::Response`].
#[cfg(feature = "reqwest")]
#[derive(Debug)]
pub struct ReqwestBody(reqwest::Response);
#[cfg(feature = "reqwest")]
impl ResponseBody for ReqwestBody {
	fn read_to_end(self) -> HttpFuture<'static, Vec<u8>> {
		Box::pin(async move { Ok(self.0.bytes().await?.to_vec()) })
	}
}

/// Percent-encodes `value` for use as a single query parameter value.
pub(crate) fn query_escape(value: &str) -> String {
	url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn query_escape_encodes_reserved_characters() {
		assert_eq!(
			query_escape("https://console.example.com/ecr"),
			"https%3A%2F%2Fconsole.example.com%2Fecr"
		);
		assert_eq!(query_escape("a b&c=d"), "a+b%26c%3Dd");
		assert_eq!(query_escape(r#"{"sessionId":"foo"}"#), "%7B%22sessionId%22%3A%22foo%22%7D");
	}

	#[test]
	fn success_covers_2xx_only() {
		assert!(HttpResponse { status: 200, body: () }.is_success());
		assert!(HttpResponse { status: 204, body: () }.is_success());
		assert!(!HttpResponse { status: 302, body: () }.is_success());
		assert!(!HttpResponse { status: 400, body: () }.is_success());
	}

	#[cfg(feature = "reqwest")]
	#[tokio::test]
	async fn unreachable_host_short_circuits_without_body() {
		let client = ReqwestHttpClient::with_timeout(std::time::Duration::from_secs(2))
			.expect("Reqwest client should build.");
		let url = Url::parse("http://127.0.0.1:9/federation").expect("URL should parse.");
		let err = client.get(&url).await.expect_err("Nothing listens on the discard port.");

		assert!(matches!(err, TransportError::Network { .. }));
	}
}
