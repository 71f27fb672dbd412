//! Console sign-in facade wiring the credential broker to the token exchanger.

// self
use crate::{
	_prelude::*,
	auth::{ScopedCredentialRequest, SigninToken},
	config::SigninConfig,
	exchange::TokenExchanger,
	http::SigninHttpClient,
	identity::{CredentialBroker, IdentityService},
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

#[cfg(feature = "reqwest")]
/// Facade specialized for the crate's default reqwest transport.
pub type ReqwestConsoleSignin = ConsoleSignin<ReqwestHttpClient>;

/// Produces console sign-in tokens and URLs for scoped principals.
///
/// One call runs the whole pipeline in order: request scoped credentials, exchange them for a
/// sign-in token, and (for [`ConsoleSignin::sign_in_url`]) assemble the login URL. The first
/// failing stage aborts the pipeline and its error is returned as is. Nothing is cached, so
/// every call performs a fresh credential request and a fresh exchange.
pub struct ConsoleSignin<C>
where
	C: SigninHttpClient,
{
	broker: CredentialBroker,
	exchanger: TokenExchanger<C>,
}
impl<C> ConsoleSignin<C>
where
	C: SigninHttpClient,
{
	/// Creates a facade that reuses the caller-provided transport.
	pub fn with_http_client(
		identity: Arc<dyn IdentityService>,
		config: SigninConfig,
		http_client: impl Into<Arc<C>>,
	) -> Self {
		Self {
			broker: CredentialBroker::new(identity),
			exchanger: TokenExchanger::new(http_client, config),
		}
	}

	/// Configuration used for the exchange and for the login URL.
	pub fn config(&self) -> &SigninConfig {
		self.exchanger.config()
	}

	/// Requests scoped credentials and exchanges them for a sign-in token.
	pub async fn sign_in_token(&self, request: &ScopedCredentialRequest) -> Result<SigninToken> {
		let credential = self.broker.request_scoped_credentials(request).await?;

		self.exchanger.exchange(credential).await
	}

	/// Same as [`ConsoleSignin::sign_in_token`], validating raw identifiers first.
	pub async fn sign_in_token_with_arn(
		&self,
		principal: &str,
		permission_boundary: &str,
	) -> Result<SigninToken> {
		let credential = self
			.broker
			.request_scoped_credentials_with_arn(principal, permission_boundary)
			.await?;

		self.exchanger.exchange(credential).await
	}

	/// Runs the full pipeline and returns a login URL landing on `destination`.
	pub async fn sign_in_url(
		&self,
		request: &ScopedCredentialRequest,
		destination: &str,
	) -> Result<Url> {
		self.sign_in_token(request).await?.sign_in_url(destination)
	}
}
#[cfg(feature = "reqwest")]
impl ConsoleSignin<ReqwestHttpClient> {
	/// Creates a facade that provisions its own reqwest transport.
	pub fn new(identity: Arc<dyn IdentityService>, config: SigninConfig) -> Self {
		Self::with_http_client(identity, config, ReqwestHttpClient::default())
	}
}
impl<C> Clone for ConsoleSignin<C>
where
	C: SigninHttpClient,
{
	fn clone(&self) -> Self {
		Self { broker: self.broker.clone(), exchanger: self.exchanger.clone() }
	}
}
impl<C> Debug for ConsoleSignin<C>
where
	C: SigninHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ConsoleSignin")
			.field("federation_endpoint", &self.config().federation_endpoint().as_str())
			.finish_non_exhaustive()
	}
}
