//! Identity-service contract and the broker that requests scoped credentials through it.

#[cfg(feature = "aws-sts")] pub mod sts;
#[cfg(feature = "aws-sts")] pub use sts::StsIdentityService;

// self
use crate::{
	_prelude::*,
	auth::{PolicyArn, PrincipalName, ScopedCredential, ScopedCredentialRequest},
	error::CredentialError,
	obs::{StageKind, StageSpan},
};

/// Boxed future returned by [`IdentityService::issue_scoped_credentials`].
pub type IdentityFuture<'a> =
	Pin<Box<dyn Future<Output = Result<ScopedCredential, BoxError>> + 'a + Send>>;

/// Capability that issues scoped federation credentials.
///
/// Implementations attach exactly one permission boundary, the one named by the request, and
/// report any failure (invalid ARN, missing rights, throttling) as an opaque error. The broker
/// wraps it without inspecting it.
pub trait IdentityService
where
	Self: Send + Sync,
{
	/// Issues a credential triple scoped to the request's principal and permission boundary.
	fn issue_scoped_credentials<'a>(
		&'a self,
		request: &'a ScopedCredentialRequest,
	) -> IdentityFuture<'a>;
}

/// Requests scoped credentials from an [`IdentityService`].
///
/// The broker keeps no state between calls and never retries; retry policy belongs to the caller.
#[derive(Clone)]
pub struct CredentialBroker {
	identity: Arc<dyn IdentityService>,
}
impl CredentialBroker {
	/// Creates a broker backed by `identity`.
	pub fn new(identity: Arc<dyn IdentityService>) -> Self {
		Self { identity }
	}

	/// Requests a credential triple for the request's principal and permission boundary.
	pub async fn request_scoped_credentials(
		&self,
		request: &ScopedCredentialRequest,
	) -> Result<ScopedCredential> {
		let stage = StageSpan::begin(StageKind::ScopedCredentials);
		let result = stage
			.instrument(async move {
				self.identity
					.issue_scoped_credentials(request)
					.await
					.map_err(|e| Error::from(CredentialError::upstream(e)))
			})
			.await;

		stage.finish(&result);

		result
	}

	/// Validates raw identifiers, then requests scoped credentials for them.
	pub async fn request_scoped_credentials_with_arn(
		&self,
		principal: &str,
		permission_boundary: &str,
	) -> Result<ScopedCredential> {
		let request = ScopedCredentialRequest::new(
			PrincipalName::new(principal)?,
			PolicyArn::new(permission_boundary)?,
		);

		self.request_scoped_credentials(&request).await
	}
}
impl Debug for CredentialBroker {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("CredentialBroker").finish_non_exhaustive()
	}
}
