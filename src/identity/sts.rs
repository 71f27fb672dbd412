//! [`IdentityService`] backed by AWS STS `GetFederationToken`.

// crates.io
use aws_sdk_sts::{Client as StsClient, types::PolicyDescriptorType};
// self
use crate::{
	_prelude::*,
	auth::{ScopedCredential, ScopedCredentialRequest},
	error::CredentialError,
	identity::{IdentityFuture, IdentityService},
};

/// Shortest federation session STS issues, in seconds.
pub const MIN_SESSION_SECONDS: i64 = 900;
/// Longest federation session STS issues, in seconds.
pub const MAX_SESSION_SECONDS: i64 = 129_600;

/// Issues federation tokens through an STS client.
///
/// Every request carries exactly one managed policy ARN, the request's permission boundary, so
/// the resulting session can never exceed it. A requested session duration outside
/// [`MIN_SESSION_SECONDS`]..=[`MAX_SESSION_SECONDS`] is rejected before STS is called.
#[derive(Clone, Debug)]
pub struct StsIdentityService {
	client: StsClient,
}
impl StsIdentityService {
	/// Wraps a configured STS client.
	pub fn new(client: StsClient) -> Self {
		Self { client }
	}
}
impl IdentityService for StsIdentityService {
	fn issue_scoped_credentials<'a>(
		&'a self,
		request: &'a ScopedCredentialRequest,
	) -> IdentityFuture<'a> {
		Box::pin(async move {
			let duration_seconds = request.session_duration().map(session_seconds).transpose()?;
			let boundary =
				PolicyDescriptorType::builder().arn(request.permission_boundary().as_ref()).build();
			let output = self
				.client
				.get_federation_token()
				.name(request.principal().as_ref())
				.policy_arns(boundary)
				.set_duration_seconds(duration_seconds)
				.send()
				.await?;
			let credentials = output
				.credentials()
				.ok_or_else(|| BoxError::from("STS returned no credentials for the federation token."))?;

			Ok(ScopedCredential::new(
				credentials.access_key_id(),
				credentials.secret_access_key(),
				credentials.session_token(),
			)?)
		})
	}
}

fn session_seconds(duration: Duration) -> Result<i32, CredentialError> {
	let seconds = duration.whole_seconds();

	match i32::try_from(seconds) {
		Ok(s) if (MIN_SESSION_SECONDS..=MAX_SESSION_SECONDS).contains(&i64::from(s)) => Ok(s),
		_ => Err(CredentialError::SessionDuration {
			seconds,
			min: MIN_SESSION_SECONDS,
			max: MAX_SESSION_SECONDS,
		}),
	}
}
