//! Scoped credential requests, the issued credential triple, and its federation payload.

// self
use crate::{
	_prelude::*,
	auth::{PolicyArn, PrincipalName, Secret},
	error::CredentialError,
};

/// Inputs for a scoped-credential request.
///
/// A request always names exactly one permission boundary; there is no default, so a missing
/// boundary fails when the [`PolicyArn`] is constructed rather than silently granting broader
/// access.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScopedCredentialRequest {
	principal: PrincipalName,
	permission_boundary: PolicyArn,
	session_duration: Option<Duration>,
}
impl ScopedCredentialRequest {
	/// Creates a request for `principal`, bounded by `permission_boundary`.
	pub fn new(principal: PrincipalName, permission_boundary: PolicyArn) -> Self {
		Self { principal, permission_boundary, session_duration: None }
	}

	/// Asks the identity service for a specific credential lifetime.
	pub fn with_session_duration(mut self, duration: Duration) -> Self {
		self.session_duration = Some(duration);

		self
	}

	/// Federated principal name.
	pub fn principal(&self) -> &PrincipalName {
		&self.principal
	}

	/// Policy capping the credential's privileges.
	pub fn permission_boundary(&self) -> &PolicyArn {
		&self.permission_boundary
	}

	/// Requested credential lifetime, if any; the identity service default applies otherwise.
	pub fn session_duration(&self) -> Option<Duration> {
		self.session_duration
	}
}

/// Temporary credential triple issued for a single principal and permission boundary.
///
/// The triple is correlated: it is constructed whole, never exposes a setter, and is consumed by
/// value when exchanged for a sign-in token.
#[derive(Clone, Debug)]
pub struct ScopedCredential {
	access_key_id: String,
	secret_access_key: Secret,
	session_token: Secret,
}
impl ScopedCredential {
	/// Builds a credential triple, rejecting any empty member.
	pub fn new(
		access_key_id: impl Into<String>,
		secret_access_key: impl Into<String>,
		session_token: impl Into<String>,
	) -> Result<Self, CredentialError> {
		let access_key_id = access_key_id.into();
		let secret_access_key = Secret::new(secret_access_key);
		let session_token = Secret::new(session_token);

		if access_key_id.is_empty() {
			return Err(CredentialError::Incomplete { field: "access key id" });
		}
		if secret_access_key.is_empty() {
			return Err(CredentialError::Incomplete { field: "secret access key" });
		}
		if session_token.is_empty() {
			return Err(CredentialError::Incomplete { field: "session token" });
		}

		Ok(Self { access_key_id, secret_access_key, session_token })
	}

	/// Access key identifier; not secret on its own.
	pub fn access_key_id(&self) -> &str {
		&self.access_key_id
	}

	/// Secret access key.
	pub fn secret_access_key(&self) -> &Secret {
		&self.secret_access_key
	}

	/// Session token bound to the temporary credentials.
	pub fn session_token(&self) -> &Secret {
		&self.session_token
	}

	pub(crate) fn session_payload(&self) -> SessionPayload<'_> {
		SessionPayload {
			session_id: &self.access_key_id,
			session_key: self.secret_access_key.expose(),
			session_token: self.session_token.expose(),
		}
	}
}

/// `Session` document expected by the federation `getSigninToken` action.
#[derive(Serialize)]
pub(crate) struct SessionPayload<'a> {
	#[serde(rename = "sessionId")]
	session_id: &'a str,
	#[serde(rename = "sessionKey")]
	session_key: &'a str,
	#[serde(rename = "sessionToken")]
	session_token: &'a str,
}
