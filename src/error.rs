//! Pipeline-level error types shared by the broker, exchanger, and sign-in token.

// self
use crate::{_prelude::*, auth::IdentifierError, config::SigninConfigError};

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Boxed, thread-safe error used for opaque foreign failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
///
/// Each variant names the pipeline stage it came from and keeps the underlying cause as its
/// source. Nothing is retried or swallowed internally.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration or request validation problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Identity service rejected or failed the scoped-credential request.
	#[error(transparent)]
	Credential(#[from] CredentialError),
	/// Credential payload could not be encoded.
	#[error("Failed to serialize the federation session payload.")]
	Serialization {
		/// Underlying encoder failure.
		#[source]
		source: serde_json::Error,
	},
	/// Network or request-construction failure during the exchange.
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Exchange response could not be read or parsed.
	#[error(transparent)]
	MalformedResponse(#[from] MalformedResponseError),

	/// Sign-in URL requested for an empty or expired token.
	#[error("Sign-in token is invalid: it is empty or expired.")]
	InvalidToken,
	/// Caller-supplied destination is not a well-formed absolute URL.
	#[error("Sign-in destination is invalid.")]
	InvalidDestination {
		/// Reason the destination was rejected.
		#[source]
		source: DestinationError,
	},
	/// The assembled sign-in URL failed to parse, which indicates an encoding bug.
	#[error("Assembled sign-in URL is malformed.")]
	InvalidAssembledUrl {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
}

/// Configuration and validation failures raised before any network call.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Principal name or permission boundary failed validation.
	#[error("Scoped credential request is invalid.")]
	InvalidIdentifier(#[from] IdentifierError),
	/// Sign-in endpoint configuration is invalid.
	#[error("Sign-in configuration is invalid.")]
	Signin(#[from] SigninConfigError),
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<reqwest::Error> for ConfigError {
	fn from(e: reqwest::Error) -> Self {
		Self::http_client_build(e)
	}
}
impl From<IdentifierError> for Error {
	fn from(e: IdentifierError) -> Self {
		ConfigError::from(e).into()
	}
}
impl From<SigninConfigError> for Error {
	fn from(e: SigninConfigError) -> Self {
		ConfigError::from(e).into()
	}
}

/// Failures surfaced while requesting scoped credentials.
#[derive(Debug, ThisError)]
pub enum CredentialError {
	/// Identity service failed (invalid ARN, missing rights, throttling, outage).
	#[error("Identity service failed while requesting scoped credentials.")]
	Upstream {
		/// Opaque upstream failure, passed through unmodified.
		#[source]
		source: BoxError,
	},
	/// Identity service returned a partial credential triple.
	#[error("Identity service returned scoped credentials without a {field}.")]
	Incomplete {
		/// Name of the missing member.
		field: &'static str,
	},
	/// Requested session duration falls outside what the identity service accepts.
	#[error("Session duration of {seconds}s is outside the accepted range of {min}s to {max}s.")]
	SessionDuration {
		/// Requested duration in whole seconds.
		seconds: i64,
		/// Shortest accepted duration in seconds.
		min: i64,
		/// Longest accepted duration in seconds.
		max: i64,
	},
}
impl CredentialError {
	/// Wraps an identity-service failure.
	pub fn upstream(src: impl Into<BoxError>) -> Self {
		Self::Upstream { source: src.into() }
	}
}

/// Transport-level failures (request construction, network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Federation request could not be constructed.
	#[error("Failed to construct the federation token request.")]
	InvalidRequest {
		/// Underlying construction failure.
		#[source]
		source: BoxError,
	},
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the federation endpoint.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the federation endpoint.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a request-construction failure.
	pub fn invalid_request(src: impl Into<BoxError>) -> Self {
		Self::InvalidRequest { source: src.into() }
	}

	/// Wraps a transport-specific network error.
	pub fn network(src: impl Into<BoxError>) -> Self {
		Self::Network { source: src.into() }
	}
}
#[cfg(feature = "reqwest")]
impl From<reqwest::Error> for TransportError {
	fn from(e: reqwest::Error) -> Self {
		if e.is_builder() { Self::invalid_request(e) } else { Self::network(e) }
	}
}

/// Failures reading or decoding the federation exchange response.
#[derive(Debug, ThisError)]
pub enum MalformedResponseError {
	/// Response body could not be read.
	#[error("Federation response body could not be read.")]
	Unreadable {
		/// Transport failure raised while draining the body.
		#[source]
		source: TransportError,
	},
	/// Federation endpoint answered with a non-success status.
	#[error("Federation endpoint returned HTTP {status}.")]
	UnexpectedStatus {
		/// HTTP status code.
		status: u16,
	},
	/// Response body is not the expected JSON document.
	#[error("Federation response could not be parsed.")]
	Parse {
		/// Structured parsing failure including the offending path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// Response carried an empty sign-in token.
	#[error("Federation response carried an empty sign-in token.")]
	EmptyToken,
}

/// Reasons a caller-supplied destination is rejected.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum DestinationError {
	/// Destination is not an absolute URL.
	#[error("Destination is not an absolute URL.")]
	Parse(#[from] url::ParseError),
	/// Destination has no host to land on.
	#[error("Destination `{destination}` has no host.")]
	MissingHost {
		/// Rejected destination.
		destination: String,
	},
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn messages_name_the_failing_stage() {
		let err = Error::from(CredentialError::upstream("throttled"));

		assert_eq!(err.to_string(), "Identity service failed while requesting scoped credentials.");
		assert_eq!(err.source().map(ToString::to_string), Some("throttled".into()));

		let err = Error::from(TransportError::network("connection reset"));

		assert_eq!(err.to_string(), "Network error occurred while calling the federation endpoint.");
	}

	#[test]
	fn upstream_cause_is_preserved() {
		let err = CredentialError::upstream("invalid policy ARN");
		let cause = err.source().expect("Upstream failure should keep its cause.");

		assert_eq!(cause.to_string(), "invalid policy ARN");
	}
}
