//! Single-use console sign-in token and the login URL built from it.

// self
use crate::{
	_prelude::*,
	auth::Secret,
	config::{MAX_TOKEN_VALIDITY, SigninConfig, SigninConfigError},
	error::DestinationError,
	http,
	obs::{StageKind, StageSpan},
};

/// Opaque, short-lived bearer token issued by the federation exchange.
///
/// Tokens are immutable. Validity is tracked on the client only: once `expires_at` passes, the
/// token is treated as unusable even if the federation service would still accept it, and there
/// is no renewal path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SigninToken {
	value: Secret,
	issued_at: Option<OffsetDateTime>,
	expires_at: Option<OffsetDateTime>,
	federation_endpoint: Url,
}
impl SigninToken {
	/// Wraps a token issued by the default (commercial partition) federation endpoint.
	///
	/// `expires_at = None` models a token without an expiry, which is never valid.
	pub fn new(value: impl Into<String>, expires_at: Option<OffsetDateTime>) -> Self {
		Self::for_config(&SigninConfig::default(), value, expires_at)
	}

	/// Wraps a token issued by the federation endpoint of `config`.
	pub fn for_config(
		config: &SigninConfig,
		value: impl Into<String>,
		expires_at: Option<OffsetDateTime>,
	) -> Self {
		Self {
			value: Secret::new(value),
			issued_at: None,
			expires_at,
			federation_endpoint: config.federation_endpoint().clone(),
		}
	}

	/// Stamps a freshly exchanged token with `issued_at` plus the configured validity window.
	pub(crate) fn issued(
		config: &SigninConfig,
		value: String,
		issued_at: OffsetDateTime,
	) -> Result<Self, SigninConfigError> {
		let expires_at = issued_at
			.checked_add(config.token_validity())
			.ok_or(SigninConfigError::ValidityTooLong { max: MAX_TOKEN_VALIDITY })?;

		Ok(Self {
			value: Secret::new(value),
			issued_at: Some(issued_at),
			expires_at: Some(expires_at),
			federation_endpoint: config.federation_endpoint().clone(),
		})
	}

	/// Token value. Callers must avoid logging it.
	pub fn value(&self) -> &Secret {
		&self.value
	}

	/// Instant the exchange response was parsed, for tokens produced by an exchange.
	pub fn issued_at(&self) -> Option<OffsetDateTime> {
		self.issued_at
	}

	/// Client-side deadline after which the token is unusable.
	pub fn expires_at(&self) -> Option<OffsetDateTime> {
		self.expires_at
	}

	/// Federation endpoint the login URL points at.
	pub fn federation_endpoint(&self) -> &Url {
		&self.federation_endpoint
	}

	/// Returns `true` if the token is non-empty and not yet expired.
	pub fn is_valid(&self) -> bool {
		self.is_valid_at(OffsetDateTime::now_utc())
	}

	/// Evaluates [`SigninToken::is_valid`] at the provided instant.
	pub fn is_valid_at(&self, instant: OffsetDateTime) -> bool {
		!self.value.is_empty() && self.expires_at.is_some_and(|deadline| deadline > instant)
	}

	/// Builds the browser-ready login URL landing on `destination`.
	///
	/// The token is checked first, so an empty or expired token never produces a URL. The
	/// destination must be an absolute URL with a host; it is embedded exactly as given, not in
	/// its normalized form. The assembled URL is parsed again before it is returned.
	pub fn sign_in_url(&self, destination: &str) -> Result<Url> {
		let stage = StageSpan::begin(StageKind::SignInUrl);
		let result = stage.in_scope(|| self.assemble_sign_in_url(destination));

		stage.finish(&result);

		result
	}

	fn assemble_sign_in_url(&self, destination: &str) -> Result<Url> {
		if !self.is_valid() {
			return Err(Error::InvalidToken);
		}

		parse_destination(destination).map_err(|source| Error::InvalidDestination { source })?;

		let raw = format!(
			"{}?Action=login&Destination={}&SigninToken={}",
			self.federation_endpoint,
			http::query_escape(destination),
			http::query_escape(self.value.expose()),
		);

		Url::parse(&raw).map_err(|source| Error::InvalidAssembledUrl { source })
	}
}

fn parse_destination(destination: &str) -> Result<(), DestinationError> {
	if !Url::parse(destination)?.has_host() {
		return Err(DestinationError::MissingHost { destination: destination.to_owned() });
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros;
	// self
	use super::*;

	const DESTINATION: &str = "https://console.example.com/ecr";

	fn valid_token() -> SigninToken {
		SigninToken::new("secret", Some(OffsetDateTime::now_utc() + Duration::minutes(5)))
	}

	#[test]
	fn validity_requires_value_and_future_expiry() {
		let now = macros::datetime!(2025-01-01 00:00 UTC);
		let cases = [
			("unset value", SigninToken::new("", Some(now + Duration::minutes(5))), false),
			("unset expiry", SigninToken::new("secret", None), false),
			("expired", SigninToken::new("secret", Some(now - Duration::minutes(5))), false),
			("expires now", SigninToken::new("secret", Some(now)), false),
			("valid", SigninToken::new("secret", Some(now + Duration::minutes(5))), true),
		];

		for (name, token, want) in cases {
			assert_eq!(token.is_valid_at(now), want, "case {name}");
		}

		assert!(valid_token().is_valid());
		assert!(!SigninToken::new("secret", Some(OffsetDateTime::UNIX_EPOCH)).is_valid());
	}

	#[test]
	fn invalid_tokens_never_produce_urls() {
		let expired =
			SigninToken::new("secret", Some(OffsetDateTime::now_utc() - Duration::minutes(5)));
		let empty = SigninToken::new("", Some(OffsetDateTime::now_utc() + Duration::minutes(5)));

		for token in [expired, empty, SigninToken::new("secret", None)] {
			for destination in [DESTINATION, "example.com", ""] {
				let err = token
					.sign_in_url(destination)
					.expect_err("Invalid tokens must not yield a sign-in URL.");

				assert!(matches!(err, Error::InvalidToken), "unexpected error: {err:?}");
			}
		}
	}

	#[test]
	fn malformed_destinations_are_rejected() {
		let token = valid_token();
		let err = token
			.sign_in_url("example.com")
			.expect_err("Destinations without a scheme must be rejected.");

		assert!(matches!(
			err,
			Error::InvalidDestination {
				source: DestinationError::Parse(url::ParseError::RelativeUrlWithoutBase)
			}
		));

		let err =
			token.sign_in_url("mailto:ops@example.com").expect_err("Hostless URLs must be rejected.");

		assert!(matches!(
			err,
			Error::InvalidDestination { source: DestinationError::MissingHost { .. } }
		));
	}

	#[test]
	fn sign_in_url_encodes_destination_and_token() {
		let expires_at = OffsetDateTime::now_utc() + Duration::minutes(5);
		let token = SigninToken::new("very secret+token/=", Some(expires_at));
		let url = token.sign_in_url(DESTINATION).expect("Valid token should yield a sign-in URL.");

		assert_eq!(url.scheme(), "https");
		assert_eq!(url.host_str(), Some("signin.aws.amazon.com"));
		assert_eq!(url.path(), "/federation");
		assert_eq!(
			url.query(),
			Some(
				"Action=login&Destination=https%3A%2F%2Fconsole.example.com%2Fecr\
				 &SigninToken=very+secret%2Btoken%2F%3D"
			),
		);

		let pairs = url.query_pairs().into_owned().collect::<Vec<_>>();

		assert_eq!(
			pairs,
			vec![
				("Action".into(), "login".into()),
				("Destination".into(), DESTINATION.into()),
				("SigninToken".into(), "very secret+token/=".into()),
			],
		);
	}

	#[test]
	fn destination_is_embedded_verbatim() {
		let destination = "https://Console.AWS.amazon.com:443";
		let url = valid_token()
			.sign_in_url(destination)
			.expect("Valid token should yield a sign-in URL.");

		assert!(
			url.as_str().contains("Destination=https%3A%2F%2FConsole.AWS.amazon.com%3A443&"),
			"unexpected URL: {url}"
		);
		assert!(url.query_pairs().any(|(k, v)| k == "Destination" && v == destination));
	}

	#[test]
	fn issued_tokens_never_overflow_the_calendar() {
		let config = SigninConfig::default();
		let issued_at = macros::datetime!(2025-01-01 00:00 UTC);
		let token = SigninToken::issued(&config, "secret".into(), issued_at)
			.expect("Default window should apply to an ordinary instant.");

		assert_eq!(token.expires_at(), Some(issued_at + Duration::minutes(15)));

		let end_of_calendar = OffsetDateTime::new_utc(time::Date::MAX, macros::time!(23:59));
		let err = SigninToken::issued(&config, "secret".into(), end_of_calendar)
			.expect_err("Expiry past the representable range must be an error.");

		assert_eq!(err, SigninConfigError::ValidityTooLong { max: MAX_TOKEN_VALIDITY });
	}

	#[test]
	fn sign_in_url_follows_configured_endpoint() {
		let config = SigninConfig::for_region("cn-north-1").expect("Region config should build.");
		let token = SigninToken::for_config(
			&config,
			"secret",
			Some(OffsetDateTime::now_utc() + Duration::minutes(5)),
		);
		let url = token.sign_in_url(DESTINATION).expect("Valid token should yield a sign-in URL.");

		assert_eq!(url.host_str(), Some("signin.amazonaws.cn"));
	}

	#[test]
	fn repeated_calls_are_idempotent() {
		let token = valid_token();
		let before = token.clone();
		let first = token.sign_in_url(DESTINATION).expect("First call should succeed.");
		let second = token.sign_in_url(DESTINATION).expect("Second call should succeed.");

		assert_eq!(first, second);
		assert_eq!(token.is_valid(), token.is_valid());
		assert_eq!(token, before);
	}

	#[test]
	fn debug_output_redacts_value() {
		let rendered = format!("{:?}", valid_token());

		assert!(!rendered.contains("\"secret\""));
		assert!(rendered.contains("<redacted>"));
	}
}
