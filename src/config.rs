//! Sign-in endpoint configuration and its validating builder.
//!
//! [`SigninConfig`] pins the federation endpoint used for both the `getSigninToken` exchange and
//! the final `login` URL, together with the client-side validity window stamped on every
//! exchanged token. The console domain defaults to the commercial partition; use
//! [`SigninConfig::for_region`] to follow the partition of a region, or the builder to point at a
//! custom endpoint.

// self
use crate::_prelude::*;

/// Console domain of the commercial partition.
pub const DEFAULT_CONSOLE_DOMAIN: &str = "aws.amazon.com";
/// Client-side validity assumed for a freshly exchanged sign-in token.
pub const DEFAULT_TOKEN_VALIDITY: Duration = Duration::minutes(15);
/// Longest accepted token validity window; matches the longest federation session STS issues.
pub const MAX_TOKEN_VALIDITY: Duration = Duration::hours(36);

/// Errors raised while constructing or validating a [`SigninConfig`].
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum SigninConfigError {
	/// Console domain does not yield a valid federation URL.
	#[error("Console domain `{domain}` does not form a valid federation URL.")]
	InvalidDomain {
		/// Rejected console domain.
		domain: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Federation endpoint must use HTTPS (plain HTTP is accepted for loopback hosts only).
	#[error("The federation endpoint must use HTTPS: {url}.")]
	InsecureEndpoint {
		/// Endpoint URL that failed validation.
		url: String,
	},
	/// Federation endpoint already carries a query string or fragment.
	#[error("The federation endpoint must not carry a query or fragment: {url}.")]
	EndpointHasQuery {
		/// Endpoint URL that failed validation.
		url: String,
	},
	/// Token validity window must be positive.
	#[error("The token validity window must be positive.")]
	NonPositiveValidity,
	/// Token validity window exceeds the accepted maximum, or cannot be applied to the issue time.
	#[error("The token validity window must not exceed {max}.")]
	ValidityTooLong {
		/// Longest accepted window.
		max: Duration,
	},
}

/// Immutable sign-in configuration consumed by the exchanger and the sign-in token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SigninConfig {
	federation_endpoint: Url,
	token_validity: Duration,
}
impl SigninConfig {
	/// Creates a new builder seeded with the defaults.
	pub fn builder() -> SigninConfigBuilder {
		SigninConfigBuilder::default()
	}

	/// Returns the configuration for the partition that owns `region`.
	pub fn for_region(region: &str) -> Result<Self, SigninConfigError> {
		Self::builder().console_domain(console_domain_for_region(region)).build()
	}

	/// Federation endpoint, without query parameters.
	pub fn federation_endpoint(&self) -> &Url {
		&self.federation_endpoint
	}

	/// Validity window stamped on exchanged tokens.
	pub fn token_validity(&self) -> Duration {
		self.token_validity
	}
}
impl Default for SigninConfig {
	fn default() -> Self {
		Self {
			federation_endpoint: federation_url(DEFAULT_CONSOLE_DOMAIN)
				.expect("Default console domain must form a valid federation URL."),
			token_validity: DEFAULT_TOKEN_VALIDITY,
		}
	}
}

/// Builder for [`SigninConfig`] values.
#[derive(Debug)]
pub struct SigninConfigBuilder {
	/// Console domain used to derive `https://signin.<domain>/federation`.
	pub console_domain: String,
	/// Explicit federation endpoint; takes precedence over `console_domain`.
	pub federation_endpoint: Option<Url>,
	/// Validity window stamped on exchanged tokens.
	pub token_validity: Duration,
}
impl SigninConfigBuilder {
	/// Sets the console domain (e.g. `amazonaws.cn`).
	pub fn console_domain(mut self, domain: impl Into<String>) -> Self {
		self.console_domain = domain.into();

		self
	}

	/// Points the exchanger at an explicit federation endpoint.
	pub fn federation_endpoint(mut self, url: Url) -> Self {
		self.federation_endpoint = Some(url);

		self
	}

	/// Overrides the client-side token validity window.
	pub fn token_validity(mut self, validity: Duration) -> Self {
		self.token_validity = validity;

		self
	}

	/// Consumes the builder and validates the resulting configuration.
	pub fn build(self) -> Result<SigninConfig, SigninConfigError> {
		let federation_endpoint = match self.federation_endpoint {
			Some(url) => url,
			None => federation_url(&self.console_domain).map_err(|source| {
				SigninConfigError::InvalidDomain { domain: self.console_domain.clone(), source }
			})?,
		};
		let config = SigninConfig { federation_endpoint, token_validity: self.token_validity };

		config.validate()?;

		Ok(config)
	}
}
impl Default for SigninConfigBuilder {
	fn default() -> Self {
		Self {
			console_domain: DEFAULT_CONSOLE_DOMAIN.into(),
			federation_endpoint: None,
			token_validity: DEFAULT_TOKEN_VALIDITY,
		}
	}
}

impl SigninConfig {
	fn validate(&self) -> Result<(), SigninConfigError> {
		validate_endpoint(&self.federation_endpoint)?;

		if !self.token_validity.is_positive() {
			return Err(SigninConfigError::NonPositiveValidity);
		}
		if self.token_validity > MAX_TOKEN_VALIDITY {
			return Err(SigninConfigError::ValidityTooLong { max: MAX_TOKEN_VALIDITY });
		}

		Ok(())
	}
}

fn federation_url(domain: &str) -> Result<Url, url::ParseError> {
	let url = Url::parse(&format!("https://signin.{domain}/federation"))?;

	// A domain smuggling a path, query, or credentials would silently change the endpoint.
	if url.path() != "/federation" || url.query().is_some() || !url.username().is_empty() {
		return Err(url::ParseError::InvalidDomainCharacter);
	}

	Ok(url)
}

fn validate_endpoint(url: &Url) -> Result<(), SigninConfigError> {
	if url.query().is_some() || url.fragment().is_some() {
		return Err(SigninConfigError::EndpointHasQuery { url: url.to_string() });
	}

	match url.scheme() {
		"https" => Ok(()),
		"http" if is_loopback(url) => Ok(()),
		_ => Err(SigninConfigError::InsecureEndpoint { url: url.to_string() }),
	}
}

fn is_loopback(url: &Url) -> bool {
	match url.host() {
		Some(url::Host::Domain(domain)) => domain == "localhost",
		Some(url::Host::Ipv4(ip)) => ip.is_loopback(),
		Some(url::Host::Ipv6(ip)) => ip.is_loopback(),
		None => false,
	}
}

fn console_domain_for_region(region: &str) -> &'static str {
	match region {
		r if r.starts_with("us-gov-") => "amazonaws-us-gov.com",
		r if r.starts_with("cn-") => "amazonaws.cn",
		_ => DEFAULT_CONSOLE_DOMAIN,
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn defaults_target_commercial_partition() {
		let config = SigninConfig::default();

		assert_eq!(config.federation_endpoint().as_str(), "https://signin.aws.amazon.com/federation");
		assert_eq!(config.token_validity(), Duration::minutes(15));
		assert_eq!(SigninConfig::builder().build(), Ok(config));
	}

	#[test]
	fn regions_map_to_partition_domains() {
		let cases = [
			("us-east-1", "https://signin.aws.amazon.com/federation"),
			("us-gov-west-1", "https://signin.amazonaws-us-gov.com/federation"),
			("cn-north-1", "https://signin.amazonaws.cn/federation"),
		];

		for (region, expected) in cases {
			let config = SigninConfig::for_region(region).expect("Region config should build.");

			assert_eq!(config.federation_endpoint().as_str(), expected, "region {region}");
		}
	}

	#[test]
	fn builder_rejects_unsafe_endpoints() {
		let err = SigninConfig::builder()
			.federation_endpoint(
				Url::parse("http://signin.example.com/federation").expect("URL should parse."),
			)
			.build()
			.expect_err("Plain HTTP to a remote host must be rejected.");

		assert!(matches!(err, SigninConfigError::InsecureEndpoint { .. }));

		let err = SigninConfig::builder()
			.federation_endpoint(
				Url::parse("https://signin.example.com/federation?Action=login")
					.expect("URL should parse."),
			)
			.build()
			.expect_err("Endpoints carrying a query must be rejected.");

		assert!(matches!(err, SigninConfigError::EndpointHasQuery { .. }));

		let config = SigninConfig::builder()
			.federation_endpoint(
				Url::parse("http://127.0.0.1:8080/federation").expect("URL should parse."),
			)
			.build()
			.expect("Loopback HTTP endpoints are allowed for local testing.");

		assert_eq!(config.federation_endpoint().port(), Some(8080));
	}

	#[test]
	fn builder_rejects_bad_domains_and_validity() {
		let err = SigninConfig::builder()
			.console_domain("evil.example.com/phish?")
			.build()
			.expect_err("Domains smuggling a path must be rejected.");

		assert!(matches!(err, SigninConfigError::InvalidDomain { .. }));

		let err = SigninConfig::builder()
			.token_validity(Duration::ZERO)
			.build()
			.expect_err("Zero validity must be rejected.");

		assert_eq!(err, SigninConfigError::NonPositiveValidity);
	}

	#[test]
	fn builder_bounds_validity_window() {
		for validity in [Duration::MAX, MAX_TOKEN_VALIDITY + Duration::SECOND] {
			let err = SigninConfig::builder()
				.token_validity(validity)
				.build()
				.expect_err("Oversized validity windows must be rejected.");

			assert_eq!(err, SigninConfigError::ValidityTooLong { max: MAX_TOKEN_VALIDITY });
		}

		let config = SigninConfig::builder()
			.token_validity(MAX_TOKEN_VALIDITY)
			.build()
			.expect("The maximum window itself is accepted.");

		assert_eq!(config.token_validity(), Duration::hours(36));
	}
}
