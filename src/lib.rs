//! Scoped, short-lived AWS console sign-in links: trade federation credentials for a single-use
//! sign-in token, then embed that token in a time-bounded URL.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod config;
pub mod console;
pub mod error;
pub mod exchange;
pub mod http;
pub mod identity;
pub mod obs;
#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience re-exports and deterministic stubs for tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// std
	use std::sync::atomic::{AtomicUsize, Ordering};
	// self
	use crate::{
		auth::{ScopedCredential, ScopedCredentialRequest},
		error::TransportError,
		http::{HttpFuture, HttpResponse, ResponseBody, SigninHttpClient},
		identity::{IdentityFuture, IdentityService},
	};

	/// Identity service stub that always issues the same credential triple.
	#[derive(Debug, Default)]
	pub struct StaticIdentityService {
		triple: Option<(String, String, String)>,
		calls: AtomicUsize,
	}
	impl StaticIdentityService {
		/// Issues the provided triple for every request.
		pub fn issuing(
			access_key_id: impl Into<String>,
			secret_access_key: impl Into<String>,
			session_token: impl Into<String>,
		) -> Self {
			Self {
				triple: Some((access_key_id.into(), secret_access_key.into(), session_token.into())),
				calls: AtomicUsize::new(0),
			}
		}

		/// Rejects every request as if the upstream service were unavailable.
		pub fn unavailable() -> Self {
			Self::default()
		}

		/// Returns how many requests reached the stub.
		pub fn calls(&self) -> usize {
			self.calls.load(Ordering::SeqCst)
		}
	}
	impl IdentityService for StaticIdentityService {
		fn issue_scoped_credentials<'a>(
			&'a self,
			_request: &'a ScopedCredentialRequest,
		) -> IdentityFuture<'a> {
			self.calls.fetch_add(1, Ordering::SeqCst);

			Box::pin(async move {
				let (access_key_id, secret_access_key, session_token) = self
					.triple
					.clone()
					.ok_or_else(|| BoxError::from("Identity service is unavailable."))?;

				Ok(ScopedCredential::new(access_key_id, secret_access_key, session_token)?)
			})
		}
	}

	/// Read/release counters shared between a [`StaticHttpClient`] and its bodies.
	#[derive(Debug, Default)]
	pub struct BodyLedger {
		requests: AtomicUsize,
		reads: AtomicUsize,
		releases: AtomicUsize,
	}
	impl BodyLedger {
		/// Number of GET requests dispatched.
		pub fn requests(&self) -> usize {
			self.requests.load(Ordering::SeqCst)
		}

		/// Number of times a response body was read.
		pub fn reads(&self) -> usize {
			self.reads.load(Ordering::SeqCst)
		}

		/// Number of response bodies released.
		pub fn releases(&self) -> usize {
			self.releases.load(Ordering::SeqCst)
		}
	}

	/// Transport stub that answers every GET with a canned status and body.
	#[derive(Clone, Debug)]
	pub struct StaticHttpClient {
		outcome: Result<(u16, Vec<u8>), &'static str>,
		ledger: Arc<BodyLedger>,
	}
	impl StaticHttpClient {
		/// Replies with HTTP 200 and the provided body.
		pub fn ok(body: impl Into<Vec<u8>>) -> Self {
			Self::with_status(200, body)
		}

		/// Replies with an arbitrary status and body.
		pub fn with_status(status: u16, body: impl Into<Vec<u8>>) -> Self {
			Self { outcome: Ok((status, body.into())), ledger: Default::default() }
		}

		/// Fails every request before a response exists.
		pub fn unreachable(reason: &'static str) -> Self {
			Self { outcome: Err(reason), ledger: Default::default() }
		}

		/// Shared counters for requests, body reads, and body releases.
		pub fn ledger(&self) -> Arc<BodyLedger> {
			self.ledger.clone()
		}
	}
	impl SigninHttpClient for StaticHttpClient {
		type Body = StaticBody;

		fn get<'a>(&'a self, _url: &'a Url) -> HttpFuture<'a, HttpResponse<Self::Body>> {
			self.ledger.requests.fetch_add(1, Ordering::SeqCst);

			Box::pin(async move {
				let (status, bytes) = self.outcome.clone().map_err(|reason| {
					TransportError::network(std::io::Error::new(
						std::io::ErrorKind::ConnectionRefused,
						reason,
					))
				})?;

				Ok(HttpResponse { status, body: StaticBody { bytes, ledger: self.ledger.clone() } })
			})
		}
	}

	/// Body handed out by [`StaticHttpClient`]; records reads and releases.
	#[derive(Debug)]
	pub struct StaticBody {
		bytes: Vec<u8>,
		ledger: Arc<BodyLedger>,
	}
	impl ResponseBody for StaticBody {
		fn read_to_end(self) -> HttpFuture<'static, Vec<u8>> {
			Box::pin(async move {
				let reads = self.ledger.reads.fetch_add(1, Ordering::SeqCst) + 1;

				assert!(reads <= self.ledger.requests(), "Response body must be read at most once.");

				Ok(self.bytes.clone())
			})
		}
	}
	impl Drop for StaticBody {
		fn drop(&mut self) {
			self.ledger.releases.fetch_add(1, Ordering::SeqCst);
		}
	}
}

mod _prelude {
	pub use std::{
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{BoxError, Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {aws_sdk_sts as _, aws_smithy_mocks as _, color_eyre as _, httpmock as _};
