//! Stage-level observability for the sign-in pipeline.
//!
//! Each of the three stages opens a [`StageSpan`] on entry and closes it with its result.
//!
//! # Feature Flags
//!
//! - `tracing` runs every stage inside a `console_signin.stage` span carrying `stage` and
//!   `outcome` fields, and emits a `warn` event when a stage fails.
//! - `metrics` increments [`STAGE_COUNTER`] for each attempt and each outcome.

mod metrics;
mod tracing;

pub use self::metrics::*;
pub use self::tracing::*;

// self
use crate::_prelude::*;

/// Pipeline stages observed by the crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StageKind {
	/// Scoped-credential request against the identity service.
	ScopedCredentials,
	/// Federation `getSigninToken` exchange.
	TokenExchange,
	/// Login URL assembly.
	SignInUrl,
}
impl StageKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			StageKind::ScopedCredentials => "scoped_credentials",
			StageKind::TokenExchange => "token_exchange",
			StageKind::SignInUrl => "sign_in_url",
		}
	}
}
impl Display for StageKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StageOutcome {
	/// Entry to a pipeline stage.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl StageOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			StageOutcome::Attempt => "attempt",
			StageOutcome::Success => "success",
			StageOutcome::Failure => "failure",
		}
	}
}
impl Display for StageOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
