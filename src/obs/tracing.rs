// self
use crate::{
	_prelude::*,
	obs::{StageKind, StageOutcome, record_stage_outcome},
};

/// Future returned by [`StageSpan::instrument`]; the bare future when tracing is compiled out.
#[cfg(feature = "tracing")]
pub type InstrumentedStage<F> = tracing::instrument::Instrumented<F>;
/// Future returned by [`StageSpan::instrument`]; the bare future when tracing is compiled out.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedStage<F> = F;

/// Lifecycle of one pipeline stage: credential request, token exchange, or URL assembly.
///
/// [`StageSpan::begin`] counts the attempt and opens a `console_signin.stage` span labeled with
/// the stage. [`StageSpan::finish`] fills the span's `outcome` field, counts the outcome, and on
/// failure emits a `warn` event inside the span. Errors reach the event through their `Display`
/// output only, which never includes credential or token material.
#[derive(Debug)]
pub struct StageSpan {
	kind: StageKind,
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl StageSpan {
	/// Opens the span for `kind` and records the attempt.
	pub fn begin(kind: StageKind) -> Self {
		record_stage_outcome(kind, StageOutcome::Attempt);

		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!(
				"console_signin.stage",
				stage = kind.as_str(),
				outcome = tracing::field::Empty,
			);

			Self { kind, span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			Self { kind }
		}
	}

	/// Stage this span covers.
	pub fn kind(&self) -> StageKind {
		self.kind
	}

	/// Runs synchronous work, such as URL assembly, inside the span.
	pub fn in_scope<T>(&self, f: impl FnOnce() -> T) -> T {
		#[cfg(feature = "tracing")]
		{
			self.span.in_scope(f)
		}
		#[cfg(not(feature = "tracing"))]
		{
			f()
		}
	}

	/// Attaches the span to an async stage without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedStage<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}

	/// Closes the stage with the outcome of `result`.
	pub(crate) fn finish<T>(&self, result: &Result<T>) {
		let outcome = if result.is_ok() { StageOutcome::Success } else { StageOutcome::Failure };

		record_stage_outcome(self.kind, outcome);

		#[cfg(feature = "tracing")]
		{
			self.span.record("outcome", outcome.as_str());

			if let Err(e) = result {
				self.span.in_scope(|| tracing::warn!(error = %e, "Console sign-in stage failed."));
			}
		}
	}
}
