// self
use crate::obs::{StageKind, StageOutcome};

/// Name of the counter incremented once per stage attempt and once per stage outcome.
pub const STAGE_COUNTER: &str = "console_signin_stage_total";

/// Increments [`STAGE_COUNTER`] labeled by `stage` and `outcome`.
///
/// Without the `metrics` feature this compiles to nothing. With it, the increment goes to
/// whichever recorder the application installed; no recorder means no effect.
pub fn record_stage_outcome(kind: StageKind, outcome: StageOutcome) {
	#[cfg(feature = "metrics")]
	metrics::counter!(STAGE_COUNTER, "stage" => kind.as_str(), "outcome" => outcome.as_str())
		.increment(1);

	#[cfg(not(feature = "metrics"))]
	let _ = (kind, outcome);
}
