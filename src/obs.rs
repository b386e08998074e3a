//! Optional observability helpers for pass flows.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `oauth2_pass.flow` with the `pass` (provider)
//!   and `entry` (call site) fields.
//!   A `stage` field tracks the step the flow has reached.
//! - Enable `metrics` to increment the `oauth2_pass_flow_total` counter for every
//!   attempt/success/failure, labeled by `pass`, `stage` and `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Steps of the authorization-code state machine run by one `enter()` call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowStage {
	/// Reading the authorization code from the callback request.
	AwaitingCode,
	/// Exchanging the code for an access token.
	ExchangingToken,
	/// Fetching the profile with the access token.
	FetchingProfile,
	/// Normalizing the profile into an identity.
	ParsingProfile,
}
impl FlowStage {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowStage::AwaitingCode => "awaiting_code",
			FlowStage::ExchangingToken => "exchanging_token",
			FlowStage::FetchingProfile => "fetching_profile",
			FlowStage::ParsingProfile => "parsing_profile",
		}
	}
}
impl Display for FlowStage {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowOutcome {
	/// Entry to a stage.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl FlowOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowOutcome::Attempt => "attempt",
			FlowOutcome::Success => "success",
			FlowOutcome::Failure => "failure",
		}
	}
}
impl Display for FlowOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Moves `span` to `stage`, records the attempt, runs `fut`, then records its outcome.
pub(crate) async fn observe_stage<T, Fut>(
	span: &FlowSpan,
	stage: FlowStage,
	fut: Fut,
) -> Result<T>
where
	Fut: Future<Output = Result<T>>,
{
	span.record_stage(stage);
	record_flow_outcome(span.pass(), stage, FlowOutcome::Attempt);

	let result = fut.await;
	let outcome = if result.is_ok() { FlowOutcome::Success } else { FlowOutcome::Failure };

	record_flow_outcome(span.pass(), stage, outcome);

	result
}
