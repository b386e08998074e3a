// self
use crate::obs::{FlowOutcome, FlowStage};

/// Counts one `outcome` of `stage` for the `pass` provider on the global metrics recorder.
///
/// Every stage records an attempt before it runs and a success or failure after, so the
/// `failure` series of a stage tells which round trip of a login broke.
pub fn record_flow_outcome(pass: &'static str, stage: FlowStage, outcome: FlowOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"oauth2_pass_flow_total",
			"pass" => pass,
			"stage" => stage.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (pass, stage, outcome);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn every_stage_and_outcome_can_be_recorded() {
		for stage in [
			FlowStage::AwaitingCode,
			FlowStage::ExchangingToken,
			FlowStage::FetchingProfile,
			FlowStage::ParsingProfile,
		] {
			for outcome in [FlowOutcome::Attempt, FlowOutcome::Success, FlowOutcome::Failure] {
				record_flow_outcome("google", stage, outcome);
			}
		}
	}
}
