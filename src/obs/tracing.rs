// self
use crate::{_prelude::*, obs::FlowStage};

/// Future returned by [`FlowSpan::instrument`]; a plain passthrough when tracing is disabled.
#[cfg(feature = "tracing")]
pub type InstrumentedFlow<F> = tracing::instrument::Instrumented<F>;
/// Future returned by [`FlowSpan::instrument`]; a plain passthrough when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedFlow<F> = F;

/// Span around one public call of a pass.
///
/// `pass` names the provider and `entry` the call site, so spans emitted by several passes of
/// one [`crate::pass::PassChain`] stay apart. The `stage` field starts empty and follows the
/// flow as [`FlowSpan::record_stage`] is called, leaving the last stage reached on the span
/// when a login fails.
#[derive(Clone, Debug)]
pub struct FlowSpan {
	pass: &'static str,
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl FlowSpan {
	/// Opens a span for the `entry` call of the `pass` provider.
	pub fn new(pass: &'static str, entry: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!(
				"oauth2_pass.flow",
				pass,
				entry,
				stage = tracing::field::Empty
			);

			Self { pass, span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = entry;

			Self { pass }
		}
	}

	/// Provider name the span was opened for.
	pub fn pass(&self) -> &'static str {
		self.pass
	}

	/// Marks `stage` as the step the flow is currently in.
	pub fn record_stage(&self, stage: FlowStage) {
		#[cfg(feature = "tracing")]
		{
			self.span.record("stage", stage.as_str());
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = stage;
		}
	}

	/// Enters the span for synchronous sections such as building a login link.
	pub fn entered(self) -> FlowSpanGuard {
		#[cfg(feature = "tracing")]
		{
			FlowSpanGuard { guard: self.span.entered() }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = self;

			FlowSpanGuard {}
		}
	}

	/// Runs `fut` inside the span without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedFlow<Fut>
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
}

/// Guard returned by [`FlowSpan::entered`]; the span is exited on drop.
pub struct FlowSpanGuard {
	#[cfg(feature = "tracing")]
	#[allow(dead_code)]
	guard: tracing::span::EnteredSpan,
}
impl Debug for FlowSpanGuard {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("FlowSpanGuard(..)")
	}
}
