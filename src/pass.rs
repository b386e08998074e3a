//! Pluggable identity passes.
//!
//! A [`Pass`] turns an inbound request into a proven [`Identity`] and may decorate the
//! response sent back once the identity is known. `google` implements the OAuth 2.0
//! authorization-code grant against Google; [`PassChain`] composes several passes so an
//! application can accept more than one identity source on the same route.

pub mod callback;
pub mod google;

pub use callback::*;
pub use google::*;

// self
use crate::{_prelude::*, auth::Identity, message::Message};

/// Boxed future returned by [`Pass::enter`].
pub type PassFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + 'a + Send>>;

/// Authentication strategy that proves who sent a request.
///
/// Implementors are required to be `Send + Sync` so one instance can serve concurrent requests;
/// they must not keep per-request state between calls.
pub trait Pass
where
	Self: Send + Sync,
{
	/// Inspects `request` and, when it completes a login handshake for this pass, runs whatever
	/// protocol exchange is required and returns the identity.
	///
	/// `Ok(None)` means the request is not for this pass; malformed handshake attempts fail.
	fn enter<'a>(&'a self, request: &'a dyn Message) -> PassFuture<'a, Option<Identity>>;

	/// Decorates the response about to be sent for `identity`.
	///
	/// The default implementation returns the response unchanged.
	fn exit(&self, response: Box<dyn Message>, _identity: &Identity) -> Result<Box<dyn Message>> {
		Ok(response)
	}
}

/// Tries each pass in order and returns the first identity produced.
///
/// Errors are not skipped: a pass that fails stops the chain, so a malformed handshake for one
/// provider is never masked by the next.
#[derive(Clone, Default)]
pub struct PassChain {
	passes: Vec<Arc<dyn Pass>>,
}
impl PassChain {
	/// Creates a chain from already shared passes.
	pub fn new<I>(passes: I) -> Self
	where
		I: IntoIterator<Item = Arc<dyn Pass>>,
	{
		Self { passes: passes.into_iter().collect() }
	}

	/// Appends a pass to the end of the chain.
	pub fn with(mut self, pass: impl 'static + Pass) -> Self {
		self.passes.push(Arc::new(pass));

		self
	}

	/// Number of passes in the chain.
	pub fn len(&self) -> usize {
		self.passes.len()
	}

	/// Returns true when the chain holds no passes.
	pub fn is_empty(&self) -> bool {
		self.passes.is_empty()
	}
}
impl Debug for PassChain {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("PassChain").field("passes", &self.passes.len()).finish()
	}
}
impl Pass for PassChain {
	fn enter<'a>(&'a self, request: &'a dyn Message) -> PassFuture<'a, Option<Identity>> {
		Box::pin(async move {
			for pass in &self.passes {
				if let Some(identity) = pass.enter(request).await? {
					return Ok(Some(identity));
				}
			}

			Ok(None)
		})
	}

	fn exit(&self, response: Box<dyn Message>, identity: &Identity) -> Result<Box<dyn Message>> {
		self.passes.iter().try_fold(response, |response, pass| pass.exit(response, identity))
	}
}
