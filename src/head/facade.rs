//! Single-value lookups layered over any [`HeaderSource`].

// self
use crate::{
	_prelude::*,
	head::{HeaderIndex, HeaderSource, HeaderValues},
	message::Message,
};

/// Adds mandatory and defaulted single-value lookups to a header source.
///
/// The facade performs no parsing of its own; `header`, `names`, `head`, and `body` are passed
/// through to the wrapped source unchanged.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeaderFacade<S> {
	origin: S,
}
impl<M> HeaderFacade<HeaderIndex<M>>
where
	M: Message,
{
	/// Wraps a plain message in a [`HeaderIndex`] first.
	pub fn from_message(message: M) -> Self {
		Self::new(HeaderIndex::new(message))
	}
}
impl<S> HeaderFacade<S>
where
	S: HeaderSource,
{
	/// Wraps an existing header source.
	pub fn new(origin: S) -> Self {
		Self { origin }
	}

	/// First value of `name`, failing with [`Error::MissingHeader`] when there is none.
	pub fn single(&self, name: &str) -> Result<String> {
		match self.origin.header(name)?.first() {
			Some(value) => Ok(value.to_owned()),
			None => Err(Error::MissingHeader {
				name: name.to_owned(),
				known: self.origin.names()?.into_iter().collect(),
			}),
		}
	}

	/// First value of `name`, or `default` verbatim when there is none.
	///
	/// Absence never fails; only a malformed head does.
	pub fn single_or(&self, name: &str, default: &str) -> Result<String> {
		Ok(self.origin.header(name)?.first().unwrap_or(default).to_owned())
	}

	/// Returns the wrapped source.
	pub fn into_inner(self) -> S {
		self.origin
	}
}
impl<S> Message for HeaderFacade<S>
where
	S: HeaderSource,
{
	fn head(&self) -> Result<Vec<String>> {
		self.origin.head()
	}

	fn body(&self) -> Result<&[u8]> {
		self.origin.body()
	}
}
impl<S> HeaderSource for HeaderFacade<S>
where
	S: HeaderSource,
{
	fn header(&self, name: &str) -> Result<HeaderValues> {
		self.origin.header(name)
	}

	fn names(&self) -> Result<BTreeSet<String>> {
		self.origin.names()
	}
}
