//! Head parsing into a case-insensitive multimap.

// self
use crate::{_prelude::*, head::HeaderValues, message::Message};

/// Anything that can answer header lookups for a message.
///
/// Implementations must be immutable: every call observes the same head, and callers that need
/// several lookups against one parse should grab a [`HeaderMap`] instead.
pub trait HeaderSource
where
	Self: Message,
{
	/// Returns every value recorded for `name`, compared case-insensitively.
	///
	/// An absent header yields an empty [`HeaderValues`] rather than an error; the error only
	/// surfaces if the caller later reads from it.
	fn header(&self, name: &str) -> Result<HeaderValues>;

	/// Returns the set of lower-cased header names present in the head.
	fn names(&self) -> Result<BTreeSet<String>>;
}

/// Lower-cased header name mapped to its values in line order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HeaderMap(BTreeMap<String, Vec<String>>);
impl HeaderMap {
	/// Parses raw head lines; the first line (request/status line) is skipped.
	pub fn parse<I, S>(head: I) -> Result<Self>
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let mut lines = head.into_iter();

		if lines.next().is_none() {
			return Err(Error::malformed("head must contain at least one line"));
		}

		let mut map = BTreeMap::<String, Vec<String>>::new();

		for line in lines {
			let line = line.as_ref();
			let Some((name, value)) = line.split_once(':') else {
				return Err(Error::malformed(format!("invalid header: {line}")));
			};

			map.entry(name.trim().to_lowercase()).or_default().push(value.trim().to_owned());
		}

		Ok(Self(map))
	}

	/// Values recorded for `name`; empty when the header is absent.
	pub fn get(&self, name: &str) -> &[String] {
		self.0.get(&name.to_lowercase()).map(Vec::as_slice).unwrap_or_default()
	}

	/// Returns true if at least one value exists for `name`.
	pub fn contains(&self, name: &str) -> bool {
		self.0.contains_key(&name.to_lowercase())
	}

	/// Lower-cased header names in sorted order.
	pub fn names(&self) -> impl Iterator<Item = &str> {
		self.0.keys().map(String::as_str)
	}

	/// Number of distinct header names.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Returns true when the head carried no header lines.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

/// Header index over a message; every lookup re-parses the message head.
///
/// ```
/// use oauth2_pass::{
/// 	head::{HeaderIndex, HeaderSource},
/// 	message::RawMessage,
/// };
///
/// let index = HeaderIndex::new(RawMessage::new([
/// 	"HTTP/1.1 200 OK",
/// 	"Set-Cookie: a=1",
/// 	"set-cookie: b=2",
/// ]));
/// let cookies = index.header("SET-COOKIE").unwrap();
///
/// assert_eq!(cookies.as_slice(), ["a=1", "b=2"]);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeaderIndex<M> {
	message: M,
}
impl<M> HeaderIndex<M>
where
	M: Message,
{
	/// Wraps `message` without parsing it.
	pub fn new(message: M) -> Self {
		Self { message }
	}

	/// Parses the wrapped head once, for callers that want to cache the result.
	pub fn map(&self) -> Result<HeaderMap> {
		HeaderMap::parse(self.message.head()?)
	}

	/// Returns the wrapped message.
	pub fn into_inner(self) -> M {
		self.message
	}
}
impl<M> Message for HeaderIndex<M>
where
	M: Message,
{
	fn head(&self) -> Result<Vec<String>> {
		self.message.head()
	}

	fn body(&self) -> Result<&[u8]> {
		self.message.body()
	}
}
impl<M> HeaderSource for HeaderIndex<M>
where
	M: Message,
{
	fn header(&self, name: &str) -> Result<HeaderValues> {
		Ok(HeaderValues::new(name, Arc::new(self.map()?)))
	}

	fn names(&self) -> Result<BTreeSet<String>> {
		Ok(self.map()?.0.into_keys().collect())
	}
}
