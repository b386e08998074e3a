//! Line-oriented view of HTTP messages.
//!
//! A [`Message`] exposes the ordered head lines (request or status line first, then one line per
//! header) and the body bytes. [`RawMessage`] is the owned form used by callers that already hold
//! text lines; the `oauth2::http` request/response types implement the trait by synthesizing their
//! heads, so responses returned by a [`ProviderHttpClient`](crate::http::ProviderHttpClient) are
//! readable through the same header index as inbound requests.

// crates.io
use oauth2::http::{HeaderMap as HttpHeaderMap, Request as HttpRequest, Response as HttpResponse};
// self
use crate::_prelude::*;

/// HTTP message with a line-oriented head and a byte body.
pub trait Message
where
	Self: Send + Sync,
{
	/// Ordered head lines; line 0 is the request/status line.
	fn head(&self) -> Result<Vec<String>>;

	/// Body bytes following the head.
	fn body(&self) -> Result<&[u8]>;
}
impl<M> Message for &M
where
	M: ?Sized + Message,
{
	fn head(&self) -> Result<Vec<String>> {
		(**self).head()
	}

	fn body(&self) -> Result<&[u8]> {
		(**self).body()
	}
}
impl<M> Message for Box<M>
where
	M: ?Sized + Message,
{
	fn head(&self) -> Result<Vec<String>> {
		(**self).head()
	}

	fn body(&self) -> Result<&[u8]> {
		(**self).body()
	}
}

/// Owned message built from raw head lines.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawMessage {
	/// Head lines in wire order.
	pub head: Vec<String>,
	/// Body bytes.
	pub body: Vec<u8>,
}
impl RawMessage {
	/// Creates a body-less message from its head lines.
	pub fn new<I, S>(head: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self { head: head.into_iter().map(Into::into).collect(), body: Vec::new() }
	}

	/// Replaces the body.
	pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
		self.body = body.into();

		self
	}
}
impl Message for RawMessage {
	fn head(&self) -> Result<Vec<String>> {
		Ok(self.head.clone())
	}

	fn body(&self) -> Result<&[u8]> {
		Ok(&self.body)
	}
}

impl Message for HttpRequest<Vec<u8>> {
	fn head(&self) -> Result<Vec<String>> {
		let line = format!("{} {} {:?}", self.method(), self.uri(), self.version());

		Ok(head_lines(line, self.headers()))
	}

	fn body(&self) -> Result<&[u8]> {
		Ok(self.body().as_slice())
	}
}

impl Message for HttpResponse<Vec<u8>> {
	fn head(&self) -> Result<Vec<String>> {
		let line = format!("{:?} {}", self.version(), self.status());

		Ok(head_lines(line, self.headers()))
	}

	fn body(&self) -> Result<&[u8]> {
		Ok(self.body().as_slice())
	}
}

fn head_lines(first: String, headers: &HttpHeaderMap) -> Vec<String> {
	let mut lines = Vec::with_capacity(headers.len() + 1);

	lines.push(first);

	for (name, value) in headers {
		lines.push(format!("{name}: {}", String::from_utf8_lossy(value.as_bytes())));
	}

	lines
}
