//! Callback URL reconstruction for inbound redirects.

// self
use crate::{_prelude::*, head::HeaderFacade, message::Message};

const DEFAULT_HOST: &str = "localhost";

/// Rebuilds the absolute URL of an inbound request from its request line and `Host` header.
///
/// Absolute-form targets (`GET https://host/path HTTP/1.1`) are used as-is; origin-form targets
/// are resolved against `http://<host>/`, with the host defaulting to `localhost`.
pub fn request_url(request: &dyn Message) -> Result<Url> {
	let head = request.head()?;
	let line = head
		.first()
		.ok_or_else(|| Error::malformed("head must contain at least one line"))?;
	let target = line
		.split_whitespace()
		.nth(1)
		.ok_or_else(|| Error::malformed(format!("request line has no target: {line}")))?;

	if let Ok(url) = Url::parse(target) {
		return Ok(url);
	}

	let host = HeaderFacade::from_message(request).single_or("host", DEFAULT_HOST)?;
	let base = Url::parse(&format!("http://{host}/"))
		.map_err(|_| Error::malformed(format!("invalid host: {host}")))?;

	base.join(target).map_err(|_| Error::malformed(format!("invalid request target: {target}")))
}

/// First value of the query parameter `name`, percent-decoded.
pub fn query_param(url: &Url, name: &str) -> Option<String> {
	url.query_pairs().find(|(key, _)| key == name).map(|(_, value)| value.into_owned())
}
