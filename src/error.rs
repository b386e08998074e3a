//! Crate-level error types shared by the header index, the passes, and the transport layer.

// self
use crate::{_prelude::*, auth::IdentityError, head::HeaderLookupError, oauth::Hop};

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Identity or provider identifier failed validation.
	#[error(transparent)]
	Identity(#[from] IdentityError),
	/// The identity provider or the network between us failed.
	#[error(transparent)]
	Upstream(#[from] UpstreamError),
	/// A lazily explained header read went past the available values.
	#[error(transparent)]
	HeaderLookup(#[from] HeaderLookupError),

	/// The message head is empty or carries a line without a `:` separator.
	#[error("Malformed message: {reason}.")]
	MalformedMessage {
		/// Which part of the head failed to parse.
		reason: String,
	},
	/// A mandatory header is absent.
	#[error("Header \"{name}\" is mandatory, not found among {known:?}.")]
	MissingHeader {
		/// Requested header name, as supplied by the caller.
		name: String,
		/// Every lower-cased header name present in the message.
		known: Vec<String>,
	},
	/// The inbound request is a malformed login attempt or the provider refused the profile.
	#[error("Bad request: {reason}.")]
	BadRequest {
		/// Human-readable cause, embedding the provider's own message when one is available.
		reason: String,
	},
}
impl Error {
	/// Returns true when the failure is the caller's fault (the HTTP 400 class).
	pub fn is_client_error(&self) -> bool {
		matches!(
			self,
			Self::MalformedMessage { .. }
				| Self::MissingHeader { .. }
				| Self::HeaderLookup(_)
				| Self::BadRequest { .. }
		)
	}

	pub(crate) fn malformed(reason: impl Into<String>) -> Self {
		Self::MalformedMessage { reason: reason.into() }
	}

	pub(crate) fn bad_request(reason: impl Into<String>) -> Self {
		Self::BadRequest { reason: reason.into() }
	}
}

/// Configuration and validation failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] oauth2::http::Error),
	/// An endpoint base URL cannot carry path segments.
	#[error("The {endpoint} endpoint cannot be used as a base URL: {url}.")]
	InvalidEndpoint {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Endpoint URL that failed validation.
		url: String,
	},
	/// Redirect URI cannot be parsed.
	#[error("Redirect URI is invalid.")]
	InvalidRedirect {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Client identifier is empty.
	#[error("Client identifier cannot be empty.")]
	EmptyClientId,
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Failures reported by the identity provider's endpoints.
#[derive(Debug, ThisError)]
pub enum UpstreamError {
	/// Endpoint answered with an unexpected HTTP status.
	#[error("The {hop} endpoint returned HTTP {status}: {body}.")]
	Status {
		/// Round trip that failed.
		hop: Hop,
		/// HTTP status code.
		status: u16,
		/// Truncated response body.
		body: String,
		/// Retry-After hint from upstream, if supplied.
		retry_after: Option<Duration>,
	},
	/// Endpoint responded with JSON that could not be parsed.
	#[error("The {hop} endpoint returned malformed JSON.")]
	ResponseParse {
		/// Round trip that failed.
		hop: Hop,
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// Endpoint JSON omitted a field the pass cannot do without.
	#[error("The {hop} endpoint response is missing `{field}`.")]
	MissingField {
		/// Round trip that failed.
		hop: Hop,
		/// JSON field name.
		field: &'static str,
	},
	/// Transport failure (DNS, TCP, TLS) on either round trip.
	#[error(transparent)]
	Transport(#[from] TransportError),
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the {hop} endpoint.")]
	Network {
		/// Round trip that failed.
		hop: Hop,
		/// HTTP status captured before the failure, if any.
		status: Option<u16>,
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the {hop} endpoint.")]
	Io {
		/// Round trip that failed.
		hop: Hop,
		/// Underlying IO failure.
		#[source]
		source: std::io::Error,
	},
	/// HTTP client failed without a structured cause.
	#[error("HTTP client error occurred while calling the {hop} endpoint: {message}.")]
	Other {
		/// Round trip that failed.
		hop: Hop,
		/// HTTP status captured before the failure, if any.
		status: Option<u16>,
		/// Client-supplied description.
		message: String,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(
		hop: Hop,
		status: Option<u16>,
		src: impl 'static + Send + Sync + std::error::Error,
	) -> Self {
		Self::Network { hop, status, source: Box::new(src) }
	}

	/// HTTP status the upstream sent before the transport gave up, if any.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Network { status, .. } | Self::Other { status, .. } => *status,
			Self::Io { .. } => None,
		}
	}
}
impl From<TransportError> for Error {
	fn from(e: TransportError) -> Self {
		Self::Upstream(e.into())
	}
}
