//! Outbound round trips of the authorization-code flow.
//!
//! [`CodeFlowFacade`] owns the transport and the error mapper and knows how to run the two
//! calls every authorization-code pass needs: a form-encoded token exchange and an
//! access-token-authorized profile fetch. Provider-specific URLs and payload shapes stay in the
//! pass that uses it.

pub use oauth2;

// crates.io
use oauth2::{
	AsyncHttpClient, HttpClientError, HttpRequest, HttpResponse,
	http::{
		Method, Request, StatusCode,
		header::{ACCEPT, CONTENT_TYPE},
	},
};
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	auth::Secret,
	error::{ConfigError, TransportError, UpstreamError},
	http::{ProviderHttpClient, ResponseMetadata, ResponseMetadataSlot},
};

const BODY_PREVIEW_LIMIT: usize = 256;

/// Outbound round trip of the authorization-code flow.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Hop {
	/// Authorization code exchanged for an access token.
	Token,
	/// Profile fetched with the access token.
	Profile,
}
impl Hop {
	/// Returns a stable label suitable for messages, span fields, and metric labels.
	pub const fn as_str(self) -> &'static str {
		match self {
			Hop::Token => "token",
			Hop::Profile => "profile",
		}
	}
}
impl Display for Hop {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Maps HTTP transport failures into crate [`Error`] values.
pub trait TransportErrorMapper<E>
where
	Self: 'static + Send + Sync,
	E: 'static + Send + Sync + StdError,
{
	/// Converts an [`HttpClientError`] emitted by the transport into a crate error.
	fn map_transport_error(
		&self,
		hop: Hop,
		metadata: Option<&ResponseMetadata>,
		error: HttpClientError<E>,
	) -> Error;
}

/// Default mapper for reqwest-backed transports.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransportErrorMapper;
#[cfg(feature = "reqwest")]
impl TransportErrorMapper<ReqwestError> for ReqwestTransportErrorMapper {
	fn map_transport_error(
		&self,
		hop: Hop,
		meta: Option<&ResponseMetadata>,
		err: HttpClientError<ReqwestError>,
	) -> Error {
		let status = meta.and_then(|value| value.status).or_else(|| match &err {
			HttpClientError::Reqwest(inner) => inner.status().map(|code| code.as_u16()),
			_ => None,
		});

		match err {
			HttpClientError::Reqwest(inner) if inner.is_builder() =>
				ConfigError::from(*inner).into(),
			HttpClientError::Reqwest(inner) => TransportError::network(hop, status, *inner).into(),
			HttpClientError::Http(inner) => ConfigError::from(inner).into(),
			HttpClientError::Io(source) => TransportError::Io { hop, source }.into(),
			HttpClientError::Other(message) =>
				TransportError::Other { hop, status, message }.into(),
			_ => TransportError::Other {
				hop,
				status,
				message: "unrecognized client failure".into(),
			}
			.into(),
		}
	}
}

/// Transport plus error mapper shared by every `enter()` call of a pass.
pub(crate) struct CodeFlowFacade<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	http_client: Arc<C>,
	error_mapper: Arc<M>,
}
impl<C, M> CodeFlowFacade<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	pub(crate) fn new(http_client: impl Into<Arc<C>>, error_mapper: impl Into<Arc<M>>) -> Self {
		Self { http_client: http_client.into(), error_mapper: error_mapper.into() }
	}

	/// POSTs `form` to the token endpoint and returns the `access_token` of a 200 response.
	pub(crate) async fn exchange_code(
		&self,
		token_url: &Url,
		form: &[(&str, &str)],
	) -> Result<Secret> {
		let body = url::form_urlencoded::Serializer::new(String::new()).extend_pairs(form).finish();
		let request = Request::builder()
			.method(Method::POST)
			.uri(token_url.as_str())
			.header(CONTENT_TYPE, "application/x-www-form-urlencoded")
			.header(ACCEPT, "application/json")
			.body(body.into_bytes())
			.map_err(ConfigError::from)?;
		let (response, meta) = self.dispatch(Hop::Token, request).await?;

		if response.status() != StatusCode::OK {
			return Err(UpstreamError::Status {
				hop: Hop::Token,
				status: response.status().as_u16(),
				body: body_preview(response.body()),
				retry_after: meta.and_then(|value| value.retry_after),
			}
			.into());
		}

		let token = parse_json::<TokenResponse>(Hop::Token, response.body())?;

		Ok(token.access_token)
	}

	/// GETs `url` and parses the body as JSON whatever the status, so provider-reported errors
	/// embedded in the payload reach the caller.
	pub(crate) async fn fetch_json<T>(&self, hop: Hop, url: &Url) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let request = Request::builder()
			.method(Method::GET)
			.uri(url.as_str())
			.header(ACCEPT, "application/json")
			.body(Vec::new())
			.map_err(ConfigError::from)?;
		let (response, _) = self.dispatch(hop, request).await?;

		parse_json(hop, response.body())
	}

	async fn dispatch(
		&self,
		hop: Hop,
		request: HttpRequest,
	) -> Result<(HttpResponse, Option<ResponseMetadata>)> {
		let slot = ResponseMetadataSlot::default();
		let handle = self.http_client.with_metadata(slot.clone());

		match handle.call(request).await {
			Ok(response) => Ok((response, slot.take())),
			Err(err) =>
				Err(self.error_mapper.map_transport_error(hop, slot.take().as_ref(), err)),
		}
	}
}
impl<C, M> Clone for CodeFlowFacade<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn clone(&self) -> Self {
		Self {
			http_client: Arc::clone(&self.http_client),
			error_mapper: Arc::clone(&self.error_mapper),
		}
	}
}

#[derive(Deserialize)]
struct TokenResponse {
	access_token: Secret,
}

fn parse_json<T>(hop: Hop, body: &[u8]) -> Result<T>
where
	T: DeserializeOwned,
{
	let mut de = serde_json::Deserializer::from_slice(body);

	serde_path_to_error::deserialize(&mut de)
		.map_err(|source| UpstreamError::ResponseParse { hop, source }.into())
}

fn body_preview(body: &[u8]) -> String {
	let text = String::from_utf8_lossy(body);

	if text.chars().count() <= BODY_PREVIEW_LIMIT {
		return text.into_owned();
	}

	let mut buf = text.chars().take(BODY_PREVIEW_LIMIT).collect::<String>();

	buf.push('…');

	buf
}
