//! Google OAuth 2.0 authorization-code pass.
//!
//! One [`GooglePass::enter`] call walks four stages: it reads the `code` query parameter from the
//! callback request, exchanges it at `{oauth}/o/oauth2/token`, fetches
//! `{api}/plus/v1/people/me` with the access token, and normalizes the profile into an
//! [`Identity`] named `urn:google:<id>`. Each stage is observed through [`crate::obs`], and the
//! whole call runs inside one `oauth2_pass.flow` span.

pub mod authorization;

pub use authorization::*;

// self
use crate::{
	_prelude::*,
	auth::Identity,
	error::UpstreamError,
	http::ProviderHttpClient,
	message::Message,
	oauth::{CodeFlowFacade, Hop, TransportErrorMapper},
	obs::{self, FlowSpan, FlowStage},
	pass::{Pass, PassFuture, callback},
	provider::ProviderConfig,
};
#[cfg(feature = "reqwest")]
use crate::{http::ReqwestHttpClient, oauth::ReqwestTransportErrorMapper};

const GOOGLE: &str = "google";
const DEFAULT_NAME: &str = "unknown";
const DEFAULT_PICTURE: &str = "#";
const MISSING_CODE: &str = "code is not provided by google, probably some mistake";

#[cfg(feature = "reqwest")]
/// Google pass specialized for the crate's default reqwest transport stack.
pub type ReqwestGooglePass = GooglePass<ReqwestHttpClient, ReqwestTransportErrorMapper>;

/// Logs users in through Google's authorization-code grant.
///
/// The pass is immutable after construction and safe to share across concurrent requests. Two
/// passes are equal when their [`ProviderConfig`]s are equal; the transport takes no part in
/// equality.
pub struct GooglePass<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	config: ProviderConfig,
	facade: CodeFlowFacade<C, M>,
}
impl<C, M> GooglePass<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Creates a pass that reuses the caller-provided transport + mapper pair.
	pub fn with_http_client(
		config: ProviderConfig,
		http_client: impl Into<Arc<C>>,
		mapper: impl Into<Arc<M>>,
	) -> Self {
		Self { config, facade: CodeFlowFacade::new(http_client, mapper) }
	}

	/// Credentials and endpoints this pass talks to.
	pub fn config(&self) -> &ProviderConfig {
		&self.config
	}

	/// Builds the login link users are redirected to, along with the `state` to round-trip.
	pub fn start_authorization(&self) -> Result<AuthorizationRequest> {
		let _span = FlowSpan::new(GOOGLE, "start_authorization").entered();

		authorization::build_request(&self.config)
	}

	async fn authenticate(&self, span: &FlowSpan, request: &dyn Message) -> Result<Identity> {
		let code =
			obs::observe_stage(span, FlowStage::AwaitingCode, async { read_code(request) }).await?;
		let token = obs::observe_stage(span, FlowStage::ExchangingToken, async {
			let url = self.config.endpoints().oauth_url(&["o", "oauth2", "token"])?;
			let form = [
				("client_id", self.config.client_id()),
				("redirect_uri", self.config.redirect_uri()),
				("client_secret", self.config.client_secret().expose()),
				("grant_type", "authorization_code"),
				("code", code.as_str()),
			];

			self.facade.exchange_code(&url, &form).await
		})
		.await?;
		let profile = obs::observe_stage(span, FlowStage::FetchingProfile, async {
			let mut url = self.config.endpoints().api_url(&["plus", "v1", "people", "me"])?;

			url.query_pairs_mut().append_pair("access_token", token.expose());

			self.facade.fetch_json::<ProfileFields>(Hop::Profile, &url).await
		})
		.await?;

		obs::observe_stage(span, FlowStage::ParsingProfile, async { profile_identity(profile) })
			.await
	}
}
#[cfg(feature = "reqwest")]
impl GooglePass<ReqwestHttpClient, ReqwestTransportErrorMapper> {
	/// Creates a pass backed by a default reqwest client.
	pub fn new(config: ProviderConfig) -> Self {
		Self::with_http_client(
			config,
			ReqwestHttpClient::default(),
			Arc::new(ReqwestTransportErrorMapper),
		)
	}
}
impl<C, M> Clone for GooglePass<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn clone(&self) -> Self {
		Self { config: self.config.clone(), facade: self.facade.clone() }
	}
}
impl<C, M> PartialEq for GooglePass<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn eq(&self, other: &Self) -> bool {
		self.config == other.config
	}
}
impl<C, M> Eq for GooglePass<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
}
impl<C, M> Debug for GooglePass<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("GooglePass").field("config", &self.config).finish()
	}
}
impl<C, M> Pass for GooglePass<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn enter<'a>(&'a self, request: &'a dyn Message) -> PassFuture<'a, Option<Identity>> {
		Box::pin(async move {
			let span = FlowSpan::new(GOOGLE, "enter");

			span.instrument(self.authenticate(&span, request)).await.map(Some)
		})
	}
}

type ProfileFields = serde_json::Map<String, serde_json::Value>;

#[derive(Debug, Deserialize)]
struct GoogleProfile {
	#[serde(default)]
	id: Option<String>,
	#[serde(default, rename = "displayName")]
	display_name: Option<String>,
	#[serde(default)]
	image: Option<GoogleImage>,
}
impl GoogleProfile {
	fn into_identity(self) -> Result<Identity> {
		let id = self
			.id
			.filter(|id| !id.is_empty())
			.ok_or(UpstreamError::MissingField { hop: Hop::Profile, field: "id" })?;
		let name = self.display_name.unwrap_or_else(|| DEFAULT_NAME.into());
		let picture =
			self.image.and_then(|image| image.url).unwrap_or_else(|| DEFAULT_PICTURE.into());

		Identity::namespaced(GOOGLE, &id, [("name", name), ("picture", picture)])
			.map_err(Error::from)
	}
}

#[derive(Debug, Deserialize)]
struct GoogleImage {
	#[serde(default)]
	url: Option<String>,
}

fn read_code(request: &dyn Message) -> Result<String> {
	let url = callback::request_url(request)?;

	if let Some(code) = callback::query_param(&url, "code").filter(|code| !code.is_empty()) {
		return Ok(code);
	}

	let reason = match callback::query_param(&url, "error") {
		Some(error) => format!("{MISSING_CODE} (error: {error})"),
		None => MISSING_CODE.into(),
	};

	Err(Error::bad_request(reason))
}

/// An `error` key wins over every other field, whatever its value or the shape of its siblings.
fn profile_identity(fields: ProfileFields) -> Result<Identity> {
	if let Some(error) = fields.get("error") {
		return Err(Error::bad_request(format!(
			"could not retrieve id from google, possible cause: {}",
			error_message(error)
		)));
	}

	let profile: GoogleProfile = serde_path_to_error::deserialize(serde_json::Value::Object(fields))
		.map_err(|source| UpstreamError::ResponseParse { hop: Hop::Profile, source })?;

	profile.into_identity()
}

fn error_message(error: &serde_json::Value) -> String {
	match error {
		serde_json::Value::String(message) => message.clone(),
		serde_json::Value::Object(fields) => match fields.get("message") {
			Some(serde_json::Value::String(message)) => message.clone(),
			_ => error.to_string(),
		},
		_ => error.to_string(),
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::message::RawMessage;

	fn profile(json: &str) -> Result<Identity> {
		profile_identity(serde_json::from_str(json).expect("Profile fixture should be an object."))
	}

	#[test]
	fn profile_normalizes_with_defaults() {
		let full = profile(r#"{"id":"42","displayName":"Ann","image":{"url":"http://p/x.png"}}"#)
			.expect("Complete profile should normalize.");

		assert_eq!(full.urn(), "urn:google:42");
		assert_eq!(full.property("name"), Some("Ann"));
		assert_eq!(full.property("picture"), Some("http://p/x.png"));

		let bare = profile(r#"{"id":"7","image":{}}"#).unwrap();

		assert_eq!(bare.urn(), "urn:google:7");
		assert_eq!(bare.property("name"), Some("unknown"));
		assert_eq!(bare.property("picture"), Some("#"));
	}

	#[test]
	fn profile_error_becomes_bad_request() {
		let err = profile(r#"{"error":{"code":401,"message":"Invalid Credentials"}}"#)
			.expect_err("Provider error must fail.");

		assert_eq!(
			err.to_string(),
			"Bad request: could not retrieve id from google, possible cause: Invalid Credentials."
		);

		let err = profile(r#"{"error":"invalid_token","id":"1"}"#).unwrap_err();

		assert!(err.to_string().contains("possible cause: invalid_token"));
	}

	#[test]
	fn error_key_wins_even_when_null_or_beside_malformed_fields() {
		let err = profile(r#"{"error":null,"id":"42"}"#).expect_err("Null error must still fail.");

		assert!(matches!(err, Error::BadRequest { .. }));
		assert!(err.to_string().contains("possible cause: null"));

		let err = profile(r#"{"error":{"message":"quota exceeded"},"image":"x","id":9}"#)
			.expect_err("Provider error must fail before the profile shape is checked.");

		assert!(matches!(err, Error::BadRequest { .. }));
		assert!(err.to_string().contains("possible cause: quota exceeded"));
	}

	#[test]
	fn malformed_profile_without_error_is_a_parse_failure() {
		match profile(r#"{"id":"42","image":"x"}"#) {
			Err(Error::Upstream(UpstreamError::ResponseParse { hop, source })) => {
				assert_eq!(hop, Hop::Profile);
				assert_eq!(source.path().to_string(), "image");
			},
			other => panic!("Unexpected profile result: {other:?}."),
		}
	}

	#[test]
	fn profile_without_id_is_upstream_failure() {
		for json in [r#"{"displayName":"Ann"}"#, r#"{"id":""}"#] {
			assert!(matches!(
				profile(json),
				Err(Error::Upstream(UpstreamError::MissingField { hop: Hop::Profile, field: "id" }))
			));
		}
	}

	#[test]
	fn code_is_read_from_the_callback_query() {
		let request = RawMessage::new(["GET /cb?state=s&code=4%2Fabc HTTP/1.1", "Host: a.example"]);

		assert_eq!(read_code(&request).expect("Code should be present."), "4/abc");

		for target in ["/cb", "/cb?code=", "/cb?error=access_denied"] {
			let request = RawMessage::new([format!("GET {target} HTTP/1.1")]);
			let err = read_code(&request).expect_err("Missing code must fail.");

			assert!(matches!(err, Error::BadRequest { .. }));
			assert!(err.to_string().contains("code is not provided by google"));
		}

		let denied = RawMessage::new(["GET /cb?error=access_denied HTTP/1.1"]);

		assert!(read_code(&denied).unwrap_err().to_string().contains("access_denied"));
	}
}
