// std
use std::{
	collections::BTreeMap,
	fmt::{Display, Formatter, Result as FmtResult},
	future::Future,
	pin::Pin,
	sync::Arc,
};
// crates.io
use parking_lot::Mutex;
use time::Duration;
// self
use oauth2_pass::{
	error::{ConfigError, Error, TransportError, UpstreamError},
	http::{ProviderHttpClient, ResponseMetadata, ResponseMetadataSlot},
	message::RawMessage,
	oauth::{
		Hop, TransportErrorMapper,
		oauth2::{
			AsyncHttpClient, HttpClientError, HttpRequest, HttpResponse, http::Response,
		},
	},
	pass::{GooglePass, Pass},
	provider::{ProviderConfig, ProviderEndpoints},
	url::Url,
};

#[derive(Debug)]
enum FakeTransportError {
	Throttled,
}
impl Display for FakeTransportError {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match self {
			Self::Throttled => write!(f, "Transport throttled."),
		}
	}
}
impl std::error::Error for FakeTransportError {}

#[derive(Clone, Debug)]
struct SeenRequest {
	method: String,
	uri: String,
	body: Vec<u8>,
}

/// Scripted transport: answers by request path and records every request it sees.
#[derive(Clone, Default)]
struct FakeHttpClient {
	routes: Arc<BTreeMap<String, (u16, String)>>,
	throttle: Option<Duration>,
	seen: Arc<Mutex<Vec<SeenRequest>>>,
}
impl FakeHttpClient {
	fn scripted<const N: usize>(routes: [(&str, u16, &str); N]) -> Self {
		let routes = routes
			.into_iter()
			.map(|(path, status, body)| (path.to_owned(), (status, body.to_owned())))
			.collect();

		Self { routes: Arc::new(routes), ..Default::default() }
	}

	fn throttled(retry_after: Duration) -> Self {
		Self { throttle: Some(retry_after), ..Default::default() }
	}

	fn seen(&self) -> Vec<SeenRequest> {
		self.seen.lock().clone()
	}
}
impl ProviderHttpClient for FakeHttpClient {
	type Handle = FakeHttpHandle;
	type TransportError = FakeTransportError;

	fn with_metadata(&self, slot: ResponseMetadataSlot) -> Self::Handle {
		FakeHttpHandle { client: self.clone(), slot }
	}
}

struct FakeHttpHandle {
	client: FakeHttpClient,
	slot: ResponseMetadataSlot,
}
impl<'a> AsyncHttpClient<'a> for FakeHttpHandle {
	type Error = HttpClientError<FakeTransportError>;
	type Future =
		Pin<Box<dyn Future<Output = Result<HttpResponse, Self::Error>> + 'a + Send + Sync>>;

	fn call(&'a self, request: HttpRequest) -> Self::Future {
		Box::pin(async move {
			assert!(
				self.slot.take().is_none(),
				"ResponseMetadataSlot must be clear before dispatching a request."
			);

			let path = request.uri().path().to_owned();

			self.client.seen.lock().push(SeenRequest {
				method: request.method().to_string(),
				uri: request.uri().to_string(),
				body: request.body().clone(),
			});

			if let Some(retry_after) = self.client.throttle {
				self.slot
					.store(ResponseMetadata { status: Some(429), retry_after: Some(retry_after) });

				return Err(HttpClientError::Other(FakeTransportError::Throttled.to_string()));
			}

			let (status, body) =
				self.client.routes.get(&path).cloned().unwrap_or((404, "{}".to_owned()));
			let response = Response::builder()
				.status(status)
				.body(body.into_bytes())
				.map_err(HttpClientError::Http)?;

			self.slot.store(ResponseMetadata { status: Some(status), retry_after: None });

			Ok(response)
		})
	}
}

#[derive(Clone, Default)]
struct RecordingTransportErrorMapper {
	metadata: Arc<Mutex<Vec<(Hop, Option<ResponseMetadata>)>>>,
}
impl RecordingTransportErrorMapper {
	fn recorded(&self) -> Vec<(Hop, Option<ResponseMetadata>)> {
		self.metadata.lock().clone()
	}
}
impl TransportErrorMapper<FakeTransportError> for RecordingTransportErrorMapper {
	fn map_transport_error(
		&self,
		hop: Hop,
		meta: Option<&ResponseMetadata>,
		err: HttpClientError<FakeTransportError>,
	) -> Error {
		self.metadata.lock().push((hop, meta.cloned()));

		let status = meta.and_then(|value| value.status);

		match err {
			HttpClientError::Http(inner) => ConfigError::from(inner).into(),
			HttpClientError::Io(source) => TransportError::Io { hop, source }.into(),
			HttpClientError::Other(message) =>
				TransportError::Other { hop, status, message }.into(),
			other => TransportError::Other { hop, status, message: format!("{other:?}") }.into(),
		}
	}
}

fn build_pass(
	client: &FakeHttpClient,
	mapper: &RecordingTransportErrorMapper,
) -> GooglePass<FakeHttpClient, RecordingTransportErrorMapper> {
	let config = ProviderConfig::new("app-id", "app-secret", "https://app.example.com/callback")
		.expect("Fixture configuration should be valid.")
		.with_endpoints(ProviderEndpoints {
			oauth: Url::parse("https://oauth.mock").expect("Mock OAuth base should parse."),
			api: Url::parse("https://api.mock/v0/").expect("Mock API base should parse."),
		});

	GooglePass::with_http_client(config, client.clone(), mapper.clone())
}

fn callback(target: &str) -> RawMessage {
	RawMessage::new([format!("GET {target} HTTP/1.1"), "Host: app.example.com".into()])
}

#[tokio::test]
async fn enter_walks_token_and_profile_hops() {
	let client = FakeHttpClient::scripted([
		("/o/oauth2/token", 200, r#"{"access_token":"T1"}"#),
		("/v0/plus/v1/people/me", 200, r#"{"id":"42","displayName":"Ada"}"#),
	]);
	let mapper = RecordingTransportErrorMapper::default();
	let pass = build_pass(&client, &mapper);
	let identity = pass
		.enter(&callback("/callback?code=ABC123"))
		.await
		.expect("Scripted flow should succeed.")
		.expect("Google always answers a callback.");

	assert_eq!(identity.urn(), "urn:google:42");
	assert_eq!(identity.property("name"), Some("Ada"));
	assert_eq!(identity.property("picture"), Some("#"));

	let seen = client.seen();

	assert_eq!(seen.len(), 2);
	assert_eq!(seen[0].method, "POST");
	assert_eq!(seen[0].uri, "https://oauth.mock/o/oauth2/token");

	let form = oauth2_pass::url::form_urlencoded::parse(&seen[0].body)
		.into_owned()
		.collect::<BTreeMap<_, _>>();

	assert_eq!(form.get("code").map(String::as_str), Some("ABC123"));
	assert_eq!(form.get("grant_type").map(String::as_str), Some("authorization_code"));
	assert_eq!(form.get("client_secret").map(String::as_str), Some("app-secret"));
	assert_eq!(
		form.get("redirect_uri").map(String::as_str),
		Some("https://app.example.com/callback")
	);
	assert_eq!(seen[1].uri, "https://api.mock/v0/plus/v1/people/me?access_token=T1");
	assert!(mapper.recorded().is_empty());
}

#[tokio::test]
async fn missing_code_never_touches_the_transport() {
	let client = FakeHttpClient::default();
	let mapper = RecordingTransportErrorMapper::default();
	let pass = build_pass(&client, &mapper);

	for target in ["/callback", "/callback?state=xyz", "/callback?error=access_denied"] {
		let err = pass.enter(&callback(target)).await.expect_err("Missing code must fail.");

		assert!(matches!(err, Error::BadRequest { .. }), "Unexpected error: {err:?}.");
	}

	assert!(client.seen().is_empty());
}

#[tokio::test]
async fn token_rejection_skips_the_profile_hop() {
	let client =
		FakeHttpClient::scripted([("/o/oauth2/token", 401, r#"{"error":"invalid_client"}"#)]);
	let mapper = RecordingTransportErrorMapper::default();
	let pass = build_pass(&client, &mapper);
	let err = pass.enter(&callback("/callback?code=ABC123")).await.expect_err("401 must fail.");

	match err {
		Error::Upstream(UpstreamError::Status { hop, status, body, .. }) => {
			assert_eq!(hop, Hop::Token);
			assert_eq!(status, 401);
			assert!(body.contains("invalid_client"));
		},
		other => panic!("Unexpected error variant: {other:?}."),
	}

	assert_eq!(client.seen().len(), 1);
}

#[tokio::test]
async fn transport_failures_reach_the_mapper_with_metadata() {
	let client = FakeHttpClient::throttled(Duration::seconds(5));
	let mapper = RecordingTransportErrorMapper::default();
	let pass = build_pass(&client, &mapper);
	let err = pass
		.enter(&callback("/callback?code=ABC123"))
		.await
		.expect_err("Throttled transport must fail.");

	assert!(matches!(
		err,
		Error::Upstream(UpstreamError::Transport(TransportError::Other {
			hop: Hop::Token,
			status: Some(429),
			..
		}))
	));

	let recorded = mapper.recorded();

	assert_eq!(recorded.len(), 1);
	assert_eq!(recorded[0].0, Hop::Token);
	assert_eq!(recorded[0].1.as_ref().and_then(|meta| meta.status), Some(429));
	assert_eq!(
		recorded[0].1.as_ref().and_then(|meta| meta.retry_after),
		Some(Duration::seconds(5))
	);
}
