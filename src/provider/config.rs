//! Provider credentials and endpoint bases.

// self
use crate::{_prelude::*, auth::Secret, error::ConfigError};

/// Default Google OAuth base URL.
pub const GOOGLE_OAUTH_BASE: &str = "https://accounts.google.com";
/// Default Google API base URL.
pub const GOOGLE_API_BASE: &str = "https://www.googleapis.com";

/// Base URLs the provider's endpoint paths are appended to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderEndpoints {
	/// Authorization server base (authorize and token endpoints live under it).
	pub oauth: Url,
	/// Resource API base (the profile endpoint lives under it).
	pub api: Url,
}
impl ProviderEndpoints {
	/// Google's production endpoints.
	pub fn google() -> Result<Self, ConfigError> {
		Ok(Self {
			oauth: parse_base("oauth", GOOGLE_OAUTH_BASE)?,
			api: parse_base("api", GOOGLE_API_BASE)?,
		})
	}

	/// Appends `segments` to the OAuth base.
	pub fn oauth_url(&self, segments: &[&str]) -> Result<Url, ConfigError> {
		extend_path("oauth", &self.oauth, segments)
	}

	/// Appends `segments` to the API base.
	pub fn api_url(&self, segments: &[&str]) -> Result<Url, ConfigError> {
		extend_path("api", &self.api, segments)
	}
}

/// Immutable identity of one registered OAuth application.
///
/// Two configurations are equal when their client id, client secret, and redirect URI match;
/// endpoint overrides do not take part in equality.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(try_from = "ProviderConfigRepr", into = "ProviderConfigRepr")]
pub struct ProviderConfig {
	client_id: String,
	client_secret: Secret,
	redirect_uri: String,
	endpoints: ProviderEndpoints,
}
impl ProviderConfig {
	/// Creates a configuration pointing at Google's production endpoints.
	///
	/// `redirect_uri` must be exactly the URI registered with the provider; it is validated as a
	/// URL but kept verbatim.
	pub fn new(
		client_id: impl Into<String>,
		client_secret: impl Into<String>,
		redirect_uri: impl Into<String>,
	) -> Result<Self> {
		let config = Self::validated(
			client_id.into(),
			Secret::new(client_secret),
			redirect_uri.into(),
			ProviderEndpoints::google()?,
		)?;

		Ok(config)
	}

	/// Overrides the endpoint bases, typically to point at a mock server.
	pub fn with_endpoints(mut self, endpoints: ProviderEndpoints) -> Self {
		self.endpoints = endpoints;

		self
	}

	/// OAuth client identifier.
	pub fn client_id(&self) -> &str {
		&self.client_id
	}

	/// OAuth client secret.
	pub fn client_secret(&self) -> &Secret {
		&self.client_secret
	}

	/// Redirect URI exactly as registered.
	pub fn redirect_uri(&self) -> &str {
		&self.redirect_uri
	}

	/// Endpoint bases.
	pub fn endpoints(&self) -> &ProviderEndpoints {
		&self.endpoints
	}

	fn validated(
		client_id: String,
		client_secret: Secret,
		redirect_uri: String,
		endpoints: ProviderEndpoints,
	) -> Result<Self, ConfigError> {
		if client_id.is_empty() {
			return Err(ConfigError::EmptyClientId);
		}

		Url::parse(&redirect_uri).map_err(|source| ConfigError::InvalidRedirect { source })?;

		Ok(Self { client_id, client_secret, redirect_uri, endpoints })
	}
}
impl PartialEq for ProviderConfig {
	fn eq(&self, other: &Self) -> bool {
		self.client_id == other.client_id
			&& self.client_secret == other.client_secret
			&& self.redirect_uri == other.redirect_uri
	}
}
impl Eq for ProviderConfig {}

#[derive(Serialize, Deserialize)]
struct ProviderConfigRepr {
	client_id: String,
	client_secret: Secret,
	redirect_uri: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	endpoints: Option<ProviderEndpoints>,
}
impl TryFrom<ProviderConfigRepr> for ProviderConfig {
	type Error = ConfigError;

	fn try_from(repr: ProviderConfigRepr) -> Result<Self, Self::Error> {
		let endpoints = match repr.endpoints {
			Some(endpoints) => endpoints,
			None => ProviderEndpoints::google()?,
		};

		Self::validated(repr.client_id, repr.client_secret, repr.redirect_uri, endpoints)
	}
}
impl From<ProviderConfig> for ProviderConfigRepr {
	fn from(config: ProviderConfig) -> Self {
		Self {
			client_id: config.client_id,
			client_secret: config.client_secret,
			redirect_uri: config.redirect_uri,
			endpoints: Some(config.endpoints),
		}
	}
}

fn parse_base(endpoint: &'static str, raw: &str) -> Result<Url, ConfigError> {
	Url::parse(raw).map_err(|_| ConfigError::InvalidEndpoint { endpoint, url: raw.to_owned() })
}

fn extend_path(endpoint: &'static str, base: &Url, segments: &[&str]) -> Result<Url, ConfigError> {
	let mut url = base.clone();

	url.path_segments_mut()
		.map_err(|_| ConfigError::InvalidEndpoint { endpoint, url: base.to_string() })?
		.pop_if_empty()
		.extend(segments);

	Ok(url)
}
