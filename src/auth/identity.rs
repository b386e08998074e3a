//! Normalized identity produced by a successful pass.

// self
use crate::_prelude::*;

/// Error returned when an identity fails validation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum IdentityError {
	/// The URN was empty.
	#[error("Identity URN cannot be empty.")]
	EmptyUrn,
	/// The provider namespace or provider-side user id was empty.
	#[error("The {part} part of an identity URN cannot be empty.")]
	EmptyUrnPart {
		/// Which part was empty (`provider` or `id`).
		part: &'static str,
	},
	/// The provider namespace contains whitespace or the `:` separator.
	#[error("Provider namespace `{provider}` must not contain whitespace or `:`.")]
	InvalidProvider {
		/// Offending namespace.
		provider: String,
	},
}

/// Authenticated user, namespaced by the provider that proved it.
///
/// The URN is never empty and properties are plain strings; passes resolve missing optional
/// profile fields to their documented defaults instead of leaving keys out.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "IdentityRepr", into = "IdentityRepr")]
pub struct Identity {
	urn: String,
	properties: BTreeMap<String, String>,
}
impl Identity {
	/// Creates an identity after checking the URN is non-empty.
	pub fn new<I, K, V>(urn: impl Into<String>, properties: I) -> Result<Self, IdentityError>
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<String>,
	{
		let urn = urn.into();

		validate_urn(&urn)?;

		Ok(Self {
			urn,
			properties: properties.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
		})
	}

	/// Creates an identity whose URN is `urn:<provider>:<user_id>`.
	pub fn namespaced<I, K, V>(
		provider: &str,
		user_id: &str,
		properties: I,
	) -> Result<Self, IdentityError>
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<String>,
	{
		if provider.is_empty() {
			return Err(IdentityError::EmptyUrnPart { part: "provider" });
		}
		if provider.contains(':') || provider.chars().any(char::is_whitespace) {
			return Err(IdentityError::InvalidProvider { provider: provider.to_owned() });
		}
		if user_id.is_empty() {
			return Err(IdentityError::EmptyUrnPart { part: "id" });
		}

		Self::new(format!("urn:{provider}:{user_id}"), properties)
	}

	/// Provider-namespaced unique identifier, e.g. `urn:google:42`.
	pub fn urn(&self) -> &str {
		&self.urn
	}

	/// All identity properties.
	pub fn properties(&self) -> &BTreeMap<String, String> {
		&self.properties
	}

	/// Single property value.
	pub fn property(&self, name: &str) -> Option<&str> {
		self.properties.get(name).map(String::as_str)
	}
}
impl Display for Identity {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.urn)
	}
}

#[derive(Serialize, Deserialize)]
struct IdentityRepr {
	urn: String,
	#[serde(default)]
	properties: BTreeMap<String, String>,
}
impl TryFrom<IdentityRepr> for Identity {
	type Error = IdentityError;

	fn try_from(repr: IdentityRepr) -> Result<Self, Self::Error> {
		validate_urn(&repr.urn)?;

		Ok(Self { urn: repr.urn, properties: repr.properties })
	}
}
impl From<Identity> for IdentityRepr {
	fn from(identity: Identity) -> Self {
		Self { urn: identity.urn, properties: identity.properties }
	}
}

fn validate_urn(urn: &str) -> Result<(), IdentityError> {
	if urn.is_empty() {
		return Err(IdentityError::EmptyUrn);
	}

	Ok(())
}
