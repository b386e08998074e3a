//! Login-link construction and `state` round-trip for the Google pass.

// crates.io
use rand::{Rng, distr::Alphanumeric};
// self
use crate::{_prelude::*, provider::ProviderConfig};

const STATE_LEN: usize = 32;
const PROFILE_SCOPE: &str = "https://www.googleapis.com/auth/userinfo.profile";

/// Login link returned by [`super::GooglePass::start_authorization`].
///
/// Nothing is stored on the pass: callers keep `state` (for example in a cookie) and check the
/// value echoed back on the callback with [`AuthorizationRequest::validate_state`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthorizationRequest {
	/// Fully-formed authorize URL that users should be sent to.
	pub url: Url,
	/// Opaque state value that must round-trip via the redirect.
	pub state: String,
}
impl AuthorizationRequest {
	/// Validates the `state` parameter returned on the callback.
	pub fn validate_state(&self, returned_state: &str) -> Result<()> {
		if returned_state == self.state {
			Ok(())
		} else {
			Err(Error::bad_request("authorization state mismatch"))
		}
	}
}

pub(super) fn build_request(config: &ProviderConfig) -> Result<AuthorizationRequest> {
	let state = random_string(STATE_LEN);
	let mut url = config.endpoints().oauth_url(&["o", "oauth2", "auth"])?;

	url.query_pairs_mut()
		.append_pair("client_id", config.client_id())
		.append_pair("redirect_uri", config.redirect_uri())
		.append_pair("response_type", "code")
		.append_pair("scope", PROFILE_SCOPE)
		.append_pair("state", &state);

	Ok(AuthorizationRequest { url, state })
}

fn random_string(len: usize) -> String {
	rand::rng().sample_iter(Alphanumeric).take(len).map(char::from).collect()
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::pass::callback;

	#[test]
	fn request_carries_client_and_state() {
		let config = ProviderConfig::new("app-id", "secret", "https://app.example.com/cb?x=1")
			.expect("Fixture configuration should be valid.");
		let request = build_request(&config).expect("Authorize URL should build.");
		let url = &request.url;

		assert_eq!(url.path(), "/o/oauth2/auth");
		assert_eq!(callback::query_param(url, "client_id").as_deref(), Some("app-id"));
		assert_eq!(
			callback::query_param(url, "redirect_uri").as_deref(),
			Some("https://app.example.com/cb?x=1")
		);
		assert_eq!(callback::query_param(url, "response_type").as_deref(), Some("code"));
		assert_eq!(callback::query_param(url, "scope").as_deref(), Some(PROFILE_SCOPE));
		assert_eq!(callback::query_param(url, "state"), Some(request.state.clone()));
		assert_eq!(request.state.len(), STATE_LEN);
		assert!(request.state.chars().all(|c| c.is_ascii_alphanumeric()));
	}

	#[test]
	fn state_validation_errors_on_mismatch() {
		let request = AuthorizationRequest {
			url: Url::parse("https://accounts.google.com/o/oauth2/auth?state=expected")
				.expect("Authorization URL fixture should parse successfully."),
			state: "expected".into(),
		};

		assert!(request.validate_state("expected").is_ok());

		let err = request.validate_state("other").expect_err("State mismatch should fail.");

		assert!(matches!(err, Error::BadRequest { .. }));
	}
}
