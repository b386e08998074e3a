//! Walks through producing a Google login link and reading the callback the browser comes back
//! with, without contacting Google.

// crates.io
use color_eyre::{Result, eyre::eyre};
// self
use oauth2_pass::{
	head::HeaderFacade,
	message::RawMessage,
	pass::{GooglePass, callback},
	provider::ProviderConfig,
};

fn main() -> Result<()> {
	color_eyre::install()?;

	let config =
		ProviderConfig::new("demo-client", "demo-secret", "https://app.example.com/callback")?;
	let pass = GooglePass::new(config);
	let login = pass.start_authorization()?;

	println!("Send your user to {}.", login.url);

	// Simulate the redirect Google sends back after consent.
	let request = RawMessage::new([
		format!("GET /callback?code=4%2Fdemo&state={} HTTP/1.1", login.state),
		"Host: app.example.com".into(),
		"User-Agent: demo".into(),
	]);
	let url = callback::request_url(&request)?;
	let state = callback::query_param(&url, "state").ok_or_else(|| eyre!("State is missing."))?;

	login.validate_state(&state)?;

	let agent = HeaderFacade::from_message(&request).single_or("user-agent", "unknown")?;

	println!("Validated state for callback {url} from {agent}.");
	println!("Hand the same request to `Pass::enter` to exchange the code for an identity.");

	Ok(())
}
