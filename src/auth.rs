//! Auth-domain identities and redacted secrets.

pub mod identity;
pub mod secret;

pub use identity::*;
pub use secret::*;
