//! Provider-facing configuration (credentials and endpoint bases).
//!
//! `config` exposes [`ProviderConfig`], the immutable identity of one registered OAuth
//! application, and [`ProviderEndpoints`], the overridable base URLs its requests are built from.

pub mod config;

pub use config::*;
