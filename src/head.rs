//! Header parsing for line-oriented HTTP heads.
//!
//! `index` turns the head of any [`Message`](crate::message::Message) into a case-insensitive,
//! multi-valued [`HeaderMap`] and exposes it through the [`HeaderSource`] contract. `values`
//! carries lookup results that explain themselves lazily when read past their end, and `facade`
//! layers "mandatory or fail" and "value or default" lookups over any [`HeaderSource`].

pub mod facade;
pub mod index;
pub mod values;

pub use facade::*;
pub use index::*;
pub use values::*;
