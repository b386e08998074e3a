//! Header lookup results that explain themselves on demand.

// std
use std::slice::Iter;
// self
use crate::{_prelude::*, head::HeaderMap};

/// Raised when a caller reads a header value that does not exist.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum HeaderLookupError {
	/// No values exist for the requested name.
	#[error("There are no headers by name \"{name}\" among {count} others: {known:?}.")]
	Absent {
		/// Requested header name, as supplied by the caller.
		name: String,
		/// Number of distinct header names in the head.
		count: usize,
		/// Every lower-cased header name in the head.
		known: Vec<String>,
	},
	/// Fewer values exist than the caller asked for.
	#[error("There are only {available} headers by name \"{name}\".")]
	Exhausted {
		/// Requested header name, as supplied by the caller.
		name: String,
		/// Number of values actually present.
		available: usize,
	},
}

/// Values of one header, in the order their lines appeared.
///
/// The lookup keeps a shared handle to the parsed [`HeaderMap`] so the diagnostic for an
/// out-of-range read is only formatted when [`get`](Self::get) actually fails.
#[derive(Clone, Debug)]
pub struct HeaderValues {
	name: String,
	map: Arc<HeaderMap>,
}
impl HeaderValues {
	pub(crate) fn new(name: impl Into<String>, map: Arc<HeaderMap>) -> Self {
		Self { name: name.into(), map }
	}

	/// Header name as requested by the caller.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// The values as a slice; empty when the header is absent.
	pub fn as_slice(&self) -> &[String] {
		self.map.get(&self.name)
	}

	/// Number of values.
	pub fn len(&self) -> usize {
		self.as_slice().len()
	}

	/// Returns true when the header is absent.
	pub fn is_empty(&self) -> bool {
		self.as_slice().is_empty()
	}

	/// First value, if any.
	pub fn first(&self) -> Option<&str> {
		self.as_slice().first().map(String::as_str)
	}

	/// Iterator over the values.
	pub fn iter(&self) -> Iter<'_, String> {
		self.as_slice().iter()
	}

	/// Returns the value at `index`, or an error explaining what the head actually holds.
	pub fn get(&self, index: usize) -> Result<&str, HeaderLookupError> {
		let values = self.as_slice();

		if let Some(value) = values.get(index) {
			return Ok(value.as_str());
		}
		if values.is_empty() {
			return Err(HeaderLookupError::Absent {
				name: self.name.clone(),
				count: self.map.len(),
				known: self.map.names().map(ToOwned::to_owned).collect(),
			});
		}

		Err(HeaderLookupError::Exhausted { name: self.name.clone(), available: values.len() })
	}

	/// Copies the values out.
	pub fn to_vec(&self) -> Vec<String> {
		self.as_slice().to_vec()
	}
}
impl PartialEq for HeaderValues {
	fn eq(&self, other: &Self) -> bool {
		self.as_slice() == other.as_slice()
	}
}
impl Eq for HeaderValues {}
impl<'a> IntoIterator for &'a HeaderValues {
	type IntoIter = Iter<'a, String>;
	type Item = &'a String;

	fn into_iter(self) -> Self::IntoIter {
		self.iter()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn values(name: &str) -> HeaderValues {
		let map = HeaderMap::parse([
			"HTTP/1.1 200 OK",
			"Content-Type: text/html",
			"Vary: Accept",
			"Vary: Cookie",
		])
		.expect("Fixture head should parse.");

		HeaderValues::new(name, Arc::new(map))
	}

	#[test]
	fn reads_within_range_succeed() {
		let vary = values("VARY");

		assert_eq!(vary.len(), 2);
		assert_eq!(vary.get(1), Ok("Cookie"));
		assert_eq!(vary.first(), Some("Accept"));
		assert_eq!(vary.iter().map(String::as_str).collect::<Vec<_>>(), ["Accept", "Cookie"]);
	}

	#[test]
	fn absent_header_explains_itself_on_read() {
		let missing = values("X-Trace");

		assert!(missing.is_empty());
		assert_eq!(missing.first(), None);

		let err = missing.get(0).expect_err("Reading an absent header must fail.");

		assert_eq!(
			err.to_string(),
			"There are no headers by name \"X-Trace\" among 2 others: [\"content-type\", \"vary\"]."
		);
	}

	#[test]
	fn over_read_reports_available_count() {
		let err = values("Vary").get(2).expect_err("Third Vary value does not exist.");

		assert_eq!(err, HeaderLookupError::Exhausted { name: "Vary".into(), available: 2 });
		assert_eq!(err.to_string(), "There are only 2 headers by name \"Vary\".");
	}

	#[test]
	fn equality_compares_values_not_names() {
		assert_eq!(values("vary"), values("VARY"));
		assert_ne!(values("vary"), values("content-type"));
	}
}
