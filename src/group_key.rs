//! stable identity of an alert group across repeated webhook deliveries
use std::fmt::{self, Display};

use sha2::{Digest, Sha256};

/// lowercase hex encoded sha256 digest of the sorted grouping labels
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupKey(String);

impl GroupKey {
	/// Derives the key of an alert group from its grouping labels.
	///
	/// The pairs are sorted before hashing, so the key doesn't depend on the
	/// order they are passed in. The canonical text being hashed is the json
	/// array of pairs, e.g. `[["alertname","Foo"],["job","bar"]]`, its string
	/// escaping keeps label values from faking additional pairs.
	pub fn derive<'a, I>(labels: I) -> Self
	where
		I: IntoIterator<Item = (&'a String, &'a String)>,
	{
		let mut pairs: Vec<_> = labels.into_iter().collect();
		pairs.sort();

		// a list of string pairs always serializes
		let canonical = serde_json::to_vec(&pairs).unwrap_or_default();

		Self(hex::encode(Sha256::digest(&canonical)))
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl Display for GroupKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}
