use std::collections::HashSet;

use serde::Deserialize;

/// set of incident lifecycle state codes. Servicenow reports states as
/// strings but they are usually written as numbers in the config, we
/// implement Deserialize ourselves to accept both and normalise to strings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StateSet(HashSet<String>);

impl StateSet {
	pub fn contains(&self, state: &str) -> bool {
		self.0.contains(state)
	}
}

impl<S: Into<String>> FromIterator<S> for StateSet {
	fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
		Self(iter.into_iter().map(Into::into).collect())
	}
}

/// a single state code, either a string or an integer
struct StateVisitor;

impl<'de> serde::de::Visitor<'de> for StateVisitor {
	type Value = String;

	fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
		formatter.write_str("incident state code as integer or string")
	}

	fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<Self::Value, E> {
		Ok(v.to_owned())
	}

	fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<Self::Value, E> {
		Ok(v.to_string())
	}

	fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<Self::Value, E> {
		Ok(v.to_string())
	}
}

struct State(String);

impl<'de> Deserialize<'de> for State {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: serde::Deserializer<'de>,
	{
		deserializer.deserialize_any(StateVisitor).map(State)
	}
}

struct StateSetVisitor;

impl<'de> serde::de::Visitor<'de> for StateSetVisitor {
	type Value = StateSet;

	fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
		formatter.write_str("list of incident state codes")
	}

	fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
	where
		A: serde::de::SeqAccess<'de>,
	{
		let mut set = HashSet::new();

		while let Some(State(state)) = seq.next_element::<State>()? {
			set.insert(state);
		}

		Ok(StateSet(set))
	}
}

impl<'de> Deserialize<'de> for StateSet {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: serde::Deserializer<'de>,
	{
		deserializer.deserialize_seq(StateSetVisitor)
	}
}
