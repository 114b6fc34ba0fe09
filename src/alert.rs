//! data structures for deserializing incoming alert groups
use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// label names and values. Kept sorted so templates iterate them in a stable
/// order and the group key can be derived from them directly.
pub type LabelSet = BTreeMap<String, String>;

/// status of an alert group as reported by alertmanager
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GroupStatus<'a> {
	Firing,
	Resolved,
	Unknown(&'a str),
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
/// data from prometheus received by the alertmanager webhook receiver
pub struct Data {
	pub version: String,
	pub group_key: String,

	pub receiver: String,
	pub status: String,
	pub alerts: Vec<Alert>,
	pub group_labels: LabelSet,
	pub common_labels: LabelSet,
	pub common_annotations: LabelSet,
	#[serde(rename = "externalURL")]
	pub external_url: String,
}

impl Data {
	pub fn group_status(&self) -> GroupStatus<'_> {
		match self.status.as_str() {
			"firing" => GroupStatus::Firing,
			"resolved" => GroupStatus::Resolved,
			other => GroupStatus::Unknown(other),
		}
	}
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
/// a single alert of an alert group
pub struct Alert {
	pub status: String,
	pub labels: LabelSet,
	pub annotations: LabelSet,
	pub starts_at: Option<DateTime<Utc>>,
	pub ends_at: Option<DateTime<Utc>>,
	#[serde(rename = "generatorURL")]
	pub generator_url: String,
	pub fingerprint: String,
}
