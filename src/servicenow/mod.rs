//! servicenow incident table
//!
//! The workflow only talks to servicenow through [IncidentClient], the REST
//! implementation is [ServiceNowClient].

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::incident::Incident;

mod client;
mod metrics;
#[cfg(test)]
pub(crate) mod mock;
pub mod settings;

pub use client::ServiceNowClient;

#[derive(Error, Debug)]
pub enum ServiceNowError {
	#[error("{0} is missing")]
	MissingSetting(&'static str),
	#[error("invalid servicenow url: {0}")]
	InvalidUrl(String),
	#[error("could not register servicenow metrics: {0}")]
	Metrics(#[from] prometheus::Error),
	#[error("request to servicenow failed: {0}")]
	Request(#[source] reqwest::Error),
	#[error("servicenow responded with status {status}: {body}")]
	Status { status: u16, body: String },
	#[error("could not decode servicenow response: {0}")]
	Decode(#[source] serde_json::Error),
	#[error("servicenow record has no `{0}` field")]
	MissingField(&'static str),
}

/// An incident as returned by servicenow.
///
/// Which fields exist depends on the instance, so the record is kept as
/// a plain json object. Fields can be strings, numbers or references
/// (`{"link": .., "value": ..}`), the accessors flatten all of them to text.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct IncidentRecord(Map<String, Value>);

impl IncidentRecord {
	/// the value of a field as text
	pub fn field(&self, name: &str) -> Option<String> {
		match self.0.get(name)? {
			Value::String(value) => Some(value.clone()),
			Value::Number(value) => Some(value.to_string()),
			Value::Bool(value) => Some(value.to_string()),
			Value::Object(reference) => match reference.get("value")? {
				Value::String(value) => Some(value.clone()),
				_ => None,
			},
			Value::Null | Value::Array(_) => None,
		}
	}

	/// unique id used to address the record
	pub fn sys_id(&self) -> Result<String, ServiceNowError> {
		self.field("sys_id").filter(|id| !id.is_empty()).ok_or(ServiceNowError::MissingField("sys_id"))
	}

	/// human readable number like `INC0010042`
	pub fn number(&self) -> Option<String> {
		self.field("number")
	}

	/// lifecycle state code, its meaning depends on the instance
	pub fn state(&self) -> Option<String> {
		self.field("state")
	}
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for IncidentRecord {
	fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
		Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
	}
}

/// the operations the incident workflow needs from servicenow
#[async_trait]
pub trait IncidentClient: Send + Sync {
	/// creates a new incident with all fields of `incident`
	async fn create_incident(&self, incident: &Incident) -> Result<IncidentRecord, ServiceNowError>;

	/// returns the incidents whose fields equal the values in `filter`, in
	/// the order servicenow returns them
	async fn get_incidents(
		&self,
		filter: &[(&str, &str)],
	) -> Result<Vec<IncidentRecord>, ServiceNowError>;

	/// overwrites the fields of `incident` on the record `sys_id`
	async fn update_incident(
		&self,
		incident: &Incident,
		sys_id: &str,
	) -> Result<IncidentRecord, ServiceNowError>;
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;

	#[test]
	fn string_fields() {
		let record: IncidentRecord =
			[("sys_id", "42"), ("number", "INC42"), ("state", "6")].into_iter().collect();

		assert_eq!(record.sys_id().unwrap(), "42");
		assert_eq!(record.number().as_deref(), Some("INC42"));
		assert_eq!(record.state().as_deref(), Some("6"));
	}

	#[test]
	fn numeric_state() {
		let record: IncidentRecord = serde_json::from_value(json!({ "state": 7 })).unwrap();

		assert_eq!(record.state().as_deref(), Some("7"));
	}

	#[test]
	fn reference_field() {
		let record: IncidentRecord = serde_json::from_value(json!({
			"caller_id": { "link": "https://instance.service-now.com/api/now/table/sys_user/1", "value": "1" }
		}))
		.unwrap();

		assert_eq!(record.field("caller_id").as_deref(), Some("1"));
	}

	#[test]
	fn missing_sys_id() {
		let record: IncidentRecord = [("number", "INC42")].into_iter().collect();

		assert!(matches!(record.sys_id(), Err(ServiceNowError::MissingField("sys_id"))));
	}

	#[test]
	fn null_field() {
		let record: IncidentRecord = serde_json::from_value(json!({ "state": null })).unwrap();

		assert_eq!(record.state(), None);
	}
}
