//! in memory [IncidentClient] recording every call
use std::sync::Mutex;

use async_trait::async_trait;

use super::{IncidentClient, IncidentRecord, ServiceNowError};
use crate::incident::Incident;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
	Get(Vec<(String, String)>),
	Create(Incident),
	Update(Incident, String),
}

#[derive(Default)]
pub(crate) struct MockClient {
	/// returned by every query
	pub(crate) existing: Vec<IncidentRecord>,
	pub(crate) fail_get: bool,
	pub(crate) fail_create: bool,
	pub(crate) fail_update: bool,
	pub(crate) calls: Mutex<Vec<Call>>,
}

impl MockClient {
	pub(crate) fn with_existing(existing: Vec<IncidentRecord>) -> Self {
		Self { existing, ..Default::default() }
	}

	pub(crate) fn calls(&self) -> Vec<Call> {
		self.calls.lock().unwrap().clone()
	}

	pub(crate) fn creates(&self) -> usize {
		self.calls().iter().filter(|call| matches!(call, Call::Create(_))).count()
	}

	pub(crate) fn updates(&self) -> usize {
		self.calls().iter().filter(|call| matches!(call, Call::Update(..))).count()
	}

	fn record(&self, call: Call) {
		self.calls.lock().unwrap().push(call);
	}
}

fn failed(body: &str) -> ServiceNowError {
	ServiceNowError::Status { status: 500, body: body.to_owned() }
}

#[async_trait]
impl IncidentClient for MockClient {
	async fn create_incident(&self, incident: &Incident) -> Result<IncidentRecord, ServiceNowError> {
		self.record(Call::Create(incident.clone()));
		if self.fail_create {
			return Err(failed("create failed"));
		}
		Ok([("sys_id", "created"), ("number", "INC0000001"), ("state", "1")].into_iter().collect())
	}

	async fn get_incidents(
		&self,
		filter: &[(&str, &str)],
	) -> Result<Vec<IncidentRecord>, ServiceNowError> {
		self.record(Call::Get(filter.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()));
		if self.fail_get {
			return Err(failed("get failed"));
		}
		Ok(self.existing.clone())
	}

	async fn update_incident(
		&self,
		incident: &Incident,
		sys_id: &str,
	) -> Result<IncidentRecord, ServiceNowError> {
		self.record(Call::Update(incident.clone(), sys_id.to_owned()));
		if self.fail_update {
			return Err(failed("update failed"));
		}
		Ok([("sys_id", sys_id)].into_iter().collect())
	}
}
