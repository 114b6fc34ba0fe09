//! Reconciles alert groups with servicenow incidents.
//!
//! For every alert group the incidents carrying its group key are looked up.
//! Incidents in one of the `no_update_states` are ignored. A firing group
//! updates the first remaining incident or creates a new one, a resolved group
//! only updates. Updates only send the `incident_update_fields`, the state of
//! an incident is never touched.

use std::{collections::HashSet, sync::Arc};

use prometheus::Registry;
use thiserror::Error;

use self::metrics::WorkflowMetrics;
use crate::{
	alert::{self, GroupStatus},
	group_key::GroupKey,
	incident::{Incident, IncidentBuilder},
	servicenow::{IncidentClient, IncidentRecord, ServiceNowError},
	settings::Settings,
	state_set::StateSet,
	validation::validate_incident,
};

mod metrics;
pub mod settings;

/// terminal error of a webhook call
#[derive(Error, Debug)]
pub enum WorkflowError {
	#[error(transparent)]
	ServiceNow(#[from] ServiceNowError),
}

/// what the workflow did with an alert group
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
	/// a new incident was created
	Created(IncidentRecord),
	/// the existing incident was updated
	Updated(IncidentRecord),
	/// resolved group without an updatable incident
	NothingToUpdate,
	/// neither firing nor resolved
	UnknownStatus(String),
}

/// Incident workflow, shared by all webhook calls
pub struct IncidentWorkflow {
	client: Arc<dyn IncidentClient>,
	builder: IncidentBuilder,
	no_update_states: StateSet,
	update_fields: HashSet<String>,
	metrics: WorkflowMetrics,
}

impl IncidentWorkflow {
	/// Constructs the workflow
	///
	/// # Arguments
	///
	/// * `settings` - the loaded settings, they are never reloaded
	///
	/// * `client` - servicenow connection
	///
	/// * `registry` - where the template and validation error meters get registered
	pub fn new(
		settings: &Settings,
		client: Arc<dyn IncidentClient>,
		registry: &Registry,
	) -> Result<Self, prometheus::Error> {
		let builder = IncidentBuilder::new(
			settings.service_now.user_name.as_str(),
			settings.workflow.incident_group_key_field.as_str(),
			settings.default_incident.clone(),
		);

		Ok(Self {
			client,
			builder,
			no_update_states: settings.workflow.no_update_states.clone(),
			update_fields: settings.workflow.incident_update_fields.clone(),
			metrics: WorkflowMetrics::new(registry)?,
		})
	}

	/// Handles a single alert group. Any failed servicenow request aborts
	/// the workflow.
	pub async fn on_alert_group(&self, data: &alert::Data) -> Result<Outcome, WorkflowError> {
		tracing::info!(
			"received alert group: status={}, group_labels={:?}, common_labels={:?}, common_annotations={:?}",
			data.status,
			data.group_labels,
			data.common_labels,
			data.common_annotations
		);

		let group_key = GroupKey::derive(&data.group_labels);

		let existing = self
			.client
			.get_incidents(&[(self.builder.group_key_field(), group_key.as_str())])
			.await?;
		tracing::info!("found {} existing incident(s) for alert group key {group_key}", existing.len());

		let updatable = self.updatable_incident(existing, &group_key);

		match data.group_status() {
			GroupStatus::Firing => self.on_firing_group(data, &group_key, updatable).await,
			GroupStatus::Resolved => self.on_resolved_group(data, &group_key, updatable).await,
			GroupStatus::Unknown(status) => {
				tracing::error!("unknown alert group status: {status}");
				Ok(Outcome::UnknownStatus(status.to_owned()))
			}
		}
	}

	async fn on_firing_group(
		&self,
		data: &alert::Data,
		group_key: &GroupKey,
		updatable: Option<IncidentRecord>,
	) -> Result<Outcome, WorkflowError> {
		let incident = self.build_incident(data, group_key);

		match updatable {
			None => {
				tracing::info!("found no updatable incident for firing alert group key {group_key}");
				let created = self.client.create_incident(&incident).await?;
				tracing::info!(
					"created incident {} for alert group key {group_key}",
					display_number(&created)
				);
				Ok(Outcome::Created(created))
			}
			Some(existing) => {
				tracing::info!(
					"found updatable incident {} with state {} for firing alert group key {group_key}",
					display_number(&existing),
					display_state(&existing)
				);
				self.update(&incident, &existing).await
			}
		}
	}

	async fn on_resolved_group(
		&self,
		data: &alert::Data,
		group_key: &GroupKey,
		updatable: Option<IncidentRecord>,
	) -> Result<Outcome, WorkflowError> {
		// template errors are reported for every resolved group
		let incident = self.build_incident(data, group_key);

		match updatable {
			None => {
				tracing::info!(
					"found no updatable incident for resolved alert group key {group_key}, no incident will be created or updated"
				);
				Ok(Outcome::NothingToUpdate)
			}
			Some(existing) => {
				tracing::info!(
					"found updatable incident {} with state {} for resolved alert group key {group_key}",
					display_number(&existing),
					display_state(&existing)
				);
				self.update(&incident, &existing).await
			}
		}
	}

	/// sends the whitelisted fields of `incident` to `existing`
	async fn update(
		&self,
		incident: &Incident,
		existing: &IncidentRecord,
	) -> Result<Outcome, WorkflowError> {
		let sys_id = existing.sys_id()?;
		let update = incident.filter_for_update(&self.update_fields);

		if update.is_empty() {
			tracing::debug!("no update fields configured, sending empty update to {sys_id}");
		} else {
			tracing::debug!("updating {} field(s) of {sys_id}", update.len());
		}

		let updated = self.client.update_incident(&update, &sys_id).await?;

		Ok(Outcome::Updated(updated))
	}

	/// Picks the incident to update, the first one servicenow returned whose
	/// state allows updates
	fn updatable_incident(
		&self,
		existing: Vec<IncidentRecord>,
		group_key: &GroupKey,
	) -> Option<IncidentRecord> {
		let mut updatable: Vec<_> = existing
			.into_iter()
			.filter(|incident| match incident.state() {
				Some(state) => !self.no_update_states.contains(&state),
				None => true,
			})
			.collect();

		tracing::info!("found {} updatable incident(s) for alert group key {group_key}", updatable.len());

		if updatable.is_empty() {
			return None;
		}

		let first = updatable.remove(0);
		if !updatable.is_empty() {
			tracing::warn!(
				"multiple updatable incidents found for alert group key {group_key}, using the first one: {}",
				display_number(&first)
			);
		}

		Some(first)
	}

	/// builds and validates the incident, errors are only logged
	fn build_incident(&self, data: &alert::Data, group_key: &GroupKey) -> Incident {
		let built = self.builder.build(data, group_key);

		for err in built.template_errors.iter() {
			self.metrics.record_template_error();
			tracing::error!("error in default incident template: {}", err.chain());
		}

		for err in validate_incident(&built.incident) {
			self.metrics.record_validation_error();
			tracing::error!("{err}, the incident will be submitted anyway");
		}

		built.incident
	}
}

fn display_number(incident: &IncidentRecord) -> String {
	incident.number().unwrap_or_else(|| String::from("<unknown>"))
}

fn display_state(incident: &IncidentRecord) -> String {
	incident.state().unwrap_or_else(|| String::from("<unknown>"))
}
