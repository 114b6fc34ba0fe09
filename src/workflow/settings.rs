use std::collections::HashSet;

use serde::Deserialize;

use crate::state_set::StateSet;

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct WorkflowSettings {
	/// incident field storing the group key of an alert group
	pub incident_group_key_field: String,
	/// incidents in one of these states are never updated
	pub no_update_states: StateSet,
	/// fields sent when updating an existing incident
	pub incident_update_fields: HashSet<String>,
}
