//! Incidents are a set of fields whose names depend on how the servicenow
//! instance is set up, so they're kept as a map instead of a fixed struct.

use std::collections::HashSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{
	alert,
	group_key::GroupKey,
	template::{TemplateError, TemplateRenderer},
};

/// field carrying the identity of whoever raised the incident
pub const CALLER_ID_FIELD: &str = "caller_id";

/// incident fields to be sent to servicenow
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Incident(IndexMap<String, String>);

impl Incident {
	pub fn get(&self, field: &str) -> Option<&str> {
		self.0.get(field).map(String::as_str)
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Returns only the fields which may be sent when updating an existing
	/// incident. An empty whitelist yields an empty incident.
	pub fn filter_for_update(&self, update_fields: &HashSet<String>) -> Self {
		Self(
			self.0
				.iter()
				.filter(|(field, _)| update_fields.contains(field.as_str()))
				.map(|(field, value)| (field.clone(), value.clone()))
				.collect(),
		)
	}
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Incident {
	fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
		Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
	}
}

/// Candidate incident together with the template errors hit while building it
#[derive(Debug)]
pub struct BuiltIncident {
	pub incident: Incident,
	pub template_errors: Vec<TemplateError>,
}

/// Maps alert groups onto incidents
#[derive(Debug, Clone)]
pub struct IncidentBuilder {
	/// value of the [CALLER_ID_FIELD]
	caller_id: String,
	/// name of the field storing the [GroupKey]
	group_key_field: String,
	/// field name to template
	default_incident: IndexMap<String, String>,
}

impl IncidentBuilder {
	pub fn new(
		caller_id: impl Into<String>,
		group_key_field: impl Into<String>,
		default_incident: IndexMap<String, String>,
	) -> Self {
		Self {
			caller_id: caller_id.into(),
			group_key_field: group_key_field.into(),
			default_incident,
		}
	}

	pub fn group_key_field(&self) -> &str {
		&self.group_key_field
	}

	/// Builds the incident for an alert group
	///
	/// The caller id and group key fields are set first and may be overridden
	/// by the default incident. Every field is then rendered as a template.
	/// A field which fails to render is set to the empty string and its error
	/// is returned alongside the incident.
	///
	/// # Arguments
	///
	/// * `data` - the alert group
	///
	/// * `group_key` - the key derived from the group labels of `data`
	pub fn build(&self, data: &alert::Data, group_key: &GroupKey) -> BuiltIncident {
		let mut fields = IndexMap::with_capacity(self.default_incident.len() + 2);
		fields.insert(CALLER_ID_FIELD.to_owned(), self.caller_id.clone());
		fields.insert(self.group_key_field.clone(), group_key.to_string());
		for (field, template) in self.default_incident.iter() {
			fields.insert(field.clone(), template.clone());
		}

		let mut template_errors = Vec::new();

		let renderer = match TemplateRenderer::new(data) {
			Ok(renderer) => renderer,
			Err(err) => {
				// without a context nothing renders, keep the raw values
				template_errors.push(err);
				return BuiltIncident { incident: Incident(fields), template_errors };
			}
		};

		for (field, value) in fields.iter_mut() {
			match renderer.render(field, value.as_str()) {
				Ok(rendered) => *value = rendered,
				Err(err) => {
					value.clear();
					template_errors.push(err);
				}
			}
		}

		BuiltIncident { incident: Incident(fields), template_errors }
	}
}
