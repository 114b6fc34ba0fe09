//! semantic checks on incident fields before they are submitted
//!
//! Validation is advisory: errors are reported and logged by the caller, the
//! offending fields are submitted unchanged.

use thiserror::Error;

use crate::incident::Incident;

/// fields servicenow expects to hold an integer
pub const NUMERIC_FIELDS: [&str; 2] = ["impact", "urgency"];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
	#[error("'{field}' field value is {value} but should be an integer, please fix your configuration")]
	NotAnInteger { field: &'static str, value: String },
}

/// Checks that `impact` and `urgency` parse as integers if they are set to a
/// non empty value. Returns one error per offending field.
pub fn validate_incident(incident: &Incident) -> Vec<ValidationError> {
	NUMERIC_FIELDS
		.iter()
		.filter_map(|&field| {
			let value = incident.get(field).filter(|value| !value.is_empty())?;
			match value.parse::<i64>() {
				Ok(_) => None,
				Err(_) => Some(ValidationError::NotAnInteger { field, value: value.to_owned() }),
			}
		})
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	fn incident(fields: &[(&str, &str)]) -> Incident {
		fields.iter().copied().collect()
	}

	#[test]
	fn empty_incident() {
		assert!(validate_incident(&Incident::default()).is_empty());
	}

	#[test]
	fn integers() {
		assert!(validate_incident(&incident(&[("impact", "2"), ("urgency", "-1")])).is_empty());
	}

	#[test]
	fn empty_strings() {
		assert!(validate_incident(&incident(&[("impact", ""), ("urgency", "")])).is_empty());
	}

	#[test]
	fn other_fields_are_ignored() {
		assert!(validate_incident(&incident(&[("priority", "high")])).is_empty());
	}

	#[test]
	fn not_integers() {
		let errors = validate_incident(&incident(&[("impact", "<no value>"), ("urgency", "3.5")]));

		assert_eq!(
			errors,
			vec![
				ValidationError::NotAnInteger { field: "impact", value: "<no value>".to_owned() },
				ValidationError::NotAnInteger { field: "urgency", value: "3.5".to_owned() },
			]
		);
	}

	#[test]
	fn only_urgency() {
		let errors = validate_incident(&incident(&[("impact", "1"), ("urgency", "high")]));

		assert_eq!(errors.len(), 1);
		assert_eq!(
			errors[0].to_string(),
			"'urgency' field value is high but should be an integer, please fix your configuration"
		);
	}
}
