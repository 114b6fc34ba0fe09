//! prometheus meters for the incident workflow

use prometheus::{opts, IntCounter, Registry};

#[derive(Debug, Clone)]
pub(crate) struct WorkflowMetrics {
	/// number of incident fields whose template failed
	template_errors: IntCounter,
	/// number of incident fields with invalid values
	validation_errors: IntCounter,
}

impl WorkflowMetrics {
	pub(crate) fn new(registry: &Registry) -> Result<Self, prometheus::Error> {
		let template_errors = IntCounter::with_opts(opts!(
			"webhook_incident_template_errors_total",
			"Total number of incident template errors."
		))?;
		let validation_errors = IntCounter::with_opts(opts!(
			"webhook_incident_validation_errors_total",
			"Total number of incident validation errors."
		))?;

		registry.register(Box::new(template_errors.clone()))?;
		registry.register(Box::new(validation_errors.clone()))?;

		Ok(Self { template_errors, validation_errors })
	}

	pub(crate) fn record_template_error(&self) {
		self.template_errors.inc();
	}

	pub(crate) fn record_validation_error(&self) {
		self.validation_errors.inc();
	}
}
