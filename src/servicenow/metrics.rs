//! prometheus meters for the servicenow client

use chrono::Utc;
use prometheus::{opts, Gauge, IntCounterVec, Registry};

#[derive(Debug, Clone)]
pub(crate) struct ClientMetrics {
	/// total number of requests to the servicenow instance
	requests: IntCounterVec,
	/// unix time of the last request
	last_request: Gauge,
}

impl ClientMetrics {
	pub(crate) fn new(registry: &Registry) -> Result<Self, prometheus::Error> {
		let requests = IntCounterVec::new(
			opts!("servicenow_requests_total", "Total number of HTTP requests to ServiceNow instance."),
			&["host", "method", "code"],
		)?;
		let last_request = Gauge::with_opts(opts!(
			"servicenow_last_request_time_seconds",
			"Number of seconds since 1970 of the last HTTP request to ServiceNow instance."
		))?;

		registry.register(Box::new(requests.clone()))?;
		registry.register(Box::new(last_request.clone()))?;

		Ok(Self { requests, last_request })
	}

	/// counts a finished request, `code` is `error` if no response was received
	pub(crate) fn record_request(&self, host: &str, method: &str, code: &str) {
		self.requests.with_label_values(&[host, method, code]).inc();
		self.last_request.set(Utc::now().timestamp() as f64);
	}
}
