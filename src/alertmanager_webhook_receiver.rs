//! http endpoint receiving alert groups from alertmanager
//!
//! Routes:
//! - `POST /webhook` alertmanager webhook, see [webhook]
//! - `GET /metrics` prometheus metrics
//! - `GET /` home page
use std::{
	net::{Ipv4Addr, SocketAddr},
	sync::Arc,
};

use anyhow::{Context, Result};
use axum::{
	extract::Extension,
	response::Html,
	routing::{get, post},
	Json, Router,
};
use bytes::Bytes;
use chrono::Utc;
use http::StatusCode;
use prometheus::{opts, Gauge, IntCounterVec, Registry};
use serde::{Deserialize, Serialize};

use crate::{alert, telemetry_endpoint, workflow::IncidentWorkflow};

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ReceiverSettings {
	pub listen_address: SocketAddr,
}

impl Default for ReceiverSettings {
	fn default() -> Self {
		Self { listen_address: SocketAddr::from((Ipv4Addr::UNSPECIFIED, 9877)) }
	}
}

/// body of every webhook response
#[derive(Debug, Serialize)]
pub struct JsonResponse {
	#[serde(rename = "Status")]
	pub status: u16,
	#[serde(rename = "Message")]
	pub message: String,
}

struct ReceiverMetrics {
	/// webhook requests by response status code
	requests: IntCounterVec,
	/// unix time of the last webhook request
	last_request: Gauge,
}

impl ReceiverMetrics {
	fn new(registry: &Registry) -> Result<Self, prometheus::Error> {
		let requests = IntCounterVec::new(
			opts!("webhook_requests_total", "Total number of HTTP requests on /webhook."),
			&["code"],
		)?;
		let last_request = Gauge::with_opts(opts!(
			"webhook_last_request_time_seconds",
			"Number of seconds since 1970 of the last HTTP request on /webhook."
		))?;

		registry.register(Box::new(requests.clone()))?;
		registry.register(Box::new(last_request.clone()))?;

		Ok(Self { requests, last_request })
	}

	fn record(&self, status: StatusCode) {
		self.requests.with_label_values(&[status.as_str()]).inc();
		self.last_request.set(Utc::now().timestamp() as f64);
	}
}

/// shared by all requests
pub struct State {
	workflow: IncidentWorkflow,
	metrics: ReceiverMetrics,
	registry: Registry,
}

impl State {
	pub fn new(workflow: IncidentWorkflow, registry: Registry) -> Result<Self, prometheus::Error> {
		let metrics = ReceiverMetrics::new(&registry)?;
		telemetry_endpoint::register_build_info(&registry)?;

		Ok(Self { workflow, metrics, registry })
	}

	pub fn registry(&self) -> &Registry {
		&self.registry
	}

	fn respond(&self, status: StatusCode, message: String) -> (StatusCode, Json<JsonResponse>) {
		self.metrics.record(status);

		(status, Json(JsonResponse { status: status.as_u16(), message }))
	}
}

/// Runs the alert group through the incident workflow
///
/// Responds with 400 if the body isn't an alert group, with 500 if
/// servicenow couldn't be queried or updated and with 200 otherwise.
async fn webhook(
	Extension(state): Extension<Arc<State>>,
	body: Bytes,
) -> (StatusCode, Json<JsonResponse>) {
	let data: alert::Data = match serde_json::from_slice(&body) {
		Ok(data) => data,
		Err(err) => {
			tracing::error!("error reading request body: {err}");
			return state.respond(StatusCode::BAD_REQUEST, err.to_string());
		}
	};

	match state.workflow.on_alert_group(&data).await {
		Ok(outcome) => {
			tracing::debug!("alert group handled: {outcome:?}");
			state.respond(StatusCode::OK, String::from("Success"))
		}
		Err(err) => {
			tracing::error!("error managing incident from alert group: {err}");
			state.respond(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
		}
	}
}

async fn homepage() -> Html<&'static str> {
	Html(
		r#"<html>
	<head><title>alertmanager-servicenow</title></head>
	<body>
	<h1>alertmanager-servicenow</h1>
	<p><a href="/metrics">Metrics</a></p>
	</body>
	</html>"#,
	)
}

pub fn router(state: Arc<State>) -> Router {
	Router::new()
		.route("/", get(homepage))
		.route("/webhook", post(webhook))
		.route("/metrics", get(telemetry_endpoint::metrics_handler))
		.layer(Extension(state))
}

pub async fn run_receiver(settings: &ReceiverSettings, state: Arc<State>) -> Result<()> {
	tracing::info!("listening on {}", settings.listen_address);

	axum::Server::bind(&settings.listen_address)
		.serve(router(state).into_make_service())
		.await
		.context("webhook endpoint crashed")?;

	Ok(())
}
