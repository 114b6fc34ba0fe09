//! Here we expose prometheus metrics about the receiver
use std::sync::Arc;

use axum::{
	extract::Extension,
	http::{header::CONTENT_TYPE, StatusCode},
	response::{IntoResponse, Response},
};
use prometheus::{labels, opts, Encoder, IntGauge, Registry, TextEncoder};

use crate::alertmanager_webhook_receiver::State;

/// registers a gauge fixed at 1 carrying the crate version
pub fn register_build_info(registry: &Registry) -> Result<(), prometheus::Error> {
	let build_info = IntGauge::with_opts(opts!(
		"build_info",
		"A metric with a constant '1' value labeled by the version of the receiver.",
		labels! {"version" => clap::crate_version!()}
	))?;
	build_info.set(1);

	registry.register(Box::new(build_info))
}

pub async fn metrics_handler(Extension(state): Extension<Arc<State>>) -> Response {
	let mut buffer = vec![];
	let encoder = TextEncoder::new();
	let metric_families = state.registry().gather();

	if let Err(err) = encoder.encode(&metric_families, &mut buffer) {
		tracing::error!("failed to encode metrics: {err}");
		return (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response();
	}

	([(CONTENT_TYPE, encoder.format_type().to_owned())], buffer).into_response()
}
