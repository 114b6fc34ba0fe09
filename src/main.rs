//! prometheus alertmanager receiver that manages servicenow incidents
//!
//! Features:
//! - one incident per alert group, identified by a hash of the group labels
//! - firing groups create an incident or update the existing one
//! - resolved groups only update the existing incident
//! - incident fields configured as tera templates rendered against the alert group
//! - incidents in configured states are never updated

use std::sync::Arc;

use anyhow::{Context, Result};
use prometheus::Registry;
use settings::Settings;

use crate::{
	alertmanager_webhook_receiver::State,
	servicenow::{IncidentClient, ServiceNowClient},
	workflow::IncidentWorkflow,
};

mod alert;
mod alertmanager_webhook_receiver;
mod group_key;
mod incident;
mod log;
mod servicenow;
mod settings;
mod state_set;
mod telemetry_endpoint;
mod template;
mod validation;
mod workflow;

/// exit the complete program if one thread panics
fn setup_panic_handler() {
	let default_panic = std::panic::take_hook();
	std::panic::set_hook(Box::new(move |info| {
		default_panic(info);
		std::process::exit(1);
	}));
}

/// the entry point of the program
#[tokio::main]
pub async fn main() -> Result<()> {
	setup_panic_handler();

	let settings = Settings::load().context("failed to load config and command line arguments")?;

	log::setup_logging(&settings.log).context("could not setup logging")?;

	tracing::info!("starting {} {}", clap::crate_name!(), clap::crate_version!());

	let registry = Registry::new();

	let client: Arc<dyn IncidentClient> = Arc::new(
		ServiceNowClient::new(&settings.service_now, &registry)
			.context("failed to construct servicenow client")?,
	);

	let workflow = IncidentWorkflow::new(&settings, client, &registry)
		.context("failed to construct incident workflow")?;

	let state = Arc::new(State::new(workflow, registry).context("failed to register metrics")?);

	alertmanager_webhook_receiver::run_receiver(&settings.webhook, state).await
}
