use anyhow::{Context, Result};
use clap::{Arg, Command};
use config::{builder::DefaultState, Config, ConfigBuilder, File, FileFormat};
use indexmap::IndexMap;
use serde::Deserialize;
use thiserror::Error;

use crate::{
	alertmanager_webhook_receiver::ReceiverSettings, log::LogSettings,
	servicenow::settings::ServiceNowSettings, workflow::settings::WorkflowSettings,
};

/// environment variables overriding settings from the config file
const ENV_OVERRIDES: [(&str, &str); 4] = [
	("SERVICENOW_INSTANCE_NAME", "service_now.instance_name"),
	("SERVICENOW_USERNAME", "service_now.user_name"),
	("SERVICENOW_PASSWORD", "service_now.password"),
	("SERVICENOW_INCIDENT_GROUP_KEY_FIELD", "workflow.incident_group_key_field"),
];

#[derive(Error, Debug)]
pub enum SettingsError {
	#[error("can't load config")]
	Config(#[from] config::ConfigError),
	#[error("config file is invalid: {}", .0.iter().map(|key| format!("{key} is missing")).collect::<Vec<_>>().join(", "))]
	Invalid(Vec<&'static str>),
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
	pub service_now: ServiceNowSettings,
	pub workflow: WorkflowSettings,
	/// incident field name to template
	pub default_incident: IndexMap<String, String>,
	pub webhook: ReceiverSettings,
	pub log: LogSettings,
}

impl Settings {
	/// Loads the settings from the command line, the config file and the
	/// environment
	pub fn load() -> Result<Self> {
		let opts = Command::new(clap::crate_name!())
			.version(clap::crate_version!())
			.about(clap::crate_description!())
			.author(clap::crate_authors!())
			.args(&[
				Arg::new("config")
					.help("path of config file")
					.takes_value(true)
					.short('c')
					.long("config")
					.default_value("./config.yaml"),
				Arg::new("listen-address")
					.help("address to listen on for webhook, metrics and home page requests")
					.takes_value(true)
					.long("listen-address"),
				Arg::new("level")
					.help("log level")
					.possible_values(["Error", "Warn", "Info", "Debug", "Trace"])
					.ignore_case(true)
					.takes_value(true)
					.long("log"),
			])
			.get_matches();

		let config_path = opts.value_of("config").unwrap_or("./config.yaml");

		let builder = Config::builder().add_source(File::with_name(config_path));
		let builder = with_env_overrides(builder, |name| std::env::var(name).ok())?
			.set_override_option("webhook.listen_address", opts.value_of("listen-address"))?
			.set_override_option("log.level", opts.value_of("level"))?;

		Self::from_builder(builder).context(format!("failed to load config from {config_path}"))
	}

	/// parses settings from a yaml document, without looking at the
	/// environment
	#[cfg(test)]
	pub fn from_yaml(content: &str) -> Result<Self, SettingsError> {
		Self::from_builder(Config::builder().add_source(File::from_str(content, FileFormat::Yaml)))
	}

	fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, SettingsError> {
		let settings: Settings = builder.build()?.try_deserialize()?;
		settings.validate()?;

		Ok(settings)
	}

	/// reports every required setting which is empty
	fn validate(&self) -> Result<(), SettingsError> {
		let required = [
			("instance_name", &self.service_now.instance_name),
			("user_name", &self.service_now.user_name),
			("password", &self.service_now.password),
			("incident_group_key_field", &self.workflow.incident_group_key_field),
		];

		let missing: Vec<_> =
			required.into_iter().filter(|(_, value)| value.is_empty()).map(|(key, _)| key).collect();

		if missing.is_empty() {
			Ok(())
		} else {
			Err(SettingsError::Invalid(missing))
		}
	}
}

/// applies [ENV_OVERRIDES], `lookup` returns the value of an environment variable
fn with_env_overrides(
	mut builder: ConfigBuilder<DefaultState>,
	lookup: impl Fn(&str) -> Option<String>,
) -> Result<ConfigBuilder<DefaultState>, SettingsError> {
	for (variable, key) in ENV_OVERRIDES {
		builder = builder.set_override_option(key, lookup(variable))?;
	}

	Ok(builder)
}
