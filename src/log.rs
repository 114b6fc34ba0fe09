use std::str::FromStr;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing_subscriber::{
	filter::LevelFilter, fmt, prelude::__tracing_subscriber_SubscriberExt, util::SubscriberInitExt,
	EnvFilter,
};

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LogSettings {
	pub level: String,
}

impl Default for LogSettings {
	fn default() -> Self {
		Self { level: String::from("info") }
	}
}

impl LogSettings {
	fn filter(&self) -> Result<EnvFilter> {
		let level = tracing::Level::from_str(self.level.as_str())
			.context(format!("invalid log level {}", self.level))?;

		Ok(EnvFilter::default()
			.add_directive(LevelFilter::from_level(level).into())
			.add_directive("hyper=warn".parse()?)
			.add_directive("reqwest=warn".parse()?))
	}
}

pub fn setup_logging(settings: &LogSettings) -> Result<()> {
	let fmt_layer = fmt::layer();

	let filter_layer = settings.filter()?;

	tracing_subscriber::registry().with(filter_layer).with(fmt_layer).init();

	Ok(())
}
