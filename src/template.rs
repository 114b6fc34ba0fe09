//! Renders incident fields via tera templates.
//!
//! Every template is rendered against the alert group it was received with,
//! e.g. `{{ commonAnnotations.summary }}` or
//! `{% for name, value in commonLabels %}{{ name }}={{ value }} {% endfor %}`.

use std::error::Error as StdError;

use tera::Tera;
use thiserror::Error;

use crate::alert;

/// failure to compile or render a single field template
#[derive(Error, Debug)]
pub enum TemplateError {
	#[error("could not serialize alert group into template context")]
	Context(#[source] tera::Error),
	#[error("failed to compile template `{name}`")]
	Compile {
		name: String,
		#[source]
		source: tera::Error,
	},
	#[error("failed to render template `{name}`")]
	Render {
		name: String,
		#[source]
		source: tera::Error,
	},
}

impl TemplateError {
	/// the error message including all of its causes, tera puts the
	/// interesting parts (line, undefined variable) into the source chain
	pub fn chain(&self) -> String {
		let mut message = self.to_string();
		let mut source = StdError::source(self);
		while let Some(err) = source {
			message.push_str(": ");
			message.push_str(&err.to_string());
			source = StdError::source(err);
		}
		message
	}
}

/// Renders templates against a single alert group
pub struct TemplateRenderer {
	context: tera::Context,
}

impl TemplateRenderer {
	/// Builds the rendering context for an alert group
	pub fn new(data: &alert::Data) -> Result<Self, TemplateError> {
		let context = tera::Context::from_serialize(data).map_err(TemplateError::Context)?;

		Ok(Self { context })
	}

	/// Renders `body` as a template named `name`
	///
	/// # Arguments
	///
	/// * `name` - the name errors are attributed to, usually the incident field
	///
	/// * `body` - template source, the empty template renders to an empty string
	pub fn render(&self, name: &str, body: &str) -> Result<String, TemplateError> {
		if body.is_empty() {
			return Ok(String::new());
		}

		let mut tera = Tera::default();
		// incident fields are plain text
		tera.autoescape_on(vec![]);
		tera.add_raw_template(name, body).map_err(|source| TemplateError::Compile {
			name: name.to_owned(),
			source,
		})?;

		tera.render(name, &self.context).map_err(|source| TemplateError::Render {
			name: name.to_owned(),
			source,
		})
	}
}
