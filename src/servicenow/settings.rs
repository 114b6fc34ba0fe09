use serde::Deserialize;
use url::Url;

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ServiceNowSettings {
	pub instance_name: String,
	pub user_name: String,
	pub password: String,
	/// replaces `https://<instance_name>.service-now.com`
	pub base_url: Option<Url>,
}
