use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize)]
pub struct AppConfig {
    pub(super) client_id: String,
    pub(super) client_secret: String,
    pub(super) refresh_token: String,
    pub(super) developer_key: String,
    #[serde(default = "default_catalog_host")]
    pub(super) catalog_host: String,
    #[serde(default = "default_request_delay_ms")]
    pub(super) request_delay_ms: u64,
    #[serde(default = "default_retry_attempts")]
    pub(super) retry_attempts: u32,
    #[serde(default = "default_retry_unit_ms")]
    pub(super) retry_unit_ms: u64,
    #[serde(default)]
    pub(super) remove_stale: bool,
    pub(super) extra_ids_file: Option<String>,
    #[serde(default = "default_partner_name")]
    pub(super) partner_name: String,
}

fn default_catalog_host() -> String {
    "khanacademy.org".to_string()
}

fn default_request_delay_ms() -> u64 {
    1000
}

fn default_retry_attempts() -> u32 {
    8
}

fn default_retry_unit_ms() -> u64 {
    1000
}

fn default_partner_name() -> String {
    "Monterey Institute for Technology and Education".to_string()
}

impl AppConfig {
    pub fn new_default() -> AppConfig {
        AppConfig {
            client_id: "".to_string(),
            client_secret: "".to_string(),
            refresh_token: "".to_string(),
            developer_key: "".to_string(),
            catalog_host: default_catalog_host(),
            request_delay_ms: default_request_delay_ms(),
            retry_attempts: default_retry_attempts(),
            retry_unit_ms: default_retry_unit_ms(),
            remove_stale: false,
            extra_ids_file: None,
            partner_name: default_partner_name(),
        }
    }
}
