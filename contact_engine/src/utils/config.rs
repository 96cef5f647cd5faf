// @file: contact_engine/src/utils/config.rs
// @description: Application configuration: defaults, optional config file, APP_* environment overrides.
// @author: LAS.

use serde::Deserialize;
use config::{Config, ConfigError, File, Environment};


//
// TYPE DEFINITIONS
//

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub log_level: String,

    // Server Settings
    pub server_bind_address: String,
    pub ws_path: String,

    // Liveness
    pub ping_interval_secs: u64,
    pub pong_timeout_secs: u64,

    // Import
    pub max_upload_bytes: usize,
    #[serde(default)]
    pub seed_csv_path: Option<String>,
}

impl AppConfig {
    //
    // PUBLIC INTERFACE
    //

    pub fn load() -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .set_default("log_level", "info")?

            // Server Defaults
            .set_default("server_bind_address", "127.0.0.1:8080")?
            .set_default("ws_path", "/ws")?

            // Liveness Defaults
            .set_default("ping_interval_secs", 30)?
            .set_default("pong_timeout_secs", 120)?

            // Import Defaults
            .set_default("max_upload_bytes", 10 * 1024 * 1024)?

            // File & Env Overrides
            .add_source(File::with_name("config").required(false))
            .add_source(Environment::with_prefix("APP"));

        let config = builder.build()?;
        let app_config: AppConfig = config.try_deserialize()?;
        app_config.validate()?;
        Ok(app_config)
    }

    /// Rejects settings that would disable liveness or uploads.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ping_interval_secs == 0 {
            return Err(ConfigError::Message("ping_interval_secs must be greater than 0".to_string()));
        }
        if self.pong_timeout_secs == 0 {
            return Err(ConfigError::Message("pong_timeout_secs must be greater than 0".to_string()));
        }
        if self.max_upload_bytes == 0 {
            return Err(ConfigError::Message("max_upload_bytes must be greater than 0".to_string()));
        }
        Ok(())
    }
}
