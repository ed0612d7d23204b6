use backoffice_api::ApiSettings;
use backoffice_services::MockDataConfig;
use config::{Config, ConfigError, Environment, File};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub data: DataConfig,
    pub risk: RiskConfig,
    pub api: ApiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    pub match_count: usize,
    pub bet_count: usize,
    pub user_count: usize,
    pub seed: Option<u64>,
    /// Serve this exported snapshot instead of generated data.
    pub snapshot_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskConfig {
    pub exposure_threshold: Decimal,
    pub high_risk_match_limit: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub default_page_size: u32,
    pub max_page_size: u32,
    pub recent_live_limit: usize,
}

impl AppConfig {
    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let config = Config::builder()
            // Start with default values
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("data.match_count", 30)?
            .set_default("data.bet_count", 200)?
            .set_default("data.user_count", 15)?
            .set_default("risk.exposure_threshold", 500_000.0)?
            .set_default("risk.high_risk_match_limit", 10)?
            .set_default("api.default_page_size", 50)?
            .set_default("api.max_page_size", 100)?
            .set_default("api.recent_live_limit", 5)?
            // Add in settings from configuration file
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            .add_source(File::with_name("config/local").required(false))
            // BACKOFFICE__DATA__SEED=7 style overrides
            .add_source(Environment::with_prefix("BACKOFFICE").separator("__"))
            .build()?;

        let config: Self = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.risk.exposure_threshold < Decimal::ZERO {
            return Err(ConfigError::Message(
                "risk.exposure_threshold must not be negative".to_string(),
            ));
        }

        if self.api.default_page_size == 0 || self.api.default_page_size > self.api.max_page_size {
            return Err(ConfigError::Message(format!(
                "api.default_page_size must be between 1 and {}",
                self.api.max_page_size
            )));
        }

        Ok(())
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn mock_data(&self) -> MockDataConfig {
        MockDataConfig {
            match_count: self.data.match_count,
            bet_count: self.data.bet_count,
            user_count: self.data.user_count,
            seed: self.data.seed,
        }
    }

    pub fn api_settings(&self) -> ApiSettings {
        ApiSettings {
            exposure_threshold: self.risk.exposure_threshold,
            high_risk_limit: self.risk.high_risk_match_limit,
            default_page_size: self.api.default_page_size,
            max_page_size: self.api.max_page_size,
            recent_live_limit: self.api.recent_live_limit,
        }
    }
}
