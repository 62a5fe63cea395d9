use crate::config::SamplerConfig;
use crate::error::{Error, Result};
use crate::exchange::{ExchangeConfig, PairConfig};
use crate::storage::StorageConfig;
use config::{Config, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub exchange: ExchangeConfig,
    #[serde(default)]
    pub sampler: SamplerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    pub pairs: Vec<PairConfig>,
}

impl AppConfig {
    pub fn load(env: &str) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::with_name("config/default"))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::with_prefix("RATEINFRA"))
            .build()
            .map_err(|e| Error::ConfigError(e.to_string()))?;

        let app: AppConfig = config
            .try_deserialize()
            .map_err(|e| Error::ConfigError(e.to_string()))?;
        app.validate()?;

        Ok(app)
    }

    /// Rejects values that deserialize fine but would only fail at runtime.
    fn validate(&self) -> Result<()> {
        if self.sampler.poll_interval_secs == Some(0) {
            return Err(Error::ConfigError(
                "sampler.poll_interval_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
