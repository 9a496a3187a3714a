use chrono::Duration;
use serde::Deserialize;

use crate::models::ladder::{PrizeLadder, DEFAULT_FIREPROOF_LEVELS, DEFAULT_PRIZES};

/// Default time window a game may be played in: 35 minutes.
pub const DEFAULT_TIME_LIMIT_SECONDS: i64 = 35 * 60;

/// Tunables of the engine. The ladder values and the fireproof tier list are
/// deployment configuration, not code; the defaults are the classic table.
#[derive(Debug, Clone, Deserialize)]
pub struct GameConfig {
    pub time_limit_seconds: i64,
    pub prizes: Vec<i64>,
    pub fireproof_levels: Vec<u8>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            time_limit_seconds: DEFAULT_TIME_LIMIT_SECONDS,
            prizes: DEFAULT_PRIZES.to_vec(),
            fireproof_levels: DEFAULT_FIREPROOF_LEVELS.to_vec(),
        }
    }
}

impl GameConfig {
    /// Loads `config/<APP_ENV>.toml` if present, then applies `GAME_`-prefixed
    /// environment overrides, falling back to the defaults per field.
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "dev".to_string());

        let settings = config::Config::builder()
            .add_source(config::File::with_name(&format!("config/{}", env)).required(false))
            .add_source(
                config::Environment::with_prefix("GAME")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        let defaults = GameConfig::default();

        let time_limit_seconds = settings
            .get_int("time_limit_seconds")
            .unwrap_or(defaults.time_limit_seconds);

        let prizes = match settings.get_array("prizes") {
            Ok(values) => values
                .into_iter()
                .map(|v| v.into_int())
                .collect::<Result<Vec<i64>, _>>()?,
            Err(_) => defaults.prizes,
        };

        let fireproof_levels = match settings.get_array("fireproof_levels") {
            Ok(values) => values
                .into_iter()
                .map(|v| v.into_int().map(|n| n as u8))
                .collect::<Result<Vec<u8>, _>>()?,
            Err(_) => defaults.fireproof_levels,
        };

        let cfg = GameConfig {
            time_limit_seconds,
            prizes,
            fireproof_levels,
        };
        cfg.validate()
            .map_err(|e| config::ConfigError::Message(e.to_string()))?;
        Ok(cfg)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.time_limit_seconds > 0,
            "time_limit_seconds must be positive"
        );
        PrizeLadder::new(self.prizes.clone(), self.fireproof_levels.clone())?;
        Ok(())
    }

    pub fn time_limit(&self) -> Duration {
        Duration::seconds(self.time_limit_seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn default_config_is_valid() {
        let cfg = GameConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.time_limit(), Duration::minutes(35));
        assert_eq!(cfg.prizes.len(), 15);
        assert_eq!(cfg.fireproof_levels, vec![4, 9, 14]);
    }

    #[test]
    fn validate_rejects_a_broken_ladder() {
        let mut cfg = GameConfig::default();
        cfg.prizes[5] = cfg.prizes[4];
        assert!(cfg.validate().is_err());

        let mut cfg = GameConfig::default();
        cfg.time_limit_seconds = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    #[serial]
    fn load_falls_back_to_defaults() {
        std::env::remove_var("GAME_TIME_LIMIT_SECONDS");
        let cfg = GameConfig::load().expect("load config");
        assert_eq!(cfg.time_limit_seconds, DEFAULT_TIME_LIMIT_SECONDS);
        assert_eq!(cfg.prizes, DEFAULT_PRIZES.to_vec());
    }

    #[test]
    #[serial]
    fn load_honors_environment_override() {
        std::env::set_var("GAME_TIME_LIMIT_SECONDS", "120");
        let cfg = GameConfig::load().expect("load config");
        assert_eq!(cfg.time_limit_seconds, 120);
        std::env::remove_var("GAME_TIME_LIMIT_SECONDS");
    }
}
