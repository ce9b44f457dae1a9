use std::path::Path;

use auction_core::{ConfigError, MarketConfig};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Parameters of one experiment session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub name: String,
    pub display_name: String,
    pub num_participants: u32,
    /// Participants are split into consecutive groups of this size
    pub players_per_group: u32,
    pub market: MarketConfig,
    /// Seed for reservation value draws. None draws from entropy
    pub seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            name: "double_auction".to_string(),
            display_name: "Double auction".to_string(),
            num_participants: 3,
            players_per_group: 3,
            market: MarketConfig::default(),
            seed: None,
        }
    }
}

impl SessionConfig {
    /// Validate the configuration
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.num_participants == 0 {
            return Err(ConfigError::InvalidValue("num_participants"));
        }
        if self.players_per_group == 0 {
            return Err(ConfigError::InvalidValue("players_per_group"));
        }
        self.market.validate()
    }
}

/// Load session configuration from a JSON file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<SessionConfig> {
    let content = std::fs::read_to_string(path)?;
    load_config_from_str(&content)
}

/// Load configuration from a JSON string
pub fn load_config_from_str(json: &str) -> Result<SessionConfig> {
    let config: SessionConfig = serde_json::from_str(json)?;
    config.validate()?;
    Ok(config)
}

/// Load the default embedded configuration
pub fn load_default_config() -> Result<SessionConfig> {
    let default_config = include_str!("session_config.json");
    load_config_from_str(default_config)
}
