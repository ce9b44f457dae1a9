use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::values::Price;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid range for {name}: min {min} > max {max}")]
    InvalidRange { name: &'static str, min: Price, max: Price },

    #[error("Trading window must be longer than zero seconds")]
    EmptyTradingWindow,

    #[error("Invalid value for {0}")]
    InvalidValue(&'static str),
}

/// Parameters of a double auction market
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketConfig {
    /// Units every seller starts with
    pub items_per_seller: u32,
    pub valuation_min: Price,
    pub valuation_max: Price,
    pub production_costs_min: Price,
    pub production_costs_max: Price,
    /// Length of the trading window in seconds
    pub trading_window_secs: i64,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            items_per_seller: 3,
            valuation_min: 50,
            valuation_max: 110,
            production_costs_min: 10,
            production_costs_max: 80,
            trading_window_secs: 5 * 60,
        }
    }
}

impl MarketConfig {
    /// Bid of a buyer that is not currently bidding
    pub fn no_bid(&self) -> Price {
        0
    }

    /// Ask of a seller that is not currently asking, above any valid bid
    pub fn no_ask(&self) -> Price {
        self.valuation_max + 1
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.valuation_min > self.valuation_max {
            return Err(ConfigError::InvalidRange {
                name: "valuation",
                min: self.valuation_min,
                max: self.valuation_max,
            });
        }
        if self.production_costs_min > self.production_costs_max {
            return Err(ConfigError::InvalidRange {
                name: "production_costs",
                min: self.production_costs_min,
                max: self.production_costs_max,
            });
        }
        // The no-ask sentinel sits one above the highest valuation
        if self.valuation_max >= Price::MAX {
            return Err(ConfigError::InvalidValue("valuation_max"));
        }
        if self.valuation_min <= self.no_bid() {
            return Err(ConfigError::InvalidValue("valuation_min"));
        }
        if self.trading_window_secs <= 0 {
            return Err(ConfigError::EmptyTradingWindow);
        }
        Ok(())
    }
}
