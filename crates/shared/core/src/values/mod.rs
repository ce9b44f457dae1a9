use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// Price value in whole currency units
///
/// Bids, asks and reservation values are all integers.
pub type Price = i64;

/// Accumulated earnings of a trader
pub type Payoff = Decimal;

/// Timestamp in UTC
pub type Timestamp = DateTime<Utc>;

/// Identifier of a trader within its group (1-based)
pub type TraderId = u32;

/// Identifier of a trading group within a session (1-based)
pub type GroupId = u32;
