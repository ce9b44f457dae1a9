mod role;
mod trade;
mod trader;

pub use role::Role;
pub use trade::{News, Trade, TradeId};
pub use trader::{Trader, TraderSeat};
