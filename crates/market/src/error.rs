pub use auction_ports::MarketError;

pub type Result<T> = std::result::Result<T, MarketError>;
