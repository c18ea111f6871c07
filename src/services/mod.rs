//! External collaborators: market data, option volume files, webhook delivery,
//! persisted state

pub mod cboe;
pub mod market_data;
pub mod state_store;
pub mod webhook;
pub mod yahoo;

pub use cboe::CboeVolumeClient;
pub use market_data::{MarketDataProvider, StaticMarketDataProvider};
pub use state_store::{SignalSnapshot, SignalStateStore};
pub use webhook::WebhookNotifier;
pub use yahoo::YahooFinanceProvider;
