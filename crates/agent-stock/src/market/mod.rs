//! Market data retrieval
//!
//! [`MarketDataProvider`] is the seam to the external data source;
//! [`MarketDataFetcher`] turns provider answers, gaps and failures into one
//! [`InfoRecord`] per symbol.

mod fetcher;
mod yahoo;

pub use fetcher::{MarketDataFetcher, NO_DATA_MARKER};
pub use yahoo::YahooProvider;

use crate::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Arbitrary key/value record describing a symbol's "today info"
pub type InfoRecord = serde_json::Map<String, serde_json::Value>;

/// One day of OHLCV data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl DailyBar {
    /// Flatten into a record for `symbol`
    pub fn into_record(self, symbol: &str) -> InfoRecord {
        let mut record = InfoRecord::new();
        record.insert("symbol".into(), symbol.into());
        record.insert("date".into(), self.date.to_string().into());
        record.insert("open".into(), self.open.into());
        record.insert("high".into(), self.high.into());
        record.insert("low".into(), self.low.into());
        record.insert("close".into(), self.close.into());
        record.insert("volume".into(), self.volume.into());
        record
    }
}

/// External source of per-symbol market data
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Current snapshot for a symbol
    async fn current_info(&self, symbol: &str) -> Result<InfoRecord>;

    /// The bar for exactly `date`, or `None` if the symbol did not trade that day
    async fn daily_bar(&self, symbol: &str, date: NaiveDate) -> Result<Option<DailyBar>>;
}
