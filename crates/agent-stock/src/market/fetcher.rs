//! Per-symbol fetch with inline error records

use super::{InfoRecord, MarketDataProvider};
use chrono::{Local, NaiveDate};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Prefix of the `error` field when a dated request finds no trading data
pub const NO_DATA_MARKER: &str = "no trading data for";

/// Fetches one record per symbol, never failing the batch
///
/// Provider failures become records carrying `symbol`, `date` and `error`,
/// so the output always lines up with the input.
#[derive(Clone)]
pub struct MarketDataFetcher {
    provider: Arc<dyn MarketDataProvider>,
}

impl MarketDataFetcher {
    pub fn new(provider: Arc<dyn MarketDataProvider>) -> Self {
        Self { provider }
    }

    /// One record per symbol, in input order
    pub async fn fetch(&self, symbols: &[String], date: Option<NaiveDate>) -> Vec<InfoRecord> {
        let mut records = Vec::with_capacity(symbols.len());
        for symbol in symbols {
            records.push(self.fetch_one(symbol, date).await);
        }
        records
    }

    /// Record for a single symbol
    ///
    /// No date, or today's date, asks for the live snapshot. Any other date
    /// asks for that day's bar.
    #[instrument(skip(self))]
    pub async fn fetch_one(&self, symbol: &str, date: Option<NaiveDate>) -> InfoRecord {
        let requested = date.filter(|d| *d != Local::now().date_naive());

        let result = match requested {
            None => self.provider.current_info(symbol).await,
            Some(day) => self.provider.daily_bar(symbol, day).await.map(|bar| match bar {
                Some(bar) => bar.into_record(symbol),
                None => {
                    debug!("No trading data for {} on {}", symbol, day);
                    error_record(symbol, date, format!("{NO_DATA_MARKER} {day}"))
                }
            }),
        };

        result.unwrap_or_else(|e| {
            warn!("Market data fetch failed for {}: {}", symbol, e);
            error_record(symbol, date, e.to_string())
        })
    }
}

fn error_record(symbol: &str, date: Option<NaiveDate>, error: String) -> InfoRecord {
    let mut record = InfoRecord::new();
    record.insert("symbol".into(), symbol.into());
    record.insert(
        "date".into(),
        date.map_or(Value::Null, |d| d.to_string().into()),
    );
    record.insert("error".into(), error.into());
    record
}
