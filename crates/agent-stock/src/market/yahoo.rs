//! Yahoo Finance market data provider

use super::{DailyBar, InfoRecord, MarketDataProvider};
use crate::error::{Result, StockError};
use async_trait::async_trait;
use chrono::{DateTime, Days, NaiveDate, NaiveTime, Utc};
use time::OffsetDateTime;
use tracing::{debug, instrument, warn};
use yahoo_finance_api as yahoo;

/// Headlines folded into `news_summary`
const MAX_HEADLINES: usize = 8;

/// Yahoo Finance provider
///
/// The live snapshot is the latest daily quote plus a `news_summary` built
/// from the headlines Yahoo's search endpoint returns for the symbol.
#[derive(Debug, Clone, Default)]
pub struct YahooProvider {}

impl YahooProvider {
    /// Create a new Yahoo Finance provider
    pub fn new() -> Self {
        Self {}
    }

    fn connector() -> Result<yahoo::YahooConnector> {
        yahoo::YahooConnector::new().map_err(|e| StockError::YahooFinanceError(e.to_string()))
    }

    /// Recent headlines for a symbol as a bullet list
    #[instrument(skip(self))]
    pub async fn news_summary(&self, symbol: &str) -> Result<String> {
        let provider = Self::connector()?;

        let result = provider
            .search_ticker(symbol)
            .await
            .map_err(|e| StockError::YahooFinanceError(e.to_string()))?;

        let headlines: Vec<String> = result
            .news
            .iter()
            .take(MAX_HEADLINES)
            .map(|item| format!("- {} ({})", item.title, item.publisher))
            .collect();

        debug!("Found {} headlines for {}", headlines.len(), symbol);

        if headlines.is_empty() {
            return Ok(format!("No recent news found for {symbol}."));
        }
        Ok(headlines.join("\n"))
    }
}

/// Headlines, or a placeholder when the lookup failed
///
/// News is supplementary; a failed lookup never discards the quote.
fn news_or_fallback(symbol: &str, news: Result<String>) -> String {
    news.unwrap_or_else(|e| {
        warn!("News lookup failed for {}: {}", symbol, e);
        format!("No recent news found for {symbol}.")
    })
}

fn to_offset(date: NaiveDate) -> Result<OffsetDateTime> {
    let timestamp = date.and_time(NaiveTime::MIN).and_utc().timestamp();
    OffsetDateTime::from_unix_timestamp(timestamp)
        .map_err(|e| StockError::YahooFinanceError(format!("Invalid timestamp: {e}")))
}

#[async_trait]
impl MarketDataProvider for YahooProvider {
    #[instrument(skip(self))]
    async fn current_info(&self, symbol: &str) -> Result<InfoRecord> {
        let provider = Self::connector()?;

        let response = provider
            .get_latest_quotes(symbol, "1d")
            .await
            .map_err(|e| StockError::YahooFinanceError(e.to_string()))?;

        let quote = response.last_quote().map_err(|e| StockError::DataUnavailable {
            symbol: symbol.to_string(),
            reason: e.to_string(),
        })?;

        let timestamp = DateTime::from_timestamp(quote.timestamp as i64, 0).unwrap_or_else(Utc::now);

        let mut record = InfoRecord::new();
        record.insert("symbol".into(), symbol.into());
        record.insert("timestamp".into(), timestamp.to_rfc3339().into());
        record.insert("open".into(), quote.open.into());
        record.insert("high".into(), quote.high.into());
        record.insert("low".into(), quote.low.into());
        record.insert("close".into(), quote.close.into());
        record.insert("currentPrice".into(), quote.close.into());
        record.insert("volume".into(), quote.volume.into());
        record.insert("adjclose".into(), quote.adjclose.into());
        let news = news_or_fallback(symbol, self.news_summary(symbol).await);
        record.insert("news_summary".into(), news.into());

        Ok(record)
    }

    #[instrument(skip(self))]
    async fn daily_bar(&self, symbol: &str, date: NaiveDate) -> Result<Option<DailyBar>> {
        let provider = Self::connector()?;

        let next = date
            .checked_add_days(Days::new(1))
            .ok_or_else(|| StockError::YahooFinanceError(format!("Date out of range: {date}")))?;

        let response = provider
            .get_quote_history(symbol, to_offset(date)?, to_offset(next)?)
            .await
            .map_err(|e| StockError::YahooFinanceError(e.to_string()))?;

        let quotes = match response.quotes() {
            Ok(quotes) => quotes,
            Err(e) => {
                debug!("No quotes for {} on {}: {}", symbol, date, e);
                return Ok(None);
            }
        };

        Ok(quotes.first().map(|q| DailyBar {
            date,
            open: q.open,
            high: q.high,
            low: q.low,
            close: q.close,
            volume: q.volume,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_window() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
        let start = to_offset(date).unwrap();
        assert_eq!(start.unix_timestamp(), 1_717_372_800);
    }

    #[test]
    fn test_news_failure_falls_back() {
        let failed = Err(StockError::YahooFinanceError("timeout".into()));
        assert_eq!(news_or_fallback("AAPL", failed), "No recent news found for AAPL.");

        let found = Ok("- Apple ships (Reuters)".to_string());
        assert_eq!(news_or_fallback("AAPL", found), "- Apple ships (Reuters)");
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_current_info() {
        let provider = YahooProvider::new();
        let record = provider.current_info("AAPL").await.unwrap();

        assert_eq!(record["symbol"], "AAPL");
        assert!(record["currentPrice"].as_f64().unwrap() > 0.0);
        assert!(record.contains_key("news_summary"));
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_daily_bar() {
        let provider = YahooProvider::new();
        let date = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();

        let bar = provider.daily_bar("AAPL", date).await.unwrap();
        assert!(bar.is_some_and(|b| b.close > 0.0));
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_weekend_has_no_bar() {
        let provider = YahooProvider::new();
        let saturday = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();

        let bar = provider.daily_bar("AAPL", saturday).await.unwrap();
        assert!(bar.is_none());
    }
}
