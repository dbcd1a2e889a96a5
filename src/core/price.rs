//! Pricing abstractions and core types

use crate::core::error::DataUnavailable;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

/// A spot quote for a precious metal.
#[derive(Debug, Clone, PartialEq)]
pub struct GoldQuote {
    /// Price per troy ounce in `currency`.
    pub price: f64,
    pub currency: String,
    pub metal: String,
    pub price_per_gram_24k: Option<f64>,
    pub quoted_at: Option<DateTime<Utc>>,
}

/// The gold price as seen by the return calculator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpotPrice {
    Available(f64),
    Unavailable,
}

impl SpotPrice {
    /// Wraps a raw price, rejecting anything that cannot be divided by.
    pub fn available(price: f64) -> Result<Self, DataUnavailable> {
        if price.is_finite() && price > 0.0 {
            Ok(SpotPrice::Available(price))
        } else {
            Err(DataUnavailable::new(
                "gold price",
                format!("non-positive price {price}"),
            ))
        }
    }

    pub fn from_quote(quote: &Result<GoldQuote, DataUnavailable>) -> Self {
        quote
            .as_ref()
            .ok()
            .and_then(|q| SpotPrice::available(q.price).ok())
            .unwrap_or(SpotPrice::Unavailable)
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            SpotPrice::Available(price) => Some(*price),
            SpotPrice::Unavailable => None,
        }
    }
}

#[async_trait]
pub trait GoldPriceProvider: Send + Sync {
    async fn fetch_spot_price(&self) -> Result<GoldQuote, DataUnavailable>;
}

/// One daily bar of an index. Only `close` is guaranteed.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexBar {
    pub date: NaiveDate,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: f64,
    pub volume: Option<u64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndexSeries {
    pub symbol: String,
    pub currency: Option<String>,
    /// Bars ordered by date, oldest first.
    pub bars: Vec<IndexBar>,
}

impl IndexSeries {
    pub fn first_close(&self) -> Option<f64> {
        self.bars.first().map(|b| b.close)
    }

    pub fn last_close(&self) -> Option<f64> {
        self.bars.last().map(|b| b.close)
    }

    /// Percentage change from the oldest to the latest close in the window.
    pub fn window_change(&self) -> Option<f64> {
        match (self.first_close(), self.last_close()) {
            (Some(first), Some(last)) if first > 0.0 => Some((last - first) / first * 100.0),
            _ => None,
        }
    }
}

#[async_trait]
pub trait IndexHistoryProvider: Send + Sync {
    async fn fetch_history(&self, window_days: u32) -> Result<IndexSeries, DataUnavailable>;
}
