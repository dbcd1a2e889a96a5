use crate::core::error::DataUnavailable;
use crate::core::price::{IndexBar, IndexHistoryProvider, IndexSeries};
use crate::providers::util::{encode_symbol, http_client, transport_error};
use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument};

const FEED: &str = "index history";

fn value_at<T: Copy>(values: &Option<Vec<Option<T>>>, index: usize) -> Option<T> {
    values
        .as_ref()
        .and_then(|v| v.get(index).copied().flatten())
}

/// Pairs timestamps with quote columns, dropping bars without a close.
fn extract_bars(item: &ChartItem) -> Vec<IndexBar> {
    let (Some(timestamps), Some(quote)) = (
        item.timestamp.as_ref(),
        item.indicators.as_ref().and_then(|inds| inds.quote.first()),
    ) else {
        return Vec::new();
    };
    let offset = item.meta.gmtoffset.unwrap_or(0);

    let mut bars: Vec<IndexBar> = timestamps
        .iter()
        .enumerate()
        .filter_map(|(i, ts)| {
            let close = value_at(&quote.close, i)?;
            let date = DateTime::<Utc>::from_timestamp(ts + offset, 0)?.date_naive();
            Some(IndexBar {
                date,
                open: value_at(&quote.open, i),
                high: value_at(&quote.high, i),
                low: value_at(&quote.low, i),
                close,
                volume: value_at(&quote.volume, i),
            })
        })
        .collect();

    bars.sort_by_key(|bar| bar.date);
    bars.dedup_by_key(|bar| bar.date);
    bars
}

/// Daily bars for a single index from the Yahoo Finance chart API.
pub struct YahooIndexProvider {
    base_url: String,
    symbol: String,
    timeout: Duration,
}

impl YahooIndexProvider {
    pub fn new(base_url: &str, symbol: &str, timeout: Duration) -> Self {
        YahooIndexProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            symbol: symbol.to_string(),
            timeout,
        }
    }
}

#[derive(Deserialize, Debug)]
struct YahooChartResponse {
    chart: ChartResult,
}

#[derive(Deserialize, Debug)]
struct ChartResult {
    result: Option<Vec<ChartItem>>,
    error: Option<ChartError>,
}

#[derive(Deserialize, Debug)]
struct ChartError {
    code: Option<String>,
    description: Option<String>,
}

#[derive(Deserialize, Debug)]
struct ChartItem {
    meta: ChartMeta,
    timestamp: Option<Vec<i64>>,
    indicators: Option<Indicators>,
}

#[derive(Deserialize, Debug)]
struct ChartMeta {
    currency: Option<String>,
    symbol: Option<String>,
    gmtoffset: Option<i64>,
}

#[derive(Deserialize, Debug)]
struct Indicators {
    quote: Vec<Quote>,
}

#[derive(Deserialize, Debug)]
struct Quote {
    open: Option<Vec<Option<f64>>>,
    high: Option<Vec<Option<f64>>>,
    low: Option<Vec<Option<f64>>>,
    close: Option<Vec<Option<f64>>>,
    volume: Option<Vec<Option<u64>>>,
}

#[async_trait]
impl IndexHistoryProvider for YahooIndexProvider {
    #[instrument(
        name = "YahooHistoryFetch",
        skip(self),
        fields(symbol = %self.symbol)
    )]
    async fn fetch_history(&self, window_days: u32) -> Result<IndexSeries, DataUnavailable> {
        let end = Utc::now();
        let start = ChronoDuration::try_days(i64::from(window_days))
            .and_then(|window| end.checked_sub_signed(window))
            .ok_or_else(|| DataUnavailable::new(FEED, "history window out of range"))?;

        let url = format!(
            "{}/v8/finance/chart/{}?period1={}&period2={}&interval=1d",
            self.base_url,
            encode_symbol(&self.symbol),
            start.timestamp(),
            end.timestamp()
        );
        debug!("Requesting index history from {}", url);

        let client = http_client(FEED, self.timeout)?;
        let response = client
            .get(&url)
            .send()
            .await
            .map_err(|e| transport_error(FEED, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DataUnavailable::new(
                FEED,
                format!("HTTP error: {} for symbol: {}", status, self.symbol),
            ));
        }

        let text = response.text().await.map_err(|e| transport_error(FEED, e))?;
        let data: YahooChartResponse = serde_json::from_str(&text).map_err(|e| {
            DataUnavailable::new(
                FEED,
                format!("Failed to parse JSON response for {}: {}", self.symbol, e),
            )
        })?;

        if let Some(error) = data.chart.error {
            return Err(DataUnavailable::new(
                FEED,
                format!(
                    "{}: {}",
                    error.code.unwrap_or_default(),
                    error.description.unwrap_or_default()
                ),
            ));
        }

        let item = data
            .chart
            .result
            .and_then(|items| items.into_iter().next())
            .ok_or_else(|| {
                DataUnavailable::new(FEED, format!("No history found for symbol: {}", self.symbol))
            })?;

        let bars = extract_bars(&item);
        if bars.is_empty() {
            return Err(DataUnavailable::new(
                FEED,
                format!("No closing prices for symbol: {}", self.symbol),
            ));
        }
        debug!(bars = bars.len(), "Received index history");

        Ok(IndexSeries {
            symbol: item.meta.symbol.unwrap_or_else(|| self.symbol.clone()),
            currency: item.meta.currency,
            bars,
        })
    }
}
