use crate::core::error::DataUnavailable;
use std::time::Duration;

/// Builds a client that gives up after `timeout`. Requests are never retried.
pub fn http_client(feed: &'static str, timeout: Duration) -> Result<reqwest::Client, DataUnavailable> {
    reqwest::Client::builder()
        .user_agent("invplan/1.0")
        .timeout(timeout)
        .build()
        .map_err(|e| DataUnavailable::new(feed, format!("Failed to build HTTP client: {e}")))
}

/// Maps a transport failure to a `DataUnavailable` for `feed`.
pub fn transport_error(feed: &'static str, err: reqwest::Error) -> DataUnavailable {
    if err.is_timeout() {
        DataUnavailable::new(feed, "request timed out")
    } else {
        DataUnavailable::new(feed, format!("request error: {err}"))
    }
}

/// Escapes characters Yahoo symbols use that cannot sit raw in a URL path.
pub fn encode_symbol(symbol: &str) -> String {
    symbol
        .replace('%', "%25")
        .replace('^', "%5E")
        .replace('=', "%3D")
        .replace(' ', "%20")
}
