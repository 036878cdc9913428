//! Daily market context for the historical trend view.

use time::Date;
use ureq::Agent;

use crate::error::MarketError;
use crate::http;

const DEFAULT_BASE_URL: &str = "https://stooq.com/q/d/l/";
/// S&P 500 index in stooq notation.
pub const DEFAULT_SYMBOL: &str = "^spx";

/// Daily quote source abstraction.
pub trait MarketQuotes {
    fn name(&self) -> &'static str;
    /// Close-over-open change in percent for one trading day, or None when
    /// the market was closed.
    fn daily_change(&self, date: Date) -> Result<Option<f64>, MarketError>;
}

/// Create a quote provider by name.
///
/// - `"stooq"` needs no API key; `symbol` selects the instrument
///   (defaults to `^spx`).
pub fn create_market_provider(
    provider: &str,
    symbol: Option<&str>,
) -> Result<Box<dyn MarketQuotes>, MarketError> {
    match provider {
        "stooq" => Ok(Box::new(StooqProvider::new(symbol))),
        other => Err(MarketError::Init(format!(
            "unknown market provider: {other}"
        ))),
    }
}

/// Free daily-candle CSV endpoint at stooq.com.
pub struct StooqProvider {
    agent: Agent,
    base_url: String,
    symbol: String,
}

impl StooqProvider {
    pub fn new(symbol: Option<&str>) -> Self {
        let base_url =
            std::env::var("PODIUM_MARKET_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.into());
        Self {
            agent: http::default_agent(),
            base_url,
            symbol: symbol.unwrap_or(DEFAULT_SYMBOL).to_string(),
        }
    }

    fn url_for(&self, date: Date) -> String {
        let stamp = format!(
            "{}{:02}{:02}",
            date.year(),
            u8::from(date.month()),
            date.day()
        );
        // stooq rejects a raw caret in the query string
        let symbol = self.symbol.replace('^', "%5E");
        format!("{}?s={}&d1={stamp}&d2={stamp}&i=d", self.base_url, symbol)
    }

    /// CSV shape: a `Date,Open,High,Low,Close,Volume` header plus one data
    /// row. An empty or "No data" body means the market was closed.
    fn parse_daily_change(body: &str) -> Result<Option<f64>, MarketError> {
        let mut lines = body.lines().filter(|l| !l.trim().is_empty());
        let Some(header) = lines.next() else {
            return Ok(None);
        };
        let lowered = header.to_lowercase();
        if !lowered.starts_with("date") {
            if lowered.contains("no data") {
                return Ok(None);
            }
            return Err(MarketError::InvalidResponse(format!(
                "unexpected csv header: {header}"
            )));
        }
        let Some(row) = lines.next() else {
            return Ok(None);
        };
        let fields: Vec<&str> = row.split(',').collect();
        if fields.len() < 5 {
            return Err(MarketError::InvalidResponse(format!("short csv row: {row}")));
        }
        let open: f64 = fields[1]
            .trim()
            .parse()
            .map_err(|e| MarketError::InvalidResponse(format!("bad open price: {e}")))?;
        let close: f64 = fields[4]
            .trim()
            .parse()
            .map_err(|e| MarketError::InvalidResponse(format!("bad close price: {e}")))?;
        if open == 0.0 {
            return Err(MarketError::InvalidResponse("zero open price".into()));
        }
        Ok(Some((close - open) / open * 100.0))
    }
}

impl MarketQuotes for StooqProvider {
    fn name(&self) -> &'static str {
        "stooq"
    }

    fn daily_change(&self, date: Date) -> Result<Option<f64>, MarketError> {
        let url = self.url_for(date);
        let response = http::with_retry(http::MAX_ATTEMPTS, || self.agent.get(&url).call())
            .map_err(|e| MarketError::Network(format!("{e}")))?;
        let raw = response
            .into_body()
            .read_to_string()
            .map_err(|e| MarketError::Network(format!("{e}")))?;
        Self::parse_daily_change(raw.trim())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Month;

    #[test]
    fn url_encodes_the_symbol_and_pins_both_dates() {
        let provider = StooqProvider::new(Some("^spx"));
        let date = Date::from_calendar_date(2024, Month::January, 31).unwrap();
        let url = provider.url_for(date);
        assert!(url.contains("s=%5Espx"));
        assert!(url.contains("d1=20240131"));
        assert!(url.contains("d2=20240131"));
        assert!(url.ends_with("i=d"));
    }

    #[test]
    fn parses_a_daily_candle_into_percent_change() {
        let body = "Date,Open,High,Low,Close,Volume\n2024-01-31,4000.0,4120.0,3990.0,4100.0,123456";
        let change = StooqProvider::parse_daily_change(body).unwrap().unwrap();
        assert!((change - 2.5).abs() < 1e-9);

        let body = "Date,Open,High,Low,Close,Volume\n2024-01-31,100.0,101.0,97.0,97.5,5";
        let change = StooqProvider::parse_daily_change(body).unwrap().unwrap();
        assert!((change + 2.5).abs() < 1e-9);
    }

    #[test]
    fn closed_market_days_are_absent_not_errors() {
        assert_eq!(StooqProvider::parse_daily_change("").unwrap(), None);
        assert_eq!(StooqProvider::parse_daily_change("  \n ").unwrap(), None);
        assert_eq!(
            StooqProvider::parse_daily_change("Date,Open,High,Low,Close,Volume").unwrap(),
            None
        );
        assert_eq!(StooqProvider::parse_daily_change("No data").unwrap(), None);
    }

    #[test]
    fn malformed_bodies_are_invalid_responses() {
        assert!(matches!(
            StooqProvider::parse_daily_change("<html>service unavailable</html>"),
            Err(MarketError::InvalidResponse(_))
        ));
        assert!(matches!(
            StooqProvider::parse_daily_change("Date,Open\n2024-01-31,4000.0"),
            Err(MarketError::InvalidResponse(_))
        ));
        assert!(matches!(
            StooqProvider::parse_daily_change(
                "Date,Open,High,Low,Close,Volume\n2024-01-31,0.0,1.0,0.0,1.0,5"
            ),
            Err(MarketError::InvalidResponse(_))
        ));
    }

    #[test]
    fn unknown_provider_is_rejected() {
        assert!(matches!(
            create_market_provider("bloomberg", None).err(),
            Some(MarketError::Init(_))
        ));
    }
}
