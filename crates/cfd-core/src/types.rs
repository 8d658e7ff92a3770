//! Core data types for company lookups.
//!
//! This module defines the internal, persisted data structures:
//!
//! - [`Ticker`] - Trading symbol, always upper-case
//! - [`Company`] - Company record with cached financials
//! - [`Financials`] - Canonical metric name to [`FinancialMetric`]
//! - [`FinancialEntry`] - One reported value
//! - [`FilingForm`] - Annual or quarterly report form
//! - [`Quote`] - Latest price and previous close

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// A trading symbol/ticker.
///
/// Tickers are automatically uppercased on creation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Ticker(String);

impl Ticker {
    /// Creates a new ticker from a string, trimming and converting to uppercase.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into().trim().to_uppercase())
    }

    /// Returns the ticker as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the ticker is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Ticker {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<&str> for Ticker {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Ticker {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// Form type of the filing a value was reported in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilingForm {
    /// Annual report.
    #[serde(rename = "10-K")]
    Annual,
    /// Quarterly report.
    #[serde(rename = "10-Q")]
    Quarterly,
}

impl FilingForm {
    /// Parses a raw form string.
    ///
    /// Only the exact `10-K` and `10-Q` codes are recognized. Amendments
    /// (`10-K/A`), transition reports and every other form yield `None`.
    #[must_use]
    pub fn parse(form: &str) -> Option<Self> {
        match form {
            "10-K" => Some(Self::Annual),
            "10-Q" => Some(Self::Quarterly),
            _ => None,
        }
    }

    /// Returns the form code as it appears in filings.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Annual => "10-K",
            Self::Quarterly => "10-Q",
        }
    }
}

impl fmt::Display for FilingForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single reported value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FinancialEntry {
    /// Reported value.
    pub value: f64,
    /// Fiscal-period label from the source, may be empty.
    pub frame: String,
    /// Form the value was reported in.
    pub form: FilingForm,
}

impl FinancialEntry {
    /// Creates a new entry.
    #[must_use]
    pub fn new(value: f64, frame: impl Into<String>, form: FilingForm) -> Self {
        Self {
            value,
            frame: frame.into(),
            form,
        }
    }
}

/// A financial metric with its annual and quarterly series.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FinancialMetric {
    /// Canonical metric name; equal to the key in [`Financials`].
    pub label: String,
    /// Human-readable description, verbatim from the source.
    pub description: String,
    /// Values reported in annual filings, in source order.
    pub annually: Vec<FinancialEntry>,
    /// Values reported in quarterly filings, in source order.
    pub quarterly: Vec<FinancialEntry>,
}

impl FinancialMetric {
    /// Creates a metric with empty series.
    #[must_use]
    pub fn new(label: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            description: description.into(),
            ..Default::default()
        }
    }

    /// Returns true if neither series has any values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.annually.is_empty() && self.quarterly.is_empty()
    }
}

/// Financials keyed by canonical metric name.
pub type Financials = BTreeMap<String, FinancialMetric>;

/// Company record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Company {
    /// Ticker symbol, unique.
    pub ticker: Ticker,
    /// SEC CIK number, zero-padded to 10 digits.
    pub cik: String,
    /// Company name.
    pub name: String,
    /// Primary exchange, if classified.
    pub exchange: Option<String>,
    /// Cached financials; `None` until fetched successfully.
    pub financials: Option<Financials>,
}

impl Company {
    /// Creates a company without an exchange or financials.
    #[must_use]
    pub fn new(ticker: impl Into<Ticker>, cik: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            ticker: ticker.into(),
            cik: cik.into(),
            name: name.into(),
            exchange: None,
            financials: None,
        }
    }

    /// Sets the exchange.
    #[must_use]
    pub fn with_exchange(mut self, exchange: impl Into<String>) -> Self {
        self.exchange = Some(exchange.into());
        self
    }

    /// Sets the cached financials.
    #[must_use]
    pub fn with_financials(mut self, financials: Financials) -> Self {
        self.financials = Some(financials);
        self
    }
}

/// Latest market quote.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// Current market price.
    pub regular_market_price: f64,
    /// Close of the previous trading day.
    pub chart_previous_close: f64,
}

impl Quote {
    /// Creates a new quote.
    #[must_use]
    pub const fn new(regular_market_price: f64, chart_previous_close: f64) -> Self {
        Self {
            regular_market_price,
            chart_previous_close,
        }
    }

    /// Percentage move against the previous close, rounded to two decimals.
    ///
    /// Returns `None` when the previous close is zero or the result is not finite.
    #[must_use]
    pub fn day_move_percentage(&self) -> Option<f64> {
        if self.chart_previous_close == 0.0 {
            return None;
        }
        let change = 100.0
            * (self.regular_market_price - self.chart_previous_close)
            / self.chart_previous_close;
        change.is_finite().then(|| round2(change))
    }
}

/// Rounds to two decimal places, halves away from zero.
///
/// The value is first snapped to six decimals below the cent so that inputs
/// such as `99.995` round as their decimal spelling suggests.
#[must_use]
pub fn round2(value: f64) -> f64 {
    let cents = (value * 100.0 * 1e6).round() / 1e6;
    cents.round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_ticker_uppercase() {
        assert_eq!(Ticker::new("aapl").as_str(), "AAPL");
        assert_eq!(Ticker::new("  msft ").as_str(), "MSFT");
        assert!(Ticker::new("   ").is_empty());
    }

    #[rstest]
    #[case("10-K", Some(FilingForm::Annual))]
    #[case("10-Q", Some(FilingForm::Quarterly))]
    #[case("10-K/A", None)]
    #[case("10-Q/A", None)]
    #[case("8-K", None)]
    #[case("", None)]
    fn test_filing_form_parse(#[case] raw: &str, #[case] expected: Option<FilingForm>) {
        assert_eq!(FilingForm::parse(raw), expected);
    }

    #[test]
    fn test_entry_serializes_form_code() {
        let entry = FinancialEntry::new(1.5, "CY2023", FilingForm::Annual);
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["form"], "10-K");
        assert_eq!(json["frame"], "CY2023");
        assert_eq!(json["value"], 1.5);
    }

    #[rstest]
    #[case(110.0, 100.0, Some(10.0))]
    #[case(99.995, 100.0, Some(-0.01))]
    #[case(100.005, 100.0, Some(0.01))]
    #[case(100.004, 100.0, Some(0.0))]
    #[case(100.0, 100.0, Some(0.0))]
    #[case(50.0, 200.0, Some(-75.0))]
    #[case(12.0, 0.0, None)]
    #[case(0.0, 0.0, None)]
    fn test_day_move_percentage(
        #[case] price: f64,
        #[case] previous_close: f64,
        #[case] expected: Option<f64>,
    ) {
        assert_eq!(
            Quote::new(price, previous_close).day_move_percentage(),
            expected
        );
    }

    #[test]
    fn test_day_move_rejects_non_finite() {
        assert_eq!(Quote::new(f64::NAN, 100.0).day_move_percentage(), None);
        assert_eq!(Quote::new(f64::INFINITY, 100.0).day_move_percentage(), None);
    }

    #[test]
    fn test_round2_half_away_from_zero() {
        assert_eq!(round2(1.005_000_1), 1.01);
        assert_eq!(round2(-0.005_000_1), -0.01);
        assert_eq!(round2(-0.004_999_999_999_995), -0.01);
        assert_eq!(round2(0.004), 0.0);
        assert_eq!(round2(2.0), 2.0);
    }
}
