//! Raw SEC EDGAR companyfacts schema.
//!
//! The companyfacts payload nests every concept under a taxonomy section and
//! then under unit-tagged series. Only the concepts listed in [`Metric`] are
//! deserialized; everything else in the payload is skipped.

use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

use crate::error::DataError;

/// Top-level companyfacts response.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawFinancialFacts {
    /// CIK as reported by the API.
    #[serde(default)]
    pub cik: Option<u64>,
    /// Entity name as reported by the API.
    #[serde(default)]
    pub entity_name: Option<String>,
    /// Facts organized by taxonomy.
    #[serde(default)]
    pub facts: FactSections,
}

/// Taxonomy sections of the payload.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct FactSections {
    /// Main concept section.
    #[serde(rename = "us-gaap", default)]
    pub us_gaap: GaapConcepts,
    /// Entity information section.
    #[serde(default)]
    pub dei: EntityConcepts,
}

/// Tracked concepts of the `us-gaap` taxonomy.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GaapConcepts {
    /// `Cash`
    pub cash: Option<RawConcept>,
    /// `CashAndCashEquivalentsAtCarryingValue`
    pub cash_and_cash_equivalents_at_carrying_value: Option<RawConcept>,
    /// `CommonStockSharesOutstanding`
    pub common_stock_shares_outstanding: Option<RawConcept>,
    /// `CostsAndExpenses`
    pub costs_and_expenses: Option<RawConcept>,
    /// `EarningsPerShareDiluted`
    pub earnings_per_share_diluted: Option<RawConcept>,
    /// `LongTermDebt`
    pub long_term_debt: Option<RawConcept>,
    /// `NetIncomeLoss`
    pub net_income_loss: Option<RawConcept>,
    /// `PaymentsOfDividends`
    pub payments_of_dividends: Option<RawConcept>,
    /// `PaymentsOfDividendsCommonStock`
    pub payments_of_dividends_common_stock: Option<RawConcept>,
    /// `Revenues`
    pub revenues: Option<RawConcept>,
    /// `ShortTermInvestments`
    pub short_term_investments: Option<RawConcept>,
}

/// Tracked concepts of the `dei` taxonomy.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EntityConcepts {
    /// `EntityCommonStockSharesOutstanding`
    pub entity_common_stock_shares_outstanding: Option<RawConcept>,
    /// `EntityPublicFloat`
    pub entity_public_float: Option<RawConcept>,
}

/// A single concept with its unit series.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct RawConcept {
    /// Description from the taxonomy.
    #[serde(default)]
    pub description: Option<String>,
    /// Unit-tagged series.
    #[serde(default)]
    pub units: RawUnits,
}

/// The three unit series a concept may be reported in.
///
/// In practice exactly one is populated per concept.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct RawUnits {
    /// USD-denominated values.
    #[serde(rename = "USD", alias = "usd", default)]
    pub usd: Vec<RawEntry>,
    /// Share counts.
    #[serde(alias = "Shares", default)]
    pub shares: Vec<RawEntry>,
    /// USD per share (EPS and friends).
    #[serde(rename = "USD/shares", alias = "usd/shares", default)]
    pub usd_per_share: Vec<RawEntry>,
}

impl RawUnits {
    /// Returns the first non-empty series in priority order USD, shares,
    /// USD/shares, or an empty slice.
    #[must_use]
    pub fn preferred(&self) -> &[RawEntry] {
        [&self.usd, &self.shares, &self.usd_per_share]
            .into_iter()
            .find(|series| !series.is_empty())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

/// A single reported value.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct RawEntry {
    /// Period start, absent for instant facts.
    #[serde(default)]
    pub start: Option<String>,
    /// Period end.
    #[serde(default)]
    pub end: String,
    /// Value.
    pub val: f64,
    /// Form type the value was reported in.
    #[serde(default)]
    pub form: String,
    /// Frame (calendar period label), often absent.
    #[serde(default)]
    pub frame: Option<String>,
}

/// Taxonomy section a [`Metric`] lives in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FactSection {
    /// `us-gaap`
    UsGaap,
    /// `dei`
    EntityInformation,
}

/// Canonical metric names tracked by the application.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Metric {
    /// Cash.
    Cash,
    /// Cash and cash equivalents.
    CashAndCashEquivalentsAtCarryingValue,
    /// Common shares outstanding from the balance sheet.
    CommonStockSharesOutstanding,
    /// Total costs and expenses.
    CostsAndExpenses,
    /// Diluted EPS.
    EarningsPerShareDiluted,
    /// Long-term debt.
    LongTermDebt,
    /// Net income (loss).
    NetIncomeLoss,
    /// Dividends paid.
    PaymentsOfDividends,
    /// Dividends paid to common shareholders.
    PaymentsOfDividendsCommonStock,
    /// Revenues.
    Revenues,
    /// Short-term investments.
    ShortTermInvestments,
    /// Shares outstanding from the cover page.
    EntityCommonStockSharesOutstanding,
    /// Public float from the cover page.
    EntityPublicFloat,
}

impl Metric {
    /// All tracked metrics.
    pub const ALL: [Self; 13] = [
        Self::Cash,
        Self::CashAndCashEquivalentsAtCarryingValue,
        Self::CommonStockSharesOutstanding,
        Self::CostsAndExpenses,
        Self::EarningsPerShareDiluted,
        Self::LongTermDebt,
        Self::NetIncomeLoss,
        Self::PaymentsOfDividends,
        Self::PaymentsOfDividendsCommonStock,
        Self::Revenues,
        Self::ShortTermInvestments,
        Self::EntityCommonStockSharesOutstanding,
        Self::EntityPublicFloat,
    ];

    /// Canonical name, identical to the XBRL tag.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Cash => "Cash",
            Self::CashAndCashEquivalentsAtCarryingValue => {
                "CashAndCashEquivalentsAtCarryingValue"
            }
            Self::CommonStockSharesOutstanding => "CommonStockSharesOutstanding",
            Self::CostsAndExpenses => "CostsAndExpenses",
            Self::EarningsPerShareDiluted => "EarningsPerShareDiluted",
            Self::LongTermDebt => "LongTermDebt",
            Self::NetIncomeLoss => "NetIncomeLoss",
            Self::PaymentsOfDividends => "PaymentsOfDividends",
            Self::PaymentsOfDividendsCommonStock => "PaymentsOfDividendsCommonStock",
            Self::Revenues => "Revenues",
            Self::ShortTermInvestments => "ShortTermInvestments",
            Self::EntityCommonStockSharesOutstanding => "EntityCommonStockSharesOutstanding",
            Self::EntityPublicFloat => "EntityPublicFloat",
        }
    }

    /// Section of the payload the metric is read from.
    #[must_use]
    pub const fn section(&self) -> FactSection {
        match self {
            Self::EntityCommonStockSharesOutstanding | Self::EntityPublicFloat => {
                FactSection::EntityInformation
            }
            _ => FactSection::UsGaap,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Metric {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| DataError::InvalidParameter(format!("Unknown metric: {s}")))
    }
}

impl GaapConcepts {
    fn get(&self, metric: Metric) -> Option<&RawConcept> {
        match metric {
            Metric::Cash => self.cash.as_ref(),
            Metric::CashAndCashEquivalentsAtCarryingValue => {
                self.cash_and_cash_equivalents_at_carrying_value.as_ref()
            }
            Metric::CommonStockSharesOutstanding => self.common_stock_shares_outstanding.as_ref(),
            Metric::CostsAndExpenses => self.costs_and_expenses.as_ref(),
            Metric::EarningsPerShareDiluted => self.earnings_per_share_diluted.as_ref(),
            Metric::LongTermDebt => self.long_term_debt.as_ref(),
            Metric::NetIncomeLoss => self.net_income_loss.as_ref(),
            Metric::PaymentsOfDividends => self.payments_of_dividends.as_ref(),
            Metric::PaymentsOfDividendsCommonStock => {
                self.payments_of_dividends_common_stock.as_ref()
            }
            Metric::Revenues => self.revenues.as_ref(),
            Metric::ShortTermInvestments => self.short_term_investments.as_ref(),
            Metric::EntityCommonStockSharesOutstanding | Metric::EntityPublicFloat => None,
        }
    }
}

impl EntityConcepts {
    fn get(&self, metric: Metric) -> Option<&RawConcept> {
        match metric {
            Metric::EntityCommonStockSharesOutstanding => {
                self.entity_common_stock_shares_outstanding.as_ref()
            }
            Metric::EntityPublicFloat => self.entity_public_float.as_ref(),
            _ => None,
        }
    }
}

impl RawFinancialFacts {
    /// Looks a metric up in its own section.
    #[must_use]
    pub fn concept(&self, metric: Metric) -> Option<&RawConcept> {
        match metric.section() {
            FactSection::UsGaap => self.facts.us_gaap.get(metric),
            FactSection::EntityInformation => self.facts.dei.get(metric),
        }
    }

    /// Parses a companyfacts JSON body.
    ///
    /// # Errors
    /// Returns [`DataError::Parse`] if the body is not a valid payload.
    pub fn from_slice(body: &[u8]) -> Result<Self, DataError> {
        serde_json::from_slice(body)
            .map_err(|e| DataError::Parse(format!("Failed to parse company facts: {e}")))
    }
}
