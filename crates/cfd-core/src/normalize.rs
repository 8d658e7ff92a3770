//! Normalization of raw companyfacts into [`Financials`].
//!
//! For every [`Metric`] present in the payload the preferred unit series is
//! split into annual (`10-K`) and quarterly (`10-Q`) buckets. Entries from any
//! other form are dropped. Source order is preserved and nothing is sorted,
//! deduplicated or aggregated; restated periods pass through as reported.

use tracing::trace;

use crate::facts::{Metric, RawConcept, RawEntry, RawFinancialFacts};
use crate::types::{FilingForm, FinancialEntry, FinancialMetric, Financials};

/// Normalizes a companyfacts payload.
///
/// Metrics whose concept is missing from the payload get no key at all.
#[must_use]
pub fn normalize(facts: &RawFinancialFacts) -> Financials {
    Metric::ALL
        .into_iter()
        .filter_map(|metric| {
            facts
                .concept(metric)
                .map(|concept| (metric.as_str().to_string(), normalize_concept(metric, concept)))
        })
        .collect()
}

/// Builds the metric for a single concept.
#[must_use]
pub fn normalize_concept(metric: Metric, concept: &RawConcept) -> FinancialMetric {
    let mut normalized = FinancialMetric::new(
        metric.as_str(),
        concept.description.clone().unwrap_or_default(),
    );

    let mut dropped = 0usize;
    for entry in concept.units.preferred() {
        let Some(form) = classify(entry) else {
            dropped += 1;
            continue;
        };
        let bucket = match form {
            FilingForm::Annual => &mut normalized.annually,
            FilingForm::Quarterly => &mut normalized.quarterly,
        };
        bucket.push(to_entry(entry, form));
    }

    if dropped > 0 {
        trace!(metric = %metric, dropped, "Dropped entries with unrecognized form");
    }

    normalized
}

/// Classifies a raw entry by its form type.
#[must_use]
pub fn classify(entry: &RawEntry) -> Option<FilingForm> {
    FilingForm::parse(&entry.form)
}

fn to_entry(entry: &RawEntry, form: FilingForm) -> FinancialEntry {
    FinancialEntry::new(entry.val, entry.frame.clone().unwrap_or_default(), form)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facts::RawUnits;
    use rstest::rstest;

    fn raw(val: f64, form: &str, frame: Option<&str>) -> RawEntry {
        RawEntry {
            start: None,
            end: "2023-12-31".to_string(),
            val,
            form: form.to_string(),
            frame: frame.map(str::to_string),
        }
    }

    fn concept(units: RawUnits) -> RawConcept {
        RawConcept {
            description: Some("Verbatim description.".to_string()),
            units,
        }
    }

    fn facts_with_net_income(units: RawUnits) -> RawFinancialFacts {
        let mut facts = RawFinancialFacts::default();
        facts.facts.us_gaap.net_income_loss = Some(concept(units));
        facts
    }

    #[rstest]
    #[case::usd_only_first(RawUnits { usd: vec![raw(1.0, "10-K", None)], shares: vec![], usd_per_share: vec![] })]
    #[case::usd_with_empty_others_any_order(RawUnits { usd_per_share: vec![], shares: vec![], usd: vec![raw(1.0, "10-K", None)] })]
    fn test_usd_series_selected(#[case] units: RawUnits) {
        let metric = normalize_concept(Metric::NetIncomeLoss, &concept(units));
        assert_eq!(metric.annually.len(), 1);
        assert_eq!(metric.annually[0].value, 1.0);
    }

    #[test]
    fn test_earlier_priority_series_wins() {
        let units = RawUnits {
            usd: vec![],
            shares: vec![raw(2.0, "10-K", None)],
            usd_per_share: vec![raw(3.0, "10-K", None), raw(4.0, "10-Q", None)],
        };
        let metric = normalize_concept(Metric::EarningsPerShareDiluted, &concept(units));
        assert_eq!(metric.annually, vec![FinancialEntry::new(2.0, "", FilingForm::Annual)]);
        assert!(metric.quarterly.is_empty());
    }

    #[test]
    fn test_usd_per_share_used_when_alone() {
        let units = RawUnits {
            usd_per_share: vec![raw(6.13, "10-K", Some("CY2023"))],
            ..Default::default()
        };
        let metric = normalize_concept(Metric::EarningsPerShareDiluted, &concept(units));
        assert_eq!(metric.annually[0].value, 6.13);
        assert_eq!(metric.annually[0].frame, "CY2023");
    }

    #[test]
    fn test_forms_split_into_buckets_in_source_order() {
        let units = RawUnits {
            usd: vec![
                raw(1.0, "10-Q", Some("CY2023Q1")),
                raw(2.0, "10-K", Some("CY2022")),
                raw(3.0, "10-Q", Some("CY2023Q2")),
                raw(4.0, "10-K", Some("CY2023")),
                raw(5.0, "10-Q", None),
            ],
            ..Default::default()
        };
        let metric = normalize_concept(Metric::Revenues, &concept(units));

        let annual: Vec<f64> = metric.annually.iter().map(|e| e.value).collect();
        let quarterly: Vec<f64> = metric.quarterly.iter().map(|e| e.value).collect();
        assert_eq!(annual, vec![2.0, 4.0]);
        assert_eq!(quarterly, vec![1.0, 3.0, 5.0]);
        assert!(metric.annually.iter().all(|e| e.form == FilingForm::Annual));
        assert!(metric.quarterly.iter().all(|e| e.form == FilingForm::Quarterly));
        assert_eq!(metric.quarterly[2].frame, "");
    }

    #[rstest]
    #[case("8-K")]
    #[case("10-K/A")]
    #[case("10-Q/A")]
    #[case("20-F")]
    #[case("")]
    fn test_unrecognized_form_dropped(#[case] form: &str) {
        let units = RawUnits {
            usd: vec![raw(1.0, form, Some("CY2023"))],
            ..Default::default()
        };
        let metric = normalize_concept(Metric::Revenues, &concept(units));
        assert!(metric.annually.is_empty());
        assert!(metric.quarterly.is_empty());
    }

    #[test]
    fn test_duplicate_frames_pass_through() {
        let units = RawUnits {
            usd: vec![raw(10.0, "10-K", Some("CY2022")), raw(11.0, "10-K", Some("CY2022"))],
            ..Default::default()
        };
        let metric = normalize_concept(Metric::Revenues, &concept(units));
        assert_eq!(metric.annually.len(), 2);
        assert_eq!(metric.annually[1].value, 11.0);
    }

    #[test]
    fn test_absent_concept_omitted() {
        let facts = facts_with_net_income(RawUnits {
            usd: vec![raw(1.0, "10-K", None)],
            ..Default::default()
        });
        let financials = normalize(&facts);
        assert_eq!(financials.len(), 1);
        assert!(financials.contains_key("NetIncomeLoss"));
        assert!(!financials.contains_key("Revenues"));
    }

    #[test]
    fn test_present_concept_without_values_kept() {
        let financials = normalize(&facts_with_net_income(RawUnits::default()));
        let metric = &financials["NetIncomeLoss"];
        assert!(metric.is_empty());
    }

    #[test]
    fn test_label_is_canonical_and_description_verbatim() {
        let financials = normalize(&facts_with_net_income(RawUnits::default()));
        let metric = &financials["NetIncomeLoss"];
        assert_eq!(metric.label, "NetIncomeLoss");
        assert_eq!(metric.description, "Verbatim description.");
    }

    #[test]
    fn test_upstream_label_is_ignored() {
        let body = br#"{"facts": {"us-gaap": {"Revenues": {"label": "Revenues (Total)", "description": "Revenue.", "units": {}}}}}"#;
        let facts = RawFinancialFacts::from_slice(body).unwrap();
        let financials = normalize(&facts);
        assert_eq!(financials["Revenues"].label, "Revenues");
        assert_eq!(financials["Revenues"].description, "Revenue.");
    }

    #[test]
    fn test_entity_section_metrics() {
        let mut facts = RawFinancialFacts::default();
        facts.facts.dei.entity_common_stock_shares_outstanding = Some(concept(RawUnits {
            shares: vec![raw(15_550_061_000.0, "10-Q", Some("CY2023Q3I"))],
            ..Default::default()
        }));
        let financials = normalize(&facts);
        let metric = &financials["EntityCommonStockSharesOutstanding"];
        assert_eq!(metric.quarterly[0].value, 15_550_061_000.0);
    }

    #[test]
    fn test_empty_payload_yields_empty_mapping() {
        assert!(normalize(&RawFinancialFacts::default()).is_empty());
    }

    #[test]
    fn test_values_not_rounded() {
        let units = RawUnits {
            usd: vec![raw(0.123_456_789_012, "10-K", None)],
            ..Default::default()
        };
        let metric = normalize_concept(Metric::Cash, &concept(units));
        assert_eq!(metric.annually[0].value, 0.123_456_789_012);
    }
}
