// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Popup content for a probe report.

use crate::models::ProbeReport;
use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub const POPUP_TITLE: &str = "Slāņu pārklājums";
pub const NO_OVERLAP_TEXT: &str = "Šajā punktā nav neviena GeoJSON slāņa pārklājuma.";
pub const OVERLAPS_HEADING: &str = "Pārklājas šie slāņi:";
pub const QUERY_PROBLEM_TEXT: &str = "Radās problēma, vaicājot slāņus. Lūdzu, mēģiniet vēlreiz.";

/// Which message the popup shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum PopupKind {
    NoOverlap,
    Overlaps,
    QueryProblem,
}

/// Rendered popup for the map view.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Popup {
    pub title: String,
    pub kind: PopupKind,
    /// Plain-text body, one line per matched layer.
    pub text: String,
    /// Matched layer names in configuration order.
    pub matched: Vec<String>,
    /// Layers whose query failed, for optional display.
    pub failed: Vec<String>,
}

impl Popup {
    /// Render a report.
    ///
    /// Only when every layer failed is a query problem shown; partial
    /// failures are listed in `failed` but otherwise look like no match.
    pub fn from_report(report: &ProbeReport) -> Self {
        let matched: Vec<String> = report.matched().map(str::to_string).collect();
        let failed: Vec<String> = report.failed().map(str::to_string).collect();

        let (kind, text) = if report.all_failed() {
            (PopupKind::QueryProblem, QUERY_PROBLEM_TEXT.to_string())
        } else if matched.is_empty() {
            (PopupKind::NoOverlap, NO_OVERLAP_TEXT.to_string())
        } else {
            let mut text = OVERLAPS_HEADING.to_string();
            for name in &matched {
                text.push_str("\n• ");
                text.push_str(name);
            }
            (PopupKind::Overlaps, text)
        };

        Self {
            title: POPUP_TITLE.to_string(),
            kind,
            text,
            matched,
            failed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ProbeEntry, ProbeOutcome};

    fn report(outcomes: &[(&str, ProbeOutcome)]) -> ProbeReport {
        ProbeReport {
            entries: outcomes
                .iter()
                .map(|(name, outcome)| ProbeEntry {
                    layer: name.to_string(),
                    outcome: outcome.clone(),
                })
                .collect(),
        }
    }

    fn failed() -> ProbeOutcome {
        ProbeOutcome::Failed {
            reason: "timed out after 8s".to_string(),
        }
    }

    #[test]
    fn test_single_match() {
        let popup = Popup::from_report(&report(&[
            ("L1", ProbeOutcome::NoMatch),
            ("L2", ProbeOutcome::Matched),
            ("L3", ProbeOutcome::NoMatch),
        ]));
        assert_eq!(popup.kind, PopupKind::Overlaps);
        assert_eq!(popup.text, "Pārklājas šie slāņi:\n• L2");
        assert_eq!(popup.title, POPUP_TITLE);
    }

    #[test]
    fn test_partial_failure_lists_matches_only() {
        let popup = Popup::from_report(&report(&[
            ("L1", failed()),
            ("L2", ProbeOutcome::Matched),
            ("L3", ProbeOutcome::NoMatch),
        ]));
        assert_eq!(popup.kind, PopupKind::Overlaps);
        assert_eq!(popup.matched, vec!["L2"]);
        assert_eq!(popup.failed, vec!["L1"]);
        assert!(!popup.text.contains("L1"));
    }

    #[test]
    fn test_empty_report_is_no_overlap() {
        let popup = Popup::from_report(&ProbeReport::default());
        assert_eq!(popup.kind, PopupKind::NoOverlap);
        assert_eq!(popup.text, NO_OVERLAP_TEXT);
    }

    #[test]
    fn test_all_failed_is_query_problem() {
        let popup = Popup::from_report(&report(&[("L1", failed()), ("L2", failed())]));
        assert_eq!(popup.kind, PopupKind::QueryProblem);
        assert_eq!(popup.text, QUERY_PROBLEM_TEXT);
        assert_eq!(popup.failed.len(), 2);
    }

    #[test]
    fn test_matches_keep_configuration_order() {
        let popup = Popup::from_report(&report(&[
            ("Zeta", ProbeOutcome::Matched),
            ("Alfa", ProbeOutcome::Matched),
        ]));
        assert_eq!(popup.text, "Pārklājas šie slāņi:\n• Zeta\n• Alfa");
    }
}
