//! Tumor-registry screening of impression text
//!
//! Impressions are joined, lower-cased and searched for diagnostic-hedging
//! terms. Registry abstractors treat these terms as reportable ambiguity,
//! so any match flags the document for review.

use crate::app::models::TumorRegistryFlag;
use crate::constants::TUMOR_REGISTRY_TERMS;
use tracing::debug;

/// Screen impressions against the fixed hedging vocabulary
pub fn screen(impressions: &[Option<String>]) -> TumorRegistryFlag {
    screen_with_terms(impressions, TUMOR_REGISTRY_TERMS)
}

/// Screen impressions against an explicit vocabulary
///
/// Null impressions are skipped; the rest are joined with single spaces.
/// Matched terms are reported in vocabulary order.
pub fn screen_with_terms(impressions: &[Option<String>], terms: &[&str]) -> TumorRegistryFlag {
    let text = impressions
        .iter()
        .flatten()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();

    let matched_terms: Vec<String> = terms
        .iter()
        .filter(|term| text.contains(&term.to_lowercase()))
        .map(|term| term.to_string())
        .collect();

    if !matched_terms.is_empty() {
        debug!("Tumor registry terms matched: {:?}", matched_terms);
    }

    TumorRegistryFlag {
        flagged: !matched_terms.is_empty(),
        matched_terms,
    }
}
