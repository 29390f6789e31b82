//! Keyword-based importance ranking.
//!
//! Matching is a plain substring test on the lower-cased headline, so "war"
//! also hits "award" and "warning". The high list is checked first and wins
//! over any medium keyword in the same headline.

use crate::models::ImportanceTier;

pub const HIGH_KEYWORDS: &[&str] = &[
    "crisis", "war", "breaking", "urgent", "alert", "disaster", "emergency", "dead", "attack",
];

pub const MEDIUM_KEYWORDS: &[&str] = &[
    "election",
    "government",
    "protest",
    "policy",
    "update",
    "accident",
];

/// Assign an importance tier to a headline.
///
/// Matching is a case-insensitive substring test, so "war" also matches
/// "award". High keywords are checked before Medium ones; a headline with
/// no keyword is Low.
pub fn classify(headline: &str) -> ImportanceTier {
    let lower = headline.to_lowercase();
    if HIGH_KEYWORDS.iter().any(|k| lower.contains(k)) {
        ImportanceTier::High
    } else if MEDIUM_KEYWORDS.iter().any(|k| lower.contains(k)) {
        ImportanceTier::Medium
    } else {
        ImportanceTier::Low
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_high_beats_medium() {
        assert_eq!(
            classify("Government urges calm after deadly attack"),
            ImportanceTier::High
        );
    }

    #[test]
    fn test_medium_only() {
        assert_eq!(
            classify("Election results delayed amid recount"),
            ImportanceTier::Medium
        );
    }

    #[test]
    fn test_no_keyword_is_low() {
        assert_eq!(classify("Local bakery wins regional prize"), ImportanceTier::Low);
    }

    #[test]
    fn test_award_contains_war() {
        assert_eq!(classify("Local bakery wins regional award"), ImportanceTier::High);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(classify("BREAKING: markets open"), ImportanceTier::High);
        assert_eq!(classify("New POLICY announced"), ImportanceTier::Medium);
    }

    #[test]
    fn test_substring_not_whole_word() {
        assert_eq!(classify("Warmer weather ahead"), ImportanceTier::High);
        assert_eq!(classify("Weekly updates ship"), ImportanceTier::Medium);
    }

    #[test]
    fn test_empty_text_is_low() {
        assert_eq!(classify(""), ImportanceTier::Low);
    }

    #[test]
    fn test_keyword_lists_are_lowercase() {
        for k in HIGH_KEYWORDS.iter().chain(MEDIUM_KEYWORDS) {
            assert_eq!(*k, k.to_lowercase());
        }
    }
}
