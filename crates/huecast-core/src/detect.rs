//! Frequency tally for colors detected on the page.
//!
//! The DOM walk itself lives in the engine crate; this module owns the
//! normalization, filtering, and ranking so the logic is testable without a
//! browser.

use crate::color;

/// Upper bound on how many elements one analysis pass samples.
pub const MAX_SAMPLED_ELEMENTS: usize = 1000;

/// Colors seen fewer times than this are noise and never ranked.
pub const MIN_OCCURRENCES: usize = 2;

/// Ephemeral tally of normalized hex color -> occurrence count for one
/// analysis pass. Insertion order is preserved so ranking ties break by
/// discovery order.
#[derive(Debug, Default)]
pub struct ColorUsage {
    counts: Vec<(String, usize)>,
}

impl ColorUsage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one observed color value in any form the sampler reads
    /// (`rgb()`, hex, recognized names). Unrecognized, near-transparent, and
    /// neutral values are dropped silently.
    pub fn record(&mut self, raw: &str) {
        let Some(hex) = color::canonical_hex(raw) else {
            return;
        };
        if color::is_neutral(&hex) {
            return;
        }
        if let Some(entry) = self.counts.iter_mut().find(|(c, _)| *c == hex) {
            entry.1 += 1;
        } else {
            self.counts.push((hex, 1));
        }
    }

    /// Record an element's computed colors. Border color is counted only
    /// when it differs from the text color, since borders inherit the text
    /// color by default and would double-count it.
    pub fn record_element(&mut self, background: &str, text: &str, border: &str) {
        self.record(background);
        self.record(text);
        if border != text {
            self.record(border);
        }
    }

    /// Distinct colors seen so far (before the occurrence filter).
    pub fn distinct(&self) -> usize {
        self.counts.len()
    }

    /// Rank the tally: occurrence filter applied, sorted descending by
    /// count, ties broken by discovery order (stable sort).
    pub fn ranked(&self) -> Vec<(String, usize)> {
        let mut ranked: Vec<(String, usize)> = self
            .counts
            .iter()
            .filter(|(_, n)| *n >= MIN_OCCURRENCES)
            .cloned()
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
    }

    /// Ranked colors only, for feeding the palette mapper.
    pub fn ranked_colors(&self) -> Vec<String> {
        self.ranked().into_iter().map(|(c, _)| c).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_min_occurrence_filter() {
        let mut usage = ColorUsage::new();
        usage.record("#00204c");
        usage.record("#00204c");
        usage.record("#bbaf71");
        assert_eq!(usage.ranked(), vec![("#00204c".to_string(), 2)]);
    }

    #[test]
    fn test_rank_order_and_stable_ties() {
        let mut usage = ColorUsage::new();
        for _ in 0..3 {
            usage.record("#111188");
        }
        // Two colors tied at 5, recorded in this order
        for _ in 0..5 {
            usage.record("#aa2200");
        }
        for _ in 0..5 {
            usage.record("#22aa00");
        }
        let ranked = usage.ranked_colors();
        assert_eq!(ranked, vec!["#aa2200", "#22aa00", "#111188"]);
    }

    #[test]
    fn test_neutrals_and_unrecognized_dropped() {
        let mut usage = ColorUsage::new();
        usage.record("#ffffff");
        usage.record("rgba(0, 0, 0, 0)");
        usage.record("oklch(62% 0.09 230)");
        assert_eq!(usage.distinct(), 0);
    }

    #[test]
    fn test_mixed_forms_merge() {
        let mut usage = ColorUsage::new();
        usage.record("rgb(0, 32, 76)");
        usage.record("#00204C");
        assert_eq!(usage.ranked(), vec![("#00204c".to_string(), 2)]);
    }

    #[test]
    fn test_border_only_counted_when_distinct() {
        let mut usage = ColorUsage::new();
        usage.record_element("rgb(0, 32, 76)", "rgb(187, 175, 113)", "rgb(187, 175, 113)");
        usage.record_element("rgb(0, 32, 76)", "rgb(187, 175, 113)", "rgb(65, 77, 107)");
        let ranked = usage.ranked();
        assert_eq!(ranked[0], ("#00204c".to_string(), 2));
        assert_eq!(ranked[1], ("#bbaf71".to_string(), 2));
        // Border color seen once, filtered out
        assert!(!ranked.iter().any(|(c, _)| c == "#414d6b"));
    }
}
