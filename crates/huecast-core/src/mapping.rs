//! Palette mapper: assign ranked detected colors to semantic theme slots.

use crate::palette::{CssVariableSet, VARIABLE_PREFIX};

/// The six semantic slots in priority order, with their fixed defaults
/// (cividis-derived).
pub const SEMANTIC_SLOTS: [(&str, &str); 6] = [
    ("primary", "#00204c"),
    ("secondary", "#414d6b"),
    ("accent", "#bbaf71"),
    ("success", "#7f7c75"),
    ("warning", "#ffea46"),
    ("info", "#575d6d"),
];

/// Slots that absorb detected colors beyond the first six, cycled by
/// `index % 3`. Last writer for a slot wins.
pub const OVERFLOW_SLOTS: [&str; 3] = ["info", "accent", "secondary"];

/// Neutral layout variables, always emitted with these fixed values.
pub const NEUTRAL_VARIABLES: [(&str, &str); 5] = [
    ("background", "#ffffff"),
    ("surface", "#f8f9fa"),
    ("text", "#212529"),
    ("text-muted", "#6c757d"),
    ("border", "#dee2e6"),
];

fn var_name(slot: &str) -> String {
    format!("{VARIABLE_PREFIX}{slot}")
}

/// Map ranked detected colors onto the semantic slots.
///
/// Rank i fills slot i for the first six; further colors cycle the overflow
/// slots, overwriting whatever those held. The five neutral variables are
/// appended regardless of detection results. Deterministic: identical input
/// always yields the identical set.
pub fn map_detected_colors(ranked: &[String]) -> CssVariableSet {
    let mut set = CssVariableSet::new();

    for (i, (slot, default)) in SEMANTIC_SLOTS.iter().enumerate() {
        let value = ranked.get(i).map(String::as_str).unwrap_or(default);
        set.set(var_name(slot), value);
    }

    for (i, color) in ranked.iter().enumerate().skip(SEMANTIC_SLOTS.len()) {
        let slot = OVERFLOW_SLOTS[i % OVERFLOW_SLOTS.len()];
        set.set(var_name(slot), color.as_str());
    }

    for (slot, value) in NEUTRAL_VARIABLES {
        set.set(var_name(slot), value);
    }

    set
}

/// The full default palette: every semantic slot and neutral at its fixed
/// default. Used only when local fallback is explicitly enabled.
pub fn default_palette() -> CssVariableSet {
    map_detected_colors(&[])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn colors(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("#c{i:05x}")).collect()
    }

    #[test]
    fn test_empty_input_yields_defaults() {
        let set = map_detected_colors(&[]);
        assert_eq!(set.get("--theme-primary"), Some("#00204c"));
        assert_eq!(set.get("--theme-info"), Some("#575d6d"));
        assert_eq!(set.get("--theme-background"), Some("#ffffff"));
        assert_eq!(set.len(), 11);
    }

    #[test]
    fn test_ranks_fill_slots_in_order() {
        let detected = colors(3);
        let set = map_detected_colors(&detected);
        assert_eq!(set.get("--theme-primary"), Some("#c00001"));
        assert_eq!(set.get("--theme-secondary"), Some("#c00002"));
        assert_eq!(set.get("--theme-accent"), Some("#c00003"));
        // Undetected slots keep their defaults
        assert_eq!(set.get("--theme-success"), Some("#7f7c75"));
    }

    #[test]
    fn test_overflow_cycles_priority_slots() {
        // The 8-color scenario: c7 -> info (6 % 3 == 0), c8 -> accent.
        let detected = colors(8);
        let set = map_detected_colors(&detected);
        assert_eq!(set.get("--theme-primary"), Some("#c00001"));
        assert_eq!(set.get("--theme-secondary"), Some("#c00002"));
        assert_eq!(set.get("--theme-accent"), Some("#c00008"));
        assert_eq!(set.get("--theme-success"), Some("#c00004"));
        assert_eq!(set.get("--theme-warning"), Some("#c00005"));
        assert_eq!(set.get("--theme-info"), Some("#c00007"));
    }

    #[test]
    fn test_overflow_last_writer_wins() {
        // 12 colors: info takes c7 then c10, accent c8 then c11,
        // secondary c9 then c12.
        let detected = colors(12);
        let set = map_detected_colors(&detected);
        assert_eq!(set.get("--theme-info"), Some("#c0000a"));
        assert_eq!(set.get("--theme-accent"), Some("#c0000b"));
        assert_eq!(set.get("--theme-secondary"), Some("#c0000c"));
    }

    #[test]
    fn test_neutrals_always_present() {
        let set = map_detected_colors(&colors(8));
        for (slot, value) in NEUTRAL_VARIABLES {
            assert_eq!(set.get(&format!("--theme-{slot}")), Some(value));
        }
    }

    #[test]
    fn test_deterministic() {
        let detected = colors(7);
        let a = map_detected_colors(&detected);
        let b = map_detected_colors(&detected);
        assert_eq!(a, b);
    }
}
