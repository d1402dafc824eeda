//! Color string handling: normalization, `rgb()` conversion, neutral filtering.
//!
//! Normalization is best-effort by contract: values the engine does not
//! recognize (already-prefixed hex, `var()` references, gradients) pass
//! through unchanged so the browser can still interpret them.

/// Colors the sampler ignores when ranking page colors. Pure white/black and
/// the common neutral grays carry no theme signal.
const NEUTRAL_DENYLIST: &[&str] = &[
    "#ffffff", "#000000", "#fefefe", "#fafafa", "#f8f9fa", "#f5f5f5",
    "#eeeeee", "#e9ecef", "#e0e0e0", "#dee2e6", "#dddddd", "#cccccc",
    "#999999", "#808080", "#6c757d", "#666666", "#444444", "#333333",
    "#212529", "#222222", "#111111",
];

/// The only named colors the sampler resolves. Anything else is skipped.
const NAMED_COLORS: &[(&str, &str)] = &[
    ("white", "#ffffff"),
    ("black", "#000000"),
    ("red", "#ff0000"),
    ("green", "#008000"),
    ("blue", "#0000ff"),
    ("yellow", "#ffff00"),
    ("purple", "#800080"),
    ("orange", "#ffa500"),
];

/// Alpha below this is treated as effectively transparent and skipped.
const MIN_ALPHA: f64 = 0.1;

/// Normalize a color string to canonical form.
///
/// A bare 6- or 8-digit hex value gains a `#` prefix; every other input is
/// returned unchanged. Never errors.
pub fn normalize(color: &str) -> String {
    let trimmed = color.trim();
    if is_bare_hex(trimmed) {
        format!("#{trimmed}")
    } else {
        color.to_string()
    }
}

fn is_bare_hex(s: &str) -> bool {
    (s.len() == 6 || s.len() == 8) && s.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Convert an `rgb()`/`rgba()` string to lowercase `#rrggbb`.
///
/// Returns `None` for non-rgb input, malformed components, or an alpha below
/// the transparency threshold.
pub fn rgb_to_hex(value: &str) -> Option<String> {
    let trimmed = value.trim();
    let inner = trimmed
        .strip_prefix("rgba(")
        .or_else(|| trimmed.strip_prefix("rgb("))?
        .strip_suffix(')')?;

    let parts: Vec<&str> = inner.split(',').map(str::trim).collect();
    if parts.len() != 3 && parts.len() != 4 {
        return None;
    }

    if parts.len() == 4 {
        let alpha: f64 = parts[3].parse().ok()?;
        if alpha < MIN_ALPHA {
            return None;
        }
    }

    let r: u8 = parts[0].parse().ok()?;
    let g: u8 = parts[1].parse().ok()?;
    let b: u8 = parts[2].parse().ok()?;
    Some(format!("#{r:02x}{g:02x}{b:02x}"))
}

/// Look up one of the small set of recognized named colors.
pub fn named_to_hex(name: &str) -> Option<&'static str> {
    let lower = name.trim().to_ascii_lowercase();
    NAMED_COLORS
        .iter()
        .find(|(n, _)| *n == lower)
        .map(|(_, hex)| *hex)
}

/// Whether a hex color is on the neutral denylist.
pub fn is_neutral(hex: &str) -> bool {
    let lower = hex.to_ascii_lowercase();
    NEUTRAL_DENYLIST.contains(&lower.as_str())
}

/// Reduce an arbitrary computed-style color to lowercase `#rrggbb`, if the
/// sampler recognizes the form at all.
///
/// Handles `rgb()`/`rgba()` (the shape `getComputedStyle` reports), hex with
/// or without `#`, and the recognized named colors. 8-digit hex drops its
/// alpha pair. Everything else yields `None`.
pub fn canonical_hex(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("transparent") {
        return None;
    }

    if trimmed.starts_with("rgb") {
        return rgb_to_hex(trimmed);
    }

    let bare = trimmed.strip_prefix('#').unwrap_or(trimmed);
    if is_bare_hex(bare) {
        return Some(format!("#{}", bare[..6].to_ascii_lowercase()));
    }
    if bare.len() == 3 && bare.bytes().all(|b| b.is_ascii_hexdigit()) {
        // Expand #abc to #aabbcc
        let mut expanded = String::with_capacity(7);
        expanded.push('#');
        for c in bare.chars() {
            let c = c.to_ascii_lowercase();
            expanded.push(c);
            expanded.push(c);
        }
        return Some(expanded);
    }

    named_to_hex(trimmed).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_bare_hex() {
        assert_eq!(normalize("00204c"), "#00204c");
        assert_eq!(normalize("bbaf71"), "#bbaf71");
        assert_eq!(normalize("00204cff"), "#00204cff");
    }

    #[test]
    fn test_normalize_passthrough() {
        assert_eq!(normalize("#7f7c75"), "#7f7c75");
        assert_eq!(normalize("rgb(0, 32, 76)"), "rgb(0, 32, 76)");
        assert_eq!(normalize("var(--theme-primary)"), "var(--theme-primary)");
        assert_eq!(normalize("not-a-color"), "not-a-color");
        // 5 hex digits is not a recognized bare form
        assert_eq!(normalize("00204"), "00204");
    }

    #[test]
    fn test_rgb_to_hex() {
        assert_eq!(rgb_to_hex("rgb(0, 32, 76)").as_deref(), Some("#00204c"));
        assert_eq!(rgb_to_hex("rgb(255,255,255)").as_deref(), Some("#ffffff"));
        assert_eq!(
            rgb_to_hex("rgba(187, 175, 113, 0.9)").as_deref(),
            Some("#bbaf71")
        );
    }

    #[test]
    fn test_rgb_to_hex_transparent() {
        assert_eq!(rgb_to_hex("rgba(0, 0, 0, 0)"), None);
        assert_eq!(rgb_to_hex("rgba(10, 20, 30, 0.05)"), None);
    }

    #[test]
    fn test_rgb_to_hex_malformed() {
        assert_eq!(rgb_to_hex("rgb(300, 0, 0)"), None);
        assert_eq!(rgb_to_hex("rgb(1, 2)"), None);
        assert_eq!(rgb_to_hex("hsl(10, 20%, 30%)"), None);
    }

    #[test]
    fn test_named_colors() {
        assert_eq!(named_to_hex("white"), Some("#ffffff"));
        assert_eq!(named_to_hex("Orange"), Some("#ffa500"));
        assert_eq!(named_to_hex("rebeccapurple"), None);
    }

    #[test]
    fn test_is_neutral() {
        assert!(is_neutral("#ffffff"));
        assert!(is_neutral("#F8F9FA"));
        assert!(!is_neutral("#00204c"));
    }

    #[test]
    fn test_canonical_hex() {
        assert_eq!(canonical_hex("rgb(0, 32, 76)").as_deref(), Some("#00204c"));
        assert_eq!(canonical_hex("#BBAF71").as_deref(), Some("#bbaf71"));
        assert_eq!(canonical_hex("bbaf71").as_deref(), Some("#bbaf71"));
        assert_eq!(canonical_hex("#abc").as_deref(), Some("#aabbcc"));
        assert_eq!(canonical_hex("white").as_deref(), Some("#ffffff"));
        assert_eq!(canonical_hex("transparent"), None);
        assert_eq!(canonical_hex("tomato"), None);
        // Alpha pair dropped from 8-digit hex
        assert_eq!(canonical_hex("#00204cff").as_deref(), Some("#00204c"));
    }
}
