//! Stylesheet generation for server-supplied styling rules.

use std::collections::BTreeMap;

use crate::cta::CTA_BUTTON_ID;
use crate::palette::StylingRule;

/// Reserved id of the injected `<style>` element. Its content is fully
/// replaced on every injection, never appended.
pub const STYLESHEET_ID: &str = "huecast-styling-rules";

/// Guard one selector so it can never match the CTA button, neither as the
/// direct target nor as an element containing it.
///
/// The primary strategy uses `:has()` to exclude ancestors of the button;
/// callers that probed the rendering engine and found `:has()` unsupported
/// pass `supports_has = false` and get the simpler guard instead of a
/// selector the engine would drop wholesale.
pub fn guard_selector(selector: &str, supports_has: bool) -> String {
    let guarded: Vec<String> = selector
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            if supports_has {
                format!(
                    "{part}:not(#{id}):not(#{id} *):not(:has(#{id}))",
                    id = CTA_BUTTON_ID
                )
            } else {
                format!("{part}:not(#{id}):not(#{id} *)", id = CTA_BUTTON_ID)
            }
        })
        .collect();
    guarded.join(", ")
}

/// Render one rule block. Declarations carry `!important` so they win over
/// ordinary page styles; absent optional fields are omitted.
fn render_rule(rule: &StylingRule, supports_has: bool) -> String {
    let mut block = String::new();
    block.push_str(&guard_selector(&rule.selector, supports_has));
    block.push_str(" {\n");
    block.push_str(&format!("  background: {} !important;\n", rule.background));
    block.push_str(&format!("  color: {} !important;\n", rule.text_color));
    if let Some(border) = &rule.border_color {
        block.push_str(&format!("  border-color: {border} !important;\n"));
    }
    block.push_str("}\n");
    block
}

/// Build the full stylesheet text for a set of named rules.
///
/// Rule names become comments above their blocks so the output is
/// debuggable in devtools. BTreeMap iteration keeps the output
/// deterministic for a given rule set.
pub fn build_stylesheet(rules: &BTreeMap<String, StylingRule>, supports_has: bool) -> String {
    let mut sheet = String::new();
    for (name, rule) in rules {
        sheet.push_str(&format!("/* {name} */\n"));
        sheet.push_str(&render_rule(rule, supports_has));
        sheet.push('\n');
    }
    sheet
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(selector: &str, border: Option<&str>) -> StylingRule {
        StylingRule {
            selector: selector.to_string(),
            background: "#00204c".to_string(),
            text_color: "#ffea46".to_string(),
            border_color: border.map(str::to_string),
            description: None,
        }
    }

    #[test]
    fn test_guard_excludes_cta() {
        let guarded = guard_selector("button", true);
        assert_eq!(
            guarded,
            "button:not(#huecast-cta):not(#huecast-cta *):not(:has(#huecast-cta))"
        );
    }

    #[test]
    fn test_guard_without_has_support() {
        let guarded = guard_selector("button", false);
        assert_eq!(guarded, "button:not(#huecast-cta):not(#huecast-cta *)");
        assert!(!guarded.contains(":has"));
    }

    #[test]
    fn test_guard_applies_to_each_list_part() {
        let guarded = guard_selector("button, .btn", false);
        assert_eq!(
            guarded,
            "button:not(#huecast-cta):not(#huecast-cta *), \
             .btn:not(#huecast-cta):not(#huecast-cta *)"
        );
    }

    #[test]
    fn test_optional_border_omitted() {
        let sheet = build_stylesheet(
            &BTreeMap::from([("buttons".to_string(), rule("button", None))]),
            true,
        );
        assert!(sheet.contains("background: #00204c !important;"));
        assert!(sheet.contains("color: #ffea46 !important;"));
        assert!(!sheet.contains("border-color"));
    }

    #[test]
    fn test_border_included_when_present() {
        let sheet = build_stylesheet(
            &BTreeMap::from([("buttons".to_string(), rule("button", Some("#414d6b")))]),
            true,
        );
        assert!(sheet.contains("border-color: #414d6b !important;"));
    }

    #[test]
    fn test_one_block_per_named_rule() {
        let rules = BTreeMap::from([
            ("buttons".to_string(), rule("button", None)),
            ("links".to_string(), rule("a", None)),
        ]);
        let sheet = build_stylesheet(&rules, true);
        assert_eq!(sheet.matches("/* ").count(), 2);
        assert!(sheet.contains("/* buttons */"));
        assert!(sheet.contains("/* links */"));
    }
}
