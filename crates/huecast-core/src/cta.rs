//! Placement and sizing policy for the call-to-action button.
//!
//! Everything here is pure computation; the engine crate owns the DOM
//! element itself.

use crate::config::{CtaConfig, CtaPosition};

/// Reserved element id. Creation is idempotent on this id, and injected
/// styling rules must never match it.
pub const CTA_BUTTON_ID: &str = "huecast-cta";

/// Fraction of the main content width the button may occupy.
pub const MAX_WIDTH_FRACTION: f64 = 0.12;

/// Absolute ceiling on the computed max-width, in pixels.
pub const MAX_WIDTH_CEILING_PX: f64 = 220.0;

/// Candidate header/nav landmarks, searched in order for the first visible
/// match when the configured position is `header`.
pub const HEADER_CANDIDATES: &[&str] = &[
    "header",
    "[role=\"banner\"]",
    "nav",
    "[role=\"navigation\"]",
    ".navbar",
    ".nav-bar",
    ".site-header",
    ".page-header",
    ".header",
    ".top-bar",
    ".masthead",
];

/// Within a matched landmark, the most specific nested navigation container
/// wins; searched in order, falling back to the landmark itself.
pub const NAV_CONTAINERS: &[&str] = &[".navbar-nav", ".nav-links", ".menu", "nav", "ul"];

/// Containers whose width bounds the button's responsive sizing.
pub const CONTENT_CONTAINERS: &[&str] = &["main", "[role=\"main\"]", ".container", ".content", "body"];

/// Responsive max-width: a fraction of the effective content width, capped
/// at the fixed ceiling.
pub fn max_width_px(content_width: f64) -> f64 {
    (content_width * MAX_WIDTH_FRACTION).min(MAX_WIDTH_CEILING_PX)
}

/// Effective width of the content container: the lesser of its actual width
/// and any CSS max-width constraint.
pub fn effective_width(actual: f64, css_max_width: Option<f64>) -> f64 {
    match css_max_width {
        Some(max) if max > 0.0 => actual.min(max),
        _ => actual,
    }
}

/// Fixed-position offsets for a floating corner placement. `Header` has no
/// offsets; it means in-flow insertion.
pub fn corner_offsets(position: CtaPosition) -> Option<[(&'static str, &'static str); 2]> {
    match position {
        CtaPosition::Header => None,
        CtaPosition::TopRight => Some([("top", "20px"), ("right", "20px")]),
        CtaPosition::TopLeft => Some([("top", "20px"), ("left", "20px")]),
        CtaPosition::BottomRight => Some([("bottom", "20px"), ("right", "20px")]),
        CtaPosition::BottomLeft => Some([("bottom", "20px"), ("left", "20px")]),
    }
}

/// Offsets to use when the button ends up floating. A configured corner is
/// used as-is; a `header` placement that found no landmark falls back to the
/// top-right corner rather than dropping the button.
pub fn floating_offsets(position: CtaPosition) -> [(&'static str, &'static str); 2] {
    corner_offsets(position).unwrap_or([("top", "20px"), ("right", "20px")])
}

/// Style declarations for the button, as (property, value) pairs.
///
/// Applied with `!important` priority so later injected styling rules cannot
/// repaint the engine's own control. `floating` adds the fixed-position
/// block for corner placements.
pub fn button_style(config: &CtaConfig, floating: bool) -> Vec<(String, String)> {
    let mut style: Vec<(String, String)> = vec![
        ("background".into(), config.gradient.clone()),
        ("color".into(), config.text_color.clone()),
        ("border".into(), "none".into()),
        ("border-radius".into(), "6px".into()),
        ("padding".into(), "10px 18px".into()),
        ("font-size".into(), "14px".into()),
        ("font-weight".into(), "600".into()),
        ("cursor".into(), "pointer".into()),
        ("box-shadow".into(), "0 2px 8px rgba(0, 0, 0, 0.25)".into()),
        ("transition".into(), "opacity 0.2s ease".into()),
        ("white-space".into(), "nowrap".into()),
        ("overflow".into(), "hidden".into()),
        ("text-overflow".into(), "ellipsis".into()),
    ];

    if floating {
        style.push(("position".into(), "fixed".into()));
        style.push(("z-index".into(), "2147483000".into()));
        for (prop, value) in floating_offsets(config.position) {
            style.push((prop.into(), value.into()));
        }
    }

    style
}
