//! DOM color sampler: walk a bounded slice of the page and tally computed
//! colors.

use huecast_core::detect::{ColorUsage, MAX_SAMPLED_ELEMENTS};
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;

/// Analyze the page and return detected colors, best first.
///
/// A total failure (no window, `querySelectorAll` or `getComputedStyle`
/// unavailable) is logged and yields an empty ranking; callers treat that as
/// "nothing detected" and skip intelligent mapping, not as an error.
pub fn analyze_page_colors() -> Vec<String> {
    match try_analyze() {
        Ok(ranked) => ranked,
        Err(err) => {
            log::warn!("page color analysis failed: {err:?}");
            Vec::new()
        }
    }
}

fn try_analyze() -> Result<Vec<String>, JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let nodes = document.query_selector_all("*")?;
    let limit = (nodes.length() as usize).min(MAX_SAMPLED_ELEMENTS) as u32;

    let mut usage = ColorUsage::new();
    for i in 0..limit {
        // One unreadable element must not abort the scan.
        let Some(node) = nodes.get(i) else { continue };
        let Ok(element) = node.dyn_into::<web_sys::Element>() else {
            continue;
        };
        let Ok(Some(style)) = window.get_computed_style(&element) else {
            continue;
        };
        let background = style
            .get_property_value("background-color")
            .unwrap_or_default();
        let text = style.get_property_value("color").unwrap_or_default();
        let border = style.get_property_value("border-color").unwrap_or_default();
        usage.record_element(&background, &text, &border);
    }

    let ranked = usage.ranked_colors();
    log::debug!(
        "sampled {} elements, {} distinct colors, {} ranked",
        limit,
        usage.distinct(),
        ranked.len()
    );
    Ok(ranked)
}
