//! Injection of server-supplied styling rules into a dedicated stylesheet.

use std::collections::BTreeMap;

use huecast_core::palette::StylingRule;
use huecast_core::rules::{self, STYLESHEET_ID};
use huecast_core::{ThemeError, ThemeResult};
use web_sys::Document;

/// Write the styling rules into the engine's `<style>` element, creating it
/// on first use and fully replacing its content on every call.
pub fn inject_styling_rules(
    document: &Document,
    styling_rules: &BTreeMap<String, StylingRule>,
) -> ThemeResult<()> {
    let supports_has = has_selector_support(document);
    if !supports_has {
        log::debug!(":has() unsupported, using the simpler exclusion selectors");
    }
    let css = rules::build_stylesheet(styling_rules, supports_has);

    let element = match document.get_element_by_id(STYLESHEET_ID) {
        Some(element) => element,
        None => {
            let element = document
                .create_element("style")
                .map_err(|e| ThemeError::Dom(format!("failed to create stylesheet: {e:?}")))?;
            element.set_id(STYLESHEET_ID);
            let head = document
                .head()
                .ok_or_else(|| ThemeError::Dom("document has no head".to_string()))?;
            head.append_child(&element)
                .map_err(|e| ThemeError::Dom(format!("failed to attach stylesheet: {e:?}")))?;
            element
        }
    };

    element.set_text_content(Some(&css));
    log::debug!("injected {} styling rules", styling_rules.len());
    Ok(())
}

/// Probe `:has()` support. `querySelector` rejects selectors the rendering
/// engine cannot parse, which is exactly the signal needed to pick the
/// fallback exclusion strategy instead of emitting dead CSS.
fn has_selector_support(document: &Document) -> bool {
    document.query_selector(":has(*)").is_ok()
}

/// Remove the injected stylesheet, if present.
pub fn remove_stylesheet(document: &Document) {
    if let Some(element) = document.get_element_by_id(STYLESHEET_ID) {
        element.remove();
    }
}
