//! CSS variable application and DOM event dispatch.

use huecast_core::palette::CssVariableSet;
use huecast_core::{ThemeError, ThemeEvent, ThemeResult};
use wasm_bindgen::JsCast;
use web_sys::{CustomEvent, CustomEventInit, Document, HtmlElement};

/// Write each variable as an inline style property on the document root.
///
/// This is a merge by key presence: entries overwrite their own prior
/// values and everything else on the root is left untouched.
pub fn apply_variable_set(document: &Document, set: &CssVariableSet) -> ThemeResult<()> {
    let root: HtmlElement = document
        .document_element()
        .ok_or_else(|| ThemeError::Dom("document has no root element".to_string()))?
        .dyn_into()
        .map_err(|_| ThemeError::Dom("document root is not an HTML element".to_string()))?;

    let style = root.style();
    for (name, value) in set.iter() {
        style
            .set_property(name, value)
            .map_err(|e| ThemeError::Dom(format!("failed to set {name}: {e:?}")))?;
    }

    log::debug!("applied {} css variables", set.len());
    Ok(())
}

/// Read one variable back from the root element's inline style.
pub fn read_variable(document: &Document, name: &str) -> Option<String> {
    let root: HtmlElement = document.document_element()?.dyn_into().ok()?;
    let value = root.style().get_property_value(name).ok()?;
    if value.is_empty() { None } else { Some(value) }
}

/// Dispatch a lifecycle event on the document as a `CustomEvent`, carrying
/// the event's JSON detail. Dispatch failures are swallowed; eventing must
/// never take the engine down.
pub fn dispatch_dom_event(document: &Document, event: &ThemeEvent) {
    let init = CustomEventInit::new();
    init.set_bubbles(true);
    if let Some(detail) = event.detail() {
        if let Ok(js_detail) = js_sys::JSON::parse(&detail.to_string()) {
            init.set_detail(&js_detail);
        }
    }
    match CustomEvent::new_with_event_init_dict(event.name(), &init) {
        Ok(custom) => {
            let _ = document.dispatch_event(&custom);
        }
        Err(err) => log::warn!("failed to construct {} event: {err:?}", event.name()),
    }
}
