//! Lifecycle events and the observer registry.
//!
//! Event names and detail shapes are the wire contract with the host page;
//! the engine mirrors each emission as a DOM `CustomEvent` under the same
//! name.

use serde::Serialize;

use crate::palette::CssVariableSet;

/// Event name: a complete variable set was written to the root element.
pub const THEME_APPLIED: &str = "theme-applied";
/// Event name: a terminal failure was surfaced.
pub const THEME_ERROR: &str = "theme-error";
/// Event name: the CTA button was activated.
pub const CTA_CLICKED: &str = "cta-clicked";

/// A lifecycle event with its payload.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ThemeEvent {
    Applied {
        variables: CssVariableSet,
    },
    Error {
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        source: Option<String>,
    },
    CtaClicked,
}

impl ThemeEvent {
    /// The wire name this event is dispatched under.
    pub fn name(&self) -> &'static str {
        match self {
            ThemeEvent::Applied { .. } => THEME_APPLIED,
            ThemeEvent::Error { .. } => THEME_ERROR,
            ThemeEvent::CtaClicked => CTA_CLICKED,
        }
    }

    /// JSON detail payload, or `None` for events that carry no detail.
    pub fn detail(&self) -> Option<serde_json::Value> {
        match self {
            ThemeEvent::CtaClicked => None,
            other => serde_json::to_value(other).ok(),
        }
    }
}

type Listener = Box<dyn Fn(&ThemeEvent)>;

/// Observer registry: callbacks keyed by event name.
///
/// Deliberately not `Send`/`Sync`; everything runs on the browser main
/// thread.
#[derive(Default)]
pub struct EventEmitter {
    listeners: Vec<(String, Listener)>,
}

impl EventEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback for one event name.
    pub fn on(&mut self, event: &str, callback: impl Fn(&ThemeEvent) + 'static) {
        self.listeners.push((event.to_string(), Box::new(callback)));
    }

    /// Invoke every callback registered for this event's name, in
    /// registration order.
    pub fn emit(&self, event: &ThemeEvent) {
        let name = event.name();
        for (registered, callback) in &self.listeners {
            if registered == name {
                callback(event);
            }
        }
    }

    /// Drop all registrations.
    pub fn clear(&mut self) {
        self.listeners.clear();
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl std::fmt::Debug for EventEmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventEmitter")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_event_names() {
        let mut variables = CssVariableSet::new();
        variables.set("--theme-primary", "#00204c");
        assert_eq!(ThemeEvent::Applied { variables }.name(), "theme-applied");
        assert_eq!(
            ThemeEvent::Error {
                message: "x".into(),
                source: None
            }
            .name(),
            "theme-error"
        );
        assert_eq!(ThemeEvent::CtaClicked.name(), "cta-clicked");
    }

    #[test]
    fn test_applied_detail_carries_mapping() {
        let mut variables = CssVariableSet::new();
        variables.set("--theme-primary", "#00204c");
        let detail = ThemeEvent::Applied { variables }.detail().unwrap();
        assert_eq!(detail["variables"]["--theme-primary"], "#00204c");
    }

    #[test]
    fn test_cta_clicked_has_no_detail() {
        assert_eq!(ThemeEvent::CtaClicked.detail(), None);
    }

    #[test]
    fn test_emit_reaches_matching_listeners_only() {
        let hits = Rc::new(RefCell::new(0));
        let mut emitter = EventEmitter::new();

        let hits_applied = hits.clone();
        emitter.on(THEME_APPLIED, move |_| *hits_applied.borrow_mut() += 1);
        let hits_error = hits.clone();
        emitter.on(THEME_ERROR, move |_| *hits_error.borrow_mut() += 10);

        emitter.emit(&ThemeEvent::Applied {
            variables: CssVariableSet::new(),
        });
        assert_eq!(*hits.borrow(), 1);

        emitter.emit(&ThemeEvent::Error {
            message: "boom".into(),
            source: None,
        });
        assert_eq!(*hits.borrow(), 11);
    }

    #[test]
    fn test_clear() {
        let mut emitter = EventEmitter::new();
        emitter.on(CTA_CLICKED, |_| {});
        assert_eq!(emitter.len(), 1);
        emitter.clear();
        assert!(emitter.is_empty());
    }
}
