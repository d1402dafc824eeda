//! Palette wire types, validation, and CSS variable sets.
//!
//! These types are shared verbatim with `huecast-server`, so the JSON shape
//! here *is* the wire contract.

use std::collections::BTreeMap;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::color;
use crate::error::{ThemeError, ThemeResult};

/// Prefix for every CSS custom property the engine writes.
pub const VARIABLE_PREFIX: &str = "--theme-";

/// Color keys the wire contract names, in application order.
const KNOWN_COLOR_KEYS: &[&str] = &[
    "primary",
    "secondary",
    "accent",
    "success",
    "warning",
    "info",
    "background",
    "surface",
    "text",
    "text-muted",
    "border",
];

/// One server-supplied styling rule: a selector plus the colors to apply.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StylingRule {
    pub selector: String,
    pub background: String,
    pub text_color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Response body of the palette endpoint.
///
/// Immutable once parsed; each successful fetch replaces the previous
/// response wholesale.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaletteResponse {
    #[serde(default)]
    pub success: bool,
    pub colors: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub styling_rules: Option<BTreeMap<String, StylingRule>>,
}

/// Validate a raw JSON value as a palette response.
///
/// The result must be an object carrying a `colors` object. A palette
/// missing any of primary/secondary/accent is suspicious enough to warn
/// about but is still returned as-is; this layer never injects substitute
/// values.
pub fn validate_response(value: serde_json::Value) -> ThemeResult<PaletteResponse> {
    let obj = value
        .as_object()
        .ok_or_else(|| ThemeError::Validation("response is not a JSON object".into()))?;

    if !obj.get("colors").is_some_and(|c| c.is_object()) {
        return Err(ThemeError::Validation(
            "response has no `colors` object".into(),
        ));
    }

    let response: PaletteResponse = serde_json::from_value(value)
        .map_err(|e| ThemeError::Validation(e.to_string()))?;

    for key in ["primary", "secondary", "accent"] {
        if !response.colors.contains_key(key) {
            log::warn!("palette response is missing `{key}`");
        }
    }

    Ok(response)
}

/// Insertion-ordered mapping of CSS variable name -> color-or-gradient
/// string.
///
/// `set` on an existing name overwrites in place, so the set always reflects
/// one complete source; sequential full applications never interleave
/// field-by-field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CssVariableSet {
    entries: Vec<(String, String)>,
}

impl CssVariableSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a variable, overwriting any existing value for the same name.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        if let Some(entry) = self.entries.iter_mut().find(|(n, _)| *n == name) {
            entry.1 = value;
        } else {
            self.entries.push((name, value));
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// Serialized as a JSON object so event details read naturally in JS.
impl Serialize for CssVariableSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Transform fetched palette colors into the variable set to apply.
///
/// Known keys come first in contract order, then any extra keys the server
/// sent, so the output is deterministic for a given response. Values go
/// through [`color::normalize`] on the way in.
pub fn theme_variables(colors: &BTreeMap<String, String>) -> CssVariableSet {
    let mut set = CssVariableSet::new();
    for key in KNOWN_COLOR_KEYS {
        if let Some(value) = colors.get(*key) {
            set.set(format!("{VARIABLE_PREFIX}{key}"), color::normalize(value));
        }
    }
    for (key, value) in colors {
        let name = format!("{VARIABLE_PREFIX}{key}");
        if set.get(&name).is_none() {
            set.set(name, color::normalize(value));
        }
    }
    set
}
