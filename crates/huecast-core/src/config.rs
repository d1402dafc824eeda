//! Engine configuration and its patch-based update.

use serde::{Deserialize, Serialize};

/// Where the CTA button goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum CtaPosition {
    /// Inside the first visible header/nav landmark; falls back to a
    /// floating corner when none exists.
    #[default]
    Header,
    TopRight,
    TopLeft,
    BottomRight,
    BottomLeft,
}

/// Call-to-action button appearance and placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CtaConfig {
    pub text: String,
    pub position: CtaPosition,
    pub gradient: String,
    pub text_color: String,
}

impl Default for CtaConfig {
    fn default() -> Self {
        Self {
            text: "Switch Theme".to_string(),
            position: CtaPosition::Header,
            gradient: "linear-gradient(135deg, #00204c 0%, #414d6b 100%)".to_string(),
            text_color: "#ffea46".to_string(),
        }
    }
}

/// Engine configuration.
///
/// Owned exclusively by the engine instance; mutated only through
/// [`ThemeConfig::apply_patch`]. The JSON field names are the wire contract
/// with the host page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ThemeConfig {
    /// Palette endpoint URL.
    pub api_endpoint: String,
    /// Toggle endpoint URL; defaults to `<apiEndpoint>/toggle`.
    pub toggle_endpoint: Option<String>,
    /// Total fetch attempts (not extra retries). Zero is treated as one.
    pub retry_attempts: u32,
    /// Delay between attempts, in milliseconds.
    pub retry_delay: u64,
    #[serde(rename = "ctaConfig")]
    pub cta: CtaConfig,
    pub debug: bool,
    /// Derive an initial palette from colors already on the page.
    pub intelligent_mapping: bool,
    /// Apply the fixed default palette when the fetch terminally fails.
    /// Off by default: the contract is "no color change", not wrong colors.
    pub allow_local_fallback: bool,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            api_endpoint: "/api/theme".to_string(),
            toggle_endpoint: None,
            retry_attempts: 3,
            retry_delay: 1000,
            cta: CtaConfig::default(),
            debug: false,
            intelligent_mapping: true,
            allow_local_fallback: false,
        }
    }
}

impl ThemeConfig {
    /// Effective attempt count; a configured zero still means one attempt.
    pub fn effective_attempts(&self) -> u32 {
        self.retry_attempts.max(1)
    }

    /// Delay before the given retry. Fixed per attempt; the escalating
    /// `delay * attempt` variant was considered and not taken.
    pub fn retry_delay_for(&self, _attempt: u32) -> u64 {
        self.retry_delay
    }

    /// The toggle endpoint, explicit or derived from the palette endpoint.
    pub fn toggle_endpoint(&self) -> String {
        self.toggle_endpoint
            .clone()
            .unwrap_or_else(|| format!("{}/toggle", self.api_endpoint.trim_end_matches('/')))
    }

    /// Shallow-merge a patch: only fields the patch carries change.
    pub fn apply_patch(&mut self, patch: ThemeConfigPatch) {
        if let Some(v) = patch.api_endpoint {
            self.api_endpoint = v;
        }
        if let Some(v) = patch.toggle_endpoint {
            self.toggle_endpoint = Some(v);
        }
        if let Some(v) = patch.retry_attempts {
            self.retry_attempts = v;
        }
        if let Some(v) = patch.retry_delay {
            self.retry_delay = v;
        }
        if let Some(v) = patch.cta {
            self.cta = v;
        }
        if let Some(v) = patch.debug {
            self.debug = v;
        }
        if let Some(v) = patch.intelligent_mapping {
            self.intelligent_mapping = v;
        }
        if let Some(v) = patch.allow_local_fallback {
            self.allow_local_fallback = v;
        }
    }
}

/// Partial configuration for [`ThemeConfig::apply_patch`]. Every field is
/// optional; absent fields leave the current value untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ThemeConfigPatch {
    pub api_endpoint: Option<String>,
    pub toggle_endpoint: Option<String>,
    pub retry_attempts: Option<u32>,
    pub retry_delay: Option<u64>,
    #[serde(rename = "ctaConfig")]
    pub cta: Option<CtaConfig>,
    pub debug: Option<bool>,
    pub intelligent_mapping: Option<bool>,
    pub allow_local_fallback: Option<bool>,
}
