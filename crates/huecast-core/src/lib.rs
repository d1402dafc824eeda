//! Huecast Core Library
//!
//! Platform-agnostic data structures and logic for the Huecast theme engine.
//! Everything here runs (and is tested) natively; the browser glue lives in
//! `huecast-engine`.

pub mod color;
pub mod config;
pub mod cta;
pub mod detect;
pub mod error;
pub mod events;
pub mod mapping;
pub mod palette;
pub mod rules;

pub use config::{CtaConfig, CtaPosition, ThemeConfig, ThemeConfigPatch};
pub use detect::ColorUsage;
pub use error::{ThemeError, ThemeResult};
pub use events::{EventEmitter, ThemeEvent};
pub use mapping::map_detected_colors;
pub use palette::{CssVariableSet, PaletteResponse, StylingRule};
