//! Visual identity tokens and collaborator settings.
//!
//! Both are hashed into the run identity, so every map here is ordered.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Font family and size for one text role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct FontToken {
    /// Font family name
    family: String,
    /// Point size
    size: u32,
}

impl FontToken {
    fn new(family: &str, size: u32) -> Self {
        Self {
            family: family.to_string(),
            size,
        }
    }
}

/// Transition timing shared by animated events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct TransitionToken {
    /// Transition length in milliseconds
    duration_ms: u32,
    /// Easing curve name
    easing: String,
}

/// Layout anchors in scene coordinate units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct LayoutToken {
    /// Vertical position of titles
    title_y: f64,
    /// Horizontal position of formulas
    formula_x: f64,
    /// Margin kept clear at the frame edges
    safe_margin: f64,
}

/// Visual identity tokens shared across scenes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
#[serde(default)]
pub struct StyleTokens {
    /// Token set name
    name: String,
    /// Fonts by text role (title, heading, body, caption)
    fonts: BTreeMap<String, FontToken>,
    /// Colors by role, as hex strings
    colors: BTreeMap<String, String>,
    /// Transition timing
    transitions: TransitionToken,
    /// Layout anchors
    layout: LayoutToken,
}

impl Default for StyleTokens {
    fn default() -> Self {
        let fonts = [
            ("title", 40),
            ("heading", 32),
            ("body", 24),
            ("caption", 20),
        ]
        .into_iter()
        .map(|(role, size)| (role.to_string(), FontToken::new("Inter", size)))
        .collect();

        let colors = [
            ("background", "#0B0F19"),
            ("text", "#F6F8FF"),
            ("accent_primary", "#3498DB"),
            ("accent_secondary", "#E74C3C"),
            ("highlight", "#F1C40F"),
            ("neutral", "#95A5A6"),
        ]
        .into_iter()
        .map(|(role, hex)| (role.to_string(), hex.to_string()))
        .collect();

        Self {
            name: "default".to_string(),
            fonts,
            colors,
            transitions: TransitionToken {
                duration_ms: 300,
                easing: "ease_in_out".to_string(),
            },
            layout: LayoutToken {
                title_y: 3.2,
                formula_x: 5.2,
                safe_margin: 0.3,
            },
        }
    }
}

/// Settings of the external text-generation and speech-synthesis providers.
///
/// Changing any of these changes what the collaborators produce, so they are part
/// of the run identity.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Getters,
    derive_setters::Setters,
)]
#[setters(prefix = "with_", into)]
#[serde(default)]
pub struct ProviderConfig {
    /// Speech synthesis provider name
    speech_provider: String,
    /// Voice preset
    voice: String,
    /// Speech synthesis model
    speech_model: String,
    /// Prompt expansion model
    prompt_model: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            speech_provider: "openai".to_string(),
            voice: "ballad".to_string(),
            speech_model: "gpt-4o-mini-tts".to_string(),
            prompt_model: "gpt-4o-mini".to_string(),
        }
    }
}
