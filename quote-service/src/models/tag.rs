//! Emotion tag catalog.

use serde::{Deserialize, Serialize};

/// Preset emotion tags offered to clients. Order is the order served by `/api/v1/tags`.
pub const PRESET_TAGS: [&str; 30] = [
    "joy",
    "sadness",
    "anger",
    "fear",
    "surprise",
    "love",
    "gratitude",
    "resilience",
    "optimism",
    "melancholy",
    "confidence",
    "anxiety",
    "curiosity",
    "hope",
    "calm",
    "nostalgia",
    "wonder",
    "determination",
    "humor",
    "serenity",
    "loneliness",
    "pride",
    "forgiveness",
    "humility",
    "ambition",
    "compassion",
    "playful",
    "boredom",
    "zeal",
    "contentment",
];

/// Exact, case-sensitive catalog membership.
pub fn is_preset_tag(tag: &str) -> bool {
    PRESET_TAGS.contains(&tag)
}

/// Whether a stored tag came from the catalog or was typed by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagSource {
    Preset,
    Custom,
}

impl TagSource {
    pub fn classify(tag: &str) -> Self {
        if is_preset_tag(tag) {
            TagSource::Preset
        } else {
            TagSource::Custom
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TagSource::Preset => "preset",
            TagSource::Custom => "custom",
        }
    }
}
