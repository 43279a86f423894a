use serde::{Deserialize, Serialize};

use crate::decode::AlphaMode;

/// User settings for one filter instance, stored by the host as JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub file: String,
    /// Drop the image while the filter is not showing.
    pub unload: bool,
    pub linear_alpha: bool,
    /// Set by a slideshow driver that loads and unloads the image itself.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_slide: bool,
}

impl Settings {
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| String::from("{}"))
    }

    /// Keep the texture resident while hidden.
    pub fn persistent(&self) -> bool {
        !self.unload
    }

    pub fn alpha_mode(&self) -> AlphaMode {
        if self.linear_alpha {
            AlphaMode::PremultiplyLinear
        } else {
            AlphaMode::Premultiply
        }
    }
}

/// Defaults registered with the host for new instances.
pub fn default_settings() -> Settings {
    Settings {
        file: String::new(),
        unload: false,
        linear_alpha: false,
        is_slide: false,
    }
}
