//! Expression Settings
//!
//! Tunables for the blend-shape binding merger and the expression mixer.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use myth_avatar::settings::MergerSettings;
//!
//! // Standard/MToon style shaders
//! let settings = MergerSettings::default();
//!
//! // Host whose shaders expose UV transform under another name
//! let settings = MergerSettings {
//!     uv_property: "uv_transform".to_string(),
//!     ..Default::default()
//! };
//! ```

/// Default host property holding `(scale.x, scale.y, offset.x, offset.y)`
/// of the main texture.
pub const DEFAULT_UV_PROPERTY: &str = "_MainTex_ST";

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MergerSettings {
    /// Material property written by UV bindings.
    pub uv_property: String,

    /// Binary clips snap to 1.0 above this weight and to 0.0 otherwise.
    pub binary_threshold: f32,
}

impl Default for MergerSettings {
    fn default() -> Self {
        Self {
            uv_property: DEFAULT_UV_PROPERTY.to_string(),
            binary_threshold: 0.5,
        }
    }
}
