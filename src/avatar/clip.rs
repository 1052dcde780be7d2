//! Blend-shape clip definitions.
//!
//! A [`BlendShapeClip`] is read-only configuration: the mixer and the
//! material merger never write to it. It bundles three kinds of bindings:
//!
//! - [`MeshWeightBinding`]: drive a morph target of a node's mesh
//! - [`MaterialColorBinding`]: blend a material color toward a target
//! - [`MaterialUvBinding`]: offset a material's UV scale/offset

use bitflags::bitflags;
use glam::Vec4;

use crate::model::NodeHandle;

/// Well-known expression presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BlendShapePreset {
    Neutral,

    // Mouth
    Aa,
    Ih,
    Ou,
    Ee,
    Oh,

    // Eyes
    Blink,
    BlinkLeft,
    BlinkRight,

    // Emotion
    Joy,
    Angry,
    Sorrow,
    Fun,

    // Gaze
    LookUp,
    LookDown,
    LookLeft,
    LookRight,
}

impl BlendShapePreset {
    #[must_use]
    pub fn is_blink(self) -> bool {
        matches!(self, Self::Blink | Self::BlinkLeft | Self::BlinkRight)
    }

    #[must_use]
    pub fn is_look_at(self) -> bool {
        matches!(
            self,
            Self::LookUp | Self::LookDown | Self::LookLeft | Self::LookRight
        )
    }

    #[must_use]
    pub fn is_mouth(self) -> bool {
        matches!(self, Self::Aa | Self::Ih | Self::Ou | Self::Ee | Self::Oh)
    }
}

/// Identifies a clip: by preset, or by free-form name for custom clips.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BlendShapeKey {
    Preset(BlendShapePreset),
    Custom(String),
}

impl BlendShapeKey {
    #[must_use]
    pub fn custom(name: &str) -> Self {
        Self::Custom(name.to_string())
    }

    #[must_use]
    pub fn preset(&self) -> Option<BlendShapePreset> {
        match self {
            Self::Preset(p) => Some(*p),
            Self::Custom(_) => None,
        }
    }
}

impl From<BlendShapePreset> for BlendShapeKey {
    fn from(preset: BlendShapePreset) -> Self {
        Self::Preset(preset)
    }
}

impl From<&str> for BlendShapeKey {
    fn from(name: &str) -> Self {
        Self::custom(name)
    }
}

bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct ClipFlags: u8 {
        /// Weights snap to 0 or 1.
        const IS_BINARY     = 1 << 0;
        /// Suppresses blink clips while active.
        const IGNORE_BLINK  = 1 << 1;
        /// Suppresses look-at clips while active.
        const IGNORE_LOOK_AT = 1 << 2;
        /// Suppresses mouth clips while active.
        const IGNORE_MOUTH  = 1 << 3;
    }
}

/// Material property targeted by a color binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MaterialBindType {
    Color,
    EmissionColor,
    ShadeColor,
    RimColor,
    OutlineColor,
}

impl MaterialBindType {
    /// Host property name the binding reads and writes.
    #[must_use]
    pub fn property_name(self) -> &'static str {
        match self {
            Self::Color => "_Color",
            Self::EmissionColor => "_EmissionColor",
            Self::ShadeColor => "_ShadeColor",
            Self::RimColor => "_RimColor",
            Self::OutlineColor => "_OutlineColor",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MeshWeightBinding {
    pub node: NodeHandle,
    pub index: usize,
    pub weight: f32,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MaterialColorBinding {
    pub material_name: String,
    pub bind_type: MaterialBindType,
    pub target_value: Vec4,
}

impl MaterialColorBinding {
    #[must_use]
    pub fn new(material_name: &str, bind_type: MaterialBindType, target_value: Vec4) -> Self {
        Self {
            material_name: material_name.to_string(),
            bind_type,
            target_value,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MaterialUvBinding {
    pub material_name: String,
    /// `(scale.x, scale.y, offset.x, offset.y)`
    pub scaling_offset: Vec4,
}

impl MaterialUvBinding {
    #[must_use]
    pub fn new(material_name: &str, scaling_offset: Vec4) -> Self {
        Self {
            material_name: material_name.to_string(),
            scaling_offset,
        }
    }
}

/// A named expression preset.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BlendShapeClip {
    pub key: BlendShapeKey,
    pub flags: ClipFlags,

    pub mesh_weight_bindings: Vec<MeshWeightBinding>,
    pub material_color_bindings: Vec<MaterialColorBinding>,
    pub material_uv_bindings: Vec<MaterialUvBinding>,
}

impl BlendShapeClip {
    #[must_use]
    pub fn new(key: impl Into<BlendShapeKey>) -> Self {
        Self {
            key: key.into(),
            flags: ClipFlags::empty(),
            mesh_weight_bindings: Vec::new(),
            material_color_bindings: Vec::new(),
            material_uv_bindings: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_flags(mut self, flags: ClipFlags) -> Self {
        self.flags = flags;
        self
    }

    #[must_use]
    pub fn with_mesh_weight(mut self, node: NodeHandle, index: usize, weight: f32) -> Self {
        self.mesh_weight_bindings.push(MeshWeightBinding {
            node,
            index,
            weight,
        });
        self
    }

    #[must_use]
    pub fn with_color(mut self, binding: MaterialColorBinding) -> Self {
        self.material_color_bindings.push(binding);
        self
    }

    #[must_use]
    pub fn with_uv(mut self, binding: MaterialUvBinding) -> Self {
        self.material_uv_bindings.push(binding);
        self
    }

    #[inline]
    #[must_use]
    pub fn is_binary(&self) -> bool {
        self.flags.contains(ClipFlags::IS_BINARY)
    }

    /// Whether any mesh-weight binding targets `node`.
    #[must_use]
    pub fn references_node(&self, node: NodeHandle) -> bool {
        self.mesh_weight_bindings.iter().any(|b| b.node == node)
    }
}
