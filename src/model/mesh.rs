use glam::Vec4;
use rustc_hash::FxHashMap;

use crate::model::{MaterialKey, SkinKey};

/// A draw range of a [`Mesh`] rendered with one material.
#[derive(Debug, Clone, PartialEq)]
pub struct Submesh {
    pub offset: u32,
    pub draw_count: u32,
    pub material: MaterialKey,
}

impl Submesh {
    #[must_use]
    pub fn new(offset: u32, draw_count: u32, material: MaterialKey) -> Self {
        Self {
            offset,
            draw_count,
            material,
        }
    }
}

/// Geometry is held by the codec; only the pieces that point back into the
/// model are kept here.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub submeshes: Vec<Submesh>,
    /// Names of the morph targets, indexed by blend-shape index.
    pub blend_shape_names: Vec<String>,
}

/// A named collection of meshes, independent of any node.
#[derive(Debug, Clone, Default)]
pub struct MeshGroup {
    pub name: String,
    pub meshes: Vec<Mesh>,
    pub skin: Option<SkinKey>,
}

impl MeshGroup {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_mesh(mut self, mesh: Mesh) -> Self {
        self.meshes.push(mesh);
        self
    }

    /// Number of addressable blend-shape indices, the widest mesh's count.
    #[must_use]
    pub fn blend_shape_count(&self) -> usize {
        self.meshes
            .iter()
            .map(|m| m.blend_shape_names.len())
            .max()
            .unwrap_or(0)
    }

    /// Iterates the material of every submesh, in draw order.
    pub fn materials(&self) -> impl Iterator<Item = MaterialKey> + '_ {
        self.meshes
            .iter()
            .flat_map(|m| m.submeshes.iter().map(|s| s.material))
    }
}

/// CPU-side material property bag.
///
/// Values are addressed by host property name (`_Color`, `_MainTex_ST`, ...).
/// Colors and UV scale/offset are both stored as `Vec4`.
#[derive(Debug, Clone, Default)]
pub struct Material {
    pub name: String,
    pub(crate) vectors: FxHashMap<String, Vec4>,
}

impl Material {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            vectors: FxHashMap::default(),
        }
    }

    #[must_use]
    pub fn with_vector(mut self, property: &str, value: Vec4) -> Self {
        self.set_vector(property, value);
        self
    }

    /// Returns the property value, `Vec4::ZERO` if it was never set.
    #[must_use]
    pub fn vector(&self, property: &str) -> Vec4 {
        self.vectors.get(property).copied().unwrap_or(Vec4::ZERO)
    }

    pub fn set_vector(&mut self, property: &str, value: Vec4) {
        if let Some(slot) = self.vectors.get_mut(property) {
            *slot = value;
        } else {
            self.vectors.insert(property.to_string(), value);
        }
    }
}
