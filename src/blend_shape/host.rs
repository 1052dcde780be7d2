//! Host capabilities consumed by the binding merger.
//!
//! The merger never reaches for a global material registry. Whoever owns the
//! live materials implements these traits and lends them to each call, so
//! ownership and lifetime stay with the caller.
//!
//! [`Model`] implements both, which makes the crate usable on its own.

use std::fmt::Debug;
use std::hash::Hash;

use glam::Vec4;

use crate::model::{MaterialKey, MeshGroup, Model, NodeHandle};

/// Get/set of named vector properties on live materials.
pub trait MaterialAccess {
    /// Opaque handle to one live material.
    type Material: Copy + Eq + Hash + Debug;

    fn get_vector(&self, material: Self::Material, property: &str) -> Vec4;

    fn set_vector(&mut self, material: Self::Material, property: &str, value: Vec4);
}

/// Enumerates the material slots of every renderer below a root.
pub trait RendererEnumerator: MaterialAccess {
    type Root: Copy;

    /// `(material, material name)` for each slot, in traversal order.
    /// The same material may appear several times.
    fn material_slots(&self, root: Self::Root) -> Vec<(Self::Material, String)>;
}

impl MaterialAccess for Model {
    type Material = MaterialKey;

    fn get_vector(&self, material: MaterialKey, property: &str) -> Vec4 {
        self.get_material(material)
            .map_or(Vec4::ZERO, |m| m.vector(property))
    }

    fn set_vector(&mut self, material: MaterialKey, property: &str, value: Vec4) {
        if let Some(m) = self.get_material_mut(material) {
            m.set_vector(property, value);
        }
    }
}

impl RendererEnumerator for Model {
    type Root = NodeHandle;

    fn material_slots(&self, root: NodeHandle) -> Vec<(MaterialKey, String)> {
        self.traverse(root)
            .into_iter()
            .filter_map(|h| self.get_node(h)?.mesh)
            .filter_map(|key| self.get_mesh_group(key))
            .flat_map(MeshGroup::materials)
            .filter_map(|key| self.get_material(key).map(|m| (key, m.name.clone())))
            .collect()
    }
}
