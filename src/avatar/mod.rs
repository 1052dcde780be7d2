//! Avatar extension block.
//!
//! Holds the humanoid-specific data that points into the model graph:
//! - blend-shape clips (expressions)
//! - first-person mesh annotations

pub mod clip;
pub mod first_person;

pub use clip::{
    BlendShapeClip, BlendShapeKey, BlendShapePreset, ClipFlags, MaterialBindType,
    MaterialColorBinding, MaterialUvBinding, MeshWeightBinding,
};
pub use first_person::{
    FirstPersonAnnotation, FirstPersonMeshType, RenderVisibility, classify_first_person,
};

use crate::errors::NodeReference;
use crate::model::NodeHandle;

#[derive(Debug, Clone, Default)]
pub struct AvatarExtension {
    pub blend_shapes: Vec<BlendShapeClip>,
    pub first_person: Vec<FirstPersonAnnotation>,
}

impl AvatarExtension {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn clip(&self, key: &BlendShapeKey) -> Option<&BlendShapeClip> {
        self.blend_shapes.iter().find(|c| &c.key == key)
    }

    /// Reports the first table that still refers to `node`.
    #[must_use]
    pub fn find_reference(&self, node: NodeHandle) -> Option<NodeReference> {
        if self.blend_shapes.iter().any(|c| c.references_node(node)) {
            return Some(NodeReference::BlendShape);
        }
        if self.first_person.iter().any(|a| a.node == node) {
            return Some(NodeReference::FirstPerson);
        }
        None
    }

    /// Retargets mesh-weight bindings and first-person annotations from
    /// `src` to `dst`.
    ///
    /// Annotations on `src` are dropped; `dst` gets an `Auto` annotation if it
    /// has none afterwards.
    pub(crate) fn replace_node(&mut self, src: NodeHandle, dst: NodeHandle) {
        for binding in self
            .blend_shapes
            .iter_mut()
            .flat_map(|c| c.mesh_weight_bindings.iter_mut())
        {
            if binding.node == src {
                binding.node = dst;
            }
        }

        self.first_person.retain(|a| a.node != src);
        if !self.first_person.iter().any(|a| a.node == dst) {
            self.first_person
                .push(FirstPersonAnnotation::new(dst, FirstPersonMeshType::Auto));
        }
    }
}
