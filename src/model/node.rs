use smallvec::SmallVec;

use crate::model::transform::Transform;
use crate::model::{MeshGroupKey, NodeHandle, SkinKey};

/// A transform in the avatar hierarchy.
///
/// # Hierarchy
///
/// - `parent`: non-owning handle to the parent (`None` for the root and for
///   nodes that are not attached to the graph)
/// - `children`: ordered child handles; membership is owned, reparenting
///   moves a handle from one list to another
///
/// Both sides are kept in sync by [`Model`](crate::model::Model) and
/// [`ModelModifier`](crate::modifier::ModelModifier); they are read-only here.
///
/// Mesh groups and skins are referenced, never owned: they live in the
/// model's tables.
#[derive(Debug, Clone, Default)]
pub struct Node {
    pub name: String,

    // === Hierarchy ===
    pub(crate) parent: Option<NodeHandle>,
    pub(crate) children: Vec<NodeHandle>,

    pub transform: Transform,

    // === Components ===
    pub mesh: Option<MeshGroupKey>,
    pub skin: Option<SkinKey>,

    /// Morph target weights written by the expression mixer, indexed by
    /// blend-shape index.
    pub morph_weights: SmallVec<[f32; 8]>,
}

impl Node {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    #[must_use]
    pub fn with_mesh(mut self, mesh: MeshGroupKey) -> Self {
        self.mesh = Some(mesh);
        self
    }

    #[must_use]
    pub fn with_skin(mut self, skin: SkinKey) -> Self {
        self.skin = Some(skin);
        self
    }

    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<NodeHandle> {
        self.parent
    }

    #[inline]
    #[must_use]
    pub fn children(&self) -> &[NodeHandle] {
        &self.children
    }

    /// Returns the morph weight at `index`, 0 when never written.
    #[must_use]
    pub fn morph_weight(&self, index: usize) -> f32 {
        self.morph_weights.get(index).copied().unwrap_or(0.0)
    }

    pub(crate) fn set_morph_weight(&mut self, index: usize, weight: f32) {
        if self.morph_weights.len() <= index {
            self.morph_weights.resize(index + 1, 0.0);
        }
        self.morph_weights[index] = weight;
    }
}
