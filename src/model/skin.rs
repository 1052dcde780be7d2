use glam::Affine3A;

use crate::model::NodeHandle;

/// Joint list plus inverse bind matrices.
///
/// `joints[i]` pairs with `inverse_bind_matrices[i]`. The pairing belongs to
/// the slot, so rewriting which node sits in a slot keeps its matrix.
#[derive(Debug, Clone)]
pub struct Skin {
    pub name: String,

    pub joints: Vec<NodeHandle>,
    pub inverse_bind_matrices: Vec<Affine3A>,

    /// Skeleton root, usually the hips or an armature node.
    pub root: Option<NodeHandle>,
}

impl Skin {
    #[must_use]
    pub fn new(name: &str, joints: Vec<NodeHandle>, inverse_bind_matrices: Vec<Affine3A>) -> Self {
        debug_assert_eq!(joints.len(), inverse_bind_matrices.len());
        Self {
            name: name.to_string(),
            joints,
            inverse_bind_matrices,
            root: None,
        }
    }

    #[must_use]
    pub fn with_root(mut self, root: NodeHandle) -> Self {
        self.root = Some(root);
        self
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, node: NodeHandle) -> bool {
        self.root == Some(node) || self.joints.contains(&node)
    }

    /// Points every slot that refers to `src` at `dst`.
    ///
    /// Returns the number of joint slots rewritten.
    pub fn replace(&mut self, src: NodeHandle, dst: NodeHandle) -> usize {
        let mut count = 0;
        for joint in &mut self.joints {
            if *joint == src {
                *joint = dst;
                count += 1;
            }
        }
        if self.root == Some(src) {
            self.root = Some(dst);
        }
        count
    }
}
