use glam::{Affine3A, EulerRot, Mat4, Quat, Vec3};

/// Local TRS of a node.
///
/// Only the local part is stored. World matrices are derived from the
/// hierarchy on demand by [`Model::world_matrix`](crate::model::Model::world_matrix)
/// since graph edits reparent nodes and a cached world matrix would go stale.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Transform {
    #[must_use]
    pub fn new() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }

    #[must_use]
    pub fn from_translation(position: Vec3) -> Self {
        Self {
            position,
            ..Self::new()
        }
    }

    /// Builds a transform by decomposing an affine matrix.
    ///
    /// Shear is lost in the decomposition.
    #[must_use]
    pub fn from_matrix(mat: Affine3A) -> Self {
        let (scale, rotation, position) = mat.to_scale_rotation_translation();
        Self {
            position,
            rotation,
            scale,
        }
    }

    #[inline]
    #[must_use]
    pub fn local_matrix(&self) -> Affine3A {
        Affine3A::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }

    #[inline]
    #[must_use]
    pub fn local_matrix_as_mat4(&self) -> Mat4 {
        Mat4::from(self.local_matrix())
    }

    /// Overwrites position/rotation/scale from a local matrix.
    pub fn apply_local_matrix(&mut self, mat: Affine3A) {
        *self = Self::from_matrix(mat);
    }

    pub fn set_rotation_euler(&mut self, x: f32, y: f32, z: f32) {
        self.rotation = Quat::from_euler(EulerRot::XYZ, x, y, z);
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}
