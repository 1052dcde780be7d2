use crate::model::{Model, NodeHandle};

/// How an annotated renderer behaves for first-person cameras.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FirstPersonMeshType {
    /// Decided from the renderer's position relative to the head.
    #[default]
    Auto,
    Both,
    ThirdPersonOnly,
    FirstPersonOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FirstPersonAnnotation {
    pub node: NodeHandle,
    pub mesh_type: FirstPersonMeshType,
}

impl FirstPersonAnnotation {
    #[must_use]
    pub fn new(node: NodeHandle, mesh_type: FirstPersonMeshType) -> Self {
        Self { node, mesh_type }
    }
}

/// Resolved visibility of one annotated renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderVisibility {
    Both,
    FirstPersonOnly,
    ThirdPersonOnly,
    /// Skinned renderer influenced by head joints: the renderer itself stays
    /// third-person only and the host must build a copy with the head
    /// triangles erased for the first-person camera.
    NeedsHeadlessCopy,
}

/// Resolves every first-person annotation of `model` against `head`.
///
/// Annotations whose node is no longer registered are skipped.
#[must_use]
pub fn classify_first_person(model: &Model, head: NodeHandle) -> Vec<(NodeHandle, RenderVisibility)> {
    let Some(avatar) = model.avatar.as_ref() else {
        return Vec::new();
    };

    avatar
        .first_person
        .iter()
        .filter(|a| model.contains_node(a.node))
        .map(|a| {
            let visibility = match a.mesh_type {
                FirstPersonMeshType::Both => RenderVisibility::Both,
                FirstPersonMeshType::FirstPersonOnly => RenderVisibility::FirstPersonOnly,
                FirstPersonMeshType::ThirdPersonOnly => RenderVisibility::ThirdPersonOnly,
                FirstPersonMeshType::Auto => classify_auto(model, a.node, head),
            };
            (a.node, visibility)
        })
        .collect()
}

fn classify_auto(model: &Model, node: NodeHandle, head: NodeHandle) -> RenderVisibility {
    let skin = model
        .get_node(node)
        .and_then(|n| n.skin.or_else(|| n.mesh.and_then(|m| model.get_mesh_group(m)?.skin)))
        .and_then(|key| model.skins.get(key));

    match skin {
        Some(skin) => {
            if skin.joints.iter().any(|&j| model.is_descendant_of(j, head)) {
                RenderVisibility::NeedsHeadlessCopy
            } else {
                RenderVisibility::Both
            }
        }
        None => {
            if model.is_descendant_of(node, head) {
                RenderVisibility::ThirdPersonOnly
            } else {
                RenderVisibility::Both
            }
        }
    }
}
