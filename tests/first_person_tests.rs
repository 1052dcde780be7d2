//! First-Person Classification Tests
//!
//! Tests for:
//! - Explicit mesh types
//! - `Auto` resolution for skinned and static renderers
//! - Interaction with graph edits

use glam::Affine3A;

use myth_avatar::avatar::{
    AvatarExtension, FirstPersonAnnotation, FirstPersonMeshType, RenderVisibility,
    classify_first_person,
};
use myth_avatar::model::{MeshGroup, Model, Node, NodeHandle, Skin};
use myth_avatar::modifier::ModelModifier;

struct Rig {
    model: Model,
    head: NodeHandle,
    hair: NodeHandle,
    body: NodeHandle,
    shoes: NodeHandle,
    glasses: NodeHandle,
}

/// root
/// ├── hips
/// │   └── head
/// │       └── hair        static mesh
/// ├── body                skinned to [hips, head]
/// ├── shoes               skinned to [hips], skin on the node itself
/// └── glasses             static mesh
fn build_rig() -> Rig {
    let mut model = Model::new();
    let root = model.root();
    let hips = model.add_to_parent(Node::new("hips"), root);
    let head = model.add_to_parent(Node::new("head"), hips);

    let body_skin = model.add_skin(Skin::new(
        "body",
        vec![hips, head],
        vec![Affine3A::IDENTITY; 2],
    ));
    let feet_skin = model.add_skin(Skin::new("feet", vec![hips], vec![Affine3A::IDENTITY]));

    let hair_mesh = model.add_mesh_group(MeshGroup::new("Hair"));
    let mut body_group = MeshGroup::new("Body");
    body_group.skin = Some(body_skin);
    let body_mesh = model.add_mesh_group(body_group);
    let shoes_mesh = model.add_mesh_group(MeshGroup::new("Shoes"));
    let glasses_mesh = model.add_mesh_group(MeshGroup::new("Glasses"));

    let hair = model.add_to_parent(Node::new("hair").with_mesh(hair_mesh), head);
    let body = model.add_to_parent(Node::new("body").with_mesh(body_mesh), root);
    let shoes = model.add_to_parent(
        Node::new("shoes").with_mesh(shoes_mesh).with_skin(feet_skin),
        root,
    );
    let glasses = model.add_to_parent(Node::new("glasses").with_mesh(glasses_mesh), root);

    let mut avatar = AvatarExtension::new();
    for node in [hair, body, shoes, glasses] {
        avatar
            .first_person
            .push(FirstPersonAnnotation::new(node, FirstPersonMeshType::Auto));
    }
    model.avatar = Some(avatar);

    Rig {
        model,
        head,
        hair,
        body,
        shoes,
        glasses,
    }
}

fn visibility_of(model: &Model, head: NodeHandle, node: NodeHandle) -> Option<RenderVisibility> {
    classify_first_person(model, head)
        .into_iter()
        .find_map(|(n, v)| (n == node).then_some(v))
}

// ============================================================================
// Auto
// ============================================================================

#[test]
fn auto_static_mesh_under_head_is_third_person_only() {
    let rig = build_rig();
    assert_eq!(
        visibility_of(&rig.model, rig.head, rig.hair),
        Some(RenderVisibility::ThirdPersonOnly)
    );
}

#[test]
fn auto_static_mesh_elsewhere_is_visible_to_both() {
    let rig = build_rig();
    assert_eq!(
        visibility_of(&rig.model, rig.head, rig.glasses),
        Some(RenderVisibility::Both)
    );
}

#[test]
fn auto_skinned_mesh_with_head_joints_needs_headless_copy() {
    let rig = build_rig();
    assert_eq!(
        visibility_of(&rig.model, rig.head, rig.body),
        Some(RenderVisibility::NeedsHeadlessCopy)
    );
}

#[test]
fn auto_skinned_mesh_without_head_joints_is_visible_to_both() {
    let rig = build_rig();
    assert_eq!(
        visibility_of(&rig.model, rig.head, rig.shoes),
        Some(RenderVisibility::Both)
    );
}

// ============================================================================
// Explicit types
// ============================================================================

#[test]
fn explicit_types_are_kept() {
    let mut rig = build_rig();
    let avatar = rig.model.avatar.as_mut().unwrap();
    avatar.first_person = vec![
        FirstPersonAnnotation::new(rig.hair, FirstPersonMeshType::Both),
        FirstPersonAnnotation::new(rig.body, FirstPersonMeshType::FirstPersonOnly),
        FirstPersonAnnotation::new(rig.glasses, FirstPersonMeshType::ThirdPersonOnly),
    ];

    let result = classify_first_person(&rig.model, rig.head);

    assert_eq!(
        result,
        vec![
            (rig.hair, RenderVisibility::Both),
            (rig.body, RenderVisibility::FirstPersonOnly),
            (rig.glasses, RenderVisibility::ThirdPersonOnly),
        ]
    );
}

#[test]
fn model_without_avatar_has_nothing_to_classify() {
    let mut rig = build_rig();
    rig.model.avatar = None;
    assert!(classify_first_person(&rig.model, rig.head).is_empty());
}

// ============================================================================
// After graph edits
// ============================================================================

#[test]
fn unregistered_nodes_are_skipped() {
    let mut rig = build_rig();
    // drop the annotation so the node can be removed, then put it back
    let avatar = rig.model.avatar.as_mut().unwrap();
    avatar.first_person.retain(|a| a.node != rig.glasses);
    ModelModifier::new(&mut rig.model)
        .remove_node(rig.glasses)
        .unwrap();
    rig.model
        .avatar
        .as_mut()
        .unwrap()
        .first_person
        .push(FirstPersonAnnotation::new(rig.glasses, FirstPersonMeshType::Both));

    let result = classify_first_person(&rig.model, rig.head);

    assert_eq!(result.len(), 3);
    assert!(result.iter().all(|(n, _)| *n != rig.glasses));
}

#[test]
fn replaced_node_is_classified_as_auto() {
    let mut rig = build_rig();
    let new_hair = rig.model.create_node(Node::new("hair.new"));

    ModelModifier::new(&mut rig.model)
        .replace_node(rig.hair, new_hair)
        .unwrap();

    assert_eq!(visibility_of(&rig.model, rig.head, rig.hair), None);
    assert_eq!(
        visibility_of(&rig.model, rig.head, new_hair),
        Some(RenderVisibility::ThirdPersonOnly)
    );
}
