//! Model Graph Tests
//!
//! Tests for:
//! - Node allocation vs. membership
//! - World matrices, traversal, descendant queries
//! - Consistency check
//! - Transform decomposition

use glam::{Affine3A, Quat, Vec3, Vec4};

use myth_avatar::model::{Material, Mesh, MeshGroup, Model, Node, Transform};

const EPSILON: f32 = 1e-5;

// ============================================================================
// Membership
// ============================================================================

#[test]
fn new_model_has_registered_root() {
    let model = Model::new();
    assert!(model.contains_node(model.root()));
    assert_eq!(model.nodes.len(), 1);
    assert_eq!(model.parent_of(model.root()), None);
    assert!(model.is_consistent());
}

#[test]
fn created_node_is_not_a_member() {
    let mut model = Model::new();
    let handle = model.create_node(Node::new("loose"));

    assert!(model.get_node(handle).is_some());
    assert!(model.nodes.exists(handle));
    assert!(!model.contains_node(handle));
    assert!(model.is_consistent());
}

#[test]
fn add_to_parent_falls_back_to_root() {
    let mut model = Model::new();
    let loose = model.create_node(Node::new("loose"));
    let child = model.add_to_parent(Node::new("child"), loose);

    assert_eq!(model.parent_of(child), Some(model.root()));
    assert!(model.is_consistent());
}

#[test]
fn find_node_by_name() {
    let mut model = Model::new();
    let root = model.root();
    let hips = model.add_to_parent(Node::new("hips"), root);
    model.create_node(Node::new("ghost"));

    assert_eq!(model.find_node("hips"), Some(hips));
    assert_eq!(model.find_node("ghost"), None);
}

// ============================================================================
// Hierarchy queries
// ============================================================================

#[test]
fn world_matrix_composes_parents() {
    let mut model = Model::new();
    let root = model.root();
    let mut parent_t = Transform::from_translation(Vec3::new(1.0, 0.0, 0.0));
    parent_t.scale = Vec3::splat(2.0);
    let parent = model.add_to_parent(Node::new("parent").with_transform(parent_t), root);
    let child = model.add_to_parent(
        Node::new("child").with_transform(Transform::from_translation(Vec3::new(0.0, 1.0, 0.0))),
        parent,
    );

    let world = model.world_matrix(child);
    assert!(Vec3::from(world.translation).abs_diff_eq(Vec3::new(1.0, 2.0, 0.0), EPSILON));
}

#[test]
fn traverse_is_pre_order() {
    let mut model = Model::new();
    let root = model.root();
    let a = model.add_to_parent(Node::new("a"), root);
    let a1 = model.add_to_parent(Node::new("a1"), a);
    let b = model.add_to_parent(Node::new("b"), root);
    let a2 = model.add_to_parent(Node::new("a2"), a);

    assert_eq!(model.traverse(root), vec![root, a, a1, a2, b]);
    assert_eq!(model.traverse(a), vec![a, a1, a2]);
}

#[test]
fn descendant_check_is_inclusive() {
    let mut model = Model::new();
    let root = model.root();
    let a = model.add_to_parent(Node::new("a"), root);
    let b = model.add_to_parent(Node::new("b"), a);
    let c = model.add_to_parent(Node::new("c"), root);

    assert!(model.is_descendant_of(b, a));
    assert!(model.is_descendant_of(a, a));
    assert!(model.is_descendant_of(c, root));
    assert!(!model.is_descendant_of(c, a));
    assert!(!model.is_descendant_of(a, b));
}

#[test]
fn consistency_detects_unreachable_member() {
    let mut model = Model::new();
    let root = model.root();
    let a = model.add_to_parent(Node::new("a"), root);
    assert!(model.is_consistent());

    // a stays a member but the root forgets it
    *model.get_node_mut(root).unwrap() = Node::new("__root__");
    assert_eq!(model.parent_of(a), Some(root));
    assert!(!model.is_consistent());
}

// ============================================================================
// Transform & material
// ============================================================================

#[test]
fn transform_from_matrix_decomposes() {
    let rotation = Quat::from_rotation_z(0.7);
    let mat = Affine3A::from_scale_rotation_translation(
        Vec3::new(1.0, 2.0, 3.0),
        rotation,
        Vec3::new(-1.0, 0.5, 4.0),
    );

    let t = Transform::from_matrix(mat);

    assert!(t.position.abs_diff_eq(Vec3::new(-1.0, 0.5, 4.0), EPSILON));
    assert!(t.scale.abs_diff_eq(Vec3::new(1.0, 2.0, 3.0), 1e-4));
    assert!(t.rotation.abs_diff_eq(rotation, 1e-4));
    assert!(t.local_matrix().abs_diff_eq(mat, 1e-4));
}

#[test]
fn material_vector_defaults_to_zero() {
    let mut material = Material::new("Face").with_vector("_Color", Vec4::ONE);

    assert_eq!(material.vector("_Color"), Vec4::ONE);
    assert_eq!(material.vector("_ShadeColor"), Vec4::ZERO);

    material.set_vector("_Color", Vec4::splat(0.5));
    assert_eq!(material.vector("_Color"), Vec4::splat(0.5));
}

#[test]
fn blend_shape_count_is_widest_mesh() {
    let group = MeshGroup::new("Face")
        .with_mesh(Mesh {
            submeshes: Vec::new(),
            blend_shape_names: vec!["a".into()],
        })
        .with_mesh(Mesh {
            submeshes: Vec::new(),
            blend_shape_names: vec!["a".into(), "i".into(), "u".into()],
        });

    assert_eq!(group.blend_shape_count(), 3);
    assert_eq!(MeshGroup::new("Empty").blend_shape_count(), 0);
}
