//! Builds a tiny avatar, swaps its head bone for a new node, then drives an
//! expression for a few ticks.
//!
//! Run with `RUST_LOG=debug` to see the graph edits.

use glam::{Affine3A, Vec3, Vec4};

use myth_avatar::avatar::{
    AvatarExtension, BlendShapeClip, BlendShapePreset, FirstPersonAnnotation, FirstPersonMeshType,
    MaterialBindType, MaterialColorBinding, classify_first_person,
};
use myth_avatar::blend_shape::ExpressionMixer;
use myth_avatar::model::{Material, Mesh, MeshGroup, Model, Node, Skin, Submesh, Transform};
use myth_avatar::modifier::ModelModifier;
use myth_avatar::settings::MergerSettings;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    // === 1. Skeleton ===
    let mut model = Model::new();
    let root = model.root();
    let hips = model.add_to_parent(
        Node::new("hips").with_transform(Transform::from_translation(Vec3::new(0.0, 1.0, 0.0))),
        root,
    );
    let head = model.add_to_parent(
        Node::new("head").with_transform(Transform::from_translation(Vec3::new(0.0, 0.6, 0.0))),
        hips,
    );
    let skin = model.add_skin(Skin::new(
        "Armature",
        vec![hips, head],
        vec![
            Affine3A::from_translation(Vec3::new(0.0, -1.0, 0.0)),
            Affine3A::from_translation(Vec3::new(0.0, -1.6, 0.0)),
        ],
    ));

    // === 2. Body mesh ===
    let face_material = model.add_material(Material::new("Face").with_vector("_Color", Vec4::ONE));
    let mut body_group = MeshGroup::new("Body").with_mesh(Mesh {
        submeshes: vec![Submesh::new(0, 1200, face_material)],
        blend_shape_names: vec!["blink".to_string()],
    });
    body_group.skin = Some(skin);
    let body_mesh = model.add_mesh_group(body_group);
    let body = model.add_to_parent(Node::new("body").with_mesh(body_mesh), root);

    // === 3. Avatar extension ===
    let mut avatar = AvatarExtension::new();
    avatar.blend_shapes.push(
        BlendShapeClip::new(BlendShapePreset::Angry)
            .with_mesh_weight(body, 0, 0.3)
            .with_color(MaterialColorBinding::new(
                "Face",
                MaterialBindType::Color,
                Vec4::new(1.0, 0.2, 0.2, 1.0),
            )),
    );
    avatar
        .first_person
        .push(FirstPersonAnnotation::new(body, FirstPersonMeshType::Auto));
    model.avatar = Some(avatar);

    // === 4. Swap the head bone ===
    let new_head = model.create_node(
        Node::new("head.retargeted")
            .with_transform(Transform::from_translation(Vec3::new(0.0, 1.65, 0.0))),
    );
    ModelModifier::new(&mut model).replace_node(head, new_head)?;

    println!("skin joints: {:?}", model.skins[skin].joints);
    for (node, visibility) in classify_first_person(&model, new_head) {
        let name = model.get_node(node).map_or("?", |n| n.name.as_str());
        println!("{name}: {visibility:?}");
    }

    // === 5. Drive an expression ===
    let mut mixer = ExpressionMixer::new(&model, MergerSettings::default());
    for weight in [0.0, 0.5, 1.0] {
        mixer.set_weight(&BlendShapePreset::Angry.into(), weight);
        mixer.apply(&mut model);
        let color = model
            .get_material(face_material)
            .map_or(Vec4::ZERO, |m| m.vector("_Color"));
        println!("angry {weight:.1}: color {color}");
    }
    mixer.restore(&mut model);

    Ok(())
}
