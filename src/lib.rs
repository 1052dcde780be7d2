#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod avatar;
pub mod blend_shape;
pub mod errors;
pub mod model;
pub mod modifier;
pub mod settings;

pub use avatar::{
    AvatarExtension, BlendShapeClip, BlendShapeKey, BlendShapePreset, ClipFlags,
    FirstPersonMeshType, MaterialBindType, MaterialColorBinding, MaterialUvBinding,
};
pub use blend_shape::{ExpressionMixer, MaterialValueBindingMerger, MorphWeightMerger};
pub use errors::{GraphError, Result};
pub use model::{Material, MaterialKey, MeshGroup, MeshGroupKey, Model, Node, NodeHandle, Skin, SkinKey};
pub use modifier::ModelModifier;
pub use settings::MergerSettings;
