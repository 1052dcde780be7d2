//! Blend-shape evaluation.
//!
//! - [`MaterialValueBindingMerger`]: per-tick material color / UV accumulator
//! - [`MorphWeightMerger`]: per-tick mesh morph weight accumulator
//! - [`ExpressionMixer`]: clip weights in, both mergers driven
//! - [`host`]: capabilities the merger borrows from the material owner

pub mod host;
pub mod material_merger;
pub mod mixer;
pub mod morph_merger;

pub use host::{MaterialAccess, RendererEnumerator};
pub use material_merger::{DEFAULT_UV_SCALE_OFFSET, MaterialValueBindingMerger};
pub use mixer::ExpressionMixer;
pub use morph_merger::MorphWeightMerger;
