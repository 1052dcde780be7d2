//! Material value binding merger.
//!
//! Blends material colors as
//!
//! ```text
//! baseline + (A.target - baseline) * A.weight + (B.target - baseline) * B.weight + ...
//! ```
//!
//! and UV scale/offset as
//!
//! ```text
//! (1, 1, 0, 0) + (A.st - (1, 1, 0, 0)) * A.weight + ...
//! ```
//!
//! Baselines are snapshotted once, at construction, and never refreshed.
//!
//! # Tick protocol
//!
//! ```rust,ignore
//! // every frame
//! for (clip, weight) in active {
//!     merger.accumulate_value(clip, weight);
//! }
//! merger.apply(&mut host);
//!
//! // leaving preview / tearing down
//! merger.restore_initial_values(&mut host);
//! ```

use glam::Vec4;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::avatar::{BlendShapeClip, MaterialBindType, MaterialColorBinding};
use crate::blend_shape::host::{MaterialAccess, RendererEnumerator};
use crate::settings::MergerSettings;

/// Identity of a UV scale/offset of `1,1` and offset `0,0`.
pub const DEFAULT_UV_SCALE_OFFSET: Vec4 = Vec4::new(1.0, 1.0, 0.0, 0.0);

/// Which property of a material a value is written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum PropertySlot {
    Color(MaterialBindType),
    UvScaleOffset,
}

/// A material targeted by at least one binding, with the baselines of the
/// properties bindings touch.
#[derive(Debug, Clone)]
struct MaterialItem<M> {
    material: M,
    baselines: FxHashMap<PropertySlot, Vec4>,
}

/// Hashable, structurally compared color binding.
///
/// Target components are compared by bit pattern, with `-0.0` folded into
/// `0.0`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ColorBindingKey {
    material_name: String,
    bind_type: MaterialBindType,
    target_bits: [u32; 4],
}

impl ColorBindingKey {
    fn new(binding: &MaterialColorBinding) -> Self {
        Self {
            material_name: binding.material_name.clone(),
            bind_type: binding.bind_type,
            target_bits: binding.target_value.to_array().map(|c| (c + 0.0).to_bits()),
        }
    }

    fn target(&self) -> Vec4 {
        Vec4::from_array(self.target_bits.map(f32::from_bits))
    }
}

/// Accumulates weighted material bindings and writes the net result once per
/// tick.
///
/// Generic over the host's material handle so any engine implementing
/// [`MaterialAccess`] can drive it.
#[derive(Debug, Clone)]
pub struct MaterialValueBindingMerger<M> {
    settings: MergerSettings,

    /// Keyed by material name.
    materials: FxHashMap<String, MaterialItem<M>>,

    // === Per-tick accumulation ===
    color_weights: FxHashMap<ColorBindingKey, f32>,
    uv_values: FxHashMap<String, Vec4>,

    /// Properties written by the previous `apply`.
    written: FxHashSet<(String, PropertySlot)>,
}

impl<M: Copy + Eq + std::hash::Hash + std::fmt::Debug> MaterialValueBindingMerger<M> {
    /// Resolves every material binding of `clips` against the renderers under
    /// `root` and snapshots the baselines.
    ///
    /// Bindings naming a material that is not in the scene are skipped.
    pub fn new<'c, H>(
        clips: impl IntoIterator<Item = &'c BlendShapeClip>,
        root: H::Root,
        host: &H,
        settings: MergerSettings,
    ) -> Self
    where
        H: RendererEnumerator<Material = M>,
    {
        let mut name_map: FxHashMap<String, M> = FxHashMap::default();
        for (material, name) in host.material_slots(root) {
            // first match wins
            name_map.entry(name).or_insert(material);
        }

        let mut materials: FxHashMap<String, MaterialItem<M>> = FxHashMap::default();
        let mut snapshot = |name: &str, slot: PropertySlot| {
            let Some(&material) = name_map.get(name) else {
                log::debug!("Material '{name}' not found in scene, binding skipped");
                return;
            };
            let item = materials
                .entry(name.to_string())
                .or_insert_with(|| MaterialItem {
                    material,
                    baselines: FxHashMap::default(),
                });
            let property = slot_property(slot, &settings);
            item.baselines
                .entry(slot)
                .or_insert_with(|| host.get_vector(material, property));
        };

        for clip in clips {
            for binding in &clip.material_color_bindings {
                snapshot(&binding.material_name, PropertySlot::Color(binding.bind_type));
            }
            for binding in &clip.material_uv_bindings {
                snapshot(&binding.material_name, PropertySlot::UvScaleOffset);
            }
        }

        Self {
            settings,
            materials,
            color_weights: FxHashMap::default(),
            uv_values: FxHashMap::default(),
            written: FxHashSet::default(),
        }
    }

    /// Number of materials with at least one resolved binding.
    #[must_use]
    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    /// Baseline snapshot of a color property, if tracked.
    #[must_use]
    pub fn baseline(&self, material_name: &str, bind_type: MaterialBindType) -> Option<Vec4> {
        self.materials
            .get(material_name)?
            .baselines
            .get(&PropertySlot::Color(bind_type))
            .copied()
    }

    /// Adds `weight` of every material binding in `clip` to this tick.
    pub fn accumulate_value(&mut self, clip: &BlendShapeClip, weight: f32) {
        for binding in &clip.material_color_bindings {
            *self
                .color_weights
                .entry(ColorBindingKey::new(binding))
                .or_insert(0.0) += weight;
        }

        for binding in &clip.material_uv_bindings {
            let acc = self
                .uv_values
                .entry(binding.material_name.clone())
                .or_insert(DEFAULT_UV_SCALE_OFFSET);
            *acc += (binding.scaling_offset - DEFAULT_UV_SCALE_OFFSET) * weight;
        }
    }

    /// Writes the accumulated values to the host and clears the tick.
    ///
    /// Properties written last tick that received nothing this tick go back
    /// to their baseline.
    pub fn apply<H: MaterialAccess<Material = M>>(&mut self, host: &mut H) {
        // Sum of weighted deltas per property
        let mut deltas: FxHashMap<(String, PropertySlot), Vec4> = FxHashMap::default();
        for (key, weight) in self.color_weights.drain() {
            let slot = PropertySlot::Color(key.bind_type);
            let Some(baseline) = self
                .materials
                .get(&key.material_name)
                .and_then(|item| item.baselines.get(&slot))
            else {
                continue;
            };
            *deltas
                .entry((key.material_name.clone(), slot))
                .or_insert(Vec4::ZERO) += (key.target() - *baseline) * weight;
        }

        let mut written = FxHashSet::default();
        for ((name, slot), delta) in deltas {
            if let Some(item) = self.materials.get(&name)
                && let Some(baseline) = item.baselines.get(&slot)
            {
                host.set_vector(item.material, slot_property(slot, &self.settings), *baseline + delta);
                written.insert((name, slot));
            }
        }

        for (name, value) in self.uv_values.drain() {
            if let Some(item) = self.materials.get(&name) {
                host.set_vector(item.material, &self.settings.uv_property, value);
                written.insert((name, PropertySlot::UvScaleOffset));
            }
        }

        for (name, slot) in self.written.difference(&written) {
            if let Some(item) = self.materials.get(name)
                && let Some(baseline) = item.baselines.get(slot)
            {
                host.set_vector(item.material, slot_property(*slot, &self.settings), *baseline);
            }
        }
        self.written = written;
    }

    /// Writes every tracked property back to its baseline.
    pub fn restore_initial_values<H: MaterialAccess<Material = M>>(&mut self, host: &mut H) {
        for item in self.materials.values() {
            for (slot, baseline) in &item.baselines {
                host.set_vector(item.material, slot_property(*slot, &self.settings), *baseline);
            }
        }
        self.color_weights.clear();
        self.uv_values.clear();
        self.written.clear();
    }
}

fn slot_property(slot: PropertySlot, settings: &MergerSettings) -> &str {
    match slot {
        PropertySlot::Color(bind_type) => bind_type.property_name(),
        PropertySlot::UvScaleOffset => &settings.uv_property,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_key_folds_negative_zero() {
        let a = MaterialColorBinding::new("Face", MaterialBindType::Color, Vec4::new(-0.0, 1.0, 0.0, 1.0));
        let b = MaterialColorBinding::new("Face", MaterialBindType::Color, Vec4::new(0.0, 1.0, 0.0, 1.0));
        assert_eq!(ColorBindingKey::new(&a), ColorBindingKey::new(&b));
    }

    #[test]
    fn color_key_distinguishes_bind_type() {
        let a = MaterialColorBinding::new("Face", MaterialBindType::Color, Vec4::ONE);
        let b = MaterialColorBinding::new("Face", MaterialBindType::RimColor, Vec4::ONE);
        assert_ne!(ColorBindingKey::new(&a), ColorBindingKey::new(&b));
    }

    #[test]
    fn color_key_round_trips_target() {
        let target = Vec4::new(0.25, 0.5, 0.75, 1.0);
        let key = ColorBindingKey::new(&MaterialColorBinding::new("Body", MaterialBindType::ShadeColor, target));
        assert_eq!(key.target(), target);
    }
}
