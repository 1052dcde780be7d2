use rustc_hash::FxHashMap;

use crate::avatar::{BlendShapeClip, BlendShapeKey, ClipFlags};
use crate::blend_shape::material_merger::MaterialValueBindingMerger;
use crate::blend_shape::morph_merger::MorphWeightMerger;
use crate::model::{MaterialKey, Model};
use crate::settings::MergerSettings;

/// Per-avatar expression front end.
///
/// Holds requested weights per clip, resolves binary clips and ignore groups,
/// then feeds both mergers once per tick:
///
/// ```rust,ignore
/// let mut mixer = ExpressionMixer::new(&model, MergerSettings::default());
/// mixer.set_weight(&BlendShapePreset::Joy.into(), 1.0);
/// mixer.apply(&mut model);
/// ```
///
/// The clip table is copied at construction; rebuild the mixer after editing
/// clips or the scene.
pub struct ExpressionMixer {
    settings: MergerSettings,
    clips: Vec<BlendShapeClip>,
    index: FxHashMap<BlendShapeKey, usize>,
    weights: Vec<f32>,

    materials: MaterialValueBindingMerger<MaterialKey>,
    morphs: MorphWeightMerger,
}

impl ExpressionMixer {
    #[must_use]
    pub fn new(model: &Model, settings: MergerSettings) -> Self {
        let clips: Vec<BlendShapeClip> = model
            .avatar
            .as_ref()
            .map(|a| a.blend_shapes.clone())
            .unwrap_or_default();

        let mut index = FxHashMap::default();
        for (i, clip) in clips.iter().enumerate() {
            if index.insert(clip.key.clone(), i).is_some() {
                log::warn!("Duplicate blend shape clip {:?}, the last one wins", clip.key);
            }
        }

        let materials =
            MaterialValueBindingMerger::new(&clips, model.root(), model, settings.clone());

        Self {
            settings,
            weights: vec![0.0; clips.len()],
            clips,
            index,
            materials,
            morphs: MorphWeightMerger::new(),
        }
    }

    #[must_use]
    pub fn clips(&self) -> &[BlendShapeClip] {
        &self.clips
    }

    /// Sets the requested weight of a clip. Returns `false` for unknown keys.
    pub fn set_weight(&mut self, key: &BlendShapeKey, weight: f32) -> bool {
        let Some(&i) = self.index.get(key) else {
            log::warn!("Unknown blend shape clip {key:?}");
            return false;
        };
        self.weights[i] = weight;
        true
    }

    /// Requested (unresolved) weight.
    #[must_use]
    pub fn weight(&self, key: &BlendShapeKey) -> Option<f32> {
        self.index.get(key).map(|&i| self.weights[i])
    }

    /// Weights after binary snapping and ignore-group suppression, in clip
    /// order.
    #[must_use]
    pub fn resolved_weights(&self) -> Vec<(BlendShapeKey, f32)> {
        let snapped: Vec<f32> = self
            .clips
            .iter()
            .zip(&self.weights)
            .map(|(clip, &w)| {
                if clip.is_binary() {
                    if w > self.settings.binary_threshold { 1.0 } else { 0.0 }
                } else {
                    w
                }
            })
            .collect();

        let suppressors = |flag: ClipFlags, own: usize| {
            self.clips
                .iter()
                .zip(&snapped)
                .enumerate()
                .any(|(i, (c, &w))| i != own && w > 0.0 && c.flags.contains(flag))
        };

        self.clips
            .iter()
            .enumerate()
            .map(|(i, clip)| {
                let suppressed = clip.key.preset().is_some_and(|p| {
                    (p.is_blink() && suppressors(ClipFlags::IGNORE_BLINK, i))
                        || (p.is_look_at() && suppressors(ClipFlags::IGNORE_LOOK_AT, i))
                        || (p.is_mouth() && suppressors(ClipFlags::IGNORE_MOUTH, i))
                });
                let w = if suppressed { 0.0 } else { snapped[i] };
                (clip.key.clone(), w)
            })
            .collect()
    }

    /// Evaluates one tick and writes morph weights and material values.
    pub fn apply(&mut self, model: &mut Model) {
        for (i, (_, weight)) in self.resolved_weights().into_iter().enumerate() {
            let clip = &self.clips[i];
            self.materials.accumulate_value(clip, weight);
            self.morphs.accumulate_value(clip, weight);
        }
        self.materials.apply(model);
        self.morphs.apply(model);
    }

    /// Puts materials and morph weights back to their initial state and
    /// clears requested weights.
    pub fn restore(&mut self, model: &mut Model) {
        self.weights.fill(0.0);
        self.materials.restore_initial_values(model);
        self.morphs.restore_initial_values(model);
    }
}
