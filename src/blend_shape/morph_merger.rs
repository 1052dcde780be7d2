use rustc_hash::{FxHashMap, FxHashSet};

use crate::avatar::BlendShapeClip;
use crate::model::{Model, NodeHandle};

/// Sums mesh-weight bindings per (node, blend-shape index) and writes them to
/// node morph weights once per tick.
///
/// Targets on nodes outside the graph, nodes without a mesh group, or indices
/// past the mesh group's blend-shape count are skipped.
#[derive(Debug, Clone, Default)]
pub struct MorphWeightMerger {
    weights: FxHashMap<(NodeHandle, usize), f32>,
    written: FxHashSet<(NodeHandle, usize)>,
}

impl MorphWeightMerger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn accumulate_value(&mut self, clip: &BlendShapeClip, weight: f32) {
        for binding in &clip.mesh_weight_bindings {
            *self
                .weights
                .entry((binding.node, binding.index))
                .or_insert(0.0) += binding.weight * weight;
        }
    }

    /// Writes this tick's sums. Targets written last tick but not this one are
    /// reset to 0.
    pub fn apply(&mut self, model: &mut Model) {
        let mut written = FxHashSet::default();
        for ((node, index), weight) in self.weights.drain() {
            if !is_addressable(model, node, index) {
                log::debug!("Morph target {index} on node {node:?} not found, binding skipped");
                continue;
            }
            if let Some(n) = model.get_node_mut(node) {
                n.set_morph_weight(index, weight);
                written.insert((node, index));
            }
        }
        for &(node, index) in self.written.difference(&written) {
            reset(model, node, index);
        }
        self.written = written;
    }

    /// Zeroes every morph weight written so far.
    pub fn restore_initial_values(&mut self, model: &mut Model) {
        for &(node, index) in &self.written {
            reset(model, node, index);
        }
        self.weights.clear();
        self.written.clear();
    }
}

fn is_addressable(model: &Model, node: NodeHandle, index: usize) -> bool {
    model.contains_node(node)
        && model
            .get_node(node)
            .and_then(|n| n.mesh)
            .and_then(|key| model.get_mesh_group(key))
            .is_some_and(|group| index < group.blend_shape_count())
}

fn reset(model: &mut Model, node: NodeHandle, index: usize) {
    if !model.contains_node(node) {
        return;
    }
    if let Some(n) = model.get_node_mut(node) {
        n.set_morph_weight(index, 0.0);
    }
}
