use glam::{Quat, Vec3};
use rustc_hash::FxHashMap;

use crate::model::NodeHandle;

pub trait Interpolatable: Copy {
    fn interpolate_linear(start: Self, end: Self, t: f32) -> Self;
}

impl Interpolatable for f32 {
    fn interpolate_linear(start: Self, end: Self, t: f32) -> Self {
        start + (end - start) * t
    }
}

impl Interpolatable for Vec3 {
    fn interpolate_linear(start: Self, end: Self, t: f32) -> Self {
        start.lerp(end, t)
    }
}

impl Interpolatable for Quat {
    fn interpolate_linear(start: Self, end: Self, t: f32) -> Self {
        start.slerp(end, t)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterpolationMode {
    Linear,
    Step,
}

#[derive(Debug, Clone)]
pub struct KeyframeTrack<T: Interpolatable> {
    pub times: Vec<f32>,
    pub values: Vec<T>,
    pub interpolation: InterpolationMode,
}

impl<T: Interpolatable> KeyframeTrack<T> {
    #[must_use]
    pub fn new(times: Vec<f32>, values: Vec<T>, interpolation: InterpolationMode) -> Self {
        debug_assert_eq!(times.len(), values.len());
        Self {
            times,
            values,
            interpolation,
        }
    }

    #[must_use]
    pub fn duration(&self) -> f32 {
        self.times.last().copied().unwrap_or(0.0)
    }

    /// Samples the track, clamping outside the keyed range.
    ///
    /// Returns `None` for an empty track.
    #[must_use]
    pub fn sample(&self, time: f32) -> Option<T> {
        let first = *self.values.first()?;
        // index of the first key strictly after `time`
        let next = self.times.partition_point(|&t| t <= time);
        if next == 0 {
            return Some(first);
        }
        if next >= self.times.len() {
            return self.values.last().copied();
        }

        let prev = next - 1;
        match self.interpolation {
            InterpolationMode::Step => Some(self.values[prev]),
            InterpolationMode::Linear => {
                let span = self.times[next] - self.times[prev];
                let t = if span > 0.0 {
                    (time - self.times[prev]) / span
                } else {
                    0.0
                };
                Some(T::interpolate_linear(self.values[prev], self.values[next], t))
            }
        }
    }
}

/// Curves driving a single node.
#[derive(Debug, Clone, Default)]
pub struct NodeAnimation {
    pub translation: Option<KeyframeTrack<Vec3>>,
    pub rotation: Option<KeyframeTrack<Quat>>,
    pub scale: Option<KeyframeTrack<Vec3>>,
}

impl NodeAnimation {
    #[must_use]
    pub fn duration(&self) -> f32 {
        let t = self.translation.as_ref().map_or(0.0, KeyframeTrack::duration);
        let r = self.rotation.as_ref().map_or(0.0, KeyframeTrack::duration);
        let s = self.scale.as_ref().map_or(0.0, KeyframeTrack::duration);
        t.max(r).max(s)
    }
}

/// Animation clip keyed by node identity.
///
/// Tracks follow the node handle, not the node name, so replacing a node is
/// a key rewrite.
#[derive(Debug, Clone, Default)]
pub struct Animation {
    pub name: String,
    pub node_map: FxHashMap<NodeHandle, NodeAnimation>,
}

impl Animation {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            node_map: FxHashMap::default(),
        }
    }

    pub fn insert(&mut self, node: NodeHandle, track: NodeAnimation) -> Option<NodeAnimation> {
        self.node_map.insert(node, track)
    }

    #[must_use]
    pub fn get(&self, node: NodeHandle) -> Option<&NodeAnimation> {
        self.node_map.get(&node)
    }

    #[must_use]
    pub fn duration(&self) -> f32 {
        self.node_map
            .values()
            .map(NodeAnimation::duration)
            .fold(0.0_f32, f32::max)
    }
}
