// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Draw request description and the reference selection a sink applies.

use super::culling::CullingResults;
use super::material::{Material, ShaderTagId};
use crate::math::Vec3;
use std::sync::Arc;

/// How the drawables selected by a request are ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortingCriteria {
    /// By render queue, then nearest first.
    CommonOpaque,
    /// By render queue, then farthest first, as blending requires.
    CommonTransparent,
}

/// An inclusive range of render queue values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderQueueRange {
    /// Lowest accepted queue value.
    pub lower_bound: u32,
    /// Highest accepted queue value.
    pub upper_bound: u32,
}

impl RenderQueueRange {
    /// Opaque and alpha-tested geometry.
    pub const OPAQUE: Self = Self {
        lower_bound: 0,
        upper_bound: 2500,
    };
    /// Alpha-blended geometry.
    pub const TRANSPARENT: Self = Self {
        lower_bound: 2501,
        upper_bound: 5000,
    };
    /// Every queue.
    pub const ALL: Self = Self {
        lower_bound: 0,
        upper_bound: 5000,
    };

    /// Returns `true` if `queue` lies in the range.
    pub const fn contains(&self, queue: u32) -> bool {
        queue >= self.lower_bound && queue <= self.upper_bound
    }
}

/// Extra per-object data the sink must provide to the shading stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PerObjectData {
    bits: u32,
}

impl PerObjectData {
    /// Nothing beyond the transform.
    pub const NONE: Self = Self { bits: 0 };
    /// The packed light slots affecting each object.
    pub const LIGHT_INDICES: Self = Self { bits: 1 << 0 };

    /// Combines two sets of flags.
    pub const fn union(self, other: Self) -> Self {
        Self {
            bits: self.bits | other.bits,
        }
    }

    /// Checks whether every bit of `other` is set.
    pub const fn contains(&self, other: Self) -> bool {
        (self.bits & other.bits) == other.bits
    }

    /// Checks if no flag is set.
    pub const fn is_empty(&self) -> bool {
        self.bits == 0
    }
}

impl std::ops::BitOr for PerObjectData {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.union(rhs)
    }
}

/// A single draw submission over the visible drawables of one camera.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawRequest {
    /// Debug label, e.g. `"Opaque"`.
    pub label: &'static str,
    /// Pass tags this request draws, in slot order.
    pub pass_tags: Vec<ShaderTagId>,
    /// Drawables whose material exposes any of these tags are never selected.
    pub excluded_tags: Vec<ShaderTagId>,
    /// Ordering of the selected drawables.
    pub sorting: SortingCriteria,
    /// Reference point for distance sorting.
    pub camera_position: Vec3,
    /// Queue filter.
    pub queue_range: RenderQueueRange,
    /// Per-object data to provide.
    pub per_object_data: PerObjectData,
    /// Material replacing each selected drawable's own material.
    pub override_material: Option<Arc<Material>>,
    /// Pass of `override_material` used for every selected drawable.
    pub override_pass_index: usize,
    /// Batch GPU-instanceable draws.
    pub enable_instancing: bool,
    /// Merge small compatible draws.
    pub enable_dynamic_batching: bool,
}

impl DrawRequest {
    /// Selects and orders the drawables this request covers.
    ///
    /// A drawable is selected when its queue lies in `queue_range` and its own
    /// material exposes one of `pass_tags` and none of `excluded_tags`. The
    /// override material, if any, changes what is drawn but not what is
    /// selected. The sort is stable, so ties keep culling order.
    pub fn resolve(&self, results: &CullingResults) -> Vec<usize> {
        let drawables = results.drawables();
        let mut selected: Vec<usize> = drawables
            .iter()
            .enumerate()
            .filter(|(_, d)| self.queue_range.contains(d.render_queue()))
            .filter(|(_, d)| d.material.find_pass(&self.pass_tags).is_some())
            .filter(|(_, d)| d.material.find_pass(&self.excluded_tags).is_none())
            .map(|(i, _)| i)
            .collect();

        let distance = |i: usize| drawables[i].position.distance_squared(self.camera_position);
        selected.sort_by(|&a, &b| {
            let by_queue = drawables[a].render_queue().cmp(&drawables[b].render_queue());
            let by_distance = match self.sorting {
                SortingCriteria::CommonOpaque => distance(a).total_cmp(&distance(b)),
                SortingCriteria::CommonTransparent => distance(b).total_cmp(&distance(a)),
            };
            by_queue.then(by_distance)
        });
        selected
    }
}
