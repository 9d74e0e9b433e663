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

//! Visibility data exchanged with the culling service.
//!
//! [`CullingResults`] is owned by the orchestrator and refilled for every
//! camera, so its vectors keep their capacity across frames.

use super::camera::CameraId;
use super::material::Material;
use crate::math::Vec3;
use crate::renderer::error::LightIndexMapError;
use crate::renderer::light::VisibleLight;
use std::sync::Arc;

/// Marks a visible light that has no slot in the light uniform arrays.
pub const UNASSIGNED_LIGHT_INDEX: i32 = -1;

/// What a camera hands to the culling service.
#[derive(Debug, Clone, PartialEq)]
pub struct CullingParameters {
    /// The camera being culled.
    pub camera_id: CameraId,
    /// World-space camera position.
    pub camera_position: Vec3,
    /// Whether light intensity is applied in linear space.
    pub lights_use_linear_intensity: bool,
}

/// Identifies a drawable across frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DrawableId(pub u64);

/// A renderable object that survived culling.
#[derive(Debug, Clone, PartialEq)]
pub struct Drawable {
    /// Stable identifier.
    pub id: DrawableId,
    /// The material it is drawn with.
    pub material: Arc<Material>,
    /// World-space position used for distance sorting.
    pub position: Vec3,
    /// Indices into the visible light list of the lights touching this object.
    pub light_indices: Vec<usize>,
}

impl Drawable {
    /// The render queue of the drawable's material.
    pub fn render_queue(&self) -> u32 {
        self.material.render_queue
    }
}

/// The visible drawables and lights for one camera.
#[derive(Debug, Default)]
pub struct CullingResults {
    drawables: Vec<Drawable>,
    visible_lights: Vec<VisibleLight>,
    light_index_map: Vec<i32>,
}

impl CullingResults {
    /// Creates empty results.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empties the results, keeping allocations.
    pub fn clear(&mut self) {
        self.drawables.clear();
        self.visible_lights.clear();
        self.light_index_map.clear();
    }

    /// Appends a visible drawable.
    pub fn push_drawable(&mut self, drawable: Drawable) {
        self.drawables.push(drawable);
    }

    /// Appends a visible light. Its light index map entry starts as its own index.
    pub fn push_visible_light(&mut self, light: VisibleLight) {
        self.light_index_map.push(self.visible_lights.len() as i32);
        self.visible_lights.push(light);
    }

    /// The visible drawables, in culling order.
    pub fn drawables(&self) -> &[Drawable] {
        &self.drawables
    }

    /// The visible lights, in culling order.
    pub fn visible_lights(&self) -> &[VisibleLight] {
        &self.visible_lights
    }

    /// Maps each visible light index to its uniform slot, or
    /// [`UNASSIGNED_LIGHT_INDEX`].
    pub fn light_index_map(&self) -> &[i32] {
        &self.light_index_map
    }

    /// Replaces the light index map. It must hold one entry per visible light.
    pub fn set_light_index_map(&mut self, map: Vec<i32>) -> Result<(), LightIndexMapError> {
        if map.len() != self.visible_lights.len() {
            return Err(LightIndexMapError::LengthMismatch {
                expected: self.visible_lights.len(),
                found: map.len(),
            });
        }
        self.light_index_map = map;
        Ok(())
    }

    /// Maps every visible light from `start` on to [`UNASSIGNED_LIGHT_INDEX`],
    /// in place. Returns how many entries were remapped.
    pub fn unassign_lights_from(&mut self, start: usize) -> usize {
        let tail = self.light_index_map.iter_mut().skip(start);
        let mut remapped = 0;
        for entry in tail {
            *entry = UNASSIGNED_LIGHT_INDEX;
            remapped += 1;
        }
        remapped
    }

    /// The uniform slots of the lights affecting drawable `index`.
    ///
    /// Lights mapped to [`UNASSIGNED_LIGHT_INDEX`] are left out, so the
    /// result never references a slot that was not written.
    pub fn object_light_indices(&self, index: usize) -> impl Iterator<Item = usize> + '_ {
        self.drawables
            .get(index)
            .into_iter()
            .flat_map(|d| d.light_indices.iter())
            .filter_map(|&light| self.light_index_map.get(light).copied())
            .filter(|&slot| slot >= 0)
            .map(|slot| slot as usize)
    }
}
