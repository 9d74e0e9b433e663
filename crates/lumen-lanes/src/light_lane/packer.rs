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

//! Packs the visible lights of a camera into fixed-capacity uniform arrays.

use super::encoder::{encode_light, EncodedLight, NO_ATTENUATION};
use lumen_core::math::Vec4;
use lumen_core::renderer::api::CullingResults;

/// Four parallel arrays of `capacity` vectors, one slot per light.
///
/// Slot `i` of every array describes the same light. The arrays are allocated
/// once and rewritten in place.
#[derive(Debug, Clone, PartialEq)]
pub struct LightUniformBuffer {
    colors: Vec<Vec4>,
    directions_or_positions: Vec<Vec4>,
    attenuations: Vec<Vec4>,
    spot_directions: Vec<Vec4>,
    packed: usize,
}

impl LightUniformBuffer {
    /// Allocates a buffer of `capacity` default slots.
    pub fn new(capacity: usize) -> Self {
        Self {
            colors: vec![Vec4::ZERO; capacity],
            directions_or_positions: vec![Vec4::ZERO; capacity],
            attenuations: vec![NO_ATTENUATION; capacity],
            spot_directions: vec![Vec4::ZERO; capacity],
            packed: 0,
        }
    }

    /// Number of slots in each array.
    pub fn capacity(&self) -> usize {
        self.colors.len()
    }

    /// Number of slots written by the last pack.
    pub fn packed_count(&self) -> usize {
        self.packed
    }

    /// The color array.
    pub fn colors(&self) -> &[Vec4] {
        &self.colors
    }

    /// The direction-or-position array.
    pub fn directions_or_positions(&self) -> &[Vec4] {
        &self.directions_or_positions
    }

    /// The attenuation array.
    pub fn attenuations(&self) -> &[Vec4] {
        &self.attenuations
    }

    /// The spot direction array.
    pub fn spot_directions(&self) -> &[Vec4] {
        &self.spot_directions
    }

    /// The color array as raw bytes, ready for a uniform upload.
    pub fn colors_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.colors)
    }

    /// The direction-or-position array as raw bytes.
    pub fn directions_or_positions_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.directions_or_positions)
    }

    /// The attenuation array as raw bytes.
    pub fn attenuations_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.attenuations)
    }

    /// The spot direction array as raw bytes.
    pub fn spot_directions_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.spot_directions)
    }

    /// Reads slot `index` back.
    pub fn slot(&self, index: usize) -> Option<EncodedLight> {
        Some(EncodedLight {
            color: *self.colors.get(index)?,
            direction_or_position: self.directions_or_positions[index],
            attenuation: self.attenuations[index],
            spot_direction: self.spot_directions[index],
        })
    }

    fn write(&mut self, index: usize, light: &EncodedLight) {
        self.colors[index] = light.color;
        self.directions_or_positions[index] = light.direction_or_position;
        self.attenuations[index] = light.attenuation;
        self.spot_directions[index] = light.spot_direction;
    }

    /// Resets every slot from `start` on to its default and records `start`
    /// as the packed count.
    fn reset_from(&mut self, start: usize) {
        let empty = EncodedLight::default();
        for index in start..self.capacity() {
            self.write(index, &empty);
        }
        self.packed = start.min(self.capacity());
    }

    /// Resets every slot.
    pub fn clear(&mut self) {
        self.reset_from(0);
    }
}

/// Outcome of one pack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PackReport {
    /// Lights written to the buffer.
    pub packed: usize,
    /// Visible lights left out for lack of capacity.
    pub dropped: usize,
}

/// Writes visible lights into a [`LightUniformBuffer`] in culling order.
#[derive(Debug, Default, Clone, Copy)]
pub struct LightSetPacker;

impl LightSetPacker {
    /// Creates a packer.
    pub fn new() -> Self {
        Self
    }

    /// Packs the visible lights of `results` into `buffer`.
    ///
    /// The first `buffer.capacity()` lights are encoded into their own slots
    /// and the remaining slots are reset. Lights beyond the capacity are
    /// remapped to [`UNASSIGNED_LIGHT_INDEX`](lumen_core::renderer::api::UNASSIGNED_LIGHT_INDEX) in the light index map of
    /// `results`, so no drawable references an unwritten slot.
    pub fn pack(&self, results: &mut CullingResults, buffer: &mut LightUniformBuffer) -> PackReport {
        let capacity = buffer.capacity();
        let visible = results.visible_lights();
        let total = visible.len();

        for (slot, light) in visible.iter().take(capacity).enumerate() {
            buffer.write(slot, &encode_light(light));
        }
        let packed = total.min(capacity);
        buffer.reset_from(packed);

        let dropped = total - packed;
        if dropped > 0 {
            results.unassign_lights_from(capacity);
            log::debug!(
                "{total} visible lights exceed the capacity of {capacity}; {dropped} left unassigned"
            );
        }

        PackReport { packed, dropped }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_core::math::{AffineTransform, LinearRgba, Vec3};
    use lumen_core::renderer::api::{Drawable, DrawableId, Material, ShaderId};
    use lumen_core::renderer::{Light, VisibleLight};
    use std::sync::Arc;

    fn results_with_points(count: usize) -> CullingResults {
        let mut results = CullingResults::new();
        for i in 0..count {
            let light = Light::point(LinearRgba::WHITE, 1.0, 2.0 + i as f32);
            let transform = AffineTransform::from_translation(Vec3::new(i as f32, 0.0, 0.0));
            results.push_visible_light(VisibleLight::from_light(&light, transform, true));
        }
        results.push_drawable(Drawable {
            id: DrawableId(0),
            material: Arc::new(Material::new("m", ShaderId(0), Vec::new())),
            position: Vec3::ZERO,
            light_indices: (0..count).collect(),
        });
        results
    }

    #[test]
    fn test_new_buffer_holds_defaults() {
        let buffer = LightUniformBuffer::new(4);
        assert_eq!(buffer.capacity(), 4);
        assert_eq!(buffer.packed_count(), 0);
        assert!(buffer.colors().iter().all(|c| *c == Vec4::ZERO));
        assert!(buffer.attenuations().iter().all(|a| *a == Vec4::W));
        assert_eq!(buffer.colors_bytes().len(), 4 * 16);
    }

    #[test]
    fn test_pack_within_capacity_has_no_remap() {
        let mut results = results_with_points(3);
        let mut buffer = LightUniformBuffer::new(4);

        let report = LightSetPacker::new().pack(&mut results, &mut buffer);

        assert_eq!(report, PackReport { packed: 3, dropped: 0 });
        assert_eq!(results.light_index_map(), &[0, 1, 2]);
        assert_eq!(buffer.packed_count(), 3);
        assert_eq!(buffer.directions_or_positions()[2], Vec4::new(2.0, 0.0, 0.0, 1.0));
        assert_eq!(buffer.slot(3), Some(EncodedLight::default()));
        assert_eq!(buffer.slot(4), None);
    }

    #[test]
    fn test_overflow_truncates_and_remaps() {
        let mut results = results_with_points(6);
        let mut buffer = LightUniformBuffer::new(4);
        let map_before = results.light_index_map().as_ptr();

        let report = LightSetPacker::new().pack(&mut results, &mut buffer);

        assert_eq!(report, PackReport { packed: 4, dropped: 2 });
        assert_eq!(results.light_index_map(), &[0, 1, 2, 3, -1, -1]);
        // Remapped in place.
        assert_eq!(results.light_index_map().as_ptr(), map_before);
        let slots: Vec<usize> = results.object_light_indices(0).collect();
        assert_eq!(slots, vec![0, 1, 2, 3]);
        for slot in 0..4 {
            assert_eq!(buffer.directions_or_positions()[slot].x, slot as f32);
        }
    }

    #[test]
    fn test_stale_slots_are_reset() {
        let mut buffer = LightUniformBuffer::new(4);
        let packer = LightSetPacker::new();

        packer.pack(&mut results_with_points(4), &mut buffer);
        packer.pack(&mut results_with_points(1), &mut buffer);

        assert_eq!(buffer.packed_count(), 1);
        for slot in 1..4 {
            assert_eq!(buffer.slot(slot), Some(EncodedLight::default()));
        }
    }

    #[test]
    fn test_repacking_is_bit_identical() {
        let packer = LightSetPacker::new();
        let mut first = LightUniformBuffer::new(4);
        let mut second = LightUniformBuffer::new(4);
        packer.pack(&mut results_with_points(6), &mut first);
        packer.pack(&mut results_with_points(2), &mut second);
        packer.pack(&mut results_with_points(6), &mut second);
        assert_eq!(first.colors_bytes(), second.colors_bytes());
        assert_eq!(first.attenuations_bytes(), second.attenuations_bytes());
        assert_eq!(first, second);
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut buffer = LightUniformBuffer::new(2);
        LightSetPacker::new().pack(&mut results_with_points(2), &mut buffer);
        buffer.clear();
        assert_eq!(buffer, LightUniformBuffer::new(2));
    }
}
