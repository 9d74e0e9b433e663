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

//! Converts a visible light into the four vectors of one uniform slot.
//!
//! The shading stage evaluates a light as
//!
//! ```text
//! toLight   = dirOrPos.xyz - worldPos * dirOrPos.w
//! range     = saturate(1 - (dot(toLight, toLight) * atten.x)^2)^2
//! cone      = saturate(dot(spotDir.xyz, normalize(toLight)) * atten.z + atten.w)^2
//! ```
//!
//! so every type must produce values for which the unused terms evaluate to 1.

use lumen_core::math::{degrees_to_radians, Vec4};
use lumen_core::renderer::{LightType, VisibleLight};

/// Inner cone tangent as a fraction of the outer cone tangent.
///
/// Equal to `(64 - 18) / 64`.
pub const INNER_CONE_FRACTION: f32 = 46.0 / 64.0;

/// Lower bound for the squared range, keeping the inverse finite.
pub const RANGE_EPSILON: f32 = 0.00001;

/// Lower bound for the inner/outer cosine difference of a spot cone.
pub const MIN_ANGLE_RANGE: f32 = 0.001;

/// Attenuation of a slot with no falloff: range factor 0, cone factor 1.
pub const NO_ATTENUATION: Vec4 = Vec4::W;

/// The packed form of one light, one vector per uniform array.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EncodedLight {
    /// Final linear color.
    pub color: Vec4,
    /// Direction to the light (w = 0) or light position (w = 1).
    pub direction_or_position: Vec4,
    /// `x`: inverse squared range. `z`, `w`: cone ramp scale and offset.
    pub attenuation: Vec4,
    /// Direction to the light along the spot axis, zero for other types.
    pub spot_direction: Vec4,
}

impl Default for EncodedLight {
    /// The value of an unused slot.
    fn default() -> Self {
        Self {
            color: Vec4::ZERO,
            direction_or_position: Vec4::ZERO,
            attenuation: NO_ATTENUATION,
            spot_direction: Vec4::ZERO,
        }
    }
}

/// Encodes `light` for the uniform arrays.
pub fn encode_light(light: &VisibleLight) -> EncodedLight {
    let color = light.final_color.to_vec4();
    let transform = &light.local_to_world;
    // Shading wants the vector pointing towards the light.
    let to_light = (-transform.forward()).extend(0.0);

    match light.light_type {
        LightType::Directional => EncodedLight {
            color,
            direction_or_position: to_light,
            attenuation: NO_ATTENUATION,
            spot_direction: Vec4::ZERO,
        },
        LightType::Point { range } => EncodedLight {
            color,
            direction_or_position: transform.translation().extend(1.0),
            attenuation: Vec4::new(range_attenuation(range), 0.0, 0.0, 1.0),
            spot_direction: Vec4::ZERO,
        },
        LightType::Spot { range, spot_angle } => {
            let (scale, offset) = spot_cone_factors(spot_angle);
            EncodedLight {
                color,
                direction_or_position: transform.translation().extend(1.0),
                attenuation: Vec4::new(range_attenuation(range), 0.0, scale, offset),
                spot_direction: to_light,
            }
        }
    }
}

/// `1 / max(range², RANGE_EPSILON)`.
#[inline]
pub fn range_attenuation(range: f32) -> f32 {
    1.0 / (range * range).max(RANGE_EPSILON)
}

/// Scale and offset of the linear cone ramp for a spot of `spot_angle` degrees.
///
/// The cone factor is `dot(spot_dir, light_dir) * scale + offset`: 0 on the
/// outer cone, 1 on the inner cone.
pub fn spot_cone_factors(spot_angle: f32) -> (f32, f32) {
    let outer_rad = degrees_to_radians(0.5 * spot_angle);
    let outer_cos = outer_rad.cos();
    let outer_tan = outer_rad.tan();
    let inner_cos = (INNER_CONE_FRACTION * outer_tan).atan().cos();
    let angle_range = (inner_cos - outer_cos).max(MIN_ANGLE_RANGE);
    let scale = 1.0 / angle_range;
    (scale, -outer_cos * scale)
}
