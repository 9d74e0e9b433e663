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

//! Defines light types for the forward pipeline.
//!
//! A [`Light`] is the scene-owned description of a light source. The culling
//! service turns each light it finds visible into a [`VisibleLight`], which
//! carries the final linear color and the light's world transform. Only
//! `VisibleLight` reaches the light encoder.

use crate::math::{AffineTransform, LinearRgba};
use serde::{Deserialize, Serialize};

/// The shape of a light source and its type-specific parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum LightType {
    /// An infinitely distant light with parallel rays and no falloff.
    Directional,
    /// A light emitting in all directions from its position.
    Point {
        /// Distance at which the contribution reaches zero.
        range: f32,
    },
    /// A cone-shaped light emitting along its forward axis.
    Spot {
        /// Distance at which the contribution reaches zero.
        range: f32,
        /// Full opening angle of the outer cone, in degrees.
        spot_angle: f32,
    },
}

impl LightType {
    /// Returns the range for Point and Spot lights.
    pub fn range(&self) -> Option<f32> {
        match self {
            LightType::Directional => None,
            LightType::Point { range } | LightType::Spot { range, .. } => Some(*range),
        }
    }
}

/// A light source as authored in the scene.
///
/// # Examples
///
/// ```
/// use lumen_core::renderer::light::{Light, LightType};
/// use lumen_core::math::LinearRgba;
///
/// let bulb = Light::point(LinearRgba::rgb(1.0, 0.8, 0.6), 2.0, 10.0);
/// assert_eq!(bulb.light_type, LightType::Point { range: 10.0 });
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Light {
    /// Type and type-specific parameters.
    pub light_type: LightType,
    /// Base color in linear RGB space.
    pub color: LinearRgba,
    /// Intensity multiplier applied to the color.
    pub intensity: f32,
}

impl Light {
    /// Creates a directional light.
    pub fn directional(color: LinearRgba, intensity: f32) -> Self {
        Self {
            light_type: LightType::Directional,
            color,
            intensity,
        }
    }

    /// Creates a point light.
    pub fn point(color: LinearRgba, intensity: f32, range: f32) -> Self {
        Self {
            light_type: LightType::Point { range },
            color,
            intensity,
        }
    }

    /// Creates a spot light. `spot_angle` is the full cone angle in degrees.
    pub fn spot(color: LinearRgba, intensity: f32, range: f32, spot_angle: f32) -> Self {
        Self {
            light_type: LightType::Spot { range, spot_angle },
            color,
            intensity,
        }
    }

    /// Computes the linear-space color handed to the shading stage.
    ///
    /// With `linear_intensity` the intensity scales the linear color. Without
    /// it, the color is scaled in gamma space and converted back to linear.
    pub fn final_color(&self, linear_intensity: bool) -> LinearRgba {
        if linear_intensity {
            self.color * self.intensity
        } else {
            LinearRgba::from_srgb_rgba(self.color.to_srgb() * self.intensity)
        }
    }
}

impl Default for Light {
    fn default() -> Self {
        Self::directional(LinearRgba::WHITE, 1.0)
    }
}

/// A light reported visible by the culling service for one camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibleLight {
    /// Type and type-specific parameters.
    pub light_type: LightType,
    /// Final linear-space color, intensity already applied.
    pub final_color: LinearRgba,
    /// The light's local-to-world transform.
    pub local_to_world: AffineTransform,
}

impl VisibleLight {
    /// Builds the visible form of `light` placed at `local_to_world`.
    pub fn from_light(light: &Light, local_to_world: AffineTransform, linear_intensity: bool) -> Self {
        Self {
            light_type: light.light_type,
            final_color: light.final_color(linear_intensity),
            local_to_world,
        }
    }
}
