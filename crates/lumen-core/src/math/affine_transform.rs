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

//! A local-to-world transform with accessors for the axes lights care about.

use super::{Mat4, Vec3};

/// A 3D affine transform (rotation and translation, optionally scale).
#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(C)]
pub struct AffineTransform(pub Mat4);

impl AffineTransform {
    /// The identity transform.
    pub const IDENTITY: Self = Self(Mat4::IDENTITY);

    /// Creates a pure translation.
    #[inline]
    pub fn from_translation(v: Vec3) -> Self {
        Self(Mat4::from_translation(v))
    }

    /// Creates a rotation around the X-axis, in radians.
    #[inline]
    pub fn from_rotation_x(angle: f32) -> Self {
        Self(Mat4::from_rotation_x(angle))
    }

    /// Creates a rotation around the Y-axis, in radians.
    #[inline]
    pub fn from_rotation_y(angle: f32) -> Self {
        Self(Mat4::from_rotation_y(angle))
    }

    /// Returns `self * other`, which applies `other` first.
    #[inline]
    pub fn then(&self, other: &Self) -> Self {
        Self(self.0 * other.0)
    }

    /// The world-space position, taken from the fourth column.
    #[inline]
    pub fn translation(&self) -> Vec3 {
        self.0.cols[3].truncate()
    }

    /// The transformed local +Z axis, taken from the third column.
    ///
    /// A light shines along this axis; shading expects the opposite vector.
    #[inline]
    pub fn forward(&self) -> Vec3 {
        self.0.cols[2].truncate()
    }
}

impl Default for AffineTransform {
    #[inline]
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{approx_eq, FRAC_PI_2};

    #[test]
    fn test_identity_axes() {
        let t = AffineTransform::IDENTITY;
        assert_eq!(t.forward(), Vec3::Z);
        assert_eq!(t.translation(), Vec3::ZERO);
    }

    #[test]
    fn test_forward_after_rotation_x() {
        // +Z rotated a quarter turn around X points down -Y.
        let t = AffineTransform::from_rotation_x(FRAC_PI_2);
        let f = t.forward();
        assert!(approx_eq(f.x, 0.0));
        assert!(approx_eq(f.y, -1.0));
        assert!(approx_eq(f.z, 0.0));
    }

    #[test]
    fn test_then_keeps_translation() {
        let t = AffineTransform::from_translation(Vec3::new(0.0, 4.0, 0.0))
            .then(&AffineTransform::from_rotation_y(1.0));
        assert_eq!(t.translation(), Vec3::new(0.0, 4.0, 0.0));
    }
}
