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

//! Camera description as seen by the frame orchestrator.

use crate::math::{LinearRgba, Vec3};

/// Identifies a camera across frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CameraId(pub u32);

/// Which render targets a camera clears before drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClearFlags {
    bits: u32,
}

impl ClearFlags {
    /// Clear nothing.
    pub const NONE: Self = Self { bits: 0 };
    /// Clear the depth buffer.
    pub const DEPTH: Self = Self { bits: 1 << 0 };
    /// Clear the color target to the background color.
    pub const COLOR: Self = Self { bits: 1 << 1 };
    /// Clear depth and color.
    pub const ALL: Self = Self {
        bits: Self::DEPTH.bits | Self::COLOR.bits,
    };

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
}

impl Default for ClearFlags {
    fn default() -> Self {
        Self::ALL
    }
}

impl std::ops::BitOr for ClearFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.union(rhs)
    }
}

/// A camera to render this frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Stable identifier.
    pub id: CameraId,
    /// Human-readable name, used in logs.
    pub name: String,
    /// Targets cleared before drawing.
    pub clear_flags: ClearFlags,
    /// Color used when `clear_flags` contains [`ClearFlags::COLOR`].
    pub background_color: LinearRgba,
    /// World-space position, the reference point for draw sorting.
    pub position: Vec3,
    /// Near clip plane distance.
    pub near_clip: f32,
    /// Far clip plane distance.
    pub far_clip: f32,
}

impl Camera {
    /// Creates a camera at `position` with default clear settings.
    pub fn new(id: u32, name: impl Into<String>, position: Vec3) -> Self {
        Self {
            id: CameraId(id),
            name: name.into(),
            clear_flags: ClearFlags::ALL,
            background_color: LinearRgba::new(0.19, 0.3, 0.47, 0.0),
            position,
            near_clip: 0.3,
            far_clip: 1000.0,
        }
    }

    /// Returns `true` when the clip planes describe a non-empty frustum.
    pub fn has_valid_frustum(&self) -> bool {
        self.near_clip > 0.0 && self.far_clip > self.near_clip && self.far_clip.is_finite()
    }
}
