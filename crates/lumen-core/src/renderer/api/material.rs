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

//! Materials and the tags their shading passes expose.

use std::borrow::Cow;
use std::fmt;

/// Names a shading pass, e.g. `"SRPDefaultUnlit"` or `"ForwardBase"`.
///
/// A draw request lists the tags it understands and a drawable is selected when
/// its material exposes one of them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShaderTagId(Cow<'static, str>);

impl ShaderTagId {
    /// Creates a tag from a static name, usable in `const` context.
    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    /// Creates a tag from any string.
    pub fn new(name: impl Into<String>) -> Self {
        Self(Cow::Owned(name.into()))
    }

    /// Returns the tag name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ShaderTagId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An opaque handle to a shader resolved by a [`ShaderLibrary`](crate::renderer::traits::ShaderLibrary).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShaderId(pub u32);

/// Editor and persistence visibility of an object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct HideFlags {
    bits: u32,
}

impl HideFlags {
    /// Visible and saved.
    pub const NONE: Self = Self { bits: 0 };
    /// Not shown in editor listings.
    pub const HIDE_IN_HIERARCHY: Self = Self { bits: 1 << 0 };
    /// Never written to disk.
    pub const DONT_SAVE: Self = Self { bits: 1 << 1 };
    /// Transient, internal object.
    pub const HIDE_AND_DONT_SAVE: Self = Self {
        bits: Self::HIDE_IN_HIERARCHY.bits | Self::DONT_SAVE.bits,
    };

    /// Checks whether every bit of `other` is set.
    pub const fn contains(&self, other: Self) -> bool {
        (self.bits & other.bits) == other.bits
    }
}

/// Render queue values used to classify drawables.
pub struct RenderQueue;

impl RenderQueue {
    /// Drawn first, e.g. backdrops.
    pub const BACKGROUND: u32 = 1000;
    /// Default queue for opaque geometry.
    pub const GEOMETRY: u32 = 2000;
    /// Alpha-tested geometry, still opaque.
    pub const ALPHA_TEST: u32 = 2450;
    /// Alpha-blended geometry.
    pub const TRANSPARENT: u32 = 3000;
    /// Drawn last.
    pub const OVERLAY: u32 = 4000;
}

/// A material: a shader, the pass tags it exposes and its queue.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    /// Display name.
    pub name: String,
    /// The shader backing this material.
    pub shader: ShaderId,
    /// Pass tags in pass-slot order.
    pub pass_tags: Vec<ShaderTagId>,
    /// Render queue value; see [`RenderQueue`].
    pub render_queue: u32,
    /// Editor and persistence visibility.
    pub hide_flags: HideFlags,
}

impl Material {
    /// Creates a visible material in the geometry queue.
    pub fn new(name: impl Into<String>, shader: ShaderId, pass_tags: Vec<ShaderTagId>) -> Self {
        Self {
            name: name.into(),
            shader,
            pass_tags,
            render_queue: RenderQueue::GEOMETRY,
            hide_flags: HideFlags::NONE,
        }
    }

    /// Sets the render queue.
    pub fn with_render_queue(mut self, render_queue: u32) -> Self {
        self.render_queue = render_queue;
        self
    }

    /// Returns the slot of the first pass whose tag appears in `tags`.
    pub fn find_pass(&self, tags: &[ShaderTagId]) -> Option<usize> {
        self.pass_tags.iter().position(|tag| tags.contains(tag))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_and_owned_tags_compare_equal() {
        const UNLIT: ShaderTagId = ShaderTagId::from_static("SRPDefaultUnlit");
        assert_eq!(UNLIT, ShaderTagId::new("SRPDefaultUnlit"));
        assert_eq!(UNLIT.to_string(), "SRPDefaultUnlit");
    }

    #[test]
    fn test_find_pass() {
        let material = Material::new(
            "legacy",
            ShaderId(3),
            vec![ShaderTagId::new("ShadowCaster"), ShaderTagId::new("ForwardBase")],
        );
        assert_eq!(material.find_pass(&[ShaderTagId::new("ForwardBase")]), Some(1));
        assert_eq!(material.find_pass(&[ShaderTagId::new("Vertex")]), None);
    }

    #[test]
    fn test_hide_flags() {
        assert!(HideFlags::HIDE_AND_DONT_SAVE.contains(HideFlags::DONT_SAVE));
        assert!(!HideFlags::NONE.contains(HideFlags::HIDE_IN_HIERARCHY));
    }
}
