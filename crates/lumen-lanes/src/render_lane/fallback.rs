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

//! Diagnostic pass redrawing legacy-only drawables with an error material.
//!
//! Drawables whose material only exposes legacy pass tags are never selected by
//! the main passes. With diagnostics enabled they are redrawn in the opaque
//! queue with a flat error material so they stand out on screen. Materials
//! that also expose the unlit tag are already drawn and are left alone.

use super::draw_batch::UNLIT_PASS_TAG;
use lumen_core::math::Vec3;
use lumen_core::renderer::api::{
    DrawRequest, HideFlags, Material, PerObjectData, RenderQueueRange, ShaderTagId, SortingCriteria,
};
use lumen_core::renderer::ShaderLibrary;
use std::sync::Arc;

/// Shader backing the error material.
pub const ERROR_SHADER_NAME: &str = "Hidden/InternalErrorShader";

/// Legacy pass tags the fallback pass recognizes, in slot order.
pub const LEGACY_PASS_TAGS: [ShaderTagId; 6] = [
    ShaderTagId::from_static("ForwardBase"),
    ShaderTagId::from_static("PrepassBase"),
    ShaderTagId::from_static("Always"),
    ShaderTagId::from_static("Vertex"),
    ShaderTagId::from_static("VertexLMRGBM"),
    ShaderTagId::from_static("VertexLM"),
];

/// Creates the error material, or `None` if its shader is unavailable.
pub fn create_error_material(shaders: &dyn ShaderLibrary) -> Option<Material> {
    let shader = shaders.find_shader(ERROR_SHADER_NAME)?;
    let mut material = Material::new("Error", shader, vec![ShaderTagId::from_static("Always")]);
    material.hide_flags = HideFlags::HIDE_AND_DONT_SAVE;
    Some(material)
}

/// Builds the fallback draw request around a shared error material.
#[derive(Debug, Clone)]
pub struct FallbackPassBuilder {
    error_material: Arc<Material>,
}

impl FallbackPassBuilder {
    /// Creates the builder and its error material.
    ///
    /// Returns `None` when the error shader cannot be resolved.
    pub fn new(shaders: &dyn ShaderLibrary) -> Option<Self> {
        create_error_material(shaders).map(|material| Self {
            error_material: Arc::new(material),
        })
    }

    /// The material substituted for every legacy drawable.
    pub fn error_material(&self) -> &Arc<Material> {
        &self.error_material
    }

    /// Opaque-queue request drawing legacy-only drawables with pass 0 of the error material.
    pub fn build_fallback(&self, camera_position: Vec3) -> DrawRequest {
        DrawRequest {
            label: "Fallback",
            pass_tags: LEGACY_PASS_TAGS.to_vec(),
            excluded_tags: vec![UNLIT_PASS_TAG],
            sorting: SortingCriteria::CommonOpaque,
            camera_position,
            queue_range: RenderQueueRange::OPAQUE,
            per_object_data: PerObjectData::NONE,
            override_material: Some(Arc::clone(&self.error_material)),
            override_pass_index: 0,
            enable_instancing: false,
            enable_dynamic_batching: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_core::renderer::api::{CullingResults, Drawable, DrawableId, ShaderId};

    struct Shaders(Option<ShaderId>);

    impl ShaderLibrary for Shaders {
        fn find_shader(&self, name: &str) -> Option<ShaderId> {
            if name == ERROR_SHADER_NAME {
                self.0
            } else {
                None
            }
        }
    }

    #[test]
    fn test_error_material() {
        let material = create_error_material(&Shaders(Some(ShaderId(99)))).unwrap();
        assert_eq!(material.shader, ShaderId(99));
        assert_eq!(material.hide_flags, HideFlags::HIDE_AND_DONT_SAVE);
    }

    #[test]
    fn test_missing_shader_disables_fallback() {
        assert!(FallbackPassBuilder::new(&Shaders(None)).is_none());
    }

    #[test]
    fn test_fallback_request() {
        let builder = FallbackPassBuilder::new(&Shaders(Some(ShaderId(1)))).unwrap();
        let request = builder.build_fallback(Vec3::ZERO);

        assert_eq!(request.pass_tags.len(), 6);
        assert_eq!(request.pass_tags[0].as_str(), "ForwardBase");
        assert_eq!(request.pass_tags[5].as_str(), "VertexLM");
        assert_eq!(request.queue_range, RenderQueueRange::OPAQUE);
        assert_eq!(request.sorting, SortingCriteria::CommonOpaque);
        assert_eq!(request.override_pass_index, 0);
        assert_eq!(request.excluded_tags, vec![UNLIT_PASS_TAG]);
        assert!(Arc::ptr_eq(
            request.override_material.as_ref().unwrap(),
            builder.error_material()
        ));
    }

    #[test]
    fn test_fallback_selects_only_legacy_drawables() {
        let builder = FallbackPassBuilder::new(&Shaders(Some(ShaderId(1)))).unwrap();
        let mut results = CullingResults::new();
        let drawables: [(u64, &[&str]); 4] = [
            (0, &["SRPDefaultUnlit"]),
            (1, &["Vertex"]),
            (2, &["PrepassBase"]),
            // Also exposes the unlit tag, so the main passes already draw it.
            (3, &["SRPDefaultUnlit", "ForwardBase"]),
        ];
        for (id, tags) in drawables {
            let tags = tags.iter().map(|t| ShaderTagId::new(*t)).collect();
            results.push_drawable(Drawable {
                id: DrawableId(id),
                material: Arc::new(Material::new("m", ShaderId(0), tags)),
                position: Vec3::new(0.0, 0.0, 10.0 - id as f32),
                light_indices: Vec::new(),
            });
        }

        assert_eq!(builder.build_fallback(Vec3::ZERO).resolve(&results), vec![2, 1]);
    }
}
