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

//! Builds the opaque and transparent draw requests of a camera.
//!
//! The sky is drawn between the two by the orchestrator, so opaque geometry
//! occludes it and transparent geometry blends over it.

use lumen_core::math::Vec3;
use lumen_core::renderer::api::{
    DrawRequest, PerObjectData, RenderQueueRange, ShaderTagId, SortingCriteria,
};
use lumen_core::renderer::PipelineSettings;

/// The only pass tag the main passes draw.
pub const UNLIT_PASS_TAG: ShaderTagId = ShaderTagId::from_static("SRPDefaultUnlit");

/// Builds the main draw requests from the pipeline's batching configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawBatchBuilder {
    enable_instancing: bool,
    enable_dynamic_batching: bool,
}

impl DrawBatchBuilder {
    /// Creates a builder using the batching flags of `settings`.
    pub fn new(settings: &PipelineSettings) -> Self {
        Self {
            enable_instancing: settings.instancing,
            enable_dynamic_batching: settings.dynamic_batching,
        }
    }

    /// Opaque geometry, nearest first.
    pub fn build_opaque(&self, camera_position: Vec3, has_visible_lights: bool) -> DrawRequest {
        self.build(
            "Opaque",
            SortingCriteria::CommonOpaque,
            RenderQueueRange::OPAQUE,
            camera_position,
            has_visible_lights,
        )
    }

    /// Transparent geometry, farthest first.
    pub fn build_transparent(&self, camera_position: Vec3, has_visible_lights: bool) -> DrawRequest {
        self.build(
            "Transparent",
            SortingCriteria::CommonTransparent,
            RenderQueueRange::TRANSPARENT,
            camera_position,
            has_visible_lights,
        )
    }

    fn build(
        &self,
        label: &'static str,
        sorting: SortingCriteria,
        queue_range: RenderQueueRange,
        camera_position: Vec3,
        has_visible_lights: bool,
    ) -> DrawRequest {
        // Light indices are only meaningful when slots were written.
        let per_object_data = if has_visible_lights {
            PerObjectData::LIGHT_INDICES
        } else {
            PerObjectData::NONE
        };

        DrawRequest {
            label,
            pass_tags: vec![UNLIT_PASS_TAG],
            excluded_tags: Vec::new(),
            sorting,
            camera_position,
            queue_range,
            per_object_data,
            override_material: None,
            override_pass_index: 0,
            enable_instancing: self.enable_instancing,
            enable_dynamic_batching: self.enable_dynamic_batching,
        }
    }
}
