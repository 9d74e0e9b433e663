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

//! Defines the ForwardRenderAgent, the per-frame orchestrator of the forward pipeline.

use super::stats::FrameStats;
use lumen_core::math::Vec4;
use lumen_core::renderer::{
    api::{Camera, ClearFlags, CommandBuffer, CullingResults, Material, ShaderPropertyId},
    CullingService, PipelineSettings, RenderContext, SettingsError, ShaderLibrary,
};
use lumen_lanes::{
    light_lane::{LightSetPacker, LightUniformBuffer},
    render_lane::{DrawBatchBuilder, FallbackPassBuilder, ERROR_SHADER_NAME},
};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Name of the command buffer and of the profiling scope around each camera.
pub const RENDER_CAMERA_SAMPLE: &str = "Render Camera";

/// Drives the forward pipeline for every camera of a frame.
///
/// The agent owns all per-frame scratch state and reuses it: the command
/// buffer, the light uniform arrays and the culling results are allocated
/// once and overwritten for every camera.
pub struct ForwardRenderAgent {
    settings: PipelineSettings,
    // Recorded per camera, cleared after every execution.
    command_buffer: CommandBuffer,
    light_buffer: LightUniformBuffer,
    culling_results: CullingResults,
    packer: LightSetPacker,
    batches: DrawBatchBuilder,
    // `None` when the error shader could not be resolved.
    fallback: Option<FallbackPassBuilder>,
    // --- Metrics ---
    last_frame_stats: FrameStats,
    last_frame_time: Duration,
    frame_count: u64,
}

impl ForwardRenderAgent {
    /// Creates an agent from validated `settings`.
    ///
    /// The error material of the diagnostic pass is created here, once, from
    /// `shaders`. If the error shader is missing the pass stays disabled.
    pub fn new(settings: PipelineSettings, shaders: &dyn ShaderLibrary) -> Result<Self, SettingsError> {
        settings.validate()?;

        let fallback = FallbackPassBuilder::new(shaders);
        if fallback.is_none() && settings.diagnostics {
            log::warn!("Error shader '{ERROR_SHADER_NAME}' not found, fallback pass disabled");
        }

        log::info!(
            "ForwardRenderAgent: {} light slot(s), instancing: {}, dynamic batching: {}, diagnostics: {}",
            settings.max_visible_lights,
            settings.instancing,
            settings.dynamic_batching,
            settings.diagnostics
        );

        Ok(Self {
            command_buffer: CommandBuffer::new(RENDER_CAMERA_SAMPLE),
            light_buffer: LightUniformBuffer::new(settings.max_visible_lights),
            culling_results: CullingResults::new(),
            packer: LightSetPacker::new(),
            batches: DrawBatchBuilder::new(&settings),
            fallback,
            settings,
            last_frame_stats: FrameStats::default(),
            last_frame_time: Duration::ZERO,
            frame_count: 0,
        })
    }

    /// Renders every camera in order, then submits once.
    ///
    /// Cameras without culling parameters are skipped and issue nothing.
    pub fn render_frame(
        &mut self,
        context: &mut dyn RenderContext,
        culling: &mut dyn CullingService,
        cameras: &[Camera],
    ) {
        let frame_start = Instant::now();
        let diagnostics = self.settings.diagnostics;
        let mut stats = FrameStats {
            frame_index: self.frame_count,
            ..Default::default()
        };

        context.begin_frame_rendering(cameras);
        for camera in cameras {
            self.render_camera(context, culling, camera, diagnostics, &mut stats);
        }
        context.submit();
        context.end_frame_rendering(cameras);

        log::trace!("ForwardRenderAgent: {stats}");
        self.last_frame_stats = stats;
        self.last_frame_time = frame_start.elapsed();
        self.frame_count += 1;
    }

    fn render_camera(
        &mut self,
        context: &mut dyn RenderContext,
        culling: &mut dyn CullingService,
        camera: &Camera,
        diagnostics: bool,
        stats: &mut FrameStats,
    ) {
        let Some(mut parameters) = culling.try_get_culling_parameters(camera) else {
            log::debug!("Camera '{}' has no culling parameters, skipped", camera.name);
            stats.cameras_skipped += 1;
            return;
        };
        parameters.lights_use_linear_intensity = self.settings.use_linear_light_intensity;

        context.begin_camera_rendering(camera);

        self.culling_results.clear();
        culling.cull(&parameters, &mut self.culling_results);
        context.setup_camera_properties(camera);

        self.command_buffer.clear_render_target(
            camera.clear_flags.contains(ClearFlags::DEPTH),
            camera.clear_flags.contains(ClearFlags::COLOR),
            camera.background_color,
        );

        let has_lights = !self.culling_results.visible_lights().is_empty();
        if has_lights {
            let report = self.packer.pack(&mut self.culling_results, &mut self.light_buffer);
            stats.lights_packed += report.packed;
            stats.lights_dropped += report.dropped;
        } else {
            self.light_buffer.clear();
            self.command_buffer
                .set_global_vector(ShaderPropertyId::LIGHT_INDICES_OFFSET_AND_COUNT, Vec4::ZERO);
        }

        self.command_buffer.begin_sample(RENDER_CAMERA_SAMPLE);
        if has_lights {
            self.record_light_uploads();
        }
        self.flush(context);

        let position = camera.position;
        let opaque = self.batches.build_opaque(position, has_lights);
        context.draw_renderers(&self.culling_results, &opaque);

        context.draw_skybox(camera);

        let transparent = self.batches.build_transparent(position, has_lights);
        context.draw_renderers(&self.culling_results, &transparent);
        stats.draw_requests += 2;

        if diagnostics {
            if let Some(fallback) = &self.fallback {
                let request = fallback.build_fallback(position);
                context.draw_renderers(&self.culling_results, &request);
                stats.draw_requests += 1;
                stats.fallback_draws += 1;
            }
        }

        if let Err(err) = self.command_buffer.end_sample(RENDER_CAMERA_SAMPLE) {
            log::error!("ForwardRenderAgent: {err}");
            self.command_buffer.reset();
        }
        self.flush(context);

        context.end_camera_rendering(camera);
        stats.cameras_rendered += 1;
    }

    fn record_light_uploads(&mut self) {
        let lights = &self.light_buffer;
        let cb = &mut self.command_buffer;
        cb.set_global_vector_array(ShaderPropertyId::VISIBLE_LIGHT_COLORS, lights.colors());
        cb.set_global_vector_array(
            ShaderPropertyId::VISIBLE_LIGHT_DIRECTIONS_OR_POSITIONS,
            lights.directions_or_positions(),
        );
        cb.set_global_vector_array(
            ShaderPropertyId::VISIBLE_LIGHT_ATTENUATIONS,
            lights.attenuations(),
        );
        cb.set_global_vector_array(
            ShaderPropertyId::VISIBLE_LIGHT_SPOT_DIRECTIONS,
            lights.spot_directions(),
        );
    }

    fn flush(&mut self, context: &mut dyn RenderContext) {
        context.execute_command_buffer(&self.command_buffer);
        self.command_buffer.clear();
    }

    /// Turns the diagnostic pass on or off from the next frame on.
    pub fn set_diagnostics(&mut self, enabled: bool) {
        if enabled && self.fallback.is_none() {
            log::warn!("Diagnostics enabled but error shader '{ERROR_SHADER_NAME}' is unavailable");
        }
        self.settings.diagnostics = enabled;
    }

    /// The active settings.
    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    /// The light uniform arrays as left by the last rendered camera.
    pub fn light_buffer(&self) -> &LightUniformBuffer {
        &self.light_buffer
    }

    /// The culling results of the last rendered camera.
    pub fn culling_results(&self) -> &CullingResults {
        &self.culling_results
    }

    /// The error material, if its shader was found.
    pub fn error_material(&self) -> Option<&Arc<Material>> {
        self.fallback.as_ref().map(FallbackPassBuilder::error_material)
    }

    /// Counters of the last completed frame.
    pub fn last_frame_stats(&self) -> FrameStats {
        self.last_frame_stats
    }

    /// Returns the duration of the last `render_frame` call.
    pub fn last_frame_time(&self) -> Duration {
        self.last_frame_time
    }

    /// Returns the total number of frames rendered.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}
