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

//! A render context that logs what it is asked to do instead of talking to a GPU.

use lumen_core::renderer::api::{Camera, Command, CommandBuffer, CullingResults, DrawRequest, ShaderId};
use lumen_core::renderer::{RenderContext, ShaderLibrary};
use lumen_lanes::render_lane::ERROR_SHADER_NAME;

/// Queues commands and draws, then logs them on submit.
#[derive(Default)]
pub struct LoggingContext {
    queued: Vec<String>,
    submissions: usize,
}

impl LoggingContext {
    /// Number of `submit` calls so far.
    pub fn submissions(&self) -> usize {
        self.submissions
    }
}

fn describe(command: &Command) -> String {
    match command {
        Command::ClearRenderTarget {
            clear_depth,
            clear_color,
            background,
        } => format!(
            "clear (depth: {clear_depth}, color: {clear_color}, background: {:?})",
            background.to_vec4()
        ),
        Command::SetGlobalVector { id, value } => format!("set {id} = {value:?}"),
        Command::SetGlobalVectorArray { id, values } => {
            format!("set {id}[{}]", values.len())
        }
        Command::BeginSample(name) => format!("begin sample '{name}'"),
        Command::EndSample(name) => format!("end sample '{name}'"),
    }
}

impl RenderContext for LoggingContext {
    fn begin_frame_rendering(&mut self, cameras: &[Camera]) {
        log::debug!("begin frame with {} camera(s)", cameras.len());
    }

    fn begin_camera_rendering(&mut self, camera: &Camera) {
        log::debug!("begin camera '{}'", camera.name);
    }

    fn setup_camera_properties(&mut self, camera: &Camera) {
        self.queued
            .push(format!("camera properties for '{}'", camera.name));
    }

    fn execute_command_buffer(&mut self, buffer: &CommandBuffer) {
        self.queued.extend(
            buffer
                .commands()
                .iter()
                .map(|command| format!("[{}] {}", buffer.name(), describe(command))),
        );
    }

    fn draw_renderers(&mut self, results: &CullingResults, request: &DrawRequest) {
        let selected = request.resolve(results);
        let material = request
            .override_material
            .as_ref()
            .map(|material| format!(" with '{}'", material.name))
            .unwrap_or_default();
        self.queued.push(format!(
            "draw '{}': {} drawable(s){material}, per-object: {:?}",
            request.label,
            selected.len(),
            request.per_object_data
        ));
    }

    fn draw_skybox(&mut self, camera: &Camera) {
        self.queued.push(format!("skybox for '{}'", camera.name));
    }

    fn submit(&mut self) {
        self.submissions += 1;
        log::info!("submit #{}: {} queued item(s)", self.submissions, self.queued.len());
        for item in self.queued.drain(..) {
            log::debug!("  {item}");
        }
    }
}

/// Knows a single shader: the error shader.
pub struct BuiltinShaders;

impl ShaderLibrary for BuiltinShaders {
    fn find_shader(&self, name: &str) -> Option<ShaderId> {
        (name == ERROR_SHADER_NAME).then_some(ShaderId(0))
    }
}
