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

use crate::renderer::api::{Camera, CommandBuffer, CullingResults, DrawRequest};

/// The ordered command sink the orchestrator records into.
///
/// Calls arrive in submission order. Nothing reaches the GPU before
/// [`RenderContext::submit`]; implementors queue everything until then.
///
/// The lifecycle hooks default to no-ops.
pub trait RenderContext {
    /// Called once at the start of a frame with every camera of the frame.
    fn begin_frame_rendering(&mut self, _cameras: &[Camera]) {}

    /// Called once after the frame has been submitted.
    fn end_frame_rendering(&mut self, _cameras: &[Camera]) {}

    /// Called before a renderable camera is processed. Skipped cameras get no call.
    fn begin_camera_rendering(&mut self, _camera: &Camera) {}

    /// Called after a renderable camera has been processed.
    fn end_camera_rendering(&mut self, _camera: &Camera) {}

    /// Binds the camera's view and projection globals.
    fn setup_camera_properties(&mut self, camera: &Camera);

    /// Queues the recorded contents of `buffer`.
    ///
    /// The buffer is cleared by the caller right after this returns, so
    /// implementors copy what they need.
    fn execute_command_buffer(&mut self, buffer: &CommandBuffer);

    /// Queues a draw of the drawables selected by `request`.
    ///
    /// [`DrawRequest::resolve`] gives the reference selection and order.
    fn draw_renderers(&mut self, results: &CullingResults, request: &DrawRequest);

    /// Queues the sky for `camera`.
    fn draw_skybox(&mut self, camera: &Camera);

    /// Hands everything queued so far to the GPU.
    fn submit(&mut self);
}
