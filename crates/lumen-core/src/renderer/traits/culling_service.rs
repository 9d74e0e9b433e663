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

use crate::renderer::api::{Camera, CullingParameters, CullingResults};

/// The visibility service queried once per camera.
///
/// How visibility is computed is entirely up to the implementor. The
/// orchestrator only relies on the ordering of the reported lights, which it
/// never changes.
pub trait CullingService {
    /// Derives culling parameters for `camera`.
    ///
    /// Returns `None` when the camera cannot be rendered this frame, e.g. a
    /// degenerate frustum. The camera is then skipped without error.
    fn try_get_culling_parameters(&self, camera: &Camera) -> Option<CullingParameters>;

    /// Fills `results` with the drawables and lights visible under `parameters`.
    ///
    /// `results` arrives cleared. Lights must be added with
    /// [`CullingResults::push_visible_light`] so the light index map stays in step.
    fn cull(&mut self, parameters: &CullingParameters, results: &mut CullingResults);
}
