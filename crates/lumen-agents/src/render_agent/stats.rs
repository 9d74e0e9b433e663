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

//! Per-frame counters collected by the [`ForwardRenderAgent`](super::ForwardRenderAgent).

use std::fmt;

/// What happened during one `render_frame` call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Zero-based index of the frame.
    pub frame_index: u64,
    /// Cameras that went through the full sequence.
    pub cameras_rendered: u32,
    /// Cameras skipped for lack of culling parameters.
    pub cameras_skipped: u32,
    /// Lights written to the uniform arrays, summed over cameras.
    pub lights_packed: usize,
    /// Visible lights left unassigned for lack of capacity, summed over cameras.
    pub lights_dropped: usize,
    /// Draw requests handed to the context, fallback included.
    pub draw_requests: u32,
    /// Fallback draw requests among `draw_requests`.
    pub fallback_draws: u32,
}

impl fmt::Display for FrameStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "frame {}: {} camera(s) rendered, {} skipped, {} light(s) packed, {} dropped, {} draw request(s) ({} fallback)",
            self.frame_index,
            self.cameras_rendered,
            self.cameras_skipped,
            self.lights_packed,
            self.lights_dropped,
            self.draw_requests,
            self.fallback_draws
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let stats = FrameStats {
            frame_index: 3,
            cameras_rendered: 2,
            cameras_skipped: 1,
            lights_packed: 4,
            lights_dropped: 2,
            draw_requests: 5,
            fallback_draws: 1,
        };
        assert_eq!(
            stats.to_string(),
            "frame 3: 2 camera(s) rendered, 1 skipped, 4 light(s) packed, 2 dropped, 5 draw request(s) (1 fallback)"
        );
    }
}
