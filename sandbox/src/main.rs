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

mod context;
mod scene;

use anyhow::{Context, Result};
use context::{BuiltinShaders, LoggingContext};
use lumen_agents::render_agent::ForwardRenderAgent;
use lumen_core::math::Vec3;
use lumen_core::renderer::api::{Camera, ClearFlags};
use lumen_core::renderer::PipelineSettings;
use scene::{DistanceCulling, Scene};

const FRAMES: u64 = 3;

fn load_settings() -> Result<PipelineSettings> {
    let Some(path) = std::env::args().nth(1) else {
        log::info!("No settings file given, using defaults");
        return Ok(PipelineSettings::default());
    };
    let text = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read settings file '{path}'"))?;
    PipelineSettings::from_ron_str(&text).with_context(|| format!("Invalid settings in '{path}'"))
}

fn main() -> Result<()> {
    use env_logger::{Builder, Env};
    Builder::from_env(Env::default().default_filter_or("info")).init();

    let settings = load_settings()?;
    let mut agent = ForwardRenderAgent::new(settings, &BuiltinShaders)?;

    let main_camera = Camera::new(0, "Main", Vec3::new(0.0, 2.0, -4.0));
    let mut minimap = Camera::new(1, "Minimap", Vec3::new(0.0, 30.0, 6.0));
    minimap.clear_flags = ClearFlags::DEPTH;
    // Inverted clip planes: culling rejects it and the agent skips it.
    let mut broken = Camera::new(2, "Broken", Vec3::ZERO);
    broken.near_clip = 10.0;
    broken.far_clip = 1.0;
    let cameras = [main_camera, minimap, broken];

    let mut context = LoggingContext::default();
    let mut culling = DistanceCulling::new(Scene::demo(), 50.0);

    for frame in 0..FRAMES {
        if frame == FRAMES - 1 {
            agent.set_diagnostics(false);
        }
        agent.render_frame(&mut context, &mut culling, &cameras);
        log::info!("{} in {:?}", agent.last_frame_stats(), agent.last_frame_time());
    }

    log::info!(
        "Rendered {} frame(s) with {} submission(s)",
        agent.frame_count(),
        context.submissions()
    );
    Ok(())
}
