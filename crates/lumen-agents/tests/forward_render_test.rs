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

use approx::assert_abs_diff_eq;
use lumen_agents::render_agent::{ForwardRenderAgent, RENDER_CAMERA_SAMPLE};
use lumen_core::math::{AffineTransform, LinearRgba, Vec3, Vec4, FRAC_PI_2};
use lumen_core::renderer::api::{
    Camera, CameraId, ClearFlags, Command, CommandBuffer, CullingParameters, CullingResults,
    Drawable, DrawableId, DrawRequest, Material, PerObjectData, RenderQueue, ShaderId,
    ShaderPropertyId, ShaderTagId,
};
use lumen_core::renderer::{
    CullingService, Light, PipelineSettings, RenderContext, SettingsError, ShaderLibrary,
    VisibleLight,
};
use lumen_lanes::render_lane::ERROR_SHADER_NAME;
use std::sync::Arc;

// --- Mocks ---

#[derive(Debug, Clone, PartialEq)]
struct DrawRecord {
    label: &'static str,
    drawables: Vec<DrawableId>,
    light_slots: Vec<Vec<usize>>,
    overridden: bool,
    per_object_data: PerObjectData,
}

#[derive(Debug, Clone, PartialEq)]
enum Event {
    BeginFrame(usize),
    EndFrame,
    BeginCamera(CameraId),
    EndCamera(CameraId),
    SetupCamera(CameraId),
    Execute(Vec<Command>),
    Draw(DrawRecord),
    Skybox(CameraId),
    Submit,
}

#[derive(Default)]
struct RecordingContext {
    events: Vec<Event>,
}

impl RecordingContext {
    fn executions(&self) -> Vec<&[Command]> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::Execute(commands) => Some(commands.as_slice()),
                _ => None,
            })
            .collect()
    }

    fn draws(&self) -> Vec<&DrawRecord> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::Draw(record) => Some(record),
                _ => None,
            })
            .collect()
    }

    fn uploaded(&self, id: ShaderPropertyId) -> Option<Vec<Vec4>> {
        self.executions().into_iter().flatten().find_map(|c| match c {
            Command::SetGlobalVectorArray { id: found, values } if *found == id => Some(values.clone()),
            _ => None,
        })
    }

    fn count(&self, predicate: impl Fn(&Event) -> bool) -> usize {
        self.events.iter().filter(|e| predicate(e)).count()
    }
}

impl RenderContext for RecordingContext {
    fn begin_frame_rendering(&mut self, cameras: &[Camera]) {
        self.events.push(Event::BeginFrame(cameras.len()));
    }

    fn end_frame_rendering(&mut self, _cameras: &[Camera]) {
        self.events.push(Event::EndFrame);
    }

    fn begin_camera_rendering(&mut self, camera: &Camera) {
        self.events.push(Event::BeginCamera(camera.id));
    }

    fn end_camera_rendering(&mut self, camera: &Camera) {
        self.events.push(Event::EndCamera(camera.id));
    }

    fn setup_camera_properties(&mut self, camera: &Camera) {
        self.events.push(Event::SetupCamera(camera.id));
    }

    fn execute_command_buffer(&mut self, buffer: &CommandBuffer) {
        assert_eq!(buffer.name(), RENDER_CAMERA_SAMPLE);
        self.events.push(Event::Execute(buffer.commands().to_vec()));
    }

    fn draw_renderers(&mut self, results: &CullingResults, request: &DrawRequest) {
        let selected = request.resolve(results);
        let with_lights = request.per_object_data.contains(PerObjectData::LIGHT_INDICES);
        self.events.push(Event::Draw(DrawRecord {
            label: request.label,
            drawables: selected.iter().map(|&i| results.drawables()[i].id).collect(),
            light_slots: selected
                .iter()
                .map(|&i| {
                    if with_lights {
                        results.object_light_indices(i).collect()
                    } else {
                        Vec::new()
                    }
                })
                .collect(),
            overridden: request.override_material.is_some(),
            per_object_data: request.per_object_data,
        }));
    }

    fn draw_skybox(&mut self, camera: &Camera) {
        self.events.push(Event::Skybox(camera.id));
    }

    fn submit(&mut self) {
        self.events.push(Event::Submit);
    }
}

/// Reports every light and drawable as visible to every camera with a valid frustum.
#[derive(Default)]
struct SceneCulling {
    lights: Vec<(Light, AffineTransform)>,
    drawables: Vec<(u64, Arc<Material>, Vec3)>,
    last_parameters: Option<CullingParameters>,
}

impl SceneCulling {
    fn with_light(mut self, light: Light, transform: AffineTransform) -> Self {
        self.lights.push((light, transform));
        self
    }

    fn with_drawable(mut self, id: u64, material: Arc<Material>, position: Vec3) -> Self {
        self.drawables.push((id, material, position));
        self
    }
}

impl CullingService for SceneCulling {
    fn try_get_culling_parameters(&self, camera: &Camera) -> Option<CullingParameters> {
        camera.has_valid_frustum().then(|| CullingParameters {
            camera_id: camera.id,
            camera_position: camera.position,
            lights_use_linear_intensity: false,
        })
    }

    fn cull(&mut self, parameters: &CullingParameters, results: &mut CullingResults) {
        self.last_parameters = Some(parameters.clone());
        for (light, transform) in &self.lights {
            results.push_visible_light(VisibleLight::from_light(
                light,
                *transform,
                parameters.lights_use_linear_intensity,
            ));
        }
        for (id, material, position) in &self.drawables {
            results.push_drawable(Drawable {
                id: DrawableId(*id),
                material: Arc::clone(material),
                position: *position,
                light_indices: (0..self.lights.len()).collect(),
            });
        }
    }
}

struct Shaders {
    has_error_shader: bool,
}

impl ShaderLibrary for Shaders {
    fn find_shader(&self, name: &str) -> Option<ShaderId> {
        (self.has_error_shader && name == ERROR_SHADER_NAME).then_some(ShaderId(666))
    }
}

// --- Helpers ---

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn unlit(queue: u32) -> Arc<Material> {
    Arc::new(
        Material::new("unlit", ShaderId(1), vec![ShaderTagId::new("SRPDefaultUnlit")])
            .with_render_queue(queue),
    )
}

fn legacy() -> Arc<Material> {
    Arc::new(Material::new("legacy", ShaderId(2), vec![ShaderTagId::new("ForwardBase")]))
}

fn agent(settings: PipelineSettings) -> ForwardRenderAgent {
    ForwardRenderAgent::new(settings, &Shaders { has_error_shader: true }).unwrap()
}

fn basic_scene() -> SceneCulling {
    SceneCulling::default()
        .with_drawable(1, unlit(RenderQueue::GEOMETRY), Vec3::new(0.0, 0.0, 10.0))
        .with_drawable(2, unlit(RenderQueue::GEOMETRY), Vec3::new(0.0, 0.0, 3.0))
        .with_drawable(3, unlit(RenderQueue::TRANSPARENT), Vec3::new(0.0, 0.0, 4.0))
        .with_drawable(4, unlit(RenderQueue::TRANSPARENT), Vec3::new(0.0, 0.0, 8.0))
}

fn main_camera() -> Camera {
    Camera::new(0, "Main", Vec3::ZERO)
}

// --- Tests ---

#[test]
fn test_zero_lights_sets_count_signal_and_skips_uploads() {
    init_logger();
    let mut agent = agent(PipelineSettings::default());
    let mut context = RecordingContext::default();
    let mut culling = basic_scene();

    agent.render_frame(&mut context, &mut culling, &[main_camera()]);

    let executions = context.executions();
    assert_eq!(executions.len(), 2);
    assert_eq!(
        executions[0],
        &[
            Command::ClearRenderTarget {
                clear_depth: true,
                clear_color: true,
                background: main_camera().background_color,
            },
            Command::SetGlobalVector {
                id: ShaderPropertyId::LIGHT_INDICES_OFFSET_AND_COUNT,
                value: Vec4::ZERO,
            },
            Command::BeginSample(RENDER_CAMERA_SAMPLE.into()),
        ]
    );
    assert_eq!(executions[1], &[Command::EndSample(RENDER_CAMERA_SAMPLE.into())]);
    assert_eq!(
        context.count(|e| matches!(e, Event::Execute(c) if c.iter().any(|c| matches!(c, Command::SetGlobalVectorArray { .. })))),
        0
    );

    let draws = context.draws();
    assert_eq!(draws.len(), 2);
    assert_eq!(draws[0].label, "Opaque");
    assert_eq!(draws[0].drawables, vec![DrawableId(2), DrawableId(1)]);
    assert!(draws[0].per_object_data.is_empty());
    assert_eq!(draws[1].label, "Transparent");
    assert_eq!(draws[1].drawables, vec![DrawableId(4), DrawableId(3)]);
    assert_eq!(context.count(|e| matches!(e, Event::Skybox(_))), 1);
}

#[test]
fn test_camera_sequence_order() {
    init_logger();
    let mut agent = agent(PipelineSettings::default());
    let mut context = RecordingContext::default();
    let mut culling = basic_scene();
    let camera = main_camera();

    agent.render_frame(&mut context, &mut culling, std::slice::from_ref(&camera));

    let kinds: Vec<&str> = context
        .events
        .iter()
        .map(|e| match e {
            Event::BeginFrame(_) => "begin_frame",
            Event::EndFrame => "end_frame",
            Event::BeginCamera(_) => "begin_camera",
            Event::EndCamera(_) => "end_camera",
            Event::SetupCamera(_) => "setup",
            Event::Execute(_) => "execute",
            Event::Draw(r) => r.label,
            Event::Skybox(_) => "sky",
            Event::Submit => "submit",
        })
        .collect();
    assert_eq!(
        kinds,
        vec![
            "begin_frame",
            "begin_camera",
            "setup",
            "execute",
            "Opaque",
            "sky",
            "Transparent",
            "execute",
            "end_camera",
            "submit",
            "end_frame",
        ]
    );
}

#[test]
fn test_single_directional_light_fills_slot_zero() {
    init_logger();
    let transform = AffineTransform::from_rotation_x(FRAC_PI_2);
    let mut culling = basic_scene().with_light(Light::directional(LinearRgba::WHITE, 1.0), transform);
    let mut agent = agent(PipelineSettings::default());
    let mut context = RecordingContext::default();

    agent.render_frame(&mut context, &mut culling, &[main_camera()]);

    let colors = context.uploaded(ShaderPropertyId::VISIBLE_LIGHT_COLORS).unwrap();
    let directions = context
        .uploaded(ShaderPropertyId::VISIBLE_LIGHT_DIRECTIONS_OR_POSITIONS)
        .unwrap();
    let attenuations = context.uploaded(ShaderPropertyId::VISIBLE_LIGHT_ATTENUATIONS).unwrap();
    let spots = context.uploaded(ShaderPropertyId::VISIBLE_LIGHT_SPOT_DIRECTIONS).unwrap();

    assert_eq!(colors.len(), 16);
    assert_eq!(colors[0], Vec4::new(1.0, 1.0, 1.0, 1.0));
    assert_eq!(attenuations[0], Vec4::new(0.0, 0.0, 0.0, 1.0));
    let expected = -transform.forward();
    assert_abs_diff_eq!(directions[0].x, expected.x, epsilon = 1e-6);
    assert_abs_diff_eq!(directions[0].y, expected.y, epsilon = 1e-6);
    assert_abs_diff_eq!(directions[0].z, expected.z, epsilon = 1e-6);
    assert_eq!(directions[0].w, 0.0);
    assert_eq!(spots[0], Vec4::ZERO);
    assert!(colors[1..].iter().all(|c| *c == Vec4::ZERO));
    assert!(attenuations[1..].iter().all(|a| *a == Vec4::W));

    // Arrays land inside the camera's sample scope and no count signal is set.
    let first = context.executions()[0];
    assert!(matches!(first[1], Command::BeginSample(_)));
    assert!(!first
        .iter()
        .any(|c| matches!(c, Command::SetGlobalVector { .. })));

    let draws = context.draws();
    assert!(draws[0].per_object_data.contains(PerObjectData::LIGHT_INDICES));
    assert!(draws[0].light_slots.iter().all(|slots| slots == &vec![0]));
}

#[test]
fn test_light_overflow_truncates_and_unassigns() {
    init_logger();
    let mut culling = basic_scene();
    for i in 0..6 {
        culling = culling.with_light(
            Light::point(LinearRgba::WHITE, 1.0, 5.0),
            AffineTransform::from_translation(Vec3::new(i as f32, 1.0, 0.0)),
        );
    }
    let settings = PipelineSettings {
        max_visible_lights: 4,
        ..Default::default()
    };
    let mut agent = agent(settings);
    let mut context = RecordingContext::default();

    agent.render_frame(&mut context, &mut culling, &[main_camera()]);

    let positions = context
        .uploaded(ShaderPropertyId::VISIBLE_LIGHT_DIRECTIONS_OR_POSITIONS)
        .unwrap();
    assert_eq!(positions.len(), 4);
    for (slot, position) in positions.iter().enumerate() {
        assert_eq!(*position, Vec4::new(slot as f32, 1.0, 0.0, 1.0));
    }

    assert_eq!(agent.culling_results().light_index_map(), &[0, 1, 2, 3, -1, -1]);
    for draw in context.draws() {
        for slots in &draw.light_slots {
            assert_eq!(slots, &vec![0, 1, 2, 3]);
        }
    }

    let stats = agent.last_frame_stats();
    assert_eq!(stats.lights_packed, 4);
    assert_eq!(stats.lights_dropped, 2);
}

#[test]
fn test_camera_without_culling_parameters_is_skipped() {
    init_logger();
    let mut broken = Camera::new(1, "Broken", Vec3::ZERO);
    broken.far_clip = 0.0;
    let cameras = [broken, Camera::new(2, "Second", Vec3::new(0.0, 0.0, 20.0))];

    let mut agent = agent(PipelineSettings::default());
    let mut context = RecordingContext::default();
    let mut culling = basic_scene();

    agent.render_frame(&mut context, &mut culling, &cameras);

    let mentions_broken = |e: &Event| {
        matches!(e,
            Event::BeginCamera(id) | Event::EndCamera(id) | Event::SetupCamera(id) | Event::Skybox(id)
            if *id == CameraId(1))
    };
    assert_eq!(context.count(mentions_broken), 0);
    assert_eq!(context.count(|e| matches!(e, Event::BeginCamera(CameraId(2)))), 1);
    assert_eq!(context.executions().len(), 2);
    assert_eq!(context.draws().len(), 2);
    // Seen from z = 20, the far transparent drawable is drawn last.
    assert_eq!(context.draws()[1].drawables, vec![DrawableId(3), DrawableId(4)]);

    let stats = agent.last_frame_stats();
    assert_eq!(stats.cameras_rendered, 1);
    assert_eq!(stats.cameras_skipped, 1);
}

#[test]
fn test_submit_happens_once_per_frame() {
    init_logger();
    let mut agent = agent(PipelineSettings::default());
    let mut context = RecordingContext::default();
    let mut culling = basic_scene();
    let cameras = [
        Camera::new(0, "A", Vec3::ZERO),
        Camera::new(1, "B", Vec3::ZERO),
        Camera::new(2, "C", Vec3::ZERO),
    ];

    agent.render_frame(&mut context, &mut culling, &cameras);
    assert_eq!(context.count(|e| matches!(e, Event::Submit)), 1);
    assert_eq!(context.events.last(), Some(&Event::EndFrame));
    assert_eq!(context.events[0], Event::BeginFrame(3));

    let mut skipped = Camera::new(3, "Skipped", Vec3::ZERO);
    skipped.near_clip = 0.0;
    let mut context = RecordingContext::default();
    agent.render_frame(&mut context, &mut culling, &[skipped]);
    assert_eq!(
        context.events,
        vec![Event::BeginFrame(1), Event::Submit, Event::EndFrame]
    );
}

#[test]
fn test_each_camera_gets_balanced_sample_scope() {
    init_logger();
    let mut agent = agent(PipelineSettings::default());
    let mut context = RecordingContext::default();
    let mut culling = basic_scene().with_light(Light::point(LinearRgba::WHITE, 1.0, 3.0), AffineTransform::IDENTITY);
    let cameras = [Camera::new(0, "A", Vec3::ZERO), Camera::new(1, "B", Vec3::ZERO)];

    agent.render_frame(&mut context, &mut culling, &cameras);

    let executions = context.executions();
    assert_eq!(executions.len(), 4);
    for pair in executions.chunks(2) {
        let begins = pair[0].iter().filter(|c| matches!(c, Command::BeginSample(_))).count();
        assert_eq!(begins, 1);
        assert!(matches!(pair[0][0], Command::ClearRenderTarget { .. }));
        assert_eq!(pair[1], &[Command::EndSample(RENDER_CAMERA_SAMPLE.into())]);
    }
}

#[test]
fn test_render_frame_is_idempotent() {
    init_logger();
    let mut culling = basic_scene()
        .with_light(
            Light::spot(LinearRgba::rgb(1.0, 0.5, 0.25), 2.0, 12.0, 40.0),
            AffineTransform::from_translation(Vec3::new(0.0, 4.0, 0.0)),
        )
        .with_light(Light::directional(LinearRgba::WHITE, 0.5), AffineTransform::from_rotation_y(0.7));
    let mut agent = agent(PipelineSettings {
        diagnostics: true,
        ..Default::default()
    });
    let cameras = [main_camera()];

    let mut first = RecordingContext::default();
    agent.render_frame(&mut first, &mut culling, &cameras);
    let first_buffer = agent.light_buffer().clone();

    let mut second = RecordingContext::default();
    agent.render_frame(&mut second, &mut culling, &cameras);

    assert_eq!(first_buffer.colors_bytes(), agent.light_buffer().colors_bytes());
    assert_eq!(
        first_buffer.directions_or_positions_bytes(),
        agent.light_buffer().directions_or_positions_bytes()
    );
    assert_eq!(first_buffer.attenuations_bytes(), agent.light_buffer().attenuations_bytes());
    assert_eq!(
        first_buffer.spot_directions_bytes(),
        agent.light_buffer().spot_directions_bytes()
    );
    assert_eq!(first.events, second.events);
    assert_eq!(agent.frame_count(), 2);
    assert_eq!(agent.last_frame_stats().frame_index, 1);
}

#[test]
fn test_fallback_pass_runs_only_with_diagnostics() {
    init_logger();
    let scene = || basic_scene().with_drawable(9, legacy(), Vec3::new(0.0, 0.0, 1.0));

    let mut diagnostic = agent(PipelineSettings {
        diagnostics: true,
        ..Default::default()
    });
    let mut context = RecordingContext::default();
    diagnostic.render_frame(&mut context, &mut scene(), &[main_camera()]);

    let draws = context.draws();
    assert_eq!(draws.len(), 3);
    assert_eq!(draws[2].label, "Fallback");
    assert!(draws[2].overridden);
    assert_eq!(draws[2].drawables, vec![DrawableId(9)]);
    assert!(!draws[0].drawables.contains(&DrawableId(9)));
    assert_eq!(diagnostic.last_frame_stats().fallback_draws, 1);
    assert!(diagnostic.error_material().is_some());

    let mut production = agent(PipelineSettings::default());
    let mut context = RecordingContext::default();
    production.render_frame(&mut context, &mut scene(), &[main_camera()]);
    assert!(context.draws().iter().all(|d| d.label != "Fallback"));

    // Toggling at runtime takes effect on the next frame.
    production.set_diagnostics(true);
    let mut context = RecordingContext::default();
    production.render_frame(&mut context, &mut scene(), &[main_camera()]);
    assert_eq!(context.draws().last().map(|d| d.label), Some("Fallback"));
}

#[test]
fn test_fallback_skips_materials_with_unlit_pass() {
    init_logger();
    let dual = Arc::new(Material::new(
        "dual",
        ShaderId(3),
        vec![ShaderTagId::new("SRPDefaultUnlit"), ShaderTagId::new("ForwardBase")],
    ));
    let mut culling = SceneCulling::default()
        .with_drawable(1, dual, Vec3::new(0.0, 0.0, 2.0))
        .with_drawable(2, legacy(), Vec3::new(0.0, 0.0, 5.0));
    let mut renderer = agent(PipelineSettings {
        diagnostics: true,
        ..Default::default()
    });
    let mut context = RecordingContext::default();

    renderer.render_frame(&mut context, &mut culling, &[main_camera()]);

    let draws = context.draws();
    assert_eq!(draws[0].label, "Opaque");
    assert_eq!(draws[0].drawables, vec![DrawableId(1)]);
    assert_eq!(draws[2].label, "Fallback");
    assert_eq!(draws[2].drawables, vec![DrawableId(2)]);
}

#[test]
fn test_missing_error_shader_disables_fallback() {
    init_logger();
    let settings = PipelineSettings {
        diagnostics: true,
        ..Default::default()
    };
    let mut agent = ForwardRenderAgent::new(settings, &Shaders { has_error_shader: false }).unwrap();
    let mut context = RecordingContext::default();
    let mut culling = basic_scene().with_drawable(9, legacy(), Vec3::ZERO);

    agent.render_frame(&mut context, &mut culling, &[main_camera()]);

    assert!(agent.error_material().is_none());
    assert_eq!(context.draws().len(), 2);
}

#[test]
fn test_clear_flags_follow_camera() {
    init_logger();
    let mut camera = main_camera();
    camera.clear_flags = ClearFlags::DEPTH;
    let mut agent = agent(PipelineSettings::default());
    let mut context = RecordingContext::default();

    agent.render_frame(&mut context, &mut basic_scene(), &[camera]);

    assert!(matches!(
        context.executions()[0][0],
        Command::ClearRenderTarget {
            clear_depth: true,
            clear_color: false,
            ..
        }
    ));
}

#[test]
fn test_intensity_mode_reaches_culling() {
    init_logger();
    let mut culling = basic_scene().with_light(Light::point(LinearRgba::rgb(0.214, 0.214, 0.214), 2.0, 5.0), AffineTransform::IDENTITY);

    let mut linear = agent(PipelineSettings::default());
    linear.render_frame(&mut RecordingContext::default(), &mut culling, &[main_camera()]);
    assert!(culling.last_parameters.as_ref().unwrap().lights_use_linear_intensity);
    let linear_red = linear.light_buffer().colors()[0].x;

    let mut gamma = agent(PipelineSettings {
        use_linear_light_intensity: false,
        ..Default::default()
    });
    gamma.render_frame(&mut RecordingContext::default(), &mut culling, &[main_camera()]);
    assert!(!culling.last_parameters.as_ref().unwrap().lights_use_linear_intensity);
    let gamma_red = gamma.light_buffer().colors()[0].x;

    assert_abs_diff_eq!(linear_red, 0.428, epsilon = 1e-6);
    assert!(gamma_red > linear_red);
}

#[test]
fn test_invalid_settings_are_rejected() {
    let settings = PipelineSettings {
        max_visible_lights: 0,
        ..Default::default()
    };
    let result = ForwardRenderAgent::new(settings, &Shaders { has_error_shader: true });
    assert!(matches!(
        result,
        Err(SettingsError::InvalidLightCapacity { value: 0, .. })
    ));
}
