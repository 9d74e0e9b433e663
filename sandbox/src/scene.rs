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

//! A tiny scene and a distance-based culling service over it.

use lumen_core::math::{AffineTransform, LinearRgba, Vec3, FRAC_PI_2, FRAC_PI_4};
use lumen_core::renderer::api::{
    Camera, CullingParameters, CullingResults, Drawable, DrawableId, Material, RenderQueue,
    ShaderId, ShaderTagId,
};
use lumen_core::renderer::{CullingService, Light, VisibleLight};
use std::sync::Arc;

struct SceneObject {
    id: DrawableId,
    material: Arc<Material>,
    position: Vec3,
}

/// Objects and lights, culled by distance to the camera.
pub struct Scene {
    objects: Vec<SceneObject>,
    lights: Vec<(Light, AffineTransform)>,
}

impl Scene {
    /// A row of cubes, a glass pane, a legacy-shaded statue and a handful of lights.
    pub fn demo() -> Self {
        let unlit = ShaderTagId::new("SRPDefaultUnlit");
        let opaque = Arc::new(Material::new("Stone", ShaderId(1), vec![unlit.clone()]));
        let glass = Arc::new(
            Material::new("Glass", ShaderId(2), vec![unlit]).with_render_queue(RenderQueue::TRANSPARENT),
        );
        let legacy = Arc::new(Material::new(
            "OldStatue",
            ShaderId(3),
            vec![ShaderTagId::new("ForwardBase")],
        ));

        let mut objects: Vec<SceneObject> = (0..5)
            .map(|i| SceneObject {
                id: DrawableId(i),
                material: Arc::clone(&opaque),
                position: Vec3::new(i as f32 * 2.0 - 4.0, 0.0, 6.0),
            })
            .collect();
        objects.push(SceneObject {
            id: DrawableId(10),
            material: glass,
            position: Vec3::new(0.0, 1.0, 3.0),
        });
        objects.push(SceneObject {
            id: DrawableId(20),
            material: legacy,
            position: Vec3::new(3.0, 0.0, 9.0),
        });

        let mut lights = vec![(
            Light::directional(LinearRgba::rgb(1.0, 0.96, 0.84), 1.0),
            AffineTransform::from_rotation_x(FRAC_PI_4),
        )];
        for i in 0..4 {
            lights.push((
                Light::point(LinearRgba::rgb(0.2, 0.4, 1.0), 2.0, 6.0),
                AffineTransform::from_translation(Vec3::new(i as f32 * 3.0 - 4.5, 2.0, 6.0)),
            ));
        }
        lights.push((
            Light::spot(LinearRgba::WHITE, 4.0, 15.0, 35.0),
            AffineTransform::from_translation(Vec3::new(0.0, 8.0, 6.0))
                .then(&AffineTransform::from_rotation_x(FRAC_PI_2)),
        ));

        Self { objects, lights }
    }
}

/// Culls objects beyond `view_distance` and local lights that cannot reach that far.
pub struct DistanceCulling {
    scene: Scene,
    view_distance: f32,
}

impl DistanceCulling {
    /// Wraps `scene`.
    pub fn new(scene: Scene, view_distance: f32) -> Self {
        Self {
            scene,
            view_distance,
        }
    }
}

impl CullingService for DistanceCulling {
    fn try_get_culling_parameters(&self, camera: &Camera) -> Option<CullingParameters> {
        if !camera.has_valid_frustum() {
            return None;
        }
        Some(CullingParameters {
            camera_id: camera.id,
            camera_position: camera.position,
            lights_use_linear_intensity: true,
        })
    }

    fn cull(&mut self, parameters: &CullingParameters, results: &mut CullingResults) {
        let eye = parameters.camera_position;

        // (world position, range) of each light pushed so far, `None` range for directionals.
        let mut reaches: Vec<(Vec3, Option<f32>)> = Vec::new();
        for (light, transform) in &self.scene.lights {
            let position = transform.translation();
            let range = light.light_type.range();
            if let Some(range) = range {
                if position.distance_squared(eye).sqrt() - range > self.view_distance {
                    continue;
                }
            }
            results.push_visible_light(VisibleLight::from_light(
                light,
                *transform,
                parameters.lights_use_linear_intensity,
            ));
            reaches.push((position, range));
        }

        let max_sq = self.view_distance * self.view_distance;
        for object in &self.scene.objects {
            if object.position.distance_squared(eye) > max_sq {
                continue;
            }
            let light_indices = reaches
                .iter()
                .enumerate()
                .filter(|(_, (position, range))| match range {
                    Some(range) => position.distance_squared(object.position) <= range * range,
                    None => true,
                })
                .map(|(visible_index, _)| visible_index)
                .collect();
            results.push_drawable(Drawable {
                id: object.id,
                material: Arc::clone(&object.material),
                position: object.position,
                light_indices,
            });
        }
    }
}
