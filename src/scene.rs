//! Scene assembly and the per-frame state machine.
//!
//! [`SceneState`] owns everything that changes after startup: the clock, the
//! pendulum and wave-cube node handles, and the pending model load. All
//! scene-graph mutation goes through its `step` and `handle_click`
//! operations, both called from the render loop.

use std::f32::consts::FRAC_PI_2;

use glamx::{Quat, Vec2, Vec3};
use kiss3d::camera::Camera3d;
use kiss3d::color::{Color, YELLOW};
use kiss3d::light::Light;
use kiss3d::resource::TextureManager;
use kiss3d::scene::SceneNode3d;
use log::{error, info};

use crate::animation::{swing_angle, wave_scale, Clock};
use crate::config::{Quality, SceneConfig};
use crate::loader::{LoadedModel, ModelLoader};
use crate::picking::{pick_nearest, Aabb, Ray};
use crate::texture;

/// Window clear color (#202124).
pub const BACKGROUND: Color = Color::new(0.1254902, 0.12941177, 0.14117648, 1.0);
/// Ambient light level matching the reference scene.
pub const AMBIENT_INTENSITY: f32 = 0.4;
/// Initial camera eye position; the orbit target is the origin.
pub const CAMERA_EYE: Vec3 = Vec3::new(0.0, 5.0, 15.0);

const ROD_COLOR: Color = Color::new(0.6666667, 0.6666667, 0.6666667, 1.0);
const BOB_COLOR: Color = Color::new(1.0, 0.26666668, 0.0, 1.0);
const CUBE_COLOR: Color = Color::new(0.0, 0.7372549, 0.83137256, 1.0);
const HIGHLIGHT_COLOR: Color = YELLOW;

const ROD_RADIUS: f32 = 0.05;
const ROD_LENGTH: f32 = 4.0;
const BOB_RADIUS: f32 = 0.5;

const CUBE_WIDTH: f32 = 0.5;
const CUBE_HEIGHT: f32 = 1.0;
const CUBE_ROW_Z: f32 = -5.0;

const GROUND_SIZE: f32 = 30.0;
const GROUND_Y: f32 = -4.5;
const GROUND_TILES: u32 = 10;

const MODEL_SCALE: f32 = 0.5;
// Places the model next to the main pendulum; kept as a literal offset.
const MODEL_OFFSET: Vec3 = Vec3::new(3.0, 0.0, 0.0);

/// The swinging rod-and-bob assembly.
///
/// The pivot group sits at the scene origin with the rod and bob hanging
/// below it, so rotating the pivot about Z swings the whole assembly.
struct Pendulum {
    pivot: SceneNode3d,
}

impl Pendulum {
    fn new(root: &mut SceneNode3d, quality: Quality) -> Pendulum {
        let mut pivot = root.add_group();
        let mut rod = pivot
            .add_cylinder(ROD_RADIUS, ROD_LENGTH)
            .set_position(Vec3::new(0.0, -ROD_LENGTH / 2.0, 0.0))
            .set_color(ROD_COLOR);
        let mut bob = pivot
            .add_sphere(BOB_RADIUS)
            .set_position(Vec3::new(0.0, -ROD_LENGTH, 0.0))
            .set_color(BOB_COLOR);
        if quality == Quality::Rich {
            rod.set_metallic(0.9).set_roughness(0.3);
            bob.set_metallic(0.4).set_roughness(0.5);
        }
        Pendulum { pivot }
    }

    fn set_swing(&mut self, angle: f32) {
        self.pivot
            .set_rotation(Quat::from_axis_angle(Vec3::Z, angle));
    }
}

/// The row of vertically oscillating cubes.
///
/// Scales are mirrored on the CPU so hit volumes can be derived without
/// reading the scene graph back.
struct WaveCubes {
    nodes: Vec<SceneNode3d>,
    scales: Vec<f32>,
}

/// Center of cube `index` in a row of `count`.
fn cube_center(index: usize, count: usize) -> Vec3 {
    Vec3::new(index as f32 - count as f32 / 2.0, 0.0, CUBE_ROW_Z)
}

/// Exact hit volume of a cube whose vertical scale is `y_scale`. The cubes
/// never rotate and scale only along Y, so this is not an approximation.
fn cube_aabb(center: Vec3, y_scale: f32) -> Aabb {
    Aabb::from_half_extents(
        center,
        Vec3::new(
            CUBE_WIDTH / 2.0,
            CUBE_HEIGHT * y_scale / 2.0,
            CUBE_WIDTH / 2.0,
        ),
    )
}

impl WaveCubes {
    fn new(root: &mut SceneNode3d, config: &SceneConfig) -> WaveCubes {
        let count = config.cube_count;
        let mut nodes = Vec::with_capacity(count);
        for i in 0..count {
            let mut node = root
                .add_cube(CUBE_WIDTH, CUBE_HEIGHT, CUBE_WIDTH)
                .set_position(cube_center(i, count))
                .set_color(CUBE_COLOR);
            if config.quality == Quality::Rich {
                node.set_metallic(0.2).set_roughness(0.4);
            }
            nodes.push(node);
        }
        WaveCubes {
            nodes,
            scales: vec![1.0; count],
        }
    }

    fn update(&mut self, time: f32, phase_step: f32, amplitude: f32) {
        for (i, node) in self.nodes.iter_mut().enumerate() {
            let scale = wave_scale(time, i, phase_step, amplitude);
            node.set_local_scale(CUBE_WIDTH, CUBE_HEIGHT * scale, CUBE_WIDTH);
            self.scales[i] = scale;
        }
    }

    fn aabbs(&self) -> Vec<Aabb> {
        let count = self.nodes.len();
        self.scales
            .iter()
            .enumerate()
            .map(|(i, &scale)| cube_aabb(cube_center(i, count), scale))
            .collect()
    }

    fn highlight(&mut self, index: usize) {
        self.nodes[index].set_color(HIGHLIGHT_COLOR);
    }
}

fn add_lights(root: &mut SceneNode3d, quality: Quality) {
    root.add_light(
        Light::directional(Vec3::new(-1.0, -1.0, -1.0).normalize()).with_intensity(1.0),
    )
    .set_position(Vec3::new(10.0, 10.0, 10.0));
    if quality == Quality::Rich {
        // Warm fill from the opposite side.
        root.add_light(
            Light::point(40.0)
                .with_color(Color::new(1.0, 0.85, 0.6, 1.0))
                .with_intensity(3.0),
        )
        .set_position(Vec3::new(-8.0, 6.0, 8.0));
    }
}

fn add_ground(root: &mut SceneNode3d, config: &SceneConfig) {
    let img = texture::ground_image(&config.ground_texture, GROUND_TILES);
    let tex = TextureManager::get_global_manager(|tm| {
        tm.set_generate_mipmaps(config.quality == Quality::Rich);
        tm.add_image(image::DynamicImage::ImageRgba8(img.clone()), "ground")
    });
    root.add_quad(GROUND_SIZE, GROUND_SIZE, 1, 1)
        .set_rotation(Quat::from_axis_angle(Vec3::X, -FRAC_PI_2))
        .set_position(Vec3::new(0.0, GROUND_Y, 0.0))
        .set_texture(tex);
}

fn attach_model(root: &mut SceneNode3d, model: LoadedModel) -> SceneNode3d {
    let mut group = root
        .add_group()
        .set_local_scale(MODEL_SCALE, MODEL_SCALE, MODEL_SCALE)
        .set_position(MODEL_OFFSET);
    for part in model.parts {
        group.add_render_mesh(part.mesh, Vec3::ONE);
    }
    info!("attached model {:?}", model.path);
    group
}

/// Everything in the scene that changes after startup.
pub struct SceneState {
    config: SceneConfig,
    clock: Clock,
    root: SceneNode3d,
    pendulum: Pendulum,
    cubes: WaveCubes,
    loader: Option<ModelLoader>,
    model: Option<SceneNode3d>,
}

impl SceneState {
    /// Builds the whole scene under `root` and kicks off the background
    /// model load.
    pub fn new(root: &mut SceneNode3d, config: SceneConfig) -> SceneState {
        add_lights(root, config.quality);
        add_ground(root, &config);
        let pendulum = Pendulum::new(root, config.quality);
        let cubes = WaveCubes::new(root, &config);
        let loader = Some(ModelLoader::spawn(&config.model_path));
        SceneState {
            clock: Clock::new(config.time_step),
            root: root.clone(),
            pendulum,
            cubes,
            loader,
            model: None,
            config,
        }
    }

    /// One animation tick: advances the clock, poses the pendulum, scales
    /// the cubes, then lets a finished model load attach itself. Rendering
    /// and camera damping happen in the caller's render call.
    pub fn step(&mut self) {
        let time = self.clock.tick();
        self.pendulum
            .set_swing(swing_angle(time, self.config.swing_amplitude));
        self.cubes
            .update(time, self.config.wave_phase_step, self.config.wave_amplitude);
        self.poll_model();
    }

    fn poll_model(&mut self) {
        let Some(loader) = self.loader.as_mut() else {
            return;
        };
        match loader.poll() {
            Some(Ok(model)) => {
                self.model = Some(attach_model(&mut self.root, model));
                self.loader = None;
            }
            Some(Err(err)) => {
                error!("model load failed: {err}");
                self.loader = None;
            }
            None => {}
        }
    }

    /// Ray-tests a click at `cursor` against the wave cubes only and paints
    /// the nearest hit yellow. Returns the index of the highlighted cube.
    /// Re-clicking a highlighted cube re-applies the same color.
    pub fn handle_click(
        &mut self,
        camera: &impl Camera3d,
        cursor: Vec2,
        window_size: Vec2,
    ) -> Option<usize> {
        let (origin, dir) = camera.unproject(cursor, window_size);
        let hit = pick_nearest(&Ray::new(origin, dir), &self.cubes.aabbs());
        if let Some((index, _)) = hit {
            self.cubes.highlight(index);
        }
        hit.map(|(index, _)| index)
    }

    /// Current clock value.
    pub fn time(&self) -> f32 {
        self.clock.time()
    }

    /// Whether the background-loaded model is part of the scene yet.
    pub fn model_attached(&self) -> bool {
        self.model.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cubes_are_centered_on_the_row() {
        // x = i - count / 2 reproduces the reference placement at 30 cubes.
        assert_eq!(cube_center(0, 30).x, -15.0);
        assert_eq!(cube_center(15, 30).x, 0.0);
        assert_eq!(cube_center(29, 30).x, 14.0);
        assert_eq!(cube_center(7, 30).z, CUBE_ROW_Z);
    }

    #[test]
    fn hit_volume_tracks_the_vertical_scale() {
        let aabb = cube_aabb(cube_center(15, 30), 1.5);
        assert_eq!(aabb.mins, Vec3::new(-0.25, -0.75, -5.25));
        assert_eq!(aabb.maxs, Vec3::new(0.25, 0.75, -4.75));

        let squashed = cube_aabb(cube_center(15, 30), 0.5);
        assert_eq!(squashed.mins.y, -0.25);
        assert_eq!(squashed.maxs.y, 0.25);
    }

    #[test]
    fn taller_cubes_are_easier_to_hit_from_the_side() {
        let center = cube_center(15, 30);
        // Grazes one third of a unit above the cube's resting top face.
        let ray = Ray::new(
            Vec3::new(center.x, 0.6, 5.0),
            Vec3::new(0.0, 0.0, -1.0),
        );
        assert!(cube_aabb(center, 0.8).cast_ray(&ray).is_none());
        assert!(cube_aabb(center, 1.4).cast_ray(&ray).is_some());
    }
}
