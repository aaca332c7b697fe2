/*!
# pendulum-waves

A small animated 3D scene built on [kiss3d](https://docs.rs/kiss3d): a
swinging pendulum, a row of thirty cubes carrying a traveling wave, a
textured ground plane, and an optional model loaded in the background.
Left-clicking a cube paints it yellow; the mouse orbits the camera.

The crate splits into GPU-free logic and scene plumbing:

* [`animation`] — the frame-coupled clock and the pendulum/wave formulas.
* [`picking`] — ray/box tests backing click-to-highlight.
* [`loader`] — background OBJ parsing with non-fatal failure.
* [`texture`] — ground texture tiling with a generated fallback.
* [`config`] — every tunable of the scene, with reference defaults.
* [`scene`] — the scene graph assembly and the per-frame [`scene::SceneState`].

The first five modules never touch the GPU, so all the observable math of
the scene is testable headless.
*/

pub mod animation;
pub mod config;
pub mod loader;
pub mod picking;
pub mod scene;
pub mod texture;
