//! Scene tunables.
//!
//! Everything that was a hand-picked constant in the reference scene is a
//! field here, with `Default` reproducing the reference look exactly. The
//! animation speed is deliberately frame-coupled (see [`crate::animation`]),
//! so `time_step` is a per-frame increment, not a duration.

use std::path::PathBuf;

/// Visual richness preset.
///
/// The scene ships in two looks that differ only in lighting and material
/// richness. `Basic` is the flat variant; `Rich` adds a warm fill light,
/// metallic/roughness tuning on the pendulum and cubes, and mipmapped
/// ground texturing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Quality {
    Basic,
    Rich,
}

/// Tunables of the demo scene.
#[derive(Clone, Debug)]
pub struct SceneConfig {
    /// Clock increment per rendered frame.
    pub time_step: f32,
    /// Peak pendulum deflection in radians.
    pub swing_amplitude: f32,
    /// Peak deviation of a cube's vertical scale from 1.
    pub wave_amplitude: f32,
    /// Phase lag between two neighboring cubes, in radians.
    pub wave_phase_step: f32,
    /// Number of cubes in the wave row. Fixed once the scene is built.
    pub cube_count: usize,
    /// Visual richness preset.
    pub quality: Quality,
    /// Wavefront OBJ model attached next to the pendulum once its
    /// background load completes. Optional at runtime: a missing or broken
    /// file is logged and the scene runs without it.
    pub model_path: PathBuf,
    /// Ground texture image. Optional at runtime: a generated checkerboard
    /// stands in when the file cannot be read.
    pub ground_texture: PathBuf,
}

impl Default for SceneConfig {
    fn default() -> Self {
        SceneConfig {
            time_step: 0.01,
            swing_amplitude: 0.5,
            wave_amplitude: 0.5,
            wave_phase_step: 0.3,
            cube_count: 30,
            quality: Quality::Basic,
            model_path: PathBuf::from("media/pendulum.obj"),
            ground_texture: PathBuf::from("media/checker.png"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_reference_scene() {
        let config = SceneConfig::default();
        assert_eq!(config.time_step, 0.01);
        assert_eq!(config.swing_amplitude, 0.5);
        assert_eq!(config.wave_amplitude, 0.5);
        assert_eq!(config.wave_phase_step, 0.3);
        assert_eq!(config.cube_count, 30);
        assert_eq!(config.quality, Quality::Basic);
    }
}
