//! Ground texture preparation.
//!
//! kiss3d samples file textures with clamped addressing, so the ground's
//! 10x10 checker repeat cannot come from UV wrapping; the repeat is baked
//! into the uploaded image instead. The texture file itself is optional: a
//! generated checkerboard stands in when it cannot be read, keeping texture
//! problems non-fatal.

use image::{imageops, Rgba, RgbaImage};
use log::warn;
use std::path::Path;

/// Largest edge, in texels, of the image uploaded for the ground.
const MAX_UPLOAD: u32 = 2560;

const LIGHT_SQUARE: Rgba<u8> = Rgba([200, 200, 200, 255]);
const DARK_SQUARE: Rgba<u8> = Rgba([90, 90, 90, 255]);

/// The image to upload for the ground plane: the texture at `path` repeated
/// `tiles` times along both axes, or a generated checkerboard with the same
/// tiling when the file is missing or undecodable.
pub fn ground_image(path: &Path, tiles: u32) -> RgbaImage {
    let base = match image::open(path) {
        Ok(img) => img.to_rgba8(),
        Err(err) => {
            warn!("ground texture {path:?} unavailable ({err}); using a generated checkerboard");
            checkerboard(128, 2)
        }
    };
    tile(&base, tiles)
}

/// A `squares` x `squares` gray checkerboard of `size` x `size` texels.
pub fn checkerboard(size: u32, squares: u32) -> RgbaImage {
    let cell = (size / squares.max(1)).max(1);
    RgbaImage::from_fn(size, size, |x, y| {
        if ((x / cell) + (y / cell)) % 2 == 0 {
            LIGHT_SQUARE
        } else {
            DARK_SQUARE
        }
    })
}

/// Repeats `base` `tiles` times along both axes. The source is downscaled
/// first when the result would exceed [`MAX_UPLOAD`] on its longest edge.
pub fn tile(base: &RgbaImage, tiles: u32) -> RgbaImage {
    let tiles = tiles.max(1);
    let (w, h) = base.dimensions();
    if w == 0 || h == 0 {
        return base.clone();
    }
    let src;
    if w.max(h) * tiles > MAX_UPLOAD {
        let target = (MAX_UPLOAD / tiles).max(1) as u64;
        let longest = w.max(h) as u64;
        let sw = ((w as u64 * target / longest) as u32).max(1);
        let sh = ((h as u64 * target / longest) as u32).max(1);
        src = imageops::resize(base, sw, sh, imageops::FilterType::Triangle);
    } else {
        src = base.clone();
    }
    let (sw, sh) = src.dimensions();
    RgbaImage::from_fn(sw * tiles, sh * tiles, |x, y| *src.get_pixel(x % sw, y % sh))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn shipped_checker() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("media/checker.png")
    }

    #[test]
    fn checkerboard_alternates_squares() {
        let img = checkerboard(8, 2);
        assert_eq!(img.dimensions(), (8, 8));
        assert_eq!(*img.get_pixel(0, 0), LIGHT_SQUARE);
        assert_eq!(*img.get_pixel(4, 0), DARK_SQUARE);
        assert_eq!(*img.get_pixel(0, 4), DARK_SQUARE);
        assert_eq!(*img.get_pixel(4, 4), LIGHT_SQUARE);
        assert_eq!(*img.get_pixel(3, 3), LIGHT_SQUARE);
    }

    #[test]
    fn tiling_repeats_the_source_pixels() {
        let mut base = RgbaImage::new(2, 2);
        base.put_pixel(0, 0, Rgba([1, 0, 0, 255]));
        base.put_pixel(1, 0, Rgba([0, 2, 0, 255]));
        base.put_pixel(0, 1, Rgba([0, 0, 3, 255]));
        base.put_pixel(1, 1, Rgba([4, 4, 4, 255]));

        let tiled = tile(&base, 3);
        assert_eq!(tiled.dimensions(), (6, 6));
        for ty in 0..3 {
            for tx in 0..3 {
                assert_eq!(*tiled.get_pixel(2 * tx, 2 * ty), *base.get_pixel(0, 0));
                assert_eq!(
                    *tiled.get_pixel(2 * tx + 1, 2 * ty + 1),
                    *base.get_pixel(1, 1)
                );
            }
        }
    }

    #[test]
    fn oversized_sources_are_downscaled_before_tiling() {
        let base = RgbaImage::new(600, 600);
        let tiled = tile(&base, 10);
        // 600 * 10 exceeds the upload cap, so the source shrinks to 256.
        assert_eq!(tiled.dimensions(), (2560, 2560));
    }

    #[test]
    fn missing_file_falls_back_to_a_checkerboard() {
        let img = ground_image(Path::new("media/no-such-texture.png"), 10);
        // 128-texel fallback tiled 10x.
        assert_eq!(img.dimensions(), (1280, 1280));
        assert_eq!(*img.get_pixel(0, 0), LIGHT_SQUARE);
        assert_eq!(*img.get_pixel(64, 0), DARK_SQUARE);
        // The pattern repeats across tile boundaries.
        assert_eq!(*img.get_pixel(128, 0), LIGHT_SQUARE);
    }

    #[test]
    fn shipped_texture_loads_and_tiles() {
        let img = ground_image(&shipped_checker(), 10);
        assert_eq!(img.dimensions(), (1280, 1280));
    }
}
