use std::path::Path;

use image::{ImageBuffer, Rgb};
use palette::{Gradient, LinSrgb};

use crate::error::{Result, TerrainError};
use crate::tile::Terrain;
use crate::world::World;

// How far tree crowns are darkened towards black
const TREE_SHADE: f32 = 0.55;

// Base tile colour
pub fn terrain_color(t: Terrain) -> LinSrgb {
    match t {
        Terrain::Grass => LinSrgb::new(0.30, 0.69, 0.31),
        Terrain::Water => LinSrgb::new(0.13, 0.59, 0.95),
        Terrain::Sand => LinSrgb::new(0.94, 0.87, 0.60),
        Terrain::Forest => LinSrgb::new(0.18, 0.49, 0.20),
        Terrain::DenseForest => LinSrgb::new(0.11, 0.37, 0.13),
    }
}

fn to_rgb(c: LinSrgb) -> [u8; 3] {
    let c = c.into_format::<u8>();
    [c.red, c.green, c.blue]
}

// Render a world into an RGB byte buffer of
// (width * tile_size) x (height * tile_size) pixels,
// trees drawn as small dark squares at their offsets.
pub fn to_terrain_image(world: &World, tile_size: usize) -> Vec<u8> {
    let tile_size = tile_size.max(1);
    let img_w = world.width() * tile_size;
    let img_h = world.height() * tile_size;
    let mut buf = vec![0u8; img_w * img_h * 3];
    let tree = (tile_size / 8).max(1);

    let mut put = |px: usize, py: usize, rgb: [u8; 3]| {
        if px < img_w && py < img_h {
            let i = (py * img_w + px) * 3;
            buf[i..i + 3].copy_from_slice(&rgb);
        }
    };

    for (x, y, t) in world.terrain().cells() {
        let base = terrain_color(t);
        let fill = to_rgb(base);
        for dy in 0..tile_size {
            for dx in 0..tile_size {
                put(x * tile_size + dx, y * tile_size + dy, fill);
            }
        }

        let crown = Gradient::new(vec![base, LinSrgb::new(0.0, 0.0, 0.0)]).get(TREE_SHADE);
        let crown = to_rgb(crown);
        for offset in world.decorations_at(x, y) {
            let cx = x * tile_size + (offset.x * tile_size as f32) as usize;
            let cy = y * tile_size + (offset.y * tile_size as f32) as usize;
            for dy in 0..tree {
                for dx in 0..tree {
                    put(cx + dx, cy + dy, crown);
                }
            }
        }
    }
    buf
}

pub fn save_png(world: &World, tile_size: usize, path: impl AsRef<Path>) -> Result<()> {
    let tile_size = tile_size.max(1);
    let buf = to_terrain_image(world, tile_size);
    let img: ImageBuffer<Rgb<u8>, Vec<u8>> = ImageBuffer::from_raw(
        (world.width() * tile_size) as u32,
        (world.height() * tile_size) as u32,
        buf,
    )
    .ok_or_else(|| TerrainError::MalformedGrid("image buffer size mismatch".into()))?;
    img.save(path)?;
    Ok(())
}
