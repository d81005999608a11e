use std::path::Path;

use terrain::utils::save_png;
use terrain::{GenerationConfig, Terrain, World};

// Usage: render_world [config.toml]
fn main() -> terrain::Result<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => GenerationConfig::load(path)?,
        None => GenerationConfig::default(),
    };

    // Generate a 160×120 world
    let world = World::from_seed(160, 120, &config, 2025)?;

    for t in Terrain::ALL {
        println!("{:>12}: {}", format!("{:?}", t), world.terrain().count(t));
    }
    println!("{:>12}: {}", "trees", world.decorations().total());

    // 8px tiles so trees are visible
    let path = Path::new("world.png");
    save_png(&world, 8, path)?;
    println!("Saved world image to {:?}", path);
    Ok(())
}
