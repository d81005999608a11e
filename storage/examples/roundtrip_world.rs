use storage::models::SaveDoc;
use storage::{DEFAULT_COLLECTION, DEFAULT_DB, Result, WorldStorage, uri_from_env};
use terrain::{GenerationConfig, Terrain, World};

#[tokio::main]
async fn main() -> Result<()> {
    // Generate a 128×96 world
    let config = GenerationConfig::default();
    let world = World::from_seed(128, 96, &config, 2025)?;

    // Init storage
    let storage = WorldStorage::init(&uri_from_env(), DEFAULT_DB, DEFAULT_COLLECTION).await?;

    // Insert & read back
    storage
        .save(SaveDoc::from_world("example", 2025, &config, &world))
        .await?;
    if let Some(found) = storage.load("example").await? {
        let restored = found.to_world()?;
        println!(
            "Round-trip {}: {} water tiles, cell [64,48] = {:?}",
            if restored == world { "success" } else { "MISMATCH" },
            restored.terrain().count(Terrain::Water),
            restored.cell_at(64, 48)
        );
    } else {
        println!("Document not found!");
    }

    for save in storage.list_saves().await? {
        println!("{:?}  {}", save.saved_at, save.name);
    }

    // Clean up
    storage.delete("example").await?;

    Ok(())
}
