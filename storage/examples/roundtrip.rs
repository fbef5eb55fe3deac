use chrono::Utc;
use earthwork_core::{stats, synthesize};
use earthwork_storage::{Bounds, DemKind, DemRecord, JsonFileStore, ProjectStore, StoreResult};

#[tokio::main]
async fn main() -> StoreResult<()> {
    // Generate a 64×64 demo DEM
    let grid = synthesize(64, 64).expect("valid size");
    let dem = DemRecord {
        id: "demo-dem".to_string(),
        project_id: "demo".to_string(),
        name: "Existing Terrain".to_string(),
        kind: DemKind::Existing,
        created_at: Utc::now(),
        resolution: 1.524,
        width: 64,
        height: 64,
        bounds: Bounds {
            north: 30.2672,
            south: 30.2642,
            east: -97.7391,
            west: -97.7421,
        },
        stats: stats(&grid),
        elevation_data: grid,
    };

    let dir = tempfile::tempdir()?;
    let store = JsonFileStore::new(dir.path());

    // Write & read back
    store.save_dems("demo", std::slice::from_ref(&dem)).await?;
    match store.find_dem("demo", "demo-dem").await? {
        Some(found) => println!(
            "Round-trip success: sample [32,32] = {} ft, stats {:?}",
            found.elevation_data.get(32, 32),
            found.stats
        ),
        None => println!("DEM not found!"),
    }

    // Clean up
    store.delete_dems("demo").await?;
    Ok(())
}
