//! JSON export of a generated island.

use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::error::Result;
use crate::locations::StrategicLocation;
use crate::seeds::IslandSeed;
use crate::territory::FactionTerritory;
use crate::tile::Tile;
use crate::world::IslandWorld;

/// Borrowed view written by [`to_json`]. Tiles follow spiral order.
#[derive(Serialize)]
struct WorldExport<'a> {
    seed: &'a IslandSeed,
    master_seed: u32,
    radius: u32,
    tiles: Vec<&'a Tile>,
    locations: &'a [StrategicLocation],
    factions: &'a [FactionTerritory],
}

pub fn to_json(world: &IslandWorld) -> Result<String> {
    let export = WorldExport {
        seed: &world.seed,
        master_seed: world.master_seed(),
        radius: world.map.radius,
        tiles: world.map.values().collect(),
        locations: &world.locations,
        factions: &world.factions,
    };
    Ok(serde_json::to_string_pretty(&export)?)
}

pub fn write_json(world: &IslandWorld, path: impl AsRef<Path>) -> Result<()> {
    let text = to_json(world)?;
    fs::write(path.as_ref(), text)?;
    tracing::info!("exported island to {}", path.as_ref().display());
    Ok(())
}
