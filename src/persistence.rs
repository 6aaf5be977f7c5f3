//! Save and load of territory state.
//!
//! Terrain is never stored. A save carries the seed and parameters, and loading
//! regenerates the island from them before laying the saved territory state on
//! top. Derived values (full exploration, travel modifiers, faction tile lists,
//! frontier flags) are recomputed rather than trusted.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{IslandError, Result};
use crate::hex::HexCoord;
use crate::params::IslandParams;
use crate::rng::IslandRng;
use crate::seeds::IslandSeed;
use crate::territory::{self, ResourceNode, TerritoryEngine, TerritoryEvent};
use crate::tile::FactionId;
use crate::world::IslandGenerator;

pub const SAVE_VERSION: u32 = 1;

/// Persisted state of one territory.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TerritoryRecord {
    pub position: HexCoord,
    pub owner: Option<FactionId>,
    pub discovered: bool,
    pub visited: bool,
    pub control_strength: f64,
    #[serde(default)]
    pub exploration_progress: f64,
    #[serde(default)]
    pub claim_progress: f64,
    #[serde(default)]
    pub resource_nodes: Vec<ResourceNode>,
    #[serde(default)]
    pub events: Vec<TerritoryEvent>,
    #[serde(default)]
    pub last_visited: Option<u64>,
}

/// Metadata wrapper for the save file format.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SaveFile {
    /// Format version for forward compatibility
    pub version: u32,
    /// Seed the island is regenerated from
    #[serde(default)]
    pub seed: Option<IslandSeed>,
    #[serde(default)]
    pub params: IslandParams,
    pub player_position: HexCoord,
    #[serde(default)]
    pub player_capital: Option<HexCoord>,
    /// Runtime action stream position
    #[serde(default)]
    pub action_rng_state: Option<u32>,
    #[serde(default)]
    pub territories: Vec<TerritoryRecord>,
}

/// Snapshot the engine. Every land territory is recorded.
pub fn to_save_file(engine: &TerritoryEngine) -> SaveFile {
    let territories = engine
        .territories()
        .filter(|t| t.is_passable())
        .map(|t| TerritoryRecord {
            position: t.position,
            owner: t.owner,
            discovered: t.discovered,
            visited: t.visited,
            control_strength: t.control_strength,
            exploration_progress: t.exploration_progress,
            claim_progress: t.claim_progress,
            resource_nodes: t.resource_nodes.clone(),
            events: t.events.clone(),
            last_visited: t.last_visited,
        })
        .collect();

    SaveFile {
        version: SAVE_VERSION,
        seed: Some(engine.world().seed.clone()),
        params: engine.world().params.clone(),
        player_position: engine.player_position(),
        player_capital: engine.faction(FactionId::PLAYER).and_then(|f| f.capital),
        action_rng_state: Some(engine.rng.state()),
        territories,
    }
}

pub fn save_to_string(engine: &TerritoryEngine) -> Result<String> {
    Ok(serde_json::to_string_pretty(&to_save_file(engine))?)
}

pub fn save_to_path(engine: &TerritoryEngine, path: impl AsRef<Path>) -> Result<()> {
    let text = save_to_string(engine)?;
    fs::write(path.as_ref(), text)?;
    tracing::info!("saved territory state to {}", path.as_ref().display());
    Ok(())
}

pub fn load_from_str(text: &str) -> Result<TerritoryEngine> {
    let save: SaveFile = serde_json::from_str(text)?;
    restore(save)
}

pub fn load_from_path(path: impl AsRef<Path>) -> Result<TerritoryEngine> {
    let text = fs::read_to_string(path.as_ref())?;
    let engine = load_from_str(&text)?;
    tracing::info!("loaded territory state from {}", path.as_ref().display());
    Ok(engine)
}

/// Regenerate the island and apply a save on top of it.
pub fn restore(save: SaveFile) -> Result<TerritoryEngine> {
    if save.version != SAVE_VERSION {
        return Err(IslandError::UnsupportedVersion {
            found: save.version,
            expected: SAVE_VERSION,
        });
    }
    let seed = save.seed.ok_or(IslandError::MissingSeed)?;
    save.params.validate()?;

    let world = IslandGenerator::new(save.params, seed).generate();
    let mut engine = TerritoryEngine::from_world(world);

    if !engine.map().contains(save.player_position) {
        return Err(IslandError::OutOfBounds(save.player_position));
    }

    for record in &save.territories {
        let Some(territory) = engine.territories.get_mut(record.position) else {
            return Err(IslandError::OutOfBounds(record.position));
        };
        territory.discovered = record.discovered;
        territory.visited = record.visited;
        territory.control_strength = record.control_strength;
        territory.exploration_progress = record.exploration_progress;
        territory.claim_progress = record.claim_progress;
        territory.resource_nodes = record.resource_nodes.clone();
        territory.events = record.events.clone();
        territory.last_visited = record.last_visited;
        territory.owner = record.owner;
        territory.refresh_derived();

        if let Some(tile) = engine.world.map.get_mut(record.position) {
            tile.faction = record.owner;
        }
    }

    if let Some(capital) = save.player_capital {
        if let Some(player) = engine.world.factions.iter_mut().find(|f| f.id.is_player()) {
            player.capital = Some(capital);
        }
    }
    territory::rebuild_faction_tiles(&engine.world.map, &mut engine.world.factions);

    territory::expansion::recompute_territory_distance(&mut engine.world.map, &engine.world.factions);
    territory::update_frontier(&mut engine.world.map);

    engine.set_player_position(save.player_position);
    if let Some(state) = save.action_rng_state {
        engine.rng = IslandRng::new(state);
    }

    Ok(engine)
}
