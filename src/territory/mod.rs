//! Territory ownership
//!
//! Generation grows the NPC factions from their capitals (`expansion`) and marks
//! borders (`perimeter`). Once the island exists, a [`TerritoryEngine`] takes
//! ownership of it and runs the player-facing actions: travel with fog of war,
//! exploration, claiming and runtime faction growth.

pub mod claim;
pub mod expansion;
pub mod exploration;
pub mod perimeter;
pub mod travel;

use serde::{Deserialize, Serialize};

use crate::hex::HexCoord;
use crate::locations::{self, LocationKind, StrategicLocation};
use crate::params::{FactionKind, GrowthConfig};
use crate::rng::IslandRng;
use crate::tile::{FactionId, Terrain, TileMap};
use crate::tilemap::HexMap;
use crate::world::IslandWorld;

pub use claim::ClaimResult;
pub use exploration::{Discovery, ExploreResult, IslandEvent, NpcKind, ResourceKind, ResourceNode, TerritoryEvent};
pub use perimeter::update_frontier;
pub use travel::TravelResult;

/// Control strength of tiles held since generation.
pub const INITIAL_CONTROL: f64 = 60.0;
/// Control strength of capitals and freshly claimed tiles.
pub const FULL_CONTROL: f64 = 100.0;

// =============================================================================
// COLLABORATORS
// =============================================================================

/// Source of skill levels for action rolls, and sink for the experience they earn.
pub trait SkillProvider {
    fn effective_skill(&self, skill: &str) -> f64;
    fn gain_skill_xp(&mut self, skill: &str, amount: f64);
}

/// In-game clock advanced by time-consuming actions.
pub trait GameClock {
    fn advance_time(&mut self, minutes: u32);
    fn current_minute(&self) -> u64;
}

/// Why an action did nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionFailure {
    /// Coordinate is not on the island map
    OutOfBounds,
    /// Sea tile
    Impassable,
    /// Tile is still hidden by fog of war
    Undiscovered,
    /// Exploration is already complete
    AlreadyExplored,
    /// Claiming needs a fully explored tile
    RequiresExploration,
    /// The claimant already owns the tile
    AlreadyOwned,
    /// Sacred ground cannot be claimed
    SacredGround,
    /// No path to the destination
    Unreachable,
    /// Nothing left to gather
    Depleted,
    /// Faction is unknown or has no capital to grow from
    NoCapital,
}

impl ActionFailure {
    pub fn describe(self) -> &'static str {
        match self {
            ActionFailure::OutOfBounds => "that place is not on the island",
            ActionFailure::Impassable => "open sea cannot be entered",
            ActionFailure::Undiscovered => "you have not discovered that area yet",
            ActionFailure::AlreadyExplored => "there is nothing left to explore here",
            ActionFailure::RequiresExploration => "explore the area fully before claiming it",
            ActionFailure::AlreadyOwned => "this territory is already yours",
            ActionFailure::SacredGround => "sacred ground cannot be claimed",
            ActionFailure::Unreachable => "there is no way to get there",
            ActionFailure::Depleted => "nothing is left to gather here",
            ActionFailure::NoCapital => "the faction has no capital to expand from",
        }
    }
}

impl std::fmt::Display for ActionFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.describe())
    }
}

// =============================================================================
// FACTION TERRITORY
// =============================================================================

/// A faction's owned tiles, capital and growth rules.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FactionTerritory {
    pub id: FactionId,
    pub name: String,
    pub kind: FactionKind,
    pub capital: Option<HexCoord>,
    /// Owned tiles in claim order
    pub tiles: Vec<HexCoord>,
    pub growth: GrowthConfig,
}

impl FactionTerritory {
    /// The player's faction: no tiles, no capital until the first claim.
    pub fn player() -> Self {
        Self {
            id: FactionId::PLAYER,
            name: "Player".into(),
            kind: FactionKind::Player,
            capital: None,
            tiles: Vec::new(),
            growth: GrowthConfig {
                max_radius: 3,
                preferred_terrains: Vec::new(),
                growth_rate: 0.5,
            },
        }
    }

    pub fn claim(&mut self, coord: HexCoord) {
        if !self.tiles.contains(&coord) {
            self.tiles.push(coord);
        }
    }

    pub fn release(&mut self, coord: HexCoord) {
        self.tiles.retain(|&c| c != coord);
        if self.capital == Some(coord) {
            self.capital = None;
        }
    }

    pub fn contains(&self, coord: HexCoord) -> bool {
        self.tiles.contains(&coord)
    }

    pub fn size(&self) -> usize {
        self.tiles.len()
    }
}

/// Territory statistics for a faction
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TerritoryStats {
    pub total_tiles: usize,
    pub coastal_tiles: usize,
    pub highland_tiles: usize,
    pub river_tiles: usize,
    pub frontier_tiles: usize,
}

/// Calculate territory statistics
pub fn calculate_territory_stats(faction: &FactionTerritory, map: &TileMap) -> TerritoryStats {
    let mut stats = TerritoryStats {
        total_tiles: faction.tiles.len(),
        ..Default::default()
    };

    for tile in faction.tiles.iter().filter_map(|&c| map.get(c)) {
        match tile.terrain {
            Terrain::Beach => stats.coastal_tiles += 1,
            Terrain::River => stats.river_tiles += 1,
            Terrain::Land(biome) if biome.is_highland() => stats.highland_tiles += 1,
            _ => {}
        }
        if tile.is_frontier {
            stats.frontier_tiles += 1;
        }
    }

    stats
}

/// Rebuild every faction's tile list from tile ownership, in spiral order.
pub fn rebuild_faction_tiles(map: &TileMap, factions: &mut [FactionTerritory]) {
    for faction in factions.iter_mut() {
        faction.tiles = map
            .iter()
            .filter(|(_, t)| t.faction == Some(faction.id))
            .map(|(c, _)| c)
            .collect();
        if let Some(capital) = faction.capital {
            if !faction.tiles.contains(&capital) {
                faction.capital = None;
            }
        }
    }
}

// =============================================================================
// RUNTIME TERRITORY
// =============================================================================

/// Mutable exploration and ownership state wrapped around one tile.
#[derive(Clone, Debug, PartialEq)]
pub struct Territory {
    pub position: HexCoord,
    pub terrain: Terrain,
    /// Derived from terrain; `None` for sea
    pub travel_modifier: Option<f64>,
    pub discovered: bool,
    pub visited: bool,
    pub exploration_progress: f64,
    pub fully_explored: bool,
    pub claim_progress: f64,
    pub control_strength: f64,
    pub owner: Option<FactionId>,
    pub resource_nodes: Vec<ResourceNode>,
    pub events: Vec<TerritoryEvent>,
    pub last_visited: Option<u64>,
}

impl Territory {
    pub fn new(position: HexCoord, terrain: Terrain, owner: Option<FactionId>) -> Self {
        Self {
            position,
            terrain,
            travel_modifier: terrain.travel_modifier(),
            discovered: false,
            visited: false,
            exploration_progress: 0.0,
            fully_explored: false,
            claim_progress: 0.0,
            control_strength: if owner.is_some() { INITIAL_CONTROL } else { 0.0 },
            owner,
            resource_nodes: Vec::new(),
            events: Vec::new(),
            last_visited: None,
        }
    }

    pub fn is_passable(&self) -> bool {
        self.travel_modifier.is_some()
    }

    /// Recompute the fields that follow from terrain and progress.
    pub fn refresh_derived(&mut self) {
        self.travel_modifier = self.terrain.travel_modifier();
        self.exploration_progress = self.exploration_progress.clamp(0.0, 100.0);
        self.claim_progress = self.claim_progress.clamp(0.0, 100.0);
        self.control_strength = self.control_strength.clamp(0.0, 100.0);
        self.fully_explored = self.exploration_progress >= 100.0;
    }
}

// =============================================================================
// ENGINE
// =============================================================================

/// Runtime owner of a generated island.
#[derive(Debug)]
pub struct TerritoryEngine {
    pub(crate) world: IslandWorld,
    pub(crate) territories: HexMap<Territory>,
    pub(crate) player_position: HexCoord,
    pub(crate) rng: IslandRng,
}

impl TerritoryEngine {
    /// Take over a generated island. The player starts on the starting beach
    /// (or the first land tile when there is none) with radius 2 revealed.
    pub fn from_world(world: IslandWorld) -> Self {
        let capitals: Vec<HexCoord> = world.factions.iter().filter_map(|f| f.capital).collect();
        let territories = HexMap::new_with(world.map.radius, |coord| {
            let tile = world.map.get(coord);
            let terrain = tile.map_or(Terrain::Sea, |t| t.terrain);
            let owner = tile.and_then(|t| t.faction);
            let mut territory = Territory::new(coord, terrain, owner);
            if capitals.contains(&coord) {
                territory.control_strength = FULL_CONTROL;
            }
            territory
        });

        let start = locations::find_kind(&world.locations, LocationKind::StartingBeach)
            .map(|l| l.tile)
            .or_else(|| world.map.iter().find(|(_, t)| t.is_land).map(|(c, _)| c))
            .unwrap_or(HexCoord::ORIGIN);

        let mut engine = Self {
            rng: IslandRng::new(world.seeds.actions),
            world,
            territories,
            player_position: start,
        };
        engine.reveal(start, 2);
        if let Some(t) = engine.territories.get_mut(start) {
            t.visited = true;
        }
        engine
    }

    pub fn world(&self) -> &IslandWorld {
        &self.world
    }

    pub fn into_world(self) -> IslandWorld {
        self.world
    }

    pub fn map(&self) -> &TileMap {
        &self.world.map
    }

    pub fn player_position(&self) -> HexCoord {
        self.player_position
    }

    /// Move the player without travel cost (used when restoring a save).
    pub fn set_player_position(&mut self, position: HexCoord) {
        self.player_position = position;
    }

    pub fn territory(&self, position: HexCoord) -> Option<&Territory> {
        self.territories.get(position)
    }

    pub fn territory_mut(&mut self, position: HexCoord) -> Option<&mut Territory> {
        self.territories.get_mut(position)
    }

    pub fn territories(&self) -> impl Iterator<Item = &Territory> {
        self.territories.values()
    }

    pub fn faction(&self, id: FactionId) -> Option<&FactionTerritory> {
        self.world.factions.iter().find(|f| f.id == id)
    }

    pub fn factions(&self) -> &[FactionTerritory] {
        &self.world.factions
    }

    pub fn locations(&self) -> &[StrategicLocation] {
        &self.world.locations
    }

    /// Hand `position` to `owner` (or release it), keeping tile ownership,
    /// faction tile lists and frontier flags in agreement.
    pub fn set_owner(&mut self, position: HexCoord, owner: Option<FactionId>) {
        let previous = match self.world.map.get(position) {
            Some(tile) => tile.faction,
            None => return,
        };
        if previous == owner {
            return;
        }

        if let Some(prev) = previous {
            if let Some(faction) = self.world.factions.iter_mut().find(|f| f.id == prev) {
                faction.release(position);
            }
        }

        if let Some(new_owner) = owner {
            if let Some(faction) = self.world.factions.iter_mut().find(|f| f.id == new_owner) {
                if faction.capital.is_none() {
                    faction.capital = Some(position);
                }
                faction.claim(position);
            }
        }

        if let Some(tile) = self.world.map.get_mut(position) {
            tile.faction = owner;
        }
        if let Some(t) = self.territories.get_mut(position) {
            t.owner = owner;
            t.claim_progress = 0.0;
        }

        expansion::recompute_territory_distance(&mut self.world.map, &self.world.factions);
        update_frontier(&mut self.world.map);
    }

    /// Run the growth algorithm for `id` from its capital. New tiles start at
    /// the initial control strength.
    pub fn grow_faction(&mut self, id: FactionId) -> Result<Vec<HexCoord>, ActionFailure> {
        let Some(faction) = self.world.factions.iter().find(|f| f.id == id) else {
            return Err(ActionFailure::NoCapital);
        };
        let Some(capital) = faction.capital else {
            return Err(ActionFailure::NoCapital);
        };
        let growth = faction.growth.clone();

        let claimed = expansion::grow_from_capital(&mut self.world.map, id, capital, &growth, &mut self.rng);

        if let Some(faction) = self.world.factions.iter_mut().find(|f| f.id == id) {
            for &c in &claimed {
                faction.claim(c);
            }
        }
        for &c in &claimed {
            if let Some(t) = self.territories.get_mut(c) {
                t.owner = Some(id);
                t.control_strength = INITIAL_CONTROL;
            }
        }
        expansion::recompute_territory_distance(&mut self.world.map, &self.world.factions);
        update_frontier(&mut self.world.map);

        tracing::info!("{} grew by {} tiles", id, claimed.len());
        Ok(claimed)
    }

    /// Tiles currently held by `id`.
    pub fn owned_by(&self, id: FactionId) -> Vec<HexCoord> {
        self.world
            .map
            .iter()
            .filter(|(_, t)| t.faction == Some(id))
            .map(|(c, _)| c)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::IslandParams;
    use crate::world::IslandGenerator;

    fn engine() -> TerritoryEngine {
        let world = IslandGenerator::new(IslandParams::small(), 4242u32).generate();
        TerritoryEngine::from_world(world)
    }

    #[test]
    fn test_start_is_revealed() {
        let engine = engine();
        let start = engine.player_position();
        for c in crate::hex::spiral(start, 2) {
            if let Some(t) = engine.territory(c) {
                assert!(t.discovered);
            }
        }
        assert!(engine.territory(start).unwrap().visited);
    }

    #[test]
    fn test_initial_control_strength() {
        let engine = engine();
        for faction in engine.factions() {
            for &c in &faction.tiles {
                let t = engine.territory(c).unwrap();
                assert_eq!(t.owner, Some(faction.id));
                let expected = if faction.capital == Some(c) { FULL_CONTROL } else { INITIAL_CONTROL };
                assert_eq!(t.control_strength, expected);
            }
        }
        assert!(engine
            .territories()
            .filter(|t| t.owner.is_none())
            .all(|t| t.control_strength == 0.0));
    }

    #[test]
    fn test_set_owner_moves_tile_between_factions() {
        let mut engine = engine();
        let Some(tile) = engine.factions().iter().find(|f| f.size() > 1).and_then(|f| f.tiles.last().copied())
        else {
            return;
        };
        let before = engine.map().get(tile).unwrap().faction.unwrap();

        engine.set_owner(tile, Some(FactionId::PLAYER));

        assert!(!engine.faction(before).unwrap().contains(tile));
        let player = engine.faction(FactionId::PLAYER).unwrap();
        assert!(player.contains(tile));
        assert_eq!(player.capital, Some(tile));
        assert_eq!(engine.map().get(tile).unwrap().faction, Some(FactionId::PLAYER));
        assert!(engine.map().get(tile).unwrap().is_frontier);
    }

    #[test]
    fn test_territory_distance_follows_owned_tiles() {
        let mut engine = engine();
        let free = |engine: &TerritoryEngine, c: HexCoord| engine.map().get(c).is_some_and(|t| t.is_land && t.faction.is_none());
        let Some((capital, next)) = engine
            .map()
            .coords()
            .iter()
            .filter(|&&c| free(&engine, c))
            .find_map(|&c| c.neighbors().into_iter().find(|&n| free(&engine, n)).map(|n| (c, n)))
        else {
            return;
        };
        let Some(far) = engine
            .map()
            .coords()
            .iter()
            .copied()
            .find(|&c| free(&engine, c) && c.distance(capital) >= 3)
        else {
            return;
        };

        engine.set_owner(capital, Some(FactionId::PLAYER));
        engine.set_owner(next, Some(FactionId::PLAYER));
        engine.set_owner(far, Some(FactionId::PLAYER));

        let distance = |engine: &TerritoryEngine, c: HexCoord| engine.map().get(c).unwrap().territory_distance;
        assert_eq!(distance(&engine, capital), Some(0));
        assert_eq!(distance(&engine, next), Some(1));
        assert_eq!(distance(&engine, far), None);

        // Losing the capital cuts every remaining tile off
        engine.set_owner(capital, None);
        assert_eq!(distance(&engine, capital), None);
        assert_eq!(distance(&engine, next), None);
    }

    #[test]
    fn test_player_growth_needs_capital() {
        let mut engine = engine();
        assert_eq!(engine.grow_faction(FactionId::PLAYER), Err(ActionFailure::NoCapital));
        assert_eq!(engine.grow_faction(FactionId(99)), Err(ActionFailure::NoCapital));
    }

    #[test]
    fn test_refresh_derived() {
        let mut t = Territory::new(HexCoord::ORIGIN, Terrain::Beach, None);
        t.exploration_progress = 140.0;
        t.travel_modifier = None;
        t.refresh_derived();
        assert_eq!(t.exploration_progress, 100.0);
        assert!(t.fully_explored);
        assert_eq!(t.travel_modifier, Some(1.0));
    }
}
