//! Tile data shared by the generation pipeline and the territory engine.

use serde::{Deserialize, Serialize};

use crate::biomes::Biome;
use crate::hex::HexCoord;
use crate::tilemap::HexMap;

/// The island's tiles.
pub type TileMap = HexMap<Tile>;

/// Faction identifier. `PLAYER` is reserved for the player's own faction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FactionId(pub u16);

impl FactionId {
    pub const PLAYER: FactionId = FactionId(0);

    pub fn is_player(self) -> bool {
        self == FactionId::PLAYER
    }
}

impl std::fmt::Display for FactionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_player() {
            write!(f, "Player")
        } else {
            write!(f, "Faction#{}", self.0)
        }
    }
}

/// Index into the island's strategic location list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocationId(pub usize);

/// Terrain class of a tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Terrain {
    Sea,
    Beach,
    River,
    Land(Biome),
}

impl Terrain {
    pub fn biome(self) -> Option<Biome> {
        match self {
            Terrain::Land(biome) => Some(biome),
            _ => None,
        }
    }

    pub fn is_sea(self) -> bool {
        self == Terrain::Sea
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Terrain::Sea => "Sea",
            Terrain::Beach => "Beach",
            Terrain::River => "River",
            Terrain::Land(biome) => biome.display_name(),
        }
    }

    /// Chance penalty (percentage points) applied to exploration rolls.
    pub fn exploration_difficulty(self) -> f64 {
        match self {
            Terrain::Sea => 100.0,
            Terrain::Beach => 0.0,
            Terrain::River => 10.0,
            Terrain::Land(Biome::Grassland) => 0.0,
            Terrain::Land(Biome::Savanna) => 5.0,
            Terrain::Land(Biome::ScrubHills) => 10.0,
            Terrain::Land(Biome::HighlandForest) => 15.0,
            Terrain::Land(Biome::Jungle) => 20.0,
            Terrain::Land(Biome::JungleHills) => 25.0,
            Terrain::Land(Biome::Mountain) => 30.0,
            Terrain::Land(Biome::CloudForest) => 35.0,
        }
    }

    /// Travel time multiplier for entering a tile of this terrain.
    pub fn travel_modifier(self) -> Option<f64> {
        match self {
            Terrain::Sea => None,
            Terrain::Beach | Terrain::Land(Biome::Grassland) | Terrain::Land(Biome::Savanna) => Some(1.0),
            Terrain::River => Some(1.5),
            Terrain::Land(Biome::ScrubHills) => Some(1.4),
            Terrain::Land(Biome::HighlandForest) => Some(1.6),
            Terrain::Land(Biome::Jungle) => Some(1.8),
            Terrain::Land(Biome::JungleHills) => Some(2.0),
            Terrain::Land(Biome::CloudForest) => Some(2.2),
            Terrain::Land(Biome::Mountain) => Some(2.5),
        }
    }
}

/// One hex of the island.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    pub coord: HexCoord,
    pub elevation: f64,
    pub moisture: f64,
    pub terrain: Terrain,
    pub is_land: bool,
    pub is_passable: bool,
    /// Inside the forced ocean rim.
    pub is_edge: bool,
    /// Hops to the nearest beach or sea tile; `u32::MAX` until computed.
    pub distance_to_water: u32,
    pub faction: Option<FactionId>,
    /// BFS hops from the owning faction's capital through its own tiles;
    /// `None` when unowned or cut off from the capital.
    pub territory_distance: Option<u32>,
    pub is_frontier: bool,
    pub is_strategic: bool,
    pub is_sacred: bool,
    pub strategic_location: Option<LocationId>,
}

impl Tile {
    pub fn new(coord: HexCoord) -> Self {
        Self {
            coord,
            elevation: 0.0,
            moisture: 0.0,
            terrain: Terrain::Sea,
            is_land: false,
            is_passable: false,
            is_edge: false,
            distance_to_water: u32::MAX,
            faction: None,
            territory_distance: None,
            is_frontier: false,
            is_strategic: false,
            is_sacred: false,
            strategic_location: None,
        }
    }

    pub fn biome(&self) -> Option<Biome> {
        self.terrain.biome()
    }

    /// Turn this tile into open sea.
    pub fn make_sea(&mut self) {
        self.terrain = Terrain::Sea;
        self.is_land = false;
        self.is_passable = false;
        self.distance_to_water = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_tile_is_sea() {
        let tile = Tile::new(HexCoord::new(1, 2));
        assert!(tile.terrain.is_sea());
        assert!(!tile.is_land);
        assert_eq!(tile.faction, None);
    }

    #[test]
    fn test_every_land_terrain_is_travelable() {
        for biome in Biome::ALL {
            assert!(Terrain::Land(biome).travel_modifier().is_some());
        }
        assert!(Terrain::Sea.travel_modifier().is_none());
    }

    #[test]
    fn test_faction_display() {
        assert_eq!(FactionId::PLAYER.to_string(), "Player");
        assert_eq!(FactionId(3).to_string(), "Faction#3");
    }
}
