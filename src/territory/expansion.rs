//! Faction territory growth
//!
//! A faction spreads outward from its capital by breadth-first search. Each
//! frontier tile at depth `d` below the faction's `max_radius` rolls once for
//! every unclaimed, non-sacred land neighbor; success claims the neighbor at
//! depth `d + 1` and queues it for further expansion. Factions are grown one
//! after another, so earlier factions get first pick of contested ground.

use std::collections::{HashSet, VecDeque};

use crate::hex::HexCoord;
use crate::params::GrowthConfig;
use crate::rng::IslandRng;
use crate::territory::FactionTerritory;
use crate::tile::{FactionId, Terrain, Tile, TileMap};

const PREFERRED_BONUS: f64 = 0.3;
const RIVER_PENALTY: f64 = 0.5;
const DEPTH_PENALTY: f64 = 0.4;
const MIN_CHANCE: f64 = 0.1;

/// Probability of claiming `neighbor` from a tile at BFS depth `depth`.
pub fn expand_chance(growth: &GrowthConfig, neighbor: &Tile, depth: u32) -> f64 {
    let mut chance = growth.growth_rate;
    if growth.prefers(neighbor.terrain) {
        chance += PREFERRED_BONUS;
    }
    if neighbor.terrain == Terrain::River {
        chance -= RIVER_PENALTY;
    }
    chance -= DEPTH_PENALTY * depth as f64 / growth.max_radius.max(1) as f64;
    chance.max(MIN_CHANCE)
}

fn claimable(tile: &Tile) -> bool {
    tile.is_land && tile.faction.is_none() && !tile.is_sacred
}

/// Claim `capital` for `faction` at depth 0 if it is free land.
/// Returns false when the tile is missing, sea, or held by someone else.
pub fn claim_capital(map: &mut TileMap, faction: FactionId, capital: HexCoord) -> bool {
    let Some(tile) = map.get_mut(capital) else {
        return false;
    };
    if !tile.is_land {
        return false;
    }
    match tile.faction {
        Some(owner) if owner != faction => false,
        _ => {
            tile.faction = Some(faction);
            tile.territory_distance = Some(0);
            true
        }
    }
}

/// Grow `faction` from `capital`. The capital must already belong to the
/// faction. Tiles the faction already holds are walked through without a roll,
/// so growth also works for a faction that has been expanded before.
/// Returns the newly claimed tiles in claim order.
pub fn grow_from_capital(
    map: &mut TileMap,
    faction: FactionId,
    capital: HexCoord,
    growth: &GrowthConfig,
    rng: &mut IslandRng,
) -> Vec<HexCoord> {
    let mut claimed = Vec::new();
    if map.get(capital).and_then(|t| t.faction) != Some(faction) {
        return claimed;
    }

    let mut visited: HashSet<i64> = HashSet::new();
    let mut queue = VecDeque::new();
    visited.insert(capital.key());
    queue.push_back((capital, 0u32));

    while let Some((coord, depth)) = queue.pop_front() {
        if depth >= growth.max_radius {
            continue;
        }

        let neighbors: Vec<HexCoord> = map.neighbors(coord).collect();
        for n in neighbors {
            if visited.contains(&n.key()) {
                continue;
            }
            let Some(tile) = map.get_mut(n) else {
                continue;
            };

            if tile.faction == Some(faction) {
                visited.insert(n.key());
                queue.push_back((n, depth + 1));
                continue;
            }
            if !claimable(tile) {
                continue;
            }

            let chance = expand_chance(growth, tile, depth);
            if rng.next() < chance {
                tile.faction = Some(faction);
                tile.territory_distance = Some(depth + 1);
                visited.insert(n.key());
                claimed.push(n);
                queue.push_back((n, depth + 1));
            }
        }
    }

    claimed
}

/// Recompute `territory_distance` for every tile: hops from the owner's
/// capital walking only through the owner's own tiles. Unowned tiles, and
/// owned tiles cut off from their capital, get `None`.
pub fn recompute_territory_distance(map: &mut TileMap, factions: &[FactionTerritory]) {
    for tile in map.values_mut() {
        tile.territory_distance = None;
    }

    for faction in factions {
        let Some(capital) = faction.capital else {
            continue;
        };
        match map.get_mut(capital) {
            Some(tile) if tile.faction == Some(faction.id) => tile.territory_distance = Some(0),
            _ => continue,
        }

        let mut queue = VecDeque::from([(capital, 0u32)]);
        while let Some((coord, depth)) = queue.pop_front() {
            let neighbors: Vec<HexCoord> = map.neighbors(coord).collect();
            for n in neighbors {
                let Some(tile) = map.get_mut(n) else {
                    continue;
                };
                if tile.faction == Some(faction.id) && tile.territory_distance.is_none() {
                    tile.territory_distance = Some(depth + 1);
                    queue.push_back((n, depth + 1));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::biomes::Biome;
    use crate::params::FactionKind;

    fn grassland(radius: u32) -> TileMap {
        TileMap::new_with(radius, |c| {
            let mut tile = Tile::new(c);
            tile.is_land = true;
            tile.is_passable = true;
            tile.terrain = Terrain::Land(Biome::Grassland);
            tile
        })
    }

    fn config(max_radius: u32, rate: f64) -> GrowthConfig {
        GrowthConfig {
            max_radius,
            preferred_terrains: vec![Terrain::Land(Biome::Grassland)],
            growth_rate: rate,
        }
    }

    #[test]
    fn test_chance_formula() {
        let growth = config(6, 0.55);
        let mut tile = Tile::new(HexCoord::ORIGIN);
        tile.terrain = Terrain::Land(Biome::Grassland);
        assert!((expand_chance(&growth, &tile, 0) - 0.85).abs() < 1e-12);
        assert!((expand_chance(&growth, &tile, 3) - 0.65).abs() < 1e-12);

        tile.terrain = Terrain::River;
        assert_eq!(expand_chance(&growth, &tile, 5), MIN_CHANCE);
    }

    #[test]
    fn test_growth_respects_max_radius() {
        let mut map = grassland(12);
        let faction = FactionId(1);
        assert!(claim_capital(&mut map, faction, HexCoord::ORIGIN));
        let claimed = grow_from_capital(&mut map, faction, HexCoord::ORIGIN, &config(6, 2.0), &mut IslandRng::new(9));

        assert!(!claimed.is_empty());
        for c in &claimed {
            let tile = map.get(*c).unwrap();
            assert!(tile.territory_distance.unwrap() <= 6);
            assert!(c.distance(HexCoord::ORIGIN) <= 6);
        }
        // Every roll succeeds at this rate, so the whole disk is taken
        assert_eq!(claimed.len(), 126);
    }

    #[test]
    fn test_growth_skips_sacred_and_foreign_tiles() {
        let mut map = grassland(4);
        map.get_mut(HexCoord::new(1, 0)).unwrap().is_sacred = true;
        map.get_mut(HexCoord::new(-1, 0)).unwrap().faction = Some(FactionId(2));

        claim_capital(&mut map, FactionId(1), HexCoord::ORIGIN);
        grow_from_capital(&mut map, FactionId(1), HexCoord::ORIGIN, &config(3, 1.0), &mut IslandRng::new(1));

        assert_eq!(map.get(HexCoord::new(1, 0)).unwrap().faction, None);
        assert_eq!(map.get(HexCoord::new(-1, 0)).unwrap().faction, Some(FactionId(2)));
    }

    #[test]
    fn test_capital_claim_refuses_foreign_tile() {
        let mut map = grassland(2);
        map.get_mut(HexCoord::ORIGIN).unwrap().faction = Some(FactionId(2));
        assert!(!claim_capital(&mut map, FactionId(1), HexCoord::ORIGIN));
        assert!(claim_capital(&mut map, FactionId(2), HexCoord::ORIGIN));
    }

    #[test]
    fn test_distance_counts_hops_through_own_tiles() {
        let mut map = grassland(4);
        let faction = FactionTerritory {
            id: FactionId(1),
            name: "Reed".into(),
            kind: FactionKind::NativeClan,
            capital: Some(HexCoord::ORIGIN),
            tiles: Vec::new(),
            growth: config(3, 1.0),
        };
        // A ring-shaped holding: the short way to (2, 0) is blocked at (1, 0)
        for c in [HexCoord::ORIGIN, HexCoord::new(0, 1), HexCoord::new(1, 1), HexCoord::new(2, 0), HexCoord::new(-3, 0)] {
            map.get_mut(c).unwrap().faction = Some(faction.id);
        }
        map.get_mut(HexCoord::new(1, 0)).unwrap().territory_distance = Some(1);

        recompute_territory_distance(&mut map, &[faction]);

        let distance = |c: HexCoord| map.get(c).unwrap().territory_distance;
        assert_eq!(distance(HexCoord::ORIGIN), Some(0));
        assert_eq!(distance(HexCoord::new(0, 1)), Some(1));
        assert_eq!(distance(HexCoord::new(1, 1)), Some(2));
        assert_eq!(distance(HexCoord::new(2, 0)), Some(3));
        assert_eq!(HexCoord::new(2, 0).distance(HexCoord::ORIGIN), 2);
        assert_eq!(distance(HexCoord::new(-3, 0)), None);
        assert_eq!(distance(HexCoord::new(1, 0)), None);
    }

    #[test]
    fn test_growth_without_capital_does_nothing() {
        let mut map = grassland(3);
        let claimed = grow_from_capital(&mut map, FactionId(1), HexCoord::ORIGIN, &config(3, 1.0), &mut IslandRng::new(1));
        assert!(claimed.is_empty());
    }
}
