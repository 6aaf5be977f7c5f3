//! Greedy river carving.
//!
//! Rivers start at high, inland tiles and walk downhill towards the coast. Each
//! step moves to the unvisited neighbor with the lowest
//! `elevation * 100 + distance_to_water * 2`, so a river prefers descending and
//! closing in on water.

use std::collections::HashSet;

use crate::hex::HexCoord;
use crate::tile::{Terrain, Tile, TileMap};

/// Minimum source elevation
pub const SOURCE_MIN_ELEVATION: f64 = 0.65;
/// Minimum source distance from the coast
pub const SOURCE_MIN_DISTANCE: u32 = 3;
/// Hard cap on river length
pub const MAX_RIVER_STEPS: usize = 100;

/// State tracked while tracing a river
#[derive(Clone, Debug, PartialEq)]
pub struct RiverPath {
    pub source: HexCoord,
    /// Every tile the river entered, source first
    pub tiles: Vec<HexCoord>,
    /// Ended on beach, sea or another river
    pub reached_water: bool,
}

/// Cost of moving a river into `tile`.
fn step_cost(tile: &Tile) -> f64 {
    tile.elevation * 100.0 + tile.distance_to_water as f64 * 2.0
}

/// Candidate sources, highest first. Equal elevations keep spiral order.
pub fn find_river_sources(map: &TileMap) -> Vec<usize> {
    let mut sources: Vec<usize> = (0..map.len())
        .filter(|&idx| {
            let tile = map.at(idx);
            tile.biome().is_some()
                && tile.elevation > SOURCE_MIN_ELEVATION
                && tile.distance_to_water > SOURCE_MIN_DISTANCE
        })
        .collect();
    sources.sort_by(|&a, &b| map.at(b).elevation.total_cmp(&map.at(a).elevation));
    sources
}

/// Carve up to `count` rivers. Returns the traced paths; an empty result means
/// no tile qualified as a source.
pub fn carve_rivers(map: &mut TileMap, count: usize) -> Vec<RiverPath> {
    let sources = find_river_sources(map);
    let mut visited: HashSet<i64> = HashSet::new();
    let mut rivers = Vec::new();

    for source in sources.into_iter().take(count) {
        let source_coord = map.coord_at(source);
        if !visited.insert(source_coord.key()) {
            continue;
        }
        rivers.push(trace_river(map, source, &mut visited));
    }

    tracing::debug!(
        "rivers: carved {} ({} tiles)",
        rivers.len(),
        rivers.iter().map(|r| r.tiles.len()).sum::<usize>()
    );
    rivers
}

fn trace_river(map: &mut TileMap, source: usize, visited: &mut HashSet<i64>) -> RiverPath {
    let mut path = RiverPath {
        source: map.coord_at(source),
        tiles: Vec::new(),
        reached_water: false,
    };
    let mut current = source;

    for _ in 0..MAX_RIVER_STEPS {
        let tile = map.at_mut(current);
        path.tiles.push(tile.coord);

        match tile.terrain {
            Terrain::Beach | Terrain::Sea => {
                path.reached_water = true;
                break;
            }
            Terrain::River if current != source => {
                path.reached_water = true;
                break;
            }
            _ => {
                tile.terrain = Terrain::River;
                tile.distance_to_water = 0;
            }
        }

        let mut best: Option<(usize, f64)> = None;
        for n in map.neighbor_indices(map.coord_at(current)) {
            if visited.contains(&map.coord_at(n).key()) {
                continue;
            }
            let cost = step_cost(map.at(n));
            if best.map_or(true, |(_, c)| cost < c) {
                best = Some((n, cost));
            }
        }

        let Some((next, _)) = best else {
            break;
        };
        // Sea is the mouth; the river does not extend into it
        if map.at(next).terrain == Terrain::Sea {
            path.reached_water = true;
            break;
        }
        visited.insert(map.coord_at(next).key());
        current = next;
    }

    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::biomes::Biome;
    use crate::water_bodies;

    /// Cone-shaped island: elevation falls off linearly from the center.
    fn cone(radius: u32, land_radius: u32) -> TileMap {
        let mut map = TileMap::new_with(radius, |c| {
            let mut tile = Tile::new(c);
            let d = c.distance(HexCoord::ORIGIN);
            if d <= land_radius {
                tile.is_land = true;
                tile.is_passable = true;
                tile.elevation = 1.0 - d as f64 / (land_radius as f64 + 1.0);
                tile.terrain = Terrain::Land(Biome::Grassland);
            }
            tile
        });
        water_bodies::mark_beaches(&mut map);
        water_bodies::compute_distance_to_water(&mut map);
        map
    }

    #[test]
    fn test_sources_are_high_and_inland() {
        let map = cone(10, 8);
        let sources = find_river_sources(&map);
        assert!(!sources.is_empty());
        assert_eq!(map.coord_at(sources[0]), HexCoord::ORIGIN);
        for idx in sources {
            assert!(map.at(idx).elevation > SOURCE_MIN_ELEVATION);
            assert!(map.at(idx).distance_to_water > SOURCE_MIN_DISTANCE);
        }
    }

    #[test]
    fn test_river_runs_to_coast() {
        let mut map = cone(10, 8);
        let rivers = carve_rivers(&mut map, 1);

        assert_eq!(rivers.len(), 1);
        let river = &rivers[0];
        assert!(river.reached_water);
        assert_eq!(river.source, HexCoord::ORIGIN);
        let last = *river.tiles.last().unwrap();
        assert_eq!(map.get(last).unwrap().terrain, Terrain::Beach);
        for c in &river.tiles[..river.tiles.len() - 1] {
            let tile = map.get(*c).unwrap();
            assert_eq!(tile.terrain, Terrain::River);
            assert_eq!(tile.distance_to_water, 0);
        }
    }

    #[test]
    fn test_flat_low_island_has_no_sources() {
        let mut map = cone(6, 2);
        assert!(carve_rivers(&mut map, 3).is_empty());
    }

    #[test]
    fn test_carving_repeats_exactly() {
        let mut a = cone(10, 8);
        let mut b = cone(10, 8);
        let first = carve_rivers(&mut a, 3);
        let second = carve_rivers(&mut b, 3);

        assert!(!first.is_empty());
        assert_eq!(first, second);
        assert!(first.iter().all(|r| r.tiles.first() == Some(&r.source)));
    }
}
