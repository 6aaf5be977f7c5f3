//! Landmass connectivity and shoreline analysis
//!
//! After the land/sea split the island may have satellite islets. Connectivity
//! repair keeps the largest land component and sinks the rest, then the
//! shoreline is marked as beach and every land tile learns how far it is from
//! open water.

use std::collections::{HashSet, VecDeque};

use crate::tile::{Terrain, TileMap};

/// Outcome of connectivity repair
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ConnectivityReport {
    /// Land components found before repair
    pub components: usize,
    /// Tiles in the surviving landmass
    pub kept: usize,
    /// Tiles sunk back into the sea
    pub removed: usize,
}

/// Connected land components as lists of tile indices, in discovery order.
///
/// Discovery walks the map in spiral order and floods with BFS over canonical
/// neighbor order, so the result is fully deterministic.
pub fn land_components(map: &TileMap) -> Vec<Vec<usize>> {
    let mut visited: HashSet<i64> = HashSet::new();
    let mut components = Vec::new();

    for (start, (coord, tile)) in map.iter().enumerate() {
        if !tile.is_land || visited.contains(&coord.key()) {
            continue;
        }

        let mut component = Vec::new();
        let mut queue = VecDeque::new();
        visited.insert(coord.key());
        queue.push_back(start);

        while let Some(idx) = queue.pop_front() {
            component.push(idx);
            for n in map.neighbor_indices(map.coord_at(idx)) {
                let ncoord = map.coord_at(n);
                if map.at(n).is_land && visited.insert(ncoord.key()) {
                    queue.push_back(n);
                }
            }
        }

        components.push(component);
    }

    components
}

/// True when every land tile is reachable from every other.
pub fn is_single_landmass(map: &TileMap) -> bool {
    land_components(map).len() <= 1
}

/// Keep only the largest land component; the first one found wins ties.
/// Everything else becomes sea with zero elevation.
pub fn keep_largest_landmass(map: &mut TileMap) -> ConnectivityReport {
    let components = land_components(map);
    if components.is_empty() {
        return ConnectivityReport::default();
    }

    let mut largest = 0;
    for (i, component) in components.iter().enumerate() {
        if component.len() > components[largest].len() {
            largest = i;
        }
    }

    let mut removed = 0;
    for (i, component) in components.iter().enumerate() {
        if i == largest {
            continue;
        }
        for &idx in component {
            let tile = map.at_mut(idx);
            tile.make_sea();
            tile.elevation = 0.0;
            removed += 1;
        }
    }

    let report = ConnectivityReport {
        components: components.len(),
        kept: components[largest].len(),
        removed,
    };
    tracing::debug!(
        "connectivity: {} components, kept {}, sank {}",
        report.components,
        report.kept,
        report.removed
    );
    report
}

/// Land tiles touching the sea become beach. Returns the number marked.
pub fn mark_beaches(map: &mut TileMap) -> usize {
    let shore: Vec<usize> = (0..map.len())
        .filter(|&idx| {
            map.at(idx).is_land
                && map
                    .neighbor_indices(map.coord_at(idx))
                    .any(|n| map.at(n).terrain == Terrain::Sea)
        })
        .collect();

    for &idx in &shore {
        map.at_mut(idx).terrain = Terrain::Beach;
    }

    tracing::debug!("beaches: {} tiles", shore.len());
    shore.len()
}

/// Multi-source BFS from every sea and beach tile. Those sources get 0; land
/// tiles get their hop count to the nearest one.
pub fn compute_distance_to_water(map: &mut TileMap) {
    let mut queue = VecDeque::new();

    for idx in 0..map.len() {
        let tile = map.at_mut(idx);
        if matches!(tile.terrain, Terrain::Sea | Terrain::Beach) {
            tile.distance_to_water = 0;
            queue.push_back(idx);
        } else {
            tile.distance_to_water = u32::MAX;
        }
    }

    while let Some(idx) = queue.pop_front() {
        let next = map.at(idx).distance_to_water + 1;
        let neighbors: Vec<usize> = map.neighbor_indices(map.coord_at(idx)).collect();
        for n in neighbors {
            let tile = map.at_mut(n);
            if tile.distance_to_water == u32::MAX {
                tile.distance_to_water = next;
                queue.push_back(n);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hex::HexCoord;
    use crate::tile::Tile;

    fn map_with_land(radius: u32, land: &[HexCoord]) -> TileMap {
        let mut map = TileMap::new_with(radius, Tile::new);
        for &c in land {
            let tile = map.get_mut(c).unwrap();
            tile.is_land = true;
            tile.is_passable = true;
            tile.elevation = 0.6;
            tile.terrain = Terrain::Land(crate::biomes::Biome::Grassland);
        }
        map
    }

    #[test]
    fn test_keeps_largest_component() {
        let big: Vec<HexCoord> = crate::hex::spiral(HexCoord::ORIGIN, 1);
        let mut land = big.clone();
        land.push(HexCoord::new(4, 0));
        let mut map = map_with_land(5, &land);

        let report = keep_largest_landmass(&mut map);

        assert_eq!(report.components, 2);
        assert_eq!(report.kept, 7);
        assert_eq!(report.removed, 1);
        let islet = map.get(HexCoord::new(4, 0)).unwrap();
        assert!(!islet.is_land);
        assert_eq!(islet.elevation, 0.0);
        assert!(is_single_landmass(&map));
    }

    #[test]
    fn test_empty_map_reports_nothing() {
        let mut map = map_with_land(3, &[]);
        assert_eq!(keep_largest_landmass(&mut map), ConnectivityReport::default());
    }

    #[test]
    fn test_beach_and_distance() {
        let land = crate::hex::spiral(HexCoord::ORIGIN, 3);
        let mut map = map_with_land(5, &land);

        let beaches = mark_beaches(&mut map);
        compute_distance_to_water(&mut map);

        assert_eq!(beaches, 18);
        assert_eq!(map.get(HexCoord::new(3, 0)).unwrap().terrain, Terrain::Beach);
        assert_eq!(map.get(HexCoord::new(3, 0)).unwrap().distance_to_water, 0);
        assert_eq!(map.get(HexCoord::new(2, 0)).unwrap().distance_to_water, 1);
        assert_eq!(map.get(HexCoord::ORIGIN).unwrap().distance_to_water, 3);
        assert_eq!(map.get(HexCoord::new(5, 0)).unwrap().distance_to_water, 0);
    }
}
