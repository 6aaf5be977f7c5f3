//! Frontier detection.
//!
//! Recomputed in full after every ownership change: a single O(tiles x 6)
//! sweep stays correct after any batch of claims.

use crate::tile::TileMap;

/// Set `is_frontier` on every owned tile that touches a tile with a different
/// owner (unclaimed included). Returns the number of frontier tiles.
pub fn update_frontier(map: &mut TileMap) -> usize {
    let flags: Vec<bool> = (0..map.len())
        .map(|idx| match map.at(idx).faction {
            None => false,
            Some(owner) => map
                .neighbor_indices(map.coord_at(idx))
                .any(|n| map.at(n).faction != Some(owner)),
        })
        .collect();

    let mut count = 0;
    for (tile, frontier) in map.values_mut().zip(flags) {
        tile.is_frontier = frontier;
        count += frontier as usize;
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hex::{self, HexCoord};
    use crate::tile::{FactionId, Tile};

    #[test]
    fn test_frontier_is_outer_ring() {
        let mut map = TileMap::new_with(4, Tile::new);
        for c in hex::spiral(HexCoord::ORIGIN, 2) {
            map.get_mut(c).unwrap().faction = Some(FactionId(1));
        }

        let count = update_frontier(&mut map);

        assert_eq!(count, 12);
        assert!(map.get(HexCoord::new(2, 0)).unwrap().is_frontier);
        assert!(!map.get(HexCoord::new(1, 0)).unwrap().is_frontier);
        assert!(!map.get(HexCoord::new(3, 0)).unwrap().is_frontier);
    }

    #[test]
    fn test_border_between_factions() {
        let mut map = TileMap::new_with(1, Tile::new);
        for c in map.coords().to_vec() {
            map.get_mut(c).unwrap().faction = Some(FactionId(1));
        }
        map.get_mut(HexCoord::new(1, 0)).unwrap().faction = Some(FactionId(2));

        update_frontier(&mut map);

        assert!(map.get(HexCoord::ORIGIN).unwrap().is_frontier);
        assert!(map.get(HexCoord::new(1, 0)).unwrap().is_frontier);
        // (-1, 0) is not adjacent to (1, 0)
        assert!(!map.get(HexCoord::new(-1, 0)).unwrap().is_frontier);
    }
}
