//! Hexagon-shaped tile storage.

use std::collections::HashMap;

use rayon::prelude::*;

use crate::hex::{self, HexCoord};

/// A hexagon-shaped map of radius `radius` around the origin.
///
/// Cells are stored in spiral order (center first, then ring by ring), which is
/// also the canonical iteration order. Lookup goes through a packed `i64` key.
#[derive(Clone, Debug)]
pub struct HexMap<T> {
    pub radius: u32,
    coords: Vec<HexCoord>,
    index: HashMap<i64, usize>,
    data: Vec<T>,
}

impl<T> HexMap<T> {
    /// Build a map by calling `init` for every coordinate in spiral order.
    pub fn new_with<F>(radius: u32, mut init: F) -> Self
    where
        F: FnMut(HexCoord) -> T,
    {
        let coords = hex::spiral(HexCoord::ORIGIN, radius);
        let index = coords.iter().enumerate().map(|(i, c)| (c.key(), i)).collect();
        let data = coords.iter().map(|&c| init(c)).collect();
        Self { radius, coords, index, data }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn contains(&self, coord: HexCoord) -> bool {
        self.index.contains_key(&coord.key())
    }

    pub fn index_of(&self, coord: HexCoord) -> Option<usize> {
        self.index.get(&coord.key()).copied()
    }

    pub fn coord_at(&self, idx: usize) -> HexCoord {
        self.coords[idx]
    }

    pub fn get(&self, coord: HexCoord) -> Option<&T> {
        self.index_of(coord).map(|i| &self.data[i])
    }

    pub fn get_mut(&mut self, coord: HexCoord) -> Option<&mut T> {
        match self.index_of(coord) {
            Some(i) => Some(&mut self.data[i]),
            None => None,
        }
    }

    pub fn at(&self, idx: usize) -> &T {
        &self.data[idx]
    }

    pub fn at_mut(&mut self, idx: usize) -> &mut T {
        &mut self.data[idx]
    }

    /// All coordinates in spiral order.
    pub fn coords(&self) -> &[HexCoord] {
        &self.coords
    }

    /// In-map neighbors of `coord`, in canonical direction order.
    pub fn neighbors(&self, coord: HexCoord) -> impl Iterator<Item = HexCoord> + '_ {
        coord.neighbors().into_iter().filter(move |n| self.contains(*n))
    }

    /// Indices of in-map neighbors.
    pub fn neighbor_indices(&self, coord: HexCoord) -> impl Iterator<Item = usize> + '_ {
        coord.neighbors().into_iter().filter_map(move |n| self.index_of(n))
    }

    pub fn iter(&self) -> impl Iterator<Item = (HexCoord, &T)> {
        self.coords.iter().copied().zip(self.data.iter())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (HexCoord, &mut T)> {
        self.coords.iter().copied().zip(self.data.iter_mut())
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.data.iter()
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.data.iter_mut()
    }
}

impl<T: Send> HexMap<T> {
    /// Parallel mutable iteration for passes that only read the coordinate.
    pub fn par_values_mut(&mut self) -> rayon::slice::IterMut<'_, T> {
        self.data.par_iter_mut()
    }
}

impl<T: Clone> HexMap<T> {
    pub fn new_filled(radius: u32, value: T) -> Self {
        Self::new_with(radius, |_| value.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_size_and_order() {
        let map = HexMap::new_filled(3, 0u8);
        assert_eq!(map.len(), 37);
        assert_eq!(map.coord_at(0), HexCoord::ORIGIN);
        assert!(map.contains(HexCoord::new(3, -3)));
        assert!(!map.contains(HexCoord::new(4, 0)));
    }

    #[test]
    fn test_edge_neighbors_are_clipped() {
        let map = HexMap::new_filled(2, ());
        assert_eq!(map.neighbors(HexCoord::ORIGIN).count(), 6);
        assert_eq!(map.neighbors(HexCoord::new(2, 0)).count(), 3);
        assert_eq!(map.neighbors(HexCoord::new(2, -1)).count(), 4);
    }

    #[test]
    fn test_get_mut() {
        let mut map = HexMap::new_with(2, |c| c.q);
        *map.get_mut(HexCoord::new(1, 1)).unwrap() = 99;
        assert_eq!(map.get(HexCoord::new(1, 1)), Some(&99));
        assert_eq!(map.get(HexCoord::new(5, 5)), None);
    }

    #[test]
    fn test_parallel_iteration_touches_everything() {
        let mut map = HexMap::new_filled(4, 0u32);
        map.par_values_mut().for_each(|v| *v += 1);
        assert!(map.values().all(|&v| v == 1));
    }
}
