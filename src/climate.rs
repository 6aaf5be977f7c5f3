//! Moisture generation
//!
//! Moisture mixes fractal noise with a proximity term that decays with distance
//! from water, so coasts and river banks run wet while the interior is driven by
//! the noise field.

use rayon::prelude::*;

use crate::noise_field::NoiseField;
use crate::params::IslandParams;
use crate::tile::{Tile, TileMap};

const NOISE_WEIGHT: f64 = 0.6;
const PROXIMITY_WEIGHT: f64 = 0.4;
const PROXIMITY_FALLOFF: f64 = 0.3;

/// Moisture of one land tile, in `[0, 1]`.
pub fn sample_moisture(tile: &Tile, params: &IslandParams, noise: &NoiseField) -> f64 {
    let (x, y) = tile.coord.to_pixel(1.0);
    let n = noise.fractal(
        x * params.moisture_frequency,
        y * params.moisture_frequency,
        params.moisture_octaves,
        params.persistence,
        params.lacunarity,
    );
    let n = (n + 1.0) / 2.0;
    let proximity = 1.0 / (1.0 + tile.distance_to_water as f64 * PROXIMITY_FALLOFF);

    (NOISE_WEIGHT * n + PROXIMITY_WEIGHT * proximity).clamp(0.0, 1.0)
}

/// Fill in moisture for every land tile. Sea tiles stay at 0.
pub fn generate_moisture(map: &mut TileMap, params: &IslandParams, noise: &NoiseField) {
    map.par_values_mut().for_each(|tile| {
        tile.moisture = if tile.is_land {
            sample_moisture(tile, params, noise)
        } else {
            0.0
        };
    });

    let land: Vec<f64> = map.values().filter(|t| t.is_land).map(|t| t.moisture).collect();
    if !land.is_empty() {
        tracing::debug!(
            "moisture: mean {:.3} over {} land tiles",
            land.iter().sum::<f64>() / land.len() as f64,
            land.len()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hex::HexCoord;

    fn land_tile(coord: HexCoord, distance: u32) -> Tile {
        let mut tile = Tile::new(coord);
        tile.is_land = true;
        tile.distance_to_water = distance;
        tile
    }

    #[test]
    fn test_water_proximity_raises_moisture() {
        let params = IslandParams::default();
        let noise = NoiseField::new(1000);
        let c = HexCoord::new(2, 3);
        let wet = sample_moisture(&land_tile(c, 0), &params, &noise);
        let dry = sample_moisture(&land_tile(c, 10), &params, &noise);
        assert!(wet > dry);
        assert!((wet - dry - 0.4 * (1.0 - 1.0 / 4.0)).abs() < 1e-9);
    }

    #[test]
    fn test_sea_stays_dry() {
        let params = IslandParams::small();
        let mut map = TileMap::new_with(params.radius, |c| {
            if c.distance(HexCoord::ORIGIN) < 4 {
                land_tile(c, 1)
            } else {
                Tile::new(c)
            }
        });
        generate_moisture(&mut map, &params, &NoiseField::new(5));
        for tile in map.values() {
            assert!((0.0..=1.0).contains(&tile.moisture));
            if !tile.is_land {
                assert_eq!(tile.moisture, 0.0);
            }
        }
    }
}
