//! Elevation synthesis and the land/sea split.
//!
//! Elevation blends a radial falloff (which shapes the island) with fractal
//! noise (which gives it relief). The falloff distance is jittered by a second,
//! independent noise field so the coastline is not a circle.

use rayon::prelude::*;

use crate::hex::HexCoord;
use crate::noise_field::NoiseField;
use crate::params::IslandParams;
use crate::tile::{Terrain, TileMap};

/// Elevation of a single interior tile.
pub fn sample_elevation(
    coord: HexCoord,
    params: &IslandParams,
    elevation_noise: &NoiseField,
    edge_noise: &NoiseField,
) -> f64 {
    let (x, y) = coord.to_pixel(1.0);

    let jitter = edge_noise.noise_2d(x * params.edge_noise_frequency, y * params.edge_noise_frequency);
    let normalized = coord.distance(HexCoord::ORIGIN) as f64 / params.radius as f64
        + jitter * params.edge_noise_strength;
    let falloff = (1.0 - normalized).clamp(0.0, 1.0).powf(params.falloff_exponent);

    let relief = elevation_noise.fractal(
        x * params.elevation_frequency,
        y * params.elevation_frequency,
        params.elevation_octaves,
        params.persistence,
        params.lacunarity,
    );
    let relief = (relief + 1.0) / 2.0;

    (params.continent_blend * falloff + (1.0 - params.continent_blend) * relief).clamp(0.0, 1.0)
}

/// Fill in elevation for every tile. Tiles in the outer `ocean_boundary_width`
/// rings are pinned to 0 and flagged as edge.
pub fn generate_elevation(
    map: &mut TileMap,
    params: &IslandParams,
    elevation_noise: &NoiseField,
    edge_noise: &NoiseField,
) {
    let interior = params.radius.saturating_sub(params.ocean_boundary_width);

    map.par_values_mut().for_each(|tile| {
        if tile.coord.distance(HexCoord::ORIGIN) > interior {
            tile.elevation = 0.0;
            tile.is_edge = true;
        } else {
            tile.elevation = sample_elevation(tile.coord, params, elevation_noise, edge_noise);
            tile.is_edge = false;
        }
    });

    tracing::debug!("elevation: {} tiles, interior radius {}", map.len(), interior);
}

/// Split land from sea. Returns the number of land tiles.
pub fn apply_land_threshold(map: &mut TileMap, threshold: f64) -> usize {
    let mut land = 0;
    for tile in map.values_mut() {
        // NaN elevation counts as sea
        if tile.is_edge || !(tile.elevation > threshold) {
            tile.make_sea();
        } else {
            tile.is_land = true;
            tile.is_passable = true;
            // Placeholder until biomes are assigned
            tile.terrain = Terrain::Land(crate::biomes::Biome::Grassland);
            land += 1;
        }
    }

    tracing::debug!("land threshold {:.2}: {} land tiles", threshold, land);
    land
}
