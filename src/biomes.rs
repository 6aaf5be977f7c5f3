//! Biome system for the island
//!
//! Land that is neither beach nor river gets one of eight biomes from an
//! elevation x moisture lookup table. Two follow-up passes keep the map usable:
//! diversity enforcement guarantees every biome a minimum footprint, and
//! majority-vote smoothing removes single-tile speckle.

use serde::{Deserialize, Serialize};

use crate::tile::{Terrain, TileMap};

/// Upper elevation bound of the lowland band.
pub const LOWLAND_MAX: f64 = 0.5;
/// Upper elevation bound of the hill band; everything above is mountain.
pub const HILL_MAX: f64 = 0.7;
/// Moisture sub-band bounds.
pub const DRY_MAX: f64 = 0.33;
pub const WET_MIN: f64 = 0.66;

/// Tiles needing this many same-biome land neighbors get flipped while smoothing.
const SMOOTHING_MAJORITY: usize = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Biome {
    // Lowland
    Savanna,
    Grassland,
    Jungle,
    // Hills
    ScrubHills,
    HighlandForest,
    JungleHills,
    // Mountain
    Mountain,
    CloudForest,
}

/// Elevation and moisture window a biome naturally occupies.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BiomeRange {
    pub elevation: (f64, f64),
    pub moisture: (f64, f64),
}

impl BiomeRange {
    /// How far `(elevation, moisture)` lies outside this window (0 when inside),
    /// with a small pull towards the window center to break ties.
    pub fn distance(&self, elevation: f64, moisture: f64) -> f64 {
        let outside = |v: f64, (lo, hi): (f64, f64)| {
            if v < lo {
                lo - v
            } else if v > hi {
                v - hi
            } else {
                0.0
            }
        };
        let center_e = (self.elevation.0 + self.elevation.1) / 2.0;
        let center_m = (self.moisture.0 + self.moisture.1) / 2.0;
        let centering = ((elevation - center_e).abs() + (moisture - center_m).abs()) * 0.01;

        outside(elevation, self.elevation) * 2.0 + outside(moisture, self.moisture) + centering
    }
}

impl Biome {
    pub const ALL: [Biome; 8] = [
        Biome::Savanna,
        Biome::Grassland,
        Biome::Jungle,
        Biome::ScrubHills,
        Biome::HighlandForest,
        Biome::JungleHills,
        Biome::Mountain,
        Biome::CloudForest,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Biome::Savanna => "Savanna",
            Biome::Grassland => "Grassland",
            Biome::Jungle => "Jungle",
            Biome::ScrubHills => "Scrub Hills",
            Biome::HighlandForest => "Highland Forest",
            Biome::JungleHills => "Jungle Hills",
            Biome::Mountain => "Mountain",
            Biome::CloudForest => "Cloud Forest",
        }
    }

    pub fn ideal_range(self) -> BiomeRange {
        let (elevation, moisture) = match self {
            Biome::Savanna => ((0.0, LOWLAND_MAX), (0.0, DRY_MAX)),
            Biome::Grassland => ((0.0, LOWLAND_MAX), (DRY_MAX, WET_MIN)),
            Biome::Jungle => ((0.0, LOWLAND_MAX), (WET_MIN, 1.0)),
            Biome::ScrubHills => ((LOWLAND_MAX, HILL_MAX), (0.0, DRY_MAX)),
            Biome::HighlandForest => ((LOWLAND_MAX, HILL_MAX), (DRY_MAX, WET_MIN)),
            Biome::JungleHills => ((LOWLAND_MAX, HILL_MAX), (WET_MIN, 1.0)),
            Biome::Mountain => ((HILL_MAX, 1.0), (0.0, WET_MIN)),
            Biome::CloudForest => ((HILL_MAX, 1.0), (WET_MIN, 1.0)),
        };
        BiomeRange { elevation, moisture }
    }

    pub fn is_highland(self) -> bool {
        matches!(
            self,
            Biome::ScrubHills | Biome::HighlandForest | Biome::JungleHills | Biome::Mountain | Biome::CloudForest
        )
    }
}

/// Elevation x moisture lookup.
pub fn classify(elevation: f64, moisture: f64) -> Biome {
    let band = if elevation < LOWLAND_MAX {
        0
    } else if elevation < HILL_MAX {
        1
    } else {
        2
    };
    let wetness = if moisture < DRY_MAX {
        0
    } else if moisture < WET_MIN {
        1
    } else {
        2
    };

    match (band, wetness) {
        (0, 0) => Biome::Savanna,
        (0, 1) => Biome::Grassland,
        (0, _) => Biome::Jungle,
        (1, 0) => Biome::ScrubHills,
        (1, 1) => Biome::HighlandForest,
        (1, _) => Biome::JungleHills,
        (_, 2) => Biome::CloudForest,
        _ => Biome::Mountain,
    }
}

/// Count tiles per biome, indexed by [`Biome::index`].
pub fn biome_counts(map: &TileMap) -> [usize; 8] {
    let mut counts = [0usize; 8];
    for tile in map.values() {
        if let Some(biome) = tile.biome() {
            counts[biome.index()] += 1;
        }
    }
    counts
}

/// Classify every interior land tile. Returns the number of tiles classified.
pub fn assign_biomes(map: &mut TileMap) -> usize {
    let mut assigned = 0;
    for tile in map.values_mut() {
        if !tile.is_land || matches!(tile.terrain, Terrain::Beach | Terrain::River) {
            continue;
        }
        tile.terrain = Terrain::Land(classify(tile.elevation, tile.moisture));
        assigned += 1;
    }
    assigned
}

/// Make sure every biome covers at least `min_tiles` tiles.
///
/// For each short biome, biome tiles are scored by how close their elevation and
/// moisture sit to the biome's ideal window, and up to `fix_count` of the best
/// ones are converted. A donor biome is never drained below `min_tiles`.
/// Returns the biomes that are still short afterwards.
pub fn enforce_diversity(map: &mut TileMap, min_tiles: usize, fix_count: usize) -> Vec<Biome> {
    let mut counts = biome_counts(map);
    let mut short = Vec::new();

    for target in Biome::ALL {
        if counts[target.index()] >= min_tiles {
            continue;
        }

        let range = target.ideal_range();
        let mut candidates: Vec<(usize, f64)> = map
            .values()
            .enumerate()
            .filter_map(|(idx, tile)| {
                let biome = tile.biome()?;
                (biome != target).then(|| (idx, range.distance(tile.elevation, tile.moisture)))
            })
            .collect();
        // Stable sort keeps spiral order among equal scores
        candidates.sort_by(|a, b| a.1.total_cmp(&b.1));

        let mut converted = 0;
        for (idx, _) in candidates {
            if converted >= fix_count {
                break;
            }
            let Some(donor) = map.at(idx).biome() else {
                continue;
            };
            if counts[donor.index()] <= min_tiles {
                continue;
            }
            map.at_mut(idx).terrain = Terrain::Land(target);
            counts[donor.index()] -= 1;
            counts[target.index()] += 1;
            converted += 1;
        }

        tracing::debug!("biome diversity: converted {} tiles to {:?}", converted, target);

        if counts[target.index()] < min_tiles {
            short.push(target);
        }
    }

    short
}

/// Majority-vote smoothing. A biome tile flips to a different biome shared by at
/// least four of its land neighbors. Each pass reads a snapshot and then writes
/// all flips, and no flip drains a biome below `min_tiles`. Beach and river tiles
/// are never touched. Returns the total number of flips.
pub fn smooth_biomes(map: &mut TileMap, passes: usize, min_tiles: usize) -> usize {
    let mut total = 0;

    for _ in 0..passes {
        let snapshot: Vec<Option<Biome>> = map.values().map(|t| t.biome()).collect();
        let mut flips = Vec::new();

        for (idx, &current) in snapshot.iter().enumerate() {
            let Some(current) = current else {
                continue;
            };
            let mut neighbor_counts = [0usize; 8];
            for n in map.neighbor_indices(map.coord_at(idx)) {
                if let Some(biome) = snapshot[n] {
                    neighbor_counts[biome.index()] += 1;
                }
            }
            let majority = Biome::ALL
                .into_iter()
                .find(|b| *b != current && neighbor_counts[b.index()] >= SMOOTHING_MAJORITY);
            if let Some(majority) = majority {
                flips.push((idx, current, majority));
            }
        }

        let mut counts = biome_counts(map);
        let mut applied = 0;
        for (idx, from, to) in flips {
            if counts[from.index()] <= min_tiles {
                continue;
            }
            map.at_mut(idx).terrain = Terrain::Land(to);
            counts[from.index()] -= 1;
            counts[to.index()] += 1;
            applied += 1;
        }

        total += applied;
        if applied == 0 {
            break;
        }
    }

    total
}
