//! Strategic location placement
//!
//! Every major location is chosen by a deterministic scored search over the
//! finished terrain: the starting beach, a coastal clan capital near a river, a
//! highland clan capital, and a hostile compound. Each later pick must keep a
//! minimum distance from the earlier ones and gets a bonus for opening a new
//! quadrant of the island. When the spacing rules leave no candidate, the
//! spacing is halved and then dropped, so a category only goes missing when the
//! terrain has no candidate at all. Sacred sites come last, best-effort, on
//! remote peaks first and other highland or inland ground after that.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::biomes::{Biome, HILL_MAX};
use crate::hex::HexCoord;
use crate::naming::NameGenerator;
use crate::params::IslandParams;
use crate::rng::IslandRng;
use crate::tile::{FactionId, LocationId, Terrain, Tile, TileMap};

/// Category of a strategic location.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LocationKind {
    StartingBeach,
    CoastalCapital,
    HighlandCapital,
    HostileCompound,
    SacredSite,
}

impl LocationKind {
    /// Categories that must exist exactly once, in placement order.
    pub const REQUIRED: [LocationKind; 4] = [
        LocationKind::StartingBeach,
        LocationKind::CoastalCapital,
        LocationKind::HighlandCapital,
        LocationKind::HostileCompound,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            LocationKind::StartingBeach => "Starting Beach",
            LocationKind::CoastalCapital => "Coastal Clan Capital",
            LocationKind::HighlandCapital => "Highland Clan Capital",
            LocationKind::HostileCompound => "Hostile Compound",
            LocationKind::SacredSite => "Sacred Site",
        }
    }
}

/// A named, narratively significant tile.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StrategicLocation {
    pub id: LocationId,
    pub name: String,
    pub kind: LocationKind,
    pub tile: HexCoord,
    pub description: String,
    pub faction: Option<FactionId>,
}

/// Result of the placement pass.
#[derive(Clone, Debug, Default)]
pub struct PlacementReport {
    pub locations: Vec<StrategicLocation>,
    /// Required categories that found no candidate tile
    pub unplaced: Vec<LocationKind>,
    pub sacred_wanted: usize,
    pub sacred_placed: usize,
    /// Major locations placed closer than the spacing rule allows
    pub relaxed: Vec<SpacingRelaxation>,
}

/// A major location that only fit after the minimum spacing was lowered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpacingRelaxation {
    pub kind: LocationKind,
    /// Spacing the rule asked for
    pub required: u32,
    /// Spacing the chosen tile keeps
    pub kept: u32,
}

/// First location of the given kind.
pub fn find_kind(locations: &[StrategicLocation], kind: LocationKind) -> Option<&StrategicLocation> {
    locations.iter().find(|l| l.kind == kind)
}

// =============================================================================
// SCORING HELPERS
// =============================================================================

/// Multi-source BFS hop distance to the nearest tile matching `source`.
/// Unreachable tiles get `u32::MAX`.
fn distance_field(map: &TileMap, source: impl Fn(&Tile) -> bool) -> Vec<u32> {
    let mut dist = vec![u32::MAX; map.len()];
    let mut queue = VecDeque::new();
    for (idx, tile) in map.values().enumerate() {
        if source(tile) {
            dist[idx] = 0;
            queue.push_back(idx);
        }
    }
    while let Some(idx) = queue.pop_front() {
        for n in map.neighbor_indices(map.coord_at(idx)) {
            if dist[n] == u32::MAX {
                dist[n] = dist[idx] + 1;
                queue.push_back(n);
            }
        }
    }
    dist
}

/// Fraction of in-map neighbors lying strictly lower than the tile.
fn defensibility(map: &TileMap, idx: usize) -> f64 {
    let here = map.at(idx).elevation;
    let mut lower = 0;
    let mut total = 0;
    for n in map.neighbor_indices(map.coord_at(idx)) {
        total += 1;
        if map.at(n).elevation < here {
            lower += 1;
        }
    }
    if total == 0 {
        0.0
    } else {
        lower as f64 / total as f64
    }
}

/// Fraction of in-map neighbors that can be walked onto.
fn accessibility(map: &TileMap, idx: usize) -> f64 {
    map.neighbor_indices(map.coord_at(idx))
        .filter(|&n| map.at(n).is_passable)
        .count() as f64
        / 6.0
}

/// Quadrant of the island a coordinate falls in (by pixel position).
fn quadrant(coord: HexCoord) -> u8 {
    let (x, y) = coord.to_pixel(1.0);
    match (x >= 0.0, y >= 0.0) {
        (true, true) => 0,
        (false, true) => 1,
        (false, false) => 2,
        (true, false) => 3,
    }
}

const QUADRANT_BONUS: f64 = 0.5;

/// Highest-scoring candidate that keeps `spacing` from every placed tile,
/// with the spacing actually kept. Relaxes the spacing to half and then to
/// zero before giving up. Ties keep the earliest candidate in spiral order.
fn best_spaced<S>(map: &TileMap, candidates: &[usize], placed: &[HexCoord], spacing: u32, score: S) -> Option<(usize, u32)>
where
    S: Fn(usize) -> f64,
{
    let used_quadrants: Vec<u8> = placed.iter().map(|&c| quadrant(c)).collect();
    let mut spacings = vec![spacing];
    if spacing / 2 != spacing {
        spacings.push(spacing / 2);
    }
    if spacing / 2 != 0 {
        spacings.push(0);
    }

    for min_distance in spacings {
        let mut best: Option<(usize, f64)> = None;
        for &idx in candidates {
            let coord = map.coord_at(idx);
            if placed.iter().any(|&p| p == coord || p.distance(coord) < min_distance) {
                continue;
            }
            let mut s = score(idx);
            if !used_quadrants.contains(&quadrant(coord)) {
                s += QUADRANT_BONUS;
            }
            if best.map_or(true, |(_, b)| s > b) {
                best = Some((idx, s));
            }
        }
        if let Some((idx, _)) = best {
            return Some((idx, min_distance));
        }
    }
    None
}

// =============================================================================
// PLACEMENT
// =============================================================================

/// Place all strategic locations and tag their tiles.
pub fn place_locations(map: &mut TileMap, params: &IslandParams, rng: &mut IslandRng) -> PlacementReport {
    let mut report = PlacementReport::default();

    let sites = choose_major_sites(map, params);
    report.unplaced = sites.unplaced;
    report.relaxed = sites.relaxed;
    for (kind, idx) in sites.picks {
        push_location(map, &mut report, kind, idx, rng);
    }

    place_sacred_sites(map, params, rng, &mut report);

    tracing::debug!(
        "placement: {} locations ({} sacred of {} wanted)",
        report.locations.len(),
        report.sacred_placed,
        report.sacred_wanted
    );
    report
}

struct MajorSites {
    picks: Vec<(LocationKind, usize)>,
    unplaced: Vec<LocationKind>,
    relaxed: Vec<SpacingRelaxation>,
}

/// Scored search for the four required categories, in placement order.
fn choose_major_sites(map: &TileMap, params: &IslandParams) -> MajorSites {
    let radius = params.radius.max(1) as f64;
    let max_y = 3f64.sqrt() * radius;
    let spacing = params.location_spacing();
    let river_distance = distance_field(map, |t| t.terrain == Terrain::River);

    let norm_dist = |idx: usize| map.coord_at(idx).distance(HexCoord::ORIGIN) as f64 / radius;
    let land: Vec<usize> = (0..map.len()).filter(|&i| map.at(i).is_land).collect();

    let mut placed: Vec<HexCoord> = Vec::new();
    let mut picks = Vec::new();
    let mut unplaced = Vec::new();
    let mut relaxed = Vec::new();

    for kind in LocationKind::REQUIRED {
        let (candidates, score): (Vec<usize>, Box<dyn Fn(usize) -> f64 + '_>) = match kind {
            LocationKind::StartingBeach => (
                land.iter().copied().filter(|&i| map.at(i).terrain == Terrain::Beach).collect(),
                Box::new(|i: usize| {
                    let south = map.coord_at(i).to_pixel(1.0).1 / max_y;
                    let remote = 1.0 - (norm_dist(i) - 0.6).abs();
                    south * 2.0 + accessibility(map, i) + remote
                }),
            ),
            LocationKind::CoastalCapital => (
                land.iter()
                    .copied()
                    .filter(|&i| map.at(i).terrain != Terrain::River && map.at(i).distance_to_water <= 2)
                    .collect(),
                Box::new(|i: usize| {
                    let tile = map.at(i);
                    let river = river_distance[i].min(6) as f64;
                    let near_river = (6.0 - river) / 6.0 * 2.0;
                    let coastal = if tile.terrain == Terrain::Beach { 1.0 } else { 0.7 };
                    let lowland = if tile.elevation < 0.5 { 0.5 } else { 0.0 };
                    near_river + coastal + lowland
                }),
            ),
            LocationKind::HighlandCapital => (
                land.iter()
                    .copied()
                    .filter(|&i| map.at(i).biome().is_some_and(Biome::is_highland))
                    .collect(),
                Box::new(|i: usize| {
                    let tile = map.at(i);
                    let inland = tile.distance_to_water.min(6) as f64 / 6.0;
                    tile.elevation * 2.0 + defensibility(map, i) + inland * 0.5
                }),
            ),
            _ => (
                land.iter().copied().filter(|&i| map.at(i).biome().is_some()).collect(),
                Box::new(|i: usize| {
                    let tile = map.at(i);
                    let moderate = 1.0 - (tile.elevation - 0.55).abs() * 3.0;
                    let resources = match tile.biome() {
                        Some(Biome::HighlandForest | Biome::Jungle | Biome::ScrubHills) => 1.0,
                        _ => 0.0,
                    };
                    let central = 1.0 - norm_dist(i);
                    moderate + resources + defensibility(map, i) * 0.5 + central
                }),
            ),
        };

        let min_spacing = if placed.is_empty() { 0 } else { spacing };
        match best_spaced(map, &candidates, &placed, min_spacing, score) {
            Some((idx, kept)) => {
                if kept < min_spacing {
                    tracing::warn!("{}: spacing relaxed from {} to {}", kind.display_name(), min_spacing, kept);
                    relaxed.push(SpacingRelaxation {
                        kind,
                        required: min_spacing,
                        kept,
                    });
                }
                placed.push(map.coord_at(idx));
                picks.push((kind, idx));
            }
            None => {
                tracing::warn!("no candidate tile for {}", kind.display_name());
                unplaced.push(kind);
            }
        }
    }

    MajorSites {
        picks,
        unplaced,
        relaxed,
    }
}

fn push_location(map: &mut TileMap, report: &mut PlacementReport, kind: LocationKind, idx: usize, rng: &mut IslandRng) {
    let id = LocationId(report.locations.len());
    let tile = map.at_mut(idx);
    let name = NameGenerator::location_name(kind, rng);
    let description = NameGenerator::description(kind, tile.terrain, rng);

    tile.is_strategic = true;
    tile.strategic_location = Some(id);
    if kind == LocationKind::SacredSite {
        tile.is_sacred = true;
    }

    report.locations.push(StrategicLocation {
        id,
        name,
        kind,
        tile: tile.coord,
        description,
        faction: None,
    });
}

/// Candidate tier of a sacred-site tile; lower tiers are tried first.
fn sacred_tier(tile: &Tile) -> Option<u8> {
    let biome = tile.biome()?;
    if tile.is_strategic {
        return None;
    }
    if biome == Biome::Mountain || biome == Biome::CloudForest || tile.elevation >= HILL_MAX {
        Some(0)
    } else if biome.is_highland() {
        Some(1)
    } else if tile.distance_to_water >= SACRED_MIN_INLAND {
        Some(2)
    } else {
        None
    }
}

const SACRED_MIN_INLAND: u32 = 2;

/// Up to `int(3, 6)` sacred sites, each at least `sacred_site_spacing` from the
/// others. Peaks are used first, then the remaining highlands, then inland
/// lowland. Within a tier, tiles far from water and from the major locations
/// rank first.
fn place_sacred_sites(map: &mut TileMap, params: &IslandParams, rng: &mut IslandRng, report: &mut PlacementReport) {
    let wanted = rng.int(3, 6) as usize;
    report.sacred_wanted = wanted;

    let majors: Vec<HexCoord> = report.locations.iter().map(|l| l.tile).collect();
    let radius = params.radius.max(1) as f64;

    let mut candidates: Vec<(usize, u8, f64)> = (0..map.len())
        .filter_map(|i| {
            let tile = map.at(i);
            let tier = sacred_tier(tile)?;
            let coord = map.coord_at(i);
            let isolation = majors
                .iter()
                .map(|m| m.distance(coord))
                .min()
                .unwrap_or(params.radius) as f64
                / radius;
            let remote = tile.distance_to_water.min(10) as f64 / 10.0;
            Some((i, tier, tile.elevation + remote + isolation))
        })
        .collect();
    candidates.sort_by(|a, b| a.1.cmp(&b.1).then(b.2.total_cmp(&a.2)));

    let mut chosen: Vec<usize> = Vec::new();
    for (idx, _, _) in candidates {
        if chosen.len() >= wanted {
            break;
        }
        let coord = map.coord_at(idx);
        if chosen
            .iter()
            .all(|&c| map.coord_at(c).distance(coord) >= params.sacred_site_spacing)
        {
            chosen.push(idx);
        }
    }

    report.sacred_placed = chosen.len();
    for idx in chosen {
        push_location(map, report, LocationKind::SacredSite, idx, rng);
    }

    if report.sacred_placed < wanted {
        tracing::warn!("placed {} of {} sacred sites", report.sacred_placed, wanted);
    }
}
