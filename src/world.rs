//! Island generation pipeline and its result container
//!
//! `IslandGenerator::generate` runs the passes strictly in order. Each one reads
//! the state the previous pass left on the tile map. A pass that finds nothing to
//! work with logs a warning, records it on the result and lets the pipeline go on.

use serde::{Deserialize, Serialize};

use crate::biomes::{self, Biome};
use crate::climate;
use crate::heightmap;
use crate::hex::HexCoord;
use crate::locations::{self, LocationKind, StrategicLocation};
use crate::noise_field::NoiseField;
use crate::params::IslandParams;
use crate::rivers::{self, RiverPath};
use crate::rng::IslandRng;
use crate::seeds::{IslandSeed, IslandSeeds};
use crate::territory::{self, expansion, FactionTerritory};
use crate::tile::{FactionId, Terrain, Tile, TileMap};
use crate::water_bodies;

/// A degenerate condition met during generation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum GenerationWarning {
    NoLandmass,
    NoRiverSource,
    NoBiomeCandidates(Biome),
    LocationUnplaced(LocationKind),
    SacredSitesShort { placed: usize, wanted: usize },
    CapitalMissing(FactionId),
    SpacingRelaxed { kind: LocationKind, required: u32, kept: u32 },
    InvalidParams(String),
}

impl std::fmt::Display for GenerationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenerationWarning::NoLandmass => write!(f, "no landmass above the land threshold"),
            GenerationWarning::NoRiverSource => write!(f, "no tile qualified as a river source"),
            GenerationWarning::NoBiomeCandidates(biome) => {
                write!(f, "not enough candidate tiles for {}", biome.display_name())
            }
            GenerationWarning::LocationUnplaced(kind) => {
                write!(f, "no tile found for {}", kind.display_name())
            }
            GenerationWarning::SacredSitesShort { placed, wanted } => {
                write!(f, "placed {} of {} sacred sites", placed, wanted)
            }
            GenerationWarning::CapitalMissing(id) => write!(f, "{} has no capital", id),
            GenerationWarning::SpacingRelaxed { kind, required, kept } => write!(
                f,
                "{} placed {} hexes from another location (spacing {})",
                kind.display_name(),
                kept,
                required
            ),
            GenerationWarning::InvalidParams(reason) => {
                write!(f, "invalid parameters ({}), using defaults", reason)
            }
        }
    }
}

/// Everything generation produced.
#[derive(Clone, Debug)]
pub struct IslandWorld {
    /// Seed as supplied (allows recreation)
    pub seed: IslandSeed,
    pub seeds: IslandSeeds,
    pub params: IslandParams,
    pub map: TileMap,
    pub rivers: Vec<RiverPath>,
    pub locations: Vec<StrategicLocation>,
    /// NPC factions in growth order, then the player
    pub factions: Vec<FactionTerritory>,
    pub warnings: Vec<GenerationWarning>,
}

impl IslandWorld {
    /// Convenience accessor for master seed
    pub fn master_seed(&self) -> u32 {
        self.seeds.master
    }

    pub fn land_tiles(&self) -> usize {
        self.map.values().filter(|t| t.is_land).count()
    }

    pub fn location(&self, kind: LocationKind) -> Option<&StrategicLocation> {
        locations::find_kind(&self.locations, kind)
    }

    pub fn starting_beach(&self) -> Option<HexCoord> {
        self.location(LocationKind::StartingBeach).map(|l| l.tile)
    }

    pub fn faction(&self, id: FactionId) -> Option<&FactionTerritory> {
        self.factions.iter().find(|f| f.id == id)
    }

    /// Tile counts per biome, in [`Biome::ALL`] order.
    pub fn biome_counts(&self) -> [usize; 8] {
        biomes::biome_counts(&self.map)
    }
}

/// Drives the generation passes for one seed and parameter set.
#[derive(Clone, Debug)]
pub struct IslandGenerator {
    pub params: IslandParams,
    pub seed: IslandSeed,
}

impl IslandGenerator {
    pub fn new(params: IslandParams, seed: impl Into<IslandSeed>) -> Self {
        Self {
            params,
            seed: seed.into(),
        }
    }

    pub fn generate(&self) -> IslandWorld {
        let seeds = IslandSeeds::from_seed(&self.seed);
        let mut warnings = Vec::new();
        let mut warn = |w: GenerationWarning| {
            tracing::warn!("{}", w);
            warnings.push(w);
        };

        let fallback;
        let params = match self.params.validate() {
            Ok(()) => &self.params,
            Err(e) => {
                warn(GenerationWarning::InvalidParams(e.to_string()));
                fallback = IslandParams::default();
                &fallback
            }
        };

        tracing::info!("generating island: seed {}, radius {}", self.seed, params.radius);

        let mut map = TileMap::new_with(params.radius, Tile::new);

        // Elevation and land mask
        let elevation_noise = NoiseField::new(seeds.elevation);
        let edge_noise = NoiseField::new(seeds.edge);
        heightmap::generate_elevation(&mut map, params, &elevation_noise, &edge_noise);
        heightmap::apply_land_threshold(&mut map, params.land_threshold);

        // One landmass, then shoreline
        let connectivity = water_bodies::keep_largest_landmass(&mut map);
        let has_land = connectivity.kept > 0;
        if !has_land {
            warn(GenerationWarning::NoLandmass);
        }
        water_bodies::mark_beaches(&mut map);
        water_bodies::compute_distance_to_water(&mut map);

        // Hydrology
        let rivers = if has_land {
            let rivers = rivers::carve_rivers(&mut map, params.river_sources);
            if rivers.is_empty() && params.river_sources > 0 {
                warn(GenerationWarning::NoRiverSource);
            }
            rivers
        } else {
            Vec::new()
        };

        // Climate and biomes
        climate::generate_moisture(&mut map, params, &NoiseField::new(seeds.moisture));
        if has_land {
            biomes::assign_biomes(&mut map);
            for biome in biomes::enforce_diversity(&mut map, params.min_biome_tiles, params.biome_fix_count) {
                warn(GenerationWarning::NoBiomeCandidates(biome));
            }
            let flips = biomes::smooth_biomes(&mut map, params.smoothing_passes, params.min_biome_tiles);
            tracing::debug!("smoothing: {} tiles flipped", flips);
        }

        // Strategic locations
        let mut placement_rng = IslandRng::new(seeds.placement);
        let placement = locations::place_locations(&mut map, params, &mut placement_rng);
        if has_land {
            for &kind in &placement.unplaced {
                warn(GenerationWarning::LocationUnplaced(kind));
            }
            for r in &placement.relaxed {
                warn(GenerationWarning::SpacingRelaxed {
                    kind: r.kind,
                    required: r.required,
                    kept: r.kept,
                });
            }
            if placement.sacred_placed < placement.sacred_wanted {
                warn(GenerationWarning::SacredSitesShort {
                    placed: placement.sacred_placed,
                    wanted: placement.sacred_wanted,
                });
            }
        }
        let mut locations = placement.locations;

        // Faction territories
        let mut factions: Vec<FactionTerritory> = params
            .factions
            .iter()
            .map(|spec| FactionTerritory {
                id: spec.id,
                name: spec.name.clone(),
                kind: spec.kind,
                capital: None,
                tiles: Vec::new(),
                growth: spec.growth.clone(),
            })
            .collect();

        // Capitals first, so no faction grows over another's seat
        for (faction, spec) in factions.iter_mut().zip(&params.factions) {
            let Some(seat) = locations.iter_mut().find(|l| l.kind == spec.seat && l.faction.is_none()) else {
                warn(GenerationWarning::CapitalMissing(spec.id));
                continue;
            };
            if expansion::claim_capital(&mut map, spec.id, seat.tile) {
                seat.faction = Some(spec.id);
                faction.capital = Some(seat.tile);
                faction.tiles.push(seat.tile);
            } else {
                warn(GenerationWarning::CapitalMissing(spec.id));
            }
        }

        let mut territory_rng = IslandRng::new(seeds.territory);
        for faction in factions.iter_mut() {
            let Some(capital) = faction.capital else {
                continue;
            };
            let claimed = expansion::grow_from_capital(&mut map, faction.id, capital, &faction.growth, &mut territory_rng);
            tracing::debug!("{}: {} tiles grown from {}", faction.name, claimed.len(), capital);
            faction.tiles.extend(claimed);
        }
        factions.push(FactionTerritory::player());
        expansion::recompute_territory_distance(&mut map, &factions);
        territory::update_frontier(&mut map);

        let world = IslandWorld {
            seed: self.seed.clone(),
            seeds,
            params: params.clone(),
            map,
            rivers,
            locations,
            factions,
            warnings,
        };

        tracing::info!(
            "island ready: {} land tiles, {} rivers, {} locations, {} warnings",
            world.land_tiles(),
            world.rivers.len(),
            world.locations.len(),
            world.warnings.len()
        );
        world
    }
}

/// Summary line per terrain class, for CLI output.
pub fn terrain_summary(world: &IslandWorld) -> Vec<(String, usize)> {
    let mut rows = Vec::new();
    for terrain in [Terrain::Sea, Terrain::Beach, Terrain::River] {
        let n = world.map.values().filter(|t| t.terrain == terrain).count();
        rows.push((terrain.display_name().to_string(), n));
    }
    let counts = world.biome_counts();
    for biome in Biome::ALL {
        rows.push((biome.display_name().to_string(), counts[biome.index()]));
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_is_deterministic() {
        let a = IslandGenerator::new(IslandParams::small(), "determinism").generate();
        let b = IslandGenerator::new(IslandParams::small(), "determinism").generate();

        for (ta, tb) in a.map.values().zip(b.map.values()) {
            assert_eq!(ta, tb);
        }
        assert_eq!(a.locations, b.locations);
        assert_eq!(a.factions, b.factions);
        assert_eq!(a.warnings, b.warnings);
    }

    #[test]
    fn test_capitals_belong_to_their_factions() {
        let world = IslandGenerator::new(IslandParams::default(), 77u32).generate();
        for faction in &world.factions {
            if let Some(capital) = faction.capital {
                let tile = world.map.get(capital).unwrap();
                assert_eq!(tile.faction, Some(faction.id));
                assert_eq!(tile.territory_distance, Some(0));
                let seat = world.locations.iter().find(|l| l.tile == capital).unwrap();
                assert_eq!(seat.faction, Some(faction.id));
            }
        }
    }

    #[test]
    fn test_player_faction_starts_empty() {
        let world = IslandGenerator::new(IslandParams::small(), 5u32).generate();
        let player = world.faction(FactionId::PLAYER).unwrap();
        assert!(player.tiles.is_empty());
        assert!(player.capital.is_none());
    }

    #[test]
    fn test_no_land_degrades_gracefully() {
        let mut params = IslandParams::small();
        params.land_threshold = 1.0;
        let world = IslandGenerator::new(params, 1u32).generate();

        assert_eq!(world.land_tiles(), 0);
        assert!(world.warnings.contains(&GenerationWarning::NoLandmass));
        assert!(world.locations.is_empty());
        assert!(world.factions.iter().all(|f| f.tiles.is_empty()));
    }

    #[test]
    fn test_terrain_summary_covers_map() {
        let world = IslandGenerator::new(IslandParams::small(), 9u32).generate();
        let total: usize = terrain_summary(&world).iter().map(|(_, n)| n).sum();
        assert_eq!(total, world.map.len());
    }

    #[test]
    fn test_invalid_params_fall_back_to_defaults() {
        let mut params = IslandParams::small();
        params.radius = 0;
        let world = IslandGenerator::new(params, 3u32).generate();

        assert!(matches!(world.warnings.first(), Some(GenerationWarning::InvalidParams(_))));
        assert_eq!(world.params, IslandParams::default());
        assert_eq!(world.map.radius, IslandParams::default().radius);
        assert!(world.map.values().all(|t| !t.elevation.is_nan()));
    }

    #[test]
    fn test_relaxed_spacing_is_reported() {
        // Spacing 12 is tight inside an interior of radius 8
        let mut params = IslandParams::small();
        params.capital_spacing = 1.0;
        params.radius = 12;
        params.ocean_boundary_width = 4;
        let world = IslandGenerator::new(params, 8u32).generate();
        let spacing = world.params.location_spacing();

        let majors: Vec<HexCoord> = LocationKind::REQUIRED
            .iter()
            .filter_map(|&k| world.location(k))
            .map(|l| l.tile)
            .collect();
        let too_close = majors
            .iter()
            .enumerate()
            .any(|(i, a)| majors[i + 1..].iter().any(|b| a.distance(*b) < spacing));
        let reported = world
            .warnings
            .iter()
            .any(|w| matches!(w, GenerationWarning::SpacingRelaxed { .. }));
        assert_eq!(too_close, reported);
    }
}
