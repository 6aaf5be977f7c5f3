//! Configuration parameters for island generation

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::biomes::Biome;
use crate::error::{IslandError, Result};
use crate::locations::LocationKind;
use crate::tile::{FactionId, Terrain};

/// Main configuration for the generator
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IslandParams {
    // Shape
    /// Hex radius of the generated map
    pub radius: u32,
    /// Width of the forced ocean rim at the map boundary
    pub ocean_boundary_width: u32,
    /// Elevation at or below which a tile is sea
    pub land_threshold: f64,
    /// Weight of the radial falloff against noise (0.6 = 60% falloff)
    pub continent_blend: f64,
    /// Exponent of the radial falloff curve
    pub falloff_exponent: f64,
    /// How far edge noise perturbs the normalized distance
    pub edge_noise_strength: f64,
    /// Sampling frequency of the coastline jitter noise
    pub edge_noise_frequency: f64,

    // Noise
    /// Base frequency of the elevation noise
    pub elevation_frequency: f64,
    /// Octaves of elevation noise
    pub elevation_octaves: u32,
    /// Base frequency of the moisture noise
    pub moisture_frequency: f64,
    /// Octaves of moisture noise
    pub moisture_octaves: u32,
    /// Amplitude decay per octave
    pub persistence: f64,
    /// Frequency multiplier per octave
    pub lacunarity: f64,

    // Hydrology and biomes
    /// Number of rivers to carve
    pub river_sources: usize,
    /// Minimum tiles every biome should cover
    pub min_biome_tiles: usize,
    /// Tiles converted per short biome
    pub biome_fix_count: usize,
    /// Majority-vote smoothing passes
    pub smoothing_passes: usize,

    // Placement
    /// Minimum spacing between major locations, as a fraction of radius
    pub capital_spacing: f64,
    /// Minimum hex distance between sacred sites
    pub sacred_site_spacing: u32,

    // Factions
    /// Factions grown at generation time, in priority order
    pub factions: Vec<FactionSpec>,
}

impl Default for IslandParams {
    fn default() -> Self {
        IslandParams {
            radius: 20,
            ocean_boundary_width: 2,
            land_threshold: 0.3,
            continent_blend: 0.6,
            falloff_exponent: 1.5,
            edge_noise_strength: 0.12,
            edge_noise_frequency: 0.15,

            elevation_frequency: 0.06,
            elevation_octaves: 5,
            moisture_frequency: 0.08,
            moisture_octaves: 4,
            persistence: 0.5,
            lacunarity: 2.0,

            river_sources: 3,
            min_biome_tiles: 3,
            biome_fix_count: 5,
            smoothing_passes: 2,

            capital_spacing: 0.6,
            sacred_site_spacing: 5,

            factions: FactionSpec::defaults(),
        }
    }
}

impl IslandParams {
    /// Default parameters at a different radius.
    pub fn with_radius(radius: u32) -> Self {
        let mut params = Self::default();
        params.radius = radius;
        params
    }

    /// Small map for quick tests
    pub fn small() -> Self {
        let mut params = Self::with_radius(10);
        params.ocean_boundary_width = 1;
        params
    }

    /// Load a JSON config. Keys missing from the file keep their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let params: IslandParams = serde_json::from_str(&text)?;
        params.validate()?;
        Ok(params)
    }

    /// Minimum hex spacing between the major strategic locations.
    pub fn location_spacing(&self) -> u32 {
        (self.capital_spacing * self.radius as f64).round().max(0.0) as u32
    }

    pub fn validate(&self) -> Result<()> {
        let fail = |msg: String| Err(IslandError::InvalidParams(msg));

        if self.radius == 0 {
            return fail("radius must be at least 1".into());
        }
        if self.ocean_boundary_width >= self.radius {
            return fail(format!(
                "ocean_boundary_width {} leaves no interior at radius {}",
                self.ocean_boundary_width, self.radius
            ));
        }
        for (name, value) in [
            ("land_threshold", self.land_threshold),
            ("continent_blend", self.continent_blend),
            ("persistence", self.persistence),
            ("capital_spacing", self.capital_spacing),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return fail(format!("{} must be within [0, 1], got {}", name, value));
            }
        }
        if self.falloff_exponent <= 0.0 {
            return fail("falloff_exponent must be positive".into());
        }
        if self.elevation_octaves == 0 || self.moisture_octaves == 0 {
            return fail("noise needs at least one octave".into());
        }

        let mut seen = Vec::new();
        for faction in &self.factions {
            if faction.id.is_player() {
                return fail(format!("faction '{}' uses the reserved player id", faction.name));
            }
            if seen.contains(&faction.id) {
                return fail(format!("duplicate faction id {}", faction.id));
            }
            if faction.growth.max_radius == 0 {
                return fail(format!("faction '{}' has max_radius 0", faction.name));
            }
            seen.push(faction.id);
        }
        Ok(())
    }
}

/// Who a faction is, for naming and display.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FactionKind {
    NativeClan,
    Hostile,
    Player,
}

/// How a faction's territory spreads from its capital.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GrowthConfig {
    /// Maximum BFS depth from the capital
    pub max_radius: u32,
    /// Terrains that get a +0.3 expansion bonus
    pub preferred_terrains: Vec<Terrain>,
    /// Base chance of claiming a neighbor
    pub growth_rate: f64,
}

impl GrowthConfig {
    pub fn prefers(&self, terrain: Terrain) -> bool {
        self.preferred_terrains.contains(&terrain)
    }
}

/// A faction to grow at generation time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FactionSpec {
    pub id: FactionId,
    pub name: String,
    pub kind: FactionKind,
    /// Location whose tile becomes the capital
    pub seat: LocationKind,
    pub growth: GrowthConfig,
}

impl FactionSpec {
    /// The two native clans and the hostile compound, in growth order.
    pub fn defaults() -> Vec<FactionSpec> {
        vec![
            FactionSpec {
                id: FactionId(1),
                name: "Coastal Clan".into(),
                kind: FactionKind::NativeClan,
                seat: LocationKind::CoastalCapital,
                growth: GrowthConfig {
                    max_radius: 6,
                    preferred_terrains: vec![
                        Terrain::Beach,
                        Terrain::Land(Biome::Grassland),
                        Terrain::Land(Biome::Jungle),
                    ],
                    growth_rate: 0.55,
                },
            },
            FactionSpec {
                id: FactionId(2),
                name: "Highland Clan".into(),
                kind: FactionKind::NativeClan,
                seat: LocationKind::HighlandCapital,
                growth: GrowthConfig {
                    max_radius: 6,
                    preferred_terrains: vec![
                        Terrain::Land(Biome::ScrubHills),
                        Terrain::Land(Biome::HighlandForest),
                        Terrain::Land(Biome::JungleHills),
                    ],
                    growth_rate: 0.55,
                },
            },
            FactionSpec {
                id: FactionId(3),
                name: "Iron Compound".into(),
                kind: FactionKind::Hostile,
                seat: LocationKind::HostileCompound,
                growth: GrowthConfig {
                    max_radius: 4,
                    preferred_terrains: vec![
                        Terrain::Land(Biome::Savanna),
                        Terrain::Land(Biome::Grassland),
                        Terrain::Land(Biome::HighlandForest),
                    ],
                    growth_rate: 0.6,
                },
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(IslandParams::default().validate().is_ok());
        assert!(IslandParams::small().validate().is_ok());
    }

    #[test]
    fn test_rejects_rim_wider_than_radius() {
        let mut params = IslandParams::with_radius(4);
        params.ocean_boundary_width = 4;
        assert!(matches!(params.validate(), Err(IslandError::InvalidParams(_))));
    }

    #[test]
    fn test_rejects_threshold_out_of_range() {
        let mut params = IslandParams::default();
        params.land_threshold = 1.5;
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_rejects_player_faction_id() {
        let mut params = IslandParams::default();
        params.factions[0].id = FactionId::PLAYER;
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let params: IslandParams = serde_json::from_str(r#"{ "radius": 12 }"#).unwrap();
        assert_eq!(params.radius, 12);
        assert_eq!(params.ocean_boundary_width, 2);
        assert_eq!(params.factions.len(), 3);
    }

    #[test]
    fn test_location_spacing() {
        assert_eq!(IslandParams::default().location_spacing(), 12);
    }
}
