//! End-to-end generation checks against the public API.

use std::collections::{HashSet, VecDeque};

use hex_island::biomes::Biome;
use hex_island::hex::{self, HexCoord};
use hex_island::{GenerationWarning, IslandGenerator, IslandParams, IslandWorld, LocationKind};

fn generate(seed: &str, radius: u32) -> IslandWorld {
    IslandGenerator::new(IslandParams::with_radius(radius), seed).generate()
}

#[test]
fn test_fixed_seed_reproduces_starting_beach() {
    let first = generate("abc123", 20).starting_beach();
    assert!(first.is_some());

    for _ in 0..10 {
        assert_eq!(generate("abc123", 20).starting_beach(), first);
    }
}

#[test]
fn test_same_seed_same_island() {
    let a = generate("reef", 16);
    let b = generate("reef", 16);

    for (ta, tb) in a.map.values().zip(b.map.values()) {
        assert_eq!(ta, tb);
    }
    assert_eq!(a.locations, b.locations);
    assert_eq!(a.factions, b.factions);
}

#[test]
fn test_numeric_text_seed_matches_number() {
    let text = IslandGenerator::new(IslandParams::small(), "4096").generate();
    let number = IslandGenerator::new(IslandParams::small(), 4096u32).generate();
    assert_eq!(text.master_seed(), number.master_seed());
    assert_eq!(text.starting_beach(), number.starting_beach());
}

#[test]
fn test_ocean_rim_is_sea() {
    let mut params = IslandParams::with_radius(20);
    params.ocean_boundary_width = 1;

    for seed in ["abc123", "lagoon", "atoll"] {
        let world = IslandGenerator::new(params.clone(), seed).generate();
        for coord in hex::ring(HexCoord::ORIGIN, 20) {
            let tile = world.map.get(coord).unwrap();
            assert!(tile.terrain.is_sea(), "{} should be sea", coord);
            assert!(tile.is_edge);
        }
    }
}

#[test]
fn test_land_is_a_single_landmass() {
    for seed in ["abc123", "lagoon", "atoll", "cay"] {
        let world = generate(seed, 20);
        let land: HashSet<HexCoord> = world.map.iter().filter(|(_, t)| t.is_land).map(|(c, _)| c).collect();
        let Some(&start) = land.iter().next() else {
            continue;
        };

        let mut seen = HashSet::from([start]);
        let mut queue = VecDeque::from([start]);
        while let Some(c) = queue.pop_front() {
            for n in c.neighbors() {
                if land.contains(&n) && seen.insert(n) {
                    queue.push_back(n);
                }
            }
        }
        assert_eq!(seen.len(), land.len(), "seed {} has detached land", seed);
    }
}

#[test]
fn test_every_biome_present_on_large_islands() {
    for seed in ["abc123", "lagoon", "atoll"] {
        let world = generate(seed, 20);
        if world.land_tiles() < 100 {
            continue;
        }
        let counts = world.biome_counts();
        for biome in Biome::ALL {
            assert!(
                counts[biome.index()] >= world.params.min_biome_tiles,
                "seed {}: {} has {} tiles",
                seed,
                biome.display_name(),
                counts[biome.index()]
            );
        }
    }
}

#[test]
fn test_no_tile_in_two_factions() {
    let world = generate("abc123", 20);
    let mut owners = HashSet::new();

    for faction in &world.factions {
        for &coord in &faction.tiles {
            assert!(owners.insert(coord), "{} listed twice", coord);
            assert_eq!(world.map.get(coord).unwrap().faction, Some(faction.id));
        }
    }
    let owned = world.map.values().filter(|t| t.faction.is_some()).count();
    assert_eq!(owned, owners.len());
}

#[test]
fn test_growth_stays_within_max_radius() {
    for seed in ["abc123", "lagoon"] {
        let world = generate(seed, 20);
        for faction in &world.factions {
            let Some(capital) = faction.capital else {
                continue;
            };
            for &coord in &faction.tiles {
                let tile = world.map.get(coord).unwrap();
                let depth = tile.territory_distance.unwrap();
                assert!(depth <= faction.growth.max_radius);
                assert!(capital.distance(coord) <= depth);
            }
        }
    }
}

#[test]
fn test_required_locations_on_land() {
    let world = generate("abc123", 20);
    for kind in LocationKind::REQUIRED {
        let location = world.location(kind).unwrap();
        let tile = world.map.get(location.tile).unwrap();
        assert!(tile.is_land);
        assert!(tile.is_strategic);
        assert!(!location.name.is_empty());
    }

    let beach = world.location(LocationKind::StartingBeach).unwrap();
    assert!(world.map.get(beach.tile).unwrap().terrain == hex_island::Terrain::Beach);
}

#[test]
fn test_hex_metric_on_generated_tiles() {
    let world = generate("abc123", 12);
    let coords: Vec<HexCoord> = world.map.coords().iter().step_by(7).copied().collect();

    for &a in &coords {
        assert_eq!(a.distance(a), 0);
        for &b in &coords {
            assert_eq!(a.distance(b), b.distance(a));
            for &c in coords.iter().step_by(5) {
                assert!(a.distance(c) <= a.distance(b) + b.distance(c));
            }
        }
    }
}

#[test]
fn test_default_islands_get_their_sacred_sites() {
    let mut short = Vec::new();
    for seed in 0u32..20 {
        let world = IslandGenerator::new(IslandParams::default(), seed).generate();
        let sacred = world.locations.iter().filter(|l| l.kind == LocationKind::SacredSite).count();
        if world.land_tiles() > 0 {
            assert!(sacred >= 1, "seed {} has no sacred site", seed);
        }
        for location in world.locations.iter().filter(|l| l.kind == LocationKind::SacredSite) {
            assert!(world.map.get(location.tile).unwrap().is_sacred);
        }
        if world
            .warnings
            .iter()
            .any(|w| matches!(w, GenerationWarning::SacredSitesShort { .. }))
        {
            short.push(seed);
        }
    }
    assert!(short.len() <= 4, "sacred sites short on seeds {:?}", short);
}
