//! Hex island generation library
//!
//! Deterministic generation of a hexagonal island (terrain, rivers, biomes,
//! strategic locations, faction territories) plus the runtime territory engine
//! for exploring and claiming it. Re-exports modules for use by the binary and tools.

pub mod ascii;
pub mod biomes;
pub mod climate;
pub mod error;
pub mod export;
pub mod heightmap;
pub mod hex;
pub mod locations;
pub mod naming;
pub mod noise_field;
pub mod params;
pub mod persistence;
pub mod rivers;
pub mod rng;
pub mod seeds;
pub mod territory;
pub mod tile;
pub mod tilemap;
pub mod water_bodies;
pub mod world;

pub use biomes::Biome;
pub use error::{IslandError, Result};
pub use hex::HexCoord;
pub use locations::{LocationKind, StrategicLocation};
pub use params::IslandParams;
pub use rng::IslandRng;
pub use seeds::IslandSeed;
pub use territory::{GameClock, SkillProvider, TerritoryEngine};
pub use tile::{FactionId, Terrain, Tile, TileMap};
pub use world::{GenerationWarning, IslandGenerator, IslandWorld};
