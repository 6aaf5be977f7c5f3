//! Seed management for island generation
//!
//! A single user-facing seed (text or number) becomes a 32-bit master seed.
//! Each generation stream gets its own seed, derived by a fixed offset from the
//! master so independent noise fields and PRNG streams never share state.

use serde::{Deserialize, Serialize};

/// A seed as supplied by the caller.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IslandSeed {
    Number(u32),
    Text(String),
}

impl IslandSeed {
    /// Numeric strings are taken literally; anything else is hashed.
    pub fn parse(input: &str) -> Self {
        match input.trim().parse::<u32>() {
            Ok(n) => IslandSeed::Number(n),
            Err(_) => IslandSeed::Text(input.to_string()),
        }
    }

    /// The 32-bit master seed.
    pub fn master(&self) -> u32 {
        match self {
            IslandSeed::Number(n) => *n,
            IslandSeed::Text(s) => hash_text(s),
        }
    }
}

impl From<u32> for IslandSeed {
    fn from(value: u32) -> Self {
        IslandSeed::Number(value)
    }
}

impl From<&str> for IslandSeed {
    fn from(value: &str) -> Self {
        IslandSeed::parse(value)
    }
}

impl std::fmt::Display for IslandSeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IslandSeed::Number(n) => write!(f, "{}", n),
            IslandSeed::Text(s) => write!(f, "\"{}\" ({})", s, hash_text(s)),
        }
    }
}

/// 31-multiplier string hash over UTF-16 code units, wrapping at 32 bits.
/// Stable across platforms and toolchain versions.
fn hash_text(text: &str) -> u32 {
    text.encode_utf16()
        .fold(0u32, |hash, unit| hash.wrapping_mul(31).wrapping_add(unit as u32))
}

/// Per-stream seeds for one island.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IslandSeeds {
    /// Master seed (used for display/reference)
    pub master: u32,
    /// Elevation noise
    pub elevation: u32,
    /// Coastline edge jitter noise
    pub edge: u32,
    /// Moisture noise
    pub moisture: u32,
    /// Strategic location placement and naming
    pub placement: u32,
    /// Faction territory growth during generation
    pub territory: u32,
    /// Runtime exploration / claim rolls
    pub actions: u32,
}

impl IslandSeeds {
    pub fn from_master(master: u32) -> Self {
        Self {
            master,
            elevation: master,
            edge: master.wrapping_add(500),
            moisture: master.wrapping_add(1000),
            placement: master.wrapping_add(1500),
            territory: master.wrapping_add(2000),
            actions: master.wrapping_add(2500),
        }
    }

    pub fn from_seed(seed: &IslandSeed) -> Self {
        Self::from_master(seed.master())
    }
}

impl std::fmt::Display for IslandSeeds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "IslandSeeds {{ master: {}, elevation: {}, edge: {}, moisture: {}, \
             placement: {}, territory: {}, actions: {} }}",
            self.master,
            self.elevation,
            self.edge,
            self.moisture,
            self.placement,
            self.territory,
            self.actions,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_seed_is_literal() {
        assert_eq!(IslandSeed::parse("12345").master(), 12345);
        assert_eq!(IslandSeed::from(7u32).master(), 7);
    }

    #[test]
    fn test_text_seed_hash_is_stable() {
        // "abc" -> 97*31^2 + 98*31 + 99
        assert_eq!(IslandSeed::parse("abc").master(), 96_354);
        assert_eq!(IslandSeed::parse("abc123").master(), IslandSeed::parse("abc123").master());
        assert_ne!(IslandSeed::parse("abc123").master(), IslandSeed::parse("abc124").master());
    }

    #[test]
    fn test_stream_offsets() {
        let seeds = IslandSeeds::from_master(10);
        assert_eq!(seeds.elevation, 10);
        assert_eq!(seeds.edge, 510);
        assert_eq!(seeds.moisture, 1010);

        let wrapped = IslandSeeds::from_master(u32::MAX);
        assert_eq!(wrapped.edge, 499);
    }
}
