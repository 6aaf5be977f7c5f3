//! Place names and flavor text for strategic locations.
//!
//! Clan names are built from syllables of a single island phonology; other
//! names come from small word banks. Everything is drawn from the caller's
//! RNG, so names are as reproducible as the rest of the island.

use rand::Rng;

use crate::locations::LocationKind;
use crate::tile::Terrain;

/// Phonetic building blocks of the island tongue.
pub struct Phonology {
    pub onsets: &'static [&'static str],
    pub vowels: &'static [&'static str],
    pub codas: &'static [&'static str],
    pub syllable_range: (usize, usize),
}

pub const ISLAND_TONGUE: Phonology = Phonology {
    onsets: &["k", "t", "m", "n", "h", "l", "v", "r", "p", "w", "ak", "mo"],
    vowels: &["a", "e", "i", "o", "u", "ai", "au"],
    codas: &["", "", "", "n", "k", "l", "h"],
    syllable_range: (2, 3),
};

const BEACH_ADJECTIVES: &[&str] = &["Driftwood", "Shell", "Castaway", "Saltwind", "Pale", "Turtle", "Wreck"];
const BEACH_NOUNS: &[&str] = &["Cove", "Strand", "Landing", "Shore", "Sands"];
const SETTLEMENT_NOUNS: &[&str] = &["Village", "Hold", "Longhouse", "Kraal", "Gathering"];
const COMPOUND_PREFIXES: &[&str] = &["Iron", "Ash", "Black", "Rust", "Chain", "Brand"];
const COMPOUND_NOUNS: &[&str] = &["Stockade", "Compound", "Outpost", "Palisade", "Camp"];
const SACRED_ADJECTIVES: &[&str] = &["Whispering", "Silent", "Moonlit", "Weeping", "Ancestral", "Hollow"];
const SACRED_NOUNS: &[&str] = &["Shrine", "Cairn", "Spring", "Stones", "Grove", "Altar"];

fn pick<'a>(rng: &mut impl Rng, bank: &[&'a str]) -> &'a str {
    bank[rng.gen_range(0..bank.len())]
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Name generator for island places and peoples.
pub struct NameGenerator;

impl NameGenerator {
    /// Syllable-based name (e.g. "Tavaruk", "Moheli").
    pub fn clan_name(style: &Phonology, rng: &mut impl Rng) -> String {
        let syllables = rng.gen_range(style.syllable_range.0..=style.syllable_range.1);
        let mut name = String::new();

        for i in 0..syllables {
            // Vowel-leading names now and then
            if i > 0 || !rng.gen_bool(0.2) {
                name.push_str(pick(rng, style.onsets));
            }
            name.push_str(pick(rng, style.vowels));
            if i == syllables - 1 {
                name.push_str(pick(rng, style.codas));
            }
        }

        capitalize(&name)
    }

    /// Name for a location of the given kind.
    pub fn location_name(kind: LocationKind, rng: &mut impl Rng) -> String {
        match kind {
            LocationKind::StartingBeach => {
                format!("{} {}", pick(rng, BEACH_ADJECTIVES), pick(rng, BEACH_NOUNS))
            }
            LocationKind::CoastalCapital | LocationKind::HighlandCapital => {
                let clan = Self::clan_name(&ISLAND_TONGUE, rng);
                format!("{} {}", clan, pick(rng, SETTLEMENT_NOUNS))
            }
            LocationKind::HostileCompound => {
                format!("{} {}", pick(rng, COMPOUND_PREFIXES), pick(rng, COMPOUND_NOUNS))
            }
            LocationKind::SacredSite => {
                let spirit = Self::clan_name(&ISLAND_TONGUE, rng);
                format!("{} {} of {}", pick(rng, SACRED_ADJECTIVES), pick(rng, SACRED_NOUNS), spirit)
            }
        }
    }

    /// One-sentence description of a location standing on `terrain`.
    pub fn description(kind: LocationKind, terrain: Terrain, rng: &mut impl Rng) -> String {
        let land = terrain.display_name().to_lowercase();
        match kind {
            LocationKind::StartingBeach => match rng.gen_range(0..3) {
                0 => format!("A quiet stretch of {} where the tide left you.", land),
                1 => format!("Wreckage lies scattered across the {} here.", land),
                _ => format!("Gulls circle over this lonely {}.", land),
            },
            LocationKind::CoastalCapital => match rng.gen_range(0..2) {
                0 => format!("Stilt houses and canoes crowd the {} near the river mouth.", land),
                _ => format!("A fishing people keep their fires burning on this {}.", land),
            },
            LocationKind::HighlandCapital => match rng.gen_range(0..2) {
                0 => format!("Terraced huts cling to the {}, watching every approach.", land),
                _ => format!("Smoke rises from a walled village high in the {}.", land),
            },
            LocationKind::HostileCompound => match rng.gen_range(0..2) {
                0 => format!("Sharpened stakes ring a fortified camp in the {}.", land),
                _ => format!("Armed strangers have cleared the {} for their stockade.", land),
            },
            LocationKind::SacredSite => match rng.gen_range(0..3) {
                0 => format!("Carved stones stand untouched in the {}.", land),
                1 => format!("Offerings rot slowly at a shrine deep in the {}.", land),
                _ => format!("The islanders will not speak of what waits in this {}.", land),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::biomes::Biome;
    use crate::rng::IslandRng;

    #[test]
    fn test_names_are_deterministic() {
        let mut a = IslandRng::new(1500);
        let mut b = IslandRng::new(1500);
        for kind in [
            LocationKind::StartingBeach,
            LocationKind::CoastalCapital,
            LocationKind::HostileCompound,
            LocationKind::SacredSite,
        ] {
            assert_eq!(NameGenerator::location_name(kind, &mut a), NameGenerator::location_name(kind, &mut b));
        }
    }

    #[test]
    fn test_clan_name_shape() {
        let mut rng = IslandRng::new(8);
        for _ in 0..50 {
            let name = NameGenerator::clan_name(&ISLAND_TONGUE, &mut rng);
            assert!(name.len() >= 2);
            assert!(name.chars().next().unwrap().is_uppercase());
        }
    }

    #[test]
    fn test_description_mentions_terrain() {
        let mut rng = IslandRng::new(3);
        let text = NameGenerator::description(
            LocationKind::SacredSite,
            Terrain::Land(Biome::CloudForest),
            &mut rng,
        );
        assert!(text.contains("cloud forest"));
    }
}
