//! ASCII rendering and export of the island
//!
//! The hexagon is drawn one axial row per line. Each row is indented by half a
//! cell per step away from the centre row so neighbours line up diagonally.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::Local;

use crate::biomes::Biome;
use crate::error::Result;
use crate::hex::HexCoord;
use crate::locations::LocationKind;
use crate::tile::{Terrain, Tile, TileMap};
use crate::world::{self, IslandWorld};

/// ASCII rendering modes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AsciiMode {
    /// Terrain and biome glyphs
    Terrain,
    /// Owning faction per tile
    Faction,
}

impl AsciiMode {
    pub fn name(&self) -> &'static str {
        match self {
            AsciiMode::Terrain => "Terrain",
            AsciiMode::Faction => "Faction",
        }
    }
}

pub fn terrain_char(terrain: Terrain) -> char {
    match terrain {
        Terrain::Sea => '~',
        Terrain::Beach => '.',
        Terrain::River => '=',
        Terrain::Land(biome) => biome_char(biome),
    }
}

pub fn biome_char(biome: Biome) -> char {
    match biome {
        Biome::Savanna => '"',
        Biome::Grassland => ',',
        Biome::Jungle => '&',
        Biome::ScrubHills => 'n',
        Biome::HighlandForest => 'T',
        Biome::JungleHills => 'h',
        Biome::Mountain => '^',
        Biome::CloudForest => 'C',
    }
}

pub fn location_char(kind: LocationKind) -> char {
    match kind {
        LocationKind::StartingBeach => 'S',
        LocationKind::CoastalCapital => 'K',
        LocationKind::HighlandCapital => 'H',
        LocationKind::HostileCompound => 'X',
        LocationKind::SacredSite => '*',
    }
}

fn faction_char(tile: &Tile) -> char {
    match tile.faction {
        // Ids past 9 wrap into letters
        Some(id) => std::char::from_digit(u32::from(id.0) % 36, 36).unwrap_or('?'),
        None if tile.is_land => '.',
        None => '~',
    }
}

fn tile_char(tile: &Tile, mode: AsciiMode) -> char {
    if tile.is_sacred {
        return '*';
    }
    if tile.is_strategic {
        return '@';
    }
    match mode {
        AsciiMode::Terrain => terrain_char(tile.terrain),
        AsciiMode::Faction => faction_char(tile),
    }
}

/// Render the map. Strategic tiles show as `@` and sacred tiles as `*`.
pub fn render(map: &TileMap, mode: AsciiMode) -> String {
    render_with(map, |tile| tile_char(tile, mode))
}

/// Like [`render`], but strategic tiles show the glyph of their location kind.
pub fn render_world(world: &IslandWorld, mode: AsciiMode) -> String {
    render_with(&world.map, |tile| {
        world
            .locations
            .iter()
            .find(|l| l.tile == tile.coord)
            .map(|l| location_char(l.kind))
            .unwrap_or_else(|| tile_char(tile, mode))
    })
}

fn render_with(map: &TileMap, glyph: impl Fn(&Tile) -> char) -> String {
    let radius = map.radius as i32;
    let mut result = String::new();

    for r in -radius..=radius {
        let q_min = (-radius).max(-r - radius);
        let q_max = radius.min(-r + radius);
        for _ in 0..r.unsigned_abs() {
            result.push(' ');
        }
        for q in q_min..=q_max {
            let ch = map.get(HexCoord::new(q, r)).map(&glyph).unwrap_or(' ');
            result.push(ch);
            if q < q_max {
                result.push(' ');
            }
        }
        result.push('\n');
    }

    result
}

pub fn legend() -> String {
    let mut legend = String::new();
    legend.push_str("=== LEGEND ===\n");
    legend.push_str("  ~ Sea   . Beach   = River\n");
    for biome in Biome::ALL {
        legend.push_str(&format!("  {} {}\n", biome_char(biome), biome.display_name()));
    }
    legend.push_str("  S Starting Beach   K Coastal Capital   H Highland Capital\n");
    legend.push_str("  X Hostile Compound   * Sacred Site\n");
    legend
}

/// Write the island to a text file with a short header and statistics.
pub fn export(world: &IslandWorld, path: impl AsRef<Path>) -> Result<()> {
    let mut file = BufWriter::new(File::create(path.as_ref())?);

    // Header
    writeln!(file, "=== HEX ISLAND ===")?;
    writeln!(file, "Seed: {} (master {})", world.seed, world.master_seed())?;
    writeln!(file, "Radius: {}", world.params.radius)?;
    writeln!(file, "Generated: {}", Local::now().format("%Y-%m-%d %H:%M:%S"))?;
    writeln!(file)?;

    writeln!(file, "=== MAP (Terrain View) ===")?;
    write!(file, "{}", render_world(world, AsciiMode::Terrain))?;
    writeln!(file)?;

    writeln!(file, "=== MAP (Faction View) ===")?;
    write!(file, "{}", render_world(world, AsciiMode::Faction))?;
    writeln!(file)?;

    write!(file, "{}", legend())?;
    writeln!(file)?;

    writeln!(file, "=== STATISTICS ===")?;
    let total = world.map.len().max(1);
    for (name, count) in world::terrain_summary(world) {
        let pct = 100.0 * count as f64 / total as f64;
        writeln!(file, "  {:16} {:>6} ({:>5.1}%)", name, count, pct)?;
    }
    writeln!(file)?;

    writeln!(file, "=== LOCATIONS ===")?;
    for location in &world.locations {
        writeln!(
            file,
            "  {} {:28} {:18} at {}",
            location_char(location.kind),
            location.name,
            location.kind.display_name(),
            location.tile
        )?;
    }

    if !world.warnings.is_empty() {
        writeln!(file)?;
        writeln!(file, "=== WARNINGS ===")?;
        for warning in &world.warnings {
            writeln!(file, "  {}", warning)?;
        }
    }

    file.flush()?;
    tracing::info!("wrote ASCII map to {}", path.as_ref().display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::IslandParams;
    use crate::world::IslandGenerator;

    #[test]
    fn test_render_has_one_line_per_row() {
        let map = TileMap::new_with(3, Tile::new);
        let text = render(&map, AsciiMode::Terrain);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 7);
        assert_eq!(lines[3], "~ ~ ~ ~ ~ ~ ~");
        assert_eq!(lines[0], "   ~ ~ ~ ~");
        let glyphs: usize = lines.iter().map(|l| l.chars().filter(|c| *c == '~').count()).sum();
        assert_eq!(glyphs, map.len());
    }

    #[test]
    fn test_locations_are_marked() {
        let world = IslandGenerator::new(IslandParams::small(), 21u32).generate();
        let text = render_world(&world, AsciiMode::Terrain);
        for location in &world.locations {
            assert!(text.contains(location_char(location.kind)));
        }
    }

    #[test]
    fn test_faction_view_shows_owners() {
        let world = IslandGenerator::new(IslandParams::small(), 21u32).generate();
        let text = render(&world.map, AsciiMode::Faction);
        let owned = world.map.values().any(|t| t.faction.is_some() && !t.is_strategic && !t.is_sacred);
        if owned {
            assert!(text.chars().any(|c| c.is_ascii_digit()));
        }
    }
}
