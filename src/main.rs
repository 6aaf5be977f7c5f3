use clap::Parser;
use tracing_subscriber::EnvFilter;

use hex_island::ascii::{self, AsciiMode};
use hex_island::export;
use hex_island::territory;
use hex_island::world::{self, IslandGenerator};
use hex_island::{IslandParams, IslandSeed};

#[derive(Parser, Debug)]
#[command(name = "hex_island")]
#[command(about = "Generate a deterministic hex island with factions and strategic locations")]
struct Args {
    /// Seed, numeric or text (uses random seed if not specified)
    #[arg(short, long)]
    seed: Option<String>,

    /// Hex radius of the island map
    #[arg(short, long)]
    radius: Option<u32>,

    /// Width of the forced ocean rim
    #[arg(long)]
    ocean_rim: Option<u32>,

    /// JSON file with generation parameters
    #[arg(short, long)]
    config: Option<String>,

    /// Print the island as ASCII
    #[arg(long)]
    ascii: bool,

    /// Export the island to a JSON file
    #[arg(long)]
    export: Option<String>,

    /// Write the ASCII map with statistics to a text file
    #[arg(long)]
    ascii_out: Option<String>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    if let Err(e) = run(args) {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> hex_island::Result<()> {
    let mut params = match &args.config {
        Some(path) => IslandParams::from_json_file(path)?,
        None => IslandParams::default(),
    };
    if let Some(radius) = args.radius {
        params.radius = radius;
    }
    if let Some(rim) = args.ocean_rim {
        params.ocean_boundary_width = rim;
    }
    params.validate()?;

    let seed = match &args.seed {
        Some(text) => IslandSeed::parse(text),
        None => IslandSeed::Number(rand::random()),
    };

    println!("Generating island with seed: {}", seed);
    println!("Radius: {} (ocean rim {})", params.radius, params.ocean_boundary_width);

    let world = IslandGenerator::new(params, seed).generate();

    println!();
    println!("Terrain:");
    for (name, count) in world::terrain_summary(&world) {
        println!("  {:16} {:>6}", name, count);
    }

    println!();
    println!("Locations:");
    for location in &world.locations {
        println!("  {} ({}) at {}", location.name, location.kind.display_name(), location.tile);
    }

    println!();
    println!("Factions:");
    for faction in &world.factions {
        let stats = territory::calculate_territory_stats(faction, &world.map);
        let capital = faction
            .capital
            .map(|c| c.to_string())
            .unwrap_or_else(|| "none".to_string());
        println!(
            "  {:16} {:>4} tiles (capital {}, {} coastal, {} highland, {} frontier)",
            faction.name,
            stats.total_tiles,
            capital,
            stats.coastal_tiles,
            stats.highland_tiles,
            stats.frontier_tiles
        );
    }

    if !world.warnings.is_empty() {
        println!();
        println!("Warnings:");
        for warning in &world.warnings {
            println!("  {}", warning);
        }
    }

    if args.ascii {
        println!();
        print!("{}", ascii::render_world(&world, AsciiMode::Terrain));
        println!();
        print!("{}", ascii::legend());
    }

    if let Some(path) = &args.ascii_out {
        ascii::export(&world, path)?;
        println!("ASCII map written to {}", path);
    }

    if let Some(path) = &args.export {
        export::write_json(&world, path)?;
        println!("Island exported to {}", path);
    }

    Ok(())
}
