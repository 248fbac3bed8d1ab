use std::process::ExitCode;

use clap::Parser;

use island_generator::ascii::{self, AsciiMode};
use island_generator::config::{GeneratorConfig, IslandConfig};
use island_generator::elevation::ElevationMode;
use island_generator::export;
use island_generator::generator;

#[derive(Parser, Debug)]
#[command(name = "island_generator")]
#[command(about = "Generate procedural island heightmaps on a jittered quad raster")]
struct Args {
    /// JSON configuration file; flags below override its values
    #[arg(short, long)]
    config: Option<String>,

    /// Random seed (uses random seed if not specified)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Raster columns
    #[arg(short = 'm', long)]
    columns: Option<u32>,

    /// Border width in world units
    #[arg(short = 'W', long)]
    width: Option<f32>,

    /// Border height in world units
    #[arg(short = 'H', long)]
    height: Option<f32>,

    /// Corner jitter as a fraction of the cell size (0-1)
    #[arg(short, long)]
    jitter: Option<f32>,

    /// Island shape: circle or field
    #[arg(short, long)]
    island: Option<String>,

    /// Circle island radius in world units
    #[arg(long)]
    radius: Option<f32>,

    /// Heightmap width in pixels
    #[arg(short, long)]
    resolution: Option<usize>,

    /// Elevation mode: rise or flat
    #[arg(short, long)]
    elevation: Option<ElevationMode>,

    /// Export the heightmap as a spectral PNG
    #[arg(short, long)]
    output: Option<String>,

    /// Export the heightmap as a 16-bit grayscale PNG
    #[arg(long)]
    gray16: Option<String>,

    /// Export the heightmap as JSON
    #[arg(long)]
    json: Option<String>,

    /// Export the cell/corner classification as PNG
    #[arg(long)]
    classes: Option<String>,

    /// Print an ASCII preview
    #[arg(long)]
    ascii: bool,

    /// Print the effective configuration as JSON and exit
    #[arg(long)]
    dump_config: bool,
}

fn build_config(args: &Args) -> Result<GeneratorConfig, String> {
    let mut config = match args.config {
        Some(ref path) => GeneratorConfig::load(path).map_err(|e| format!("{}: {}", path, e))?,
        None => GeneratorConfig::default(),
    };

    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    if let Some(columns) = args.columns {
        config.columns = columns;
    }
    if let Some(width) = args.width {
        config.width = width;
    }
    if let Some(height) = args.height {
        config.height = height;
    }
    if let Some(jitter) = args.jitter {
        config.jitter = jitter;
    }
    if let Some(resolution) = args.resolution {
        config.resolution = resolution;
    }
    if let Some(mode) = args.elevation {
        config.elevation = mode;
    }

    if let Some(ref island) = args.island {
        let keep = island.eq_ignore_ascii_case(config.island.name());
        if !keep {
            config.island = match island.to_lowercase().as_str() {
                "circle" => IslandConfig::default_circle(),
                "field" => IslandConfig::default_field(),
                other => return Err(format!("unknown island shape '{}' (expected circle or field)", other)),
            };
        }
    }
    if let Some(r) = args.radius {
        match config.island {
            IslandConfig::Circle { ref mut radius, .. } => *radius = r,
            IslandConfig::Field { .. } => return Err("--radius only applies to the circle island".to_string()),
        }
    }

    Ok(config)
}

fn main() -> ExitCode {
    let args = Args::parse();

    let mut config = match build_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let seed = config.seed.unwrap_or_else(rand::random);
    config.seed = Some(seed);

    if args.dump_config {
        match serde_json::to_string_pretty(&config) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Failed to serialize configuration: {}", e);
                return ExitCode::FAILURE;
            }
        }
        return ExitCode::SUCCESS;
    }

    println!("Generating island with seed: {}", seed);
    println!("Border: {}x{}, {} columns", config.width, config.height, config.columns);
    println!("Island: {}, elevation: {}", config.island.name(), config.elevation);

    let map = match generator::generate(&config) {
        Ok(map) => map,
        Err(e) => {
            eprintln!("Generation failed: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let stats = map.stats();
    println!("Raster: {}x{} cells", stats.columns, stats.rows);
    println!(
        "Classified {} land cells ({} coast corners, {} land corners)",
        stats.land_cells, stats.coast_corners, stats.land_corners
    );
    println!(
        "Elevation: {} waves, max {:.2}",
        stats.waves, stats.max_elevation
    );
    println!(
        "Heightmap {}x{}: range {:.3} to {:.3}, mean {:.3} ({:.1}% land)",
        map.heightmap.width,
        map.heightmap.height,
        stats.min_height,
        stats.max_height,
        stats.mean_height,
        100.0 * stats.land_fraction
    );

    let mut failed = false;

    if let Some(ref path) = args.output {
        match export::export_heightmap(&map.heightmap, path) {
            Ok(()) => println!("Exported heightmap to: {}", path),
            Err(e) => {
                eprintln!("Failed to export heightmap: {}", e);
                failed = true;
            }
        }
    }

    if let Some(ref path) = args.gray16 {
        match export::export_heightmap_gray16(&map.heightmap, path) {
            Ok(()) => println!("Exported 16-bit heightmap to: {}", path),
            Err(e) => {
                eprintln!("Failed to export 16-bit heightmap: {}", e);
                failed = true;
            }
        }
    }

    if let Some(ref path) = args.json {
        match export::export_heightmap_json(&map, path) {
            Ok(()) => println!("Exported heightmap JSON to: {}", path),
            Err(e) => {
                eprintln!("Failed to export heightmap JSON: {}", e);
                failed = true;
            }
        }
    }

    if let Some(ref path) = args.classes {
        match export::export_classification(&map.classification, 4, path) {
            Ok(()) => println!("Exported classification to: {}", path),
            Err(e) => {
                eprintln!("Failed to export classification: {}", e);
                failed = true;
            }
        }
    }

    if args.ascii {
        ascii::print_ascii_map(&map, AsciiMode::Cells, 100);
        ascii::print_ascii_map(&map, AsciiMode::Height, 100);
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
