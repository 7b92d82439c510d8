//! Terminal preview: prints the surface classes of a rectangle of tiles.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use rayon::prelude::*;
use tessera_world::{SurfaceKind, WorldGenParams, WorldGenerator, load_params_from_path};

#[derive(Parser, Debug)]
#[command(name = "tessera", author, version, about = "Deterministic infinite terrain preview")]
struct Cli {
    /// Worldgen TOML; built-in defaults when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Left tile column.
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    x: i64,

    /// Top tile row.
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    y: i64,

    /// Tiles across.
    #[arg(long, default_value_t = 4)]
    width: u32,

    /// Tiles down.
    #[arg(long, default_value_t = 3)]
    height: u32,

    /// Override the configured seed.
    #[arg(long, allow_hyphen_values = true)]
    seed: Option<i32>,
}

fn glyph(kind: SurfaceKind) -> char {
    match kind {
        SurfaceKind::Water => '~',
        SurfaceKind::Shore => '-',
        SurfaceKind::Coast => '.',
        SurfaceKind::Plain => ',',
        SurfaceKind::Forest => '^',
        SurfaceKind::Peak => 'A',
    }
}

/// Text lines for one row of tiles.
fn render_row(generator: &mut WorldGenerator, cli: &Cli, row: i64) -> Result<Vec<String>> {
    let ty = cli.y + row;
    let mut tiles = Vec::with_capacity(cli.width as usize);
    for col in 0..i64::from(cli.width) {
        let tx = cli.x + col;
        let tile = generator
            .compute_tile(tx, ty)
            .with_context(|| format!("generating tile ({tx}, {ty})"))?;
        tiles.push(tile);
    }
    let side = tiles.first().map_or(0, |t| t.physical_side());
    Ok((0..side)
        .map(|r| {
            tiles
                .iter()
                .flat_map(|t| t.surface.row(r).iter().map(|k| glyph(*k)))
                .collect()
        })
        .collect())
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut params = match &cli.config {
        Some(path) => load_params_from_path(path)
            .with_context(|| format!("loading worldgen config {}", path.display()))?,
        None => WorldGenParams::default(),
    };
    if let Some(seed) = cli.seed {
        params.seed = seed;
    }
    // Fail once up front instead of once per worker.
    WorldGenerator::new(params.clone()).context("invalid worldgen settings")?;

    let start = Instant::now();
    let rows: Vec<Vec<String>> = (0..cli.height)
        .into_par_iter()
        .map_init(
            || WorldGenerator::new(params.clone()),
            |generator, row| {
                let generator = generator.as_mut().map_err(|e| anyhow!("{e}"))?;
                render_row(generator, &cli, i64::from(row))
            },
        )
        .collect::<Result<_>>()?;

    for line in rows.iter().flatten() {
        println!("{line}");
    }
    log::info!(
        "{} tiles in {:.2?}",
        u64::from(cli.width) * u64::from(cli.height),
        start.elapsed()
    );
    Ok(())
}
