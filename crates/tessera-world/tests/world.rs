use std::path::PathBuf;

use tessera_noise::Grid;
use tessera_world::{
    ConfigError, Palette, PaletteStop, SurfaceKind, TRANSPARENT, WorldError, WorldGenConfig,
    WorldGenParams, WorldGenerator, load_params_from_path,
};

fn default_generator() -> WorldGenerator {
    WorldGenerator::new(WorldGenParams::default()).unwrap()
}

#[test]
fn reference_scenario_produces_full_tiles() {
    let mut generator = default_generator();
    assert_eq!(generator.seed(), 0);
    for (x, y) in [(0, 0), (1, 0)] {
        let tile = generator.compute_tile(x, y).unwrap();
        assert_eq!(tile.size, 128);
        assert_eq!((tile.heights.width(), tile.heights.height()), (128, 128));
        assert_eq!(tile.physical_side(), 8);
        assert!(tile.heights.as_slice().iter().all(|h| h.is_finite()));
    }
}

#[test]
fn far_coordinates_generate() {
    let mut generator = default_generator();
    for (x, y) in [
        (999_999, -999_999),
        (-999_999, 999_999),
        (-999_999, -999_999),
        (123_456, -654_321),
        (-1, -1),
    ] {
        let tile = generator.compute_tile(x, y).unwrap();
        assert_eq!((i64::from(tile.x), i64::from(tile.y)), (x, y));
    }
}

#[test]
fn eviction_never_changes_a_tile() {
    let params = WorldGenParams {
        tile_cache: 1,
        cluster_cache: 1,
        block_cache: 9,
        ..WorldGenParams::default()
    };
    let mut generator = WorldGenerator::new(params).unwrap();
    let cold = (*generator.compute_tile(-3, 7).unwrap()).clone();
    generator.compute_tile(40, 40).unwrap();
    generator.compute_tile(-400, 250).unwrap();
    let stats = generator.cache_stats();
    assert!(stats.tiles.evictions >= 2);
    assert!(stats.blocks.evictions > 0);
    let warm = generator.compute_tile(-3, 7).unwrap();
    assert_eq!(*warm, cold);

    let fresh = default_generator().compute_tile(-3, 7).unwrap();
    assert_eq!(fresh.heights, cold.heights);
    assert_eq!(fresh.surface, cold.surface);
}

#[test]
fn seeds_change_the_terrain() {
    let a = default_generator().compute_tile(2, 2).unwrap();
    let params = WorldGenParams {
        seed: 1,
        ..WorldGenParams::default()
    };
    let b = WorldGenerator::new(params).unwrap().compute_tile(2, 2).unwrap();
    assert_ne!(a.heights, b.heights);
}

#[test]
fn palette_extremes() {
    let palette = Palette::default();
    let heights = Grid::from_vec(4, 1, vec![-1.0f32, 0.0, 0.999, 1.0]).unwrap();
    let colors = palette.colorize(&heights);
    assert_eq!(colors[(0, 0)], TRANSPARENT);
    assert_eq!(colors[(0, 0)] >> 24, 0);
    assert_eq!(palette.index_of(-1.0), None);
    assert_eq!(palette.index_of(0.0), Some(0));
    assert_eq!(palette.index_of(0.999), Some(palette.len() - 1));
    assert_eq!(palette.index_of(1.0), Some(palette.len() - 1));
    assert_eq!(colors[(1, 0)], palette.colors()[0]);
    assert_eq!(colors[(3, 0)], palette.colors()[palette.len() - 1]);
    for x in 1..4 {
        assert_eq!(colors[(x, 0)] >> 24, 0xFF);
    }
}

#[test]
fn surface_codes_are_known() {
    let mut generator = default_generator();
    let tile = generator.compute_tile(0, 1).unwrap();
    assert!(
        tile.surface
            .as_slice()
            .iter()
            .all(|k| SurfaceKind::from_code(k.code()) == Some(*k))
    );
    assert_eq!(tile.surface_at(127, 127), tile.surface.get(7, 7).copied());
}

#[test]
fn out_of_domain_is_an_error() {
    let mut generator = default_generator();
    let err = generator.compute_tile(1 << 24, 0).unwrap_err();
    assert!(matches!(err, WorldError::OutOfDomain { x, .. } if x == 1 << 24));
    // state is untouched
    assert!(generator.compute_tile(0, 0).is_ok());
}

#[test]
fn palette_must_be_configured() {
    let params = WorldGenParams {
        palette: Palette::from_stops(&[PaletteStop::new(0, "#000")]).unwrap(),
        ..WorldGenParams::default()
    };
    assert!(WorldGenerator::new(params).is_ok());
    let cfg = WorldGenConfig::from_toml_str("palette = []").unwrap();
    assert!(matches!(
        WorldGenParams::from_config(&cfg),
        Err(ConfigError::Missing("palette"))
    ));
}

#[test]
fn invalid_params_fail_construction() {
    let params = WorldGenParams {
        tile_size: 0,
        ..WorldGenParams::default()
    };
    assert!(matches!(
        WorldGenerator::new(params),
        Err(WorldError::Config(_))
    ));
    let params = WorldGenParams {
        block_cache: 4,
        ..WorldGenParams::default()
    };
    assert!(WorldGenerator::new(params).is_err());
}

#[test]
fn shipped_config_loads() {
    let root = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let params = load_params_from_path(&root.join("../../assets/worldgen.toml")).unwrap();
    assert_eq!(params.tile_size, 128);
    assert_eq!(params.palette, Palette::default());
    assert!(WorldGenerator::new(params).is_ok());
}
