//! Clusters: one cached Voronoi diagram per square of `cluster_size` germs.
//!
//! A cluster resolves, for every tile of its square, the owning germ and the
//! tile's offset inside that germ's continental cell. The germ lattice is
//! padded on every side so cells touching the square are fully bounded.

use std::sync::Arc;

use tessera_cache::{SpatialCache, SpatialCacheStats};
use tessera_geom::Point2;
use tessera_noise::{Grid, jitter_unit, spatial_hash};

use crate::config::WorldGenParams;
use crate::continental::ContinentalCell;
use crate::error::ConstructionError;
use crate::metrics::Metrics;
use crate::voronoi::{Diagram, GermSpec};

/// Lattice rows and columns of border germs around the live area.
const PAD: i32 = 2;

/// Germ lattice shape shared by every cluster of a generator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClusterLayout {
    pub seed: i32,
    pub cell_size: i32,
    pub cluster_size: i32,
    /// Extra interior lattice steps past the cluster square.
    pub border: i32,
    pub neighbors: usize,
}

impl ClusterLayout {
    pub fn from_params(params: &WorldGenParams) -> Self {
        Self {
            seed: params.seed,
            cell_size: params.cell_size as i32,
            cluster_size: params.cluster_size as i32,
            border: params.border_germs() as i32,
            neighbors: params.neighbors,
        }
    }

    /// Tiles per cluster side.
    #[inline]
    pub fn span(&self) -> i32 {
        self.cluster_size * self.cell_size
    }

    /// Tile position of the germ at lattice `(lx, ly)`.
    ///
    /// Odd lattice rows shift left by half a cell, giving a roughly hexagonal
    /// packing; each germ then moves by a hashed jitter of at most a fifth of
    /// the cell.
    pub fn germ_position(&self, lx: i32, ly: i32) -> Point2 {
        let shift = if ly.rem_euclid(2) == 1 {
            self.cell_size >> 1
        } else {
            0
        };
        let amplitude = f64::from(self.cell_size / 5);
        let (jx, jy) = jitter_unit(spatial_hash(lx, ly, self.seed));
        let x = f64::from(lx * self.cell_size - shift) + amplitude * jx;
        let y = f64::from(ly * self.cell_size) + amplitude * jy;
        Point2::new(x.floor() as i32, y.floor() as i32)
    }

    /// Fewest germs any cluster's padded lattice holds. Odd rows carry one
    /// extra column and a cluster starts on either row parity.
    pub fn min_germ_count(&self) -> usize {
        let live = self.cluster_size + self.border;
        let rows = (live + 2 * PAD + 1) as usize;
        let cols = (live + 2 * PAD) as usize;
        rows * cols + rows / 2
    }

    /// Padded germ lattice of cluster `(cx, cy)`, row-major.
    pub fn germ_specs(&self, cx: i32, cy: i32) -> Vec<GermSpec> {
        let live = self.cluster_size + self.border;
        let (lx0, ly0) = (cx * self.cluster_size, cy * self.cluster_size);
        let mut specs = Vec::new();
        for row in -PAD..=live + PAD {
            let ly = ly0 + row;
            let odd = ly.rem_euclid(2);
            for col in -PAD..live + PAD + odd {
                let interior = (0..=live).contains(&row) && (0..=live + odd).contains(&col);
                specs.push(GermSpec::new(self.germ_position(lx0 + col, ly), interior));
            }
        }
        specs
    }
}

/// Where one tile of the cluster square falls.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TileCell {
    /// Index into [`Cluster::cells`].
    pub cell: usize,
    /// Position inside that cell's height grid.
    pub offset: Point2,
    /// Distance ratio to the owning germ, 0 at the germ and 1 on the border.
    pub distance: f32,
    /// Secondary seed for decoration.
    pub seed: i32,
}

#[derive(Clone, Copy)]
struct Claim {
    germ: usize,
    distance_sq: i64,
    offset: Point2,
    distance: f32,
}

#[derive(Debug)]
pub struct Cluster {
    pub x: i32,
    pub y: i32,
    /// Tile coordinate of the square's top-left tile.
    pub origin: Point2,
    diagram: Diagram,
    cells: Vec<ContinentalCell>,
    tiles: Grid<TileCell>,
}

impl Cluster {
    pub fn build(cx: i32, cy: i32, layout: &ClusterLayout) -> Result<Self, ConstructionError> {
        let span = layout.span();
        let origin = Point2::new(cx * span, cy * span);
        let diagram = Diagram::build(&layout.germ_specs(cx, cy), layout.neighbors)?;
        let side = span as usize;

        let mut claims: Grid<Option<Claim>> = Grid::new(side, side, None);
        let mut points_by_germ = vec![Vec::new(); diagram.germs().len()];
        for germ in diagram.interior() {
            let Some(region) = germ.region else {
                continue;
            };
            let points = germ.cell_points();
            for p in &points {
                let local = p.position - origin;
                if local.x < 0 || local.y < 0 || local.x >= span || local.y >= span {
                    continue;
                }
                let claim = Claim {
                    germ: germ.index,
                    distance_sq: p.position.distance_sq(germ.position),
                    offset: p.position - region.min,
                    distance: p.distance as f32,
                };
                let slot = &mut claims[(local.x as usize, local.y as usize)];
                let wins = match slot {
                    Some(held) => (claim.distance_sq, claim.germ) < (held.distance_sq, held.germ),
                    None => true,
                };
                if wins {
                    *slot = Some(claim);
                }
            }
            points_by_germ[germ.index] = points;
        }

        // Only germs that won at least one tile get a continental cell.
        let mut owners = vec![false; diagram.germs().len()];
        for claim in claims.as_slice().iter().flatten() {
            owners[claim.germ] = true;
        }
        let mut slot_of = vec![None; owners.len()];
        let mut cells = Vec::new();
        for germ in diagram.germs().iter().filter(|g| owners[g.index]) {
            if let Some(cell) = ContinentalCell::build(germ, &points_by_germ[germ.index], layout.seed)
            {
                slot_of[germ.index] = Some(cells.len());
                cells.push(cell);
            }
        }

        let mut resolved = Vec::with_capacity(side * side);
        for (i, claim) in claims.as_slice().iter().enumerate() {
            let tile = origin.offset((i % side) as i32, (i / side) as i32);
            let uncovered = ConstructionError::UncoveredTile {
                cluster_x: cx,
                cluster_y: cy,
                x: tile.x,
                y: tile.y,
            };
            let claim = claim.ok_or_else(|| uncovered.clone())?;
            let cell = slot_of[claim.germ].ok_or(uncovered)?;
            resolved.push(TileCell {
                cell,
                offset: claim.offset,
                distance: claim.distance,
                seed: spatial_hash(tile.x, tile.y, layout.seed),
            });
        }
        let tiles = Grid::from_fn(side, side, |x, y| resolved[y * side + x]);

        log::debug!(
            "cluster ({cx}, {cy}): {} germs, {} interior, {} cells over {} tiles",
            diagram.germs().len(),
            diagram.interior().count(),
            cells.len(),
            side * side
        );
        Ok(Self {
            x: cx,
            y: cy,
            origin,
            diagram,
            cells,
            tiles,
        })
    }

    #[inline]
    pub fn diagram(&self) -> &Diagram {
        &self.diagram
    }

    #[inline]
    pub fn cells(&self) -> &[ContinentalCell] {
        &self.cells
    }

    /// Record for a global tile coordinate; `None` outside this cluster.
    pub fn tile(&self, x: i32, y: i32) -> Option<&TileCell> {
        let local = Point2::new(x, y) - self.origin;
        if local.x < 0 || local.y < 0 {
            return None;
        }
        self.tiles.get(local.x as usize, local.y as usize)
    }

    /// Continental height of a global tile coordinate.
    pub fn base_height(&self, x: i32, y: i32) -> Option<f32> {
        let tile = self.tile(x, y)?;
        let cell = self.cells.get(tile.cell)?;
        cell.heights
            .get(tile.offset.x as usize, tile.offset.y as usize)
            .copied()
    }
}

/// Cluster cache keyed by cluster coordinate.
#[derive(Debug)]
pub struct ClusterStore {
    layout: ClusterLayout,
    metrics: Metrics,
    cache: SpatialCache<Cluster>,
}

impl ClusterStore {
    pub fn new(layout: ClusterLayout, metrics: Metrics, capacity: usize) -> Self {
        Self {
            layout,
            metrics,
            cache: SpatialCache::new(capacity),
        }
    }

    #[inline]
    pub fn layout(&self) -> &ClusterLayout {
        &self.layout
    }

    pub fn get(&mut self, cx: i32, cy: i32) -> Result<Arc<Cluster>, ConstructionError> {
        if let Some(cluster) = self.cache.load(cx, cy) {
            return Ok(cluster);
        }
        let cluster = Cluster::build(cx, cy, &self.layout)?;
        Ok(self.cache.store(cx, cy, cluster))
    }

    /// Cluster owning tile `(x, y)`.
    pub fn at_tile(&mut self, x: i32, y: i32) -> Result<Arc<Cluster>, ConstructionError> {
        let cx = self.metrics.tile_to_cluster(i64::from(x)) as i32;
        let cy = self.metrics.tile_to_cluster(i64::from(y)) as i32;
        self.get(cx, cy)
    }

    pub fn stats(&self) -> SpatialCacheStats {
        self.cache.stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> ClusterLayout {
        ClusterLayout::from_params(&WorldGenParams::default())
    }

    #[test]
    fn odd_rows_shift_left() {
        let layout = ClusterLayout {
            cell_size: 4,
            ..layout()
        };
        // cell_size / 5 == 0: no jitter
        assert_eq!(layout.germ_position(3, 0), Point2::new(12, 0));
        assert_eq!(layout.germ_position(3, 1), Point2::new(10, 4));
        assert_eq!(layout.germ_position(3, -1), Point2::new(10, -4));
    }

    #[test]
    fn jitter_stays_within_a_fifth_of_the_cell() {
        let layout = layout();
        for ly in -6..6 {
            for lx in -6..6 {
                let p = layout.germ_position(lx, ly);
                let shift = if ly.rem_euclid(2) == 1 { 12 } else { 0 };
                assert!((p.x - (lx * 25 - shift)).abs() <= 5);
                assert!((p.y - ly * 25).abs() <= 5);
            }
        }
    }

    #[test]
    fn interior_flags_follow_the_padding() {
        let layout = layout();
        let specs = layout.germ_specs(0, 0);
        // rows -2..=6; even rows 8 columns, odd rows 9
        assert_eq!(specs.len(), 5 * 8 + 4 * 9);
        // rows 0..=4; even rows 5 interior columns, odd rows 6
        assert_eq!(specs.iter().filter(|s| s.interior).count(), 3 * 5 + 2 * 6);
    }

    #[test]
    fn min_germ_count_covers_both_row_parities() {
        // 9 rows; clusters starting on an odd row get a fifth odd row
        let layout = ClusterLayout {
            cluster_size: 3,
            border: 1,
            ..layout()
        };
        let counts: Vec<usize> = (-2..2).map(|cy| layout.germ_specs(0, cy).len()).collect();
        assert_eq!(counts, vec![76, 77, 76, 77]);
        assert_eq!(layout.min_germ_count(), 76);
    }

    #[test]
    fn every_tile_of_the_square_is_claimed() {
        let cluster = Cluster::build(0, 0, &layout()).unwrap();
        for y in 0..100 {
            for x in 0..100 {
                let tile = cluster.tile(x, y).unwrap();
                let cell = &cluster.cells()[tile.cell];
                let germ = cluster.diagram().germ(cell.germ).unwrap();
                assert!(germ.contains(Point2::new(x, y)));
                assert!(cluster.base_height(x, y).unwrap() >= 0.0);
            }
        }
        assert!(cluster.tile(100, 0).is_none());
        assert!(cluster.tile(-1, 0).is_none());
    }

    #[test]
    fn negative_clusters_cover_their_square() {
        let cluster = Cluster::build(-3, -1, &layout()).unwrap();
        assert_eq!(cluster.origin, Point2::new(-300, -100));
        assert!(cluster.tile(-300, -100).is_some());
        assert!(cluster.tile(-201, -1).is_some());
        assert!(cluster.tile(-200, -1).is_none());
    }

    #[test]
    fn store_resolves_owning_cluster() {
        let params = WorldGenParams::default();
        let mut store = ClusterStore::new(layout(), params.metrics(), 2);
        let c = store.at_tile(-1, 150).unwrap();
        assert_eq!((c.x, c.y), (-1, 1));
        let again = store.get(-1, 1).unwrap();
        assert!(Arc::ptr_eq(&c, &again));
        assert_eq!(store.stats().hits, 1);
    }
}
