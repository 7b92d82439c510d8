//! Approximate Voronoi partitioning by bisector half-planes.
//!
//! A cell is bounded by the perpendicular bisectors between its germ and the
//! germ's `k` nearest neighbours only. Membership is point classification;
//! no polygon is ever built.

use tessera_geom::{Point2, Rect2, on_germ_side};

use crate::error::ConstructionError;

/// Input germ: a position and whether its cell is live.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GermSpec {
    pub position: Point2,
    /// Border germs only shape the cells of interior ones.
    pub interior: bool,
}

impl GermSpec {
    pub fn new(position: Point2, interior: bool) -> Self {
        Self { position, interior }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Neighbor {
    /// Index of the neighbouring germ in the diagram.
    pub index: usize,
    pub position: Point2,
    pub distance_sq: i64,
    /// Bisector midpoint in doubled coordinates (`germ + neighbour`), exact on the lattice.
    pub midpoint2: Point2,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Germ {
    pub index: usize,
    pub position: Point2,
    pub interior: bool,
    /// Nearest germs, closest first. Empty for border germs.
    pub neighbors: Vec<Neighbor>,
    /// Bounds of the germ and its neighbours; `None` for border germs.
    pub region: Option<Rect2>,
}

impl Germ {
    /// True when `p` is on this germ's side of every registered bisector.
    pub fn contains(&self, p: Point2) -> bool {
        self.neighbors
            .iter()
            .all(|n| on_germ_side(p, self.position, n.position))
    }

    /// `(|p - g|² / min_n |p - n|²)²` with both terms floored at 1: close to
    /// 0 at the germ, 1 on the bisector with the nearest neighbour.
    pub fn distance_ratio(&self, p: Point2) -> f64 {
        let Some(nearest) = self.neighbors.iter().map(|n| p.distance_sq(n.position)).min() else {
            return 0.0;
        };
        let own = p.distance_sq(self.position).max(1) as f64;
        let r = own / nearest.max(1) as f64;
        r * r
    }

    /// Every lattice point of the bounding region inside the cell.
    pub fn cell_points(&self) -> Vec<CellPoint> {
        let Some(region) = self.region else {
            return Vec::new();
        };
        region
            .points()
            .filter(|p| self.contains(*p))
            .map(|position| CellPoint {
                position,
                distance: self.distance_ratio(position),
            })
            .collect()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellPoint {
    pub position: Point2,
    pub distance: f64,
}

#[derive(Clone, Debug)]
pub struct Diagram {
    germs: Vec<Germ>,
    k: usize,
}

impl Diagram {
    /// Resolve the `k` nearest neighbours of every interior germ.
    ///
    /// Ties in distance go to the lower germ index.
    pub fn build(specs: &[GermSpec], k: usize) -> Result<Self, ConstructionError> {
        let mut germs = Vec::with_capacity(specs.len());
        for (index, spec) in specs.iter().enumerate() {
            let mut germ = Germ {
                index,
                position: spec.position,
                interior: spec.interior,
                neighbors: Vec::new(),
                region: None,
            };
            if spec.interior {
                let available = specs.len() - 1;
                if available < k {
                    return Err(ConstructionError::InsufficientNeighbors {
                        germ: index,
                        available,
                        required: k,
                    });
                }
                germ.neighbors = nearest(index, specs, k);
                germ.region = Rect2::from_points(
                    std::iter::once(spec.position).chain(germ.neighbors.iter().map(|n| n.position)),
                );
            }
            germs.push(germ);
        }
        Ok(Self { germs, k })
    }

    #[inline]
    pub fn germs(&self) -> &[Germ] {
        &self.germs
    }

    #[inline]
    pub fn germ(&self, index: usize) -> Option<&Germ> {
        self.germs.get(index)
    }

    pub fn interior(&self) -> impl Iterator<Item = &Germ> {
        self.germs.iter().filter(|g| g.interior)
    }

    #[inline]
    pub fn neighbor_count(&self) -> usize {
        self.k
    }

    /// Membership of `p` in the cell of germ `index`; false for unknown germs.
    pub fn contains(&self, index: usize, p: Point2) -> bool {
        self.germ(index).is_some_and(|g| g.interior && g.contains(p))
    }
}

fn nearest(index: usize, specs: &[GermSpec], k: usize) -> Vec<Neighbor> {
    let origin = specs[index].position;
    let mut candidates: Vec<Neighbor> = specs
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != index)
        .map(|(i, other)| Neighbor {
            index: i,
            position: other.position,
            distance_sq: origin.distance_sq(other.position),
            midpoint2: origin + other.position,
        })
        .collect();
    candidates.sort_by_key(|n| (n.distance_sq, n.index));
    candidates.truncate(k);
    candidates
}
