use tessera_noise::Grid;

use crate::config::ConfigError;

/// Coarse surface class of one physical cell. The discriminants are stable
/// codes shared with renderers.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SurfaceKind {
    Water = 11,
    Shore = 12,
    Coast = 22,
    Plain = 23,
    Forest = 33,
    Peak = 55,
}

impl SurfaceKind {
    pub const ALL: [SurfaceKind; 6] = [
        SurfaceKind::Water,
        SurfaceKind::Shore,
        SurfaceKind::Coast,
        SurfaceKind::Plain,
        SurfaceKind::Forest,
        SurfaceKind::Peak,
    ];

    #[inline]
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.code() == code)
    }
}

/// Upper bounds (exclusive) of each band; anything at or above `forest` is a peak.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceThresholds {
    pub water: f32,
    pub shore: f32,
    pub coast: f32,
    pub plain: f32,
    pub forest: f32,
}

impl Default for SurfaceThresholds {
    fn default() -> Self {
        Self {
            water: 0.20,
            shore: 0.25,
            coast: 0.30,
            plain: 0.55,
            forest: 0.85,
        }
    }
}

impl SurfaceThresholds {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let bands = [self.water, self.shore, self.coast, self.plain, self.forest];
        if bands.iter().any(|t| !t.is_finite()) || bands.windows(2).any(|w| w[0] >= w[1]) {
            return Err(ConfigError::Invalid {
                field: "physical",
                reason: format!("thresholds must be finite and strictly increasing: {bands:?}"),
            });
        }
        Ok(())
    }

    pub fn classify(&self, height: f32) -> SurfaceKind {
        if height < self.water {
            SurfaceKind::Water
        } else if height < self.shore {
            SurfaceKind::Shore
        } else if height < self.coast {
            SurfaceKind::Coast
        } else if height < self.plain {
            SurfaceKind::Plain
        } else if height < self.forest {
            SurfaceKind::Forest
        } else {
            SurfaceKind::Peak
        }
    }
}

/// Classify each `cell × cell` block of `heights` by its mean height.
///
/// `cell` must divide both sides of the grid.
pub fn surface_grid(
    heights: &Grid<f32>,
    cell: usize,
    thresholds: &SurfaceThresholds,
) -> Grid<SurfaceKind> {
    let (w, h) = (heights.width() / cell, heights.height() / cell);
    let area = (cell * cell) as f32;
    Grid::from_fn(w, h, |cx, cy| {
        let mut sum = 0.0f32;
        for y in cy * cell..(cy + 1) * cell {
            sum += heights.row(y)[cx * cell..(cx + 1) * cell].iter().sum::<f32>();
        }
        thresholds.classify(sum / area)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bands_are_half_open() {
        let t = SurfaceThresholds::default();
        assert_eq!(t.classify(-1.0), SurfaceKind::Water);
        assert_eq!(t.classify(0.2), SurfaceKind::Shore);
        assert_eq!(t.classify(0.29), SurfaceKind::Coast);
        assert_eq!(t.classify(0.3), SurfaceKind::Plain);
        assert_eq!(t.classify(0.6), SurfaceKind::Forest);
        assert_eq!(t.classify(0.85), SurfaceKind::Peak);
    }

    #[test]
    fn codes_round_trip() {
        for kind in SurfaceKind::ALL {
            assert_eq!(SurfaceKind::from_code(kind.code()), Some(kind));
        }
        assert_eq!(SurfaceKind::from_code(0), None);
    }

    #[test]
    fn unordered_thresholds_are_rejected() {
        let t = SurfaceThresholds {
            coast: 0.1,
            ..SurfaceThresholds::default()
        };
        assert!(t.validate().is_err());
        assert!(SurfaceThresholds::default().validate().is_ok());
    }

    #[test]
    fn grid_uses_block_means() {
        let heights = Grid::from_fn(4, 2, |x, _| if x < 2 { 0.0 } else { 0.9 });
        let surface = surface_grid(&heights, 2, &SurfaceThresholds::default());
        assert_eq!((surface.width(), surface.height()), (2, 1));
        assert_eq!(surface.row(0), &[SurfaceKind::Water, SurfaceKind::Peak]);
    }
}
