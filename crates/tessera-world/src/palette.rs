//! Elevation → colour ramp.

use serde::Deserialize;
use tessera_noise::Grid;

use crate::config::ConfigError;

/// Fully transparent; used for heights below sea level.
pub const TRANSPARENT: u32 = 0;

const MAX_ALTITUDE: u32 = 100;

/// One `[[palette]]` entry: a colour pinned at an altitude in `0..=100`.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct PaletteStop {
    pub altitude: u32,
    pub color: String,
}

impl PaletteStop {
    pub fn new(altitude: u32, color: impl Into<String>) -> Self {
        Self {
            altitude,
            color: color.into(),
        }
    }
}

pub fn default_stops() -> Vec<PaletteStop> {
    vec![
        PaletteStop::new(0, "#006"),
        PaletteStop::new(15, "#0000ff"),
        PaletteStop::new(20, "#00ffff"),
        PaletteStop::new(25, "#ffff00"),
        PaletteStop::new(75, "#008000"),
        PaletteStop::new(95, "#808080"),
        PaletteStop::new(100, "#ffffff"),
    ]
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// `#rgb` or `#rrggbb`.
    pub fn parse_hex(s: &str) -> Option<Rgb> {
        let hex = s.strip_prefix('#')?;
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |i: usize, n: usize| u8::from_str_radix(&hex[i * n..(i + 1) * n], 16).ok();
        match hex.len() {
            3 => Some(Rgb {
                r: channel(0, 1)? * 17,
                g: channel(1, 1)? * 17,
                b: channel(2, 1)? * 17,
            }),
            6 => Some(Rgb {
                r: channel(0, 2)?,
                g: channel(1, 2)?,
                b: channel(2, 2)?,
            }),
            _ => None,
        }
    }

    /// Opaque RGBA packed little-endian: `r | g << 8 | b << 16 | 0xFF << 24`.
    #[inline]
    pub fn pack(self) -> u32 {
        u32::from(self.r) | u32::from(self.g) << 8 | u32::from(self.b) << 16 | 0xFF << 24
    }

    fn lerp(self, other: Rgb, t: f32) -> Rgb {
        let mix = |a: u8, b: u8| (f32::from(a) + (f32::from(b) - f32::from(a)) * t).round() as u8;
        Rgb {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
        }
    }
}

/// One packed colour per integer altitude between the lowest and highest stop.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<u32>,
}

impl Palette {
    pub fn from_stops(stops: &[PaletteStop]) -> Result<Self, ConfigError> {
        if stops.is_empty() {
            return Err(ConfigError::Missing("palette"));
        }
        let mut parsed = Vec::with_capacity(stops.len());
        for stop in stops {
            if stop.altitude > MAX_ALTITUDE {
                return Err(ConfigError::Invalid {
                    field: "palette.altitude",
                    reason: format!("{} is above {MAX_ALTITUDE}", stop.altitude),
                });
            }
            let rgb = Rgb::parse_hex(&stop.color).ok_or_else(|| ConfigError::Invalid {
                field: "palette.color",
                reason: format!("`{}` is not #rgb or #rrggbb", stop.color),
            })?;
            parsed.push((stop.altitude, rgb));
        }
        parsed.sort_by_key(|(altitude, _)| *altitude);
        if let Some(w) = parsed.windows(2).find(|w| w[0].0 == w[1].0) {
            return Err(ConfigError::Invalid {
                field: "palette.altitude",
                reason: format!("duplicate stop at {}", w[0].0),
            });
        }

        Ok(Self {
            colors: ramp(&parsed),
        })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn colors(&self) -> &[u32] {
        &self.colors
    }

    /// Ramp index for a height; `None` below sea level.
    pub fn index_of(&self, height: f32) -> Option<usize> {
        if height < 0.0 || height.is_nan() {
            return None;
        }
        let len = self.colors.len();
        Some(((height * len as f32) as usize).min(len - 1))
    }

    pub fn color_of(&self, height: f32) -> u32 {
        self.index_of(height).map_or(TRANSPARENT, |i| self.colors[i])
    }

    pub fn colorize(&self, heights: &Grid<f32>) -> Grid<u32> {
        heights.map(|_, _, h| self.color_of(*h))
    }
}

impl Default for Palette {
    fn default() -> Self {
        let parsed: Vec<(u32, Rgb)> = default_stops()
            .iter()
            .filter_map(|s| Some((s.altitude, Rgb::parse_hex(&s.color)?)))
            .collect();
        Self {
            colors: ramp(&parsed),
        }
    }
}

/// Expand sorted, distinct stops into one colour per altitude.
fn ramp(stops: &[(u32, Rgb)]) -> Vec<u32> {
    let Some(&(_, first)) = stops.first() else {
        return Vec::new();
    };
    let mut colors = vec![first.pack()];
    for w in stops.windows(2) {
        let ((a0, c0), (a1, c1)) = (w[0], w[1]);
        let span = (a1 - a0) as f32;
        for a in a0 + 1..=a1 {
            colors.push(c0.lerp(c1, (a - a0) as f32 / span).pack());
        }
    }
    colors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_short_and_long_hex() {
        assert_eq!(Rgb::parse_hex("#006"), Some(Rgb { r: 0, g: 0, b: 0x66 }));
        assert_eq!(
            Rgb::parse_hex("#12ab9F"),
            Some(Rgb {
                r: 0x12,
                g: 0xab,
                b: 0x9f
            })
        );
        assert_eq!(Rgb::parse_hex("blue"), None);
        assert_eq!(Rgb::parse_hex("#12345"), None);
        assert_eq!(Rgb::parse_hex("#+1+2+3"), None);
    }

    #[test]
    fn pack_layout() {
        assert_eq!(Rgb { r: 1, g: 2, b: 3 }.pack(), 0xFF03_0201);
    }

    #[test]
    fn default_ramp_covers_every_altitude() {
        let p = Palette::default();
        assert_eq!(p.len(), 101);
        assert_eq!(p.colors()[0], Rgb { r: 0, g: 0, b: 0x66 }.pack());
        assert_eq!(p.colors()[100], Rgb { r: 255, g: 255, b: 255 }.pack());
        assert_eq!(p.colors()[15], Rgb { r: 0, g: 0, b: 255 }.pack());
    }

    #[test]
    fn interpolates_between_stops() {
        let p = Palette::from_stops(&[PaletteStop::new(0, "#000"), PaletteStop::new(2, "#fff")])
            .unwrap();
        assert_eq!(p.len(), 3);
        assert_eq!(p.colors()[1], Rgb { r: 128, g: 128, b: 128 }.pack());
    }

    #[test]
    fn rejects_bad_stops() {
        assert!(matches!(
            Palette::from_stops(&[]),
            Err(ConfigError::Missing("palette"))
        ));
        assert!(Palette::from_stops(&[PaletteStop::new(101, "#fff")]).is_err());
        assert!(Palette::from_stops(&[PaletteStop::new(0, "white")]).is_err());
        assert!(
            Palette::from_stops(&[PaletteStop::new(5, "#fff"), PaletteStop::new(5, "#000")])
                .is_err()
        );
    }
}
