/// Nearest palette colour lookup
use crate::error::{Result, VoxelizerError};
use crate::point::Color;
use constants::palette::{DEFAULT_BLOCK, PaletteEntry};
use constants::pipeline::{MAX_CHANNEL_8, MAX_CHANNEL_16};

/// Classifies RGB triples against a fixed palette.
///
/// Entries are scanned in declaration order and an entry replaces the current
/// best only when its squared distance is strictly smaller, so on exact ties
/// the earliest declared entry wins.
#[derive(Debug, Clone, Copy)]
pub struct ColorClassifier {
    palette: &'static [PaletteEntry],
}

impl ColorClassifier {
    pub fn new(palette: &'static [PaletteEntry]) -> Result<Self> {
        if palette.is_empty() {
            return Err(VoxelizerError::EmptyPalette);
        }
        Ok(Self { palette })
    }

    /// Normalise an 8 or 16 bit triple to `[0, 1]`.
    /// Any channel above 255 marks the whole triple as 16 bit.
    pub fn normalize(rgb: [f64; 3]) -> Color {
        let max = if rgb.iter().any(|&c| c > MAX_CHANNEL_8) {
            MAX_CHANNEL_16
        } else {
            MAX_CHANNEL_8
        };
        Color::new(rgb[0] / max, rgb[1] / max, rgb[2] / max)
    }

    /// Index and squared distance of the closest palette entry
    pub fn nearest(&self, color: &Color) -> Option<(usize, f64)> {
        let mut best: Option<(usize, f64)> = None;
        let mut min_dist = f64::INFINITY;

        for (idx, entry) in self.palette.iter().enumerate() {
            let dist = color.distance_squared(&Color::from_array(entry.color));
            if dist < min_dist {
                min_dist = dist;
                best = Some((idx, dist));
            }
        }

        best
    }

    /// Label of the palette entry closest to a normalised colour
    pub fn classify_color(&self, color: &Color) -> &'static str {
        self.nearest(color)
            .map_or(DEFAULT_BLOCK, |(idx, _)| self.palette[idx].label)
    }

    /// Label of the palette entry closest to a raw 8 or 16 bit triple
    pub fn classify(&self, rgb: [f64; 3]) -> &'static str {
        self.classify_color(&Self::normalize(rgb))
    }
}
