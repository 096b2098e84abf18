/// Per-point colour adjustment applied before voxel averaging
use constants::pipeline::{
    DEFAULT_BRIGHTNESS, DEFAULT_HIGHLIGHT_THRESHOLD, HIGHLIGHT_FILL, MAX_CHANNEL_16,
};

/// Brightness scaling followed by highlight clamping.
///
/// A sample is overexposed when any one channel exceeds its threshold; all
/// three of its channels are then replaced by [`HIGHLIGHT_FILL`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColourAdjustment {
    pub brightness: f64,
    pub thresholds: [u16; 3],
}

impl Default for ColourAdjustment {
    fn default() -> Self {
        Self {
            brightness: DEFAULT_BRIGHTNESS,
            thresholds: [DEFAULT_HIGHLIGHT_THRESHOLD; 3],
        }
    }
}

impl ColourAdjustment {
    pub fn new(brightness: f64, thresholds: [u16; 3]) -> Self {
        Self {
            brightness,
            thresholds,
        }
    }

    /// Adjusted colour of a single 16 bit sample
    pub fn apply(&self, rgb: [u16; 3]) -> [u16; 3] {
        let rgb = self.brighten(rgb);
        if self.is_highlight(rgb) {
            [HIGHLIGHT_FILL; 3]
        } else {
            rgb
        }
    }

    /// Scale every channel, clamp to the 16 bit range and round half to even.
    /// A multiplier of exactly 1.0 is a passthrough.
    pub fn brighten(&self, rgb: [u16; 3]) -> [u16; 3] {
        if self.brightness == 1.0 {
            return rgb;
        }
        rgb.map(|c| {
            (c as f64 * self.brightness)
                .clamp(0.0, MAX_CHANNEL_16)
                .round_ties_even() as u16
        })
    }

    pub fn is_highlight(&self, rgb: [u16; 3]) -> bool {
        rgb.iter()
            .zip(&self.thresholds)
            .any(|(channel, threshold)| channel > threshold)
    }
}
