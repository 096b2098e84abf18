//! Block palette used for nearest colour lookup.
//!
//! Colours are normalised RGB in `[0, 1]`. Order matters: the classifier keeps
//! the first entry on exact distance ties, and the table intentionally holds
//! entries with identical colours (`BROWN_WOOL`/`GREEN_WOOL`) and a repeated
//! label (`WOOL`).

/// Label returned when nothing in the palette is closer than infinity
pub const DEFAULT_BLOCK: &str = "STONE";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaletteEntry {
    pub label: &'static str,
    pub color: [f64; 3],
}

impl PaletteEntry {
    pub const fn new(label: &'static str, r: f64, g: f64, b: f64) -> Self {
        Self {
            label,
            color: [r, g, b],
        }
    }
}

pub const BLOCK_PALETTE: &[PaletteEntry] = &[
    PaletteEntry::new("WOOL", 0.95, 0.95, 0.95),
    PaletteEntry::new("ORANGE_WOOL", 0.92, 0.53, 0.25),
    PaletteEntry::new("MAGENTA_WOOL", 0.73, 0.31, 0.77),
    PaletteEntry::new("LIGHT_BLUE_WOOL", 0.43, 0.55, 0.81),
    PaletteEntry::new("YELLOW_WOOL", 0.77, 0.71, 0.11),
    PaletteEntry::new("LIME_WOOL", 0.23, 0.75, 0.18),
    PaletteEntry::new("PINK_WOOL", 0.84, 0.54, 0.62),
    PaletteEntry::new("GRAY_WOOL", 0.26, 0.26, 0.26),
    PaletteEntry::new("LIGHT_GRAY_WOOL", 0.62, 0.65, 0.65),
    PaletteEntry::new("CYAN_WOOL", 0.15, 0.46, 0.59),
    PaletteEntry::new("PURPLE_WOOL", 0.53, 0.23, 0.80),
    PaletteEntry::new("BLUE_WOOL", 0.15, 0.20, 0.60),
    PaletteEntry::new("BROWN_WOOL", 0.22, 0.30, 0.09),
    PaletteEntry::new("GREEN_WOOL", 0.22, 0.30, 0.09),
    PaletteEntry::new("RED_WOOL", 0.65, 0.17, 0.16),
    PaletteEntry::new("BLACK_WOOL", 0.0, 0.0, 0.0),
    PaletteEntry::new("WOOL", 0.77, 0.65, 0.60),
    PaletteEntry::new("ORANGE_TERRACOTTA", 0.60, 0.31, 0.14),
    PaletteEntry::new("MAGENTA_TERRACOTTA", 0.56, 0.33, 0.40),
    PaletteEntry::new("LIGHT_BLUE_TERRACOTTA", 0.44, 0.42, 0.54),
    PaletteEntry::new("YELLOW_TERRACOTTA", 0.69, 0.49, 0.13),
    PaletteEntry::new("LIME_TERRACOTTA", 0.38, 0.44, 0.20),
    PaletteEntry::new("PINK_TERRACOTTA", 0.63, 0.30, 0.31),
    PaletteEntry::new("GRAY_TERRACOTTA", 0.22, 0.16, 0.14),
    PaletteEntry::new("LIGHT_GRAY_TERRACOTTA", 0.53, 0.42, 0.38),
    PaletteEntry::new("CYAN_TERRACOTTA", 0.34, 0.35, 0.36),
    PaletteEntry::new("PURPLE_TERRACOTTA", 0.44, 0.25, 0.31),
    PaletteEntry::new("BLUE_TERRACOTTA", 0.27, 0.22, 0.33),
    PaletteEntry::new("BROWN_TERRACOTTA", 0.28, 0.19, 0.13),
    PaletteEntry::new("GREEN_TERRACOTTA", 0.29, 0.32, 0.16),
    PaletteEntry::new("RED_TERRACOTTA", 0.56, 0.24, 0.18),
    PaletteEntry::new("BLACK_TERRACOTTA", 0.13, 0.08, 0.06),
    PaletteEntry::new("STONE", 0.47, 0.47, 0.47),
    PaletteEntry::new("SANDSTONE", 0.88, 0.85, 0.64),
    PaletteEntry::new("PLANKS_OAK", 0.66, 0.53, 0.34),
];

#[cfg(test)]
mod tests {
    use super::*;

    fn position(label: &str) -> Option<usize> {
        BLOCK_PALETTE.iter().position(|entry| entry.label == label)
    }

    #[test]
    fn test_default_block_is_in_palette() {
        assert!(position(DEFAULT_BLOCK).is_some());
    }

    #[test]
    fn test_repeated_label_resolves_to_first_entry() {
        assert_eq!(position("WOOL"), Some(0));
    }

    #[test]
    fn test_colours_are_normalised() {
        for entry in BLOCK_PALETTE {
            assert!(entry.color.iter().all(|c| (0.0..=1.0).contains(c)), "{}", entry.label);
        }
    }
}
