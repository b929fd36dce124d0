//! Tendon color assignment
//!
//! Tendons are numbered from 1 by the computation service. Each id maps to
//! one of twelve fixed colors, cycling every twelve tendons. Ids that are not
//! base-10 integers get a neutral gray.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;

/// An opaque sRGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Nearest entry in the xterm 256-color table
    pub fn ansi256(&self) -> u8 {
        let (r, g, b) = (self.r as i32, self.g as i32, self.b as i32);

        // Near-neutral colors map onto the 24-step gray ramp
        if (r - g).abs() < 10 && (g - b).abs() < 10 && (r - b).abs() < 10 {
            let avg = (r + g + b) / 3;
            if avg < 8 {
                return 16;
            }
            if avg > 238 {
                return 231;
            }
            return (232 + (avg - 8) * 24 / 231) as u8;
        }

        let level = |c: i32| ((c as f64 / 255.0) * 5.0).round() as i32;
        (16 + 36 * level(r) + 6 * level(g) + level(b)) as u8
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Color {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(format!("Invalid color '{}': expected #rrggbb", s));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16)
                .map_err(|_| format!("Invalid color '{}': expected #rrggbb", s))
        };
        Ok(Color::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Number of distinct tendon colors
pub const PALETTE_SIZE: usize = 12;

/// Tendon colors, indexed from tendon 1
pub const TENDON_PALETTE: [Color; PALETTE_SIZE] = [
    Color::rgb(0xe6, 0x19, 0x4b), // red
    Color::rgb(0x3c, 0xb4, 0x4b), // green
    Color::rgb(0x43, 0x63, 0xd8), // blue
    Color::rgb(0xf5, 0x82, 0x31), // orange
    Color::rgb(0x91, 0x1e, 0xb4), // purple
    Color::rgb(0x42, 0xd4, 0xf4), // cyan
    Color::rgb(0xf0, 0x32, 0xe6), // magenta
    Color::rgb(0xbf, 0xef, 0x45), // lime
    Color::rgb(0xfa, 0xbe, 0xd4), // pink
    Color::rgb(0x46, 0x99, 0x90), // teal
    Color::rgb(0x9a, 0x63, 0x24), // brown
    Color::rgb(0x80, 0x00, 0x00), // maroon
];

/// Color for ids that are not integers
pub const FALLBACK_COLOR: Color = Color::rgb(0x9e, 0x9e, 0x9e);

/// Palette slot for a 1-based tendon id
///
/// Ids of zero or below wrap around the end of the palette.
pub fn palette_index(tendon_id: &str) -> Option<usize> {
    let id: i64 = tendon_id.trim().parse().ok()?;
    let zero_based = id.checked_sub(1)?;
    Some(zero_based.rem_euclid(PALETTE_SIZE as i64) as usize)
}

/// Display color for a tendon id
pub fn color_for(tendon_id: &str) -> Color {
    match palette_index(tendon_id) {
        Some(index) => TENDON_PALETTE[index],
        None => {
            log::debug!("Tendon id '{}' is not an integer, using fallback color", tendon_id);
            FALLBACK_COLOR
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_tendon_uses_first_color() {
        assert_eq!(color_for("1"), TENDON_PALETTE[0]);
        assert_eq!(color_for("12"), TENDON_PALETTE[11]);
    }

    #[test]
    fn test_palette_cycles_every_twelve() {
        assert_eq!(color_for("1"), color_for("13"));
        assert_eq!(color_for("5"), color_for("29"));
    }

    #[test]
    fn test_non_numeric_id_uses_fallback() {
        assert_eq!(color_for("abc"), FALLBACK_COLOR);
        assert_eq!(color_for(""), FALLBACK_COLOR);
        assert_eq!(color_for("1.5"), FALLBACK_COLOR);
        assert_eq!(palette_index("tendon-3"), None);
    }

    #[test]
    fn test_zero_and_negative_ids_wrap() {
        assert_eq!(palette_index("0"), Some(11));
        assert_eq!(palette_index("-1"), Some(10));
        assert_eq!(palette_index("-11"), Some(0));
        assert!(TENDON_PALETTE.contains(&color_for("0")));
        assert!(TENDON_PALETTE.contains(&color_for("-1")));
    }

    #[test]
    fn test_extreme_ids_do_not_panic() {
        assert_eq!(palette_index(&i64::MIN.to_string()), None);
        assert!(palette_index(&i64::MAX.to_string()).is_some());
        assert_eq!(palette_index("99999999999999999999"), None);
    }

    #[test]
    fn test_whitespace_is_trimmed() {
        assert_eq!(color_for(" 2 "), TENDON_PALETTE[1]);
    }

    #[test]
    fn test_palette_entries_are_distinct() {
        for (i, a) in TENDON_PALETTE.iter().enumerate() {
            for b in &TENDON_PALETTE[i + 1..] {
                assert_ne!(a, b);
            }
            assert_ne!(*a, FALLBACK_COLOR);
        }
    }

    #[test]
    fn test_color_hex_round_trip() {
        let color: Color = "#e6194b".parse().unwrap();
        assert_eq!(color, TENDON_PALETTE[0]);
        assert_eq!(color.to_string(), "#e6194b");
        assert!("#12345".parse::<Color>().is_err());
        assert!("#gg0000".parse::<Color>().is_err());
    }

    #[test]
    fn test_color_serializes_as_hex() {
        let json = serde_json::to_string(&FALLBACK_COLOR).unwrap();
        assert_eq!(json, "\"#9e9e9e\"");
    }

    #[test]
    fn test_ansi256() {
        assert_eq!(Color::rgb(0, 0, 0).ansi256(), 16);
        assert_eq!(Color::rgb(255, 255, 255).ansi256(), 231);
        assert_eq!(Color::rgb(255, 0, 0).ansi256(), 196);
        let gray = FALLBACK_COLOR.ansi256();
        assert!((232..=255).contains(&gray));
    }
}
