//! Colors and the named palette chart sets draw from.

use plotters::style::RGBColor;

/// An sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// `Rgb::from_hex(0xF7931A)`
    pub const fn from_hex(hex: u32) -> Self {
        Rgb(
            ((hex >> 16) & 0xFF) as u8,
            ((hex >> 8) & 0xFF) as u8,
            (hex & 0xFF) as u8,
        )
    }

    /// Linear blend toward `other`; `t = 0` is `self`.
    pub fn blend(self, other: Rgb, t: f64) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Rgb(mix(self.0, other.0), mix(self.1, other.1), mix(self.2, other.2))
    }

    pub(crate) fn to_plotters(self) -> RGBColor {
        RGBColor(self.0, self.1, self.2)
    }
}

/// Named colors used across chart sets.
pub mod palette {
    use super::Rgb;

    pub const BITCOIN: Rgb = Rgb::from_hex(0xF7931A);
    pub const GOLD: Rgb = Rgb::from_hex(0xD4AF37);
    pub const SILVER: Rgb = Rgb::from_hex(0x9E9E9E);
    pub const EQUITY: Rgb = Rgb::from_hex(0x2E7D32);
    pub const DOLLAR: Rgb = Rgb::from_hex(0x1565C0);
    pub const TECH: Rgb = Rgb::from_hex(0x1E88E5);
    pub const SOFTWARE: Rgb = Rgb::from_hex(0x8E44AD);
    pub const CRASH: Rgb = Rgb::from_hex(0xD32F2F);
    pub const GAIN: Rgb = Rgb::from_hex(0x43A047);
    pub const BASIS: Rgb = Rgb::from_hex(0x2ECC71);
    pub const INK: Rgb = Rgb::from_hex(0x212121);
    pub const MUTED: Rgb = Rgb::from_hex(0x757575);
    pub const WARNING: Rgb = Rgb::from_hex(0xFF8C00);
    pub const ACCENT: Rgb = Rgb::from_hex(0x00BCD4);

    /// Default cycle for series without a named color.
    pub const CYCLE: [Rgb; 10] = [
        Rgb::from_hex(0x1F77B4),
        Rgb::from_hex(0xFF7F0E),
        Rgb::from_hex(0x2CA02C),
        Rgb::from_hex(0xD62728),
        Rgb::from_hex(0x9467BD),
        Rgb::from_hex(0x8C564B),
        Rgb::from_hex(0xE377C2),
        Rgb::from_hex(0x7F7F7F),
        Rgb::from_hex(0xBCBD22),
        Rgb::from_hex(0x17BECF),
    ];

    /// The `i`-th cycle color, wrapping around.
    pub fn cycle(i: usize) -> Rgb {
        CYCLE[i % CYCLE.len()]
    }
}
