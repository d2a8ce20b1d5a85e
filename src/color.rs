//! Color types, palettes, and the cyclical rainbow interpolator.
//!
//! The rainbow follows the cubehelix-based cyclical scheme: hue sweeps a full
//! turn while saturation and lightness peak at the ends of the cycle, so the
//! colors for `t = 0` and `t = 1` coincide. This makes it suitable for
//! periodic domains such as day-of-year.
//!
//! # References
//!
//! - Green, D. A. (2011). "A colour scheme for the display of astronomical
//!   intensity images." *Bulletin of the Astronomical Society of India*, 39, 289-295.

use crate::error::{Error, Result};

/// RGBA color with 8-bit components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(C)]
pub struct Rgba {
    /// Red component (0-255).
    pub r: u8,
    /// Green component (0-255).
    pub g: u8,
    /// Blue component (0-255).
    pub b: u8,
    /// Alpha component (0-255, 255 = fully opaque).
    pub a: u8,
}

impl Rgba {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);
    /// Opaque black.
    pub const BLACK: Self = Self::new(0, 0, 0, 255);
    /// Opaque white.
    pub const WHITE: Self = Self::new(255, 255, 255, 255);
    /// Neutral grey used for links and axis strokes.
    pub const GREY: Self = Self::new(153, 153, 153, 255);

    /// Create a new RGBA color.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque RGB color (alpha = 255).
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Create a color with modified alpha.
    #[must_use]
    pub const fn with_alpha(self, a: u8) -> Self {
        Self::new(self.r, self.g, self.b, a)
    }

    /// Scale the alpha channel by an opacity in `[0, 1]`.
    #[must_use]
    pub fn faded(self, opacity: f32) -> Self {
        let opacity = opacity.clamp(0.0, 1.0);
        self.with_alpha((f32::from(self.a) * opacity).round() as u8)
    }

    /// Convert to array representation.
    #[must_use]
    pub const fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Create from array representation.
    #[must_use]
    pub const fn from_array(arr: [u8; 4]) -> Self {
        Self::new(arr[0], arr[1], arr[2], arr[3])
    }

    /// Parse a `#rrggbb` hex string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedData`] if the string is not six hex digits.
    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = hex.trim_start_matches('#');
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(Error::MalformedData(format!("invalid hex color '{hex}'")));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16)
                .map_err(|_| Error::MalformedData(format!("invalid hex color '{hex}'")))
        };
        Ok(Self::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    /// Format as a `#rrggbb` hex string (alpha is dropped).
    #[must_use]
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Linear interpolation between two colors.
    #[must_use]
    pub fn lerp(self, other: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let inv_t = 1.0 - t;

        Self::new(
            (f32::from(self.r) * inv_t + f32::from(other.r) * t) as u8,
            (f32::from(self.g) * inv_t + f32::from(other.g) * t) as u8,
            (f32::from(self.b) * inv_t + f32::from(other.b) * t) as u8,
            (f32::from(self.a) * inv_t + f32::from(other.a) * t) as u8,
        )
    }
}

/// Cubehelix color: hue in degrees, saturation, lightness in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Cubehelix {
    /// Hue (degrees, any real value).
    pub h: f32,
    /// Saturation (amplitude of the helix).
    pub s: f32,
    /// Lightness (0.0-1.0).
    pub l: f32,
}

impl Cubehelix {
    /// Create a new cubehelix color.
    #[must_use]
    pub const fn new(h: f32, s: f32, l: f32) -> Self {
        Self { h, s, l }
    }

    /// Convert to an opaque RGBA color.
    #[must_use]
    pub fn to_rgba(self) -> Rgba {
        const A: f32 = -0.148_61;
        const B: f32 = 1.782_77;
        const C: f32 = -0.292_27;
        const D: f32 = -0.906_49;
        const E: f32 = 1.972_94;

        let h = (self.h + 120.0).to_radians();
        let l = self.l;
        let amp = self.s * l * (1.0 - l);
        let (sin_h, cos_h) = h.sin_cos();

        let channel = |v: f32| (255.0 * v).round().clamp(0.0, 255.0) as u8;
        Rgba::rgb(
            channel(l + amp * (A * cos_h + B * sin_h)),
            channel(l + amp * (C * cos_h + D * sin_h)),
            channel(l + amp * (E * cos_h)),
        )
    }
}

impl From<Cubehelix> for Rgba {
    fn from(c: Cubehelix) -> Self {
        c.to_rgba()
    }
}

/// Cyclical rainbow interpolator. `t` wraps, so `rainbow(t) == rainbow(t + 1)`.
#[must_use]
pub fn rainbow(t: f32) -> Rgba {
    let t = t - t.floor();
    let ts = (t - 0.5).abs();
    Cubehelix::new(360.0 * t - 100.0, 1.5 - 1.5 * ts, 0.8 - 0.9 * ts).to_rgba()
}

/// Seven-color qualitative palette used for stacked sub-groups.
pub const SET3: [Rgba; 7] = [
    Rgba::rgb(0x8d, 0xd3, 0xc7),
    Rgba::rgb(0xff, 0xff, 0xb3),
    Rgba::rgb(0xbe, 0xba, 0xda),
    Rgba::rgb(0xfb, 0x80, 0x72),
    Rgba::rgb(0x80, 0xb1, 0xd3),
    Rgba::rgb(0xfd, 0xb4, 0x62),
    Rgba::rgb(0xb3, 0xde, 0x69),
];

/// Ten-color categorical palette used for graph node groups.
pub const TABLEAU10: [Rgba; 10] = [
    Rgba::rgb(0x4e, 0x79, 0xa7),
    Rgba::rgb(0xf2, 0x8e, 0x2c),
    Rgba::rgb(0xe1, 0x57, 0x59),
    Rgba::rgb(0x76, 0xb7, 0xb2),
    Rgba::rgb(0x59, 0xa1, 0x4f),
    Rgba::rgb(0xed, 0xc9, 0x49),
    Rgba::rgb(0xaf, 0x7a, 0xa1),
    Rgba::rgb(0xff, 0x9d, 0xa7),
    Rgba::rgb(0x9c, 0x75, 0x5f),
    Rgba::rgb(0xba, 0xb0, 0xab),
];
