//! RGBA colour for orbit rings and the clear colour.
//!
//! In config files a colour is either a table or a hex string:
//!
//! ```toml
//! ring_color = { r = 0.53, g = 0.81, b = 0.92 }   # alpha defaults to 1
//! ring_color = "#87CEEB"                           # or "#87CEEBFF"
//! ```

use serde::{Deserialize, Serialize};

/// Linear-space RGBA colour, components in 0..=1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ColorRepr")]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

impl Color {
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    pub const SKY_BLUE: Self = Self::rgb(0.53, 0.81, 0.92);
    pub const LIGHT_GRAY: Self = Self::rgb(0.75, 0.75, 0.75);

    #[inline]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    #[inline]
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `#RRGGBB` or `#RRGGBBAA` (the `#` is optional).
    pub fn parse_hex(text: &str) -> Option<Self> {
        let digits = text.trim().trim_start_matches('#');
        if !matches!(digits.len(), 6 | 8) || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let value = u32::from_str_radix(digits, 16).ok()?;
        let packed = if digits.len() == 6 { (value << 8) | 0xFF } else { value };
        let channel = |shift: u32| ((packed >> shift) & 0xFF) as f32 / 255.0;
        Some(Self::rgba(channel(24), channel(16), channel(8), channel(0)))
    }

    /// `[r, g, b, a]`, the layout the shaders read.
    #[inline]
    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl From<Color> for [f32; 4] {
    fn from(c: Color) -> Self {
        c.to_array()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ColorRepr {
    Hex(String),
    Components {
        r: f32,
        g: f32,
        b: f32,
        #[serde(default = "opaque")]
        a: f32,
    },
}

fn opaque() -> f32 {
    1.0
}

impl TryFrom<ColorRepr> for Color {
    type Error = String;

    fn try_from(repr: ColorRepr) -> Result<Self, Self::Error> {
        match repr {
            ColorRepr::Components { r, g, b, a } => Ok(Self::rgba(r, g, b, a)),
            ColorRepr::Hex(text) => Self::parse_hex(&text)
                .ok_or_else(|| format!("invalid colour {text:?}, expected #RRGGBB or #RRGGBBAA")),
        }
    }
}
