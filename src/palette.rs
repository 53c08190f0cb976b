//! # LCARS Color Palette
//!
//! The face uses four accent colors on a black background. In ambient mode
//! every decorative shape collapses to plain white with anti-aliasing switched
//! off, which keeps the panel readable on low-bit displays and limits burn-in.
//!
//! Colors are plain RGB triples so frames can be serialized for inspection;
//! they convert into [`Rgb888`] at the rasterization boundary.

use crate::RenderMode;
use embedded_graphics::pixelcolor::Rgb888;
use serde::{Deserialize, Serialize};

/// A 24-bit RGB color carried by every draw primitive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl From<Color> for Rgb888 {
    fn from(color: Color) -> Self {
        Rgb888::new(color.r, color.g, color.b)
    }
}

/// Accent purple, `#9e9fca`
pub const PURPLE: Color = Color::new(0x9e, 0x9f, 0xca);
/// Accent red, `#cc5f60`
pub const RED: Color = Color::new(0xcc, 0x5f, 0x60);
/// Accent orange, `#fd9800`
pub const ORANGE: Color = Color::new(0xfd, 0x98, 0x00);
/// Accent yellow used for all text, `#f6cb92`
pub const YELLOW: Color = Color::new(0xf6, 0xcb, 0x92);
pub const BACKGROUND_BLACK: Color = Color::new(0x00, 0x00, 0x00);
pub const AMBIENT_WHITE: Color = Color::new(0xff, 0xff, 0xff);

/// Fill color and edge treatment for one decorative shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShapeStyle {
    pub color: Color,
    pub anti_alias: bool,
}

impl RenderMode {
    /// Resolve the style of a shape whose active-mode color is `accent`.
    ///
    /// Ambient mode ignores the accent entirely.
    pub fn shape_style(self, accent: Color) -> ShapeStyle {
        match self {
            RenderMode::Active => ShapeStyle {
                color: accent,
                anti_alias: true,
            },
            RenderMode::Ambient => ShapeStyle {
                color: AMBIENT_WHITE,
                anti_alias: false,
            },
        }
    }
}
