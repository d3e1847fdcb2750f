use serde::Serialize;

/// Normalised RGBA colour (each channel in `[0.0, 1.0]`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const DARK:        Self = Self::rgb8(0x1e, 0x1e, 0x2e);
    pub const WHITE:       Self = Self::rgb8(0xff, 0xff, 0xff);
    pub const BLACK:       Self = Self::rgb8(0x00, 0x00, 0x00);
    pub const GRAY:        Self = Self::rgb8(0x80, 0x80, 0x80);
    pub const YELLOW:      Self = Self::rgb8(0xff, 0xff, 0x00);
    pub const RED:         Self = Self::rgb8(0xff, 0x00, 0x00);
    pub const ORANGE_RED:  Self = Self::rgb8(0xff, 0x45, 0x00);
    pub const ORANGE:      Self = Self::rgb8(0xff, 0xa5, 0x00);
    pub const CRIMSON:     Self = Self::rgb8(0xdc, 0x14, 0x3c);
    pub const PURPLE:      Self = Self::rgb8(0x80, 0x00, 0x80);
    pub const DARK_ORCHID: Self = Self::rgb8(0x99, 0x32, 0xcc);
    pub const GREEN:       Self = Self::rgb8(0x00, 0x80, 0x00);
    pub const BLUE:        Self = Self::rgb8(0x00, 0x00, 0xff);
    pub const STEEL_BLUE:  Self = Self::rgb8(0x46, 0x82, 0xb4);
    pub const TRANSPARENT: Self = Self { r: 0.0, g: 0.0, b: 0.0, a: 0.0 };

    /// Opaque colour from 8-bit channels.
    pub const fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a: 1.0,
        }
    }

    /// Parse a CSS-style hex color string (`#RRGGBB` or `#RRGGBBAA`).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');
        if !hex.is_ascii() {
            return None;
        }

        let byte = |s: &str| -> Option<u8> { u8::from_str_radix(s, 16).ok() };

        match hex.len() {
            6 => Some(Self::rgb8(byte(&hex[0..2])?, byte(&hex[2..4])?, byte(&hex[4..6])?)),
            8 => Some(
                Self::rgb8(byte(&hex[0..2])?, byte(&hex[2..4])?, byte(&hex[4..6])?)
                    .with_alpha(byte(&hex[6..8])? as f32 / 255.0),
            ),
            _ => None,
        }
    }

    /// `#rrggbb` form, alpha dropped.
    pub fn to_hex(self) -> String {
        let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!("#{:02x}{:02x}{:02x}", channel(self.r), channel(self.g), channel(self.b))
    }

    /// Return a copy with the alpha channel set to `alpha`.
    #[inline]
    #[must_use]
    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.a = alpha.clamp(0.0, 1.0);
        self
    }
}
