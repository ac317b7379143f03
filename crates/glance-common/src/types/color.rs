use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::from_rgba(255, 255, 255, 255);

    pub const fn from_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse a computed-style color: `rgb(r, g, b)` or `rgba(r, g, b, a)`
    /// where `a` is a CSS float in `0.0..=1.0`.
    pub fn from_css(s: &str) -> Option<Self> {
        let s = s.trim();
        let (inner, has_alpha) = if let Some(rest) = s.strip_prefix("rgba(") {
            (rest.strip_suffix(')')?, true)
        } else {
            (s.strip_prefix("rgb(")?.strip_suffix(')')?, false)
        };
        let parts: Vec<&str> = inner.split(',').map(str::trim).collect();
        let expected = if has_alpha { 4 } else { 3 };
        if parts.len() != expected {
            return None;
        }
        let r = parts[0].parse::<u8>().ok()?;
        let g = parts[1].parse::<u8>().ok()?;
        let b = parts[2].parse::<u8>().ok()?;
        let a = if has_alpha {
            let alpha: f64 = parts[3].parse().ok()?;
            if !(0.0..=1.0).contains(&alpha) {
                return None;
            }
            (alpha * 255.0).round() as u8
        } else {
            255
        };
        Some(Self { r, g, b, a })
    }

    /// Perceived brightness on the 0-255 scale (ITU-R BT.601 weights).
    pub fn brightness(&self) -> f64 {
        (self.r as f64 * 299.0 + self.g as f64 * 587.0 + self.b as f64 * 114.0) / 1000.0
    }
}
