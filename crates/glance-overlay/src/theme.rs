//! Popup color scheme, derived from the page background.

use glance_common::Color;

/// Brightness below which the page counts as dark.
const DARK_THRESHOLD: f64 = 128.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorScheme {
    Light,
    Dark,
}

impl ColorScheme {
    /// Pick a scheme for a computed `background-color` value.
    ///
    /// Unparseable and fully transparent backgrounds count as white.
    pub fn detect(background: Option<&str>) -> Self {
        let color = background
            .and_then(Color::from_css)
            .filter(|c| c.a > 0)
            .unwrap_or(Color::WHITE);
        if color.brightness() < DARK_THRESHOLD {
            Self::Dark
        } else {
            Self::Light
        }
    }

    pub fn palette(self) -> Palette {
        match self {
            Self::Light => Palette::LIGHT,
            Self::Dark => Palette::DARK,
        }
    }
}

/// Colors the surface uses to paint the popup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Color,
    pub text: Color,
    pub subtext: Color,
    pub border: Color,
    pub hover: Color,
    pub accent: Color,
    pub loading: Color,
}

const ACCENT: Color = Color::from_rgba(0x21, 0x96, 0xf3, 255);

impl Palette {
    pub const LIGHT: Palette = Palette {
        background: Color::from_rgba(0xff, 0xff, 0xff, 255),
        text: Color::from_rgba(0x00, 0x00, 0x00, 255),
        subtext: Color::from_rgba(0x44, 0x44, 0x44, 255),
        border: Color::from_rgba(0xe0, 0xe0, 0xe0, 255),
        hover: Color::from_rgba(0xf5, 0xf5, 0xf5, 255),
        accent: ACCENT,
        loading: Color::from_rgba(0xf0, 0xf0, 0xf0, 255),
    };

    pub const DARK: Palette = Palette {
        background: Color::from_rgba(0x1e, 0x1e, 0x1e, 255),
        text: Color::from_rgba(0xff, 0xff, 0xff, 255),
        subtext: Color::from_rgba(0xcc, 0xcc, 0xcc, 255),
        border: Color::from_rgba(0x40, 0x40, 0x40, 255),
        hover: Color::from_rgba(0x2d, 0x2d, 0x2d, 255),
        accent: ACCENT,
        loading: Color::from_rgba(0x40, 0x40, 0x40, 255),
    };
}
