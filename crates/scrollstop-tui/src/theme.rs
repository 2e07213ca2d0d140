use ratatui::style::Color;

use scrollstop_core::config::ThemeColorOverrides;
use scrollstop_core::transition::Tint;

/// Colors the page is drawn with
#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Color,
    pub foreground: Color,
    pub muted: Color,
    /// Gold used for titles, counters and the transition
    pub accent: Color,
    pub header: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: Color::Rgb(0x0a, 0x0a, 0x0a),
            foreground: Color::Rgb(0xe8, 0xe2, 0xd6),
            muted: Color::Rgb(0x7a, 0x72, 0x66),
            accent: Color::Rgb(0xd4, 0xa8, 0x50),
            header: Color::Rgb(0x16, 0x14, 0x12),
        }
    }
}

impl Theme {
    /// Default palette with any configured overrides applied
    pub fn from_overrides(overrides: &ThemeColorOverrides) -> Self {
        let mut theme = Self::default();
        let apply = |slot: &mut Color, value: &Option<String>| {
            if let Some(color) = value.as_deref().and_then(parse_hex_color) {
                *slot = color;
            }
        };
        apply(&mut theme.background, &overrides.background);
        apply(&mut theme.foreground, &overrides.foreground);
        apply(&mut theme.muted, &overrides.muted);
        apply(&mut theme.accent, &overrides.accent);
        apply(&mut theme.header, &overrides.header);
        theme
    }

    /// Terminal color for a transition glyph at `alpha` over the background
    pub fn tint_color(&self, tint: Tint, alpha: f64) -> Color {
        let base = match tint {
            Tint::Ember { hue, lightness } => hsl_to_rgb(hue, 0.22, lightness / 100.0),
            Tint::Gold => rgb_of(self.accent),
        };
        blend(base, rgb_of(self.background), alpha)
    }

    /// Background color under a gold flash of `alpha`
    pub fn flash_color(&self, alpha: f64) -> Color {
        blend(rgb_of(self.accent), rgb_of(self.background), alpha)
    }

    /// Background darkened for a scanline
    pub fn scanline_color(&self) -> Color {
        blend((0, 0, 0), rgb_of(self.background), 0.04)
    }
}

/// Parse a hex color string (e.g., "#d4a850" or "d4a850")
pub fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.trim().trim_start_matches('#');
    if !hex.is_ascii() {
        return None;
    }

    match hex.len() {
        3 => {
            let r = u8::from_str_radix(&hex[0..1], 16).ok()? * 17;
            let g = u8::from_str_radix(&hex[1..2], 16).ok()? * 17;
            let b = u8::from_str_radix(&hex[2..3], 16).ok()? * 17;
            Some(Color::Rgb(r, g, b))
        }
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some(Color::Rgb(r, g, b))
        }
        _ => None,
    }
}

fn rgb_of(color: Color) -> (u8, u8, u8) {
    match color {
        Color::Rgb(r, g, b) => (r, g, b),
        Color::Black => (0, 0, 0),
        _ => (0xff, 0xff, 0xff),
    }
}

fn blend(fg: (u8, u8, u8), bg: (u8, u8, u8), alpha: f64) -> Color {
    let a = alpha.clamp(0.0, 1.0);
    let mix = |f: u8, b: u8| (f as f64 * a + b as f64 * (1.0 - a)).round() as u8;
    Color::Rgb(mix(fg.0, bg.0), mix(fg.1, bg.1), mix(fg.2, bg.2))
}

/// HSL (hue in degrees, saturation and lightness in 0..=1) to RGB
fn hsl_to_rgb(hue: f64, saturation: f64, lightness: f64) -> (u8, u8, u8) {
    let c = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let h = hue.rem_euclid(360.0) / 60.0;
    let x = c * (1.0 - (h % 2.0 - 1.0).abs());
    let (r, g, b) = match h as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = lightness - c / 2.0;
    let to_u8 = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    (to_u8(r), to_u8(g), to_u8(b))
}
