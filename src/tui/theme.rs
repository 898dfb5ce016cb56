use ratatui::style::Color;

use crate::model::UiConfig;

/// Parsed color theme for the TUI
#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Color,
    pub text: Color,
    pub dim: Color,
    pub input_bg: Color,
    pub slider: Color,
    pub star: Color,
    pub indicator: Color,
    pub indicator_active: Color,
    pub selection_bg: Color,
    pub error: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            background: Color::Rgb(0x99, 0x4C, 0x1A),
            text: Color::Rgb(0xFF, 0xFF, 0xFF),
            dim: Color::Rgb(0xD9, 0xB8, 0xA3),
            input_bg: Color::Rgb(0x4C, 0x26, 0x0D),
            slider: Color::Rgb(0xFF, 0x99, 0x33),
            star: Color::Rgb(0xFF, 0xCC, 0x00),
            indicator: Color::Rgb(0xCC, 0xA5, 0x8C),
            indicator_active: Color::Rgb(0xFF, 0xFF, 0xFF),
            selection_bg: Color::Rgb(0x73, 0x39, 0x13),
            error: Color::Rgb(0xFF, 0x44, 0x44),
        }
    }
}

/// Parse a hex color string like "#FF4444" into an RGB Color
fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

impl Theme {
    /// Create a theme from UI config, falling back to defaults
    pub fn from_config(ui: &UiConfig) -> Self {
        let mut theme = Theme::default();

        for (key, value) in &ui.colors {
            if let Some(color) = parse_hex_color(value) {
                match key.as_str() {
                    "background" => theme.background = color,
                    "text" => theme.text = color,
                    "dim" => theme.dim = color,
                    "input_bg" => theme.input_bg = color,
                    "slider" => theme.slider = color,
                    "star" => theme.star = color,
                    "indicator" => theme.indicator = color,
                    "indicator_active" => theme.indicator_active = color,
                    "selection_bg" => theme.selection_bg = color,
                    "error" => theme.error = color,
                    _ => {}
                }
            }
        }

        theme
    }

    /// Blend `color` toward the background. `opacity` 1.0 keeps the color,
    /// 0.0 makes it disappear into the background. Non-RGB colors are kept
    /// until fully transparent.
    pub fn faded(&self, color: Color, opacity: f32) -> Color {
        let opacity = opacity.clamp(0.0, 1.0);
        match (color, self.background) {
            (Color::Rgb(r, g, b), Color::Rgb(br, bg, bb)) => {
                let mix = |c: u8, base: u8| -> u8 {
                    (base as f32 + (c as f32 - base as f32) * opacity).round() as u8
                };
                Color::Rgb(mix(r, br), mix(g, bg), mix(b, bb))
            }
            _ if opacity <= 0.0 => self.background,
            _ => color,
        }
    }
}
