use std::collections::BTreeMap;
use std::str::FromStr;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::config::{ColorScheme, ConfigError};
use crate::data::model::Species;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Colour names from config
// ---------------------------------------------------------------------------

/// Parse `#rrggbb` / `#rgb` hex codes or CSS colour names (`darkorange`).
pub fn parse_color(text: &str) -> Result<Color32, ConfigError> {
    let trimmed = text.trim();
    let rgb: Srgb<u8> = if trimmed.starts_with('#') {
        Srgb::from_str(trimmed).map_err(|_| ConfigError::UnknownColor(text.to_string()))?
    } else {
        palette::named::from_str(&trimmed.to_ascii_lowercase())
            .ok_or_else(|| ConfigError::UnknownColor(text.to_string()))?
    };
    Ok(Color32::from_rgb(rgb.red, rgb.green, rgb.blue))
}

// ---------------------------------------------------------------------------
// Color mapping: species → Color32
// ---------------------------------------------------------------------------

/// Fixed species colours for one dashboard variant.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorMap {
    mapping: BTreeMap<Species, Color32>,
}

impl ColorMap {
    /// Build the map from a configured scheme.
    ///
    /// A sequence is assigned to species in widget order and wraps around;
    /// species a scheme leaves out get an evenly spaced generated hue.
    pub fn from_scheme(scheme: &ColorScheme) -> Result<Self, ConfigError> {
        let generated = generate_palette(Species::ALL.len());
        let mut mapping = BTreeMap::new();

        match scheme {
            ColorScheme::Sequence(colors) => {
                let parsed = colors
                    .iter()
                    .map(|c| parse_color(c))
                    .collect::<Result<Vec<_>, _>>()?;
                for (i, sp) in Species::ALL.into_iter().enumerate() {
                    let color = if parsed.is_empty() {
                        generated[i]
                    } else {
                        parsed[i % parsed.len()]
                    };
                    mapping.insert(sp, color);
                }
            }
            ColorScheme::Map(named) => {
                for (i, sp) in Species::ALL.into_iter().enumerate() {
                    let color = match named.get(&sp) {
                        Some(text) => parse_color(text)?,
                        None => generated[i],
                    };
                    mapping.insert(sp, color);
                }
            }
        }

        Ok(ColorMap { mapping })
    }

    /// Look up the colour for a species.
    pub fn color_for(&self, species: Species) -> Color32 {
        self.mapping.get(&species).copied().unwrap_or(Color32::GRAY)
    }

    /// Return the legend entries (species label → colour) in widget order.
    pub fn legend_entries(&self) -> Vec<(&'static str, Color32)> {
        Species::ALL
            .into_iter()
            .map(|sp| (sp.as_str(), self.color_for(sp)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_and_css_names() {
        assert_eq!(parse_color("#C964CF").unwrap(), Color32::from_rgb(0xC9, 0x64, 0xCF));
        assert_eq!(parse_color("darkorange").unwrap(), Color32::from_rgb(255, 140, 0));
        assert_eq!(parse_color(" Purple ").unwrap(), Color32::from_rgb(128, 0, 128));
    }

    #[test]
    fn rejects_unknown_colours() {
        assert!(matches!(parse_color("cyan4"), Err(ConfigError::UnknownColor(_))));
        assert!(parse_color("#zzzzzz").is_err());
    }

    #[test]
    fn sequence_follows_widget_order() {
        let scheme = ColorScheme::Sequence(vec![
            "#C964CF".to_string(),
            "#008C95".to_string(),
            "#FFAA4D".to_string(),
        ]);
        let map = ColorMap::from_scheme(&scheme).unwrap();
        assert_eq!(map.color_for(Species::Adelie), Color32::from_rgb(0xC9, 0x64, 0xCF));
        assert_eq!(map.color_for(Species::Gentoo), Color32::from_rgb(0x00, 0x8C, 0x95));
        assert_eq!(map.color_for(Species::Chinstrap), Color32::from_rgb(0xFF, 0xAA, 0x4D));
    }

    #[test]
    fn short_sequence_wraps() {
        let scheme = ColorScheme::Sequence(vec!["#000000".to_string()]);
        let map = ColorMap::from_scheme(&scheme).unwrap();
        assert!(map
            .legend_entries()
            .iter()
            .all(|(_, c)| *c == Color32::from_rgb(0, 0, 0)));
    }

    #[test]
    fn partial_map_falls_back_to_generated_hues() {
        let mut named = BTreeMap::new();
        named.insert(Species::Gentoo, "purple".to_string());
        let map = ColorMap::from_scheme(&ColorScheme::Map(named)).unwrap();
        assert_eq!(map.color_for(Species::Gentoo), Color32::from_rgb(128, 0, 128));
        assert_eq!(map.color_for(Species::Adelie), generate_palette(3)[0]);
    }
}
