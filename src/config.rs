// Dashboard configuration
//
// Every app variant is one `DashboardConfig`. Configuration is resolved in
// order of precedence:
// 1. Command-line flags / PENGUIN_DASH_* environment variables (see cli.rs)
// 2. Config file (JSON, any subset of the fields below plus "preset")
// 3. Built-in preset defaults

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use thiserror::Error;

use crate::color::{ColorMap, parse_color};
use crate::data::model::{Attribute, Species};
use crate::data::selection::{BinBounds, BinCount, BinWidget};

/// Dataset path used when neither the command line nor the config names one.
pub const DEFAULT_DATA_PATH: &str = "penguins.csv";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading config file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parsing config file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid configuration")]
    Invalid(#[source] serde_json::Error),
    #[error("unknown colour '{0}' (use #rrggbb or a CSS colour name)")]
    UnknownColor(String),
}

// ---------------------------------------------------------------------------
// Presets – the built-in app variants
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Preset {
    /// Right sidebar, separate species filters for scatter and histogram.
    SplitFilters,
    /// One species filter feeding every view, plus a single-colour histogram.
    #[default]
    SharedFilter,
    /// Like shared-filter, with the plots arranged in a 2x2 grid.
    GridLayout,
}

impl Preset {
    pub fn config(self) -> DashboardConfig {
        match self {
            Preset::SplitFilters => DashboardConfig {
                title: "Pojetta and the Penguin Plots".to_string(),
                sidebar: SidebarSide::Right,
                layout: Layout::Stacked,
                colors: ColorScheme::Sequence(vec![
                    "#C964CF".to_string(),
                    "#008C95".to_string(),
                    "#FFAA4D".to_string(),
                ]),
                scatter: ScatterConfig {
                    x: Attribute::BillLengthMm,
                    y: Attribute::BodyMassG,
                    title: Some("Pojetta's Palmer Penguins".to_string()),
                },
                species_filter: FilterLinking::PerChart,
                default_attribute: Attribute::BillLengthMm,
                histogram_bins: BinSettings {
                    min: 5,
                    max: 100,
                    default: 50,
                    widget: BinWidget::Slider,
                },
                single_color_histogram: None,
                tables: TableSource::Full,
                data: None,
            },
            Preset::SharedFilter | Preset::GridLayout => {
                let mut colors = BTreeMap::new();
                colors.insert(Species::Adelie, "darkorange".to_string());
                colors.insert(Species::Gentoo, "purple".to_string());
                colors.insert(Species::Chinstrap, "#008B8B".to_string());
                DashboardConfig {
                    title: "Pojetta and the Penguin Plots".to_string(),
                    sidebar: SidebarSide::Left,
                    layout: if self == Preset::GridLayout {
                        Layout::Grid
                    } else {
                        Layout::Stacked
                    },
                    colors: ColorScheme::Map(colors),
                    scatter: ScatterConfig {
                        x: Attribute::BodyMassG,
                        y: Attribute::BillLengthMm,
                        title: None,
                    },
                    species_filter: FilterLinking::Shared,
                    default_attribute: Attribute::BillLengthMm,
                    histogram_bins: BinSettings {
                        min: 1,
                        max: 100,
                        default: 75,
                        widget: BinWidget::Numeric,
                    },
                    single_color_histogram: Some(SingleColorHistogram {
                        bins: BinSettings {
                            min: 5,
                            max: 100,
                            default: 75,
                            widget: BinWidget::Slider,
                        },
                        color: "#008C95".to_string(),
                        title: "Palmer Penguins".to_string(),
                    }),
                    tables: TableSource::Filtered,
                    data: None,
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Config sections
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SidebarSide {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layout {
    /// Plots one below the other.
    Stacked,
    /// Plots in a two-column grid.
    Grid,
}

/// How the species checkboxes feed the charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterLinking {
    /// One checkbox group drives every view.
    Shared,
    /// Separate checkbox groups for the scatter plot and the histogram.
    PerChart,
}

/// What the data table and grid display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableSource {
    Full,
    Filtered,
}

/// Species colours, either assigned in order or named per species.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorScheme {
    Sequence(Vec<String>),
    Map(BTreeMap<Species, String>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterConfig {
    pub x: Attribute,
    pub y: Attribute,
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinSettings {
    pub min: u32,
    pub max: u32,
    pub default: u32,
    #[serde(default)]
    pub widget: BinWidget,
}

impl BinSettings {
    pub fn bounds(&self) -> BinBounds {
        BinBounds::new(self.min, self.max)
    }

    /// The widget's starting value, clamped like any other input.
    pub fn initial(&self) -> BinCount {
        self.bounds().clamp(i64::from(self.default))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SingleColorHistogram {
    pub bins: BinSettings,
    pub color: String,
    pub title: String,
}

// ---------------------------------------------------------------------------
// DashboardConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DashboardConfig {
    pub title: String,
    pub sidebar: SidebarSide,
    pub layout: Layout,
    pub colors: ColorScheme,
    pub scatter: ScatterConfig,
    pub species_filter: FilterLinking,
    pub default_attribute: Attribute,
    pub histogram_bins: BinSettings,
    pub single_color_histogram: Option<SingleColorHistogram>,
    pub tables: TableSource,
    /// Dataset file; the `--data` flag takes precedence.
    pub data: Option<PathBuf>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Preset::default().config()
    }
}

impl DashboardConfig {
    /// Check everything serde cannot: colour names must resolve.
    pub fn validate(&self) -> Result<(), ConfigError> {
        ColorMap::from_scheme(&self.colors)?;
        if let Some(hist) = &self.single_color_histogram {
            parse_color(&hist.color)?;
        }
        Ok(())
    }
}

/// Resolve the effective configuration.
///
/// The base preset is `cli_preset`, else the file's `"preset"` key, else the
/// default preset. Fields present in the file override the preset's fields,
/// nested objects merging key by key.
pub fn resolve(cli_preset: Option<Preset>, file: Option<&Path>) -> Result<DashboardConfig, ConfigError> {
    let mut overlay = match file {
        Some(path) => read_overlay(path)?,
        None => JsonValue::Object(serde_json::Map::new()),
    };

    let file_preset = match overlay.as_object_mut().and_then(|obj| obj.remove("preset")) {
        Some(value) => Some(serde_json::from_value::<Preset>(value).map_err(ConfigError::Invalid)?),
        None => None,
    };
    let preset = cli_preset.or(file_preset).unwrap_or_default();
    log::info!("Using {preset:?} preset");

    let mut merged = serde_json::to_value(preset.config()).map_err(ConfigError::Invalid)?;
    if let (Some(base), JsonValue::Object(fields)) = (merged.as_object_mut(), overlay) {
        for (key, value) in fields {
            // Enum-valued sections swap wholesale instead of merging.
            if !REPLACED_KEYS.contains(&key.as_str()) {
                if let Some(existing) = base.get_mut(&key) {
                    merge_json(existing, value);
                    continue;
                }
            }
            base.insert(key, value);
        }
    }

    let config: DashboardConfig = serde_json::from_value(merged).map_err(ConfigError::Invalid)?;
    config.validate()?;
    Ok(config)
}

/// Top-level keys whose file value replaces the preset value outright.
const REPLACED_KEYS: &[&str] = &["colors", "single_color_histogram"];

fn read_overlay(path: &Path) -> Result<JsonValue, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let value: JsonValue = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    if !value.is_object() {
        return Err(ConfigError::Parse {
            path: path.to_path_buf(),
            source: serde::de::Error::custom("expected a JSON object at the top level"),
        });
    }
    Ok(value)
}

/// Recursively merge `overlay` into `base`. Objects merge per key; any other
/// overlay value replaces the base value.
fn merge_json(base: &mut JsonValue, overlay: JsonValue) {
    match (base, overlay) {
        (JsonValue::Object(base_map), JsonValue::Object(overlay_map)) => {
            for (key, value) in overlay_map {
                match base_map.get_mut(&key) {
                    Some(existing) => merge_json(existing, value),
                    None => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    static NEXT_FILE: AtomicUsize = AtomicUsize::new(0);

    fn resolve_text(cli_preset: Option<Preset>, text: &str) -> Result<DashboardConfig, ConfigError> {
        let path = std::env::temp_dir().join(format!(
            "penguin-dash-config-{}-{}.json",
            std::process::id(),
            NEXT_FILE.fetch_add(1, Ordering::Relaxed)
        ));
        std::fs::write(&path, text).unwrap();
        let result = resolve(cli_preset, Some(&path));
        std::fs::remove_file(&path).ok();
        result
    }

    #[test]
    fn presets_are_valid() {
        for preset in [Preset::SplitFilters, Preset::SharedFilter, Preset::GridLayout] {
            preset.config().validate().unwrap();
        }
    }

    #[test]
    fn no_file_gives_default_preset() {
        let config = resolve(None, None).unwrap();
        assert_eq!(config, Preset::SharedFilter.config());
    }

    #[test]
    fn file_preset_and_overrides() {
        let config = resolve_text(
            None,
            r#"{ "preset": "split-filters", "title": "Penguins", "histogram_bins": { "default": 20 } }"#,
        )
        .unwrap();
        assert_eq!(config.title, "Penguins");
        assert_eq!(config.species_filter, FilterLinking::PerChart);
        assert_eq!(config.histogram_bins.min, 5);
        assert_eq!(config.histogram_bins.default, 20);
    }

    #[test]
    fn cli_preset_beats_file_preset() {
        let config = resolve_text(Some(Preset::GridLayout), r#"{ "preset": "split-filters" }"#).unwrap();
        assert_eq!(config.layout, Layout::Grid);
    }

    #[test]
    fn unknown_fields_and_colours_are_rejected() {
        assert!(matches!(
            resolve_text(None, r#"{ "titel": "typo" }"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            resolve_text(None, r#"{ "colors": { "sequence": ["notacolour"] } }"#),
            Err(ConfigError::UnknownColor(_))
        ));
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        assert!(matches!(resolve_text(None, "{ not json"), Err(ConfigError::Parse { .. })));
        assert!(matches!(resolve_text(None, "[1, 2]"), Err(ConfigError::Parse { .. })));
        assert!(matches!(
            resolve(None, Some(Path::new("/definitely/not/here.json"))),
            Err(ConfigError::Read { .. })
        ));
    }

    #[test]
    fn colour_scheme_is_replaced_not_merged() {
        let config = resolve_text(
            Some(Preset::SharedFilter),
            r##"{ "colors": { "sequence": ["#000000", "#ffffff"] } }"##,
        )
        .unwrap();
        assert_eq!(
            config.colors,
            ColorScheme::Sequence(vec!["#000000".to_string(), "#ffffff".to_string()])
        );
    }

    #[test]
    fn initial_bin_count_respects_bounds() {
        let settings = BinSettings { min: 5, max: 100, default: 500, widget: BinWidget::Slider };
        assert_eq!(settings.initial().get(), 100);
    }

    #[test]
    fn merge_replaces_scalars_and_merges_objects() {
        let mut base = serde_json::json!({ "a": 1, "b": { "c": 2, "d": 3 } });
        merge_json(&mut base, serde_json::json!({ "a": 5, "b": { "d": 4 }, "e": true }));
        assert_eq!(base, serde_json::json!({ "a": 5, "b": { "c": 2, "d": 4 }, "e": true }));
    }
}
