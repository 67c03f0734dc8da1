use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use directories::BaseDirs;
use serde::de::Deserializer;
use serde::Deserialize;

const CONFIG_FILE_NAME: &str = "config.toml";
const APP_NAME: &str = "cardfile";

#[derive(Debug, Clone)]
pub struct Config {
    pub config_path: PathBuf,
    /// Overrides the platform data directory when set.
    pub data_dir: Option<PathBuf>,
    pub ui: UiConfig,
}

#[derive(Debug, Clone)]
pub struct UiConfig {
    pub colors: UiColors,
}

#[derive(Debug, Clone)]
pub struct UiColors {
    pub border: RgbColor,
    pub selection_bg: RgbColor,
    pub selection_fg: RgbColor,
    pub status_fg: RgbColor,
    pub status_bg: RgbColor,
    pub error_fg: RgbColor,
}

impl Default for UiColors {
    fn default() -> Self {
        Self {
            border: RgbColor::new(110, 110, 110),
            selection_bg: RgbColor::new(38, 79, 120),
            selection_fg: RgbColor::new(235, 235, 235),
            status_fg: RgbColor::new(220, 220, 220),
            status_bg: RgbColor::new(40, 40, 40),
            error_fg: RgbColor::new(210, 80, 80),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RgbColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl RgbColor {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl<'de> serde::Deserialize<'de> for RgbColor {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Helper {
            Array([u8; 3]),
            Map { r: u8, g: u8, b: u8 },
        }

        let helper = Helper::deserialize(deserializer)?;
        let (r, g, b) = match helper {
            Helper::Array(values) => (values[0], values[1], values[2]),
            Helper::Map { r, g, b } => (r, g, b),
        };
        Ok(RgbColor { r, g, b })
    }
}

// =============================================================================
// Raw file representation
// =============================================================================

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    data_dir: Option<PathBuf>,
    #[serde(default)]
    ui: UiFile,
}

#[derive(Debug, Default, Deserialize)]
struct UiFile {
    #[serde(default)]
    colors: ColorsFile,
}

#[derive(Debug, Default, Deserialize)]
struct ColorsFile {
    border: Option<RgbColor>,
    selection_bg: Option<RgbColor>,
    selection_fg: Option<RgbColor>,
    status_fg: Option<RgbColor>,
    status_bg: Option<RgbColor>,
    error_fg: Option<RgbColor>,
}

impl From<ColorsFile> for UiColors {
    fn from(file: ColorsFile) -> Self {
        let defaults = UiColors::default();
        Self {
            border: file.border.unwrap_or(defaults.border),
            selection_bg: file.selection_bg.unwrap_or(defaults.selection_bg),
            selection_fg: file.selection_fg.unwrap_or(defaults.selection_fg),
            status_fg: file.status_fg.unwrap_or(defaults.status_fg),
            status_bg: file.status_bg.unwrap_or(defaults.status_bg),
            error_fg: file.error_fg.unwrap_or(defaults.error_fg),
        }
    }
}

/// Expand ~ to home directory in paths
fn expand_tilde(path: &Path) -> PathBuf {
    if let Ok(stripped) = path.strip_prefix("~") {
        if let Some(home) = home::home_dir() {
            return home.join(stripped);
        }
    }
    path.to_path_buf()
}

fn config_root() -> Result<PathBuf> {
    let base = BaseDirs::new().context("unable to determine config directories")?;
    Ok(base.config_dir().join(APP_NAME))
}

pub fn config_path() -> Result<PathBuf> {
    Ok(config_root()?.join(CONFIG_FILE_NAME))
}

/// Load the configuration. With an explicit `path` the file must exist;
/// the default location may be absent, in which case built-in defaults
/// apply.
pub fn load(path: Option<&Path>) -> Result<Config> {
    let (path, required) = match path {
        Some(path) => (path.to_path_buf(), true),
        None => (config_path()?, false),
    };

    if !path.exists() {
        if required {
            bail!("configuration file not found at {}", path.display());
        }
        return Ok(Config {
            config_path: path,
            data_dir: None,
            ui: UiConfig {
                colors: UiColors::default(),
            },
        });
    }

    let raw = fs::read_to_string(&path)
        .with_context(|| format!("failed to read configuration file at {}", path.display()))?;

    let value: toml::Value = toml::from_str(&raw)
        .with_context(|| format!("failed to parse {} as TOML", path.display()))?;

    warn_unknown_keys(&value);

    let cfg_file: ConfigFile = value
        .try_into()
        .with_context(|| format!("failed to deserialize config from {}", path.display()))?;

    let data_dir = cfg_file.data_dir.as_deref().map(expand_tilde);

    Ok(Config {
        config_path: path,
        data_dir,
        ui: UiConfig {
            colors: cfg_file.ui.colors.into(),
        },
    })
}

fn warn_unknown_keys(value: &toml::Value) {
    let Some(table) = value.as_table() else {
        return;
    };

    let known = HashSet::from(["data_dir", "ui"]);
    for key in table.keys() {
        if !known.contains(key.as_str()) {
            eprintln!("warning: unknown configuration key `{}`", key);
        }
    }

    let Some(ui_table) = table.get("ui").and_then(|ui| ui.as_table()) else {
        return;
    };
    for key in ui_table.keys() {
        if key != "colors" {
            eprintln!("warning: unknown ui.* key `{}`", key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_color_from_array() {
        #[derive(Deserialize)]
        struct Wrapper {
            value: RgbColor,
        }
        let wrapper: Wrapper = toml::from_str("value = [10, 20, 30]").unwrap();
        let color = wrapper.value;
        assert_eq!((color.r, color.g, color.b), (10, 20, 30));
    }

    #[test]
    fn test_rgb_color_from_map() {
        #[derive(Deserialize)]
        struct Wrapper {
            value: RgbColor,
        }
        let wrapper: Wrapper = toml::from_str("value = { r = 1, g = 2, b = 3 }").unwrap();
        let color = wrapper.value;
        assert_eq!((color.r, color.g, color.b), (1, 2, 3));
    }

    #[test]
    fn test_missing_colors_use_defaults() {
        let file: ConfigFile = toml::from_str("data_dir = \"/tmp/cards\"").unwrap();
        let colors: UiColors = file.ui.colors.into();
        let defaults = UiColors::default();
        assert_eq!(colors.border.r, defaults.border.r);
        assert_eq!(file.data_dir, Some(PathBuf::from("/tmp/cards")));
    }

    #[test]
    fn test_partial_color_override() {
        let file: ConfigFile = toml::from_str("[ui.colors]\nselection_bg = [1, 2, 3]").unwrap();
        let colors: UiColors = file.ui.colors.into();
        assert_eq!(
            (
                colors.selection_bg.r,
                colors.selection_bg.g,
                colors.selection_bg.b
            ),
            (1, 2, 3)
        );
        assert_eq!(colors.border.r, UiColors::default().border.r);
    }

    #[test]
    fn test_expand_tilde_keeps_absolute_paths() {
        assert_eq!(
            expand_tilde(Path::new("/var/data")),
            PathBuf::from("/var/data")
        );
    }
}
