use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, SerializeDisplay};
use std::path::{Path, PathBuf};
use strum::{Display as StrumDisplay, EnumIter, EnumString};
use thiserror::Error;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    SerializeDisplay,
    DeserializeFromStr,
    EnumString,
    EnumIter,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive)]
pub enum LayoutKind {
    #[default]
    #[strum(to_string = "radial", serialize = "ring", serialize = "circle")]
    Radial,
    #[strum(to_string = "grid", serialize = "box")]
    Grid,
}

/// Engine tuning knobs. Every field is optional in the file and falls back to its default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub enabled: bool,
    pub show_favorites_submenu: bool,
    pub show_favorites_on_main_bar: bool,
    pub layout: LayoutKind,
    pub base_radius: f64,
    pub items_per_page: usize,
    pub min_item_size: f64,
    pub max_item_size: f64,
    pub min_space_per_item: f64,
    pub max_space_per_item: f64,
    pub height_offset: f64,
    pub show_labels: bool,
    pub hover_size_multiplier: f64,
    pub back_button_size: f64,
    pub nav_button_size: f64,
    /// Lower bound of the item-count domain the size interpolation runs over.
    pub min_page_count: usize,
    pub max_page_count: usize,
    pub keys: Keybindings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            enabled: true,
            show_favorites_submenu: true,
            show_favorites_on_main_bar: true,
            layout: LayoutKind::Radial,
            base_radius: 50.0,
            items_per_page: 12,
            min_item_size: 32.0,
            max_item_size: 50.0,
            min_space_per_item: 4.0,
            max_space_per_item: 12.0,
            height_offset: 50.0,
            show_labels: true,
            hover_size_multiplier: 1.2,
            back_button_size: 32.0,
            nav_button_size: 20.0,
            min_page_count: 3,
            max_page_count: 50,
            keys: Keybindings::default(),
        }
    }
}

impl Settings {
    /// Repairs values a hand-edited file can get wrong: swapped min/max pairs,
    /// an empty page and a shrinking hover.
    pub fn sanitized(mut self) -> Self {
        if self.min_item_size > self.max_item_size {
            std::mem::swap(&mut self.min_item_size, &mut self.max_item_size);
        }
        if self.min_space_per_item > self.max_space_per_item {
            std::mem::swap(&mut self.min_space_per_item, &mut self.max_space_per_item);
        }
        if self.min_page_count > self.max_page_count {
            std::mem::swap(&mut self.min_page_count, &mut self.max_page_count);
        }
        self.items_per_page = self.items_per_page.max(1);
        self.hover_size_multiplier = self.hover_size_multiplier.max(1.0);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAction {
    NextPage,
    PreviousPage,
    /// Opens the ability menu, or steps back / closes when one is already open.
    OpenMenu,
    OpenBuildMenu,
}

/// Key names as reported by the toolkit (`Page_Down`, `grave`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Keybindings {
    pub next_page: String,
    pub previous_page: String,
    pub open_menu: String,
    pub open_build_menu: String,
}

impl Default for Keybindings {
    fn default() -> Self {
        Self {
            next_page: "Page_Down".to_string(),
            previous_page: "Page_Up".to_string(),
            open_menu: "grave".to_string(),
            open_build_menu: "b".to_string(),
        }
    }
}

impl Keybindings {
    pub fn action_for(&self, key_name: &str) -> Option<KeyAction> {
        [
            (&self.next_page, KeyAction::NextPage),
            (&self.previous_page, KeyAction::PreviousPage),
            (&self.open_menu, KeyAction::OpenMenu),
            (&self.open_build_menu, KeyAction::OpenBuildMenu),
        ]
        .into_iter()
        .find(|(bound, _)| !bound.is_empty() && bound.eq_ignore_ascii_case(key_name))
        .map(|(_, action)| action)
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine config directory")]
    ConfigDirNotFound,
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
}

/// Per-user directory holding `config.toml`, `loadout.toml` and `favorites.json`.
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    let proj_dirs =
        ProjectDirs::from("org", "pager", "pager").ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(proj_dirs.config_dir().to_path_buf())
}

pub fn settings_path() -> Result<PathBuf, ConfigError> {
    Ok(config_dir()?.join("config.toml"))
}

pub fn loadout_path() -> Result<PathBuf, ConfigError> {
    Ok(config_dir()?.join("loadout.toml"))
}

pub fn favorites_path() -> Result<PathBuf, ConfigError> {
    Ok(config_dir()?.join("favorites.json"))
}

pub fn load_settings(path: &Path) -> Result<Settings, ConfigError> {
    let s = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(config::Environment::with_prefix("PAGER").try_parsing(true))
        .build()?;

    let settings: Settings = s.try_deserialize()?;
    Ok(settings.sanitized())
}
