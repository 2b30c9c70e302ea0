use std::path::PathBuf;

use serde::Deserialize;

use crate::catalog::TrackKind;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/djuzzwave/config.toml` or `~/.config/djuzzwave/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `DJUZZWAVE__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub audio: AudioSettings,
    pub ui: UiSettings,
    pub browse: BrowseSettings,
    pub catalog: CatalogSettings,
    pub upload: UploadSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Volume the player starts with, in `[0, 1]`.
    pub initial_volume: f64,
    /// Volume change per `+` / `-` press.
    pub volume_step: f64,
    /// Fraction of the track to jump per `H` / `L` press.
    pub seek_step: f64,
    /// How often the audio thread reports progress (milliseconds).
    pub tick_ms: u64,
    /// Fade-out duration when quitting (milliseconds).
    /// Set to 0 to stop immediately.
    pub quit_fade_out_ms: u64,
    /// Timeout for fetching remote audio (seconds).
    pub fetch_timeout_secs: u64,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            initial_volume: 1.0,
            volume_step: 0.05,
            seek_step: 0.05,
            tick_ms: 250,
            quit_fade_out_ms: 300,
            fetch_timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text rendered inside the top header box.
    pub header_text: String,
    /// Whether the volume popover starts open.
    pub show_volume_popover: bool,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            header_text: " ♪ DJuzzwave ♪ ".to_string(),
            show_volume_popover: false,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BrowseSettings {
    /// Filter tab active at startup.
    pub filter: FilterSetting,
    /// Sort order active at startup.
    pub sort: SortSetting,
}

#[derive(Debug, Copy, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FilterSetting {
    #[default]
    All,
    #[serde(alias = "beats")]
    Beat,
    #[serde(alias = "tracks")]
    Track,
    #[serde(alias = "albums")]
    Album,
}

#[derive(Debug, Copy, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortSetting {
    #[default]
    Newest,
    #[serde(alias = "most-popular")]
    Popular,
    #[serde(alias = "price_low", alias = "price-asc")]
    PriceLow,
    #[serde(alias = "price_high", alias = "price-desc")]
    PriceHigh,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CatalogSettings {
    /// Whether the demo tracks are listed at startup.
    pub seed_demo: bool,
    /// Optional directory whose audio files are imported as tracks.
    pub import_dir: Option<PathBuf>,
    /// File extensions to treat as audio (case-insensitive, without dot).
    pub extensions: Vec<String>,
    /// Whether to follow symlinks during scanning.
    pub follow_links: bool,
    /// Whether to include hidden files/directories (dotfiles).
    pub include_hidden: bool,
    /// Whether to recurse into subdirectories.
    pub recursive: bool,
    /// Optional cap on directory recursion depth.
    pub max_depth: Option<usize>,
    /// Kind assigned to imported files.
    pub import_kind: TrackKind,
    /// Price assigned to imported files.
    pub import_price: f64,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            seed_demo: true,
            import_dir: None,
            extensions: vec!["mp3".into(), "wav".into()],
            follow_links: true,
            include_hidden: true,
            recursive: true,
            max_depth: None,
            import_kind: TrackKind::Beat,
            import_price: 0.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UploadSettings {
    /// Owner recorded on uploaded tracks.
    pub owner_id: String,
    /// Kind preselected in the upload form.
    pub default_kind: TrackKind,
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            owner_id: "1".to_string(),
            default_kind: TrackKind::Beat,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub enabled: bool,
    /// Log file; defaults to `djuzzwave.log` in the temp directory.
    pub file: Option<PathBuf>,
    /// Default filter when `RUST_LOG` is unset.
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            file: None,
            level: "info".to_string(),
        }
    }
}
