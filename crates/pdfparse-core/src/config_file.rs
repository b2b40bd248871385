use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Parse(#[from] toml::de::Error),
}

/// On-disk TOML configuration structure.
///
/// All fields are optional so partial configs work (merge with defaults).
/// Keys this version does not know about are ignored rather than rejected,
/// so a config written for another build still loads.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    pub conversion: Option<ConversionConfig>,
    pub extraction: Option<ExtractionConfig>,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversionConfig {
    pub backend: Option<String>,
    pub page_size: Option<String>,
    pub margin_top: Option<String>,
    pub margin_right: Option<String>,
    pub margin_bottom: Option<String>,
    pub margin_left: Option<String>,
    pub css_file: Option<String>,
    /// Chrome/Chromium executable for the `chromium` backend.
    pub chrome_path: Option<String>,
    /// Directory holding the TrueType fonts for the `genpdf` backend.
    pub font_dir: Option<String>,
    /// Font family name (file prefix) inside `font_dir`.
    pub font_name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractionConfig {
    pub backend: Option<String>,
    pub clean_text: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default `tracing` filter when `RUST_LOG` is unset (e.g. `"info"`).
    pub level: Option<String>,
}

/// Platform config directory path: `<config_dir>/pdfparse/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("pdfparse").join("config.toml"))
}

/// Load config by cascading CWD `.pdfparse.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(Path::new(".pdfparse.toml"));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

/// Read and parse one config file, reporting why it could not be used.
pub fn read_config(path: &Path) -> Result<ConfigFile, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Load a config from a specific path. Returns `None` if the file doesn't
/// exist or can't be parsed.
pub fn load_from_path(path: &Path) -> Option<ConfigFile> {
    match read_config(path) {
        Ok(config) => Some(config),
        Err(ConfigError::Io(_)) => None,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unparsable config file");
            None
        }
    }
}

/// Take a field from `overlay` if set there, else from `base`.
fn pick<S, T>(overlay: &Option<S>, base: &Option<S>, field: impl Fn(&S) -> Option<T>) -> Option<T> {
    overlay
        .as_ref()
        .and_then(&field)
        .or_else(|| base.as_ref().and_then(&field))
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    let (bc, oc) = (&base.conversion, &overlay.conversion);
    let (be, oe) = (&base.extraction, &overlay.extraction);
    let (bl, ol) = (&base.logging, &overlay.logging);

    ConfigFile {
        conversion: Some(ConversionConfig {
            backend: pick(oc, bc, |c| c.backend.clone()),
            page_size: pick(oc, bc, |c| c.page_size.clone()),
            margin_top: pick(oc, bc, |c| c.margin_top.clone()),
            margin_right: pick(oc, bc, |c| c.margin_right.clone()),
            margin_bottom: pick(oc, bc, |c| c.margin_bottom.clone()),
            margin_left: pick(oc, bc, |c| c.margin_left.clone()),
            css_file: pick(oc, bc, |c| c.css_file.clone()),
            chrome_path: pick(oc, bc, |c| c.chrome_path.clone()),
            font_dir: pick(oc, bc, |c| c.font_dir.clone()),
            font_name: pick(oc, bc, |c| c.font_name.clone()),
        }),
        extraction: Some(ExtractionConfig {
            backend: pick(oe, be, |e| e.backend.clone()),
            clean_text: pick(oe, be, |e| e.clean_text),
        }),
        logging: Some(LoggingConfig {
            level: pick(ol, bl, |l| l.level.clone()),
        }),
    }
}
