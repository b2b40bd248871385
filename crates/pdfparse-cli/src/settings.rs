//! Resolve effective settings: CLI flags > env vars > config file > defaults.

use std::path::PathBuf;

use anyhow::Context;
use pdfparse_core::config_file::{ConfigFile, ConversionConfig, ExtractionConfig};
use pdfparse_core::{ConversionOptions, CssSource, Margins, PageSize};

pub const ENV_CONVERT_BACKEND: &str = "PDFPARSE_CONVERT_BACKEND";
pub const ENV_EXTRACT_BACKEND: &str = "PDFPARSE_EXTRACT_BACKEND";
pub const ENV_CHROME: &str = "PDFPARSE_CHROME";
pub const ENV_FONT_DIR: &str = "PDFPARSE_FONT_DIR";

pub const DEFAULT_CONVERT_BACKEND: &str = "chromium";
pub const DEFAULT_EXTRACT_BACKEND: &str = "lopdf";

/// Conversion flags as given on the command line.
#[derive(Debug, Default)]
pub struct ConvertFlags {
    pub backend: Option<String>,
    pub css: Option<PathBuf>,
    pub page_size: Option<String>,
    pub margin_top: Option<String>,
    pub margin_right: Option<String>,
    pub margin_bottom: Option<String>,
    pub margin_left: Option<String>,
}

#[derive(Debug)]
pub struct ConvertSettings {
    pub backend: String,
    pub options: ConversionOptions,
    pub chrome_path: Option<PathBuf>,
    pub font_dir: Option<PathBuf>,
    pub font_name: Option<String>,
}

#[derive(Debug)]
pub struct ExtractSettings {
    pub backend: String,
    pub clean_text: bool,
}

pub fn resolve_convert(
    flags: ConvertFlags,
    config: &ConfigFile,
    env: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<ConvertSettings> {
    let file = config.conversion.clone().unwrap_or_default();
    let ConversionConfig {
        backend: file_backend,
        page_size: file_page_size,
        margin_top,
        margin_right,
        margin_bottom,
        margin_left,
        css_file,
        chrome_path,
        font_dir,
        font_name,
    } = file;

    let backend = flags
        .backend
        .or_else(|| env(ENV_CONVERT_BACKEND))
        .or(file_backend)
        .unwrap_or_else(|| DEFAULT_CONVERT_BACKEND.to_string());

    let page_size = match flags.page_size.or(file_page_size) {
        Some(name) => name
            .parse::<PageSize>()
            .map_err(anyhow::Error::msg)
            .context("invalid page size")?,
        None => PageSize::default(),
    };

    let defaults = Margins::default();
    let margins = Margins {
        top: flags.margin_top.or(margin_top).unwrap_or(defaults.top),
        right: flags.margin_right.or(margin_right).unwrap_or(defaults.right),
        bottom: flags.margin_bottom.or(margin_bottom).unwrap_or(defaults.bottom),
        left: flags.margin_left.or(margin_left).unwrap_or(defaults.left),
    };

    let mut options = ConversionOptions::new()
        .with_page_size(page_size)
        .with_margins(margins);
    if let Some(css) = flags.css.or_else(|| css_file.map(PathBuf::from)) {
        options = options.with_css(CssSource::File(css));
    }

    Ok(ConvertSettings {
        backend,
        options,
        chrome_path: env(ENV_CHROME).or(chrome_path).map(PathBuf::from),
        font_dir: env(ENV_FONT_DIR).or(font_dir).map(PathBuf::from),
        font_name,
    })
}

pub fn resolve_extract(
    backend: Option<String>,
    raw: bool,
    config: &ConfigFile,
    env: impl Fn(&str) -> Option<String>,
) -> ExtractSettings {
    let ExtractionConfig {
        backend: file_backend,
        clean_text,
    } = config.extraction.clone().unwrap_or_default();

    ExtractSettings {
        backend: backend
            .or_else(|| env(ENV_EXTRACT_BACKEND))
            .or(file_backend)
            .unwrap_or_else(|| DEFAULT_EXTRACT_BACKEND.to_string()),
        clean_text: !raw && clean_text.unwrap_or(true),
    }
}

/// Read a process environment variable, treating empty values as unset.
pub fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn config_with_conversion(conversion: ConversionConfig) -> ConfigFile {
        ConfigFile {
            conversion: Some(conversion),
            ..Default::default()
        }
    }

    #[test]
    fn defaults_when_nothing_set() {
        let s = resolve_convert(ConvertFlags::default(), &ConfigFile::default(), env_of(&[]))
            .unwrap();
        assert_eq!(s.backend, "chromium");
        assert_eq!(s.options.page_size, PageSize::A4);
        assert_eq!(s.options.margins, Margins::default());
        assert!(s.options.css.is_none());
        assert!(s.chrome_path.is_none());

        let e = resolve_extract(None, false, &ConfigFile::default(), env_of(&[]));
        assert_eq!(e.backend, "lopdf");
        assert!(e.clean_text);
    }

    #[test]
    fn flag_beats_env_beats_config() {
        let config = config_with_conversion(ConversionConfig {
            backend: Some("printpdf".into()),
            margin_top: Some("1in".into()),
            margin_left: Some("2cm".into()),
            ..Default::default()
        });

        let from_config = resolve_convert(ConvertFlags::default(), &config, env_of(&[])).unwrap();
        assert_eq!(from_config.backend, "printpdf");

        let env = env_of(&[(ENV_CONVERT_BACKEND, "genpdf")]);
        let from_env = resolve_convert(ConvertFlags::default(), &config, &env).unwrap();
        assert_eq!(from_env.backend, "genpdf");

        let flags = ConvertFlags {
            backend: Some("chromium".into()),
            margin_left: Some("5mm".into()),
            ..Default::default()
        };
        let from_flag = resolve_convert(flags, &config, &env).unwrap();
        assert_eq!(from_flag.backend, "chromium");
        assert_eq!(from_flag.options.margins.top, "1in");
        assert_eq!(from_flag.options.margins.left, "5mm");
        assert_eq!(from_flag.options.margins.right, "0.75in");
    }

    #[test]
    fn bad_page_size_is_an_error() {
        let flags = ConvertFlags {
            page_size: Some("tabloid".into()),
            ..Default::default()
        };
        let err = resolve_convert(flags, &ConfigFile::default(), env_of(&[])).unwrap_err();
        assert!(format!("{err:#}").contains("tabloid"));
    }

    #[test]
    fn engine_paths_from_env_or_config() {
        let config = config_with_conversion(ConversionConfig {
            chrome_path: Some("/usr/bin/chromium".into()),
            font_dir: Some("/cfg/fonts".into()),
            font_name: Some("DejaVuSans".into()),
            css_file: Some("style.css".into()),
            ..Default::default()
        });
        let env = env_of(&[(ENV_FONT_DIR, "/env/fonts")]);
        let s = resolve_convert(ConvertFlags::default(), &config, env).unwrap();
        assert_eq!(s.chrome_path, Some(PathBuf::from("/usr/bin/chromium")));
        assert_eq!(s.font_dir, Some(PathBuf::from("/env/fonts")));
        assert_eq!(s.font_name.as_deref(), Some("DejaVuSans"));
        assert_eq!(s.options.css, Some(CssSource::File("style.css".into())));
    }

    #[test]
    fn raw_flag_disables_cleaning() {
        let config = ConfigFile {
            extraction: Some(ExtractionConfig {
                backend: Some("mupdf".into()),
                clean_text: Some(true),
            }),
            ..Default::default()
        };
        let e = resolve_extract(None, true, &config, env_of(&[]));
        assert_eq!(e.backend, "mupdf");
        assert!(!e.clean_text);

        let e = resolve_extract(
            Some("pdf-extract".into()),
            false,
            &config,
            env_of(&[(ENV_EXTRACT_BACKEND, "lopdf")]),
        );
        assert_eq!(e.backend, "pdf-extract");
    }
}
