//! Runtime configuration: built-in defaults overridden by `STAMP_*`
//! environment variables.
//!
//! Environment keys are mapped by stripping the `STAMP_` prefix, lowercasing,
//! and turning `__` into `.`, so `STAMP_OFFSET__X` sets `offset.x`.

use crate::constants::{
    CONFIG_BANNER_BOTTOM, CONFIG_BANNER_TOP, DEFAULT_JPEG_QUALITY, DEFAULT_OFFSET_X,
    DEFAULT_OFFSET_Y, DEFAULT_WATERMARK_FILE, ENV_PREFIX, ENV_SEPARATOR, KEY_DELIMITER,
    MAX_QUALITY, MIN_QUALITY, STAMP_DIR_NAME,
};
use crate::error::{Result, StampError};
use serde::Serialize;
use std::ffi::OsStr;
use std::path::PathBuf;
use std::str::FromStr;

/// Pixel position of the watermark's top-left corner on the main image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CompositionOffset {
    pub x: i32,
    pub y: i32,
}

impl Default for CompositionOffset {
    fn default() -> Self {
        Self {
            x: DEFAULT_OFFSET_X,
            y: DEFAULT_OFFSET_Y,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Config {
    /// Directory holding stamp's own files.
    pub stamp_dir: PathBuf,
    /// Watermark used when `--watermark` is not given.
    pub watermark_img: PathBuf,
    pub offset: CompositionOffset,
    pub jpeg_quality: u8,
    /// Run encoded PNGs through a lossless oxipng pass.
    pub optimize_png: bool,
}

impl Config {
    /// Defaults rooted at `stamp_dir`.
    pub fn with_stamp_dir(stamp_dir: PathBuf) -> Self {
        Self {
            watermark_img: stamp_dir.join(DEFAULT_WATERMARK_FILE),
            stamp_dir,
            offset: CompositionOffset::default(),
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            optimize_png: false,
        }
    }

    /// Defaults rooted at `~/.stamp`.
    pub fn default_for_user() -> Result<Self> {
        let home = dirs::home_dir()
            .ok_or_else(|| StampError::Config("could not determine home directory".into()))?;
        Ok(Self::with_stamp_dir(home.join(STAMP_DIR_NAME)))
    }

    /// Load defaults and apply the process environment.
    pub fn load() -> Result<Self> {
        let mut config = Self::default_for_user()?;
        config.apply_env(std::env::vars_os())?;
        Ok(config)
    }

    /// Apply `STAMP_*` overrides from `vars`. Other variables, including
    /// ones whose name is not UTF-8, are ignored.
    ///
    /// Overriding `stamp_dir` alone does not move `watermark_img`; the
    /// watermark default is fixed when the defaults are built.
    pub fn apply_env<I, K, V>(&mut self, vars: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<OsStr>,
        V: AsRef<OsStr>,
    {
        for (name, value) in vars {
            let Some(name) = name.as_ref().to_str() else {
                continue;
            };
            let Some(key) = env_key(name) else {
                continue;
            };
            let value = value.as_ref().to_str().ok_or_else(|| {
                StampError::Config(format!("value of {} is not valid UTF-8", name))
            })?;
            self.set(&key, value)?;
        }
        Ok(())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "stamp_dir" => self.stamp_dir = PathBuf::from(value),
            "watermark_img" => self.watermark_img = PathBuf::from(value),
            "offset.x" => self.offset.x = parse_value(key, value)?,
            "offset.y" => self.offset.y = parse_value(key, value)?,
            "jpeg_quality" => {
                let quality: u8 = parse_value(key, value)?;
                if !(MIN_QUALITY..=MAX_QUALITY).contains(&quality) {
                    return Err(StampError::Config(format!(
                        "jpeg_quality must be between {} and {}, got {}",
                        MIN_QUALITY, MAX_QUALITY, quality
                    )));
                }
                self.jpeg_quality = quality;
            }
            "optimize_png" => self.optimize_png = parse_bool(key, value)?,
            _ => {}
        }
        Ok(())
    }

    /// Pretty dump of the effective configuration between banner lines.
    pub fn render(&self) -> Result<String> {
        let body = serde_json::to_string_pretty(self)
            .map_err(|e| StampError::Config(format!("failed to serialize config: {}", e)))?;
        Ok(format!("{}\n{}\n{}", CONFIG_BANNER_TOP, body, CONFIG_BANNER_BOTTOM))
    }
}

fn env_key(name: &str) -> Option<String> {
    let stripped = name.strip_prefix(ENV_PREFIX)?;
    Some(stripped.to_lowercase().replace(ENV_SEPARATOR, KEY_DELIMITER))
}

fn parse_value<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| StampError::Config(format!("invalid value for {}: {:?}", key, value)))
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(StampError::Config(format!(
            "invalid value for {}: {:?}",
            key, value
        ))),
    }
}
