//! Toolkit settings.
//!
//! Settings are read from a TOML file; every field has a default, so an empty file (or no file at
//! all) gives a working configuration.

use crate::look_and_feel::{Alignment, TextType};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::{fs, io};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Font configuration for one text type.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FontSettings {
    /// Horizontal advance per character in pixels.
    pub advance: f32,
    /// Line height in pixels.
    pub height: i32,
    /// Font file to load. If it cannot be read, text of this type is not drawn.
    #[serde(default)]
    pub file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Initial screen width; the root panel covers the screen.
    pub window_width: i32,
    pub window_height: i32,

    /// Maximum number of frames in the frame stack.
    pub max_frames: usize,

    /// Fraction of a slider's range moved per unit of scroll input.
    pub slider_scroll_speed: f32,

    /// How often a frame may be revalidated and redrawn in one draw pass.
    pub redraw_limit: usize,

    /// Default alignment for text areas.
    pub text_alignment: Alignment,

    pub fonts: HashMap<TextType, FontSettings>,
}

impl Default for Settings {
    fn default() -> Self {
        let mut fonts = HashMap::new();
        fonts.insert(
            TextType::Title,
            FontSettings {
                advance: 12.,
                height: 24,
                file: None,
            },
        );
        for text_type in [TextType::Accent, TextType::Regular, TextType::Tooltip] {
            fonts.insert(
                text_type,
                FontSettings {
                    advance: 9.,
                    height: 18,
                    file: None,
                },
            );
        }

        Settings {
            window_width: 1200,
            window_height: 800,
            max_frames: 32,
            slider_scroll_speed: 0.05,
            redraw_limit: 4,
            text_alignment: Alignment::LeftMiddle,
            fonts,
        }
    }
}

impl Settings {
    /// Parses settings from TOML text.
    pub fn from_toml_str(s: &str) -> Result<Settings, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Loads settings from a TOML file.
    pub fn load(path: &Path) -> Result<Settings, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Settings::from_toml_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let settings = Settings::from_toml_str("").unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn partial_file_overrides_fields() {
        let settings = Settings::from_toml_str(
            r#"
            max_frames = 3
            text_alignment = "center_top"

            [fonts.title]
            advance = 20.0
            height = 30
            "#,
        )
        .unwrap();
        assert_eq!(settings.max_frames, 3);
        assert_eq!(settings.window_width, 1200);
        assert_eq!(settings.text_alignment, Alignment::CenterTop);
        assert_eq!(settings.fonts[&TextType::Title].height, 30);
    }

    #[test]
    fn unknown_alignment_is_rejected() {
        let err = Settings::from_toml_str(r#"text_alignment = "diagonal""#).unwrap_err();
        assert!(err.to_string().contains("unknown alignment"), "{}", err);
    }
}
