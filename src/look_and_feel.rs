//! The drawing boundary.
//!
//! Widgets never draw pixels themselves. They describe what they look like in terms of abstract
//! [`Element`]s and text runs, and a [`LookAndFeel`] implementation turns those into actual drawing
//! commands for whatever renderer is in use.

use crate::color::Color;
use crate::config::FontSettings;
use crate::error::UiError;
use cgmath::{Point2, Vector2};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::str::FromStr;
use tracing::{debug, warn};

/// Kinds of elements a look-and-feel knows how to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Element {
    ButtonActive,
    ButtonHovered,
    ButtonPressed,
    ButtonInactive,
    DropDownHeadClosed,
    DropDownHeadOpen,
    DropDownOptionField,
    ScrollBarBackground,
    ScrollBarDragElement,
    /// The background of a frame or panel.
    Panel,
    FrameHeader,
    /// An area with text that hints that the text can be changed.
    InputField,
    /// A marking to indicate that e.g. a text field is selected.
    Selection,
}

/// Text alignment within a box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum Alignment {
    LeftTop,
    CenterTop,
    RightTop,
    LeftMiddle,
    CenterMiddle,
    RightMiddle,
}

impl FromStr for Alignment {
    type Err = UiError;

    fn from_str(s: &str) -> Result<Alignment, UiError> {
        Ok(match s {
            "left_top" => Alignment::LeftTop,
            "center_top" => Alignment::CenterTop,
            "right_top" => Alignment::RightTop,
            "left_middle" => Alignment::LeftMiddle,
            "center_middle" => Alignment::CenterMiddle,
            "right_middle" => Alignment::RightMiddle,
            _ => return Err(UiError::UnknownAlignment(s.to_string())),
        })
    }
}

impl TryFrom<String> for Alignment {
    type Error = UiError;

    fn try_from(s: String) -> Result<Alignment, UiError> {
        s.parse()
    }
}

impl Alignment {
    /// Returns the top left position of a text run of the given size inside the box.
    pub fn place(&self, position: Point2<i32>, size: Vector2<i32>, text: Vector2<i32>) -> Point2<i32> {
        let x = match self {
            Alignment::LeftTop | Alignment::LeftMiddle => position.x,
            Alignment::CenterTop | Alignment::CenterMiddle => position.x + (size.x - text.x) / 2,
            Alignment::RightTop | Alignment::RightMiddle => position.x + size.x - text.x,
        };
        let y = match self {
            Alignment::LeftTop | Alignment::CenterTop | Alignment::RightTop => position.y,
            _ => position.y + (size.y - text.y) / 2,
        };
        Point2::new(x, y)
    }
}

/// Font roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextType {
    Title,
    Accent,
    Regular,
    Tooltip,
}

impl TextType {
    pub const ALL: [TextType; 4] = [
        TextType::Title,
        TextType::Accent,
        TextType::Regular,
        TextType::Tooltip,
    ];
}

/// A look-and-feel: a stateless mapping from abstract element descriptions to drawing commands.
pub trait LookAndFeel {
    /// Draws an element with its upper left corner at `position`.
    fn draw(&mut self, element: Element, position: Point2<i32>, size: Vector2<i32>, color: Option<Color>);

    /// Draws text inside the given box.
    fn draw_text(
        &mut self,
        position: Point2<i32>,
        size: Vector2<i32>,
        text: &str,
        text_type: TextType,
        alignment: Alignment,
    );

    /// Returns the width of the given text in pixels.
    fn text_width(&self, text: &str, text_type: TextType) -> i32;
}

/// Metrics of a loaded font.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontMetrics {
    /// Horizontal advance per character in pixels.
    pub advance: f32,
    /// Line height in pixels.
    pub height: i32,
    /// False if the font data could not be loaded; text of this type is then not drawn.
    pub available: bool,
}

impl Default for FontMetrics {
    fn default() -> Self {
        FontMetrics {
            advance: 9.,
            height: 18,
            available: true,
        }
    }
}

/// Font resources shared by a look-and-feel.
///
/// This is constructed once and handed to the look-and-feel instead of living in a global.
#[derive(Debug, Clone, Default)]
pub struct Fonts {
    metrics: HashMap<TextType, FontMetrics>,
}

impl Fonts {
    /// Loads the fonts described in the settings.
    ///
    /// A font file that cannot be read is logged and that text type is marked unavailable; the
    /// rest of the fonts still load.
    pub fn load(settings: &HashMap<TextType, FontSettings>) -> Fonts {
        let mut metrics = HashMap::new();
        for (text_type, font) in settings {
            let mut m = FontMetrics {
                advance: font.advance,
                height: font.height,
                available: true,
            };
            if let Some(path) = &font.file {
                match fs::read(path) {
                    Ok(data) => debug!("loaded font {:?} ({} bytes)", path, data.len()),
                    Err(err) => {
                        warn!("could not load font {:?} for {:?}: {}", path, text_type, err);
                        m.available = false;
                    }
                }
            }
            metrics.insert(*text_type, m);
        }
        Fonts { metrics }
    }

    pub fn metrics(&self, text_type: TextType) -> FontMetrics {
        self.metrics.get(&text_type).copied().unwrap_or_default()
    }

    /// Estimated width of a text run.
    pub fn text_width(&self, text: &str, text_type: TextType) -> i32 {
        let m = self.metrics(text_type);
        (text.chars().count() as f32 * m.advance).ceil() as i32
    }
}

/// A recorded drawing command.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Element {
        element: Element,
        position: Point2<i32>,
        size: Vector2<i32>,
        color: Option<Color>,
    },
    Text {
        position: Point2<i32>,
        size: Vector2<i32>,
        text: String,
        text_type: TextType,
        alignment: Alignment,
    },
}

/// A look-and-feel that records drawing commands instead of rendering them.
///
/// Useful for headless runs and for asserting on what was drawn.
#[derive(Debug, Default)]
pub struct Recorder {
    fonts: Fonts,
    commands: Vec<DrawCommand>,
}

impl Recorder {
    pub fn new(fonts: Fonts) -> Recorder {
        Recorder {
            fonts,
            commands: Vec::new(),
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Removes and returns all recorded commands.
    pub fn take(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Returns all recorded text runs, in drawing order.
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl LookAndFeel for Recorder {
    fn draw(&mut self, element: Element, position: Point2<i32>, size: Vector2<i32>, color: Option<Color>) {
        self.commands.push(DrawCommand::Element {
            element,
            position,
            size,
            color,
        });
    }

    fn draw_text(
        &mut self,
        position: Point2<i32>,
        size: Vector2<i32>,
        text: &str,
        text_type: TextType,
        alignment: Alignment,
    ) {
        if !self.fonts.metrics(text_type).available {
            return;
        }
        self.commands.push(DrawCommand::Text {
            position,
            size,
            text: text.to_string(),
            text_type,
            alignment,
        });
    }

    fn text_width(&self, text: &str, text_type: TextType) -> i32 {
        self.fonts.text_width(text, text_type)
    }
}

#[test]
fn test_alignment_parse() {
    assert_eq!("center_middle".parse::<Alignment>(), Ok(Alignment::CenterMiddle));
    assert_eq!(
        "sideways".parse::<Alignment>(),
        Err(UiError::UnknownAlignment("sideways".to_string()))
    );
}

#[test]
fn test_missing_font_degrades() {
    let mut settings = HashMap::new();
    settings.insert(
        TextType::Title,
        FontSettings {
            advance: 12.,
            height: 24,
            file: Some("/nonexistent/font/file.ttf".into()),
        },
    );
    let fonts = Fonts::load(&settings);
    assert!(!fonts.metrics(TextType::Title).available);
    assert_eq!(fonts.text_width("abc", TextType::Title), 36);

    let mut recorder = Recorder::new(fonts);
    recorder.draw_text(
        Point2::new(0, 0),
        Vector2::new(100, 20),
        "title",
        TextType::Title,
        Alignment::CenterMiddle,
    );
    recorder.draw_text(
        Point2::new(0, 0),
        Vector2::new(100, 20),
        "body",
        TextType::Regular,
        Alignment::CenterMiddle,
    );
    assert_eq!(recorder.texts(), vec!["body"]);
}
