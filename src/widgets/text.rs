use crate::impl_any;
use crate::look_and_feel::{Alignment, Element, TextType};
use crate::tree::WidgetTree;
use crate::widget::{DrawCx, Growth, Widget, WidgetId};
use cgmath::{Point2, Vector2};
use core::fmt;

/// Default horizontal space on either side of a text run.
pub const TEXT_BORDER: i32 = 15;

/// A text run that measures itself while drawing.
///
/// Text width is only known to the look-and-feel, so it is measured the first time the text is
/// drawn (and after every change); a changed width invalidates the layout of the owning widget.
#[derive(Debug, Clone)]
pub struct Label {
    text: String,
    text_type: TextType,
    alignment: Alignment,
    border: i32,
    max_chars: Option<usize>,
    text_width: i32,
    measured: bool,
}

impl Label {
    pub fn new(text: impl Into<String>, text_type: TextType, alignment: Alignment) -> Label {
        Label {
            text: text.into(),
            text_type,
            alignment,
            border: TEXT_BORDER,
            max_chars: None,
            text_width: 0,
            measured: false,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        if text != self.text {
            self.measured = false;
            self.text = text;
        }
    }

    pub fn text_mut(&mut self) -> &mut String {
        self.measured = false;
        &mut self.text
    }

    pub fn set_border(&mut self, border: i32) {
        self.border = border;
    }

    /// Limits the displayed text to `max` characters; longer text ends in `...`.
    pub fn set_max_chars(&mut self, max: Option<usize>) {
        self.max_chars = max;
        self.measured = false;
    }

    /// The last measured width plus the border on both sides.
    pub fn min_width(&self) -> i32 {
        self.text_width + 2 * self.border
    }

    /// The text as it is displayed.
    pub fn displayed(&self) -> String {
        match self.max_chars {
            Some(max) if self.text.chars().count() > max => {
                let mut text: String = self.text.chars().take(max.saturating_sub(3)).collect();
                text.push_str("...");
                text
            }
            _ => self.text.clone(),
        }
    }

    /// Draws the text inside the widget.
    pub fn draw(&mut self, cx: &mut DrawCx) {
        let (position, size) = (cx.position(), cx.size());
        self.draw_at(cx, position, size);
    }

    /// Draws the text inside the given box.
    pub fn draw_at(&mut self, cx: &mut DrawCx, position: Point2<i32>, size: Vector2<i32>) {
        let text = self.displayed();
        if !self.measured {
            let width = cx.text_width(&text, self.text_type);
            self.measured = true;
            if width != self.text_width {
                self.text_width = width;
                cx.invalidate_layout();
            }
        }

        let inner = Point2::new(position.x + self.border, position.y);
        let inner_size = Vector2::new((size.x - 2 * self.border).max(0), size.y);
        cx.draw_text_at(inner, inner_size, &text, self.text_type, self.alignment);
    }
}

enum TextSource {
    Static,
    Dynamic(Box<dyn FnMut() -> String + Send>),
}

impl fmt::Debug for TextSource {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TextSource::Static => write!(f, "Static"),
            TextSource::Dynamic(_) => write!(f, "Dynamic(..)"),
        }
    }
}

/// A block of text.
#[derive(Debug)]
pub struct TextArea {
    label: Label,
    source: TextSource,
    min: Vector2<i32>,
    background: Option<Element>,
    growth: Growth,
}

impl TextArea {
    /// A text area that is at least as wide as its text.
    pub fn new(text: impl Into<String>, text_type: TextType, alignment: Alignment) -> TextArea {
        TextArea {
            label: Label::new(text, text_type, alignment),
            source: TextSource::Static,
            min: Vector2::new(0, 0),
            background: None,
            growth: Growth::HORIZONTAL,
        }
    }

    /// A text area that asks `supplier` for its text every time it is drawn.
    pub fn dynamic<F>(supplier: F, text_type: TextType, alignment: Alignment) -> TextArea
    where
        F: FnMut() -> String + Send + 'static,
    {
        let mut area = TextArea::new(String::new(), text_type, alignment);
        area.source = TextSource::Dynamic(Box::new(supplier));
        area
    }

    pub fn with_min_size(mut self, width: i32, height: i32) -> TextArea {
        self.min = Vector2::new(width, height);
        self
    }

    pub fn with_max_chars(mut self, max: usize) -> TextArea {
        self.label.set_max_chars(Some(max));
        self
    }

    pub fn with_background(mut self, element: Element) -> TextArea {
        self.background = Some(element);
        self
    }

    pub fn with_border(mut self, border: i32) -> TextArea {
        self.label.set_border(border);
        self
    }

    /// Sets the growth policy used when inserted into a tree.
    pub fn with_growth(mut self, growth: Growth) -> TextArea {
        self.growth = growth;
        self
    }

    pub fn text(&self) -> &str {
        self.label.text()
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.label.set_text(text);
    }
}

impl Widget for TextArea {
    impl_any!();

    fn min_size(&self, _: &WidgetTree, _: WidgetId) -> Vector2<i32> {
        Vector2::new(self.label.min_width().max(self.min.x), self.min.y)
    }

    fn default_growth(&self) -> Growth {
        self.growth
    }

    fn draw(&mut self, cx: &mut DrawCx) {
        if let TextSource::Dynamic(supplier) = &mut self.source {
            let text = supplier();
            self.label.set_text(text);
        }
        if let Some(background) = self.background {
            cx.draw(background);
        }
        self.label.draw(cx);
    }
}
