use crate::events::{notify, KeyCode, KeyModifiers, Listener, MouseButton};
use crate::impl_any;
use crate::look_and_feel::{Alignment, Element, TextType};
use crate::tree::WidgetTree;
use crate::widget::{Capabilities, Capability, DrawCx, EventCx, Growth, Request, Widget, WidgetId};
use crate::widgets::Label;
use cgmath::{Point2, Vector2};

/// A single-line editable text field.
///
/// Clicking the field makes it the text listener of the frame manager, after which typed
/// characters are appended to it. Backspace removes the last character and Enter submits.
#[derive(Debug)]
pub struct TextInput {
    label: Label,
    min: Vector2<i32>,
    focused: bool,
    on_submit: Vec<Listener<String>>,
}

impl TextInput {
    pub fn new(text: impl Into<String>, width: i32, height: i32) -> TextInput {
        TextInput {
            label: Label::new(text, TextType::Regular, Alignment::LeftMiddle),
            min: Vector2::new(width, height),
            focused: false,
            on_submit: Vec::new(),
        }
    }

    pub fn text(&self) -> &str {
        self.label.text()
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.label.set_text(text);
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Adds a listener called with the text when Enter is pressed.
    pub fn on_submit(&mut self, listener: Listener<String>) {
        self.on_submit.push(listener);
    }
}

impl Widget for TextInput {
    impl_any!();

    fn min_size(&self, _: &WidgetTree, _: WidgetId) -> Vector2<i32> {
        Vector2::new(self.label.min_width().max(self.min.x), self.min.y)
    }

    fn default_growth(&self) -> Growth {
        Growth::HORIZONTAL
    }

    fn draw(&mut self, cx: &mut DrawCx) {
        cx.draw(Element::InputField);
        if self.focused {
            cx.draw(Element::Selection);
        }
        self.label.draw(cx);
    }

    fn capabilities(&self) -> Capabilities {
        Capability::Click | Capability::KeyTyped
    }

    fn on_click(&mut self, cx: &mut EventCx, _: MouseButton, _: Point2<i32>) {
        let id = cx.id();
        cx.request(Request::TextFocus(Some(id)));
    }

    fn on_key_typed(&mut self, cx: &mut EventCx, ch: char) {
        if ch.is_control() {
            return;
        }
        self.label.text_mut().push(ch);
        cx.invalidate_layout();
    }

    fn on_key_pressed(&mut self, cx: &mut EventCx, key: KeyCode, _: KeyModifiers) {
        match key {
            KeyCode::Backspace => {
                if self.label.text_mut().pop().is_some() {
                    cx.invalidate_layout();
                }
            }
            KeyCode::Return | KeyCode::NumpadEnter => {
                notify(&self.on_submit, self.label.text().to_string());
            }
            _ => (),
        }
    }

    fn on_text_focus(&mut self, focused: bool) {
        self.focused = focused;
    }
}
