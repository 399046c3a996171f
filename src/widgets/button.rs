use crate::color::Color;
use crate::events::{notify, Listener, MouseButton};
use crate::impl_any;
use crate::look_and_feel::{Alignment, Element, TextType};
use crate::tree::WidgetTree;
use crate::widget::{Capabilities, Capability, DrawCx, EventCx, Growth, Request, Widget, WidgetId};
use crate::widgets::Label;
use cgmath::{Point2, Vector2};

pub const BUTTON_MIN_WIDTH: i32 = 250;
pub const BUTTON_MIN_HEIGHT: i32 = 30;

fn button_element(pressed: bool, hovered: bool) -> Element {
    if pressed {
        Element::ButtonPressed
    } else if hovered {
        Element::ButtonHovered
    } else {
        Element::ButtonActive
    }
}

/// A push button.
///
/// The button is pressed when clicked, and its listeners are called when the mouse button is
/// released: left-click listeners for the left button, right-click listeners for the right one.
#[derive(Debug)]
pub struct Button {
    label: Label,
    min: Vector2<i32>,
    pressed: bool,
    on_left: Vec<Listener<()>>,
    on_right: Vec<Listener<()>>,
}

impl Button {
    pub fn new(text: impl Into<String>) -> Button {
        Button {
            label: Label::new(text, TextType::Regular, Alignment::CenterMiddle),
            min: Vector2::new(BUTTON_MIN_WIDTH, BUTTON_MIN_HEIGHT),
            pressed: false,
            on_left: Vec::new(),
            on_right: Vec::new(),
        }
    }

    /// A button with a left-click action.
    pub fn with_action<F: 'static + FnMut(()) + Send>(text: impl Into<String>, action: F) -> Button {
        let mut button = Button::new(text);
        button.on_left_click(Listener::new(action));
        button
    }

    pub fn with_min_size(mut self, width: i32, height: i32) -> Button {
        self.min = Vector2::new(width, height);
        self
    }

    pub fn on_left_click(&mut self, listener: Listener<()>) {
        self.on_left.push(listener);
    }

    pub fn on_right_click(&mut self, listener: Listener<()>) {
        self.on_right.push(listener);
    }

    pub fn text(&self) -> &str {
        self.label.text()
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.label.set_text(text);
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed
    }
}

impl Widget for Button {
    impl_any!();

    fn min_size(&self, _: &WidgetTree, _: WidgetId) -> Vector2<i32> {
        Vector2::new(self.label.min_width().max(self.min.x), self.min.y)
    }

    fn draw(&mut self, cx: &mut DrawCx) {
        cx.draw(button_element(self.pressed, cx.is_hovered()));
        self.label.draw(cx);
    }

    fn capabilities(&self) -> Capabilities {
        Capability::Click | Capability::Release
    }

    fn on_click(&mut self, _: &mut EventCx, _: MouseButton, _: Point2<i32>) {
        self.pressed = true;
    }

    fn on_release(&mut self, _: &mut EventCx, button: MouseButton) {
        if !self.pressed {
            return;
        }
        self.pressed = false;
        match button {
            MouseButton::Left => notify(&self.on_left, ()),
            MouseButton::Right => notify(&self.on_right, ()),
            _ => (),
        }
    }
}

/// A button that flips between two states.
#[derive(Debug)]
pub struct ToggleButton {
    label: Label,
    min: Vector2<i32>,
    state: bool,
    pressed: bool,
    color: Option<Color>,
    listeners: Vec<Listener<bool>>,
}

impl ToggleButton {
    pub fn new(text: impl Into<String>, initial: bool) -> ToggleButton {
        ToggleButton {
            label: Label::new(text, TextType::Regular, Alignment::CenterMiddle),
            min: Vector2::new(BUTTON_MIN_WIDTH, BUTTON_MIN_HEIGHT),
            state: initial,
            pressed: false,
            color: None,
            listeners: Vec::new(),
        }
    }

    pub fn with_min_size(mut self, width: i32, height: i32) -> ToggleButton {
        self.min = Vector2::new(width, height);
        self
    }

    /// Tints the button while it is on.
    pub fn with_color(mut self, color: Color) -> ToggleButton {
        self.color = Some(color);
        self
    }

    pub fn on_toggle(&mut self, listener: Listener<bool>) {
        self.listeners.push(listener);
    }

    pub fn state(&self) -> bool {
        self.state
    }

    /// Sets the state and notifies the listeners if it changed.
    pub fn set_state(&mut self, state: bool) {
        if self.state != state {
            self.state = state;
            notify(&self.listeners, state);
        }
    }
}

impl Widget for ToggleButton {
    impl_any!();

    fn min_size(&self, _: &WidgetTree, _: WidgetId) -> Vector2<i32> {
        Vector2::new(self.label.min_width().max(self.min.x), self.min.y)
    }

    fn draw(&mut self, cx: &mut DrawCx) {
        let element = button_element(self.pressed || self.state, cx.is_hovered());
        let color = if self.state { self.color } else { None };
        cx.draw_tinted(element, color);
        self.label.draw(cx);
    }

    fn capabilities(&self) -> Capabilities {
        Capability::Click | Capability::Release
    }

    fn on_click(&mut self, _: &mut EventCx, _: MouseButton, _: Point2<i32>) {
        self.pressed = true;
    }

    fn on_release(&mut self, _: &mut EventCx, _: MouseButton) {
        if self.pressed {
            self.pressed = false;
            self.set_state(!self.state);
        }
    }
}

/// What a close button does with its frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseAction {
    Hide,
    Dispose,
}

/// The close button in a frame's title bar.
///
/// A left click arms it; releasing the left button hides the frame (or disposes it).
#[derive(Debug)]
pub struct CloseButton {
    frame: WidgetId,
    size: i32,
    armed: bool,
    action: CloseAction,
}

impl CloseButton {
    pub fn new(frame: WidgetId, size: i32) -> CloseButton {
        CloseButton {
            frame,
            size,
            armed: false,
            action: CloseAction::Hide,
        }
    }

    pub fn with_action(mut self, action: CloseAction) -> CloseButton {
        self.action = action;
        self
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn action(&self) -> CloseAction {
        self.action
    }

    pub fn set_action(&mut self, action: CloseAction) {
        self.action = action;
    }
}

impl Widget for CloseButton {
    impl_any!();

    fn min_size(&self, _: &WidgetTree, _: WidgetId) -> Vector2<i32> {
        Vector2::new(self.size, self.size)
    }

    fn default_growth(&self) -> Growth {
        Growth::NONE
    }

    fn draw(&mut self, cx: &mut DrawCx) {
        cx.draw(button_element(self.armed, cx.is_hovered()));
        cx.draw_text("X", TextType::Regular, Alignment::CenterMiddle);
    }

    fn capabilities(&self) -> Capabilities {
        Capability::Click | Capability::Release
    }

    fn on_click(&mut self, _: &mut EventCx, button: MouseButton, _: Point2<i32>) {
        if button == MouseButton::Left {
            self.armed = true;
        }
    }

    fn on_release(&mut self, cx: &mut EventCx, button: MouseButton) {
        if !self.armed || button != MouseButton::Left {
            return;
        }
        self.armed = false;
        match self.action {
            CloseAction::Hide => cx.tree().set_visible(self.frame, false),
            CloseAction::Dispose => cx.request(Request::DisposeFrame(self.frame)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::frame::Frame;
    use crate::manager::FrameManager;
    use parking_lot::Mutex;
    use std::sync::Arc;

    fn manager() -> FrameManager {
        FrameManager::new(&Settings::default())
    }

    /// Presses and releases a mouse button at the widget's top left corner.
    fn click_on(manager: &mut FrameManager, id: WidgetId, button: MouseButton) {
        let position = manager.tree().screen_position(id);
        manager.check_mouse_click(button, position.x + 2, position.y + 2);
        manager.on_release(button);
    }

    #[test]
    fn test_toggle_flips_on_release() {
        let mut manager = manager();
        let states = Arc::new(Mutex::new(Vec::new()));
        let mut toggle = ToggleButton::new("Music", true);
        {
            let states = Arc::clone(&states);
            toggle.on_toggle(Listener::new(move |state: bool| states.lock().push(state)));
        }
        let toggle = manager.tree_mut().insert(toggle);
        manager.set_main_gui(toggle).unwrap();

        manager.check_mouse_click(MouseButton::Left, 10, 10);
        assert!(manager.tree().widget::<ToggleButton>(toggle).unwrap().state());
        assert!(states.lock().is_empty());
        manager.on_release(MouseButton::Left);
        assert!(!manager.tree().widget::<ToggleButton>(toggle).unwrap().state());

        click_on(&mut manager, toggle, MouseButton::Right);
        assert!(manager.tree().widget::<ToggleButton>(toggle).unwrap().state());

        // released without a press
        manager.on_release(MouseButton::Left);
        assert_eq!(*states.lock(), vec![false, true]);

        // setting the same state again is silent
        manager
            .tree_mut()
            .update::<ToggleButton, _>(toggle, |t| t.set_state(true))
            .unwrap();
        assert_eq!(states.lock().len(), 2);
    }

    #[test]
    fn test_close_button_hides_frame() {
        let mut manager = manager();
        let frame = Frame::create(manager.tree_mut(), "closable", 200, 200);
        manager.add_frame(frame, 100, 100).unwrap();
        manager.tree_mut().validate_layout(frame);
        let close = manager.tree().widget::<Frame>(frame).unwrap().close_button().unwrap();

        let position = manager.tree().screen_position(close);
        manager.check_mouse_click(MouseButton::Right, position.x + 2, position.y + 2);
        assert!(!manager.tree().widget::<CloseButton>(close).unwrap().is_armed());
        manager.on_release(MouseButton::Right);
        assert!(manager.tree().is_visible(frame));

        manager.check_mouse_click(MouseButton::Left, position.x + 2, position.y + 2);
        assert!(manager.tree().widget::<CloseButton>(close).unwrap().is_armed());
        manager.on_release(MouseButton::Right);
        assert!(manager.tree().is_visible(frame));

        click_on(&mut manager, close, MouseButton::Left);
        assert!(!manager.tree().is_visible(frame));
        assert!(!manager.is_disposed(frame));
        assert_eq!(manager.frames().collect::<Vec<_>>(), vec![frame]);

        // hidden frames come back when focused
        manager.focus(frame).unwrap();
        assert!(manager.tree().is_visible(frame));
    }

    #[test]
    fn test_close_button_disposes_frame() {
        let mut manager = manager();
        let frame = Frame::create(manager.tree_mut(), "closable", 200, 200);
        Frame::set_close_action(manager.tree_mut(), frame, CloseAction::Dispose).unwrap();
        manager.add_frame(frame, 100, 100).unwrap();
        manager.tree_mut().validate_layout(frame);
        let close = manager.tree().widget::<Frame>(frame).unwrap().close_button().unwrap();

        click_on(&mut manager, close, MouseButton::Left);
        assert!(manager.is_disposed(frame));
        assert_eq!(manager.frames().count(), 0);
        assert!(!manager.tree().exists(close));
    }

    #[test]
    fn test_close_button_with_action() {
        let mut tree = WidgetTree::new();
        let frame = Frame::create(&mut tree, "loose", 100, 100);
        let close = tree.insert(CloseButton::new(frame, 20).with_action(CloseAction::Dispose));
        assert_eq!(tree.widget::<CloseButton>(close).unwrap().action(), CloseAction::Dispose);
        assert_eq!(tree.min_size(close), Vector2::new(20, 20));
    }
}
