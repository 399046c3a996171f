//! The frame manager.

use crate::config::Settings;
use crate::error::UiError;
use crate::events::{KeyCode, KeyControl, MouseButton, RawEvent};
use crate::frame::Frame;
use crate::look_and_feel::LookAndFeel;
use crate::rect::to_vec;
use crate::tree::WidgetTree;
use crate::widget::{Capability, EventCx, Request, Widget, WidgetId};
use crate::widgets::Panel;
use cgmath::{Point2, Vector2};
use core::any::Any;
use std::collections::{HashSet, VecDeque};
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, error, trace, warn};

/// Where [`FrameManager::add_frame_default`] starts looking for free space.
const DEFAULT_FRAME_POSITION: (i32, i32) = (50, 200);

/// Extracts the message of a panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "(no message)"
    }
}

/// Owns the widget tree and routes input to it.
///
/// The manager keeps a root panel covering the whole screen and a stack of frames on top of it,
/// ordered by focus (front first). Clicks go, in order of precedence, to
///
/// 1. the modal component, if one is armed (it captures exactly one click, hit or miss),
/// 2. the front-most visible frame containing the cursor, which is focused,
/// 3. the root panel.
///
/// Within the hit subtree, each kind of input goes to the nearest widget, starting at the hit
/// widget and walking up, that declares the matching [`Capability`]. The drag and release
/// listeners are picked at click time and kept until the mouse button is released.
#[derive(Debug)]
pub struct FrameManager {
    tree: WidgetTree,
    /// Front is focused.
    frames: VecDeque<WidgetId>,
    main_panel: WidgetId,
    modal: Option<WidgetId>,
    hovered: Option<WidgetId>,
    /// (listener, hit widget)
    drag_listener: Option<(WidgetId, WidgetId)>,
    release_listener: Option<(WidgetId, WidgetId)>,
    text_listener: Option<WidgetId>,
    keys: KeyControl,
    screen: Vector2<i32>,
    max_frames: usize,
    redraw_limit: usize,
    /// Frames that were disposed and removed from the stack.
    retired: HashSet<WidgetId>,
}

impl FrameManager {
    pub fn new(settings: &Settings) -> FrameManager {
        let mut tree = WidgetTree::new();
        let main_panel = tree.insert(Panel::single());
        let screen = Vector2::new(settings.window_width, settings.window_height);
        tree.set_size(main_panel, screen.x, screen.y);

        FrameManager {
            tree,
            frames: VecDeque::new(),
            main_panel,
            modal: None,
            hovered: None,
            drag_listener: None,
            release_listener: None,
            text_listener: None,
            keys: KeyControl::new(),
            screen,
            max_frames: settings.max_frames.max(1),
            redraw_limit: settings.redraw_limit.max(1),
            retired: HashSet::new(),
        }
    }

    pub fn tree(&self) -> &WidgetTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut WidgetTree {
        &mut self.tree
    }

    /// The root panel covering the screen.
    pub fn main_panel(&self) -> WidgetId {
        self.main_panel
    }

    /// The frames, front (focused) first.
    pub fn frames(&self) -> impl Iterator<Item = WidgetId> + '_ {
        self.frames.iter().copied()
    }

    pub fn modal(&self) -> Option<WidgetId> {
        self.modal
    }

    pub fn hovered(&self) -> Option<WidgetId> {
        self.hovered
    }

    pub fn text_listener(&self) -> Option<WidgetId> {
        self.text_listener
    }

    pub fn keys(&self) -> &KeyControl {
        &self.keys
    }

    pub fn screen_size(&self) -> Vector2<i32> {
        self.screen
    }

    pub fn set_screen_size(&mut self, width: i32, height: i32) {
        self.screen = Vector2::new(width, height);
        self.tree.set_size(self.main_panel, width, height);
    }

    /// Replaces the root panel. The previous one is destroyed.
    pub fn set_main_gui(&mut self, component: WidgetId) -> Result<(), UiError> {
        if !self.tree.exists(component) {
            return Err(UiError::UnknownWidget(component));
        }
        if component != self.main_panel {
            self.tree.destroy(self.main_panel);
            self.main_panel = component;
        }
        self.tree.set_position(component, Point2::new(0, 0));
        self.tree.set_size(component, self.screen.x, self.screen.y);
        Ok(())
    }

    /// Returns true if the frame is disposed (whether or not it was removed from the stack yet).
    pub fn is_disposed(&self, frame: WidgetId) -> bool {
        self.retired.contains(&frame)
            || self
                .tree
                .widget::<Frame>(frame)
                .map_or(false, Frame::is_disposed)
    }

    fn check_frame(&self, frame: WidgetId) -> Result<(), UiError> {
        if self.is_disposed(frame) {
            return Err(UiError::FrameDisposed(frame));
        }
        match self.tree.widget::<Frame>(frame) {
            Some(_) => Ok(()),
            None if self.tree.exists(frame) => Err(UiError::WrongWidgetType(frame)),
            None => Err(UiError::UnknownWidget(frame)),
        }
    }

    /// Adds a frame at the front of the stack, at the given screen position.
    ///
    /// A frame that is already in the stack is moved to the front. If the stack is full, the
    /// least focused frame is disposed to make room.
    pub fn add_frame(&mut self, frame: WidgetId, x: i32, y: i32) -> Result<(), UiError> {
        self.check_frame(frame)?;

        self.frames.retain(|f| *f != frame);
        while self.frames.len() >= self.max_frames {
            match self.frames.pop_back() {
                Some(last) => {
                    debug!("frame stack is full, disposing {:?}", last);
                    let _ = Frame::dispose(&mut self.tree, last);
                    self.retire(last);
                }
                None => break,
            }
        }

        self.frames.push_front(frame);
        self.tree.set_position(frame, Point2::new(x, y));
        debug!("added frame {:?} at ({}, {})", frame, x, y);
        Ok(())
    }

    /// Adds a frame at the first free spot to the right of a default position.
    pub fn add_frame_default(&mut self, frame: WidgetId) -> Result<(), UiError> {
        self.check_frame(frame)?;
        let (mut x, y) = DEFAULT_FRAME_POSITION;
        while let Some(other) = self.frame_at(Point2::new(x, y)) {
            let bounds = self.tree.bounds(other);
            x = bounds.origin.x + bounds.width();
        }
        self.add_frame(frame, x, y)
    }

    /// Adds a frame centered horizontally on the screen.
    pub fn add_frame_centered(&mut self, frame: WidgetId) -> Result<(), UiError> {
        self.check_frame(frame)?;
        self.tree.validate_layout(frame);
        let size = self.tree.size(frame);
        let x = (self.screen.x - size.x) / 2;
        let y = DEFAULT_FRAME_POSITION.1;
        self.add_frame(frame, x.max(0), y)
    }

    /// Shows a component: frames are added as they are, anything else is wrapped in a new frame.
    ///
    /// Returns the frame.
    pub fn add_element(&mut self, component: WidgetId) -> Result<WidgetId, UiError> {
        if self.tree.widget::<Frame>(component).is_some() {
            self.add_frame_default(component)?;
            return Ok(component);
        }
        if !self.tree.exists(component) {
            return Err(UiError::UnknownWidget(component));
        }

        let title = self.tree.name(component);
        let frame = Frame::create(&mut self.tree, &title, 0, 0);
        Frame::set_main_panel(&mut self.tree, frame, component)?;
        Frame::pack(&mut self.tree, frame);
        self.add_frame_default(frame)?;
        Ok(frame)
    }

    /// Disposes the frame containing the component (or the component itself, if it's a frame).
    ///
    /// Returns false if the component is not in a frame.
    pub fn remove_element(&mut self, component: WidgetId) -> bool {
        let root = self.tree.root(component);
        if self.tree.widget::<Frame>(root).is_none() {
            return false;
        }
        self.dispose(root).is_ok()
    }

    /// Moves a frame to the front and makes it visible.
    ///
    /// Fails if the frame is disposed or was never added; the stack is left unchanged then.
    pub fn focus(&mut self, frame: WidgetId) -> Result<(), UiError> {
        if self.is_disposed(frame) {
            warn!("attempted to focus disposed frame {:?}", frame);
            return Err(UiError::FrameDisposed(frame));
        }
        let index = match self.frames.iter().position(|f| *f == frame) {
            Some(index) => index,
            None => {
                warn!("attempted to focus unknown frame {:?}", frame);
                return Err(UiError::UnknownFrame(frame));
            }
        };

        self.tree.set_visible(frame, true);
        if index != 0 {
            self.frames.remove(index);
            self.frames.push_front(frame);
            trace!("focused frame {:?}", frame);
        }
        Ok(())
    }

    /// Disposes a frame and removes it from the stack right away.
    pub fn dispose(&mut self, frame: WidgetId) -> Result<(), UiError> {
        if self.retired.contains(&frame) {
            return Ok(());
        }
        Frame::dispose(&mut self.tree, frame)?;
        self.frames.retain(|f| *f != frame);
        self.retire(frame);
        Ok(())
    }

    /// Destroys a disposed frame's widgets and drops any input state that pointed into them.
    fn retire(&mut self, frame: WidgetId) {
        self.tree.destroy(frame);
        self.retired.insert(frame);

        let tree = &self.tree;
        let gone = |id: Option<WidgetId>| id.map_or(false, |id| !tree.exists(id));
        if gone(self.text_listener) {
            self.text_listener = None;
        }
        if gone(self.hovered) {
            self.hovered = None;
        }
        if gone(self.drag_listener.map(|l| l.0)) {
            self.drag_listener = None;
        }
        if gone(self.release_listener.map(|l| l.0)) {
            self.release_listener = None;
        }
        if gone(self.modal) {
            debug!("modal component went away with frame {:?}", frame);
            self.modal = None;
        }
    }

    /// Disposes every frame and resets the root panel.
    ///
    /// Frames retired before this are forgotten: using them afterwards fails with
    /// [`UiError::UnknownWidget`] rather than [`UiError::FrameDisposed`].
    pub fn clear(&mut self) {
        for frame in self.frames.drain(..).collect::<Vec<_>>() {
            let _ = Frame::dispose(&mut self.tree, frame);
            self.retire(frame);
        }
        self.retired.clear();
        if let Some(modal) = self.modal.take() {
            self.tree.set_visible(modal, false);
        }
        let panel = self.tree.insert(Panel::single());
        let _ = self.set_main_gui(panel);
        self.hovered = None;
        self.drag_listener = None;
        self.release_listener = None;
        self.text_listener = None;
    }

    /// Arms the modal capture: the next click goes to this component only.
    pub fn set_modal(&mut self, component: WidgetId) {
        self.modal = Some(component);
    }

    /// Sets the widget receiving typed characters.
    pub fn set_text_listener(&mut self, listener: Option<WidgetId>) {
        if listener == self.text_listener {
            return;
        }
        if let Some(old) = self.text_listener.and_then(|id| self.tree.widget_dyn_mut(id)) {
            old.on_text_focus(false);
        }
        if let Some(new) = listener.and_then(|id| self.tree.widget_dyn_mut(id)) {
            new.on_text_focus(true);
        }
        self.text_listener = listener;
    }

    /// Returns true if anything other than the bare root panel is at the screen position.
    pub fn covers(&self, x: i32, y: i32) -> bool {
        let point = Point2::new(x, y);
        if let Some(modal) = self.modal {
            if self.tree.is_visible(modal) && self.tree.contains(modal, point) {
                return true;
            }
        }
        if self.frame_at(point).is_some() {
            return true;
        }
        self.tree.component_at(self.main_panel, point) != self.main_panel
    }

    fn frame_at(&self, point: Point2<i32>) -> Option<WidgetId> {
        self.frames
            .iter()
            .copied()
            .find(|f| self.tree.is_visible(*f) && self.tree.contains(*f, point))
    }

    /// The widget under a screen position.
    pub fn component_at(&self, x: i32, y: i32) -> WidgetId {
        let point = Point2::new(x, y);
        let root = match self.modal {
            Some(modal) if self.tree.is_visible(modal) && self.tree.contains(modal, point) => modal,
            _ => self.frame_at(point).unwrap_or(self.main_panel),
        };
        let local = point - to_vec(self.tree.position(root));
        self.tree.component_at(root, local)
    }

    fn validate_roots(&mut self) {
        self.tree.validate_layout(self.main_panel);
        for frame in self.frames.iter() {
            self.tree.validate_layout(*frame);
        }
        if let Some(modal) = self.modal {
            self.tree.validate_layout(modal);
        }
    }

    /// Draws the root panel, then the frames back to front, then the modal component.
    pub fn draw(&mut self, lf: &mut dyn LookAndFeel) {
        let main_panel = self.main_panel;
        if self.tree.size(main_panel) != self.screen {
            self.tree.set_size(main_panel, self.screen.x, self.screen.y);
        }
        self.draw_root(main_panel, lf);

        let disposed: Vec<_> = self
            .frames
            .iter()
            .copied()
            .filter(|f| self.is_disposed(*f))
            .collect();
        if !disposed.is_empty() {
            self.frames.retain(|f| !disposed.contains(f));
            for frame in disposed {
                self.retire(frame);
            }
        }

        let frames: Vec<_> = self.frames.iter().rev().copied().collect();
        for frame in frames {
            if self.tree.is_visible(frame) {
                self.draw_root(frame, lf);
            }
        }

        if let Some(modal) = self.modal {
            if self.tree.is_visible(modal) {
                self.draw_root(modal, lf);
            }
        }
    }

    /// Draws a root widget, redrawing it while drawing invalidates its layout.
    fn draw_root(&mut self, root: WidgetId, lf: &mut dyn LookAndFeel) {
        for _ in 0..self.redraw_limit {
            self.tree.validate_layout(root);
            let position = self.tree.position(root);
            self.tree.draw(root, lf, position);
            if self.tree.is_layout_valid(root) {
                break;
            }
        }
    }

    /// Calls an event handler, isolating panics and applying the handler's requests.
    fn deliver<F>(&mut self, id: WidgetId, target: WidgetId, f: F)
    where
        F: FnOnce(&mut dyn Widget, &mut EventCx),
    {
        let mut requests = Vec::new();
        let tree = &mut self.tree;
        let result = panic::catch_unwind(AssertUnwindSafe(|| tree.dispatch(id, target, &mut requests, f)));
        match result {
            Ok(Some(())) => (),
            Ok(None) => trace!("event for {:?} dropped: widget is gone", id),
            Err(payload) => error!(
                "event handler of {} panicked: {}",
                self.tree.name(id),
                panic_message(&*payload)
            ),
        }

        for request in requests {
            self.handle_request(request);
        }
    }

    fn handle_request(&mut self, request: Request) {
        trace!("request {:?}", request);
        let result = match request {
            Request::SetModal(id) => {
                self.set_modal(id);
                Ok(())
            }
            Request::TextFocus(id) => {
                self.set_text_listener(id);
                Ok(())
            }
            Request::FocusFrame(id) => self.focus(id),
            Request::DisposeFrame(id) => self.dispose(id),
        };
        if let Err(err) = result {
            warn!("{}", err);
        }
    }

    /// Handles a mouse button press at a screen position.
    ///
    /// Returns true if the click hit the modal component, a frame, or a click handler on the
    /// root panel.
    pub fn check_mouse_click(&mut self, button: MouseButton, x: i32, y: i32) -> bool {
        let point = Point2::new(x, y);
        self.validate_roots();

        if let Some(modal) = self.modal.take() {
            if self.tree.is_visible(modal) && self.tree.contains(modal, point) {
                let local = point - to_vec(self.tree.position(modal));
                let leaf = self.tree.component_at(modal, local);
                self.process_click(button, leaf, point);
            } else {
                trace!("click at {:?} missed the modal component", point);
            }
            if self.modal != Some(modal) {
                self.tree.set_visible(modal, false);
            }
            return true;
        }

        if let Some(frame) = self.frame_at(point) {
            let local = point - to_vec(self.tree.position(frame));
            let leaf = self.tree.component_at(frame, local);
            if let Err(err) = self.focus(frame) {
                warn!("{}", err);
            }
            self.process_click(button, leaf, point);
            return true;
        }

        let leaf = self.tree.component_at(self.main_panel, point);
        self.process_click(button, leaf, point)
    }

    fn process_click(&mut self, button: MouseButton, leaf: WidgetId, point: Point2<i32>) -> bool {
        let click = self.tree.find_ancestor(leaf, Capability::Click);
        self.drag_listener = self
            .tree
            .find_ancestor(leaf, Capability::Drag)
            .map(|id| (id, leaf));
        self.release_listener = self
            .tree
            .find_ancestor(leaf, Capability::Release)
            .map(|id| (id, leaf));

        if self.text_listener.is_some() && self.text_listener != click {
            self.set_text_listener(None);
        }

        match click {
            Some(listener) => {
                let origin = self.tree.screen_position(listener);
                let local = Point2::new(point.x - origin.x, point.y - origin.y);
                self.deliver(listener, leaf, |widget, cx| widget.on_click(cx, button, local));
                true
            }
            None => false,
        }
    }

    /// Handles a mouse button release. Both the drag and the release listener are cleared.
    pub fn on_release(&mut self, button: MouseButton) {
        self.drag_listener = None;
        if let Some((listener, target)) = self.release_listener.take() {
            self.deliver(listener, target, |widget, cx| widget.on_release(cx, button));
        }
    }

    /// Handles cursor movement: updates the hovered widget and drives the drag listener.
    pub fn on_mouse_move(&mut self, dx: i32, dy: i32, x: f32, y: f32) {
        let hovered = self.component_at(x.floor() as i32, y.floor() as i32);
        if self.hovered != Some(hovered) {
            if let Some(old) = self.hovered {
                self.tree.set_hovered(old, false);
            }
            self.tree.set_hovered(hovered, true);
            self.hovered = Some(hovered);
        }

        if let Some((listener, target)) = self.drag_listener {
            let delta = Vector2::new(dx, dy);
            let cursor = Point2::new(x, y);
            self.deliver(listener, target, |widget, cx| widget.on_drag(cx, delta, cursor));
        }
    }

    /// Sends scroll input to the nearest scrollable widget under the cursor.
    pub fn on_scroll(&mut self, delta: f32) {
        let hovered = match self.hovered {
            Some(hovered) => hovered,
            None => return,
        };
        if let Some(listener) = self.tree.find_ancestor(hovered, Capability::Scroll) {
            self.deliver(listener, hovered, |widget, cx| widget.on_scroll(cx, delta));
        }
    }

    /// Sends a typed character to the text listener.
    pub fn key_typed(&mut self, ch: char) {
        if let Some(listener) = self.text_listener {
            self.deliver(listener, listener, |widget, cx| widget.on_key_typed(cx, ch));
        }
    }

    pub fn key_pressed(&mut self, key: KeyCode) {
        self.keys.key_pressed(key);
        let modifiers = self.keys.modifiers();
        if let Some(listener) = self.text_listener {
            self.deliver(listener, listener, |widget, cx| {
                widget.on_key_pressed(cx, key, modifiers)
            });
        }
    }

    pub fn key_released(&mut self, key: KeyCode) {
        self.keys.key_released(key);
    }

    /// Applies a raw input event.
    pub fn apply(&mut self, event: RawEvent) {
        match event {
            RawEvent::KeyDown(key) => self.key_pressed(key),
            RawEvent::KeyUp(key) => self.key_released(key),
            RawEvent::CharTyped(ch) => self.key_typed(ch),
            RawEvent::MouseDown { button, x, y } => {
                self.check_mouse_click(button, x, y);
            }
            RawEvent::MouseUp { button } => self.on_release(button),
            RawEvent::MouseMove { dx, dy, x, y } => self.on_mouse_move(dx, dy, x, y),
            RawEvent::Scroll { delta } => self.on_scroll(delta),
            RawEvent::Resize { width, height } => self.set_screen_size(width, height),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::Listener;
    use crate::look_and_feel::{Fonts, Recorder};
    use crate::widgets::{Button, Capture, DropDown, Filler, TextInput};
    use parking_lot::Mutex;
    use std::sync::Arc;

    fn manager() -> FrameManager {
        FrameManager::new(&Settings::default())
    }

    fn frame(manager: &mut FrameManager, x: i32, y: i32) -> WidgetId {
        let frame = Frame::create(manager.tree_mut(), "frame", 200, 200);
        manager.add_frame(frame, x, y).unwrap();
        frame
    }

    fn counter() -> (Arc<Mutex<u32>>, Listener<()>) {
        let count = Arc::new(Mutex::new(0));
        let listener = {
            let count = Arc::clone(&count);
            Listener::new(move |()| *count.lock() += 1)
        };
        (count, listener)
    }

    #[test]
    fn test_add_frame_twice_moves_to_front() {
        let mut manager = manager();
        let a = frame(&mut manager, 0, 0);
        let b = frame(&mut manager, 0, 0);
        manager.add_frame(a, 10, 10).unwrap();
        assert_eq!(manager.frames().collect::<Vec<_>>(), vec![a, b]);
        assert_eq!(manager.tree().position(a), Point2::new(10, 10));
    }

    #[test]
    fn test_overflow_disposes_least_focused() {
        let mut settings = Settings::default();
        settings.max_frames = 2;
        let mut manager = FrameManager::new(&settings);
        let a = Frame::create(manager.tree_mut(), "a", 100, 100);
        let b = Frame::create(manager.tree_mut(), "b", 100, 100);
        let c = Frame::create(manager.tree_mut(), "c", 100, 100);
        manager.add_frame(a, 0, 0).unwrap();
        manager.add_frame(b, 0, 0).unwrap();
        manager.add_frame(c, 0, 0).unwrap();

        assert_eq!(manager.frames().collect::<Vec<_>>(), vec![c, b]);
        assert!(manager.is_disposed(a));
        assert_eq!(manager.focus(a), Err(UiError::FrameDisposed(a)));
    }

    #[test]
    fn test_focus_unknown_frame() {
        let mut manager = manager();
        let a = Frame::create(manager.tree_mut(), "a", 100, 100);
        assert_eq!(manager.focus(a), Err(UiError::UnknownFrame(a)));
    }

    #[test]
    fn test_button_click_and_release() {
        let mut manager = manager();
        let f = frame(&mut manager, 100, 100);
        let (count, listener) = counter();
        let mut button = Button::new("ok");
        button.on_left_click(listener);
        let button = manager.tree_mut().insert(button);
        Frame::set_main_panel(manager.tree_mut(), f, button).unwrap();
        manager.tree_mut().validate_layout(f);

        let position = manager.tree().screen_position(button);
        manager.check_mouse_click(MouseButton::Left, position.x + 5, position.y + 5);
        assert!(manager.tree().widget::<Button>(button).unwrap().is_pressed());
        assert_eq!(*count.lock(), 0);

        manager.on_release(MouseButton::Left);
        assert_eq!(*count.lock(), 1);

        // a release without a click does nothing
        manager.on_release(MouseButton::Left);
        assert_eq!(*count.lock(), 1);
    }

    #[test]
    fn test_title_bar_drag_moves_frame() {
        let mut manager = manager();
        let f = frame(&mut manager, 100, 100);
        manager.tree_mut().validate_layout(f);

        manager.check_mouse_click(MouseButton::Left, 110, 110);
        manager.on_mouse_move(15, 5, 125., 115.);
        manager.on_release(MouseButton::Left);
        manager.on_mouse_move(15, 5, 140., 120.);
        assert_eq!(manager.tree().position(f), Point2::new(115, 105));
    }

    #[test]
    fn test_panicking_handler_is_isolated() {
        let mut manager = manager();
        let capture = manager
            .tree_mut()
            .insert(Capture::new().on_click(|_, _, _| panic!("handler failure")));
        let filler = manager.tree_mut().insert(Filler::new(10, 10));
        manager.tree_mut().add_child(capture, filler).unwrap();
        manager.set_main_gui(capture).unwrap();

        assert!(manager.check_mouse_click(MouseButton::Left, 5, 5));
        assert!(manager.tree().widget::<Capture>(capture).is_some());
        assert!(manager.check_mouse_click(MouseButton::Left, 5, 5));
    }

    #[test]
    fn test_text_input_routing() {
        let mut manager = manager();
        let f = frame(&mut manager, 0, 0);
        let submitted = Arc::new(Mutex::new(Vec::new()));
        let mut input = TextInput::new("", 100, 30);
        {
            let submitted = Arc::clone(&submitted);
            input.on_submit(Listener::new(move |text: String| submitted.lock().push(text)));
        }
        let input = manager.tree_mut().insert(input);
        Frame::set_main_panel(manager.tree_mut(), f, input).unwrap();
        manager.tree_mut().validate_layout(f);

        manager.key_typed('x');
        assert_eq!(manager.tree().widget::<TextInput>(input).unwrap().text(), "");

        let position = manager.tree().screen_position(input);
        manager.check_mouse_click(MouseButton::Left, position.x + 1, position.y + 1);
        assert_eq!(manager.text_listener(), Some(input));
        assert!(manager.tree().widget::<TextInput>(input).unwrap().is_focused());

        for ch in "abc".chars() {
            manager.key_typed(ch);
        }
        manager.key_pressed(KeyCode::Backspace);
        manager.key_pressed(KeyCode::Return);
        assert_eq!(*submitted.lock(), vec!["ab".to_string()]);

        // clicking elsewhere drops the text focus
        manager.check_mouse_click(MouseButton::Left, 1000, 700);
        assert_eq!(manager.text_listener(), None);
        assert!(!manager.tree().widget::<TextInput>(input).unwrap().is_focused());
    }

    #[test]
    fn test_dropdown_selection_through_modal() {
        let mut manager = manager();
        let f = frame(&mut manager, 0, 0);
        let values = vec!["red".to_string(), "green".to_string(), "blue".to_string()];
        let dropdown = DropDown::create(manager.tree_mut(), values, 0);
        Frame::set_main_panel(manager.tree_mut(), f, dropdown).unwrap();
        manager.tree_mut().validate_layout(f);

        let head = manager.tree().screen_position(dropdown);
        manager.check_mouse_click(MouseButton::Left, head.x + 1, head.y + 1);
        let options = manager.tree().widget::<DropDown>(dropdown).unwrap().options();
        assert_eq!(manager.modal(), Some(options));
        assert!(manager.tree().is_visible(options));

        manager.tree_mut().validate_layout(options);
        let third = manager.tree().children(options)[2];
        let position = manager.tree().screen_position(third);
        manager.check_mouse_click(MouseButton::Left, position.x + 1, position.y + 1);

        let widget = manager.tree().widget::<DropDown>(dropdown).unwrap();
        assert_eq!(widget.selected(), Some("blue"));
        assert_eq!(manager.modal(), None);
        assert!(!manager.tree().is_visible(options));
    }

    #[test]
    fn test_dispose_with_open_dropdown() {
        let mut manager = manager();
        let f = frame(&mut manager, 0, 0);
        let values = vec!["red".to_string(), "green".to_string()];
        let dropdown = DropDown::create(manager.tree_mut(), values, 0);
        Frame::set_main_panel(manager.tree_mut(), f, dropdown).unwrap();
        manager.tree_mut().validate_layout(f);

        let head = manager.tree().screen_position(dropdown);
        manager.check_mouse_click(MouseButton::Left, head.x + 1, head.y + 1);
        let options = manager.tree().widget::<DropDown>(dropdown).unwrap().options();
        assert_eq!(manager.modal(), Some(options));

        manager.dispose(f).unwrap();
        assert!(!manager.tree().exists(options));
        assert_eq!(manager.modal(), None);
        // only the root panel is left
        assert_eq!(manager.tree().len(), 1);

        let mut recorder = Recorder::new(Fonts::default());
        manager.draw(&mut recorder);
        assert!(recorder.texts().is_empty());
        assert!(!manager.check_mouse_click(MouseButton::Left, head.x + 1, head.y + 30));
    }

    #[test]
    fn test_draw_order() {
        let mut manager = manager();
        let back = Frame::create(manager.tree_mut(), "back", 100, 100);
        let front = Frame::create(manager.tree_mut(), "front", 100, 100);
        manager.add_frame(back, 0, 0).unwrap();
        manager.add_frame(front, 50, 50).unwrap();

        let mut recorder = Recorder::new(Fonts::default());
        manager.draw(&mut recorder);
        recorder.take();
        manager.draw(&mut recorder);
        assert_eq!(recorder.texts(), vec!["back", "X", "front", "X"]);
    }

    #[test]
    fn test_dispose_is_lazy_until_draw() {
        let mut manager = manager();
        let a = frame(&mut manager, 0, 0);
        Frame::dispose(manager.tree_mut(), a).unwrap();
        assert_eq!(manager.frames().count(), 1);

        let mut recorder = Recorder::new(Fonts::default());
        manager.draw(&mut recorder);
        assert_eq!(manager.frames().count(), 0);
        assert!(!manager.tree().exists(a));
        assert_eq!(manager.focus(a), Err(UiError::FrameDisposed(a)));
    }

    #[test]
    fn test_add_element_wraps_in_frame() {
        let mut manager = manager();
        let button = manager.tree_mut().insert(Button::new("wrapped"));
        let frame = manager.add_element(button).unwrap();
        assert_eq!(manager.tree().root(button), frame);
        assert_eq!(manager.frames().collect::<Vec<_>>(), vec![frame]);
        assert_eq!(manager.tree().position(frame), Point2::new(50, 200));

        let other = manager.tree_mut().insert(Button::new("second"));
        let second = manager.add_element(other).unwrap();
        let bounds = manager.tree().bounds(frame);
        assert_eq!(manager.tree().position(second).x, bounds.origin.x + bounds.width());

        assert!(manager.remove_element(button));
        assert!(manager.is_disposed(frame));
        let loose = manager.tree_mut().insert(Filler::default());
        assert!(!manager.remove_element(loose));
    }

    #[test]
    fn test_covers() {
        let mut manager = manager();
        frame(&mut manager, 100, 100);
        assert!(manager.covers(150, 150));
        assert!(!manager.covers(10, 10));
    }

    #[test]
    fn test_clear() {
        let mut manager = manager();
        let a = frame(&mut manager, 0, 0);
        let old_main = manager.main_panel();
        manager.clear();
        assert_eq!(manager.frames().count(), 0);
        assert!(!manager.tree().exists(a));
        assert!(!manager.is_disposed(a));
        assert_eq!(manager.add_frame(a, 0, 0), Err(UiError::UnknownWidget(a)));
        assert_ne!(manager.main_panel(), old_main);
        assert_eq!(manager.tree().size(manager.main_panel()), Vector2::new(1200, 800));
    }
}
