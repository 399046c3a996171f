//! Events.
//!
//! Raw input arrives from the windowing layer as [`RawEvent`] records. They are plain data so they
//! can be produced on any thread and sent to the UI thread; see [`crate::Host`].

use core::fmt;
use parking_lot::Mutex;
use std::sync::Arc;

/// A raw input event, as delivered by the windowing layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawEvent {
    KeyDown(KeyCode),
    KeyUp(KeyCode),
    /// A character was typed (after keyboard layout translation).
    CharTyped(char),
    /// A mouse button was pressed at the given screen position.
    MouseDown { button: MouseButton, x: i32, y: i32 },
    /// A mouse button was released.
    MouseUp { button: MouseButton },
    /// The cursor moved by `(dx, dy)` to `(x, y)`.
    MouseMove { dx: i32, dy: i32, x: f32, y: f32 },
    /// Scroll wheel input; positive values scroll up.
    Scroll { delta: f32 },
    /// The screen (window content area) was resized.
    Resize { width: i32, height: i32 },
}

/// Mouse buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other(u8),
}

/// Modifier key state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyModifiers {
    /// Whether any shift key is pressed.
    pub shift: bool,

    /// Whether any control key is pressed.
    pub control: bool,

    /// Whether any alt key or option key is pressed.
    pub alt: bool,
}

/// Tracks which modifier keys are currently held down.
///
/// Each modifier key only affects its own flag.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyControl {
    modifiers: KeyModifiers,
}

impl KeyControl {
    pub fn new() -> KeyControl {
        KeyControl::default()
    }

    pub fn key_pressed(&mut self, key: KeyCode) {
        self.set_key(key, true);
    }

    pub fn key_released(&mut self, key: KeyCode) {
        self.set_key(key, false);
    }

    fn set_key(&mut self, key: KeyCode, pressed: bool) {
        match key {
            KeyCode::Shift | KeyCode::RightShift => self.modifiers.shift = pressed,
            KeyCode::Control | KeyCode::RightControl => self.modifiers.control = pressed,
            KeyCode::Alt | KeyCode::RightAlt => self.modifiers.alt = pressed,
            _ => (),
        }
    }

    pub fn modifiers(&self) -> KeyModifiers {
        self.modifiers
    }

    pub fn is_shift_pressed(&self) -> bool {
        self.modifiers.shift
    }

    pub fn is_control_pressed(&self) -> bool {
        self.modifiers.control
    }

    pub fn is_alt_pressed(&self) -> bool {
        self.modifiers.alt
    }
}

/// A user-registered callback, shared so that widgets can be cloned into other callbacks.
pub struct Listener<T>(Arc<Mutex<dyn FnMut(T) + Send>>);

impl<T> Clone for Listener<T> {
    fn clone(&self) -> Self {
        Listener(Arc::clone(&self.0))
    }
}

impl<T> Listener<T> {
    pub fn new<F: 'static + FnMut(T) + Send>(handler: F) -> Self {
        Listener(Arc::new(Mutex::new(handler)))
    }

    /// Invokes the callback.
    pub fn call(&self, value: T) {
        (&mut *self.0.lock())(value)
    }
}

impl<T> fmt::Debug for Listener<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Listener<{}>", core::any::type_name::<T>())
    }
}

/// Notifies every listener in the list.
pub(crate) fn notify<T: Clone>(listeners: &[Listener<T>], value: T) {
    for listener in listeners {
        listener.call(value.clone());
    }
}

/// Physical keys, independent of the keyboard layout.
///
/// Text entry goes through [`RawEvent::CharTyped`]; key codes are for editing and navigation
/// keys, modifiers and shortcuts. Keys the toolkit never looks at can be reported as `Other`
/// with the backend's scan code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Letter(char),
    Digit(u8),
    Function(u8),

    Return,
    NumpadEnter,
    Tab,
    Space,
    Backspace,
    Delete,
    Escape,

    Shift,
    RightShift,
    Control,
    RightControl,
    Alt,
    RightAlt,
    Super,
    RightSuper,
    CapsLock,

    LeftArrow,
    RightArrow,
    UpArrow,
    DownArrow,
    Home,
    End,
    PageUp,
    PageDown,

    Other(u32),
}

#[test]
fn test_modifiers_are_independent() {
    let mut keys = KeyControl::new();
    keys.key_pressed(KeyCode::Shift);
    assert!(keys.is_shift_pressed());
    assert!(!keys.is_control_pressed(), "shift must not set control");
    assert!(!keys.is_alt_pressed(), "shift must not set alt");

    keys.key_pressed(KeyCode::RightControl);
    keys.key_released(KeyCode::Shift);
    assert_eq!(
        keys.modifiers(),
        KeyModifiers {
            shift: false,
            control: true,
            alt: false,
        }
    );
}

#[test]
fn test_listener_clones_share_state() {
    let count = Arc::new(Mutex::new(0));
    let listener = {
        let count = Arc::clone(&count);
        Listener::new(move |n: i32| *count.lock() += n)
    };
    let other = listener.clone();
    listener.call(2);
    other.call(3);
    assert_eq!(*count.lock(), 5);
}
