//! A retained-mode widget toolkit for in-game menus.
//!
//! Widgets live in a [`WidgetTree`] and are addressed by [`WidgetId`]. A [`FrameManager`] owns the
//! tree, keeps a stack of [`Frame`]s over a root panel, and routes input; a [`Host`] queues raw
//! input from other threads and applies it to the manager. Drawing goes through a
//! [`LookAndFeel`](look_and_feel::LookAndFeel).

pub mod color;
pub mod config;
mod error;
pub mod events;
mod frame;
mod host;
pub mod layout;
pub mod look_and_feel;
mod manager;
mod rect;
mod tree;
mod widget;
pub mod widgets;

pub use config::Settings;
pub use error::UiError;
pub use frame::{Frame, FRAME_TITLE_BAR_SIZE};
pub use host::{EventSender, Host};
pub use manager::FrameManager;
pub use rect::Rect;
pub use tree::WidgetTree;
pub use widget::{
    Capabilities, Capability, DrawCx, EventCx, Growth, LayoutCx, Request, Widget, WidgetId,
};
