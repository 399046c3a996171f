//! Frames.

use crate::error::UiError;
use crate::impl_any;
use crate::layout::{Grid, Layout, LayoutProperty};
use crate::look_and_feel::{Alignment, Element, TextType};
use crate::tree::WidgetTree;
use crate::widget::{DrawCx, Growth, LayoutCx, Widget, WidgetId};
use crate::widgets::{Capture, CloseAction, CloseButton, Filler, Panel, TextArea};
use cgmath::Vector2;
use core::fmt;
use tracing::debug;

pub const FRAME_TITLE_BAR_SIZE: i32 = 50;

/// A movable, closable window within the screen.
///
/// A frame is a root widget with two children in a one-column grid: the title bar and the body.
/// In a manipulable frame the title bar can be dragged to move the frame and has a close button.
///
/// Frames are usually handed to a [`FrameManager`](crate::FrameManager), which keeps them
/// ordered by focus. Disposing a frame is terminal.
pub struct Frame {
    title: WidgetId,
    body: WidgetId,
    close: Option<WidgetId>,
    disposed: bool,
    on_dispose: Option<Box<dyn FnOnce() + Send>>,
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Frame")
            .field("title", &self.title)
            .field("body", &self.body)
            .field("close", &self.close)
            .field("disposed", &self.disposed)
            .finish()
    }
}

impl Frame {
    /// Creates a movable, closable frame.
    pub fn create(tree: &mut WidgetTree, title: &str, width: i32, height: i32) -> WidgetId {
        Frame::create_with(tree, title, width, height, true)
    }

    /// Creates a frame; if `manipulable` is false, it has no close button and cannot be moved.
    pub fn create_with(
        tree: &mut WidgetTree,
        title: &str,
        width: i32,
        height: i32,
        manipulable: bool,
    ) -> WidgetId {
        let title_text = tree.insert(
            TextArea::new(title, TextType::Title, Alignment::CenterTop)
                .with_min_size(0, FRAME_TITLE_BAR_SIZE)
                .with_background(Element::FrameHeader),
        );
        let body = tree.insert(Panel::single());
        let filler = tree.insert(Filler::default());
        let _ = tree.add_child(body, filler);

        let frame = tree.insert(Frame {
            title: title_text,
            body,
            close: None,
            disposed: false,
            on_dispose: None,
        });

        let bar = if manipulable {
            let handle = tree.insert(Capture::new().on_drag(move |cx, delta, _| {
                cx.tree().add_to_position(frame, delta);
            }));
            let _ = tree.add_child(handle, title_text);
            let close = tree.insert(CloseButton::new(frame, FRAME_TITLE_BAR_SIZE));
            if let Some(widget) = tree.widget_mut::<Frame>(frame) {
                widget.close = Some(close);
            }

            let bar = tree.insert(Panel::row());
            let _ = tree.add_children(bar, &[handle, close]);
            bar
        } else {
            title_text
        };
        tree.set_growth(bar, Growth::HORIZONTAL);

        let _ = tree.add_child_with(frame, bar, LayoutProperty::Cell { col: 0, row: 0 });
        let _ = tree.add_child_with(frame, body, LayoutProperty::Cell { col: 0, row: 1 });
        tree.set_size(frame, width, height);
        frame
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// The panel holding the frame's main component.
    pub fn body(&self) -> WidgetId {
        self.body
    }

    /// The title bar's close button; `None` if the frame is not manipulable.
    pub fn close_button(&self) -> Option<WidgetId> {
        self.close
    }

    /// Sets a callback that runs once when the frame is disposed.
    pub fn on_dispose<F: 'static + FnOnce() + Send>(&mut self, callback: F) {
        self.on_dispose = Some(Box::new(callback));
    }

    pub fn set_title(tree: &mut WidgetTree, frame: WidgetId, title: &str) -> Result<(), UiError> {
        let title_text = Frame::get(tree, frame)?.title;
        tree.update::<TextArea, _>(title_text, |text| text.set_text(title))
    }

    /// Sets whether the close button hides the frame (the default) or disposes it.
    ///
    /// Frames without a close button are left unchanged.
    pub fn set_close_action(
        tree: &mut WidgetTree,
        frame: WidgetId,
        action: CloseAction,
    ) -> Result<(), UiError> {
        match Frame::get(tree, frame)?.close {
            Some(close) => tree.update::<CloseButton, _>(close, |button| button.set_action(action)),
            None => Ok(()),
        }
    }

    /// Replaces the frame's main component.
    pub fn set_main_panel(
        tree: &mut WidgetTree,
        frame: WidgetId,
        component: WidgetId,
    ) -> Result<(), UiError> {
        let body = Frame::get(tree, frame)?.body;
        for old in tree.children(body).to_vec() {
            tree.destroy(old);
        }
        tree.add_child(body, component)
    }

    /// Shrinks the frame to its minimum size.
    pub fn pack(tree: &mut WidgetTree, frame: WidgetId) {
        tree.pack(frame);
    }

    /// Hides the frame, marks it disposed and runs the dispose callback.
    ///
    /// Does nothing if the frame is already disposed.
    pub fn dispose(tree: &mut WidgetTree, frame: WidgetId) -> Result<(), UiError> {
        let widget = tree
            .widget_mut::<Frame>(frame)
            .ok_or(UiError::UnknownFrame(frame))?;
        if widget.disposed {
            return Ok(());
        }
        widget.disposed = true;
        let callback = widget.on_dispose.take();

        tree.set_visible(frame, false);
        debug!("disposed frame {:?}", frame);
        if let Some(callback) = callback {
            callback();
        }
        Ok(())
    }

    fn get(tree: &WidgetTree, frame: WidgetId) -> Result<&Frame, UiError> {
        match tree.widget::<Frame>(frame) {
            Some(widget) => Ok(widget),
            None if tree.exists(frame) => Err(UiError::WrongWidgetType(frame)),
            None => Err(UiError::UnknownWidget(frame)),
        }
    }
}

impl Widget for Frame {
    impl_any!();

    fn min_size(&self, tree: &WidgetTree, id: WidgetId) -> Vector2<i32> {
        Grid::new(1, 2).min_size(&tree.child_infos(id))
    }

    fn default_growth(&self) -> Growth {
        Growth::NONE
    }

    fn layout(&mut self, cx: &mut LayoutCx) {
        let children = cx.children();
        let bounds = cx.bounds();
        cx.apply(&Grid::new(1, 2), bounds, &children);
    }

    fn draw(&mut self, cx: &mut DrawCx) {
        cx.draw(Element::Panel);
    }
}
