use crate::events::MouseButton;
use crate::impl_any;
use crate::layout::{Layout, Single};
use crate::tree::WidgetTree;
use crate::widget::{Capabilities, Capability, DrawCx, EventCx, LayoutCx, Widget, WidgetId};
use cgmath::{Point2, Vector2};
use core::fmt;

type ClickHandler = Box<dyn FnMut(&mut EventCx, MouseButton, Point2<i32>)>;
type ReleaseHandler = Box<dyn FnMut(&mut EventCx, MouseButton)>;
type DragHandler = Box<dyn FnMut(&mut EventCx, Vector2<i32>, Point2<f32>)>;
type ScrollHandler = Box<dyn FnMut(&mut EventCx, f32)>;

/// An invisible wrapper that handles input for everything inside it.
///
/// A capture fills itself with its children and draws nothing. It only declares the capabilities
/// for which a handler was supplied, so input it doesn't handle keeps walking up the tree.
///
/// ```ignore
/// let title = tree.insert(TextArea::new("Title", TextType::Title, Alignment::CenterTop));
/// let handle = tree.insert(Capture::new().on_drag(move |cx, delta, _| {
///     cx.tree().add_to_position(frame, delta);
/// }));
/// tree.add_child(handle, title)?;
/// ```
#[derive(Default)]
pub struct Capture {
    click: Option<ClickHandler>,
    release: Option<ReleaseHandler>,
    drag: Option<DragHandler>,
    scroll: Option<ScrollHandler>,
}

impl Capture {
    pub fn new() -> Capture {
        Capture::default()
    }

    pub fn on_click<F>(mut self, handler: F) -> Capture
    where
        F: 'static + FnMut(&mut EventCx, MouseButton, Point2<i32>),
    {
        self.click = Some(Box::new(handler));
        self
    }

    pub fn on_release<F>(mut self, handler: F) -> Capture
    where
        F: 'static + FnMut(&mut EventCx, MouseButton),
    {
        self.release = Some(Box::new(handler));
        self
    }

    pub fn on_drag<F>(mut self, handler: F) -> Capture
    where
        F: 'static + FnMut(&mut EventCx, Vector2<i32>, Point2<f32>),
    {
        self.drag = Some(Box::new(handler));
        self
    }

    pub fn on_scroll<F>(mut self, handler: F) -> Capture
    where
        F: 'static + FnMut(&mut EventCx, f32),
    {
        self.scroll = Some(Box::new(handler));
        self
    }
}

impl fmt::Debug for Capture {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Capture({:?})", self.capabilities())
    }
}

impl Widget for Capture {
    impl_any!();

    fn min_size(&self, tree: &WidgetTree, id: WidgetId) -> Vector2<i32> {
        Single.min_size(&tree.child_infos(id))
    }

    fn layout(&mut self, cx: &mut LayoutCx) {
        let children = cx.children();
        let bounds = cx.bounds();
        cx.apply(&Single, bounds, &children);
    }

    fn draw(&mut self, _: &mut DrawCx) {}

    fn capabilities(&self) -> Capabilities {
        let mut caps = Capabilities::NONE;
        if self.click.is_some() {
            caps = caps | Capability::Click;
        }
        if self.release.is_some() {
            caps = caps | Capability::Release;
        }
        if self.drag.is_some() {
            caps = caps | Capability::Drag;
        }
        if self.scroll.is_some() {
            caps = caps | Capability::Scroll;
        }
        caps
    }

    fn on_click(&mut self, cx: &mut EventCx, button: MouseButton, position: Point2<i32>) {
        if let Some(handler) = &mut self.click {
            handler(cx, button, position);
        }
    }

    fn on_release(&mut self, cx: &mut EventCx, button: MouseButton) {
        if let Some(handler) = &mut self.release {
            handler(cx, button);
        }
    }

    fn on_drag(&mut self, cx: &mut EventCx, delta: Vector2<i32>, cursor: Point2<f32>) {
        if let Some(handler) = &mut self.drag {
            handler(cx, delta, cursor);
        }
    }

    fn on_scroll(&mut self, cx: &mut EventCx, delta: f32) {
        if let Some(handler) = &mut self.scroll {
            handler(cx, delta);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::manager::FrameManager;
    use crate::widgets::Filler;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_handlers_by_capability() {
        let mut manager = FrameManager::new(&Settings::default());
        let log = Rc::new(RefCell::new(Vec::new()));
        let outer = {
            let (release_log, scroll_log) = (Rc::clone(&log), Rc::clone(&log));
            Capture::new()
                .on_release(move |_, button| {
                    release_log.borrow_mut().push(format!("release {:?}", button))
                })
                .on_scroll(move |_, delta| scroll_log.borrow_mut().push(format!("scroll {}", delta)))
        };
        let inner = {
            let log = Rc::clone(&log);
            Capture::new().on_click(move |_, _, position| {
                log.borrow_mut().push(format!("click {} {}", position.x, position.y))
            })
        };
        assert_eq!(inner.capabilities(), Capabilities::from(Capability::Click));
        assert_eq!(outer.capabilities(), Capability::Release | Capability::Scroll);

        let tree = manager.tree_mut();
        let outer = tree.insert(outer);
        let inner = tree.insert(inner);
        let filler = tree.insert(Filler::new(10, 10));
        tree.add_child(inner, filler).unwrap();
        tree.add_child(outer, inner).unwrap();
        manager.set_main_gui(outer).unwrap();

        assert!(manager.check_mouse_click(MouseButton::Left, 12, 7));
        manager.on_mouse_move(3, 3, 15., 10.);
        manager.on_release(MouseButton::Left);
        assert_eq!(manager.hovered(), Some(filler));
        manager.on_scroll(-1.5);

        assert_eq!(
            *log.borrow(),
            vec!["click 12 7", "release Left", "scroll -1.5"]
        );
    }

    #[test]
    fn test_empty_capture_passes_input_up() {
        let mut manager = FrameManager::new(&Settings::default());
        let clicks = Rc::new(RefCell::new(0));
        let outer = {
            let clicks = Rc::clone(&clicks);
            Capture::new().on_click(move |cx, _, _| {
                assert_ne!(cx.target(), cx.id());
                *clicks.borrow_mut() += 1;
            })
        };
        let tree = manager.tree_mut();
        let outer = tree.insert(outer);
        let inner = tree.insert(Capture::new());
        assert_eq!(tree.capabilities(inner), Capabilities::NONE);
        tree.add_child(outer, inner).unwrap();
        manager.set_main_gui(outer).unwrap();

        assert!(manager.check_mouse_click(MouseButton::Right, 40, 40));
        assert_eq!(*clicks.borrow(), 1);
    }
}
