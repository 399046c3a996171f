use crate::events::{notify, Listener, MouseButton};
use crate::impl_any;
use crate::look_and_feel::{Alignment, Element, TextType};
use crate::rect::Rect;
use crate::tree::WidgetTree;
use crate::widget::{Capabilities, Capability, DrawCx, EventCx, Growth, LayoutCx, Widget, WidgetId};
use cgmath::{Point2, Vector2};

pub const SCROLL_BAR_WIDTH: i32 = 30;
pub const SCROLL_BUTTON_SIZE: i32 = 30;
pub const DRAG_BAR_MIN_SIZE: i32 = 15;

/// Drag bar geometry of a vertical scrollbar.
///
/// The track is the space between the two step buttons. The drag bar's length is the shown
/// fraction of the track (but at least [`DRAG_BAR_MIN_SIZE`]), and its offset is interpolated
/// between the two ends of the track by the index fraction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Track {
    /// Height of the whole scrollbar.
    pub height: i32,
    pub total: usize,
    pub shown: usize,
}

impl Track {
    /// The highest index.
    pub fn max_index(&self) -> usize {
        self.total.saturating_sub(self.shown)
    }

    /// The space between the step buttons.
    pub fn space(&self) -> i32 {
        (self.height - 2 * SCROLL_BUTTON_SIZE).max(0)
    }

    pub fn bar_size_fraction(&self) -> f32 {
        match self.total {
            0 => 1.,
            total => self.shown as f32 / total as f32,
        }
    }

    /// The length of the drag bar; never longer than the track.
    pub fn bar_length(&self) -> i32 {
        let space = self.space();
        let length = ((space as f32 * self.bar_size_fraction().min(1.)) as i32).max(DRAG_BAR_MIN_SIZE);
        length.min(space)
    }

    /// How far the drag bar can move.
    pub fn travel(&self) -> i32 {
        self.space() - self.bar_length()
    }

    /// The fraction corresponding to an index.
    pub fn fraction_of(&self, index: usize) -> f32 {
        match self.max_index() {
            0 => 0.,
            max => index.min(max) as f32 / max as f32,
        }
    }

    /// The nearest index for a fraction.
    pub fn index_at(&self, fraction: f32) -> usize {
        (fraction.max(0.).min(1.) * self.max_index() as f32).round() as usize
    }

    /// The y offset of the drag bar for a fraction.
    pub fn offset_for(&self, fraction: f32) -> i32 {
        SCROLL_BUTTON_SIZE + (self.travel() as f32 * fraction.max(0.).min(1.)) as i32
    }

    /// The fraction for a drag bar y offset.
    pub fn fraction_at(&self, offset: i32) -> f32 {
        match self.travel() {
            travel if travel > 0 => ((offset - SCROLL_BUTTON_SIZE) as f32 / travel as f32).max(0.).min(1.),
            _ => 0.,
        }
    }
}

/// Parts of a scrollbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartKind {
    Up,
    Down,
    Bar,
}

/// A step button or the drag bar of a [`ScrollBar`].
///
/// Parts only draw; all input goes to the scrollbar itself.
#[derive(Debug)]
pub struct ScrollPart {
    kind: PartKind,
    pressed: bool,
}

impl Widget for ScrollPart {
    impl_any!();

    fn min_size(&self, _: &WidgetTree, _: WidgetId) -> Vector2<i32> {
        match self.kind {
            PartKind::Up | PartKind::Down => Vector2::new(SCROLL_BAR_WIDTH, SCROLL_BUTTON_SIZE),
            PartKind::Bar => Vector2::new(SCROLL_BAR_WIDTH, DRAG_BAR_MIN_SIZE),
        }
    }

    fn draw(&mut self, cx: &mut DrawCx) {
        let text = match self.kind {
            PartKind::Bar => {
                cx.draw(Element::ScrollBarDragElement);
                return;
            }
            PartKind::Up => "/\\",
            PartKind::Down => "\\/",
        };
        let element = if self.pressed {
            Element::ButtonPressed
        } else if cx.is_hovered() {
            Element::ButtonHovered
        } else {
            Element::ButtonActive
        };
        cx.draw(element);
        cx.draw_text(text, TextType::Regular, Alignment::CenterMiddle);
    }
}

/// A vertical scrollbar with a step button at either end and a drag bar in between.
///
/// The index runs from 0 to `total - shown`. Listeners are notified whenever it changes, be it
/// through the step buttons, dragging the bar or scroll input.
///
/// Scroll input is accumulated; every whole unit moves the index by one step (positive is up,
/// towards index 0), and the remainder is kept for the next input.
#[derive(Debug)]
pub struct ScrollBar {
    total: usize,
    shown: usize,
    index: usize,
    /// Current drag bar position; follows the cursor while dragging.
    bar_fraction: f32,
    scroll_acc: f32,
    height: i32,
    pressed: Option<PartKind>,
    up: WidgetId,
    down: WidgetId,
    bar: WidgetId,
    listeners: Vec<Listener<usize>>,
}

impl ScrollBar {
    /// Creates a scrollbar over `total` elements of which `shown` fit at once.
    pub fn create(tree: &mut WidgetTree, total: usize, shown: usize) -> WidgetId {
        let mut part = |kind| tree.insert(ScrollPart { kind, pressed: false });
        let up = part(PartKind::Up);
        let down = part(PartKind::Down);
        let bar = part(PartKind::Bar);

        let scrollbar = tree.insert(ScrollBar {
            total,
            shown,
            index: 0,
            bar_fraction: 0.,
            scroll_acc: 0.,
            height: 0,
            pressed: None,
            up,
            down,
            bar,
            listeners: Vec::new(),
        });
        for part in [up, bar, down] {
            let _ = tree.add_child(scrollbar, part);
        }
        scrollbar
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn track(&self) -> Track {
        Track {
            height: self.height,
            total: self.total,
            shown: self.shown,
        }
    }

    /// The accumulated scroll input that hasn't produced a step yet.
    pub fn scroll_remainder(&self) -> f32 {
        self.scroll_acc
    }

    /// The drag bar's current offset fraction.
    pub fn bar_fraction(&self) -> f32 {
        self.bar_fraction
    }

    pub fn add_listener(&mut self, listener: Listener<usize>) {
        self.listeners.push(listener);
    }

    /// Sets the index, clamped to the valid range, and aligns the drag bar with it.
    pub fn set_index(&mut self, index: usize) {
        self.change_index(index);
        self.align();
    }

    fn change_index(&mut self, index: usize) {
        let index = index.min(self.track().max_index());
        if index != self.index {
            self.index = index;
            notify(&self.listeners, index);
        }
    }

    fn align(&mut self) {
        self.bar_fraction = self.track().fraction_of(self.index);
    }

    /// Moves one step towards index 0.
    pub fn up(&mut self) {
        self.set_index(self.index.saturating_sub(1));
    }

    /// Moves one step away from index 0.
    pub fn down(&mut self) {
        self.set_index(self.index + 1);
    }

    pub fn scroll(&mut self, delta: f32) {
        self.scroll_acc += delta;
        while self.scroll_acc >= 1. {
            self.up();
            self.scroll_acc -= 1.;
        }
        while self.scroll_acc <= -1. {
            self.down();
            self.scroll_acc += 1.;
        }
    }

    /// Moves the drag bar by `dy` pixels and picks the nearest index.
    pub fn drag_by(&mut self, dy: i32) {
        let track = self.track();
        if track.travel() <= 0 {
            return;
        }
        self.bar_fraction = (self.bar_fraction + dy as f32 / track.travel() as f32).max(0.).min(1.);
        self.change_index(track.index_at(self.bar_fraction));
    }

    /// Changes the number of elements.
    pub fn resize(&mut self, total: usize, shown: usize) {
        self.total = total;
        self.shown = shown;
        self.change_index(self.index);
        self.align();
    }

    fn set_pressed(&mut self, tree: &mut WidgetTree, pressed: Option<PartKind>) {
        self.pressed = pressed;
        for (part, kind) in [(self.up, PartKind::Up), (self.down, PartKind::Down)] {
            if let Some(part) = tree.widget_mut::<ScrollPart>(part) {
                part.pressed = pressed == Some(kind);
            }
        }
    }
}

impl Widget for ScrollBar {
    impl_any!();

    fn min_size(&self, _: &WidgetTree, _: WidgetId) -> Vector2<i32> {
        Vector2::new(SCROLL_BAR_WIDTH, 2 * SCROLL_BUTTON_SIZE + DRAG_BAR_MIN_SIZE)
    }

    fn default_growth(&self) -> Growth {
        Growth::VERTICAL
    }

    fn layout(&mut self, cx: &mut LayoutCx) {
        let size = cx.size();
        self.height = size.y;
        let track = self.track();

        let button = Vector2::new(SCROLL_BAR_WIDTH, SCROLL_BUTTON_SIZE);
        cx.place(self.up, Rect::new(Point2::new(0, 0), button));
        cx.place(self.down, Rect::new(Point2::new(0, size.y - SCROLL_BUTTON_SIZE), button));

        let bar = self.bar;
        if track.space() > 0 {
            let rect = Rect::from_xywh(
                0,
                track.offset_for(self.bar_fraction),
                SCROLL_BAR_WIDTH,
                track.bar_length(),
            );
            cx.tree().set_visible_flag(bar, true);
            cx.place(bar, rect);
        } else {
            cx.tree().set_visible_flag(bar, false);
            cx.tree().validate_layout(bar);
        }
    }

    fn draw(&mut self, cx: &mut DrawCx) {
        let track = self.track();
        let position = cx.position() + Vector2::new(0, SCROLL_BUTTON_SIZE);
        cx.draw_at(
            Element::ScrollBarBackground,
            position,
            Vector2::new(SCROLL_BAR_WIDTH, track.space()),
        );
    }

    fn capabilities(&self) -> Capabilities {
        Capability::Click | Capability::Release | Capability::Drag | Capability::Scroll
    }

    fn on_click(&mut self, cx: &mut EventCx, _: MouseButton, _: Point2<i32>) {
        let target = cx.target();
        let pressed = [
            (self.up, PartKind::Up),
            (self.down, PartKind::Down),
            (self.bar, PartKind::Bar),
        ]
        .iter()
        .find(|(part, _)| *part == target)
        .map(|(_, kind)| *kind);
        self.set_pressed(cx.tree(), pressed);
    }

    fn on_release(&mut self, cx: &mut EventCx, _: MouseButton) {
        match self.pressed {
            Some(PartKind::Up) => self.up(),
            Some(PartKind::Down) => self.down(),
            Some(PartKind::Bar) => self.align(),
            None => return,
        }
        self.set_pressed(cx.tree(), None);
        cx.invalidate_layout();
    }

    fn on_drag(&mut self, cx: &mut EventCx, delta: Vector2<i32>, _: Point2<f32>) {
        if self.pressed == Some(PartKind::Bar) {
            self.drag_by(delta.y);
            cx.invalidate_layout();
        }
    }

    fn on_scroll(&mut self, cx: &mut EventCx, delta: f32) {
        let index = self.index;
        self.scroll(delta);
        if index != self.index {
            cx.invalidate_layout();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    fn scrollbar(total: usize, shown: usize) -> (WidgetTree, WidgetId) {
        let mut tree = WidgetTree::new();
        let id = ScrollBar::create(&mut tree, total, shown);
        tree.set_size(id, SCROLL_BAR_WIDTH, 300);
        tree.validate_layout(id);
        (tree, id)
    }

    #[test]
    fn test_track_geometry() {
        let track = Track {
            height: 300,
            total: 10,
            shown: 3,
        };
        assert_eq!(track.max_index(), 7);
        assert_eq!(track.space(), 240);
        assert_eq!(track.bar_length(), 72);
        assert_eq!(track.travel(), 168);
        assert_eq!(track.offset_for(0.), SCROLL_BUTTON_SIZE);
        assert_eq!(track.offset_for(1.), SCROLL_BUTTON_SIZE + 168);

        let short = Track {
            height: 70,
            total: 100,
            shown: 1,
        };
        assert_eq!(short.bar_length(), 10);
        assert_eq!(short.travel(), 0);
        assert_eq!(short.fraction_at(40), 0.);
    }

    #[test]
    fn test_index_clamped() {
        let (mut tree, id) = scrollbar(10, 3);
        let bar = tree.widget_mut::<ScrollBar>(id).unwrap();
        bar.set_index(100);
        assert_eq!(bar.index(), 7);
        bar.up();
        assert_eq!(bar.index(), 6);
        bar.set_index(0);
        bar.up();
        assert_eq!(bar.index(), 0);
    }

    #[test]
    fn test_listeners_only_on_change() {
        let (mut tree, id) = scrollbar(10, 3);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let bar = tree.widget_mut::<ScrollBar>(id).unwrap();
        {
            let seen = Arc::clone(&seen);
            bar.add_listener(Listener::new(move |i| seen.lock().push(i)));
        }
        bar.up();
        bar.down();
        bar.down();
        bar.set_index(2);
        assert_eq!(*seen.lock(), vec![1, 2]);
    }

    #[test]
    fn test_scroll_direction_and_remainder() {
        let (mut tree, id) = scrollbar(10, 3);
        let bar = tree.widget_mut::<ScrollBar>(id).unwrap();
        bar.scroll(-2.5);
        assert_eq!(bar.index(), 2);
        assert!((bar.scroll_remainder() + 0.5).abs() < 1e-6);
        bar.scroll(1.7);
        assert_eq!(bar.index(), 1);
        assert!((bar.scroll_remainder() - 0.2).abs() < 1e-5);
    }

    #[test]
    fn test_drag_rounds_to_nearest() {
        let (mut tree, id) = scrollbar(10, 3);
        let bar = tree.widget_mut::<ScrollBar>(id).unwrap();
        // 168px of travel over 7 steps: 24px per step
        bar.drag_by(11);
        assert_eq!(bar.index(), 0);
        bar.drag_by(2);
        assert_eq!(bar.index(), 1);
        bar.drag_by(1000);
        assert_eq!(bar.index(), 7);
        assert_eq!(bar.bar_fraction(), 1.);
    }

    #[test]
    fn test_parts_are_placed() {
        let (mut tree, id) = scrollbar(10, 3);
        tree.widget_mut::<ScrollBar>(id).unwrap().set_index(7);
        tree.invalidate_layout(id);
        tree.validate_layout(id);

        let children = tree.children(id).to_vec();
        assert_eq!(tree.position(children[0]), Point2::new(0, 0));
        assert_eq!(tree.position(children[1]), Point2::new(0, SCROLL_BUTTON_SIZE + 168));
        assert_eq!(tree.size(children[1]), Vector2::new(SCROLL_BAR_WIDTH, 72));
        assert_eq!(tree.position(children[2]), Point2::new(0, 300 - SCROLL_BUTTON_SIZE));
    }
}
