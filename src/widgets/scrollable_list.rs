use crate::error::UiError;
use crate::impl_any;
use crate::layout::{Layout, LimitedVisibility};
use crate::rect::Rect;
use crate::tree::WidgetTree;
use crate::widget::{Capabilities, Capability, DrawCx, EventCx, LayoutCx, Widget, WidgetId};
use crate::widgets::ScrollBar;
use cgmath::Vector2;

/// A vertical list that shows a fixed number of its items, with a scrollbar on the right.
///
/// The scrollbar is the list's last child; every other child is an item.
#[derive(Debug)]
pub struct ScrollableList {
    layout: LimitedVisibility,
    scrollbar: WidgetId,
}

impl ScrollableList {
    /// Creates a list showing `shown` of the given items at once.
    pub fn create(tree: &mut WidgetTree, shown: usize, items: &[WidgetId]) -> Result<WidgetId, UiError> {
        let scrollbar = ScrollBar::create(tree, items.len(), shown);
        let list = tree.insert(ScrollableList {
            layout: LimitedVisibility::new(shown),
            scrollbar,
        });
        tree.add_children(list, items)?;
        tree.add_child(list, scrollbar)?;
        Ok(list)
    }

    pub fn scrollbar(&self) -> WidgetId {
        self.scrollbar
    }

    /// The items of a list, in order.
    pub fn items(tree: &WidgetTree, list: WidgetId) -> Vec<WidgetId> {
        let scrollbar = tree.widget::<ScrollableList>(list).map(|l| l.scrollbar);
        tree.children(list)
            .iter()
            .copied()
            .filter(|c| Some(*c) != scrollbar)
            .collect()
    }

    /// Appends an item.
    pub fn add_item(tree: &mut WidgetTree, list: WidgetId, item: WidgetId) -> Result<(), UiError> {
        let (scrollbar, shown) = Self::parts(tree, list)?;
        tree.add_child(list, item)?;
        // keep the scrollbar last
        tree.add_child(list, scrollbar)?;
        Self::resize_scrollbar(tree, list, scrollbar, shown)
    }

    /// Removes an item; returns false if it wasn't in the list.
    pub fn remove_item(tree: &mut WidgetTree, list: WidgetId, item: WidgetId) -> Result<bool, UiError> {
        let (scrollbar, shown) = Self::parts(tree, list)?;
        if item == scrollbar || !tree.remove_child(list, item) {
            return Ok(false);
        }
        Self::resize_scrollbar(tree, list, scrollbar, shown)?;
        Ok(true)
    }

    fn parts(tree: &WidgetTree, list: WidgetId) -> Result<(WidgetId, usize), UiError> {
        let list = tree
            .widget::<ScrollableList>(list)
            .ok_or(UiError::WrongWidgetType(list))?;
        Ok((list.scrollbar, list.layout.shown))
    }

    fn resize_scrollbar(
        tree: &mut WidgetTree,
        list: WidgetId,
        scrollbar: WidgetId,
        shown: usize,
    ) -> Result<(), UiError> {
        let total = Self::items(tree, list).len();
        tree.update::<ScrollBar, _>(scrollbar, |bar| bar.resize(total, shown))
    }

    fn scrollbar_width(&self, tree: &WidgetTree) -> i32 {
        tree.min_size(self.scrollbar).x
    }
}

impl Widget for ScrollableList {
    impl_any!();

    fn min_size(&self, tree: &WidgetTree, id: WidgetId) -> Vector2<i32> {
        let items: Vec<_> = Self::items(tree, id).iter().map(|c| tree.child_info(*c)).collect();
        let content = self.layout.min_size(&items);
        let scrollbar = tree.min_size(self.scrollbar);
        Vector2::new(content.x + scrollbar.x, content.y.max(scrollbar.y))
    }

    fn layout(&mut self, cx: &mut LayoutCx) {
        let size = cx.size();
        let bar_width = self.scrollbar_width(cx.tree());
        if let Some(bar) = cx.tree().widget::<ScrollBar>(self.scrollbar) {
            self.layout.first = bar.index();
        }

        let items: Vec<_> = cx.children().into_iter().filter(|c| *c != self.scrollbar).collect();
        let content = Rect::from_xywh(0, 0, size.x - bar_width, size.y);
        cx.apply(&self.layout, content, &items);
        cx.place(self.scrollbar, Rect::from_xywh(size.x - bar_width, 0, bar_width, size.y));
    }

    fn draw(&mut self, _: &mut DrawCx) {}

    fn capabilities(&self) -> Capabilities {
        Capability::Scroll.into()
    }

    fn on_scroll(&mut self, cx: &mut EventCx, delta: f32) {
        let _ = cx
            .tree()
            .update::<ScrollBar, _>(self.scrollbar, |bar| bar.scroll(delta));
    }
}
