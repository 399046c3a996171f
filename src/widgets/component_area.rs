use crate::error::UiError;
use crate::impl_any;
use crate::layout::Single;
use crate::tree::WidgetTree;
use crate::widget::{DrawCx, Growth, LayoutCx, Widget, WidgetId};
use cgmath::Vector2;

/// A fixed-size area that shows at most one component at a time.
#[derive(Debug)]
pub struct ComponentArea {
    size: Vector2<i32>,
}

impl ComponentArea {
    pub fn new(width: i32, height: i32) -> ComponentArea {
        ComponentArea {
            size: Vector2::new(width, height),
        }
    }

    /// Shows `component` in the area, replacing whatever was shown before.
    ///
    /// The previous component is detached but stays in the tree. Fails if the component's
    /// minimum size doesn't fit in the area.
    pub fn show(tree: &mut WidgetTree, area: WidgetId, component: WidgetId) -> Result<(), UiError> {
        let available = tree
            .widget::<ComponentArea>(area)
            .ok_or(UiError::WrongWidgetType(area))?
            .size;
        if !tree.exists(component) {
            return Err(UiError::UnknownWidget(component));
        }
        let min = tree.min_size(component);
        if min.x > available.x || min.y > available.y {
            return Err(UiError::ElementTooLarge { min, available });
        }

        tree.clear_children(area);
        tree.add_child(area, component)?;
        tree.set_visible(component, true);
        Ok(())
    }

    /// Removes the shown component, if any.
    pub fn hide(tree: &mut WidgetTree, area: WidgetId) {
        tree.clear_children(area);
    }

    /// The component currently shown.
    pub fn shown(tree: &WidgetTree, area: WidgetId) -> Option<WidgetId> {
        tree.children(area).first().copied()
    }
}

impl Widget for ComponentArea {
    impl_any!();

    fn min_size(&self, _: &WidgetTree, _: WidgetId) -> Vector2<i32> {
        self.size
    }

    fn default_growth(&self) -> Growth {
        Growth::NONE
    }

    fn layout(&mut self, cx: &mut LayoutCx) {
        let children = cx.children();
        let bounds = cx.bounds();
        cx.apply(&Single, bounds, &children);
    }

    fn draw(&mut self, _: &mut DrawCx) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::Filler;

    #[test]
    fn test_show_too_large() {
        let mut tree = WidgetTree::new();
        let area = tree.insert(ComponentArea::new(100, 50));
        let small = tree.insert(Filler::new(80, 50));
        let large = tree.insert(Filler::new(120, 10));

        ComponentArea::show(&mut tree, area, small).unwrap();
        assert_eq!(ComponentArea::shown(&tree, area), Some(small));

        assert_eq!(
            ComponentArea::show(&mut tree, area, large),
            Err(UiError::ElementTooLarge {
                min: Vector2::new(120, 10),
                available: Vector2::new(100, 50),
            })
        );
        assert_eq!(ComponentArea::shown(&tree, area), Some(small));

        tree.validate_layout(area);
        assert_eq!(tree.size(small), Vector2::new(100, 50));
        assert_eq!(tree.size(area), Vector2::new(100, 50));

        ComponentArea::hide(&mut tree, area);
        assert_eq!(ComponentArea::shown(&tree, area), None);
    }
}
