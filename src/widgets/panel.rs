use crate::impl_any;
use crate::layout::{Column, Grid, Layout, Row, Single};
use crate::look_and_feel::Element;
use crate::tree::WidgetTree;
use crate::widget::{DrawCx, LayoutCx, Widget, WidgetId};
use cgmath::Vector2;

/// A container that lays out its children with a layout strategy.
#[derive(Debug)]
pub struct Panel {
    layout: Box<dyn Layout>,
    background: Option<Element>,
}

impl Panel {
    pub fn new<L: Layout + 'static>(layout: L) -> Panel {
        Panel {
            layout: Box::new(layout),
            background: None,
        }
    }

    /// A panel placing its children left to right.
    pub fn row() -> Panel {
        Panel::new(Row::default())
    }

    /// A panel placing its children top to bottom.
    pub fn column() -> Panel {
        Panel::new(Column::default())
    }

    pub fn grid(cols: usize, rows: usize) -> Panel {
        Panel::new(Grid::new(cols, rows))
    }

    /// A panel whose children fill it entirely.
    pub fn single() -> Panel {
        Panel::new(Single)
    }

    /// Draws the given element behind the children.
    pub fn with_background(mut self, element: Element) -> Panel {
        self.background = Some(element);
        self
    }

    pub fn set_layout<L: Layout + 'static>(&mut self, layout: L) {
        self.layout = Box::new(layout);
    }
}

impl Widget for Panel {
    impl_any!();

    fn min_size(&self, tree: &WidgetTree, id: WidgetId) -> Vector2<i32> {
        self.layout.min_size(&tree.child_infos(id))
    }

    fn layout(&mut self, cx: &mut LayoutCx) {
        let children = cx.children();
        let bounds = cx.bounds();
        cx.apply(&*self.layout, bounds, &children);
    }

    fn draw(&mut self, cx: &mut DrawCx) {
        if let Some(background) = self.background {
            cx.draw(background);
        }
    }
}
