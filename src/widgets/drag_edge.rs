use crate::impl_any;
use crate::look_and_feel::{Alignment, Element, TextType};
use crate::tree::WidgetTree;
use crate::widget::{Capabilities, Capability, DrawCx, EventCx, Growth, Widget, WidgetId};
use cgmath::{Point2, Vector2};

/// A handle that resizes another widget (typically a frame) when dragged.
#[derive(Debug)]
pub struct DragEdge {
    target: WidgetId,
    size: Vector2<i32>,
}

impl DragEdge {
    pub fn new(target: WidgetId, width: i32, height: i32) -> DragEdge {
        DragEdge {
            target,
            size: Vector2::new(width, height),
        }
    }
}

impl Widget for DragEdge {
    impl_any!();

    fn min_size(&self, _: &WidgetTree, _: WidgetId) -> Vector2<i32> {
        self.size
    }

    fn default_growth(&self) -> Growth {
        Growth::NONE
    }

    fn draw(&mut self, cx: &mut DrawCx) {
        cx.draw(Element::ButtonActive);
        cx.draw_text("+", TextType::Regular, Alignment::LeftMiddle);
    }

    fn capabilities(&self) -> Capabilities {
        Capability::Drag.into()
    }

    fn on_drag(&mut self, cx: &mut EventCx, delta: Vector2<i32>, _: Point2<f32>) {
        cx.tree().add_to_size(self.target, delta);
    }
}
