use crate::impl_any;
use crate::tree::WidgetTree;
use crate::widget::{DrawCx, Widget, WidgetId};
use cgmath::Vector2;

/// An invisible widget that takes up space.
#[derive(Debug, Clone, Copy)]
pub struct Filler {
    min: Vector2<i32>,
}

impl Filler {
    pub fn new(width: i32, height: i32) -> Filler {
        Filler {
            min: Vector2::new(width, height),
        }
    }
}

impl Default for Filler {
    fn default() -> Filler {
        Filler::new(0, 0)
    }
}

impl Widget for Filler {
    impl_any!();

    fn min_size(&self, _: &WidgetTree, _: WidgetId) -> Vector2<i32> {
        self.min
    }

    fn draw(&mut self, _: &mut DrawCx) {}
}

#[test]
fn test_default_filler_is_empty() {
    let mut tree = WidgetTree::new();
    let filler = tree.insert(Filler::default());
    assert_eq!(tree.min_size(filler), Vector2::new(0, 0));
}
