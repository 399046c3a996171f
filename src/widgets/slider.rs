use crate::events::{notify, Listener, MouseButton};
use crate::impl_any;
use crate::look_and_feel::Element;
use crate::tree::WidgetTree;
use crate::widget::{Capabilities, Capability, DrawCx, EventCx, Widget, WidgetId};
use cgmath::{Point2, Vector2};

const BASE_DRAG_BAR_WIDTH: i32 = 50;

/// A horizontal slider over a continuous range.
#[derive(Debug)]
pub struct Slider {
    minimum: f32,
    maximum: f32,
    current: f32,
    min: Vector2<i32>,
    drag_bar_width: i32,
    scroll_speed: f32,
    width: i32,
    listeners: Vec<Listener<f32>>,
}

impl Slider {
    pub fn new(minimum: f32, maximum: f32, current: f32, width: i32, height: i32) -> Slider {
        Slider {
            minimum,
            maximum,
            current,
            min: Vector2::new(width, height),
            drag_bar_width: if width == 0 { BASE_DRAG_BAR_WIDTH } else { width / 10 },
            scroll_speed: 0.05,
            width,
            listeners: Vec::new(),
        }
    }

    /// Sets the fraction of the range moved per unit of scroll input.
    pub fn with_scroll_speed(mut self, speed: f32) -> Slider {
        self.scroll_speed = speed;
        self
    }

    pub fn add_listener(&mut self, listener: Listener<f32>) {
        self.listeners.push(listener);
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn set_current(&mut self, value: f32) {
        if self.current != value {
            self.current = value;
            notify(&self.listeners, value);
        }
    }

    pub fn fraction(&self) -> f32 {
        if self.maximum == self.minimum {
            return 0.;
        }
        (self.current - self.minimum) / (self.maximum - self.minimum)
    }

    /// Sets the value from a fraction of the range, clamped to `[0, 1]`.
    pub fn set_fraction(&mut self, fraction: f32) {
        let fraction = fraction.max(0.).min(1.);
        self.set_current((self.maximum - self.minimum) * fraction + self.minimum);
    }

    fn travel(&self) -> i32 {
        self.width - self.drag_bar_width
    }
}

impl Widget for Slider {
    impl_any!();

    fn min_size(&self, _: &WidgetTree, _: WidgetId) -> Vector2<i32> {
        self.min
    }

    fn draw(&mut self, cx: &mut DrawCx) {
        self.width = cx.size().x;
        cx.draw(Element::Panel);
        cx.draw(Element::ScrollBarBackground);

        let space = self.travel();
        if space > 0 {
            let shift = (self.fraction() * space as f32) as i32;
            let position = cx.position() + Vector2::new(shift, 0);
            let size = Vector2::new(self.drag_bar_width, cx.size().y);
            cx.draw_at(Element::ScrollBarDragElement, position, size);
        }
    }

    fn capabilities(&self) -> Capabilities {
        Capability::Click | Capability::Drag | Capability::Scroll
    }

    fn on_click(&mut self, cx: &mut EventCx, _: MouseButton, position: Point2<i32>) {
        self.width = cx.size().x;
        let space = self.travel();
        if space > 0 {
            self.set_fraction(position.x as f32 / space as f32);
        }
    }

    fn on_drag(&mut self, cx: &mut EventCx, _: Vector2<i32>, cursor: Point2<f32>) {
        self.width = cx.size().x;
        let space = self.travel();
        if space > 0 {
            let start = cx.screen_position().x + self.drag_bar_width / 2;
            self.set_fraction((cursor.x - start as f32) / space as f32);
        }
    }

    fn on_scroll(&mut self, _: &mut EventCx, delta: f32) {
        self.set_fraction(self.fraction() + delta * self.scroll_speed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::manager::FrameManager;
    use parking_lot::Mutex;
    use std::sync::Arc;

    /// A full-screen slider over `0..100` with a 10 pixel drag bar, recording its values.
    fn slider_gui() -> (FrameManager, WidgetId, Arc<Mutex<Vec<f32>>>) {
        let mut manager = FrameManager::new(&Settings::default());
        let values = Arc::new(Mutex::new(Vec::new()));
        let mut slider = Slider::new(0., 100., 0., 100, 20);
        {
            let values = Arc::clone(&values);
            slider.add_listener(Listener::new(move |value: f32| values.lock().push(value)));
        }
        let slider = manager.tree_mut().insert(slider);
        manager.set_main_gui(slider).unwrap();
        (manager, slider, values)
    }

    fn current(manager: &FrameManager, slider: WidgetId) -> f32 {
        manager.tree().widget::<Slider>(slider).unwrap().current()
    }

    #[test]
    fn test_click_sets_value() {
        let (mut manager, slider, values) = slider_gui();
        assert_eq!(manager.tree().size(slider).x, 1200);

        // travel is 1200 - 10
        manager.check_mouse_click(MouseButton::Left, 595, 10);
        assert_eq!(current(&manager, slider), 50.);
        manager.on_release(MouseButton::Left);

        manager.check_mouse_click(MouseButton::Left, 1199, 10);
        assert_eq!(current(&manager, slider), 100.);
        assert_eq!(*values.lock(), vec![50., 100.]);
    }

    #[test]
    fn test_drag_follows_cursor() {
        let (mut manager, slider, values) = slider_gui();
        manager.check_mouse_click(MouseButton::Left, 0, 10);
        assert!(values.lock().is_empty());

        manager.on_mouse_move(600, 0, 600., 10.);
        assert_eq!(current(&manager, slider), 50.);
        manager.on_mouse_move(-1000, 0, -400., 10.);
        assert_eq!(current(&manager, slider), 0.);

        manager.on_release(MouseButton::Left);
        manager.on_mouse_move(300, 0, 300., 10.);
        assert_eq!(current(&manager, slider), 0.);
        assert_eq!(*values.lock(), vec![50., 0.]);
    }

    #[test]
    fn test_scroll_moves_by_speed() {
        let (mut manager, slider, values) = slider_gui();
        manager.on_mouse_move(0, 0, 100., 10.);
        manager.on_scroll(2.);
        assert!((current(&manager, slider) - 10.).abs() < 1e-4);

        manager.on_scroll(100.);
        assert_eq!(current(&manager, slider), 100.);
        assert_eq!(values.lock().len(), 2);
    }
}
