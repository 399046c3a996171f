use crate::color::Color;
use crate::events::{KeyCode, KeyModifiers, MouseButton};
use crate::layout::{Layout, Slot};
use crate::look_and_feel::{Alignment, Element, LookAndFeel, TextType};
use crate::rect::Rect;
use crate::tree::WidgetTree;
use cgmath::{Point2, Vector2};
use core::any::Any;
use core::fmt;
use core::ops;
use uuid::Uuid;

/// A unique identifier for a widget.
///
/// (this is just a UUID)
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WidgetId(u32, u16, u16, [u8; 8]);

impl WidgetId {
    pub(crate) fn new() -> WidgetId {
        let uuid = Uuid::new_v4();
        let (a, b, c, d) = uuid.as_fields();
        WidgetId(a, b, c, *d)
    }
}

/// Kinds of input a widget can handle.
///
/// Input is delivered to the nearest widget, starting at the one under the cursor and walking up
/// its ancestors, that declares the matching capability.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    Click = 1,
    Release = 2,
    Drag = 4,
    Scroll = 8,
    KeyTyped = 16,
}

/// A set of capabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities(u8);

impl Capabilities {
    pub const NONE: Capabilities = Capabilities(0);

    pub fn contains(&self, capability: Capability) -> bool {
        self.0 & capability as u8 != 0
    }

    pub fn with(self, capability: Capability) -> Capabilities {
        Capabilities(self.0 | capability as u8)
    }
}

impl From<Capability> for Capabilities {
    fn from(capability: Capability) -> Self {
        Capabilities(capability as u8)
    }
}

impl ops::BitOr<Capability> for Capability {
    type Output = Capabilities;
    fn bitor(self, rhs: Capability) -> Capabilities {
        Capabilities::from(self).with(rhs)
    }
}

impl ops::BitOr<Capability> for Capabilities {
    type Output = Capabilities;
    fn bitor(self, rhs: Capability) -> Capabilities {
        self.with(rhs)
    }
}

/// Per-axis growth policy.
///
/// Layouts give a growing widget a share of the space left over after every sibling got its
/// minimum size. Widgets that don't grow are kept at exactly their minimum along that axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Growth {
    pub horizontal: bool,
    pub vertical: bool,
}

impl Growth {
    pub const BOTH: Growth = Growth::new(true, true);
    pub const NONE: Growth = Growth::new(false, false);
    pub const HORIZONTAL: Growth = Growth::new(true, false);
    pub const VERTICAL: Growth = Growth::new(false, true);

    pub const fn new(horizontal: bool, vertical: bool) -> Growth {
        Growth {
            horizontal,
            vertical,
        }
    }
}

impl Default for Growth {
    fn default() -> Self {
        Growth::BOTH
    }
}

/// Implements the downcasting methods of [`Widget`].
#[macro_export]
macro_rules! impl_any {
    () => {
        fn as_any(&self) -> &dyn ::core::any::Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn ::core::any::Any {
            self
        }
    };
}

/// Widgets are the nodes of the UI tree.
///
/// Widgets only hold their own content; position, size, visibility, growth policy and the parent
/// and child links live in the [`WidgetTree`]. Every method is handed the context it needs.
///
/// Input handlers are only called if [`Widget::capabilities`] includes the matching capability.
pub trait Widget: Any + fmt::Debug {
    /// The minimum size of this widget.
    ///
    /// Must depend only on the widget's own content (and, for containers, on the minimum sizes
    /// of the children), never on the size currently assigned to it.
    fn min_size(&self, tree: &WidgetTree, id: WidgetId) -> Vector2<i32>;

    /// Sizes and positions the children.
    ///
    /// Called by [`WidgetTree::validate_layout`] when the layout is invalid. Widgets with children
    /// must validate every child in here.
    fn layout(&mut self, cx: &mut LayoutCx) {
        let _ = cx;
    }

    /// Draws the widget itself. Visible children are drawn by the tree afterwards, on top.
    fn draw(&mut self, cx: &mut DrawCx);

    fn capabilities(&self) -> Capabilities {
        Capabilities::NONE
    }

    /// The growth policy the widget starts out with when inserted into a tree.
    fn default_growth(&self) -> Growth {
        Growth::BOTH
    }

    /// Root widgets that belong to this widget without being its children (e.g. popups).
    ///
    /// [`WidgetTree::destroy`] destroys them along with the widget.
    fn owned_roots(&self) -> Vec<WidgetId> {
        Vec::new()
    }

    /// A mouse button was pressed on this widget or on a descendant without a click handler.
    ///
    /// `position` is relative to this widget.
    fn on_click(&mut self, cx: &mut EventCx, button: MouseButton, position: Point2<i32>) {
        let _ = (cx, button, position);
    }

    /// The mouse button of a click that this widget captured was released.
    fn on_release(&mut self, cx: &mut EventCx, button: MouseButton) {
        let _ = (cx, button);
    }

    /// The cursor moved by `delta` to the screen position `cursor` while the button of a click
    /// this widget captured was held.
    fn on_drag(&mut self, cx: &mut EventCx, delta: Vector2<i32>, cursor: Point2<f32>) {
        let _ = (cx, delta, cursor);
    }

    /// Scroll input while hovering this widget; positive values scroll up.
    fn on_scroll(&mut self, cx: &mut EventCx, delta: f32) {
        let _ = (cx, delta);
    }

    /// A character was typed while this widget was the text listener.
    fn on_key_typed(&mut self, cx: &mut EventCx, ch: char) {
        let _ = (cx, ch);
    }

    /// A key was pressed while this widget was the text listener.
    fn on_key_pressed(&mut self, cx: &mut EventCx, key: KeyCode, modifiers: KeyModifiers) {
        let _ = (cx, key, modifiers);
    }

    /// This widget became or stopped being the text listener.
    fn on_text_focus(&mut self, focused: bool) {
        let _ = focused;
    }

    /// A short human-readable name, used for logging and for frame titles.
    fn name(&self) -> String {
        let name = core::any::type_name::<Self>();
        name.rsplit("::").next().unwrap_or(name).to_string()
    }

    /// For downcasting.
    fn as_any(&self) -> &dyn Any;

    /// For downcasting.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Actions that widgets ask the frame manager to perform after an event handler returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request {
    /// Redirect the next click to this widget.
    SetModal(WidgetId),
    /// Route typed characters to this widget, or to nobody.
    TextFocus(Option<WidgetId>),
    /// Bring a frame to the front.
    FocusFrame(WidgetId),
    /// Dispose a frame.
    DisposeFrame(WidgetId),
}

/// Context passed to [`Widget::draw`].
pub struct DrawCx<'a> {
    tree: &'a WidgetTree,
    lf: &'a mut dyn LookAndFeel,
    position: Point2<i32>,
    size: Vector2<i32>,
    hovered: bool,
    invalidated: bool,
}

impl<'a> DrawCx<'a> {
    pub(crate) fn new(
        tree: &'a WidgetTree,
        lf: &'a mut dyn LookAndFeel,
        position: Point2<i32>,
        size: Vector2<i32>,
        hovered: bool,
    ) -> DrawCx<'a> {
        DrawCx {
            tree,
            lf,
            position,
            size,
            hovered,
            invalidated: false,
        }
    }

    /// Read access to the rest of the tree.
    pub fn tree(&self) -> &WidgetTree {
        self.tree
    }

    /// The screen position of the widget.
    pub fn position(&self) -> Point2<i32> {
        self.position
    }

    pub fn size(&self) -> Vector2<i32> {
        self.size
    }

    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    /// Draws an element covering the whole widget.
    pub fn draw(&mut self, element: Element) {
        self.lf.draw(element, self.position, self.size, None);
    }

    /// Draws a tinted element covering the whole widget.
    pub fn draw_tinted(&mut self, element: Element, color: Option<Color>) {
        self.lf.draw(element, self.position, self.size, color);
    }

    /// Draws an element at a screen position.
    pub fn draw_at(&mut self, element: Element, position: Point2<i32>, size: Vector2<i32>) {
        self.lf.draw(element, position, size, None);
    }

    /// Draws text inside the widget bounds.
    pub fn draw_text(&mut self, text: &str, text_type: TextType, alignment: Alignment) {
        self.lf
            .draw_text(self.position, self.size, text, text_type, alignment);
    }

    /// Draws text inside the given box.
    pub fn draw_text_at(
        &mut self,
        position: Point2<i32>,
        size: Vector2<i32>,
        text: &str,
        text_type: TextType,
        alignment: Alignment,
    ) {
        self.lf.draw_text(position, size, text, text_type, alignment);
    }

    pub fn text_width(&self, text: &str, text_type: TextType) -> i32 {
        self.lf.text_width(text, text_type)
    }

    /// Marks the layout of this widget invalid once drawing has finished, e.g. because drawing
    /// produced new text metrics.
    pub fn invalidate_layout(&mut self) {
        self.invalidated = true;
    }

    pub(crate) fn was_invalidated(&self) -> bool {
        self.invalidated
    }
}

/// Context passed to [`Widget::layout`].
pub struct LayoutCx<'a> {
    tree: &'a mut WidgetTree,
    id: WidgetId,
    size: Vector2<i32>,
}

impl<'a> LayoutCx<'a> {
    pub(crate) fn new(tree: &'a mut WidgetTree, id: WidgetId, size: Vector2<i32>) -> LayoutCx<'a> {
        LayoutCx { tree, id, size }
    }

    pub fn id(&self) -> WidgetId {
        self.id
    }

    /// The size assigned to the widget being laid out.
    pub fn size(&self) -> Vector2<i32> {
        self.size
    }

    /// The widget's own bounds, in its own coordinate system.
    pub fn bounds(&self) -> Rect {
        Rect::new(Point2::new(0, 0), self.size)
    }

    pub fn children(&self) -> Vec<WidgetId> {
        self.tree.children(self.id).to_vec()
    }

    pub fn tree(&mut self) -> &mut WidgetTree {
        self.tree
    }

    /// Positions and sizes a child, then validates it.
    pub fn place(&mut self, child: WidgetId, rect: Rect) {
        self.tree.set_position(child, rect.origin);
        self.tree.set_size(child, rect.size.x, rect.size.y);
        self.tree.validate_layout(child);
    }

    /// Runs a layout strategy over the given children within `area`.
    pub fn apply(&mut self, layout: &dyn Layout, area: Rect, children: &[WidgetId]) {
        let infos: Vec<_> = children.iter().map(|c| self.tree.child_info(*c)).collect();
        let slots = layout.layout(area, &infos);

        for (child, slot) in children.iter().zip(slots) {
            match slot {
                Slot::Skip => self.tree.validate_layout(*child),
                Slot::Place(rect) => self.place(*child, rect),
                Slot::Show(rect) => {
                    self.tree.set_visible_flag(*child, true);
                    self.place(*child, rect);
                }
                Slot::Hide => {
                    self.tree.set_visible_flag(*child, false);
                    self.tree.validate_layout(*child);
                }
            }
        }
    }
}

/// Context passed to input handlers.
pub struct EventCx<'a> {
    tree: &'a mut WidgetTree,
    id: WidgetId,
    target: WidgetId,
    requests: &'a mut Vec<Request>,
}

impl<'a> EventCx<'a> {
    pub(crate) fn new(
        tree: &'a mut WidgetTree,
        id: WidgetId,
        target: WidgetId,
        requests: &'a mut Vec<Request>,
    ) -> EventCx<'a> {
        EventCx {
            tree,
            id,
            target,
            requests,
        }
    }

    /// The widget handling the event.
    pub fn id(&self) -> WidgetId {
        self.id
    }

    /// The widget that was hit; either the handling widget or one of its descendants.
    pub fn target(&self) -> WidgetId {
        self.target
    }

    pub fn tree(&mut self) -> &mut WidgetTree {
        self.tree
    }

    pub fn size(&self) -> Vector2<i32> {
        self.tree.size(self.id)
    }

    pub fn screen_position(&self) -> Point2<i32> {
        self.tree.screen_position(self.id)
    }

    /// Invalidates the layout of the handling widget.
    pub fn invalidate_layout(&mut self) {
        self.tree.invalidate_layout(self.id);
    }

    pub fn request(&mut self, request: Request) {
        self.requests.push(request);
    }
}

#[test]
fn test_capabilities() {
    let caps = Capability::Click | Capability::Release;
    assert!(caps.contains(Capability::Click));
    assert!(caps.contains(Capability::Release));
    assert!(!caps.contains(Capability::Drag));
    assert!(!Capabilities::NONE.contains(Capability::Scroll));
}
