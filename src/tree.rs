//! The widget tree.

use crate::error::UiError;
use crate::layout::{ChildInfo, LayoutProperty};
use crate::look_and_feel::LookAndFeel;
use crate::rect::{max_size, to_vec, Rect};
use crate::widget::{
    Capabilities, Capability, DrawCx, EventCx, Growth, LayoutCx, Request, Widget, WidgetId,
};
use cgmath::{Point2, Vector2};
use core::cell::Cell;
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};

/// A widget tree node.
#[derive(Debug)]
struct Node {
    /// The widget; `None` while one of its methods is running.
    widget: Option<Box<dyn Widget>>,
    parent: Option<WidgetId>,
    children: Vec<WidgetId>,
    /// Position relative to the parent.
    position: Point2<i32>,
    size: Vector2<i32>,
    /// The last computed minimum size; used while the widget is taken out.
    min_size: Cell<Vector2<i32>>,
    visible: bool,
    layout_valid: bool,
    hovered: bool,
    grow: Growth,
    property: LayoutProperty,
}

impl Node {
    fn new(widget: Box<dyn Widget>) -> Node {
        Node {
            widget: Some(widget),
            parent: None,
            children: Vec::new(),
            position: Point2::new(0, 0),
            size: Vector2::new(0, 0),
            min_size: Cell::new(Vector2::new(0, 0)),
            visible: true,
            layout_valid: false,
            hovered: false,
            grow: Growth::BOTH,
            property: LayoutProperty::None,
        }
    }

    fn bounds(&self) -> Rect {
        Rect::new(self.position, self.size)
    }
}

/// An arena of widgets.
///
/// Widgets are addressed by [`WidgetId`]. Every widget has at most one parent, and a widget's
/// position is relative to its parent. Widgets without a parent are roots (e.g. frames).
///
/// While a widget method runs, the widget is taken out of the tree so that the method can be
/// given mutable access to the rest of the tree. Accessing that widget through the tree in the
/// meantime yields nothing (or [`UiError::WidgetBusy`]).
#[derive(Debug, Default)]
pub struct WidgetTree {
    nodes: HashMap<WidgetId, Node>,
}

impl WidgetTree {
    pub fn new() -> WidgetTree {
        WidgetTree::default()
    }

    /// Inserts a widget as a new root and returns its id.
    pub fn insert<W: Widget>(&mut self, widget: W) -> WidgetId {
        self.insert_boxed(Box::new(widget))
    }

    pub fn insert_boxed(&mut self, widget: Box<dyn Widget>) -> WidgetId {
        let id = WidgetId::new();
        let mut node = Node::new(widget);
        if let Some(widget) = &node.widget {
            node.grow = widget.default_growth();
        }
        self.nodes.insert(id, node);
        id
    }

    /// Returns true if the widget exists.
    pub fn exists(&self, id: WidgetId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Appends `child` to the children of `parent`, detaching it from its previous parent first.
    pub fn add_child(&mut self, parent: WidgetId, child: WidgetId) -> Result<(), UiError> {
        self.add_child_with(parent, child, LayoutProperty::None)
    }

    /// Appends `child` with a layout property, which the parent's layout may interpret.
    pub fn add_child_with(
        &mut self,
        parent: WidgetId,
        child: WidgetId,
        property: LayoutProperty,
    ) -> Result<(), UiError> {
        if !self.nodes.contains_key(&parent) {
            return Err(UiError::UnknownWidget(parent));
        }
        if !self.nodes.contains_key(&child) {
            return Err(UiError::UnknownWidget(child));
        }
        self.detach(child);

        if let Some(node) = self.nodes.get_mut(&child) {
            node.parent = Some(parent);
            node.property = property;
        }
        if let Some(node) = self.nodes.get_mut(&parent) {
            node.children.push(child);
        }
        self.invalidate_layout(parent);
        Ok(())
    }

    /// Adds several children in order.
    pub fn add_children(&mut self, parent: WidgetId, children: &[WidgetId]) -> Result<(), UiError> {
        for child in children {
            self.add_child(parent, *child)?;
        }
        Ok(())
    }

    /// Removes `child` from the children of `parent`, clearing its parent link.
    ///
    /// The child itself stays in the tree as a root. Returns false if it wasn't a child of
    /// `parent`.
    pub fn remove_child(&mut self, parent: WidgetId, child: WidgetId) -> bool {
        if self.parent(child) != Some(parent) {
            return false;
        }
        self.detach(child);
        true
    }

    /// Removes every child of the widget, leaving them in the tree as roots.
    pub fn clear_children(&mut self, parent: WidgetId) {
        for child in self.children(parent).to_vec() {
            self.detach(child);
        }
    }

    fn detach(&mut self, child: WidgetId) {
        let parent = match self.nodes.get_mut(&child).and_then(|node| node.parent.take()) {
            Some(parent) => parent,
            None => return,
        };
        if let Some(node) = self.nodes.get_mut(&parent) {
            node.children.retain(|id| *id != child);
        }
        self.invalidate_layout(parent);
    }

    /// Removes a widget and all of its descendants from the tree, along with the roots they own
    /// (see [`Widget::owned_roots`]).
    pub fn destroy(&mut self, id: WidgetId) {
        self.detach(id);
        let mut stack = vec![id];
        while let Some(id) = stack.pop() {
            if let Some(node) = self.nodes.remove(&id) {
                if let Some(widget) = &node.widget {
                    stack.extend(widget.owned_roots());
                }
                stack.extend(node.children);
            }
        }
    }

    pub fn parent(&self, id: WidgetId) -> Option<WidgetId> {
        self.nodes.get(&id).and_then(|node| node.parent)
    }

    pub fn children(&self, id: WidgetId) -> &[WidgetId] {
        self.nodes.get(&id).map_or(&[], |node| &node.children)
    }

    /// Walks up to the root of the widget's subtree.
    pub fn root(&self, id: WidgetId) -> WidgetId {
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            current = parent;
        }
        current
    }

    pub fn position(&self, id: WidgetId) -> Point2<i32> {
        self.nodes.get(&id).map_or(Point2::new(0, 0), |node| node.position)
    }

    pub fn size(&self, id: WidgetId) -> Vector2<i32> {
        self.nodes.get(&id).map_or(Vector2::new(0, 0), |node| node.size)
    }

    /// Bounds relative to the parent.
    pub fn bounds(&self, id: WidgetId) -> Rect {
        self.nodes.get(&id).map_or(Rect::zero(), Node::bounds)
    }

    pub fn set_position(&mut self, id: WidgetId, position: Point2<i32>) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.position = position;
        }
    }

    pub fn add_to_position(&mut self, id: WidgetId, delta: Vector2<i32>) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.position += delta;
        }
    }

    /// Sets the size, clamped to the minimum size, and invalidates the layout.
    pub fn set_size(&mut self, id: WidgetId, width: i32, height: i32) {
        if !self.nodes.contains_key(&id) {
            return;
        }
        let min = self.min_size(id);
        if let Some(node) = self.nodes.get_mut(&id) {
            node.size = max_size(Vector2::new(width, height), min);
        }
        self.invalidate_layout(id);
    }

    pub fn add_to_size(&mut self, id: WidgetId, delta: Vector2<i32>) {
        let size = self.size(id) + delta;
        self.set_size(id, size.x, size.y);
    }

    /// Shrinks the widget to its minimum size.
    pub fn pack(&mut self, id: WidgetId) {
        self.set_size(id, 0, 0);
    }

    /// Computes the minimum size of the widget.
    ///
    /// If the widget is currently taken out of the tree, the last computed value is returned.
    pub fn min_size(&self, id: WidgetId) -> Vector2<i32> {
        let node = match self.nodes.get(&id) {
            Some(node) => node,
            None => return Vector2::new(0, 0),
        };
        match &node.widget {
            Some(widget) => {
                let min = max_size(widget.min_size(self, id), Vector2::new(0, 0));
                node.min_size.set(min);
                min
            }
            None => node.min_size.get(),
        }
    }

    /// Layout information about a child, as seen by its parent's layout.
    pub fn child_info(&self, id: WidgetId) -> ChildInfo {
        let min = self.min_size(id);
        match self.nodes.get(&id) {
            Some(node) => ChildInfo {
                min,
                grow: node.grow,
                visible: node.visible,
                property: node.property,
            },
            None => ChildInfo {
                min,
                grow: Growth::NONE,
                visible: false,
                property: LayoutProperty::None,
            },
        }
    }

    /// Layout information about all children of a widget.
    pub fn child_infos(&self, id: WidgetId) -> Vec<ChildInfo> {
        self.children(id).iter().map(|c| self.child_info(*c)).collect()
    }

    pub fn growth(&self, id: WidgetId) -> Growth {
        self.nodes.get(&id).map_or(Growth::NONE, |node| node.grow)
    }

    pub fn set_growth(&mut self, id: WidgetId, grow: Growth) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.grow = grow;
        }
        self.invalidate_layout(id);
    }

    pub fn is_visible(&self, id: WidgetId) -> bool {
        self.nodes.get(&id).map_or(false, |node| node.visible)
    }

    /// Shows or hides the widget.
    ///
    /// Becoming visible revalidates the widget's layout; either way the parent's layout is
    /// invalidated.
    pub fn set_visible(&mut self, id: WidgetId, visible: bool) {
        self.set_visible_flag(id, visible);
        if visible {
            self.validate_layout(id);
        }
        if let Some(parent) = self.parent(id) {
            self.invalidate_layout(parent);
        }
    }

    /// Sets visibility without touching any layout; used by layouts that control visibility.
    pub(crate) fn set_visible_flag(&mut self, id: WidgetId, visible: bool) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.visible = visible;
        }
    }

    pub fn is_hovered(&self, id: WidgetId) -> bool {
        self.nodes.get(&id).map_or(false, |node| node.hovered)
    }

    pub(crate) fn set_hovered(&mut self, id: WidgetId, hovered: bool) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.hovered = hovered;
        }
    }

    pub fn is_layout_valid(&self, id: WidgetId) -> bool {
        self.nodes.get(&id).map_or(false, |node| node.layout_valid)
    }

    /// Marks the widget's layout invalid, and its ancestors' too.
    ///
    /// Stops at a widget that is already invalid.
    pub fn invalidate_layout(&mut self, id: WidgetId) {
        let mut current = Some(id);
        while let Some(id) = current {
            match self.nodes.get_mut(&id) {
                Some(node) if node.layout_valid => {
                    node.layout_valid = false;
                    current = node.parent;
                }
                _ => break,
            }
        }
    }

    /// Lays out the widget if its layout is invalid.
    ///
    /// The size is first clamped to the minimum size, then the widget positions its children.
    pub fn validate_layout(&mut self, id: WidgetId) {
        match self.nodes.get(&id) {
            Some(node) if !node.layout_valid && node.widget.is_some() => (),
            _ => return,
        }

        let min = self.min_size(id);
        let size = match self.nodes.get_mut(&id) {
            Some(node) => {
                node.size = max_size(node.size, min);
                node.size
            }
            None => return,
        };

        self.with_widget(id, |widget, tree| {
            let mut cx = LayoutCx::new(tree, id, size);
            widget.layout(&mut cx);
        });

        if let Some(node) = self.nodes.get_mut(&id) {
            node.layout_valid = true;
        }
    }

    /// Returns true if `point` (in the parent's coordinate system) is inside the widget.
    pub fn contains(&self, id: WidgetId, point: Point2<i32>) -> bool {
        self.nodes.get(&id).map_or(false, |node| node.bounds().contains(point))
    }

    /// Finds the deepest visible widget at `point`, relative to the widget's own origin.
    ///
    /// Later children are on top of earlier ones. Returns the widget itself if no child is hit.
    pub fn component_at(&self, id: WidgetId, point: Point2<i32>) -> WidgetId {
        if let Some(node) = self.nodes.get(&id) {
            for child_id in node.children.iter().rev() {
                if let Some(child) = self.nodes.get(child_id) {
                    if child.visible && child.bounds().contains(point) {
                        return self.component_at(*child_id, point - to_vec(child.position));
                    }
                }
            }
        }
        id
    }

    /// The position of the widget in screen coordinates.
    pub fn screen_position(&self, id: WidgetId) -> Point2<i32> {
        let mut position = Point2::new(0, 0);
        let mut current = Some(id);
        while let Some(id) = current {
            match self.nodes.get(&id) {
                Some(node) => {
                    position += to_vec(node.position);
                    current = node.parent;
                }
                None => break,
            }
        }
        position
    }

    /// Returns true if `ancestor` is `id` or one of its ancestors.
    pub fn is_ancestor(&self, ancestor: WidgetId, id: WidgetId) -> bool {
        let mut current = Some(id);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    pub fn capabilities(&self, id: WidgetId) -> Capabilities {
        self.nodes
            .get(&id)
            .and_then(|node| node.widget.as_ref())
            .map_or(Capabilities::NONE, |widget| widget.capabilities())
    }

    /// Finds the nearest widget, starting at `id` and walking up, with the given capability.
    pub fn find_ancestor(&self, id: WidgetId, capability: Capability) -> Option<WidgetId> {
        let mut current = Some(id);
        while let Some(id) = current {
            if self.capabilities(id).contains(capability) {
                return Some(id);
            }
            current = self.parent(id);
        }
        None
    }

    /// Returns the widget if it is of type `T`.
    pub fn widget<T: Widget>(&self, id: WidgetId) -> Option<&T> {
        self.nodes
            .get(&id)?
            .widget
            .as_ref()?
            .as_any()
            .downcast_ref::<T>()
    }

    /// Returns the widget mutably if it is of type `T`.
    ///
    /// Changing the widget through this does not invalidate its layout; see
    /// [`WidgetTree::update`].
    pub fn widget_mut<T: Widget>(&mut self, id: WidgetId) -> Option<&mut T> {
        self.nodes
            .get_mut(&id)?
            .widget
            .as_mut()?
            .as_any_mut()
            .downcast_mut::<T>()
    }

    pub(crate) fn widget_dyn_mut(&mut self, id: WidgetId) -> Option<&mut (dyn Widget + 'static)> {
        let widget = self.nodes.get_mut(&id)?.widget.as_mut()?;
        Some(&mut **widget)
    }

    /// The widget's name, for logging.
    pub fn name(&self, id: WidgetId) -> String {
        self.nodes
            .get(&id)
            .and_then(|node| node.widget.as_ref())
            .map_or_else(|| format!("{:?}", id), |widget| widget.name())
    }

    /// Runs a closure on a widget of type `T`, then invalidates its layout.
    pub fn update<T: Widget, R>(
        &mut self,
        id: WidgetId,
        f: impl FnOnce(&mut T) -> R,
    ) -> Result<R, UiError> {
        let node = self.nodes.get_mut(&id).ok_or(UiError::UnknownWidget(id))?;
        let widget = node.widget.as_mut().ok_or(UiError::WidgetBusy(id))?;
        let widget = widget
            .as_any_mut()
            .downcast_mut::<T>()
            .ok_or(UiError::WrongWidgetType(id))?;
        let result = f(widget);
        self.invalidate_layout(id);
        Ok(result)
    }

    /// Takes the widget out of the tree, runs the closure, and puts it back.
    ///
    /// The widget is put back even if the closure panics; the panic then continues unwinding.
    /// Returns `None` if the widget doesn't exist or is already taken out.
    pub(crate) fn with_widget<R>(
        &mut self,
        id: WidgetId,
        f: impl FnOnce(&mut dyn Widget, &mut WidgetTree) -> R,
    ) -> Option<R> {
        let mut widget = self.nodes.get_mut(&id)?.widget.take()?;

        let result = panic::catch_unwind(AssertUnwindSafe(|| f(&mut *widget, self)));

        // the node may have been destroyed by the closure
        if let Some(node) = self.nodes.get_mut(&id) {
            node.widget = Some(widget);
        }

        match result {
            Ok(result) => Some(result),
            Err(payload) => panic::resume_unwind(payload),
        }
    }

    /// Calls an event handler on a widget.
    pub(crate) fn dispatch<R>(
        &mut self,
        id: WidgetId,
        target: WidgetId,
        requests: &mut Vec<Request>,
        f: impl FnOnce(&mut dyn Widget, &mut EventCx) -> R,
    ) -> Option<R> {
        self.with_widget(id, |widget, tree| {
            let mut cx = EventCx::new(tree, id, target, requests);
            f(widget, &mut cx)
        })
    }

    /// Draws a widget and then its visible children, with the widget at screen `position`.
    pub fn draw(&mut self, id: WidgetId, lf: &mut dyn LookAndFeel, position: Point2<i32>) {
        let (size, hovered) = match self.nodes.get(&id) {
            Some(node) if node.visible => (node.size, node.hovered),
            _ => return,
        };

        let invalidated = self.with_widget(id, |widget, tree| {
            let mut cx = DrawCx::new(tree, &mut *lf, position, size, hovered);
            widget.draw(&mut cx);
            cx.was_invalidated()
        });
        if invalidated == Some(true) {
            self.invalidate_layout(id);
        }

        for child in self.children(id).to_vec() {
            let child_position = position + to_vec(self.position(child));
            self.draw(child, lf, child_position);
        }
    }
}
