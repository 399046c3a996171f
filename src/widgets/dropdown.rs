use crate::error::UiError;
use crate::events::{notify, Listener, MouseButton};
use crate::impl_any;
use crate::layout::{Column, Layout};
use crate::look_and_feel::{Alignment, Element, TextType};
use crate::tree::WidgetTree;
use crate::widget::{
    Capabilities, Capability, DrawCx, EventCx, Growth, LayoutCx, Request, Widget, WidgetId,
};
use crate::widgets::{Label, TextArea};
use cgmath::{Point2, Vector2};
use tracing::{trace, warn};

/// Space between the left edge of the head and its text.
const HEAD_TEXT_BORDER: i32 = 4;

/// A selection among a list of options.
///
/// The head shows the selected option. Clicking it opens a pane with all options below it; the
/// pane is a separate root that captures the next click as the modal component of the frame
/// manager. Clicking an option selects it, and any click closes the pane.
#[derive(Debug)]
pub struct DropDown {
    values: Vec<String>,
    current: usize,
    label: Label,
    min: Vector2<i32>,
    options: WidgetId,
    listeners: Vec<Listener<usize>>,
}

impl DropDown {
    pub const DEFAULT_WIDTH: i32 = 250;
    pub const DEFAULT_HEIGHT: i32 = 30;

    /// Creates a dropdown with the given values and initially selected index.
    pub fn create(tree: &mut WidgetTree, values: Vec<String>, initial: usize) -> WidgetId {
        Self::create_with_size(
            tree,
            values,
            initial,
            Vector2::new(Self::DEFAULT_WIDTH, Self::DEFAULT_HEIGHT),
        )
    }

    pub fn create_with_size(
        tree: &mut WidgetTree,
        values: Vec<String>,
        initial: usize,
        min: Vector2<i32>,
    ) -> WidgetId {
        let fields: Vec<_> = values
            .iter()
            .map(|value| {
                tree.insert(
                    TextArea::new(value.clone(), TextType::Regular, Alignment::LeftMiddle)
                        .with_min_size(min.x, min.y)
                        .with_background(Element::DropDownOptionField),
                )
            })
            .collect();

        let current = initial.min(values.len().saturating_sub(1));
        let mut label = Label::new(
            values.get(current).cloned().unwrap_or_default(),
            TextType::Regular,
            Alignment::LeftMiddle,
        );
        label.set_border(HEAD_TEXT_BORDER);

        let options = tree.insert(DropDownOptions {
            owner: None,
            fields: fields.clone(),
        });
        let dropdown = tree.insert(DropDown {
            values,
            current,
            label,
            min,
            options,
            listeners: Vec::new(),
        });
        if let Some(pane) = tree.widget_mut::<DropDownOptions>(options) {
            pane.owner = Some(dropdown);
        }
        for field in fields {
            let _ = tree.add_child(options, field);
        }
        tree.set_visible(options, false);
        dropdown
    }

    pub fn selected_index(&self) -> usize {
        self.current
    }

    pub fn selected(&self) -> Option<&str> {
        self.values.get(self.current).map(String::as_str)
    }

    /// The options pane.
    pub fn options(&self) -> WidgetId {
        self.options
    }

    pub fn add_listener(&mut self, listener: Listener<usize>) {
        self.listeners.push(listener);
    }

    /// Selects an option and notifies the listeners.
    pub fn set_current(&mut self, index: usize) -> Result<(), UiError> {
        let value = self
            .values
            .get(index)
            .ok_or(UiError::NoSuchOption {
                index,
                len: self.values.len(),
            })?;
        self.label.set_text(value.clone());
        self.current = index;
        notify(&self.listeners, index);
        Ok(())
    }
}

impl Widget for DropDown {
    impl_any!();

    fn min_size(&self, _: &WidgetTree, _: WidgetId) -> Vector2<i32> {
        Vector2::new(self.label.min_width().max(self.min.x), self.min.y)
    }

    fn default_growth(&self) -> Growth {
        Growth::HORIZONTAL
    }

    fn draw(&mut self, cx: &mut DrawCx) {
        let open = cx.tree().is_visible(self.options);
        cx.draw(match open {
            true => Element::DropDownHeadOpen,
            false => Element::DropDownHeadClosed,
        });
        self.label.draw(cx);
    }

    fn capabilities(&self) -> Capabilities {
        Capability::Click.into()
    }

    fn owned_roots(&self) -> Vec<WidgetId> {
        vec![self.options]
    }

    fn on_click(&mut self, cx: &mut EventCx, _: MouseButton, _: Point2<i32>) {
        let options = self.options;
        let tree = cx.tree();
        if tree.is_visible(options) {
            tree.set_visible(options, false);
            return;
        }

        let position = cx.screen_position();
        let size = cx.size();
        let tree = cx.tree();
        tree.set_position(options, Point2::new(position.x, position.y + size.y));
        tree.set_size(options, size.x, 0);
        tree.set_visible(options, true);
        cx.request(Request::SetModal(options));
        trace!("opened dropdown options at {:?}", position);
    }
}

/// The options pane of a [`DropDown`].
#[derive(Debug)]
pub struct DropDownOptions {
    owner: Option<WidgetId>,
    fields: Vec<WidgetId>,
}

impl Widget for DropDownOptions {
    impl_any!();

    fn min_size(&self, tree: &WidgetTree, id: WidgetId) -> Vector2<i32> {
        Column::default().min_size(&tree.child_infos(id))
    }

    fn layout(&mut self, cx: &mut LayoutCx) {
        let children = cx.children();
        let bounds = cx.bounds();
        cx.apply(&Column::default(), bounds, &children);
    }

    fn draw(&mut self, cx: &mut DrawCx) {
        cx.draw(Element::Panel);
    }

    fn capabilities(&self) -> Capabilities {
        Capability::Click.into()
    }

    fn on_click(&mut self, cx: &mut EventCx, _: MouseButton, _: Point2<i32>) {
        let target = cx.target();
        let index = self.fields.iter().position(|f| *f == target);
        if let (Some(index), Some(owner)) = (index, self.owner) {
            let result = cx
                .tree()
                .update::<DropDown, _>(owner, |dropdown| dropdown.set_current(index));
            if let Err(err) = result.and_then(|r| r) {
                warn!("could not select dropdown option {}: {}", index, err);
            }
        }
        let id = cx.id();
        cx.tree().set_visible(id, false);
    }
}
