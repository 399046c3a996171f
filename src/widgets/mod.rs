//! Built-in widgets.

mod button;
mod capture;
mod component_area;
mod drag_edge;
mod dropdown;
mod filler;
mod input;
mod panel;
mod scrollable_list;
mod scrollbar;
mod slider;
mod text;

pub use button::{Button, CloseAction, CloseButton, ToggleButton};
pub use capture::Capture;
pub use component_area::ComponentArea;
pub use drag_edge::DragEdge;
pub use dropdown::{DropDown, DropDownOptions};
pub use filler::Filler;
pub use input::TextInput;
pub use panel::Panel;
pub use scrollable_list::ScrollableList;
pub use scrollbar::{ScrollBar, ScrollPart, Track};
pub use slider::Slider;
pub use text::{Label, TextArea};
