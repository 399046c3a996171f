//! Usage errors.

use crate::widget::WidgetId;
use cgmath::Vector2;
use thiserror::Error;

/// Errors reported when the toolkit API is used incorrectly.
///
/// These indicate a bug in the caller rather than recoverable runtime state, so they are reported
/// immediately instead of being ignored.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UiError {
    #[error("frame {0:?} has been disposed")]
    FrameDisposed(WidgetId),
    #[error("frame {0:?} was never added to the frame manager")]
    UnknownFrame(WidgetId),
    #[error("widget {0:?} does not exist in this tree")]
    UnknownWidget(WidgetId),
    #[error("widget {0:?} is not of the requested type")]
    WrongWidgetType(WidgetId),
    #[error("widget {0:?} is currently handling an event and cannot be borrowed")]
    WidgetBusy(WidgetId),
    #[error("element with minimum size {min:?} does not fit in an area of {available:?}")]
    ElementTooLarge {
        min: Vector2<i32>,
        available: Vector2<i32>,
    },
    #[error("option {index} does not exist; there are {len} options")]
    NoSuchOption { index: usize, len: usize },
    #[error("unknown alignment `{0}`")]
    UnknownAlignment(String),
}
