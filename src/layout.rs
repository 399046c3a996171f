//! Layout strategies.
//!
//! A layout strategy is a pure function from a container area and a list of [`ChildInfo`] records
//! (minimum size, growth policy, layout property, visibility) to one [`Slot`] per child. The
//! container applies the slots with [`LayoutCx::apply`](crate::LayoutCx::apply).
//!
//! All strategies share the same space distribution rule: every child first receives its
//! minimum size, then the space left over along an axis is split evenly among the children that
//! want to grow along that axis. Children that don't grow keep exactly their minimum and are
//! aligned within the space they were given.

use crate::rect::Rect;
use crate::widget::Growth;
use cgmath::Vector2;
use core::fmt;

/// Per-child data interpreted by the parent's layout strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LayoutProperty {
    /// No property; grid layouts place such children in insertion order.
    #[default]
    None,
    /// A grid cell.
    Cell { col: usize, row: usize },
}

/// What a layout strategy knows about a child.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChildInfo {
    pub min: Vector2<i32>,
    pub grow: Growth,
    pub visible: bool,
    pub property: LayoutProperty,
}

/// The outcome of a layout for one child.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// Leave the child where it is (e.g. it's invisible).
    Skip,
    /// Position and size the child.
    Place(Rect),
    /// Make the child visible, then position and size it.
    Show(Rect),
    /// Make the child invisible.
    Hide,
}

impl Slot {
    pub fn rect(&self) -> Option<Rect> {
        match self {
            Slot::Place(rect) | Slot::Show(rect) => Some(*rect),
            Slot::Skip | Slot::Hide => None,
        }
    }
}

/// A layout strategy.
pub trait Layout: fmt::Debug {
    /// The minimum size of a container with these children.
    fn min_size(&self, children: &[ChildInfo]) -> Vector2<i32>;

    /// Assigns one slot to every child.
    ///
    /// `bounds` is the area available for the children, in the container's coordinate system.
    fn layout(&self, bounds: Rect, children: &[ChildInfo]) -> Vec<Slot>;
}

/// Alignment of a non-growing child within the space assigned to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    Start,
    #[default]
    Center,
    End,
}

impl Align {
    fn offset(self, space: i32, size: i32) -> i32 {
        let free = (space - size).max(0);
        match self {
            Align::Start => 0,
            Align::Center => free / 2,
            Align::End => free,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    fn main(self, v: Vector2<i32>) -> i32 {
        match self {
            Axis::Horizontal => v.x,
            Axis::Vertical => v.y,
        }
    }

    fn cross(self, v: Vector2<i32>) -> i32 {
        match self {
            Axis::Horizontal => v.y,
            Axis::Vertical => v.x,
        }
    }

    fn grows_main(self, grow: Growth) -> bool {
        match self {
            Axis::Horizontal => grow.horizontal,
            Axis::Vertical => grow.vertical,
        }
    }

    fn grows_cross(self, grow: Growth) -> bool {
        match self {
            Axis::Horizontal => grow.vertical,
            Axis::Vertical => grow.horizontal,
        }
    }

    fn vec(self, main: i32, cross: i32) -> Vector2<i32> {
        match self {
            Axis::Horizontal => Vector2::new(main, cross),
            Axis::Vertical => Vector2::new(cross, main),
        }
    }
}

/// Gives every entry its minimum, then splits the leftover evenly among the growing entries.
///
/// Remainder pixels go to the first growing entries.
pub fn distribute(total: i32, mins: &[i32], grows: &[bool]) -> Vec<i32> {
    let mut sizes = mins.to_vec();
    let leftover = total - mins.iter().sum::<i32>();
    let growers = grows.iter().filter(|g| **g).count() as i32;
    if leftover <= 0 || growers == 0 {
        return sizes;
    }

    let share = leftover / growers;
    let mut remainder = leftover % growers;
    for (size, grow) in sizes.iter_mut().zip(grows) {
        if *grow {
            *size += share;
            if remainder > 0 {
                *size += 1;
                remainder -= 1;
            }
        }
    }
    sizes
}

/// Lays out a list of children along one axis, starting at `bounds.origin`.
fn linear(axis: Axis, align: Align, bounds: Rect, children: &[&ChildInfo]) -> Vec<Rect> {
    let mins: Vec<_> = children.iter().map(|c| axis.main(c.min)).collect();
    let grows: Vec<_> = children.iter().map(|c| axis.grows_main(c.grow)).collect();
    let sizes = distribute(axis.main(bounds.size), &mins, &grows);
    let cross_space = axis.cross(bounds.size);

    let mut main = 0;
    let mut rects = Vec::with_capacity(children.len());
    for (child, size) in children.iter().zip(sizes) {
        let min_cross = axis.cross(child.min);
        let (cross, cross_size) = if axis.grows_cross(child.grow) {
            (0, cross_space.max(min_cross))
        } else {
            (align.offset(cross_space, min_cross), min_cross)
        };
        let offset = axis.vec(main, cross);
        rects.push(Rect::new(bounds.origin + offset, axis.vec(size, cross_size)));
        main += size;
    }
    rects
}

fn linear_min(axis: Axis, children: &[&ChildInfo]) -> Vector2<i32> {
    let main = children.iter().map(|c| axis.main(c.min)).sum();
    let cross = children.iter().map(|c| axis.cross(c.min)).max().unwrap_or(0);
    axis.vec(main, cross)
}

fn linear_slots(axis: Axis, align: Align, bounds: Rect, children: &[ChildInfo]) -> Vec<Slot> {
    let visible: Vec<_> = children.iter().filter(|c| c.visible).collect();
    let mut rects = linear(axis, align, bounds, &visible).into_iter();
    children
        .iter()
        .map(|c| match c.visible {
            true => rects.next().map_or(Slot::Skip, Slot::Place),
            false => Slot::Skip,
        })
        .collect()
}

/// Places visible children left to right.
#[derive(Debug, Clone, Copy, Default)]
pub struct Row {
    /// Vertical alignment of children that don't grow vertically.
    pub align: Align,
}

impl Layout for Row {
    fn min_size(&self, children: &[ChildInfo]) -> Vector2<i32> {
        let visible: Vec<_> = children.iter().filter(|c| c.visible).collect();
        linear_min(Axis::Horizontal, &visible)
    }

    fn layout(&self, bounds: Rect, children: &[ChildInfo]) -> Vec<Slot> {
        linear_slots(Axis::Horizontal, self.align, bounds, children)
    }
}

/// Places visible children top to bottom.
#[derive(Debug, Clone, Copy, Default)]
pub struct Column {
    /// Horizontal alignment of children that don't grow horizontally.
    pub align: Align,
}

impl Layout for Column {
    fn min_size(&self, children: &[ChildInfo]) -> Vector2<i32> {
        let visible: Vec<_> = children.iter().filter(|c| c.visible).collect();
        linear_min(Axis::Vertical, &visible)
    }

    fn layout(&self, bounds: Rect, children: &[ChildInfo]) -> Vec<Slot> {
        linear_slots(Axis::Vertical, self.align, bounds, children)
    }
}

/// Places children in grid cells given by [`LayoutProperty::Cell`].
///
/// Each column is as wide as the widest minimum in it, and each row as tall as the tallest.
/// Leftover space goes to the columns (rows) containing a horizontally (vertically) growing
/// child. Children without a cell property fill the cells in row-major order.
#[derive(Debug, Clone, Copy)]
pub struct Grid {
    pub cols: usize,
    pub rows: usize,
}

impl Grid {
    pub fn new(cols: usize, rows: usize) -> Grid {
        Grid {
            cols: cols.max(1),
            rows: rows.max(1),
        }
    }

    fn cell(&self, index: usize, property: LayoutProperty) -> (usize, usize) {
        match property {
            LayoutProperty::Cell { col, row } => (col, row),
            LayoutProperty::None => (index % self.cols, index / self.cols),
        }
    }

    /// Returns the column widths, row heights and growth flags.
    fn tracks(&self, children: &[ChildInfo]) -> (Vec<i32>, Vec<i32>, Vec<bool>, Vec<bool>) {
        let cells: Vec<_> = children
            .iter()
            .enumerate()
            .map(|(i, c)| self.cell(i, c.property))
            .collect();
        let cols = cells.iter().map(|c| c.0 + 1).max().unwrap_or(0).max(self.cols);
        let rows = cells.iter().map(|c| c.1 + 1).max().unwrap_or(0).max(self.rows);

        let mut widths = vec![0; cols];
        let mut heights = vec![0; rows];
        let mut col_grow = vec![false; cols];
        let mut row_grow = vec![false; rows];
        for (child, (col, row)) in children.iter().zip(&cells) {
            if !child.visible {
                continue;
            }
            widths[*col] = widths[*col].max(child.min.x);
            heights[*row] = heights[*row].max(child.min.y);
            col_grow[*col] |= child.grow.horizontal;
            row_grow[*row] |= child.grow.vertical;
        }
        (widths, heights, col_grow, row_grow)
    }
}

impl Layout for Grid {
    fn min_size(&self, children: &[ChildInfo]) -> Vector2<i32> {
        let (widths, heights, _, _) = self.tracks(children);
        Vector2::new(widths.iter().sum(), heights.iter().sum())
    }

    fn layout(&self, bounds: Rect, children: &[ChildInfo]) -> Vec<Slot> {
        let (widths, heights, col_grow, row_grow) = self.tracks(children);
        let widths = distribute(bounds.width(), &widths, &col_grow);
        let heights = distribute(bounds.height(), &heights, &row_grow);

        let offsets = |sizes: &[i32]| -> Vec<i32> {
            sizes
                .iter()
                .scan(0, |acc, s| {
                    let offset = *acc;
                    *acc += s;
                    Some(offset)
                })
                .collect()
        };
        let xs = offsets(&widths);
        let ys = offsets(&heights);

        children
            .iter()
            .enumerate()
            .map(|(i, child)| {
                if !child.visible {
                    return Slot::Skip;
                }
                let (col, row) = self.cell(i, child.property);
                let cell = Rect::from_xywh(
                    bounds.origin.x + xs[col],
                    bounds.origin.y + ys[row],
                    widths[col],
                    heights[row],
                );
                let (x, w) = match child.grow.horizontal {
                    true => (0, cell.width()),
                    false => (Align::Center.offset(cell.width(), child.min.x), child.min.x),
                };
                let (y, h) = match child.grow.vertical {
                    true => (0, cell.height()),
                    false => (Align::Center.offset(cell.height(), child.min.y), child.min.y),
                };
                Slot::Place(Rect::from_xywh(cell.origin.x + x, cell.origin.y + y, w, h))
            })
            .collect()
    }
}

/// Every visible child fills the whole area.
#[derive(Debug, Clone, Copy, Default)]
pub struct Single;

impl Layout for Single {
    fn min_size(&self, children: &[ChildInfo]) -> Vector2<i32> {
        children
            .iter()
            .filter(|c| c.visible)
            .fold(Vector2::new(0, 0), |acc, c| {
                Vector2::new(acc.x.max(c.min.x), acc.y.max(c.min.y))
            })
    }

    fn layout(&self, bounds: Rect, children: &[ChildInfo]) -> Vec<Slot> {
        children
            .iter()
            .map(|c| match c.visible {
                true => Slot::Place(bounds),
                false => Slot::Skip,
            })
            .collect()
    }
}

/// Shows a window of `shown` consecutive children starting at `first`, stacked vertically;
/// all other children are hidden.
#[derive(Debug, Clone, Copy)]
pub struct LimitedVisibility {
    pub shown: usize,
    pub first: usize,
}

impl LimitedVisibility {
    pub fn new(shown: usize) -> LimitedVisibility {
        LimitedVisibility { shown, first: 0 }
    }

    /// The range of children that are shown, with `first` clamped so the window stays full.
    pub fn window(&self, len: usize) -> core::ops::Range<usize> {
        let first = self.first.min(len.saturating_sub(self.shown));
        first..(first + self.shown).min(len)
    }
}

impl Layout for LimitedVisibility {
    fn min_size(&self, children: &[ChildInfo]) -> Vector2<i32> {
        let width = children.iter().map(|c| c.min.x).max().unwrap_or(0);
        let height = children.iter().map(|c| c.min.y).max().unwrap_or(0);
        let count = self.shown.min(children.len()) as i32;
        Vector2::new(width, height * count)
    }

    fn layout(&self, bounds: Rect, children: &[ChildInfo]) -> Vec<Slot> {
        let window = self.window(children.len());
        let shown: Vec<_> = children[window.clone()].iter().collect();
        let mut rects = linear(Axis::Vertical, Align::Start, bounds, &shown).into_iter();

        (0..children.len())
            .map(|i| match window.contains(&i) {
                true => rects.next().map_or(Slot::Hide, Slot::Show),
                false => Slot::Hide,
            })
            .collect()
    }
}
