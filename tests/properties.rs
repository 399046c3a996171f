use cgmath::Vector2;
use framekit::events::MouseButton;
use framekit::layout::{Align, Grid, LayoutProperty, Row};
use framekit::widgets::{Button, Capture, Filler, Panel, ScrollBar, Track};
use framekit::{Frame, FrameManager, Growth, Rect, Settings, UiError, WidgetId, WidgetTree};
use std::cell::Cell;
use std::rc::Rc;

fn subtree(tree: &WidgetTree, id: WidgetId, out: &mut Vec<WidgetId>) {
    out.push(id);
    for child in tree.children(id) {
        subtree(tree, *child, out);
    }
}

fn snapshot(tree: &WidgetTree, root: WidgetId) -> Vec<(WidgetId, Rect)> {
    let mut ids = Vec::new();
    subtree(tree, root, &mut ids);
    ids.into_iter().map(|id| (id, tree.bounds(id))).collect()
}

fn counting_capture(tree: &mut WidgetTree, count: &Rc<Cell<u32>>) -> WidgetId {
    let count = Rc::clone(count);
    let capture = tree.insert(Capture::new().on_click(move |_, _, _| count.set(count.get() + 1)));
    let filler = tree.insert(Filler::new(50, 50));
    tree.add_child(capture, filler).unwrap();
    capture
}

/// A frame with some nested content.
fn sample_frame(tree: &mut WidgetTree) -> (WidgetId, WidgetId) {
    let frame = Frame::create(tree, "Sample", 500, 400);
    let content = tree.insert(Panel::grid(2, 3));
    for i in 0..4 {
        let child = tree.insert(Filler::new(40 + 10 * i, 30));
        if i % 2 == 0 {
            tree.set_growth(child, Growth::NONE);
        }
        tree.add_child(content, child).unwrap();
    }
    let leaf = tree.insert(Button::new("deep"));
    let row = tree.insert(Panel::row());
    tree.add_child(row, leaf).unwrap();
    tree.add_child(content, row).unwrap();
    Frame::set_main_panel(tree, frame, content).unwrap();
    (frame, leaf)
}

#[test]
fn layout_is_idempotent() {
    let mut tree = WidgetTree::new();
    let (frame, leaf) = sample_frame(&mut tree);

    tree.validate_layout(frame);
    let first = snapshot(&tree, frame);
    tree.validate_layout(frame);
    assert_eq!(snapshot(&tree, frame), first);

    tree.invalidate_layout(leaf);
    tree.validate_layout(frame);
    assert_eq!(snapshot(&tree, frame), first);
}

#[test]
fn invalidation_reaches_every_ancestor() {
    let mut tree = WidgetTree::new();
    let (frame, leaf) = sample_frame(&mut tree);
    tree.validate_layout(frame);

    let mut ancestors = Vec::new();
    let mut current = tree.parent(leaf);
    while let Some(id) = current {
        ancestors.push(id);
        current = tree.parent(id);
    }
    assert_eq!(ancestors.last(), Some(&frame));

    tree.invalidate_layout(leaf);
    assert!(!tree.is_layout_valid(leaf));
    for ancestor in &ancestors {
        assert!(!tree.is_layout_valid(*ancestor));
    }

    // validating the leaf alone leaves its ancestors invalid
    tree.validate_layout(leaf);
    assert!(tree.is_layout_valid(leaf));
    for ancestor in &ancestors {
        assert!(!tree.is_layout_valid(*ancestor));
    }
}

#[test]
fn children_never_get_less_than_their_minimum() {
    let containers = vec![Panel::row(), Panel::column(), Panel::grid(2, 2), Panel::single()];
    for container in containers {
        let mut tree = WidgetTree::new();
        let panel = tree.insert(container);
        let children: Vec<_> = [(100, 20), (30, 60), (70, 10), (10, 10)]
            .iter()
            .map(|(w, h)| tree.insert(Filler::new(*w, *h)))
            .collect();
        tree.add_children(panel, &children).unwrap();

        // smaller than the minimum; the panel is clamped
        tree.set_size(panel, 5, 5);
        tree.validate_layout(panel);

        for child in &children {
            if !tree.is_visible(*child) {
                continue;
            }
            let min = tree.min_size(*child);
            let size = tree.size(*child);
            assert!(size.x >= min.x && size.y >= min.y, "{:?} < {:?}", size, min);
        }
    }
}

#[test]
fn leftover_width_goes_to_growing_child() {
    let mut tree = WidgetTree::new();
    let row = tree.insert(Panel::new(Row { align: Align::Start }));
    let children: Vec<_> = (0..3).map(|_| tree.insert(Filler::new(50, 20))).collect();
    tree.set_growth(children[0], Growth::NONE);
    tree.set_growth(children[1], Growth::BOTH);
    tree.set_growth(children[2], Growth::NONE);
    tree.add_children(row, &children).unwrap();
    tree.set_size(row, 300, 20);
    tree.validate_layout(row);

    let widths: Vec<_> = children.iter().map(|c| tree.size(*c).x).collect();
    assert_eq!(widths, vec![50, 200, 50]);
    let xs: Vec<_> = children.iter().map(|c| tree.position(*c).x).collect();
    assert_eq!(xs, vec![0, 50, 250]);
}

#[test]
fn scrollbar_offset_round_trips_to_index() {
    let mut tree = WidgetTree::new();
    let scrollbar = ScrollBar::create(&mut tree, 10, 3);
    tree.set_size(scrollbar, 30, 300);
    tree.validate_layout(scrollbar);

    tree.update::<ScrollBar, _>(scrollbar, |bar| bar.set_index(4)).unwrap();
    tree.validate_layout(scrollbar);
    let bar = tree.widget::<ScrollBar>(scrollbar).unwrap();
    let track = bar.track();
    let offset = track.offset_for(bar.bar_fraction());
    let index = track.index_at(track.fraction_at(offset));
    assert!((index as i32 - 4).abs() <= 1, "got index {}", index);

    // the drag bar part sits at that offset
    let part = tree.children(scrollbar)[1];
    assert_eq!(tree.position(part).y, offset);

    let track = Track {
        height: 300,
        total: 10,
        shown: 3,
    };
    for index in 0..=track.max_index() {
        let offset = track.offset_for(track.fraction_of(index));
        let back = track.index_at(track.fraction_at(offset));
        assert!((back as i32 - index as i32).abs() <= 1);
    }
}

#[test]
fn modal_capture_is_one_shot() {
    let mut manager = FrameManager::new(&Settings::default());
    let frame = Frame::create(manager.tree_mut(), "Below", 300, 300);
    manager.add_frame(frame, 0, 0).unwrap();
    let frame_clicks = Rc::new(Cell::new(0));
    let body = counting_capture(manager.tree_mut(), &frame_clicks);
    Frame::set_main_panel(manager.tree_mut(), frame, body).unwrap();

    let modal_clicks = Rc::new(Cell::new(0));
    let modal = counting_capture(manager.tree_mut(), &modal_clicks);
    manager.tree_mut().set_position(modal, cgmath::Point2::new(600, 600));
    manager.tree_mut().set_size(modal, 100, 100);
    manager.set_modal(modal);

    // misses the modal component, lands on the frame's body
    assert!(manager.check_mouse_click(MouseButton::Left, 150, 150));
    assert_eq!(modal_clicks.get(), 0);
    assert_eq!(frame_clicks.get(), 0);
    assert_eq!(manager.modal(), None);
    assert!(!manager.tree().is_visible(modal));

    // the next click is handled normally
    manager.check_mouse_click(MouseButton::Left, 150, 150);
    assert_eq!(frame_clicks.get(), 1);
}

#[test]
fn focus_moves_frame_to_front() {
    let mut manager = FrameManager::new(&Settings::default());
    let mut frame = |name: &str| {
        let frame = Frame::create(manager.tree_mut(), name, 100, 100);
        manager.add_frame(frame, 0, 0).unwrap();
        frame
    };
    let a = frame("A");
    let b = frame("B");
    let c = frame("C");

    manager.focus(a).unwrap();
    assert_eq!(manager.frames().collect::<Vec<_>>(), vec![a, c, b]);
}

#[test]
fn disposed_frames_cannot_be_focused() {
    let mut manager = FrameManager::new(&Settings::default());
    let a = Frame::create(manager.tree_mut(), "A", 100, 100);
    let b = Frame::create(manager.tree_mut(), "B", 100, 100);
    manager.add_frame(a, 0, 0).unwrap();
    manager.add_frame(b, 0, 0).unwrap();

    manager.dispose(a).unwrap();
    let before: Vec<_> = manager.frames().collect();
    assert_eq!(before, vec![b]);
    assert_eq!(manager.focus(a), Err(UiError::FrameDisposed(a)));
    assert_eq!(manager.frames().collect::<Vec<_>>(), before);
    assert_eq!(manager.add_frame(a, 0, 0), Err(UiError::FrameDisposed(a)));

    // disposed through the frame itself, before the manager noticed
    Frame::dispose(manager.tree_mut(), b).unwrap();
    assert_eq!(manager.focus(b), Err(UiError::FrameDisposed(b)));
    assert_eq!(manager.frames().collect::<Vec<_>>(), vec![b]);
}

#[test]
fn overlap_goes_to_front_frame() {
    let mut manager = FrameManager::new(&Settings::default());
    let mut frame = |x, y| {
        let frame = Frame::create(manager.tree_mut(), "overlap", 200, 200);
        let clicks = Rc::new(Cell::new(0));
        let body = counting_capture(manager.tree_mut(), &clicks);
        Frame::set_main_panel(manager.tree_mut(), frame, body).unwrap();
        manager.add_frame(frame, x, y).unwrap();
        (frame, clicks)
    };
    let (a, a_clicks) = frame(0, 0);
    let (b, b_clicks) = frame(100, 100);

    manager.check_mouse_click(MouseButton::Left, 150, 170);
    assert_eq!((a_clicks.get(), b_clicks.get()), (0, 1));

    // clicking the part of A that is not covered focuses A
    manager.check_mouse_click(MouseButton::Left, 50, 70);
    assert_eq!(manager.frames().next(), Some(a));
    assert_eq!((a_clicks.get(), b_clicks.get()), (1, 1));

    manager.check_mouse_click(MouseButton::Left, 150, 170);
    assert_eq!((a_clicks.get(), b_clicks.get()), (2, 1));
    assert_eq!(manager.frames().collect::<Vec<_>>(), vec![a, b]);
}

#[test]
fn scroll_input_accumulates() {
    let mut tree = WidgetTree::new();
    let scrollbar = ScrollBar::create(&mut tree, 10, 3);
    tree.update::<ScrollBar, _>(scrollbar, |bar| bar.set_index(3)).unwrap();

    for _ in 0..4 {
        tree.update::<ScrollBar, _>(scrollbar, |bar| bar.scroll(0.3)).unwrap();
    }
    let bar = tree.widget::<ScrollBar>(scrollbar).unwrap();
    assert_eq!(bar.index(), 2);
    assert!((bar.scroll_remainder() - 0.2).abs() < 1e-4);

    // one batch of 1.2 does the same
    let other = ScrollBar::create(&mut tree, 10, 3);
    tree.update::<ScrollBar, _>(other, |bar| {
        bar.set_index(3);
        bar.scroll(1.2);
    })
    .unwrap();
    let bar = tree.widget::<ScrollBar>(other).unwrap();
    assert_eq!(bar.index(), 2);
    assert!((bar.scroll_remainder() - 0.2).abs() < 1e-4);
}

#[test]
fn grid_cells_follow_layout_properties() {
    let mut tree = WidgetTree::new();
    let grid = tree.insert(Panel::new(Grid::new(2, 2)));
    let a = tree.insert(Filler::new(40, 20));
    let b = tree.insert(Filler::new(40, 20));
    tree.add_child_with(grid, a, LayoutProperty::Cell { col: 1, row: 1 })
        .unwrap();
    tree.add_child_with(grid, b, LayoutProperty::Cell { col: 0, row: 0 })
        .unwrap();
    tree.set_size(grid, 80, 40);
    tree.validate_layout(grid);

    assert_eq!(tree.position(b), cgmath::Point2::new(0, 0));
    assert_eq!(tree.position(a), cgmath::Point2::new(40, 20));
    assert_eq!(tree.size(grid), Vector2::new(80, 40));
}
