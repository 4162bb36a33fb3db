use geostamp::session::Session;
use geostamp::ui::{ListViewport, RenderWindow, ITEM_HEIGHT, OVERSCAN_ROWS};

#[test]
fn mid_list_window_includes_overscan() {
    let window = RenderWindow::compute(740.0, 500.0, ITEM_HEIGHT, 1000);
    assert_eq!(window.start_index, 10);
    assert_eq!(window.visible_count, 7);
    assert_eq!(window.render_start, 8);
    assert_eq!(window.render_end, 19);
    assert_eq!(window.rows().len(), 7 + 2 * OVERSCAN_ROWS);
}

#[test]
fn window_is_clamped_to_list_end() {
    let window = RenderWindow::compute(74.0 * 98.0, 500.0, ITEM_HEIGHT, 100);
    assert_eq!(window.render_start, 96);
    assert_eq!(window.render_end, 100);
}

#[test]
fn scroll_past_end_renders_nothing() {
    let window = RenderWindow::compute(74.0 * 500.0, 500.0, ITEM_HEIGHT, 10);
    assert!(window.is_empty());
    assert!(window.render_start <= window.render_end);
}

#[test]
fn empty_list_renders_nothing() {
    let window = RenderWindow::compute(0.0, 500.0, ITEM_HEIGHT, 0);
    assert!(window.is_empty());
}

#[test]
fn zero_height_container_still_renders_overscan() {
    let window = RenderWindow::compute(0.0, 0.0, ITEM_HEIGHT, 50);
    assert_eq!(window.visible_count, 0);
    assert_eq!(window.rows(), 0..2);
}

#[test]
fn observe_recomputes_only_on_change() {
    let mut viewport = ListViewport::default();
    viewport.set_len(1000);
    assert!(viewport.observe(0.0, 500.0));
    assert!(!viewport.observe(0.0, 500.0));
    assert!(viewport.observe(740.0, 500.0));
    assert_eq!(viewport.window().rows(), 8..19);
    // a small scroll inside the same row keeps the window
    assert!(!viewport.observe(750.0, 500.0));
}

#[test]
fn set_len_shrinks_window() {
    let mut viewport = ListViewport::default();
    viewport.set_len(1000);
    viewport.observe(740.0, 500.0);
    assert!(viewport.set_len(12));
    assert_eq!(viewport.window().rows(), 8..12);
    assert!(!viewport.set_len(12));
    assert_eq!(viewport.content_height(), 12.0 * ITEM_HEIGHT);
    assert_eq!(viewport.row_top(3), 3.0 * ITEM_HEIGHT);
}

#[test]
fn session_updates_viewport_length() {
    let mut session = Session::new();
    session.viewport.observe(0.0, 500.0);
    session.add_paths((0..30).map(|i| format!("/img/{i}.jpg")));
    assert_eq!(session.viewport.len(), 30);
    assert_eq!(session.viewport.window().rows(), 0..9);
}
