use std::ops::Range;

/// Fixed height of one image row in the list, in points.
pub const ITEM_HEIGHT: f32 = 74.0;
/// Rows rendered beyond each edge of the viewport.
pub const OVERSCAN_ROWS: usize = 2;

/// Rows of the catalog that get rendered for the current scroll position.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderWindow {
    pub start_index: usize,
    pub visible_count: usize,
    pub render_start: usize,
    pub render_end: usize,
}

impl RenderWindow {
    pub fn compute(
        scroll_offset: f32,
        container_height: f32,
        item_height: f32,
        len: usize,
    ) -> Self {
        let scroll_offset = sanitize(scroll_offset);
        let container_height = sanitize(container_height);
        if item_height <= 0.0 || !item_height.is_finite() {
            return Self::default();
        }
        let start_index = (scroll_offset / item_height).floor() as usize;
        let visible_count = (container_height / item_height).ceil() as usize;
        let render_start = start_index.saturating_sub(OVERSCAN_ROWS);
        let render_end = len.min(
            start_index
                .saturating_add(visible_count)
                .saturating_add(OVERSCAN_ROWS),
        );
        Self {
            start_index,
            visible_count,
            render_start: render_start.min(render_end),
            render_end,
        }
    }

    pub fn rows(&self) -> Range<usize> {
        self.render_start..self.render_end
    }

    pub fn is_empty(&self) -> bool {
        self.render_start >= self.render_end
    }
}

fn sanitize(value: f32) -> f32 {
    if value.is_finite() {
        value.max(0.0)
    } else {
        0.0
    }
}

/// Scroll geometry of the virtualized image list.
///
/// The window is recomputed only when the scroll offset, the observed
/// container height or the catalog length changes.
#[derive(Debug)]
pub struct ListViewport {
    item_height: f32,
    scroll_offset: f32,
    container_height: f32,
    len: usize,
    window: RenderWindow,
}

impl Default for ListViewport {
    fn default() -> Self {
        Self::new(ITEM_HEIGHT)
    }
}

impl ListViewport {
    pub fn new(item_height: f32) -> Self {
        Self {
            item_height,
            scroll_offset: 0.0,
            container_height: 0.0,
            len: 0,
            window: RenderWindow::default(),
        }
    }

    /// Feeds the scroll offset and container height measured this frame.
    /// Returns true when the render window moved.
    pub fn observe(&mut self, scroll_offset: f32, container_height: f32) -> bool {
        if scroll_offset == self.scroll_offset && container_height == self.container_height {
            return false;
        }
        self.scroll_offset = scroll_offset;
        self.container_height = container_height;
        self.recompute()
    }

    /// Catalog length changed.
    pub fn set_len(&mut self, len: usize) -> bool {
        if len == self.len {
            return false;
        }
        self.len = len;
        self.recompute()
    }

    fn recompute(&mut self) -> bool {
        let window = RenderWindow::compute(
            self.scroll_offset,
            self.container_height,
            self.item_height,
            self.len,
        );
        let moved = window != self.window;
        self.window = window;
        moved
    }

    pub fn window(&self) -> RenderWindow {
        self.window
    }

    pub fn item_height(&self) -> f32 {
        self.item_height
    }

    pub fn len(&self) -> usize {
        self.len
    }

    /// Height of the spacer that gives the scrollbar the full list length.
    pub fn content_height(&self) -> f32 {
        self.len as f32 * self.item_height
    }

    /// Offset of row `index` from the top of the spacer.
    pub fn row_top(&self, index: usize) -> f32 {
        index as f32 * self.item_height
    }
}

/// Shortcuts read once per frame.
#[derive(Default, Debug, Clone, Copy)]
pub struct KeyboardState {
    pub toggle_all: bool,
    pub remove_selected: bool,
    pub dismiss: bool,
}
