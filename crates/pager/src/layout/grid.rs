use super::{FAVORITES_HEADER, Hit, Layout, NavControls, PageView};
use crate::config::{LayoutKind, Settings};
use crate::geometry::{Point, Rect, Size};
use crate::item::{BuiltinIcon, Icon, MenuItem};
use crate::paint::{
    self, BACKDROP, CELL_HIGHLIGHT, FontSize, HIGHLIGHT, PaintError, Painter, TextStyle, WHITE,
};

pub const MAX_COLUMNS: usize = 8;
pub const MAX_ROWS: usize = 3;
pub const CAPACITY: usize = MAX_COLUMNS * MAX_ROWS;

const CELL: f64 = 60.0;
const GAP: f64 = 15.0;
const LABEL_STRIP: f64 = 35.0;
const LABEL_GAP: f64 = 2.0;
const HEADER_HEIGHT: f64 = 40.0;
const PADDING: f64 = 75.0;
const SLACK_X: f64 = 60.0;
const SLACK_Y: f64 = 40.0;
const NAV_HEIGHT: f64 = 50.0;
const NAV_BOTTOM_MARGIN: f64 = 20.0;
const NAV_BUTTON: f64 = 40.0;
const NAV_EDGE_INSET: f64 = 20.0;
/// Width kept free around the centered "p / n" text.
const PAGE_TEXT_SLOT: f64 = 40.0;
const PAGE_BUTTON_GAP: f64 = 10.0;
const CAPTION_OFFSET: f64 = 30.0;
const MARKER_SIZE: f64 = 12.0;
const SUBMENU_MARKER_SIZE: f64 = 8.0;

/// Row/column shape needed for `count` items, capped at the grid capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridShape {
    pub columns: usize,
    pub rows: usize,
}

impl GridShape {
    pub fn for_count(count: usize) -> Self {
        let count = count.clamp(1, CAPACITY);
        let columns = count.min(MAX_COLUMNS);
        let rows = count.div_ceil(columns).min(MAX_ROWS);
        Self { columns, rows }
    }

    fn content_size(&self, show_labels: bool) -> Size {
        let (cols, rows) = (self.columns as f64, self.rows as f64);
        let label = if show_labels { LABEL_STRIP } else { 0.0 };
        Size::new(
            cols * CELL + (cols - 1.0) * GAP,
            rows * CELL + (rows - 1.0) * GAP + rows * label,
        )
    }
}

/// Items tiled left to right, top to bottom, with navigation along the bottom edge.
#[derive(Debug, Clone, Copy, Default)]
pub struct GridLayout;

impl GridLayout {
    fn needs_nav_strip(view: &PageView<'_>) -> bool {
        view.has_multiple_pages() || view.is_nested()
    }

    fn nav_strip(view: &PageView<'_>) -> Option<Rect> {
        Self::needs_nav_strip(view).then(|| {
            Rect::new(
                0.0,
                view.window.height - NAV_HEIGHT - NAV_BOTTOM_MARGIN,
                view.window.width,
                NAV_HEIGHT,
            )
        })
    }

    fn controls(view: &PageView<'_>) -> NavControls {
        let Some(strip) = Self::nav_strip(view) else {
            return NavControls::default();
        };
        let mid = strip.center();
        let button = |x: f64| Rect::new(x, mid.y - NAV_BUTTON / 2.0, NAV_BUTTON, NAV_BUTTON);
        let paging = view.has_multiple_pages();
        NavControls {
            back: view.is_nested().then(|| button(strip.x + NAV_EDGE_INSET)),
            previous: (paging && view.has_previous())
                .then(|| button(mid.x - PAGE_TEXT_SLOT / 2.0 - PAGE_BUTTON_GAP - NAV_BUTTON)),
            next: (paging && view.has_next())
                .then(|| button(mid.x + PAGE_TEXT_SLOT / 2.0 + PAGE_BUTTON_GAP)),
        }
    }

    /// Cell rectangles for the page, at most [`CAPACITY`] of them.
    fn cells(view: &PageView<'_>) -> Vec<Rect> {
        let shape = GridShape::for_count(view.items.len());
        let content = shape.content_size(view.settings.show_labels);
        let top = PADDING + if view.favorites_view { HEADER_HEIGHT } else { 0.0 };
        let left = view.window.width / 2.0 - content.width / 2.0;
        let row_step = CELL + GAP + if view.settings.show_labels { LABEL_STRIP } else { 0.0 };

        (0..view.items.len().min(shape.columns * shape.rows))
            .map(|i| {
                let (row, col) = (i / shape.columns, i % shape.columns);
                Rect::new(
                    left + col as f64 * (CELL + GAP),
                    top + row as f64 * row_step,
                    CELL,
                    CELL,
                )
            })
            .collect()
    }

    fn draw_cell(
        &self,
        view: &PageView<'_>,
        index: usize,
        item: &MenuItem,
        rect: Rect,
        painter: &mut dyn Painter,
    ) -> Result<(), PaintError> {
        if view.hovered == Hit::Item(index) {
            painter.fill_rect(rect, CELL_HIGHLIGHT)?;
            painter.tooltip(rect, &item.tooltip());
        }

        let icon = item
            .icon
            .clone()
            .unwrap_or(Icon::Builtin(BuiltinIcon::Fallback));
        painter.draw_icon(rect, &icon, view.item_tint(item))?;

        if view.is_favorite(item) {
            let star = Point::new(rect.max_x() - MARKER_SIZE, rect.y);
            painter.draw_text(star, "★", TextStyle::new(HIGHLIGHT, FontSize::Tiny))?;
        }

        if view.settings.show_labels {
            paint::draw_text_centered(
                painter,
                rect.center().x,
                rect.max_y() + LABEL_GAP,
                &item.label,
                TextStyle::new(WHITE, FontSize::Tiny),
            )?;
        }

        if item.has_children() {
            let marker = Rect::new(
                rect.max_x() - SUBMENU_MARKER_SIZE,
                rect.y,
                SUBMENU_MARKER_SIZE,
                SUBMENU_MARKER_SIZE,
            );
            painter.fill_rect(marker, WHITE)?;
        }
        Ok(())
    }

    fn draw_nav_strip(
        &self,
        view: &PageView<'_>,
        strip: Rect,
        painter: &mut dyn Painter,
    ) -> Result<(), PaintError> {
        let controls = Self::controls(view);
        let mid = strip.center();

        if view.has_multiple_pages() {
            let style = TextStyle::new(WHITE, FontSize::Medium);
            let text = view.page_text();
            let height = painter.text_size(&text, style).height;
            paint::draw_text_centered(painter, mid.x, mid.y - height / 2.0, &text, style)?;
        }

        let buttons = [
            (controls.back, BuiltinIcon::Close, Hit::Back),
            (controls.previous, BuiltinIcon::ArrowLeft, Hit::PreviousPage),
            (controls.next, BuiltinIcon::ArrowRight, Hit::NextPage),
        ];
        for (rect, icon, hit) in buttons {
            if let Some(rect) = rect {
                painter.draw_icon(rect, &Icon::Builtin(icon), view.control_tint(hit))?;
            }
        }
        Ok(())
    }
}

impl Layout for GridLayout {
    fn kind(&self) -> LayoutKind {
        LayoutKind::Grid
    }

    fn items_per_page(&self, settings: &Settings) -> usize {
        settings.items_per_page.clamp(1, CAPACITY)
    }

    fn window_size(&self, view: &PageView<'_>) -> Size {
        let content = GridShape::for_count(view.items.len()).content_size(view.settings.show_labels);
        let mut height = content.height + PADDING * 2.0;
        if view.favorites_view {
            height += HEADER_HEIGHT;
        }
        if Self::needs_nav_strip(view) {
            height += NAV_HEIGHT;
        }
        Size::new(
            content.width + PADDING * 2.0 + SLACK_X,
            height + SLACK_Y,
        )
    }

    fn draw(&self, view: &PageView<'_>, painter: &mut dyn Painter) -> Result<(), PaintError> {
        let bounds = Rect::new(0.0, 0.0, view.window.width, view.window.height);
        painter.fill_rect(bounds, BACKDROP)?;

        if view.favorites_view {
            paint::draw_text_centered(
                painter,
                bounds.center().x,
                PADDING,
                FAVORITES_HEADER,
                TextStyle::new(HIGHLIGHT, FontSize::Small),
            )?;
        }

        for (i, (item, rect)) in view.items.iter().zip(Self::cells(view)).enumerate() {
            self.draw_cell(view, i, item, rect, painter)?;
        }

        let strip = Self::nav_strip(view);
        if let Some(strip) = strip {
            self.draw_nav_strip(view, strip, painter)?;
        }

        if let Some(item) = view.hovered_item() {
            let above = strip.map_or(bounds.max_y() - SLACK_Y, |s| s.y);
            paint::draw_text_centered(
                painter,
                bounds.center().x,
                above - CAPTION_OFFSET,
                &view.caption(item),
                TextStyle::default(),
            )?;
        }
        Ok(())
    }

    fn hit_test(&self, view: &PageView<'_>, pointer: Point) -> Hit {
        if let Some(hit) = Self::controls(view).hit(pointer) {
            return hit;
        }
        Self::cells(view)
            .iter()
            .position(|cell| cell.contains(pointer))
            .map_or(Hit::None, Hit::Item)
    }
}
