use super::{FAVORITES_HEADER, Hit, Layout, NavControls, PageView};
use crate::config::{LayoutKind, Settings};
use crate::geometry::{Point, Rect, Size, inverse_lerp, lerp};
use crate::item::{BuiltinIcon, Icon, MenuItem};
use crate::paint::{
    self, BACKDROP, FontSize, HIGHLIGHT, PaintError, Painter, TextStyle, WHITE,
};

pub const LABEL_HEIGHT: f64 = 22.0;
pub const PAGE_INDICATOR_HEIGHT: f64 = 20.0;
const RING_MARGIN: f64 = 30.0;
const WINDOW_PADDING: f64 = 10.0;
const START_ANGLE: f64 = -90.0;
const PREV_OFFSET: Point = Point { x: -60.0, y: 18.0 };
const NEXT_OFFSET: Point = Point { x: 40.0, y: 18.0 };
const MARKER_SIZE: f64 = 12.0;
const SUBMENU_MARKER_SIZE: f64 = 8.0;

/// Sizes derived from the number of items on the page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingMetrics {
    pub space_per_item: f64,
    pub radius: f64,
    pub item_size: f64,
}

impl RingMetrics {
    /// More items pack denser (less space each, smaller icons) while the ring still grows.
    pub fn for_count(settings: &Settings, n: usize) -> Self {
        let t = inverse_lerp(
            settings.min_page_count as f64,
            settings.max_page_count as f64,
            n as f64,
        );
        let space_per_item = lerp(settings.max_space_per_item, settings.min_space_per_item, t);
        let item_size = lerp(settings.max_item_size, settings.min_item_size, t);
        Self {
            space_per_item,
            radius: settings.base_radius + n as f64 * space_per_item,
            item_size,
        }
    }
}

/// Items evenly spaced on a circle, clockwise from the top.
#[derive(Debug, Clone, Copy, Default)]
pub struct RadialLayout;

impl RadialLayout {
    pub fn angle(index: usize, count: usize) -> f64 {
        (360.0 / count.max(1) as f64) * index as f64 + START_ANGLE
    }

    fn center(view: &PageView<'_>) -> Point {
        Point::new(view.window.width / 2.0, view.window.height / 2.0)
    }

    fn item_center(view: &PageView<'_>, metrics: &RingMetrics, index: usize) -> Point {
        Self::center(view).polar_offset(Self::angle(index, view.items.len()), metrics.radius)
    }

    fn controls(view: &PageView<'_>) -> NavControls {
        let center = Self::center(view);
        let nav = Size::square(view.settings.nav_button_size);
        let at = |offset: Point| {
            let origin = center + offset;
            Rect::new(origin.x, origin.y, nav.width, nav.height)
        };
        NavControls {
            back: view.is_nested().then(|| {
                Rect::centered(center, Size::square(view.settings.back_button_size))
            }),
            previous: (view.has_multiple_pages() && view.has_previous()).then(|| at(PREV_OFFSET)),
            next: (view.has_multiple_pages() && view.has_next()).then(|| at(NEXT_OFFSET)),
        }
    }

    fn draw_item(
        &self,
        view: &PageView<'_>,
        metrics: &RingMetrics,
        index: usize,
        item: &MenuItem,
        painter: &mut dyn Painter,
    ) -> Result<(), PaintError> {
        let pos = Self::item_center(view, metrics, index);
        let hovered = view.hovered == Hit::Item(index);
        let scale = if hovered {
            view.settings.hover_size_multiplier
        } else {
            1.0
        };
        let size = metrics.item_size * scale;
        let rect = Rect::centered(pos, Size::square(size));

        let tint = if hovered { HIGHLIGHT } else { view.item_tint(item) };
        if hovered {
            painter.tooltip(rect, &item.tooltip());
        }
        let icon = item
            .icon
            .clone()
            .unwrap_or(Icon::Builtin(BuiltinIcon::Fallback));
        painter.draw_icon(rect, &icon, tint)?;

        if view.is_favorite(item) {
            let star = Point::new(rect.max_x() - MARKER_SIZE, rect.y);
            painter.draw_text(star, "★", TextStyle::new(HIGHLIGHT, FontSize::Tiny))?;
        }

        if view.settings.show_labels {
            paint::draw_text_centered(
                painter,
                pos.x,
                rect.max_y() + 5.0,
                &item.label,
                TextStyle::default(),
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

    fn draw_controls(
        &self,
        view: &PageView<'_>,
        painter: &mut dyn Painter,
    ) -> Result<(), PaintError> {
        let center = Self::center(view);
        let controls = Self::controls(view);

        if let Some(back) = controls.back {
            // the hub previews the hovered item's icon while nested
            let icon = view
                .hovered_item()
                .and_then(|item| item.icon.clone())
                .unwrap_or(Icon::Builtin(BuiltinIcon::Close));
            painter.draw_icon(back, &icon, view.control_tint(Hit::Back))?;
        }

        if view.has_multiple_pages() {
            paint::draw_text_centered(
                painter,
                center.x,
                center.y + 20.0,
                &view.page_text(),
                TextStyle::default(),
            )?;
            if let Some(prev) = controls.previous {
                let icon = Icon::Builtin(BuiltinIcon::ArrowLeft);
                painter.draw_icon(prev, &icon, view.control_tint(Hit::PreviousPage))?;
            }
            if let Some(next) = controls.next {
                let icon = Icon::Builtin(BuiltinIcon::ArrowRight);
                painter.draw_icon(next, &icon, view.control_tint(Hit::NextPage))?;
            }
        }
        Ok(())
    }
}

impl Layout for RadialLayout {
    fn kind(&self) -> LayoutKind {
        LayoutKind::Radial
    }

    fn items_per_page(&self, settings: &Settings) -> usize {
        settings.items_per_page.max(1)
    }

    fn window_size(&self, view: &PageView<'_>) -> Size {
        let metrics = RingMetrics::for_count(view.settings, view.items.len());
        let page_indicator = if view.has_multiple_pages() {
            PAGE_INDICATOR_HEIGHT
        } else {
            0.0
        };
        let extent =
            metrics.radius + metrics.item_size / 2.0 + LABEL_HEIGHT + page_indicator + RING_MARGIN;
        Size::square(extent * 2.0 + WINDOW_PADDING)
    }

    fn draw(&self, view: &PageView<'_>, painter: &mut dyn Painter) -> Result<(), PaintError> {
        let metrics = RingMetrics::for_count(view.settings, view.items.len());
        let center = Self::center(view);

        painter.fill_circle(center, metrics.radius + metrics.item_size / 2.0, BACKDROP)?;

        for (i, item) in view.items.iter().enumerate() {
            self.draw_item(view, &metrics, i, item, painter)?;
        }

        self.draw_controls(view, painter)?;

        if let Some(item) = view.hovered_item() {
            let offset = if view.has_multiple_pages() { 40.0 } else { 20.0 };
            paint::draw_text_centered(
                painter,
                center.x,
                center.y + offset,
                &view.caption(item),
                TextStyle::default(),
            )?;
        }

        if view.favorites_view {
            paint::draw_text_centered(
                painter,
                center.x,
                center.y - metrics.radius - RING_MARGIN,
                FAVORITES_HEADER,
                TextStyle::new(HIGHLIGHT, FontSize::Small),
            )?;
        }
        Ok(())
    }

    fn hit_test(&self, view: &PageView<'_>, pointer: Point) -> Hit {
        if let Some(hit) = Self::controls(view).hit(pointer) {
            return hit;
        }

        let metrics = RingMetrics::for_count(view.settings, view.items.len());
        (0..view.items.len())
            .find(|&i| {
                Rect::centered(
                    Self::item_center(view, &metrics, i),
                    Size::square(metrics.item_size),
                )
                .contains(pointer)
            })
            .map_or(Hit::None, Hit::Item)
    }
}
