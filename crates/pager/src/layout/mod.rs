use crate::config::{LayoutKind, Settings};
use crate::favorites::{ActorId, FavoritesStore};
use crate::geometry::{Point, Rect, Size};
use crate::item::MenuItem;
use crate::paint::{GRAY, HIGHLIGHT, PaintError, Painter, Rgba, WHITE};

pub mod grid;
pub mod radial;

pub use grid::GridLayout;
pub use radial::RadialLayout;

pub const FAVORITES_HEADER: &str = "Favorites Menu";

/// What the pointer is over. Maps onto the host's integer contract through [`Hit::index`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Hit {
    #[default]
    None,
    Item(usize),
    Back,
    PreviousPage,
    NextPage,
}

impl Hit {
    pub fn index(self) -> i32 {
        match self {
            Self::Item(i) => i as i32,
            Self::None => -1,
            Self::Back => -2,
            Self::PreviousPage => -3,
            Self::NextPage => -4,
        }
    }

    pub fn from_index(index: i32) -> Self {
        match index {
            i if i >= 0 => Self::Item(i as usize),
            -2 => Self::Back,
            -3 => Self::PreviousPage,
            -4 => Self::NextPage,
            _ => Self::None,
        }
    }

    pub fn item(self) -> Option<usize> {
        match self {
            Self::Item(i) => Some(i),
            _ => None,
        }
    }
}

/// Read-only snapshot of the controller state a layout needs for one frame.
pub struct PageView<'a> {
    pub items: &'a [MenuItem],
    pub page: usize,
    pub total_pages: usize,
    pub depth: usize,
    pub hovered: Hit,
    pub favorites_view: bool,
    pub settings: &'a Settings,
    /// Window-local size the frame is drawn into.
    pub window: Size,
    pub favorites: Option<(&'a FavoritesStore, &'a ActorId)>,
}

impl PageView<'_> {
    pub fn has_multiple_pages(&self) -> bool {
        self.total_pages > 1
    }

    pub fn has_previous(&self) -> bool {
        self.page > 0
    }

    pub fn has_next(&self) -> bool {
        self.page + 1 < self.total_pages
    }

    pub fn is_nested(&self) -> bool {
        self.depth > 0
    }

    pub fn hovered_item(&self) -> Option<&MenuItem> {
        self.hovered.item().and_then(|i| self.items.get(i))
    }

    pub fn is_favorite(&self, item: &MenuItem) -> bool {
        match (self.favorites, &item.favorite_key) {
            (Some((store, actor)), Some(key)) => item.is_favoritable() && store.is_favorite(actor, key),
            _ => false,
        }
    }

    pub fn page_text(&self) -> String {
        format!("{} / {}", self.page + 1, self.total_pages.max(1))
    }

    /// Caption for the hovered item: label, disabled reason and favorite hint.
    pub fn caption(&self, item: &MenuItem) -> String {
        let mut text = match item.disabled_reason() {
            Some(reason) => format!("{} ({})", item.label, reason),
            None => item.label.clone(),
        };
        if item.is_favoritable() && self.favorites.is_some() {
            text.push_str(if self.is_favorite(item) {
                " ★"
            } else {
                " (Right-click to favorite)"
            });
        }
        text
    }

    pub fn item_tint(&self, item: &MenuItem) -> Rgba {
        if !item.is_enabled() {
            GRAY
        } else {
            item.color.unwrap_or(WHITE)
        }
    }

    pub fn control_tint(&self, hit: Hit) -> Rgba {
        if self.hovered == hit { HIGHLIGHT } else { WHITE }
    }
}

/// Rectangles of the navigation controls that exist on the current page.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NavControls {
    pub back: Option<Rect>,
    pub previous: Option<Rect>,
    pub next: Option<Rect>,
}

impl NavControls {
    /// Controls are checked back, previous, next; callers test these before any item.
    pub fn hit(&self, pointer: Point) -> Option<Hit> {
        [
            (self.back, Hit::Back),
            (self.previous, Hit::PreviousPage),
            (self.next, Hit::NextPage),
        ]
        .into_iter()
        .find_map(|(rect, hit)| rect.filter(|r| r.contains(pointer)).map(|_| hit))
    }
}

pub trait Layout {
    fn kind(&self) -> LayoutKind;

    fn items_per_page(&self, settings: &Settings) -> usize;

    fn window_size(&self, view: &PageView<'_>) -> Size;

    fn draw(&self, view: &PageView<'_>, painter: &mut dyn Painter) -> Result<(), PaintError>;

    /// Pointer is window-local. Navigation controls always win over items.
    fn hit_test(&self, view: &PageView<'_>, pointer: Point) -> Hit;
}

impl LayoutKind {
    pub fn build(self) -> Box<dyn Layout> {
        match self {
            Self::Radial => Box::new(RadialLayout),
            Self::Grid => Box::new(GridLayout),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinel_contract() {
        assert_eq!(Hit::None.index(), -1);
        assert_eq!(Hit::Back.index(), -2);
        assert_eq!(Hit::PreviousPage.index(), -3);
        assert_eq!(Hit::NextPage.index(), -4);
        assert_eq!(Hit::Item(7).index(), 7);

        for i in -4..10 {
            assert_eq!(Hit::from_index(i).index(), i);
        }
        assert_eq!(Hit::from_index(-9), Hit::None);
    }

    #[test]
    fn test_nav_controls_order() {
        let overlap = Rect::new(0.0, 0.0, 10.0, 10.0);
        let controls = NavControls {
            back: Some(overlap),
            previous: Some(overlap),
            next: None,
        };
        assert_eq!(controls.hit(Point::new(5.0, 5.0)), Some(Hit::Back));
        assert_eq!(controls.hit(Point::new(50.0, 5.0)), None);
    }

    #[test]
    fn test_layout_kind_builds_matching_strategy() {
        assert_eq!(LayoutKind::Radial.build().kind(), LayoutKind::Radial);
        assert_eq!(LayoutKind::Grid.build().kind(), LayoutKind::Grid);
    }
}
