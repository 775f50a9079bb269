//! Navigation state machine behind an open menu.
//!
//! A controller owns the current item list, the stack of parent lists it descended
//! from and the page cursor. The host feeds it pointer positions through [`MenuController::frame`]
//! and discrete inputs through [`MenuController::handle`]; drawing and hit-testing are
//! delegated to the [`Layout`] it was opened with.

use crate::config::Settings;
use crate::favorites::{ActorId, SharedFavorites};
use crate::geometry::{Point, Rect, Size};
use crate::item::{self, MenuItem};
use crate::layout::{Hit, Layout, PageView};
use crate::paint::{PaintError, Painter};

/// Everything a menu needs from its surroundings, injected at open time.
#[derive(Debug, Clone)]
pub struct MenuContext {
    /// Owner of the favorites shown and toggled; `None` disables favoriting.
    pub actor: Option<ActorId>,
    pub favorites: SharedFavorites,
    pub settings: Settings,
}

impl MenuContext {
    pub fn new(actor: Option<ActorId>, favorites: SharedFavorites, settings: Settings) -> Self {
        Self {
            actor,
            favorites,
            settings,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuInput {
    /// Left click.
    Primary,
    /// Right click.
    Secondary,
    /// Escape.
    Cancel,
    /// The open-menu key pressed while a menu is already up.
    ToggleMenu,
    NextPageKey,
    PreviousPageKey,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    /// Informational, shown without a sound cue.
    Silent,
    /// The request could not be honoured.
    Rejected,
}

/// Short message for the host to surface to the player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub text: String,
    pub kind: NoticeKind,
}

impl Notice {
    pub fn silent(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: NoticeKind::Silent,
        }
    }

    pub fn rejected(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: NoticeKind::Rejected,
        }
    }
}

/// Outcome of [`MenuController::handle`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Response {
    /// The input was meant for the menu and must not reach the host.
    pub consumed: bool,
    pub notice: Option<Notice>,
}

impl Response {
    fn consumed() -> Self {
        Self {
            consumed: true,
            notice: None,
        }
    }

    fn ignored() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameUpdate {
    pub redraw: bool,
    pub resized: bool,
}

impl FrameUpdate {
    pub fn new(redraw: bool, resized: bool) -> Self {
        Self { redraw, resized }
    }
}

pub struct MenuController {
    context: MenuContext,
    layout: Box<dyn Layout>,
    favorites_view: bool,
    items: Vec<MenuItem>,
    stack: Vec<(Vec<MenuItem>, usize)>,
    page: usize,
    page_items: Vec<MenuItem>,
    hovered: Hit,
    pointer: Option<Point>,
    screen: Size,
    window: Rect,
    resized: bool,
    open: bool,
}

impl MenuController {
    pub fn open(
        items: Vec<MenuItem>,
        favorites_view: bool,
        context: MenuContext,
        layout: Box<dyn Layout>,
        screen: Size,
    ) -> Self {
        let mut controller = Self {
            context,
            layout,
            favorites_view,
            items: Vec::new(),
            stack: Vec::new(),
            page: 0,
            page_items: Vec::new(),
            hovered: Hit::None,
            pointer: None,
            screen,
            window: Rect::default(),
            resized: false,
            open: true,
        };
        controller.install(items);
        controller.resized = false;
        log::debug!(
            "Menu opened with {} items ({} layout)",
            controller.items.len(),
            controller.layout.kind()
        );
        controller
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn close(&mut self) {
        if self.open {
            log::debug!("Menu closed");
        }
        self.open = false;
        self.hovered = Hit::None;
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn items_per_page(&self) -> usize {
        self.layout.items_per_page(&self.context.settings).max(1)
    }

    pub fn total_pages(&self) -> usize {
        self.items.len().div_ceil(self.items_per_page())
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    pub fn page_items(&self) -> &[MenuItem] {
        &self.page_items
    }

    pub fn hovered(&self) -> Hit {
        self.hovered
    }

    pub fn is_favorites_view(&self) -> bool {
        self.favorites_view
    }

    pub fn context(&self) -> &MenuContext {
        &self.context
    }

    /// Screen-space rectangle the menu currently occupies.
    pub fn window(&self) -> Rect {
        self.window
    }

    /// Window center: the screen center raised by `height_offset`.
    pub fn anchor(&self) -> Point {
        Point::new(
            self.screen.width / 2.0,
            self.screen.height / 2.0 - self.context.settings.height_offset,
        )
    }

    pub fn descend(&mut self, items: Vec<MenuItem>) {
        if items.is_empty() {
            log::debug!("Ignoring descend into an empty list");
            return;
        }
        let parent = std::mem::take(&mut self.items);
        self.stack.push((parent, self.page));
        self.install(items);
        log::debug!("Descended to depth {}", self.depth());
    }

    /// Steps back to the parent list, or closes the menu at the root.
    pub fn ascend(&mut self) {
        match self.stack.pop() {
            Some((items, page)) => {
                self.items = items;
                self.page = page.min(self.total_pages().saturating_sub(1));
                self.refresh_page();
                log::debug!("Ascended to depth {}", self.depth());
            }
            None => self.close(),
        }
    }

    pub fn activate(&mut self, index: usize) {
        let Some(item) = self.page_items.get(index).cloned() else {
            return;
        };
        if !item.is_enabled() {
            log::debug!(
                "'{}' is disabled: {}",
                item.label,
                item.disabled_reason().unwrap_or_default()
            );
            return;
        }
        if item.has_children() {
            self.descend(item.resolve_children());
        } else if item.invoke() {
            log::debug!("Activated '{}'", item.label);
            self.close();
        }
    }

    /// Flips the favorite state of a page item. Navigation is left untouched.
    pub fn toggle_favorite(&mut self, index: usize) -> Option<Notice> {
        let item = self.page_items.get(index)?;
        if !item.is_favoritable() {
            return None;
        }
        let actor = self.context.actor.as_ref()?;
        let key = item.favorite_key.as_ref()?;

        let added = self.context.favorites.borrow_mut().toggle(actor, key);
        let verb = if added { "added to" } else { "removed from" };
        log::info!("'{}' {} favorites of {}", item.label, verb, actor);
        Some(Notice::silent(format!("{} {} favorites.", item.label, verb)))
    }

    pub fn previous_page(&mut self) {
        if self.page > 0 {
            self.page -= 1;
            self.refresh_page();
        }
    }

    pub fn next_page(&mut self) {
        if self.page + 1 < self.total_pages() {
            self.page += 1;
            self.refresh_page();
        }
    }

    /// What lies under a screen-space pointer.
    pub fn hit_test(&self, pointer: Point) -> Hit {
        let local = pointer - self.window.origin();
        self.with_view(|layout, view| layout.hit_test(view, local))
    }

    /// Per-frame poll: updates hover and re-centers the window after a size change.
    pub fn frame(&mut self, pointer: Point) -> FrameUpdate {
        if !self.open {
            return FrameUpdate::default();
        }
        self.pointer = Some(pointer);
        self.relayout();
        let hit = self.hit_test(pointer);
        let changed = hit != self.hovered;
        self.hovered = hit;
        let resized = std::mem::take(&mut self.resized);
        FrameUpdate::new(changed || resized, resized)
    }

    pub fn handle(&mut self, input: MenuInput) -> Response {
        if !self.open {
            return Response::ignored();
        }
        match input {
            MenuInput::Primary => self.primary(),
            MenuInput::Secondary => self.secondary(),
            MenuInput::Cancel | MenuInput::ToggleMenu => {
                self.ascend();
                Response::consumed()
            }
            MenuInput::NextPageKey => {
                self.next_page();
                Response::consumed()
            }
            MenuInput::PreviousPageKey => {
                self.previous_page();
                Response::consumed()
            }
        }
    }

    fn primary(&mut self) -> Response {
        match self.hovered {
            Hit::Item(i) => self.activate(i),
            Hit::Back => self.ascend(),
            Hit::PreviousPage => self.previous_page(),
            Hit::NextPage => self.next_page(),
            Hit::None => {
                let outside = self.pointer.is_some_and(|p| !self.window.contains(p));
                if !outside {
                    return Response::ignored();
                }
                self.close();
            }
        }
        Response::consumed()
    }

    fn secondary(&mut self) -> Response {
        let target = self.hovered.item().filter(|&i| {
            self.context.actor.is_some()
                && self
                    .page_items
                    .get(i)
                    .is_some_and(MenuItem::is_favoritable)
        });

        match target {
            Some(i) => Response {
                consumed: true,
                notice: self.toggle_favorite(i),
            },
            None => {
                self.ascend();
                Response::consumed()
            }
        }
    }

    pub fn draw(&self, painter: &mut dyn Painter) -> Result<(), PaintError> {
        if !self.open {
            return Ok(());
        }
        self.with_view(|layout, view| layout.draw(view, painter))
    }

    fn install(&mut self, mut items: Vec<MenuItem>) {
        item::sort_by_order(&mut items);
        self.items = items;
        self.page = 0;
        self.refresh_page();
    }

    fn refresh_page(&mut self) {
        let per_page = self.items_per_page();
        let start = (self.page * per_page).min(self.items.len());
        let end = (start + per_page).min(self.items.len());
        self.page_items = self.items[start..end].to_vec();
        item::sort_by_order(&mut self.page_items);
        self.hovered = Hit::None;
        self.relayout();
    }

    fn relayout(&mut self) {
        let size = self.with_view(|layout, view| layout.window_size(view));
        if size != self.window.size() {
            self.window = Rect::centered(self.anchor(), size);
            self.resized = true;
        }
    }

    fn with_view<R>(&self, f: impl FnOnce(&dyn Layout, &PageView<'_>) -> R) -> R {
        let store = self.context.favorites.borrow();
        let view = PageView {
            items: &self.page_items,
            page: self.page,
            total_pages: self.total_pages(),
            depth: self.depth(),
            hovered: self.hovered,
            favorites_view: self.favorites_view,
            settings: &self.context.settings,
            window: self.window.size(),
            favorites: self.context.actor.as_ref().map(|actor| (&*store, actor)),
        };
        f(self.layout.as_ref(), &view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutKind;
    use crate::favorites::{FavoriteKey, FavoritesStore};
    use crate::host::Control;
    use crate::host::testing::FakeControl;
    use crate::layout::testing::items;
    use crate::paint::testing::Recorder;
    use proptest::prelude::*;
    use std::cell::Cell;
    use std::rc::Rc;

    const SCREEN: Size = Size {
        width: 1920.0,
        height: 1080.0,
    };

    fn context(settings: Settings) -> MenuContext {
        MenuContext::new(
            Some(ActorId::from("pawn-1")),
            FavoritesStore::new().shared(),
            settings,
        )
    }

    fn open(items: Vec<MenuItem>, settings: Settings) -> MenuController {
        let layout = settings.layout.build();
        MenuController::open(items, false, context(settings), layout, SCREEN)
    }

    fn labels(items: &[MenuItem]) -> Vec<&str> {
        items.iter().map(|i| i.label.as_str()).collect()
    }

    /// Scans the window for a screen point the layout resolves to `target`.
    fn point_for(c: &MenuController, target: Hit) -> Point {
        let w = c.window();
        let mut y = w.y;
        while y < w.max_y() {
            let mut x = w.x;
            while x < w.max_x() {
                let p = Point::new(x, y);
                if c.hit_test(p) == target {
                    return p;
                }
                x += 2.0;
            }
            y += 2.0;
        }
        panic!("no point resolves to {target:?}");
    }

    fn hover(c: &mut MenuController, target: Hit) {
        let p = point_for(c, target);
        c.frame(p);
        assert_eq!(c.hovered(), target);
    }

    #[test]
    fn test_twenty_five_items_make_three_pages() {
        let mut c = open(items(25), Settings::default());
        assert_eq!(c.total_pages(), 3);
        assert_eq!(c.page_items().len(), 12);

        c.next_page();
        c.next_page();
        assert_eq!(c.page(), 2);
        assert_eq!(labels(c.page_items()), vec!["item24"]);

        c.next_page();
        assert_eq!(c.page(), 2);
        c.previous_page();
        c.previous_page();
        c.previous_page();
        assert_eq!(c.page(), 0);
    }

    #[test]
    fn test_empty_menu_has_no_pages() {
        let c = open(Vec::new(), Settings::default());
        assert_eq!(c.total_pages(), 0);
        assert!(c.page_items().is_empty());
        assert!(c.is_open());
    }

    #[test]
    fn test_items_are_sorted_by_order() {
        let list = vec![
            MenuItem::new("late").with_order(5),
            MenuItem::new("first").with_order(-1),
            MenuItem::new("tie-a").with_order(0),
            MenuItem::new("tie-b").with_order(0),
        ];
        let c = open(list, Settings::default());
        assert_eq!(labels(c.page_items()), vec!["first", "tie-a", "tie-b", "late"]);
    }

    proptest! {
        #[test]
        fn prop_pages_partition_items(n in 0usize..80, per_page in 1usize..30) {
            let settings = Settings { items_per_page: per_page, ..Settings::default() };
            let mut c = open(items(n), settings);
            prop_assert_eq!(c.total_pages(), n.div_ceil(per_page));

            let mut seen = Vec::new();
            for page in 0..c.total_pages() {
                prop_assert_eq!(c.page(), page);
                prop_assert!(c.page_items().len() <= per_page);
                seen.extend(c.page_items().iter().map(|i| i.label.clone()));
                c.next_page();
            }
            let expected: Vec<_> = (0..n).map(|i| format!("item{i}")).collect();
            prop_assert_eq!(seen, expected);
        }
    }

    #[test]
    fn test_descend_ascend_round_trip() {
        let settings = Settings {
            items_per_page: 4,
            ..Settings::default()
        };
        let mut root = items(7);
        root[5] = MenuItem::new("folder")
            .with_order(5)
            .with_children(vec![MenuItem::new("a"), MenuItem::new("b")]);
        let mut c = open(root, settings);

        c.next_page();
        assert_eq!(c.page(), 1);
        let before = labels(c.page_items()).join(",");

        c.activate(1);
        assert_eq!(c.depth(), 1);
        assert_eq!(c.page(), 0);
        assert_eq!(labels(c.page_items()), vec!["a", "b"]);

        c.ascend();
        assert_eq!(c.depth(), 0);
        assert_eq!(c.page(), 1);
        assert_eq!(labels(c.page_items()).join(","), before);

        c.ascend();
        assert!(!c.is_open());
    }

    #[test]
    fn test_descend_into_empty_list_is_noop() {
        let mut c = open(items(3), Settings::default());
        c.descend(Vec::new());
        assert_eq!(c.depth(), 0);
        assert_eq!(c.page_items().len(), 3);
    }

    #[test]
    fn test_lazy_children_resolved_on_activation() {
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        let build = MenuItem::new("Build").with_lazy_children(move || {
            counter.set(counter.get() + 1);
            vec![MenuItem::new("Wall"), MenuItem::new("Door")]
        });
        let mut c = open(vec![build], Settings::default());
        assert_eq!(calls.get(), 0);

        c.activate(0);
        assert_eq!(calls.get(), 1);
        assert_eq!(labels(c.page_items()), vec!["Wall", "Door"]);

        c.ascend();
        c.activate(0);
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_action_runs_and_closes() {
        let runs = Rc::new(Cell::new(0));
        let counter = runs.clone();
        let leaf = MenuItem::new("Fireball").with_action(move || counter.set(counter.get() + 1));
        let mut c = open(vec![leaf], Settings::default());

        c.activate(0);
        assert_eq!(runs.get(), 1);
        assert!(!c.is_open());
    }

    #[test]
    fn test_children_win_over_action() {
        let runs = Rc::new(Cell::new(0));
        let counter = runs.clone();
        let both = MenuItem::new("Both")
            .with_action(move || counter.set(counter.get() + 1))
            .with_children(vec![MenuItem::new("child")]);
        let mut c = open(vec![both], Settings::default());

        c.activate(0);
        assert_eq!(runs.get(), 0);
        assert_eq!(c.depth(), 1);
    }

    #[test]
    fn test_disabled_item_is_inert() {
        let runs = Rc::new(Cell::new(0));
        let counter = runs.clone();
        let control: Rc<dyn Control> = Rc::new(FakeControl::new("Heal").disabled(Some("Needs mana")));
        let item = MenuItem::new("Heal")
            .with_source(&control)
            .with_action(move || counter.set(counter.get() + 1));
        let mut c = open(vec![item], Settings::default());

        c.activate(0);
        assert_eq!(runs.get(), 0);
        assert!(c.is_open());
        assert_eq!(c.page_items()[0].tooltip(), "\n\nDisabled: Needs mana");
    }

    #[test]
    fn test_double_toggle_restores_store() {
        let control: Rc<dyn Control> = Rc::new(FakeControl::new("Fireball"));
        let item = MenuItem::new("Fireball")
            .with_favorite_key(Some(FavoriteKey::from("Fireball")))
            .with_source(&control);
        let mut c = open(vec![item], Settings::default());
        let before = c.context().favorites.borrow().clone();

        let added = c.toggle_favorite(0).unwrap();
        assert_eq!(added.text, "Fireball added to favorites.");
        assert_eq!(added.kind, NoticeKind::Silent);
        let removed = c.toggle_favorite(0).unwrap();
        assert_eq!(removed.text, "Fireball removed from favorites.");

        assert_eq!(*c.context().favorites.borrow(), before);
        assert!(c.is_open());
        assert_eq!(c.depth(), 0);
    }

    #[test]
    fn test_toggle_requires_actor_and_favoritable_item() {
        let mut c = open(items(2), Settings::default());
        assert_eq!(c.toggle_favorite(0), None);
        assert_eq!(c.toggle_favorite(9), None);

        let control: Rc<dyn Control> = Rc::new(FakeControl::new("Fireball"));
        let item = MenuItem::new("Fireball")
            .with_favorite_key(Some(FavoriteKey::from("Fireball")))
            .with_source(&control);
        let settings = Settings::default();
        let anonymous = MenuContext::new(None, FavoritesStore::new().shared(), settings.clone());
        let mut c = MenuController::open(vec![item], false, anonymous, settings.layout.build(), SCREEN);
        assert_eq!(c.toggle_favorite(0), None);
    }

    #[test]
    fn test_secondary_toggles_hovered_favoritable_item() {
        let control: Rc<dyn Control> = Rc::new(FakeControl::new("Fireball"));
        let item = MenuItem::new("Fireball")
            .with_favorite_key(Some(FavoriteKey::from("Fireball")))
            .with_source(&control);
        let mut root = vec![item];
        root.extend(items(3));
        let mut c = open(vec![MenuItem::new("folder").with_children(root)], Settings::default());
        c.activate(0);

        let fireball = c
            .page_items()
            .iter()
            .position(|i| i.label == "Fireball")
            .unwrap();
        hover(&mut c, Hit::Item(fireball));
        let response = c.handle(MenuInput::Secondary);
        assert!(response.consumed);
        assert!(response.notice.is_some());
        assert_eq!(c.depth(), 1);

        let plain = c.page_items().iter().position(|i| i.label == "item0").unwrap();
        hover(&mut c, Hit::Item(plain));
        let response = c.handle(MenuInput::Secondary);
        assert!(response.consumed);
        assert_eq!(response.notice, None);
        assert_eq!(c.depth(), 0);
    }

    #[test]
    fn test_cancel_and_toggle_step_back_then_close() {
        let folder = MenuItem::new("folder").with_children(items(2));
        let mut c = open(vec![folder], Settings::default());
        c.activate(0);

        c.handle(MenuInput::ToggleMenu);
        assert_eq!(c.depth(), 0);
        assert!(c.is_open());
        c.handle(MenuInput::Cancel);
        assert!(!c.is_open());
        assert_eq!(c.handle(MenuInput::Primary), Response::default());
    }

    #[test]
    fn test_primary_dispatches_on_hover() {
        let mut c = open(items(30), Settings::default());
        hover(&mut c, Hit::NextPage);
        c.handle(MenuInput::Primary);
        assert_eq!(c.page(), 1);
        assert_eq!(c.hovered(), Hit::None);

        hover(&mut c, Hit::PreviousPage);
        c.handle(MenuInput::Primary);
        assert_eq!(c.page(), 0);

        c.handle(MenuInput::NextPageKey);
        assert_eq!(c.page(), 1);
        c.handle(MenuInput::PreviousPageKey);
        assert_eq!(c.page(), 0);
    }

    #[test]
    fn test_primary_outside_window_closes() {
        let mut c = open(items(3), Settings::default());
        let inside = c.window().center();
        c.frame(inside);
        assert_eq!(c.hovered(), Hit::None);
        assert!(!c.handle(MenuInput::Primary).consumed);
        assert!(c.is_open());

        c.frame(Point::new(1.0, 1.0));
        assert!(c.handle(MenuInput::Primary).consumed);
        assert!(!c.is_open());
    }

    #[test]
    fn test_window_anchored_above_screen_center() {
        let c = open(items(5), Settings::default());
        let center = c.window().center();
        assert_eq!(center, Point::new(960.0, 490.0));
    }

    #[test]
    fn test_frame_reports_resize_after_navigation() {
        let folder = MenuItem::new("folder").with_children(items(20));
        let mut c = open(vec![folder], Settings::default());
        let small = c.window();
        assert!(!c.frame(Point::new(0.0, 0.0)).resized);

        c.activate(0);
        let update = c.frame(Point::new(0.0, 0.0));
        assert!(update.resized);
        assert!(update.redraw);
        assert!(c.window().width > small.width);
        assert_eq!(c.window().center(), small.center());
    }

    #[test]
    fn test_grid_controller_clamps_page_size() {
        let settings = Settings {
            layout: LayoutKind::Grid,
            items_per_page: 40,
            ..Settings::default()
        };
        let c = open(items(30), settings);
        assert_eq!(c.items_per_page(), 24);
        assert_eq!(c.total_pages(), 2);
    }

    #[test]
    fn test_draw_goes_through_layout() {
        let mut c = open(items(3), Settings::default());
        let mut rec = Recorder::default();
        c.draw(&mut rec).unwrap();
        assert_eq!(rec.texts(), vec!["item0", "item1", "item2"]);

        c.close();
        let mut rec = Recorder::default();
        c.draw(&mut rec).unwrap();
        assert!(rec.ops.is_empty());
    }
}
