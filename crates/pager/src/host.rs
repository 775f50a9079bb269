//! Boundary between the host's command bar and the menu engine.
//!
//! The host hands the [`Adapter`] its raw control list every refresh and draws whatever
//! comes back. Ability controls are folded into a synthesized "Abilities" control; running
//! it (or any other menu entry point) is reported through a [`Launcher`].

use crate::config::Settings;
use crate::controller::Notice;
use crate::favorites::{ActorId, FavoriteKey, FavoritesStore, SharedFavorites};
use crate::item::{self, Icon, IconName, MenuItem};
use std::cell::RefCell;
use std::collections::{BTreeMap, VecDeque};
use std::rc::{Rc, Weak};

pub const ABILITIES_LABEL: &str = "Abilities";
pub const ABILITIES_ORDER: i32 = -100;
pub const FAVOURITES_LABEL: &str = "Favourites";
pub const FAVOURITES_ORDER: i32 = 20;
pub const NO_FAVORITES_TEXT: &str = "No favorite abilities found.";

const ABILITIES_ICON: &str = "view-app-grid-symbolic";

/// Ability data the host exposes natively.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AbilityDef {
    pub def_name: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
}

/// Ability data published by the optional host extension.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtensionAbility {
    pub def_name: Option<String>,
    pub description: Option<String>,
    /// Labels of the ability trees the ability belongs to, most specific first.
    pub trees: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ControlDescriptor {
    #[default]
    Plain,
    Ability(AbilityDef),
    Extension(ExtensionAbility),
}

/// A host command button.
pub trait Control {
    fn label(&self) -> String;

    fn description(&self) -> String {
        String::new()
    }

    fn icon(&self) -> Option<Icon> {
        None
    }

    fn order(&self) -> i32 {
        0
    }

    fn is_visible(&self) -> bool {
        true
    }

    fn is_disabled(&self) -> bool {
        false
    }

    fn disabled_reason(&self) -> Option<String> {
        None
    }

    fn descriptor(&self) -> ControlDescriptor {
        ControlDescriptor::Plain
    }

    fn execute(&self);
}

/// A build-menu category and the designators it offers.
pub trait BuildCategory {
    fn label(&self) -> String;

    fn description(&self) -> String {
        String::new()
    }

    fn order(&self) -> i32 {
        0
    }

    fn designators(&self) -> Vec<Rc<dyn Control>>;
}

/// Reads ability metadata off one family of controls.
pub trait CommandIntrospector {
    fn is_such_command(&self, control: &dyn Control) -> bool;

    fn category(&self, control: &dyn Control) -> String;

    fn description(&self, control: &dyn Control) -> String;

    fn def_name(&self, control: &dyn Control) -> Option<FavoriteKey>;
}

fn non_empty_key(name: Option<String>) -> Option<FavoriteKey> {
    name.filter(|n| !n.is_empty()).map(FavoriteKey::new)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NativeIntrospector;

impl NativeIntrospector {
    fn def(control: &dyn Control) -> Option<AbilityDef> {
        match control.descriptor() {
            ControlDescriptor::Ability(def) => Some(def),
            _ => None,
        }
    }
}

impl CommandIntrospector for NativeIntrospector {
    fn is_such_command(&self, control: &dyn Control) -> bool {
        Self::def(control).is_some()
    }

    fn category(&self, control: &dyn Control) -> String {
        Self::def(control)
            .and_then(|d| d.category)
            .unwrap_or_else(|| "Base Game".to_string())
    }

    fn description(&self, control: &dyn Control) -> String {
        Self::def(control)
            .and_then(|d| d.description)
            .unwrap_or_default()
    }

    fn def_name(&self, control: &dyn Control) -> Option<FavoriteKey> {
        non_empty_key(Self::def(control)?.def_name)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ExtensionIntrospector;

impl ExtensionIntrospector {
    fn ability(control: &dyn Control) -> Option<ExtensionAbility> {
        match control.descriptor() {
            ControlDescriptor::Extension(ability) => Some(ability),
            _ => None,
        }
    }
}

impl CommandIntrospector for ExtensionIntrospector {
    fn is_such_command(&self, control: &dyn Control) -> bool {
        Self::ability(control).is_some()
    }

    fn category(&self, control: &dyn Control) -> String {
        Self::ability(control)
            .and_then(|a| a.trees.into_iter().next())
            .unwrap_or_else(|| "Extension".to_string())
    }

    fn description(&self, control: &dyn Control) -> String {
        Self::ability(control)
            .and_then(|a| a.description)
            .unwrap_or_default()
    }

    fn def_name(&self, control: &dyn Control) -> Option<FavoriteKey> {
        non_empty_key(Self::ability(control)?.def_name)
    }
}

/// What the running host supports, probed once at startup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HostCapabilities {
    pub extension_loaded: bool,
}

/// Request from the menu layer for the host to act on.
#[derive(Debug)]
pub enum Launch {
    Open {
        items: Vec<MenuItem>,
        favorites_view: bool,
    },
    Notify(Notice),
}

pub trait Launcher {
    fn launch(&self, request: Launch);
}

/// Launch requests buffered until the host's next event turn.
#[derive(Debug, Clone, Default)]
pub struct LaunchQueue {
    pending: Rc<RefCell<VecDeque<Launch>>>,
}

impl LaunchQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drain(&self) -> Vec<Launch> {
        self.pending.borrow_mut().drain(..).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.borrow().is_empty()
    }
}

impl Launcher for LaunchQueue {
    fn launch(&self, request: Launch) {
        self.pending.borrow_mut().push_back(request);
    }
}

/// Runs a control, or logs why it cannot run.
pub fn execute_control(control: &dyn Control) {
    if control.is_disabled() {
        log::warn!(
            "'{}' is disabled: {}",
            control.label(),
            control.disabled_reason().unwrap_or_default()
        );
        return;
    }
    log::info!("Executing '{}'", control.label());
    control.execute();
}

fn execute_weak(control: &Weak<dyn Control>) {
    match control.upgrade() {
        Some(control) => execute_control(control.as_ref()),
        None => log::debug!("Control went away before it could run"),
    }
}

/// Leaf ability items of a tree, depth first. Lazy subtrees are not expanded.
fn ability_leaves<'a>(items: &'a [MenuItem], out: &mut Vec<&'a MenuItem>) {
    for item in items {
        if !item.children().is_empty() {
            ability_leaves(item.children(), out);
        } else if item.has_source() {
            out.push(item);
        }
    }
}

/// Leaf abilities of `root` the actor has favorited.
pub fn favorites_view(root: &[MenuItem], store: &FavoritesStore, actor: &ActorId) -> Vec<MenuItem> {
    let favorites = store.snapshot(actor);
    let mut leaves = Vec::new();
    ability_leaves(root, &mut leaves);
    leaves
        .into_iter()
        .filter(|item| {
            item.favorite_key
                .as_ref()
                .is_some_and(|key| favorites.contains(key))
        })
        .cloned()
        .collect()
}

/// Builds menu trees from host controls and decides what stays on the host bar.
#[derive(Clone)]
pub struct Adapter {
    settings: Settings,
    favorites: SharedFavorites,
    introspectors: Rc<[Box<dyn CommandIntrospector>]>,
    launcher: Rc<dyn Launcher>,
}

impl Adapter {
    pub fn new(
        settings: Settings,
        favorites: SharedFavorites,
        capabilities: HostCapabilities,
        launcher: Rc<dyn Launcher>,
    ) -> Self {
        let mut introspectors: Vec<Box<dyn CommandIntrospector>> = Vec::new();
        if capabilities.extension_loaded {
            introspectors.push(Box::new(ExtensionIntrospector));
        }
        introspectors.push(Box::new(NativeIntrospector));
        log::debug!(
            "Adapter ready (extension abilities {})",
            if capabilities.extension_loaded { "on" } else { "off" }
        );
        Self {
            settings,
            favorites,
            introspectors: introspectors.into(),
            launcher,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    fn introspector(&self, control: &dyn Control) -> Option<&dyn CommandIntrospector> {
        self.introspectors
            .iter()
            .map(|i| &**i)
            .find(|i| i.is_such_command(control))
    }

    pub fn is_ability(&self, control: &dyn Control) -> bool {
        self.introspector(control).is_some()
    }

    pub fn category(&self, control: &dyn Control) -> String {
        self.introspector(control)
            .map_or_else(|| "Unknown".to_string(), |i| i.category(control))
    }

    pub fn description(&self, control: &dyn Control) -> String {
        self.introspector(control)
            .map(|i| i.description(control))
            .unwrap_or_default()
    }

    pub fn def_name(&self, control: &dyn Control) -> Option<FavoriteKey> {
        self.introspector(control)?.def_name(control)
    }

    /// Residual host bar: everything that is not an ability, favorited abilities when
    /// they belong on the main bar, and one "Abilities" control opening the rest.
    /// Pinned abilities also stay in the ability menu so the favorites view still lists them.
    pub fn supplement(&self, actor: &ActorId, gizmos: Vec<Rc<dyn Control>>) -> Vec<Rc<dyn Control>> {
        if !self.settings.enabled {
            return gizmos;
        }

        let favorites = self.favorites.borrow().snapshot(actor);
        let mut residual = Vec::new();
        let mut abilities = Vec::new();

        for control in gizmos {
            if !self.is_ability(control.as_ref()) {
                residual.push(control);
                continue;
            }
            let pinned = self.settings.show_favorites_on_main_bar
                && self
                    .def_name(control.as_ref())
                    .is_some_and(|key| favorites.contains(&key));
            if pinned {
                residual.push(control.clone());
            }
            abilities.push(control);
        }

        if !abilities.is_empty() {
            residual.push(Rc::new(AbilitiesControl {
                adapter: self.clone(),
                actor: actor.clone(),
                abilities,
            }));
        }
        residual
    }

    fn ability_item(&self, control: &Rc<dyn Control>) -> MenuItem {
        let weak = Rc::downgrade(control);
        MenuItem::new(control.label())
            .with_description(self.description(control.as_ref()))
            .with_icon(control.icon())
            .with_favorite_key(self.def_name(control.as_ref()))
            .with_source(control)
            .with_action(move || execute_weak(&weak))
    }

    /// Ability tree: one entry per category, singletons collapsed, plus "Favourites".
    pub fn ability_menu(&self, actor: &ActorId, commands: &[Rc<dyn Control>]) -> Vec<MenuItem> {
        let mut groups: BTreeMap<String, Vec<&Rc<dyn Control>>> = BTreeMap::new();
        for control in commands {
            groups
                .entry(self.category(control.as_ref()))
                .or_default()
                .push(control);
        }

        let mut menu: Vec<MenuItem> = groups
            .into_iter()
            .map(|(category, controls)| {
                let mut leaves: Vec<MenuItem> =
                    controls.iter().map(|c| self.ability_item(c)).collect();
                if leaves.len() == 1 {
                    let mut single = leaves.remove(0);
                    single.label = category;
                    return single;
                }
                let icon = controls.first().and_then(|c| c.icon());
                MenuItem::new(category).with_icon(icon).with_children(leaves)
            })
            .collect();

        if self.settings.show_favorites_submenu {
            menu.push(self.favourites_entry(actor, menu.clone()));
        }
        item::sort_by_order(&mut menu);
        menu
    }

    fn favourites_entry(&self, actor: &ActorId, root: Vec<MenuItem>) -> MenuItem {
        let favorites = self.favorites.clone();
        let launcher = self.launcher.clone();
        let actor = actor.clone();
        MenuItem::new(FAVOURITES_LABEL)
            .with_description(FAVOURITES_LABEL)
            .with_order(FAVOURITES_ORDER)
            .with_action(move || {
                let items = favorites_view(&root, &favorites.borrow(), &actor);
                let request = if items.is_empty() {
                    Launch::Notify(Notice::rejected(NO_FAVORITES_TEXT))
                } else {
                    Launch::Open {
                        items,
                        favorites_view: true,
                    }
                };
                launcher.launch(request);
            })
    }

    pub fn open_ability_menu(&self, actor: &ActorId, commands: &[Rc<dyn Control>]) {
        if commands.is_empty() {
            return;
        }
        self.launcher.launch(Launch::Open {
            items: self.ability_menu(actor, commands),
            favorites_view: false,
        });
    }

    /// Build menu: categories with at least one visible designator, each expanding lazily.
    pub fn category_menu(&self, categories: &[Rc<dyn BuildCategory>]) -> Vec<MenuItem> {
        let mut sorted: Vec<&Rc<dyn BuildCategory>> = categories.iter().collect();
        sorted.sort_by_key(|c| c.order());

        sorted
            .into_iter()
            .filter_map(|category| {
                let first = category.designators().into_iter().find(|d| d.is_visible())?;
                let provider = category.clone();
                Some(
                    MenuItem::new(category.label())
                        .with_description(category.description())
                        .with_icon(first.icon())
                        .with_order(category.order())
                        .with_lazy_children(move || designator_items(provider.as_ref())),
                )
            })
            .collect()
    }

    pub fn open_build_menu(&self, categories: &[Rc<dyn BuildCategory>]) {
        let items = self.category_menu(categories);
        if items.is_empty() {
            log::debug!("No build category has visible designators");
            return;
        }
        self.launcher.launch(Launch::Open {
            items,
            favorites_view: false,
        });
    }
}

fn designator_items(category: &dyn BuildCategory) -> Vec<MenuItem> {
    let mut designators: Vec<Rc<dyn Control>> = category
        .designators()
        .into_iter()
        .filter(|d| d.is_visible())
        .collect();
    designators.sort_by_key(|d| d.order());

    designators
        .into_iter()
        .map(|designator| {
            let label = designator.label();
            let description = designator.description();
            let icon = designator.icon();
            let order = designator.order();
            MenuItem::new(label)
                .with_description(description)
                .with_icon(icon)
                .with_order(order)
                .with_action(move || execute_control(designator.as_ref()))
        })
        .collect()
}

/// The control injected into the host bar in place of the folded abilities.
struct AbilitiesControl {
    adapter: Adapter,
    actor: ActorId,
    abilities: Vec<Rc<dyn Control>>,
}

impl Control for AbilitiesControl {
    fn label(&self) -> String {
        ABILITIES_LABEL.to_string()
    }

    fn description(&self) -> String {
        "Open radial ability menu".to_string()
    }

    fn icon(&self) -> Option<Icon> {
        Some(Icon::Named(IconName::from(ABILITIES_ICON)))
    }

    fn order(&self) -> i32 {
        ABILITIES_ORDER
    }

    fn execute(&self) {
        self.adapter.open_ability_menu(&self.actor, &self.abilities);
    }
}


#[cfg(test)]
mod tests {
    use super::testing::{FakeCategory, FakeControl};
    use super::*;

    fn actor() -> ActorId {
        ActorId::from("pawn-1")
    }

    fn adapter_with(settings: Settings, extension: bool) -> (Adapter, LaunchQueue, SharedFavorites) {
        let queue = LaunchQueue::new();
        let favorites = FavoritesStore::new().shared();
        let adapter = Adapter::new(
            settings,
            favorites.clone(),
            HostCapabilities {
                extension_loaded: extension,
            },
            Rc::new(queue.clone()),
        );
        (adapter, queue, favorites)
    }

    fn adapter() -> (Adapter, LaunchQueue, SharedFavorites) {
        adapter_with(Settings::default(), true)
    }

    fn rc(control: FakeControl) -> Rc<dyn Control> {
        Rc::new(control)
    }

    fn labels(items: &[MenuItem]) -> Vec<&str> {
        items.iter().map(|i| i.label.as_str()).collect()
    }

    #[test]
    fn test_introspection_fallbacks() {
        let (adapter, _, _) = adapter();
        let native = FakeControl::ability("Fireball", "Fireball", None);
        let tree = FakeControl::extension("Shadow Step", "ShadowStep", &["Umbral", "Movement"]);
        let treeless = FakeControl::extension("Blink", "Blink", &[]);
        let plain = FakeControl::new("Draft");

        assert_eq!(adapter.category(&native), "Base Game");
        assert_eq!(adapter.category(&tree), "Umbral");
        assert_eq!(adapter.category(&treeless), "Extension");
        assert_eq!(adapter.category(&plain), "Unknown");

        assert_eq!(adapter.description(&native), "Fireball description");
        assert_eq!(adapter.description(&tree), "");
        assert_eq!(adapter.description(&plain), "");

        assert_eq!(adapter.def_name(&tree), Some(FavoriteKey::from("ShadowStep")));
        assert_eq!(adapter.def_name(&plain), None);
        let unnamed = FakeControl::ability("Odd", "", Some("Misc"));
        assert_eq!(adapter.def_name(&unnamed), None);
    }

    #[test]
    fn test_extension_commands_ignored_without_capability() {
        let (adapter, _, _) = adapter_with(Settings::default(), false);
        let tree = FakeControl::extension("Shadow Step", "ShadowStep", &["Umbral"]);
        assert!(!adapter.is_ability(&tree));
        assert_eq!(adapter.category(&tree), "Unknown");
    }

    #[test]
    fn test_supplement_folds_abilities_into_one_control() {
        let (adapter, queue, _) = adapter();
        let gizmos = vec![
            rc(FakeControl::new("Draft")),
            rc(FakeControl::ability("Fireball", "Fireball", Some("Fire"))),
            rc(FakeControl::ability("Heal", "Heal", Some("Life"))),
        ];
        let residual = adapter.supplement(&actor(), gizmos);
        let names: Vec<_> = residual.iter().map(|c| c.label()).collect();
        assert_eq!(names, vec!["Draft", ABILITIES_LABEL]);
        assert_eq!(residual[1].order(), ABILITIES_ORDER);

        residual[1].execute();
        let mut launched = queue.drain();
        assert_eq!(launched.len(), 1);
        match launched.remove(0) {
            Launch::Open {
                items,
                favorites_view,
            } => {
                assert!(!favorites_view);
                assert_eq!(labels(&items), vec!["Fire", "Life", FAVOURITES_LABEL]);
            }
            other => panic!("unexpected launch {other:?}"),
        }
    }

    #[test]
    fn test_supplement_keeps_favorites_on_main_bar() {
        let (adapter, _, favorites) = adapter();
        favorites.borrow_mut().add(&actor(), FavoriteKey::from("Heal"));
        let gizmos = vec![
            rc(FakeControl::ability("Fireball", "Fireball", None)),
            rc(FakeControl::ability("Heal", "Heal", None)),
        ];
        let names: Vec<_> = adapter
            .supplement(&actor(), gizmos.clone())
            .iter()
            .map(|c| c.label())
            .collect();
        assert_eq!(names, vec!["Heal", ABILITIES_LABEL]);
        let menu = adapter.ability_menu(&actor(), &gizmos);
        assert!(
            menu.iter()
                .flat_map(MenuItem::resolve_children)
                .any(|i| i.label == "Heal")
        );

        let settings = Settings {
            show_favorites_on_main_bar: false,
            ..Settings::default()
        };
        let (adapter, _, favorites) = adapter_with(settings, true);
        favorites.borrow_mut().add(&actor(), FavoriteKey::from("Heal"));
        let names: Vec<_> = adapter
            .supplement(&actor(), gizmos)
            .iter()
            .map(|c| c.label())
            .collect();
        assert_eq!(names, vec![ABILITIES_LABEL]);
    }

    #[test]
    fn test_supplement_passthrough() {
        let settings = Settings {
            enabled: false,
            ..Settings::default()
        };
        let (disabled, _, _) = adapter_with(settings, true);
        let gizmos = vec![rc(FakeControl::ability("Fireball", "Fireball", None))];
        assert_eq!(disabled.supplement(&actor(), gizmos).len(), 1);

        let (adapter, _, _) = adapter();
        let plain = vec![rc(FakeControl::new("Draft")), rc(FakeControl::new("Attack"))];
        let names: Vec<_> = adapter
            .supplement(&actor(), plain)
            .iter()
            .map(|c| c.label())
            .collect();
        assert_eq!(names, vec!["Draft", "Attack"]);
    }

    #[test]
    fn test_singleton_category_collapses() {
        let (adapter, _, _) = adapter();
        let ice = FakeControl::ability("Ice Bolt", "IceBolt", Some("Frost"));
        let ice_runs = ice.runs();
        let commands = vec![
            rc(FakeControl::ability("Fireball", "Fireball", Some("Fire"))),
            rc(FakeControl::ability("Firewall", "Firewall", Some("Fire"))),
            rc(ice),
        ];
        let menu = adapter.ability_menu(&actor(), &commands);
        assert_eq!(labels(&menu), vec!["Fire", "Frost", FAVOURITES_LABEL]);

        let fire = &menu[0];
        assert_eq!(labels(fire.children()), vec!["Fireball", "Firewall"]);

        let frost = &menu[1];
        assert!(!frost.has_children());
        assert!(frost.has_action());
        assert_eq!(frost.favorite_key, Some(FavoriteKey::from("IceBolt")));
        assert!(frost.is_favoritable());
        assert!(frost.invoke());
        assert_eq!(ice_runs.get(), 1);

        assert_eq!(menu[2].order, FAVOURITES_ORDER);
    }

    #[test]
    fn test_favourites_entry_respects_setting() {
        let settings = Settings {
            show_favorites_submenu: false,
            ..Settings::default()
        };
        let (adapter, _, _) = adapter_with(settings, true);
        let commands = vec![rc(FakeControl::ability("Fireball", "Fireball", None))];
        assert_eq!(labels(&adapter.ability_menu(&actor(), &commands)), vec!["Base Game"]);
    }

    #[test]
    fn test_favorites_view_filters_to_root_abilities() {
        let (adapter, _, favorites) = adapter();
        favorites.borrow_mut().add(&actor(), FavoriteKey::from("Fireball"));
        favorites.borrow_mut().add(&actor(), FavoriteKey::from("Heal"));
        let commands = vec![
            rc(FakeControl::ability("Fireball", "Fireball", Some("Fire"))),
            rc(FakeControl::ability("Ice Bolt", "IceBolt", Some("Fire"))),
        ];
        let root = adapter.ability_menu(&actor(), &commands);

        let view = favorites_view(&root, &favorites.borrow(), &actor());
        assert_eq!(labels(&view), vec!["Fireball"]);
    }

    #[test]
    fn test_favourites_entry_opens_view_or_rejects() {
        let (adapter, queue, favorites) = adapter();
        let commands = vec![
            rc(FakeControl::ability("Fireball", "Fireball", Some("Fire"))),
            rc(FakeControl::ability("Heal", "Heal", Some("Life"))),
        ];
        let menu = adapter.ability_menu(&actor(), &commands);
        let entry = menu.iter().find(|i| i.label == FAVOURITES_LABEL).unwrap();

        entry.invoke();
        match queue.drain().as_slice() {
            [Launch::Notify(notice)] => {
                assert_eq!(notice.text, NO_FAVORITES_TEXT);
                assert_eq!(notice.kind, crate::controller::NoticeKind::Rejected);
            }
            other => panic!("unexpected launches {other:?}"),
        }

        favorites.borrow_mut().add(&actor(), FavoriteKey::from("Heal"));
        entry.invoke();
        match queue.drain().as_slice() {
            [Launch::Open { items, favorites_view }] => {
                assert!(*favorites_view);
                assert_eq!(labels(items), vec!["Life"]);
            }
            other => panic!("unexpected launches {other:?}"),
        }
    }

    #[test]
    fn test_disabled_leaf_does_not_execute() {
        let (adapter, _, _) = adapter();
        let heal = FakeControl::ability("Heal", "Heal", None).disabled(Some("Needs mana"));
        let runs = heal.runs();
        let commands = vec![rc(heal)];
        let menu = adapter.ability_menu(&actor(), &commands);

        assert!(menu[0].invoke());
        assert_eq!(runs.get(), 0);
        assert_eq!(menu[0].disabled_reason().as_deref(), Some("Needs mana"));
    }

    #[test]
    fn test_category_menu_skips_empty_and_expands_lazily() {
        let (adapter, queue, _) = adapter();
        let wall = FakeControl::new("Wall").with_order(2).with_icon("wall");
        let wall_runs = wall.runs();
        let categories: Vec<Rc<dyn BuildCategory>> = vec![
            Rc::new(FakeCategory {
                label: "Structure".to_string(),
                order: 1,
                designators: vec![
                    rc(FakeControl::new("Secret").hidden()),
                    rc(wall),
                    rc(FakeControl::new("Door").with_order(1).with_icon("door")),
                ],
            }),
            Rc::new(FakeCategory {
                label: "Hidden".to_string(),
                order: 0,
                designators: vec![rc(FakeControl::new("Nothing").hidden())],
            }),
            Rc::new(FakeCategory {
                label: "Empty".to_string(),
                order: 2,
                designators: Vec::new(),
            }),
        ];

        let menu = adapter.category_menu(&categories);
        assert_eq!(labels(&menu), vec!["Structure"]);
        assert_eq!(menu[0].icon, Some(Icon::Named(IconName::from("wall"))));
        assert!(menu[0].children().is_empty());
        assert!(menu[0].has_children());

        let designators = menu[0].resolve_children();
        assert_eq!(labels(&designators), vec!["Door", "Wall"]);
        designators[1].invoke();
        assert_eq!(wall_runs.get(), 1);

        adapter.open_build_menu(&categories);
        assert_eq!(queue.drain().len(), 1);
        adapter.open_build_menu(&[]);
        assert!(queue.is_empty());
    }
}
