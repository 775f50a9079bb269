//! The overlay's stand-in host: one actor's controls, read from the loadout file.

use pager::config::{self, Settings};
use pager::controller::MenuContext;
use pager::favorites::{ActorId, FavoritesStore, SharedFavorites};
use pager::host::{self, ABILITIES_LABEL, Adapter, BuildCategory, Control, Launch, LaunchQueue};
use pager::layout::Layout;
use pager::loadout::Loadout;
use std::path::PathBuf;
use std::rc::Rc;

pub struct Session {
    settings: Settings,
    actor: ActorId,
    controls: Vec<Rc<dyn Control>>,
    categories: Vec<Rc<dyn BuildCategory>>,
    favorites: SharedFavorites,
    favorites_path: Option<PathBuf>,
    adapter: Adapter,
    launches: LaunchQueue,
}

impl Session {
    pub fn load() -> anyhow::Result<Self> {
        let settings = load_settings();
        let loadout = Loadout::load_or_demo(&config::loadout_path()?)?;

        let favorites_path = config::favorites_path()?;
        let favorites = FavoritesStore::load(&favorites_path)
            .unwrap_or_else(|e| {
                log::warn!("Starting with no favorites: {}", e);
                FavoritesStore::new()
            })
            .shared();

        Ok(Self::new(settings, &loadout, favorites, Some(favorites_path)))
    }

    pub fn new(
        settings: Settings,
        loadout: &Loadout,
        favorites: SharedFavorites,
        favorites_path: Option<PathBuf>,
    ) -> Self {
        let launches = LaunchQueue::new();
        let adapter = Adapter::new(
            settings.clone(),
            favorites.clone(),
            loadout.capabilities(),
            Rc::new(launches.clone()),
        );
        Self {
            settings,
            actor: loadout.actor.clone(),
            controls: loadout.controls(),
            categories: loadout.categories(),
            favorites,
            favorites_path,
            adapter,
            launches,
        }
    }

    /// Re-reads settings and the loadout. Favorites stay in memory.
    pub fn reload(&mut self) -> anyhow::Result<()> {
        let loadout = Loadout::load_or_demo(&config::loadout_path()?)?;
        let favorites = self.favorites.clone();
        let path = self.favorites_path.take();
        *self = Self::new(load_settings(), &loadout, favorites, path);
        Ok(())
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn actor(&self) -> &ActorId {
        &self.actor
    }

    /// What the host bar shows after the adapter folded the abilities away.
    pub fn host_bar(&self) -> Vec<Rc<dyn Control>> {
        self.adapter.supplement(&self.actor, self.controls.clone())
    }

    /// Presses the synthesized "Abilities" control, as a player clicking it on the bar would.
    pub fn show_abilities(&self) {
        let bar = self.host_bar();
        match bar.iter().find(|c| c.label() == ABILITIES_LABEL) {
            Some(abilities) => host::execute_control(abilities.as_ref()),
            None => log::info!("{} has no abilities to show", self.actor),
        }
    }

    pub fn show_build(&self) {
        self.adapter.open_build_menu(&self.categories);
    }

    pub fn drain_launches(&self) -> Vec<Launch> {
        self.launches.drain()
    }

    pub fn context(&self) -> MenuContext {
        MenuContext::new(
            Some(self.actor.clone()),
            self.favorites.clone(),
            self.settings.clone(),
        )
    }

    pub fn layout(&self) -> Box<dyn Layout> {
        self.settings.layout.build()
    }

    pub fn save_favorites(&self) {
        let Some(path) = &self.favorites_path else {
            return;
        };
        if let Err(e) = self.favorites.borrow().save(path) {
            log::warn!("Failed to save favorites: {}", e);
        }
    }
}

fn load_settings() -> Settings {
    config::settings_path()
        .and_then(|p| config::load_settings(&p))
        .unwrap_or_else(|e| {
            log::error!("Failed to load settings, using defaults: {}", e);
            Settings::default()
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pager::favorites::FavoriteKey;

    fn session() -> Session {
        let loadout = Loadout::demo().unwrap();
        Session::new(
            Settings::default(),
            &loadout,
            FavoritesStore::new().shared(),
            None,
        )
    }

    #[test]
    fn test_show_abilities_launches_menu() {
        let session = session();
        session.show_abilities();
        match session.drain_launches().as_slice() {
            [Launch::Open { items, favorites_view }] => {
                assert!(!favorites_view);
                assert!(items.iter().any(|i| i.label == "Fire"));
            }
            other => panic!("unexpected launches {other:?}"),
        }
    }

    #[test]
    fn test_host_bar_keeps_plain_controls() {
        let session = session();
        session
            .context()
            .favorites
            .borrow_mut()
            .add(session.actor(), FavoriteKey::from("Fireball"));
        let labels: Vec<_> = session.host_bar().iter().map(|c| c.label()).collect();
        assert_eq!(labels, vec!["Draft", "Fireball", ABILITIES_LABEL]);
    }

    #[test]
    fn test_show_build_launches_categories() {
        let session = session();
        session.show_build();
        assert_eq!(session.drain_launches().len(), 1);
    }
}
