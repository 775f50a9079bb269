use derive_more::{AsRef, Deref, Display, From, Into};
use fs_err as fs;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::rc::Rc;
use thiserror::Error;

/// Stable identity of the character that owns a set of favorites.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    Deref,
    From,
    Into,
    AsRef,
)]
#[serde(transparent)]
pub struct ActorId(String);

crate::impl_string_newtype!(ActorId);

/// Identity of a favoritable action, independent of the control that currently offers it.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    Deref,
    From,
    Into,
    AsRef,
)]
#[serde(transparent)]
pub struct FavoriteKey(String);

crate::impl_string_newtype!(FavoriteKey);

#[derive(Error, Debug)]
pub enum FavoritesError {
    #[error("Favorites io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Favorites format error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type SharedFavorites = Rc<RefCell<FavoritesStore>>;

/// On-disk shape. Owners may map to `null`, which loads as an empty set.
#[derive(Debug, Default, Serialize, Deserialize)]
struct FavoritesRecord {
    #[serde(default)]
    favorites: BTreeMap<ActorId, Option<Vec<FavoriteKey>>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "FavoritesRecord", into = "FavoritesRecord")]
pub struct FavoritesStore {
    by_actor: BTreeMap<ActorId, BTreeSet<FavoriteKey>>,
}

impl From<FavoritesRecord> for FavoritesStore {
    fn from(record: FavoritesRecord) -> Self {
        let by_actor = record
            .favorites
            .into_iter()
            .map(|(actor, keys)| (actor, keys.unwrap_or_default().into_iter().collect()))
            .collect();
        Self { by_actor }
    }
}

impl From<FavoritesStore> for FavoritesRecord {
    fn from(store: FavoritesStore) -> Self {
        let favorites = store
            .by_actor
            .into_iter()
            .filter(|(_, keys)| !keys.is_empty())
            .map(|(actor, keys)| (actor, Some(keys.into_iter().collect())))
            .collect();
        Self { favorites }
    }
}

impl FavoritesStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared(self) -> SharedFavorites {
        Rc::new(RefCell::new(self))
    }

    pub fn is_favorite(&self, actor: &ActorId, key: &FavoriteKey) -> bool {
        self.by_actor
            .get(actor)
            .is_some_and(|keys| keys.contains(key))
    }

    pub fn has_any(&self, actor: &ActorId) -> bool {
        self.by_actor.get(actor).is_some_and(|keys| !keys.is_empty())
    }

    pub fn add(&mut self, actor: &ActorId, key: FavoriteKey) {
        self.by_actor.entry(actor.clone()).or_default().insert(key);
    }

    /// Drops the owner entry with its last key, so an emptied owner equals a missing one.
    pub fn remove(&mut self, actor: &ActorId, key: &FavoriteKey) {
        if let Some(keys) = self.by_actor.get_mut(actor) {
            keys.remove(key);
            if keys.is_empty() {
                self.by_actor.remove(actor);
            }
        }
    }

    /// Flips membership and returns whether `key` is a favorite afterwards.
    pub fn toggle(&mut self, actor: &ActorId, key: &FavoriteKey) -> bool {
        if self.is_favorite(actor, key) {
            self.remove(actor, key);
            false
        } else {
            self.add(actor, key.clone());
            true
        }
    }

    /// Owned copy of an actor's favorites, safe to hold while the store is mutated.
    pub fn snapshot(&self, actor: &ActorId) -> BTreeSet<FavoriteKey> {
        self.by_actor.get(actor).cloned().unwrap_or_default()
    }

    pub fn load(path: &Path) -> Result<Self, FavoritesError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path)?;
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), FavoritesError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}
