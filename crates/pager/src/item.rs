use crate::favorites::FavoriteKey;
use crate::host::Control;
use crate::paint::Rgba;
use derive_more::{AsRef, Deref, Display, From, Into};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::{Rc, Weak};

/// Host image reference: a file path or an icon-theme name.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct IconName(String);

crate::impl_string_newtype!(IconName);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinIcon {
    Close,
    ArrowLeft,
    ArrowRight,
    /// Drawn for items without an icon of their own.
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Icon {
    Named(IconName),
    Builtin(BuiltinIcon),
}

impl From<IconName> for Icon {
    fn from(name: IconName) -> Self {
        Icon::Named(name)
    }
}

pub type Action = Rc<dyn Fn()>;
pub type ChildrenProvider = Rc<dyn Fn() -> Vec<MenuItem>>;

/// A node of the menu tree.
///
/// Items are rebuilt for every menu-open request and dropped with the window, so all
/// callbacks are shared `Rc`s and cloning an item is cheap.
#[derive(Clone)]
pub struct MenuItem {
    pub label: String,
    pub description: String,
    pub icon: Option<Icon>,
    pub color: Option<Rgba>,
    pub favorite_key: Option<FavoriteKey>,
    pub order: i32,
    action: Option<Action>,
    children: Vec<MenuItem>,
    lazy_children: Option<ChildrenProvider>,
    source: Option<Weak<dyn Control>>,
}

impl MenuItem {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            description: String::new(),
            icon: None,
            color: None,
            favorite_key: None,
            order: 0,
            action: None,
            children: Vec::new(),
            lazy_children: None,
            source: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_icon(mut self, icon: Option<Icon>) -> Self {
        self.icon = icon;
        self
    }

    pub fn with_color(mut self, color: Rgba) -> Self {
        self.color = Some(color);
        self
    }

    pub fn with_order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }

    pub fn with_favorite_key(mut self, key: Option<FavoriteKey>) -> Self {
        self.favorite_key = key;
        self
    }

    pub fn with_action(mut self, action: impl Fn() + 'static) -> Self {
        self.action = Some(Rc::new(action));
        self
    }

    pub fn with_children(mut self, children: Vec<MenuItem>) -> Self {
        self.children = children;
        self
    }

    pub fn with_lazy_children(mut self, provider: impl Fn() -> Vec<MenuItem> + 'static) -> Self {
        self.lazy_children = Some(Rc::new(provider));
        self
    }

    pub fn with_source(mut self, control: &Rc<dyn Control>) -> Self {
        self.source = Some(Rc::downgrade(control));
        self
    }

    pub fn children(&self) -> &[MenuItem] {
        &self.children
    }

    pub fn push_child(&mut self, child: MenuItem) {
        self.children.push(child);
    }

    pub fn has_action(&self) -> bool {
        self.action.is_some()
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty() || self.lazy_children.is_some()
    }

    /// Children to descend into. A lazy provider wins over static children and is
    /// evaluated on every call.
    pub fn resolve_children(&self) -> Vec<MenuItem> {
        match &self.lazy_children {
            Some(provider) => provider(),
            None => self.children.clone(),
        }
    }

    pub fn invoke(&self) -> bool {
        self.action.as_ref().map(|action| action()).is_some()
    }

    pub fn source(&self) -> Option<Rc<dyn Control>> {
        self.source.as_ref().and_then(Weak::upgrade)
    }

    pub fn has_source(&self) -> bool {
        self.source().is_some()
    }

    pub fn is_enabled(&self) -> bool {
        self.source().is_none_or(|c| !c.is_disabled())
    }

    /// Reason shown when the source control is disabled; `None` while enabled.
    pub fn disabled_reason(&self) -> Option<String> {
        self.source()
            .filter(|c| c.is_disabled())
            .map(|c| c.disabled_reason().unwrap_or_else(|| "Disabled".to_string()))
    }

    pub fn is_favoritable(&self) -> bool {
        self.favorite_key.as_ref().is_some_and(|k| !k.is_empty()) && self.has_source()
    }

    /// Hover tooltip: the description, plus the disabled reason when gated.
    pub fn tooltip(&self) -> String {
        match self.disabled_reason() {
            Some(reason) => format!("{}\n\nDisabled: {}", self.description, reason),
            None => self.description.clone(),
        }
    }
}

impl fmt::Debug for MenuItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MenuItem")
            .field("label", &self.label)
            .field("order", &self.order)
            .field("favorite_key", &self.favorite_key)
            .field("children", &self.children)
            .field("lazy", &self.lazy_children.is_some())
            .field("action", &self.action.is_some())
            .field("source", &self.has_source())
            .finish()
    }
}

/// Stable sort by `order`, keeping the incoming order among equal keys.
pub fn sort_by_order(items: &mut [MenuItem]) {
    items.sort_by_key(|item| item.order);
}
