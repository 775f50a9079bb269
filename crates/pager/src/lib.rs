//! Paginated, hierarchical popup menus for a game's command bar.
//!
//! [`host::Adapter`] turns host controls into [`item::MenuItem`] trees,
//! [`controller::MenuController`] navigates them and a [`layout::Layout`] draws each page
//! through a [`paint::Painter`].

mod macros;

pub mod config;
pub mod controller;
pub mod favorites;
pub mod geometry;
pub mod host;
pub mod item;
pub mod layout;
pub mod loadout;
pub mod paint;

pub const SOCKET_PATH: &str = "/tmp/pager.sock";
