//! Core library for popshell
//!
//! Host-neutral popup engine (focus registry, navigable items, virtualized
//! lists, popup lifecycle) plus the launcher and power menu built on it.

pub mod catalog;
pub mod config;
pub mod error;
pub mod focus;
pub mod geometry;
pub mod host;
pub mod item;
pub mod keys;
pub mod launcher;
pub mod list;
pub mod pinned;
pub mod popup;
pub mod power;
pub mod shell_item;
pub mod timer;

#[cfg(test)]
pub(crate) mod testing;

pub use catalog::{AppCatalog, CatalogEntry, DesktopCatalog};
pub use config::{Config, ConfigManager};
pub use error::PopupError;
pub use focus::{FocusNavigation, FocusRegistry};
pub use geometry::{Placement, Point, Rect, Size};
pub use host::{GrabHandle, Host, SurfaceId};
pub use item::{ItemStyle, NavItem, Navigable, Rgba, StylePair, WidgetId};
pub use keys::{Key, KeyPress, Modifiers};
pub use launcher::{FocusCursor, Launcher, Zone};
pub use list::{ItemFactory, ListMetrics, VirtualList};
pub use pinned::{PinnedEntry, PinnedStore};
pub use popup::{KeyOutcome, Phase, Popup, PopupContent};
pub use power::{CommandRunner, PowerMenu, SystemRunner};
pub use shell_item::{ShellCommand, ShellItem, ShellNavItem, SubFocus};
