//! The item variants the shell popups render, and what activating them means

use crate::catalog::CatalogEntry;
use crate::item::{ItemBehavior, NavItem};
use crate::pinned::PinnedEntry;

/// Which control inside a catalog row holds keyboard focus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubFocus {
    /// The row itself (launch)
    #[default]
    None,
    PinToggle,
    InfoAction,
}

impl SubFocus {
    /// One control to the right; stops at the info action
    pub fn right(self) -> Self {
        match self {
            SubFocus::None => SubFocus::PinToggle,
            SubFocus::PinToggle | SubFocus::InfoAction => SubFocus::InfoAction,
        }
    }

    /// One control to the left; stops at the row itself
    pub fn left(self) -> Self {
        match self {
            SubFocus::InfoAction => SubFocus::PinToggle,
            SubFocus::PinToggle | SubFocus::None => SubFocus::None,
        }
    }
}

/// A catalog row of the launcher list
#[derive(Debug, Clone)]
pub struct AppRow {
    pub entry: CatalogEntry,
    pub pinned: bool,
    pub sub: SubFocus,
}

/// An icon cell of the pinned row
#[derive(Debug, Clone)]
pub struct PinnedCell {
    pub entry: PinnedEntry,
}

/// A button bound to a fixed command line
#[derive(Debug, Clone)]
pub struct ActionButton {
    pub label: String,
    pub command: String,
    pub args: Vec<String>,
}

#[derive(Debug, Clone)]
pub enum ShellItem {
    AppEntry(AppRow),
    PinnedEntry(PinnedCell),
    ActionButton(ActionButton),
}

pub type ShellNavItem = NavItem<ShellItem>;

impl ShellItem {
    pub fn label(&self) -> &str {
        match self {
            ShellItem::AppEntry(row) => &row.entry.display_name,
            ShellItem::PinnedEntry(cell) => &cell.entry.name,
            ShellItem::ActionButton(button) => &button.label,
        }
    }

    pub fn icon(&self) -> Option<&str> {
        match self {
            ShellItem::AppEntry(row) => row.entry.icon_path.as_deref(),
            ShellItem::PinnedEntry(cell) => cell.entry.icon.as_deref(),
            ShellItem::ActionButton(_) => None,
        }
    }
}

/// What the owning popup should do after an item was activated
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Launch { command: String, elevated: bool },
    TogglePin(CatalogEntry),
    /// Remove the pinned entry at this index
    Unpin(usize),
    ShowInfo(CatalogEntry),
    Run {
        label: String,
        command: String,
        args: Vec<String>,
    },
}

impl ItemBehavior for ShellItem {
    type Command = ShellCommand;

    fn activate(&self, _index: usize, secondary: bool) -> Option<ShellCommand> {
        let command = match self {
            ShellItem::AppEntry(row) => match row.sub {
                SubFocus::None => ShellCommand::Launch {
                    command: row.entry.launch_command.clone(),
                    elevated: secondary,
                },
                SubFocus::PinToggle => ShellCommand::TogglePin(row.entry.clone()),
                SubFocus::InfoAction => ShellCommand::ShowInfo(row.entry.clone()),
            },
            ShellItem::PinnedEntry(cell) => ShellCommand::Launch {
                command: cell.entry.exec.clone(),
                elevated: secondary,
            },
            ShellItem::ActionButton(button) => ShellCommand::Run {
                label: button.label.clone(),
                command: button.command.clone(),
                args: button.args.clone(),
            },
        };
        Some(command)
    }

    fn secondary_click(&self, index: usize) -> Option<ShellCommand> {
        match self {
            ShellItem::AppEntry(row) => Some(ShellCommand::TogglePin(row.entry.clone())),
            ShellItem::PinnedEntry(_) => Some(ShellCommand::Unpin(index)),
            ShellItem::ActionButton(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{Navigable, StylePair, WidgetId};

    fn row(sub: SubFocus) -> ShellItem {
        ShellItem::AppEntry(AppRow {
            entry: CatalogEntry::new("Terminal", "alacritty -e fish"),
            pinned: false,
            sub,
        })
    }

    fn cell() -> ShellItem {
        ShellItem::PinnedEntry(PinnedCell {
            entry: PinnedEntry {
                name: "Files".to_string(),
                exec: "nautilus".to_string(),
                icon: Some("folder".to_string()),
            },
        })
    }

    #[test]
    fn test_sub_focus_stops_at_ends() {
        assert_eq!(SubFocus::None.right().right().right(), SubFocus::InfoAction);
        assert_eq!(SubFocus::InfoAction.left().left().left(), SubFocus::None);
    }

    #[test]
    fn test_app_row_dispatch_by_sub_focus() {
        assert_eq!(
            row(SubFocus::None).activate(0, false),
            Some(ShellCommand::Launch {
                command: "alacritty -e fish".to_string(),
                elevated: false,
            })
        );
        assert!(matches!(
            row(SubFocus::PinToggle).activate(0, false),
            Some(ShellCommand::TogglePin(entry)) if entry.display_name == "Terminal"
        ));
        assert!(matches!(
            row(SubFocus::InfoAction).activate(0, true),
            Some(ShellCommand::ShowInfo(_))
        ));
        assert!(matches!(row(SubFocus::None).secondary_click(0), Some(ShellCommand::TogglePin(_))));
    }

    #[test]
    fn test_secondary_mode_elevates_launch() {
        let item = NavItem::new(WidgetId(1), row(SubFocus::None), StylePair::default())
            .with_secondary(true);
        assert_eq!(
            item.on_activate(4),
            Some(ShellCommand::Launch {
                command: "alacritty -e fish".to_string(),
                elevated: true,
            })
        );
    }

    #[test]
    fn test_pinned_cell_dispatch() {
        assert_eq!(
            cell().activate(2, false),
            Some(ShellCommand::Launch {
                command: "nautilus".to_string(),
                elevated: false,
            })
        );
        assert_eq!(cell().secondary_click(2), Some(ShellCommand::Unpin(2)));
        assert_eq!(cell().label(), "Files");
        assert_eq!(cell().icon(), Some("folder"));
    }

    #[test]
    fn test_action_button_has_no_secondary() {
        let button = ShellItem::ActionButton(ActionButton {
            label: "Lock".to_string(),
            command: "loginctl".to_string(),
            args: vec!["lock-session".to_string()],
        });
        assert!(matches!(
            button.activate(0, true),
            Some(ShellCommand::Run { label, .. }) if label == "Lock"
        ));
        assert_eq!(button.secondary_click(0), None);
    }
}
