use crate::catalog::CatalogEntry;
use crate::item::{NavItem, StylePair, WidgetIds};
use crate::list::ItemFactory;
use crate::pinned::PinnedEntry;
use crate::shell_item::{AppRow, PinnedCell, ShellItem, ShellNavItem, SubFocus};
use std::collections::HashSet;

/// Builds launcher rows and pinned cells. Both zones draw their widget ids
/// from here so a hovered widget maps to exactly one item.
pub struct AppRowFactory {
    ids: WidgetIds,
    styles: StylePair,
    /// Launch commands currently pinned
    pinned: HashSet<String>,
    secondary: bool,
    /// Global list index and the control focused inside that row
    sub_focus: Option<(usize, SubFocus)>,
}

impl AppRowFactory {
    pub fn new(styles: StylePair) -> Self {
        Self {
            ids: WidgetIds::default(),
            styles,
            pinned: HashSet::new(),
            secondary: false,
            sub_focus: None,
        }
    }

    pub fn set_pinned<'a>(&mut self, entries: impl IntoIterator<Item = &'a PinnedEntry>) {
        self.pinned = entries.into_iter().map(|e| e.exec.clone()).collect();
    }

    pub fn set_secondary(&mut self, secondary: bool) {
        self.secondary = secondary;
    }

    pub fn set_sub_focus(&mut self, sub_focus: Option<(usize, SubFocus)>) {
        self.sub_focus = sub_focus;
    }

    pub fn build_pinned(&mut self, entry: &PinnedEntry) -> ShellNavItem {
        let cell = ShellItem::PinnedEntry(PinnedCell {
            entry: entry.clone(),
        });
        NavItem::new(self.ids.next_id(), cell, self.styles).with_secondary(self.secondary)
    }
}

impl ItemFactory<CatalogEntry> for AppRowFactory {
    type Item = ShellNavItem;

    fn build(&mut self, data: &CatalogEntry, index: usize) -> ShellNavItem {
        let sub = match self.sub_focus {
            Some((focused, sub)) if focused == index => sub,
            _ => SubFocus::None,
        };
        let row = ShellItem::AppEntry(AppRow {
            entry: data.clone(),
            pinned: self.pinned.contains(&data.launch_command),
            sub,
        });
        NavItem::new(self.ids.next_id(), row, self.styles).with_secondary(self.secondary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::Navigable;

    #[test]
    fn test_rows_carry_pinned_flag_and_sub_focus() {
        let mut factory = AppRowFactory::new(StylePair::default());
        let pinned = [PinnedEntry {
            name: "Files".to_string(),
            exec: "files".to_string(),
            icon: None,
        }];
        factory.set_pinned(&pinned);
        factory.set_sub_focus(Some((1, SubFocus::InfoAction)));

        let first = factory.build(&CatalogEntry::new("Files", "files"), 0);
        let second = factory.build(&CatalogEntry::new("Editor", "editor"), 1);

        let ShellItem::AppEntry(row) = &first.data else {
            panic!("expected a catalog row");
        };
        assert!(row.pinned);
        assert_eq!(row.sub, SubFocus::None);

        let ShellItem::AppEntry(row) = &second.data else {
            panic!("expected a catalog row");
        };
        assert!(!row.pinned);
        assert_eq!(row.sub, SubFocus::InfoAction);
        assert_ne!(first.widget(), second.widget());
    }

    #[test]
    fn test_ids_unique_across_zones() {
        let mut factory = AppRowFactory::new(StylePair::default());
        factory.set_secondary(true);
        let cell = factory.build_pinned(&PinnedEntry {
            name: "Term".to_string(),
            exec: "term".to_string(),
            icon: None,
        });
        let row = factory.build(&CatalogEntry::new("Term", "term"), 0);
        assert_ne!(cell.widget(), row.widget());
        assert!(cell.is_secondary());
        assert!(row.is_secondary());
    }
}
