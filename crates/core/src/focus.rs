//! Focus registry: the single source of truth for which rendered item is selected

use crate::item::{Navigable, WidgetId};

/// Keyboard navigation the popup controller drives by default
/// (Tab, arrows, Home/End, and the reset done on show/hide).
pub trait FocusNavigation {
    fn focus_next(&mut self);
    fn focus_prev(&mut self);
    fn focus_first(&mut self);
    fn focus_last(&mut self);
    fn clear_focus(&mut self);
}

/// Ordered set of the currently rendered items plus the selected index.
///
/// Items are discarded on every render pass; `clear` must run before the
/// next pass registers its items.
#[derive(Debug)]
pub struct FocusRegistry<T> {
    items: Vec<T>,
    current: Option<usize>,
    wrap: bool,
}

impl<T: Navigable> Default for FocusRegistry<T> {
    fn default() -> Self {
        Self::new(true)
    }
}

impl<T: Navigable> FocusRegistry<T> {
    pub fn new(wrap: bool) -> Self {
        Self {
            items: Vec::new(),
            current: None,
            wrap,
        }
    }

    pub fn set_wrap(&mut self, wrap: bool) {
        self.wrap = wrap;
    }

    /// Append an item, returning its index
    pub fn register(&mut self, item: T) -> usize {
        self.items.push(item);
        self.items.len() - 1
    }

    /// Drop every item and forget the selection
    pub fn clear(&mut self) {
        self.items.clear();
        self.current = None;
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn current(&self) -> Option<usize> {
        self.current
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    fn current_item_mut(&mut self) -> Option<&mut T> {
        let index = self.current?;
        self.items.get_mut(index)
    }

    /// Move focus to `index`. Out of range is ignored; focusing the
    /// already focused item changes nothing.
    pub fn focus(&mut self, index: usize) {
        if index >= self.items.len() || self.current == Some(index) {
            return;
        }
        if let Some(previous) = self.current.and_then(|i| self.items.get_mut(i)) {
            previous.on_unfocus();
        }
        self.current = Some(index);
        self.items[index].on_focus();
        log::trace!("focus -> {}", index);
    }

    /// Hover-enter reported by the host for the item at `index`
    pub fn hover_enter(&mut self, index: usize) -> bool {
        match self.items.get(index) {
            Some(item) if item.accepts_hover() => {
                self.focus(index);
                true
            }
            _ => false,
        }
    }

    /// Hover-enter reported by widget handle
    pub fn hover_widget(&mut self, widget: WidgetId) -> bool {
        match self.index_of(widget) {
            Some(index) => self.hover_enter(index),
            None => false,
        }
    }

    pub fn index_of(&self, widget: WidgetId) -> Option<usize> {
        self.items.iter().position(|item| item.widget() == widget)
    }

    pub fn navigate_next(&mut self) {
        let len = self.items.len();
        if len == 0 {
            return;
        }
        let target = match self.current {
            None => 0,
            Some(i) if i + 1 < len => i + 1,
            Some(_) if self.wrap => 0,
            Some(i) => i,
        };
        self.focus(target);
    }

    pub fn navigate_prev(&mut self) {
        let len = self.items.len();
        if len == 0 {
            return;
        }
        let target = match self.current {
            None => len - 1,
            Some(0) if self.wrap => len - 1,
            Some(0) => 0,
            Some(i) => i - 1,
        };
        self.focus(target);
    }

    pub fn unfocus_all(&mut self) {
        if let Some(item) = self.current_item_mut() {
            item.on_unfocus();
        }
        self.current = None;
    }

    /// Command bound to the focused item, if any
    pub fn activate_current(&self) -> Option<T::Command> {
        let index = self.current?;
        self.items.get(index)?.on_activate(index)
    }

    /// Command bound to the item at `index` (pointer click)
    pub fn activate(&mut self, index: usize) -> Option<T::Command> {
        self.focus(index);
        self.items.get(index)?.on_activate(index)
    }

    /// Secondary command bound to the item at `index` (right click)
    pub fn activate_secondary(&self, index: usize) -> Option<T::Command> {
        self.items.get(index)?.on_secondary(index)
    }

    /// Push the secondary-action mode into every item and reapply visuals
    pub fn resync_styles(&mut self, secondary: bool) {
        for item in &mut self.items {
            item.set_secondary(secondary);
        }
    }

    pub fn focused_count(&self) -> usize {
        self.items.iter().filter(|item| item.is_focused()).count()
    }
}

impl<T: Navigable> FocusNavigation for FocusRegistry<T> {
    fn focus_next(&mut self) {
        self.navigate_next();
    }

    fn focus_prev(&mut self) {
        self.navigate_prev();
    }

    fn focus_first(&mut self) {
        self.focus(0);
    }

    fn focus_last(&mut self) {
        if let Some(last) = self.items.len().checked_sub(1) {
            self.focus(last);
        }
    }

    fn clear_focus(&mut self) {
        self.unfocus_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{ItemBehavior, NavItem, StylePair, WidgetIds};

    #[derive(Debug)]
    struct Entry(&'static str);

    impl ItemBehavior for Entry {
        type Command = (&'static str, usize);

        fn activate(&self, index: usize, _secondary: bool) -> Option<Self::Command> {
            Some((self.0, index))
        }
    }

    fn registry(names: &[&'static str], wrap: bool) -> FocusRegistry<NavItem<Entry>> {
        let mut ids = WidgetIds::default();
        let mut registry = FocusRegistry::new(wrap);
        for name in names {
            registry.register(NavItem::new(ids.next_id(), Entry(*name), StylePair::default()));
        }
        registry
    }

    #[test]
    fn test_register_returns_indices() {
        let mut registry = registry(&[], true);
        let mut ids = WidgetIds::default();
        let mut item = |name| NavItem::new(ids.next_id(), Entry(name), StylePair::default());
        assert_eq!(registry.register(item("a")), 0);
        assert_eq!(registry.register(item("b")), 1);
        assert_eq!(registry.current(), None);
    }

    #[test]
    fn test_single_focused_item() {
        let mut registry = registry(&["a", "b", "c", "d"], true);
        for i in [2, 0, 3, 3, 1] {
            registry.focus(i);
            assert_eq!(registry.focused_count(), 1);
            assert_eq!(registry.current(), Some(i));
        }
    }

    #[test]
    fn test_focus_out_of_range_is_ignored() {
        let mut registry = registry(&["a", "b"], true);
        registry.focus(1);
        registry.focus(5);
        assert_eq!(registry.current(), Some(1));
        assert_eq!(registry.focused_count(), 1);
    }

    #[test]
    fn test_navigate_next_wraps_back_to_start() {
        let mut registry = registry(&["a", "b", "c"], true);
        registry.focus(1);
        for _ in 0..registry.len() {
            registry.navigate_next();
        }
        assert_eq!(registry.current(), Some(1));
    }

    #[test]
    fn test_navigate_next_clamps_without_wrap() {
        let mut registry = registry(&["a", "b", "c"], false);
        registry.focus(0);
        for _ in 0..5 {
            registry.navigate_next();
        }
        assert_eq!(registry.current(), Some(2));
        registry.navigate_next();
        assert_eq!(registry.current(), Some(2));
        assert_eq!(registry.focused_count(), 1);
    }

    #[test]
    fn test_navigate_prev_from_nothing_focuses_last() {
        let mut registry = registry(&["a", "b", "c"], false);
        registry.navigate_prev();
        assert_eq!(registry.current(), Some(2));
        registry.focus(0);
        registry.navigate_prev();
        assert_eq!(registry.current(), Some(0));
    }

    #[test]
    fn test_hover_does_not_refocus_focused_item() {
        let mut registry = registry(&["a", "b"], true);
        assert!(registry.hover_enter(1));
        assert!(!registry.hover_enter(1));
        let widget = registry.get(0).unwrap().widget();
        assert!(registry.hover_widget(widget));
        assert_eq!(registry.current(), Some(0));
    }

    #[test]
    fn test_clear_resets_selection() {
        let mut registry = registry(&["a", "b"], true);
        registry.focus(1);
        registry.clear();
        assert!(registry.is_empty());
        assert_eq!(registry.current(), None);
        assert_eq!(registry.activate_current(), None);
    }

    #[test]
    fn test_activate_current_passes_data_and_index() {
        let mut registry = registry(&["a", "b", "c"], true);
        registry.focus(2);
        assert_eq!(registry.activate_current(), Some(("c", 2)));
        assert_eq!(registry.activate(0), Some(("a", 0)));
        assert_eq!(registry.current(), Some(0));
    }
}
