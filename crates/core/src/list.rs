//! Virtualized list: full backing data, bounded rendered window
//!
//! Only `page_size` items exist as [`Navigable`] items at any time. Every
//! scroll, data change or resize rebuilds them through an [`ItemFactory`] and
//! re-registers them with the list's own [`FocusRegistry`]. The focused
//! position is remembered as a global index so it survives items being
//! thrown away.

use crate::focus::{FocusNavigation, FocusRegistry};
use crate::item::{Navigable, WidgetId};

/// Builds the rendered item for one data element
pub trait ItemFactory<T> {
    type Item: Navigable;

    fn build(&mut self, data: &T, index: usize) -> Self::Item;
}

/// Vertical measurements the page size is derived from
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ListMetrics {
    pub container_height: f32,
    /// Space inside the container taken by non-row content (search box, pinned row...)
    pub fixed_chrome: f32,
    pub item_height: f32,
}

impl ListMetrics {
    /// Rows that fit, at least one. A non-positive item height counts as one row.
    pub fn page_size(&self) -> usize {
        if self.item_height <= 0.0 || !self.item_height.is_finite() {
            return 1;
        }
        let usable = (self.container_height - self.fixed_chrome).max(0.0);
        ((usable / self.item_height).floor() as usize).max(1)
    }
}

pub struct VirtualList<T, F: ItemFactory<T>> {
    data: Vec<T>,
    start: usize,
    page_size: usize,
    focused: Option<usize>,
    metrics: ListMetrics,
    wrap: bool,
    registry: FocusRegistry<F::Item>,
    factory: F,
}

impl<T, F: ItemFactory<T>> VirtualList<T, F> {
    pub fn new(factory: F, metrics: ListMetrics, wrap: bool) -> Self {
        Self {
            data: Vec::new(),
            start: 0,
            page_size: metrics.page_size(),
            focused: None,
            metrics,
            wrap,
            registry: FocusRegistry::new(false),
            factory,
        }
    }

    /// Replace the backing data; scroll to the top and drop the focus
    pub fn set_data(&mut self, data: Vec<T>) {
        self.data = data;
        self.start = 0;
        self.focused = None;
        self.rerender();
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn count(&self) -> usize {
        self.data.len()
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn metrics(&self) -> ListMetrics {
        self.metrics
    }

    pub fn focused_index(&self) -> Option<usize> {
        self.focused
    }

    /// Largest valid window start
    pub fn max_start(&self) -> usize {
        self.data.len().saturating_sub(self.page_size)
    }

    /// Rendered items, in window order
    pub fn visible(&self) -> &[F::Item] {
        self.registry.items()
    }

    pub fn visible_data(&self) -> &[T] {
        let end = (self.start + self.page_size).min(self.data.len());
        &self.data[self.start.min(end)..end]
    }

    pub fn has_items_above(&self) -> bool {
        self.start > 0
    }

    pub fn has_items_below(&self) -> bool {
        self.start < self.max_start()
    }

    pub fn registry(&self) -> &FocusRegistry<F::Item> {
        &self.registry
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }

    /// Factory access for changing what new items look like; call
    /// [`VirtualList::rerender`] afterwards.
    pub fn factory_mut(&mut self) -> &mut F {
        &mut self.factory
    }

    pub fn scroll_up(&mut self, step: usize) {
        self.start = self.start.saturating_sub(step.max(1));
        self.rerender();
    }

    pub fn scroll_down(&mut self, step: usize) {
        self.start = (self.start + step.max(1)).min(self.max_start());
        self.rerender();
    }

    /// Move the window the least amount needed for `index` to be rendered
    pub fn ensure_visible(&mut self, index: usize) {
        if index >= self.data.len() {
            return;
        }
        if index < self.start {
            self.start = index;
        } else if index >= self.start + self.page_size {
            self.start = index + 1 - self.page_size;
        }
        self.rerender();
    }

    /// Focus by global index, scrolling it into view
    pub fn focus_item(&mut self, index: usize) {
        if index >= self.data.len() {
            return;
        }
        self.focused = Some(index);
        self.ensure_visible(index);
    }

    pub fn set_container_height(&mut self, height: f32) {
        if (self.metrics.container_height - height).abs() < f32::EPSILON {
            return;
        }
        self.metrics.container_height = height;
        self.apply_metrics();
    }

    pub fn set_metrics(&mut self, metrics: ListMetrics) {
        self.metrics = metrics;
        self.apply_metrics();
    }

    fn apply_metrics(&mut self) {
        self.page_size = self.metrics.page_size();
        self.start = self.start.min(self.max_start());
        self.rerender();
    }

    pub fn set_wrap(&mut self, wrap: bool) {
        self.wrap = wrap;
    }

    /// Rebuild every rendered item from the current window
    pub fn rerender(&mut self) {
        self.registry.clear();
        let end = (self.start + self.page_size).min(self.data.len());
        for index in self.start..end {
            let item = self.factory.build(&self.data[index], index);
            let local = self.registry.register(item);
            if self.focused == Some(index) {
                self.registry.focus(local);
            }
        }
    }

    /// Hover-enter on the rendered row at `local`
    pub fn hover(&mut self, local: usize) -> bool {
        let moved = self.registry.hover_enter(local);
        if moved {
            self.focused = Some(self.start + local);
        }
        moved
    }

    pub fn hover_widget(&mut self, widget: WidgetId) -> bool {
        match self.registry.index_of(widget) {
            Some(local) => self.hover(local),
            None => false,
        }
    }

    /// Command of the focused row. A row scrolled out of the window is
    /// scrolled back in first.
    pub fn activate_current(&mut self) -> Option<<F::Item as Navigable>::Command> {
        let focused = self.focused?;
        if focused < self.start || focused >= self.start + self.page_size {
            self.ensure_visible(focused);
        }
        let local = focused.checked_sub(self.start)?;
        self.registry.get(local)?.on_activate(focused)
    }

    /// Secondary click on the rendered row at `local`
    pub fn activate_secondary_local(
        &self,
        local: usize,
    ) -> Option<<F::Item as Navigable>::Command> {
        self.registry.get(local)?.on_secondary(self.start + local)
    }

    pub fn resync_styles(&mut self, secondary: bool) {
        self.registry.resync_styles(secondary);
    }

    pub fn navigate_next(&mut self) {
        let count = self.data.len();
        if count == 0 {
            return;
        }
        let target = match self.focused {
            None => 0,
            Some(i) if i + 1 < count => i + 1,
            Some(_) if self.wrap => 0,
            Some(i) => i,
        };
        self.focus_item(target);
    }

    pub fn navigate_prev(&mut self) {
        let count = self.data.len();
        if count == 0 {
            return;
        }
        let target = match self.focused {
            None => count - 1,
            Some(0) if self.wrap => count - 1,
            Some(0) => 0,
            Some(i) => i - 1,
        };
        self.focus_item(target);
    }
}

impl<T, F: ItemFactory<T>> FocusNavigation for VirtualList<T, F> {
    fn focus_next(&mut self) {
        self.navigate_next();
    }

    fn focus_prev(&mut self) {
        self.navigate_prev();
    }

    fn focus_first(&mut self) {
        self.focus_item(0);
    }

    fn focus_last(&mut self) {
        if let Some(last) = self.data.len().checked_sub(1) {
            self.focus_item(last);
        }
    }

    fn clear_focus(&mut self) {
        self.focused = None;
        self.registry.unfocus_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{ItemBehavior, NavItem, StylePair, WidgetIds};

    struct Row(String);

    impl ItemBehavior for Row {
        type Command = (String, usize);

        fn activate(&self, index: usize, _secondary: bool) -> Option<Self::Command> {
            Some((self.0.clone(), index))
        }
    }

    #[derive(Default)]
    struct RowFactory {
        ids: WidgetIds,
        built: usize,
    }

    impl ItemFactory<String> for RowFactory {
        type Item = NavItem<Row>;

        fn build(&mut self, data: &String, _index: usize) -> NavItem<Row> {
            self.built += 1;
            NavItem::new(self.ids.next_id(), Row(data.clone()), StylePair::default())
        }
    }

    fn metrics(rows: usize) -> ListMetrics {
        ListMetrics {
            container_height: 40.0 + rows as f32 * 30.0,
            fixed_chrome: 40.0,
            item_height: 30.0,
        }
    }

    fn list(names: &[&str], rows: usize) -> VirtualList<String, RowFactory> {
        let mut list = VirtualList::new(RowFactory::default(), metrics(rows), false);
        list.set_data(names.iter().map(|n| n.to_string()).collect());
        list
    }

    fn visible_names(list: &VirtualList<String, RowFactory>) -> Vec<String> {
        list.visible().iter().map(|item| item.data.0.clone()).collect()
    }

    #[test]
    fn test_page_size_from_metrics() {
        assert_eq!(metrics(5).page_size(), 5);
        let cramped = ListMetrics {
            container_height: 10.0,
            fixed_chrome: 40.0,
            item_height: 30.0,
        };
        assert_eq!(cramped.page_size(), 1);
        let zero = ListMetrics {
            container_height: 100.0,
            fixed_chrome: 0.0,
            item_height: 0.0,
        };
        assert_eq!(zero.page_size(), 1);
    }

    #[test]
    fn test_set_data_counts_and_resets() {
        let mut list = list(&["a", "b", "c", "d"], 2);
        list.focus_item(3);
        list.set_data(vec!["x".into(), "y".into(), "z".into()]);
        assert_eq!(list.count(), 3);
        assert_eq!(list.start(), 0);
        assert_eq!(list.focused_index(), None);
        assert_eq!(visible_names(&list), vec!["x", "y"]);
    }

    #[test]
    fn test_scroll_and_refocus_scenario() {
        let mut list = list(&["A", "B", "C"], 2);
        assert_eq!(visible_names(&list), vec!["A", "B"]);

        list.scroll_down(1);
        assert_eq!(visible_names(&list), vec!["B", "C"]);

        list.focus_item(0);
        assert_eq!(list.start(), 0);
        assert_eq!(visible_names(&list), vec!["A", "B"]);
        assert!(list.visible()[0].is_focused());
        assert_eq!(list.registry().focused_count(), 1);
    }

    #[test]
    fn test_scroll_down_never_passes_max_start() {
        let mut list = list(&["a", "b", "c", "d", "e"], 2);
        for _ in 0..10 {
            list.scroll_down(1);
            assert!(list.start() <= 3);
        }
        assert_eq!(list.start(), 3);
        list.scroll_up(10);
        assert_eq!(list.start(), 0);
    }

    #[test]
    fn test_scroll_with_fewer_items_than_page() {
        let mut list = list(&["a", "b"], 5);
        list.scroll_down(3);
        assert_eq!(list.start(), 0);
        assert_eq!(list.visible().len(), 2);
    }

    #[test]
    fn test_ensure_visible_keeps_index_in_window() {
        let names: Vec<String> = (0..20).map(|i| format!("item{}", i)).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let mut list = list(&refs, 4);
        for k in [7, 19, 0, 12, 11, 3] {
            list.ensure_visible(k);
            assert!(list.start() <= k && k < list.start() + list.page_size());
        }
    }

    #[test]
    fn test_focus_survives_scrolling_out_and_back() {
        let mut list = list(&["a", "b", "c", "d"], 2);
        list.focus_item(1);
        list.scroll_down(2);
        assert_eq!(list.registry().focused_count(), 0);
        assert_eq!(list.focused_index(), Some(1));
        list.scroll_up(2);
        assert!(list.visible()[1].is_focused());
    }

    #[test]
    fn test_navigation_auto_scrolls() {
        let mut list = list(&["a", "b", "c", "d"], 2);
        list.navigate_next();
        list.navigate_next();
        list.navigate_next();
        assert_eq!(list.focused_index(), Some(2));
        assert_eq!(list.start(), 1);
        assert_eq!(list.activate_current(), Some(("c".to_string(), 2)));

        list.focus_last();
        list.navigate_next();
        assert_eq!(list.focused_index(), Some(3));
    }

    #[test]
    fn test_activating_scrolled_away_focus_brings_it_back() {
        let mut list = list(&["a", "b", "c", "d"], 2);
        list.focus_item(0);
        list.scroll_down(2);
        assert_eq!(list.start(), 2);
        assert_eq!(list.focused_index(), Some(0));

        assert_eq!(list.activate_current(), Some(("a".to_string(), 0)));
        assert_eq!(list.start(), 0);
        assert!(list.visible()[0].is_focused());
    }

    #[test]
    fn test_wrap_navigation() {
        let mut list = list(&["a", "b", "c"], 2);
        list.set_wrap(true);
        list.focus_item(2);
        list.navigate_next();
        assert_eq!(list.focused_index(), Some(0));
        list.navigate_prev();
        assert_eq!(list.focused_index(), Some(2));
    }

    #[test]
    fn test_resize_recomputes_page_and_clamps_start() {
        let mut list = list(&["a", "b", "c", "d", "e"], 2);
        list.scroll_down(3);
        assert_eq!(list.start(), 3);
        list.set_container_height(40.0 + 4.0 * 30.0);
        assert_eq!(list.page_size(), 4);
        assert_eq!(list.start(), 1);
        assert_eq!(list.visible().len(), 4);
    }

    #[test]
    fn test_hover_updates_remembered_focus() {
        let mut list = list(&["a", "b", "c", "d"], 2);
        list.scroll_down(1);
        assert!(list.hover(1));
        assert_eq!(list.focused_index(), Some(2));
        assert!(!list.hover(1));
        assert_eq!(list.activate_current(), Some(("c".to_string(), 2)));
    }

    #[test]
    fn test_every_render_pass_rebuilds_items() {
        let mut list = list(&["a", "b", "c"], 2);
        let built = list.factory().built;
        list.scroll_down(1);
        assert_eq!(list.factory().built, built + 2);
        let first = list.visible()[0].widget();
        list.rerender();
        assert_ne!(list.visible()[0].widget(), first);
    }

    #[test]
    fn test_empty_list_is_inert() {
        let mut list = list(&[], 3);
        list.navigate_next();
        list.scroll_down(1);
        list.ensure_visible(0);
        assert_eq!(list.count(), 0);
        assert_eq!(list.focused_index(), None);
        assert_eq!(list.activate_current(), None);
        assert!(list.visible_data().is_empty());
    }
}
