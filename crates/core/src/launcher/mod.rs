//! Application launcher: search query, pinned row and the catalog list
//!
//! Two focus zones share one cursor. The pinned row is a plain
//! [`FocusRegistry`]; the catalog is a [`VirtualList`] over the filtered
//! entries. Only one zone holds focus at a time and moving between them never
//! wraps.

mod factory;

pub use factory::AppRowFactory;

use crate::catalog::{filter_entries, AppCatalog, CatalogEntry};
use crate::config::LauncherConfig;
use crate::error::PopupError;
use crate::focus::{FocusNavigation, FocusRegistry};
use crate::geometry::Size;
use crate::item::{Navigable, StylePair, WidgetId};
use crate::keys::{Key, KeyPress, Modifiers};
use crate::list::{ListMetrics, VirtualList};
use crate::pinned::{Direction, PinnedEntry, PinnedStore};
use crate::popup::{KeyOutcome, PopupContent};
use crate::shell_item::{ShellCommand, ShellNavItem, SubFocus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
    PinnedRow,
    ListRow,
}

/// Where keyboard focus is. `sub` only means something in the list zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusCursor {
    pub zone: Zone,
    pub index: Option<usize>,
    pub sub: SubFocus,
}

#[derive(Debug, Clone, Copy)]
struct DragState {
    origin_x: f32,
    index: usize,
    /// Set once the gesture swapped anything; the release then does not launch
    dragged: bool,
}

fn list_metrics(config: &LauncherConfig) -> ListMetrics {
    ListMetrics {
        container_height: config.height,
        fixed_chrome: config.fixed_chrome,
        item_height: config.item_height,
    }
}

pub struct Launcher {
    catalog: Box<dyn AppCatalog>,
    config: LauncherConfig,
    /// Full catalog as fetched on the last show
    all: Vec<CatalogEntry>,
    query: String,
    list: VirtualList<CatalogEntry, AppRowFactory>,
    pinned: PinnedStore,
    pinned_row: FocusRegistry<ShellNavItem>,
    zone: Zone,
    sub: SubFocus,
    drag: Option<DragState>,
    secondary: bool,
    structural_change: bool,
}

impl Launcher {
    pub fn new(
        catalog: Box<dyn AppCatalog>,
        pinned: PinnedStore,
        config: LauncherConfig,
        styles: StylePair,
    ) -> Self {
        let list = VirtualList::new(
            AppRowFactory::new(styles),
            list_metrics(&config),
            config.wrap_list,
        );
        let mut launcher = Self {
            catalog,
            config,
            all: Vec::new(),
            query: String::new(),
            list,
            pinned,
            pinned_row: FocusRegistry::new(false),
            zone: Zone::ListRow,
            sub: SubFocus::None,
            drag: None,
            secondary: false,
            structural_change: false,
        };
        launcher.rebuild_pinned(None);
        launcher
    }

    pub fn set_config(&mut self, config: LauncherConfig) {
        self.list.set_wrap(config.wrap_list);
        self.list.set_metrics(list_metrics(&config));
        let max_pinned = config.max_pinned;
        self.config = config;
        if self.pinned.set_max(max_pinned) {
            let focus = self.pinned_row.current();
            self.rebuild_pinned(focus);
        }
        self.structural_change = true;
    }

    pub fn config(&self) -> &LauncherConfig {
        &self.config
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn list(&self) -> &VirtualList<CatalogEntry, AppRowFactory> {
        &self.list
    }

    pub fn pinned_row(&self) -> &FocusRegistry<ShellNavItem> {
        &self.pinned_row
    }

    pub fn pinned(&self) -> &PinnedStore {
        &self.pinned
    }

    pub fn is_secondary(&self) -> bool {
        self.secondary
    }

    /// A pinned cell is held down
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn cursor(&self) -> FocusCursor {
        match self.zone {
            Zone::PinnedRow => FocusCursor {
                zone: Zone::PinnedRow,
                index: self.pinned_row.current(),
                sub: SubFocus::None,
            },
            Zone::ListRow => FocusCursor {
                zone: Zone::ListRow,
                index: self.list.focused_index(),
                sub: self.sub,
            },
        }
    }

    /// Replace the search text and re-filter
    pub fn set_query(&mut self, query: &str) {
        self.query = query.to_string();
        self.refilter();
    }

    /// Height the host actually gave the launcher surface
    pub fn set_container_height(&mut self, height: f32) {
        let before = self.list.metrics();
        self.list.set_container_height(height);
        if self.list.metrics() != before {
            log::debug!("launcher: {} rows fit in {}px", self.list.page_size(), height);
            self.structural_change = true;
        }
    }

    fn refilter(&mut self) {
        let filtered = filter_entries(&self.all, &self.query);
        log::debug!(
            "launcher: {:?} matches {} of {}",
            self.query,
            filtered.len(),
            self.all.len()
        );
        self.sub = SubFocus::None;
        self.list.factory_mut().set_sub_focus(None);
        self.list.set_data(filtered);
        self.pinned_row.unfocus_all();
        self.zone = Zone::ListRow;
        self.list.focus_item(0);
        self.structural_change = true;
    }

    /// Re-register the pinned cells, focusing `focus` (or the nearest
    /// remaining cell) when the pinned row holds focus
    fn rebuild_pinned(&mut self, focus: Option<usize>) {
        self.pinned_row.clear();
        self.list.factory_mut().set_pinned(self.pinned.entries());
        for entry in self.pinned.entries() {
            let cell = self.list.factory_mut().build_pinned(entry);
            self.pinned_row.register(cell);
        }
        // row pin markers depend on the pinned set
        self.list.rerender();

        if self.zone == Zone::PinnedRow {
            let len = self.pinned_row.len();
            match focus.filter(|i| *i < len).or(len.checked_sub(1)) {
                Some(index) => self.pinned_row.focus(index),
                None => self.enter_list(0),
            }
        }
        self.structural_change = true;
    }

    fn enter_pinned(&mut self, index: usize) {
        if index >= self.pinned_row.len() {
            return;
        }
        self.clear_sub();
        self.list.clear_focus();
        self.zone = Zone::PinnedRow;
        self.pinned_row.focus(index);
    }

    fn enter_list(&mut self, index: usize) {
        self.pinned_row.unfocus_all();
        self.zone = Zone::ListRow;
        self.clear_sub();
        self.list.focus_item(index);
    }

    fn clear_sub(&mut self) {
        if self.sub == SubFocus::None {
            return;
        }
        self.sub = SubFocus::None;
        self.list.factory_mut().set_sub_focus(None);
        self.list.rerender();
    }

    fn set_sub(&mut self, sub: SubFocus) {
        let Some(index) = self.list.focused_index() else {
            return;
        };
        if sub == self.sub {
            return;
        }
        self.sub = sub;
        self.list.factory_mut().set_sub_focus(Some((index, sub)));
        self.list.ensure_visible(index);
    }

    fn move_up(&mut self) {
        if self.zone == Zone::PinnedRow {
            return;
        }
        let at_top = self.list.focused_index().map_or(true, |i| i == 0);
        if at_top && !self.pinned_row.is_empty() {
            self.enter_pinned(0);
        } else {
            self.clear_sub();
            self.list.navigate_prev();
        }
    }

    fn move_down(&mut self) {
        match self.zone {
            Zone::PinnedRow => {
                if self.list.count() > 0 {
                    self.enter_list(0);
                }
            }
            Zone::ListRow => {
                self.clear_sub();
                self.list.navigate_next();
            }
        }
    }

    fn move_horizontal(&mut self, direction: Direction, modifiers: Modifiers) {
        match self.zone {
            Zone::PinnedRow if modifiers.contains(self.config.reorder_modifier.flag()) => {
                if let Some(index) = self.pinned_row.current() {
                    self.move_pinned(index, direction);
                }
            }
            Zone::PinnedRow => match direction {
                Direction::Left => self.pinned_row.navigate_prev(),
                Direction::Right => self.pinned_row.navigate_next(),
            },
            Zone::ListRow => {
                let sub = match direction {
                    Direction::Left => self.sub.left(),
                    Direction::Right => self.sub.right(),
                };
                self.set_sub(sub);
            }
        }
    }

    /// Swap a pinned entry with its neighbor and keep focus on it
    fn move_pinned(&mut self, index: usize, direction: Direction) -> Option<usize> {
        let moved = self.pinned.move_entry(index, direction)?;
        log::debug!("launcher: pinned {} -> {}", index, moved);
        self.rebuild_pinned(Some(moved));
        Some(moved)
    }

    fn page(&mut self, down: bool) {
        if self.zone != Zone::ListRow || self.list.count() == 0 {
            return;
        }
        let current = self.list.focused_index().unwrap_or(0);
        let step = self.list.page_size();
        let target = if down {
            (current + step).min(self.list.count() - 1)
        } else {
            current.saturating_sub(step)
        };
        self.clear_sub();
        self.list.focus_item(target);
    }

    fn execute(&mut self, command: ShellCommand) -> KeyOutcome {
        match command {
            ShellCommand::Launch { command, elevated } => {
                let helper = elevated.then_some(self.config.elevate_command.as_str());
                if let Err(e) = self.catalog.launch(&command, helper) {
                    log::error!("Failed to launch {:?}: {:#}", command, e);
                }
                KeyOutcome::Close
            }
            ShellCommand::TogglePin(entry) => {
                self.toggle_pin(&entry);
                KeyOutcome::Handled
            }
            ShellCommand::Unpin(index) => {
                if let Some(removed) = self.pinned.unpin(index) {
                    log::info!("Unpinned {}", removed.name);
                    self.rebuild_pinned(Some(index));
                }
                KeyOutcome::Handled
            }
            ShellCommand::ShowInfo(entry) => {
                self.show_info(&entry);
                KeyOutcome::Handled
            }
            ShellCommand::Run { command, args, .. } => {
                let line = std::iter::once(command).chain(args).collect::<Vec<_>>().join(" ");
                self.execute(ShellCommand::Launch {
                    command: line,
                    elevated: false,
                })
            }
        }
    }

    fn toggle_pin(&mut self, entry: &CatalogEntry) {
        match self.pinned.position(&entry.launch_command) {
            Some(index) => {
                self.pinned.unpin(index);
                log::info!("Unpinned {}", entry.display_name);
            }
            None => {
                let pinned = PinnedEntry {
                    name: entry.display_name.clone(),
                    exec: entry.launch_command.clone(),
                    icon: entry.icon_path.clone(),
                };
                if !self.pinned.pin(pinned) {
                    return;
                }
                log::info!("Pinned {}", entry.display_name);
            }
        }
        let focus = self.pinned_row.current();
        self.rebuild_pinned(focus);
    }

    fn show_info(&self, entry: &CatalogEntry) {
        if entry.source_path.as_os_str().is_empty() {
            log::info!("{}: {}", entry.display_name, entry.launch_command);
            return;
        }
        if let Err(e) = self.catalog.open(&entry.source_path) {
            log::error!("{:#}", e);
        }
    }

    /// Primary button pressed on a pinned cell at pointer x
    pub fn pinned_press(&mut self, index: usize, x: f32) {
        if index >= self.pinned_row.len() {
            return;
        }
        self.enter_pinned(index);
        self.drag = Some(DragState {
            origin_x: x,
            index,
            dragged: false,
        });
    }

    /// Pointer moved while a pinned cell is held
    pub fn pointer_motion(&mut self, x: f32) {
        let Some(mut drag) = self.drag else {
            return;
        };
        let dx = x - drag.origin_x;
        let cell = self.config.icon_cell_width.max(1.0);
        let direction = if dx > cell {
            Direction::Right
        } else if dx < -cell {
            Direction::Left
        } else {
            return;
        };
        if let Some(moved) = self.move_pinned(drag.index, direction) {
            drag.index = moved;
            drag.origin_x = x;
            drag.dragged = true;
        }
        self.drag = Some(drag);
    }

    /// Primary button released; launches unless the gesture reordered
    pub fn pinned_release(&mut self) -> KeyOutcome {
        let Some(drag) = self.drag.take() else {
            return KeyOutcome::Ignored;
        };
        if drag.dragged {
            return KeyOutcome::Handled;
        }
        match self.pinned_row.activate(drag.index) {
            Some(command) => self.execute(command),
            None => KeyOutcome::Handled,
        }
    }

    pub fn pinned_secondary_click(&mut self, index: usize) -> KeyOutcome {
        match self.pinned_row.activate_secondary(index) {
            Some(command) => self.execute(command),
            None => KeyOutcome::Ignored,
        }
    }

    /// Click on the rendered list row at `local`
    pub fn list_click(&mut self, local: usize) -> KeyOutcome {
        self.list_control_click(local, SubFocus::None)
    }

    /// Click on the row itself or one of its inline controls
    pub fn list_control_click(&mut self, local: usize, sub: SubFocus) -> KeyOutcome {
        let global = self.list.start() + local;
        if global >= self.list.count() {
            return KeyOutcome::Ignored;
        }
        self.enter_list(global);
        self.set_sub(sub);
        match self.list.activate_current() {
            Some(command) => self.execute(command),
            None => KeyOutcome::Handled,
        }
    }

    pub fn list_secondary_click(&mut self, local: usize) -> KeyOutcome {
        let global = self.list.start() + local;
        if global >= self.list.count() {
            return KeyOutcome::Ignored;
        }
        self.enter_list(global);
        match self.list.activate_secondary_local(local) {
            Some(command) => self.execute(command),
            None => KeyOutcome::Handled,
        }
    }

    /// Wheel over the list; positive notches scroll down
    pub fn scroll(&mut self, notches: i32) -> KeyOutcome {
        let rows = self.config.scroll_step.max(1) * notches.unsigned_abs() as usize;
        match notches {
            0 => return KeyOutcome::Ignored,
            n if n > 0 => self.list.scroll_down(rows),
            _ => self.list.scroll_up(rows),
        }
        self.structural_change = true;
        KeyOutcome::Handled
    }
}

impl FocusNavigation for Launcher {
    fn focus_next(&mut self) {
        self.move_down();
    }

    fn focus_prev(&mut self) {
        self.move_up();
    }

    fn focus_first(&mut self) {
        match self.zone {
            Zone::PinnedRow => self.pinned_row.focus(0),
            Zone::ListRow if self.list.count() > 0 => self.enter_list(0),
            Zone::ListRow => self.enter_pinned(0),
        }
    }

    fn focus_last(&mut self) {
        match self.zone {
            Zone::PinnedRow => {
                if let Some(last) = self.pinned_row.len().checked_sub(1) {
                    self.pinned_row.focus(last);
                }
            }
            Zone::ListRow => {
                if let Some(last) = self.list.count().checked_sub(1) {
                    self.enter_list(last);
                }
            }
        }
    }

    fn clear_focus(&mut self) {
        self.clear_sub();
        self.list.clear_focus();
        self.pinned_row.unfocus_all();
        self.zone = Zone::ListRow;
    }
}

impl PopupContent for Launcher {
    fn name(&self) -> &'static str {
        "launcher"
    }

    fn build(&mut self) -> Result<Size, PopupError> {
        self.all = match self.catalog.entries() {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!("Application catalog unavailable: {:#}", e);
                Vec::new()
            }
        };
        self.rebuild_pinned(None);
        self.refilter();
        log::info!(
            "launcher: {} applications, {} pinned",
            self.all.len(),
            self.pinned.len()
        );
        Ok(Size::new(self.config.width, self.config.height))
    }

    fn navigation(&mut self) -> &mut dyn FocusNavigation {
        self
    }

    fn activate(&mut self, key: &KeyPress) -> KeyOutcome {
        let held = key.modifiers.contains(self.config.secondary_modifier.flag());
        let command = match self.zone {
            Zone::ListRow => {
                let start = self.list.start();
                let command = self.list.activate_current();
                if self.list.start() != start {
                    self.structural_change = true;
                }
                command
            }
            Zone::PinnedRow => self.pinned_row.activate_current(),
        };
        match command {
            Some(ShellCommand::Launch { command, elevated }) => self.execute(ShellCommand::Launch {
                command,
                elevated: elevated || held,
            }),
            Some(command) => self.execute(command),
            None => KeyOutcome::Handled,
        }
    }

    fn intercept_key(&mut self, key: &KeyPress) -> KeyOutcome {
        let typing = !key
            .modifiers
            .intersects(Modifiers::CONTROL | Modifiers::ALT | Modifiers::SUPER);
        match &key.key {
            Key::Up => self.move_up(),
            Key::Down => self.move_down(),
            Key::Left => self.move_horizontal(Direction::Left, key.modifiers),
            Key::Right => self.move_horizontal(Direction::Right, key.modifiers),
            Key::PageUp => self.page(false),
            Key::PageDown => self.page(true),
            Key::Backspace => {
                if self.query.pop().is_some() {
                    self.refilter();
                }
            }
            Key::Char(c) if typing && !c.is_control() => {
                self.query.push(*c);
                self.refilter();
            }
            _ => return KeyOutcome::Ignored,
        }
        KeyOutcome::Handled
    }

    fn before_show(&mut self) {
        self.query.clear();
        self.drag = None;
        self.zone = Zone::ListRow;
        self.clear_sub();
    }

    fn on_hide(&mut self) {
        self.drag = None;
    }

    fn hover_widget(&mut self, widget: WidgetId) -> bool {
        if self.drag.is_some() {
            return false;
        }
        if let Some(local) = self.list.registry().index_of(widget) {
            if !self.list.visible()[local].accepts_hover() {
                return false;
            }
            self.pinned_row.unfocus_all();
            self.zone = Zone::ListRow;
            self.clear_sub();
            return self.list.hover(local);
        }
        if let Some(index) = self.pinned_row.index_of(widget) {
            if !self.pinned_row.items()[index].accepts_hover() {
                return false;
            }
            self.clear_sub();
            self.list.clear_focus();
            self.zone = Zone::PinnedRow;
            return self.pinned_row.hover_enter(index);
        }
        false
    }

    fn modifiers_changed(&mut self, modifiers: Modifiers) {
        let secondary = modifiers.contains(self.config.secondary_modifier.flag());
        if secondary == self.secondary {
            return;
        }
        self.secondary = secondary;
        self.list.factory_mut().set_secondary(secondary);
        self.list.resync_styles(secondary);
        self.pinned_row.resync_styles(secondary);
        log::debug!("launcher: secondary mode {}", secondary);
    }

    fn take_structural_change(&mut self) -> bool {
        std::mem::take(&mut self.structural_change)
    }
}
