//! Recording test doubles for the host and the application catalog

use crate::catalog::{AppCatalog, CatalogEntry};
use crate::geometry::{Point, Rect, Size};
use crate::host::{GrabHandle, Host, SurfaceId};
use crate::item::WidgetId;
use crate::keys::KeyPress;
use anyhow::{bail, Result};
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

pub struct MockHost {
    pub screen: Rect,
    pub pointer: Point,
    pub natural: Option<Size>,
    pub under_pointer: Option<WidgetId>,
    pub surfaces_created: usize,
    pub overlays: Vec<SurfaceId>,
    pub geometry: HashMap<SurfaceId, Rect>,
    pub visible: HashMap<SurfaceId, bool>,
    pub grabs_started: usize,
    pub active_grab: Option<u64>,
    pub focus_cleared: usize,
    pub focus_restored: usize,
    pub passed_through: Vec<KeyPress>,
}

impl Default for MockHost {
    fn default() -> Self {
        Self {
            screen: Rect::new(0.0, 0.0, 1920.0, 1080.0),
            pointer: Point::new(100.0, 100.0),
            natural: None,
            under_pointer: None,
            surfaces_created: 0,
            overlays: Vec::new(),
            geometry: HashMap::new(),
            visible: HashMap::new(),
            grabs_started: 0,
            active_grab: None,
            focus_cleared: 0,
            focus_restored: 0,
            passed_through: Vec::new(),
        }
    }
}

impl MockHost {
    pub fn is_visible(&self, surface: SurfaceId) -> bool {
        self.visible.get(&surface).copied().unwrap_or(false)
    }

    fn next_surface(&mut self) -> SurfaceId {
        self.surfaces_created += 1;
        SurfaceId(self.surfaces_created as u64)
    }
}

impl Host for MockHost {
    fn pointer_position(&self) -> Point {
        self.pointer
    }

    fn screen_at_pointer(&self) -> Rect {
        self.screen
    }

    fn create_surface(&mut self) -> SurfaceId {
        self.next_surface()
    }

    fn create_overlay(&mut self) -> SurfaceId {
        let surface = self.next_surface();
        self.overlays.push(surface);
        surface
    }

    fn set_geometry(&mut self, surface: SurfaceId, rect: Rect) {
        self.geometry.insert(surface, rect);
    }

    fn set_visible(&mut self, surface: SurfaceId, visible: bool) {
        self.visible.insert(surface, visible);
    }

    fn natural_size(&self, _surface: SurfaceId) -> Option<Size> {
        self.natural
    }

    fn start_grab(&mut self) -> GrabHandle {
        assert!(self.active_grab.is_none(), "second modal grab while one is active");
        self.grabs_started += 1;
        let id = self.grabs_started as u64;
        self.active_grab = Some(id);
        GrabHandle(id)
    }

    fn stop_grab(&mut self, grab: GrabHandle) {
        assert_eq!(self.active_grab, Some(grab.0), "stopping a grab that is not active");
        self.active_grab = None;
    }

    fn clear_client_focus(&mut self) {
        self.focus_cleared += 1;
    }

    fn restore_focus_under_pointer(&mut self) {
        self.focus_restored += 1;
    }

    fn widget_under_pointer(&self) -> Option<WidgetId> {
        self.under_pointer
    }

    fn dispatch_global_key(&mut self, key: &KeyPress) {
        self.passed_through.push(key.clone());
    }
}

/// What a [`StaticCatalog`] was asked to do, shared with the test
#[derive(Debug, Default)]
pub struct CatalogLog {
    pub fetches: usize,
    pub launches: Vec<(String, bool)>,
    /// Elevation helper of every elevated launch
    pub helpers: Vec<String>,
    pub opened: Vec<PathBuf>,
}

/// In-memory catalog
pub struct StaticCatalog {
    pub entries: Vec<CatalogEntry>,
    pub fail_fetch: bool,
    pub log: Rc<RefCell<CatalogLog>>,
}

impl StaticCatalog {
    pub fn new(names: &[&str]) -> Self {
        Self {
            entries: names
                .iter()
                .map(|name| CatalogEntry::new(*name, name.to_lowercase()))
                .collect(),
            fail_fetch: false,
            log: Rc::default(),
        }
    }
}

impl AppCatalog for StaticCatalog {
    fn entries(&self) -> Result<Vec<CatalogEntry>> {
        self.log.borrow_mut().fetches += 1;
        if self.fail_fetch {
            bail!("catalog unavailable");
        }
        Ok(self.entries.clone())
    }

    fn launch(&self, command: &str, elevate_with: Option<&str>) -> Result<()> {
        let mut log = self.log.borrow_mut();
        log.launches.push((command.to_string(), elevate_with.is_some()));
        if let Some(helper) = elevate_with {
            log.helpers.push(helper.to_string());
        }
        Ok(())
    }

    fn open(&self, path: &Path) -> Result<()> {
        self.log.borrow_mut().opened.push(path.to_path_buf());
        Ok(())
    }
}
