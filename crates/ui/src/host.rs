//! `Host` implementation on top of the eframe root viewport
//!
//! Every popup surface maps onto the single root viewport; only one popup is
//! shown at a time. Overlays are tracked but not drawn.

use egui::{Context, ViewportCommand};
use popshell_core::{GrabHandle, Host, KeyPress, Point, Rect, Size, SurfaceId, WidgetId};
use std::collections::{HashMap, HashSet};

/// Receives keys no popup consumed
pub type Passthrough = Box<dyn FnMut(&KeyPress) + Send>;

pub struct EguiHost {
    ctx: Context,
    next_surface: u64,
    overlays: HashSet<SurfaceId>,
    natural: HashMap<SurfaceId, Size>,
    grab: Option<u64>,
    next_grab: u64,
    hovered: Option<WidgetId>,
    last_pointer: Point,
    passthrough: Passthrough,
}

impl EguiHost {
    pub fn new(ctx: Context, passthrough: Passthrough) -> Self {
        Self {
            ctx,
            next_surface: 0,
            overlays: HashSet::new(),
            natural: HashMap::new(),
            grab: None,
            next_grab: 0,
            hovered: None,
            last_pointer: Point::default(),
            passthrough,
        }
    }

    /// Widget under the pointer as of the frame just drawn
    pub fn set_hovered(&mut self, widget: Option<WidgetId>) {
        self.hovered = widget;
    }

    /// Content size measured while drawing the surface
    pub fn report_size(&mut self, surface: SurfaceId, size: Size) {
        self.natural.insert(surface, size);
    }

    /// Remember the pointer in global coordinates while it is over the viewport
    pub fn track_pointer(&mut self) {
        let global = self.ctx.input(|i| {
            let local = i.pointer.latest_pos()?;
            let outer = i.viewport().outer_rect?;
            Some(Point::new(outer.min.x + local.x, outer.min.y + local.y))
        });
        if let Some(point) = global {
            self.last_pointer = point;
        }
    }
}

impl Host for EguiHost {
    fn pointer_position(&self) -> Point {
        self.last_pointer
    }

    fn screen_at_pointer(&self) -> Rect {
        let monitor = self.ctx.input(|i| i.viewport().monitor_size);
        match monitor {
            Some(size) => Rect::new(0.0, 0.0, size.x, size.y),
            None => Rect::new(0.0, 0.0, 1920.0, 1080.0),
        }
    }

    fn create_surface(&mut self) -> SurfaceId {
        self.next_surface += 1;
        SurfaceId(self.next_surface)
    }

    fn create_overlay(&mut self) -> SurfaceId {
        let surface = self.create_surface();
        log::debug!("Overlays are not drawn by the egui host");
        self.overlays.insert(surface);
        surface
    }

    fn set_geometry(&mut self, surface: SurfaceId, rect: Rect) {
        if self.overlays.contains(&surface) {
            return;
        }
        self.ctx
            .send_viewport_cmd(ViewportCommand::OuterPosition(egui::pos2(rect.x, rect.y)));
        self.ctx
            .send_viewport_cmd(ViewportCommand::InnerSize(egui::vec2(rect.width, rect.height)));
    }

    fn set_visible(&mut self, surface: SurfaceId, visible: bool) {
        if self.overlays.contains(&surface) {
            return;
        }
        self.ctx.send_viewport_cmd(ViewportCommand::Visible(visible));
    }

    fn natural_size(&self, surface: SurfaceId) -> Option<Size> {
        self.natural.get(&surface).copied()
    }

    fn start_grab(&mut self) -> GrabHandle {
        self.next_grab += 1;
        self.grab = Some(self.next_grab);
        self.ctx.send_viewport_cmd(ViewportCommand::Focus);
        GrabHandle(self.next_grab)
    }

    fn stop_grab(&mut self, grab: GrabHandle) {
        if self.grab == Some(grab.0) {
            self.grab = None;
        }
    }

    fn clear_client_focus(&mut self) {
        log::trace!("clear client focus");
    }

    fn restore_focus_under_pointer(&mut self) {
        log::trace!("restore focus under pointer");
    }

    fn widget_under_pointer(&self) -> Option<WidgetId> {
        self.hovered
    }

    fn dispatch_global_key(&mut self, key: &KeyPress) {
        (self.passthrough)(key);
    }
}
