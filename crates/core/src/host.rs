//! What a popup needs from the host window manager / toolkit

use crate::geometry::{Point, Rect, Size};
use crate::item::WidgetId;
use crate::keys::KeyPress;

/// Host-side handle of a top-level surface (popup window or overlay)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceId(pub u64);

/// Proof that a modal keyboard grab is running. At most one exists at a time.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct GrabHandle(pub u64);

pub trait Host {
    /// Pointer position in global screen coordinates
    fn pointer_position(&self) -> Point;

    /// Geometry of the screen the pointer is on
    fn screen_at_pointer(&self) -> Rect;

    fn create_surface(&mut self) -> SurfaceId;

    /// A full-screen dimmed surface drawn beneath a popup
    fn create_overlay(&mut self) -> SurfaceId;

    fn set_geometry(&mut self, surface: SurfaceId, rect: Rect);

    fn set_visible(&mut self, surface: SurfaceId, visible: bool);

    /// Size the surface settled on after layout, if the host knows it yet
    fn natural_size(&self, surface: SurfaceId) -> Option<Size>;

    /// Route every key to the caller until `stop_grab`
    fn start_grab(&mut self) -> GrabHandle;

    fn stop_grab(&mut self, grab: GrabHandle);

    /// Take input focus away from the active client
    fn clear_client_focus(&mut self);

    /// Give focus back to whatever client is under the pointer
    fn restore_focus_under_pointer(&mut self);

    fn widget_under_pointer(&self) -> Option<WidgetId>;

    /// Hand an unhandled key to the host's global key bindings
    fn dispatch_global_key(&mut self, key: &KeyPress);
}
