//! Popup surface controller: lifecycle, modal grab and geometry settling
//!
//! A popup goes `Hidden -> Positioning -> Visible -> Hidden`. On `show` the
//! content is built and the surface is mapped off-screen so the toolkit can
//! lay it out; one deferred settle step later it is moved to its final
//! placement and the keyboard grab starts. Nothing is grabbed until the
//! popup is actually on screen.

use crate::config::PopupConfig;
use crate::error::PopupError;
use crate::focus::FocusNavigation;
use crate::geometry::{Placement, Point, Rect, Size};
use crate::host::{GrabHandle, Host, SurfaceId};
use crate::item::WidgetId;
use crate::keys::{Key, KeyPress, Modifiers};
use crate::timer::DeferredQueue;
use std::time::{Duration, Instant};

/// Where surfaces are parked while their first layout pass runs
const OFFSCREEN: Point = Point {
    x: -10_000.0,
    y: -10_000.0,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Hidden,
    Positioning,
    Visible,
}

/// What a consumer did with a key or pointer event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Handled,
    /// Handled, and the popup should hide
    Close,
    Ignored,
}

/// A concrete popup's content (launcher, power menu...)
pub trait PopupContent {
    /// Name used in log lines
    fn name(&self) -> &'static str;

    /// Rebuild everything for a new showing and report the natural size
    fn build(&mut self) -> Result<Size, PopupError>;

    /// Target of the default Tab/arrow/Home/End handling
    fn navigation(&mut self) -> &mut dyn FocusNavigation;

    /// Enter on the focused item
    fn activate(&mut self, key: &KeyPress) -> KeyOutcome;

    /// Runs before the default key handling; anything but `Ignored` skips it
    fn intercept_key(&mut self, _key: &KeyPress) -> KeyOutcome {
        KeyOutcome::Ignored
    }

    fn before_show(&mut self) {}

    fn on_show(&mut self) {}

    fn on_hide(&mut self) {}

    /// Reported by the host when the pointer enters a rendered widget
    fn hover_widget(&mut self, _widget: WidgetId) -> bool {
        false
    }

    fn modifiers_changed(&mut self, _modifiers: Modifiers) {}

    /// True once after the content rebuilt its rendered items, so the
    /// widget under the pointer may have changed
    fn take_structural_change(&mut self) -> bool {
        false
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Deferred {
    Settle { generation: u64 },
    HoverResync { generation: u64 },
}

pub struct Popup<C> {
    content: C,
    config: PopupConfig,
    placement: Placement,
    phase: Phase,
    /// Bumped on every show; deferred steps from older showings are dropped
    generation: u64,
    surface: Option<SurfaceId>,
    overlay: Option<SurfaceId>,
    grab: Option<GrabHandle>,
    measured: Size,
    geometry: Option<Rect>,
    timers: DeferredQueue<Deferred>,
}

impl<C: PopupContent> Popup<C> {
    pub fn new(content: C, config: PopupConfig, placement: Placement) -> Self {
        Self {
            content,
            config,
            placement,
            phase: Phase::Hidden,
            generation: 0,
            surface: None,
            overlay: None,
            grab: None,
            measured: Size::default(),
            geometry: None,
            timers: DeferredQueue::default(),
        }
    }

    pub fn content(&self) -> &C {
        &self.content
    }

    pub fn content_mut(&mut self) -> &mut C {
        &mut self.content
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_visible(&self) -> bool {
        self.phase == Phase::Visible
    }

    pub fn is_hidden(&self) -> bool {
        self.phase == Phase::Hidden
    }

    pub fn has_grab(&self) -> bool {
        self.grab.is_some()
    }

    /// Final geometry while visible
    pub fn geometry(&self) -> Option<Rect> {
        self.geometry
    }

    pub fn surface(&self) -> Option<SurfaceId> {
        self.surface
    }

    pub fn set_config(&mut self, config: PopupConfig, placement: Placement) {
        self.config = config;
        self.placement = placement;
    }

    /// Create the surface and optional overlay. Safe to call repeatedly.
    pub fn init(&mut self, host: &mut dyn Host) {
        if self.surface.is_none() {
            let surface = host.create_surface();
            host.set_visible(surface, false);
            self.surface = Some(surface);
        }
        if self.config.overlay && self.overlay.is_none() {
            let overlay = host.create_overlay();
            host.set_visible(overlay, false);
            self.overlay = Some(overlay);
        }
    }

    pub fn show(&mut self, host: &mut dyn Host, now: Instant) {
        if self.phase != Phase::Hidden {
            return;
        }
        self.init(host);
        let Some(surface) = self.surface else {
            return;
        };

        self.content.before_show();
        if self.config.clear_focus_on_show {
            host.clear_client_focus();
        }

        let size = match self.content.build() {
            Ok(size) => size,
            Err(e) => {
                log::warn!("Not showing popup: {}", e);
                if self.config.clear_focus_on_show {
                    host.restore_focus_under_pointer();
                }
                return;
            }
        };

        self.measured = size;
        host.set_geometry(surface, Rect::from_origin_size(OFFSCREEN, size));
        host.set_visible(surface, true);

        self.generation += 1;
        self.phase = Phase::Positioning;
        self.timers.schedule(
            now,
            Duration::from_millis(self.config.settle_delay_ms),
            Deferred::Settle {
                generation: self.generation,
            },
        );
        log::debug!("{}: positioning ({}x{})", self.content.name(), size.width, size.height);
    }

    pub fn hide(&mut self, host: &mut dyn Host) {
        if self.phase == Phase::Hidden {
            return;
        }
        if let Some(surface) = self.surface {
            host.set_visible(surface, false);
        }
        if let Some(overlay) = self.overlay {
            host.set_visible(overlay, false);
        }
        if let Some(grab) = self.grab.take() {
            host.stop_grab(grab);
        }
        host.restore_focus_under_pointer();
        self.content.navigation().clear_focus();
        self.phase = Phase::Hidden;
        self.geometry = None;
        self.content.on_hide();
        log::debug!("{}: hidden", self.content.name());
    }

    pub fn toggle(&mut self, host: &mut dyn Host, now: Instant) {
        if self.phase == Phase::Hidden {
            self.show(host, now);
        } else {
            self.hide(host);
        }
    }

    /// Earliest pending deferred step
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.next_deadline()
    }

    /// Run deferred steps that are due
    pub fn poll(&mut self, host: &mut dyn Host, now: Instant) {
        for deferred in self.timers.take_due(now) {
            match deferred {
                Deferred::Settle { generation } => self.settle(host, generation),
                Deferred::HoverResync { generation } => self.resync_hover(host, generation),
            }
        }
    }

    fn settle(&mut self, host: &mut dyn Host, generation: u64) {
        if self.phase != Phase::Positioning || generation != self.generation {
            log::trace!("{}: stale settle dropped", self.content.name());
            return;
        }
        let Some(surface) = self.surface else {
            return;
        };

        let size = host.natural_size(surface).unwrap_or(self.measured);
        let screen = host.screen_at_pointer();
        let rect = self.placement.place(screen, host.pointer_position(), size);
        host.set_geometry(surface, rect);

        if let Some(overlay) = self.overlay {
            host.set_geometry(overlay, screen);
            host.set_visible(overlay, true);
        }

        self.grab = Some(host.start_grab());

        let navigation = self.content.navigation();
        navigation.clear_focus();
        navigation.focus_first();

        self.geometry = Some(rect);
        self.phase = Phase::Visible;
        self.content.on_show();
        log::debug!(
            "{}: visible at ({}, {}) {}x{}",
            self.content.name(),
            rect.x,
            rect.y,
            rect.width,
            rect.height
        );
    }

    fn resync_hover(&mut self, host: &mut dyn Host, generation: u64) {
        if self.phase != Phase::Visible || generation != self.generation {
            return;
        }
        if let Some(widget) = host.widget_under_pointer() {
            self.content.hover_widget(widget);
        }
    }

    fn after_content_change(&mut self, now: Instant) {
        if self.content.take_structural_change() && self.phase == Phase::Visible {
            self.timers.schedule(
                now,
                Duration::from_millis(self.config.hover_resync_ms),
                Deferred::HoverResync {
                    generation: self.generation,
                },
            );
        }
    }

    /// Key routed through the modal grab. Returns whether the popup consumed it;
    /// anything it does not consume goes to the host's global bindings.
    pub fn handle_key(&mut self, host: &mut dyn Host, key: &KeyPress, now: Instant) -> bool {
        if self.phase != Phase::Visible {
            return false;
        }

        let outcome = match self.content.intercept_key(key) {
            KeyOutcome::Ignored => self.default_key(key),
            outcome => outcome,
        };

        let handled = match outcome {
            KeyOutcome::Handled => true,
            KeyOutcome::Close => {
                self.hide(host);
                true
            }
            KeyOutcome::Ignored => {
                log::debug!("{}: passing {} through", self.content.name(), key);
                host.dispatch_global_key(key);
                false
            }
        };

        self.after_content_change(now);
        handled
    }

    fn default_key(&mut self, key: &KeyPress) -> KeyOutcome {
        match key.key {
            Key::Escape => return KeyOutcome::Close,
            Key::Enter => return self.content.activate(key),
            _ => {}
        }
        let navigation = self.content.navigation();
        match key.key {
            Key::Tab if key.shift() => navigation.focus_prev(),
            Key::Tab | Key::Down => navigation.focus_next(),
            Key::Up => navigation.focus_prev(),
            Key::Home => navigation.focus_first(),
            Key::End => navigation.focus_last(),
            _ => return KeyOutcome::Ignored,
        }
        KeyOutcome::Handled
    }

    pub fn hover_widget(&mut self, widget: WidgetId) -> bool {
        if self.phase != Phase::Visible {
            return false;
        }
        self.content.hover_widget(widget)
    }

    pub fn modifiers_changed(&mut self, modifiers: Modifiers) {
        self.content.modifiers_changed(modifiers);
    }

    /// Run a pointer or other content-level event while visible. A `Close`
    /// outcome hides the popup.
    pub fn content_event(
        &mut self,
        host: &mut dyn Host,
        now: Instant,
        event: impl FnOnce(&mut C) -> KeyOutcome,
    ) -> KeyOutcome {
        if self.phase != Phase::Visible {
            return KeyOutcome::Ignored;
        }
        let outcome = event(&mut self.content);
        if outcome == KeyOutcome::Close {
            self.hide(host);
        } else {
            self.after_content_change(now);
        }
        outcome
    }
}
