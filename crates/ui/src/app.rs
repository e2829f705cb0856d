//! Shell application: owns both popups and feeds them egui input

use crate::host::{EguiHost, Passthrough};
use crate::theme::{dark_theme, item_styles, to_color32, ThemeColors};
use eframe::egui::{self, CentralPanel, Context, RichText, Sense, Stroke, Vec2};
use popshell_core::{
    ConfigManager, DesktopCatalog, Host, Key, KeyOutcome, KeyPress, Launcher, Modifiers,
    Navigable, PinnedStore, Popup, PowerMenu, ShellItem, ShellNavItem, Size, SubFocus,
    SystemRunner, WidgetId,
};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

/// Which popup a trigger toggles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopupTarget {
    Launcher,
    Power,
}

/// Pointer work collected while drawing, run once the frame is laid out
enum UiAction {
    PinnedPress(usize, f32),
    PinnedSecondary(usize),
    ListClick(usize, SubFocus),
    ListSecondary(usize),
    Scroll(i32),
    Resize(f32),
    PowerClick(usize),
}

pub struct ShellApp {
    config_manager: Arc<ConfigManager>,
    triggers: Receiver<PopupTarget>,
    host: EguiHost,
    launcher: Popup<Launcher>,
    power: Popup<PowerMenu>,
    modifiers: Modifiers,
    margin: f32,

    // Pending actions (to avoid borrow issues)
    pending: Vec<UiAction>,
}

impl ShellApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        config_manager: Arc<ConfigManager>,
        triggers: Receiver<PopupTarget>,
        passthrough: Passthrough,
    ) -> Self {
        let config = config_manager.get().clone();
        let styles = item_styles();

        let pinned = match PinnedStore::default_path() {
            Ok(path) => PinnedStore::load(path, config.launcher.max_pinned),
            Err(e) => {
                log::warn!("Pinned entries will not be saved: {:#}", e);
                PinnedStore::in_memory(Vec::new(), config.launcher.max_pinned)
            }
        };
        let catalog = DesktopCatalog::new();
        let launcher = Launcher::new(Box::new(catalog), pinned, config.launcher.clone(), styles);
        let power = PowerMenu::new(config.power.clone(), styles, Box::new(SystemRunner));

        let mut host = EguiHost::new(cc.egui_ctx.clone(), passthrough);
        let mut launcher = Popup::new(launcher, config.popup, config.launcher.placement);
        let mut power = Popup::new(power, config.popup, config.power.placement);
        launcher.init(&mut host);
        power.init(&mut host);

        cc.egui_ctx.set_style(dark_theme());

        Self {
            config_manager,
            triggers,
            host,
            launcher,
            power,
            modifiers: Modifiers::empty(),
            margin: config.ui.margin,
            pending: Vec::new(),
        }
    }

    fn apply_config(&mut self) {
        let config = self.config_manager.get().clone();
        self.launcher.set_config(config.popup, config.launcher.placement);
        self.launcher.content_mut().set_config(config.launcher);
        self.power.set_config(config.popup, config.power.placement);
        self.power.content_mut().set_config(config.power);
        self.margin = config.ui.margin;
        log::info!("Configuration reloaded");
    }

    fn toggle(&mut self, target: PopupTarget, now: Instant) {
        log::info!("Toggling {:?}", target);
        match target {
            PopupTarget::Launcher => {
                self.power.hide(&mut self.host);
                self.launcher.toggle(&mut self.host, now);
            }
            PopupTarget::Power => {
                self.launcher.hide(&mut self.host);
                self.power.toggle(&mut self.host, now);
            }
        }
    }

    fn drain_triggers(&mut self, now: Instant) {
        loop {
            match self.triggers.try_recv() {
                Ok(target) => self.toggle(target, now),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    log::error!("Trigger channel closed");
                    break;
                }
            }
        }
    }

    fn route_key(&mut self, press: &KeyPress, now: Instant) {
        if !self.launcher.is_hidden() {
            self.launcher.handle_key(&mut self.host, press, now);
        } else if !self.power.is_hidden() {
            self.power.handle_key(&mut self.host, press, now);
        }
    }

    fn handle_input(&mut self, ctx: &Context, now: Instant) {
        let (events, modifiers, moved) = ctx.input(|i| {
            (
                i.events.clone(),
                to_modifiers(i.modifiers),
                i.pointer.is_moving(),
            )
        });

        if modifiers != self.modifiers {
            self.modifiers = modifiers;
            self.launcher.modifiers_changed(modifiers);
            self.power.modifiers_changed(modifiers);
        }

        for event in events {
            match event {
                egui::Event::Key {
                    key,
                    pressed: true,
                    modifiers,
                    ..
                } => {
                    let modifiers = to_modifiers(modifiers);
                    if let Some(key) = translate_key(key, modifiers) {
                        self.route_key(&KeyPress::new(modifiers, key), now);
                    }
                }
                egui::Event::Text(text) => {
                    for c in text.chars() {
                        let press = KeyPress::new(modifiers & Modifiers::SHIFT, Key::Char(c));
                        self.route_key(&press, now);
                    }
                }
                _ => {}
            }
        }

        // Hover-enter only happens when the pointer moves; rebuilt rows are
        // picked up by the popup's own resync
        if moved {
            if let Some(widget) = self.host.widget_under_pointer() {
                self.launcher.hover_widget(widget);
                self.power.hover_widget(widget);
            }
        }

        if self.launcher.content().is_dragging() {
            let (x, released) = ctx.input(|i| {
                (
                    i.pointer.latest_pos().map(|p| p.x),
                    !i.pointer.primary_down(),
                )
            });
            if let Some(x) = x {
                self.launcher.content_event(&mut self.host, now, |launcher| {
                    launcher.pointer_motion(x);
                    KeyOutcome::Handled
                });
            }
            if released {
                self.launcher
                    .content_event(&mut self.host, now, |launcher| launcher.pinned_release());
            }
        }
    }

    /// Process pending actions
    fn process_pending_actions(&mut self, now: Instant) {
        for action in std::mem::take(&mut self.pending) {
            let host = &mut self.host;
            match action {
                UiAction::PinnedPress(index, x) => {
                    self.launcher.content_event(host, now, |launcher| {
                        launcher.pinned_press(index, x);
                        KeyOutcome::Handled
                    });
                }
                UiAction::PinnedSecondary(index) => {
                    self.launcher.content_event(host, now, |launcher| {
                        launcher.pinned_secondary_click(index)
                    });
                }
                UiAction::ListClick(local, sub) => {
                    self.launcher.content_event(host, now, |launcher| {
                        launcher.list_control_click(local, sub)
                    });
                }
                UiAction::ListSecondary(local) => {
                    self.launcher.content_event(host, now, |launcher| {
                        launcher.list_secondary_click(local)
                    });
                }
                UiAction::Scroll(notches) => {
                    self.launcher
                        .content_event(host, now, |launcher| launcher.scroll(notches));
                }
                UiAction::Resize(height) => {
                    self.launcher.content_event(host, now, |launcher| {
                        launcher.set_container_height(height);
                        KeyOutcome::Handled
                    });
                }
                UiAction::PowerClick(index) => {
                    self.power.content_event(host, now, |menu| menu.click(index));
                }
            }
        }
    }

    fn draw_launcher(&mut self, ctx: &Context) -> Option<WidgetId> {
        let launcher = self.launcher.content();
        let item_height = launcher.config().item_height;
        let cell = launcher.config().icon_cell_width;
        let pending = &mut self.pending;
        let mut hovered = None;

        // The window manager may not grant the requested height
        let height = ctx.screen_rect().height();
        if (height - launcher.list().metrics().container_height).abs() > 0.5 {
            pending.push(UiAction::Resize(height));
        }

        CentralPanel::default()
            .frame(panel_frame(self.margin))
            .show(ctx, |ui| {
                let query = launcher.query();
                let search = if query.is_empty() {
                    RichText::new("Type to search").color(ThemeColors::DIM_TEXT)
                } else {
                    RichText::new(query).color(ThemeColors::TEXT)
                };
                ui.label(search.heading());
                separator(ui);

                ui.horizontal(|ui| {
                    for (index, item) in launcher.pinned_row().items().iter().enumerate() {
                        let response = ui.add(
                            item_button(item, Vec2::new(cell, item_height))
                                .sense(Sense::click_and_drag()),
                        );
                        if response.hovered() {
                            hovered = Some(item.widget());
                        }
                        if response.is_pointer_button_down_on()
                            && ui.input(|i| i.pointer.primary_pressed())
                        {
                            if let Some(pos) = response.interact_pointer_pos() {
                                pending.push(UiAction::PinnedPress(index, pos.x));
                            }
                        }
                        if response.secondary_clicked() {
                            pending.push(UiAction::PinnedSecondary(index));
                        }
                    }
                });
                separator(ui);

                let list = launcher.list();
                if list.has_items_above() {
                    ui.label(RichText::new("\u{25B2}").color(ThemeColors::DIM_TEXT)); // ▲
                }
                let rows = ui.vertical(|ui| {
                    for (local, item) in list.visible().iter().enumerate() {
                        let ShellItem::AppEntry(row) = &item.data else {
                            continue;
                        };
                        ui.horizontal(|ui| {
                            let control = Vec2::new(item_height * 1.5, item_height);
                            let width = ui.available_width() - 2.0 * (control.x + 4.0);
                            let response = ui.add(item_button(item, Vec2::new(width, item_height)));
                            if response.clicked() {
                                pending.push(UiAction::ListClick(local, SubFocus::None));
                            }
                            if response.secondary_clicked() {
                                pending.push(UiAction::ListSecondary(local));
                            }

                            let pin_label = if row.pinned { "unpin" } else { "pin" };
                            let pin = ui.add(control_button(
                                pin_label,
                                row.sub == SubFocus::PinToggle,
                                row.pinned,
                                control,
                            ));
                            if pin.clicked() {
                                pending.push(UiAction::ListClick(local, SubFocus::PinToggle));
                            }

                            let info = ui.add(control_button(
                                "info",
                                row.sub == SubFocus::InfoAction,
                                false,
                                control,
                            ));
                            if info.clicked() {
                                pending.push(UiAction::ListClick(local, SubFocus::InfoAction));
                            }

                            if response.hovered() || pin.hovered() || info.hovered() {
                                hovered = Some(item.widget());
                            }
                        });
                    }
                    if list.count() == 0 {
                        ui.label(RichText::new("No matches").color(ThemeColors::DIM_TEXT));
                    }
                });
                if list.has_items_below() {
                    ui.label(RichText::new("\u{25BC}").color(ThemeColors::DIM_TEXT)); // ▼
                }

                if rows.response.contains_pointer() {
                    let dy = ui.input(|i| i.raw_scroll_delta.y);
                    if dy > 0.0 {
                        pending.push(UiAction::Scroll(-1));
                    } else if dy < 0.0 {
                        pending.push(UiAction::Scroll(1));
                    }
                }
            });

        hovered
    }

    fn draw_power(&mut self, ctx: &Context) -> Option<WidgetId> {
        let menu = self.power.content();
        let width = menu.config().button_width;
        let margin = self.margin;
        let pending = &mut self.pending;
        let mut hovered = None;
        let mut measured = None;

        CentralPanel::default()
            .frame(panel_frame(margin))
            .show(ctx, |ui| {
                let row = ui.horizontal(|ui| {
                    for (index, item) in menu.buttons().items().iter().enumerate() {
                        let size = Vec2::splat(width - ui.spacing().item_spacing.x);
                        let response = ui.add(item_button(item, size));
                        if response.hovered() {
                            hovered = Some(item.widget());
                        }
                        if response.clicked() {
                            pending.push(UiAction::PowerClick(index));
                        }
                    }
                });
                measured = Some(row.response.rect.size() + Vec2::splat(2.0 * margin));
            });

        if let (Some(surface), Some(size)) = (self.power.surface(), measured) {
            self.host.report_size(surface, Size::new(size.x, size.y));
        }
        hovered
    }
}

impl eframe::App for ShellApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        // Check for config hot-reload
        if self.config_manager.check_reload() {
            self.apply_config();
        }

        let now = Instant::now();
        self.drain_triggers(now);
        self.launcher.poll(&mut self.host, now);
        self.power.poll(&mut self.host, now);

        if !self.launcher.is_hidden() || !self.power.is_hidden() {
            self.host.track_pointer();
            self.handle_input(ctx, now);
            self.process_pending_actions(now);

            let hovered = if !self.launcher.is_hidden() {
                self.draw_launcher(ctx)
            } else if !self.power.is_hidden() {
                self.draw_power(ctx)
            } else {
                None
            };
            self.host.set_hovered(hovered);
            if !self.pending.is_empty() {
                ctx.request_repaint();
            }
        }

        let deadline = [self.launcher.next_deadline(), self.power.next_deadline()]
            .into_iter()
            .flatten()
            .min();
        if let Some(deadline) = deadline {
            ctx.request_repaint_after(deadline.saturating_duration_since(Instant::now()));
        }
    }
}

fn panel_frame(margin: f32) -> egui::Frame {
    egui::Frame::default()
        .fill(ThemeColors::BACKGROUND)
        .inner_margin(margin)
}

fn separator(ui: &mut egui::Ui) {
    ui.add_space(4.0);
    let rect = ui.available_rect_before_wrap();
    ui.painter().line_segment(
        [
            egui::pos2(rect.left(), rect.top()),
            egui::pos2(rect.right(), rect.top()),
        ],
        Stroke::new(1.0, ThemeColors::SEPARATOR),
    );
    ui.add_space(4.0);
}

/// A navigable item drawn with its currently applied style
fn item_button(item: &ShellNavItem, size: Vec2) -> egui::Button<'static> {
    let style = item.style();
    let text = RichText::new(item.data.label()).color(to_color32(style.foreground));
    egui::Button::new(text)
        .fill(to_color32(style.background))
        .stroke(Stroke::new(1.0, to_color32(style.border)))
        .min_size(size)
}

fn control_button(label: &str, focused: bool, marked: bool, size: Vec2) -> egui::Button<'static> {
    let color = if marked {
        ThemeColors::PIN_ICON
    } else {
        ThemeColors::DIM_TEXT
    };
    let (fill, stroke) = if focused {
        (ThemeColors::FOCUS, Stroke::new(1.0, ThemeColors::ACCENT))
    } else {
        (egui::Color32::TRANSPARENT, Stroke::NONE)
    };
    egui::Button::new(RichText::new(label).small().color(color))
        .fill(fill)
        .stroke(stroke)
        .min_size(size)
}

fn to_modifiers(modifiers: egui::Modifiers) -> Modifiers {
    let mut result = Modifiers::empty();
    result.set(Modifiers::SHIFT, modifiers.shift);
    result.set(Modifiers::CONTROL, modifiers.ctrl);
    result.set(Modifiers::ALT, modifiers.alt);
    result.set(Modifiers::SUPER, modifiers.mac_cmd);
    result
}

/// Map an egui key event. Plain printable keys arrive as text events instead.
fn translate_key(key: egui::Key, modifiers: Modifiers) -> Option<Key> {
    use egui::Key as K;

    let chorded = modifiers.intersects(Modifiers::CONTROL | Modifiers::ALT | Modifiers::SUPER);
    let key = match key {
        K::Escape => Key::Escape,
        K::Tab => Key::Tab,
        K::Enter => Key::Enter,
        K::ArrowUp => Key::Up,
        K::ArrowDown => Key::Down,
        K::ArrowLeft => Key::Left,
        K::ArrowRight => Key::Right,
        K::Home => Key::Home,
        K::End => Key::End,
        K::PageUp => Key::PageUp,
        K::PageDown => Key::PageDown,
        K::Backspace => Key::Backspace,
        K::Space if chorded => Key::Char(' '),
        K::Space => return None,
        other => {
            let name = other.name();
            let mut chars = name.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) if chorded => Key::Char(c.to_ascii_lowercase()),
                (Some(_), None) => return None,
                _ => Key::Other(name.to_string()),
            }
        }
    };
    Some(key)
}

/// Create and run the shell. Blocks until the event loop exits.
pub fn run_shell(
    config_manager: Arc<ConfigManager>,
    triggers: Receiver<PopupTarget>,
    passthrough: Passthrough,
) -> Result<(), eframe::Error> {
    let (width, height) = {
        let config = config_manager.get();
        (config.launcher.width, config.launcher.height)
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([width, height])
            .with_decorations(false)
            .with_transparent(true)
            .with_always_on_top()
            .with_resizable(false)
            .with_taskbar(false)
            .with_visible(false),
        ..Default::default()
    };

    eframe::run_native(
        "popshell",
        options,
        Box::new(move |cc| {
            // Forward triggers and wake the event loop, which sleeps while hidden
            let (tx, rx) = mpsc::channel();
            let ctx = cc.egui_ctx.clone();
            thread::spawn(move || {
                while let Ok(target) = triggers.recv() {
                    if tx.send(target).is_err() {
                        break;
                    }
                    ctx.request_repaint();
                }
            });
            Ok(Box::new(ShellApp::new(cc, config_manager, rx, passthrough)))
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigation_keys_translate() {
        assert_eq!(translate_key(egui::Key::ArrowUp, Modifiers::empty()), Some(Key::Up));
        assert_eq!(translate_key(egui::Key::Enter, Modifiers::SHIFT), Some(Key::Enter));
        assert_eq!(
            translate_key(egui::Key::F5, Modifiers::empty()),
            Some(Key::Other("F5".to_string()))
        );
    }

    #[test]
    fn test_printable_keys_only_with_chords() {
        assert_eq!(translate_key(egui::Key::A, Modifiers::empty()), None);
        assert_eq!(translate_key(egui::Key::Space, Modifiers::SHIFT), None);
        assert_eq!(translate_key(egui::Key::A, Modifiers::SUPER), Some(Key::Char('a')));
        assert_eq!(translate_key(egui::Key::Num1, Modifiers::CONTROL), Some(Key::Char('1')));
    }

    #[test]
    fn test_modifier_mapping() {
        let modifiers = egui::Modifiers {
            shift: true,
            ctrl: true,
            ..Default::default()
        };
        assert_eq!(to_modifiers(modifiers), Modifiers::SHIFT | Modifiers::CONTROL);
    }
}
