//! Dark theme for the shell popups

use egui::{Color32, CornerRadius, FontFamily, FontId, Stroke, Style, TextStyle, Vec2, Visuals};
use popshell_core::{ItemStyle, Rgba, StylePair};

/// Create the dark theme shared by every popup
pub fn dark_theme() -> Style {
    let mut style = Style::default();
    style.visuals = Visuals::dark();

    style.visuals.window_fill = ThemeColors::BACKGROUND;
    style.visuals.panel_fill = ThemeColors::PANEL;
    style.visuals.extreme_bg_color = Color32::from_rgb(20, 20, 25);

    style.visuals.selection.bg_fill = ThemeColors::ACCENT.gamma_multiply(0.5);
    style.visuals.selection.stroke = Stroke::new(1.0, ThemeColors::ACCENT);

    // Focus visuals come from the item styles; keep egui's own hover neutral
    style.visuals.widgets.inactive.bg_fill = Color32::TRANSPARENT;
    style.visuals.widgets.inactive.weak_bg_fill = Color32::TRANSPARENT;
    style.visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, ThemeColors::TEXT);
    style.visuals.widgets.hovered.weak_bg_fill = Color32::TRANSPARENT;
    style.visuals.widgets.hovered.bg_stroke = Stroke::NONE;
    style.visuals.widgets.active.weak_bg_fill = ThemeColors::ACCENT.gamma_multiply(0.4);

    let corner_radius = CornerRadius::same(4);
    style.visuals.widgets.noninteractive.corner_radius = corner_radius;
    style.visuals.widgets.inactive.corner_radius = corner_radius;
    style.visuals.widgets.hovered.corner_radius = corner_radius;
    style.visuals.widgets.active.corner_radius = corner_radius;
    style.visuals.window_corner_radius = CornerRadius::same(8);

    style.spacing.item_spacing = Vec2::new(4.0, 4.0);
    style.spacing.button_padding = Vec2::new(8.0, 4.0);

    let font_size = 14.0;
    style.text_styles.insert(
        TextStyle::Body,
        FontId::new(font_size, FontFamily::Proportional),
    );
    style.text_styles.insert(
        TextStyle::Button,
        FontId::new(font_size, FontFamily::Proportional),
    );
    style.text_styles.insert(
        TextStyle::Heading,
        FontId::new(16.0, FontFamily::Proportional),
    );
    style.text_styles.insert(
        TextStyle::Small,
        FontId::new(11.0, FontFamily::Proportional),
    );

    style
}

/// Colors used throughout the UI
pub struct ThemeColors;

impl ThemeColors {
    pub const BACKGROUND: Color32 = Color32::from_rgb(30, 30, 35);
    pub const PANEL: Color32 = Color32::from_rgb(40, 40, 48);
    pub const ACCENT: Color32 = Color32::from_rgb(100, 149, 237);
    pub const TEXT: Color32 = Color32::from_rgb(230, 230, 230);
    pub const DIM_TEXT: Color32 = Color32::from_rgb(150, 150, 160);
    pub const SEPARATOR: Color32 = Color32::from_rgb(60, 60, 70);
    pub const FOCUS: Color32 = Color32::from_rgb(60, 60, 75);
    pub const ELEVATED: Color32 = Color32::from_rgb(90, 40, 40);
    pub const ELEVATED_BORDER: Color32 = Color32::from_rgb(237, 100, 100);
    pub const PIN_ICON: Color32 = Color32::from_rgb(255, 200, 50); // Gold
}

fn rgba(color: Color32) -> Rgba {
    Rgba(color.to_srgba_unmultiplied())
}

/// Focus style pair handed to every item factory
pub fn item_styles() -> StylePair {
    StylePair {
        normal: ItemStyle {
            background: Rgba::TRANSPARENT,
            foreground: rgba(ThemeColors::TEXT),
            border: Rgba::TRANSPARENT,
        },
        focused: ItemStyle {
            background: rgba(ThemeColors::FOCUS),
            foreground: rgba(ThemeColors::TEXT),
            border: rgba(ThemeColors::ACCENT),
        },
        secondary_focused: ItemStyle {
            background: rgba(ThemeColors::ELEVATED),
            foreground: rgba(ThemeColors::TEXT),
            border: rgba(ThemeColors::ELEVATED_BORDER),
        },
    }
}

pub fn to_color32(color: Rgba) -> Color32 {
    let [r, g, b, a] = color.0;
    Color32::from_rgba_unmultiplied(r, g, b, a)
}
