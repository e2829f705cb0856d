//! Navigable items: a content widget plus its focus visuals

use std::fmt;

/// Opaque handle of a content widget in the host toolkit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WidgetId(pub u64);

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Hands out widget ids that stay unique across render passes
#[derive(Debug, Default)]
pub struct WidgetIds {
    next: u64,
}

impl WidgetIds {
    pub fn next_id(&mut self) -> WidgetId {
        self.next += 1;
        WidgetId(self.next)
    }
}

/// RGBA color, unmultiplied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba(pub [u8; 4]);

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba([0, 0, 0, 0]);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Rgba([r, g, b, 255])
    }
}

/// Visual properties swapped on focus changes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemStyle {
    pub background: Rgba,
    pub foreground: Rgba,
    pub border: Rgba,
}

/// The {normal, focused} pair, plus the focused look used while the
/// secondary-action modifier is held
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StylePair {
    pub normal: ItemStyle,
    pub focused: ItemStyle,
    pub secondary_focused: ItemStyle,
}

impl Default for StylePair {
    fn default() -> Self {
        let text = Rgba::rgb(230, 230, 230);
        Self {
            normal: ItemStyle {
                background: Rgba::TRANSPARENT,
                foreground: text,
                border: Rgba::TRANSPARENT,
            },
            focused: ItemStyle {
                background: Rgba::rgb(60, 60, 75),
                foreground: text,
                border: Rgba::rgb(100, 149, 237),
            },
            secondary_focused: ItemStyle {
                background: Rgba::rgb(90, 40, 40),
                foreground: text,
                border: Rgba::rgb(237, 100, 100),
            },
        }
    }
}

/// Anything the focus registry can hold.
///
/// `on_activate` returns the command bound to the item when it was built;
/// the owning popup executes it.
pub trait Navigable {
    type Command;

    fn widget(&self) -> WidgetId;

    fn is_focused(&self) -> bool;

    fn on_focus(&mut self);

    fn on_unfocus(&mut self);

    /// Whether a hover-enter should move focus here. False while already
    /// focused so hover and focus cannot feed each other.
    fn accepts_hover(&self) -> bool {
        !self.is_focused()
    }

    fn set_secondary(&mut self, _secondary: bool) {}

    fn on_activate(&self, index: usize) -> Option<Self::Command>;

    fn on_secondary(&self, _index: usize) -> Option<Self::Command> {
        None
    }
}

/// Per-variant behavior of the data inside a [`NavItem`]
pub trait ItemBehavior {
    type Command;

    /// Primary click or Enter
    fn activate(&self, index: usize, secondary: bool) -> Option<Self::Command>;

    /// Right click
    fn secondary_click(&self, _index: usize) -> Option<Self::Command> {
        None
    }
}

/// A content widget wrapped with focus state and a style pair
#[derive(Debug, Clone)]
pub struct NavItem<V> {
    widget: WidgetId,
    pub data: V,
    styles: StylePair,
    focused: bool,
    secondary: bool,
    applied: ItemStyle,
}

impl<V> NavItem<V> {
    pub fn new(widget: WidgetId, data: V, styles: StylePair) -> Self {
        Self {
            widget,
            data,
            styles,
            focused: false,
            secondary: false,
            applied: styles.normal,
        }
    }

    /// Builder form of [`Navigable::set_secondary`] for factories
    pub fn with_secondary(mut self, secondary: bool) -> Self {
        self.secondary = secondary;
        self.apply();
        self
    }

    /// Style the host should currently draw
    pub fn style(&self) -> &ItemStyle {
        &self.applied
    }

    pub fn is_secondary(&self) -> bool {
        self.secondary
    }

    fn apply(&mut self) {
        self.applied = match (self.focused, self.secondary) {
            (false, _) => self.styles.normal,
            (true, false) => self.styles.focused,
            (true, true) => self.styles.secondary_focused,
        };
    }
}

impl<V: ItemBehavior> Navigable for NavItem<V> {
    type Command = V::Command;

    fn widget(&self) -> WidgetId {
        self.widget
    }

    fn is_focused(&self) -> bool {
        self.focused
    }

    fn on_focus(&mut self) {
        self.focused = true;
        self.apply();
    }

    fn on_unfocus(&mut self) {
        self.focused = false;
        self.apply();
    }

    fn set_secondary(&mut self, secondary: bool) {
        self.secondary = secondary;
        self.apply();
    }

    fn on_activate(&self, index: usize) -> Option<V::Command> {
        self.data.activate(index, self.secondary)
    }

    fn on_secondary(&self, index: usize) -> Option<V::Command> {
        self.data.secondary_click(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Label(&'static str);

    impl ItemBehavior for Label {
        type Command = String;

        fn activate(&self, index: usize, secondary: bool) -> Option<String> {
            Some(format!("{}:{}:{}", self.0, index, secondary))
        }
    }

    #[test]
    fn test_focus_swaps_style() {
        let styles = StylePair::default();
        let mut item = NavItem::new(WidgetId(1), Label("a"), styles);
        assert_eq!(*item.style(), styles.normal);

        item.on_focus();
        assert_eq!(*item.style(), styles.focused);
        assert!(!item.accepts_hover());

        item.set_secondary(true);
        assert_eq!(*item.style(), styles.secondary_focused);

        item.on_unfocus();
        assert_eq!(*item.style(), styles.normal);
        assert!(item.accepts_hover());
    }

    #[test]
    fn test_activate_passes_secondary_mode() {
        let item =
            NavItem::new(WidgetId(7), Label("term"), StylePair::default()).with_secondary(true);
        assert_eq!(item.on_activate(3), Some("term:3:true".to_string()));
        assert_eq!(item.on_secondary(3), None);
    }
}
