//! Power menu: one row of buttons bound to session commands

use crate::config::{PowerAction, PowerConfig};
use crate::error::PopupError;
use crate::focus::{FocusNavigation, FocusRegistry};
use crate::geometry::Size;
use crate::item::{NavItem, StylePair, WidgetId, WidgetIds};
use crate::keys::{Key, KeyPress};
use crate::popup::{KeyOutcome, PopupContent};
use crate::shell_item::{ActionButton, ShellCommand, ShellItem, ShellNavItem};
use anyhow::{Context, Result};
use std::process::Command;

/// Starts a command without waiting for it
pub trait CommandRunner {
    fn run(&self, command: &str, args: &[String]) -> Result<()>;
}

pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, command: &str, args: &[String]) -> Result<()> {
        Command::new(command)
            .args(args)
            .spawn()
            .with_context(|| format!("Failed to run {:?}", command))?;
        Ok(())
    }
}

pub struct PowerMenu {
    config: PowerConfig,
    styles: StylePair,
    ids: WidgetIds,
    buttons: FocusRegistry<ShellNavItem>,
    runner: Box<dyn CommandRunner>,
}

impl PowerMenu {
    pub fn new(config: PowerConfig, styles: StylePair, runner: Box<dyn CommandRunner>) -> Self {
        Self {
            config,
            styles,
            ids: WidgetIds::default(),
            buttons: FocusRegistry::new(true),
            runner,
        }
    }

    pub fn set_config(&mut self, config: PowerConfig) {
        self.config = config;
    }

    pub fn config(&self) -> &PowerConfig {
        &self.config
    }

    pub fn buttons(&self) -> &FocusRegistry<ShellNavItem> {
        &self.buttons
    }

    /// Pointer click on the button at `index`
    pub fn click(&mut self, index: usize) -> KeyOutcome {
        match self.buttons.activate(index) {
            Some(command) => self.execute(command),
            None => KeyOutcome::Ignored,
        }
    }

    fn button(&mut self, action: &PowerAction) -> ShellNavItem {
        let item = ShellItem::ActionButton(ActionButton {
            label: action.label.clone(),
            command: action.command.clone(),
            args: action.args.clone(),
        });
        NavItem::new(self.ids.next_id(), item, self.styles)
    }

    fn execute(&mut self, command: ShellCommand) -> KeyOutcome {
        match command {
            ShellCommand::Run { label, command, args } => {
                log::info!("power: {}", label);
                if let Err(e) = self.runner.run(&command, &args) {
                    log::error!("{:#}", e);
                }
                KeyOutcome::Close
            }
            other => {
                log::debug!("power: ignoring {:?}", other);
                KeyOutcome::Handled
            }
        }
    }
}

impl PopupContent for PowerMenu {
    fn name(&self) -> &'static str {
        "power"
    }

    fn build(&mut self) -> Result<Size, PopupError> {
        if self.config.actions.is_empty() {
            return Err(PopupError::Empty { popup: "power" });
        }
        self.buttons.clear();
        let actions = self.config.actions.clone();
        for action in &actions {
            let button = self.button(action);
            self.buttons.register(button);
        }
        let width = self.config.button_width * actions.len() as f32;
        Ok(Size::new(width, self.config.button_width))
    }

    fn navigation(&mut self) -> &mut dyn FocusNavigation {
        &mut self.buttons
    }

    fn activate(&mut self, _key: &KeyPress) -> KeyOutcome {
        match self.buttons.activate_current() {
            Some(command) => self.execute(command),
            None => KeyOutcome::Handled,
        }
    }

    fn intercept_key(&mut self, key: &KeyPress) -> KeyOutcome {
        match key.key {
            Key::Left => self.buttons.navigate_prev(),
            Key::Right => self.buttons.navigate_next(),
            _ => return KeyOutcome::Ignored,
        }
        KeyOutcome::Handled
    }

    fn hover_widget(&mut self, widget: WidgetId) -> bool {
        self.buttons.hover_widget(widget)
    }
}
