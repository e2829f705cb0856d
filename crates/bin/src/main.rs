//! popshell
//!
//! Keyboard-driven launcher and power menu popups, toggled by global key chords.

mod input;

use anyhow::{Context, Result};
use input::InputListener;
use popshell_core::{ConfigManager, KeyPress};
use popshell_ui::run_shell;
use std::sync::Arc;

fn main() -> Result<()> {
    // Initialize logging
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info"),
    )
    .format_timestamp_secs()
    .init();

    log::info!("Starting popshell");

    // Load configuration
    let config_manager = Arc::new(
        ConfigManager::new().context("Failed to initialize config manager")?,
    );

    // Get trigger settings
    let trigger = config_manager.get().trigger.clone();

    // Create input listener
    let (listener, trigger_rx) = InputListener::new(
        &trigger.launcher_chord,
        &trigger.power_chord,
        trigger.debounce_ms,
    );

    // Start listening for keyboard events
    let _listener_handle = listener.start();

    log::info!(
        "Listening for chords (launcher: {:?}, power: {:?}, debounce: {}ms)",
        trigger.launcher_chord,
        trigger.power_chord,
        trigger.debounce_ms
    );

    // The event loop must own the main thread (required by winit)
    run_shell(
        config_manager,
        trigger_rx,
        Box::new(|key: &KeyPress| log::debug!("No global binding for {:?}", key)),
    )
    .map_err(|e| anyhow::anyhow!("Shell error: {}", e))?;

    Ok(())
}
