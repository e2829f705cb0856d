//! Keyboard chord listener using evdev for Linux (works on both X11 and Wayland)

use evdev::{Device, InputEventKind, Key};
use popshell_ui::PopupTarget;
use std::collections::HashSet;
use std::os::unix::io::AsRawFd;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

/// A set of keys held together that toggles one popup
struct Chord {
    keys: Vec<Key>,
    target: PopupTarget,
}

/// Keyboard state tracker
#[derive(Default)]
struct KeyState {
    held: HashSet<Key>,
    last_trigger: Option<Instant>,
}

/// Find all keyboard devices (devices that support KEY_SPACE)
fn find_keyboard_devices() -> Vec<Device> {
    evdev::enumerate()
        .filter_map(|(_, device)| {
            if let Some(keys) = device.supported_keys() {
                if keys.contains(Key::KEY_SPACE) {
                    log::info!("Found keyboard device: {:?}", device.name());
                    return Some(device);
                }
            }
            None
        })
        .collect()
}

/// Input listener that detects the configured key chords
pub struct InputListener {
    state: Arc<Mutex<KeyState>>,
    chords: Vec<Chord>,
    debounce_duration: Duration,
    trigger_tx: Sender<PopupTarget>,
}

impl InputListener {
    /// Create a new input listener
    ///
    /// # Arguments
    /// * `launcher_chord` / `power_chord` - evdev key codes that must all be held
    /// * `debounce_ms` - Minimum time between triggers to prevent accidental double-triggers
    pub fn new(
        launcher_chord: &[u16],
        power_chord: &[u16],
        debounce_ms: u64,
    ) -> (Self, Receiver<PopupTarget>) {
        let (trigger_tx, trigger_rx) = channel();

        let chords = [
            (launcher_chord, PopupTarget::Launcher),
            (power_chord, PopupTarget::Power),
        ]
        .into_iter()
        .filter(|(codes, target)| {
            if codes.is_empty() {
                log::warn!("No key chord configured for {:?}", target);
            }
            !codes.is_empty()
        })
        .map(|(codes, target)| Chord {
            keys: codes.iter().copied().map(Key::new).collect(),
            target,
        })
        .collect();

        let listener = Self {
            state: Arc::new(Mutex::new(KeyState::default())),
            chords,
            debounce_duration: Duration::from_millis(debounce_ms),
            trigger_tx,
        };

        (listener, trigger_rx)
    }

    /// Chord completed by `key`, if any
    fn check_trigger(&self, key: Key) -> Option<PopupTarget> {
        let mut state = self.state.lock().ok()?;

        let chord = self.chords.iter().find(|chord| {
            chord.keys.contains(&key) && chord.keys.iter().all(|k| state.held.contains(k))
        })?;

        // Check debounce
        let now = Instant::now();
        if let Some(last) = state.last_trigger {
            if now.duration_since(last) < self.debounce_duration {
                return None;
            }
        }

        state.last_trigger = Some(now);
        Some(chord.target)
    }

    /// Handle a key event. value: 1 = press, 0 = release, 2 = autorepeat
    fn handle_key(&self, key: Key, value: i32) {
        match value {
            1 => {
                if let Ok(mut state) = self.state.lock() {
                    state.held.insert(key);
                }
                if let Some(target) = self.check_trigger(key) {
                    log::info!("Chord detected for {:?}", target);
                    let _ = self.trigger_tx.send(target);
                }
            }
            0 => {
                if let Ok(mut state) = self.state.lock() {
                    state.held.remove(&key);
                }
            }
            _ => {}
        }
    }

    /// Start listening for keyboard events
    ///
    /// This spawns a background thread that processes events and returns immediately.
    /// The thread will run until the process exits.
    ///
    /// Note: Requires read access to /dev/input/event* devices.
    /// User typically needs to be in the 'input' group: sudo usermod -aG input $USER
    pub fn start(self) -> thread::JoinHandle<()> {
        thread::spawn(move || {
            log::info!("Starting evdev keyboard listener...");

            let mut devices = find_keyboard_devices();

            if devices.is_empty() {
                log::error!(
                    "No keyboard devices found. Make sure you have read access to /dev/input/event*. \
                     Try: sudo usermod -aG input $USER (then log out and back in)"
                );
                return;
            }

            log::info!("Monitoring {} keyboard device(s)", devices.len());

            // Set devices to non-blocking mode using fcntl
            for device in &devices {
                let fd = device.as_raw_fd();
                unsafe {
                    let flags = libc::fcntl(fd, libc::F_GETFL);
                    if flags >= 0 {
                        libc::fcntl(fd, libc::F_SETFL, flags | libc::O_NONBLOCK);
                    }
                }
            }

            loop {
                let mut had_events = false;

                for device in &mut devices {
                    if let Ok(events) = device.fetch_events() {
                        for event in events {
                            if let InputEventKind::Key(key) = event.kind() {
                                self.handle_key(key, event.value());
                                had_events = true;
                            }
                        }
                    }
                }

                // Sleep a bit if no events to avoid busy-waiting
                if !had_events {
                    thread::sleep(Duration::from_millis(10));
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const META: u16 = 125;
    const SPACE: u16 = 57;
    const ESC: u16 = 1;

    fn listener(debounce_ms: u64) -> (InputListener, Receiver<PopupTarget>) {
        InputListener::new(&[META, SPACE], &[META, ESC], debounce_ms)
    }

    #[test]
    fn test_chord_detection() {
        let (listener, rx) = listener(300);

        listener.handle_key(Key::new(META), 1);
        assert!(rx.try_recv().is_err());

        listener.handle_key(Key::new(SPACE), 1);
        assert_eq!(rx.try_recv().ok(), Some(PopupTarget::Launcher));
    }

    #[test]
    fn test_chord_routes_to_power_menu() {
        let (listener, rx) = listener(0);
        listener.handle_key(Key::new(META), 1);
        listener.handle_key(Key::new(ESC), 1);
        assert_eq!(rx.try_recv().ok(), Some(PopupTarget::Power));
    }

    #[test]
    fn test_released_key_breaks_chord() {
        let (listener, rx) = listener(0);
        listener.handle_key(Key::new(META), 1);
        listener.handle_key(Key::new(META), 0);
        listener.handle_key(Key::new(SPACE), 1);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_autorepeat_does_not_retrigger() {
        let (listener, rx) = listener(0);
        listener.handle_key(Key::new(META), 1);
        listener.handle_key(Key::new(SPACE), 1);
        assert!(rx.try_recv().is_ok());

        listener.handle_key(Key::new(SPACE), 2);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_debounce() {
        let (listener, rx) = listener(1000);

        // First trigger
        listener.handle_key(Key::new(META), 1);
        listener.handle_key(Key::new(SPACE), 1);
        assert!(rx.try_recv().is_ok());

        // Release and press again immediately (should be debounced)
        listener.handle_key(Key::new(SPACE), 0);
        listener.handle_key(Key::new(SPACE), 1);
        assert!(rx.try_recv().is_err());
    }
}
