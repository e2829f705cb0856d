//! egui frontend for popshell popups

mod app;
mod host;
pub mod theme;

pub use app::{run_shell, PopupTarget, ShellApp};
pub use host::{EguiHost, Passthrough};
