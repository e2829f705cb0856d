//! Errors raised inside the popup engine

use thiserror::Error;

/// Failures that stop a popup from showing. They are logged by the
/// controller and never escape to the shell.
#[derive(Debug, Error)]
pub enum PopupError {
    #[error("{popup}: nothing to show")]
    Empty { popup: &'static str },
}
