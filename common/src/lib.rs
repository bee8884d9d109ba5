//! Shared model for the portcheck workspace: targets, probe results, errors,
//! configuration and the status macros used for user-facing output.

pub mod config;
pub mod error;
pub mod network;

pub use tracing;

/// Target of the events emitted through [`success!`].
pub const SUCCESS_TARGET: &str = "portcheck::success";

#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        $crate::tracing::info!($($arg)*)
    };
}

#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        $crate::tracing::warn!($($arg)*)
    };
}

/// Positive status line, rendered with its own symbol by the terminal formatter.
#[macro_export]
macro_rules! success {
    ($($arg:tt)*) => {
        $crate::tracing::info!(target: "portcheck::success", $($arg)*)
    };
}
