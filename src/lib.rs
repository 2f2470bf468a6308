/// Macro for prefixed status logging to stderr (only when stderr is a terminal).
///
/// Usage:
/// ```ignore
/// log_status!("stamp", "Skipping {} (already being updated)", path.display());
/// log_status!("tidy", "Wrote {}", output.display());
/// ```
#[macro_export]
macro_rules! log_status {
    ($prefix:expr, $($arg:tt)*) => {
        if ::std::io::IsTerminal::is_terminal(&::std::io::stderr()) {
            eprintln!(concat!("[", $prefix, "] {}"), format_args!($($arg)*));
        }
    };
}

/// Prefixed progress line to stderr, printed whether or not stderr is a terminal.
///
/// Used for lines users and scripts rely on, such as the per-file
/// `Updating ...` line emitted while stamping.
#[macro_export]
macro_rules! log_progress {
    ($prefix:expr, $($arg:tt)*) => {
        eprintln!(concat!("[", $prefix, "] {}"), format_args!($($arg)*))
    };
}

pub mod commands;
pub mod core;
pub mod utils;

// Re-export everything from core for ergonomic library use
// Users can write `projtools::stamp` instead of `projtools::core::stamp`
pub use self::core::*;
pub use self::utils::*;
