//! Convenience macros for enumeration tracing.
//!
//! Each macro forwards to a standard `tracing` macro with a fixed target so
//! subsystems can be filtered independently (`FSENUM_LOG=fsenum::handle=trace`).
//! Call sites need `tracing` in their own dependency list.

/// Target used by [`trace_enum!`].
pub const TARGET_ENUMERATE: &str = "fsenum::enumerate";
/// Target used by [`trace_handle!`].
pub const TARGET_HANDLE: &str = "fsenum::handle";
/// Target used by [`trace_buffer!`].
pub const TARGET_BUFFER: &str = "fsenum::buffer";
/// Target used by [`trace_pattern!`].
pub const TARGET_PATTERN: &str = "fsenum::pattern";

/// Emit an enumerator state trace.
///
/// # Example
/// ```ignore
/// trace_enum!(path = %root.display(), "opened enumeration root");
/// ```
#[macro_export]
macro_rules! trace_enum {
    ($($arg:tt)*) => {
        ::tracing::debug!(target: $crate::tracing_macros::TARGET_ENUMERATE, $($arg)*);
    };
}

/// Emit a directory handle lifecycle trace.
///
/// # Example
/// ```ignore
/// trace_handle!(path = %dir.display(), "queued subdirectory");
/// ```
#[macro_export]
macro_rules! trace_handle {
    ($($arg:tt)*) => {
        ::tracing::trace!(target: $crate::tracing_macros::TARGET_HANDLE, $($arg)*);
    };
}

/// Emit a listing buffer trace.
///
/// # Example
/// ```ignore
/// trace_buffer!(bytes = filled, "refilled listing buffer");
/// ```
#[macro_export]
macro_rules! trace_buffer {
    ($($arg:tt)*) => {
        ::tracing::trace!(target: $crate::tracing_macros::TARGET_BUFFER, $($arg)*);
    };
}

/// Emit a pattern compilation trace.
///
/// # Example
/// ```ignore
/// trace_pattern!(translated = %expr, "translated dos expression");
/// ```
#[macro_export]
macro_rules! trace_pattern {
    ($($arg:tt)*) => {
        ::tracing::trace!(target: $crate::tracing_macros::TARGET_PATTERN, $($arg)*);
    };
}
