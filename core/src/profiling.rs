//! Profiling support via Tracy.
//!
//! Instrumentation is enabled with the `profiling` Cargo feature. Without it
//! every macro here expands to nothing (or to a plain evaluation of its
//! argument), so instrumented hot paths cost nothing in regular builds.
//!
//! ```ignore
//! use tessera_core::profiling::{profile_scope, profile_plot};
//!
//! fn extract() {
//!     profile_scope!("extract_segments");
//!     // ... work ...
//!     profile_plot!("batching: used bytes", used);
//! }
//! ```

// Re-export tracy-client types when profiling is enabled
#[cfg(feature = "profiling")]
pub use tracy_client::{
    self, Client, frame_mark as tracy_frame_mark, plot as tracy_plot, span,
};

/// Mark the end of a frame for Tracy's frame analysis.
#[macro_export]
#[cfg(feature = "profiling")]
macro_rules! frame_mark {
    () => {
        $crate::profiling::tracy_frame_mark()
    };
}

/// Mark the end of a frame (no-op when profiling disabled).
#[macro_export]
#[cfg(not(feature = "profiling"))]
macro_rules! frame_mark {
    () => {};
}

/// Create a profiling span for the current scope.
///
/// The span ends when the scope exits.
#[macro_export]
#[cfg(feature = "profiling")]
macro_rules! profile_scope {
    ($name:expr) => {
        let _profile_span = $crate::profiling::span!($name);
    };
}

/// Create a profiling span (no-op when profiling disabled).
#[macro_export]
#[cfg(not(feature = "profiling"))]
macro_rules! profile_scope {
    ($name:expr) => {};
}

/// Create a profiling span for the entire function.
#[macro_export]
#[cfg(feature = "profiling")]
macro_rules! profile_function {
    () => {
        let _profile_span = $crate::profiling::span!();
    };
}

/// Create a profiling span for function (no-op when profiling disabled).
#[macro_export]
#[cfg(not(feature = "profiling"))]
macro_rules! profile_function {
    () => {};
}

/// Plot a value over time in Tracy.
///
/// Used for buffer occupancy (allocated vs. used bytes) once per extraction.
#[macro_export]
#[cfg(feature = "profiling")]
macro_rules! profile_plot {
    ($name:expr, $value:expr) => {
        $crate::profiling::tracy_plot!($name, $value as f64)
    };
}

/// Plot a value (no-op when profiling disabled).
#[macro_export]
#[cfg(not(feature = "profiling"))]
macro_rules! profile_plot {
    ($name:expr, $value:expr) => {
        let _ = $value; // Avoid unused warnings
    };
}

// Re-export macros at module level
pub use frame_mark;
pub use profile_function;
pub use profile_plot;
pub use profile_scope;
