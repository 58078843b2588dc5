//! # Tessera Core
//!
//! Core types shared by the Tessera batching renderer: vertex formats,
//! primitive topology, rendering math and profiling hooks.

pub mod math;
pub mod mesh;
pub mod profiling;

/// Core library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Log the core crate version.
pub fn init() {
    log::info!("Tessera Core v{} initialized", VERSION);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
