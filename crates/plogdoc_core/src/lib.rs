//! Public library API for decoding plog vehicle-telemetry files.

/// Value model, descriptor catalog, decoder, detector, and plog container.
pub mod plog;
