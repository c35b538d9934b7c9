//! Request handling: decode, compile, render, cache.

/// Render service.
pub mod render_service;
/// Request payload decoding.
pub mod request;
