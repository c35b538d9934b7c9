//! Widget to render-config compilation.

/// Render configuration types.
pub mod config;
/// Number formatting and axis ticks.
pub mod format;
/// Ready-made option normalization.
pub mod normalize;
/// The widget compiler.
pub mod options;
