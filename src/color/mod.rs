//! Deterministic series colors.
//!
//! Labels with a recognized meaning (HTTP status codes and classes, percentiles, log levels)
//! map to fixed colors; everything else hashes into the active palette.

/// Label to color resolution.
pub mod resolver;
/// Post-hoc coloring of ready-made configs.
pub mod series;
/// Palettes and theme files.
pub mod theme;
/// Hex color tokens.
pub mod token;
