//! Plotshot turns semantic dashboard widgets into static chart images.
//!
//! The pipeline is:
//!
//! - Compile a [`Widget`] and its [`Dataset`] into a [`RenderConfig`] ([`compile`])
//! - Color series deterministically from their labels ([`resolve`])
//! - Rasterize the config through a [`RenderGateway`] (built-in: [`CpuGateway`])
//! - Keep the encoded image in a bounded, TTL-swept [`RenderCache`]
//!
//! [`RenderService`] wires these steps together behind a JSON request surface.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// Bounded render cache.
pub mod cache;
/// Series color resolution and themes.
pub mod color;
/// Widget compilation.
pub mod compile;
/// Rendering gateways.
pub mod render;
/// Request handling.
pub mod service;
/// Widget model.
pub mod widget;

pub use crate::foundation::error::{PlotshotError, PlotshotResult};

pub use crate::cache::store::{
    CacheId, CachedImage, RenderCache, RenderCacheOpts, SweeperHandle,
};
pub use crate::color::resolver::{resolve, resolve_with};
pub use crate::color::series::apply_series_colors;
pub use crate::color::theme::{Palette, Theme, ThemeSet};
pub use crate::color::token::ColorToken;
pub use crate::compile::config::RenderConfig;
pub use crate::compile::format::format_number;
pub use crate::compile::normalize::config_from_option;
pub use crate::compile::options::{compile, config_fingerprint};
pub use crate::render::cpu::{CpuGateway, CpuGatewayOpts};
pub use crate::render::gateway::{GatewayKind, RenderGateway, create_gateway};
pub use crate::service::render_service::{
    PreparedChart, RenderHandle, RenderService, ServiceOpts,
};
pub use crate::service::request::{RenderRequest, RequestPayload};
pub use crate::widget::model::{Dataset, Widget, WidgetKind};
