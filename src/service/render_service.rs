use std::sync::Arc;

use crate::cache::store::{CacheId, CachedImage, RenderCache};
use crate::color::series::apply_series_colors;
use crate::color::theme::{DEFAULT_THEME, Theme, ThemeSet};
use crate::compile::config::RenderConfig;
use crate::compile::normalize::config_from_option;
use crate::compile::options::{compile, config_fingerprint};
use crate::foundation::error::{PlotshotError, PlotshotResult};
use crate::render::gateway::RenderGateway;
use crate::service::request::{MAX_PAYLOAD_BYTES, RenderRequest, RequestPayload};

/// Options for [`RenderService`].
#[derive(Clone, Debug)]
pub struct ServiceOpts {
    /// Request bodies above this size are rejected before parsing.
    pub max_payload_bytes: usize,
    /// Theme used when neither the request nor the widget names one.
    pub default_theme: String,
}

impl Default for ServiceOpts {
    fn default() -> Self {
        Self {
            max_payload_bytes: MAX_PAYLOAD_BYTES,
            default_theme: DEFAULT_THEME.to_string(),
        }
    }
}

/// Where a rendered image can be fetched from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderHandle {
    /// Cache identifier of the image.
    pub id: CacheId,
    /// Image width.
    pub width: u32,
    /// Image height.
    pub height: u32,
    /// Fingerprint of the config that was rendered.
    pub fingerprint: u64,
}

/// A request resolved up to the point of rendering.
#[derive(Clone, Debug)]
pub struct PreparedChart<'a> {
    /// What the gateway draws.
    pub config: RenderConfig,
    /// Full chart document: the compiled config for widgets, or the colored option with all of
    /// its keys for ready-made options.
    pub document: serde_json::Value,
    /// Resolved theme.
    pub theme: &'a Theme,
}

/// Request -> config -> gateway -> cache pipeline.
///
/// Compilation and gateway calls happen outside the cache lock; only the final insert takes it.
pub struct RenderService<G: RenderGateway> {
    gateway: G,
    cache: Arc<RenderCache>,
    themes: Arc<ThemeSet>,
    opts: ServiceOpts,
}

impl<G: RenderGateway> RenderService<G> {
    /// Assemble a service from its parts.
    pub fn new(
        gateway: G,
        cache: Arc<RenderCache>,
        themes: Arc<ThemeSet>,
        opts: ServiceOpts,
    ) -> Self {
        Self {
            gateway,
            cache,
            themes,
            opts,
        }
    }

    /// Shared cache.
    pub fn cache(&self) -> &Arc<RenderCache> {
        &self.cache
    }

    /// Loaded themes.
    pub fn themes(&self) -> &ThemeSet {
        &self.themes
    }

    /// Service options.
    pub fn opts(&self) -> &ServiceOpts {
        &self.opts
    }

    /// Decode a raw JSON body and render it.
    pub fn render_payload(&self, body: &[u8]) -> PlotshotResult<RenderHandle> {
        let request = RenderRequest::from_slice(body, self.opts.max_payload_bytes)?;
        self.render(request)
    }

    /// Resolve the theme and build the config a request would render, without rendering.
    pub fn prepare(&self, request: &RenderRequest) -> PlotshotResult<PreparedChart<'_>> {
        match &request.payload {
            RequestPayload::Widget(widget) => {
                let theme = self.theme_for(
                    request
                        .theme
                        .as_deref()
                        .or(widget.theme.as_deref()),
                );
                let Some(dataset) = &widget.dataset else {
                    return Err(PlotshotError::invalid_dataset("widget has no dataset"));
                };
                let config = compile(widget, dataset, theme)?;
                let document = serde_json::to_value(&config)
                    .map_err(|e| PlotshotError::serde(e.to_string()))?;
                Ok(PreparedChart {
                    config,
                    document,
                    theme,
                })
            }
            RequestPayload::Options(option) => {
                let theme = self.theme_for(request.theme.as_deref());
                let document = apply_series_colors(option.as_ref().clone(), &theme.palette);
                let config = config_from_option(&document, request.width, request.height)?;
                Ok(PreparedChart {
                    config,
                    document,
                    theme,
                })
            }
        }
    }

    /// Render a decoded request and cache the image.
    #[tracing::instrument(skip_all, fields(width = request.width, height = request.height))]
    pub fn render(&self, request: RenderRequest) -> PlotshotResult<RenderHandle> {
        let PreparedChart { config, theme, .. } = self.prepare(&request)?;
        let fingerprint = config_fingerprint(&config);

        let bytes = self
            .gateway
            .render(&config, request.width, request.height, theme)?;
        let id = self.cache.put(bytes);

        tracing::info!(%id, fingerprint, theme = %theme.name, "rendered chart");
        Ok(RenderHandle {
            id,
            width: request.width,
            height: request.height,
            fingerprint,
        })
    }

    /// Fetch a cached image by its textual id.
    pub fn fetch(&self, id: &str) -> PlotshotResult<CachedImage> {
        let parsed: CacheId = id.parse()?;
        self.cache
            .get(&parsed)
            .ok_or_else(|| PlotshotError::not_found(format!("no cached image with id '{id}'")))
    }

    fn theme_for(&self, requested: Option<&str>) -> &Theme {
        match requested {
            Some(name) => match self.themes.find(name) {
                Some(theme) => theme,
                None => {
                    tracing::debug!(theme = name, "unknown theme, using default");
                    self.themes.get(&self.opts.default_theme)
                }
            },
            None => self.themes.get(&self.opts.default_theme),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/service/render_service.rs"]
mod tests;
