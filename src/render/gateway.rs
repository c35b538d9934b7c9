use crate::color::theme::Theme;
use crate::compile::config::RenderConfig;
use crate::foundation::error::PlotshotResult;

/// Boundary to the chart rendering engine.
///
/// Implementations turn a compiled [`RenderConfig`] into encoded image bytes. Calls are
/// synchronous and must not touch the render cache. Engine-level rejections surface as
/// [`crate::PlotshotError::Render`]; callers do not retry them, since a deterministic engine
/// would fail the same way again. Timeouts are the implementation's concern.
pub trait RenderGateway: Send + Sync {
    /// Render `config` into an encoded image of `width` x `height` pixels.
    fn render(
        &self,
        config: &RenderConfig,
        width: u32,
        height: u32,
        theme: &Theme,
    ) -> PlotshotResult<Vec<u8>>;
}

impl<G: RenderGateway + ?Sized> RenderGateway for Box<G> {
    fn render(
        &self,
        config: &RenderConfig,
        width: u32,
        height: u32,
        theme: &Theme,
    ) -> PlotshotResult<Vec<u8>> {
        (**self).render(config, width, height, theme)
    }
}

/// Available gateway implementations.
#[derive(Clone, Copy, Debug, Default)]
pub enum GatewayKind {
    /// Built-in CPU rasterizer powered by `vello_cpu`.
    #[default]
    Cpu,
}

/// Create a gateway implementation.
pub fn create_gateway(
    kind: GatewayKind,
    opts: crate::render::cpu::CpuGatewayOpts,
) -> Box<dyn RenderGateway> {
    match kind {
        GatewayKind::Cpu => Box::new(crate::render::cpu::CpuGateway::new(opts)),
    }
}
