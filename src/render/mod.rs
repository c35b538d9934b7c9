//! Rendering engines behind the [`gateway::RenderGateway`] boundary.

/// `vello_cpu` reference gateway.
pub mod cpu;
/// Gateway trait and factory.
pub mod gateway;
