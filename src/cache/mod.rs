/// Bounded TTL store for rendered images.
pub mod store;
