/// Error type shared by every module.
pub mod error;
