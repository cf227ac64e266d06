//! Command implementations.

mod info;
mod relay;
mod serve;
mod signal;
mod validate;

pub use info::run_info;
pub use relay::run_relay;
pub use serve::run_serve;
pub use validate::run_validate;
