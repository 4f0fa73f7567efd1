pub mod config;
pub mod error;

pub use config::MustasharConfig;
pub use error::{GatewayError, MustasharError, Result};
