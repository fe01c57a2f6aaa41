pub mod captcha;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod logging;
pub mod render;
pub mod swap;
pub mod transport;
