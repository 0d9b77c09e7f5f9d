pub mod api;
pub mod config;
pub mod error;
pub mod relay;
pub mod sse;
pub mod upstream;
