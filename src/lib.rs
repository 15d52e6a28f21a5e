// Core email pipeline
pub mod attachment;
pub mod email;
pub mod provider;
pub mod sender;
pub mod template;
pub mod variables;

// HTTP surface
pub mod api;
pub mod server;

// Supporting modules
pub mod config;
pub mod error;
pub mod shutdown;
pub mod telemetry;
