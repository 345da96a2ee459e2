// Adapters layer: concrete capabilities, loaders and clipboards for external systems.

pub mod clipboard;
pub mod command;
pub mod http;
pub mod loader;
