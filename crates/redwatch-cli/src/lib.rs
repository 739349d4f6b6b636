pub mod config;
pub mod pipeline;
pub mod store;

pub use anyhow;
