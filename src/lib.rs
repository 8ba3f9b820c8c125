pub mod config;
pub mod error;
pub mod filter;
pub mod filters;
pub mod loader;
pub mod output;
pub mod stats;
