pub mod cli;
pub mod config;
pub mod error;
pub mod expander;
pub mod export;
pub mod index;
pub mod loader;
pub mod pipeline;
pub mod reconciler;

pub use medprice_common as common;
