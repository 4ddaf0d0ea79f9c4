pub mod comfy;
pub mod config;
pub mod error;
pub mod generation;
pub mod server;
pub mod workflow;

pub use error::{Error, Result};
