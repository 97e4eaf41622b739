#![deny(warnings)]
#![deny(dead_code)]
#![deny(unused_variables)]
#![deny(unused_imports)]

pub mod config;
pub mod error;
pub mod traits;
pub mod types;

pub use config::{ChunkingConfig, ChunkingStrategy, Config, OptimizationOptions};
pub use error::{Error, Result};
pub use traits::Tokenizer;
