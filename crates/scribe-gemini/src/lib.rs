pub mod client;
pub mod oracle;

pub use client::{GeminiClient, GeminiError};
pub use oracle::{GeminiOracle, oracle_from_config};
