//! Application services.

pub mod generate;

pub use generate::{CardGenerator, GeneratedCard, GenerationError};
