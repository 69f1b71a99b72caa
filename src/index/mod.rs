//! Compilation and publication of per-player index documents.

pub mod compiler;
pub mod publisher;

pub use compiler::IndexCompiler;
pub use publisher::{IndexPublisher, PublishOutcome};
