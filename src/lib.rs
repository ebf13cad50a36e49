pub mod alloc;
pub mod engine;
pub mod model;
pub mod store;

pub use engine::{Engine, EngineError, RefKind};
