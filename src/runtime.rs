//! Shared object and value model.
//!
//! `value` defines the tagged object variants and the possibly-empty shared
//! handle the evaluator passes around; `class` holds the class/instance
//! machinery including method dispatch; `compare` implements the six
//! comparison operators over values.
pub mod class;
pub mod compare;
pub mod context;
pub mod error;
pub mod value;

pub use class::{Class, Instance, Method};
pub use compare::Comparator;
pub use context::{Context, DummyContext, SimpleContext};
pub use error::RuntimeError;
pub use value::{Closure, Object, Value};
