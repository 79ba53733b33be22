//! Execution layer
//!
//! - `builder`: descriptor + input -> `WireRequest` (pure, no I/O)
//! - `http`: `WireRequest` + token -> raw response
//! - `invoker`: the pipeline every caller goes through

pub mod builder;
pub mod http;
pub mod invoker;

pub use builder::RequestBuilder;
pub use invoker::{InvokeOutput, InvokeStage, Invoker};
