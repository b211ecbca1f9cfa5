// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`backend`] defines the `DumpBackend` trait and the per-invocation
//!   types. Tests swap in a fake backend here instead of spawning processes.
//! - [`process`] is the production backend built on `tokio::process`.
//! - [`orchestrator`] fans invocations out as concurrent tasks and joins
//!   them back in launch order.

pub mod backend;
pub mod orchestrator;
pub mod process;

pub use backend::{CapturedOutput, DumpBackend, Invocation};
pub use orchestrator::run_all;
pub use process::ProcessBackend;
