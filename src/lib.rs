// Library target for integration tests and criterion benchmarks.
// The binary entry point is main.rs; this file re-declares the module tree so
// that tests and benches can import types via `grit::engine::*` / `grit::session::*`.
// Most UI code is only exercised through the binary, so suppress dead_code warnings.
#![allow(dead_code)]

// Public: used directly by integration tests and benchmarks
pub mod config;
pub mod engine;
pub mod session;

// Private: required transitively by session/config
mod ui;
