//! flowreplay: replay recorded analytics flows.
//!
//! Application shell only; the machinery lives in the member crates:
//! - `rflow-domain`: document and command grammar.
//! - `rflow-core`: replay engine.
//! - `rflow-session` / `rflow-client`: local and HTTP sessions.

pub mod config;
pub mod errors;
