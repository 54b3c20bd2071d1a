//! rflow-domain: flow document model and command grammar.
//!
//! A recorded flow notebook is an ordered list of command-string cells.
//! This crate turns the document into structured data exactly once:
//! - `document`: strict JSON shape of the notebook (`version` + `cells`).
//! - `scan`: the free-text argument scanner.
//! - `command`: tagged command variants with typed payloads.
//!
//! Execution order and by-name references between cells are preserved as-is;
//! nothing here talks to a session.

pub mod command;
pub mod document;
pub mod errors;
pub mod scan;

pub use command::{ColumnNameSource, Command, ParseConfig};
pub use document::{CellKind, FlowCell, FlowDocument};
pub use errors::FlowParseError;
pub use scan::{scan_command, Arg, CommandCall};
