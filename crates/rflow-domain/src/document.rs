//! Flow document model.
//!
//! A flow is a recorded notebook: a top-level `version` string and an
//! ordered `cells` array. Each cell is either a command-string cell
//! (wire tag `"cs"`, the only kind that executes) or a markdown cell
//! (`"md"`, prose carried along but skipped at replay). Order in `cells`
//! is the only dependency information the document has: later commands
//! reference frames/models created by earlier ones purely by name.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::FlowParseError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellKind {
    CommandString,
    Markdown,
}

impl CellKind {
    pub fn wire_tag(&self) -> &'static str {
        match self {
            CellKind::CommandString => "cs",
            CellKind::Markdown => "md",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowCell {
    pub kind: CellKind,
    pub input: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowDocument {
    pub version: String,
    pub cells: Vec<FlowCell>,
}

impl FlowDocument {
    /// Strict parse of a flow document from JSON text.
    ///
    /// Rejections carry the offending cell index. Validation here is purely
    /// structural; command semantics are checked later, cell by cell, when
    /// the command grammar decodes each `input`.
    pub fn from_json_str(text: &str) -> Result<Self, FlowParseError> {
        let root: Value =
            serde_json::from_str(text).map_err(|e| FlowParseError::InvalidJson(e.to_string()))?;
        let obj = root.as_object().ok_or(FlowParseError::NotAnObject)?;

        let version = obj
            .get("version")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let raw_cells = obj.get("cells").ok_or(FlowParseError::MissingCells)?;
        let raw_cells = raw_cells.as_array().ok_or(FlowParseError::CellsNotArray)?;

        let mut cells = Vec::with_capacity(raw_cells.len());
        for (index, raw) in raw_cells.iter().enumerate() {
            let cell = raw
                .as_object()
                .ok_or(FlowParseError::CellNotObject(index))?;
            let kind = match cell.get("type").and_then(Value::as_str) {
                Some("cs") => CellKind::CommandString,
                Some("md") => CellKind::Markdown,
                other => {
                    return Err(FlowParseError::UnknownCellType {
                        index,
                        found: other.unwrap_or("<missing>").to_string(),
                    })
                }
            };
            let input = cell
                .get("input")
                .and_then(Value::as_str)
                .ok_or(FlowParseError::InputNotString(index))?;
            if kind == CellKind::CommandString && input.trim().is_empty() {
                return Err(FlowParseError::EmptyInput(index));
            }
            cells.push(FlowCell { kind, input: input.to_string() });
        }

        Ok(FlowDocument { version, cells })
    }

    /// Number of executable (command-string) cells.
    pub fn command_count(&self) -> usize {
        self.cells
            .iter()
            .filter(|c| c.kind == CellKind::CommandString)
            .count()
    }
}
