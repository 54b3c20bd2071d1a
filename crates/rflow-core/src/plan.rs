//! Replay plan: the immutable, fully-decoded form of a flow document.
//!
//! Markdown cells are dropped here; command cells keep their document
//! order. The plan hash covers the raw command texts in order, so two
//! documents with the same commands share a hash regardless of prose cells.

use serde_json::json;

use rflow_domain::{CellKind, Command, FlowDocument, FlowParseError};

use crate::hashing::hash_value;

#[derive(Debug, Clone)]
pub struct PlannedStep {
    /// Position within the plan (not the document: prose cells are skipped).
    pub index: usize,
    pub command: Command,
    pub raw_input: String,
}

#[derive(Debug, Clone)]
pub struct ReplayPlan {
    pub steps: Vec<PlannedStep>,
    pub plan_hash: String,
}

impl ReplayPlan {
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// Decode every command cell of a document, in order. Any cell that fails
/// to decode aborts the build: a plan either exists completely or not at
/// all, and nothing executes for a malformed document.
pub fn build_replay_plan(document: &FlowDocument) -> Result<ReplayPlan, FlowParseError> {
    let mut steps = Vec::with_capacity(document.cells.len());
    let mut raw_inputs = Vec::with_capacity(document.cells.len());
    for (cell_index, cell) in document.cells.iter().enumerate() {
        if cell.kind != CellKind::CommandString {
            continue;
        }
        let command = Command::parse(&cell.input).map_err(|e| e.at_cell(cell_index))?;
        raw_inputs.push(cell.input.clone());
        steps.push(PlannedStep {
            index: steps.len(),
            command,
            raw_input: cell.input.clone(),
        });
    }
    let plan_hash = hash_value(&json!(raw_inputs));
    Ok(ReplayPlan { steps, plan_hash })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(text: &str) -> FlowDocument {
        FlowDocument::from_json_str(text).expect("document parses")
    }

    #[test]
    fn markdown_cells_are_skipped_and_order_is_kept() {
        let plan = build_replay_plan(&doc(
            r##"{"version":"1.0.0","cells":[
                {"type":"md","input":"# GLM walkthrough"},
                {"type":"cs","input":"importFiles [ \"d.csv\" ]"},
                {"type":"md","input":"now parse"},
                {"type":"cs","input":"getFrameSummary \"d.hex\""}
            ]}"##,
        ))
        .expect("plan builds");
        assert_eq!(plan.len(), 2);
        assert_eq!(plan.steps[0].command.name(), "importFiles");
        assert_eq!(plan.steps[1].command.name(), "getFrameSummary");
        assert_eq!(plan.steps[1].index, 1);
    }

    #[test]
    fn prose_does_not_change_the_plan_hash() {
        let with_md = build_replay_plan(&doc(
            r#"{"cells":[{"type":"md","input":"x"},{"type":"cs","input":"getModel \"m\""}]}"#,
        ))
        .unwrap();
        let without_md = build_replay_plan(&doc(
            r#"{"cells":[{"type":"cs","input":"getModel \"m\""}]}"#,
        ))
        .unwrap();
        assert_eq!(with_md.plan_hash, without_md.plan_hash);
    }

    #[test]
    fn bad_command_cell_reports_its_document_index() {
        let err = build_replay_plan(&doc(
            r#"{"cells":[{"type":"md","input":"x"},{"type":"cs","input":"predict model: \"m\""}]}"#,
        ))
        .unwrap_err();
        assert!(matches!(err, FlowParseError::BadCommand { index: 1, .. }));
    }
}
