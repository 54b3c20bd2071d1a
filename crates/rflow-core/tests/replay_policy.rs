//! Engine-level behavior against a scripted session: execution order,
//! result counts under each failure policy, and the event trail.

use serde_json::{json, Value};

use rflow_core::{
    build_replay_plan, FailurePolicy, ReplayEngine, ReplayEventKind, Session, SessionError,
    StepOutcome,
};
use rflow_domain::{Command, FlowDocument};

/// Session double that records submission order and fails on request.
#[derive(Default)]
struct ScriptedSession {
    executed: Vec<String>,
    fail_on: Option<usize>,
}

impl Session for ScriptedSession {
    fn execute(&mut self, command: &Command) -> Result<Value, SessionError> {
        let n = self.executed.len();
        self.executed.push(command.name().to_string());
        if self.fail_on == Some(n) {
            return Err(SessionError::Rejected { message: format!("scripted failure at {n}") });
        }
        Ok(json!({"command": command.name(), "n": n}))
    }

    fn label(&self) -> &str {
        "scripted"
    }
}

fn four_step_plan() -> rflow_core::ReplayPlan {
    let doc = FlowDocument::from_json_str(
        r#"{"version":"1.0.0","cells":[
            {"type":"cs","input":"importFiles [ \"d.csv\" ]"},
            {"type":"cs","input":"setupParse paths: [ \"d.csv\" ]"},
            {"type":"cs","input":"getFrameSummary \"d.hex\""},
            {"type":"cs","input":"getModel \"m\""}
        ]}"#,
    )
    .expect("document parses");
    build_replay_plan(&doc).expect("plan builds")
}

#[test]
fn steps_run_in_cell_order_and_produce_one_result_each() {
    let plan = four_step_plan();
    let mut engine = ReplayEngine::new(ScriptedSession::default());
    let report = engine.replay(&plan).expect("replay runs");

    assert_eq!(report.results.len(), 4);
    assert!(report.succeeded());
    assert_eq!(
        engine.session_mut().executed,
        vec!["importFiles", "setupParse", "getFrameSummary", "getModel"]
    );
    for (i, r) in report.results.iter().enumerate() {
        assert_eq!(r.step_index, i);
    }
    assert_eq!(engine.event_variants(), vec!["I", "S", "F", "S", "F", "S", "F", "S", "F", "C"]);
    assert!(report.replay_fingerprint.is_some());
}

#[test]
fn fail_fast_stops_after_the_failing_step() {
    let plan = four_step_plan();
    let session = ScriptedSession { fail_on: Some(1), ..Default::default() };
    let mut engine = ReplayEngine::new(session);
    let report = engine.replay(&plan).expect("replay runs");

    // Failing step is recorded, remaining steps were never submitted.
    assert_eq!(report.results.len(), 2);
    assert_eq!(report.aborted_at, Some(1));
    assert!(report.replay_fingerprint.is_none());
    assert!(matches!(report.results[1].outcome, StepOutcome::Failed(_)));
    assert_eq!(engine.session_mut().executed.len(), 2);
    assert_eq!(engine.event_variants(), vec!["I", "S", "F", "S", "X", "A"]);
}

#[test]
fn best_effort_records_the_failure_and_continues() {
    let plan = four_step_plan();
    let session = ScriptedSession { fail_on: Some(1), ..Default::default() };
    let mut engine = ReplayEngine::new(session).with_policy(FailurePolicy::BestEffort);
    let report = engine.replay(&plan).expect("replay runs");

    assert_eq!(report.results.len(), 4);
    assert_eq!(report.aborted_at, None);
    assert_eq!(report.failures().len(), 1);
    assert_eq!(report.failures()[0].step_index, 1);
    assert!(!report.succeeded());
    // Completed even though one step failed.
    assert!(report.replay_fingerprint.is_some());
    assert_eq!(engine.event_variants(), vec!["I", "S", "F", "S", "X", "S", "F", "S", "F", "C"]);
}

#[test]
fn empty_plan_completes_with_zero_results() {
    let doc = FlowDocument::from_json_str(
        r#"{"cells":[{"type":"md","input":"prose only"}]}"#,
    )
    .unwrap();
    let plan = build_replay_plan(&doc).unwrap();
    let mut engine = ReplayEngine::new(ScriptedSession::default());
    let report = engine.replay(&plan).expect("replay runs");
    assert!(report.results.is_empty());
    assert!(report.succeeded());
    assert_eq!(engine.event_variants(), vec!["I", "C"]);
}

#[test]
fn unknown_commands_keep_their_recorded_name_in_results_and_events() {
    let doc = FlowDocument::from_json_str(
        r#"{"cells":[{"type":"cs","input":"inspect \"p.hex\""}]}"#,
    )
    .unwrap();
    let plan = build_replay_plan(&doc).unwrap();
    let session = ScriptedSession { fail_on: Some(0), ..Default::default() };
    let mut engine = ReplayEngine::new(session);
    let report = engine.replay(&plan).expect("replay runs");

    // The cell's own command name, not a placeholder.
    assert_eq!(report.results[0].command, "inspect");
    let failed_command = engine
        .events()
        .into_iter()
        .find_map(|e| match e.kind {
            ReplayEventKind::StepFailed { command, .. } => Some(command),
            _ => None,
        })
        .expect("a StepFailed event");
    assert_eq!(failed_command, "inspect");
}

#[test]
fn failure_events_carry_the_originating_command_and_index() {
    let plan = four_step_plan();
    let session = ScriptedSession { fail_on: Some(2), ..Default::default() };
    let mut engine = ReplayEngine::new(session);
    engine.replay(&plan).expect("replay runs");
    let failed = engine
        .events()
        .into_iter()
        .find_map(|e| match e.kind {
            ReplayEventKind::StepFailed { step_index, command, .. } => Some((step_index, command)),
            _ => None,
        })
        .expect("a StepFailed event");
    assert_eq!(failed, (2, "getFrameSummary".to_string()));
}
