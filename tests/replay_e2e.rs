//! End-to-end: a recorded GLM walkthrough replayed against the local
//! session, plus the malformed-document path.

use rflow_core::{build_replay_plan, FailurePolicy, ReplayEngine};
use rflow_domain::{FlowDocument, FlowParseError};
use rflow_session::LocalSession;

const PROSTATE_CSV: &str = "\
ID,CAPSULE,AGE,RACE,DPROS,DCAPS\n\
1,0,65,1,2,1\n\
2,1,72,1,3,2\n\
3,0,70,1,1,2\n\
4,1,76,2,2,1\n\
5,0,69,1,1,1\n\
6,1,71,1,3,2\n";

/// The shape recorded by the notebook: import, parse, split, model, predict.
fn glm_walkthrough() -> &'static str {
    concat!(
        r#"{"version":"1.0.0","cells":["#,
        r###"{"type":"md","input":"## GLM on prostate"},"###,
        r#"{"type":"cs","input":"importFiles [ \"prostate.csv\" ]"},"#,
        r#"{"type":"cs","input":"setupParse paths: [ \"prostate.csv\" ]"},"#,
        r#"{"type":"cs","input":"parseFiles paths: [\"prostate.csv\"], destination_frame: \"prostate.hex\", parse_type: \"CSV\", separator: 44, number_columns: 6, check_header: 1"},"#,
        r#"{"type":"cs","input":"getFrameSummary \"prostate.hex\""},"#,
        r#"{"type":"cs","input":"splitFrame \"prostate.hex\", [0.25], [\"q1.hex\",\"q3.hex\"], 123456"},"#,
        r#"{"type":"cs","input":"buildModel 'glm', {\"model_id\":\"glm-prostate\",\"training_frame\":\"q3.hex\",\"response_column\":\"CAPSULE\",\"family\":\"binomial\"}"},"#,
        r#"{"type":"cs","input":"predict model: \"glm-prostate\", frame: \"q1.hex\", predictions_frame: \"pred.hex\""},"#,
        r#"{"type":"cs","input":"getModel \"glm-prostate\""}"#,
        r#"]}"#,
    )
}

#[test]
fn glm_walkthrough_replays_in_order_and_succeeds() {
    let doc = FlowDocument::from_json_str(glm_walkthrough()).expect("document parses");
    let plan = build_replay_plan(&doc).expect("plan builds");
    assert_eq!(plan.len(), 8, "markdown cell is prose, not a step");

    let mut session = LocalSession::new();
    session.register_file("prostate.csv", PROSTATE_CSV);
    let mut engine = ReplayEngine::new(session);
    let report = engine.replay(&plan).expect("replay runs");

    assert!(report.succeeded(), "failures: {:?}", report.failures());
    assert_eq!(report.results.len(), 8);

    // Later steps found state created by earlier ones, by name.
    let model = report.outcome_of(5).expect("model payload");
    assert_eq!(model["model_id"], "glm-prostate");
    let prediction = report.outcome_of(6).expect("prediction payload");
    assert_eq!(prediction["predictions_frame"], "pred.hex");

    let session = engine.session_mut();
    assert!(session.frame("pred.hex").is_some());
    assert_eq!(
        session.frame("q1.hex").map(|f| f.row_count()).unwrap_or_default()
            + session.frame("q3.hex").map(|f| f.row_count()).unwrap_or_default(),
        6
    );
}

#[test]
fn malformed_document_executes_nothing() {
    // Missing `cells` entirely.
    let err = FlowDocument::from_json_str(r#"{"version":"1.0.0"}"#).unwrap_err();
    assert_eq!(err, FlowParseError::MissingCells);

    // A bad command cell poisons the whole plan: no partial execution.
    let doc = FlowDocument::from_json_str(
        r#"{"cells":[
            {"type":"cs","input":"importFiles [ \"d.csv\" ]"},
            {"type":"cs","input":"splitFrame \"d.hex\", [2.0]"}
        ]}"#,
    )
    .unwrap();
    assert!(build_replay_plan(&doc).is_err());
}

#[test]
fn best_effort_reports_cascading_missing_references() {
    // The parse step fails (file never imported), later by-name lookups
    // fail in its wake; best-effort still yields one result per step.
    let doc = FlowDocument::from_json_str(
        r#"{"cells":[
            {"type":"cs","input":"parseFiles paths: [\"ghost.csv\"], destination_frame: \"g.hex\""},
            {"type":"cs","input":"getFrameSummary \"g.hex\""},
            {"type":"cs","input":"getModel \"m\""}
        ]}"#,
    )
    .unwrap();
    let plan = build_replay_plan(&doc).unwrap();
    let mut engine =
        ReplayEngine::new(LocalSession::new()).with_policy(FailurePolicy::BestEffort);
    let report = engine.replay(&plan).expect("replay runs");
    assert_eq!(report.results.len(), 3);
    assert_eq!(report.failures().len(), 3);
    assert_eq!(report.aborted_at, None);
}
