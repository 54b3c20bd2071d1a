//! splitFrame with a fixed seed must assign rows identically on every run.

use rflow_core::{build_replay_plan, ReplayEngine};
use rflow_domain::FlowDocument;
use rflow_session::LocalSession;

fn hundred_row_csv() -> String {
    (0..100).map(|i| format!("{i},{}\n", i * 2)).collect()
}

fn split_doc() -> FlowDocument {
    FlowDocument::from_json_str(concat!(
        r#"{"version":"1.0.0","cells":["#,
        r#"{"type":"cs","input":"importFiles [ \"rows.csv\" ]"},"#,
        r#"{"type":"cs","input":"parseFiles paths: [\"rows.csv\"], destination_frame: \"rows.hex\", check_header: -1"},"#,
        r#"{"type":"cs","input":"splitFrame \"rows.hex\", [0.25], [\"q1.hex\",\"q3.hex\"], 123456"}"#,
        r#"]}"#,
    ))
    .expect("document parses")
}

fn run_once() -> (u64, u64, String) {
    let plan = build_replay_plan(&split_doc()).expect("plan builds");
    let mut session = LocalSession::new();
    session.register_file("rows.csv", hundred_row_csv());
    let mut engine = ReplayEngine::new(session);
    let report = engine.replay(&plan).expect("replay runs");
    assert!(report.succeeded());

    let splits = &report.outcome_of(2).expect("split payload")["splits"];
    let q1 = splits[0]["row_count"].as_u64().expect("q1 rows");
    let q3 = splits[1]["row_count"].as_u64().expect("q3 rows");
    let fingerprint = report.replay_fingerprint.expect("completed run");
    (q1, q3, fingerprint)
}

#[test]
fn same_seed_and_ratio_give_identical_row_counts() {
    let (q1_a, q3_a, fp_a) = run_once();
    let (q1_b, q3_b, fp_b) = run_once();
    assert_eq!((q1_a, q3_a), (q1_b, q3_b));
    assert_eq!(q1_a + q3_a, 100, "every row lands in exactly one split");
    // Identical plan + identical outcomes = identical replay fingerprint.
    assert_eq!(fp_a, fp_b);
}

#[test]
fn split_frames_are_registered_under_the_requested_names() {
    let plan = build_replay_plan(&split_doc()).expect("plan builds");
    let mut session = LocalSession::new();
    session.register_file("rows.csv", hundred_row_csv());
    let mut engine = ReplayEngine::new(session);
    engine.replay(&plan).expect("replay runs");

    let session = engine.session_mut();
    let q1 = session.frame("q1.hex").expect("q1.hex exists");
    let q3 = session.frame("q3.hex").expect("q3.hex exists");
    assert_eq!(q1.column_names(), q3.column_names());
    assert_eq!(q1.row_count() + q3.row_count(), 100);
}
