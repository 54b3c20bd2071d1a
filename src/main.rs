use flowreplay_rust::config::CONFIG;
use flowreplay_rust::errors::AppError;
use rflow_client::HttpSession;
use rflow_core::{build_replay_plan, FailurePolicy, ReplayEngine, ReplayPlan, Session, StepOutcome};
use rflow_domain::FlowDocument;
use rflow_session::LocalSession;

fn main() {
    env_logger::init();
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 || args[1] != "run" {
        usage();
        std::process::exit(2);
    }

    let mut file: Option<String> = None;
    let mut endpoint: Option<String> = None;
    let mut local = false;
    let mut quiet = false;
    let mut policy = CONFIG.fail_policy;
    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--file" => {
                i += 1;
                if i < args.len() {
                    file = Some(args[i].clone());
                }
            }
            "--endpoint" => {
                i += 1;
                if i < args.len() {
                    endpoint = Some(args[i].clone());
                }
            }
            "--local" => local = true,
            "--best-effort" => policy = FailurePolicy::BestEffort,
            "--fail-fast" => policy = FailurePolicy::FailFast,
            "--quiet" => quiet = true,
            other => {
                eprintln!("[flowreplay] unknown flag: {other}");
                usage();
                std::process::exit(2);
            }
        }
        i += 1;
    }

    let file = match file {
        Some(f) => f,
        None => {
            usage();
            std::process::exit(2);
        }
    };

    let plan = match load_plan(&file) {
        Ok(plan) => plan,
        Err(e) => {
            eprintln!("[flowreplay] {e}");
            std::process::exit(3);
        }
    };

    let endpoint = endpoint.or_else(|| CONFIG.endpoint.clone());
    let code = if local || endpoint.is_none() {
        replay_with(LocalSession::new(), &plan, policy, quiet)
    } else {
        replay_with(HttpSession::new(endpoint.unwrap_or_default()), &plan, policy, quiet)
    };
    std::process::exit(code);
}

fn load_plan(file: &str) -> Result<ReplayPlan, AppError> {
    let text = std::fs::read_to_string(file)?;
    let document = FlowDocument::from_json_str(&text)?;
    let plan = build_replay_plan(&document)?;
    Ok(plan)
}

fn replay_with<S: Session>(
    session: S,
    plan: &ReplayPlan,
    policy: FailurePolicy,
    quiet: bool,
) -> i32 {
    let mut engine = ReplayEngine::new(session).with_policy(policy);
    let report = match engine.replay(plan) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("[flowreplay] {e}");
            return 5;
        }
    };

    if !quiet {
        for result in &report.results {
            match &result.outcome {
                StepOutcome::Success(_) => {
                    println!("[ok]     {:>3}  {}", result.step_index, result.command);
                }
                StepOutcome::Failed(error) => {
                    println!(
                        "[failed] {:>3}  {}  ({error})",
                        result.step_index, result.command
                    );
                }
            }
        }
        match report.aborted_at {
            Some(index) => println!(
                "aborted at step {index}: {} of {} step(s) ran",
                report.results.len(),
                plan.len()
            ),
            None => println!("completed: {} step(s)", report.results.len()),
        }
    }

    if report.succeeded() {
        0
    } else {
        4
    }
}

fn usage() {
    eprintln!(
        "Usage: flowreplay run --file <flow.json> [--endpoint URL | --local] \
         [--best-effort | --fail-fast] [--quiet]"
    );
}
