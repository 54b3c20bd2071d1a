//! Command → REST route planning.
//!
//! Kept separate from the transport so the mapping is testable without a
//! server. Routes follow the H2O-style v3 layout: frame and model state
//! live server-side under stable names, the client only references them.

use serde_json::{json, Map, Value};

use rflow_domain::{ColumnNameSource, Command};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub method: Method,
    pub path: String,
    /// Flat parameter object; scalars go out as-is, lists as JSON text.
    pub params: Value,
}

pub fn route_for(command: &Command) -> Route {
    match command {
        Command::ImportFiles { paths } => Route {
            method: Method::Get,
            path: "/3/ImportFiles".to_string(),
            params: json!({ "path": paths }),
        },
        Command::SetupParse { source_keys } => Route {
            method: Method::Post,
            path: "/3/ParseSetup".to_string(),
            params: json!({ "source_frames": source_keys }),
        },
        Command::ParseFiles(config) => Route {
            method: Method::Post,
            path: "/3/Parse".to_string(),
            params: serde_json::to_value(config).unwrap_or_else(|_| json!({})),
        },
        Command::GetFrameSummary { frame_id } => Route {
            method: Method::Get,
            path: format!("/3/Frames/{frame_id}/summary"),
            params: json!({}),
        },
        Command::SetColumnNames { frame_id, source } => {
            let mut params = Map::new();
            match source {
                ColumnNameSource::Explicit(names) => {
                    params.insert("names".to_string(), json!(names));
                }
                ColumnNameSource::FromFrame(other) => {
                    params.insert("from_frame".to_string(), json!(other));
                }
            }
            Route {
                method: Method::Post,
                path: format!("/3/Frames/{frame_id}/columns/names"),
                params: Value::Object(params),
            }
        }
        Command::SplitFrame { frame_id, ratios, destination_frames, seed } => Route {
            method: Method::Post,
            path: "/3/SplitFrame".to_string(),
            params: json!({
                "dataset": frame_id,
                "ratios": ratios,
                "destination_frames": destination_frames,
                "seed": seed,
            }),
        },
        Command::BuildModel { algo, parameters } => Route {
            method: Method::Post,
            path: format!("/3/ModelBuilders/{algo}"),
            params: parameters.clone(),
        },
        Command::Predict { model_id, frame_id, predictions_frame } => Route {
            method: Method::Post,
            path: format!("/3/Predictions/models/{model_id}/frames/{frame_id}"),
            params: json!({ "predictions_frame": predictions_frame }),
        },
        Command::GetModel { model_id } => Route {
            method: Method::Get,
            path: format!("/3/Models/{model_id}"),
            params: json!({}),
        },
        Command::GetPrediction { model_id, frame_id } => Route {
            method: Method::Get,
            path: format!("/3/Predictions/models/{model_id}/frames/{frame_id}"),
            params: json!({}),
        },
        // Unknown commands are forwarded verbatim under a generic endpoint;
        // whether they mean anything is the server's call.
        Command::Opaque { name, args } => Route {
            method: Method::Post,
            path: format!("/3/Commands/{name}"),
            params: args.clone(),
        },
    }
}

/// Flatten a params object into form fields. Non-scalar values travel as
/// compact JSON text, matching how recorded flows carry list arguments.
pub fn form_fields(params: &Value) -> Vec<(String, String)> {
    let mut fields = Vec::new();
    if let Some(map) = params.as_object() {
        for (key, value) in map {
            let text = match value {
                Value::Null => continue,
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            fields.push((key.clone(), text));
        }
    }
    fields
}
