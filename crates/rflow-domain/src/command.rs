//! Typed command model.
//!
//! Each known command name decodes into a variant with a typed payload.
//! Names the harness does not know become `Command::Opaque` and travel to
//! the session untouched: dispatch here is syntactic only, semantic
//! validation (does the frame exist, are the hyperparameters sane) belongs
//! to the analytics engine behind the session.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::errors::FlowParseError;
use crate::scan::{scan_command, CommandCall};

/// Parse configuration as recorded by `parseFiles` cells.
///
/// `check_header`: 1 = first row is a header, -1 = no header, 0 = guess.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseConfig {
    pub paths: Vec<String>,
    pub destination_frame: String,
    #[serde(default)]
    pub parse_type: Option<String>,
    #[serde(default)]
    pub separator: Option<u8>,
    #[serde(default)]
    pub number_columns: Option<usize>,
    #[serde(default)]
    pub single_quotes: bool,
    #[serde(default)]
    pub column_names: Option<Vec<String>>,
    #[serde(default)]
    pub column_types: Option<Vec<String>>,
    #[serde(default)]
    pub delete_on_done: bool,
    #[serde(default)]
    pub check_header: i32,
    #[serde(default)]
    pub chunk_size: Option<u64>,
}

/// Where `setColumnNames` takes the replacement names from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ColumnNameSource {
    Explicit(Vec<String>),
    FromFrame(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    ImportFiles { paths: Vec<String> },
    SetupParse { source_keys: Vec<String> },
    ParseFiles(ParseConfig),
    GetFrameSummary { frame_id: String },
    SetColumnNames { frame_id: String, source: ColumnNameSource },
    SplitFrame {
        frame_id: String,
        ratios: Vec<f64>,
        destination_frames: Vec<String>,
        seed: Option<u64>,
    },
    BuildModel { algo: String, parameters: Value },
    Predict {
        model_id: String,
        frame_id: String,
        predictions_frame: Option<String>,
    },
    GetModel { model_id: String },
    GetPrediction { model_id: String, frame_id: String },
    Opaque { name: String, args: Value },
}

impl Command {
    /// Decode a cell's command text. Happens once, at plan-build time.
    pub fn parse(input: &str) -> Result<Self, FlowParseError> {
        let call = scan_command(input)?;
        match call.name.as_str() {
            "importFiles" => Ok(Command::ImportFiles { paths: paths_of(&call)? }),
            "setupParse" => Ok(Command::SetupParse { source_keys: paths_of(&call)? }),
            "parseFiles" => decode_parse_files(&call),
            "getFrameSummary" => Ok(Command::GetFrameSummary {
                frame_id: positional_string(&call, 0, "frame id")?,
            }),
            "setColumnNames" => decode_set_column_names(&call),
            "splitFrame" => decode_split_frame(&call),
            "buildModel" => decode_build_model(&call),
            "predict" => decode_predict(&call),
            "getModel" => Ok(Command::GetModel {
                model_id: positional_string(&call, 0, "model id")?,
            }),
            "getPrediction" => Ok(Command::GetPrediction {
                model_id: required_keyword_string(&call, &["model"])?,
                frame_id: required_keyword_string(&call, &["frame"])?,
            }),
            _ => Ok(Command::Opaque {
                name: call.name.clone(),
                args: opaque_args(&call),
            }),
        }
    }

    /// Name used in events, logs and reports. For unknown commands this is
    /// the name as recorded in the cell, so failures still carry it.
    pub fn name(&self) -> &str {
        match self {
            Command::ImportFiles { .. } => "importFiles",
            Command::SetupParse { .. } => "setupParse",
            Command::ParseFiles(_) => "parseFiles",
            Command::GetFrameSummary { .. } => "getFrameSummary",
            Command::SetColumnNames { .. } => "setColumnNames",
            Command::SplitFrame { .. } => "splitFrame",
            Command::BuildModel { .. } => "buildModel",
            Command::Predict { .. } => "predict",
            Command::GetModel { .. } => "getModel",
            Command::GetPrediction { .. } => "getPrediction",
            Command::Opaque { name, .. } => name,
        }
    }
}

/// `importFiles [ "a" ]` or `setupParse paths: [ "a" ]` both carry a path
/// list, positionally or under `paths`/`source_frames`.
fn paths_of(call: &CommandCall) -> Result<Vec<String>, FlowParseError> {
    let value = call
        .keyword(&["paths", "source_frames"])
        .or_else(|| call.positionals().first().copied())
        .ok_or_else(|| syntax(call, "expected a path list"))?;
    string_list(value).ok_or_else(|| syntax(call, "path list must contain strings"))
}

fn decode_parse_files(call: &CommandCall) -> Result<Command, FlowParseError> {
    let object = Value::Object(call.keyword_object());
    let config: ParseConfig = serde_json::from_value(object)
        .map_err(|e| syntax(call, &format!("bad parse configuration: {e}")))?;
    Ok(Command::ParseFiles(config))
}

fn decode_set_column_names(call: &CommandCall) -> Result<Command, FlowParseError> {
    let frame_id = positional_string(call, 0, "target frame")?;
    let source = if let Some(from) = call.keyword(&["from", "from_frame"]) {
        let id = from
            .as_str()
            .ok_or_else(|| syntax(call, "`from` must be a frame name"))?;
        ColumnNameSource::FromFrame(id.to_string())
    } else if let Some(names) = call.keyword(&["names"]).or_else(|| {
        call.positionals().get(1).copied()
    }) {
        let names =
            string_list(names).ok_or_else(|| syntax(call, "names must be a string list"))?;
        ColumnNameSource::Explicit(names)
    } else {
        return Err(syntax(call, "expected a name list or `from:` frame"));
    };
    Ok(Command::SetColumnNames { frame_id, source })
}

fn decode_split_frame(call: &CommandCall) -> Result<Command, FlowParseError> {
    let frame_id = positional_string(call, 0, "source frame")?;
    let pos = call.positionals();
    let ratios = pos
        .get(1)
        .and_then(|v| v.as_array())
        .map(|a| a.iter().filter_map(Value::as_f64).collect::<Vec<_>>())
        .filter(|r: &Vec<f64>| !r.is_empty())
        .ok_or_else(|| syntax(call, "expected a non-empty ratio list"))?;
    if ratios.iter().any(|r| !(0.0..1.0).contains(r)) {
        return Err(syntax(call, "ratios must lie in [0, 1)"));
    }
    let destination_frames = pos
        .get(2)
        .and_then(|v| string_list(v))
        .unwrap_or_default();
    let seed = pos.get(3).and_then(|v| v.as_u64()).or_else(|| {
        call.keyword(&["seed"]).and_then(Value::as_u64)
    });
    Ok(Command::SplitFrame { frame_id, ratios, destination_frames, seed })
}

fn decode_build_model(call: &CommandCall) -> Result<Command, FlowParseError> {
    let algo = positional_string(call, 0, "algorithm name")?;
    // Hyperparameters stay an opaque object, forwarded verbatim.
    let parameters = call
        .positionals()
        .get(1)
        .copied()
        .cloned()
        .or_else(|| call.keyword(&["parameters"]).cloned())
        .unwrap_or_else(|| json!({}));
    if !parameters.is_object() {
        return Err(syntax(call, "model parameters must be an object"));
    }
    Ok(Command::BuildModel { algo, parameters })
}

fn decode_predict(call: &CommandCall) -> Result<Command, FlowParseError> {
    Ok(Command::Predict {
        model_id: required_keyword_string(call, &["model"])?,
        frame_id: required_keyword_string(call, &["frame"])?,
        predictions_frame: call
            .keyword(&["predictions_frame"])
            .and_then(Value::as_str)
            .map(str::to_string),
    })
}

fn opaque_args(call: &CommandCall) -> Value {
    let positionals: Vec<Value> = call.positionals().into_iter().cloned().collect();
    json!({
        "positional": positionals,
        "keyword": Value::Object(call.keyword_object()),
    })
}

fn positional_string(
    call: &CommandCall,
    index: usize,
    what: &str,
) -> Result<String, FlowParseError> {
    call.positionals()
        .get(index)
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .ok_or_else(|| syntax(call, &format!("expected {what} as a string")))
}

fn required_keyword_string(
    call: &CommandCall,
    names: &[&str],
) -> Result<String, FlowParseError> {
    call.keyword(names)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| syntax(call, &format!("missing `{}:`", names[0])))
}

fn string_list(value: &Value) -> Option<Vec<String>> {
    let array = value.as_array()?;
    let mut out = Vec::with_capacity(array.len());
    for item in array {
        out.push(item.as_str()?.to_string());
    }
    Some(out)
}

fn syntax(call: &CommandCall, message: &str) -> FlowParseError {
    FlowParseError::Syntax(format!("{}: {message}", call.name))
}
