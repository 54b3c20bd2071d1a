//! In-memory analytics session.
//!
//! Stands in for the remote engine behind the `Session` trait so replays
//! are testable without a server. State mirrors the remote model: files,
//! frames and models live in registries and are referenced by name. Model
//! building and prediction are stubs that record names and shapes; no
//! fitting happens here.

use indexmap::IndexMap;
use log::debug;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde_json::{json, Value};

use rflow_core::{Session, SessionError};
use rflow_domain::{ColumnNameSource, Command, ParseConfig};

use crate::frame::{self, Frame};

#[derive(Debug, Default)]
pub struct LocalSession {
    files: IndexMap<String, String>,
    frames: IndexMap<String, Frame>,
    models: IndexMap<String, Value>,
    predictions: IndexMap<String, Value>,
}

impl LocalSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-register a file body under a path, so flows can `importFiles`
    /// it without touching the filesystem.
    pub fn register_file(&mut self, path: impl Into<String>, body: impl Into<String>) {
        self.files.insert(path.into(), body.into());
    }

    pub fn frame(&self, frame_id: &str) -> Option<&Frame> {
        self.frames.get(frame_id)
    }

    fn frame_or_missing(&self, frame_id: &str) -> Result<&Frame, SessionError> {
        self.frames
            .get(frame_id)
            .ok_or_else(|| SessionError::MissingReference { id: frame_id.to_string() })
    }

    fn file_or_missing(&self, path: &str) -> Result<&str, SessionError> {
        self.files
            .get(path)
            .map(String::as_str)
            .ok_or_else(|| SessionError::MissingReference { id: path.to_string() })
    }

    fn import_files(&mut self, paths: &[String]) -> Result<Value, SessionError> {
        let mut keys = Vec::with_capacity(paths.len());
        for path in paths {
            if !self.files.contains_key(path) {
                let body = std::fs::read_to_string(path).map_err(|_| {
                    SessionError::MissingReference { id: path.clone() }
                })?;
                self.files.insert(path.clone(), body);
            }
            keys.push(path.clone());
        }
        Ok(json!({ "keys": keys }))
    }

    /// Inspect the head of each source and propose a parse configuration.
    fn setup_parse(&self, source_keys: &[String]) -> Result<Value, SessionError> {
        let first = source_keys
            .first()
            .ok_or_else(|| SessionError::Rejected { message: "setupParse: no sources".into() })?;
        let body = self.file_or_missing(first)?;
        let first_line = body.lines().next().unwrap_or_default();
        let separator = frame::guess_separator(first_line);
        let head: Vec<String> = first_line
            .split(separator as char)
            .map(|c| c.trim().to_string())
            .collect();
        let has_header = frame::looks_like_header(&head);
        let column_names = if has_header {
            head.clone()
        } else {
            frame::generated_names(head.len())
        };
        Ok(json!({
            "source_frames": source_keys,
            "parse_type": "CSV",
            "separator": separator,
            "number_columns": head.len(),
            "check_header": if has_header { 1 } else { -1 },
            "column_names": column_names,
        }))
    }

    fn parse_files(&mut self, config: &ParseConfig) -> Result<Value, SessionError> {
        let source = config
            .paths
            .first()
            .ok_or_else(|| SessionError::Rejected { message: "parseFiles: no paths".into() })?;
        let body = self.file_or_missing(source)?.to_string();
        if let (Some(names), Some(n)) = (&config.column_names, config.number_columns) {
            if names.len() != n {
                return Err(SessionError::Rejected {
                    message: format!(
                        "parseFiles: {} column names for {} columns",
                        names.len(),
                        n
                    ),
                });
            }
        }
        let frame = frame::parse_csv(
            &body,
            config.separator,
            config.check_header,
            config.column_names.clone(),
        );
        let summary = frame.summary(&config.destination_frame);
        debug!(
            "parsed `{source}` into `{}` ({} rows)",
            config.destination_frame,
            frame.row_count()
        );
        self.frames.insert(config.destination_frame.clone(), frame);
        if config.delete_on_done {
            self.files.shift_remove(source);
        }
        Ok(summary)
    }

    fn set_column_names(
        &mut self,
        frame_id: &str,
        source: &ColumnNameSource,
    ) -> Result<Value, SessionError> {
        let names = match source {
            ColumnNameSource::Explicit(names) => names.clone(),
            ColumnNameSource::FromFrame(other) => {
                self.frame_or_missing(other)?.column_names().to_vec()
            }
        };
        let target = self
            .frames
            .get_mut(frame_id)
            .ok_or_else(|| SessionError::MissingReference { id: frame_id.to_string() })?;
        if names.len() != target.column_count() {
            return Err(SessionError::Rejected {
                message: format!(
                    "setColumnNames: {} names for {} columns",
                    names.len(),
                    target.column_count()
                ),
            });
        }
        target.set_column_names(names);
        Ok(target.summary(frame_id))
    }

    /// Seeded row split. The same seed and ratios over the same frame give
    /// the same bucket assignment on every run.
    fn split_frame(
        &mut self,
        frame_id: &str,
        ratios: &[f64],
        destination_frames: &[String],
        seed: Option<u64>,
    ) -> Result<Value, SessionError> {
        let source = self.frame_or_missing(frame_id)?.clone();
        let bucket_count = ratios.len() + 1;
        let names: Vec<String> = (0..bucket_count)
            .map(|i| {
                destination_frames
                    .get(i)
                    .cloned()
                    .unwrap_or_else(|| format!("{frame_id}_part{i}"))
            })
            .collect();

        let mut rng = StdRng::seed_from_u64(seed.unwrap_or(0));
        let mut buckets: Vec<Vec<Vec<String>>> = vec![Vec::new(); bucket_count];
        for row in source.rows() {
            let draw: f64 = rng.gen();
            let mut cumulative = 0.0;
            let mut chosen = bucket_count - 1;
            for (i, ratio) in ratios.iter().enumerate() {
                cumulative += ratio;
                if draw < cumulative {
                    chosen = i;
                    break;
                }
            }
            buckets[chosen].push(row.clone());
        }

        let mut parts = Vec::with_capacity(bucket_count);
        for (name, rows) in names.iter().zip(buckets) {
            let part = Frame::new(source.column_names().to_vec(), rows);
            parts.push(json!({ "frame_id": name, "row_count": part.row_count() }));
            self.frames.insert(name.clone(), part);
        }
        Ok(json!({ "source": frame_id, "splits": parts }))
    }

    fn build_model(&mut self, algo: &str, parameters: &Value) -> Result<Value, SessionError> {
        if let Some(training) = parameters.get("training_frame").and_then(Value::as_str) {
            self.frame_or_missing(training)?;
        }
        let model_id = parameters
            .get("model_id")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| format!("{algo}-{}", self.models.len() + 1));
        let model = json!({
            "model_id": model_id,
            "algo": algo,
            "parameters": parameters,
        });
        self.models.insert(model_id.clone(), model.clone());
        Ok(model)
    }

    fn predict(
        &mut self,
        model_id: &str,
        frame_id: &str,
        predictions_frame: Option<&str>,
    ) -> Result<Value, SessionError> {
        if !self.models.contains_key(model_id) {
            return Err(SessionError::MissingReference { id: model_id.to_string() });
        }
        let rows = self.frame_or_missing(frame_id)?.row_count();
        let destination = predictions_frame
            .map(str::to_string)
            .unwrap_or_else(|| format!("prediction-{model_id}-{frame_id}"));
        let predictions = Frame::new(
            vec!["predict".to_string()],
            vec![vec!["0".to_string()]; rows],
        );
        self.frames.insert(destination.clone(), predictions);
        let record = json!({
            "model_id": model_id,
            "frame_id": frame_id,
            "predictions_frame": destination,
            "row_count": rows,
        });
        self.predictions
            .insert(format!("{model_id}/{frame_id}"), record.clone());
        Ok(record)
    }
}

impl Session for LocalSession {
    fn execute(&mut self, command: &Command) -> Result<Value, SessionError> {
        match command {
            Command::ImportFiles { paths } => self.import_files(paths),
            Command::SetupParse { source_keys } => self.setup_parse(source_keys),
            Command::ParseFiles(config) => self.parse_files(config),
            Command::GetFrameSummary { frame_id } => {
                Ok(self.frame_or_missing(frame_id)?.summary(frame_id))
            }
            Command::SetColumnNames { frame_id, source } => {
                self.set_column_names(frame_id, source)
            }
            Command::SplitFrame { frame_id, ratios, destination_frames, seed } => {
                self.split_frame(frame_id, ratios, destination_frames, *seed)
            }
            Command::BuildModel { algo, parameters } => self.build_model(algo, parameters),
            Command::Predict { model_id, frame_id, predictions_frame } => {
                self.predict(model_id, frame_id, predictions_frame.as_deref())
            }
            Command::GetModel { model_id } => self
                .models
                .get(model_id)
                .cloned()
                .ok_or_else(|| SessionError::MissingReference { id: model_id.clone() }),
            Command::GetPrediction { model_id, frame_id } => self
                .predictions
                .get(&format!("{model_id}/{frame_id}"))
                .cloned()
                .ok_or_else(|| SessionError::MissingReference {
                    id: format!("{model_id}/{frame_id}"),
                }),
            // The double cannot model side effects of commands it does not
            // know, so it refuses instead of pretending.
            Command::Opaque { name, .. } => Err(SessionError::Rejected {
                message: format!("unsupported command `{name}`"),
            }),
        }
    }

    fn label(&self) -> &str {
        "local"
    }
}
