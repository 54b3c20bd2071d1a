use thiserror::Error;

/// Errors raised while decoding a flow document or a command cell.
///
/// All of these are fatal for the replay: a document that fails here never
/// reaches the session, so zero commands execute.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FlowParseError {
    #[error("invalid JSON: {0}")]
    InvalidJson(String),
    #[error("document root must be a JSON object")]
    NotAnObject,
    #[error("document has no `cells` key")]
    MissingCells,
    #[error("`cells` must be an array")]
    CellsNotArray,
    #[error("cell {0}: must be an object")]
    CellNotObject(usize),
    #[error("cell {index}: unknown cell type `{found}`")]
    UnknownCellType { index: usize, found: String },
    #[error("cell {0}: `input` must be a string")]
    InputNotString(usize),
    #[error("cell {0}: command input is empty")]
    EmptyInput(usize),
    #[error("cell {index}: {message}")]
    BadCommand { index: usize, message: String },
    #[error("command syntax: {0}")]
    Syntax(String),
}

impl FlowParseError {
    /// Attach a cell index to a bare syntax error coming out of the scanner.
    pub fn at_cell(self, index: usize) -> Self {
        match self {
            FlowParseError::Syntax(message) => FlowParseError::BadCommand { index, message },
            other => other,
        }
    }
}
