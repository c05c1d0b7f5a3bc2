use thiserror::Error;

/// Errors that can occur while parsing or editing a document
#[derive(Error, Debug)]
pub enum EditError {
    #[error("parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("structure error at '{path}': {message}")]
    Structure { path: String, message: String },

    #[error("value at '{path}' is not a sequence")]
    NotASequence { path: String },
}

impl EditError {
    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        EditError::Parse {
            line,
            message: message.into(),
        }
    }

    pub(crate) fn structure(path: impl Into<String>, message: impl Into<String>) -> Self {
        EditError::Structure {
            path: path.into(),
            message: message.into(),
        }
    }
}
