use std::io;
use std::num::ParseIntError;
use std::str::Utf8Error;

use thiserror::Error;

pub type Result<T, E = EditError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum EditError {
    /// A filesystem step failed, or the editor could not be launched.
    #[error("{context}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },

    /// The editor ran but exited with a non-zero status.
    #[error("editor `{editor}` exited with status {code}")]
    EditorExit { editor: String, code: i32 },

    /// The edit was saved in a non-UTF-8 encoding; `bytes` is exactly what
    /// the editor wrote.
    #[error("edited document is not valid UTF-8")]
    InvalidUtf8 {
        bytes: Vec<u8>,
        #[source]
        source: Utf8Error,
    },

    #[error("invalid editor command `{0}`")]
    InvalidEditorCommand(String),

    #[error("invalid line offset `{input}`")]
    InvalidLineOffset {
        input: String,
        #[source]
        source: ParseIntError,
    },
}

impl EditError {
    pub(crate) fn io(context: impl Into<String>, source: io::Error) -> Self {
        Self::Io { context: context.into(), source }
    }

    /// Whether the user (or the editor itself) aborted the edit.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::EditorExit { .. })
    }

    /// The raw edited document when it could not be decoded as UTF-8.
    pub fn into_bytes(self) -> Option<Vec<u8>> {
        match self {
            Self::InvalidUtf8 { bytes, .. } => Some(bytes),
            _ => None,
        }
    }

    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Self::EditorExit { code, .. } => Some(*code),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_editor_exit_is_cancelled() {
        let err = EditError::EditorExit { editor: "vim".into(), code: 1 };
        assert!(err.is_cancelled());
        assert_eq!(err.exit_code(), Some(1));
        assert_eq!(err.to_string(), "editor `vim` exited with status 1");
    }

    #[test]
    fn test_io_keeps_source() {
        let err = EditError::io("failed to write `/tmp/x`", io::Error::other("disk full"));
        assert!(!err.is_cancelled());
        assert_eq!(err.exit_code(), None);
        assert_eq!(err.to_string(), "failed to write `/tmp/x`");
        let source = std::error::Error::source(&err).map(|s| s.to_string());
        assert_eq!(source.as_deref(), Some("disk full"));
    }
}
