//! Errors generated by the FIRRTL frontend.
use crate::{GPosIdx, Id, WithPos};
use thiserror::Error as ThisError;

/// Convenience wrapper to represent success or a meaningful frontend error.
pub type FirResult<T> = std::result::Result<T, Error>;

/// A diagnostic produced by the frontend.
///
/// Every error has a primary location and may carry notes attached to other
/// locations, e.g. the previous definition of a redefined name.
#[derive(Clone)]
pub struct Error {
    kind: Box<ErrorKind>,
    pos: GPosIdx,
    annotations: Vec<(GPosIdx, String)>,
}

#[derive(ThisError, Clone, Debug, PartialEq, Eq)]
enum ErrorKind {
    /// Malformed input that does not match the grammar.
    #[error("{0}")]
    Parse(String),
    /// Error reported by the lexer.
    #[error("{0}")]
    Lexical(String),
    /// A name was declared twice in the same scope.
    #[error("redefinition of name '{0}'")]
    AlreadyBound(Id),
    /// A name was used without a declaration.
    #[error("use of invalid name '{0}'")]
    Undefined(Id),
    /// The IR failed structural verification.
    #[error("malformed structure: {0}")]
    MalformedStructure(String),
    /// The input could not be read.
    #[error("{0}")]
    InvalidFile(String),
    /// The output could not be written.
    #[error("{0}")]
    WriteError(String),
    /// Miscellaneous error message.
    #[error("{0}")]
    Misc(String),
}

impl Error {
    fn new(kind: ErrorKind) -> Self {
        Self {
            kind: Box::new(kind),
            pos: GPosIdx::UNKNOWN,
            annotations: vec![],
        }
    }

    pub fn parse_error<S: ToString>(msg: S) -> Self {
        Self::new(ErrorKind::Parse(msg.to_string()))
    }
    pub fn lexical<S: ToString>(msg: S) -> Self {
        Self::new(ErrorKind::Lexical(msg.to_string()))
    }
    pub fn already_bound(name: Id) -> Self {
        Self::new(ErrorKind::AlreadyBound(name))
    }
    pub fn undefined(name: Id) -> Self {
        Self::new(ErrorKind::Undefined(name))
    }
    pub fn malformed_structure<S: ToString>(msg: S) -> Self {
        Self::new(ErrorKind::MalformedStructure(msg.to_string()))
    }
    pub fn invalid_file<S: ToString>(msg: S) -> Self {
        Self::new(ErrorKind::InvalidFile(msg.to_string()))
    }
    pub fn write_error<S: ToString>(msg: S) -> Self {
        Self::new(ErrorKind::WriteError(msg.to_string()))
    }
    pub fn misc<S: ToString>(msg: S) -> Self {
        Self::new(ErrorKind::Misc(msg.to_string()))
    }

    /// Attach the primary location of this error.
    pub fn with_pos<T: WithPos>(mut self, pos: &T) -> Self {
        self.pos = pos.copy_span();
        self
    }

    /// Attach a note pointing at another location.
    pub fn with_annotation<T: WithPos, S: ToString>(
        mut self,
        pos: &T,
        msg: S,
    ) -> Self {
        self.annotations.push((pos.copy_span(), msg.to_string()));
        self
    }

    /// The message of this error without any location information.
    pub fn message(&self) -> String {
        self.kind.to_string()
    }

    /// The primary location of this error.
    pub fn location(&self) -> GPosIdx {
        self.pos
    }

    pub fn annotations(&self) -> &[(GPosIdx, String)] {
        &self.annotations
    }

    /// True if this diagnostic was produced by the lexer.
    pub fn is_lexical(&self) -> bool {
        matches!(*self.kind, ErrorKind::Lexical(_))
    }

    fn render(pos: GPosIdx, msg: &str) -> String {
        if pos == GPosIdx::UNKNOWN {
            msg.to_string()
        } else {
            pos.format(msg)
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.kind)
    }
}

impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", Self::render(self.pos, &self.message()))?;
        for (pos, note) in &self.annotations {
            write!(f, "\n{}", Self::render(*pos, &format!("note: {note}")))?;
        }
        Ok(())
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::write_error(format!("IO Error: {}", e))
    }
}

impl From<std::str::Utf8Error> for Error {
    fn from(err: std::str::Utf8Error) -> Self {
        Error::invalid_file(err.to_string())
    }
}

#[cfg(feature = "serialize")]
impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::write_error(format!("JSON Error: {}", e))
    }
}
