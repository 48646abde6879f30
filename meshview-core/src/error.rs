/// Error taxonomy shared by the algebra kernel, mesh pipeline and mesh text I/O
use std::fmt;

/// Numeric failure: zero-length normalization, singular matrices, degenerate angles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArithmeticError {
    message: String,
}

impl ArithmeticError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ArithmeticError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "arithmetic error: {}", self.message)
    }
}

impl std::error::Error for ArithmeticError {}

/// Bad input to a mesh operation: short polygons, out-of-range indices, bad tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentError {
    message: String,
}

impl ArgumentError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ArgumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid argument: {}", self.message)
    }
}

impl std::error::Error for ArgumentError {}

/// A mesh rejected by the pre-write checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "mesh validation failed: {}", self.message)
    }
}

impl std::error::Error for ValidationError {}

/// A malformed line in mesh text, with its 1-based line number and raw text.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub line: usize,
    pub text: String,
    pub source: ArgumentError,
}

impl ParseError {
    pub fn new(line: usize, text: impl Into<String>, source: ArgumentError) -> Self {
        Self {
            line,
            text: text.into(),
            source,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "line {}: {} (in {:?})",
            self.line,
            self.source.message(),
            self.text
        )
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

/// Any failure raised by the mesh pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    Arithmetic(ArithmeticError),
    Argument(ArgumentError),
    Validation(ValidationError),
    Parse(ParseError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Arithmetic(e) => e.fmt(f),
            Error::Argument(e) => e.fmt(f),
            Error::Validation(e) => e.fmt(f),
            Error::Parse(e) => e.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Arithmetic(e) => Some(e),
            Error::Argument(e) => Some(e),
            Error::Validation(e) => Some(e),
            Error::Parse(e) => Some(e),
        }
    }
}

impl From<ArithmeticError> for Error {
    fn from(e: ArithmeticError) -> Self {
        Error::Arithmetic(e)
    }
}

impl From<ArgumentError> for Error {
    fn from(e: ArgumentError) -> Self {
        Error::Argument(e)
    }
}

impl From<ValidationError> for Error {
    fn from(e: ValidationError) -> Self {
        Error::Validation(e)
    }
}

impl From<ParseError> for Error {
    fn from(e: ParseError) -> Self {
        Error::Parse(e)
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
