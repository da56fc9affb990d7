//! Error types shared across every stage of the compiler.
//!
//! Each stage reports errors as plain data (never panics on user input) so the
//! driver can format and collect them uniformly. See `spec.md` §7 for the four
//! error categories.

use std::fmt::{self, Display};

/// `(line, column)`, 1-indexed line and 0-indexed column.
pub type Position = (usize, usize);

/// Sentinel position for violations that are not tied to a specific place in
/// the source (category 4, "Internal").
pub const NO_POSITION: Position = (1, 0);

macro_rules! positioned_error {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $name {
            pub position: Position,
            pub message: String,
        }

        impl $name {
            pub fn new(position: Position, message: impl Into<String>) -> Self {
                Self {
                    position,
                    message: message.into(),
                }
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let (line, col) = self.position;
                write!(f, "[{line}:{col}] {}", self.message)
            }
        }

        impl std::error::Error for $name {}
    };
}

positioned_error!(SyntaxError, "A lexer or parser error.");
positioned_error!(SemanticError, "A name-resolution error from the combined analyzer.");
positioned_error!(TypeError, "A type-checking error from the combined analyzer.");
positioned_error!(InternalError, "A compiler invariant violation; never caused by user input.");

/// The four diagnostic categories from `spec.md` §7, unified for reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    Syntax(SyntaxError),
    Semantic(SemanticError),
    Type(TypeError),
    Internal(InternalError),
}

impl CompileError {
    pub fn position(&self) -> Position {
        match self {
            CompileError::Syntax(e) => e.position,
            CompileError::Semantic(e) => e.position,
            CompileError::Type(e) => e.position,
            CompileError::Internal(e) => e.position,
        }
    }

    pub fn category(&self) -> &'static str {
        match self {
            CompileError::Syntax(_) => "Syntax error",
            CompileError::Semantic(_) => "Semantic error",
            CompileError::Type(_) => "Type error",
            CompileError::Internal(_) => "Internal compiler error",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            CompileError::Syntax(e) => &e.message,
            CompileError::Semantic(e) => &e.message,
            CompileError::Type(e) => &e.message,
            CompileError::Internal(e) => &e.message,
        }
    }
}

impl Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (line, col) = self.position();
        write!(f, "[{line}:{col}] {}: {}", self.category(), self.message())
    }
}

impl From<SyntaxError> for CompileError {
    fn from(e: SyntaxError) -> Self {
        CompileError::Syntax(e)
    }
}

impl From<SemanticError> for CompileError {
    fn from(e: SemanticError) -> Self {
        CompileError::Semantic(e)
    }
}

impl From<TypeError> for CompileError {
    fn from(e: TypeError) -> Self {
        CompileError::Type(e)
    }
}

impl From<InternalError> for CompileError {
    fn from(e: InternalError) -> Self {
        CompileError::Internal(e)
    }
}
