//! Expansion error types

use thiserror::Error;

use crate::Span;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExpandError {
    /// A variable refers back to itself, directly or through other variables.
    /// `chain` starts at the outermost name and ends with the re-entered one.
    #[error("recursive variable definition: {}", .chain.join(" -> "))]
    Cycle { chain: Vec<String>, span: Span },
}

impl ExpandError {
    /// Span of the definition that closed the cycle
    pub fn span(&self) -> Span {
        match self {
            ExpandError::Cycle { span, .. } => *span,
        }
    }
}

pub type ExpandResult<T> = Result<T, ExpandError>;
