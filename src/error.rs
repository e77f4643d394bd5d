use thiserror::Error;

use crate::models::GradingSystem;

/// Input problems caught before a calculation runs. The engine itself
/// never fails; these come from the callers that feed it.
#[derive(Debug, Error, PartialEq)]
pub enum CalcError {
    #[error("grade `{symbol}` is not part of the {system} scale")]
    UnknownGrade {
        symbol: String,
        system: GradingSystem,
    },
    #[error("credit {0} is not allowed (expected 0.5 to 30 in steps of 0.5)")]
    InvalidCredit(f64),
    #[error("malformed course `{0}` (expected GRADE:CREDIT[:NAME])")]
    MalformedCourse(String),
    #[error("previous GPA must be between 0 and 4, got {0}")]
    PreviousGpaOutOfRange(f64),
    #[error("{field} must be greater than zero, got {value}")]
    NotPositive { field: &'static str, value: f64 },
    #[error("history has no entry #{index} ({len} stored)")]
    NoSuchEntry { index: usize, len: usize },
    #[error("entry #{index} has no course #{course}")]
    NoSuchCourse { index: usize, course: usize },
}
