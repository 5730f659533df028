use thiserror::Error;

/// Failure to turn a textual `name=value` pair into a [`crate::domain::FieldEdit`].
///
/// Only shape errors are reported here. Out-of-range numbers are accepted and
/// left for the prediction service to judge.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("unknown field '{0}'")]
    UnknownField(String),
    #[error("expected name=value, got '{0}'")]
    MissingAssignment(String),
    #[error("{field}: '{value}' is not an integer")]
    InvalidInteger { field: &'static str, value: String },
    #[error("{field}: '{value}' is not one of {expected}")]
    InvalidChoice {
        field: &'static str,
        value: String,
        expected: &'static str,
    },
    #[error("{field}: '{value}' is not a yes/no value")]
    InvalidFlag { field: &'static str, value: String },
}
