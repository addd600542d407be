use thiserror::Error;

/// Evaluator-side failures surfaced to the host. Not catchable by the
/// interpreted program.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RuntimeError {
    #[error("Variable '{name}' not found")]
    VariableNotFound { name: String },
    #[error("Value of type {type_name} is not a class instance")]
    NotAnInstance { type_name: &'static str },
    #[error("Method '{method}' call error")]
    MethodCallError { method: String },
    #[error("Class has no method '{method}'")]
    NoSuchMethod { method: String },
    #[error("Comparison method '{method}' must return Bool")]
    ComparisonNotBool { method: String },
    #[error("different types compared")]
    IncomparableTypes,
    #[error("Cannot add values of these types")]
    AdditionNotSupported,
    #[error("{operation} can operate with numbers only")]
    NumbersOnly { operation: &'static str },
    #[error("Division by zero")]
    DivisionByZero,
    #[error("Return outside of a method")]
    ReturnOutsideMethod,
}
