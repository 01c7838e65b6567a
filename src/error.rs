use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WidgetError {
    #[error("Precondition not met: {0}")]
    PreconditionNotMet(&'static str),

    #[error("Invalid entity kind: {0}")]
    InvalidEntityKind(String),
}

pub type Result<T> = std::result::Result<T, WidgetError>;
