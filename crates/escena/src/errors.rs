use serde::{Deserialize, Serialize};
use thiserror::Error;

#[non_exhaustive]
#[derive(Error, Debug, Clone, Deserialize, Serialize)]
pub enum EscenaError {
    #[error("Completion provider error: {0}")]
    Provider(String),

    #[error("Completion response was empty")]
    EmptyCompletion,

    #[error("Message not found: {0}")]
    MessageNotFound(String),

    #[error("Only assistant messages can be edited: {0}")]
    NotEditable(String),

    #[error("Greeting skipped: conversation already has messages")]
    GreetingSkipped,

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type EscenaResult<T> = Result<T, EscenaError>;
