use crosshatch_crosstool::errors::ConfigError;
use crosshatch_crosstool::template::TemplateError;
use thiserror::Error;

use crate::variables::Shape;

/// Per-request failures. These abort one resolution call and leave the shared
/// configuration untouched; nothing partial is ever returned.
#[derive(Error, Debug)]
pub enum ResolutionError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("feature {0:?} is enabled by default and cannot be disabled")]
    CannotDisable(String),

    #[error("{first:?} and {second:?} both provide {label:?}")]
    ProvidesConflict {
        first: String,
        second: String,
        label: String,
    },

    #[error("no enabled action config for action {0:?}")]
    ActionNotConfigured(String),

    #[error("no tool for action {0:?} satisfies the enabled feature set")]
    NoMatchingTool(String),

    #[error("variable {0:?} is not bound")]
    UnboundVariable(String),

    #[error("variable {name:?} is {actual}, expected {expected}")]
    WrongShape {
        name: String,
        expected: Shape,
        actual: Shape,
    },

    // Reachable only for hand-built groups that bypassed load validation.
    #[error("invalid template {template:?}: {source}")]
    InvalidTemplate {
        template: String,
        source: TemplateError,
    },
}

pub type ResolutionResult<T> = Result<T, ResolutionError>;
