use thiserror::Error;

use crate::template::TemplateError;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid toolchain identifier {0:?}")]
    InvalidIdentifier(String),

    #[error("feature or action config {0:?} declared more than once")]
    DuplicateName(String),

    #[error("multiple action configs for action {0:?}")]
    DuplicateActionConfig(String),

    #[error("{referrer:?} references undeclared feature or action config {name:?}")]
    UnknownReference { referrer: String, name: String },

    #[error("unknown feature or action config {0:?}")]
    UnknownFeature(String),

    #[error("flag group in {0:?} has both flags and nested flag groups")]
    AmbiguousFlagGroup(String),

    #[error("flag group in {0:?} has neither flags nor nested flag groups")]
    EmptyFlagGroup(String),

    // Sets owned by an action config apply to its action implicitly.
    #[error("flag set or env set in action config {0:?} must not list actions")]
    ActionConfigSetWithActions(String),

    #[error("flag set or env set in feature {0:?} applies to no actions")]
    SetWithoutActions(String),

    #[error("unknown artifact category {0:?}")]
    UnknownArtifactCategory(String),

    #[error("invalid template {template:?} in {owner:?}: {source}")]
    InvalidTemplate {
        owner: String,
        template: String,
        source: TemplateError,
    },
}

pub type ConfigResult<T> = Result<T, ConfigError>;
