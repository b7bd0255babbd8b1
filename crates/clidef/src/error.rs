use thiserror::Error;

/// Result alias used across the engine.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Everything a run can fail with.
#[derive(Debug, Error)]
pub enum Error {
    /// The definition is malformed. Raised by `DefinitionBuilder::build`.
    #[error("invalid definition: {0}")]
    Definition(#[from] DefinitionError),

    /// The arguments were rejected. The usage block has already been written
    /// and the error action has already run when this is returned.
    #[error("{0}")]
    Usage(#[from] UsageError),

    /// A token reached the binder without a registered binding.
    #[error("binding failed: {0}")]
    Binding(String),

    /// The handler itself failed.
    #[error(transparent)]
    Handler(anyhow::Error),
}

impl Error {
    pub fn is_usage(&self) -> bool {
        matches!(self, Self::Usage(_))
    }

    pub fn usage_message(&self) -> Option<&str> {
        match self {
            Self::Usage(err) => Some(err.message()),
            _ => None,
        }
    }
}

/// Programming errors detected while building a definition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DefinitionError {
    #[error("no subcommands registered")]
    NoSubcommands,

    #[error("subcommand \"default\" is required when subcommands are not differentiated")]
    MissingDefault,

    #[error("subcommand '{0}' is unreachable when subcommands are not differentiated")]
    UnreachableSubcommand(String),

    #[error("subcommand '{0}' is registered more than once")]
    DuplicateSubcommand(String),

    #[error("invalid subcommand name '{0}'")]
    InvalidSubcommandName(String),

    #[error("invalid option letter '{letter}' in subcommand '{subcommand}'")]
    InvalidLetter { subcommand: String, letter: char },

    #[error("option letter '-{letter}' is used more than once in subcommand '{subcommand}'")]
    DuplicateLetter { subcommand: String, letter: char },

    #[error("invalid long option name '{name}' in subcommand '{subcommand}'")]
    InvalidLongName { subcommand: String, name: String },

    #[error("long option '--{name}' is used more than once in subcommand '{subcommand}'")]
    DuplicateLongName { subcommand: String, name: String },

    #[error("invalid parameter name '{name}' in subcommand '{subcommand}'")]
    InvalidParameterName { subcommand: String, name: String },

    #[error("parameter '{name}' is declared more than once in subcommand '{subcommand}'")]
    DuplicateParameter { subcommand: String, name: String },

    #[error(
        "required parameter '{required}' follows optional parameter '{optional}' in subcommand '{subcommand}'"
    )]
    OptionalBeforeRequired {
        subcommand: String,
        optional: String,
        required: String,
    },
}

/// A rejected argument vector.
///
/// `subcommand` names the subcommand that was resolved before the failure, if
/// any; it selects the usage rendering mode.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct UsageError {
    subcommand: Option<String>,
    message: String,
}

impl UsageError {
    /// An error raised before any subcommand was resolved.
    pub fn general(message: impl Into<String>) -> Self {
        Self {
            subcommand: None,
            message: message.into(),
        }
    }

    pub fn for_subcommand(subcommand: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            subcommand: Some(subcommand.into()),
            message: message.into(),
        }
    }

    pub fn subcommand(&self) -> Option<&str> {
        self.subcommand.as_deref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
