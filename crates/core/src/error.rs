//! Error model shared by the topbar engine and its collaborators.

use thiserror::Error;

use crate::id::SurveyId;

/// Result type used across the topbar crates.
pub type TopbarResult<T> = Result<T, TopbarError>;

/// Topbar-level error.
///
/// Absent subjects and unresolvable view names are *not* errors at the
/// resolution boundary (they short-circuit to empty/raw data). Everything here
/// is either a collaborator failure, which aborts the whole render, or a
/// configuration problem detected at startup.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TopbarError {
    /// The survey facts provider has no record for the subject.
    #[error("survey {0} not found")]
    SurveyNotFound(SurveyId),

    /// The permission-check backend failed to answer.
    #[error("permission backend failed: {0}")]
    PermissionBackend(String),

    /// The survey persistence layer failed to answer.
    #[error("survey facts backend failed: {0}")]
    FactsBackend(String),

    /// A plugin hook listener failed.
    #[error("plugin hook '{hook}' failed: {message}")]
    Hook { hook: String, message: String },

    /// The request context could not be read.
    #[error("request context failed: {0}")]
    Request(String),

    /// A view name that has no resolver.
    #[error("unknown view: {0}")]
    UnknownView(String),

    /// A setting could not be parsed.
    #[error("invalid setting: {0}")]
    InvalidSetting(String),
}

impl TopbarError {
    pub fn permission_backend(msg: impl Into<String>) -> Self {
        Self::PermissionBackend(msg.into())
    }

    pub fn facts_backend(msg: impl Into<String>) -> Self {
        Self::FactsBackend(msg.into())
    }

    pub fn hook(hook: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Hook {
            hook: hook.into(),
            message: msg.into(),
        }
    }

    pub fn request(msg: impl Into<String>) -> Self {
        Self::Request(msg.into())
    }

    pub fn unknown_view(name: impl Into<String>) -> Self {
        Self::UnknownView(name.into())
    }

    pub fn invalid_setting(msg: impl Into<String>) -> Self {
        Self::InvalidSetting(msg.into())
    }

    /// Whether this error came from a collaborator (as opposed to local
    /// configuration).
    pub fn is_collaborator_failure(&self) -> bool {
        !matches!(self, Self::UnknownView(_) | Self::InvalidSetting(_))
    }
}
