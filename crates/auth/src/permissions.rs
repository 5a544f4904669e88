use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// A (resource, action) capability pair checked against a survey.
///
/// Both halves are opaque strings (e.g. `responses` / `read`). A resource of
/// `"*"` is reserved for grant sets meaning "every capability".
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Capability {
    resource: Cow<'static, str>,
    action: Cow<'static, str>,
}

impl Capability {
    pub fn new(resource: impl Into<Cow<'static, str>>, action: impl Into<Cow<'static, str>>) -> Self {
        Self {
            resource: resource.into(),
            action: action.into(),
        }
    }

    pub const fn from_static(resource: &'static str, action: &'static str) -> Self {
        Self {
            resource: Cow::Borrowed(resource),
            action: Cow::Borrowed(action),
        }
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }

    pub fn action(&self) -> &str {
        &self.action
    }

    pub fn is_wildcard(&self) -> bool {
        self.resource() == "*"
    }
}

impl core::fmt::Display for Capability {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}/{}", self.resource, self.action)
    }
}

/// Grants every capability on a survey.
pub const ALL: Capability = Capability::from_static("*", "*");

pub const SURVEY_CONTENT_UPDATE: Capability = Capability::from_static("surveycontent", "update");
pub const SURVEY_CONTENT_READ: Capability = Capability::from_static("surveycontent", "read");
pub const SURVEY_ACTIVATION_UPDATE: Capability = Capability::from_static("surveyactivation", "update");
pub const SURVEY_DELETE: Capability = Capability::from_static("survey", "delete");
pub const SURVEY_SETTINGS_UPDATE: Capability = Capability::from_static("surveysettings", "update");
pub const TRANSLATIONS_READ: Capability = Capability::from_static("translations", "read");
pub const TOKENS_CREATE: Capability = Capability::from_static("tokens", "create");
pub const RESPONSES_CREATE: Capability = Capability::from_static("responses", "create");
pub const RESPONSES_READ: Capability = Capability::from_static("responses", "read");
pub const RESPONSES_EXPORT: Capability = Capability::from_static("responses", "export");
pub const RESPONSES_DELETE: Capability = Capability::from_static("responses", "delete");
pub const STATISTICS_READ: Capability = Capability::from_static("statistics", "read");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owned_and_static_pairs_compare_equal() {
        assert_eq!(Capability::new("responses".to_string(), "read"), RESPONSES_READ);
        assert_eq!(RESPONSES_READ.to_string(), "responses/read");
        assert!(ALL.is_wildcard());
        assert!(!STATISTICS_READ.is_wildcard());
    }
}
