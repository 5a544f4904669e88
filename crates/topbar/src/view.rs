//! Named topbar views that carry extra data.

use core::str::FromStr;

use serde::{Deserialize, Serialize};

use surveybar_core::TopbarError;

/// A view with a registered data resolver.
///
/// The set is closed: adding a view means adding a variant and a resolver.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ViewName {
    /// Main survey bar (activation, preview, tools menu).
    #[serde(rename = "surveyTopbar_view")]
    SurveyTopbar,
    /// Left side of the responses screens.
    #[serde(rename = "responsesTopbarLeft_view")]
    ResponsesTopbarLeft,
    /// Right side with save/close/import/export buttons.
    #[serde(rename = "surveyTopbarRight_view")]
    SurveyTopbarRight,
}

impl ViewName {
    pub const ALL: [ViewName; 3] = [
        ViewName::SurveyTopbar,
        ViewName::ResponsesTopbarLeft,
        ViewName::SurveyTopbarRight,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ViewName::SurveyTopbar => "surveyTopbar_view",
            ViewName::ResponsesTopbarLeft => "responsesTopbarLeft_view",
            ViewName::SurveyTopbarRight => "surveyTopbarRight_view",
        }
    }
}

impl core::fmt::Display for ViewName {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewName {
    type Err = TopbarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| TopbarError::unknown_view(s))
    }
}
