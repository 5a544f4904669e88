//! Named extension points dispatched while a topbar is being assembled.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use surveybar_core::{DataBag, SurveyId};

/// Lets plugins add entries to the survey "Tools" menu.
///
/// Contributions are read from the `menuItems` field.
pub const BEFORE_TOOLS_MENU_RENDER: &str = "beforeToolsMenuRender";

/// Lets plugins add whole menus to the survey bar.
///
/// Contributions are read from the `menus` field.
pub const BEFORE_SURVEY_BAR_RENDER: &str = "beforeSurveyBarRender";

/// A dispatched hook: its name plus the payload listeners can read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HookEvent {
    pub name: String,
    pub payload: DataBag,
}

impl HookEvent {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            payload: DataBag::new(),
        }
    }

    /// Event scoped to a survey (`{"surveyId": sid}` payload).
    pub fn for_survey(name: impl Into<String>, sid: SurveyId) -> Self {
        Self::new(name).with("surveyId", sid.to_value())
    }

    pub fn with(mut self, key: impl Into<String>, value: Value) -> Self {
        self.payload.insert(key.into(), value);
        self
    }

    pub fn survey_id(&self) -> Option<SurveyId> {
        SurveyId::from_value(self.payload.get("surveyId"))
    }
}

/// Reads a sequence contribution, defaulting to an empty sequence when no
/// listener provided one.
///
/// A scalar/object contribution is wrapped into a one-element sequence.
pub fn sequence(contributions: &DataBag, field: &str) -> Vec<Value> {
    match contributions.get(field) {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items.clone(),
        Some(other) => vec![other.clone()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn survey_payload_round_trips_the_id() {
        let sid = SurveyId::new(12).unwrap();
        let event = HookEvent::for_survey(BEFORE_TOOLS_MENU_RENDER, sid);

        assert_eq!(event.payload.get("surveyId"), Some(&json!(12)));
        assert_eq!(event.survey_id(), Some(sid));
    }

    #[test]
    fn missing_contribution_is_an_empty_sequence() {
        let mut bag = DataBag::new();
        assert!(sequence(&bag, "menuItems").is_empty());

        bag.insert("menuItems".into(), Value::Null);
        assert!(sequence(&bag, "menuItems").is_empty());

        bag.insert("menuItems".into(), json!({"label": "x"}));
        assert_eq!(sequence(&bag, "menuItems"), vec![json!({"label": "x"})]);
    }
}
