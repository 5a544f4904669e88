//! Strongly-typed survey identifier.

use core::num::NonZeroU64;
use core::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::TopbarError;

/// Identifier of a survey (the subject a topbar is scoped to).
///
/// Always positive. "No survey" is expressed as `Option<SurveyId>::None`, never
/// as a zero id.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SurveyId(NonZeroU64);

impl SurveyId {
    /// Returns `None` for zero.
    pub fn new(value: u64) -> Option<Self> {
        NonZeroU64::new(value).map(Self)
    }

    pub fn get(&self) -> u64 {
        self.0.get()
    }

    /// Normalize a loosely-typed subject value coming from a configuration
    /// mapping.
    ///
    /// Missing, `null`, `0`, `""`, `"0"`, negative and non-numeric values all
    /// collapse to `None`.
    pub fn from_value(value: Option<&Value>) -> Option<Self> {
        match value? {
            Value::Number(n) => n.as_u64().and_then(Self::new),
            Value::String(s) => s.trim().parse::<u64>().ok().and_then(Self::new),
            _ => None,
        }
    }

    /// JSON representation used in data bags.
    pub fn to_value(self) -> Value {
        Value::from(self.get())
    }
}

impl core::fmt::Display for SurveyId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl From<SurveyId> for u64 {
    fn from(value: SurveyId) -> Self {
        value.get()
    }
}

impl FromStr for SurveyId {
    type Err = TopbarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .ok()
            .and_then(Self::new)
            .ok_or_else(|| TopbarError::invalid_setting(format!("SurveyId: '{s}' is not a positive integer")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn absent_like_values_normalize_to_none() {
        assert_eq!(SurveyId::from_value(None), None);
        assert_eq!(SurveyId::from_value(Some(&Value::Null)), None);
        assert_eq!(SurveyId::from_value(Some(&json!(0))), None);
        assert_eq!(SurveyId::from_value(Some(&json!(""))), None);
        assert_eq!(SurveyId::from_value(Some(&json!("0"))), None);
        assert_eq!(SurveyId::from_value(Some(&json!(-3))), None);
        assert_eq!(SurveyId::from_value(Some(&json!("abc"))), None);
        assert_eq!(SurveyId::from_value(Some(&json!(false))), None);
    }

    #[test]
    fn numeric_values_are_accepted() {
        assert_eq!(SurveyId::from_value(Some(&json!(42))), SurveyId::new(42));
        assert_eq!(SurveyId::from_value(Some(&json!("123456"))), SurveyId::new(123456));
    }

    #[test]
    fn parse_rejects_zero() {
        assert!("0".parse::<SurveyId>().is_err());
        assert_eq!("7".parse::<SurveyId>().unwrap().get(), 7);
    }
}
