//! Survey facts read by the resolvers.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use surveybar_core::{SurveyId, TopbarResult};

/// Flag value marking an active survey (and enabled timings).
pub const FLAG_YES: &str = "Y";

/// Read-only snapshot of the survey attributes the topbar needs.
///
/// Flags keep their stored `"Y"`/`"N"` form; templates receive them verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveyFacts {
    pub sid: SurveyId,
    #[serde(default = "no")]
    pub active: String,
    #[serde(default, with = "db_datetime")]
    pub expires: Option<NaiveDateTime>,
    #[serde(default, with = "db_datetime")]
    pub startdate: Option<NaiveDateTime>,
    #[serde(default)]
    pub language: String,
    #[serde(default = "no")]
    pub savetimings: String,
    #[serde(default)]
    pub additional_languages: Vec<String>,
}

fn no() -> String {
    "N".to_string()
}

impl SurveyFacts {
    /// An inactive survey with no dates and no extra languages.
    pub fn new(sid: SurveyId, language: impl Into<String>) -> Self {
        Self {
            sid,
            active: no(),
            expires: None,
            startdate: None,
            language: language.into(),
            savetimings: no(),
            additional_languages: Vec::new(),
        }
    }

    pub fn activated(mut self) -> Self {
        self.active = FLAG_YES.to_string();
        self
    }

    pub fn is_active(&self) -> bool {
        self.active == FLAG_YES
    }
}

/// `Y-m-d H:i:s` timestamps as stored by the survey tables; `""` and `null`
/// mean "not set".
mod db_datetime {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y-%m-%d %H:%M:%S";
    const SHORT_FORMAT: &str = "%Y-%m-%d %H:%M";

    pub fn serialize<S: Serializer>(value: &Option<NaiveDateTime>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(dt) => s.serialize_str(&dt.format(FORMAT).to_string()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveDateTime>, D::Error> {
        let raw = Option::<String>::deserialize(d)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(s) => NaiveDateTime::parse_from_str(s, FORMAT)
                .or_else(|_| NaiveDateTime::parse_from_str(s, SHORT_FORMAT))
                .map(Some)
                .map_err(serde::de::Error::custom),
        }
    }
}

/// Structural/state queries about surveys.
///
/// Backend failures surface as `TopbarError::FactsBackend`.
pub trait SurveyFactsProvider: Send + Sync {
    fn find_by_id(&self, sid: SurveyId) -> TopbarResult<Option<SurveyFacts>>;

    /// Questions without a parent question.
    fn count_top_level_questions(&self, sid: SurveyId) -> TopbarResult<u64>;

    /// Logic conditions attached to questions of the survey.
    fn count_conditions(&self, sid: SurveyId) -> TopbarResult<u64>;
}

impl<P> SurveyFactsProvider for Arc<P>
where
    P: SurveyFactsProvider + ?Sized,
{
    fn find_by_id(&self, sid: SurveyId) -> TopbarResult<Option<SurveyFacts>> {
        (**self).find_by_id(sid)
    }

    fn count_top_level_questions(&self, sid: SurveyId) -> TopbarResult<u64> {
        (**self).count_top_level_questions(sid)
    }

    fn count_conditions(&self, sid: SurveyId) -> TopbarResult<u64> {
        (**self).count_conditions(sid)
    }
}

/// One stored survey with its question/condition counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveyRecord {
    #[serde(flatten)]
    pub facts: SurveyFacts,
    #[serde(default)]
    pub top_level_questions: u64,
    #[serde(default)]
    pub conditions: u64,
}

/// In-memory survey store for tests/dev.
#[derive(Debug, Clone, Default)]
pub struct InMemorySurveyFacts {
    records: HashMap<SurveyId, SurveyRecord>,
}

impl InMemorySurveyFacts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = SurveyRecord>,
    {
        Self {
            records: records.into_iter().map(|r| (r.facts.sid, r)).collect(),
        }
    }

    pub fn insert(mut self, facts: SurveyFacts, top_level_questions: u64, conditions: u64) -> Self {
        self.records.insert(
            facts.sid,
            SurveyRecord {
                facts,
                top_level_questions,
                conditions,
            },
        );
        self
    }

    fn record(&self, sid: SurveyId) -> Option<&SurveyRecord> {
        self.records.get(&sid)
    }
}

impl SurveyFactsProvider for InMemorySurveyFacts {
    fn find_by_id(&self, sid: SurveyId) -> TopbarResult<Option<SurveyFacts>> {
        Ok(self.record(sid).map(|r| r.facts.clone()))
    }

    fn count_top_level_questions(&self, sid: SurveyId) -> TopbarResult<u64> {
        Ok(self.record(sid).map_or(0, |r| r.top_level_questions))
    }

    fn count_conditions(&self, sid: SurveyId) -> TopbarResult<u64> {
        Ok(self.record(sid).map_or(0, |r| r.conditions))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    fn sid(n: u64) -> SurveyId {
        SurveyId::new(n).unwrap()
    }

    #[test]
    fn stored_timestamps_parse() {
        let facts: SurveyFacts = serde_json::from_value(json!({
            "sid": 5,
            "active": "Y",
            "expires": "2030-01-02 03:04:05",
            "startdate": "",
            "language": "en",
        }))
        .unwrap();

        let expected = NaiveDate::from_ymd_opt(2030, 1, 2)
            .unwrap()
            .and_hms_opt(3, 4, 5)
            .unwrap();
        assert_eq!(facts.expires, Some(expected));
        assert_eq!(facts.startdate, None);
        assert!(facts.is_active());
        assert_eq!(facts.savetimings, "N");
    }

    #[test]
    fn timestamps_serialize_in_stored_form() {
        let mut facts = SurveyFacts::new(sid(1), "de");
        facts.startdate = NaiveDate::from_ymd_opt(2024, 6, 1).and_then(|d| d.and_hms_opt(8, 0, 0));

        let value = serde_json::to_value(&facts).unwrap();
        assert_eq!(value["startdate"], json!("2024-06-01 08:00:00"));
        assert_eq!(value["expires"], json!(null));
    }

    #[test]
    fn malformed_timestamp_is_rejected() {
        let result: Result<SurveyFacts, _> =
            serde_json::from_value(json!({"sid": 5, "expires": "next tuesday"}));
        assert!(result.is_err());
    }

    #[test]
    fn in_memory_store_answers_counts() {
        let store = InMemorySurveyFacts::new().insert(SurveyFacts::new(sid(3), "en"), 4, 2);

        assert_eq!(store.find_by_id(sid(3)).unwrap().map(|f| f.sid), Some(sid(3)));
        assert_eq!(store.count_top_level_questions(sid(3)).unwrap(), 4);
        assert_eq!(store.count_conditions(sid(3)).unwrap(), 2);
        assert_eq!(store.find_by_id(sid(4)).unwrap(), None);
        assert_eq!(store.count_conditions(sid(4)).unwrap(), 0);
    }

    #[test]
    fn records_deserialize_flat() {
        let records: Vec<SurveyRecord> = serde_json::from_value(json!([
            {"sid": 9, "language": "fr", "top_level_questions": 3}
        ]))
        .unwrap();
        let store = InMemorySurveyFacts::from_records(records);

        assert_eq!(store.count_top_level_questions(sid(9)).unwrap(), 3);
        assert_eq!(store.find_by_id(sid(9)).unwrap().unwrap().language, "fr");
    }
}
