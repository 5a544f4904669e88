//! In-memory permission gateway for tests/dev.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use surveybar_core::{SurveyId, TopbarResult};

use crate::{Capability, PermissionGateway};

/// A single grant: a capability on one survey, or on every survey when
/// `sid` is `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grant {
    #[serde(default)]
    pub sid: Option<SurveyId>,
    pub resource: String,
    pub action: String,
}

impl Grant {
    pub fn capability(&self) -> Capability {
        Capability::new(self.resource.clone(), self.action.clone())
    }
}

/// Static grant set.
///
/// - No IO
/// - No panics
/// - Capability `*/*` on a survey (or globally) grants everything
#[derive(Debug, Clone, Default)]
pub struct StaticPermissionGateway {
    per_survey: HashMap<SurveyId, HashSet<Capability>>,
    global: HashSet<Capability>,
}

impl StaticPermissionGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_grants<I>(grants: I) -> Self
    where
        I: IntoIterator<Item = Grant>,
    {
        grants.into_iter().fold(Self::new(), |gw, grant| match grant.sid {
            Some(sid) => gw.grant(sid, grant.capability()),
            None => gw.grant_everywhere(grant.capability()),
        })
    }

    pub fn grant(mut self, sid: SurveyId, capability: Capability) -> Self {
        self.per_survey.entry(sid).or_default().insert(capability);
        self
    }

    /// Superadmin-style grant of every capability on one survey.
    pub fn grant_all(self, sid: SurveyId) -> Self {
        self.grant(sid, crate::permissions::ALL)
    }

    pub fn grant_everywhere(mut self, capability: Capability) -> Self {
        self.global.insert(capability);
        self
    }

    fn holds(set: &HashSet<Capability>, capability: &Capability) -> bool {
        set.contains(&crate::permissions::ALL) || set.contains(capability)
    }
}

impl PermissionGateway for StaticPermissionGateway {
    fn has_permission(&self, sid: SurveyId, capability: &Capability) -> TopbarResult<bool> {
        let granted = Self::holds(&self.global, capability)
            || self
                .per_survey
                .get(&sid)
                .is_some_and(|set| Self::holds(set, capability));

        if !granted {
            debug!(sid = %sid, capability = %capability, "capability not granted");
        }
        Ok(granted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::permissions::{RESPONSES_READ, STATISTICS_READ, SURVEY_DELETE};

    fn sid(n: u64) -> SurveyId {
        SurveyId::new(n).unwrap()
    }

    #[test]
    fn grants_are_survey_scoped() {
        let gw = StaticPermissionGateway::new().grant(sid(1), RESPONSES_READ);

        assert!(gw.has_permission(sid(1), &RESPONSES_READ).unwrap());
        assert!(!gw.has_permission(sid(2), &RESPONSES_READ).unwrap());
        assert!(!gw.has_permission(sid(1), &STATISTICS_READ).unwrap());
    }

    #[test]
    fn wildcard_grants_everything_on_that_survey() {
        let gw = StaticPermissionGateway::new().grant_all(sid(5));

        assert!(gw.has_permission(sid(5), &SURVEY_DELETE).unwrap());
        assert!(!gw.has_permission(sid(6), &SURVEY_DELETE).unwrap());
    }

    #[test]
    fn global_grants_apply_to_every_survey() {
        let gw = StaticPermissionGateway::new().grant_everywhere(STATISTICS_READ);

        assert!(gw.has_permission(sid(1), &STATISTICS_READ).unwrap());
        assert!(gw.has_permission(sid(99), &STATISTICS_READ).unwrap());
    }

    #[test]
    fn has_any_stops_at_first_grant() {
        let gw = StaticPermissionGateway::new().grant(sid(3), STATISTICS_READ);

        assert!(gw.has_any(sid(3), &[RESPONSES_READ, STATISTICS_READ]).unwrap());
        assert!(!gw.has_any(sid(3), &[RESPONSES_READ, SURVEY_DELETE]).unwrap());
        assert!(!gw.has_any(sid(3), &[]).unwrap());
    }

    #[test]
    fn grants_deserialize_from_fixture_rows() {
        let grants: Vec<Grant> = serde_json::from_str(
            r#"[{"sid": 4, "resource": "responses", "action": "read"},
                {"resource": "statistics", "action": "read"}]"#,
        )
        .unwrap();
        let gw = StaticPermissionGateway::from_grants(grants);

        assert!(gw.has_permission(sid(4), &RESPONSES_READ).unwrap());
        assert!(gw.has_permission(sid(8), &STATISTICS_READ).unwrap());
        assert!(!gw.has_permission(sid(8), &RESPONSES_READ).unwrap());
    }
}
