//! Data for the left side of the responses screens
//! (`responsesTopbarLeft_view`).

use std::sync::Arc;

use serde_json::json;
use tracing::debug;

use surveybar_auth::PermissionGateway;
use surveybar_auth::permissions::{
    RESPONSES_CREATE, RESPONSES_DELETE, RESPONSES_EXPORT, RESPONSES_READ, STATISTICS_READ,
};
use surveybar_core::data::object;
use surveybar_core::{DataBag, SurveyId, TopbarError, TopbarResult};

use crate::facts::SurveyFactsProvider;

use super::{Collaborators, ViewDataResolver};

pub struct ResponsesTopbarResolver {
    facts: Arc<dyn SurveyFactsProvider>,
    permissions: Arc<dyn PermissionGateway>,
}

impl ResponsesTopbarResolver {
    pub fn new(collaborators: &Collaborators) -> Self {
        Self {
            facts: collaborators.facts.clone(),
            permissions: collaborators.permissions.clone(),
        }
    }
}

impl ViewDataResolver for ResponsesTopbarResolver {
    fn resolve(&self, sid: Option<SurveyId>) -> TopbarResult<DataBag> {
        let Some(sid) = sid else {
            debug!("no survey id; responses bar data skipped");
            return Ok(DataBag::new());
        };

        let survey = self
            .facts
            .find_by_id(sid)?
            .ok_or(TopbarError::SurveyNotFound(sid))?;
        let perms = self.permissions.as_ref();

        let read = perms.has_permission(sid, &RESPONSES_READ)?;
        let create = perms.has_permission(sid, &RESPONSES_CREATE)?;
        let statistics = perms.has_permission(sid, &STATISTICS_READ)?;
        let export = perms.has_permission(sid, &RESPONSES_EXPORT)?;
        let delete = perms.has_permission(sid, &RESPONSES_DELETE)?;

        let o_survey = serde_json::to_value(&survey)
            .map_err(|e| TopbarError::facts_backend(format!("survey {sid}: {e}")))?;

        Ok(object(json!({
            "oSurvey": o_survey,
            "hasResponsesReadPermission": read,
            "hasResponsesCreatePermission": create,
            "hasStatisticsReadPermission": statistics,
            "hasResponsesExportPermission": export,
            "hasResponsesDeletePermission": delete,
            "isActive": survey.active,
            "isTimingEnabled": survey.savetimings,
        })))
    }
}
