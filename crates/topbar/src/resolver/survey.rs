//! Data for the main survey bar (`surveyTopbar_view`).

use std::sync::Arc;

use chrono::{Duration, NaiveDateTime, Timelike};
use serde_json::json;
use tracing::debug;

use surveybar_auth::PermissionGateway;
use surveybar_auth::permissions::{
    RESPONSES_CREATE, RESPONSES_READ, STATISTICS_READ, SURVEY_ACTIVATION_UPDATE, SURVEY_CONTENT_READ,
    SURVEY_CONTENT_UPDATE, SURVEY_DELETE, SURVEY_SETTINGS_UPDATE, TOKENS_CREATE, TRANSLATIONS_READ,
};
use surveybar_core::data::object;
use surveybar_core::{DataBag, SurveyId, TopbarError, TopbarResult};
use surveybar_events::hook::sequence;
use surveybar_events::{BEFORE_SURVEY_BAR_RENDER, BEFORE_TOOLS_MENU_RENDER, HookEvent, PluginHookBus};

use crate::clock::Clock;
use crate::facts::SurveyFactsProvider;
use crate::locale::Translator;
use crate::settings::TopbarSettings;

use super::{Collaborators, ViewDataResolver};

/// What the primary button of the bar does.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ContextAction {
    /// Inactive survey: open it in preview mode.
    Preview,
    /// Active survey: open the live questionnaire.
    Execute,
}

impl ContextAction {
    pub fn for_survey(is_active: bool) -> Self {
        if is_active {
            ContextAction::Execute
        } else {
            ContextAction::Preview
        }
    }

    /// Untranslated button label.
    pub fn label(&self) -> &'static str {
        match self {
            ContextAction::Preview => "Preview survey",
            ContextAction::Execute => "Execute survey",
        }
    }

    pub fn button(&self) -> &'static str {
        match self {
            ContextAction::Preview => "preview_survey",
            ContextAction::Execute => "execute_survey",
        }
    }
}

/// Permission flags queried for the survey bar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct SurveyBarPermissions {
    content_update: bool,
    activation_update: bool,
    delete: bool,
    translate: bool,
    content_read: bool,
    tokens: bool,
    responses_create: bool,
    responses_read: bool,
    statistics_read: bool,
}

impl SurveyBarPermissions {
    fn query(gateway: &dyn PermissionGateway, sid: SurveyId) -> TopbarResult<Self> {
        Ok(Self {
            content_update: gateway.has_permission(sid, &SURVEY_CONTENT_UPDATE)?,
            activation_update: gateway.has_permission(sid, &SURVEY_ACTIVATION_UPDATE)?,
            delete: gateway.has_permission(sid, &SURVEY_DELETE)?,
            translate: gateway.has_permission(sid, &TRANSLATIONS_READ)?,
            content_read: gateway.has_permission(sid, &SURVEY_CONTENT_READ)?,
            // Either settings access or participant creation unlocks the
            // participants entry.
            tokens: gateway.has_any(sid, &[SURVEY_SETTINGS_UPDATE, TOKENS_CREATE])?,
            responses_create: gateway.has_permission(sid, &RESPONSES_CREATE)?,
            responses_read: gateway.has_permission(sid, &RESPONSES_READ)?,
            statistics_read: gateway.has_permission(sid, &STATISTICS_READ)?,
        })
    }
}

/// Aggregates survey state, permissions and plugin menus for the main bar.
pub struct SurveyTopbarResolver {
    facts: Arc<dyn SurveyFactsProvider>,
    permissions: Arc<dyn PermissionGateway>,
    hooks: Arc<dyn PluginHookBus>,
    translator: Arc<dyn Translator>,
    clock: Arc<dyn Clock>,
    time_adjust: Duration,
}

impl SurveyTopbarResolver {
    pub fn new(collaborators: &Collaborators, settings: &TopbarSettings) -> Self {
        Self {
            facts: collaborators.facts.clone(),
            permissions: collaborators.permissions.clone(),
            hooks: collaborators.hooks.clone(),
            translator: collaborators.translator.clone(),
            clock: collaborators.clock.clone(),
            time_adjust: settings.time_adjust,
        }
    }

    /// Current time shifted by the configured adjustment, at minute precision.
    ///
    /// Survey dates are stored as naive timestamps in the same reference.
    /// Comparisons against it are strict: a start or expiry date equal to
    /// this minute (`HH:MM:00`) is neither pending nor expired.
    fn adjusted_now(&self) -> NaiveDateTime {
        let now = self.clock.now();
        let shifted = now.checked_add_signed(self.time_adjust).unwrap_or(now).naive_utc();
        shifted
            .with_second(0)
            .and_then(|t| t.with_nanosecond(0))
            .unwrap_or(shifted)
    }

    fn contributions(&self, hook: &str, sid: SurveyId, field: &str) -> TopbarResult<Vec<serde_json::Value>> {
        let fields = self.hooks.dispatch(&HookEvent::for_survey(hook, sid))?;
        Ok(sequence(&fields, field))
    }
}

impl ViewDataResolver for SurveyTopbarResolver {
    fn resolve(&self, sid: Option<SurveyId>) -> TopbarResult<DataBag> {
        let Some(sid) = sid else {
            debug!("no survey id; survey bar data skipped");
            return Ok(DataBag::new());
        };

        let survey = self
            .facts
            .find_by_id(sid)?
            .ok_or(TopbarError::SurveyNotFound(sid))?;
        let perms = SurveyBarPermissions::query(self.permissions.as_ref(), sid)?;

        let is_active = survey.is_active();
        let sumcount = self.facts.count_top_level_questions(sid)?;
        let canactivate = sumcount > 0 && perms.activation_update;

        let now = self.adjusted_now();
        let expired = survey.expires.is_some_and(|expires| expires < now);
        let notstarted = survey.startdate.is_some_and(|start| start > now);

        let action = ContextAction::for_survey(is_active);
        let conditions_count = self.facts.count_conditions(sid)?;

        let extra_tools_menu_items = self.contributions(BEFORE_TOOLS_MENU_RENDER, sid, "menuItems")?;
        let before_survey_bar_render = self.contributions(BEFORE_SURVEY_BAR_RENDER, sid, "menus")?;

        let show_tools_menu =
            perms.delete || perms.translate || perms.content_update || !extra_tools_menu_items.is_empty();

        let o_survey = serde_json::to_value(&survey)
            .map_err(|e| TopbarError::facts_backend(format!("survey {sid}: {e}")))?;

        Ok(object(json!({
            "sid": sid.to_value(),
            "oSurvey": o_survey,
            "isActive": is_active,
            "canactivate": canactivate,
            "expired": expired,
            "notstarted": notstarted,
            "context": self.translator.translate(action.label()),
            "contextbutton": action.button(),
            "language": survey.language,
            "sumcount": sumcount,
            "hasSurveyContentPermission": perms.content_update,
            "hasDeletePermission": perms.delete,
            "hasSurveyTranslatePermission": perms.translate,
            "hasAdditionalLanguages": !survey.additional_languages.is_empty(),
            "conditionsCount": conditions_count,
            "hasSurveyReadPermission": perms.content_read,
            "hasSurveyTokensPermission": perms.tokens,
            "hasResponsesCreatePermission": perms.responses_create,
            "hasResponsesReadPermission": perms.responses_read,
            "hasSurveyActivationPermission": perms.activation_update,
            "hasResponsesStatisticsReadPermission": perms.statistics_read,
            "extraToolsMenuItems": extra_tools_menu_items,
            "beforeSurveyBarRender": before_survey_bar_render,
            "showToolsMenu": show_tools_menu,
        })))
    }
}
