//! JSON fixture describing one render: page context plus the state the
//! collaborators should report.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Deserialize;

use surveybar_auth::{Grant, StaticPermissionGateway};
use surveybar_core::{Configuration, DataBag, TopbarResult};
use surveybar_events::InMemoryHookBus;
use surveybar_topbar::{
    BaseUrlGenerator, CatalogTranslator, Collaborators, InMemorySurveyFacts, StaticRequest, SurveyRecord,
    TopbarSettings,
};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Fixture {
    /// Page view context (`sid`, `topBar`, ...).
    pub context: Configuration,
    pub surveys: Vec<SurveyRecord>,
    pub grants: Vec<Grant>,
    /// Hook name → fields contributed by a single listener.
    pub hooks: BTreeMap<String, DataBag>,
    pub referrer: Option<String>,
    /// Source string → translation.
    pub translations: BTreeMap<String, String>,
}

impl Fixture {
    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }

    /// In-memory collaborators reporting this fixture's state.
    pub fn collaborators(&self, settings: &TopbarSettings) -> TopbarResult<Collaborators> {
        let hooks = InMemoryHookBus::new();
        for (name, fields) in &self.hooks {
            hooks.contribute(name.clone(), fields.clone())?;
        }

        let request = match &self.referrer {
            Some(referrer) => StaticRequest::with_referrer(referrer.clone()),
            None => StaticRequest::new(),
        };

        Ok(Collaborators::new(
            Arc::new(StaticPermissionGateway::from_grants(self.grants.clone())),
            Arc::new(InMemorySurveyFacts::from_records(self.surveys.clone())),
            Arc::new(hooks),
            Arc::new(request),
            Arc::new(BaseUrlGenerator::new(settings.base_url.clone())),
        )
        .with_translator(Arc::new(CatalogTranslator::new(self.translations.clone()))))
    }
}
